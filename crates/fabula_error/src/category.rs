//! Caller-facing error taxonomy.

/// Coarse error kinds exposed to callers of the engine.
///
/// Callers only ever see one of these plus a human-readable message; prompt text
/// and raw model output stay inside the engine.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
pub enum ErrorCategory {
    /// Malformed or missing caller input; never reaches the model
    #[strum(serialize = "ValidationError")]
    Validation,
    /// Story or node absent in persisted state
    #[strum(serialize = "NotFoundError")]
    NotFound,
    /// Selected option id not present on the current node
    #[strum(serialize = "InvalidChoiceError")]
    InvalidChoice,
    /// Model output failed schema validation
    #[strum(serialize = "StructureError")]
    Structure,
    /// Retryable infrastructure failure
    #[strum(serialize = "TransientServiceError")]
    TransientService,
    /// Non-retryable infrastructure failure
    #[strum(serialize = "PermanentServiceError")]
    PermanentService,
    /// Fallback chain exhausted with no valid result
    #[strum(serialize = "AllModelsFailed")]
    AllModelsFailed,
}
