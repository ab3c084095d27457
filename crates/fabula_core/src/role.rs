//! Role types for prompt messages.

use serde::{Deserialize, Serialize};

/// Who a prompt message speaks for.
///
/// # Examples
///
/// ```
/// use fabula_core::Role;
///
/// assert_ne!(Role::System, Role::User);
/// assert_eq!(format!("{}", Role::System), "System");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub enum Role {
    /// Fixed instructions describing the required output shape
    System,
    /// The per-request instruction
    User,
}
