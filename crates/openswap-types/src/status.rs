//! # Status: the one-shot order state machine
//!
//! ```text
//!   ┌──────┐   swap    ┌──────────┐
//!   │ OPEN ├──────────▶│ EXECUTED │
//!   └──┬───┘           └──────────┘
//!      │ cancel
//!      ▼
//!   ┌──────────┐
//!   │ CANCELED │
//!   └──────────┘
//! ```
//!
//! - **Lazy**: every `(maker, hash)` is implicitly OPEN until written
//! - **Single-use**: OPEN → EXECUTED is irreversible, prevents replay
//! - **Terminal**: EXECUTED and CANCELED never transition again

use serde::{Deserialize, Serialize};

/// Lifecycle state of a signed order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// Never filled or canceled. Implicit for unknown keys.
    #[default]
    Open,
    /// Filled by a taker. **Irreversible.**
    Executed,
    /// Withdrawn by the maker. **Irreversible.**
    Canceled,
}

impl Status {
    /// Can this status transition to the given target?
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!((self, target), (Self::Open, Self::Executed | Self::Canceled))
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Executed => write!(f, "EXECUTED"),
            Self::Canceled => write!(f, "CANCELED"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_open() {
        assert_eq!(Status::default(), Status::Open);
    }

    #[test]
    fn transitions_valid() {
        assert!(Status::Open.can_transition_to(Status::Executed));
        assert!(Status::Open.can_transition_to(Status::Canceled));
    }

    #[test]
    fn transitions_invalid() {
        assert!(!Status::Open.can_transition_to(Status::Open));
        assert!(!Status::Executed.can_transition_to(Status::Open));
        assert!(!Status::Executed.can_transition_to(Status::Canceled));
        assert!(!Status::Executed.can_transition_to(Status::Executed));
        assert!(!Status::Canceled.can_transition_to(Status::Open));
        assert!(!Status::Canceled.can_transition_to(Status::Executed));
        assert!(!Status::Canceled.can_transition_to(Status::Canceled));
    }

    #[test]
    fn display() {
        assert_eq!(Status::Executed.to_string(), "EXECUTED");
        assert_eq!(Status::Canceled.to_string(), "CANCELED");
    }
}
