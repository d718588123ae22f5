//! Per-call context: who is calling, what native value is attached, and
//! the instant expiration is evaluated at.

use alloy_primitives::{Address, U256};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Caller-supplied context of one `swap` / `cancel` invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    /// The taker for `swap`, the maker for `cancel`.
    pub caller: Address,
    /// Native value attached to the call.
    pub value: U256,
    /// Unix seconds. Evaluated once per call.
    pub timestamp: u64,
}

impl CallContext {
    /// Context with no attached value, evaluated now.
    #[must_use]
    pub fn new(caller: Address) -> Self {
        Self {
            caller,
            value: U256::ZERO,
            timestamp: Utc::now().timestamp().unsigned_abs(),
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    #[must_use]
    pub fn at(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }

    #[must_use]
    pub fn has_value(&self) -> bool {
        !self.value.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let ctx = CallContext::new(Address::repeat_byte(1));
        assert!(!ctx.has_value());
        assert!(ctx.timestamp > 1_600_000_000);
    }

    #[test]
    fn builders() {
        let ctx = CallContext::new(Address::repeat_byte(1))
            .with_value(U256::from(100))
            .at(42);
        assert!(ctx.has_value());
        assert_eq!(ctx.value, U256::from(100));
        assert_eq!(ctx.timestamp, 42);
    }
}
