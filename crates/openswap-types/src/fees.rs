//! Fee schedules.
//!
//! A [`FeeSchedule`] is an ordered list of `(recipient, amount)` pairs, so a
//! recipient can never be missing its amount. The parallel-list shape used on
//! the wire is accepted through [`FeeSchedule::from_parallel`].

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::{Result, SwapError};

/// A single fee payout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeeSplit {
    pub recipient: Address,
    pub amount: U256,
}

impl FeeSplit {
    #[must_use]
    pub fn new(recipient: Address, amount: U256) -> Self {
        Self { recipient, amount }
    }
}

/// Ordered fee payouts. Order is significant: it is signed and it is the
/// order in which payouts are issued.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeeSchedule(Vec<FeeSplit>);

impl FeeSchedule {
    #[must_use]
    pub fn new(splits: Vec<FeeSplit>) -> Self {
        Self(splits)
    }

    /// Build a schedule from parallel recipient / amount lists.
    ///
    /// # Errors
    /// Returns [`SwapError::InvalidArrays`] if the lists differ in length.
    pub fn from_parallel(recipients: &[Address], amounts: &[U256]) -> Result<Self> {
        if recipients.len() != amounts.len() {
            return Err(SwapError::InvalidArrays {
                recipients: recipients.len(),
                amounts: amounts.len(),
            });
        }
        Ok(Self(
            recipients
                .iter()
                .zip(amounts)
                .map(|(r, a)| FeeSplit::new(*r, *a))
                .collect(),
        ))
    }

    /// Checked sum of all amounts.
    ///
    /// # Errors
    /// Returns [`SwapError::ArithmeticOverflow`] if the sum exceeds 256 bits.
    pub fn total(&self) -> Result<U256> {
        self.0.iter().try_fold(U256::ZERO, |acc, split| {
            acc.checked_add(split.amount)
                .ok_or(SwapError::ArithmeticOverflow { context: "fee schedule" })
        })
    }

    /// Recipients in schedule order.
    pub fn recipients(&self) -> impl Iterator<Item = Address> + '_ {
        self.0.iter().map(|s| s.recipient)
    }

    /// Amounts in schedule order.
    pub fn amounts(&self) -> impl Iterator<Item = U256> + '_ {
        self.0.iter().map(|s| s.amount)
    }

    /// Iterate the splits in the order they are paid.
    pub fn iter(&self) -> std::slice::Iter<'_, FeeSplit> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<FeeSplit>> for FeeSchedule {
    fn from(splits: Vec<FeeSplit>) -> Self {
        Self(splits)
    }
}

impl<'a> IntoIterator for &'a FeeSchedule {
    type Item = &'a FeeSplit;
    type IntoIter = std::slice::Iter<'a, FeeSplit>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(b: u8) -> Address {
        Address::repeat_byte(b)
    }

    #[test]
    fn from_parallel_pairs_in_order() {
        let schedule = FeeSchedule::from_parallel(
            &[addr(1), addr(2)],
            &[U256::from(10), U256::from(5)],
        )
        .unwrap();
        let splits: Vec<_> = schedule.iter().copied().collect();
        assert_eq!(splits[0], FeeSplit::new(addr(1), U256::from(10)));
        assert_eq!(splits[1], FeeSplit::new(addr(2), U256::from(5)));
    }

    #[test]
    fn from_parallel_rejects_length_mismatch() {
        let err = FeeSchedule::from_parallel(&[addr(1), addr(2)], &[U256::from(10)]).unwrap_err();
        assert!(matches!(
            err,
            SwapError::InvalidArrays {
                recipients: 2,
                amounts: 1
            }
        ));
    }

    #[test]
    fn total_sums_amounts() {
        let schedule = FeeSchedule::new(vec![
            FeeSplit::new(addr(1), U256::from(10)),
            FeeSplit::new(addr(2), U256::from(15)),
        ]);
        assert_eq!(schedule.total().unwrap(), U256::from(25));
        assert_eq!(FeeSchedule::default().total().unwrap(), U256::ZERO);
    }

    #[test]
    fn total_overflow_is_an_error() {
        let schedule = FeeSchedule::new(vec![
            FeeSplit::new(addr(1), U256::MAX),
            FeeSplit::new(addr(2), U256::from(1)),
        ]);
        assert!(matches!(
            schedule.total().unwrap_err(),
            SwapError::ArithmeticOverflow { .. }
        ));
    }

    #[test]
    fn serializes_as_plain_list() {
        let schedule = FeeSchedule::new(vec![FeeSplit::new(addr(1), U256::from(10))]);
        let json = serde_json::to_string(&schedule).unwrap();
        assert!(json.starts_with('['), "Got: {json}");
    }
}
