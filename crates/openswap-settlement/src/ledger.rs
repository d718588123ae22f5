//! Asset ledger boundary.
//!
//! The engine never owns balances. It moves them through an [`AssetLedger`]
//! that the host supplies: a token registry, a chain adapter, or the
//! in-memory ledger used in tests. One swap is one ledger transaction:
//!
//! ```text
//! begin() → transfer()* / wrap()? → commit()
//!                              └──→ drop (every effect discarded)
//! ```
//!
//! [`Transfers`] wraps a transaction so the engine can record what it moved
//! and report ledger refusals as [`SwapError`]s.

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use openswap_types::{Result, SwapError, TransferRecord};
use thiserror::Error;

/// Why a ledger refused an operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("{holder} holds {available} of {token}, needs {needed}")]
    InsufficientBalance {
        token: Address,
        holder: Address,
        needed: U256,
        available: U256,
    },

    #[error("{holder} does not own item {id} of {token}")]
    NotOwner {
        token: Address,
        holder: Address,
        id: U256,
    },

    #[error("unknown token {0}")]
    UnknownToken(Address),

    #[error("refused: {0}")]
    Refused(String),
}

/// An open ledger transaction.
///
/// Effects are visible to later calls on the same transaction immediately.
/// They become visible to anyone else only on [`commit`](Self::commit).
pub trait LedgerTx {
    /// Move `value` of `token` from `from` to `to`.
    ///
    /// For fungible tokens `value` is an amount. For item tokens it is the
    /// item id.
    fn transfer(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        value: U256,
    ) -> std::result::Result<(), LedgerError>;

    /// Deposit `amount` of native value into the `wrapped` token, crediting
    /// `holder`.
    fn wrap(
        &mut self,
        wrapped: Address,
        holder: Address,
        amount: U256,
    ) -> std::result::Result<(), LedgerError>;

    /// Apply every effect. Cannot fail.
    fn commit(self);
}

/// Source of ledger transactions.
pub trait AssetLedger: Send + Sync {
    type Tx: LedgerTx;

    /// Open a transaction.
    ///
    /// # Errors
    /// Returns the ledger's reason if it cannot start one.
    fn begin(&self) -> std::result::Result<Self::Tx, LedgerError>;
}

impl<T: AssetLedger + ?Sized> AssetLedger for Arc<T> {
    type Tx = T::Tx;

    fn begin(&self) -> std::result::Result<Self::Tx, LedgerError> {
        (**self).begin()
    }
}

/// A ledger transaction plus the record of every transfer issued on it.
pub struct Transfers<T: LedgerTx> {
    tx: T,
    records: Vec<TransferRecord>,
    wrapped: U256,
}

impl<T: LedgerTx> Transfers<T> {
    #[must_use]
    pub fn new(tx: T) -> Self {
        Self {
            tx,
            records: Vec::new(),
            wrapped: U256::ZERO,
        }
    }

    /// Issue one transfer.
    ///
    /// # Errors
    /// [`SwapError::TransferFailed`] if the ledger refuses it.
    pub fn transfer(&mut self, token: Address, from: Address, to: Address, value: U256) -> Result<()> {
        self.tx
            .transfer(token, from, to, value)
            .map_err(|err| SwapError::TransferFailed {
                reason: format!("{token}: {err}"),
            })?;
        tracing::debug!(
            token = %token,
            from = %from,
            to = %to,
            value = %value,
            "Transfer issued"
        );
        self.records.push(TransferRecord::new(token, from, to, value));
        Ok(())
    }

    /// Wrap attached native value into `wrapped` for `holder`.
    ///
    /// # Errors
    /// [`SwapError::WrapFailed`] if the ledger refuses the deposit.
    pub fn wrap(&mut self, wrapped: Address, holder: Address, amount: U256) -> Result<()> {
        self.tx
            .wrap(wrapped, holder, amount)
            .map_err(|err| SwapError::WrapFailed {
                reason: err.to_string(),
            })?;
        self.wrapped = self
            .wrapped
            .checked_add(amount)
            .ok_or(SwapError::ArithmeticOverflow {
                context: "wrapped value",
            })?;
        Ok(())
    }

    #[must_use]
    pub fn records(&self) -> &[TransferRecord] {
        &self.records
    }

    /// Total native value wrapped on this transaction.
    #[must_use]
    pub fn wrapped(&self) -> U256 {
        self.wrapped
    }

    /// Commit the underlying transaction and hand back the records.
    #[must_use]
    pub fn commit(self) -> Vec<TransferRecord> {
        self.tx.commit();
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct ScriptedTx {
        refuse_after: Option<usize>,
        issued: usize,
    }

    impl LedgerTx for ScriptedTx {
        fn transfer(
            &mut self,
            _token: Address,
            _from: Address,
            _to: Address,
            _value: U256,
        ) -> std::result::Result<(), LedgerError> {
            if self.refuse_after.is_some_and(|n| self.issued >= n) {
                return Err(LedgerError::Refused("scripted".into()));
            }
            self.issued += 1;
            Ok(())
        }

        fn wrap(
            &mut self,
            wrapped: Address,
            _holder: Address,
            _amount: U256,
        ) -> std::result::Result<(), LedgerError> {
            Err(LedgerError::UnknownToken(wrapped))
        }

        fn commit(self) {}
    }

    fn addr(b: u8) -> Address {
        Address::repeat_byte(b)
    }

    #[test]
    fn records_transfers_in_issue_order() {
        let mut t = Transfers::new(ScriptedTx::default());
        t.transfer(addr(1), addr(2), addr(3), U256::from(10)).unwrap();
        t.transfer(addr(4), addr(3), addr(2), U256::from(7)).unwrap();

        let records = t.commit();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], TransferRecord::new(addr(1), addr(2), addr(3), U256::from(10)));
        assert_eq!(records[1].token, addr(4));
    }

    #[test]
    fn refusal_maps_to_transfer_failed() {
        let mut t = Transfers::new(ScriptedTx {
            refuse_after: Some(1),
            issued: 0,
        });
        t.transfer(addr(1), addr(2), addr(3), U256::from(1)).unwrap();
        let err = t.transfer(addr(1), addr(2), addr(3), U256::from(1)).unwrap_err();
        assert!(matches!(err, SwapError::TransferFailed { ref reason } if reason.contains("scripted")));
        assert_eq!(t.records().len(), 1, "refused transfer is not recorded");
    }

    #[test]
    fn wrap_refusal_maps_to_wrap_failed() {
        let mut t = Transfers::new(ScriptedTx::default());
        let err = t.wrap(addr(9), addr(2), U256::from(5)).unwrap_err();
        assert!(matches!(err, SwapError::WrapFailed { .. }));
        assert_eq!(t.wrapped(), U256::ZERO);
    }
}
