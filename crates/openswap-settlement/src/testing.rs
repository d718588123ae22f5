//! In-memory asset ledger for tests. **Never use in production.**
//!
//! Supports fungible balances and unique items, failure injection, and a
//! transfer hook that runs mid-transaction on the calling thread (used to
//! simulate a token calling back into the engine).

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex, PoisonError},
};

use alloy_primitives::{Address, U256};
use openswap_types::TransferRecord;

use crate::ledger::{AssetLedger, LedgerError, LedgerTx};

type TransferHook = Arc<dyn Fn(&TransferRecord) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Fungible,
    Item,
}

#[derive(Debug, Default, Clone)]
struct LedgerState {
    kinds: HashMap<Address, TokenKind>,
    balances: HashMap<(Address, Address), U256>,
    owners: HashMap<(Address, U256), Address>,
    wrapped_supply: U256,
    log: Vec<TransferRecord>,
}

impl LedgerState {
    fn balance(&self, token: Address, holder: Address) -> U256 {
        self.balances.get(&(token, holder)).copied().unwrap_or_default()
    }

    fn apply_transfer(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        value: U256,
    ) -> Result<(), LedgerError> {
        match self.kinds.get(&token) {
            None => Err(LedgerError::UnknownToken(token)),
            Some(TokenKind::Fungible) => {
                let available = self.balance(token, from);
                if available < value {
                    return Err(LedgerError::InsufficientBalance {
                        token,
                        holder: from,
                        needed: value,
                        available,
                    });
                }
                self.balances.insert((token, from), available - value);
                let credited = self.balance(token, to).saturating_add(value);
                self.balances.insert((token, to), credited);
                Ok(())
            }
            Some(TokenKind::Item) => {
                if self.owners.get(&(token, value)) != Some(&from) {
                    return Err(LedgerError::NotOwner {
                        token,
                        holder: from,
                        id: value,
                    });
                }
                self.owners.insert((token, value), to);
                Ok(())
            }
        }
    }
}

#[derive(Debug, Default)]
struct Faults {
    refuse_to: HashSet<Address>,
    fail_wraps: bool,
    fail_begin: bool,
}

/// Transactional in-memory ledger.
///
/// Transactions work on a snapshot and replace the shared state on commit,
/// so at most one may be open at a time. The engine's call gate guarantees
/// that for engine-issued transactions.
#[derive(Default)]
pub struct MemoryLedger {
    state: Arc<Mutex<LedgerState>>,
    faults: Arc<Mutex<Faults>>,
    hook: Mutex<Option<TransferHook>>,
}

impl MemoryLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut LedgerState) -> R) -> R {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    fn with_faults<R>(&self, f: impl FnOnce(&mut Faults) -> R) -> R {
        let mut guard = self.faults.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    pub fn register_fungible(&self, token: Address) {
        self.with_state(|s| s.kinds.insert(token, TokenKind::Fungible));
    }

    pub fn register_item(&self, token: Address) {
        self.with_state(|s| s.kinds.insert(token, TokenKind::Item));
    }

    pub fn mint(&self, token: Address, holder: Address, amount: U256) {
        self.with_state(|s| {
            let credited = s.balance(token, holder).saturating_add(amount);
            s.balances.insert((token, holder), credited);
        });
    }

    pub fn mint_item(&self, token: Address, id: U256, owner: Address) {
        self.with_state(|s| s.owners.insert((token, id), owner));
    }

    #[must_use]
    pub fn balance_of(&self, token: Address, holder: Address) -> U256 {
        self.with_state(|s| s.balance(token, holder))
    }

    #[must_use]
    pub fn owner_of(&self, token: Address, id: U256) -> Option<Address> {
        self.with_state(|s| s.owners.get(&(token, id)).copied())
    }

    /// Sum of every holder's balance of a fungible token.
    #[must_use]
    pub fn total_supply(&self, token: Address) -> U256 {
        self.with_state(|s| {
            s.balances
                .iter()
                .filter(|((t, _), _)| *t == token)
                .fold(U256::ZERO, |acc, (_, v)| acc.saturating_add(*v))
        })
    }

    /// Native value wrapped by committed transactions.
    #[must_use]
    pub fn wrapped_supply(&self) -> U256 {
        self.with_state(|s| s.wrapped_supply)
    }

    /// Every committed transfer, in order.
    #[must_use]
    pub fn transfer_log(&self) -> Vec<TransferRecord> {
        self.with_state(|s| s.log.clone())
    }

    /// Transfers whose recipient is `to` will be refused.
    pub fn refuse_transfers_to(&self, to: Address) {
        self.with_faults(|f| f.refuse_to.insert(to));
    }

    pub fn fail_wraps(&self, fail: bool) {
        self.with_faults(|f| f.fail_wraps = fail);
    }

    pub fn fail_begin(&self, fail: bool) {
        self.with_faults(|f| f.fail_begin = fail);
    }

    /// Run `hook` after every successful transfer, inside the transaction.
    pub fn set_transfer_hook(&self, hook: impl Fn(&TransferRecord) + Send + Sync + 'static) {
        *self.hook.lock().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(hook));
    }

    pub fn clear_transfer_hook(&self) {
        *self.hook.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl AssetLedger for MemoryLedger {
    type Tx = MemoryLedgerTx;

    fn begin(&self) -> Result<MemoryLedgerTx, LedgerError> {
        if self.with_faults(|f| f.fail_begin) {
            return Err(LedgerError::Refused("ledger unavailable".into()));
        }
        Ok(MemoryLedgerTx {
            working: self.with_state(|s| s.clone()),
            shared: Arc::clone(&self.state),
            faults: Arc::clone(&self.faults),
            hook: self.hook.lock().unwrap_or_else(PoisonError::into_inner).clone(),
        })
    }
}

pub struct MemoryLedgerTx {
    working: LedgerState,
    shared: Arc<Mutex<LedgerState>>,
    faults: Arc<Mutex<Faults>>,
    hook: Option<TransferHook>,
}

impl LedgerTx for MemoryLedgerTx {
    fn transfer(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        value: U256,
    ) -> Result<(), LedgerError> {
        let refused = self
            .faults
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .refuse_to
            .contains(&to);
        if refused {
            return Err(LedgerError::Refused(format!("recipient {to} rejects transfers")));
        }
        self.working.apply_transfer(token, from, to, value)?;
        let record = TransferRecord::new(token, from, to, value);
        self.working.log.push(record);
        if let Some(hook) = &self.hook {
            hook(&record);
        }
        Ok(())
    }

    fn wrap(&mut self, wrapped: Address, holder: Address, amount: U256) -> Result<(), LedgerError> {
        if self.faults.lock().unwrap_or_else(PoisonError::into_inner).fail_wraps {
            return Err(LedgerError::Refused("wrapped-native deposit reverted".into()));
        }
        if self.working.kinds.get(&wrapped) != Some(&TokenKind::Fungible) {
            return Err(LedgerError::UnknownToken(wrapped));
        }
        let credited = self.working.balance(wrapped, holder).saturating_add(amount);
        self.working.balances.insert((wrapped, holder), credited);
        self.working.wrapped_supply = self.working.wrapped_supply.saturating_add(amount);
        Ok(())
    }

    fn commit(self) {
        *self.shared.lock().unwrap_or_else(PoisonError::into_inner) = self.working;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(b: u8) -> Address {
        Address::repeat_byte(b)
    }

    #[test]
    fn uncommitted_tx_leaves_no_trace() {
        let ledger = MemoryLedger::new();
        ledger.register_fungible(addr(1));
        ledger.mint(addr(1), addr(2), U256::from(50));
        {
            let mut tx = ledger.begin().unwrap();
            tx.transfer(addr(1), addr(2), addr(3), U256::from(20)).unwrap();
        }
        assert_eq!(ledger.balance_of(addr(1), addr(2)), U256::from(50));
        assert!(ledger.transfer_log().is_empty());
    }

    #[test]
    fn commit_applies_and_logs() {
        let ledger = MemoryLedger::new();
        ledger.register_item(addr(9));
        ledger.mint_item(addr(9), U256::from(42), addr(2));
        let mut tx = ledger.begin().unwrap();
        tx.transfer(addr(9), addr(2), addr(3), U256::from(42)).unwrap();
        tx.commit();
        assert_eq!(ledger.owner_of(addr(9), U256::from(42)), Some(addr(3)));
        assert_eq!(ledger.transfer_log().len(), 1);
    }

    #[test]
    fn item_transfer_requires_ownership() {
        let ledger = MemoryLedger::new();
        ledger.register_item(addr(9));
        ledger.mint_item(addr(9), U256::from(1), addr(2));
        let mut tx = ledger.begin().unwrap();
        let err = tx.transfer(addr(9), addr(3), addr(4), U256::from(1)).unwrap_err();
        assert!(matches!(err, LedgerError::NotOwner { .. }));
    }

    #[test]
    fn fungible_transfer_conserves_supply() {
        let ledger = MemoryLedger::new();
        ledger.register_fungible(addr(1));
        ledger.mint(addr(1), addr(2), U256::from(100));
        let mut tx = ledger.begin().unwrap();
        tx.transfer(addr(1), addr(2), addr(3), U256::from(60)).unwrap();
        let err = tx.transfer(addr(1), addr(2), addr(3), U256::from(60)).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientBalance { .. }));
        tx.commit();
        assert_eq!(ledger.total_supply(addr(1)), U256::from(100));
    }

    #[test]
    fn unknown_token_refused() {
        let ledger = MemoryLedger::new();
        let mut tx = ledger.begin().unwrap();
        assert!(matches!(
            tx.transfer(addr(1), addr(2), addr(3), U256::from(1)),
            Err(LedgerError::UnknownToken(_))
        ));
    }

    #[test]
    fn hook_sees_each_transfer() {
        let ledger = MemoryLedger::new();
        ledger.register_fungible(addr(1));
        ledger.mint(addr(1), addr(2), U256::from(10));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        ledger.set_transfer_hook(move |r| sink.lock().unwrap().push(*r));

        let mut tx = ledger.begin().unwrap();
        tx.transfer(addr(1), addr(2), addr(3), U256::from(4)).unwrap();
        tx.transfer(addr(1), addr(2), addr(4), U256::from(6)).unwrap();
        assert_eq!(seen.lock().unwrap().len(), 2);
    }
}
