//! Swap engine: atomic settlement of signed orders.
//!
//! A swap runs as one unit of work while holding the [`CallGate`]:
//! 1. Reject expired orders
//! 2. Hash the order and verify the maker's signature
//! 3. Stage the OPEN → EXECUTED transition
//! 4. Normalize the currency leg (wrap attached native value)
//! 5. Compute fees and net, then issue every transfer
//! 6. Persist the status transition, then commit the ledger transaction
//!
//! Any failure before step 6 drops the staged status and the ledger
//! transaction together, so an aborted call leaves no trace.

use std::sync::{Mutex, MutexGuard, PoisonError};

use alloy_primitives::{Address, B256, U256};
use chrono::Utc;
use openswap_auth::{ContractWallet, NoContractWallets, OrderEncoder, SignatureVerifier};
use openswap_types::{
    CallContext, CancelReceipt, EngineConfig, Leg, Order, OrderHash, OrderType, Result, Status,
    StatusKey, SwapError, SwapReceipt,
};
use uuid::Uuid;

use crate::{
    fees,
    gate::CallGate,
    journal::FileStatusStore,
    ledger::{AssetLedger, LedgerTx, Transfers},
    normalizer::CurrencyNormalizer,
    status_store::{MemoryStatusStore, StagedStatus, StatusStore},
};

/// Amounts settled on the currency leg.
#[derive(Debug, Clone, Copy, Default)]
struct Proceeds {
    fees: U256,
    net: U256,
}

/// The settlement engine for one deployment.
pub struct SwapEngine<L, W = NoContractWallets, S = MemoryStatusStore> {
    config: EngineConfig,
    encoder: OrderEncoder,
    verifier: SignatureVerifier<W>,
    normalizer: CurrencyNormalizer,
    ledger: L,
    gate: CallGate,
    status: Mutex<S>,
}

impl<L: AssetLedger> SwapEngine<L> {
    /// Engine with in-memory status and no contract-wallet support.
    ///
    /// # Errors
    /// [`SwapError::Configuration`] if `config` is invalid.
    pub fn new(config: EngineConfig, ledger: L) -> Result<Self> {
        Self::with_parts(config, ledger, NoContractWallets, MemoryStatusStore::new())
    }
}

impl<L: AssetLedger, W: ContractWallet> SwapEngine<L, W, Box<dyn StatusStore>> {
    /// Engine whose status store follows `config.status_journal`: a
    /// [`FileStatusStore`] when set, memory otherwise.
    ///
    /// # Errors
    /// Invalid configuration, or a journal that cannot be opened or fails
    /// replay.
    pub fn from_config(config: EngineConfig, ledger: L, wallets: W) -> Result<Self> {
        config.validate()?;
        let store: Box<dyn StatusStore> = match &config.status_journal {
            Some(path) => Box::new(FileStatusStore::open(path)?),
            None => Box::new(MemoryStatusStore::new()),
        };
        Self::with_parts(config, ledger, wallets, store)
    }
}

impl<L: AssetLedger, W: ContractWallet, S: StatusStore> SwapEngine<L, W, S> {
    /// Engine assembled from explicit parts.
    ///
    /// # Errors
    /// [`SwapError::Configuration`] if `config` is invalid.
    pub fn with_parts(config: EngineConfig, ledger: L, wallets: W, store: S) -> Result<Self> {
        config.validate()?;
        let encoder = OrderEncoder::new(&config.domain);
        tracing::info!(
            name = %config.domain.name,
            version = %config.domain.version,
            chain_id = config.domain.chain_id,
            engine = %config.engine_address(),
            wrapped_native = %config.wrapped_native,
            known_orders = store.len(),
            "Swap engine initialized"
        );
        Ok(Self {
            normalizer: CurrencyNormalizer::from_config(&config),
            verifier: SignatureVerifier::new(wallets),
            encoder,
            config,
            ledger,
            gate: CallGate::new(),
            status: Mutex::new(store),
        })
    }

    /// Validated configuration of this deployment.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The asset ledger settlements run against.
    #[must_use]
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    #[must_use]
    pub fn domain_separator(&self) -> B256 {
        self.encoder.domain_separator()
    }

    /// The digest a maker signs for `order` on this deployment.
    #[must_use]
    pub fn hash_order(&self, order: &Order) -> OrderHash {
        self.encoder.hash(order)
    }

    /// Whether `signature` authorizes `order` for its seller.
    #[must_use]
    pub fn verify_order(&self, order: &Order, signature: &[u8]) -> bool {
        let hash = self.encoder.hash(order);
        self.verifier.is_valid(order.seller, hash.as_b256(), signature)
    }

    /// Lifecycle state of `hash` signed by `maker`.
    ///
    /// Reads committed state only, so a call in progress is not visible
    /// until it finishes.
    #[must_use]
    pub fn status_of(&self, maker: Address, hash: OrderHash) -> Status {
        self.store()
            .get(&StatusKey::new(maker, hash))
            .unwrap_or_default()
    }

    // Store writes happen in a single `put_all`, so a panic while the lock
    // was held cannot have left a batch half-applied.
    fn store(&self) -> MutexGuard<'_, S> {
        self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fill `order` as `ctx.caller`.
    ///
    /// # Errors
    /// Any [`SwapError`]; the call then has no effect.
    pub fn swap(&self, ctx: &CallContext, order: &Order, signature: &[u8]) -> Result<SwapReceipt> {
        let _scope = self.gate.enter()?;
        let result = self.execute_swap(ctx, order, signature);
        if let Err(err) = &result {
            tracing::warn!(
                seller = %order.seller,
                taker = %ctx.caller,
                order_type = %order.order_type,
                error = %err,
                "Swap aborted"
            );
        }
        result
    }

    /// Cancel the caller's own order `hash`.
    ///
    /// # Errors
    /// [`SwapError::OrderNotOpen`] if the caller's entry for `hash` is not
    /// OPEN, [`SwapError::ReentrantCall`] while another call is running.
    pub fn cancel(&self, ctx: &CallContext, hash: OrderHash) -> Result<CancelReceipt> {
        let _scope = self.gate.enter()?;
        let key = StatusKey::new(ctx.caller, hash);
        let mut staged = StagedStatus::new();
        let mut store = self.store();
        staged.transition(&*store, key, Status::Open, Status::Canceled)?;
        staged.commit(&mut *store)?;
        drop(store);
        tracing::info!(maker = %ctx.caller, order = %hash, "Order canceled");
        Ok(CancelReceipt {
            order_hash: hash,
            maker: ctx.caller,
            canceled_at: Utc::now(),
        })
    }

    fn execute_swap(
        &self,
        ctx: &CallContext,
        order: &Order,
        signature: &[u8],
    ) -> Result<SwapReceipt> {
        if order.is_expired_at(ctx.timestamp) {
            return Err(SwapError::OrderExpired {
                expiration: order.expiration,
                now: ctx.timestamp,
            });
        }

        let hash = self.encoder.hash(order);
        if !self.verifier.is_valid(order.seller, hash.as_b256(), signature) {
            return Err(SwapError::InvalidSignature(hash));
        }

        let mut staged = StagedStatus::new();
        staged.transition(
            &*self.store(),
            StatusKey::new(order.seller, hash),
            Status::Open,
            Status::Executed,
        )?;

        let tx = self.ledger.begin().map_err(|err| SwapError::TransferFailed {
            reason: format!("ledger unavailable: {err}"),
        })?;
        let mut transfers = Transfers::new(tx);
        let proceeds = match order.currency_leg() {
            None => self.settle_asset_for_asset(&mut transfers, ctx, order)?,
            Some(currency) if order.order_type == OrderType::BuyOffer => {
                self.settle_buy_offer(&mut transfers, ctx, order, currency)?
            }
            Some(currency) => self.settle_sell_offer(&mut transfers, ctx, order, currency)?,
        };

        staged.commit(&mut *self.store())?;
        let wrapped = transfers.wrapped();
        let records = transfers.commit();

        tracing::info!(
            order = %hash,
            seller = %order.seller,
            taker = %ctx.caller,
            order_type = %order.order_type,
            transfers = records.len(),
            fees = %proceeds.fees,
            net = %proceeds.net,
            wrapped = %wrapped,
            "Swap executed"
        );
        Ok(SwapReceipt {
            id: Uuid::now_v7(),
            order_hash: hash,
            maker: order.seller,
            taker: ctx.caller,
            order_type: order.order_type,
            transfers: records,
            fees_paid: proceeds.fees,
            net_proceeds: proceeds.net,
            wrapped,
            executed_at: Utc::now(),
        })
    }

    /// Maker's sell leg for the taker's ask leg, no currency involved.
    fn settle_asset_for_asset<T: LedgerTx>(
        &self,
        transfers: &mut Transfers<T>,
        ctx: &CallContext,
        order: &Order,
    ) -> Result<Proceeds> {
        reject_attached_value(ctx)?;
        if !order.fees.is_empty() {
            return Err(SwapError::UnsupportedFees {
                order_type: order.order_type,
            });
        }
        transfers.transfer(order.ask.token, ctx.caller, order.seller, order.ask.value)?;
        transfers.transfer(order.sell.token, order.seller, ctx.caller, order.sell.value)?;
        Ok(Proceeds::default())
    }

    /// Maker pays `currency` for the taker's asset.
    fn settle_buy_offer<T: LedgerTx>(
        &self,
        transfers: &mut Transfers<T>,
        ctx: &CallContext,
        order: &Order,
        currency: &Leg,
    ) -> Result<Proceeds> {
        reject_attached_value(ctx)?;
        let (fee_total, net) = fees::net_of_fees(currency.value, &order.fees)?;

        transfers.transfer(order.ask.token, ctx.caller, order.seller, order.ask.value)?;
        fees::distribute(transfers, currency.token, order.seller, &order.fees)?;
        transfers.transfer(currency.token, order.seller, ctx.caller, net)?;
        Ok(Proceeds {
            fees: fee_total,
            net,
        })
    }

    /// Taker pays `currency` for the maker's asset.
    fn settle_sell_offer<T: LedgerTx>(
        &self,
        transfers: &mut Transfers<T>,
        ctx: &CallContext,
        order: &Order,
        currency: &Leg,
    ) -> Result<Proceeds> {
        let (fee_total, net) = fees::net_of_fees(currency.value, &order.fees)?;
        let funding = self
            .normalizer
            .normalize(transfers, currency, ctx.caller, ctx.value)?;

        transfers.transfer(order.sell.token, order.seller, ctx.caller, order.sell.value)?;
        fees::distribute(transfers, currency.token, funding.payer, &order.fees)?;
        transfers.transfer(currency.token, funding.payer, order.seller, net)?;
        Ok(Proceeds {
            fees: fee_total,
            net,
        })
    }
}

fn reject_attached_value(ctx: &CallContext) -> Result<()> {
    if ctx.has_value() {
        return Err(SwapError::InvalidPayment {
            attached: ctx.value,
            required: U256::ZERO,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryLedger;
    use openswap_auth::testing::TestSigner;
    use openswap_types::{DomainConfig, FeeSchedule, FeeSplit, Leg};
    use std::sync::Arc;

    fn addr(b: u8) -> Address {
        Address::repeat_byte(b)
    }

    const ENGINE: u8 = 0xee;
    const WETH: u8 = 0xaa;
    const USDC: u8 = 0x0c;
    const NFT: u8 = 0x4e;

    fn config() -> EngineConfig {
        EngineConfig::new(DomainConfig::new(1, addr(ENGINE)), addr(WETH))
    }

    fn setup() -> (SwapEngine<Arc<MemoryLedger>>, Arc<MemoryLedger>) {
        let ledger = Arc::new(MemoryLedger::new());
        ledger.register_fungible(addr(WETH));
        ledger.register_fungible(addr(USDC));
        ledger.register_item(addr(NFT));
        let engine = SwapEngine::new(config(), Arc::clone(&ledger)).unwrap();
        (engine, ledger)
    }

    #[test]
    fn rejects_invalid_config() {
        let bad = EngineConfig::new(DomainConfig::new(0, addr(ENGINE)), addr(WETH));
        assert!(matches!(
            SwapEngine::new(bad, MemoryLedger::new()),
            Err(SwapError::Configuration(_))
        ));
    }

    #[test]
    fn hash_and_verify_helpers_agree() {
        let (engine, _) = setup();
        let maker = TestSigner::new(1);
        let order = Order::dummy_sell_offer(maker.address(), addr(NFT), 1, addr(USDC), 100);
        let hash = engine.hash_order(&order);
        assert!(engine.verify_order(&order, &maker.sign_raw(hash.as_b256())));
        assert!(!engine.verify_order(&order, &TestSigner::new(2).sign_raw(hash.as_b256())));
    }

    #[test]
    fn sell_offer_moves_item_and_currency() {
        let (engine, ledger) = setup();
        let maker = TestSigner::new(1);
        let taker = addr(0x22);
        ledger.mint_item(addr(NFT), U256::from(7), maker.address());
        ledger.mint(addr(USDC), taker, U256::from(100));
        let mut order = Order::dummy_sell_offer(maker.address(), addr(NFT), 7, addr(USDC), 100);
        order.fees = FeeSchedule::new(vec![FeeSplit::new(addr(0x71), U256::from(10))]);
        let sig = maker.sign_raw(engine.hash_order(&order).as_b256());

        let receipt = engine.swap(&CallContext::new(taker), &order, &sig).unwrap();
        assert_eq!(receipt.fees_paid, U256::from(10));
        assert_eq!(receipt.net_proceeds, U256::from(90));
        assert_eq!(receipt.transfers.len(), 3);
        assert_eq!(ledger.owner_of(addr(NFT), U256::from(7)), Some(taker));
        assert_eq!(ledger.balance_of(addr(USDC), maker.address()), U256::from(90));
        assert_eq!(
            engine.status_of(maker.address(), receipt.order_hash),
            Status::Executed
        );
    }

    #[test]
    fn buy_offer_pays_taker_net() {
        let (engine, ledger) = setup();
        let maker = TestSigner::new(1);
        let taker = addr(0x22);
        ledger.mint(addr(USDC), maker.address(), U256::from(100));
        ledger.mint_item(addr(NFT), U256::from(3), taker);
        let mut order = Order::dummy_buy_offer(maker.address(), addr(NFT), 3, addr(USDC), 100);
        order.fees = FeeSchedule::new(vec![FeeSplit::new(addr(0x71), U256::from(5))]);
        let sig = maker.sign_raw(engine.hash_order(&order).as_b256());

        let receipt = engine.swap(&CallContext::new(taker), &order, &sig).unwrap();
        assert_eq!(receipt.net_proceeds, U256::from(95));
        assert_eq!(ledger.owner_of(addr(NFT), U256::from(3)), Some(maker.address()));
        assert_eq!(ledger.balance_of(addr(USDC), taker), U256::from(95));
        assert_eq!(ledger.balance_of(addr(USDC), addr(0x71)), U256::from(5));
        assert!(ledger.balance_of(addr(USDC), maker.address()).is_zero());
    }

    #[test]
    fn buy_offer_rejects_attached_value() {
        let (engine, ledger) = setup();
        let maker = TestSigner::new(1);
        ledger.mint(addr(USDC), maker.address(), U256::from(100));
        ledger.mint_item(addr(NFT), U256::from(3), addr(0x22));
        let order = Order::dummy_buy_offer(maker.address(), addr(NFT), 3, addr(USDC), 100);
        let sig = maker.sign_raw(engine.hash_order(&order).as_b256());
        let ctx = CallContext::new(addr(0x22)).with_value(U256::from(1));

        assert!(matches!(
            engine.swap(&ctx, &order, &sig),
            Err(SwapError::InvalidPayment { .. })
        ));
        assert_eq!(
            engine.status_of(maker.address(), engine.hash_order(&order)),
            Status::Open
        );
    }

    #[test]
    fn asset_for_asset_with_fees_rejected() {
        let (engine, _) = setup();
        let maker = TestSigner::new(1);
        let mut order = Order::dummy_asset_for_asset(
            maker.address(),
            Leg::new(addr(NFT), U256::from(1)),
            Leg::new(addr(USDC), U256::from(5)),
        );
        order.fees = FeeSchedule::new(vec![FeeSplit::new(addr(0x71), U256::from(1))]);
        let sig = maker.sign_raw(engine.hash_order(&order).as_b256());
        assert!(matches!(
            engine.swap(&CallContext::new(addr(0x22)), &order, &sig),
            Err(SwapError::UnsupportedFees { order_type: OrderType::AssetForAsset })
        ));
    }

    #[test]
    fn ledger_unavailable_aborts_cleanly() {
        let (engine, ledger) = setup();
        let maker = TestSigner::new(1);
        let order = Order::dummy_sell_offer(maker.address(), addr(NFT), 1, addr(USDC), 10);
        let sig = maker.sign_raw(engine.hash_order(&order).as_b256());
        ledger.fail_begin(true);
        assert!(matches!(
            engine.swap(&CallContext::new(addr(0x22)), &order, &sig),
            Err(SwapError::TransferFailed { .. })
        ));
        assert_eq!(
            engine.status_of(maker.address(), engine.hash_order(&order)),
            Status::Open
        );
    }

    #[test]
    fn cancel_is_scoped_to_caller() {
        let (engine, _) = setup();
        let hash = OrderHash(B256::repeat_byte(5));
        let receipt = engine.cancel(&CallContext::new(addr(1)), hash).unwrap();
        assert_eq!(receipt.maker, addr(1));
        assert_eq!(engine.status_of(addr(1), hash), Status::Canceled);
        assert_eq!(engine.status_of(addr(2), hash), Status::Open);

        let err = engine.cancel(&CallContext::new(addr(1)), hash).unwrap_err();
        assert!(matches!(err, SwapError::OrderNotOpen { actual: Status::Canceled, .. }));
    }

    #[test]
    fn from_config_without_journal_uses_memory() {
        let ledger = MemoryLedger::new();
        let engine = SwapEngine::from_config(config(), ledger, NoContractWallets).unwrap();
        let hash = OrderHash(B256::repeat_byte(5));
        engine.cancel(&CallContext::new(addr(1)), hash).unwrap();
        assert_eq!(engine.status_of(addr(1), hash), Status::Canceled);
    }
}
