//! Currency normalization.
//!
//! A taker may pay the currency leg of an order with attached native value
//! instead of a pre-approved token balance. The normalizer wraps that value
//! into the configured wrapped-native token, held by the engine, and names
//! the engine as payer for the rest of the settlement.
//!
//! Only a leg denominated in the wrapped-native token qualifies, and only
//! for the exact leg value.

use alloy_primitives::{Address, U256};
use openswap_types::{EngineConfig, Leg, Result, SwapError};

use crate::ledger::{LedgerTx, Transfers};

/// Who pays the currency leg, and how much native value was wrapped for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Funding {
    pub payer: Address,
    pub wrapped: U256,
}

#[derive(Debug, Clone, Copy)]
pub struct CurrencyNormalizer {
    wrapped_native: Address,
    engine: Address,
}

impl CurrencyNormalizer {
    #[must_use]
    /// Normalizer wrapping into `wrapped_native`, with `engine` as the
    /// account native value arrives at.
    pub fn new(wrapped_native: Address, engine: Address) -> Self {
        Self {
            wrapped_native,
            engine,
        }
    }

    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.wrapped_native, config.engine_address())
    }

    /// Whether `attached` value will be used to pay `leg`.
    ///
    /// # Errors
    /// [`SwapError::InvalidPayment`] if value is attached but the leg is not
    /// wrapped-native or the amounts differ.
    pub fn check(&self, leg: &Leg, attached: U256) -> Result<bool> {
        if attached.is_zero() {
            return Ok(false);
        }
        if leg.token != self.wrapped_native {
            return Err(SwapError::InvalidPayment {
                attached,
                required: U256::ZERO,
            });
        }
        if attached != leg.value {
            return Err(SwapError::InvalidPayment {
                attached,
                required: leg.value,
            });
        }
        Ok(true)
    }

    /// Settle who funds `leg`: the `counterparty` from their balance, or the
    /// engine after wrapping `attached`.
    ///
    /// # Errors
    /// As [`check`](Self::check), plus [`SwapError::WrapFailed`] if the
    /// ledger refuses the deposit.
    pub fn normalize<T: LedgerTx>(
        &self,
        transfers: &mut Transfers<T>,
        leg: &Leg,
        counterparty: Address,
        attached: U256,
    ) -> Result<Funding> {
        if !self.check(leg, attached)? {
            return Ok(Funding {
                payer: counterparty,
                wrapped: U256::ZERO,
            });
        }
        transfers.wrap(self.wrapped_native, self.engine, attached)?;
        tracing::debug!(
            token = %self.wrapped_native,
            amount = %attached,
            on_behalf_of = %counterparty,
            "Attached value wrapped"
        );
        Ok(Funding {
            payer: self.engine,
            wrapped: attached,
        })
    }
}
