//! Fee payouts from the currency leg.
//!
//! Fees are denominated in the order's currency and come out of the gross
//! currency amount. The net is computed, with an underflow check, before a
//! single transfer is issued.

use alloy_primitives::{Address, U256};
use openswap_types::{FeeSchedule, Result, SwapError};

use crate::ledger::{LedgerTx, Transfers};

/// Split `amount` into `(total_fees, net)`.
///
/// # Errors
/// [`SwapError::ArithmeticOverflow`] if the fees do not sum in 256 bits,
/// [`SwapError::ArithmeticUnderflow`] if they exceed `amount`.
pub fn net_of_fees(amount: U256, fees: &FeeSchedule) -> Result<(U256, U256)> {
    let total = fees.total()?;
    let net = amount
        .checked_sub(total)
        .ok_or(SwapError::ArithmeticUnderflow { fees: total, amount })?;
    Ok((total, net))
}

/// Pay every fee split from `payer` in `currency`, in schedule order.
///
/// Returns the total paid.
///
/// # Errors
/// Overflow of the total, or the first refused transfer.
pub fn distribute<T: LedgerTx>(
    transfers: &mut Transfers<T>,
    currency: Address,
    payer: Address,
    fees: &FeeSchedule,
) -> Result<U256> {
    let total = fees.total()?;
    for split in fees {
        transfers.transfer(currency, payer, split.recipient, split.amount)?;
    }
    if !fees.is_empty() {
        tracing::debug!(
            currency = %currency,
            payer = %payer,
            recipients = fees.len(),
            total = %total,
            "Fees distributed"
        );
    }
    Ok(total)
}

/// [`distribute`] over parallel recipient and amount lists.
///
/// # Errors
/// [`SwapError::InvalidArrays`] if the lists differ in length, before any
/// transfer. Otherwise as [`distribute`].
pub fn distribute_parallel<T: LedgerTx>(
    transfers: &mut Transfers<T>,
    currency: Address,
    payer: Address,
    recipients: &[Address],
    amounts: &[U256],
) -> Result<U256> {
    let schedule = FeeSchedule::from_parallel(recipients, amounts)?;
    distribute(transfers, currency, payer, &schedule)
}
