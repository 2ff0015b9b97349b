//! Fee Manager Module
//!
//! Relay fees are quoted by the provider's endpoint and scaled by a
//! per-provider multiplier:
//!
//! | Setting            | Default        | Range                       |
//! |--------------------|----------------|-----------------------------|
//! | Fee multiplier     | 10000 bps (1x) | 10000 - 100000 bps (1x-10x) |
//!
//! The scaled fee is forwarded to the endpoint, so it never drops below the
//! endpoint's own quote. The caller pays the fee in the configured fee denom.
//! Anything attached on top of the fee is refunded in the same transaction.

use common::relay::{FeeQuoteResponse, RelayQueryMsg};
use cosmwasm_std::{Coin, QuerierWrapper, StdResult, Uint128};

use crate::error::ContractError;
use crate::provider::ProviderConfig;

// ============================================================================
// Constants
// ============================================================================

/// Basis points denominator (10000 = 100%)
pub const BPS_DENOMINATOR: u128 = 10000;

/// Unscaled relay fee
pub const DEFAULT_FEE_MULTIPLIER_BPS: u64 = 10_000;

/// Minimum fee multiplier (1x)
pub const MIN_FEE_MULTIPLIER_BPS: u64 = 10_000;

/// Maximum fee multiplier (10x)
pub const MAX_FEE_MULTIPLIER_BPS: u64 = 100_000;

// ============================================================================
// Fee Calculation Functions
// ============================================================================

/// Scale a base fee by a multiplier in bps
pub fn apply_multiplier(base_fee: Uint128, multiplier_bps: u64) -> Uint128 {
    base_fee.multiply_ratio(multiplier_bps as u128, BPS_DENOMINATOR)
}

/// Quote the fee for sending `payload_size` bytes to `dst_chain_id` through a provider
pub fn quote_relay_fee(
    querier: &QuerierWrapper,
    provider: &ProviderConfig,
    dst_chain_id: u32,
    payload_size: usize,
) -> StdResult<Coin> {
    let quote: FeeQuoteResponse = querier.query_wasm_smart(
        &provider.endpoint,
        &RelayQueryMsg::EstimateFee {
            dst_chain_id,
            payload_size: payload_size as u64,
        },
    )?;

    Ok(Coin {
        denom: quote.native_fee.denom,
        amount: apply_multiplier(quote.native_fee.amount, provider.fee_multiplier_bps),
    })
}

/// Check the attached funds cover `fee`
///
/// Returns the coins to refund: the excess in the fee denom plus every other
/// denom that was attached.
pub fn settle_fee(funds: &[Coin], fee: &Coin) -> Result<Vec<Coin>, ContractError> {
    let paid: Uint128 = funds
        .iter()
        .filter(|c| c.denom == fee.denom)
        .map(|c| c.amount)
        .sum();

    if paid < fee.amount {
        return Err(ContractError::InsufficientFee {
            expected: fee.amount,
            got: paid,
        });
    }

    let mut refund: Vec<Coin> = funds
        .iter()
        .filter(|c| c.denom != fee.denom && !c.amount.is_zero())
        .cloned()
        .collect();
    let excess = paid - fee.amount;
    if !excess.is_zero() {
        refund.push(Coin {
            denom: fee.denom.clone(),
            amount: excess,
        });
    }
    Ok(refund)
}

/// Validate a fee multiplier is within bounds
pub fn validate_fee_multiplier(multiplier_bps: u64) -> Result<(), ContractError> {
    if !(MIN_FEE_MULTIPLIER_BPS..=MAX_FEE_MULTIPLIER_BPS).contains(&multiplier_bps) {
        return Err(ContractError::InvalidFeeMultiplier { multiplier_bps });
    }
    Ok(())
}
