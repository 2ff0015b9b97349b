//! Delay & Volume-Cap Controller
//!
//! Two independent gates on transfers:
//!
//! - **Volume cap**: a rolling window per symbol. The first transfer after the
//!   window has elapsed starts a new window with its own quantity. A transfer
//!   that would push the window over the cap is rejected outright. A cap of 0
//!   or an epoch length of 0 disables the gate.
//! - **Delay threshold**: a transfer strictly above the symbol's threshold is
//!   parked as a delayed transfer instead of being applied. A threshold of 0
//!   disables the gate.
//!
//! Both checks are pure; callers persist their results only after every other
//! precondition has passed.

use common::Xfer;
use cosmwasm_std::{HexBinary, StdError, Storage, Timestamp, Uint128};

use crate::error::ContractError;
use crate::hash::compute_delayed_transfer_id;
use crate::state::{
    DelayedTransfer, EpochVolume, RiskConfig, TransferDirection, DELAYED_TRANSFERS,
    DELAY_THRESHOLDS, EPOCH_VOLUMES, EPOCH_VOLUME_CAPS,
};

/// Result of the threshold check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThresholdCheck {
    pub delayed: bool,
    /// Id the transfer has (or would have) as a delayed transfer
    pub id: [u8; 32],
}

// ============================================================================
// Volume Cap
// ============================================================================

/// Window after admitting `amount` of `symbol`, or `None` if the symbol is uncapped
pub fn check_volume_cap(
    storage: &dyn Storage,
    risk: &RiskConfig,
    symbol: &str,
    amount: Uint128,
    now: Timestamp,
) -> Result<Option<EpochVolume>, ContractError> {
    let cap = EPOCH_VOLUME_CAPS
        .may_load(storage, symbol)?
        .unwrap_or_default();
    if cap.is_zero() || risk.epoch_length == 0 {
        return Ok(None);
    }

    let next = match EPOCH_VOLUMES.may_load(storage, symbol)? {
        Some(window)
            if now.seconds().saturating_sub(window.epoch_start.seconds()) < risk.epoch_length =>
        {
            EpochVolume {
                accumulated: window
                    .accumulated
                    .checked_add(amount)
                    .map_err(StdError::from)?,
                epoch_start: window.epoch_start,
            }
        }
        _ => EpochVolume {
            accumulated: amount,
            epoch_start: now,
        },
    };

    if next.accumulated > cap {
        return Err(ContractError::VolumeCapExceeded {
            symbol: symbol.to_string(),
            cap,
            requested: next.accumulated,
        });
    }
    Ok(Some(next))
}

/// Persist a window returned by [`check_volume_cap`]
pub fn record_volume(
    storage: &mut dyn Storage,
    symbol: &str,
    window: Option<&EpochVolume>,
) -> Result<(), ContractError> {
    if let Some(window) = window {
        EPOCH_VOLUMES.save(storage, symbol, window)?;
    }
    Ok(())
}

// ============================================================================
// Delay Threshold
// ============================================================================

/// Decide whether `xfer` must be delayed and compute its id
///
/// Fails with `PB-DTAE-01` if the transfer must be delayed and an identical
/// delayed transfer is already queued.
pub fn check_thresholds(
    storage: &dyn Storage,
    xfer: &Xfer,
    chain_id: u32,
) -> Result<ThresholdCheck, ContractError> {
    let threshold = DELAY_THRESHOLDS
        .may_load(storage, &xfer.symbol)?
        .unwrap_or_default();
    let delayed = !threshold.is_zero() && xfer.quantity > threshold;
    let id = compute_delayed_transfer_id(xfer, chain_id)?;

    if delayed && DELAYED_TRANSFERS.has(storage, &id) {
        return Err(ContractError::DelayedTransferExists);
    }
    Ok(ThresholdCheck { delayed, id })
}

/// Store a delayed transfer; the id must have passed [`check_thresholds`]
pub fn enqueue(
    storage: &mut dyn Storage,
    risk: &RiskConfig,
    id: [u8; 32],
    direction: TransferDirection,
    xfer: Xfer,
    now: Timestamp,
) -> Result<DelayedTransfer, ContractError> {
    let record = DelayedTransfer {
        id: HexBinary::from(id.to_vec()),
        direction,
        xfer,
        ready_at: now.plus_seconds(risk.delay_period),
        created_at: now,
    };
    DELAYED_TRANSFERS.save(storage, &id, &record)?;
    Ok(record)
}

/// Take a delayed transfer out of the queue once it is unlocked
pub fn take_ready(
    storage: &mut dyn Storage,
    id: &[u8],
    now: Timestamp,
) -> Result<DelayedTransfer, ContractError> {
    let record = DELAYED_TRANSFERS
        .may_load(storage, id)?
        .ok_or(ContractError::DelayedTransferNotFound)?;

    if now < record.ready_at {
        return Err(ContractError::DelayedTransferLocked {
            remaining_seconds: record.ready_at.seconds() - now.seconds(),
        });
    }

    DELAYED_TRANSFERS.remove(storage, id);
    Ok(record)
}
