//! Inventory Tracker
//!
//! The hub's belief of how much of a symbol each spoke chain backs. Entries
//! are keyed by (symbol, symbol id) so that the same symbol held on several
//! origin chains is tracked per chain.
//!
//! Only the router calls into this module. Inbound deposits increase an entry,
//! outbound withdrawals decrease it and fail closed when the entry would go
//! negative.

use cosmwasm_std::{Order, StdError, StdResult, Storage, Uint128};
use cw_storage_plus::Map;

use crate::error::ContractError;

// ============================================================================
// Storage
// ============================================================================

/// Key: (symbol, 32-byte symbol id), Value: backed quantity
pub const INVENTORY: Map<(&str, &[u8]), Uint128> = Map::new("inventory");

// ============================================================================
// Operations
// ============================================================================

pub fn get(storage: &dyn Storage, symbol: &str, symbol_id: &[u8]) -> StdResult<Uint128> {
    Ok(INVENTORY
        .may_load(storage, (symbol, symbol_id))?
        .unwrap_or_default())
}

pub fn increase(
    storage: &mut dyn Storage,
    symbol: &str,
    symbol_id: &[u8],
    amount: Uint128,
) -> Result<Uint128, ContractError> {
    let updated = get(storage, symbol, symbol_id)?
        .checked_add(amount)
        .map_err(StdError::from)?;
    INVENTORY.save(storage, (symbol, symbol_id), &updated)?;
    Ok(updated)
}

/// Fails with `IM-INVT-02` when `amount` exceeds the tracked quantity
pub fn decrease(
    storage: &mut dyn Storage,
    symbol: &str,
    symbol_id: &[u8],
    amount: Uint128,
) -> Result<Uint128, ContractError> {
    let updated = ensure_available(storage, symbol, symbol_id, amount)?;
    INVENTORY.save(storage, (symbol, symbol_id), &updated)?;
    Ok(updated)
}

/// Check a decrease would succeed; returns the remaining quantity
pub fn ensure_available(
    storage: &dyn Storage,
    symbol: &str,
    symbol_id: &[u8],
    amount: Uint128,
) -> Result<Uint128, ContractError> {
    let available = get(storage, symbol, symbol_id)?;
    available
        .checked_sub(amount)
        .map_err(|_| ContractError::InsufficientInventory {
            symbol: symbol.to_string(),
            available,
            requested: amount,
        })
}

/// Seed an entry during migration; refuses to overwrite a nonzero entry
pub fn set_initial(
    storage: &mut dyn Storage,
    symbol: &str,
    symbol_id: &[u8],
    amount: Uint128,
) -> Result<(), ContractError> {
    if !get(storage, symbol, symbol_id)?.is_zero() {
        return Err(ContractError::InventoryAlreadySet);
    }
    INVENTORY.save(storage, (symbol, symbol_id), &amount)?;
    Ok(())
}

pub fn remove(storage: &mut dyn Storage, symbol: &str, symbol_id: &[u8]) {
    INVENTORY.remove(storage, (symbol, symbol_id));
}

/// All entries for a symbol as (symbol id, quantity)
pub fn by_symbol(storage: &dyn Storage, symbol: &str) -> StdResult<Vec<(Vec<u8>, Uint128)>> {
    INVENTORY
        .prefix(symbol)
        .range(storage, None, None, Order::Ascending)
        .collect()
}
