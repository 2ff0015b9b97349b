//! Token identity registry handlers.
//!
//! A token is identified by `keccak256(symbol ‖ origin_chain_id)`. The same
//! symbol may be registered once per origin chain; each chain has at most one
//! native coin.

use cosmwasm_std::{DepsMut, HexBinary, MessageInfo, Response, Storage};

use super::load_config_as_admin;
use crate::error::ContractError;
use crate::hash::{bytes32_to_hex, compute_symbol_id};
use crate::inventory;
use crate::state::{AuctionMode, ChainRole, TokenDetails, NATIVE_TOKENS, TOKENS};

/// Load a registered token by symbol and origin chain
pub fn load_token(
    storage: &dyn Storage,
    symbol: &str,
    chain_id: u32,
) -> Result<TokenDetails, ContractError> {
    let id = compute_symbol_id(symbol, chain_id)?;
    TOKENS
        .may_load(storage, &id)?
        .ok_or_else(|| ContractError::TokenNotFound {
            symbol: symbol.to_string(),
        })
}

/// Register a token. Registering an existing id again succeeds without change.
pub fn execute_add_token(
    deps: DepsMut,
    info: MessageInfo,
    symbol: String,
    chain_id: u32,
    decimals: u8,
    custody: Option<String>,
    auction_mode: Option<AuctionMode>,
) -> Result<Response, ContractError> {
    load_config_as_admin(deps.storage, &info.sender)?;

    let id = compute_symbol_id(&symbol, chain_id)?;
    if TOKENS.has(deps.storage, &id) {
        return Ok(Response::new()
            .add_attribute("method", "add_token")
            .add_attribute("symbol_id", bytes32_to_hex(&id))
            .add_attribute("result", "already_registered"));
    }

    if custody.is_none() {
        if let Some(existing) = NATIVE_TOKENS.may_load(deps.storage, chain_id)? {
            if existing != symbol {
                return Err(ContractError::NativeTokenExists {
                    chain_id,
                    symbol: existing,
                });
            }
        }
        NATIVE_TOKENS.save(deps.storage, chain_id, &symbol)?;
    }

    let token = TokenDetails {
        symbol,
        origin_chain_id: chain_id,
        decimals,
        custody,
        auction_mode: auction_mode.unwrap_or(AuctionMode::Off),
        symbol_id: HexBinary::from(id.to_vec()),
    };
    TOKENS.save(deps.storage, &id, &token)?;

    Ok(Response::new()
        .add_attribute("method", "add_token")
        .add_attribute("symbol", token.symbol)
        .add_attribute("chain_id", chain_id.to_string())
        .add_attribute("decimals", decimals.to_string())
        .add_attribute("symbol_id", bytes32_to_hex(&id)))
}

/// Remove a token while the bridge is paused.
///
/// Native coins and unknown tokens are left alone. On the hub the token's
/// inventory must be drained first.
pub fn execute_remove_token(
    deps: DepsMut,
    info: MessageInfo,
    symbol: String,
    chain_id: u32,
) -> Result<Response, ContractError> {
    let config = load_config_as_admin(deps.storage, &info.sender)?;
    if !config.paused {
        return Err(ContractError::BridgeNotPaused);
    }

    let id = compute_symbol_id(&symbol, chain_id)?;
    let token = match TOKENS.may_load(deps.storage, &id)? {
        Some(token) if !token.is_native() => token,
        _ => {
            return Ok(Response::new()
                .add_attribute("method", "remove_token")
                .add_attribute("symbol_id", bytes32_to_hex(&id))
                .add_attribute("result", "skipped"))
        }
    };

    if config.role == ChainRole::Hub
        && !inventory::get(deps.storage, &token.symbol, &id)?.is_zero()
    {
        return Err(ContractError::InventoryNotZero {
            symbol: token.symbol,
        });
    }

    TOKENS.remove(deps.storage, &id);
    inventory::remove(deps.storage, &token.symbol, &id);

    Ok(Response::new()
        .add_attribute("method", "remove_token")
        .add_attribute("symbol", token.symbol)
        .add_attribute("chain_id", chain_id.to_string())
        .add_attribute("symbol_id", bytes32_to_hex(&id)))
}

pub fn execute_set_auction_mode(
    deps: DepsMut,
    info: MessageInfo,
    symbol: String,
    chain_id: u32,
    mode: AuctionMode,
) -> Result<Response, ContractError> {
    load_config_as_admin(deps.storage, &info.sender)?;

    let mut token = load_token(deps.storage, &symbol, chain_id)?;
    token.auction_mode = mode;
    let id = token.symbol_id.to_vec();
    TOKENS.save(deps.storage, &id, &token)?;

    Ok(Response::new()
        .add_attribute("method", "set_auction_mode")
        .add_attribute("symbol", symbol)
        .add_attribute("chain_id", chain_id.to_string())
        .add_attribute("mode", format!("{:?}", mode).to_lowercase()))
}
