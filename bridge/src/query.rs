//! Query handlers for the portfolio bridge contract.
//!
//! This module contains all query message handlers for retrieving contract state.

use cosmwasm_std::{Deps, HexBinary, Order, StdError, StdResult, Uint128};
use cw_storage_plus::Bound;

use crate::codec;
use crate::fee_manager::quote_relay_fee;
use crate::hash::compute_symbol_id;
use crate::inventory;
use crate::msg::{
    BridgeFeeResponse, ConfigResponse, DelayedTransfersResponse, EpochVolumeResponse,
    InventoryBySymbolResponse, InventoryResponse, NoncesResponse, PendingAdminResponse,
    ProvidersResponse, ThresholdsResponse, TokensResponse, XChainSwapDestinationResponse,
};
use crate::provider::{all_providers, may_load_provider, BridgeProvider};
use crate::state::{
    DelayedTransfer, RemoteChain, RiskConfig, TokenDetails, CONFIG, DELAYED_TRANSFERS,
    DELAY_THRESHOLDS, EPOCH_VOLUMES, EPOCH_VOLUME_CAPS, INBOUND_NONCES, OUTBOUND_NONCES,
    PENDING_ADMIN, PORTFOLIOS, REMOTE_CHAINS, RISK_CONFIG, TOKENS, XCHAIN_DESTINATIONS,
};

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 30;

// ============================================================================
// Core Queries
// ============================================================================

/// Query contract configuration.
pub fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse {
        admin: config.admin,
        paused: config.paused,
        chain_id: config.chain_id,
        role: config.role,
        ledger: config.ledger,
        default_provider: config.default_provider,
        xfer_version: config.xfer_version,
    })
}

/// Query pending admin proposal.
pub fn query_pending_admin(deps: Deps) -> StdResult<Option<PendingAdminResponse>> {
    let pending = PENDING_ADMIN.may_load(deps.storage)?;
    Ok(pending.map(|p| PendingAdminResponse {
        new_address: p.new_address,
        execute_after: p.execute_after,
    }))
}

pub fn query_is_portfolio(deps: Deps, address: String) -> StdResult<bool> {
    let addr = deps.api.addr_validate(&address)?;
    Ok(PORTFOLIOS.may_load(deps.storage, &addr)?.unwrap_or(false))
}

// ============================================================================
// Registry & Inventory Queries
// ============================================================================

/// Token record by id. Unknown ids yield the zero-valued record.
pub fn query_token_details(deps: Deps, symbol_id: HexBinary) -> StdResult<TokenDetails> {
    Ok(TOKENS
        .may_load(deps.storage, symbol_id.as_slice())?
        .unwrap_or_else(TokenDetails::empty))
}

pub fn query_token_details_by_symbol(
    deps: Deps,
    symbol: String,
    chain_id: u32,
) -> StdResult<TokenDetails> {
    // a symbol that can't be hashed can't be registered either
    let id = match compute_symbol_id(&symbol, chain_id) {
        Ok(id) => id,
        Err(_) => return Ok(TokenDetails::empty()),
    };
    query_token_details(deps, HexBinary::from(id.to_vec()))
}

/// Paginated token records, ordered by symbol id.
pub fn query_tokens(
    deps: Deps,
    start_after: Option<HexBinary>,
    limit: Option<u32>,
) -> StdResult<TokensResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.as_ref().map(|id| Bound::exclusive(id.as_slice()));

    let tokens = TOKENS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| item.map(|(_, token)| token))
        .collect::<StdResult<Vec<_>>>()?;

    Ok(TokensResponse { tokens })
}

pub fn query_inventory(
    deps: Deps,
    symbol: String,
    symbol_id: HexBinary,
) -> StdResult<InventoryResponse> {
    let quantity = inventory::get(deps.storage, &symbol, symbol_id.as_slice())?;
    Ok(InventoryResponse {
        symbol,
        symbol_id,
        quantity,
    })
}

pub fn query_inventory_by_symbol(
    deps: Deps,
    symbol: String,
) -> StdResult<InventoryBySymbolResponse> {
    let entries = inventory::by_symbol(deps.storage, &symbol)?
        .into_iter()
        .map(|(id, quantity)| InventoryResponse {
            symbol: symbol.clone(),
            symbol_id: HexBinary::from(id),
            quantity,
        })
        .collect();
    Ok(InventoryBySymbolResponse { symbol, entries })
}

// ============================================================================
// Delay & Volume-Cap Queries
// ============================================================================

pub fn query_risk_config(deps: Deps) -> StdResult<RiskConfig> {
    RISK_CONFIG.load(deps.storage)
}

pub fn query_thresholds(deps: Deps, symbol: String) -> StdResult<ThresholdsResponse> {
    let delay_threshold = DELAY_THRESHOLDS
        .may_load(deps.storage, &symbol)?
        .unwrap_or_default();
    let epoch_volume_cap = EPOCH_VOLUME_CAPS
        .may_load(deps.storage, &symbol)?
        .unwrap_or_default();
    Ok(ThresholdsResponse {
        symbol,
        delay_threshold,
        epoch_volume_cap,
    })
}

/// Stored window of a symbol. An expired window is reported as stored; it is
/// reset by the next capped transfer.
pub fn query_epoch_volume(deps: Deps, symbol: String) -> StdResult<EpochVolumeResponse> {
    let window = EPOCH_VOLUMES.may_load(deps.storage, &symbol)?;
    Ok(EpochVolumeResponse {
        accumulated: window
            .as_ref()
            .map(|w| w.accumulated)
            .unwrap_or_else(Uint128::zero),
        epoch_start: window.map(|w| w.epoch_start),
        symbol,
    })
}

pub fn query_delayed_transfer(deps: Deps, id: HexBinary) -> StdResult<Option<DelayedTransfer>> {
    DELAYED_TRANSFERS.may_load(deps.storage, id.as_slice())
}

/// Paginated delayed transfers, ordered by id.
pub fn query_delayed_transfers(
    deps: Deps,
    start_after: Option<HexBinary>,
    limit: Option<u32>,
) -> StdResult<DelayedTransfersResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.as_ref().map(|id| Bound::exclusive(id.as_slice()));

    let transfers = DELAYED_TRANSFERS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| item.map(|(_, record)| record))
        .collect::<StdResult<Vec<_>>>()?;

    Ok(DelayedTransfersResponse { transfers })
}

// ============================================================================
// Router Queries
// ============================================================================

/// Fee to attach to `SendCrossChainMessage` (and to outbound delayed releases).
pub fn query_bridge_fee(
    deps: Deps,
    provider: BridgeProvider,
    dst_chain_id: u32,
) -> StdResult<BridgeFeeResponse> {
    let config = CONFIG.load(deps.storage)?;
    let provider_config = may_load_provider(deps.storage, provider)?
        .ok_or_else(|| StdError::not_found(format!("provider {}", provider)))?;
    let payload_size = codec::payload_size(config.xfer_version)
        .map_err(|e| StdError::generic_err(e.to_string()))?;

    let fee = quote_relay_fee(&deps.querier, &provider_config, dst_chain_id, payload_size)?;
    Ok(BridgeFeeResponse {
        fee,
        payload_size: payload_size as u64,
    })
}

pub fn query_providers(deps: Deps) -> StdResult<ProvidersResponse> {
    Ok(ProvidersResponse {
        providers: all_providers(deps.storage)?,
    })
}

pub fn query_remote_chain(deps: Deps, chain_id: u32) -> StdResult<Option<RemoteChain>> {
    REMOTE_CHAINS.may_load(deps.storage, chain_id)
}

pub fn query_xchain_swap_destination(
    deps: Deps,
    symbol: String,
    dst_chain_id: u32,
) -> StdResult<XChainSwapDestinationResponse> {
    let dst_symbol = XCHAIN_DESTINATIONS.may_load(deps.storage, (symbol.as_str(), dst_chain_id))?;
    Ok(XChainSwapDestinationResponse {
        symbol,
        dst_chain_id,
        dst_symbol,
    })
}

pub fn query_nonces(deps: Deps, chain_id: u32) -> StdResult<NoncesResponse> {
    Ok(NoncesResponse {
        chain_id,
        outbound: OUTBOUND_NONCES
            .may_load(deps.storage, chain_id)?
            .unwrap_or_default(),
        last_inbound: INBOUND_NONCES
            .may_load(deps.storage, chain_id)?
            .unwrap_or_default(),
    })
}
