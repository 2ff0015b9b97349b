//! Outgoing transfer handlers.
//!
//! The ledger (portfolio role) submits an envelope for a destination chain.
//! The envelope is resolved against the registry, passed through the risk
//! gates, and either parked as a delayed transfer or encoded and handed to
//! the chosen relay provider.

use common::{Tx, Xfer};
use cosmwasm_std::{
    Addr, BankMsg, Coin, DepsMut, Env, MessageInfo, QuerierWrapper, Response, Storage,
};

use super::registry::load_token;
use crate::codec::{self, WireXfer};
use crate::controller;
use crate::error::ContractError;
use crate::fee_manager::{quote_relay_fee, settle_fee};
use crate::hash::{bytes32_to_hex, compute_symbol_id, slice_to_bytes32, trader_to_bytes32};
use crate::inventory;
use crate::provider::{build_send_msg, load_enabled_provider, BridgeProvider, ProviderConfig};
use crate::state::{
    ChainRole, Config, RemoteChain, TokenDetails, TransferDirection, CONFIG, OUTBOUND_NONCES,
    PORTFOLIOS, REMOTE_CHAINS, RISK_CONFIG, XCHAIN_DESTINATIONS,
};

/// Registry resolution of an outbound envelope
pub(crate) struct OutboundRoute {
    pub remote: RemoteChain,
    /// Local record the envelope's symbol refers to
    pub token: TokenDetails,
    /// Symbol id written to the wire
    pub wire_symbol_id: [u8; 32],
    pub trader: [u8; 32],
    /// Whether the hub inventory of `token` is debited
    pub debits_inventory: bool,
}

/// Resolve where and as what an envelope travels.
///
/// Hub-mediated transfers carry the id of the token whose custody is on the
/// spoke side: the destination's token when sending from the hub, this
/// chain's token when sending from a spoke. Cross-chain trades carry the id
/// of the destination symbol configured for the pair.
pub(crate) fn resolve_outbound(
    storage: &dyn Storage,
    config: &Config,
    dst_chain_id: u32,
    xfer: &Xfer,
) -> Result<OutboundRoute, ContractError> {
    let remote = REMOTE_CHAINS
        .may_load(storage, dst_chain_id)?
        .ok_or(ContractError::RemoteChainNotSet {
            chain_id: dst_chain_id,
        })?;
    let trader = trader_to_bytes32(xfer.trader.as_slice())?;
    if xfer.quantity.is_zero() {
        return Err(ContractError::ZeroQuantity);
    }
    // a parked envelope must still encode when it is released
    codec::validate_custom_data(xfer.custom_data.as_slice(), config.xfer_version)?;

    let (token, wire_symbol_id) = if xfer.transaction.is_cross_chain_trade() {
        let dst_symbol = XCHAIN_DESTINATIONS
            .may_load(storage, (xfer.symbol.as_str(), dst_chain_id))?
            .ok_or_else(|| ContractError::DestinationNotAllowed {
                symbol: xfer.symbol.clone(),
                dst_chain_id,
            })?;
        let token = load_token(storage, &xfer.symbol, config.chain_id)?;
        (token, compute_symbol_id(&dst_symbol, dst_chain_id)?)
    } else {
        let origin = match config.role {
            ChainRole::Hub => dst_chain_id,
            ChainRole::Spoke => config.chain_id,
        };
        let token = load_token(storage, &xfer.symbol, origin)?;
        let id = slice_to_bytes32(token.symbol_id.as_slice())?;
        (token, id)
    };

    let debits_inventory =
        config.role == ChainRole::Hub && xfer.transaction == Tx::Withdraw;

    Ok(OutboundRoute {
        remote,
        token,
        wire_symbol_id,
        trader,
        debits_inventory,
    })
}

/// Submit a transfer envelope for `dst_chain_id`.
pub fn execute_send_cross_chain_message(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    dst_chain_id: u32,
    provider: BridgeProvider,
    xfer: Xfer,
    trader: Option<String>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if config.paused {
        return Err(ContractError::BridgePaused);
    }
    if !PORTFOLIOS
        .may_load(deps.storage, &info.sender)?
        .unwrap_or(false)
    {
        return Err(ContractError::UnauthorizedPortfolio);
    }
    let refund_to = match trader {
        Some(addr) => deps.api.addr_validate(&addr)?,
        None => info.sender.clone(),
    };

    let provider_config = load_enabled_provider(deps.storage, provider)?;
    let route = resolve_outbound(deps.storage, &config, dst_chain_id, &xfer)?;

    if route.debits_inventory {
        inventory::ensure_available(
            deps.storage,
            &route.token.symbol,
            &route.wire_symbol_id,
            xfer.quantity,
        )?;
    }

    let risk = RISK_CONFIG.load(deps.storage)?;
    let now = env.block.time;
    let window =
        controller::check_volume_cap(deps.storage, &risk, &xfer.symbol, xfer.quantity, now)?;
    let check = controller::check_thresholds(deps.storage, &xfer, dst_chain_id)?;

    let response = if check.delayed {
        let record = controller::enqueue(
            deps.storage,
            &risk,
            check.id,
            TransferDirection::Outbound {
                dst_chain_id,
                provider,
            },
            xfer.clone(),
            now,
        )?;

        // no relay fee is taken for a parked transfer
        let mut response = Response::new()
            .add_attribute("method", "send_cross_chain_message")
            .add_attribute("delayed", "true")
            .add_attribute("delayed_id", bytes32_to_hex(&check.id))
            .add_attribute("symbol", xfer.symbol.clone())
            .add_attribute("quantity", xfer.quantity.to_string())
            .add_attribute("dst_chain_id", dst_chain_id.to_string())
            .add_attribute("ready_at", record.ready_at.seconds().to_string());
        if !info.funds.is_empty() {
            response = response.add_message(BankMsg::Send {
                to_address: refund_to.to_string(),
                amount: info.funds.clone(),
            });
        }
        response
    } else {
        dispatch_outbound(
            deps.storage,
            &deps.querier,
            &env,
            &config,
            &provider_config,
            dst_chain_id,
            &route,
            xfer.clone(),
            &info.funds,
            &refund_to,
        )?
        .add_attribute("method", "send_cross_chain_message")
        .add_attribute("delayed", "false")
    };

    if route.debits_inventory {
        inventory::decrease(
            deps.storage,
            &route.token.symbol,
            &route.wire_symbol_id,
            xfer.quantity,
        )?;
    }
    controller::record_volume(deps.storage, &xfer.symbol, window.as_ref())?;

    Ok(response)
}

/// Assign the next nonce, encode and hand the envelope to the provider.
///
/// The attached funds must cover the provider's quoted fee; the excess goes
/// back to `refund_to`.
#[allow(clippy::too_many_arguments)]
pub(crate) fn dispatch_outbound(
    storage: &mut dyn Storage,
    querier: &QuerierWrapper,
    env: &Env,
    config: &Config,
    provider: &ProviderConfig,
    dst_chain_id: u32,
    route: &OutboundRoute,
    mut xfer: Xfer,
    funds: &[Coin],
    refund_to: &Addr,
) -> Result<Response, ContractError> {
    let payload_size = codec::payload_size(config.xfer_version)?;
    let fee = quote_relay_fee(querier, provider, dst_chain_id, payload_size)?;
    let refund = settle_fee(funds, &fee)?;

    let nonce = OUTBOUND_NONCES
        .may_load(storage, dst_chain_id)?
        .unwrap_or_default()
        + 1;
    xfer.nonce = nonce;
    xfer.timestamp = env.block.time.seconds();

    let wire = WireXfer {
        nonce,
        transaction: xfer.transaction,
        trader: route.trader,
        symbol_id: route.wire_symbol_id,
        quantity: xfer.quantity.u128(),
        timestamp: xfer.timestamp,
        custom_data: xfer.custom_data.to_vec(),
    };
    let payload = codec::encode(&wire, config.xfer_version)?;
    OUTBOUND_NONCES.save(storage, dst_chain_id, &nonce)?;

    let send = build_send_msg(provider, dst_chain_id, payload.into(), Some(fee.clone()))?;
    let mut response = Response::new()
        .add_message(send)
        .add_attribute("direction", "sent")
        .add_attribute("provider", provider.provider.as_str())
        .add_attribute("dst_chain_id", dst_chain_id.to_string())
        .add_attribute("remote_bridge", route.remote.bridge_address.clone())
        .add_attribute("nonce", nonce.to_string())
        .add_attribute("transaction", xfer.transaction.as_str())
        .add_attribute("trader", bytes32_to_hex(&route.trader))
        .add_attribute("symbol", xfer.symbol)
        .add_attribute("symbol_id", bytes32_to_hex(&route.wire_symbol_id))
        .add_attribute("quantity", xfer.quantity.to_string())
        .add_attribute("timestamp", xfer.timestamp.to_string())
        .add_attribute("custom_data", xfer.custom_data.to_base64())
        .add_attribute("fee", fee.to_string());

    if !refund.is_empty() {
        response = response.add_message(BankMsg::Send {
            to_address: refund_to.to_string(),
            amount: refund,
        });
    }
    Ok(response)
}
