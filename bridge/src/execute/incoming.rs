//! Incoming transfer handlers.
//!
//! A relay endpoint delivers a payload from a remote bridge. The payload is
//! decoded, its symbol id resolved against the local registry and the
//! envelope either parked as a delayed transfer or applied: the hub tracks
//! spoke inventory, and the ledger receives `ProcessXferPayload`.

use common::ledger::LedgerExecuteMsg;
use common::relay::RelayReceiveMsg;
use common::{Tx, Xfer};
use cosmwasm_std::{
    to_json_binary, Binary, DepsMut, Env, MessageInfo, Response, Storage, Timestamp, Uint128,
    WasmMsg,
};

use crate::codec;
use crate::controller;
use crate::error::ContractError;
use crate::hash::bytes32_to_hex;
use crate::inventory;
use crate::provider::{provider_for_endpoint, ProviderConfig};
use crate::state::{
    ChainRole, Config, TokenDetails, TransferDirection, CONFIG, INBOUND_NONCES, REMOTE_CHAINS,
    RISK_CONFIG, TOKENS,
};

/// Entry point for relay endpoints.
pub fn execute_relay_receive(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: RelayReceiveMsg,
) -> Result<Response, ContractError> {
    let provider = provider_for_endpoint(deps.storage, &info.sender)?;
    let config = CONFIG.load(deps.storage)?;

    let response = process_inbound(
        deps.storage,
        &config,
        &provider,
        msg.src_chain_id,
        &msg.src_address,
        msg.payload.as_slice(),
        env.block.time,
    )?;

    Ok(response
        .add_attribute("method", "relay_receive")
        .add_attribute("relay_nonce", msg.nonce.to_string()))
}

/// Authenticate, decode and apply (or delay) one inbound payload.
///
/// Shared by `RelayReceive` and `RecoverPayload`; the caller has already
/// established that `provider` delivered the bytes.
pub(crate) fn process_inbound(
    storage: &mut dyn Storage,
    config: &Config,
    provider: &ProviderConfig,
    src_chain_id: u32,
    src_address: &str,
    payload: &[u8],
    now: Timestamp,
) -> Result<Response, ContractError> {
    if config.paused {
        return Err(ContractError::BridgePaused);
    }

    let trusted = REMOTE_CHAINS.may_load(storage, src_chain_id)?;
    match trusted {
        Some(remote) if remote.bridge_address == src_address => {}
        _ => {
            return Err(ContractError::UntrustedSource {
                src_chain_id,
                src_address: src_address.to_string(),
            })
        }
    }

    let (version, wire) = codec::decode(payload)?;
    let token = TOKENS
        .may_load(storage, &wire.symbol_id)?
        .ok_or_else(|| ContractError::TokenNotFound {
            symbol: bytes32_to_hex(&wire.symbol_id),
        })?;

    let xfer = Xfer {
        nonce: wire.nonce,
        transaction: wire.transaction,
        trader: Binary::from(wire.trader.to_vec()),
        symbol: token.symbol.clone(),
        quantity: Uint128::new(wire.quantity),
        timestamp: wire.timestamp,
        custom_data: Binary::from(wire.custom_data),
    };
    INBOUND_NONCES.save(storage, src_chain_id, &xfer.nonce)?;

    let check = controller::check_thresholds(storage, &xfer, src_chain_id)?;
    if check.delayed {
        let risk = RISK_CONFIG.load(storage)?;
        let record = controller::enqueue(
            storage,
            &risk,
            check.id,
            TransferDirection::Inbound {
                src_chain_id,
                provider: provider.provider,
            },
            xfer,
            now,
        )?;
        return Ok(Response::new()
            .add_attribute("direction", "received")
            .add_attribute("delayed", "true")
            .add_attribute("delayed_id", bytes32_to_hex(&check.id))
            .add_attribute("src_chain_id", src_chain_id.to_string())
            .add_attribute("symbol", record.xfer.symbol)
            .add_attribute("quantity", record.xfer.quantity.to_string())
            .add_attribute("ready_at", record.ready_at.seconds().to_string()));
    }

    Ok(apply_inbound(storage, config, &token, src_chain_id, xfer)?
        .add_attribute("provider", provider.provider.as_str())
        .add_attribute("version", version.to_string())
        .add_attribute("delayed", "false"))
}

/// Apply an inbound envelope: hub inventory, then the ledger call.
pub(crate) fn apply_inbound(
    storage: &mut dyn Storage,
    config: &Config,
    token: &TokenDetails,
    src_chain_id: u32,
    xfer: Xfer,
) -> Result<Response, ContractError> {
    if config.role == ChainRole::Hub && xfer.transaction == Tx::Deposit {
        inventory::increase(
            storage,
            &token.symbol,
            token.symbol_id.as_slice(),
            xfer.quantity,
        )?;
    }

    let attrs = vec![
        ("direction", "received".to_string()),
        ("src_chain_id", src_chain_id.to_string()),
        ("nonce", xfer.nonce.to_string()),
        ("transaction", xfer.transaction.as_str().to_string()),
        ("trader", format!("0x{}", hex::encode(xfer.trader.as_slice()))),
        ("symbol", xfer.symbol.clone()),
        ("symbol_id", token.symbol_id.to_hex()),
        ("quantity", xfer.quantity.to_string()),
        ("timestamp", xfer.timestamp.to_string()),
    ];

    let ledger_msg = WasmMsg::Execute {
        contract_addr: config.ledger.to_string(),
        msg: to_json_binary(&LedgerExecuteMsg::ProcessXferPayload { xfer, src_chain_id })?,
        funds: vec![],
    };

    Ok(Response::new().add_message(ledger_msg).add_attributes(attrs))
}
