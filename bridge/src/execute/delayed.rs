//! Delayed transfer execution.
//!
//! Inventory and volume were accounted for when the transfer was parked; the
//! release only re-resolves the registry and, for outbound transfers, the
//! provider it was queued for.

use cosmwasm_std::{DepsMut, Env, HexBinary, MessageInfo, Response};

use super::incoming::apply_inbound;
use super::load_config_as_admin;
use super::outgoing::{dispatch_outbound, resolve_outbound};
use super::registry::load_token;
use crate::controller;
use crate::error::ContractError;
use crate::hash::slice_to_bytes32;
use crate::provider::load_enabled_provider;
use crate::state::{ChainRole, TransferDirection};

/// Release a delayed transfer whose lock has expired.
///
/// Fails (and leaves the transfer queued) while the bridge is paused or the
/// outbound provider is disabled.
pub fn execute_delayed_transfer(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    id: HexBinary,
) -> Result<Response, ContractError> {
    let config = load_config_as_admin(deps.storage, &info.sender)?;
    if config.paused {
        return Err(ContractError::BridgePaused);
    }

    let id = slice_to_bytes32(id.as_slice())?;
    let record = controller::take_ready(deps.storage, &id, env.block.time)?;

    let response = match record.direction {
        TransferDirection::Outbound {
            dst_chain_id,
            provider,
        } => {
            let provider_config = load_enabled_provider(deps.storage, provider)?;
            let route = resolve_outbound(deps.storage, &config, dst_chain_id, &record.xfer)?;
            dispatch_outbound(
                deps.storage,
                &deps.querier,
                &env,
                &config,
                &provider_config,
                dst_chain_id,
                &route,
                record.xfer,
                &info.funds,
                &info.sender,
            )?
        }
        TransferDirection::Inbound { src_chain_id, .. } => {
            let origin = match config.role {
                ChainRole::Hub => src_chain_id,
                ChainRole::Spoke => config.chain_id,
            };
            let token = load_token(deps.storage, &record.xfer.symbol, origin)?;
            apply_inbound(deps.storage, &config, &token, src_chain_id, record.xfer)?
        }
    };

    Ok(response
        .add_attribute("method", "execute_delayed_transfer")
        .add_attribute("delayed_id", record.id.to_hex())
        .add_attribute("leg", record.direction.as_str())
        .add_attribute("remote_chain_id", record.direction.chain_id().to_string())
        .add_attribute("via", record.direction.provider().as_str()))
}
