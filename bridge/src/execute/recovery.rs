//! Stuck payload recovery.
//!
//! When a delivery to this bridge fails, the relay endpoint keeps the hash of
//! the payload and blocks the path. The admin resubmits the exact bytes; they
//! are processed like a fresh delivery and the endpoint is told to clear the
//! path in the same transaction.

use common::relay::{RelayExecuteMsg, RelayQueryMsg, StoredPayloadResponse};
use cosmwasm_std::{to_json_binary, Binary, DepsMut, Env, MessageInfo, Response, WasmMsg};

use super::incoming::process_inbound;
use super::load_config_as_admin;
use crate::error::ContractError;
use crate::hash::keccak256;
use crate::provider::all_providers;
use crate::state::REMOTE_CHAINS;

pub fn execute_recover_payload(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    src_chain_id: u32,
    payload: Binary,
) -> Result<Response, ContractError> {
    let config = load_config_as_admin(deps.storage, &info.sender)?;

    let remote = REMOTE_CHAINS
        .may_load(deps.storage, src_chain_id)?
        .ok_or(ContractError::RemoteChainNotSet {
            chain_id: src_chain_id,
        })?;

    // paths of different providers block independently; replay the one
    // whose stored payload matches the submitted bytes
    let hash = keccak256(payload.as_slice());
    let mut any_stored = false;
    let mut found = None;
    for provider in all_providers(deps.storage)? {
        let res: StoredPayloadResponse = deps.querier.query_wasm_smart(
            &provider.endpoint,
            &RelayQueryMsg::StoredPayload {
                src_chain_id,
                src_address: remote.bridge_address.clone(),
            },
        )?;
        let Some(stored) = res.stored else {
            continue;
        };
        any_stored = true;
        if stored.payload_hash.as_slice() == hash.as_slice()
            && stored.payload_length == payload.len() as u64
        {
            found = Some((provider, stored));
            break;
        }
    }
    let (provider, stored) = match found {
        Some(found) => found,
        None if any_stored => return Err(ContractError::PayloadHashMismatch),
        None => return Err(ContractError::NoStoredPayload { src_chain_id }),
    };

    let response = process_inbound(
        deps.storage,
        &config,
        &provider,
        src_chain_id,
        &remote.bridge_address,
        payload.as_slice(),
        env.block.time,
    )?;

    let clear = WasmMsg::Execute {
        contract_addr: provider.endpoint.to_string(),
        msg: to_json_binary(&RelayExecuteMsg::ClearStoredPayload {
            src_chain_id,
            src_address: remote.bridge_address,
            payload_hash: stored.payload_hash,
        })?,
        funds: vec![],
    };

    Ok(response
        .add_message(clear)
        .add_attribute("method", "recover_payload")
        .add_attribute("relay_nonce", stored.nonce.to_string()))
}
