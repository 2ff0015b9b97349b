//! Admin operations handlers.
//!
//! This module handles:
//! - Pause/unpause contract
//! - Admin transfer (propose/accept/cancel)
//! - Ledger address and the portfolio role

use cosmwasm_std::{DepsMut, Env, MessageInfo, Response};

use super::load_config_as_admin;
use crate::error::ContractError;
use crate::state::{PendingAdmin, ADMIN_TIMELOCK_DURATION, CONFIG, PENDING_ADMIN, PORTFOLIOS};

// ============================================================================
// Pause/Unpause
// ============================================================================

/// Pause the contract. Blocks outbound dispatch, inbound processing and
/// delayed execution; in-flight relay messages stay with the relay.
pub fn execute_pause(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    set_paused(deps, info, true)
}

/// Unpause the contract.
pub fn execute_unpause(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    set_paused(deps, info, false)
}

fn set_paused(deps: DepsMut, info: MessageInfo, paused: bool) -> Result<Response, ContractError> {
    let mut config = load_config_as_admin(deps.storage, &info.sender)?;
    config.paused = paused;
    CONFIG.save(deps.storage, &config)?;

    let method = if paused { "pause" } else { "unpause" };
    Ok(Response::new().add_attribute("method", method))
}

// ============================================================================
// Admin Transfer
// ============================================================================

/// Propose a new admin (starts timelock).
pub fn execute_propose_admin(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    new_admin: String,
) -> Result<Response, ContractError> {
    load_config_as_admin(deps.storage, &info.sender)?;

    let pending = PendingAdmin {
        new_address: deps.api.addr_validate(&new_admin)?,
        execute_after: env.block.time.plus_seconds(ADMIN_TIMELOCK_DURATION),
    };
    PENDING_ADMIN.save(deps.storage, &pending)?;

    Ok(Response::new()
        .add_attribute("method", "propose_admin")
        .add_attribute("new_admin", pending.new_address)
        .add_attribute("execute_after", pending.execute_after.seconds().to_string()))
}

/// Accept pending admin role (after timelock).
pub fn execute_accept_admin(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let pending = PENDING_ADMIN
        .may_load(deps.storage)?
        .ok_or(ContractError::NoPendingAdmin)?;

    if info.sender != pending.new_address {
        return Err(ContractError::UnauthorizedPendingAdmin);
    }

    if env.block.time < pending.execute_after {
        return Err(ContractError::TimelockNotExpired {
            remaining_seconds: pending.execute_after.seconds() - env.block.time.seconds(),
        });
    }

    CONFIG.update(deps.storage, |mut config| -> Result<_, ContractError> {
        config.admin = pending.new_address.clone();
        Ok(config)
    })?;
    PENDING_ADMIN.remove(deps.storage);

    Ok(Response::new()
        .add_attribute("method", "accept_admin")
        .add_attribute("new_admin", pending.new_address))
}

/// Cancel pending admin proposal.
pub fn execute_cancel_admin_proposal(
    deps: DepsMut,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    load_config_as_admin(deps.storage, &info.sender)?;
    PENDING_ADMIN.remove(deps.storage);

    Ok(Response::new().add_attribute("method", "cancel_admin_proposal"))
}

// ============================================================================
// Ledger & Portfolio Role
// ============================================================================

/// Point inbound processing at another ledger contract. The new ledger also
/// receives the portfolio role; the old one keeps it until removed.
pub fn execute_set_ledger(
    deps: DepsMut,
    info: MessageInfo,
    address: String,
) -> Result<Response, ContractError> {
    let mut config = load_config_as_admin(deps.storage, &info.sender)?;
    config.ledger = deps.api.addr_validate(&address)?;
    CONFIG.save(deps.storage, &config)?;
    PORTFOLIOS.save(deps.storage, &config.ledger, &true)?;

    Ok(Response::new()
        .add_attribute("method", "set_ledger")
        .add_attribute("ledger", config.ledger))
}

/// Grant the portfolio role (may call SendCrossChainMessage).
pub fn execute_add_portfolio(
    deps: DepsMut,
    info: MessageInfo,
    address: String,
) -> Result<Response, ContractError> {
    load_config_as_admin(deps.storage, &info.sender)?;
    let portfolio = deps.api.addr_validate(&address)?;
    PORTFOLIOS.save(deps.storage, &portfolio, &true)?;

    Ok(Response::new()
        .add_attribute("method", "add_portfolio")
        .add_attribute("portfolio", portfolio))
}

/// Revoke the portfolio role.
pub fn execute_remove_portfolio(
    deps: DepsMut,
    info: MessageInfo,
    address: String,
) -> Result<Response, ContractError> {
    load_config_as_admin(deps.storage, &info.sender)?;
    let portfolio = deps.api.addr_validate(&address)?;
    PORTFOLIOS.remove(deps.storage, &portfolio);

    Ok(Response::new()
        .add_attribute("method", "remove_portfolio")
        .add_attribute("portfolio", portfolio))
}
