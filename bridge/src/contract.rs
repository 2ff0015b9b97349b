//! Portfolio Bridge Contract - Entry Points
//!
//! The implementation is modularized into:
//! - `execute/` - Execute message handlers
//! - `query` - Query message handlers
//! - `controller`, `inventory`, `codec`, `provider` - the logic they share

use cosmwasm_std::{
    entry_point, to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult,
};
use cw2::set_contract_version;

use crate::codec::{VERSION_LEGACY, VERSION_PACKED};
use crate::error::ContractError;
use crate::execute::{
    execute_accept_admin, execute_add_portfolio, execute_add_token,
    execute_cancel_admin_proposal, execute_delayed_transfer, execute_enable_provider,
    execute_enable_xchain_swap_destination, execute_pause, execute_propose_admin,
    execute_recover_payload, execute_relay_receive, execute_remove_portfolio,
    execute_remove_token, execute_send_cross_chain_message, execute_set_auction_mode,
    execute_set_default_provider, execute_set_delay_period, execute_set_delay_thresholds,
    execute_set_epoch_length, execute_set_epoch_volume_caps, execute_set_inventory,
    execute_set_ledger, execute_set_provider, execute_set_provider_fee_multiplier,
    execute_set_remote_chain, execute_set_xfer_version, execute_unpause,
};
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::provider::{ProviderConfig, PROVIDERS};
use crate::query::{
    query_bridge_fee, query_config, query_delayed_transfer, query_delayed_transfers,
    query_epoch_volume, query_inventory, query_inventory_by_symbol, query_is_portfolio,
    query_nonces, query_pending_admin, query_providers, query_remote_chain, query_risk_config,
    query_thresholds, query_token_details, query_token_details_by_symbol, query_tokens,
    query_xchain_swap_destination,
};
use crate::state::{
    Config, RiskConfig, CONFIG, CONTRACT_NAME, CONTRACT_VERSION, DEFAULT_DELAY_PERIOD,
    DEFAULT_EPOCH_LENGTH, DEFAULT_XFER_VERSION, MAX_DELAY_PERIOD, PORTFOLIOS, RISK_CONFIG,
};

// ============================================================================
// Instantiate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    if msg.chain_id == 0 {
        return Err(ContractError::InvalidChainId { chain_id: 0 });
    }

    let xfer_version = msg.xfer_version.unwrap_or(DEFAULT_XFER_VERSION);
    if xfer_version != VERSION_LEGACY && xfer_version != VERSION_PACKED {
        return Err(ContractError::InvalidXferVersion {
            version: xfer_version,
        });
    }

    let delay_period = msg.delay_period.unwrap_or(DEFAULT_DELAY_PERIOD);
    if delay_period > MAX_DELAY_PERIOD {
        return Err(ContractError::InvalidDelayPeriod {
            max: MAX_DELAY_PERIOD,
        });
    }
    RISK_CONFIG.save(
        deps.storage,
        &RiskConfig {
            delay_period,
            epoch_length: msg.epoch_length.unwrap_or(DEFAULT_EPOCH_LENGTH),
        },
    )?;

    // Register relay endpoints
    for init in &msg.providers {
        let endpoint = deps.api.addr_validate(&init.endpoint)?;
        PROVIDERS.save(
            deps.storage,
            init.provider.code(),
            &ProviderConfig::new(init.provider, endpoint),
        )?;
    }
    if !PROVIDERS.has(deps.storage, msg.default_provider.code()) {
        return Err(ContractError::ProviderNotEnabled {
            provider: msg.default_provider.to_string(),
        });
    }

    let config = Config {
        admin: deps.api.addr_validate(&msg.admin)?,
        paused: false,
        chain_id: msg.chain_id,
        role: msg.role,
        ledger: deps.api.addr_validate(&msg.ledger)?,
        default_provider: msg.default_provider,
        xfer_version,
    };
    CONFIG.save(deps.storage, &config)?;

    // The ledger is the first portfolio
    PORTFOLIOS.save(deps.storage, &config.ledger, &true)?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("admin", config.admin)
        .add_attribute("chain_id", config.chain_id.to_string())
        .add_attribute("role", config.role.as_str())
        .add_attribute("ledger", config.ledger)
        .add_attribute("provider_count", msg.providers.len().to_string())
        .add_attribute("default_provider", config.default_provider.as_str()))
}

// ============================================================================
// Execute
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        // Router
        ExecuteMsg::SendCrossChainMessage {
            dst_chain_id,
            provider,
            xfer,
            trader,
        } => execute_send_cross_chain_message(
            deps,
            env,
            info,
            dst_chain_id,
            provider,
            xfer,
            trader,
        ),
        ExecuteMsg::RelayReceive(relay_msg) => execute_relay_receive(deps, env, info, relay_msg),
        ExecuteMsg::EnableXChainSwapDestination {
            symbol,
            dst_chain_id,
            dst_symbol,
        } => execute_enable_xchain_swap_destination(deps, info, symbol, dst_chain_id, dst_symbol),

        // Delay & volume cap
        ExecuteMsg::ExecuteDelayedTransfer { id } => execute_delayed_transfer(deps, env, info, id),
        ExecuteMsg::SetDelayPeriod { seconds } => execute_set_delay_period(deps, info, seconds),
        ExecuteMsg::SetEpochLength { seconds } => execute_set_epoch_length(deps, info, seconds),
        ExecuteMsg::SetDelayThresholds {
            symbols,
            thresholds,
        } => execute_set_delay_thresholds(deps, info, symbols, thresholds),
        ExecuteMsg::SetEpochVolumeCaps { symbols, caps } => {
            execute_set_epoch_volume_caps(deps, info, symbols, caps)
        }

        // Recovery
        ExecuteMsg::RecoverPayload {
            src_chain_id,
            payload,
        } => execute_recover_payload(deps, env, info, src_chain_id, payload),

        // Token registry
        ExecuteMsg::AddToken {
            symbol,
            chain_id,
            decimals,
            custody,
            auction_mode,
        } => execute_add_token(deps, info, symbol, chain_id, decimals, custody, auction_mode),
        ExecuteMsg::RemoveToken { symbol, chain_id } => {
            execute_remove_token(deps, info, symbol, chain_id)
        }
        ExecuteMsg::SetAuctionMode {
            symbol,
            chain_id,
            mode,
        } => execute_set_auction_mode(deps, info, symbol, chain_id, mode),

        // Inventory
        ExecuteMsg::SetInventory {
            symbol_ids,
            quantities,
        } => execute_set_inventory(deps, info, symbol_ids, quantities),

        // Providers & remotes
        ExecuteMsg::SetProvider { provider, endpoint } => {
            execute_set_provider(deps, info, provider, endpoint)
        }
        ExecuteMsg::EnableProvider { provider, enabled } => {
            execute_enable_provider(deps, info, provider, enabled)
        }
        ExecuteMsg::SetDefaultProvider { provider } => {
            execute_set_default_provider(deps, info, provider)
        }
        ExecuteMsg::SetProviderFeeMultiplier {
            provider,
            multiplier_bps,
        } => execute_set_provider_fee_multiplier(deps, info, provider, multiplier_bps),
        ExecuteMsg::SetRemoteChain {
            chain_id,
            bridge_address,
        } => execute_set_remote_chain(deps, info, chain_id, bridge_address),
        ExecuteMsg::SetXferVersion { version } => execute_set_xfer_version(deps, info, version),

        // Roles
        ExecuteMsg::SetLedger { address } => execute_set_ledger(deps, info, address),
        ExecuteMsg::AddPortfolio { address } => execute_add_portfolio(deps, info, address),
        ExecuteMsg::RemovePortfolio { address } => execute_remove_portfolio(deps, info, address),

        // Admin operations
        ExecuteMsg::Pause {} => execute_pause(deps, info),
        ExecuteMsg::Unpause {} => execute_unpause(deps, info),
        ExecuteMsg::ProposeAdmin { new_admin } => execute_propose_admin(deps, env, info, new_admin),
        ExecuteMsg::AcceptAdmin {} => execute_accept_admin(deps, env, info),
        ExecuteMsg::CancelAdminProposal {} => execute_cancel_admin_proposal(deps, info),
    }
}

// ============================================================================
// Query
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        // Core queries
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?),
        QueryMsg::PendingAdmin {} => to_json_binary(&query_pending_admin(deps)?),
        QueryMsg::IsPortfolio { address } => to_json_binary(&query_is_portfolio(deps, address)?),

        // Registry & inventory
        QueryMsg::TokenDetails { symbol_id } => {
            to_json_binary(&query_token_details(deps, symbol_id)?)
        }
        QueryMsg::TokenDetailsBySymbol { symbol, chain_id } => {
            to_json_binary(&query_token_details_by_symbol(deps, symbol, chain_id)?)
        }
        QueryMsg::Tokens { start_after, limit } => {
            to_json_binary(&query_tokens(deps, start_after, limit)?)
        }
        QueryMsg::Inventory { symbol, symbol_id } => {
            to_json_binary(&query_inventory(deps, symbol, symbol_id)?)
        }
        QueryMsg::InventoryBySymbol { symbol } => {
            to_json_binary(&query_inventory_by_symbol(deps, symbol)?)
        }

        // Delay & volume cap
        QueryMsg::RiskConfig {} => to_json_binary(&query_risk_config(deps)?),
        QueryMsg::Thresholds { symbol } => to_json_binary(&query_thresholds(deps, symbol)?),
        QueryMsg::EpochVolume { symbol } => to_json_binary(&query_epoch_volume(deps, symbol)?),
        QueryMsg::DelayedTransfer { id } => to_json_binary(&query_delayed_transfer(deps, id)?),
        QueryMsg::DelayedTransfers { start_after, limit } => {
            to_json_binary(&query_delayed_transfers(deps, start_after, limit)?)
        }

        // Router
        QueryMsg::BridgeFee {
            provider,
            dst_chain_id,
        } => to_json_binary(&query_bridge_fee(deps, provider, dst_chain_id)?),
        QueryMsg::Providers {} => to_json_binary(&query_providers(deps)?),
        QueryMsg::RemoteChain { chain_id } => to_json_binary(&query_remote_chain(deps, chain_id)?),
        QueryMsg::XChainSwapDestination {
            symbol,
            dst_chain_id,
        } => to_json_binary(&query_xchain_swap_destination(deps, symbol, dst_chain_id)?),
        QueryMsg::Nonces { chain_id } => to_json_binary(&query_nonces(deps, chain_id)?),
    }
}

// ============================================================================
// Migrate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    // Deployments from before the risk controller have no risk config
    if RISK_CONFIG.may_load(deps.storage)?.is_none() {
        RISK_CONFIG.save(
            deps.storage,
            &RiskConfig {
                delay_period: DEFAULT_DELAY_PERIOD,
                epoch_length: DEFAULT_EPOCH_LENGTH,
            },
        )?;
    }

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("version", CONTRACT_VERSION))
}
