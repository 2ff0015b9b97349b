//! Configuration handlers.
//!
//! This module handles:
//! - Relay providers (endpoint, enable flag, default, fee multiplier)
//! - Remote bridges and the outbound wire version
//! - Cross-chain trade destinations
//! - Delay thresholds, volume caps, delay period and epoch length
//! - Inventory seeding

use cosmwasm_std::{DepsMut, HexBinary, MessageInfo, Response, Uint128};

use super::load_config_as_admin;
use crate::codec::{VERSION_LEGACY, VERSION_PACKED};
use crate::error::ContractError;
use crate::fee_manager::validate_fee_multiplier;
use crate::hash::{slice_to_bytes32, symbol_to_bytes32};
use crate::inventory;
use crate::provider::{may_load_provider, BridgeProvider, ProviderConfig, PROVIDERS};
use crate::state::{
    RemoteChain, CONFIG, DELAY_THRESHOLDS, EPOCH_VOLUME_CAPS, MAX_DELAY_PERIOD, REMOTE_CHAINS,
    RISK_CONFIG, TOKENS, XCHAIN_DESTINATIONS,
};

// ============================================================================
// Providers
// ============================================================================

/// Register a provider endpoint, or move an existing one (keeps its flags).
pub fn execute_set_provider(
    deps: DepsMut,
    info: MessageInfo,
    provider: BridgeProvider,
    endpoint: String,
) -> Result<Response, ContractError> {
    load_config_as_admin(deps.storage, &info.sender)?;

    let endpoint = deps.api.addr_validate(&endpoint)?;
    let entry = match may_load_provider(deps.storage, provider)? {
        Some(existing) => ProviderConfig {
            endpoint: endpoint.clone(),
            ..existing
        },
        None => ProviderConfig::new(provider, endpoint.clone()),
    };
    PROVIDERS.save(deps.storage, provider.code(), &entry)?;

    Ok(Response::new()
        .add_attribute("method", "set_provider")
        .add_attribute("provider", provider.as_str())
        .add_attribute("endpoint", endpoint))
}

/// Enable or disable outbound traffic through a provider.
///
/// Delayed transfers already queued for a disabled provider stay queued and
/// can only be executed once it is enabled again.
pub fn execute_enable_provider(
    deps: DepsMut,
    info: MessageInfo,
    provider: BridgeProvider,
    enabled: bool,
) -> Result<Response, ContractError> {
    let config = load_config_as_admin(deps.storage, &info.sender)?;

    if !enabled && provider == config.default_provider {
        return Err(ContractError::DefaultProviderDisable);
    }

    let mut entry =
        may_load_provider(deps.storage, provider)?.ok_or(ContractError::ProviderNotEnabled {
            provider: provider.to_string(),
        })?;
    entry.enabled = enabled;
    PROVIDERS.save(deps.storage, provider.code(), &entry)?;

    Ok(Response::new()
        .add_attribute("method", "enable_provider")
        .add_attribute("provider", provider.as_str())
        .add_attribute("enabled", enabled.to_string()))
}

pub fn execute_set_default_provider(
    deps: DepsMut,
    info: MessageInfo,
    provider: BridgeProvider,
) -> Result<Response, ContractError> {
    let mut config = load_config_as_admin(deps.storage, &info.sender)?;

    match may_load_provider(deps.storage, provider)? {
        Some(entry) if entry.enabled => {}
        _ => {
            return Err(ContractError::ProviderNotEnabled {
                provider: provider.to_string(),
            })
        }
    }
    config.default_provider = provider;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("method", "set_default_provider")
        .add_attribute("provider", provider.as_str()))
}

pub fn execute_set_provider_fee_multiplier(
    deps: DepsMut,
    info: MessageInfo,
    provider: BridgeProvider,
    multiplier_bps: u64,
) -> Result<Response, ContractError> {
    load_config_as_admin(deps.storage, &info.sender)?;
    validate_fee_multiplier(multiplier_bps)?;

    let mut entry =
        may_load_provider(deps.storage, provider)?.ok_or(ContractError::ProviderNotEnabled {
            provider: provider.to_string(),
        })?;
    entry.fee_multiplier_bps = multiplier_bps;
    PROVIDERS.save(deps.storage, provider.code(), &entry)?;

    Ok(Response::new()
        .add_attribute("method", "set_provider_fee_multiplier")
        .add_attribute("provider", provider.as_str())
        .add_attribute("multiplier_bps", multiplier_bps.to_string()))
}

// ============================================================================
// Remotes & Wire Version
// ============================================================================

/// Trust `bridge_address` as the only sender on `chain_id`.
pub fn execute_set_remote_chain(
    deps: DepsMut,
    info: MessageInfo,
    chain_id: u32,
    bridge_address: String,
) -> Result<Response, ContractError> {
    let config = load_config_as_admin(deps.storage, &info.sender)?;

    if chain_id == 0 || chain_id == config.chain_id {
        return Err(ContractError::InvalidChainId { chain_id });
    }
    if bridge_address.is_empty() {
        return Err(ContractError::UntrustedSource {
            src_chain_id: chain_id,
            src_address: bridge_address,
        });
    }

    REMOTE_CHAINS.save(
        deps.storage,
        chain_id,
        &RemoteChain {
            chain_id,
            bridge_address: bridge_address.clone(),
        },
    )?;

    Ok(Response::new()
        .add_attribute("method", "set_remote_chain")
        .add_attribute("chain_id", chain_id.to_string())
        .add_attribute("bridge_address", bridge_address))
}

pub fn execute_set_xfer_version(
    deps: DepsMut,
    info: MessageInfo,
    version: u8,
) -> Result<Response, ContractError> {
    let mut config = load_config_as_admin(deps.storage, &info.sender)?;

    if version != VERSION_LEGACY && version != VERSION_PACKED {
        return Err(ContractError::InvalidXferVersion { version });
    }
    config.xfer_version = version;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("method", "set_xfer_version")
        .add_attribute("version", version.to_string()))
}

// ============================================================================
// Cross-Chain Trades
// ============================================================================

/// Allow (`Some`) or forbid (`None`) trades of `symbol` settling on `dst_chain_id`.
pub fn execute_enable_xchain_swap_destination(
    deps: DepsMut,
    info: MessageInfo,
    symbol: String,
    dst_chain_id: u32,
    dst_symbol: Option<String>,
) -> Result<Response, ContractError> {
    load_config_as_admin(deps.storage, &info.sender)?;
    symbol_to_bytes32(&symbol)?;

    let key = (symbol.as_str(), dst_chain_id);
    match &dst_symbol {
        Some(dst_symbol) => {
            symbol_to_bytes32(dst_symbol)?;
            XCHAIN_DESTINATIONS.save(deps.storage, key, dst_symbol)?;
        }
        None => XCHAIN_DESTINATIONS.remove(deps.storage, key),
    }

    Ok(Response::new()
        .add_attribute("method", "enable_xchain_swap_destination")
        .add_attribute("symbol", symbol)
        .add_attribute("dst_chain_id", dst_chain_id.to_string())
        .add_attribute("dst_symbol", dst_symbol.unwrap_or_default()))
}

// ============================================================================
// Delay & Volume Cap
// ============================================================================

pub fn execute_set_delay_period(
    deps: DepsMut,
    info: MessageInfo,
    seconds: u64,
) -> Result<Response, ContractError> {
    load_config_as_admin(deps.storage, &info.sender)?;

    if seconds > MAX_DELAY_PERIOD {
        return Err(ContractError::InvalidDelayPeriod {
            max: MAX_DELAY_PERIOD,
        });
    }
    RISK_CONFIG.update(deps.storage, |mut risk| -> Result<_, ContractError> {
        risk.delay_period = seconds;
        Ok(risk)
    })?;

    Ok(Response::new()
        .add_attribute("method", "set_delay_period")
        .add_attribute("seconds", seconds.to_string()))
}

/// Windows already open keep their start; the new length applies to the
/// next comparison.
pub fn execute_set_epoch_length(
    deps: DepsMut,
    info: MessageInfo,
    seconds: u64,
) -> Result<Response, ContractError> {
    load_config_as_admin(deps.storage, &info.sender)?;

    RISK_CONFIG.update(deps.storage, |mut risk| -> Result<_, ContractError> {
        risk.epoch_length = seconds;
        Ok(risk)
    })?;

    Ok(Response::new()
        .add_attribute("method", "set_epoch_length")
        .add_attribute("seconds", seconds.to_string()))
}

pub fn execute_set_delay_thresholds(
    deps: DepsMut,
    info: MessageInfo,
    symbols: Vec<String>,
    thresholds: Vec<Uint128>,
) -> Result<Response, ContractError> {
    load_config_as_admin(deps.storage, &info.sender)?;

    if symbols.len() != thresholds.len() {
        return Err(ContractError::ThresholdLengthMismatch);
    }
    for (symbol, threshold) in symbols.iter().zip(thresholds.iter()) {
        symbol_to_bytes32(symbol)?;
        DELAY_THRESHOLDS.save(deps.storage, symbol, threshold)?;
    }

    Ok(Response::new()
        .add_attribute("method", "set_delay_thresholds")
        .add_attribute("symbols", symbols.join(","))
        .add_attribute(
            "thresholds",
            thresholds
                .iter()
                .map(|t| t.to_string())
                .collect::<Vec<_>>()
                .join(","),
        ))
}

pub fn execute_set_epoch_volume_caps(
    deps: DepsMut,
    info: MessageInfo,
    symbols: Vec<String>,
    caps: Vec<Uint128>,
) -> Result<Response, ContractError> {
    load_config_as_admin(deps.storage, &info.sender)?;

    if symbols.len() != caps.len() {
        return Err(ContractError::VolumeCapLengthMismatch);
    }
    for (symbol, cap) in symbols.iter().zip(caps.iter()) {
        symbol_to_bytes32(symbol)?;
        EPOCH_VOLUME_CAPS.save(deps.storage, symbol, cap)?;
    }

    Ok(Response::new()
        .add_attribute("method", "set_epoch_volume_caps")
        .add_attribute("symbols", symbols.join(","))
        .add_attribute(
            "caps",
            caps.iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(","),
        ))
}

// ============================================================================
// Inventory Seeding
// ============================================================================

/// Seed inventory of registered tokens, e.g. when taking over a deployment.
/// Entries that are already nonzero are never overwritten.
pub fn execute_set_inventory(
    deps: DepsMut,
    info: MessageInfo,
    symbol_ids: Vec<HexBinary>,
    quantities: Vec<Uint128>,
) -> Result<Response, ContractError> {
    load_config_as_admin(deps.storage, &info.sender)?;

    if symbol_ids.len() != quantities.len() {
        return Err(ContractError::InventoryLengthMismatch);
    }

    for (symbol_id, quantity) in symbol_ids.iter().zip(quantities.iter()) {
        let id = slice_to_bytes32(symbol_id.as_slice())?;
        let token = TOKENS
            .may_load(deps.storage, &id)?
            .ok_or_else(|| ContractError::TokenNotFound {
                symbol: symbol_id.to_hex(),
            })?;
        inventory::set_initial(deps.storage, &token.symbol, &id, *quantity)?;
    }

    Ok(Response::new()
        .add_attribute("method", "set_inventory")
        .add_attribute("count", symbol_ids.len().to_string()))
}
