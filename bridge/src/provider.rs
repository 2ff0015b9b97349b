//! Relay providers
//!
//! The set of providers is closed. Each provider has one registered endpoint
//! on this chain, an enable flag and a fee multiplier. Outbound messages go
//! through [`build_send_msg`], the single dispatch point per provider.

use common::relay::RelayExecuteMsg;
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{to_json_binary, Addr, Binary, Coin, CosmosMsg, Order, StdResult, Storage, WasmMsg};
use cw_storage_plus::Map;

use crate::error::ContractError;
use crate::fee_manager::DEFAULT_FEE_MULTIPLIER_BPS;

/// Supported relay providers
#[cw_serde]
#[derive(Copy, Eq)]
pub enum BridgeProvider {
    LayerZero,
    /// Interchain messaging (ICM)
    Icm,
}

impl BridgeProvider {
    pub const ALL: [BridgeProvider; 2] = [BridgeProvider::LayerZero, BridgeProvider::Icm];

    /// Storage key of the provider
    pub fn code(self) -> u8 {
        match self {
            BridgeProvider::LayerZero => 0,
            BridgeProvider::Icm => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BridgeProvider::LayerZero => "layer_zero",
            BridgeProvider::Icm => "icm",
        }
    }
}

impl std::fmt::Display for BridgeProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Endpoint registration of a provider
#[cw_serde]
pub struct ProviderConfig {
    pub provider: BridgeProvider,
    /// Relay endpoint contract on this chain
    pub endpoint: Addr,
    pub enabled: bool,
    /// Multiplier applied to the relay's base fee (10000 = unscaled)
    pub fee_multiplier_bps: u64,
}

impl ProviderConfig {
    pub fn new(provider: BridgeProvider, endpoint: Addr) -> Self {
        Self {
            provider,
            endpoint,
            enabled: true,
            fee_multiplier_bps: DEFAULT_FEE_MULTIPLIER_BPS,
        }
    }
}

// ============================================================================
// Storage
// ============================================================================

/// Registered providers
/// Key: provider code, Value: ProviderConfig
pub const PROVIDERS: Map<u8, ProviderConfig> = Map::new("providers");

pub fn may_load_provider(
    storage: &dyn Storage,
    provider: BridgeProvider,
) -> StdResult<Option<ProviderConfig>> {
    PROVIDERS.may_load(storage, provider.code())
}

/// Load a provider that may be used for outbound messages
pub fn load_enabled_provider(
    storage: &dyn Storage,
    provider: BridgeProvider,
) -> Result<ProviderConfig, ContractError> {
    match may_load_provider(storage, provider)? {
        Some(config) if config.enabled => Ok(config),
        _ => Err(ContractError::ProviderNotEnabled {
            provider: provider.to_string(),
        }),
    }
}

/// Find the provider whose endpoint is `caller`
///
/// Disabled providers still deliver: disabling only stops new outbound traffic.
pub fn provider_for_endpoint(
    storage: &dyn Storage,
    caller: &Addr,
) -> Result<ProviderConfig, ContractError> {
    for item in PROVIDERS.range(storage, None, None, Order::Ascending) {
        let (_, config) = item?;
        if config.endpoint == *caller {
            return Ok(config);
        }
    }
    Err(ContractError::InvalidEndpointCaller {
        caller: caller.to_string(),
    })
}

pub fn all_providers(storage: &dyn Storage) -> StdResult<Vec<ProviderConfig>> {
    PROVIDERS
        .range(storage, None, None, Order::Ascending)
        .map(|item| item.map(|(_, config)| config))
        .collect()
}

// ============================================================================
// Dispatch
// ============================================================================

/// Build the relay message that carries `payload` to `dst_chain_id`
pub fn build_send_msg(
    config: &ProviderConfig,
    dst_chain_id: u32,
    payload: Binary,
    fee: Option<Coin>,
) -> StdResult<CosmosMsg> {
    let funds = fee.into_iter().filter(|c| !c.amount.is_zero()).collect();
    let msg = match config.provider {
        BridgeProvider::LayerZero | BridgeProvider::Icm => RelayExecuteMsg::Send {
            dst_chain_id,
            payload,
        },
    };
    Ok(CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: config.endpoint.to_string(),
        msg: to_json_binary(&msg)?,
        funds,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::testing::mock_dependencies;

    #[test]
    fn test_provider_lookup() {
        let mut deps = mock_dependencies();
        let lz = ProviderConfig::new(BridgeProvider::LayerZero, Addr::unchecked("lz_endpoint"));
        let mut icm = ProviderConfig::new(BridgeProvider::Icm, Addr::unchecked("icm_endpoint"));
        icm.enabled = false;
        PROVIDERS.save(deps.as_mut().storage, 0, &lz).unwrap();
        PROVIDERS.save(deps.as_mut().storage, 1, &icm).unwrap();

        assert_eq!(
            load_enabled_provider(deps.as_ref().storage, BridgeProvider::LayerZero).unwrap(),
            lz
        );
        assert_eq!(
            load_enabled_provider(deps.as_ref().storage, BridgeProvider::Icm).unwrap_err(),
            ContractError::ProviderNotEnabled {
                provider: "icm".to_string()
            }
        );

        // disabled providers still own their endpoint
        let found =
            provider_for_endpoint(deps.as_ref().storage, &Addr::unchecked("icm_endpoint")).unwrap();
        assert_eq!(found.provider, BridgeProvider::Icm);

        let err = provider_for_endpoint(deps.as_ref().storage, &Addr::unchecked("someone"))
            .unwrap_err();
        assert!(matches!(err, ContractError::InvalidEndpointCaller { .. }));
    }

    #[test]
    fn test_send_msg_drops_zero_fee() {
        let lz = ProviderConfig::new(BridgeProvider::LayerZero, Addr::unchecked("lz_endpoint"));
        let msg = build_send_msg(
            &lz,
            43114,
            Binary::from(vec![2u8]),
            Some(Coin::new(0, "uatom")),
        )
        .unwrap();
        match msg {
            CosmosMsg::Wasm(WasmMsg::Execute {
                contract_addr,
                funds,
                ..
            }) => {
                assert_eq!(contract_addr, "lz_endpoint");
                assert!(funds.is_empty());
            }
            other => panic!("unexpected message {:?}", other),
        }
    }
}
