//! Shared multi-chain setup for the integration tests.
//!
//! All chains live in one `App`. Each chain has a bridge, one relay endpoint
//! per provider and a mock ledger. `TestEnv::relay` plays the off-chain
//! relayer: it moves queued packets from every endpoint to the endpoint of the
//! same provider on the destination chain.

#![allow(dead_code)]

use std::collections::HashMap;

use common::{Tx, Xfer};
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{
    coins, to_json_binary, Addr, Binary, Deps, DepsMut, Empty, Env, HexBinary, MessageInfo,
    Response, StdError, StdResult, Uint128,
};
use cw_multi_test::{App, AppResponse, Contract, ContractWrapper, Executor};
use cw_storage_plus::Item;

use portfolio_bridge::msg::{
    BridgeFeeResponse, ExecuteMsg, InstantiateMsg, InventoryResponse, ProviderInit, QueryMsg,
};
use portfolio_bridge::state::{ChainRole, DelayedTransfer};
use portfolio_bridge::{compute_symbol_id, BridgeProvider};
use relay_endpoint::msg::{
    ExecuteMsg as EndpointExecuteMsg, InstantiateMsg as EndpointInstantiateMsg, OutboxResponse,
    QueryMsg as EndpointQueryMsg,
};

pub const ADMIN: &str = "admin";
pub const RELAYER: &str = "relayer";
pub const FEE_DENOM: &str = "ufee";
pub const BASE_FEE: u128 = 1_000;
pub const FEE_PER_BYTE: u128 = 10;
/// Relay fee of a version 2 payload (129 bytes)
pub const PACKED_FEE: u128 = BASE_FEE + 129 * FEE_PER_BYTE;

pub const HUB_ID: u32 = 432204;
pub const AVAX_ID: u32 = 43114;
pub const ARB_ID: u32 = 42161;

/// 10^18
pub const ONE: u128 = 1_000_000_000_000_000_000;

// ============================================================================
// Mock Ledger
// ============================================================================

#[cw_serde]
pub struct Received {
    pub src_chain_id: u32,
    pub xfer: Xfer,
}

#[cw_serde]
pub enum LedgerExecuteMsg {
    ProcessXferPayload { xfer: Xfer, src_chain_id: u32 },
    /// Reject every transfer while set
    SetFailing { failing: bool },
}

#[cw_serde]
pub enum LedgerQueryMsg {
    Received {},
}

const RECEIVED: Item<Vec<Received>> = Item::new("received");
const FAILING: Item<bool> = Item::new("failing");

fn ledger_instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    _msg: Empty,
) -> StdResult<Response> {
    RECEIVED.save(deps.storage, &vec![])?;
    FAILING.save(deps.storage, &false)?;
    Ok(Response::new())
}

fn ledger_execute(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: LedgerExecuteMsg,
) -> StdResult<Response> {
    match msg {
        LedgerExecuteMsg::ProcessXferPayload { xfer, src_chain_id } => {
            if FAILING.load(deps.storage)? {
                return Err(StdError::generic_err("ledger rejected transfer"));
            }
            let mut received = RECEIVED.load(deps.storage)?;
            received.push(Received { src_chain_id, xfer });
            RECEIVED.save(deps.storage, &received)?;
        }
        LedgerExecuteMsg::SetFailing { failing } => FAILING.save(deps.storage, &failing)?,
    }
    Ok(Response::new())
}

fn ledger_query(deps: Deps, _env: Env, msg: LedgerQueryMsg) -> StdResult<Binary> {
    match msg {
        LedgerQueryMsg::Received {} => to_json_binary(&RECEIVED.load(deps.storage)?),
    }
}

// ============================================================================
// Contracts
// ============================================================================

fn contract_bridge() -> Box<dyn Contract<Empty>> {
    let contract = ContractWrapper::new(
        portfolio_bridge::contract::execute,
        portfolio_bridge::contract::instantiate,
        portfolio_bridge::contract::query,
    );
    Box::new(contract)
}

fn contract_endpoint() -> Box<dyn Contract<Empty>> {
    let contract = ContractWrapper::new(
        relay_endpoint::contract::execute,
        relay_endpoint::contract::instantiate,
        relay_endpoint::contract::query,
    )
    .with_reply(relay_endpoint::contract::reply);
    Box::new(contract)
}

fn contract_ledger() -> Box<dyn Contract<Empty>> {
    Box::new(ContractWrapper::new(
        ledger_execute,
        ledger_instantiate,
        ledger_query,
    ))
}

// ============================================================================
// Environment
// ============================================================================

pub struct Chain {
    pub chain_id: u32,
    pub bridge: Addr,
    pub ledger: Addr,
    /// Account holding the portfolio role
    pub portfolio: Addr,
    pub endpoints: Vec<(BridgeProvider, Addr)>,
}

impl Chain {
    pub fn endpoint(&self, provider: BridgeProvider) -> &Addr {
        self.endpoints
            .iter()
            .find(|(p, _)| *p == provider)
            .map(|(_, addr)| addr)
            .expect("endpoint for provider")
    }
}

pub struct TestEnv {
    pub app: App,
    pub hub: Chain,
    pub avax: Chain,
    pub arb: Chain,
    /// Last outbox packet relayed per endpoint
    relayed: HashMap<Addr, u64>,
}

pub fn admin() -> Addr {
    Addr::unchecked(ADMIN)
}

pub fn trader(byte: u8) -> Binary {
    Binary::from(vec![byte; 32])
}

pub fn xfer(transaction: Tx, symbol: &str, quantity: u128) -> Xfer {
    Xfer {
        nonce: 0,
        transaction,
        trader: trader(7),
        symbol: symbol.to_string(),
        quantity: Uint128::new(quantity),
        timestamp: 0,
        custom_data: Binary::default(),
    }
}

pub fn symbol_id(symbol: &str, chain_id: u32) -> HexBinary {
    HexBinary::from(compute_symbol_id(symbol, chain_id).unwrap().to_vec())
}

fn deploy_chain(
    app: &mut App,
    codes: (u64, u64, u64),
    chain_id: u32,
    role: ChainRole,
    name: &str,
) -> Chain {
    let (bridge_code, endpoint_code, ledger_code) = codes;
    let admin = admin();
    let portfolio = Addr::unchecked(format!("{}portfolio", name));

    app.init_modules(|router, _, storage| {
        router
            .bank
            .init_balance(storage, &portfolio, coins(1_000_000_000, FEE_DENOM))
            .unwrap();
    });

    let mut endpoints = vec![];
    for provider in BridgeProvider::ALL {
        let endpoint = app
            .instantiate_contract(
                endpoint_code,
                admin.clone(),
                &EndpointInstantiateMsg {
                    admin: RELAYER.to_string(),
                    chain_id,
                    fee_denom: FEE_DENOM.to_string(),
                    base_fee: Uint128::new(BASE_FEE),
                    fee_per_byte: Uint128::new(FEE_PER_BYTE),
                },
                &[],
                format!("{}-{}", name, provider),
                None,
            )
            .unwrap();
        endpoints.push((provider, endpoint));
    }

    let ledger = app
        .instantiate_contract(
            ledger_code,
            admin.clone(),
            &Empty {},
            &[],
            format!("{}-ledger", name),
            None,
        )
        .unwrap();

    let bridge = app
        .instantiate_contract(
            bridge_code,
            admin.clone(),
            &InstantiateMsg {
                admin: ADMIN.to_string(),
                chain_id,
                role,
                ledger: ledger.to_string(),
                providers: endpoints
                    .iter()
                    .map(|(provider, endpoint)| ProviderInit {
                        provider: *provider,
                        endpoint: endpoint.to_string(),
                    })
                    .collect(),
                default_provider: BridgeProvider::LayerZero,
                delay_period: Some(600),
                epoch_length: Some(1_000),
                xfer_version: None,
            },
            &[],
            format!("{}-bridge", name),
            Some(ADMIN.to_string()),
        )
        .unwrap();

    app.execute_contract(
        admin,
        bridge.clone(),
        &ExecuteMsg::AddPortfolio {
            address: portfolio.to_string(),
        },
        &[],
    )
    .unwrap();

    Chain {
        chain_id,
        bridge,
        ledger,
        portfolio,
        endpoints,
    }
}

/// Hub with two spokes (AVAX, ARB), peered with each other, and a small registry:
/// - hub: AVAX@AVAX (native), USDC@AVAX, ETH@ARB (native), USDC@ARB
/// - avax spoke: AVAX@AVAX (native), USDC@AVAX
/// - arb spoke: ETH@ARB (native), USDC@ARB
pub fn setup() -> TestEnv {
    let mut app = App::new(|router, _, storage| {
        // the admin pays relay fees when releasing delayed outbound transfers
        router
            .bank
            .init_balance(storage, &admin(), coins(1_000_000_000, FEE_DENOM))
            .unwrap();
    });
    let codes = (
        app.store_code(contract_bridge()),
        app.store_code(contract_endpoint()),
        app.store_code(contract_ledger()),
    );

    let hub = deploy_chain(&mut app, codes, HUB_ID, ChainRole::Hub, "hub");
    let avax = deploy_chain(&mut app, codes, AVAX_ID, ChainRole::Spoke, "avax");
    let arb = deploy_chain(&mut app, codes, ARB_ID, ChainRole::Spoke, "arb");

    let mut env = TestEnv {
        app,
        hub,
        avax,
        arb,
        relayed: HashMap::new(),
    };

    let peers = [
        (env.hub.bridge.clone(), AVAX_ID, env.avax.bridge.clone()),
        (env.hub.bridge.clone(), ARB_ID, env.arb.bridge.clone()),
        (env.avax.bridge.clone(), HUB_ID, env.hub.bridge.clone()),
        (env.avax.bridge.clone(), ARB_ID, env.arb.bridge.clone()),
        (env.arb.bridge.clone(), HUB_ID, env.hub.bridge.clone()),
        (env.arb.bridge.clone(), AVAX_ID, env.avax.bridge.clone()),
    ];
    for (bridge, chain_id, remote) in peers {
        env.admin_exec(
            &bridge,
            ExecuteMsg::SetRemoteChain {
                chain_id,
                bridge_address: remote.to_string(),
            },
        )
        .unwrap();
    }

    let hub = env.hub.bridge.clone();
    let avax = env.avax.bridge.clone();
    let arb = env.arb.bridge.clone();
    let tokens = [
        (&hub, "AVAX", AVAX_ID, None),
        (&hub, "USDC", AVAX_ID, Some("0xusdcavax")),
        (&hub, "ETH", ARB_ID, None),
        (&hub, "USDC", ARB_ID, Some("0xusdcarb")),
        (&avax, "AVAX", AVAX_ID, None),
        (&avax, "USDC", AVAX_ID, Some("0xusdcavax")),
        (&arb, "ETH", ARB_ID, None),
        (&arb, "USDC", ARB_ID, Some("0xusdcarb")),
    ];
    for (bridge, symbol, chain_id, custody) in tokens {
        let decimals = if symbol == "USDC" { 6 } else { 18 };
        env.admin_exec(
            bridge,
            ExecuteMsg::AddToken {
                symbol: symbol.to_string(),
                chain_id,
                decimals,
                custody: custody.map(str::to_string),
                auction_mode: None,
            },
        )
        .unwrap();
    }

    env
}

impl TestEnv {
    pub fn admin_exec(&mut self, bridge: &Addr, msg: ExecuteMsg) -> Result<AppResponse, String> {
        self.app
            .execute_contract(admin(), bridge.clone(), &msg, &[])
            .map_err(|e| e.root_cause().to_string())
    }

    pub fn chain(&self, chain_id: u32) -> &Chain {
        match chain_id {
            HUB_ID => &self.hub,
            AVAX_ID => &self.avax,
            ARB_ID => &self.arb,
            _ => panic!("unknown chain {}", chain_id),
        }
    }

    pub fn bridge_fee(&self, from: u32, provider: BridgeProvider, dst_chain_id: u32) -> u128 {
        let res: BridgeFeeResponse = self
            .app
            .wrap()
            .query_wasm_smart(
                &self.chain(from).bridge,
                &QueryMsg::BridgeFee {
                    provider,
                    dst_chain_id,
                },
            )
            .unwrap();
        res.fee.amount.u128()
    }

    /// Portfolio of `from` sends `xfer` to `dst_chain_id`, paying the quoted fee
    pub fn send(&mut self, from: u32, dst_chain_id: u32, xfer: Xfer) -> Result<AppResponse, String> {
        self.send_via(from, dst_chain_id, BridgeProvider::LayerZero, xfer)
    }

    pub fn send_via(
        &mut self,
        from: u32,
        dst_chain_id: u32,
        provider: BridgeProvider,
        xfer: Xfer,
    ) -> Result<AppResponse, String> {
        let fee = self.bridge_fee(from, provider, dst_chain_id);
        let chain = self.chain(from);
        let (portfolio, bridge) = (chain.portfolio.clone(), chain.bridge.clone());
        self.app
            .execute_contract(
                portfolio,
                bridge,
                &ExecuteMsg::SendCrossChainMessage {
                    dst_chain_id,
                    provider,
                    xfer,
                    trader: None,
                },
                &coins(fee, FEE_DENOM),
            )
            .map_err(|e| e.root_cause().to_string())
    }

    /// Deliver every queued packet; returns the delivery responses in order
    pub fn relay(&mut self) -> Vec<AppResponse> {
        let mut responses = vec![];
        for src in [HUB_ID, AVAX_ID, ARB_ID] {
            let endpoints = self.chain(src).endpoints.clone();
            for (provider, endpoint) in endpoints {
                let last = self.relayed.get(&endpoint).copied();
                let outbox: OutboxResponse = self
                    .app
                    .wrap()
                    .query_wasm_smart(
                        &endpoint,
                        &EndpointQueryMsg::Outbox {
                            start_after: last,
                            limit: None,
                        },
                    )
                    .unwrap();

                for packet in outbox.packets {
                    let dst = self.chain(packet.dst_chain_id);
                    let dst_endpoint = dst.endpoint(provider).clone();
                    let dst_bridge = dst.bridge.clone();
                    let res = self
                        .app
                        .execute_contract(
                            Addr::unchecked(RELAYER),
                            dst_endpoint,
                            &EndpointExecuteMsg::Deliver {
                                src_chain_id: packet.src_chain_id,
                                src_address: packet.src_address.clone(),
                                dst_address: dst_bridge.to_string(),
                                nonce: packet.nonce,
                                payload: packet.payload.clone(),
                            },
                            &[],
                        )
                        .unwrap();
                    self.relayed.insert(endpoint.clone(), packet.id);
                    responses.push(res);
                }
            }
        }
        responses
    }

    /// Outbox packets of a chain's endpoint that were not relayed yet
    pub fn pending_packets(&self, chain_id: u32, provider: BridgeProvider) -> OutboxResponse {
        let endpoint = self.chain(chain_id).endpoint(provider);
        self.app
            .wrap()
            .query_wasm_smart(
                endpoint,
                &EndpointQueryMsg::Outbox {
                    start_after: self.relayed.get(endpoint).copied(),
                    limit: None,
                },
            )
            .unwrap()
    }

    pub fn block_next_delivery(&mut self, chain_id: u32, provider: BridgeProvider) {
        let endpoint = self.chain(chain_id).endpoint(provider).clone();
        self.app
            .execute_contract(
                Addr::unchecked(RELAYER),
                endpoint,
                &EndpointExecuteMsg::BlockNextMessage {},
                &[],
            )
            .unwrap();
    }

    pub fn set_ledger_failing(&mut self, chain_id: u32, failing: bool) {
        let ledger = self.chain(chain_id).ledger.clone();
        self.app
            .execute_contract(admin(), ledger, &LedgerExecuteMsg::SetFailing { failing }, &[])
            .unwrap();
    }

    pub fn ledger_received(&self, chain_id: u32) -> Vec<Received> {
        self.app
            .wrap()
            .query_wasm_smart(&self.chain(chain_id).ledger, &LedgerQueryMsg::Received {})
            .unwrap()
    }

    /// Hub inventory of `symbol` whose custody is on `chain_id`
    pub fn inventory(&self, symbol: &str, chain_id: u32) -> u128 {
        let res: InventoryResponse = self
            .app
            .wrap()
            .query_wasm_smart(
                &self.hub.bridge,
                &QueryMsg::Inventory {
                    symbol: symbol.to_string(),
                    symbol_id: symbol_id(symbol, chain_id),
                },
            )
            .unwrap();
        res.quantity.u128()
    }

    pub fn set_risk(&mut self, chain_id: u32, symbol: &str, threshold: u128, cap: u128) {
        let bridge = self.chain(chain_id).bridge.clone();
        self.admin_exec(
            &bridge,
            ExecuteMsg::SetDelayThresholds {
                symbols: vec![symbol.to_string()],
                thresholds: vec![Uint128::new(threshold)],
            },
        )
        .unwrap();
        self.admin_exec(
            &bridge,
            ExecuteMsg::SetEpochVolumeCaps {
                symbols: vec![symbol.to_string()],
                caps: vec![Uint128::new(cap)],
            },
        )
        .unwrap();
    }

    pub fn delayed_transfers(&self, chain_id: u32) -> Vec<DelayedTransfer> {
        let res: portfolio_bridge::msg::DelayedTransfersResponse = self
            .app
            .wrap()
            .query_wasm_smart(
                &self.chain(chain_id).bridge,
                &QueryMsg::DelayedTransfers {
                    start_after: None,
                    limit: None,
                },
            )
            .unwrap();
        res.transfers
    }

    /// Admin releases a delayed transfer, attaching `fee`
    pub fn execute_delayed(
        &mut self,
        chain_id: u32,
        id: HexBinary,
        fee: u128,
    ) -> Result<AppResponse, String> {
        let bridge = self.chain(chain_id).bridge.clone();
        let funds = if fee == 0 { vec![] } else { coins(fee, FEE_DENOM) };
        self.app
            .execute_contract(
                admin(),
                bridge,
                &ExecuteMsg::ExecuteDelayedTransfer { id },
                &funds,
            )
            .map_err(|e| e.root_cause().to_string())
    }

    pub fn advance(&mut self, seconds: u64) {
        self.app.update_block(|block| {
            block.time = block.time.plus_seconds(seconds);
            block.height += seconds / 5;
        });
    }

    pub fn fee_balance(&self, addr: &Addr) -> u128 {
        self.app
            .wrap()
            .query_balance(addr, FEE_DENOM)
            .unwrap()
            .amount
            .u128()
    }

    /// Deposit `quantity` of `symbol` from a spoke to the hub and relay it
    pub fn deposit(&mut self, spoke: u32, symbol: &str, quantity: u128) {
        self.send(spoke, HUB_ID, xfer(Tx::Deposit, symbol, quantity))
            .unwrap();
        self.relay();
    }
}

/// Whether any event of a response carries `key=value`
pub fn has_attr(res: &AppResponse, key: &str, value: &str) -> bool {
    res.events
        .iter()
        .flat_map(|e| e.attributes.iter())
        .any(|a| a.key == key && a.value == value)
}

/// First value of an attribute across all events of a response
pub fn attr(res: &AppResponse, key: &str) -> Option<String> {
    res.events
        .iter()
        .flat_map(|e| e.attributes.iter())
        .find(|a| a.key == key)
        .map(|a| a.value.clone())
}
