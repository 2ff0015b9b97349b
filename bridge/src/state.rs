//! State definitions for the portfolio bridge contract
//!
//! This module defines the storage structures for the registry, the risk
//! controller and the router. Inventory and provider state live next to the
//! logic that owns them (`inventory.rs`, `provider.rs`).

use common::Xfer;
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, HexBinary, Timestamp, Uint128};
use cw_storage_plus::{Item, Map};

use crate::provider::BridgeProvider;

// ============================================================================
// Core Configuration
// ============================================================================

/// Which side of the hub-and-spoke topology this deployment serves
#[cw_serde]
#[derive(Copy, Eq)]
pub enum ChainRole {
    /// Holds authoritative balances and tracks spoke inventory
    Hub,
    /// Holds custody and forwards deposit/withdraw intents to the hub
    Spoke,
}

impl ChainRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChainRole::Hub => "hub",
            ChainRole::Spoke => "spoke",
        }
    }
}

/// Contract configuration
#[cw_serde]
pub struct Config {
    /// Admin address for contract management
    pub admin: Addr,
    /// Whether the bridge is currently paused
    pub paused: bool,
    /// Chain id of the chain this contract is deployed on
    pub chain_id: u32,
    pub role: ChainRole,
    /// Ledger (portfolio) contract that receives inbound transfers
    pub ledger: Addr,
    /// Provider that can never be disabled
    pub default_provider: BridgeProvider,
    /// Wire version used for outbound payloads
    pub xfer_version: u8,
}

/// Pending admin change proposal
#[cw_serde]
pub struct PendingAdmin {
    /// Proposed new admin address
    pub new_address: Addr,
    /// Block time when the change can be executed
    pub execute_after: Timestamp,
}

/// Global delay and epoch settings
#[cw_serde]
pub struct RiskConfig {
    /// Seconds a delayed transfer stays locked
    pub delay_period: u64,
    /// Length of the rolling volume window in seconds (0 = caps disabled)
    pub epoch_length: u64,
}

// ============================================================================
// Token Identity Registry
// ============================================================================

/// Auction state of a token, kept for the ledger
#[cw_serde]
#[derive(Copy, Eq)]
pub enum AuctionMode {
    Off,
    Live,
    Open,
    Closing,
    Paused,
    Matching,
    Restricted,
}

/// Chain-scoped token identity
#[cw_serde]
pub struct TokenDetails {
    pub symbol: String,
    /// Chain the token originates from (where its custody lives)
    pub origin_chain_id: u32,
    pub decimals: u8,
    /// Custody address on the origin chain (None = native coin)
    pub custody: Option<String>,
    pub auction_mode: AuctionMode,
    /// keccak256(symbol ‖ origin_chain_id), the registry key
    pub symbol_id: HexBinary,
}

impl TokenDetails {
    /// Zero-valued record returned for unknown symbol ids
    pub fn empty() -> Self {
        Self {
            symbol: String::new(),
            origin_chain_id: 0,
            decimals: 0,
            custody: None,
            auction_mode: AuctionMode::Off,
            symbol_id: HexBinary::from(vec![0u8; 32]),
        }
    }

    pub fn is_native(&self) -> bool {
        self.custody.is_none()
    }
}

// ============================================================================
// Router State
// ============================================================================

/// Peer bridge on a remote chain
#[cw_serde]
pub struct RemoteChain {
    pub chain_id: u32,
    /// Address of the bridge contract on the remote chain, as the relay reports it
    pub bridge_address: String,
}

// ============================================================================
// Delay & Volume-Cap State
// ============================================================================

/// Rolling volume window for a symbol
#[cw_serde]
pub struct EpochVolume {
    /// Volume admitted in the current window
    pub accumulated: Uint128,
    /// Timestamp when the current window started
    pub epoch_start: Timestamp,
}

/// Leg of a transfer held by the delay controller
#[cw_serde]
pub enum TransferDirection {
    /// Waiting to be dispatched to `dst_chain_id`
    Outbound {
        dst_chain_id: u32,
        provider: BridgeProvider,
    },
    /// Received from `src_chain_id`, waiting to be applied locally
    Inbound {
        src_chain_id: u32,
        provider: BridgeProvider,
    },
}

impl TransferDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferDirection::Outbound { .. } => "outbound",
            TransferDirection::Inbound { .. } => "inbound",
        }
    }

    pub fn chain_id(&self) -> u32 {
        match self {
            TransferDirection::Outbound { dst_chain_id, .. } => *dst_chain_id,
            TransferDirection::Inbound { src_chain_id, .. } => *src_chain_id,
        }
    }

    pub fn provider(&self) -> BridgeProvider {
        match self {
            TransferDirection::Outbound { provider, .. }
            | TransferDirection::Inbound { provider, .. } => *provider,
        }
    }
}

/// Transfer held back because its quantity is above the symbol's delay threshold
///
/// `xfer.symbol` is the chain-local symbol. Outbound records keep the envelope
/// as submitted; inbound records keep the decoded envelope.
#[cw_serde]
pub struct DelayedTransfer {
    pub id: HexBinary,
    pub direction: TransferDirection,
    pub xfer: Xfer,
    /// Block time after which the transfer can be executed
    pub ready_at: Timestamp,
    pub created_at: Timestamp,
}

// ============================================================================
// Constants
// ============================================================================

/// Contract name for cw2 migration info
pub const CONTRACT_NAME: &str = "crates.io:portfolio-bridge";

/// Contract version for cw2 migration info
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// 7 days in seconds for admin change timelock
pub const ADMIN_TIMELOCK_DURATION: u64 = 604_800;

/// Default lock time of a delayed transfer (1 hour)
pub const DEFAULT_DELAY_PERIOD: u64 = 3_600;

/// Upper bound for the delay period (7 days)
pub const MAX_DELAY_PERIOD: u64 = 604_800;

/// Default volume window (24 hours)
pub const DEFAULT_EPOCH_LENGTH: u64 = 86_400;

/// Current outbound wire version
pub const DEFAULT_XFER_VERSION: u8 = 2;

// ============================================================================
// Core State Storage
// ============================================================================

/// Primary config storage
pub const CONFIG: Item<Config> = Item::new("config");

/// Pending admin proposal (if any)
pub const PENDING_ADMIN: Item<PendingAdmin> = Item::new("pending_admin");

/// Delay period and epoch length
pub const RISK_CONFIG: Item<RiskConfig> = Item::new("risk_config");

/// Contracts allowed to send cross-chain messages (the ledger and its helpers)
/// Key: portfolio address, Value: whether active
pub const PORTFOLIOS: Map<&Addr, bool> = Map::new("portfolios");

// ============================================================================
// Registry Storage
// ============================================================================

/// Token records
/// Key: 32-byte symbol id, Value: TokenDetails
pub const TOKENS: Map<&[u8], TokenDetails> = Map::new("tokens");

/// Native coin record per chain
/// Key: origin chain id, Value: symbol of the native coin
pub const NATIVE_TOKENS: Map<u32, String> = Map::new("native_tokens");

// ============================================================================
// Router Storage
// ============================================================================

/// Peer bridges
/// Key: remote chain id, Value: RemoteChain
pub const REMOTE_CHAINS: Map<u32, RemoteChain> = Map::new("remote_chains");

/// Last outbound nonce per destination chain (0 = nothing sent yet)
pub const OUTBOUND_NONCES: Map<u32, u64> = Map::new("outbound_nonces");

/// Last inbound nonce seen per source chain (informational)
pub const INBOUND_NONCES: Map<u32, u64> = Map::new("inbound_nonces");

/// Cross-chain trade allow-list
/// Key: (local symbol, destination chain id), Value: symbol on the destination chain
pub const XCHAIN_DESTINATIONS: Map<(&str, u32), String> = Map::new("xchain_destinations");

// ============================================================================
// Delay & Volume-Cap Storage
// ============================================================================

/// Per-symbol delay thresholds (0 = never delay)
pub const DELAY_THRESHOLDS: Map<&str, Uint128> = Map::new("delay_thresholds");

/// Per-symbol epoch volume caps (0 = uncapped)
pub const EPOCH_VOLUME_CAPS: Map<&str, Uint128> = Map::new("epoch_volume_caps");

/// Per-symbol rolling volume windows
pub const EPOCH_VOLUMES: Map<&str, EpochVolume> = Map::new("epoch_volumes");

/// Delayed transfers
/// Key: 32-byte delayed transfer id, Value: DelayedTransfer
pub const DELAYED_TRANSFERS: Map<&[u8], DelayedTransfer> = Map::new("delayed_transfers");
