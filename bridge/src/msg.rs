//! Message types for the portfolio bridge contract
//!
//! This module defines all messages for instantiation, execution, and queries.

use common::relay::RelayReceiveMsg;
use common::Xfer;
use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary, Coin, HexBinary, Timestamp, Uint128};

use crate::provider::{BridgeProvider, ProviderConfig};
use crate::state::{AuctionMode, ChainRole, DelayedTransfer, RemoteChain, RiskConfig, TokenDetails};

// ============================================================================
// Instantiate & Migrate
// ============================================================================

/// Migrate message
#[cw_serde]
pub struct MigrateMsg {}

/// Relay endpoint registered at instantiation
#[cw_serde]
pub struct ProviderInit {
    pub provider: BridgeProvider,
    /// Relay endpoint contract address on this chain
    pub endpoint: String,
}

/// Instantiate message
#[cw_serde]
pub struct InstantiateMsg {
    /// Admin address for contract management
    pub admin: String,
    /// Chain id of the chain this contract is deployed on
    pub chain_id: u32,
    pub role: ChainRole,
    /// Ledger contract; receives inbound transfers and holds the portfolio role
    pub ledger: String,
    /// Relay endpoints (all enabled)
    pub providers: Vec<ProviderInit>,
    /// Must be one of `providers`
    pub default_provider: BridgeProvider,
    /// Delayed transfer lock time in seconds (default 1 hour)
    pub delay_period: Option<u64>,
    /// Volume window in seconds (default 24 hours)
    pub epoch_length: Option<u64>,
    /// Outbound wire version (default 2)
    pub xfer_version: Option<u8>,
}

// ============================================================================
// Execute Messages
// ============================================================================

/// Execute messages
#[cw_serde]
pub enum ExecuteMsg {
    // ========================================================================
    // Router
    // ========================================================================
    /// Send a transfer envelope to another chain
    ///
    /// Authorization: portfolio role
    ///
    /// The relay fee must be attached (see `BridgeFee`). `xfer.nonce` and
    /// `xfer.timestamp` are assigned by the bridge.
    SendCrossChainMessage {
        dst_chain_id: u32,
        provider: BridgeProvider,
        xfer: Xfer,
        /// Local address the unused part of the fee is refunded to (default: sender)
        trader: Option<String>,
    },

    /// Inbound payload delivered by a relay endpoint
    RelayReceive(RelayReceiveMsg),

    /// Admin: allow (or with `dst_symbol: None`, forbid) cross-chain trades of
    /// `symbol` to `dst_chain_id`, settling as `dst_symbol` there
    EnableXChainSwapDestination {
        symbol: String,
        dst_chain_id: u32,
        dst_symbol: Option<String>,
    },

    // ========================================================================
    // Delay & Volume Cap
    // ========================================================================
    /// Admin: release a delayed transfer after its lock expired
    ///
    /// Outbound transfers are dispatched; the relay fee must be attached.
    ExecuteDelayedTransfer { id: HexBinary },

    /// Admin: lock time of new delayed transfers
    SetDelayPeriod { seconds: u64 },

    /// Admin: length of the volume window (0 disables caps)
    SetEpochLength { seconds: u64 },

    /// Admin: per-symbol delay thresholds (0 disables the delay)
    SetDelayThresholds {
        symbols: Vec<String>,
        thresholds: Vec<Uint128>,
    },

    /// Admin: per-symbol volume caps (0 disables the cap)
    SetEpochVolumeCaps {
        symbols: Vec<String>,
        caps: Vec<Uint128>,
    },

    // ========================================================================
    // Recovery
    // ========================================================================
    /// Admin: replay a payload the relay stored after a failed delivery
    RecoverPayload { src_chain_id: u32, payload: Binary },

    // ========================================================================
    // Token Registry
    // ========================================================================
    /// Admin: register a token on its origin chain (no-op if already registered)
    AddToken {
        symbol: String,
        chain_id: u32,
        decimals: u8,
        /// Custody address on the origin chain (None = native coin)
        custody: Option<String>,
        auction_mode: Option<AuctionMode>,
    },

    /// Admin (paused only): remove a token (no-op for native coins and unknown tokens)
    RemoveToken { symbol: String, chain_id: u32 },

    /// Admin: update the auction mode of a token
    SetAuctionMode {
        symbol: String,
        chain_id: u32,
        mode: AuctionMode,
    },

    // ========================================================================
    // Inventory
    // ========================================================================
    /// Admin: seed inventory of registered tokens
    SetInventory {
        symbol_ids: Vec<HexBinary>,
        quantities: Vec<Uint128>,
    },

    // ========================================================================
    // Providers & Remotes
    // ========================================================================
    /// Admin: register or move the endpoint of a provider
    SetProvider {
        provider: BridgeProvider,
        endpoint: String,
    },

    /// Admin: enable or disable outbound traffic through a provider
    EnableProvider {
        provider: BridgeProvider,
        enabled: bool,
    },

    /// Admin: provider that can never be disabled
    SetDefaultProvider { provider: BridgeProvider },

    /// Admin: scale the relay fee of a provider (10000 = unscaled)
    SetProviderFeeMultiplier {
        provider: BridgeProvider,
        multiplier_bps: u64,
    },

    /// Admin: trusted bridge address on a remote chain
    SetRemoteChain {
        chain_id: u32,
        bridge_address: String,
    },

    /// Admin: wire version used for outbound payloads
    SetXferVersion { version: u8 },

    // ========================================================================
    // Roles
    // ========================================================================
    /// Admin: ledger contract that receives inbound transfers
    SetLedger { address: String },

    /// Admin: grant the portfolio role
    AddPortfolio { address: String },

    /// Admin: revoke the portfolio role
    RemovePortfolio { address: String },

    // ========================================================================
    // Admin Operations
    // ========================================================================
    /// Pause the bridge (admin only)
    Pause {},

    /// Unpause the bridge (admin only)
    Unpause {},

    /// Initiate admin transfer with 7-day timelock
    ProposeAdmin { new_admin: String },

    /// Complete admin transfer after timelock (pending admin only)
    AcceptAdmin {},

    /// Cancel pending admin proposal (admin only)
    CancelAdminProposal {},
}

// ============================================================================
// Query Messages
// ============================================================================

/// Query messages
#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    // ========================================================================
    // Core Queries
    // ========================================================================
    /// Returns contract configuration
    #[returns(ConfigResponse)]
    Config {},

    /// Returns pending admin proposal details
    #[returns(Option<PendingAdminResponse>)]
    PendingAdmin {},

    /// Whether an address holds the portfolio role
    #[returns(bool)]
    IsPortfolio { address: String },

    // ========================================================================
    // Registry & Inventory
    // ========================================================================
    /// Token record by symbol id; zero-valued if unknown
    #[returns(TokenDetails)]
    TokenDetails { symbol_id: HexBinary },

    /// Token record by symbol and origin chain; zero-valued if unknown
    #[returns(TokenDetails)]
    TokenDetailsBySymbol { symbol: String, chain_id: u32 },

    /// All token records, ordered by symbol id
    #[returns(TokensResponse)]
    Tokens {
        start_after: Option<HexBinary>,
        limit: Option<u32>,
    },

    #[returns(InventoryResponse)]
    Inventory { symbol: String, symbol_id: HexBinary },

    /// Inventory of a symbol on every origin chain
    #[returns(InventoryBySymbolResponse)]
    InventoryBySymbol { symbol: String },

    // ========================================================================
    // Delay & Volume Cap
    // ========================================================================
    #[returns(RiskConfig)]
    RiskConfig {},

    /// Delay threshold and volume cap of a symbol
    #[returns(ThresholdsResponse)]
    Thresholds { symbol: String },

    #[returns(EpochVolumeResponse)]
    EpochVolume { symbol: String },

    #[returns(Option<DelayedTransfer>)]
    DelayedTransfer { id: HexBinary },

    #[returns(DelayedTransfersResponse)]
    DelayedTransfers {
        start_after: Option<HexBinary>,
        limit: Option<u32>,
    },

    // ========================================================================
    // Router
    // ========================================================================
    /// Relay fee for one message to `dst_chain_id`, multiplier applied
    #[returns(BridgeFeeResponse)]
    BridgeFee {
        provider: BridgeProvider,
        dst_chain_id: u32,
    },

    #[returns(ProvidersResponse)]
    Providers {},

    #[returns(Option<RemoteChain>)]
    RemoteChain { chain_id: u32 },

    #[returns(XChainSwapDestinationResponse)]
    XChainSwapDestination { symbol: String, dst_chain_id: u32 },

    /// Last outbound nonce to and last inbound nonce from a chain
    #[returns(NoncesResponse)]
    Nonces { chain_id: u32 },
}

// ============================================================================
// Response Types
// ============================================================================

#[cw_serde]
pub struct ConfigResponse {
    pub admin: Addr,
    pub paused: bool,
    pub chain_id: u32,
    pub role: ChainRole,
    pub ledger: Addr,
    pub default_provider: BridgeProvider,
    pub xfer_version: u8,
}

#[cw_serde]
pub struct PendingAdminResponse {
    pub new_address: Addr,
    pub execute_after: Timestamp,
}

#[cw_serde]
pub struct TokensResponse {
    pub tokens: Vec<TokenDetails>,
}

#[cw_serde]
pub struct InventoryResponse {
    pub symbol: String,
    pub symbol_id: HexBinary,
    pub quantity: Uint128,
}

#[cw_serde]
pub struct InventoryBySymbolResponse {
    pub symbol: String,
    pub entries: Vec<InventoryResponse>,
}

#[cw_serde]
pub struct ThresholdsResponse {
    pub symbol: String,
    pub delay_threshold: Uint128,
    pub epoch_volume_cap: Uint128,
}

#[cw_serde]
pub struct EpochVolumeResponse {
    pub symbol: String,
    pub accumulated: Uint128,
    /// None if the symbol never had a capped transfer
    pub epoch_start: Option<Timestamp>,
}

#[cw_serde]
pub struct DelayedTransfersResponse {
    pub transfers: Vec<DelayedTransfer>,
}

#[cw_serde]
pub struct BridgeFeeResponse {
    pub fee: Coin,
    pub payload_size: u64,
}

#[cw_serde]
pub struct ProvidersResponse {
    pub providers: Vec<ProviderConfig>,
}

#[cw_serde]
pub struct XChainSwapDestinationResponse {
    pub symbol: String,
    pub dst_chain_id: u32,
    pub dst_symbol: Option<String>,
}

#[cw_serde]
pub struct NoncesResponse {
    pub chain_id: u32,
    pub outbound: u64,
    pub last_inbound: u64,
}
