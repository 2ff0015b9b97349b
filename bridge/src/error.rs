//! Error types for the portfolio bridge contract
//!
//! Every failure a caller can script around carries a stable code at the start
//! of its message (`PB-` router/controller, `IM-` inventory, `P-` shared).

use cosmwasm_std::{StdError, Uint128};
use thiserror::Error;

use crate::codec::CodecError;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Codec(#[from] CodecError),

    // ========================================================================
    // Authorization Errors
    // ========================================================================

    #[error("Unauthorized: only admin can perform this action")]
    Unauthorized,

    #[error("Unauthorized: caller does not hold the portfolio role")]
    UnauthorizedPortfolio,

    #[error("Unauthorized: only pending admin can accept")]
    UnauthorizedPendingAdmin,

    #[error("PB-IVEC-01: invalid endpoint caller {caller}")]
    InvalidEndpointCaller { caller: String },

    #[error("PB-IVSR-01: untrusted source {src_address} on chain {src_chain_id}")]
    UntrustedSource {
        src_chain_id: u32,
        src_address: String,
    },

    // ========================================================================
    // Admin Errors
    // ========================================================================

    #[error("No pending admin change")]
    NoPendingAdmin,

    #[error("Timelock not expired: {remaining_seconds} seconds remaining")]
    TimelockNotExpired { remaining_seconds: u64 },

    // ========================================================================
    // Bridge State Errors
    // ========================================================================

    #[error("P-NOTPAUSED: bridge is paused")]
    BridgePaused,

    #[error("P-ONLYPAUSED: operation requires the bridge to be paused")]
    BridgeNotPaused,

    #[error("PB-RCNS-01: remote chain {chain_id} not set")]
    RemoteChainNotSet { chain_id: u32 },

    #[error("Invalid chain ID: {chain_id}")]
    InvalidChainId { chain_id: u32 },

    // ========================================================================
    // Registry Errors
    // ========================================================================

    #[error("P-ETNS-02: token {symbol} not registered")]
    TokenNotFound { symbol: String },

    #[error("IM-SMEB-01: symbol must be 1 to 32 bytes")]
    InvalidSymbol,

    #[error("PB-NTAE-01: chain {chain_id} already has native coin {symbol}")]
    NativeTokenExists { chain_id: u32, symbol: String },

    #[error("IM-NZIV-01: inventory of {symbol} is not zero")]
    InventoryNotZero { symbol: String },

    // ========================================================================
    // Inventory Errors
    // ========================================================================

    #[error("IM-INVT-02: insufficient inventory for {symbol}: available {available}, requested {requested}")]
    InsufficientInventory {
        symbol: String,
        available: Uint128,
        requested: Uint128,
    },

    #[error("IM-SIAE-01: inventory for symbol id already set")]
    InventoryAlreadySet,

    #[error("IM-LENM-01: length mismatch")]
    InventoryLengthMismatch,

    // ========================================================================
    // Provider & Fee Errors
    // ========================================================================

    #[error("PB-RBNE-01: bridge provider {provider} not enabled")]
    ProviderNotEnabled { provider: String },

    #[error("PB-DBCD-01: default bridge provider cannot be disabled")]
    DefaultProviderDisable,

    #[error("PB-IFEE-01: insufficient fee: expected {expected}, got {got}")]
    InsufficientFee { expected: Uint128, got: Uint128 },

    #[error("Invalid fee multiplier: {multiplier_bps} bps")]
    InvalidFeeMultiplier { multiplier_bps: u64 },

    // ========================================================================
    // Envelope Errors
    // ========================================================================

    #[error("PB-ETNS-01: destination chain {dst_chain_id} not allowed for {symbol}")]
    DestinationNotAllowed { symbol: String, dst_chain_id: u32 },

    #[error("PB-ZQTY-01: quantity must be greater than zero")]
    ZeroQuantity,

    #[error("PB-ITRD-01: trader must be 32 bytes, got {got}")]
    InvalidTrader { got: usize },

    #[error("Invalid xfer version: {version}")]
    InvalidXferVersion { version: u8 },

    // ========================================================================
    // Delay & Volume-Cap Errors
    // ========================================================================

    #[error("PB-VCAP-01: epoch volume cap exceeded for {symbol}: cap {cap}, would reach {requested}")]
    VolumeCapExceeded {
        symbol: String,
        cap: Uint128,
        requested: Uint128,
    },

    #[error("PB-DTAE-01: delayed transfer already exists")]
    DelayedTransferExists,

    #[error("PB-DTNE-01: delayed transfer does not exist")]
    DelayedTransferNotFound,

    #[error("PB-DTSL-01: delayed transfer still locked: {remaining_seconds} seconds remaining")]
    DelayedTransferLocked { remaining_seconds: u64 },

    #[error("PB-LENM-01: length mismatch")]
    ThresholdLengthMismatch,

    #[error("PB-LENM-02: length mismatch")]
    VolumeCapLengthMismatch,

    #[error("Invalid delay period: must be at most {max} seconds")]
    InvalidDelayPeriod { max: u64 },

    // ========================================================================
    // Recovery Errors
    // ========================================================================

    #[error("PB-NSPL-01: no stored payload for chain {src_chain_id}")]
    NoStoredPayload { src_chain_id: u32 },

    #[error("PB-PHMM-01: payload hash mismatch")]
    PayloadHashMismatch,

    // ========================================================================
    // Validation Errors
    // ========================================================================

    #[error("Invalid hash length: expected 32 bytes, got {got}")]
    InvalidHashLength { got: usize },
}
