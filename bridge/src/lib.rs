//! Portfolio Bridge Contract - Cross-Chain Messaging for a Hub-and-Spoke Ledger
//!
//! User balances live on the hub chain; custody of real tokens is spread over
//! spoke chains. The same contract runs on both sides and carries transfer
//! envelopes between them through interchangeable relay providers.
//!
//! # Outbound Flow
//! 1. The ledger calls `SendCrossChainMessage` with an envelope
//! 2. The symbol is resolved against the token registry
//! 3. The volume cap and delay threshold are checked
//! 4. On the hub, withdrawals are bounded by the spoke's tracked inventory
//! 5. The envelope gets the next nonce for its destination and is dispatched
//!
//! # Inbound Flow
//! 1. A relay endpoint delivers the payload with `RelayReceive`
//! 2. The payload is decoded and its symbol id resolved locally
//! 3. Large transfers are parked as delayed transfers
//! 4. On the hub, deposits increase the sending spoke's inventory
//! 5. The ledger receives `ProcessXferPayload`
//!
//! # Recovery
//! A payload the relay failed to deliver is stored by the relay. The admin
//! replays the exact bytes with `RecoverPayload`; the hash must match.
//!
//! # Security
//! - Unregistered symbols are never credited
//! - Per-symbol rolling volume caps
//! - Time-locked delayed transfers above per-symbol thresholds
//! - Trusted remote bridge per chain, endpoint-only inbound entry point
//! - Emergency pause functionality

pub mod codec;
pub mod contract;
pub mod controller;
pub mod error;
mod execute;
pub mod fee_manager;
pub mod hash;
pub mod inventory;
pub mod msg;
pub mod provider;
mod query;
pub mod state;

pub use crate::error::ContractError;
pub use crate::hash::{compute_delayed_transfer_id, compute_symbol_id};
pub use crate::provider::BridgeProvider;
