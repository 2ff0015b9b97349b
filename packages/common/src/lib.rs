//! Common - Shared Types for the Portfolio Bridge Contracts
//!
//! Interfaces shared between the bridge, the relay endpoint and the ledger
//! ("portfolio") contract that sits on top of the bridge:
//!
//! - `transfer` - the transfer envelope (`Xfer`) and its transaction kinds
//! - `relay` - messages exchanged with a relay endpoint
//! - `ledger` - messages the bridge sends to the ledger
//! - `hash` - keccak256 used for payload hashes on both sides of the relay

pub mod hash;
pub mod ledger;
pub mod relay;
pub mod transfer;

pub use hash::keccak256;
pub use transfer::{Tx, Xfer};
