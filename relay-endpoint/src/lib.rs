//! Relay endpoint contract.
//!
//! A chain-local stand-in for a point-to-point messaging service. Senders
//! queue payloads with `Send` and pay the quoted native fee; a relayer moves
//! queued packets to the endpoint of the destination chain, which delivers
//! them with `Deliver`. A delivery the receiver rejects is stored and blocks
//! its path until it is retried or cleared by the receiver.

pub mod contract;
pub mod error;
pub mod msg;
pub mod state;

pub use crate::error::ContractError;
