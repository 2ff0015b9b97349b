use cosmwasm_std::{StdError, Uint128};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("Unauthorized: only admin can perform this action")]
    Unauthorized,

    #[error("Unauthorized: only the receiver {dst_address} can clear this payload")]
    NotReceiver { dst_address: String },

    #[error("Insufficient fee: expected {expected}, got {got}")]
    InsufficientFee { expected: Uint128, got: Uint128 },

    #[error("Empty payload")]
    EmptyPayload,

    #[error("Path from {src_address} on chain {src_chain_id} is blocked by a stored payload")]
    PathBlocked {
        src_chain_id: u32,
        src_address: String,
    },

    #[error("No stored payload from {src_address} on chain {src_chain_id}")]
    NoStoredPayload {
        src_chain_id: u32,
        src_address: String,
    },

    #[error("Payload does not match the stored hash")]
    PayloadHashMismatch,

    #[error("Unknown reply id {id}")]
    UnknownReply { id: u64 },
}
