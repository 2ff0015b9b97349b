use common::relay::{FeeQuoteResponse, StoredPayloadResponse};
use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Binary, HexBinary, Uint128};

use crate::state::{Config, OutboxPacket};

#[cw_serde]
pub struct InstantiateMsg {
    /// Admin and relayer
    pub admin: String,
    pub chain_id: u32,
    pub fee_denom: String,
    pub base_fee: Uint128,
    pub fee_per_byte: Uint128,
}

/// `Send` and `ClearStoredPayload` accept the JSON of `common::relay::RelayExecuteMsg`.
#[cw_serde]
pub enum ExecuteMsg {
    /// Queue a payload for the relayer
    Send { dst_chain_id: u32, payload: Binary },
    /// Receiver: drop the stored payload of a path
    ClearStoredPayload {
        src_chain_id: u32,
        src_address: String,
        payload_hash: HexBinary,
    },
    /// Relayer: hand a packet from a remote endpoint to its receiver
    Deliver {
        src_chain_id: u32,
        src_address: String,
        dst_address: String,
        nonce: u64,
        payload: Binary,
    },
    /// Anyone: deliver the stored payload of a path again
    RetryPayload {
        src_chain_id: u32,
        src_address: String,
        payload: Binary,
    },
    /// Admin: store the next delivery instead of handing it over
    BlockNextMessage {},
    /// Admin: update the fee schedule
    SetFees {
        base_fee: Uint128,
        fee_per_byte: Uint128,
    },
}

/// `EstimateFee` and `StoredPayload` accept the JSON of `common::relay::RelayQueryMsg`.
#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(FeeQuoteResponse)]
    EstimateFee { dst_chain_id: u32, payload_size: u64 },
    #[returns(StoredPayloadResponse)]
    StoredPayload {
        src_chain_id: u32,
        src_address: String,
    },
    /// Queued packets, ordered by id
    #[returns(OutboxResponse)]
    Outbox {
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    #[returns(Config)]
    Config {},
}

#[cw_serde]
pub struct OutboxResponse {
    pub packets: Vec<OutboxPacket>,
}
