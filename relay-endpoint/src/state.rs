use common::relay::StoredPayload;
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Binary, Uint128};
use cw_storage_plus::{Item, Map};

pub const CONTRACT_NAME: &str = "crates.io:portfolio-relay-endpoint";
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Reply id of a delivery to a receiver
pub const DELIVER_REPLY_ID: u64 = 1;

#[cw_serde]
pub struct Config {
    /// Admin and relayer
    pub admin: Addr,
    /// Chain id reported as the source of packets sent from here
    pub chain_id: u32,
    pub fee_denom: String,
    pub base_fee: Uint128,
    pub fee_per_byte: Uint128,
}

/// Payload queued for the relayer
#[cw_serde]
pub struct OutboxPacket {
    pub id: u64,
    pub src_chain_id: u32,
    /// Sending contract on this chain
    pub src_address: String,
    pub dst_chain_id: u32,
    /// Nonce on the (sender, destination) path, starting at 1
    pub nonce: u64,
    pub payload: Binary,
}

/// Delivery awaiting its reply
#[cw_serde]
pub struct PendingDelivery {
    pub src_chain_id: u32,
    pub src_address: String,
    pub dst_address: String,
    pub nonce: u64,
    pub payload: Binary,
}

pub const CONFIG: Item<Config> = Item::new("config");

/// When set, the next delivery is stored instead of handed to the receiver
pub const BLOCK_NEXT: Item<bool> = Item::new("block_next");

/// Last packet id
pub const OUTBOX_SEQ: Item<u64> = Item::new("outbox_seq");

/// packet id => packet
pub const OUTBOX: Map<u64, OutboxPacket> = Map::new("outbox");

/// (sender, dst_chain_id) => last nonce
pub const PATH_NONCES: Map<(&Addr, u32), u64> = Map::new("path_nonces");

/// (src_chain_id, src_address) => payload that failed delivery
pub const STORED_PAYLOADS: Map<(u32, &str), StoredPayload> = Map::new("stored_payloads");

pub const PENDING_DELIVERY: Item<PendingDelivery> = Item::new("pending_delivery");
