//! Relay endpoint interface.
//!
//! A relay endpoint is the chain-local entry point of a point-to-point
//! messaging service. The bridge sends payloads through it, and the endpoint
//! delivers inbound payloads with [`RelayReceiveMsg`]. When a delivery fails
//! the endpoint keeps a [`StoredPayload`] for the path until it is retried or
//! cleared by the receiver.

use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{to_json_binary, Binary, Coin, CosmosMsg, HexBinary, StdResult, WasmMsg};

#[cw_serde]
pub enum RelayExecuteMsg {
    /// Queue `payload` for delivery to the peer of the sender on `dst_chain_id`.
    /// The native fee must be attached.
    Send { dst_chain_id: u32, payload: Binary },
    /// Drop the stored payload of a path. Only the receiver it was addressed to may clear it.
    ClearStoredPayload {
        src_chain_id: u32,
        src_address: String,
        payload_hash: HexBinary,
    },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum RelayQueryMsg {
    #[returns(FeeQuoteResponse)]
    EstimateFee { dst_chain_id: u32, payload_size: u64 },
    #[returns(StoredPayloadResponse)]
    StoredPayload { src_chain_id: u32, src_address: String },
}

#[cw_serde]
pub struct FeeQuoteResponse {
    pub native_fee: Coin,
}

/// Payload kept by the endpoint after a failed delivery
#[cw_serde]
pub struct StoredPayload {
    pub payload_hash: HexBinary,
    pub payload_length: u64,
    /// Receiver the payload was addressed to
    pub dst_address: String,
    pub nonce: u64,
}

#[cw_serde]
pub struct StoredPayloadResponse {
    pub stored: Option<StoredPayload>,
}

/// Delivered by an endpoint to the receiving contract
#[cw_serde]
pub struct RelayReceiveMsg {
    pub src_chain_id: u32,
    pub src_address: String,
    /// Path nonce assigned by the sending endpoint
    pub nonce: u64,
    pub payload: Binary,
}

impl RelayReceiveMsg {
    /// serializes the message wrapped in the receiver's `RelayReceive` variant
    pub fn into_json_binary(self) -> StdResult<Binary> {
        let msg = ReceiverExecuteMsg::RelayReceive(self);
        to_json_binary(&msg)
    }

    /// creates an execute message addressed to the receiving contract
    pub fn into_cosmos_msg<T: Into<String>>(self, contract_addr: T) -> StdResult<CosmosMsg> {
        let msg = self.into_json_binary()?;
        let execute = WasmMsg::Execute {
            contract_addr: contract_addr.into(),
            msg,
            funds: vec![],
        };
        Ok(execute.into())
    }
}

// This is just a helper to properly serialize the above message
#[cw_serde]
enum ReceiverExecuteMsg {
    RelayReceive(RelayReceiveMsg),
}
