use common::keccak256;
use common::relay::{FeeQuoteResponse, RelayReceiveMsg, StoredPayload, StoredPayloadResponse};
use cosmwasm_std::{
    entry_point, to_json_binary, Binary, Coin, Deps, DepsMut, Env, HexBinary, MessageInfo, Order,
    Reply, Response, StdError, StdResult, SubMsg, SubMsgResult, Uint128,
};
use cw2::set_contract_version;
use cw_storage_plus::Bound;

use crate::error::ContractError;
use crate::msg::{ExecuteMsg, InstantiateMsg, OutboxResponse, QueryMsg};
use crate::state::{
    Config, OutboxPacket, PendingDelivery, BLOCK_NEXT, CONFIG, CONTRACT_NAME, CONTRACT_VERSION,
    DELIVER_REPLY_ID, OUTBOX, OUTBOX_SEQ, PATH_NONCES, PENDING_DELIVERY, STORED_PAYLOADS,
};

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 50;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let config = Config {
        admin: deps.api.addr_validate(&msg.admin)?,
        chain_id: msg.chain_id,
        fee_denom: msg.fee_denom,
        base_fee: msg.base_fee,
        fee_per_byte: msg.fee_per_byte,
    };
    CONFIG.save(deps.storage, &config)?;
    OUTBOX_SEQ.save(deps.storage, &0)?;
    BLOCK_NEXT.save(deps.storage, &false)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("admin", config.admin)
        .add_attribute("chain_id", config.chain_id.to_string()))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::Send {
            dst_chain_id,
            payload,
        } => execute_send(deps, info, dst_chain_id, payload),
        ExecuteMsg::ClearStoredPayload {
            src_chain_id,
            src_address,
            payload_hash,
        } => execute_clear_stored_payload(deps, info, src_chain_id, src_address, payload_hash),
        ExecuteMsg::Deliver {
            src_chain_id,
            src_address,
            dst_address,
            nonce,
            payload,
        } => {
            let config = CONFIG.load(deps.storage)?;
            if info.sender != config.admin {
                return Err(ContractError::Unauthorized);
            }
            let delivery = PendingDelivery {
                src_chain_id,
                src_address,
                dst_address: deps.api.addr_validate(&dst_address)?.to_string(),
                nonce,
                payload,
            };
            deliver(deps, delivery)
        }
        ExecuteMsg::RetryPayload {
            src_chain_id,
            src_address,
            payload,
        } => execute_retry_payload(deps, src_chain_id, src_address, payload),
        ExecuteMsg::BlockNextMessage {} => {
            let config = CONFIG.load(deps.storage)?;
            if info.sender != config.admin {
                return Err(ContractError::Unauthorized);
            }
            BLOCK_NEXT.save(deps.storage, &true)?;
            Ok(Response::new().add_attribute("action", "block_next_message"))
        }
        ExecuteMsg::SetFees {
            base_fee,
            fee_per_byte,
        } => {
            let mut config = CONFIG.load(deps.storage)?;
            if info.sender != config.admin {
                return Err(ContractError::Unauthorized);
            }
            config.base_fee = base_fee;
            config.fee_per_byte = fee_per_byte;
            CONFIG.save(deps.storage, &config)?;
            Ok(Response::new()
                .add_attribute("action", "set_fees")
                .add_attribute("base_fee", base_fee)
                .add_attribute("fee_per_byte", fee_per_byte))
        }
    }
}

fn estimate_fee(config: &Config, payload_size: u64) -> StdResult<Coin> {
    let amount = config
        .fee_per_byte
        .checked_mul(Uint128::from(payload_size))
        .and_then(|per_byte| per_byte.checked_add(config.base_fee))
        .map_err(StdError::from)?;
    Ok(Coin {
        denom: config.fee_denom.clone(),
        amount,
    })
}

fn execute_send(
    deps: DepsMut,
    info: MessageInfo,
    dst_chain_id: u32,
    payload: Binary,
) -> Result<Response, ContractError> {
    if payload.is_empty() {
        return Err(ContractError::EmptyPayload);
    }

    let config = CONFIG.load(deps.storage)?;
    let fee = estimate_fee(&config, payload.len() as u64)?;
    let paid: Uint128 = info
        .funds
        .iter()
        .filter(|c| c.denom == fee.denom)
        .map(|c| c.amount)
        .sum();
    if paid < fee.amount {
        return Err(ContractError::InsufficientFee {
            expected: fee.amount,
            got: paid,
        });
    }

    let nonce = PATH_NONCES
        .may_load(deps.storage, (&info.sender, dst_chain_id))?
        .unwrap_or_default()
        + 1;
    PATH_NONCES.save(deps.storage, (&info.sender, dst_chain_id), &nonce)?;

    let id = OUTBOX_SEQ.load(deps.storage)? + 1;
    OUTBOX_SEQ.save(deps.storage, &id)?;
    OUTBOX.save(
        deps.storage,
        id,
        &OutboxPacket {
            id,
            src_chain_id: config.chain_id,
            src_address: info.sender.to_string(),
            dst_chain_id,
            nonce,
            payload,
        },
    )?;

    Ok(Response::new()
        .add_attribute("action", "send")
        .add_attribute("packet_id", id.to_string())
        .add_attribute("sender", info.sender)
        .add_attribute("dst_chain_id", dst_chain_id.to_string())
        .add_attribute("nonce", nonce.to_string())
        .add_attribute("fee", fee.to_string()))
}

/// Hand a packet to its receiver; a rejected delivery is stored by `reply`
fn deliver(deps: DepsMut, delivery: PendingDelivery) -> Result<Response, ContractError> {
    let path = (delivery.src_chain_id, delivery.src_address.as_str());
    if STORED_PAYLOADS.has(deps.storage, path) {
        return Err(ContractError::PathBlocked {
            src_chain_id: delivery.src_chain_id,
            src_address: delivery.src_address,
        });
    }

    if BLOCK_NEXT.load(deps.storage)? {
        BLOCK_NEXT.save(deps.storage, &false)?;
        return store_payload(deps, delivery, "blocked by admin".to_string());
    }

    let receive = RelayReceiveMsg {
        src_chain_id: delivery.src_chain_id,
        src_address: delivery.src_address.clone(),
        nonce: delivery.nonce,
        payload: delivery.payload.clone(),
    }
    .into_cosmos_msg(delivery.dst_address.clone())?;

    let response = Response::new()
        .add_submessage(SubMsg::reply_always(receive, DELIVER_REPLY_ID))
        .add_attribute("action", "deliver")
        .add_attribute("src_chain_id", delivery.src_chain_id.to_string())
        .add_attribute("src_address", delivery.src_address.clone())
        .add_attribute("dst_address", delivery.dst_address.clone())
        .add_attribute("nonce", delivery.nonce.to_string());
    PENDING_DELIVERY.save(deps.storage, &delivery)?;

    Ok(response)
}

fn store_payload(
    deps: DepsMut,
    delivery: PendingDelivery,
    reason: String,
) -> Result<Response, ContractError> {
    let stored = StoredPayload {
        payload_hash: HexBinary::from(keccak256(delivery.payload.as_slice()).to_vec()),
        payload_length: delivery.payload.len() as u64,
        dst_address: delivery.dst_address.clone(),
        nonce: delivery.nonce,
    };
    STORED_PAYLOADS.save(
        deps.storage,
        (delivery.src_chain_id, delivery.src_address.as_str()),
        &stored,
    )?;

    Ok(Response::new()
        .add_attribute("action", "payload_stored")
        .add_attribute("src_chain_id", delivery.src_chain_id.to_string())
        .add_attribute("src_address", delivery.src_address)
        .add_attribute("dst_address", delivery.dst_address)
        .add_attribute("nonce", delivery.nonce.to_string())
        .add_attribute("payload", delivery.payload.to_base64())
        .add_attribute("payload_hash", stored.payload_hash.to_hex())
        .add_attribute("reason", reason))
}

fn execute_retry_payload(
    deps: DepsMut,
    src_chain_id: u32,
    src_address: String,
    payload: Binary,
) -> Result<Response, ContractError> {
    let stored = STORED_PAYLOADS
        .may_load(deps.storage, (src_chain_id, src_address.as_str()))?
        .ok_or_else(|| ContractError::NoStoredPayload {
            src_chain_id,
            src_address: src_address.clone(),
        })?;
    if !payload_matches(&stored, &payload) {
        return Err(ContractError::PayloadHashMismatch);
    }
    STORED_PAYLOADS.remove(deps.storage, (src_chain_id, src_address.as_str()));

    let delivery = PendingDelivery {
        src_chain_id,
        src_address,
        dst_address: stored.dst_address,
        nonce: stored.nonce,
        payload,
    };
    Ok(deliver(deps, delivery)?.add_attribute("retry", "true"))
}

fn execute_clear_stored_payload(
    deps: DepsMut,
    info: MessageInfo,
    src_chain_id: u32,
    src_address: String,
    payload_hash: HexBinary,
) -> Result<Response, ContractError> {
    let path = (src_chain_id, src_address.as_str());
    let stored = STORED_PAYLOADS
        .may_load(deps.storage, path)?
        .ok_or_else(|| ContractError::NoStoredPayload {
            src_chain_id,
            src_address: src_address.clone(),
        })?;

    if info.sender.as_str() != stored.dst_address {
        return Err(ContractError::NotReceiver {
            dst_address: stored.dst_address,
        });
    }
    if stored.payload_hash != payload_hash {
        return Err(ContractError::PayloadHashMismatch);
    }
    STORED_PAYLOADS.remove(deps.storage, path);

    Ok(Response::new()
        .add_attribute("action", "clear_stored_payload")
        .add_attribute("src_chain_id", src_chain_id.to_string())
        .add_attribute("src_address", src_address)
        .add_attribute("nonce", stored.nonce.to_string()))
}

fn payload_matches(stored: &StoredPayload, payload: &Binary) -> bool {
    stored.payload_length == payload.len() as u64
        && stored.payload_hash.as_slice() == keccak256(payload.as_slice()).as_slice()
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(deps: DepsMut, _env: Env, msg: Reply) -> Result<Response, ContractError> {
    if msg.id != DELIVER_REPLY_ID {
        return Err(ContractError::UnknownReply { id: msg.id });
    }

    let delivery = PENDING_DELIVERY.load(deps.storage)?;
    PENDING_DELIVERY.remove(deps.storage);

    match msg.result {
        SubMsgResult::Ok(_) => Ok(Response::new()
            .add_attribute("action", "delivered")
            .add_attribute("nonce", delivery.nonce.to_string())),
        SubMsgResult::Err(reason) => store_payload(deps, delivery, reason),
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::EstimateFee { payload_size, .. } => {
            let config = CONFIG.load(deps.storage)?;
            to_json_binary(&FeeQuoteResponse {
                native_fee: estimate_fee(&config, payload_size)?,
            })
        }
        QueryMsg::StoredPayload {
            src_chain_id,
            src_address,
        } => to_json_binary(&StoredPayloadResponse {
            stored: STORED_PAYLOADS.may_load(deps.storage, (src_chain_id, src_address.as_str()))?,
        }),
        QueryMsg::Outbox { start_after, limit } => {
            to_json_binary(&query_outbox(deps, start_after, limit)?)
        }
        QueryMsg::Config {} => to_json_binary(&CONFIG.load(deps.storage)?),
    }
}

fn query_outbox(
    deps: Deps,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<OutboxResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.map(Bound::exclusive);

    let packets = OUTBOX
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| item.map(|(_, packet)| packet))
        .collect::<StdResult<Vec<_>>>()?;

    Ok(OutboxResponse { packets })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::testing::{mock_dependencies, mock_env, mock_info};
    use cosmwasm_std::{coins, from_json, SubMsgResponse};

    const DENOM: &str = "uavax";

    fn setup(deps: DepsMut) {
        instantiate(
            deps,
            mock_env(),
            mock_info("creator", &[]),
            InstantiateMsg {
                admin: "relayer".to_string(),
                chain_id: 43114,
                fee_denom: DENOM.to_string(),
                base_fee: Uint128::new(1000),
                fee_per_byte: Uint128::new(10),
            },
        )
        .unwrap();
    }

    fn delivery_msg(payload: &[u8]) -> ExecuteMsg {
        ExecuteMsg::Deliver {
            src_chain_id: 432204,
            src_address: "hub_bridge".to_string(),
            dst_address: "spoke_bridge".to_string(),
            nonce: 1,
            payload: Binary::from(payload.to_vec()),
        }
    }

    #[test]
    fn test_fee_quote_overflow_is_an_error() {
        let mut deps = mock_dependencies();
        setup(deps.as_mut());
        execute(
            deps.as_mut(),
            mock_env(),
            mock_info("relayer", &[]),
            ExecuteMsg::SetFees {
                base_fee: Uint128::new(1),
                fee_per_byte: Uint128::MAX,
            },
        )
        .unwrap();

        let err = query(
            deps.as_ref(),
            mock_env(),
            QueryMsg::EstimateFee {
                dst_chain_id: 1,
                payload_size: 2,
            },
        )
        .unwrap_err();
        assert!(matches!(err, StdError::Overflow { .. }));

        // no room left for the base fee either
        let err = execute(
            deps.as_mut(),
            mock_env(),
            mock_info("bridge", &coins(1, DENOM)),
            ExecuteMsg::Send {
                dst_chain_id: 1,
                payload: Binary::from(vec![2u8; 1]),
            },
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::Std(StdError::Overflow { .. })));
    }

    #[test]
    fn test_fee_quote_and_send() {
        let mut deps = mock_dependencies();
        setup(deps.as_mut());

        let res = query(
            deps.as_ref(),
            mock_env(),
            QueryMsg::EstimateFee {
                dst_chain_id: 1,
                payload_size: 129,
            },
        )
        .unwrap();
        let quote: FeeQuoteResponse = from_json(res).unwrap();
        assert_eq!(quote.native_fee, Coin::new(2290, DENOM));

        let payload = Binary::from(vec![2u8; 129]);
        let err = execute(
            deps.as_mut(),
            mock_env(),
            mock_info("bridge", &coins(2289, DENOM)),
            ExecuteMsg::Send {
                dst_chain_id: 1,
                payload: payload.clone(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::InsufficientFee { .. }));

        for _ in 0..2 {
            execute(
                deps.as_mut(),
                mock_env(),
                mock_info("bridge", &coins(2290, DENOM)),
                ExecuteMsg::Send {
                    dst_chain_id: 1,
                    payload: payload.clone(),
                },
            )
            .unwrap();
        }

        let outbox = query_outbox(deps.as_ref(), None, None).unwrap();
        assert_eq!(outbox.packets.len(), 2);
        assert_eq!(outbox.packets[1].nonce, 2);
        assert_eq!(outbox.packets[1].src_chain_id, 43114);
        assert_eq!(outbox.packets[1].src_address, "bridge");

        let rest = query_outbox(deps.as_ref(), Some(1), None).unwrap();
        assert_eq!(rest.packets.len(), 1);
        assert_eq!(rest.packets[0].id, 2);
    }

    #[test]
    fn test_deliver_sets_reply() {
        let mut deps = mock_dependencies();
        setup(deps.as_mut());

        let err = execute(
            deps.as_mut(),
            mock_env(),
            mock_info("anyone", &[]),
            delivery_msg(b"hello"),
        )
        .unwrap_err();
        assert_eq!(err, ContractError::Unauthorized);

        let res = execute(
            deps.as_mut(),
            mock_env(),
            mock_info("relayer", &[]),
            delivery_msg(b"hello"),
        )
        .unwrap();
        assert_eq!(res.messages.len(), 1);
        assert_eq!(res.messages[0].id, DELIVER_REPLY_ID);
        assert!(PENDING_DELIVERY.may_load(&deps.storage).unwrap().is_some());

        // successful delivery leaves nothing behind
        reply(
            deps.as_mut(),
            mock_env(),
            Reply {
                id: DELIVER_REPLY_ID,
                result: SubMsgResult::Ok(SubMsgResponse {
                    events: vec![],
                    data: None,
                }),
            },
        )
        .unwrap();
        assert!(PENDING_DELIVERY.may_load(&deps.storage).unwrap().is_none());
        assert!(STORED_PAYLOADS
            .may_load(&deps.storage, (432204, "hub_bridge"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_failed_delivery_blocks_path_until_cleared() {
        let mut deps = mock_dependencies();
        setup(deps.as_mut());

        execute(
            deps.as_mut(),
            mock_env(),
            mock_info("relayer", &[]),
            delivery_msg(b"hello"),
        )
        .unwrap();
        reply(
            deps.as_mut(),
            mock_env(),
            Reply {
                id: DELIVER_REPLY_ID,
                result: SubMsgResult::Err("receiver rejected".to_string()),
            },
        )
        .unwrap();

        let stored = STORED_PAYLOADS
            .load(&deps.storage, (432204, "hub_bridge"))
            .unwrap();
        assert_eq!(stored.payload_length, 5);
        assert_eq!(stored.dst_address, "spoke_bridge");
        assert_eq!(stored.payload_hash.as_slice(), keccak256(b"hello").as_slice());

        // the next packet on the path is refused
        let mut next = delivery_msg(b"world");
        if let ExecuteMsg::Deliver { nonce, .. } = &mut next {
            *nonce = 2;
        }
        let err = execute(deps.as_mut(), mock_env(), mock_info("relayer", &[]), next).unwrap_err();
        assert!(matches!(err, ContractError::PathBlocked { .. }));

        let clear = |hash: &[u8]| ExecuteMsg::ClearStoredPayload {
            src_chain_id: 432204,
            src_address: "hub_bridge".to_string(),
            payload_hash: HexBinary::from(hash.to_vec()),
        };
        let good_hash = keccak256(b"hello");

        let err = execute(
            deps.as_mut(),
            mock_env(),
            mock_info("relayer", &[]),
            clear(&good_hash),
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::NotReceiver { .. }));

        let err = execute(
            deps.as_mut(),
            mock_env(),
            mock_info("spoke_bridge", &[]),
            clear(&keccak256(b"hellp")),
        )
        .unwrap_err();
        assert_eq!(err, ContractError::PayloadHashMismatch);

        execute(
            deps.as_mut(),
            mock_env(),
            mock_info("spoke_bridge", &[]),
            clear(&good_hash),
        )
        .unwrap();

        let res = query(
            deps.as_ref(),
            mock_env(),
            QueryMsg::StoredPayload {
                src_chain_id: 432204,
                src_address: "hub_bridge".to_string(),
            },
        )
        .unwrap();
        let res: StoredPayloadResponse = from_json(res).unwrap();
        assert_eq!(res.stored, None);
    }

    #[test]
    fn test_block_next_and_retry() {
        let mut deps = mock_dependencies();
        setup(deps.as_mut());

        execute(
            deps.as_mut(),
            mock_env(),
            mock_info("relayer", &[]),
            ExecuteMsg::BlockNextMessage {},
        )
        .unwrap();
        let res = execute(
            deps.as_mut(),
            mock_env(),
            mock_info("relayer", &[]),
            delivery_msg(b"hello"),
        )
        .unwrap();
        // stored without calling the receiver
        assert!(res.messages.is_empty());
        assert!(STORED_PAYLOADS.has(&deps.storage, (432204, "hub_bridge")));

        let retry = |payload: &[u8]| ExecuteMsg::RetryPayload {
            src_chain_id: 432204,
            src_address: "hub_bridge".to_string(),
            payload: Binary::from(payload.to_vec()),
        };
        let err = execute(deps.as_mut(), mock_env(), mock_info("anyone", &[]), retry(b"hell"))
            .unwrap_err();
        assert_eq!(err, ContractError::PayloadHashMismatch);

        let res = execute(deps.as_mut(), mock_env(), mock_info("anyone", &[]), retry(b"hello"))
            .unwrap();
        assert_eq!(res.messages.len(), 1);
        assert!(!STORED_PAYLOADS.has(&deps.storage, (432204, "hub_bridge")));
    }
}
