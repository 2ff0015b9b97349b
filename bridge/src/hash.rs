//! Hash computation for registry keys and delayed transfer ids
//!
//! # Symbol id (36 bytes hashed)
//! - Bytes 0-31:  symbol (UTF-8, right-padded with zeros)
//! - Bytes 32-35: origin chain id (u32, big-endian)
//!
//! # Delayed transfer id (256 bytes hashed)
//! - Bytes 0-31:    nonce (uint256, big-endian, left-padded)
//! - Bytes 32-63:   transaction kind (uint256)
//! - Bytes 64-95:   trader (32 bytes)
//! - Bytes 96-127:  symbol (right-padded)
//! - Bytes 128-159: quantity (uint256)
//! - Bytes 160-191: timestamp (uint256)
//! - Bytes 192-223: keccak256(custom data)
//! - Bytes 224-255: chain id (uint256), destination for outbound, source for inbound

use common::Xfer;

use crate::error::ContractError;

pub use common::keccak256;

/// Maximum symbol length in bytes
pub const MAX_SYMBOL_LENGTH: usize = 32;

/// Right-pad a symbol to 32 bytes
pub fn symbol_to_bytes32(symbol: &str) -> Result<[u8; 32], ContractError> {
    let bytes = symbol.as_bytes();
    if bytes.is_empty() || bytes.len() > MAX_SYMBOL_LENGTH {
        return Err(ContractError::InvalidSymbol);
    }
    let mut out = [0u8; 32];
    out[..bytes.len()].copy_from_slice(bytes);
    Ok(out)
}

/// Registry key of a token on its origin chain
pub fn compute_symbol_id(symbol: &str, origin_chain_id: u32) -> Result<[u8; 32], ContractError> {
    let mut data = [0u8; 36];
    data[..32].copy_from_slice(&symbol_to_bytes32(symbol)?);
    data[32..].copy_from_slice(&origin_chain_id.to_be_bytes());
    Ok(keccak256(&data))
}

/// Deterministic id of a delayed transfer
///
/// Submitting the same envelope for the same chain twice yields the same id.
pub fn compute_delayed_transfer_id(xfer: &Xfer, chain_id: u32) -> Result<[u8; 32], ContractError> {
    let mut data = [0u8; 256];

    data[24..32].copy_from_slice(&xfer.nonce.to_be_bytes());
    data[63] = xfer.transaction.code();
    data[64..96].copy_from_slice(&trader_to_bytes32(xfer.trader.as_slice())?);
    data[96..128].copy_from_slice(&symbol_to_bytes32(&xfer.symbol)?);
    data[128 + 16..160].copy_from_slice(&xfer.quantity.u128().to_be_bytes());
    data[160 + 24..192].copy_from_slice(&xfer.timestamp.to_be_bytes());
    data[192..224].copy_from_slice(&keccak256(xfer.custom_data.as_slice()));
    data[224 + 28..256].copy_from_slice(&chain_id.to_be_bytes());

    Ok(keccak256(&data))
}

/// Validate a universal trader address
pub fn trader_to_bytes32(trader: &[u8]) -> Result<[u8; 32], ContractError> {
    trader
        .try_into()
        .map_err(|_| ContractError::InvalidTrader { got: trader.len() })
}

/// Validate a 32-byte hash supplied by a caller
pub fn slice_to_bytes32(bytes: &[u8]) -> Result<[u8; 32], ContractError> {
    bytes
        .try_into()
        .map_err(|_| ContractError::InvalidHashLength { got: bytes.len() })
}

/// Convert 32-byte hash to hex string (for attributes/logging)
pub fn bytes32_to_hex(bytes: &[u8; 32]) -> String {
    format!("0x{}", hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::Tx;
    use cosmwasm_std::{Binary, Uint128};

    fn xfer() -> Xfer {
        Xfer {
            nonce: 0,
            transaction: Tx::Withdraw,
            trader: Binary::from(vec![7u8; 32]),
            symbol: "AVAX".to_string(),
            quantity: Uint128::new(510_000_000_000_000_000),
            timestamp: 1_700_000_000,
            custom_data: Binary::default(),
        }
    }

    #[test]
    fn test_symbol_padding() {
        let padded = symbol_to_bytes32("AVAX").unwrap();
        assert_eq!(&padded[..4], b"AVAX");
        assert_eq!(&padded[4..], &[0u8; 28]);

        assert_eq!(symbol_to_bytes32(""), Err(ContractError::InvalidSymbol));
        let long = "X".repeat(33);
        assert_eq!(symbol_to_bytes32(&long), Err(ContractError::InvalidSymbol));
        assert!(symbol_to_bytes32(&"X".repeat(32)).is_ok());
    }

    #[test]
    fn test_symbol_id_matches_manual_layout() {
        let mut data = [0u8; 36];
        data[..4].copy_from_slice(b"AVAX");
        data[32..].copy_from_slice(&43114u32.to_be_bytes());
        assert_eq!(compute_symbol_id("AVAX", 43114).unwrap(), keccak256(&data));
    }

    #[test]
    fn test_symbol_id_is_chain_scoped() {
        let a = compute_symbol_id("USDC", 1).unwrap();
        let b = compute_symbol_id("USDC", 2).unwrap();
        let c = compute_symbol_id("USDT", 1).unwrap();
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_delayed_id_depends_on_envelope_and_chain() {
        let base = compute_delayed_transfer_id(&xfer(), 43114).unwrap();
        assert_eq!(base, compute_delayed_transfer_id(&xfer(), 43114).unwrap());
        assert_ne!(base, compute_delayed_transfer_id(&xfer(), 1).unwrap());

        let mut other = xfer();
        other.timestamp += 1;
        assert_ne!(base, compute_delayed_transfer_id(&other, 43114).unwrap());

        let mut other = xfer();
        other.custom_data = Binary::from(b"x".to_vec());
        assert_ne!(base, compute_delayed_transfer_id(&other, 43114).unwrap());
    }

    #[test]
    fn test_trader_must_be_32_bytes() {
        let mut bad = xfer();
        bad.trader = Binary::from(vec![1u8; 20]);
        assert_eq!(
            compute_delayed_transfer_id(&bad, 1),
            Err(ContractError::InvalidTrader { got: 20 })
        );
    }

    #[test]
    fn test_hex_formatting() {
        let mut bytes = [0u8; 32];
        bytes[0] = 0xab;
        bytes[31] = 0x01;
        let hex = bytes32_to_hex(&bytes);
        assert_eq!(hex.len(), 66);
        assert!(hex.starts_with("0xab00"));
        assert!(hex.ends_with("01"));
    }
}
