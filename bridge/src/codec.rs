//! Wire codec for the transfer envelope
//!
//! Every payload starts with a one-byte version tag followed by 32-byte words.
//!
//! # Version 1 (legacy word layout, 193 bytes)
//! - Byte 0:          0x01
//! - Bytes 1-32:      nonce (uint256, big-endian, left-padded)
//! - Bytes 33-64:     transaction kind (uint256)
//! - Bytes 65-96:     trader (32 bytes)
//! - Bytes 97-128:    symbol id (32 bytes)
//! - Bytes 129-160:   quantity (uint256)
//! - Bytes 161-192:   timestamp (uint256)
//!
//! Version 1 has no room for custom data.
//!
//! # Version 2 (packed layout, 129 bytes)
//! - Byte 0:          0x02
//! - Slot 0 (1-32):   custom data (18) | timestamp u32 (4) | nonce u64 (8) | tx (1) | msg type (1)
//! - Slot 1 (33-64):  trader (32 bytes)
//! - Slot 2 (65-96):  symbol id (32 bytes)
//! - Slot 3 (97-128): quantity (uint256)
//!
//! Decoding never guesses: an unknown version, a wrong length or a value that
//! does not fit its field rejects the whole payload.

use common::Tx;
use thiserror::Error;

/// Legacy word layout
pub const VERSION_LEGACY: u8 = 1;

/// Packed slot layout with custom data
pub const VERSION_PACKED: u8 = 2;

/// Only message type carried by the bridge
pub const MSG_TYPE_XFER: u8 = 0;

/// Bytes of custom data that fit into slot 0 of the packed layout
pub const CUSTOM_DATA_LENGTH: usize = 18;

const WORD: usize = 32;

pub const LEGACY_PAYLOAD_SIZE: usize = 1 + 6 * WORD;
pub const PACKED_PAYLOAD_SIZE: usize = 1 + 4 * WORD;

#[derive(Error, Debug, PartialEq)]
pub enum CodecError {
    #[error("PB-UPVR-01: unsupported payload version {version}")]
    UnsupportedVersion { version: u8 },

    #[error("PB-MFPL-01: malformed payload: {reason}")]
    Malformed { reason: String },

    #[error("PB-CDTL-01: {len} bytes of custom data do not fit payload version {version}")]
    CustomDataTooLong { len: usize, version: u8 },

    #[error("PB-MFPL-01: timestamp {timestamp} does not fit payload version {version}")]
    TimestampOverflow { timestamp: u64, version: u8 },
}

impl CodecError {
    fn malformed(reason: impl Into<String>) -> Self {
        CodecError::Malformed {
            reason: reason.into(),
        }
    }
}

/// Envelope as it travels between chains
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireXfer {
    pub nonce: u64,
    pub transaction: Tx,
    pub trader: [u8; 32],
    /// Origin-scoped symbol id
    pub symbol_id: [u8; 32],
    pub quantity: u128,
    pub timestamp: u64,
    /// Trailing zero bytes are not significant
    pub custom_data: Vec<u8>,
}

/// Size of an encoded payload for `version`
pub fn payload_size(version: u8) -> Result<usize, CodecError> {
    match version {
        VERSION_LEGACY => Ok(LEGACY_PAYLOAD_SIZE),
        VERSION_PACKED => Ok(PACKED_PAYLOAD_SIZE),
        version => Err(CodecError::UnsupportedVersion { version }),
    }
}

/// Check custom data fits the layout of `version`
pub fn validate_custom_data(custom_data: &[u8], version: u8) -> Result<(), CodecError> {
    let significant = trim_trailing_zeros(custom_data).len();
    let room = match version {
        VERSION_LEGACY => 0,
        VERSION_PACKED => CUSTOM_DATA_LENGTH,
        version => return Err(CodecError::UnsupportedVersion { version }),
    };
    if significant > room {
        return Err(CodecError::CustomDataTooLong {
            len: significant,
            version,
        });
    }
    Ok(())
}

/// Encode an envelope with the given wire version
pub fn encode(xfer: &WireXfer, version: u8) -> Result<Vec<u8>, CodecError> {
    match version {
        VERSION_LEGACY => encode_legacy(xfer),
        VERSION_PACKED => encode_packed(xfer),
        version => Err(CodecError::UnsupportedVersion { version }),
    }
}

/// Decode a payload, returning its version and envelope
pub fn decode(payload: &[u8]) -> Result<(u8, WireXfer), CodecError> {
    let (version, body) = payload
        .split_first()
        .ok_or_else(|| CodecError::malformed("empty payload"))?;

    let xfer = match *version {
        VERSION_LEGACY => decode_legacy(body)?,
        VERSION_PACKED => decode_packed(body)?,
        version => return Err(CodecError::UnsupportedVersion { version }),
    };
    Ok((*version, xfer))
}

// ============================================================================
// Version 1
// ============================================================================

fn encode_legacy(xfer: &WireXfer) -> Result<Vec<u8>, CodecError> {
    validate_custom_data(&xfer.custom_data, VERSION_LEGACY)?;

    let mut data = vec![0u8; LEGACY_PAYLOAD_SIZE];
    data[0] = VERSION_LEGACY;
    let body = &mut data[1..];

    body[WORD - 8..WORD].copy_from_slice(&xfer.nonce.to_be_bytes());
    body[2 * WORD - 1] = xfer.transaction.code();
    body[2 * WORD..3 * WORD].copy_from_slice(&xfer.trader);
    body[3 * WORD..4 * WORD].copy_from_slice(&xfer.symbol_id);
    body[5 * WORD - 16..5 * WORD].copy_from_slice(&xfer.quantity.to_be_bytes());
    body[6 * WORD - 8..6 * WORD].copy_from_slice(&xfer.timestamp.to_be_bytes());

    Ok(data)
}

fn decode_legacy(body: &[u8]) -> Result<WireXfer, CodecError> {
    if body.len() != LEGACY_PAYLOAD_SIZE - 1 {
        return Err(CodecError::malformed(format!(
            "version 1 expects {} bytes, got {}",
            LEGACY_PAYLOAD_SIZE,
            body.len() + 1
        )));
    }

    let nonce = read_u64(word(body, 0), "nonce")?;
    let tx_code = read_u8(word(body, 1), "transaction")?;
    let transaction = Tx::from_code(tx_code)
        .ok_or_else(|| CodecError::malformed(format!("unknown transaction {}", tx_code)))?;

    Ok(WireXfer {
        nonce,
        transaction,
        trader: to_array(word(body, 2)),
        symbol_id: to_array(word(body, 3)),
        quantity: read_u128(word(body, 4), "quantity")?,
        timestamp: read_u64(word(body, 5), "timestamp")?,
        custom_data: vec![],
    })
}

// ============================================================================
// Version 2
// ============================================================================

fn encode_packed(xfer: &WireXfer) -> Result<Vec<u8>, CodecError> {
    validate_custom_data(&xfer.custom_data, VERSION_PACKED)?;
    let custom_data = trim_trailing_zeros(&xfer.custom_data);
    let timestamp = u32::try_from(xfer.timestamp).map_err(|_| CodecError::TimestampOverflow {
        timestamp: xfer.timestamp,
        version: VERSION_PACKED,
    })?;

    let mut data = vec![0u8; PACKED_PAYLOAD_SIZE];
    data[0] = VERSION_PACKED;
    let body = &mut data[1..];

    // slot 0
    body[..custom_data.len()].copy_from_slice(custom_data);
    body[18..22].copy_from_slice(&timestamp.to_be_bytes());
    body[22..30].copy_from_slice(&xfer.nonce.to_be_bytes());
    body[30] = xfer.transaction.code();
    body[31] = MSG_TYPE_XFER;

    body[WORD..2 * WORD].copy_from_slice(&xfer.trader);
    body[2 * WORD..3 * WORD].copy_from_slice(&xfer.symbol_id);
    body[4 * WORD - 16..4 * WORD].copy_from_slice(&xfer.quantity.to_be_bytes());

    Ok(data)
}

fn decode_packed(body: &[u8]) -> Result<WireXfer, CodecError> {
    if body.len() != PACKED_PAYLOAD_SIZE - 1 {
        return Err(CodecError::malformed(format!(
            "version 2 expects {} bytes, got {}",
            PACKED_PAYLOAD_SIZE,
            body.len() + 1
        )));
    }

    let slot0 = word(body, 0);
    if slot0[31] != MSG_TYPE_XFER {
        return Err(CodecError::malformed(format!(
            "unknown message type {}",
            slot0[31]
        )));
    }
    let transaction = Tx::from_code(slot0[30])
        .ok_or_else(|| CodecError::malformed(format!("unknown transaction {}", slot0[30])))?;

    let mut timestamp = [0u8; 4];
    timestamp.copy_from_slice(&slot0[18..22]);
    let mut nonce = [0u8; 8];
    nonce.copy_from_slice(&slot0[22..30]);

    Ok(WireXfer {
        nonce: u64::from_be_bytes(nonce),
        transaction,
        trader: to_array(word(body, 1)),
        symbol_id: to_array(word(body, 2)),
        quantity: read_u128(word(body, 3), "quantity")?,
        timestamp: u32::from_be_bytes(timestamp) as u64,
        custom_data: trim_trailing_zeros(&slot0[..CUSTOM_DATA_LENGTH]).to_vec(),
    })
}

// ============================================================================
// Internal helpers
// ============================================================================

fn word(body: &[u8], index: usize) -> &[u8] {
    &body[index * WORD..(index + 1) * WORD]
}

fn to_array(word: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(word);
    out
}

fn trim_trailing_zeros(data: &[u8]) -> &[u8] {
    let end = data.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
    &data[..end]
}

/// Read the low `N` bytes of a word, rejecting any set bit above them
fn read_be<const N: usize>(word: &[u8], field: &str) -> Result<[u8; N], CodecError> {
    let (high, low) = word.split_at(WORD - N);
    if high.iter().any(|b| *b != 0) {
        return Err(CodecError::malformed(format!("{} out of range", field)));
    }
    let mut out = [0u8; N];
    out.copy_from_slice(low);
    Ok(out)
}

fn read_u8(word: &[u8], field: &str) -> Result<u8, CodecError> {
    Ok(read_be::<1>(word, field)?[0])
}

fn read_u64(word: &[u8], field: &str) -> Result<u64, CodecError> {
    Ok(u64::from_be_bytes(read_be::<8>(word, field)?))
}

fn read_u128(word: &[u8], field: &str) -> Result<u128, CodecError> {
    Ok(u128::from_be_bytes(read_be::<16>(word, field)?))
}
