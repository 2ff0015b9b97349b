//! Transfer envelope exchanged between the hub and spoke bridges.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Binary, Uint128};

/// Transaction kind carried by an envelope.
///
/// The discriminants are the on-wire codes and must never be reordered.
#[cw_serde]
#[derive(Copy, Eq, Hash)]
pub enum Tx {
    Withdraw,
    Deposit,
    Execution,
    IncreaseAvail,
    DecreaseAvail,
    IxferSent,
    IxferRec,
    RecoverFunds,
    AddGas,
    RemoveGas,
    AutoFill,
    /// Direct spoke-to-spoke settlement that bypasses the hub ledger
    CcTrade,
    ConvertFrom,
    ConvertTo,
}

impl Tx {
    pub const ALL: [Tx; 14] = [
        Tx::Withdraw,
        Tx::Deposit,
        Tx::Execution,
        Tx::IncreaseAvail,
        Tx::DecreaseAvail,
        Tx::IxferSent,
        Tx::IxferRec,
        Tx::RecoverFunds,
        Tx::AddGas,
        Tx::RemoveGas,
        Tx::AutoFill,
        Tx::CcTrade,
        Tx::ConvertFrom,
        Tx::ConvertTo,
    ];

    pub fn code(self) -> u8 {
        match self {
            Tx::Withdraw => 0,
            Tx::Deposit => 1,
            Tx::Execution => 2,
            Tx::IncreaseAvail => 3,
            Tx::DecreaseAvail => 4,
            Tx::IxferSent => 5,
            Tx::IxferRec => 6,
            Tx::RecoverFunds => 7,
            Tx::AddGas => 8,
            Tx::RemoveGas => 9,
            Tx::AutoFill => 10,
            Tx::CcTrade => 11,
            Tx::ConvertFrom => 12,
            Tx::ConvertTo => 13,
        }
    }

    pub fn from_code(code: u8) -> Option<Tx> {
        Tx::ALL.iter().copied().find(|tx| tx.code() == code)
    }

    /// Cross-chain trades settle spoke-to-spoke; every other kind goes through the hub.
    pub fn is_cross_chain_trade(self) -> bool {
        self == Tx::CcTrade
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tx::Withdraw => "withdraw",
            Tx::Deposit => "deposit",
            Tx::Execution => "execution",
            Tx::IncreaseAvail => "increase_avail",
            Tx::DecreaseAvail => "decrease_avail",
            Tx::IxferSent => "ixfer_sent",
            Tx::IxferRec => "ixfer_rec",
            Tx::RecoverFunds => "recover_funds",
            Tx::AddGas => "add_gas",
            Tx::RemoveGas => "remove_gas",
            Tx::AutoFill => "auto_fill",
            Tx::CcTrade => "cc_trade",
            Tx::ConvertFrom => "convert_from",
            Tx::ConvertTo => "convert_to",
        }
    }
}

impl std::fmt::Display for Tx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transfer envelope.
///
/// In JSON interfaces `symbol` is the chain-local symbol (e.g. "AVAX"). On the
/// wire the bridge replaces it with the origin-scoped symbol id.
#[cw_serde]
pub struct Xfer {
    /// Assigned by the sending bridge per destination chain; ignored on submission
    pub nonce: u64,
    pub transaction: Tx,
    /// 32-byte universal address of the trader
    pub trader: Binary,
    pub symbol: String,
    pub quantity: Uint128,
    /// Block time (seconds) on the sending chain; set by the bridge at dispatch
    pub timestamp: u64,
    #[serde(default)]
    pub custom_data: Binary,
}
