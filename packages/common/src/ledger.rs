//! Ledger ("portfolio") interface.
//!
//! The ledger owns user balances. The bridge only forwards confirmed inbound
//! transfers to it; crediting, debiting and releasing custody are the ledger's
//! business.

use cosmwasm_schema::cw_serde;

use crate::transfer::Xfer;

#[cw_serde]
pub enum LedgerExecuteMsg {
    /// Apply the balance effect of an inbound transfer. `xfer.symbol` is the
    /// symbol as registered on the receiving chain.
    ProcessXferPayload { xfer: Xfer, src_chain_id: u32 },
}
