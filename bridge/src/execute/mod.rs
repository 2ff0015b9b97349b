//! Execute handlers for the portfolio bridge contract.
//!
//! This module contains all execute message handlers, organized by category:
//! - `outgoing` - SendCrossChainMessage and dispatch through a provider
//! - `incoming` - RelayReceive and the shared inbound processing path
//! - `delayed` - ExecuteDelayedTransfer
//! - `recovery` - RecoverPayload for payloads the relay failed to deliver
//! - `registry` - Token registry add/remove and auction mode
//! - `config` - Providers, remotes, swap destinations, risk settings, inventory seeding
//! - `admin` - Pause, unpause, admin transfer and roles

mod admin;
mod config;
mod delayed;
mod incoming;
mod outgoing;
mod recovery;
mod registry;

pub use admin::*;
pub use config::*;
pub use delayed::*;
pub use incoming::*;
pub use outgoing::*;
pub use recovery::*;
pub use registry::*;

use cosmwasm_std::{Addr, Storage};

use crate::error::ContractError;
use crate::state::{Config, CONFIG};

/// Load the config, failing unless `sender` is the admin
pub(crate) fn load_config_as_admin(
    storage: &dyn Storage,
    sender: &Addr,
) -> Result<Config, ContractError> {
    let config = CONFIG.load(storage)?;
    if *sender != config.admin {
        return Err(ContractError::Unauthorized);
    }
    Ok(config)
}
