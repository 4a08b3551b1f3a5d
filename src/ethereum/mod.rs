//! Ethereum interaction module.
//!
//! Contains the node client, wallet management, contract bindings and
//! revert classification.

pub mod client;
pub mod constants;
pub mod contracts;
pub mod revert;
pub mod wallet;

pub use client::{Endpoint, NodeClient, NodeProvider};
pub use revert::ContractRevert;
pub use wallet::{first_keystore_file, recover_signer, WalletManager};
