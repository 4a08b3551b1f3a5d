//! Utilities for an Ethereum-compatible node.
//!
//! The crate backs four binaries:
//!
//! - **`bfa-funds`**: balances, transfers and node-managed accounts
//! - **`show-transactions`**: historical ether transfers, plain or Graphviz
//! - **`stamp-server`**: REST front for the Stamper hash registry
//! - **`cfp-server`**: REST front for the call-for-proposals factory
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use bfa_toolkit::{services::FundsService, types::Unit, NodeClient};
//!
//! #[tokio::main]
//! async fn main() -> bfa_toolkit::Result<()> {
//!     let client = NodeClient::connect("http://localhost:8545", None).await?;
//!     let funds = FundsService::new(Arc::new(client));
//!     println!("{}", funds.balance(address, Unit::Ether).await?);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod ethereum;
pub mod http;
pub mod services;
pub mod telemetry;
pub mod types;
pub mod validation;

pub use error::{ApiError, AppError, Result};
pub use ethereum::{NodeClient, WalletManager};
