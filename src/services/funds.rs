//! Balance, transfer and account listing for `bfa-funds`.

use std::sync::Arc;

use alloy::primitives::{Address, TxHash, U256};

use crate::{
    error::{AppError, Result},
    ethereum::NodeClient,
    types::Unit,
};

/// Service behind the `bfa-funds` subcommands.
#[derive(Clone)]
pub struct FundsService {
    client: Arc<NodeClient>,
}

impl FundsService {
    /// Create a new funds service.
    pub fn new(client: Arc<NodeClient>) -> Self {
        Self { client }
    }

    /// `balance: <amount> <unit>` for `account`.
    pub async fn balance(&self, account: Address, unit: Unit) -> Result<String> {
        tracing::debug!(account = %account, unit = %unit, "Querying balance");

        let balance = self.client.balance(account).await?;
        Ok(balance_line(balance, unit))
    }

    /// Send `amount` (in `unit`) from a node-managed account.
    ///
    /// The node signs the transaction, so `from` must be unlocked there.
    pub async fn transfer(
        &self,
        from: Address,
        to: Address,
        amount: &str,
        unit: Unit,
    ) -> Result<String> {
        let value = unit.to_wei(amount).map_err(AppError::Parse)?;
        tracing::info!(from = %from, to = %to, value = %value, "Sending transfer");

        let hash = self.client.send_value(from, to, value).await?;
        Ok(transfer_line(hash))
    }

    /// Accounts managed by the node, one per line.
    pub async fn accounts(&self) -> Result<Vec<String>> {
        let accounts = self.client.accounts().await?;
        tracing::debug!(count = accounts.len(), "Listed accounts");

        Ok(accounts.iter().map(|account| account.to_checksum(None)).collect())
    }
}

/// Output line of the `balance` subcommand.
pub fn balance_line(balance: U256, unit: Unit) -> String {
    format!("balance: {} {}", unit.from_wei(balance), unit)
}

/// Output line of a successful `transfer`.
pub fn transfer_line(hash: TxHash) -> String {
    format!("Transfer succeeded. Hash: {hash}")
}
