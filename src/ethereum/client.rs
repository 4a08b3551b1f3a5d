//! Node connection helper.

use alloy::{
    consensus::Transaction,
    eips::BlockNumberOrTag,
    network::{Ethereum, TransactionResponse},
    primitives::{Address, TxHash, U256},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    transports::ipc::IpcConnect,
};

use crate::{
    config::expand_home,
    error::{AppError, Result},
    ethereum::WalletManager,
    types::TransferRecord,
};

/// Type-erased provider over either transport.
pub type NodeProvider = DynProvider<Ethereum>;

/// How a node URI is reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// `http://` or `https://` JSON-RPC endpoint.
    Http(String),
    /// Path to a local IPC socket.
    Ipc(String),
}

impl Endpoint {
    /// Classify a node URI. Anything that is not HTTP(S) is an IPC path.
    pub fn from_uri(uri: &str) -> Self {
        if uri.starts_with("http://") || uri.starts_with("https://") {
            Endpoint::Http(uri.to_string())
        } else {
            Endpoint::Ipc(expand_home(uri).to_string_lossy().into_owned())
        }
    }
}

/// Connection to a node, verified live on creation.
///
/// With a wallet, transactions are signed locally and sent raw. Without one,
/// `eth_sendTransaction` is used and the node signs with its own accounts.
#[derive(Clone)]
pub struct NodeClient {
    /// The underlying provider.
    provider: NodeProvider,
    /// URI for logging.
    uri: String,
}

impl NodeClient {
    /// Connect to the node at `uri` and probe it.
    pub async fn connect(uri: &str, wallet: Option<&WalletManager>) -> Result<Self> {
        let endpoint = Endpoint::from_uri(uri);
        let provider = Self::build_provider(&endpoint, wallet).await?;
        let client = Self { provider, uri: uri.to_string() };

        let block = client.check_liveness().await?;
        tracing::info!(uri = %uri, block = block, signer = ?wallet.map(|w| w.address()), "Connected to node");

        Ok(client)
    }

    async fn build_provider(
        endpoint: &Endpoint,
        wallet: Option<&WalletManager>,
    ) -> Result<NodeProvider> {
        let provider = match endpoint {
            Endpoint::Http(uri) => {
                let url = uri
                    .parse()
                    .map_err(|_| AppError::Config(format!("Invalid RPC URL: {}", uri)))?;
                match wallet {
                    Some(wallet) => ProviderBuilder::new()
                        .wallet(wallet.ethereum_wallet())
                        .connect_http(url)
                        .erased(),
                    None => ProviderBuilder::new().connect_http(url).erased(),
                }
            }
            Endpoint::Ipc(path) => {
                let ipc = IpcConnect::new(path.clone());
                let connection_error = |e: alloy::transports::TransportError| {
                    AppError::Connection(format!("{}: {}", path, e))
                };
                match wallet {
                    Some(wallet) => ProviderBuilder::new()
                        .wallet(wallet.ethereum_wallet())
                        .connect_ipc(ipc)
                        .await
                        .map_err(connection_error)?
                        .erased(),
                    None => ProviderBuilder::new()
                        .connect_ipc(ipc)
                        .await
                        .map_err(connection_error)?
                        .erased(),
                }
            }
        };

        Ok(provider)
    }

    /// Verify the node answers; returns its latest block number.
    pub async fn check_liveness(&self) -> Result<u64> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| AppError::Connection(format!("{}: {}", self.uri, e)))
    }

    /// Get the underlying provider.
    pub fn provider(&self) -> &NodeProvider {
        &self.provider
    }

    /// Latest block number.
    pub async fn block_number(&self) -> Result<u64> {
        Ok(self.provider.get_block_number().await?)
    }

    /// Balance of an account, in wei.
    pub async fn balance(&self, address: Address) -> Result<U256> {
        Ok(self.provider.get_balance(address).await?)
    }

    /// Accounts managed by the node.
    pub async fn accounts(&self) -> Result<Vec<Address>> {
        Ok(self.provider.get_accounts().await?)
    }

    /// Send `value` wei from a node-managed account.
    pub async fn send_value(&self, from: Address, to: Address, value: U256) -> Result<TxHash> {
        let tx = TransactionRequest::default().from(from).to(to).value(value);
        let pending = self.provider.send_transaction(tx).await?;
        Ok(*pending.tx_hash())
    }

    /// Ether transfers contained in a block, in transaction index order.
    ///
    /// Contract creations and zero-value transactions are not transfers.
    pub async fn block_transfers(&self, number: u64) -> Result<Vec<TransferRecord>> {
        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Number(number))
            .full()
            .await?
            .ok_or_else(|| AppError::Rpc(format!("Block {} not found", number)))?;

        let transactions = block.transactions.as_transactions().unwrap_or_default();

        Ok(transfer_records(
            number,
            transactions.iter().map(|tx| (TransactionResponse::from(tx), tx)),
        ))
    }
}

/// Ether transfers among `(sender, transaction)` pairs of block `number`.
///
/// Keeps only transactions with a recipient and a non-zero value, in the
/// order given.
pub fn transfer_records<'a, T>(
    number: u64,
    transactions: impl IntoIterator<Item = (Address, &'a T)>,
) -> Vec<TransferRecord>
where
    T: Transaction + 'a,
{
    transactions
        .into_iter()
        .filter_map(|(from, tx)| {
            let to = tx.to()?;
            let value = tx.value();
            (!value.is_zero()).then_some(TransferRecord { from, to, value, block_number: number })
        })
        .collect()
}

impl std::fmt::Debug for NodeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeClient").field("uri", &self.uri).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_http() {
        assert_eq!(
            Endpoint::from_uri("http://localhost:7545"),
            Endpoint::Http("http://localhost:7545".to_string())
        );
        assert_eq!(
            Endpoint::from_uri("https://node.example:8545"),
            Endpoint::Http("https://node.example:8545".to_string())
        );
    }

    #[test]
    fn test_endpoint_ipc_path() {
        assert_eq!(
            Endpoint::from_uri("/var/run/geth.ipc"),
            Endpoint::Ipc("/var/run/geth.ipc".to_string())
        );
    }

    #[test]
    fn test_endpoint_ipc_expands_home() {
        let Endpoint::Ipc(path) = Endpoint::from_uri("~/node/geth.ipc") else {
            panic!("Expected IPC endpoint");
        };
        assert!(!path.starts_with('~'));
        assert!(path.ends_with("node/geth.ipc"));
    }

    #[test]
    fn test_transfer_records_skips_creations_and_zero_values() {
        use alloy::{
            consensus::TxLegacy,
            primitives::{address, TxKind},
        };

        let sender = address!("8ffD013B00000000000000000000000000000001");
        let first = address!("9F4BA63400000000000000000000000000000002");
        let second = address!("46e2a9e900000000000000000000000000000003");
        let tx = |to: TxKind, wei: u64| TxLegacy { to, value: U256::from(wei), ..Default::default() };

        let txs = [
            tx(TxKind::Call(second), 5),
            tx(TxKind::Create, 7),
            tx(TxKind::Call(first), 0),
            tx(TxKind::Call(first), 3),
        ];
        let records = transfer_records(42, txs.iter().map(|tx| (sender, tx)));

        assert_eq!(records.len(), 2);
        assert_eq!((records[0].to, records[0].value), (second, U256::from(5u64)));
        assert_eq!((records[1].to, records[1].value), (first, U256::from(3u64)));
        assert!(records.iter().all(|r| r.from == sender && r.block_number == 42));
    }

    #[tokio::test]
    async fn test_connect_unreachable_http_fails_fast() {
        let result = NodeClient::connect("http://127.0.0.1:9", None).await;
        assert!(matches!(result, Err(AppError::Connection(_))));
    }

    #[tokio::test]
    async fn test_connect_missing_ipc_socket_fails() {
        let result = NodeClient::connect("/nonexistent/dir/geth.ipc", None).await;
        assert!(matches!(result, Err(AppError::Connection(_))));
    }
}
