//! Historical ether transfer scan.

use std::{collections::HashSet, sync::Arc};

use alloy::primitives::Address;
use async_trait::async_trait;

use crate::{
    error::Result,
    ethereum::NodeClient,
    types::TransferRecord,
};

/// Where blocks come from.
#[async_trait]
pub trait BlockSource: Send + Sync {
    /// Latest block number.
    async fn latest_block(&self) -> Result<u64>;

    /// Ether transfers of block `number`, in transaction index order.
    async fn block_transfers(&self, number: u64) -> Result<Vec<TransferRecord>>;
}

#[async_trait]
impl BlockSource for NodeClient {
    async fn latest_block(&self) -> Result<u64> {
        self.block_number().await
    }

    async fn block_transfers(&self, number: u64) -> Result<Vec<TransferRecord>> {
        NodeClient::block_transfers(self, number).await
    }
}

#[async_trait]
impl<T: BlockSource + ?Sized> BlockSource for Arc<T> {
    async fn latest_block(&self) -> Result<u64> {
        (**self).latest_block().await
    }

    async fn block_transfers(&self, number: u64) -> Result<Vec<TransferRecord>> {
        (**self).block_transfers(number).await
    }
}

/// Parameters of one scan.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Initial reporting set. Empty means report everything.
    pub addresses: Vec<Address>,
    /// Grow the reporting set with both parties of every reported transfer.
    /// Ignored when `addresses` is empty.
    pub add: bool,
    /// First block, inclusive.
    pub first_block: u64,
    /// Last block, inclusive. `None` means the latest block.
    pub last_block: Option<u64>,
}

/// Addresses a scan reports on.
#[derive(Debug, Clone, Default)]
pub struct ReportingSet {
    addresses: HashSet<Address>,
}

impl ReportingSet {
    pub fn new(addresses: impl IntoIterator<Item = Address>) -> Self {
        Self { addresses: addresses.into_iter().collect() }
    }

    /// An empty set matches every transfer.
    pub fn matches(&self, record: &TransferRecord) -> bool {
        self.addresses.is_empty()
            || self.addresses.contains(&record.from)
            || self.addresses.contains(&record.to)
    }

    pub fn extend_with(&mut self, record: &TransferRecord) {
        self.addresses.insert(record.from);
        self.addresses.insert(record.to);
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.addresses.contains(address)
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}

/// Walks a block range and reports matching transfers.
pub struct TransferScanner<S> {
    source: S,
}

impl<S: BlockSource> TransferScanner<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Scan and hand every matching transfer to `emit`, in block order.
    ///
    /// Returns the number of transfers emitted.
    pub async fn scan<F>(&self, options: &ScanOptions, mut emit: F) -> Result<usize>
    where
        F: FnMut(&TransferRecord) -> Result<()>,
    {
        let last_block = match options.last_block {
            Some(last) => last,
            None => self.source.latest_block().await?,
        };
        let mut set = ReportingSet::new(options.addresses.iter().copied());
        // Growing an empty set would turn "everything" into a filter.
        let grow = options.add && !set.is_empty();
        let mut emitted = 0;

        tracing::info!(
            first = options.first_block,
            last = last_block,
            addresses = set.len(),
            add = options.add,
            "Scanning blocks"
        );

        // An empty range when first > last.
        for number in options.first_block..=last_block {
            for record in self.source.block_transfers(number).await? {
                if !set.matches(&record) {
                    continue;
                }

                emit(&record)?;
                emitted += 1;

                if grow {
                    set.extend_with(&record);
                }
            }
        }

        tracing::debug!(emitted = emitted, "Scan finished");
        Ok(emitted)
    }

    /// Scan and collect the matching transfers.
    pub async fn collect(&self, options: &ScanOptions) -> Result<Vec<TransferRecord>> {
        let mut records = Vec::new();
        self.scan(options, |record| {
            records.push(record.clone());
            Ok(())
        })
        .await?;
        Ok(records)
    }
}
