//! Ether transfer records observed while scanning blocks.

use alloy::primitives::{Address, U256};

/// A single ether transfer found in a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRecord {
    /// Sender.
    pub from: Address,
    /// Receiver.
    pub to: Address,
    /// Amount in wei.
    pub value: U256,
    /// Number of the block that contains the transaction.
    pub block_number: u64,
}
