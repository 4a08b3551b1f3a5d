//! Network and deployment constants.

// ============================================================================
// Node endpoints
// ============================================================================

/// IPC socket of the local devnet node used by the CLI tools.
pub const DEFAULT_DEVNET_URI: &str = "~/blockchain-iua/devnet/node/geth.ipc";

/// IPC socket of the test network node used by the stamp server.
pub const DEFAULT_BFATEST_URI: &str = "~/blockchain-iua/bfatest/node/geth.ipc";

/// Keystore directory of the test network node.
pub const DEFAULT_BFATEST_KEYSTORE: &str = "~/blockchain-iua/bfatest/node/keystore";

/// Ganache RPC endpoint used by the CFP server.
pub const DEFAULT_GANACHE_URI: &str = "http://localhost:7545";

// ============================================================================
// Network ids (keys of the `networks` map in build artifacts)
// ============================================================================

/// BFA test network id.
pub const BFATEST_NETWORK_ID: &str = "55555000000";

/// Ganache network id.
pub const GANACHE_NETWORK_ID: &str = "5777";

// ============================================================================
// Transactions
// ============================================================================

/// Gas limit for stamp transactions.
pub const STAMP_GAS_LIMIT: u64 = 100_000;

/// HD derivation index of the CFP server account (`m/44'/60'/0'/0/0`).
pub const SERVER_ACCOUNT_INDEX: u32 = 0;
