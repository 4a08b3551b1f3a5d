//! Wallet management.

use std::path::{Path, PathBuf};

use alloy::{
    network::EthereumWallet,
    primitives::{Address, Signature},
    signers::{
        local::{coins_bip39::English, MnemonicBuilder, PrivateKeySigner},
        SignerSync,
    },
};

use crate::error::{AppError, Result};

/// Wallet manager for transaction and message signing.
#[derive(Clone)]
pub struct WalletManager {
    /// The local signer.
    signer: PrivateKeySigner,
    /// Wallet address.
    address: Address,
}

impl WalletManager {
    fn from_signer(signer: PrivateKeySigner, source: &str) -> Self {
        let address = signer.address();
        tracing::info!(address = %address, source = source, "Wallet initialized");
        Self { signer, address }
    }

    /// Create a wallet manager from a private key string.
    pub fn from_private_key(private_key: &str) -> Result<Self> {
        // Remove 0x prefix if present
        let key = private_key.strip_prefix("0x").unwrap_or(private_key);

        let signer: PrivateKeySigner =
            key.parse().map_err(|e: alloy::signers::local::LocalSignerError| {
                AppError::Wallet(e.to_string())
            })?;

        Ok(Self::from_signer(signer, "private key"))
    }

    /// Decrypt a JSON keystore file.
    pub fn from_keystore(path: impl AsRef<Path>, password: &str) -> Result<Self> {
        let path = path.as_ref();
        let signer = PrivateKeySigner::decrypt_keystore(path, password).map_err(|e| {
            AppError::Wallet(format!("Cannot decrypt keystore {}: {}", path.display(), e))
        })?;

        Ok(Self::from_signer(signer, "keystore"))
    }

    /// Derive account `m/44'/60'/0'/0/{index}` from a BIP-39 mnemonic.
    pub fn from_mnemonic(phrase: &str, index: u32) -> Result<Self> {
        let signer = MnemonicBuilder::<English>::default()
            .phrase(phrase.trim())
            .index(index)?
            .build()?;

        Ok(Self::from_signer(signer, "mnemonic"))
    }

    /// A fresh random account.
    pub fn random() -> Self {
        let signer = PrivateKeySigner::random();
        let address = signer.address();
        Self { signer, address }
    }

    /// Get the wallet address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Wallet to plug into a provider.
    pub fn ethereum_wallet(&self) -> EthereumWallet {
        EthereumWallet::from(self.signer.clone())
    }

    /// EIP-191 signature of `message`.
    pub fn sign_message(&self, message: &[u8]) -> Result<Signature> {
        Ok(self.signer.sign_message_sync(message)?)
    }
}

impl std::fmt::Debug for WalletManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletManager").field("address", &self.address).finish()
    }
}

/// Recover the address that produced an EIP-191 signature of `message`.
pub fn recover_signer(message: &[u8], signature: &Signature) -> Result<Address> {
    signature
        .recover_address_from_msg(message)
        .map_err(|e| AppError::Wallet(format!("Cannot recover signer: {}", e)))
}

/// First file of a keystore directory, by name.
pub fn first_keystore_file(dir: impl AsRef<Path>) -> Result<PathBuf> {
    let dir = dir.as_ref();
    let mut files = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .collect::<Vec<_>>();
    files.sort();

    files
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Config(format!("No keystore files in {}", dir.display())))
}
