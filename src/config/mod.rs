//! Configuration management module.
//!
//! Command-line and environment arguments shared by the binaries, plus
//! contract artifact loading. A `.env` file is honoured through
//! [`load_dotenv`] before arguments are parsed.

mod artifact;

pub use artifact::{resolve_contract_address, ContractArtifact, NetworkDeployment};

use std::{net::SocketAddr, path::PathBuf};

use alloy::primitives::Address;
use chrono::FixedOffset;
use clap::{Args, Parser};

use crate::{
    error::{AppError, Result},
    ethereum::constants::{
        BFATEST_NETWORK_ID, DEFAULT_BFATEST_KEYSTORE, DEFAULT_BFATEST_URI, DEFAULT_DEVNET_URI,
        DEFAULT_GANACHE_URI, GANACHE_NETWORK_ID,
    },
    validation::address_arg,
};

/// Default Stamper build artifact, relative to the working directory.
pub const DEFAULT_STAMPER_ARTIFACT: &str = "../../Stamper.json";

/// Default CFP factory build artifact, relative to the working directory.
pub const DEFAULT_FACTORY_ARTIFACT: &str = "../5/build/contracts/CFPFactory.json";

/// Load a `.env` file if present.
pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    let rest = match path {
        "~" => "",
        _ => match path.strip_prefix("~/") {
            Some(rest) => rest,
            None => return PathBuf::from(path),
        },
    };

    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => PathBuf::from(path),
    }
}

/// Read a secret from the terminal without echoing it.
pub fn prompt_secret(prompt: &str) -> Result<String> {
    let secret = rpassword::prompt_password(prompt)?;
    Ok(secret.trim().to_string())
}

/// Logging arguments.
#[derive(Debug, Clone, Default, Args)]
pub struct LogArgs {
    /// Log filter used when `RUST_LOG` is not set (e.g. `info`, `debug`).
    #[arg(long = "log-level", env = "LOG_LEVEL", global = true)]
    pub log_level: Option<String>,
}

impl LogArgs {
    /// The configured level, or `default` when none was given.
    pub fn level_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.log_level.as_deref().unwrap_or(default)
    }
}

/// Node connection arguments of the command-line tools.
#[derive(Debug, Clone, Args)]
pub struct NodeArgs {
    /// Node URI: an `http(s)://` endpoint or the path of a geth IPC socket.
    #[arg(long, env = "BFA_NODE_URI", default_value = DEFAULT_DEVNET_URI, global = true)]
    pub uri: String,

    #[command(flatten)]
    pub log: LogArgs,
}

/// Arguments of `stamp-server`.
#[derive(Debug, Clone, Parser)]
#[command(name = "stamp-server", version, about = "REST server for the Stamper contract")]
pub struct StampServerArgs {
    /// Node URI: an `http(s)://` endpoint or the path of a geth IPC socket.
    #[arg(short, long, env = "BFA_NODE_URI", default_value = DEFAULT_BFATEST_URI)]
    pub uri: String,

    /// Stamper build artifact (JSON with `abi` and `networks`).
    #[arg(short, long, default_value = DEFAULT_STAMPER_ARTIFACT)]
    pub stamper: String,

    /// Keystore directory; its first file (by name) signs the transactions.
    #[arg(short, long, default_value = DEFAULT_BFATEST_KEYSTORE)]
    pub keystore: String,

    /// Keystore password. Prompted on the terminal when absent.
    #[arg(long, env = "BFA_KEYSTORE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Key of the `networks` map of the artifact.
    #[arg(long, default_value = BFATEST_NETWORK_ID)]
    pub network_id: String,

    /// Stamper address, overriding the artifact.
    #[arg(long, value_parser = address_arg)]
    pub contract_address: Option<Address>,

    /// Listen address.
    #[arg(long, env = "BFA_BIND", default_value = "127.0.0.1:5000")]
    pub bind: SocketAddr,

    #[command(flatten)]
    pub log: LogArgs,
}

impl StampServerArgs {
    /// The configured password, else prompted on the terminal.
    pub fn keystore_password(&self) -> Result<String> {
        match &self.password {
            Some(password) => Ok(password.clone()),
            None => prompt_secret("Keystore password: "),
        }
    }
}

/// Arguments of `cfp-server`.
#[derive(Debug, Clone, Parser)]
#[command(name = "cfp-server", version, about = "REST server for the call-for-proposals factory")]
pub struct CfpServerArgs {
    /// Node URI: an `http(s)://` endpoint or the path of a geth IPC socket.
    #[arg(short, long, env = "BFA_NODE_URI", default_value = DEFAULT_GANACHE_URI)]
    pub uri: String,

    /// File holding the server account mnemonic.
    #[arg(short, long = "mnemonic")]
    pub mnemonic_file: Option<PathBuf>,

    /// Mnemonic phrase, used when no file is given.
    #[arg(long = "mnemonic-phrase", env = "BFA_MNEMONIC", hide_env_values = true)]
    pub mnemonic_phrase: Option<String>,

    /// CFP factory build artifact (JSON with `abi` and `networks`).
    #[arg(long, default_value = DEFAULT_FACTORY_ARTIFACT)]
    pub factory: String,

    /// Key of the `networks` map of the artifact.
    #[arg(long, default_value = GANACHE_NETWORK_ID)]
    pub network_id: String,

    /// Factory address, overriding the artifact.
    #[arg(long, value_parser = address_arg)]
    pub contract_address: Option<Address>,

    /// Offset from UTC, in hours, used to display times.
    #[arg(
        long,
        default_value_t = -3,
        allow_negative_numbers = true,
        value_parser = clap::value_parser!(i32).range(-12..=14)
    )]
    pub utc_offset: i32,

    /// Listen address.
    #[arg(long, env = "BFA_BIND", default_value = "127.0.0.1:5000")]
    pub bind: SocketAddr,

    #[command(flatten)]
    pub log: LogArgs,
}

impl CfpServerArgs {
    /// Mnemonic from the file, else the environment, else a terminal prompt.
    pub fn mnemonic(&self) -> Result<String> {
        if let Some(path) = &self.mnemonic_file {
            let phrase = std::fs::read_to_string(expand_home(&path.to_string_lossy()))?;
            return Ok(phrase.trim().to_string());
        }

        match &self.mnemonic_phrase {
            Some(phrase) => Ok(phrase.trim().to_string()),
            None => prompt_secret("Mnemonic: "),
        }
    }

    /// Offset used to render closing times and proposal timestamps.
    pub fn display_offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset * 3600)
            .ok_or_else(|| AppError::Config(format!("Invalid UTC offset: {}", self.utc_offset)))
    }
}
