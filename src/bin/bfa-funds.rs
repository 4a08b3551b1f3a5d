//! Balances, transfers and node-managed accounts.

use std::{process::ExitCode, sync::Arc};

use alloy::primitives::Address;
use clap::{Parser, Subcommand};

use bfa_toolkit::{
    config::{load_dotenv, NodeArgs},
    services::FundsService,
    telemetry,
    types::Unit,
    validation::address_arg,
    NodeClient, Result,
};

#[derive(Debug, Parser)]
#[command(
    name = "bfa-funds",
    version,
    about = "Manage the funds of an account on an Ethereum network",
    long_about = "Query balances and transfer ether. Connects to the node at --uri \
                  (an http(s):// endpoint or a geth IPC socket)."
)]
struct Cli {
    #[command(flatten)]
    node: NodeArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the balance of an account
    Balance {
        /// Account to query
        #[arg(short, long, value_parser = address_arg)]
        account: Address,

        /// Unit of the printed amount
        #[arg(long, value_enum, default_value_t)]
        unit: Unit,
    },

    /// Transfer ether between accounts managed by the node
    Transfer {
        /// Source account (must be unlocked on the node)
        #[arg(long, value_parser = address_arg)]
        from: Address,

        /// Destination account
        #[arg(long, value_parser = address_arg)]
        to: Address,

        /// Amount, in --unit
        #[arg(long)]
        amount: String,

        /// Unit of --amount
        #[arg(long, value_enum, default_value_t)]
        unit: Unit,
    },

    /// List the accounts managed by the node
    Accounts,
}

async fn run(cli: Cli) -> Result<()> {
    let client = NodeClient::connect(&cli.node.uri, None).await?;
    let funds = FundsService::new(Arc::new(client));

    match cli.command {
        Command::Balance { account, unit } => {
            println!("{}", funds.balance(account, unit).await?);
        }
        Command::Transfer { from, to, amount, unit } => {
            println!("{}", funds.transfer(from, to, &amount, unit).await?);
        }
        Command::Accounts => {
            for account in funds.accounts().await? {
                println!("{account}");
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    load_dotenv();
    let cli = Cli::parse();
    telemetry::init(cli.node.log.level_or("warn"));

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
