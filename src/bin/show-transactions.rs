//! Ether transfers in a range of blocks, optionally restricted to a set of
//! addresses, as plain text or a Graphviz digraph.

use std::process::ExitCode;

use alloy::primitives::Address;
use clap::Parser;

use bfa_toolkit::{
    config::{load_dotenv, NodeArgs},
    services::{OutputFormat, ReportWriter, ScanOptions, TransferScanner},
    telemetry,
    validation::address_arg,
    NodeClient, Result,
};

#[derive(Debug, Parser)]
#[command(
    name = "show-transactions",
    version,
    about = "Show the ether transfers in a range of blocks",
    long_about = "Show the ether transfers in blocks --first-block..=--last-block. \
                  With addresses, only transfers from or to one of them are shown; \
                  --add extends that set with the parties of every shown transfer."
)]
struct Cli {
    /// Addresses to report on
    #[arg(value_name = "ADDRESS", value_parser = address_arg)]
    addresses: Vec<Address>,

    /// Add the parties of every reported transfer to the addresses
    #[arg(long)]
    add: bool,

    /// First block of the range
    #[arg(short, long, default_value_t = 0)]
    first_block: u64,

    /// Last block of the range (default: latest block)
    #[arg(short, long)]
    last_block: Option<u64>,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,

    /// Truncate addresses to their first 8 hex digits
    #[arg(long)]
    short: bool,

    #[command(flatten)]
    node: NodeArgs,
}

async fn run(cli: Cli) -> Result<()> {
    let client = NodeClient::connect(&cli.node.uri, None).await?;
    let scanner = TransferScanner::new(client);
    let options = ScanOptions {
        addresses: cli.addresses,
        add: cli.add,
        first_block: cli.first_block,
        last_block: cli.last_block,
    };

    let stdout = std::io::stdout();
    let mut report = ReportWriter::new(stdout.lock(), cli.format, cli.short);
    report.begin()?;
    scanner.scan(&options, |record| report.write(record)).await?;
    report.finish()?;

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
