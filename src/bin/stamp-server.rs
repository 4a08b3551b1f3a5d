//! REST server for the Stamper contract.

use std::{process::ExitCode, sync::Arc};

use clap::Parser;

use bfa_toolkit::{
    config::{expand_home, load_dotenv, resolve_contract_address, StampServerArgs},
    ethereum::first_keystore_file,
    http,
    services::{OnChainStamper, StampService},
    telemetry, NodeClient, Result, WalletManager,
};

async fn run(args: StampServerArgs) -> Result<()> {
    let stamper = resolve_contract_address(args.contract_address, &args.stamper, &args.network_id)?;

    let keystore = first_keystore_file(expand_home(&args.keystore))?;
    let wallet = WalletManager::from_keystore(&keystore, &args.keystore_password()?)?;

    let client = NodeClient::connect(&args.uri, Some(&wallet)).await?;
    tracing::info!(stamper = %stamper, account = %wallet.address(), "Stamp server ready");

    let service = StampService::new(Arc::new(OnChainStamper::new(client, stamper)));
    http::serve(http::stamp::router(service), args.bind).await
}

#[tokio::main]
async fn main() -> ExitCode {
    load_dotenv();
    let args = StampServerArgs::parse();
    telemetry::init(args.log.level_or("info"));

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Stamp server failed");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
