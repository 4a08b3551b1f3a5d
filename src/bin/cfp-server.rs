//! REST server for the call-for-proposals factory.

use std::{process::ExitCode, sync::Arc};

use clap::Parser;

use bfa_toolkit::{
    config::{load_dotenv, resolve_contract_address, CfpServerArgs},
    ethereum::constants::SERVER_ACCOUNT_INDEX,
    http,
    services::{CfpService, OnChainCfp},
    telemetry, NodeClient, Result, WalletManager,
};

async fn run(args: CfpServerArgs) -> Result<()> {
    let display_offset = args.display_offset()?;
    let factory = resolve_contract_address(args.contract_address, &args.factory, &args.network_id)?;

    let wallet = WalletManager::from_mnemonic(&args.mnemonic()?, SERVER_ACCOUNT_INDEX)?;

    // One client signs as the server account, the other lets the node sign.
    let signer = NodeClient::connect(&args.uri, Some(&wallet)).await?;
    let node = NodeClient::connect(&args.uri, None).await?;
    tracing::info!(factory = %factory, account = %wallet.address(), "CFP server ready");

    let registry = OnChainCfp::new(signer, node, factory);
    let service = CfpService::new(Arc::new(registry), display_offset);
    http::serve(http::cfp::router(service), args.bind).await
}

#[tokio::main]
async fn main() -> ExitCode {
    load_dotenv();
    let args = CfpServerArgs::parse();
    telemetry::init(args.log.level_or("info"));

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "CFP server failed");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
