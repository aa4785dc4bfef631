//! # Dashboard Binary
//!
//! Loads configuration, wires the alloy client and price feed into
//! [`DashboardApp`], then either watches the vault or sends one transaction.

use anyhow::{bail, Context};
use dashboard::cli::{Command, USAGE};
use dashboard::core::service::VaultService;
use dashboard::debug::{init_logger, LogConfig};
use dashboard::flows::{
    BridgeFlow, ClaimRedemptionFlow, DepositFlow, FeeClaimFlow, FlowError, ReceiverFlow,
    RequestRedemptionFlow, VoteFlow,
};
use dashboard::DashboardApp;
use lib_core::Config;
use lib_evm::client::parse_address;
use lib_evm::{Address, CoinGeckoClient, ReceiptSummary, VaultClient};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Before logging, so RUST_LOG and DASHBOARD_LOG_* can come from .env
    dotenvy::dotenv().ok();
    let _log_guard = init_logger(&LogConfig::from_env());

    let command = match Command::parse(std::env::args().skip(1)) {
        Ok(Command::Help) => {
            println!("{}", USAGE);
            return Ok(());
        }
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };

    let config = Config::load().context("Failed to load configuration")?;
    info!(
        app = %config.app_name,
        chain_id = config.chain_id,
        network = %config.chain_network,
        vault = %config.stpendle_address,
        "Configuration loaded"
    );

    let intervals = config.poll_intervals();
    let client = VaultClient::builder()
        .rpc_url(config.rpc_url.clone())
        .vault_address(config.stpendle_address.clone())
        .token_address(config.pendle_token_address.clone())
        .private_key(config.wallet_private_key.clone())
        .receipt_poll_interval(intervals.receipt)
        .build()
        .context("Failed to build vault client")?;

    if let Err(e) = client.health_check(config.chain_id).await {
        warn!(error = %e, "RPC health check failed; cards will show read errors");
    }

    let account = resolve_account(&command, client.signer_address())?;
    let price = CoinGeckoClient::new(config.network_kind()).context("Failed to build price feed")?;
    let app = DashboardApp::new(
        Arc::new(client),
        Arc::new(price),
        config.pendle_coingecko_id.clone(),
        intervals,
        account,
    );

    match command {
        Command::Watch { .. } => watch(&app).await,
        Command::Snapshot { json, .. } => {
            app.refresh_once().await;
            if json {
                println!("{}", serde_json::to_string_pretty(&app.cards())?);
            } else {
                println!("{}", app.render());
            }
            Ok(())
        }
        command => execute(&app, &config, command).await,
    }
}

/// Watched account: the explicit address for reads, otherwise the signer.
fn resolve_account(command: &Command, signer: Option<Address>) -> anyhow::Result<Option<Address>> {
    match command {
        Command::Watch {
            account: Some(address),
        }
        | Command::Snapshot {
            account: Some(address),
            ..
        } => {
            Ok(Some(parse_address(address)?))
        }
        command if command.is_write() && signer.is_none() => {
            bail!("WALLET_PRIVATE_KEY is required to send transactions")
        }
        _ => Ok(signer),
    }
}

/// Print cards whenever a poll lands, until Ctrl-C.
async fn watch(app: &DashboardApp) -> anyhow::Result<()> {
    let root = CancellationToken::new();
    let pollers = app.start_polling(&root);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupt received");
                break;
            }
            update = app.next_event(&root) => match update {
                Some(true) => println!("{}\n", app.render()),
                Some(false) => {}
                None => break,
            },
        }
    }

    root.cancel();
    pollers.shutdown().await;
    Ok(())
}

/// Refresh state, run the flow for `command` and report the outcome.
async fn execute(app: &DashboardApp, config: &Config, command: Command) -> anyhow::Result<()> {
    app.refresh_once().await;
    let ctx = app.flow_context();
    let vault = app.vault();
    let service: &dyn VaultService = vault.as_ref();
    let events = app.event_tx();

    let result: Result<ReceiptSummary, FlowError> = match command {
        Command::Deposit { amount, receiver } => {
            let mut flow = DepositFlow::new().with_events(events);
            flow.amount = amount;
            flow.receiver = receiver.unwrap_or_default();
            if let Some(shares) = flow.preview_shares(&ctx) {
                println!("Expected shares: {:.4}", shares);
            }
            flow.submit(service, &ctx).await
        }
        Command::RequestRedemption { shares, epoch } => {
            let mut flow = RequestRedemptionFlow::new().with_events(events);
            flow.shares = shares;
            flow.epoch = epoch.unwrap_or_default();
            if let Some(assets) = flow.preview_assets(&ctx) {
                println!("Expected assets: {:.4}", assets);
            }
            flow.submit(service, &ctx).await
        }
        Command::Claim { shares } => {
            let mut flow = ClaimRedemptionFlow::new().with_events(events);
            flow.shares = shares;
            flow.submit(service, &ctx).await
        }
        Command::ClaimFees { total_accrued, proof } => {
            let mut flow = FeeClaimFlow::new().with_events(events);
            flow.total_accrued = total_accrued;
            flow.proof = proof;
            flow.submit(service, &ctx).await
        }
        Command::Bridge {
            chain_selector,
            amount,
            receiver,
        } => {
            let mut flow = BridgeFlow::new().with_events(events);
            flow.chain_selector = chain_selector;
            flow.amount = amount;
            flow.receiver = receiver.unwrap_or_default();
            if let Err(e) = flow.refresh_fee_token(service).await {
                warn!(error = %e, "Failed to read bridge fee token");
            }
            println!(
                "Bridging to {} (fee paid in {})",
                flow.destination().unwrap_or("unsupported chain"),
                flow.fee_token_label()
            );
            flow.submit(service, &ctx).await
        }
        Command::Vote { entries } => {
            let mut flow = VoteFlow::new().with_events(events);
            flow.entries = entries;
            flow.submit(service, &ctx).await
        }
        Command::SetReceiver { kind, receiver } => {
            let mut flow = ReceiverFlow::new(kind).with_events(events);
            flow.receiver = receiver;
            flow.submit(service, &ctx).await
        }
        Command::Watch { .. } | Command::Snapshot { .. } | Command::Help => return Ok(()),
    };

    app.on_tick();
    match result {
        Ok(receipt) => {
            println!(
                "Confirmed in block {}: {}",
                receipt
                    .block_number
                    .map(|b| b.to_string())
                    .unwrap_or_else(|| "?".to_string()),
                config.explorer_tx_url(&receipt.tx_hash.to_string())
            );
            Ok(())
        }
        Err(e) => bail!(e),
    }
}
