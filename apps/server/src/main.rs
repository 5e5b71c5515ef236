//! Dumper - price-drop screener
//!
//! Polls DEX pair data, alerts on sharp drops and enriches each alert with
//! cross-venue deposit status and order book spreads.

mod config;
mod pipeline;

use clap::Parser;
use config::{universe_or_empty, AppConfig, Secrets};
use pipeline::Pipeline;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use dumper_alerts::{AlertStateMachine, AuditSink, Database, MachineConfig, TelegramTransport};
use dumper_engine::{
    BatchPoller, DepositAggregator, LiquidityGate, OrderBookAggregator, StrictConfirmer,
    TokenFilter,
};
use dumper_feeds::{
    default_providers, http, load_gate_contracts, CoinGeckoListings,
    DexScreenerSource, DexToolsSource, StatusSettings, VenueRegistry,
};

/// Dumper CLI
#[derive(Parser, Debug)]
#[command(name = "dumper")]
#[command(about = "DEX price-drop screener with cross-venue enrichment", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.json")]
    config: String,

    /// Token universe file, overrides the config
    #[arg(short, long)]
    universe: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long)]
    log_level: Option<String>,

    /// Run a single sweep and exit
    #[arg(long, default_value_t = false)]
    once: bool,
}

fn init_logging(level: &str) {
    let level = match level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

#[tokio::main]
async fn main() {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let loaded = AppConfig::load(&args.config);
    let (mut config, found) = match &loaded {
        Ok(Some(config)) => (config.clone(), true),
        _ => (AppConfig::default(), false),
    };
    let log_level = args.log_level.clone().unwrap_or_else(|| config.log_level.clone());
    init_logging(&log_level);

    match loaded {
        Err(e) => {
            error!(path = %args.config, error = %e, "Failed to load config");
            return;
        }
        Ok(None) => warn!(path = %args.config, "Config file not found, using defaults"),
        Ok(Some(_)) => {}
    }
    if let Some(universe) = args.universe {
        config.universe_path = universe;
    }

    info!("🚀 Dumper starting...");
    info!("  Config: {}", if found { args.config.as_str() } else { "defaults" });
    info!("  Universe: {}", config.universe_path);
    info!("  Quote: {}", config.quote);

    let secrets = match Secrets::from_env() {
        Ok(secrets) => secrets,
        Err(e) => {
            error!(error = %e, "Missing credentials");
            return;
        }
    };

    let (universe, universe_err) = universe_or_empty(&config.universe_path);
    info!("  Addresses: {}", universe.len());

    let gate_contracts = match load_gate_contracts(&config.gate_contracts_path) {
        Ok(contracts) => contracts,
        Err(e) => {
            warn!(error = %e, "Gate.io contract map unavailable, Gate.io lookups disabled");
            Default::default()
        }
    };

    let client = match http::build_client(http::HTTP_TIMEOUT) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Failed to build HTTP client");
            return;
        }
    };

    let db = match Database::connect(&config.database_url).await {
        Ok(db) => db,
        Err(e) => {
            error!(url = %config.database_url, error = %e, "Failed to open database");
            return;
        }
    };

    if !secrets.mexc.is_configured() {
        warn!("MEXC credentials missing, MEXC deposit checks disabled");
    }
    if !secrets.bingx.is_configured() {
        warn!("BingX credentials missing, BingX deposit checks disabled");
    }
    if secrets.dextools_key.is_empty() {
        warn!("DEXTOOLS_API_KEY missing, Solana candidates cannot be confirmed");
    }

    let providers = default_providers(
        &client,
        StatusSettings {
            mexc: secrets.mexc.clone(),
            bingx: secrets.bingx.clone(),
            gate_contracts,
        },
    );
    let registry = Arc::new(VenueRegistry::with_rest_providers(&client));
    info!("  Venues: {} status, {} order book", providers.len(), registry.len());

    let audit: Arc<dyn AuditSink> = Arc::new(db.clone());
    if let Some(e) = universe_err {
        if let Err(audit_err) = audit.record_error(&format!("universe: {}", e)).await {
            error!(error = %audit_err, "Failed to write error log");
        }
    }
    let transport = Arc::new(TelegramTransport::new(&secrets.telegram_token, db));
    let alerts = AlertStateMachine::new(
        transport,
        Arc::clone(&audit),
        MachineConfig::from(&config.alerts),
    );

    let pipeline = Pipeline::new(
        TokenFilter::new(config.filter.clone()),
        LiquidityGate::new(config.gate.clone()),
        StrictConfirmer::new(
            Arc::new(DexToolsSource::new(client.clone(), secrets.dextools_key.clone())),
            config.confirm.clone(),
        ),
        Arc::new(CoinGeckoListings::new(client.clone())),
        DepositAggregator::new(providers, config.provider_timeout()),
        OrderBookAggregator::new(registry, config.quote.clone()),
        alerts,
        audit,
        secrets.telegram_channel,
    );

    let poller = BatchPoller::new(
        Arc::new(DexScreenerSource::new(client)),
        config.poller.clone(),
    );

    if args.once {
        let stats = poller.sweep(&universe, &pipeline).await;
        info!(
            batches = stats.batches,
            failed = stats.failed_batches,
            pairs = stats.pairs,
            "Single sweep complete"
        );
        return;
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for shutdown signal");
            // Keep the sender alive so the poller is not stopped.
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received, finishing current sweep");
        let _ = shutdown_tx.send(true);
    });

    poller.run(&universe, &pipeline, shutdown_rx).await;
    info!("👋 Dumper stopped");
}
