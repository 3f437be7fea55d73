//! Cross-market odds aggregator entry point.

use std::net::SocketAddr;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dissonance::api::{create_router, AppState};
use dissonance::config::Config;
use dissonance::metrics;
use dissonance::pipeline::{run_cycle, Snapshot};
use dissonance::providers::ProviderClient;
use dissonance::utils::shutdown_signal;

/// Cross-market prediction odds aggregator.
#[derive(Parser, Debug)]
#[command(name = "dissonance")]
#[command(about = "Aggregates prediction-market odds across venues and flags arbitrage")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP server port, overriding PORT from the environment.
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the aggregation service (default).
    Run {
        /// HTTP server port, overriding PORT from the environment.
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Run a single refresh cycle and print the results.
    Scan,

    /// Check configuration validity.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("dissonance=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // Handle subcommands
    match args.command {
        Some(Command::CheckConfig) => cmd_check_config().await,
        Some(Command::Scan) => cmd_scan().await,
        Some(Command::Run { port }) => cmd_run(port).await,
        None => cmd_run(args.port).await,
    }
}

/// Run the aggregation service: refresh loop plus view server.
async fn cmd_run(port_override: Option<u16>) -> anyhow::Result<()> {
    // Load configuration
    info!("Loading configuration...");
    let config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    let port = port_override.unwrap_or(config.port);

    info!("Configuration loaded successfully");
    info!("Refresh interval: {}ms", config.refresh_interval_ms);
    info!("Arbitrage threshold: {}", config.arb_threshold);
    info!("Page limit: {} markets/provider", config.page_limit);
    if config.uses_relay() {
        info!("Relaying provider requests through {}", config.relay_url);
    }

    // Initialize metrics
    let metrics_handle = metrics::install_recorder();
    metrics::init_metrics();

    // Create app state
    let app_state = AppState::new(metrics_handle);

    // Start HTTP server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    let router = create_router(app_state.clone());

    // Spawn HTTP server
    let _server_handle = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    });

    // Refresh loop
    let client = ProviderClient::new(&config);
    let interval = Duration::from_millis(config.refresh_interval_ms);

    info!("Starting aggregation loop...");

    loop {
        let snapshot = run_cycle(&client, &config).await;
        log_cycle_summary(&snapshot);
        app_state.publish(snapshot).await;

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = shutdown_signal() => {
                info!("Shutdown signal received, exiting");
                break;
            }
        }
    }

    Ok(())
}

/// Log one cycle's headline numbers, distinguishing "no data" from
/// "no arbitrage".
fn log_cycle_summary(snapshot: &Snapshot) {
    let stats = snapshot.stats();

    if stats.question_count == 0 {
        info!("No data this cycle: every provider returned zero markets");
        return;
    }

    match stats.best_edge {
        Some(edge) => info!(
            questions = stats.question_count,
            opportunities = stats.opportunity_count,
            best_edge = %edge,
            "Cycle summary"
        ),
        None => info!(
            questions = stats.question_count,
            "No arbitrage detected - markets look efficient"
        ),
    }
}

/// Run a single refresh cycle and print the results.
async fn cmd_scan() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("DISSONANCE - SINGLE SCAN");
    println!("======================================================================");

    let config = Config::load()?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    let client = ProviderClient::new(&config);
    println!("\nFetching up to {} markets per provider...\n", config.page_limit);

    let snapshot = run_cycle(&client, &config).await;
    let stats = snapshot.stats();

    println!("Aggregated questions: {}", stats.question_count);
    println!("Arbitrage opportunities: {}", stats.opportunity_count);

    if stats.question_count == 0 {
        println!("\nNo data: every provider returned zero markets. Try again later.");
        println!("======================================================================");
        return Ok(());
    }

    match stats.best_edge {
        Some(edge) => println!("Best edge: +{}%", edge),
        None => println!("Best edge: - (no arbitrage right now; markets are usually efficient)"),
    }

    for (i, opp) in snapshot.opportunities.iter().take(10).enumerate() {
        println!("----------------------------------------------------------------------");
        println!("#{} [{}] {}", i + 1, opp.category, opp.question);
        println!("  Bet YES on {} @ {}", opp.yes_source, opp.yes_odds);
        println!("  Bet NO  on {} @ {}", opp.no_source, opp.no_odds);
        println!("  Implied: {}  Edge: +{}%", opp.implied_prob, opp.edge);
    }

    println!("======================================================================");

    Ok(())
}

/// Check configuration validity.
async fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("DISSONANCE - CONFIGURATION CHECK");
    println!("======================================================================");

    // Load configuration
    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    // Validate configuration
    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    // Show configuration summary
    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Refresh Interval: {}ms", config.refresh_interval_ms);
    println!("  Arbitrage Threshold: {}", config.arb_threshold);
    println!("  Page Limit: {} markets/provider", config.page_limit);
    println!("  Polymarket: {}", config.polymarket_api_url);
    println!("  Metaculus: {}", config.metaculus_api_url);
    println!("  Manifold: {}", config.manifold_api_url);
    println!(
        "  Relay: {}",
        if config.uses_relay() {
            config.relay_url.as_str()
        } else {
            "disabled (direct requests)"
        }
    );
    println!("  HTTP Timeout: {}ms", config.http_timeout_ms);
    println!("  Port: {}", config.port);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}
