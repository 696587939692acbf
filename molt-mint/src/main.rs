//! molt-mint - Submit MBC-20 mint posts for all active agent accounts
//!
//! Runs the mint workflow once, or repeatedly at a fixed wall-clock
//! interval until interrupted with Ctrl+C.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use libmoltcast::api::HttpApi;
use libmoltcast::{config::Config, workflow, AccountStore, MoltcastError, Result};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "molt-mint")]
#[command(version)]
#[command(about = "Submit MBC-20 mint posts for all active agent accounts")]
#[command(long_about = "\
molt-mint - Submit MBC-20 mint posts for all active agent accounts

Posts the configured mint template once for every active account that is
outside its delay window, then updates each account's last_post in the
store. With an interval, repeats forever until interrupted.

USAGE:
    # Single run
    molt-mint

    # Repeat every 30 minutes
    molt-mint 30

SIGNALS:
    SIGTERM, SIGINT - stop after the in-flight account finishes
")]
struct Cli {
    /// Repeat interval in minutes; omit to run once
    repeat_minutes: Option<f64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("✖ Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn setup_signal_handlers(shutdown: Arc<AtomicBool>) -> Result<()> {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM])
        .map_err(|e| MoltcastError::InvalidInput(format!("Signal setup failed: {}", e)))?;

    std::thread::spawn(move || {
        if signals.forever().next().is_some() {
            println!("\nStopping...");
            shutdown.store(true, Ordering::Relaxed);
        }
    });

    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let store = AccountStore::new(config.accounts_path());

    let accounts = store.load()?;
    if accounts.is_empty() {
        return Err(MoltcastError::InvalidInput(
            "No accounts in the store. Run molt-register first.".to_string(),
        ));
    }

    println!("\nFound {} account(s):", accounts.len());
    for (i, account) in accounts.iter().enumerate() {
        let marker = if account.is_active() {
            ""
        } else {
            " (status = 0 - skipped)"
        };
        println!("  {}. {}{}", i + 1, account.name, marker);
    }
    let active = accounts.iter().filter(|a| a.is_active()).count();
    let inactive = accounts.len() - active;
    if inactive > 0 {
        println!("\n⚠ {} account(s) will be skipped (status = 0)", inactive);
    }
    println!("✓ {} account(s) will be posted for", active);

    let shutdown = Arc::new(AtomicBool::new(false));
    setup_signal_handlers(shutdown.clone())?;

    let api = HttpApi::new(config.api.clone());
    info!("Posting to {}", config.api.post_url);

    match cli.repeat_minutes {
        Some(minutes) if minutes > 0.0 => {
            println!("\nRepeat mode: every {} minute(s)", minutes);
            println!("Press Ctrl+C to stop\n");
            workflow::run_mint_repeating(&api, &store, &config.mint, minutes, &shutdown).await?;
            println!("\nMinting stopped.");
        }
        _ => {
            println!("\nPosting for {} account(s)...\n", active);
            let summary = workflow::run_mint(&api, &store, &config.mint, &shutdown).await?;
            workflow::print_summary(&summary, "Summary");
        }
    }

    Ok(())
}
