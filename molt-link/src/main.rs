//! molt-link - Link a wallet address to Moltbook agent accounts
//!
//! Lists the accounts currently eligible for a link post, asks which to
//! use and which wallet to link, then posts for each selected account.

use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use libmoltcast::api::HttpApi;
use libmoltcast::{
    config::Config, content, eligibility, workflow, Account, AccountStore, MoltcastError, PostKind,
    Result,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "molt-link")]
#[command(version)]
#[command(about = "Link a wallet address to Moltbook agent accounts", long_about = None)]
struct Cli {
    /// Wallet address to link (prompts if not provided)
    #[arg(short, long)]
    wallet: Option<String>,

    /// Account to post with: a number from the eligible list, or "all"
    /// (prompts if not provided)
    #[arg(short, long)]
    account: Option<String>,

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

fn prompt(question: &str) -> Result<String> {
    print!("{}", question);
    io::stdout()
        .flush()
        .map_err(|e| MoltcastError::InvalidInput(format!("Console error: {}", e)))?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| MoltcastError::InvalidInput(format!("Console error: {}", e)))?;
    Ok(line.trim().to_string())
}

/// Resolve the selection input ("all" or a 1-based index) against the
/// eligible account list.
fn select_accounts(input: &str, eligible: &[Account]) -> Result<Vec<Account>> {
    if input.eq_ignore_ascii_case("all") {
        return Ok(eligible.to_vec());
    }
    let index: usize = input
        .parse()
        .map_err(|_| MoltcastError::InvalidInput(format!("Invalid selection: {}", input)))?;
    if index == 0 || index > eligible.len() {
        return Err(MoltcastError::InvalidInput(format!(
            "Selection out of range: {} (1-{})",
            index,
            eligible.len()
        )));
    }
    Ok(vec![eligible[index - 1].clone()])
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let store = AccountStore::new(config.accounts_path());

    let all_accounts = store.load()?;
    if all_accounts.is_empty() {
        return Err(MoltcastError::InvalidInput(
            "No accounts in the store. Run molt-register first.".to_string(),
        ));
    }

    let now = workflow::now_unix();
    let eligible = eligibility::eligible(&all_accounts, now, PostKind::Link);
    if eligible.is_empty() {
        return Err(MoltcastError::InvalidInput(
            "No accounts eligible to link a wallet (already linked, disabled, or still in their delay window)".to_string(),
        ));
    }

    println!(
        "\nAccounts eligible to link a wallet ({}/{}):",
        eligible.len(),
        all_accounts.len()
    );
    for (i, account) in eligible.iter().enumerate() {
        println!("  {}. {}", i + 1, account.name);
    }

    let selection = match cli.account {
        Some(value) => value,
        None => prompt(&format!(
            "\nSelect an account (1-{}, or 'all'): ",
            eligible.len()
        ))?,
    };
    let selected = select_accounts(&selection, &eligible)?;
    if selected.len() == 1 {
        println!("\nSelected account: {}", selected[0].name);
    } else {
        println!("\nSelected all {} account(s)", selected.len());
    }

    let wallet = match cli.wallet {
        Some(value) => value,
        None => prompt("\nWallet address to link: ")?,
    };
    let wallet = wallet.trim().to_string();
    content::validate_wallet(&wallet)?;

    println!("\nWallet address: {}", wallet);
    println!("\nContent to be posted:");
    println!("{}", content::link_body(&wallet));
    println!("\nPosting for {} account(s)...\n", selected.len());

    let shutdown = Arc::new(AtomicBool::new(false));
    setup_signal_handlers(shutdown.clone())?;

    let api = HttpApi::new(config.api.clone());
    info!("Posting to {}", config.api.post_url);
    let summary = workflow::run_link(&api, &store, &wallet, &selected, &shutdown).await?;
    workflow::print_summary(&summary, "Summary");

    println!(
        "\nNote: this post lets the wallet owner claim mbc-20 token balances as ERC-20 tokens on Base."
    );
    Ok(())
}
