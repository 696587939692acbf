//! molt-register - Register a new Moltbook agent account
//!
//! Registers the agent with the platform and merges the returned
//! credentials into the local account store. Re-registering an existing
//! name refreshes the API key while preserving the account's state.

use std::io::{self, BufRead, Write};

use clap::Parser;
use libmoltcast::api::{HttpApi, MoltbookApi};
use libmoltcast::{config::Config, Account, AccountStore, MoltcastError, Result};

#[derive(Parser, Debug)]
#[command(name = "molt-register")]
#[command(version)]
#[command(about = "Register a new Moltbook agent account", long_about = None)]
struct Cli {
    /// Agent name to register (prompts if not provided)
    name: Option<String>,

    /// Agent description (defaults to "<name>'s AI agent on Moltbook")
    #[arg(short, long)]
    description: Option<String>,

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

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let store = AccountStore::new(config.accounts_path());

    let name = match cli.name {
        Some(value) => value,
        None => prompt("Agent name: ")?,
    };
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(MoltcastError::InvalidInput(
            "Agent name must not be empty".to_string(),
        ));
    }

    println!("\nRegistering agent: {}...", name);
    let api = HttpApi::new(config.api.clone());
    let agent = api.register_agent(&name, cli.description.as_deref()).await?;

    println!("\n✓ Registered!");
    println!("  Name: {}", agent.name);
    println!("  API key: {}", agent.api_key);
    if let Some(claim_url) = &agent.claim_url {
        println!("  Claim link: {}", claim_url);
    }

    let account = Account::new(agent.name.clone(), agent.api_key, agent.claim_url);
    let appended = store.upsert(account)?;
    if appended {
        println!("  Added account: {}", agent.name);
    } else {
        println!("  Updated existing account: {}", agent.name);
    }
    println!(
        "\n✓ Saved to {}",
        store.path().display()
    );

    Ok(())
}
