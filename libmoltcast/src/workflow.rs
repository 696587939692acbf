//! Posting workflow orchestration
//!
//! Runs link and mint posts over accounts strictly sequentially: submit
//! the post, persist the account state on success, wait for the platform
//! to ingest it, then request indexing. A single account's failure never
//! aborts the run; a store write failure does, because state consistency
//! can no longer be guaranteed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::api::MoltbookApi;
use crate::config::MintConfig;
use crate::content::{self, PostContent};
use crate::eligibility;
use crate::error::Result;
use crate::store::AccountStore;
use crate::types::{Account, AttemptResult, PostKind, RunSummary};

/// Pause after a successful post before asking the indexer to pick it
/// up. Fixed and not cancellable.
const INDEX_WAIT: Duration = Duration::from_secs(5);

/// Pause between consecutive account attempts to reduce rate-limit risk
const ACCOUNT_PAUSE: Duration = Duration::from_secs(1);

/// Which account fields to touch after a successful post
enum StateUpdate<'a> {
    /// Link mode: record the wallet and the post time
    LinkWallet(&'a str),
    /// Mint mode: only the post time
    TouchLastPost,
}

/// Current Unix timestamp in seconds, as stored in `last_post`
pub fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Run the wallet-link workflow over the user-selected accounts.
///
/// The delay gate is re-checked right before each attempt; accounts that
/// slipped inside their window since selection are skipped, not failed.
/// The summary denominator is the number of selected accounts.
pub async fn run_link(
    api: &dyn MoltbookApi,
    store: &AccountStore,
    wallet: &str,
    selected: &[Account],
    shutdown: &AtomicBool,
) -> Result<RunSummary> {
    let total = selected.len();
    let mut summary = RunSummary {
        attempted: total,
        ..Default::default()
    };

    for (i, account) in selected.iter().enumerate() {
        if shutdown.load(Ordering::Relaxed) {
            info!("Shutdown requested, stopping run");
            break;
        }

        if let Err(skip) = eligibility::check(account, now_unix(), PostKind::Link) {
            println!("[{}/{}] Skipping {} ({})", i + 1, total, account.name, skip);
            continue;
        }

        println!("[{}/{}] Posting as {}...", i + 1, total, account.name);
        let post = content::link_post(wallet);
        let result =
            attempt_post(api, store, account, post, StateUpdate::LinkWallet(wallet)).await?;
        summary.record(result);

        if i < total - 1 {
            sleep(ACCOUNT_PAUSE).await;
        }
    }

    Ok(summary)
}

/// Run the mint workflow over every stored account.
///
/// Disabled and delay-pending accounts are skipped inline. The summary
/// denominator is the count of active accounts, not just the eligible
/// ones.
pub async fn run_mint(
    api: &dyn MoltbookApi,
    store: &AccountStore,
    mint: &MintConfig,
    shutdown: &AtomicBool,
) -> Result<RunSummary> {
    let accounts = store.load()?;
    let total = accounts.len();
    let mut summary = RunSummary {
        attempted: accounts.iter().filter(|a| a.is_active()).count(),
        ..Default::default()
    };

    for (i, account) in accounts.iter().enumerate() {
        if shutdown.load(Ordering::Relaxed) {
            info!("Shutdown requested, stopping run");
            break;
        }

        if let Err(skip) = eligibility::check(account, now_unix(), PostKind::Mint) {
            println!("[{}/{}] Skipping {} ({})", i + 1, total, account.name, skip);
            continue;
        }

        println!("[{}/{}] Posting as {}...", i + 1, total, account.name);
        let post = content::mint_post(&mint.template, &mint.title_prefix);
        let result = attempt_post(api, store, account, post, StateUpdate::TouchLastPost).await?;
        summary.record(result);

        if i < total - 1 {
            sleep(ACCOUNT_PAUSE).await;
        }
    }

    Ok(summary)
}

/// Run the mint workflow on a fixed wall-clock interval until
/// interrupted. Eligibility is re-evaluated per account on every
/// iteration.
pub async fn run_mint_repeating(
    api: &dyn MoltbookApi,
    store: &AccountStore,
    mint: &MintConfig,
    repeat_minutes: f64,
    shutdown: &AtomicBool,
) -> Result<()> {
    let interval_ms = (repeat_minutes * 60_000.0) as u64;
    let mut iteration: u64 = 1;
    let mut total_success = 0;
    let mut total_failure = 0;

    loop {
        if iteration > 1 {
            println!("\n{}", "=".repeat(50));
            println!("Mint run #{}", iteration);
            println!("{}", "=".repeat(50));
        }

        let summary = run_mint(api, store, mint, shutdown).await?;
        total_success += summary.success_count;
        total_failure += summary.failure_count;
        print_summary(&summary, &format!("Run #{} summary", iteration));

        if shutdown.load(Ordering::Relaxed) {
            break;
        }

        let next_run = chrono::Local::now() + chrono::Duration::milliseconds(interval_ms as i64);
        println!("Next run at {}", next_run.format("%H:%M:%S"));
        println!(
            "Totals so far: ✓ {} succeeded, ✖ {} failed\n",
            total_success, total_failure
        );

        // Sleep in one-second slices so an interrupt is observed promptly
        let mut remaining = interval_ms;
        while remaining > 0 {
            if shutdown.load(Ordering::Relaxed) {
                return Ok(());
            }
            let slice = remaining.min(1000);
            sleep(Duration::from_millis(slice)).await;
            remaining -= slice;
        }

        iteration += 1;
    }

    Ok(())
}

/// One account's post → persist → wait → index pass.
///
/// API failures are captured into the returned result; only a store
/// write failure propagates as an error.
async fn attempt_post(
    api: &dyn MoltbookApi,
    store: &AccountStore,
    account: &Account,
    post: PostContent,
    update: StateUpdate<'_>,
) -> Result<AttemptResult> {
    let receipt = match api.create_post(account, &post.title, &post.body).await {
        Ok(receipt) => receipt,
        Err(e) => {
            println!("  ✖ {}", e);
            return Ok(AttemptResult::failure(&account.name, e.to_string()));
        }
    };

    match receipt.post_id {
        Some(id) => println!("  ✓ Posted! Post ID: {}", id),
        None => println!("  ✓ Posted (no post id returned)"),
    }
    if receipt.verification_required {
        println!("  ⚠ Verification required before the post is public");
    }

    if let Some(post_id) = receipt.post_id {
        let timestamp = now_unix();
        store.update(&account.name, |acc| {
            acc.last_post = timestamp;
            if let StateUpdate::LinkWallet(wallet) = update {
                acc.wallet_link = Some(wallet.to_string());
            }
        })?;
        println!("  ✓ Updated last_post: {}", timestamp);

        println!("  ⏳ Waiting for index...");
        sleep(INDEX_WAIT).await;

        match api.index_post(account, post_id).await {
            Ok(index) => println!("  ✓ Indexed! Processed: {}", index.processed),
            Err(e) => {
                // The post itself already succeeded; indexing is best-effort
                warn!("Failed to index post {}: {}", post_id, e);
                println!("  ⚠ {}", e);
            }
        }
    }

    Ok(AttemptResult {
        account: account.name.clone(),
        success: true,
        post_id: receipt.post_id,
        post_url: receipt.post_url,
        verification_required: receipt.verification_required,
        error: None,
    })
}

/// Print the run summary and per-account details
pub fn print_summary(summary: &RunSummary, heading: &str) {
    println!("\n{}", "=".repeat(50));
    println!("{}:", heading);
    println!("  ✓ Succeeded: {}/{}", summary.success_count, summary.attempted);
    println!("  ✖ Failed: {}/{}", summary.failure_count, summary.attempted);
    println!("{}\n", "=".repeat(50));

    if summary.results.is_empty() {
        return;
    }
    println!("Details:");
    for result in &summary.results {
        if result.success {
            let id = result
                .post_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "N/A".to_string());
            println!("  ✓ {}: {}", result.account, id);
        } else {
            println!(
                "  ✖ {}: {}",
                result.account,
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockApi;
    use tempfile::TempDir;

    fn account(name: &str) -> Account {
        Account::new(name.to_string(), format!("key-{}", name), None)
    }

    fn store_with(dir: &TempDir, accounts: &[Account]) -> AccountStore {
        let store = AccountStore::new(dir.path().join("accounts.json"));
        store.save(accounts).unwrap();
        store
    }

    #[tokio::test(start_paused = true)]
    async fn test_link_updates_wallet_and_last_post() {
        let dir = TempDir::new().unwrap();
        let store = store_with(&dir, &[account("a")]);
        let api = MockApi::new();
        let shutdown = AtomicBool::new(false);
        let wallet = format!("0x{}", "a".repeat(40));

        let selected = store.load().unwrap();
        let summary = run_link(&api, &store, &wallet, &selected, &shutdown)
            .await
            .unwrap();

        assert_eq!(summary.success_count, 1);
        assert_eq!(summary.failure_count, 0);
        assert_eq!(summary.attempted, 1);

        let saved = &store.load().unwrap()[0];
        assert_eq!(saved.wallet_link.as_deref(), Some(wallet.as_str()));
        assert!(saved.last_post > 0);

        // The created post was handed to the indexer
        assert_eq!(api.indexed().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_post_failure_leaves_store_unchanged() {
        let dir = TempDir::new().unwrap();
        let store = store_with(&dir, &[account("a")]);
        let api = MockApi::new().fail_post("a", "HTTP 500: Unknown error");
        let shutdown = AtomicBool::new(false);
        let wallet = format!("0x{}", "b".repeat(40));

        let selected = store.load().unwrap();
        let summary = run_link(&api, &store, &wallet, &selected, &shutdown)
            .await
            .unwrap();

        assert_eq!(summary.success_count, 0);
        assert_eq!(summary.failure_count, 1);
        let error = summary.results[0].error.as_deref().unwrap();
        assert!(error.contains("HTTP 500"));

        let saved = &store.load().unwrap()[0];
        assert_eq!(saved.wallet_link, None);
        assert_eq!(saved.last_post, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_index_failure_keeps_post_success() {
        let dir = TempDir::new().unwrap();
        let store = store_with(&dir, &[account("a")]);
        let api = MockApi::new().fail_index();
        let shutdown = AtomicBool::new(false);

        let summary = run_mint(&api, &store, &MintConfig::default(), &shutdown)
            .await
            .unwrap();

        // Indexing failure never converts the post into a failure
        assert_eq!(summary.success_count, 1);
        assert_eq!(summary.failure_count, 0);
        assert!(store.load().unwrap()[0].last_post > 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mint_denominator_counts_active_accounts() {
        let dir = TempDir::new().unwrap();
        let mut disabled = account("off");
        disabled.status = 0;
        let mut waiting = account("waiting");
        waiting.last_post = now_unix();
        waiting.delay = 120;
        let store = store_with(&dir, &[disabled, account("ready"), waiting]);
        let api = MockApi::new();
        let shutdown = AtomicBool::new(false);

        let summary = run_mint(&api, &store, &MintConfig::default(), &shutdown)
            .await
            .unwrap();

        // Two active accounts, only one eligible and posted
        assert_eq!(summary.attempted, 2);
        assert_eq!(summary.success_count, 1);
        assert_eq!(api.posts().len(), 1);
        assert_eq!(api.posts()[0].account, "ready");
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeat_driver_stops_after_shutdown() {
        use std::sync::Arc;

        let dir = TempDir::new().unwrap();
        let store = store_with(&dir, &[account("a")]);
        let api = Arc::new(MockApi::new());
        let shutdown = Arc::new(AtomicBool::new(false));

        // Flip the flag as soon as the first post lands, as a signal
        // handler would mid-run
        let watcher_api = api.clone();
        let watcher_flag = shutdown.clone();
        let watcher = tokio::spawn(async move {
            while watcher_api.posts().is_empty() {
                sleep(Duration::from_millis(10)).await;
            }
            watcher_flag.store(true, Ordering::Relaxed);
        });

        run_mint_repeating(&*api, &store, &MintConfig::default(), 30.0, &shutdown)
            .await
            .unwrap();
        watcher.await.unwrap();

        // The loop returned after one iteration instead of sleeping the
        // 30-minute interval, and that iteration's update was persisted
        assert_eq!(api.posts().len(), 1);
        assert!(store.load().unwrap()[0].last_post > 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_before_next_account() {
        let dir = TempDir::new().unwrap();
        let store = store_with(&dir, &[account("a"), account("b")]);
        let api = MockApi::new();
        let shutdown = AtomicBool::new(true);

        let summary = run_mint(&api, &store, &MintConfig::default(), &shutdown)
            .await
            .unwrap();
        assert!(summary.results.is_empty());
        assert!(api.posts().is_empty());
    }
}
