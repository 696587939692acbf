//! Core types for Moltcast

use serde::{Deserialize, Serialize};

/// Minimum minutes between posts when an account doesn't specify one
pub const DEFAULT_DELAY_MINUTES: i64 = 120;

fn default_status() -> i64 {
    1
}

fn default_delay() -> i64 {
    DEFAULT_DELAY_MINUTES
}

/// A registered Moltbook agent account.
///
/// Round-trips the JSON account store; fields missing from older store
/// files are resolved to their defaults at load time and written back on
/// the next save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub name: String,
    pub api_key: String,
    /// Claim URL handed out at registration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_claim: Option<String>,
    /// 0 = disabled, anything else = active
    #[serde(default = "default_status")]
    pub status: i64,
    /// Unix timestamp (seconds) of the last successful post, 0 if never
    #[serde(default)]
    pub last_post: i64,
    /// Wallet address once linked, null until then
    #[serde(default)]
    pub wallet_link: Option<String>,
    /// Minimum minutes between posts
    #[serde(default = "default_delay")]
    pub delay: i64,
    /// 1 = route requests through `proxy`
    #[serde(default)]
    pub using_proxy: i64,
    #[serde(default)]
    pub proxy: Option<String>,
}

impl Account {
    /// Create an account with registration defaults
    pub fn new(name: String, api_key: String, link_claim: Option<String>) -> Self {
        Self {
            name,
            api_key,
            link_claim,
            status: 1,
            last_post: 0,
            wallet_link: None,
            delay: DEFAULT_DELAY_MINUTES,
            using_proxy: 0,
            proxy: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status != 0
    }

    /// Proxy URL to route requests through, if enabled for this account
    pub fn proxy_url(&self) -> Option<&str> {
        if self.using_proxy == 1 {
            self.proxy.as_deref()
        } else {
            None
        }
    }
}

/// Which kind of post a run submits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostKind {
    /// Associates a wallet address with the agent
    Link,
    /// Triggers token minting on the platform
    Mint,
}

/// Outcome of one posting attempt for one account
#[derive(Debug, Clone)]
pub struct AttemptResult {
    pub account: String,
    pub success: bool,
    pub post_id: Option<i64>,
    pub post_url: Option<String>,
    pub verification_required: bool,
    pub error: Option<String>,
}

impl AttemptResult {
    pub fn failure(account: &str, error: String) -> Self {
        Self {
            account: account.to_string(),
            success: false,
            post_id: None,
            post_url: None,
            verification_required: false,
            error: Some(error),
        }
    }
}

/// Aggregated outcome of one workflow run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Per-account results in attempt order
    pub results: Vec<AttemptResult>,
    pub success_count: usize,
    pub failure_count: usize,
    /// Denominator for reporting: accounts the run set out to post for
    pub attempted: usize,
}

impl RunSummary {
    pub fn record(&mut self, result: AttemptResult) {
        if result.success {
            self.success_count += 1;
        } else {
            self.failure_count += 1;
        }
        self.results.push(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_defaults_on_deserialize() {
        // Older store files carry only name and api_key
        let json = r#"{"name": "agent-1", "api_key": "mb_key"}"#;
        let account: Account = serde_json::from_str(json).unwrap();
        assert_eq!(account.status, 1);
        assert_eq!(account.last_post, 0);
        assert_eq!(account.wallet_link, None);
        assert_eq!(account.delay, 120);
        assert_eq!(account.using_proxy, 0);
        assert_eq!(account.proxy, None);
    }

    #[test]
    fn test_wallet_link_serializes_as_null() {
        let account = Account::new("agent-1".to_string(), "mb_key".to_string(), None);
        let json = serde_json::to_value(&account).unwrap();
        assert!(json.get("wallet_link").unwrap().is_null());
        assert!(json.get("proxy").unwrap().is_null());
        // link_claim is omitted entirely when absent
        assert!(json.get("link_claim").is_none());
    }

    #[test]
    fn test_proxy_url_requires_flag_and_value() {
        let mut account = Account::new("a".to_string(), "k".to_string(), None);
        assert_eq!(account.proxy_url(), None);

        account.proxy = Some("http://127.0.0.1:8080".to_string());
        assert_eq!(account.proxy_url(), None);

        account.using_proxy = 1;
        assert_eq!(account.proxy_url(), Some("http://127.0.0.1:8080"));
    }

    #[test]
    fn test_is_active() {
        let mut account = Account::new("a".to_string(), "k".to_string(), None);
        assert!(account.is_active());
        account.status = 0;
        assert!(!account.is_active());
        account.status = 2;
        assert!(account.is_active());
    }

    #[test]
    fn test_run_summary_counts() {
        let mut summary = RunSummary::default();
        summary.record(AttemptResult {
            account: "a".to_string(),
            success: true,
            post_id: Some(1),
            post_url: None,
            verification_required: false,
            error: None,
        });
        summary.record(AttemptResult::failure("b", "HTTP 500: Unknown error".to_string()));
        assert_eq!(summary.success_count, 1);
        assert_eq!(summary.failure_count, 1);
        assert_eq!(summary.results.len(), 2);
        assert_eq!(summary.results[0].account, "a");
    }
}
