//! Moltbook API abstraction
//!
//! The [`MoltbookApi`] trait is the seam between the posting workflow
//! and the remote platform, so tests can substitute a mock without
//! credentials or network access.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::Account;

pub mod http;
pub mod mock;

pub use http::HttpApi;
pub use mock::MockApi;

/// What the posting endpoint returned for a created post
#[derive(Debug, Clone, Default)]
pub struct PostReceipt {
    /// Created post id; the platform may omit it
    pub post_id: Option<i64>,
    pub post_url: Option<String>,
    /// Post is held until the agent is verified
    pub verification_required: bool,
}

/// What the indexing endpoint returned
#[derive(Debug, Clone, Default)]
pub struct IndexReceipt {
    pub processed: bool,
}

/// A freshly registered agent
#[derive(Debug, Clone)]
pub struct RegisteredAgent {
    pub name: String,
    pub api_key: String,
    pub claim_url: Option<String>,
}

/// Remote Moltbook operations used by the workflows
#[async_trait]
pub trait MoltbookApi: Send + Sync {
    /// Submit a post as the given account.
    ///
    /// A non-success HTTP status or an application-level failure flag in
    /// the response body is an error carrying the remote-supplied
    /// message.
    async fn create_post(
        &self,
        account: &Account,
        title: &str,
        content: &str,
    ) -> Result<PostReceipt>;

    /// Ask the indexer to ingest a freshly created post, optionally
    /// through the account's proxy.
    async fn index_post(&self, account: &Account, post_id: i64) -> Result<IndexReceipt>;

    /// Register a new agent account on the platform.
    async fn register_agent(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<RegisteredAgent>;
}
