//! Mock Moltbook API for testing
//!
//! A configurable test double that can simulate post/index/register
//! successes and failures per account, while recording every call for
//! verification. Available outside cfg(test) so integration tests can
//! use it.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use crate::error::{ApiError, Result};
use crate::types::Account;

use super::{IndexReceipt, MoltbookApi, PostReceipt, RegisteredAgent};

/// A create_post call, as seen by the mock
#[derive(Debug, Clone)]
pub struct RecordedPost {
    pub account: String,
    pub title: String,
    pub content: String,
}

#[derive(Default)]
pub struct MockApi {
    /// Accounts whose create_post calls should fail, with the error text
    post_failures: HashMap<String, String>,
    /// Whether index_post fails (for every account)
    index_fails: bool,
    /// Verification flag echoed back on successful posts
    verification_required: bool,
    next_post_id: AtomicI64,
    posts: Mutex<Vec<RecordedPost>>,
    indexed: Mutex<Vec<i64>>,
    registered: Mutex<Vec<String>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            next_post_id: AtomicI64::new(100),
            ..Default::default()
        }
    }

    /// Make create_post fail for the named account
    pub fn fail_post(mut self, account: &str, error: &str) -> Self {
        self.post_failures
            .insert(account.to_string(), error.to_string());
        self
    }

    /// Make every index_post call fail
    pub fn fail_index(mut self) -> Self {
        self.index_fails = true;
        self
    }

    pub fn require_verification(mut self) -> Self {
        self.verification_required = true;
        self
    }

    /// Posts submitted so far, in call order
    pub fn posts(&self) -> Vec<RecordedPost> {
        self.posts.lock().unwrap().clone()
    }

    /// Post ids passed to index_post, in call order
    pub fn indexed(&self) -> Vec<i64> {
        self.indexed.lock().unwrap().clone()
    }

    pub fn registered(&self) -> Vec<String> {
        self.registered.lock().unwrap().clone()
    }
}

#[async_trait]
impl MoltbookApi for MockApi {
    async fn create_post(
        &self,
        account: &Account,
        title: &str,
        content: &str,
    ) -> Result<PostReceipt> {
        if let Some(error) = self.post_failures.get(&account.name) {
            return Err(ApiError::Posting(error.clone()).into());
        }

        self.posts.lock().unwrap().push(RecordedPost {
            account: account.name.clone(),
            title: title.to_string(),
            content: content.to_string(),
        });

        let id = self.next_post_id.fetch_add(1, Ordering::SeqCst);
        Ok(PostReceipt {
            post_id: Some(id),
            post_url: Some(format!("https://moltbook.com/post/{}", id)),
            verification_required: self.verification_required,
        })
    }

    async fn index_post(&self, _account: &Account, post_id: i64) -> Result<IndexReceipt> {
        if self.index_fails {
            return Err(ApiError::Indexing("HTTP 503: Unknown error".to_string()).into());
        }
        self.indexed.lock().unwrap().push(post_id);
        Ok(IndexReceipt { processed: true })
    }

    async fn register_agent(
        &self,
        name: &str,
        _description: Option<&str>,
    ) -> Result<RegisteredAgent> {
        self.registered.lock().unwrap().push(name.to_string());
        Ok(RegisteredAgent {
            name: name.to_string(),
            api_key: format!("mb_{}", name),
            claim_url: Some(format!("https://moltbook.com/claim/{}", name)),
        })
    }
}
