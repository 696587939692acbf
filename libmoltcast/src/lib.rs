//! Moltcast - automation tools for Moltbook agent accounts
//!
//! This library provides the core functionality for posting to the
//! Moltbook platform on behalf of registered agents: wallet-link posts,
//! repeated mint posts, and agent registration, with per-account state
//! persisted in a local JSON store.

pub mod api;
pub mod config;
pub mod content;
pub mod eligibility;
pub mod error;
pub mod store;
pub mod types;
pub mod workflow;

// Re-export commonly used types
pub use config::Config;
pub use error::{MoltcastError, Result};
pub use store::AccountStore;
pub use types::{Account, AttemptResult, PostKind, RunSummary};
