//! JSON-file account store
//!
//! The store is a flat, ordered JSON array of account records at a fixed
//! path. It is the sole source of truth: every mutation re-reads the
//! file, applies the change, and writes the whole list back immediately,
//! so a crash loses at most the step that has not yet been flushed.

use std::path::PathBuf;

use crate::error::{Result, StoreError};
use crate::types::Account;

pub struct AccountStore {
    path: PathBuf,
}

impl AccountStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Load all accounts. A missing file is an empty list, not an error.
    pub fn load(&self) -> Result<Vec<Account>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.path).map_err(StoreError::ReadError)?;
        let accounts: Vec<Account> =
            serde_json::from_str(&content).map_err(StoreError::ParseError)?;
        Ok(accounts)
    }

    /// Write the full account list back, pretty-printed, preserving order.
    pub fn save(&self, accounts: &[Account]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::WriteError(format!("create directory: {}", e)))?;
        }
        let json = serde_json::to_string_pretty(accounts).map_err(StoreError::ParseError)?;
        std::fs::write(&self.path, json)
            .map_err(|e| StoreError::WriteError(format!("{}: {}", self.path.display(), e)))?;
        Ok(())
    }

    /// Apply a mutation to the named account and persist immediately.
    pub fn update<F>(&self, name: &str, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut Account),
    {
        let mut accounts = self.load()?;
        let account = accounts
            .iter_mut()
            .find(|a| a.name == name)
            .ok_or_else(|| StoreError::UnknownAccount(name.to_string()))?;
        mutate(account);
        self.save(&accounts)
    }

    /// Merge a freshly registered account into the store by name.
    ///
    /// New names are appended. On re-registration the identity fields
    /// (`api_key`, `link_claim`) are refreshed while the mutable state
    /// (`status`, `last_post`, `wallet_link`, `delay`, proxy settings)
    /// is preserved. Returns true when a new record was appended.
    pub fn upsert(&self, account: Account) -> Result<bool> {
        let mut accounts = self.load()?;
        let appended = match accounts.iter_mut().find(|a| a.name == account.name) {
            Some(existing) => {
                existing.api_key = account.api_key;
                existing.link_claim = account.link_claim;
                false
            }
            None => {
                accounts.push(account);
                true
            }
        };
        self.save(&accounts)?;
        Ok(appended)
    }
}
