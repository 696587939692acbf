//! Account eligibility gating
//!
//! Pure checks deciding which accounts may post right now: disabled
//! accounts are always excluded, link runs exclude already-linked
//! accounts, and accounts inside their delay window are excluded with
//! the remaining wait reported in minutes.

use crate::types::{Account, PostKind};

/// Why an account is excluded from a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    /// status == 0
    Disabled,
    /// Link runs only: wallet already linked
    AlreadyLinked,
    /// Not enough time since the last post
    DelayPending { remaining_minutes: i64 },
}

impl std::fmt::Display for Skip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Skip::Disabled => write!(f, "status = 0"),
            Skip::AlreadyLinked => write!(f, "wallet already linked"),
            Skip::DelayPending { remaining_minutes } => {
                write!(f, "delay not elapsed, {} minute(s) left", remaining_minutes)
            }
        }
    }
}

/// Check one account against the gating rules, in order.
pub fn check(account: &Account, now: i64, kind: PostKind) -> Result<(), Skip> {
    if !account.is_active() {
        return Err(Skip::Disabled);
    }

    if kind == PostKind::Link && account.wallet_link.is_some() {
        return Err(Skip::AlreadyLinked);
    }

    if account.last_post > 0 {
        let required = account.delay * 60;
        let elapsed = now - account.last_post;
        if elapsed < required {
            // Ceiling division so a partial minute still counts as one
            let remaining_minutes = (required - elapsed + 59) / 60;
            return Err(Skip::DelayPending { remaining_minutes });
        }
    }

    Ok(())
}

/// Sublist of accounts permitted to post now, in input order.
pub fn eligible(accounts: &[Account], now: i64, kind: PostKind) -> Vec<Account> {
    accounts
        .iter()
        .filter(|a| check(a, now, kind).is_ok())
        .cloned()
        .collect()
}
