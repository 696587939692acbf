//! Post content construction
//!
//! Builds title/body pairs for link and mint posts. Every post carries a
//! fresh random suffix so consecutive posts from the same account never
//! collide textually on the platform; the randomness is for dedup
//! avoidance, not security.

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::Serialize;

use crate::error::{MoltcastError, Result};

/// Domain line appended under the link payload
const LINK_FOOTER: &str = "mbc20.xyz";

/// Title and body of a post to submit
#[derive(Debug, Clone, PartialEq)]
pub struct PostContent {
    pub title: String,
    pub body: String,
}

/// Single-line JSON payload of a wallet-link post. Field order matters
/// to the indexer, so this is a struct rather than a json! literal.
#[derive(Serialize)]
struct LinkPayload<'a> {
    p: &'a str,
    op: &'a str,
    wallet: &'a str,
}

/// 10 characters drawn uniformly from [0-9a-zA-Z]
pub fn random_suffix() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(10)
        .map(char::from)
        .collect()
}

/// Validate a wallet address before any remote call: `0x` prefix and
/// exactly 42 characters total.
pub fn validate_wallet(address: &str) -> Result<()> {
    if address.is_empty() {
        return Err(MoltcastError::InvalidInput(
            "Wallet address must not be empty".to_string(),
        ));
    }
    if !address.starts_with("0x") || address.len() != 42 {
        return Err(MoltcastError::InvalidInput(
            "Wallet address must start with 0x and be 42 characters long".to_string(),
        ));
    }
    Ok(())
}

/// Body of a wallet-link post for the given address
pub fn link_body(wallet: &str) -> String {
    let payload = LinkPayload {
        p: "mbc-20",
        op: "link",
        wallet,
    };
    // Struct serialization never fails for plain string fields
    let line = serde_json::to_string(&payload).unwrap_or_default();
    format!("{}\n\n{}", line, LINK_FOOTER)
}

/// Build a wallet-link post. The caller validates the address first.
pub fn link_post(wallet: &str) -> PostContent {
    PostContent {
        title: format!("Link wallet {}", random_suffix()),
        body: link_body(wallet),
    }
}

/// Build a mint post from the configured template and title prefix.
/// Title and body get independently drawn suffixes.
pub fn mint_post(template: &str, title_prefix: &str) -> PostContent {
    PostContent {
        title: format!("{} {}", title_prefix, random_suffix()),
        body: format!("{}\n{}", template, random_suffix()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_suffix_length_and_alphabet() {
        let suffix = random_suffix();
        assert_eq!(suffix.len(), 10);
        assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_random_suffix_varies_between_calls() {
        // 62^10 possibilities; a collision here would be astronomical
        assert_ne!(random_suffix(), random_suffix());
    }

    #[test]
    fn test_validate_wallet_accepts_42_char_0x() {
        let wallet = format!("0x{}", "a".repeat(40));
        assert!(validate_wallet(&wallet).is_ok());

        // Mixed-case hex is fine
        let wallet = format!("0x{}{}", "AbCdEf1234".repeat(3), "0123456789");
        assert_eq!(wallet.len(), 42);
        assert!(validate_wallet(&wallet).is_ok());
    }

    #[test]
    fn test_validate_wallet_rejects_bad_input() {
        assert!(validate_wallet("").is_err());
        assert!(validate_wallet("0xABC").is_err());
        let no_prefix = "a".repeat(42);
        assert!(validate_wallet(&no_prefix).is_err());
        let too_long = format!("0x{}", "a".repeat(41));
        assert!(validate_wallet(&too_long).is_err());
    }

    #[test]
    fn test_link_body_format() {
        let wallet = format!("0x{}", "1".repeat(40));
        let body = link_body(&wallet);
        let expected = format!(
            "{{\"p\":\"mbc-20\",\"op\":\"link\",\"wallet\":\"{}\"}}\n\nmbc20.xyz",
            wallet
        );
        assert_eq!(body, expected);
    }

    #[test]
    fn test_link_post_title_and_body() {
        let wallet = format!("0x{}", "2".repeat(40));
        let post = link_post(&wallet);
        assert!(post.title.starts_with("Link wallet "));
        assert_eq!(post.title.len(), "Link wallet ".len() + 10);
        assert!(post.body.contains(&wallet));
    }

    #[test]
    fn test_mint_post_uses_template_and_prefix() {
        let post = mint_post("mint payload", "MBC-20 Mint: CLAW");
        assert!(post.title.starts_with("MBC-20 Mint: CLAW "));
        assert!(post.body.starts_with("mint payload\n"));
        let suffix = post.body.rsplit('\n').next().unwrap();
        assert_eq!(suffix.len(), 10);
    }

    #[test]
    fn test_mint_suffixes_are_independent() {
        let post = mint_post("t", "p");
        let title_suffix = post.title.rsplit(' ').next().unwrap();
        let body_suffix = post.body.rsplit('\n').next().unwrap();
        // Independent draws; equality would be a 1-in-62^10 fluke
        assert_ne!(title_suffix, body_suffix);
    }
}
