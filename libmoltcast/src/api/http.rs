//! HTTP implementation of the Moltbook API
//!
//! Thin reqwest wrapper around the three remote endpoints. Clients are
//! built per call because the proxy is an account-level setting and
//! reqwest fixes the proxy at client build time.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::ApiConfig;
use crate::error::{ApiError, Result};
use crate::types::Account;

use super::{IndexReceipt, MoltbookApi, PostReceipt, RegisteredAgent};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct HttpApi {
    config: ApiConfig,
}

#[derive(Serialize)]
struct CreatePostBody<'a> {
    submolt: &'a str,
    title: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct RegisterBody<'a> {
    name: &'a str,
    description: &'a str,
}

/// Fields common to every Moltbook response body
#[derive(Deserialize, Default)]
struct Envelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    post: Option<PostInfo>,
    #[serde(default)]
    verification_required: Option<bool>,
    #[serde(default)]
    processed: Option<bool>,
    #[serde(default)]
    agent: Option<AgentInfo>,
}

#[derive(Deserialize)]
struct PostInfo {
    #[serde(default)]
    id: Option<i64>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Deserialize)]
struct AgentInfo {
    name: String,
    api_key: String,
    #[serde(default)]
    claim_url: Option<String>,
}

impl Envelope {
    /// Remote-supplied failure message, or a synthesized one from the
    /// HTTP status.
    fn failure_message(&self, status: StatusCode) -> String {
        if let Some(error) = &self.error {
            return error.clone();
        }
        let detail = self.message.as_deref().unwrap_or("Unknown error");
        format!("HTTP {}: {}", status.as_u16(), detail)
    }
}

impl HttpApi {
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    /// Build a client honoring the account's proxy setting
    fn client_for(&self, proxy_url: Option<&str>) -> Result<Client> {
        let mut builder = Client::builder().timeout(REQUEST_TIMEOUT);
        if let Some(url) = proxy_url {
            let proxy = reqwest::Proxy::all(url)
                .map_err(|e| ApiError::Network(format!("Invalid proxy {}: {}", url, e)))?;
            builder = builder.proxy(proxy);
        }
        builder
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to build HTTP client: {}", e)).into())
    }

    /// Decode a response body into the common envelope
    async fn decode(response: reqwest::Response) -> Result<(StatusCode, Envelope)> {
        let status = response.status();
        let envelope: Envelope = response
            .json()
            .await
            .map_err(|e| ApiError::Network(format!("Invalid response body: {}", e)))?;
        Ok((status, envelope))
    }
}

#[async_trait]
impl MoltbookApi for HttpApi {
    async fn create_post(
        &self,
        account: &Account,
        title: &str,
        content: &str,
    ) -> Result<PostReceipt> {
        let client = self.client_for(account.proxy_url())?;
        let body = CreatePostBody {
            submolt: "general",
            title,
            content,
        };

        let response = client
            .post(&self.config.post_url)
            .bearer_auth(&account.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let (status, envelope) = Self::decode(response).await?;
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Authentication(envelope.failure_message(status)).into());
        }
        if !status.is_success() || !envelope.success {
            return Err(ApiError::Posting(envelope.failure_message(status)).into());
        }

        let (post_id, post_url) = match envelope.post {
            Some(post) => (post.id, post.url),
            None => (None, None),
        };
        Ok(PostReceipt {
            post_id,
            post_url,
            verification_required: envelope.verification_required.unwrap_or(false),
        })
    }

    async fn index_post(&self, account: &Account, post_id: i64) -> Result<IndexReceipt> {
        let client = self.client_for(account.proxy_url())?;
        let response = client
            .get(&self.config.index_url)
            .query(&[("id", post_id)])
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let (status, envelope) = Self::decode(response).await?;
        if !status.is_success() || !envelope.success {
            return Err(ApiError::Indexing(envelope.failure_message(status)).into());
        }

        Ok(IndexReceipt {
            processed: envelope.processed.unwrap_or(false),
        })
    }

    async fn register_agent(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<RegisteredAgent> {
        let default_description = format!("{}'s AI agent on Moltbook", name);
        let body = RegisterBody {
            name,
            description: description.unwrap_or(&default_description),
        };

        let client = self.client_for(None)?;
        let response = client
            .post(&self.config.register_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let (status, envelope) = Self::decode(response).await?;
        if !status.is_success() || !envelope.success {
            return Err(ApiError::Registration(envelope.failure_message(status)).into());
        }

        let agent = envelope.agent.ok_or_else(|| {
            ApiError::Registration("Response did not include the registered agent".to_string())
        })?;
        Ok(RegisteredAgent {
            name: agent.name,
            api_key: agent.api_key,
            claim_url: agent.claim_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(json: &str) -> Envelope {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_failure_message_prefers_remote_error() {
        let env = envelope(r#"{"success": false, "error": "Agent not verified"}"#);
        assert_eq!(
            env.failure_message(StatusCode::FORBIDDEN),
            "Agent not verified"
        );
    }

    #[test]
    fn test_failure_message_synthesized_from_status() {
        let env = envelope(r#"{"success": false, "message": "slow down"}"#);
        assert_eq!(
            env.failure_message(StatusCode::TOO_MANY_REQUESTS),
            "HTTP 429: slow down"
        );

        let env = envelope(r#"{}"#);
        assert_eq!(
            env.failure_message(StatusCode::INTERNAL_SERVER_ERROR),
            "HTTP 500: Unknown error"
        );
    }

    #[test]
    fn test_envelope_parses_post_response() {
        let env = envelope(
            r#"{"success": true, "post": {"id": 123, "url": "https://moltbook.com/p/123"},
                "verification_required": true}"#,
        );
        assert!(env.success);
        let post = env.post.unwrap();
        assert_eq!(post.id, Some(123));
        assert_eq!(post.url.as_deref(), Some("https://moltbook.com/p/123"));
        assert_eq!(env.verification_required, Some(true));
    }

    #[test]
    fn test_envelope_tolerates_missing_post_id() {
        let env = envelope(r#"{"success": true, "post": {"url": "https://moltbook.com/p/x"}}"#);
        assert_eq!(env.post.unwrap().id, None);
    }

    #[test]
    fn test_envelope_parses_register_response() {
        let env = envelope(
            r#"{"success": true,
                "agent": {"name": "claw-1", "api_key": "mb_k", "claim_url": "https://moltbook.com/claim/x"}}"#,
        );
        let agent = env.agent.unwrap();
        assert_eq!(agent.name, "claw-1");
        assert_eq!(agent.api_key, "mb_k");
        assert_eq!(agent.claim_url.as_deref(), Some("https://moltbook.com/claim/x"));
    }

    #[test]
    fn test_client_for_rejects_bad_proxy() {
        let api = HttpApi::new(crate::config::ApiConfig::default());
        assert!(api.client_for(Some("not a url")).is_err());
        assert!(api.client_for(Some("http://127.0.0.1:8080")).is_ok());
        assert!(api.client_for(None).is_ok());
    }
}
