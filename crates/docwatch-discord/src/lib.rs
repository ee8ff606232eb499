//! Discord adapter (REST).
//!
//! Implements the `docwatch-core` NotifySink over the Discord HTTP API. The
//! watcher only ever posts messages, so there is no gateway session here;
//! `verify()` stands in as the "connection established" readiness gate.

use std::time::Duration;

use async_trait::async_trait;

use docwatch_core::{domain::ChannelId, errors::Error, ports::NotifySink, Result};

const API_BASE: &str = "https://discord.com/api/v10";

#[derive(Clone, Debug)]
pub struct DiscordNotifier {
    http: reqwest::Client,
    token: String,
}

impl DiscordNotifier {
    pub fn new(token: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::External(format!("http client build: {e}")))?;
        Ok(Self {
            http,
            token: token.into(),
        })
    }

    fn auth_header(&self) -> String {
        format!("Bot {}", self.token)
    }

    /// Confirms the credential with a `GET /users/@me` round-trip. An
    /// invalid or missing token is fatal at process start, so this surfaces
    /// the failure before the first cycle ever runs.
    pub async fn verify(&self) -> Result<String> {
        let resp = self
            .http
            .get(format!("{API_BASE}/users/@me"))
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .send()
            .await
            .map_err(|e| Error::Notify(format!("credential check: {e}")))?;

        if !resp.status().is_success() {
            return Err(Error::Notify(format!(
                "credential rejected: {}",
                resp.status()
            )));
        }

        let v: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| Error::Notify(format!("credential check json: {e}")))?;
        Ok(v
            .get("username")
            .and_then(|u| u.as_str())
            .unwrap_or("unknown")
            .to_string())
    }

    async fn post_message(&self, channel: ChannelId, content: &str) -> Result<reqwest::Response> {
        self.http
            .post(format!("{API_BASE}/channels/{}/messages", channel.0))
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .json(&serde_json::json!({ "content": content }))
            .send()
            .await
            .map_err(|e| Error::Notify(format!("discord request: {e}")))
    }
}

#[async_trait]
impl NotifySink for DiscordNotifier {
    async fn send(&self, channel: ChannelId, content: &str) -> Result<()> {
        let mut resp = self.post_message(channel, content).await?;

        // Honor one rate-limit retry; anything past that surfaces upstream.
        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = resp
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|v| v.get("retry_after").and_then(|r| r.as_f64()))
                .unwrap_or(1.0);
            tokio::time::sleep(Duration::from_secs_f64(retry_after)).await;
            resp = self.post_message(channel, content).await?;
        }

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Notify(format!(
                "discord send failed: {status} {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        Ok(())
    }
}
