//! Discord REST API client.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::traits::DiscordApi;
use crate::types::{CreateMessage, CurrentUser, Embed, Message};

/// Body Discord returns alongside a 429.
#[derive(serde::Deserialize)]
struct ApiRateLimit {
    retry_after: Option<f64>,
}

/// Discord REST API client authenticated as a bot.
pub struct DiscordClient {
    client: Client,
    base_url: String,
    /// Token stored as `SecretString` for automatic zeroization on drop.
    token: SecretString,
}

impl DiscordClient {
    /// Default Discord API URL.
    pub const DEFAULT_API_URL: &'static str = "https://discord.com/api/v10";

    /// Default per-request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Create a Discord client for `base_url` with the given request timeout.
    ///
    /// # Errors
    /// Returns error if the HTTP client can't be built.
    pub fn with_base_url(
        token: SecretString,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!(
                "DiscordBot (https://github.com/commitbell/commitbell, ",
                env!("CARGO_PKG_VERSION"),
                ")"
            )),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        let base_url: String = base_url.into();
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn authorization(&self) -> String {
        format!("Bot {}", self.token.expose_secret())
    }

    /// Make a GET request.
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, self.authorization())
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Make a POST request.
    async fn post<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, self.authorization())
            .json(body)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Handle API response.
    ///
    /// 403 and 404 are returned as `ApiError` here; only callers know
    /// which resource was missing.
    async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            let body = response.bytes().await?;
            return Ok(serde_json::from_slice(&body)?);
        }

        let status_code = status.as_u16();

        match status_code {
            401 => Err(Error::AuthenticationFailed),
            429 => {
                let header_hint = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<f64>().ok());
                let body = response.bytes().await.unwrap_or_default();
                let retry_after = serde_json::from_slice::<ApiRateLimit>(&body)
                    .ok()
                    .and_then(|r| r.retry_after)
                    .or(header_hint);
                Err(Error::RateLimited { retry_after })
            }
            _ => {
                let text = response.text().await.unwrap_or_default();
                Err(Error::ApiError {
                    status: status_code,
                    message: text,
                })
            }
        }
    }

    /// Fetch the bot account the token belongs to.
    ///
    /// # Errors
    /// Returns `AuthenticationFailed` if the token is invalid.
    pub async fn current_user(&self) -> Result<CurrentUser> {
        self.get("/users/@me").await
    }

    /// Post a single embed to a text channel.
    ///
    /// # Errors
    /// Returns error if the channel is missing, the bot may not post there,
    /// or the request fails.
    pub async fn send_embed(&self, channel_id: u64, embed: &Embed) -> Result<Message> {
        let body = CreateMessage { embeds: [embed] };
        let result = self
            .post(&format!("/channels/{channel_id}/messages"), &body)
            .await;

        match result {
            Err(Error::ApiError { status: 403, .. }) => Err(Error::PermissionDenied { channel_id }),
            Err(Error::ApiError { status: 404, .. }) => Err(Error::ChannelNotFound { channel_id }),
            other => other,
        }
    }
}

impl std::fmt::Debug for DiscordClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordClient")
            .field("base_url", &self.base_url)
            .field("token", &"[redacted]")
            .finish_non_exhaustive()
    }
}

// === Trait Implementation ===

impl DiscordApi for DiscordClient {
    async fn current_user(&self) -> Result<CurrentUser> {
        self.current_user().await
    }

    async fn send_embed(&self, channel_id: u64, embed: &Embed) -> Result<Message> {
        self.send_embed(channel_id, embed).await
    }
}
