//! OAuth2 client-credentials tokens and the cache that keeps them fresh

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{info, trace};

/// Scopes requested when none are configured
pub const DEFAULT_SCOPES: [&str; 3] = [
    "tilores/mutation.submit",
    "tilores/query.search",
    "tilores/query.entity",
];

/// Token as returned by the token endpoint
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AccessToken {
    #[serde(rename = "access_token")]
    pub token: String,
    /// Lifetime in seconds
    pub expires_in: i64,
}

/// Source of fresh access tokens
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn fetch_token(&self) -> Result<AccessToken>;
}

/// Client-credentials grant against the Tilores token URL
#[derive(Debug, Clone)]
pub struct ClientCredentials {
    client: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    scopes: Vec<String>,
}

impl ClientCredentials {
    pub fn new(
        client: reqwest::Client,
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            client,
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            scopes: DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    pub fn scope(&self) -> String {
        self.scopes.join(" ")
    }
}

#[async_trait]
impl TokenSource for ClientCredentials {
    async fn fetch_token(&self) -> Result<AccessToken> {
        let scope = self.scope();
        let form = [
            ("grant_type", "client_credentials"),
            ("scope", scope.as_str()),
        ];

        let response = self
            .client
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&form)
            .send()
            .await
            .context("Failed to request access token")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "Token request failed with status {}: {}",
                status,
                error_text
            ));
        }

        response
            .json()
            .await
            .context("Failed to parse token response")
    }
}

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

/// Caches one access token and refetches it once it has expired.
///
/// The lock is held from the expiry check until the new token is stored,
/// so concurrent callers wait for a single fetch.
pub struct CredentialCell<S, C = SystemClock> {
    source: S,
    clock: C,
    state: Mutex<Option<CachedToken>>,
}

impl<S: TokenSource> CredentialCell<S, SystemClock> {
    pub fn new(source: S) -> Self {
        Self::with_clock(source, SystemClock)
    }
}

impl<S: TokenSource, C: Clock> CredentialCell<S, C> {
    pub fn with_clock(source: S, clock: C) -> Self {
        Self {
            source,
            clock,
            state: Mutex::new(None),
        }
    }

    /// A token that has not expired yet
    pub async fn token(&self) -> Result<String> {
        let mut state = self.state.lock().await;
        let now = self.clock.now();

        if let Some(ref cached) = *state {
            if cached.expires_at > now {
                trace!("Reusing access token until {}", cached.expires_at);
                return Ok(cached.token.clone());
            }
        }

        let fetched = self.source.fetch_token().await?;
        let expires_at = Duration::try_seconds(fetched.expires_in)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| anyhow!("Invalid expires_in {}", fetched.expires_in))?;
        info!("Fetched access token, valid until {}", expires_at);

        *state = Some(CachedToken {
            token: fetched.token.clone(),
            expires_at,
        });
        Ok(fetched.token)
    }

    /// Expiry of the cached token, if any
    pub async fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.state.lock().await.as_ref().map(|c| c.expires_at)
    }

    /// Drop the cached token so the next call fetches a new one
    pub async fn invalidate(&self) {
        *self.state.lock().await = None;
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
