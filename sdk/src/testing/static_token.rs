use crate::client::{AccessToken, Clock, TokenSource};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;

/// Hands out `token-1`, `token-2`, ... with a fixed lifetime and counts the fetches
#[derive(Debug, Clone)]
pub struct StaticTokenSource {
    expires_in: i64,
    calls: Arc<AtomicUsize>,
}

impl StaticTokenSource {
    pub fn new(expires_in: i64) -> Self {
        Self {
            expires_in,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of tokens fetched so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenSource for StaticTokenSource {
    async fn fetch_token(&self) -> Result<AccessToken> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(AccessToken {
            token: format!("token-{}", n),
            expires_in: self.expires_in,
        })
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    seconds: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn at(start: DateTime<Utc>) -> Self {
        Self {
            seconds: Arc::new(AtomicI64::new(start.timestamp())),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.seconds.fetch_add(by.num_seconds(), Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self {
            seconds: Arc::new(AtomicI64::new(1_700_000_000)),
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.seconds.load(Ordering::SeqCst), 0)
            .single()
            .unwrap_or_default()
    }
}
