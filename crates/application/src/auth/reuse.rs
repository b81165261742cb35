//! Expiry-aware credential reuse.
//!
//! [`ReuseTokenSource`] turns a source that mints a new credential on every
//! call into one that hands out the same credential until it is about to
//! expire.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use ghauth_domain::Credential;
use tokio::sync::Mutex;

use crate::AuthResult;
use crate::ports::{Clock, SystemClock, TokenSource};

/// Seconds before expiry at which a cached credential stops being reused.
pub const DEFAULT_EXPIRY_DELTA_SECONDS: i64 = 10;

/// Caches the last credential produced by `source`.
///
/// The whole check-then-refresh path runs under one async mutex: concurrent
/// callers never trigger more than one regeneration at a time, and nobody
/// observes a half-written cache. Regeneration happens lazily inside
/// [`TokenSource::token`]; there is no background refresh.
///
/// A failed regeneration leaves the cache empty, so the next call retries
/// instead of serving the stale credential.
pub struct ReuseTokenSource<S> {
    source: S,
    cached: Mutex<Option<Credential>>,
    clock: Arc<dyn Clock>,
    expiry_delta: Duration,
}

impl<S: TokenSource> ReuseTokenSource<S> {
    /// Wraps `source` with an empty cache.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            source,
            cached: Mutex::new(None),
            clock: Arc::new(SystemClock::new()),
            expiry_delta: Duration::seconds(DEFAULT_EXPIRY_DELTA_SECONDS),
        }
    }

    /// Wraps `source` with a cache seeded by `credential`.
    #[must_use]
    pub fn from_cached(source: S, credential: Credential) -> Self {
        Self {
            cached: Mutex::new(Some(credential)),
            ..Self::new(source)
        }
    }

    /// Uses a custom clock for expiry checks.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Sets how long before expiry a credential is considered stale.
    #[must_use]
    pub const fn with_expiry_delta(mut self, expiry_delta: Duration) -> Self {
        self.expiry_delta = expiry_delta;
        self
    }

    /// Returns the wrapped source.
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Returns the currently cached credential, valid or not.
    pub async fn cached(&self) -> Option<Credential> {
        self.cached.lock().await.clone()
    }
}

#[async_trait]
impl<S: TokenSource> TokenSource for ReuseTokenSource<S> {
    async fn token(&self) -> AuthResult<Credential> {
        let mut cached = self.cached.lock().await;

        let now = self.clock.now();
        if let Some(credential) = cached
            .as_ref()
            .filter(|credential| credential.is_valid_at(now, self.expiry_delta))
        {
            tracing::trace!("reusing cached token");
            return Ok(credential.clone());
        }

        // Drop the stale entry first so a failed refresh leaves the cache empty.
        *cached = None;
        tracing::debug!("cached token missing or expired, generating a new one");

        let credential = self.source.token().await?;
        *cached = Some(credential.clone());
        Ok(credential)
    }
}

impl<S> fmt::Debug for ReuseTokenSource<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReuseTokenSource")
            .field("expiry_delta", &self.expiry_delta)
            .finish_non_exhaustive()
    }
}
