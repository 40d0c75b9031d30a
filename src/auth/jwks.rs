// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWKS (JSON Web Key Set) fetching and caching.
//!
//! ## Snapshot model
//!
//! The cached keys live in an immutable [`KeySet`] behind an `Arc`. A refresh
//! builds a complete new set and swaps the `Arc` in one write, so a reader
//! holds either the previous or the next set, never a partially filled one.
//! Readers clone the `Arc` and release the lock immediately.
//!
//! ## Refresh policy
//!
//! - The set is fetched lazily on first use and whenever it is older than the
//!   cache TTL; `run_refresher` additionally refreshes on a schedule.
//! - A `kid` missing from a fresh set triggers at most one refresh, rate
//!   limited by `min_refresh_interval`.
//! - Concurrent refreshes are coalesced: callers that queued behind a
//!   completed refresh reuse its result, whether it succeeded or failed.
//! - A failed refresh never replaces the current set. If the stale set still
//!   holds the requested `kid`, it is used.
//! - After a failed fetch, further demand-driven fetches wait for
//!   `min_refresh_interval`; callers get the recorded error meanwhile.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use jsonwebtoken::jwk::{AlgorithmParameters, Jwk, JwkSet, KeyAlgorithm, PublicKeyUse};
use jsonwebtoken::{Algorithm, DecodingKey};
use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::config::AuthConfig;
use super::error::{AuthError, AuthResult};

/// Immutable snapshot of the identity provider's signing keys.
pub struct KeySet {
    keys: HashMap<String, DecodingKey>,
    generation: u64,
    fetched_at: Option<Instant>,
}

impl KeySet {
    fn empty() -> Self {
        Self {
            keys: HashMap::new(),
            generation: 0,
            fetched_at: None,
        }
    }

    pub fn get(&self, kid: &str) -> Option<&DecodingKey> {
        self.keys.get(kid)
    }

    pub fn contains(&self, kid: &str) -> bool {
        self.keys.contains_key(kid)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of successful fetches that produced this set (0 = never fetched).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn kids(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }

    fn age(&self) -> Option<Duration> {
        self.fetched_at.map(|at| at.elapsed())
    }

    fn is_fresh(&self, ttl: Duration) -> bool {
        self.age().is_some_and(|age| age < ttl)
    }
}

impl fmt::Debug for KeySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kids: Vec<&str> = self.kids().collect();
        kids.sort_unstable();
        f.debug_struct("KeySet")
            .field("kids", &kids)
            .field("generation", &self.generation)
            .finish()
    }
}

struct FailedFetch {
    finished_at: Instant,
    error: AuthError,
}

/// State guarded by the refresh gate.
#[derive(Default)]
struct RefreshLog {
    last_failure: Option<FailedFetch>,
}

/// JWKS manager with caching.
///
/// Cheap to clone; clones share one cache.
#[derive(Clone)]
pub struct JwksManager {
    /// JWKS URL (identity provider endpoint)
    jwks_url: String,
    /// Only keys usable with this algorithm are cached
    algorithm: Algorithm,
    cache_ttl: Duration,
    min_refresh_interval: Duration,
    /// Current snapshot
    snapshot: Arc<RwLock<Arc<KeySet>>>,
    /// Serializes fetches
    refresh_gate: Arc<Mutex<RefreshLog>>,
    /// Completed fetch attempts, successful or not. Written under the gate.
    attempts: Arc<AtomicU64>,
    /// HTTP client, bounded by the configured fetch timeout
    client: reqwest::Client,
}

impl JwksManager {
    /// Create a manager with an empty cache.
    pub fn new(config: &AuthConfig) -> AuthResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.fetch_timeout)
            .build()
            .map_err(|e| AuthError::Internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            jwks_url: config.jwks_url.clone(),
            algorithm: config.algorithm(),
            cache_ttl: config.cache_ttl,
            min_refresh_interval: config.min_refresh_interval,
            snapshot: Arc::new(RwLock::new(Arc::new(KeySet::empty()))),
            refresh_gate: Arc::new(Mutex::new(RefreshLog::default())),
            attempts: Arc::new(AtomicU64::new(0)),
            client,
        })
    }

    pub fn jwks_url(&self) -> &str {
        &self.jwks_url
    }

    /// The snapshot readers currently see.
    pub async fn current(&self) -> Arc<KeySet> {
        Arc::clone(&*self.snapshot.read().await)
    }

    /// Check if JWKS is currently cached and within its TTL.
    pub async fn is_cached(&self) -> bool {
        self.current().await.is_fresh(self.cache_ttl)
    }

    pub async fn key_count(&self) -> usize {
        self.current().await.len()
    }

    /// Fresh keys, fetching them if the cache is empty or expired.
    ///
    /// Goes through the same coalescing and failure backoff as [`resolve`](Self::resolve).
    pub async fn ensure_loaded(&self) -> AuthResult<Arc<KeySet>> {
        let attempts = self.attempts.load(Ordering::Acquire);
        let snapshot = self.current().await;
        if snapshot.is_fresh(self.cache_ttl) {
            return Ok(snapshot);
        }
        self.refresh_after(snapshot.generation, attempts).await
    }

    /// Get the decoding key for `kid`, refreshing the set at most once.
    pub async fn resolve(&self, kid: &str) -> AuthResult<DecodingKey> {
        let attempts = self.attempts.load(Ordering::Acquire);
        let snapshot = self.current().await;

        if snapshot.is_fresh(self.cache_ttl) {
            if let Some(key) = snapshot.get(kid) {
                return Ok(key.clone());
            }
            let recently_fetched = snapshot
                .age()
                .is_some_and(|age| age < self.min_refresh_interval);
            if recently_fetched {
                debug!(kid, "Unknown kid, refresh rate limited");
                return Err(AuthError::UnknownSigningKey(kid.to_string()));
            }
        }

        match self.refresh_after(snapshot.generation, attempts).await {
            Ok(fresh) => fresh
                .get(kid)
                .cloned()
                .ok_or_else(|| AuthError::UnknownSigningKey(kid.to_string())),
            Err(err) => match snapshot.get(kid) {
                Some(key) => {
                    warn!(kid, error = %err, "JWKS refresh failed, using stale key");
                    Ok(key.clone())
                }
                None => Err(err),
            },
        }
    }

    /// Force refresh the JWKS cache, ignoring the failure backoff.
    pub async fn refresh(&self) -> AuthResult<Arc<KeySet>> {
        let mut log = self.refresh_gate.lock().await;
        self.attempt(&mut log).await
    }

    /// Refresh unless the caller's view is already outdated.
    ///
    /// `seen_generation` and `seen_attempts` are what the caller observed
    /// before waiting for the gate. If a fetch finished in between, its
    /// outcome is returned instead of fetching again. A recent failure is
    /// also returned as is until `min_refresh_interval` has passed.
    async fn refresh_after(&self, seen_generation: u64, seen_attempts: u64) -> AuthResult<Arc<KeySet>> {
        let mut log = self.refresh_gate.lock().await;

        let current = self.current().await;
        if current.generation != seen_generation {
            debug!(generation = current.generation, "Reusing concurrent JWKS refresh");
            return Ok(current);
        }

        if let Some(failure) = &log.last_failure {
            let finished_while_waiting = self.attempts.load(Ordering::Acquire) != seen_attempts;
            if finished_while_waiting || failure.finished_at.elapsed() < self.min_refresh_interval {
                debug!(error = %failure.error, "Reusing failed JWKS refresh");
                return Err(failure.error.clone());
            }
        }

        self.attempt(&mut log).await
    }

    /// One fetch, with its outcome recorded. Must hold the gate.
    async fn attempt(&self, log: &mut RefreshLog) -> AuthResult<Arc<KeySet>> {
        let result = match self.fetch_keys().await {
            Ok(keys) => Ok(self.install(keys).await),
            Err(err) => Err(err),
        };

        log.last_failure = result.as_ref().err().map(|error| FailedFetch {
            finished_at: Instant::now(),
            error: error.clone(),
        });
        self.attempts.fetch_add(1, Ordering::AcqRel);
        result
    }

    async fn install(&self, keys: HashMap<String, DecodingKey>) -> Arc<KeySet> {
        let mut guard = self.snapshot.write().await;
        let next = Arc::new(KeySet {
            keys,
            generation: guard.generation + 1,
            fetched_at: Some(Instant::now()),
        });
        *guard = Arc::clone(&next);
        drop(guard);

        info!(
            generation = next.generation,
            keys = next.len(),
            "JWKS snapshot installed"
        );
        next
    }

    /// Fetch JWKS from the endpoint and keep the usable keys.
    async fn fetch_keys(&self) -> AuthResult<HashMap<String, DecodingKey>> {
        let response = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(fetch_error)?;

        if !response.status().is_success() {
            return Err(AuthError::Internal(format!(
                "HTTP {} from JWKS endpoint",
                response.status()
            )));
        }

        let body = response.bytes().await.map_err(fetch_error)?;
        let jwks: JwkSet = serde_json::from_slice(&body)
            .map_err(|e| AuthError::Internal(format!("Malformed JWKS document: {e}")))?;

        let mut keys = HashMap::new();
        for jwk in &jwks.keys {
            match usable_key(jwk, self.algorithm) {
                Ok((kid, key)) => {
                    keys.insert(kid, key);
                }
                Err(reason) => {
                    debug!(kid = ?jwk.common.key_id, reason, "Skipping JWKS entry");
                }
            }
        }

        if keys.is_empty() {
            return Err(AuthError::Internal(
                "JWKS document contains no usable signing keys".to_string(),
            ));
        }
        Ok(keys)
    }

    /// Refresh on a fixed interval until `shutdown` is cancelled.
    ///
    /// ```rust,ignore
    /// tokio::spawn(jwks.clone().run_refresher(interval, shutdown.clone()));
    /// ```
    pub async fn run_refresher(self, interval: Duration, shutdown: CancellationToken) {
        info!(interval_secs = interval.as_secs(), "JWKS refresher starting");

        loop {
            tokio::select! {
                _ = tokio::time::sleep(interval) => {},
                _ = shutdown.cancelled() => {
                    info!("JWKS refresher shutting down");
                    return;
                }
            }

            match self.refresh().await {
                Ok(set) => debug!(generation = set.generation, "Scheduled JWKS refresh done"),
                Err(e) => warn!(error = %e, "Scheduled JWKS refresh failed"),
            }
        }
    }
}

fn fetch_error(err: reqwest::Error) -> AuthError {
    if err.is_timeout() {
        AuthError::KeyFetchTimeout
    } else {
        AuthError::Internal(format!("JWKS request failed: {err}"))
    }
}

fn algorithm_matches(declared: &KeyAlgorithm, expected: Algorithm) -> bool {
    matches!(
        (declared, expected),
        (KeyAlgorithm::RS256, Algorithm::RS256)
            | (KeyAlgorithm::RS384, Algorithm::RS384)
            | (KeyAlgorithm::RS512, Algorithm::RS512)
    )
}

/// Convert a JWK into a verification key, or say why it is skipped.
fn usable_key(jwk: &Jwk, algorithm: Algorithm) -> Result<(String, DecodingKey), &'static str> {
    let kid = jwk.common.key_id.clone().ok_or("missing kid")?;

    if matches!(
        jwk.common.public_key_use,
        Some(PublicKeyUse::Encryption) | Some(PublicKeyUse::Other(_))
    ) {
        return Err("not a signature key");
    }

    if let Some(declared) = &jwk.common.key_algorithm {
        if !algorithm_matches(declared, algorithm) {
            return Err("algorithm does not match configuration");
        }
    }

    let AlgorithmParameters::RSA(rsa) = &jwk.algorithm else {
        return Err("not an RSA key");
    };

    let key = DecodingKey::from_rsa_components(&rsa.n, &rsa.e)
        .map_err(|_| "invalid RSA components")?;
    Ok((kid, key))
}
