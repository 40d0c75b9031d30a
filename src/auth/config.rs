// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token verification settings.

use std::time::Duration;

use jsonwebtoken::Algorithm;

/// Default JWKS cache TTL (5 minutes).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Default timeout for one JWKS request.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Minimum spacing between refreshes triggered by an unknown `kid`.
pub const DEFAULT_MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(10);

/// Default interval of the scheduled background refresh.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(300);

/// Claim that carries granted permissions in provider-issued access tokens.
pub const DEFAULT_PERMISSIONS_CLAIM: &str = "permissions";

/// RSA signature algorithms a deployment may select. `none`, the HMAC family
/// and everything else cannot be expressed here, so they never reach a
/// running verifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RsaAlgorithm {
    #[default]
    RS256,
    RS384,
    RS512,
}

impl RsaAlgorithm {
    /// The `alg` header value tokens must declare.
    pub fn name(self) -> &'static str {
        match self {
            Self::RS256 => "RS256",
            Self::RS384 => "RS384",
            Self::RS512 => "RS512",
        }
    }
}

impl From<RsaAlgorithm> for Algorithm {
    fn from(algorithm: RsaAlgorithm) -> Self {
        match algorithm {
            RsaAlgorithm::RS256 => Algorithm::RS256,
            RsaAlgorithm::RS384 => Algorithm::RS384,
            RsaAlgorithm::RS512 => Algorithm::RS512,
        }
    }
}

/// Authentication configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWKS endpoint of the identity provider
    pub jwks_url: String,
    /// Expected `iss` claim
    pub issuer: String,
    /// Expected member of the `aud` claim
    pub audience: String,
    /// Name of the claim holding granted permissions
    pub permissions_claim: String,
    algorithm: RsaAlgorithm,
    /// Clock skew tolerance applied to `exp` and `nbf`
    pub leeway: Duration,
    pub fetch_timeout: Duration,
    pub cache_ttl: Duration,
    pub min_refresh_interval: Duration,
    pub refresh_interval: Duration,
}

impl AuthConfig {
    /// Create a configuration with RS256 and default timings.
    ///
    /// # Arguments
    /// - `jwks_url`: URL to fetch JWKS from
    /// - `issuer`: Expected token issuer
    /// - `audience`: Expected token audience (API identifier)
    pub fn new(
        jwks_url: impl Into<String>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
    ) -> Self {
        Self {
            jwks_url: jwks_url.into(),
            issuer: issuer.into(),
            audience: audience.into(),
            permissions_claim: DEFAULT_PERMISSIONS_CLAIM.to_string(),
            algorithm: RsaAlgorithm::default(),
            leeway: Duration::ZERO,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            cache_ttl: DEFAULT_CACHE_TTL,
            min_refresh_interval: DEFAULT_MIN_REFRESH_INTERVAL,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
        }
    }

    pub fn with_algorithm(mut self, algorithm: RsaAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_permissions_claim(mut self, claim: impl Into<String>) -> Self {
        self.permissions_claim = claim.into();
        self
    }

    pub fn with_leeway(mut self, leeway: Duration) -> Self {
        self.leeway = leeway;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_min_refresh_interval(mut self, interval: Duration) -> Self {
        self.min_refresh_interval = interval;
        self
    }

    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm.into()
    }

    /// The `alg` header value tokens must declare.
    pub fn algorithm_name(&self) -> &'static str {
        self.algorithm.name()
    }
}

/// Parse an algorithm name from configuration. Anything that is not an RSA
/// signature algorithm yields `None`.
pub fn parse_algorithm(name: &str) -> Option<RsaAlgorithm> {
    match name.trim() {
        "RS256" => Some(RsaAlgorithm::RS256),
        "RS384" => Some(RsaAlgorithm::RS384),
        "RS512" => Some(RsaAlgorithm::RS512),
        _ => None,
    }
}
