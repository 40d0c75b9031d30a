// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! once at startup and validated into a [`ServerConfig`].
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `AUTH_DOMAIN` | Identity provider domain (derives JWKS URL and issuer) | - |
//! | `AUTH_JWKS_URL` | JWKS endpoint for token verification | `https://<AUTH_DOMAIN>/.well-known/jwks.json` |
//! | `AUTH_ISSUER` | Expected `iss` claim | `https://<AUTH_DOMAIN>/` |
//! | `AUTH_AUDIENCE` | Expected `aud` claim (API identifier) | Required |
//! | `AUTH_PERMISSIONS_CLAIM` | Claim carrying granted permissions | `permissions` |
//! | `AUTH_ALGORITHM` | Accepted signing algorithm | `RS256` |
//! | `AUTH_LEEWAY_SECS` | Clock skew tolerance | `0` |
//! | `JWKS_TIMEOUT_SECS` | Timeout of one JWKS request | `10` |
//! | `JWKS_CACHE_TTL_SECS` | Age after which keys are refetched on use | `300` |
//! | `JWKS_REFRESH_INTERVAL_SECS` | Scheduled refresh interval | `300` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::{Host, Url};

use crate::auth::config::{parse_algorithm, AuthConfig};

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const AUTH_DOMAIN_ENV: &str = "AUTH_DOMAIN";
pub const AUTH_JWKS_URL_ENV: &str = "AUTH_JWKS_URL";
pub const AUTH_ISSUER_ENV: &str = "AUTH_ISSUER";
pub const AUTH_AUDIENCE_ENV: &str = "AUTH_AUDIENCE";
pub const AUTH_PERMISSIONS_CLAIM_ENV: &str = "AUTH_PERMISSIONS_CLAIM";
pub const AUTH_ALGORITHM_ENV: &str = "AUTH_ALGORITHM";
pub const AUTH_LEEWAY_SECS_ENV: &str = "AUTH_LEEWAY_SECS";
pub const JWKS_TIMEOUT_SECS_ENV: &str = "JWKS_TIMEOUT_SECS";
pub const JWKS_CACHE_TTL_SECS_ENV: &str = "JWKS_CACHE_TTL_SECS";
pub const JWKS_REFRESH_INTERVAL_SECS_ENV: &str = "JWKS_REFRESH_INTERVAL_SECS";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
pub const DEFAULT_PORT: u16 = 8080;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Path of the JWKS document below an identity provider domain.
const WELL_KNOWN_JWKS_PATH: &str = ".well-known/jwks.json";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(var: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            var,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(ConfigError::invalid(
                LOG_FORMAT_ENV,
                format!("expected 'json' or 'pretty', got '{other}'"),
            )),
        }
    }
}

/// Validated process configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub log_format: LogFormat,
    pub auth: AuthConfig,
}

impl ServerConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through `lookup`. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let host = match get(HOST_ENV) {
            Some(host) => host
                .parse::<IpAddr>()
                .map_err(|_| ConfigError::invalid(HOST_ENV, format!("'{host}' is not an IP address")))?,
            None => DEFAULT_HOST,
        };
        let port = match get(PORT_ENV) {
            Some(port) => port
                .parse::<u16>()
                .map_err(|_| ConfigError::invalid(PORT_ENV, format!("'{port}' is not a port")))?,
            None => DEFAULT_PORT,
        };
        let log_format = get(LOG_FORMAT_ENV)
            .map(|value| value.parse::<LogFormat>())
            .transpose()?
            .unwrap_or_default();

        let domain = get(AUTH_DOMAIN_ENV).map(|domain| normalize_domain(&domain));

        let jwks_url = get(AUTH_JWKS_URL_ENV)
            .or_else(|| {
                domain
                    .as_ref()
                    .map(|d| format!("https://{d}/{WELL_KNOWN_JWKS_PATH}"))
            })
            .ok_or(ConfigError::Missing(AUTH_JWKS_URL_ENV))?;
        validate_jwks_url(&jwks_url)?;

        let issuer = get(AUTH_ISSUER_ENV)
            .or_else(|| domain.as_ref().map(|d| format!("https://{d}/")))
            .ok_or(ConfigError::Missing(AUTH_ISSUER_ENV))?;
        let audience = get(AUTH_AUDIENCE_ENV).ok_or(ConfigError::Missing(AUTH_AUDIENCE_ENV))?;

        let mut auth = AuthConfig::new(jwks_url, issuer, audience);

        if let Some(claim) = get(AUTH_PERMISSIONS_CLAIM_ENV) {
            auth = auth.with_permissions_claim(claim);
        }
        if let Some(name) = get(AUTH_ALGORITHM_ENV) {
            let algorithm = parse_algorithm(&name).ok_or_else(|| {
                ConfigError::invalid(
                    AUTH_ALGORITHM_ENV,
                    format!("'{name}' is not one of RS256, RS384, RS512"),
                )
            })?;
            auth = auth.with_algorithm(algorithm);
        }
        if let Some(leeway) = seconds(&get, AUTH_LEEWAY_SECS_ENV, true)? {
            auth = auth.with_leeway(leeway);
        }
        if let Some(timeout) = seconds(&get, JWKS_TIMEOUT_SECS_ENV, false)? {
            auth = auth.with_fetch_timeout(timeout);
        }
        if let Some(ttl) = seconds(&get, JWKS_CACHE_TTL_SECS_ENV, false)? {
            auth = auth.with_cache_ttl(ttl);
        }
        if let Some(interval) = seconds(&get, JWKS_REFRESH_INTERVAL_SECS_ENV, false)? {
            auth = auth.with_refresh_interval(interval);
        }

        Ok(Self {
            host,
            port,
            log_format,
            auth,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn seconds(
    get: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    allow_zero: bool,
) -> Result<Option<Duration>, ConfigError> {
    let Some(value) = get(var) else {
        return Ok(None);
    };
    let secs: u64 = value
        .parse()
        .map_err(|_| ConfigError::invalid(var, format!("'{value}' is not a number of seconds")))?;
    if secs == 0 && !allow_zero {
        return Err(ConfigError::invalid(var, "must be greater than zero"));
    }
    Ok(Some(Duration::from_secs(secs)))
}

/// Accept `tenant.auth0.com`, `https://tenant.auth0.com` or a trailing slash.
fn normalize_domain(domain: &str) -> String {
    domain
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/')
        .to_string()
}

/// JWKS must come over HTTPS; plain HTTP is only allowed to a loopback host.
fn validate_jwks_url(raw: &str) -> Result<(), ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::invalid(AUTH_JWKS_URL_ENV, e.to_string()))?;
    match url.scheme() {
        "https" => Ok(()),
        "http" => {
            let loopback = match url.host() {
                Some(Host::Domain(domain)) => domain == "localhost",
                Some(Host::Ipv4(ip)) => ip.is_loopback(),
                Some(Host::Ipv6(ip)) => ip.is_loopback(),
                None => false,
            };
            if loopback {
                Ok(())
            } else {
                Err(ConfigError::invalid(
                    AUTH_JWKS_URL_ENV,
                    "plain http is only allowed for loopback hosts",
                ))
            }
        }
        other => Err(ConfigError::invalid(
            AUTH_JWKS_URL_ENV,
            format!("unsupported scheme '{other}'"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::Algorithm;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn domain_derives_jwks_url_and_issuer() {
        let config = load(&[
            (AUTH_DOMAIN_ENV, "casting.eu.auth0.com"),
            (AUTH_AUDIENCE_ENV, "casting"),
        ])
        .unwrap();

        assert_eq!(
            config.auth.jwks_url,
            "https://casting.eu.auth0.com/.well-known/jwks.json"
        );
        assert_eq!(config.auth.issuer, "https://casting.eu.auth0.com/");
        assert_eq!(config.auth.audience, "casting");
        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.auth.algorithm(), Algorithm::RS256);
    }

    #[test]
    fn domain_is_normalized() {
        let config = load(&[
            (AUTH_DOMAIN_ENV, "https://casting.eu.auth0.com/"),
            (AUTH_AUDIENCE_ENV, "casting"),
        ])
        .unwrap();
        assert_eq!(config.auth.issuer, "https://casting.eu.auth0.com/");
    }

    #[test]
    fn explicit_values_override_domain() {
        let config = load(&[
            (AUTH_DOMAIN_ENV, "casting.eu.auth0.com"),
            (AUTH_JWKS_URL_ENV, "https://keys.example/jwks.json"),
            (AUTH_ISSUER_ENV, "https://issuer.example/"),
            (AUTH_AUDIENCE_ENV, "casting"),
            (AUTH_PERMISSIONS_CLAIM_ENV, "https://casting/permissions"),
            (AUTH_ALGORITHM_ENV, "RS512"),
            (AUTH_LEEWAY_SECS_ENV, "30"),
            (JWKS_TIMEOUT_SECS_ENV, "3"),
            (JWKS_CACHE_TTL_SECS_ENV, "60"),
            (JWKS_REFRESH_INTERVAL_SECS_ENV, "120"),
            (HOST_ENV, "127.0.0.1"),
            (PORT_ENV, "9000"),
            (LOG_FORMAT_ENV, "JSON"),
        ])
        .unwrap();

        assert_eq!(config.auth.jwks_url, "https://keys.example/jwks.json");
        assert_eq!(config.auth.issuer, "https://issuer.example/");
        assert_eq!(config.auth.permissions_claim, "https://casting/permissions");
        assert_eq!(config.auth.algorithm(), Algorithm::RS512);
        assert_eq!(config.auth.leeway, Duration::from_secs(30));
        assert_eq!(config.auth.fetch_timeout, Duration::from_secs(3));
        assert_eq!(config.auth.cache_ttl, Duration::from_secs(60));
        assert_eq!(config.auth.refresh_interval, Duration::from_secs(120));
        assert_eq!(config.bind_addr().to_string(), "127.0.0.1:9000");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn missing_values_name_the_variable() {
        assert_eq!(
            load(&[(AUTH_AUDIENCE_ENV, "casting")]).unwrap_err(),
            ConfigError::Missing(AUTH_JWKS_URL_ENV)
        );
        assert_eq!(
            load(&[
                (AUTH_JWKS_URL_ENV, "https://keys.example/jwks.json"),
                (AUTH_AUDIENCE_ENV, "casting"),
            ])
            .unwrap_err(),
            ConfigError::Missing(AUTH_ISSUER_ENV)
        );
        assert_eq!(
            load(&[(AUTH_DOMAIN_ENV, "casting.eu.auth0.com"), (AUTH_AUDIENCE_ENV, "  ")])
                .unwrap_err(),
            ConfigError::Missing(AUTH_AUDIENCE_ENV)
        );
    }

    #[test]
    fn symmetric_algorithm_is_refused() {
        let err = load(&[
            (AUTH_DOMAIN_ENV, "casting.eu.auth0.com"),
            (AUTH_AUDIENCE_ENV, "casting"),
            (AUTH_ALGORITHM_ENV, "HS256"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var, .. } if var == AUTH_ALGORITHM_ENV));
    }

    #[test]
    fn jwks_url_must_be_https_unless_loopback() {
        let base = [(AUTH_ISSUER_ENV, "https://issuer.example/"), (AUTH_AUDIENCE_ENV, "casting")];

        for url in [
            "http://127.0.0.1:8089/.well-known/jwks.json",
            "http://localhost/.well-known/jwks.json",
            "http://[::1]:9000/jwks.json",
        ] {
            let mut vars = base.to_vec();
            vars.push((AUTH_JWKS_URL_ENV, url));
            assert!(load(&vars).is_ok(), "{url}");
        }

        for url in ["http://keys.example/jwks.json", "ftp://keys.example/jwks.json", "not a url"] {
            let mut vars = base.to_vec();
            vars.push((AUTH_JWKS_URL_ENV, url));
            let err = load(&vars).unwrap_err();
            assert!(
                matches!(err, ConfigError::Invalid { var, .. } if var == AUTH_JWKS_URL_ENV),
                "{url}"
            );
        }
    }

    #[test]
    fn bad_numbers_are_invalid() {
        let base = [(AUTH_DOMAIN_ENV, "casting.eu.auth0.com"), (AUTH_AUDIENCE_ENV, "casting")];

        for (var, value) in [
            (PORT_ENV, "http"),
            (JWKS_TIMEOUT_SECS_ENV, "0"),
            (JWKS_CACHE_TTL_SECS_ENV, "-5"),
            (AUTH_LEEWAY_SECS_ENV, "soon"),
            (HOST_ENV, "example.com"),
            (LOG_FORMAT_ENV, "xml"),
        ] {
            let mut vars = base.to_vec();
            vars.push((var, value));
            let err = load(&vars).unwrap_err();
            assert!(
                matches!(&err, ConfigError::Invalid { var: v, .. } if *v == var),
                "{var}={value} gave {err:?}"
            );
        }

        let mut vars = base.to_vec();
        vars.push((AUTH_LEEWAY_SECS_ENV, "0"));
        assert!(load(&vars).is_ok());
    }
}
