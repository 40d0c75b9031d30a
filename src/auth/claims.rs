// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Verified token claims.

use std::collections::BTreeSet;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::config::AuthConfig;
use super::error::{AuthError, AuthResult};

static NO_PERMISSIONS: BTreeSet<String> = BTreeSet::new();

/// Claims of a token whose signature, expiry, audience and issuer were checked.
///
/// Values only come out of [`TokenVerifier::verify`](super::TokenVerifier::verify);
/// the type has no public constructor and does not implement `Deserialize`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Claims {
    subject: String,
    issuer: String,
    audience: Vec<String>,
    expires_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    issued_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    not_before: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    permissions: Option<BTreeSet<String>>,
}

impl Claims {
    /// Subject (`sub`), the caller's identity at the provider.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn audience(&self) -> &[String] {
        &self.audience
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.issued_at
    }

    pub fn not_before(&self) -> Option<DateTime<Utc>> {
        self.not_before
    }

    /// Granted permissions; empty when the token carries no permissions claim.
    pub fn permissions(&self) -> &BTreeSet<String> {
        self.permissions.as_ref().unwrap_or(&NO_PERMISSIONS)
    }

    /// Whether the token carried a permissions claim at all (possibly empty).
    pub fn has_permissions_claim(&self) -> bool {
        self.permissions.is_some()
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions().contains(permission)
    }
}

#[derive(Debug, Deserialize)]
struct ClaimsRepr {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    iss: Option<String>,
    #[serde(default)]
    aud: Option<AudienceRepr>,
    #[serde(default)]
    exp: Option<i64>,
    #[serde(default)]
    iat: Option<i64>,
    #[serde(default)]
    nbf: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AudienceRepr {
    Single(String),
    Many(Vec<String>),
}

fn timestamp(value: i64) -> AuthResult<DateTime<Utc>> {
    Utc.timestamp_opt(value, 0)
        .single()
        .ok_or(AuthError::MalformedToken)
}

fn permissions_claim(payload: &Value, name: &str) -> AuthResult<Option<BTreeSet<String>>> {
    match payload.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_owned)
                    .ok_or(AuthError::MalformedToken)
            })
            .collect::<AuthResult<BTreeSet<_>>>()
            .map(Some),
        Some(_) => Err(AuthError::MalformedToken),
    }
}

/// Build [`Claims`] from a payload whose signature has already been verified.
///
/// Checks run in a fixed order and stop at the first failure: expiry,
/// audience, issuer, then not-before. The remaining claims are only inspected
/// once those pass. `now` is a Unix timestamp in seconds.
pub(super) fn validate_claims(payload: Value, config: &AuthConfig, now: i64) -> AuthResult<Claims> {
    let repr = ClaimsRepr::deserialize(&payload).map_err(|_| AuthError::MalformedToken)?;

    let exp = repr.exp.ok_or(AuthError::MalformedToken)?;
    let leeway = i64::try_from(config.leeway.as_secs()).unwrap_or(i64::MAX);

    if now >= exp.saturating_add(leeway) {
        return Err(AuthError::TokenExpired);
    }

    let audience = match repr.aud {
        Some(AudienceRepr::Single(item)) => vec![item],
        Some(AudienceRepr::Many(items)) => items,
        None => Vec::new(),
    };
    if !audience.iter().any(|aud| aud == &config.audience) {
        return Err(AuthError::InvalidAudience);
    }

    let issuer = match repr.iss {
        Some(iss) if iss == config.issuer => iss,
        _ => return Err(AuthError::InvalidIssuer),
    };

    if let Some(nbf) = repr.nbf {
        if now.saturating_add(leeway) < nbf {
            return Err(AuthError::TokenNotYetValid);
        }
    }

    let subject = repr.sub.ok_or(AuthError::MalformedToken)?;
    let expires_at = timestamp(exp)?;
    let issued_at = repr.iat.map(timestamp).transpose()?;
    let not_before = repr.nbf.map(timestamp).transpose()?;
    let permissions = permissions_claim(&payload, &config.permissions_claim)?;

    Ok(Claims {
        subject,
        issuer,
        audience,
        expires_at,
        issued_at,
        not_before,
        permissions,
    })
}
