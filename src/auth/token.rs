// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token extraction and unverified header decoding.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::Deserialize;

use super::error::{AuthError, AuthResult};

/// Pull the token out of an `Authorization` header value.
///
/// The header must be exactly `Bearer <token>`; the scheme is matched
/// case-insensitively.
pub fn bearer_token(header: Option<&str>) -> AuthResult<&str> {
    let header = header.ok_or(AuthError::MissingHeader)?;
    let mut parts = header.split(' ');

    let scheme = parts.next().unwrap_or_default();
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MalformedHeader);
    }

    let token = parts.next().ok_or(AuthError::MalformedHeader)?;
    if token.is_empty() || parts.next().is_some() {
        return Err(AuthError::MalformedHeader);
    }

    Ok(token)
}

/// Decoded, NOT verified, JOSE header.
///
/// Only used to choose the verification key and reject unexpected algorithms
/// before any cryptography runs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenHeader {
    pub alg: String,
    #[serde(default)]
    pub kid: Option<String>,
    #[serde(default)]
    pub typ: Option<String>,
}

impl TokenHeader {
    pub fn decode(token: &str) -> AuthResult<Self> {
        let mut segments = token.split('.');
        let (Some(header), Some(payload), Some(_signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(AuthError::MalformedToken);
        };

        if header.is_empty() || payload.is_empty() {
            return Err(AuthError::MalformedToken);
        }

        let bytes = URL_SAFE_NO_PAD
            .decode(header)
            .map_err(|_| AuthError::MalformedToken)?;
        serde_json::from_slice(&bytes).map_err(|_| AuthError::MalformedToken)
    }
}
