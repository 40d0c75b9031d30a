// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token verification against the identity provider's JWKS.

use chrono::Utc;
use jsonwebtoken::{decode, errors::ErrorKind, Validation};
use serde_json::Value;
use tracing::debug;

use super::claims::{validate_claims, Claims};
use super::config::AuthConfig;
use super::error::{AuthError, AuthResult};
use super::jwks::JwksManager;
use super::token::{bearer_token, TokenHeader};

/// Turns an `Authorization` header value into verified [`Claims`].
#[derive(Clone)]
pub struct TokenVerifier {
    config: AuthConfig,
    jwks: JwksManager,
    /// Signature-only validation; claim checks run in `validate_claims`
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(config: AuthConfig) -> AuthResult<Self> {
        let jwks = JwksManager::new(&config)?;

        let mut validation = Validation::new(config.algorithm());
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Ok(Self {
            config,
            jwks,
            validation,
        })
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub fn jwks(&self) -> &JwksManager {
        &self.jwks
    }

    /// Verify the raw `Authorization` header value (`None` when absent).
    pub async fn verify(&self, authorization: Option<&str>) -> AuthResult<Claims> {
        let result = self.verify_header(authorization).await;
        match &result {
            Ok(claims) => debug!(subject = claims.subject(), "Token verified"),
            Err(e) => debug!(code = e.error_code(), error = %e, "Token rejected"),
        }
        result
    }

    async fn verify_header(&self, authorization: Option<&str>) -> AuthResult<Claims> {
        let token = bearer_token(authorization)?;
        let header = TokenHeader::decode(token)?;

        if header.alg != self.config.algorithm_name() {
            return Err(AuthError::UnsupportedAlgorithm(header.alg));
        }
        let kid = header.kid.ok_or(AuthError::MalformedToken)?;

        let key = self.jwks.resolve(&kid).await?;
        let data = decode::<Value>(token, &key, &self.validation).map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            ErrorKind::InvalidAlgorithm => AuthError::UnsupportedAlgorithm(header.alg.clone()),
            _ => AuthError::MalformedToken,
        })?;
        debug!(kid = %kid, "Token signature verified");

        validate_claims(data.claims, &self.config, Utc::now().timestamp())
    }
}
