// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication and authorization errors.
//!
//! Every variant carries its own HTTP status, stable code and description so
//! that the response boundary needs no knowledge of the taxonomy.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

/// Request-scoped authentication/authorization failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No authorization header present
    #[error("Authorization header is expected")]
    MissingHeader,
    /// Header present but not `Bearer <token>`
    #[error("Authorization header must be of the form 'Bearer <token>'")]
    MalformedHeader,
    /// Token is not a header.payload.signature structure
    #[error("Token is malformed")]
    MalformedToken,
    /// Token declares an algorithm other than the configured one
    #[error("Signing algorithm '{0}' is not accepted")]
    UnsupportedAlgorithm(String),
    /// No signing key for the token's kid, even after a refresh
    #[error("No signing key found for kid '{0}'")]
    UnknownSigningKey(String),
    /// Signature does not match the resolved key
    #[error("Token signature is invalid")]
    InvalidSignature,
    #[error("Token has expired")]
    TokenExpired,
    #[error("Token audience is invalid")]
    InvalidAudience,
    #[error("Token issuer is invalid")]
    InvalidIssuer,
    #[error("Token is not yet valid")]
    TokenNotYetValid,
    /// Verified token carries no permissions claim at all
    #[error("Permissions not included in token")]
    MissingPermissionsClaim,
    #[error("Permission '{0}' not found")]
    PermissionDenied(String),
    /// The key endpoint did not answer within the configured timeout
    #[error("Timed out fetching signing keys")]
    KeyFetchTimeout,
    /// Unexpected fault (unreachable or malformed JWKS, bad key material)
    #[error("Internal authentication error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    success: bool,
    error: u16,
    code: &'static str,
    message: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingHeader => "missing_header",
            AuthError::MalformedHeader => "malformed_header",
            AuthError::MalformedToken => "malformed_token",
            AuthError::UnsupportedAlgorithm(_) => "unsupported_algorithm",
            AuthError::UnknownSigningKey(_) => "unknown_signing_key",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidAudience => "invalid_audience",
            AuthError::InvalidIssuer => "invalid_issuer",
            AuthError::TokenNotYetValid => "token_not_yet_valid",
            AuthError::MissingPermissionsClaim => "missing_permissions_claim",
            AuthError::PermissionDenied(_) => "permission_denied",
            AuthError::KeyFetchTimeout => "key_fetch_timeout",
            AuthError::Internal(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingHeader
            | AuthError::MalformedHeader
            | AuthError::MalformedToken
            | AuthError::UnsupportedAlgorithm(_)
            | AuthError::UnknownSigningKey(_)
            | AuthError::InvalidSignature
            | AuthError::TokenExpired
            | AuthError::InvalidAudience
            | AuthError::InvalidIssuer
            | AuthError::TokenNotYetValid
            | AuthError::MissingPermissionsClaim => StatusCode::UNAUTHORIZED,
            AuthError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            AuthError::KeyFetchTimeout | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Human-readable description, as rendered in the response body.
    pub fn description(&self) -> String {
        self.to_string()
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "Authentication fault");
        }
        let body = Json(AuthErrorBody {
            success: false,
            error: status.as_u16(),
            code: self.error_code(),
            message: self.description(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(error: AuthError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn missing_header_returns_401() {
        let (status, body) = body_of(AuthError::MissingHeader).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], 401);
        assert_eq!(body["code"], "missing_header");
        assert_eq!(body["message"], "Authorization header is expected");
    }

    #[tokio::test]
    async fn permission_denied_returns_403() {
        let (status, body) = body_of(AuthError::PermissionDenied("post:movies".into())).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], 403);
        assert_eq!(body["code"], "permission_denied");
        assert_eq!(body["message"], "Permission 'post:movies' not found");
    }

    #[tokio::test]
    async fn internal_faults_return_500() {
        let (status, body) = body_of(AuthError::Internal("bad JWKS".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "internal_error");

        let (status, _) = body_of(AuthError::KeyFetchTimeout).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn authentication_failures_are_all_401() {
        let errors = [
            AuthError::MissingHeader,
            AuthError::MalformedHeader,
            AuthError::MalformedToken,
            AuthError::UnsupportedAlgorithm("HS256".into()),
            AuthError::UnknownSigningKey("kid".into()),
            AuthError::InvalidSignature,
            AuthError::TokenExpired,
            AuthError::InvalidAudience,
            AuthError::InvalidIssuer,
            AuthError::TokenNotYetValid,
            AuthError::MissingPermissionsClaim,
        ];
        for error in errors {
            assert_eq!(error.status_code(), StatusCode::UNAUTHORIZED, "{error:?}");
        }
    }
}
