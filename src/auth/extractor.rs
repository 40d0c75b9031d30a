// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor enforcing a permission on a handler.
//!
//! Use the `Authorized` extractor in handlers to require a permission:
//!
//! ```rust,ignore
//! async fn list_actors(
//!     Authorized(claims, _): Authorized<GetActors>,
//!     State(state): State<AppState>,
//! ) -> Result<Json<ActorsResponse>, ApiError> {
//!     // claims verified and grant get:actors
//! }
//! ```

use std::marker::PhantomData;
use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use super::claims::Claims;
use super::error::{AuthError, AuthResult};
use super::permissions::{authorize, Permission};
use super::verifier::TokenVerifier;

/// Verify the header, then check `required` against the claims.
///
/// This is the one enforcement path; the extractor and any non-axum caller
/// both go through it.
pub async fn require_permission(
    verifier: &TokenVerifier,
    authorization: Option<&str>,
    required: &str,
) -> AuthResult<Claims> {
    let claims = verifier.verify(authorization).await?;
    authorize(claims, required)
}

/// Claims of a caller holding permission `P`.
///
/// Rejection is an [`AuthError`], which renders the error envelope itself.
pub struct Authorized<P: Permission>(pub Claims, pub PhantomData<P>);

impl<P: Permission> Authorized<P> {
    pub fn claims(&self) -> &Claims {
        &self.0
    }
}

impl<S, P> FromRequestParts<S> for Authorized<P>
where
    Arc<TokenVerifier>: FromRef<S>,
    S: Send + Sync,
    P: Permission,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let verifier = Arc::<TokenVerifier>::from_ref(state);

        let authorization = match parts.headers.get(AUTHORIZATION) {
            Some(value) => Some(value.to_str().map_err(|_| AuthError::MalformedHeader)?),
            None => None,
        };

        let claims = require_permission(&verifier, authorization, P::NAME).await?;
        Ok(Authorized(claims, PhantomData))
    }
}
