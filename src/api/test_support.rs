// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Router harness: a full application backed by a mock JWKS endpoint.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use wiremock::MockServer;

use super::router;
use crate::auth::test_support::{self as auth_support, bearer, mint_primary, payload};
use crate::auth::TokenVerifier;
use crate::state::AppState;
use crate::store::CatalogStore;

pub struct TestApp {
    pub state: AppState,
    router: Router,
    _jwks: MockServer,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let jwks = MockServer::start().await;
        auth_support::mount_jwks_unbounded(&jwks, auth_support::jwks_primary()).await;
        let verifier = TokenVerifier::new(auth_support::config(&jwks)).unwrap();
        Self::with_verifier(verifier, jwks)
    }

    pub fn with_verifier(verifier: TokenVerifier, jwks: MockServer) -> Self {
        let state = AppState::new(CatalogStore::new(), verifier);
        Self {
            router: router(state.clone()),
            state,
            _jwks: jwks,
        }
    }

    pub async fn raw(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Send a request as a caller holding `permissions` (anonymous when `None`).
    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        permissions: Option<&[&str]>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let header = permissions.map(|granted| bearer(&mint_primary(&payload(granted))));
        self.call_with_header(method, uri, header.as_deref(), body).await
    }

    pub async fn call_with_header(
        &self,
        method: Method,
        uri: &str,
        authorization: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(value) = authorization {
            request = request.header(header::AUTHORIZATION, value);
        }
        let request = match body {
            Some(json) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = self.raw(request).await;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }
}
