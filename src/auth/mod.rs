// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Bearer token authentication and permission enforcement for the casting
//! agency API.
//!
//! ## Auth Flow
//!
//! 1. The client obtains an RS256 access token from the identity provider
//! 2. The client sends `Authorization: Bearer <token>`
//! 3. The server:
//!    - Resolves the signing key by `kid` from the provider's JWKS
//!    - Verifies the signature, then expiry, audience and issuer
//!    - Checks the `permissions` claim for the label the endpoint requires
//!
//! ## Security
//!
//! - Only the configured RSA algorithm is accepted; `none` and HMAC never are
//! - An unknown `kid` triggers at most one JWKS refresh per request
//! - The key set is replaced as a whole snapshot, never edited in place

pub mod claims;
pub mod config;
pub mod error;
pub mod extractor;
pub mod jwks;
pub mod permissions;
pub mod token;
pub mod verifier;

#[cfg(test)]
pub(crate) mod test_support;

pub use claims::Claims;
pub use config::{AuthConfig, RsaAlgorithm};
pub use error::{AuthError, AuthResult};
pub use extractor::{require_permission, Authorized};
pub use jwks::{JwksManager, KeySet};
pub use permissions::{authorize, Permission};
pub use verifier::TokenVerifier;
