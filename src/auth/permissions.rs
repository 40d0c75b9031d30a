// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Permission labels and the enforcement check.
//!
//! Each label an endpoint can require is a zero-sized marker type so the
//! requirement is part of the handler signature:
//!
//! ```rust,ignore
//! async fn delete_actor(_: Authorized<DeleteActors>, ...) -> ... { }
//! ```

use super::claims::Claims;
use super::error::{AuthError, AuthResult};

/// A permission label, `<verb>:<resource>`.
pub trait Permission: Send + Sync + 'static {
    const NAME: &'static str;
}

macro_rules! permissions {
    ($($(#[$meta:meta])* $marker:ident => $name:literal),+ $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq)]
            pub struct $marker;

            impl Permission for $marker {
                const NAME: &'static str = $name;
            }
        )+

        /// Every label an endpoint of this service can require.
        pub const ALL: &[&str] = &[$($name),+];
    };
}

permissions! {
    GetActors => "get:actors",
    PostActors => "post:actors",
    PatchActors => "patch:actors",
    DeleteActors => "delete:actors",
    /// Also gates reading casts
    GetMovies => "get:movies",
    PostMovies => "post:movies",
    /// Also gates creating, changing and removing casts
    PatchMovies => "patch:movies",
    DeleteMovies => "delete:movies",
}

/// Check that verified claims grant `required`.
///
/// Returns the claims unchanged on success. A token without any permissions
/// claim fails with [`AuthError::MissingPermissionsClaim`]; a claim that does
/// not contain the label fails with [`AuthError::PermissionDenied`].
pub fn authorize(claims: Claims, required: &str) -> AuthResult<Claims> {
    if !claims.has_permissions_claim() {
        return Err(AuthError::MissingPermissionsClaim);
    }
    if !claims.has_permission(required) {
        return Err(AuthError::PermissionDenied(required.to_string()));
    }
    Ok(claims)
}
