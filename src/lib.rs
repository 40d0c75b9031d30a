// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Casting Agency API
//!
//! REST service managing actors, movies and casts, protected by bearer
//! tokens issued by an external identity provider.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Token verification and permission enforcement
//! - `config` - Environment-driven configuration
//! - `store` - In-memory casting catalog

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod store;
