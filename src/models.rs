// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! This module defines the request and response data structures used by
//! the REST API. All types derive `Serialize` and/or `Deserialize` together
//! with `ToSchema` for automatic JSON handling and OpenAPI documentation.
//!
//! ## Model Categories
//!
//! - **Actors**: Performers available for casting
//! - **Movies**: Productions with a release date
//! - **Casts**: The assignment of one actor to one movie
//!
//! Every success response is wrapped in an envelope carrying
//! `"success": true` next to the payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Sequential identifier allocated by the catalog.
pub type Id = u64;

// =============================================================================
// Actor Models
// =============================================================================

/// A performer in the casting agency's roster.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Actor {
    pub id: Id,
    pub name: String,
    pub age: u32,
    pub gender: String,
}

/// Request to add an actor.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateActorRequest {
    pub name: String,
    pub age: u32,
    pub gender: String,
}

/// Partial actor update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateActorRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
}

// =============================================================================
// Movie Models
// =============================================================================

/// A production actors can be cast in.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Movie {
    pub id: Id,
    pub title: String,
    /// RFC 3339 timestamp
    pub release_date: DateTime<Utc>,
}

/// Request to add a movie.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateMovieRequest {
    pub title: String,
    pub release_date: DateTime<Utc>,
}

/// Partial movie update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateMovieRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub release_date: Option<DateTime<Utc>>,
}

// =============================================================================
// Cast Models
// =============================================================================

/// An actor cast in a movie, rendered with both sides of the relation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Cast {
    pub id: Id,
    pub movie_id: Id,
    pub movie: Movie,
    pub actor_id: Id,
    pub actor: Actor,
}

/// Request to cast an actor in a movie. Also used to reassign a cast;
/// both fields are required in either case.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CastRequest {
    pub movie_id: Id,
    pub actor_id: Id,
}

// =============================================================================
// Response Envelopes
// =============================================================================

#[derive(Debug, Serialize, ToSchema)]
pub struct ActorsResponse {
    pub success: bool,
    pub actors: Vec<Actor>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ActorResponse {
    pub success: bool,
    pub actor: Actor,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MoviesResponse {
    pub success: bool,
    pub movies: Vec<Movie>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MovieResponse {
    pub success: bool,
    pub movie: Movie,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CastsResponse {
    pub success: bool,
    pub casts: Vec<Cast>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CastResponse {
    pub success: bool,
    pub cast: Cast,
}

impl From<Vec<Actor>> for ActorsResponse {
    fn from(actors: Vec<Actor>) -> Self {
        Self {
            success: true,
            actors,
        }
    }
}

impl From<Actor> for ActorResponse {
    fn from(actor: Actor) -> Self {
        Self {
            success: true,
            actor,
        }
    }
}

impl From<Vec<Movie>> for MoviesResponse {
    fn from(movies: Vec<Movie>) -> Self {
        Self {
            success: true,
            movies,
        }
    }
}

impl From<Movie> for MovieResponse {
    fn from(movie: Movie) -> Self {
        Self {
            success: true,
            movie,
        }
    }
}

impl From<Vec<Cast>> for CastsResponse {
    fn from(casts: Vec<Cast>) -> Self {
        Self {
            success: true,
            casts,
        }
    }
}

impl From<Cast> for CastResponse {
    fn from(cast: Cast) -> Self {
        Self {
            success: true,
            cast,
        }
    }
}

/// Error envelope shared by every failure response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    /// HTTP status code
    pub error: u16,
    /// Stable machine-readable code (authentication failures only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub message: String,
}
