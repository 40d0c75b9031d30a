// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory casting catalog.
//!
//! Holds actors, movies and the casts linking them. Ids are allocated
//! sequentially per table and never reused. A movie/actor pair can be cast
//! at most once, and removing an actor or a movie removes its casts.

use std::collections::BTreeMap;

use crate::error::ApiError;
use crate::models::{
    Actor, Cast, CastRequest, CreateActorRequest, CreateMovieRequest, Id, Movie,
    UpdateActorRequest, UpdateMovieRequest,
};

/// Stored cast row; rendered into a [`Cast`] with both sides attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CastRecord {
    movie_id: Id,
    actor_id: Id,
}

#[derive(Default)]
pub struct CatalogStore {
    actors: BTreeMap<Id, Actor>,
    movies: BTreeMap<Id, Movie>,
    casts: BTreeMap<Id, CastRecord>,
    next_actor_id: Id,
    next_movie_id: Id,
    next_cast_id: Id,
}

fn required_text(field: &str, value: String) -> Result<String, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::unprocessable(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

fn next_id(counter: &mut Id) -> Id {
    *counter += 1;
    *counter
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Actors
    // -------------------------------------------------------------------------

    pub fn list_actors(&self) -> Vec<Actor> {
        self.actors.values().cloned().collect()
    }

    pub fn actor(&self, id: Id) -> Result<&Actor, ApiError> {
        self.actors
            .get(&id)
            .ok_or_else(|| ApiError::not_found(format!("Actor {id} not found")))
    }

    pub fn create_actor(&mut self, request: CreateActorRequest) -> Result<Actor, ApiError> {
        let name = required_text("name", request.name)?;
        let gender = required_text("gender", request.gender)?;
        let actor = Actor {
            id: next_id(&mut self.next_actor_id),
            name,
            age: request.age,
            gender,
        };
        self.actors.insert(actor.id, actor.clone());
        Ok(actor)
    }

    pub fn update_actor(&mut self, id: Id, request: UpdateActorRequest) -> Result<Actor, ApiError> {
        self.actor(id)?;
        let name = request.name.map(|n| required_text("name", n)).transpose()?;
        let gender = request
            .gender
            .map(|g| required_text("gender", g))
            .transpose()?;

        let actor = self
            .actors
            .get_mut(&id)
            .ok_or_else(|| ApiError::not_found(format!("Actor {id} not found")))?;
        if let Some(name) = name {
            actor.name = name;
        }
        if let Some(age) = request.age {
            actor.age = age;
        }
        if let Some(gender) = gender {
            actor.gender = gender;
        }
        Ok(actor.clone())
    }

    /// Remove an actor and every cast it appears in.
    pub fn delete_actor(&mut self, id: Id) -> Result<Actor, ApiError> {
        let actor = self
            .actors
            .remove(&id)
            .ok_or_else(|| ApiError::not_found(format!("Actor {id} not found")))?;
        self.casts.retain(|_, cast| cast.actor_id != id);
        Ok(actor)
    }

    // -------------------------------------------------------------------------
    // Movies
    // -------------------------------------------------------------------------

    pub fn list_movies(&self) -> Vec<Movie> {
        self.movies.values().cloned().collect()
    }

    pub fn movie(&self, id: Id) -> Result<&Movie, ApiError> {
        self.movies
            .get(&id)
            .ok_or_else(|| ApiError::not_found(format!("Movie {id} not found")))
    }

    pub fn create_movie(&mut self, request: CreateMovieRequest) -> Result<Movie, ApiError> {
        let movie = Movie {
            id: next_id(&mut self.next_movie_id),
            title: required_text("title", request.title)?,
            release_date: request.release_date,
        };
        self.movies.insert(movie.id, movie.clone());
        Ok(movie)
    }

    pub fn update_movie(&mut self, id: Id, request: UpdateMovieRequest) -> Result<Movie, ApiError> {
        self.movie(id)?;
        let title = request
            .title
            .map(|t| required_text("title", t))
            .transpose()?;

        let movie = self
            .movies
            .get_mut(&id)
            .ok_or_else(|| ApiError::not_found(format!("Movie {id} not found")))?;
        if let Some(title) = title {
            movie.title = title;
        }
        if let Some(release_date) = request.release_date {
            movie.release_date = release_date;
        }
        Ok(movie.clone())
    }

    /// Remove a movie and its casts.
    pub fn delete_movie(&mut self, id: Id) -> Result<Movie, ApiError> {
        let movie = self
            .movies
            .remove(&id)
            .ok_or_else(|| ApiError::not_found(format!("Movie {id} not found")))?;
        self.casts.retain(|_, cast| cast.movie_id != id);
        Ok(movie)
    }

    // -------------------------------------------------------------------------
    // Casts
    // -------------------------------------------------------------------------

    fn render_cast(&self, id: Id, record: CastRecord) -> Result<Cast, ApiError> {
        let movie = self.movie(record.movie_id)?.clone();
        let actor = self.actor(record.actor_id)?.clone();
        Ok(Cast {
            id,
            movie_id: record.movie_id,
            movie,
            actor_id: record.actor_id,
            actor,
        })
    }

    /// Reject references to missing rows and duplicate pairs (`except` is the
    /// cast being reassigned, which may keep its own pair).
    fn check_cast(&self, record: CastRecord, except: Option<Id>) -> Result<(), ApiError> {
        if !self.movies.contains_key(&record.movie_id) {
            return Err(ApiError::bad_request(format!(
                "Movie {} does not exist",
                record.movie_id
            )));
        }
        if !self.actors.contains_key(&record.actor_id) {
            return Err(ApiError::bad_request(format!(
                "Actor {} does not exist",
                record.actor_id
            )));
        }
        let duplicate = self
            .casts
            .iter()
            .any(|(id, existing)| Some(*id) != except && *existing == record);
        if duplicate {
            return Err(ApiError::bad_request(format!(
                "Actor {} is already cast in movie {}",
                record.actor_id, record.movie_id
            )));
        }
        Ok(())
    }

    pub fn list_casts(&self) -> Result<Vec<Cast>, ApiError> {
        self.casts
            .iter()
            .map(|(id, record)| self.render_cast(*id, *record))
            .collect()
    }

    pub fn create_cast(&mut self, request: CastRequest) -> Result<Cast, ApiError> {
        let record = CastRecord {
            movie_id: request.movie_id,
            actor_id: request.actor_id,
        };
        self.check_cast(record, None)?;
        let id = next_id(&mut self.next_cast_id);
        self.casts.insert(id, record);
        self.render_cast(id, record)
    }

    pub fn update_cast(&mut self, id: Id, request: CastRequest) -> Result<Cast, ApiError> {
        if !self.casts.contains_key(&id) {
            return Err(ApiError::not_found(format!("Cast {id} not found")));
        }
        let record = CastRecord {
            movie_id: request.movie_id,
            actor_id: request.actor_id,
        };
        self.check_cast(record, Some(id))?;
        self.casts.insert(id, record);
        self.render_cast(id, record)
    }

    pub fn delete_cast(&mut self, id: Id) -> Result<Cast, ApiError> {
        let record = *self
            .casts
            .get(&id)
            .ok_or_else(|| ApiError::not_found(format!("Cast {id} not found")))?;
        let cast = self.render_cast(id, record)?;
        self.casts.remove(&id);
        Ok(cast)
    }
}
