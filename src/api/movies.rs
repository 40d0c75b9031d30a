// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};

use super::{ApiJson, ApiPath};
use crate::{
    auth::{
        permissions::{DeleteMovies, GetMovies, PatchMovies, PostMovies},
        Authorized,
    },
    error::ApiError,
    models::{CreateMovieRequest, ErrorResponse, Id, MovieResponse, MoviesResponse, UpdateMovieRequest},
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/api/movies",
    tag = "Movies",
    security(("bearer" = ["get:movies"])),
    responses(
        (status = 200, description = "All movies", body = MoviesResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - missing get:movies", body = ErrorResponse)
    )
)]
pub async fn list_movies(
    _: Authorized<GetMovies>,
    State(state): State<AppState>,
) -> Json<MoviesResponse> {
    let store = state.store.read().await;
    Json(store.list_movies().into())
}

#[utoipa::path(
    post,
    path = "/api/movies",
    tag = "Movies",
    request_body = CreateMovieRequest,
    security(("bearer" = ["post:movies"])),
    responses(
        (status = 200, description = "Movie created", body = MovieResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - missing post:movies", body = ErrorResponse),
        (status = 422, description = "Invalid movie", body = ErrorResponse)
    )
)]
pub async fn create_movie(
    _: Authorized<PostMovies>,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateMovieRequest>,
) -> Result<Json<MovieResponse>, ApiError> {
    let mut store = state.store.write().await;
    let movie = store.create_movie(request)?;
    Ok(Json(movie.into()))
}

#[utoipa::path(
    patch,
    path = "/api/movies/{movie_id}",
    tag = "Movies",
    params(
        ("movie_id" = u64, Path, description = "Identifier of the movie to update")
    ),
    request_body = UpdateMovieRequest,
    security(("bearer" = ["patch:movies"])),
    responses(
        (status = 200, description = "Movie updated", body = MovieResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - missing patch:movies", body = ErrorResponse),
        (status = 404, description = "Movie not found", body = ErrorResponse)
    )
)]
pub async fn update_movie(
    _: Authorized<PatchMovies>,
    State(state): State<AppState>,
    ApiPath(movie_id): ApiPath<Id>,
    ApiJson(request): ApiJson<UpdateMovieRequest>,
) -> Result<Json<MovieResponse>, ApiError> {
    let mut store = state.store.write().await;
    let movie = store.update_movie(movie_id, request)?;
    Ok(Json(movie.into()))
}

/// Delete a movie together with its casts.
#[utoipa::path(
    delete,
    path = "/api/movies/{movie_id}",
    tag = "Movies",
    params(
        ("movie_id" = u64, Path, description = "Identifier of the movie to delete")
    ),
    security(("bearer" = ["delete:movies"])),
    responses(
        (status = 200, description = "Deleted movie", body = MovieResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - missing delete:movies", body = ErrorResponse),
        (status = 404, description = "Movie not found", body = ErrorResponse)
    )
)]
pub async fn delete_movie(
    _: Authorized<DeleteMovies>,
    State(state): State<AppState>,
    ApiPath(movie_id): ApiPath<Id>,
) -> Result<Json<MovieResponse>, ApiError> {
    let mut store = state.store.write().await;
    let movie = store.delete_movie(movie_id)?;
    Ok(Json(movie.into()))
}
