// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Cast handlers. Casts belong to the movie side of the catalog: reading
//! them needs `get:movies`, changing them needs `patch:movies`.

use axum::{extract::State, Json};

use super::{ApiJson, ApiPath};
use crate::{
    auth::{
        permissions::{GetMovies, PatchMovies},
        Authorized,
    },
    error::ApiError,
    models::{CastRequest, CastResponse, CastsResponse, ErrorResponse, Id},
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/api/casts",
    tag = "Casts",
    security(("bearer" = ["get:movies"])),
    responses(
        (status = 200, description = "All casts with actor and movie", body = CastsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - missing get:movies", body = ErrorResponse)
    )
)]
pub async fn list_casts(
    _: Authorized<GetMovies>,
    State(state): State<AppState>,
) -> Result<Json<CastsResponse>, ApiError> {
    let store = state.store.read().await;
    Ok(Json(store.list_casts()?.into()))
}

#[utoipa::path(
    post,
    path = "/api/casts",
    tag = "Casts",
    request_body = CastRequest,
    security(("bearer" = ["patch:movies"])),
    responses(
        (status = 200, description = "Cast created", body = CastResponse),
        (status = 400, description = "Unknown actor or movie, or duplicate cast", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - missing patch:movies", body = ErrorResponse)
    )
)]
pub async fn create_cast(
    _: Authorized<PatchMovies>,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CastRequest>,
) -> Result<Json<CastResponse>, ApiError> {
    let mut store = state.store.write().await;
    let cast = store.create_cast(request)?;
    Ok(Json(cast.into()))
}

#[utoipa::path(
    patch,
    path = "/api/casts/{cast_id}",
    tag = "Casts",
    params(
        ("cast_id" = u64, Path, description = "Identifier of the cast to reassign")
    ),
    request_body = CastRequest,
    security(("bearer" = ["patch:movies"])),
    responses(
        (status = 200, description = "Cast updated", body = CastResponse),
        (status = 400, description = "Unknown actor or movie, or duplicate cast", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - missing patch:movies", body = ErrorResponse),
        (status = 404, description = "Cast not found", body = ErrorResponse)
    )
)]
pub async fn update_cast(
    _: Authorized<PatchMovies>,
    State(state): State<AppState>,
    ApiPath(cast_id): ApiPath<Id>,
    ApiJson(request): ApiJson<CastRequest>,
) -> Result<Json<CastResponse>, ApiError> {
    let mut store = state.store.write().await;
    let cast = store.update_cast(cast_id, request)?;
    Ok(Json(cast.into()))
}

#[utoipa::path(
    delete,
    path = "/api/casts/{cast_id}",
    tag = "Casts",
    params(
        ("cast_id" = u64, Path, description = "Identifier of the cast to delete")
    ),
    security(("bearer" = ["patch:movies"])),
    responses(
        (status = 200, description = "Deleted cast", body = CastResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - missing patch:movies", body = ErrorResponse),
        (status = 404, description = "Cast not found", body = ErrorResponse)
    )
)]
pub async fn delete_cast(
    _: Authorized<PatchMovies>,
    State(state): State<AppState>,
    ApiPath(cast_id): ApiPath<Id>,
) -> Result<Json<CastResponse>, ApiError> {
    let mut store = state.store.write().await;
    let cast = store.delete_cast(cast_id)?;
    Ok(Json(cast.into()))
}
