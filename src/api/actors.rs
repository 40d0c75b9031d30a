// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};

use super::{ApiJson, ApiPath};
use crate::{
    auth::{
        permissions::{DeleteActors, GetActors, PatchActors, PostActors},
        Authorized,
    },
    error::ApiError,
    models::{ActorResponse, ActorsResponse, CreateActorRequest, ErrorResponse, Id, UpdateActorRequest},
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/api/actors",
    tag = "Actors",
    security(("bearer" = ["get:actors"])),
    responses(
        (status = 200, description = "All actors", body = ActorsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - missing get:actors", body = ErrorResponse)
    )
)]
pub async fn list_actors(
    _: Authorized<GetActors>,
    State(state): State<AppState>,
) -> Json<ActorsResponse> {
    let store = state.store.read().await;
    Json(store.list_actors().into())
}

#[utoipa::path(
    post,
    path = "/api/actors",
    tag = "Actors",
    request_body = CreateActorRequest,
    security(("bearer" = ["post:actors"])),
    responses(
        (status = 200, description = "Actor created", body = ActorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - missing post:actors", body = ErrorResponse),
        (status = 422, description = "Invalid actor", body = ErrorResponse)
    )
)]
pub async fn create_actor(
    _: Authorized<PostActors>,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateActorRequest>,
) -> Result<Json<ActorResponse>, ApiError> {
    let mut store = state.store.write().await;
    let actor = store.create_actor(request)?;
    Ok(Json(actor.into()))
}

#[utoipa::path(
    patch,
    path = "/api/actors/{actor_id}",
    tag = "Actors",
    params(
        ("actor_id" = u64, Path, description = "Identifier of the actor to update")
    ),
    request_body = UpdateActorRequest,
    security(("bearer" = ["patch:actors"])),
    responses(
        (status = 200, description = "Actor updated", body = ActorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - missing patch:actors", body = ErrorResponse),
        (status = 404, description = "Actor not found", body = ErrorResponse)
    )
)]
pub async fn update_actor(
    _: Authorized<PatchActors>,
    State(state): State<AppState>,
    ApiPath(actor_id): ApiPath<Id>,
    ApiJson(request): ApiJson<UpdateActorRequest>,
) -> Result<Json<ActorResponse>, ApiError> {
    let mut store = state.store.write().await;
    let actor = store.update_actor(actor_id, request)?;
    Ok(Json(actor.into()))
}

/// Delete an actor together with its casts.
#[utoipa::path(
    delete,
    path = "/api/actors/{actor_id}",
    tag = "Actors",
    params(
        ("actor_id" = u64, Path, description = "Identifier of the actor to delete")
    ),
    security(("bearer" = ["delete:actors"])),
    responses(
        (status = 200, description = "Deleted actor", body = ActorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - missing delete:actors", body = ErrorResponse),
        (status = 404, description = "Actor not found", body = ErrorResponse)
    )
)]
pub async fn delete_actor(
    _: Authorized<DeleteActors>,
    State(state): State<AppState>,
    ApiPath(actor_id): ApiPath<Id>,
) -> Result<Json<ActorResponse>, ApiError> {
    let mut store = state.store.write().await;
    let actor = store.delete_actor(actor_id)?;
    Ok(Json(actor.into()))
}
