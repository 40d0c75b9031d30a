// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{FromRequest, FromRequestParts},
    http::{header, HeaderName, Method},
    routing::{get, patch},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    error::ApiError,
    models::{
        Actor, ActorResponse, ActorsResponse, Cast, CastRequest, CastResponse, CastsResponse,
        CreateActorRequest, CreateMovieRequest, ErrorResponse, Movie, MovieResponse,
        MoviesResponse, UpdateActorRequest, UpdateMovieRequest,
    },
    state::AppState,
};

pub mod actors;
pub mod casts;
pub mod health;
pub mod movies;

#[cfg(test)]
pub(crate) mod test_support;

/// JSON body whose parse failures render as [`ApiError`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path parameters whose parse failures render as [`ApiError`].
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/actors", get(actors::list_actors).post(actors::create_actor))
        .route(
            "/actors/{actor_id}",
            patch(actors::update_actor).delete(actors::delete_actor),
        )
        .route("/movies", get(movies::list_movies).post(movies::create_movie))
        .route(
            "/movies/{movie_id}",
            patch(movies::update_movie).delete(movies::delete_movie),
        )
        .route("/casts", get(casts::list_casts).post(casts::create_cast))
        .route(
            "/casts/{cast_id}",
            patch(casts::update_cast).delete(casts::delete_cast),
        );

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness));

    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);
    let layers = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
        .layer(PropagateRequestIdLayer::new(request_id))
        .layer(TraceLayer::new_for_http())
        .layer(cors());

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(layers)
}

/// Any origin, the methods the API serves, and the two headers clients send.
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        actors::list_actors,
        actors::create_actor,
        actors::update_actor,
        actors::delete_actor,
        movies::list_movies,
        movies::create_movie,
        movies::update_movie,
        movies::delete_movie,
        casts::list_casts,
        casts::create_cast,
        casts::update_cast,
        casts::delete_cast,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            Actor,
            Movie,
            Cast,
            CreateActorRequest,
            UpdateActorRequest,
            CreateMovieRequest,
            UpdateMovieRequest,
            CastRequest,
            ActorsResponse,
            ActorResponse,
            MoviesResponse,
            MovieResponse,
            CastsResponse,
            CastResponse,
            ErrorResponse,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    modifiers(&BearerSecurity),
    tags(
        (name = "Actors", description = "Actor roster"),
        (name = "Movies", description = "Movie catalog"),
        (name = "Casts", description = "Actor to movie assignments"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
