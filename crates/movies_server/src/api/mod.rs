//! HTTP surface for the movie catalog.
//!
//! # Responsibility
//! - Route `/api/v1/movies/*` requests to the catalog service.
//! - Map query outcomes to status codes with generic JSON error bodies.

pub mod error;
pub mod handlers;

use axum::routing::get;
use axum::Router;
use movies_core::{CatalogService, MovieRepository};
use std::sync::Arc;

pub use error::ApiError;

/// Builds the catalog router over a shared service.
pub fn router<R>(service: Arc<CatalogService<R>>) -> Router
where
    R: MovieRepository + 'static,
{
    Router::new()
        .route("/api/v1/movies/top", get(handlers::top_movies::<R>))
        .route("/api/v1/movies/random", get(handlers::random_movies::<R>))
        .route("/api/v1/movies/search", get(handlers::search_movies::<R>))
        .route("/api/v1/movies/genres", get(handlers::list_genres::<R>))
        .route("/api/v1/movies/{id}", get(handlers::get_movie::<R>))
        .with_state(service)
}
