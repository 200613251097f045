//! HTTP handlers for the catalog endpoints.
//!
//! Catalog queries block on SQLite, so each runs on the blocking pool.

use super::error::ApiError;
use axum::extract::{Path, Query, State};
use axum::Json;
use movies_core::{CatalogService, Genre, GenreId, Movie, MovieId, MovieRepository, RepoResult};
use serde::Deserialize;
use std::sync::Arc;

pub type SharedService<R> = Arc<CatalogService<R>>;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub order: Option<String>,
    pub genre: Option<String>,
}

pub async fn top_movies<R>(
    State(service): State<SharedService<R>>,
) -> Result<Json<Vec<Movie>>, ApiError>
where
    R: MovieRepository + 'static,
{
    run_blocking(service, |service| service.top_movies()).await
}

pub async fn random_movies<R>(
    State(service): State<SharedService<R>>,
) -> Result<Json<Vec<Movie>>, ApiError>
where
    R: MovieRepository + 'static,
{
    run_blocking(service, |service| service.random_movies()).await
}

pub async fn search_movies<R>(
    State(service): State<SharedService<R>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Movie>>, ApiError>
where
    R: MovieRepository + 'static,
{
    let genre = parse_genre(params.genre.as_deref())?;
    let term = params.q.unwrap_or_default();
    let order = params.order.unwrap_or_default();
    run_blocking(service, move |service| {
        service.search_movies(&term, &order, genre)
    })
    .await
}

pub async fn list_genres<R>(
    State(service): State<SharedService<R>>,
) -> Result<Json<Vec<Genre>>, ApiError>
where
    R: MovieRepository + 'static,
{
    run_blocking(service, |service| service.genres()).await
}

pub async fn get_movie<R>(
    State(service): State<SharedService<R>>,
    Path(raw_id): Path<String>,
) -> Result<Json<Movie>, ApiError>
where
    R: MovieRepository + 'static,
{
    let id = parse_id(&raw_id)?;
    run_blocking(service, move |service| service.movie(id)).await
}

async fn run_blocking<R, T, F>(service: SharedService<R>, query: F) -> Result<Json<T>, ApiError>
where
    R: MovieRepository + 'static,
    T: Send + 'static,
    F: FnOnce(&CatalogService<R>) -> RepoResult<T> + Send + 'static,
{
    let result = tokio::task::spawn_blocking(move || query(service.as_ref())).await?;
    Ok(Json(result?))
}

pub(crate) fn parse_id(raw: &str) -> Result<MovieId, ApiError> {
    match raw.trim().parse::<MovieId>() {
        Ok(id) if id >= 0 => Ok(id),
        _ => Err(ApiError::InvalidId),
    }
}

/// Absent or empty genre means no filter.
pub(crate) fn parse_genre(raw: Option<&str>) -> Result<Option<GenreId>, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_id(value).map(Some),
    }
}
