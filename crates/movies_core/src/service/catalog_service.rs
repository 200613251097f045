//! Catalog use-case service.
//!
//! # Responsibility
//! - Expose one entry point per catalog query for request layers.
//! - Emit metadata-only log events with outcome and duration.
//! - Keep store failure causes in logs, never in caller-facing text.
//!
//! # Invariants
//! - Every call reaches the repository exactly once, except blank searches,
//!   which short-circuit to an empty list.
//! - Repository outcomes are returned unchanged.

use crate::model::movie::{Genre, GenreId, Movie, MovieId};
use crate::repo::movie_repo::{MovieRepository, RepoError, RepoResult};
use crate::search::query::MovieSearch;
use log::{debug, error, info};
use std::time::Instant;

/// Use-case facade over a movie repository.
pub struct CatalogService<R: MovieRepository> {
    repo: R,
}

impl<R: MovieRepository> CatalogService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Top-rated movies.
    pub fn top_movies(&self) -> RepoResult<Vec<Movie>> {
        let started_at = Instant::now();
        let result = self.repo.top_movies();
        log_list_outcome("movies_top", started_at, &result);
        result
    }

    /// A random sample of the catalog.
    pub fn random_movies(&self) -> RepoResult<Vec<Movie>> {
        let started_at = Instant::now();
        let result = self.repo.random_movies();
        log_list_outcome("movies_random", started_at, &result);
        result
    }

    /// Title search.
    ///
    /// `order_key` is resolved through the order allow-list; unknown keys
    /// sort by rating. A blank `term` returns an empty list without touching
    /// storage.
    pub fn search_movies(
        &self,
        term: &str,
        order_key: &str,
        genre: Option<GenreId>,
    ) -> RepoResult<Vec<Movie>> {
        let search = MovieSearch::new(term)
            .with_order_key(order_key)
            .with_genre(genre);

        if search.like_pattern().is_none() {
            debug!("event=movies_search module=service status=ok reason=blank_term count=0");
            return Ok(Vec::new());
        }

        let started_at = Instant::now();
        let result = self.repo.search_movies(&search);
        match &result {
            Ok(movies) => info!(
                "event=movies_search module=service status=ok order={} genre_filter={} count={} duration_ms={}",
                search.order.key(),
                search.genre.is_some(),
                movies.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("movies_search", started_at, err),
        }
        result
    }

    /// One movie by id.
    pub fn movie(&self, id: MovieId) -> RepoResult<Movie> {
        let started_at = Instant::now();
        let result = self.repo.get_movie(id);
        match &result {
            Ok(_) => info!(
                "event=movie_get module=service status=ok movie_id={} duration_ms={}",
                id,
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("movie_get", started_at, err),
        }
        result
    }

    /// Every genre, for filter population.
    pub fn genres(&self) -> RepoResult<Vec<Genre>> {
        let started_at = Instant::now();
        let result = self.repo.list_genres();
        log_list_outcome("genres_list", started_at, &result);
        result
    }
}

fn log_list_outcome<T>(event: &str, started_at: Instant, result: &RepoResult<Vec<T>>) {
    match result {
        Ok(items) => info!(
            "event={} module=service status=ok count={} duration_ms={}",
            event,
            items.len(),
            started_at.elapsed().as_millis()
        ),
        Err(err) => log_failure(event, started_at, err),
    }
}

fn log_failure(event: &str, started_at: Instant, err: &RepoError) {
    match err {
        RepoError::NotFound(id) => info!(
            "event={} module=service status=not_found movie_id={} duration_ms={}",
            event,
            id,
            started_at.elapsed().as_millis()
        ),
        RepoError::Store(cause) => error!(
            "event={} module=service status=error duration_ms={} error={}",
            event,
            started_at.elapsed().as_millis(),
            cause
        ),
    }
}
