//! Core query layer for the movie catalog.
//! This crate owns the schema, the connection pool and every catalog query.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use db::{ConnectionPool, DbError, DbResult, PoolConfig};
pub use logging::{default_log_level, init_logging, init_stderr_logging, logging_status, LogSink};
pub use model::movie::{Genre, GenreId, Movie, MovieId, MovieValidationError};
pub use repo::movie_repo::{
    CatalogLimits, MovieRepository, RepoError, RepoResult, SqliteMovieRepository, StoreError,
};
pub use search::order::SearchOrder;
pub use search::query::MovieSearch;
pub use service::catalog_service::CatalogService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
