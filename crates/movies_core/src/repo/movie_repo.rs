//! Movie query repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Translate each catalog query into one parameterized SQL read.
//! - Map rows to `Movie`/`Genre` records, genres loaded in batches.
//! - Classify every outcome as success, `NotFound` or a store failure.
//!
//! # Invariants
//! - Caller values are always bound; only allow-listed fragments are
//!   appended to SQL text.
//! - List orderings always end with `id ASC`.
//! - Read paths reject invalid persisted state instead of masking it.
//! - No operation returns a partial value alongside an error.

use crate::db::{ConnectionPool, DbError};
use crate::model::movie::{Genre, Movie, MovieId, MovieValidationError};
use crate::search::order::SearchOrder;
use crate::search::query::MovieSearch;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Params, Row};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

const MOVIE_SELECT_SQL: &str = "SELECT
    m.id,
    m.title,
    m.tagline,
    m.release_year,
    m.overview,
    m.rating,
    m.popularity,
    m.language,
    m.poster_url,
    m.trailer_url
FROM movies m";

const DEFAULT_TOP_MOVIES: u32 = 10;
const DEFAULT_RANDOM_MOVIES: u32 = 10;

/// Upper bound of bound ids per genre lookup statement.
const GENRE_BATCH_SIZE: usize = 500;

pub type RepoResult<T> = Result<T, RepoError>;

/// Outcome of a failed repository operation.
#[derive(Debug)]
pub enum RepoError {
    /// Single-entity lookup found no row. Never produced by list queries.
    NotFound(MovieId),
    /// Any failure of the underlying store.
    Store(StoreError),
}

/// Store-level failure with its original cause.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "movie not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted movie data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Store(StoreError::Db(value))
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Store(StoreError::Db(DbError::Sqlite(value)))
    }
}

/// Fixed result sizes for the non-search listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogLimits {
    /// Maximum length of the top-rated list.
    pub top_movies: u32,
    /// Sample size of the random list.
    pub random_movies: u32,
}

impl Default for CatalogLimits {
    fn default() -> Self {
        Self {
            top_movies: DEFAULT_TOP_MOVIES,
            random_movies: DEFAULT_RANDOM_MOVIES,
        }
    }
}

/// Read-only catalog queries.
pub trait MovieRepository: Send + Sync {
    /// Movies by rating descending, ties by id ascending, bounded by
    /// `CatalogLimits::top_movies`.
    fn top_movies(&self) -> RepoResult<Vec<Movie>>;
    /// Up to `CatalogLimits::random_movies` distinct movies in random order.
    fn random_movies(&self) -> RepoResult<Vec<Movie>>;
    /// Title search; a blank term yields an empty list.
    fn search_movies(&self, search: &MovieSearch) -> RepoResult<Vec<Movie>>;
    /// One movie, or `RepoError::NotFound`.
    fn get_movie(&self, id: MovieId) -> RepoResult<Movie>;
    /// All genres by id ascending.
    fn list_genres(&self) -> RepoResult<Vec<Genre>>;
}

/// SQLite-backed movie repository over a shared connection pool.
#[derive(Clone)]
pub struct SqliteMovieRepository {
    pool: Arc<ConnectionPool>,
    limits: CatalogLimits,
}

impl SqliteMovieRepository {
    pub fn new(pool: Arc<ConnectionPool>, limits: CatalogLimits) -> Self {
        Self { pool, limits }
    }
}

impl MovieRepository for SqliteMovieRepository {
    fn top_movies(&self) -> RepoResult<Vec<Movie>> {
        if self.limits.top_movies == 0 {
            return Ok(Vec::new());
        }

        let sql = format!(
            "{MOVIE_SELECT_SQL} ORDER BY {} LIMIT ?1;",
            SearchOrder::RatingDesc.order_by_sql()
        );
        self.pool.with_connection(|conn| {
            query_movies(conn, &sql, [i64::from(self.limits.top_movies)])
        })
    }

    fn random_movies(&self) -> RepoResult<Vec<Movie>> {
        if self.limits.random_movies == 0 {
            return Ok(Vec::new());
        }

        // SQLite keeps only LIMIT rows in its sorter, so the catalog is never
        // materialized in memory.
        let sql = format!("{MOVIE_SELECT_SQL} ORDER BY RANDOM() LIMIT ?1;");
        self.pool.with_connection(|conn| {
            query_movies(conn, &sql, [i64::from(self.limits.random_movies)])
        })
    }

    fn search_movies(&self, search: &MovieSearch) -> RepoResult<Vec<Movie>> {
        let Some(pattern) = search.like_pattern() else {
            return Ok(Vec::new());
        };

        let mut sql = format!("{MOVIE_SELECT_SQL} WHERE fold(m.title) LIKE ? ESCAPE '\\'");
        let mut bind_values: Vec<Value> = vec![Value::Text(pattern)];

        if let Some(genre_id) = search.genre {
            sql.push_str(
                " AND EXISTS (
                    SELECT 1
                    FROM movie_genres mg
                    WHERE mg.movie_id = m.id
                      AND mg.genre_id = ?
                )",
            );
            bind_values.push(Value::Integer(genre_id));
        }

        sql.push_str(" ORDER BY ");
        sql.push_str(search.order.order_by_sql());
        sql.push(';');

        self.pool
            .with_connection(|conn| query_movies(conn, &sql, params_from_iter(bind_values)))
    }

    fn get_movie(&self, id: MovieId) -> RepoResult<Movie> {
        let sql = format!("{MOVIE_SELECT_SQL} WHERE m.id = ?1;");
        let mut movies = self
            .pool
            .with_connection(|conn| query_movies(conn, &sql, [id]))?;

        match movies.pop() {
            Some(movie) if movies.is_empty() => Ok(movie),
            Some(_) => Err(StoreError::InvalidData(format!(
                "duplicate rows for movies.id = {id}"
            ))
            .into()),
            None => Err(RepoError::NotFound(id)),
        }
    }

    fn list_genres(&self) -> RepoResult<Vec<Genre>> {
        self.pool.with_connection(|conn| -> RepoResult<Vec<Genre>> {
            let mut stmt = conn.prepare("SELECT id, name FROM genres ORDER BY id ASC;")?;
            let mut rows = stmt.query([])?;
            let mut genres = Vec::new();
            while let Some(row) = rows.next()? {
                genres.push(Genre {
                    id: row.get("id")?,
                    name: row.get("name")?,
                });
            }
            Ok(genres)
        })
    }
}

fn query_movies<P: Params>(conn: &Connection, sql: &str, params: P) -> RepoResult<Vec<Movie>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    let mut movies = Vec::new();

    while let Some(row) = rows.next()? {
        movies.push(parse_movie_row(row)?);
    }

    attach_genres(conn, &mut movies)?;
    Ok(movies)
}

fn parse_movie_row(row: &Row<'_>) -> RepoResult<Movie> {
    let movie = Movie {
        id: row.get("id")?,
        title: row.get("title")?,
        tagline: row.get("tagline")?,
        release_year: row.get("release_year")?,
        overview: row.get("overview")?,
        rating: row.get("rating")?,
        popularity: row.get("popularity")?,
        language: row.get("language")?,
        poster_url: row.get("poster_url")?,
        trailer_url: row.get("trailer_url")?,
        genres: Vec::new(),
    };
    movie
        .validate()
        .map_err(|err| invalid_movie(movie.id, &err))?;
    Ok(movie)
}

fn invalid_movie(id: MovieId, err: &MovieValidationError) -> RepoError {
    StoreError::InvalidData(format!("movie {id}: {err}")).into()
}

fn attach_genres(conn: &Connection, movies: &mut [Movie]) -> RepoResult<()> {
    if movies.is_empty() {
        return Ok(());
    }

    let ids = movies.iter().map(|movie| movie.id).collect::<Vec<_>>();
    let mut by_movie: HashMap<MovieId, Vec<Genre>> = HashMap::with_capacity(ids.len());

    for chunk in ids.chunks(GENRE_BATCH_SIZE) {
        let placeholders = vec!["?"; chunk.len()].join(", ");
        let mut stmt = conn.prepare(&format!(
            "SELECT mg.movie_id, g.id, g.name
             FROM movie_genres mg
             INNER JOIN genres g ON g.id = mg.genre_id
             WHERE mg.movie_id IN ({placeholders})
             ORDER BY mg.movie_id ASC, g.id ASC;"
        ))?;
        let mut rows = stmt.query(params_from_iter(chunk.iter()))?;
        while let Some(row) = rows.next()? {
            let movie_id: MovieId = row.get(0)?;
            by_movie.entry(movie_id).or_default().push(Genre {
                id: row.get(1)?,
                name: row.get(2)?,
            });
        }
    }

    for movie in movies.iter_mut() {
        movie.genres = by_movie.remove(&movie.id).unwrap_or_default();
    }

    Ok(())
}
