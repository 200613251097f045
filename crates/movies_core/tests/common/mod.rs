#![allow(dead_code)]

use movies_core::db::open_db;
use movies_core::{CatalogLimits, ConnectionPool, PoolConfig, SqliteMovieRepository};
use rusqlite::{params, Connection};
use std::sync::Arc;
use tempfile::TempDir;

/// On-disk catalog with a writable seeding connection next to the pool.
pub struct Catalog {
    pub writer: Connection,
    pub pool: Arc<ConnectionPool>,
    _dir: TempDir,
}

impl Catalog {
    pub fn repository(&self) -> SqliteMovieRepository {
        self.repository_with(CatalogLimits::default())
    }

    pub fn repository_with(&self, limits: CatalogLimits) -> SqliteMovieRepository {
        SqliteMovieRepository::new(Arc::clone(&self.pool), limits)
    }

    pub fn genre(&self, id: i64, name: &str) {
        self.writer
            .execute(
                "INSERT INTO genres (id, name) VALUES (?1, ?2);",
                params![id, name],
            )
            .unwrap();
    }

    pub fn movie(&self, id: i64, title: &str, year: i32, rating: f64, genres: &[i64]) {
        self.writer
            .execute(
                "INSERT INTO movies (id, title, release_year, rating) VALUES (?1, ?2, ?3, ?4);",
                params![id, title, year, rating],
            )
            .unwrap();
        for genre_id in genres {
            self.writer
                .execute(
                    "INSERT INTO movie_genres (movie_id, genre_id) VALUES (?1, ?2);",
                    params![id, genre_id],
                )
                .unwrap();
        }
    }
}

pub fn empty_catalog() -> Catalog {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("movies.db");
    let writer = open_db(&path).unwrap();
    let pool = ConnectionPool::open(&path, &PoolConfig::default()).unwrap();

    Catalog {
        writer,
        pool: Arc::new(pool),
        _dir: dir,
    }
}

pub const SCI_FI: i64 = 1;
pub const ANIMATION: i64 = 2;
pub const DRAMA: i64 = 3;

/// Catalog used by most query tests.
///
/// | id | title            | year | rating | genres            |
/// |----|------------------|------|--------|-------------------|
/// | 1  | Inception        | 2010 | 8.8    | Sci-Fi            |
/// | 2  | Incredibles      | 2004 | 7.5    | Animation         |
/// | 3  | Interstellar     | 2014 | 8.6    | Sci-Fi, Drama     |
/// | 4  | The Prestige     | 2006 | 8.5    | Drama             |
/// | 5  | Inside Out       | 2015 | 8.1    | Animation, Drama  |
/// | 6  | Memento          | 2000 | 8.5    | (none)            |
pub fn seeded_catalog() -> Catalog {
    let catalog = empty_catalog();
    catalog.genre(SCI_FI, "Sci-Fi");
    catalog.genre(ANIMATION, "Animation");
    catalog.genre(DRAMA, "Drama");

    catalog.movie(1, "Inception", 2010, 8.8, &[SCI_FI]);
    catalog.movie(2, "Incredibles", 2004, 7.5, &[ANIMATION]);
    catalog.movie(3, "Interstellar", 2014, 8.6, &[DRAMA, SCI_FI]);
    catalog.movie(4, "The Prestige", 2006, 8.5, &[DRAMA]);
    catalog.movie(5, "Inside Out", 2015, 8.1, &[ANIMATION, DRAMA]);
    catalog.movie(6, "Memento", 2000, 8.5, &[]);
    catalog
}

pub fn ids<'a>(movies: impl IntoIterator<Item = &'a movies_core::Movie>) -> Vec<i64> {
    movies.into_iter().map(|movie| movie.id).collect()
}
