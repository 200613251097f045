//! Title search request and `LIKE` pattern building.

use crate::model::movie::GenreId;
use crate::search::order::SearchOrder;

const LIKE_ESCAPE: char = '\\';

/// One title search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieSearch {
    /// Free text matched as a substring of the title.
    pub term: String,
    pub order: SearchOrder,
    /// `None` searches every genre.
    pub genre: Option<GenreId>,
}

impl MovieSearch {
    /// Creates a search with the default order and no genre filter.
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            order: SearchOrder::default(),
            genre: None,
        }
    }

    /// Sets the order from a caller-supplied key (allow-list resolved).
    pub fn with_order_key(mut self, key: &str) -> Self {
        self.order = SearchOrder::from_key(key);
        self
    }

    pub fn with_order(mut self, order: SearchOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_genre(mut self, genre: Option<GenreId>) -> Self {
        self.genre = genre;
        self
    }

    /// Returns the `LIKE` pattern for this search, or `None` for a blank term.
    ///
    /// Blank terms never widen into "list everything". A non-blank term is
    /// matched as given, surrounding whitespace included. The pattern is case
    /// folded and must be compared against `fold(title)`.
    pub fn like_pattern(&self) -> Option<String> {
        if self.term.trim().is_empty() {
            return None;
        }
        Some(format!("%{}%", escape_like(&fold_case(&self.term))))
    }
}

/// Unicode lowercase used on both sides of title matching and sorting.
///
/// Registered on every connection as the SQL function `fold`.
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// Escapes `LIKE` metacharacters so `term` matches literally.
///
/// The result must be used with `ESCAPE '\'`.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(ch);
    }
    escaped
}
