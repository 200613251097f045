//! Sort order allow-list for title search.
//!
//! # Invariants
//! - Only the fragments returned by [`SearchOrder::order_by_sql`] ever reach
//!   an `ORDER BY` clause; caller text is never interpolated.
//! - Every ordering ends with `id ASC` so equal keys sort deterministically.
//! - Unknown or empty keys resolve to [`SearchOrder::RatingDesc`].

/// Recognized search sort orders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SearchOrder {
    /// Highest rating first.
    #[default]
    RatingDesc,
    /// Alphabetical by case-folded title.
    TitleAsc,
    /// Newest release first.
    YearDesc,
}

impl SearchOrder {
    pub const ALL: [SearchOrder; 3] = [Self::RatingDesc, Self::TitleAsc, Self::YearDesc];

    /// Parses a recognized order key.
    ///
    /// Matching trims whitespace and ignores ASCII case. Returns `None` for
    /// anything outside the allow-list.
    pub fn parse(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::ALL
            .into_iter()
            .find(|order| order.key().eq_ignore_ascii_case(key))
    }

    /// Resolves a caller key, falling back to the default order.
    pub fn from_key(key: &str) -> Self {
        Self::parse(key).unwrap_or_default()
    }

    /// Stable external key for this order.
    pub fn key(self) -> &'static str {
        match self {
            Self::RatingDesc => "rating_desc",
            Self::TitleAsc => "title_asc",
            Self::YearDesc => "year_desc",
        }
    }

    /// `ORDER BY` body over the `m` alias of the `movies` table.
    pub(crate) fn order_by_sql(self) -> &'static str {
        match self {
            Self::RatingDesc => "m.rating DESC, m.id ASC",
            Self::TitleAsc => "fold(m.title) ASC, m.id ASC",
            Self::YearDesc => "m.release_year DESC, m.id ASC",
        }
    }
}
