mod common;

use common::{empty_catalog, ids, seeded_catalog, ANIMATION, DRAMA, SCI_FI};
use movies_core::{MovieRepository, MovieSearch, SearchOrder};
use std::collections::HashSet;

fn search(term: &str, order: &str, genre: Option<i64>) -> MovieSearch {
    MovieSearch::new(term)
        .with_order_key(order)
        .with_genre(genre)
}

#[test]
fn inc_scenario_orders_by_rating_and_filters_by_genre() {
    let catalog = empty_catalog();
    catalog.genre(SCI_FI, "Sci-Fi");
    catalog.genre(ANIMATION, "Animation");
    catalog.movie(1, "Inception", 2010, 8.8, &[SCI_FI]);
    catalog.movie(2, "Incredibles", 2004, 7.5, &[ANIMATION]);
    let repo = catalog.repository();

    let all = repo.search_movies(&search("inc", "rating_desc", None)).unwrap();
    assert_eq!(ids(&all), vec![1, 2]);

    let animated = repo
        .search_movies(&search("inc", "rating_desc", Some(ANIMATION)))
        .unwrap();
    assert_eq!(ids(&animated), vec![2]);
}

#[test]
fn empty_term_always_returns_empty_list() {
    let catalog = seeded_catalog();
    let repo = catalog.repository();

    for order in ["", "rating_desc", "title_asc", "year_desc", "bogus"] {
        for genre in [None, Some(SCI_FI), Some(404)] {
            assert!(repo.search_movies(&search("", order, genre)).unwrap().is_empty());
            assert!(repo.search_movies(&search("  ", order, genre)).unwrap().is_empty());
        }
    }
}

#[test]
fn matching_is_case_insensitive_substring() {
    let catalog = seeded_catalog();
    let repo = catalog.repository();

    let upper = repo.search_movies(&search("STELL", "", None)).unwrap();
    assert_eq!(ids(&upper), vec![3]);

    let middle = repo.search_movies(&search("prest", "", None)).unwrap();
    assert_eq!(ids(&middle), vec![4]);

    let results = repo.search_movies(&search("in", "", None)).unwrap();
    for movie in &results {
        assert!(movie.title.to_lowercase().contains("in"));
    }
    // Inception, Interstellar, Inside Out, Incredibles; Memento has no "in".
    assert_eq!(ids(&results), vec![1, 3, 5, 2]);
}

#[test]
fn matching_folds_non_ascii_case() {
    let catalog = empty_catalog();
    catalog.movie(1, "Amélie", 2001, 8.3, &[]);
    catalog.movie(2, "Ёлки", 2010, 6.6, &[]);
    catalog.movie(3, "Amelie Returns", 2003, 5.0, &[]);
    let repo = catalog.repository();

    let accented = repo.search_movies(&search("AMÉLIE", "", None)).unwrap();
    assert_eq!(ids(&accented), vec![1]);

    let cyrillic = repo.search_movies(&search("ёлки", "", None)).unwrap();
    assert_eq!(ids(&cyrillic), vec![2]);

    let upper_cyrillic = repo.search_movies(&search("ЁЛ", "", None)).unwrap();
    assert_eq!(ids(&upper_cyrillic), vec![2]);
}

#[test]
fn title_order_folds_non_ascii_case() {
    let catalog = empty_catalog();
    catalog.movie(1, "Élan", 2001, 5.0, &[]);
    catalog.movie(2, "éclair", 2002, 5.0, &[]);
    let repo = catalog.repository();

    // Folded, "éclair" sorts before "élan"; unfolded, "É" sorts before "é".
    let ordered = repo.search_movies(&search("l", "title_asc", None)).unwrap();
    assert_eq!(ids(&ordered), vec![2, 1]);
}

#[test]
fn surrounding_spaces_in_term_are_matched_literally() {
    let catalog = seeded_catalog();
    let repo = catalog.repository();

    let leading = repo.search_movies(&search(" Out", "", None)).unwrap();
    assert_eq!(ids(&leading), vec![5]);

    let trailing = repo.search_movies(&search("inc ", "", None)).unwrap();
    assert!(trailing.is_empty());
}

#[test]
fn title_and_year_orders_are_applied() {
    let catalog = seeded_catalog();
    let repo = catalog.repository();

    let by_title = repo.search_movies(&search("in", "title_asc", None)).unwrap();
    let titles: Vec<_> = by_title.iter().map(|movie| movie.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["Inception", "Incredibles", "Inside Out", "Interstellar"]
    );

    let by_year = repo.search_movies(&search("in", "year_desc", None)).unwrap();
    assert_eq!(ids(&by_year), vec![5, 3, 1, 2]);
}

#[test]
fn unknown_order_key_falls_back_to_rating() {
    let catalog = seeded_catalog();
    let repo = catalog.repository();

    let fallback = repo
        .search_movies(&search("in", "title; DROP TABLE movies", None))
        .unwrap();
    let rating = repo
        .search_movies(&MovieSearch::new("in").with_order(SearchOrder::RatingDesc))
        .unwrap();
    assert_eq!(ids(&fallback), ids(&rating));
    assert_eq!(repo.top_movies().unwrap().len(), 6);
}

#[test]
fn rating_ties_in_search_break_by_id() {
    let catalog = seeded_catalog();
    let repo = catalog.repository();

    // The Prestige (4) and Memento (6) both rate 8.5.
    let tied = repo.search_movies(&search("e", "rating_desc", None)).unwrap();
    let position = |id| tied.iter().position(|movie| movie.id == id).unwrap();
    assert!(position(4) < position(6));
}

#[test]
fn genre_filter_keeps_only_tagged_movies() {
    let catalog = seeded_catalog();
    let repo = catalog.repository();

    let drama = repo.search_movies(&search("in", "", Some(DRAMA))).unwrap();
    assert_eq!(ids(&drama), vec![3, 5]);
    assert!(drama
        .iter()
        .all(|movie| movie.genres.iter().any(|genre| genre.id == DRAMA)));
    // Genre display data is the full set, not only the filtered genre.
    assert_eq!(drama[0].genres.len(), 2);

    let unknown = repo.search_movies(&search("in", "", Some(404))).unwrap();
    assert!(unknown.is_empty());
}

#[test]
fn removing_constraints_never_shrinks_results() {
    let catalog = seeded_catalog();
    let repo = catalog.repository();

    for term in ["in", "inc", "e", "the", "out"] {
        let unfiltered: HashSet<_> = ids(&repo.search_movies(&search(term, "", None)).unwrap())
            .into_iter()
            .collect();
        for genre in [SCI_FI, ANIMATION, DRAMA] {
            let filtered: HashSet<_> =
                ids(&repo.search_movies(&search(term, "", Some(genre))).unwrap())
                    .into_iter()
                    .collect();
            assert!(filtered.is_subset(&unfiltered), "term={term} genre={genre}");
        }
    }

    let narrow: HashSet<_> = ids(&repo.search_movies(&search("ince", "", None)).unwrap())
        .into_iter()
        .collect();
    let wide: HashSet<_> = ids(&repo.search_movies(&search("inc", "", None)).unwrap())
        .into_iter()
        .collect();
    assert!(narrow.is_subset(&wide));
}

#[test]
fn like_wildcards_in_term_match_literally() {
    let catalog = empty_catalog();
    catalog.movie(1, "100% Wolf", 2020, 5.5, &[]);
    catalog.movie(2, "1000 Ways", 2011, 4.0, &[]);
    catalog.movie(3, "Snake_Eyes", 1998, 6.0, &[]);
    catalog.movie(4, "Snake Eyes", 1998, 6.0, &[]);
    let repo = catalog.repository();

    let percent = repo.search_movies(&search("100%", "", None)).unwrap();
    assert_eq!(ids(&percent), vec![1]);

    let underscore = repo.search_movies(&search("e_e", "", None)).unwrap();
    assert_eq!(ids(&underscore), vec![3]);

    let backslash = repo.search_movies(&search("\\", "", None)).unwrap();
    assert!(backslash.is_empty());
}

#[test]
fn hostile_term_is_bound_not_executed() {
    let catalog = seeded_catalog();
    let repo = catalog.repository();

    let hits = repo
        .search_movies(&search("'; DROP TABLE movies; --", "", None))
        .unwrap();
    assert!(hits.is_empty());
    assert_eq!(repo.top_movies().unwrap().len(), 6);
}
