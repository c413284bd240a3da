//! Filtered, sorted, paginated movie queries: open-year range and genre
//! set against the local store, with free-text search delegated to the
//! external catalog and intersected back onto stored rows.

use serde_json::Value;
use tracing::debug;

use crate::{
    catalog::{CatalogClient, MOVIES_SUBTREE},
    entities::movie,
    error::AppResult,
    fields,
    models::{Genre, MovieCreate, MovieView, Page, Window},
    store::MovieStore,
};

#[derive(Clone, Debug, Default)]
pub struct MovieFilter {
    pub open_year: Option<i32>,
    pub end_year: Option<i32>,
    pub genres: Vec<Genre>,
    pub query: Option<String>,
}

pub async fn filter_movies(
    store: &MovieStore,
    catalog: &CatalogClient,
    filter: &MovieFilter,
    window: Window,
) -> AppResult<Page<MovieView>> {
    let rows: Vec<movie::Model> = store
        .released()
        .await?
        .into_iter()
        .filter(|row| year_in_range(&row.open_date, filter.open_year, filter.end_year))
        .filter(|row| genre_matches(&fields::decode_list::<String>(&row.genre), &filter.genres))
        .collect();

    debug!(rows = rows.len(), "filtered stored rows");

    let rows = match filter.query.as_deref().map(str::trim) {
        Some(q) if !q.is_empty() => {
            let hits = catalog.search(Some(q), MOVIES_SUBTREE).await?;
            let matched = intersect_catalog(&hits, &rows);
            debug!(hits = hits.len(), matched = matched.len(), "intersected with catalog");
            matched
        },
        _ => rows,
    };

    let page = Page::from_vec(rows, window);
    Ok(Page {
        data: page.data.iter().map(MovieView::from_model).collect(),
        is_last: page.is_last,
        total_count: page.total_count,
    })
}

/// Year bounds compare the leading `YYYY` of the open date. A row whose
/// year cannot be read is dropped once any bound is present.
fn year_in_range(open_date: &str, open_year: Option<i32>, end_year: Option<i32>) -> bool {
    if open_year.is_none() && end_year.is_none() {
        return true;
    }
    let Some(year) = open_date.get(0..4).and_then(|y| y.parse::<i32>().ok()) else {
        return false;
    };
    open_year.is_none_or(|bound| year >= bound) && end_year.is_none_or(|bound| year <= bound)
}

/// ANY-match semantics; an empty wanted set means no genre filtering.
fn genre_matches(decoded: &[String], wanted: &[Genre]) -> bool {
    wanted.is_empty() || wanted.iter().any(|genre| decoded.iter().any(|g| g == genre.as_str()))
}

/// Replaces the filtered set with its intersection against the catalog
/// hits, in catalog order. A row is emitted once per matching hit; no
/// dedup is applied (preserved behavior of the lineage).
pub fn intersect_catalog(hits: &[MovieCreate], rows: &[movie::Model]) -> Vec<movie::Model> {
    let mut out = Vec::new();
    for hit in hits {
        for row in rows {
            if matches_stored(hit, row) {
                out.push(row.clone());
            }
        }
    }
    out
}

/// A catalog description matches a stored row when the titles agree
/// (ignoring surrounding whitespace) and `synopsis.plotText` is equal on
/// both sides.
pub fn matches_stored(hit: &MovieCreate, row: &movie::Model) -> bool {
    hit.title.trim() == row.title.trim()
        && hit.plot_text().map(str::to_string) == stored_plot_text(row)
}

fn stored_plot_text(row: &movie::Model) -> Option<String> {
    fields::decode_dict(&row.synopsis)
        .get("plotText")
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(id: i32, title: &str, open_date: &str, genres: &[&str], plot: &str) -> movie::Model {
        movie::Model {
            id,
            title: title.to_string(),
            title_eng: String::new(),
            open_date: open_date.to_string(),
            running_time_minute: "120".to_string(),
            genre: serde_json::to_string(genres).unwrap(),
            synopsis: json!({ "plotText": plot }).to_string(),
            actors: String::new(),
            directors: String::new(),
            producer: String::new(),
            distributor: String::new(),
            keywords: String::new(),
            poster_url: String::new(),
            vod_url: String::new(),
        }
    }

    fn hit(title: &str, plot: &str) -> MovieCreate {
        let raw = json!({ "title": title, "synopsis": { "plotText": plot } });
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn year_bounds_compare_leading_four_characters() {
        assert!(!year_in_range("2019.12.31", Some(2020), Some(2021)));
        assert!(year_in_range("2020.06.15", Some(2020), Some(2021)));
        assert!(year_in_range("2021.12.31", Some(2020), Some(2021)));
        assert!(!year_in_range("2022.01.01", Some(2020), Some(2021)));
    }

    #[test]
    fn single_sided_year_bounds() {
        assert!(year_in_range("2020.06.15", Some(2020), None));
        assert!(!year_in_range("2019.06.15", Some(2020), None));
        assert!(year_in_range("1999.01.01", None, Some(2000)));
        assert!(!year_in_range("2001.01.01", None, Some(2000)));
    }

    #[test]
    fn unreadable_year_is_dropped_only_under_a_bound() {
        assert!(!year_in_range("soon", Some(2020), None));
        assert!(year_in_range("soon", None, None));
    }

    #[test]
    fn genre_set_intersects_with_any_semantics() {
        let decoded = vec!["드라마".to_string(), "로맨스".to_string()];
        assert!(genre_matches(&decoded, &[Genre::Comedy, Genre::Drama]));
        assert!(!genre_matches(&decoded, &[Genre::Horror, Genre::Crime]));
    }

    #[test]
    fn empty_genre_set_means_no_filter() {
        assert!(genre_matches(&["액션".to_string()], &[]));
        assert!(genre_matches(&[], &[]));
    }

    #[test]
    fn intersection_follows_catalog_order() {
        let rows = vec![
            row(1, "기생충", "2019.05.30", &["드라마"], "반지하 가족"),
            row(2, "올드보이", "2003.11.21", &["스릴러"], "15년의 감금"),
        ];
        let hits = vec![hit("올드보이", "15년의 감금"), hit("기생충", "반지하 가족")];

        let matched = intersect_catalog(&hits, &rows);
        let ids: Vec<i32> = matched.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn plot_text_must_match_exactly() {
        let rows = vec![row(1, "기생충", "2019.05.30", &["드라마"], "반지하 가족")];
        assert!(intersect_catalog(&[hit("기생충", "다른 줄거리")], &rows).is_empty());
        assert!(intersect_catalog(&[hit("기생충", "반지하 가족")], &rows).len() == 1);
    }

    #[test]
    fn titles_match_ignoring_surrounding_whitespace() {
        let rows = vec![row(1, "기생충", "2019.05.30", &["드라마"], "반지하 가족")];
        assert_eq!(intersect_catalog(&[hit(" 기생충 ", "반지하 가족")], &rows).len(), 1);
    }

    #[test]
    fn a_row_repeats_once_per_matching_hit() {
        let rows = vec![row(1, "기생충", "2019.05.30", &["드라마"], "반지하 가족")];
        let hits = vec![hit("기생충", "반지하 가족"), hit("기생충", "반지하 가족")];
        assert_eq!(intersect_catalog(&hits, &rows).len(), 2);
    }

    #[test]
    fn no_matches_yields_empty_not_error() {
        let rows: Vec<movie::Model> = Vec::new();
        assert!(intersect_catalog(&[hit("기생충", "반지하 가족")], &rows).is_empty());
    }
}
