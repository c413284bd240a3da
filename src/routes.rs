use std::{collections::HashSet, sync::Arc};

use axum::{
    Json,
    extract::{Path, State},
};
use axum_extra::extract::Query;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::{
    AppState, boxoffice,
    catalog::{MOST_LOVED_SUBTREE, MOVIES_SUBTREE},
    entities::movie,
    error::{AppError, AppResult},
    models::{Genre, MovieCreate, MovieView, Page, PageParams},
    query::{self, MovieFilter},
    screening,
};

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// Free-text search against the external catalog only; the local store is
/// not consulted.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<MovieCreate>>> {
    let hits = state.catalog.search(params.q.as_deref(), MOVIES_SUBTREE).await?;
    Ok(Json(hits))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReport {
    pub inserted: Vec<MovieView>,
    pub skipped: Vec<String>,
}

/// Inserts non-duplicate entries and reports the titles that were skipped.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Vec<MovieCreate>>,
) -> AppResult<Json<UploadReport>> {
    for entry in &payload {
        if entry.title.trim().is_empty() {
            return Err(AppError::Validation("title must not be empty".to_string()));
        }
    }

    let mut inserted = Vec::new();
    let mut skipped = Vec::new();
    for entry in &payload {
        if state.store.is_duplicate(entry).await? {
            debug!(title = %entry.title, "skipping duplicate upload entry");
            skipped.push(entry.title.clone());
            continue;
        }
        let row = state.store.insert(entry).await?;
        inserted.push(MovieView::from_model(&row));
    }

    info!(inserted = inserted.len(), skipped = skipped.len(), "processed upload");
    Ok(Json(UploadReport { inserted, skipped }))
}

#[derive(Debug, Deserialize)]
pub struct FilterParams {
    pub openyear: Option<i32>,
    pub endyear: Option<i32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    pub q: Option<String>,
}

pub async fn filter(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FilterParams>,
    Query(page): Query<PageParams>,
) -> AppResult<Json<Page<MovieView>>> {
    let filter = MovieFilter {
        open_year: params.openyear,
        end_year: params.endyear,
        genres: params.genres,
        query: params.q,
    };
    let page = query::filter_movies(&state.store, &state.catalog, &filter, page.window()).await?;
    Ok(Json(page))
}

/// The curated most-loved list. `totalCount`/`isLast` follow the catalog
/// list; the window slice is then matched back to stored rows so returned
/// records carry their assigned ids.
pub async fn most_loved(
    State(state): State<Arc<AppState>>,
    Query(page): Query<PageParams>,
) -> AppResult<Json<Page<MovieView>>> {
    let hits = state.catalog.search(None, MOST_LOVED_SUBTREE).await?;
    let rows = state.store.all().await?;

    let hit_page = Page::from_vec(hits, page.window());
    let mut data = Vec::new();
    for hit in &hit_page.data {
        for row in &rows {
            if query::matches_stored(hit, row) {
                data.push(MovieView::from_model(row));
            }
        }
    }

    Ok(Json(Page { data, is_last: hit_page.is_last, total_count: hit_page.total_count }))
}

pub async fn on_screen(
    State(state): State<Arc<AppState>>,
    Query(page): Query<PageParams>,
) -> AppResult<Json<Page<MovieView>>> {
    let screening_list = load_screening_list(&state).await;
    let rows = state.store.all().await?;
    Ok(Json(page_of_views(screening::on_screen(&rows, &screening_list), page)))
}

pub async fn coming_soon(
    State(state): State<Arc<AppState>>,
    Query(page): Query<PageParams>,
) -> AppResult<Json<Page<MovieView>>> {
    let rows = state.store.all().await?;
    Ok(Json(page_of_views(screening::coming_soon(&rows, screening::today()), page)))
}

pub async fn off_screen(
    State(state): State<Arc<AppState>>,
    Query(page): Query<PageParams>,
) -> AppResult<Json<Page<MovieView>>> {
    let screening_list = load_screening_list(&state).await;
    let rows = state.store.all().await?;
    Ok(Json(page_of_views(
        screening::off_screen(&rows, screening::today(), &screening_list),
        page,
    )))
}

pub async fn detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> AppResult<Json<MovieView>> {
    let row = state.store.find(id).await?.ok_or(AppError::NotFound)?;
    Ok(Json(MovieView::from_model(&row)))
}

pub async fn delete_all(State(state): State<Arc<AppState>>) -> AppResult<Json<Value>> {
    let removed = state.store.delete_all().await?;
    info!(removed = removed, "deleted all movie records");
    Ok(Json(json!({ "message": "All records deleted" })))
}

async fn load_screening_list(state: &AppState) -> HashSet<String> {
    boxoffice::load_screening_titles(&state.config.boxoffice_path).await.into_iter().collect()
}

fn page_of_views(rows: Vec<movie::Model>, params: PageParams) -> Page<MovieView> {
    let page = Page::from_vec(rows, params.window());
    Page {
        data: page.data.iter().map(MovieView::from_model).collect(),
        is_last: page.is_last,
        total_count: page.total_count,
    }
}
