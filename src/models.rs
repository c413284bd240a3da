use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{entities::movie, fields};

/// Default number of records per page.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Upper bound on `per_page` / `limit`.
pub const MAX_PAGE_SIZE: u64 = 100;

/// The closed set of genre tags. Query parameters outside this set are
/// rejected at the boundary.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Genre {
    #[serde(rename = "액션")]
    Action,
    #[serde(rename = "드라마")]
    Drama,
    #[serde(rename = "코미디")]
    Comedy,
    #[serde(rename = "스릴러")]
    Thriller,
    #[serde(rename = "SF/판타지")]
    Fantasy,
    #[serde(rename = "로맨스")]
    Romance,
    #[serde(rename = "어드벤처")]
    Adventure,
    #[serde(rename = "공포")]
    Horror,
    #[serde(rename = "범죄")]
    Crime,
    #[serde(rename = "애니메이션")]
    Animation,
}

impl Genre {
    pub fn as_str(self) -> &'static str {
        match self {
            Genre::Action => "액션",
            Genre::Drama => "드라마",
            Genre::Comedy => "코미디",
            Genre::Thriller => "스릴러",
            Genre::Fantasy => "SF/판타지",
            Genre::Romance => "로맨스",
            Genre::Adventure => "어드벤처",
            Genre::Horror => "공포",
            Genre::Crime => "범죄",
            Genre::Animation => "애니메이션",
        }
    }
}

/// Incoming movie payload: one upload entry, and also the decoded shape of
/// a catalog item's `description`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieCreate {
    pub title: String,
    #[serde(default)]
    pub title_eng: String,
    #[serde(default)]
    pub open_date: String,
    #[serde(default)]
    pub running_time_minute: String,
    #[serde(default)]
    pub genre: Vec<String>,
    #[serde(default)]
    pub synopsis: Map<String, Value>,
    #[serde(default)]
    pub actors: Vec<String>,
    #[serde(default)]
    pub directors: Vec<String>,
    #[serde(default)]
    pub producer: Vec<String>,
    #[serde(default)]
    pub distributor: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub poster_url: Vec<String>,
    #[serde(default)]
    pub vod_url: Vec<Vec<String>>,
}

impl MovieCreate {
    pub fn plot_text(&self) -> Option<&str> {
        self.synopsis.get("plotText").and_then(Value::as_str)
    }
}

/// Outgoing movie record: a stored row with every multi-value and mapping
/// field decoded. Callers never see raw JSON-text columns.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieView {
    pub id: i32,
    pub title: String,
    pub title_eng: String,
    pub open_date: String,
    pub running_time_minute: String,
    pub genre: Vec<String>,
    pub synopsis: Map<String, Value>,
    pub actors: Vec<String>,
    pub directors: Vec<String>,
    pub producer: Vec<String>,
    pub distributor: Vec<String>,
    pub keywords: Vec<String>,
    pub poster_url: Vec<String>,
    pub vod_url: Vec<Vec<String>>,
}

impl MovieView {
    pub fn from_model(row: &movie::Model) -> Self {
        Self {
            id: row.id,
            title: row.title.clone(),
            title_eng: row.title_eng.clone(),
            open_date: row.open_date.clone(),
            running_time_minute: row.running_time_minute.clone(),
            genre: fields::decode_list(&row.genre),
            synopsis: fields::decode_dict(&row.synopsis),
            actors: fields::decode_list(&row.actors),
            directors: fields::decode_list(&row.directors),
            producer: fields::decode_list(&row.producer),
            distributor: fields::decode_list(&row.distributor),
            keywords: fields::decode_list(&row.keywords),
            poster_url: fields::decode_list(&row.poster_url),
            vod_url: fields::decode_list(&row.vod_url),
        }
    }
}

/// Pagination query parameters. `page`/`per_page` is the primary form;
/// `offset`/`limit` is accepted for older clients. `page` wins when both
/// are present.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

impl PageParams {
    pub fn window(self) -> Window {
        let per_page =
            self.per_page.or(self.limit).unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let start = match (self.page, self.offset) {
            (Some(page), _) => (page.max(1) - 1) * per_page,
            (None, Some(offset)) => offset,
            (None, None) => 0,
        };
        Window { start: start as usize, end: (start + per_page) as usize }
    }
}

/// The page-sized slice `[start, end)` of a result set.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Window {
    pub start: usize,
    pub end: usize,
}

/// Response envelope for paginated endpoints.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub is_last: bool,
    pub total_count: usize,
}

impl<T> Page<T> {
    /// Windows the full result set; `total_count` and `is_last` are
    /// computed against the unwindowed length.
    pub fn from_vec(items: Vec<T>, window: Window) -> Self {
        let total_count = items.len();
        let is_last = window.end >= total_count;
        let data = items
            .into_iter()
            .skip(window.start)
            .take(window.end.saturating_sub(window.start))
            .collect();
        Self { data, is_last, total_count }
    }
}
