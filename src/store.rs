use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};

use crate::{entities::movie, error::AppResult, fields, models::MovieCreate};

#[derive(Clone)]
pub struct MovieStore {
    db: DatabaseConnection,
}

impl MovieStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Legacy duplicate policy, reproduced as documented: each of the four
    /// fields is probed against the whole table independently, so four hits
    /// on four different rows still count as a duplicate. Not atomic with
    /// the subsequent insert.
    pub async fn is_duplicate(&self, candidate: &MovieCreate) -> AppResult<bool> {
        let title = movie::Entity::find()
            .filter(movie::Column::Title.eq(candidate.title.as_str()))
            .one(&self.db)
            .await?;
        let title_eng = movie::Entity::find()
            .filter(movie::Column::TitleEng.eq(candidate.title_eng.as_str()))
            .one(&self.db)
            .await?;
        let running_time = movie::Entity::find()
            .filter(movie::Column::RunningTimeMinute.eq(candidate.running_time_minute.as_str()))
            .one(&self.db)
            .await?;
        let open_date = movie::Entity::find()
            .filter(movie::Column::OpenDate.eq(candidate.open_date.as_str()))
            .one(&self.db)
            .await?;

        Ok(title.is_some()
            && title_eng.is_some()
            && running_time.is_some()
            && open_date.is_some())
    }

    pub async fn insert(&self, data: &MovieCreate) -> AppResult<movie::Model> {
        let row = movie::ActiveModel {
            id: Default::default(),
            title: Set(data.title.clone()),
            title_eng: Set(data.title_eng.clone()),
            open_date: Set(data.open_date.clone()),
            running_time_minute: Set(data.running_time_minute.clone()),
            genre: Set(fields::encode_list("", &data.genre)?),
            synopsis: Set(fields::encode_dict("", &data.synopsis)?),
            actors: Set(fields::encode_list("", &data.actors)?),
            directors: Set(fields::encode_list("", &data.directors)?),
            producer: Set(fields::encode_list("", &data.producer)?),
            distributor: Set(fields::encode_list("", &data.distributor)?),
            keywords: Set(fields::encode_list("", &data.keywords)?),
            poster_url: Set(fields::encode_list("", &data.poster_url)?),
            vod_url: Set(fields::encode_list("", &data.vod_url)?),
        };
        Ok(row.insert(&self.db).await?)
    }

    pub async fn find(&self, id: i32) -> AppResult<Option<movie::Model>> {
        Ok(movie::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn all(&self) -> AppResult<Vec<movie::Model>> {
        Ok(movie::Entity::find().all(&self.db).await?)
    }

    /// Rows with a known open date, newest first. The date format is
    /// fixed-width and zero-padded, so string order is date order.
    pub async fn released(&self) -> AppResult<Vec<movie::Model>> {
        Ok(movie::Entity::find()
            .filter(movie::Column::OpenDate.ne(""))
            .order_by_desc(movie::Column::OpenDate)
            .all(&self.db)
            .await?)
    }

    pub async fn delete_all(&self) -> AppResult<u64> {
        let result = movie::Entity::delete_many().exec(&self.db).await?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db, models::MovieView};
    use serde_json::json;

    async fn memory_store() -> MovieStore {
        // A pooled in-memory SQLite is per-connection; one connection keeps
        // every statement on the same database.
        let mut options = sea_orm::ConnectOptions::new("sqlite::memory:");
        options.max_connections(1);
        let db = db::connect_and_migrate(options).await.unwrap();
        MovieStore::new(db)
    }

    fn sample(title: &str, title_eng: &str, running_time: &str, open_date: &str) -> MovieCreate {
        let mut synopsis = serde_json::Map::new();
        synopsis.insert("plotText".to_string(), json!(format!("{title} plot")));
        MovieCreate {
            title: title.to_string(),
            title_eng: title_eng.to_string(),
            open_date: open_date.to_string(),
            running_time_minute: running_time.to_string(),
            genre: vec!["드라마".to_string()],
            synopsis,
            actors: vec!["배우".to_string()],
            directors: vec!["감독".to_string()],
            producer: vec![],
            distributor: vec![],
            keywords: vec![],
            poster_url: vec![],
            vod_url: vec![vec!["vod".to_string(), "https://example.com".to_string()]],
        }
    }

    #[tokio::test]
    async fn insert_assigns_id_and_encodes_fields() {
        let store = memory_store().await;
        let row = store.insert(&sample("기생충", "Parasite", "131", "2019.05.30")).await.unwrap();
        assert!(row.id > 0);

        let view = MovieView::from_model(&row);
        assert_eq!(view.genre, vec!["드라마"]);
        assert_eq!(view.synopsis.get("plotText"), Some(&json!("기생충 plot")));
        assert_eq!(view.vod_url, vec![vec!["vod", "https://example.com"]]);
    }

    #[tokio::test]
    async fn identical_four_fields_count_as_duplicate() {
        let store = memory_store().await;
        let movie = sample("기생충", "Parasite", "131", "2019.05.30");
        store.insert(&movie).await.unwrap();
        assert!(store.is_duplicate(&movie).await.unwrap());
    }

    #[tokio::test]
    async fn four_matches_across_different_rows_count_as_duplicate() {
        let store = memory_store().await;
        store.insert(&sample("기생충", "Parasite", "131", "2019.05.30")).await.unwrap();
        store.insert(&sample("올드보이", "Oldboy", "120", "2003.11.21")).await.unwrap();

        // Each field matches some row, no single row matches all four.
        let candidate = sample("기생충", "Oldboy", "120", "2019.05.30");
        assert!(store.is_duplicate(&candidate).await.unwrap());
    }

    #[tokio::test]
    async fn one_unmatched_field_is_not_a_duplicate() {
        let store = memory_store().await;
        store.insert(&sample("기생충", "Parasite", "131", "2019.05.30")).await.unwrap();
        let candidate = sample("기생충", "Parasite", "131", "2020.01.01");
        assert!(!store.is_duplicate(&candidate).await.unwrap());
    }

    #[tokio::test]
    async fn released_orders_by_open_date_descending() {
        let store = memory_store().await;
        store.insert(&sample("a", "A", "100", "2003.11.21")).await.unwrap();
        store.insert(&sample("b", "B", "101", "2019.05.30")).await.unwrap();
        store.insert(&sample("c", "C", "102", "")).await.unwrap();

        let rows = store.released().await.unwrap();
        let dates: Vec<&str> = rows.iter().map(|r| r.open_date.as_str()).collect();
        assert_eq!(dates, vec!["2019.05.30", "2003.11.21"]);
    }

    #[tokio::test]
    async fn delete_all_empties_the_table() {
        let store = memory_store().await;
        store.insert(&sample("a", "A", "100", "2003.11.21")).await.unwrap();
        store.insert(&sample("b", "B", "101", "2019.05.30")).await.unwrap();
        assert_eq!(store.delete_all().await.unwrap(), 2);
        assert!(store.all().await.unwrap().is_empty());
    }
}
