use sea_orm::entity::prelude::*;

/// Stored representation: the multi-value fields (`genre`, `actors`, ...)
/// and the `synopsis` mapping are JSON-encoded text. Decoding happens only
/// when a row is mapped into a view, never on the row itself.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub title_eng: String,
    pub open_date: String,
    pub running_time_minute: String,
    pub genre: String,
    pub synopsis: String,
    pub actors: String,
    pub directors: String,
    pub producer: String,
    pub distributor: String,
    pub keywords: String,
    pub poster_url: String,
    pub vod_url: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
