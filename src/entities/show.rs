use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;

/// A booking of one artist at one venue. The (artist, venue, start_time)
/// triple is the identity; there is no surrogate id.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "shows")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub artist_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub venue_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub start_time: NaiveDateTime,

    #[sea_orm(belongs_to, from = "artist_id", to = "id")]
    pub artist: HasOne<super::artist::Entity>,
    #[sea_orm(belongs_to, from = "venue_id", to = "id")]
    pub venue: HasOne<super::venue::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
