use sea_orm::entity::prelude::*;

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "locations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// One row per city. State is whatever the first writer supplied.
    #[sea_orm(unique)]
    pub city: String,
    pub state: String,

    #[sea_orm(has_many)]
    pub venues: HasMany<super::venue::Entity>,
    #[sea_orm(has_many)]
    pub artists: HasMany<super::artist::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
