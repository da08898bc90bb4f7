use std::sync::Arc;

use chrono::NaiveDateTime;
use sea_orm::{ConnectOptions, Database as SeaDatabase};

use crate::database::Database;
use crate::services::artist::NewArtist;
use crate::services::venue::NewVenue;

pub async fn test_db() -> Arc<Database> {
    // A single connection, otherwise every pooled connection would see its
    // own empty in-memory database.
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);

    let conn = SeaDatabase::connect(opt).await.unwrap();
    let database = Database { conn };
    database.migrate().await.unwrap();

    Arc::new(database)
}

pub fn new_venue(name: &str, city: &str, state: &str) -> NewVenue {
    NewVenue {
        name: name.to_string(),
        address: "1015 Folsom Street".to_string(),
        phone: "123-123-1234".to_string(),
        genres: vec!["Jazz".to_string()],
        website: None,
        facebook_link: None,
        image_link: None,
        seeking_talent: false,
        seeking_description: None,
        city: city.to_string(),
        state: state.to_string(),
    }
}

pub fn new_artist(name: &str, city: &str, state: &str) -> NewArtist {
    NewArtist {
        name: name.to_string(),
        phone: "326-123-5000".to_string(),
        genres: vec!["Rock n Roll".to_string()],
        website: None,
        facebook_link: None,
        image_link: None,
        seeking_venue: false,
        seeking_description: None,
        city: city.to_string(),
        state: state.to_string(),
    }
}

pub fn at(value: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").unwrap()
}
