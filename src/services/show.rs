use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDateTime;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;

use crate::database::Database;
use crate::entities;
use crate::error::{BookingError, BookingResult};
use crate::services::schedule;

#[derive(Debug, Clone)]
pub struct NewShow {
    pub artist_id: i64,
    pub venue_id: i64,
    pub start_time: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShowListing {
    pub venue_id: i64,
    pub venue_name: String,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: String,
}

pub struct ShowService {
    db: Arc<Database>,
}

impl ShowService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Every show with its artist and venue names, earliest first.
    pub async fn list(&self) -> BookingResult<Vec<ShowListing>> {
        let shows = entities::show::Entity::find()
            .find_also_related(entities::artist::Entity)
            .order_by_asc(entities::show::Column::StartTime)
            .all(&self.db.conn)
            .await?;

        let venue_ids: Vec<i64> = shows.iter().map(|(show, _)| show.venue_id).collect();
        let venues: HashMap<i64, entities::venue::Model> = entities::venue::Entity::find()
            .filter(entities::venue::Column::Id.is_in(venue_ids))
            .all(&self.db.conn)
            .await?
            .into_iter()
            .map(|venue| (venue.id, venue))
            .collect();

        Ok(shows
            .into_iter()
            .filter_map(|(show, artist)| {
                let artist = artist?;
                let venue = venues.get(&show.venue_id)?;
                Some(ShowListing {
                    venue_id: venue.id,
                    venue_name: venue.name.clone(),
                    artist_id: artist.id,
                    artist_name: artist.name,
                    artist_image_link: artist.image_link,
                    start_time: schedule::format_start_time(&show.start_time),
                })
            })
            .collect())
    }

    /// Book an artist at a venue. Both must exist; the same pair cannot be
    /// booked twice at the same start time.
    pub async fn create(&self, new_show: NewShow) -> BookingResult<entities::show::Model> {
        let txn = self.db.conn.begin().await?;

        let artist = entities::artist::Entity::find_by_id(new_show.artist_id)
            .one(&txn)
            .await?
            .ok_or(BookingError::not_found("Artist", new_show.artist_id))?;
        let venue = entities::venue::Entity::find_by_id(new_show.venue_id)
            .one(&txn)
            .await?
            .ok_or(BookingError::not_found("Venue", new_show.venue_id))?;

        let show = entities::show::ActiveModel {
            artist_id: Set(artist.id),
            venue_id: Set(venue.id),
            start_time: Set(new_show.start_time),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        log::info!(
            "Show created: '{}' at '{}' on {}",
            artist.name,
            venue.name,
            schedule::format_start_time(&show.start_time)
        );
        Ok(show)
    }
}
