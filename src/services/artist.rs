use std::sync::Arc;

use chrono::NaiveDateTime;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use serde::Serialize;

use crate::database::Database;
use crate::entities;
use crate::entities::genres::Genres;
use crate::error::{BookingError, BookingResult};
use crate::services::locations;
use crate::services::schedule::{self, Schedule};
use crate::services::search::{self, SearchHit, SearchResults};

#[derive(Debug, Clone)]
pub struct NewArtist {
    pub name: String,
    pub phone: String,
    pub genres: Vec<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    /// `None` when the field was not submitted at all, `Some(None)` to clear it.
    pub image_link: Option<Option<String>>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
    pub city: String,
    pub state: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArtistShow {
    pub venue_id: i64,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub start_time: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArtistDetail {
    pub id: i64,
    pub name: String,
    pub genres: Vec<String>,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
    pub image_link: Option<String>,
    pub past_shows: Vec<ArtistShow>,
    pub upcoming_shows: Vec<ArtistShow>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

pub struct ArtistService {
    db: Arc<Database>,
}

impl ArtistService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    async fn id_name_rows(&self) -> BookingResult<Vec<(i64, String)>> {
        Ok(entities::artist::Entity::find()
            .select_only()
            .column(entities::artist::Column::Id)
            .column(entities::artist::Column::Name)
            .order_by_asc(entities::artist::Column::Id)
            .into_tuple()
            .all(&self.db.conn)
            .await?)
    }

    pub async fn list(&self) -> BookingResult<Vec<SearchHit>> {
        Ok(self
            .id_name_rows()
            .await?
            .into_iter()
            .map(|(id, name)| SearchHit { id, name })
            .collect())
    }

    pub async fn search(&self, term: &str) -> BookingResult<SearchResults> {
        Ok(search::filter_by_name(term, self.id_name_rows().await?))
    }

    pub async fn get_with_location(
        &self,
        artist_id: i64,
    ) -> BookingResult<(entities::artist::Model, entities::location::Model)> {
        let (artist, location) = entities::artist::Entity::find_by_id(artist_id)
            .find_also_related(entities::location::Entity)
            .one(&self.db.conn)
            .await?
            .ok_or(BookingError::not_found("Artist", artist_id))?;

        let location = location.ok_or(BookingError::MissingLocation {
            entity: "Artist",
            id: artist_id,
        })?;

        Ok((artist, location))
    }

    pub async fn detail(&self, artist_id: i64, now: NaiveDateTime) -> BookingResult<ArtistDetail> {
        let (artist, location) = self.get_with_location(artist_id).await?;

        let shows = entities::show::Entity::find()
            .filter(entities::show::Column::ArtistId.eq(artist.id))
            .find_also_related(entities::venue::Entity)
            .order_by_asc(entities::show::Column::StartTime)
            .all(&self.db.conn)
            .await?;

        let schedule: Schedule<ArtistShow> = schedule::partition_by_start(
            shows.into_iter().filter_map(|(show, venue)| {
                let venue = venue?;
                Some((
                    show.start_time,
                    ArtistShow {
                        venue_id: venue.id,
                        venue_name: venue.name,
                        venue_image_link: venue.image_link,
                        start_time: schedule::format_start_time(&show.start_time),
                    },
                ))
            }),
            now,
        );

        Ok(ArtistDetail {
            id: artist.id,
            name: artist.name,
            genres: artist.genres.0,
            city: location.city,
            state: location.state,
            phone: artist.phone,
            website: artist.website,
            facebook_link: artist.facebook_link,
            seeking_venue: artist.seeking_venue,
            seeking_description: artist.seeking_description,
            image_link: artist.image_link,
            past_shows_count: schedule.past_count(),
            upcoming_shows_count: schedule.upcoming_count(),
            past_shows: schedule.past,
            upcoming_shows: schedule.upcoming,
        })
    }

    pub async fn create(&self, new_artist: NewArtist) -> BookingResult<entities::artist::Model> {
        log::debug!("Creating artist: '{}'", new_artist.name);
        let txn = self.db.conn.begin().await?;

        let location =
            locations::find_or_create_by_city(&txn, &new_artist.city, &new_artist.state).await?;

        let artist = entities::artist::ActiveModel {
            name: Set(new_artist.name),
            phone: Set(new_artist.phone),
            genres: Set(Genres(new_artist.genres)),
            seeking_venue: Set(new_artist.seeking_venue),
            seeking_description: Set(new_artist.seeking_description),
            image_link: Set(new_artist.image_link.flatten()),
            website: Set(new_artist.website),
            facebook_link: Set(new_artist.facebook_link),
            location_id: Set(location.id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        log::info!("Artist created: '{}' (ID: {})", artist.name, artist.id);
        Ok(artist)
    }

    pub async fn update(
        &self,
        artist_id: i64,
        changes: NewArtist,
    ) -> BookingResult<entities::artist::Model> {
        let txn = self.db.conn.begin().await?;

        let artist = entities::artist::Entity::find_by_id(artist_id)
            .one(&txn)
            .await?
            .ok_or(BookingError::not_found("Artist", artist_id))?;

        let location =
            locations::find_or_create_by_city(&txn, &changes.city, &changes.state).await?;

        let mut active: entities::artist::ActiveModel = artist.into();
        active.name = Set(changes.name);
        active.phone = Set(changes.phone);
        active.genres = Set(Genres(changes.genres));
        active.website = Set(changes.website);
        active.facebook_link = Set(changes.facebook_link);
        active.seeking_venue = Set(changes.seeking_venue);
        active.seeking_description = Set(changes.seeking_description);
        if let Some(image_link) = changes.image_link {
            active.image_link = Set(image_link);
        }
        active.location_id = Set(location.id);

        let updated = active.update(&txn).await?;
        txn.commit().await?;

        log::info!("Artist updated: '{}' (ID: {})", updated.name, updated.id);
        Ok(updated)
    }

    pub async fn delete(&self, artist_id: i64) -> BookingResult<()> {
        let txn = self.db.conn.begin().await?;

        let result = entities::artist::Entity::delete_by_id(artist_id)
            .exec(&txn)
            .await?;
        if result.rows_affected == 0 {
            return Err(BookingError::not_found("Artist", artist_id));
        }

        txn.commit().await?;

        log::info!("Artist deleted (ID: {})", artist_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::PaginatorTrait;

    use crate::services::show::{NewShow, ShowService};
    use crate::services::venue::VenueService;
    use crate::test_utils::{at, new_artist, new_venue, test_db};

    #[tokio::test]
    async fn test_list_is_ordered_by_id() {
        let db = test_db().await;
        let service = ArtistService::new(db);
        for name in ["Guns N Petals", "Matt Quevedo", "The Wild Sax Band"] {
            service
                .create(new_artist(name, "San Francisco", "CA"))
                .await
                .unwrap();
        }

        let artists = service.list().await.unwrap();

        let names: Vec<&str> = artists.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Guns N Petals", "Matt Quevedo", "The Wild Sax Band"]);
        assert!(artists.windows(2).all(|pair| pair[0].id < pair[1].id));
    }

    #[tokio::test]
    async fn test_search() {
        let db = test_db().await;
        let service = ArtistService::new(db);
        for name in ["Guns N Petals", "Matt Quevedo", "The Wild Sax Band"] {
            service
                .create(new_artist(name, "New York", "NY"))
                .await
                .unwrap();
        }

        assert_eq!(service.search("A").await.unwrap().count, 3);
        let band = service.search("band").await.unwrap();
        assert_eq!(band.count, 1);
        assert_eq!(band.data[0].name, "The Wild Sax Band");
    }

    #[tokio::test]
    async fn test_artists_share_location_by_city() {
        let db = test_db().await;
        let service = ArtistService::new(db.clone());

        let first = service
            .create(new_artist("Guns N Petals", "San Francisco", "CA"))
            .await
            .unwrap();
        let second = service
            .create(new_artist("Matt Quevedo", "San Francisco", "CA"))
            .await
            .unwrap();

        assert_eq!(first.location_id, second.location_id);
        let locations = entities::location::Entity::find()
            .count(&db.conn)
            .await
            .unwrap();
        assert_eq!(locations, 1);
    }

    #[tokio::test]
    async fn test_detail_lists_venues_of_shows() {
        let db = test_db().await;
        let artist = ArtistService::new(db.clone())
            .create(new_artist("Guns N Petals", "San Francisco", "CA"))
            .await
            .unwrap();
        let venue = VenueService::new(db.clone())
            .create(new_venue("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();
        ShowService::new(db.clone())
            .create(NewShow {
                artist_id: artist.id,
                venue_id: venue.id,
                start_time: at("2019-05-21 21:30:00"),
            })
            .await
            .unwrap();

        let detail = ArtistService::new(db)
            .detail(artist.id, at("2024-01-01 00:00:00"))
            .await
            .unwrap();

        assert_eq!(detail.past_shows_count, 1);
        assert_eq!(detail.upcoming_shows_count, 0);
        assert_eq!(detail.past_shows[0].venue_name, "The Musical Hop");
        assert_eq!(detail.past_shows[0].venue_id, venue.id);
    }

    #[tokio::test]
    async fn test_detail_missing_artist_is_not_found() {
        let db = test_db().await;

        let err = ArtistService::new(db)
            .detail(5, schedule::now())
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_reuses_existing_city() {
        let db = test_db().await;
        let service = ArtistService::new(db.clone());
        let ny = service
            .create(new_artist("Matt Quevedo", "New York", "NY"))
            .await
            .unwrap();
        let artist = service
            .create(new_artist("Guns N Petals", "San Francisco", "CA"))
            .await
            .unwrap();

        let mut changes = new_artist("Guns N Petals", "New York", "ignored");
        changes.seeking_venue = true;
        let updated = service.update(artist.id, changes).await.unwrap();

        assert_eq!(updated.location_id, ny.location_id);
        assert!(updated.seeking_venue);
        let (_, location) = service.get_with_location(artist.id).await.unwrap();
        assert_eq!(location.state, "NY");
    }

    #[tokio::test]
    async fn test_update_to_taken_name_rolls_back() {
        let db = test_db().await;
        let service = ArtistService::new(db.clone());
        service
            .create(new_artist("Matt Quevedo", "New York", "NY"))
            .await
            .unwrap();
        let artist = service
            .create(new_artist("Guns N Petals", "San Francisco", "CA"))
            .await
            .unwrap();

        let err = service
            .update(artist.id, new_artist("Matt Quevedo", "Chicago", "IL"))
            .await
            .unwrap_err();

        assert!(!err.is_not_found());
        let (unchanged, location) = service.get_with_location(artist.id).await.unwrap();
        assert_eq!(unchanged.name, "Guns N Petals");
        assert_eq!(location.city, "San Francisco");
        let chicago = entities::location::Entity::find()
            .filter(entities::location::Column::City.eq("Chicago"))
            .one(&db.conn)
            .await
            .unwrap();
        assert!(chicago.is_none());
    }

    #[tokio::test]
    async fn test_delete_artist_cascades_shows() {
        let db = test_db().await;
        let artist = ArtistService::new(db.clone())
            .create(new_artist("Guns N Petals", "San Francisco", "CA"))
            .await
            .unwrap();
        let venue = VenueService::new(db.clone())
            .create(new_venue("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();
        ShowService::new(db.clone())
            .create(NewShow {
                artist_id: artist.id,
                venue_id: venue.id,
                start_time: at("2035-04-01 20:00:00"),
            })
            .await
            .unwrap();

        ArtistService::new(db.clone()).delete(artist.id).await.unwrap();

        let shows = entities::show::Entity::find()
            .count(&db.conn)
            .await
            .unwrap();
        assert_eq!(shows, 0);
    }
}
