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
use crate::services::search::{self, SearchResults};

/// Submitted venue fields, shared by create and update.
#[derive(Debug, Clone)]
pub struct NewVenue {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub genres: Vec<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    /// `None` when the field was not submitted at all, `Some(None)` to clear it.
    pub image_link: Option<Option<String>>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
    pub city: String,
    pub state: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VenueSummary {
    pub id: i64,
    pub name: String,
    /// Always 0: the listing does not count shows.
    pub num_upcoming_shows: u64,
}

/// Venues sharing one location.
#[derive(Debug, Clone, Serialize)]
pub struct VenueArea {
    pub city: String,
    pub state: String,
    pub venues: Vec<VenueSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VenueShow {
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VenueDetail {
    pub id: i64,
    pub name: String,
    pub genres: Vec<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
    pub image_link: Option<String>,
    pub past_shows: Vec<VenueShow>,
    pub upcoming_shows: Vec<VenueShow>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

pub struct VenueService {
    db: Arc<Database>,
}

impl VenueService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// All venues grouped by location, locations in id order and venues in
    /// id order within each group. Locations without venues are left out.
    pub async fn list_by_area(&self) -> BookingResult<Vec<VenueArea>> {
        let rows = entities::venue::Entity::find()
            .find_also_related(entities::location::Entity)
            .order_by_asc(entities::venue::Column::LocationId)
            .order_by_asc(entities::venue::Column::Id)
            .all(&self.db.conn)
            .await?;

        let mut areas: Vec<VenueArea> = Vec::new();
        let mut current_location = None;

        for (venue, location) in rows {
            let location = location.ok_or(BookingError::MissingLocation {
                entity: "Venue",
                id: venue.id,
            })?;

            let summary = VenueSummary {
                id: venue.id,
                name: venue.name,
                num_upcoming_shows: 0,
            };

            if current_location != Some(location.id) {
                current_location = Some(location.id);
                areas.push(VenueArea {
                    city: location.city,
                    state: location.state,
                    venues: Vec::new(),
                });
            }
            if let Some(area) = areas.last_mut() {
                area.venues.push(summary);
            }
        }

        Ok(areas)
    }

    pub async fn search(&self, term: &str) -> BookingResult<SearchResults> {
        let rows: Vec<(i64, String)> = entities::venue::Entity::find()
            .select_only()
            .column(entities::venue::Column::Id)
            .column(entities::venue::Column::Name)
            .order_by_asc(entities::venue::Column::Id)
            .into_tuple()
            .all(&self.db.conn)
            .await?;

        Ok(search::filter_by_name(term, rows))
    }

    /// Venue row joined with its location. A venue whose location is gone
    /// is an integrity failure, not a "not found".
    pub async fn get_with_location(
        &self,
        venue_id: i64,
    ) -> BookingResult<(entities::venue::Model, entities::location::Model)> {
        let (venue, location) = entities::venue::Entity::find_by_id(venue_id)
            .find_also_related(entities::location::Entity)
            .one(&self.db.conn)
            .await?
            .ok_or(BookingError::not_found("Venue", venue_id))?;

        let location = location.ok_or(BookingError::MissingLocation {
            entity: "Venue",
            id: venue_id,
        })?;

        Ok((venue, location))
    }

    pub async fn detail(&self, venue_id: i64, now: NaiveDateTime) -> BookingResult<VenueDetail> {
        let (venue, location) = self.get_with_location(venue_id).await?;

        let shows = entities::show::Entity::find()
            .filter(entities::show::Column::VenueId.eq(venue.id))
            .find_also_related(entities::artist::Entity)
            .order_by_asc(entities::show::Column::StartTime)
            .all(&self.db.conn)
            .await?;

        let schedule: Schedule<VenueShow> = schedule::partition_by_start(
            shows.into_iter().filter_map(|(show, artist)| {
                let artist = artist?;
                Some((
                    show.start_time,
                    VenueShow {
                        artist_id: artist.id,
                        artist_name: artist.name,
                        artist_image_link: artist.image_link,
                        start_time: schedule::format_start_time(&show.start_time),
                    },
                ))
            }),
            now,
        );

        Ok(VenueDetail {
            id: venue.id,
            name: venue.name,
            genres: venue.genres.0,
            address: venue.address,
            city: location.city,
            state: location.state,
            phone: venue.phone,
            website: venue.website,
            facebook_link: venue.facebook_link,
            seeking_talent: venue.seeking_talent,
            seeking_description: venue.seeking_description,
            image_link: venue.image_link,
            past_shows_count: schedule.past_count(),
            upcoming_shows_count: schedule.upcoming_count(),
            past_shows: schedule.past,
            upcoming_shows: schedule.upcoming,
        })
    }

    /// Insert a venue and, if needed, its location in one transaction.
    pub async fn create(&self, new_venue: NewVenue) -> BookingResult<entities::venue::Model> {
        log::debug!("Creating venue: '{}'", new_venue.name);
        let txn = self.db.conn.begin().await?;

        let location =
            locations::find_or_create_by_city(&txn, &new_venue.city, &new_venue.state).await?;

        let venue = entities::venue::ActiveModel {
            name: Set(new_venue.name),
            address: Set(new_venue.address),
            phone: Set(new_venue.phone),
            genres: Set(Genres(new_venue.genres)),
            seeking_talent: Set(new_venue.seeking_talent),
            seeking_description: Set(new_venue.seeking_description),
            image_link: Set(new_venue.image_link.flatten()),
            website: Set(new_venue.website),
            facebook_link: Set(new_venue.facebook_link),
            location_id: Set(location.id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        log::info!("Venue created: '{}' (ID: {})", venue.name, venue.id);
        Ok(venue)
    }

    /// Reassign the venue's location by city and overwrite its fields.
    /// An unsubmitted `image_link` keeps the stored image.
    pub async fn update(
        &self,
        venue_id: i64,
        changes: NewVenue,
    ) -> BookingResult<entities::venue::Model> {
        let txn = self.db.conn.begin().await?;

        let venue = entities::venue::Entity::find_by_id(venue_id)
            .one(&txn)
            .await?
            .ok_or(BookingError::not_found("Venue", venue_id))?;

        let location =
            locations::find_or_create_by_city(&txn, &changes.city, &changes.state).await?;

        let mut active: entities::venue::ActiveModel = venue.into();
        active.name = Set(changes.name);
        active.address = Set(changes.address);
        active.phone = Set(changes.phone);
        active.genres = Set(Genres(changes.genres));
        active.website = Set(changes.website);
        active.facebook_link = Set(changes.facebook_link);
        active.seeking_talent = Set(changes.seeking_talent);
        active.seeking_description = Set(changes.seeking_description);
        if let Some(image_link) = changes.image_link {
            active.image_link = Set(image_link);
        }
        active.location_id = Set(location.id);

        let updated = active.update(&txn).await?;
        txn.commit().await?;

        log::info!("Venue updated: '{}' (ID: {})", updated.name, updated.id);
        Ok(updated)
    }

    /// Delete a venue. Its shows go with it; its location stays.
    pub async fn delete(&self, venue_id: i64) -> BookingResult<()> {
        let txn = self.db.conn.begin().await?;

        let result = entities::venue::Entity::delete_by_id(venue_id)
            .exec(&txn)
            .await?;
        if result.rows_affected == 0 {
            return Err(BookingError::not_found("Venue", venue_id));
        }

        txn.commit().await?;

        log::info!("Venue deleted (ID: {})", venue_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::PaginatorTrait;

    use crate::services::artist::ArtistService;
    use crate::services::show::{NewShow, ShowService};
    use crate::test_utils::{at, new_artist, new_venue, test_db};

    #[tokio::test]
    async fn test_created_venue_is_listed_under_its_city() {
        let db = test_db().await;
        let service = VenueService::new(db);
        let mut venue = new_venue("The Musical Hop", "San Francisco", "CA");
        venue.phone = "123".to_string();

        service.create(venue).await.unwrap();
        let areas = service.list_by_area().await.unwrap();

        assert_eq!(areas.len(), 1);
        assert_eq!(areas[0].city, "San Francisco");
        assert_eq!(areas[0].state, "CA");
        assert_eq!(areas[0].venues.len(), 1);
        assert_eq!(areas[0].venues[0].name, "The Musical Hop");
        assert_eq!(areas[0].venues[0].num_upcoming_shows, 0);
    }

    #[tokio::test]
    async fn test_listing_groups_by_location_in_id_order() {
        let db = test_db().await;
        let service = VenueService::new(db.clone());
        service
            .create(new_venue("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();
        service
            .create(new_venue("The Dueling Pianos Bar", "New York", "NY"))
            .await
            .unwrap();
        service
            .create(new_venue("Park Square Live Music & Coffee", "San Francisco", "CA"))
            .await
            .unwrap();
        // A location with only an artist must not show up.
        ArtistService::new(db)
            .create(new_artist("Guns N Petals", "Austin", "TX"))
            .await
            .unwrap();

        let areas = service.list_by_area().await.unwrap();

        let cities: Vec<&str> = areas.iter().map(|area| area.city.as_str()).collect();
        assert_eq!(cities, vec!["San Francisco", "New York"]);
        let sf: Vec<&str> = areas[0].venues.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(
            sf,
            vec!["The Musical Hop", "Park Square Live Music & Coffee"]
        );
    }

    #[tokio::test]
    async fn test_search_hop() {
        let db = test_db().await;
        let service = VenueService::new(db);
        service
            .create(new_venue("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();

        let results = service.search("Hop").await.unwrap();

        assert_eq!(results.count, 1);
        assert_eq!(results.data[0].id, 1);
        assert_eq!(results.data[0].name, "The Musical Hop");
    }

    #[tokio::test]
    async fn test_duplicate_name_is_rejected_without_partial_insert() {
        let db = test_db().await;
        let service = VenueService::new(db.clone());
        service
            .create(new_venue("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();

        let err = service
            .create(new_venue("The Musical Hop", "Portland", "OR"))
            .await
            .unwrap_err();

        assert!(!err.is_not_found());
        // The Portland location was rolled back with the venue insert.
        let locations = entities::location::Entity::find()
            .count(&db.conn)
            .await
            .unwrap();
        assert_eq!(locations, 1);
    }

    #[tokio::test]
    async fn test_detail_missing_venue_is_not_found() {
        let db = test_db().await;
        let service = VenueService::new(db);

        let err = service.detail(42, schedule::now()).await.unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_detail_partitions_shows() {
        let db = test_db().await;
        let venue = VenueService::new(db.clone())
            .create(new_venue("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();
        let artist = ArtistService::new(db.clone())
            .create(new_artist("Guns N Petals", "San Francisco", "CA"))
            .await
            .unwrap();
        let shows = ShowService::new(db.clone());
        for start_time in ["2019-05-21 21:30:00", "2035-04-01 20:00:00"] {
            shows
                .create(NewShow {
                    artist_id: artist.id,
                    venue_id: venue.id,
                    start_time: at(start_time),
                })
                .await
                .unwrap();
        }

        let detail = VenueService::new(db)
            .detail(venue.id, at("2024-01-01 00:00:00"))
            .await
            .unwrap();

        assert_eq!(detail.city, "San Francisco");
        assert_eq!(detail.genres, vec!["Jazz".to_string()]);
        assert_eq!(detail.past_shows_count, 1);
        assert_eq!(detail.upcoming_shows_count, 1);
        assert_eq!(detail.past_shows[0].start_time, "2019-05-21 21:30:00");
        assert_eq!(detail.upcoming_shows[0].artist_name, "Guns N Petals");
    }

    #[tokio::test]
    async fn test_update_moves_venue_to_new_city() {
        let db = test_db().await;
        let service = VenueService::new(db.clone());
        let venue = service
            .create(new_venue("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();

        let mut changes = new_venue("The Musical Hop II", "Oakland", "CA");
        changes.seeking_talent = true;
        changes.seeking_description = Some("Looking for brass".to_string());
        let updated = service.update(venue.id, changes).await.unwrap();

        assert_eq!(updated.name, "The Musical Hop II");
        assert!(updated.seeking_talent);
        assert_ne!(updated.location_id, venue.location_id);
        let (_, location) = service.get_with_location(venue.id).await.unwrap();
        assert_eq!(location.city, "Oakland");
    }

    #[tokio::test]
    async fn test_update_keeps_image_when_not_submitted() {
        let db = test_db().await;
        let service = VenueService::new(db);
        let mut new = new_venue("The Musical Hop", "San Francisco", "CA");
        new.image_link = Some(Some("https://example.com/hop.jpg".to_string()));
        let venue = service.create(new).await.unwrap();

        let updated = service
            .update(venue.id, new_venue("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();

        assert_eq!(
            updated.image_link.as_deref(),
            Some("https://example.com/hop.jpg")
        );
        assert_eq!(updated.location_id, venue.location_id);
    }

    #[tokio::test]
    async fn test_update_clears_blank_image() {
        let db = test_db().await;
        let service = VenueService::new(db);
        let mut new = new_venue("The Musical Hop", "San Francisco", "CA");
        new.image_link = Some(Some("https://example.com/hop.jpg".to_string()));
        let venue = service.create(new).await.unwrap();

        let mut changes = new_venue("The Musical Hop", "San Francisco", "CA");
        changes.image_link = Some(None);
        let updated = service.update(venue.id, changes).await.unwrap();

        assert_eq!(updated.image_link, None);
    }

    #[tokio::test]
    async fn test_update_missing_venue_changes_nothing() {
        let db = test_db().await;
        let service = VenueService::new(db.clone());

        let err = service
            .update(7, new_venue("Ghost", "Nowhere", "NA"))
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        let locations = entities::location::Entity::find()
            .count(&db.conn)
            .await
            .unwrap();
        assert_eq!(locations, 0);
    }

    #[tokio::test]
    async fn test_delete_cascades_shows_and_keeps_location() {
        let db = test_db().await;
        let service = VenueService::new(db.clone());
        let venue = service
            .create(new_venue("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();
        let artist = ArtistService::new(db.clone())
            .create(new_artist("Guns N Petals", "San Francisco", "CA"))
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

        service.delete(venue.id).await.unwrap();

        let shows = entities::show::Entity::find()
            .count(&db.conn)
            .await
            .unwrap();
        assert_eq!(shows, 0);
        let location = entities::location::Entity::find_by_id(venue.location_id)
            .one(&db.conn)
            .await
            .unwrap();
        assert!(location.is_some());
        assert!(
            entities::artist::Entity::find_by_id(artist.id)
                .one(&db.conn)
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_delete_missing_venue_is_not_found() {
        let db = test_db().await;
        let service = VenueService::new(db);

        let err = service.delete(999).await.unwrap_err();

        assert!(err.is_not_found());
    }
}
