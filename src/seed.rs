use std::sync::Arc;

use color_eyre::{Result, eyre::eyre};
use sea_orm::{EntityTrait, PaginatorTrait};

use crate::database::Database;
use crate::entities;
use crate::services::artist::{ArtistService, NewArtist};
use crate::services::schedule;
use crate::services::show::{NewShow, ShowService};
use crate::services::venue::{NewVenue, VenueService};

struct SeedVenue {
    name: &'static str,
    address: &'static str,
    city: &'static str,
    state: &'static str,
    phone: &'static str,
    genres: &'static [&'static str],
    website: Option<&'static str>,
    facebook_link: &'static str,
    seeking_description: Option<&'static str>,
    image_link: &'static str,
}

struct SeedArtist {
    name: &'static str,
    city: &'static str,
    state: &'static str,
    phone: &'static str,
    genres: &'static [&'static str],
    website: Option<&'static str>,
    facebook_link: &'static str,
    seeking_description: Option<&'static str>,
    image_link: &'static str,
}

const VENUES: &[SeedVenue] = &[
    SeedVenue {
        name: "The Musical Hop",
        address: "1015 Folsom Street",
        city: "San Francisco",
        state: "CA",
        phone: "123-123-1234",
        genres: &["Jazz", "Reggae", "Swing", "Classical", "Folk"],
        website: Some("https://www.themusicalhop.com"),
        facebook_link: "https://www.facebook.com/TheMusicalHop",
        seeking_description: Some(
            "We are on the lookout for a local artist to play every two weeks. Please call us.",
        ),
        image_link: "https://images.unsplash.com/photo-1543900694-133f37abaaa5?w=400",
    },
    SeedVenue {
        name: "The Dueling Pianos Bar",
        address: "335 Delancey Street",
        city: "New York",
        state: "NY",
        phone: "914-003-1132",
        genres: &["Classical", "R&B", "Hip-Hop"],
        website: Some("https://www.theduelingpianos.com"),
        facebook_link: "https://www.facebook.com/theduelingpianos",
        seeking_description: None,
        image_link: "https://images.unsplash.com/photo-1497032205916-ac775f0649ae?w=750",
    },
    SeedVenue {
        name: "Park Square Live Music & Coffee",
        address: "34 Whiskey Moore Ave",
        city: "San Francisco",
        state: "CA",
        phone: "415-000-1234",
        genres: &["Rock n Roll", "Jazz", "Classical", "Folk"],
        website: Some("https://www.parksquarelivemusicandcoffee.com"),
        facebook_link: "https://www.facebook.com/ParkSquareLiveMusicAndCoffee",
        seeking_description: None,
        image_link: "https://images.unsplash.com/photo-1485686531765-ba63b07845a7?w=747",
    },
];

const ARTISTS: &[SeedArtist] = &[
    SeedArtist {
        name: "Guns N Petals",
        city: "San Francisco",
        state: "CA",
        phone: "326-123-5000",
        genres: &["Rock n Roll"],
        website: Some("https://www.gunsnpetalsband.com"),
        facebook_link: "https://www.facebook.com/GunsNPetals",
        seeking_description: Some(
            "Looking for shows to perform at in the San Francisco Bay Area!",
        ),
        image_link: "https://images.unsplash.com/photo-1549213783-8284d0336c4f?w=300",
    },
    SeedArtist {
        name: "Matt Quevedo",
        city: "New York",
        state: "NY",
        phone: "300-400-5000",
        genres: &["Jazz"],
        website: None,
        facebook_link: "https://www.facebook.com/mattquevedo923251523",
        seeking_description: None,
        image_link: "https://images.unsplash.com/photo-1495223153807-b916f75de8c5?w=334",
    },
    SeedArtist {
        name: "The Wild Sax Band",
        city: "San Francisco",
        state: "CA",
        phone: "432-325-5432",
        genres: &["Jazz", "Classical"],
        website: None,
        facebook_link: "https://www.facebook.com/TheWildSaxBand",
        seeking_description: None,
        image_link: "https://images.unsplash.com/photo-1558369981-f9ca78462e61?w=794",
    },
];

/// (venue index, artist index, start time)
const SHOWS: &[(usize, usize, &str)] = &[
    (0, 0, "2019-05-21 21:30:00"),
    (2, 1, "2019-06-15 23:00:00"),
    (2, 2, "2035-04-01 20:00:00"),
    (2, 2, "2035-04-08 20:00:00"),
    (2, 2, "2035-04-15 20:00:00"),
];

fn genres(genres: &[&str]) -> Vec<String> {
    genres.iter().map(|genre| genre.to_string()).collect()
}

/// What `seed_demo_data` inserted.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub venues: usize,
    pub artists: usize,
    pub shows: usize,
}

/// Fill an empty directory with the demo venues, artists and shows.
pub async fn seed_demo_data(db: Arc<Database>) -> Result<SeedSummary> {
    let existing = entities::venue::Entity::find().count(&db.conn).await?
        + entities::artist::Entity::find().count(&db.conn).await?;
    if existing > 0 {
        return Err(eyre!(
            "Refusing to seed: the directory already has {} venues or artists",
            existing
        ));
    }

    let venue_service = VenueService::new(db.clone());
    let artist_service = ArtistService::new(db.clone());
    let show_service = ShowService::new(db);
    let mut summary = SeedSummary::default();

    let mut venue_ids = Vec::with_capacity(VENUES.len());
    for venue in VENUES {
        let created = venue_service
            .create(NewVenue {
                name: venue.name.to_string(),
                address: venue.address.to_string(),
                phone: venue.phone.to_string(),
                genres: genres(venue.genres),
                website: venue.website.map(str::to_string),
                facebook_link: Some(venue.facebook_link.to_string()),
                image_link: Some(Some(venue.image_link.to_string())),
                seeking_talent: venue.seeking_description.is_some(),
                seeking_description: venue.seeking_description.map(str::to_string),
                city: venue.city.to_string(),
                state: venue.state.to_string(),
            })
            .await?;
        log::debug!("Seeded venue {} ({})", created.name, created.id);
        venue_ids.push(created.id);
        summary.venues += 1;
    }

    let mut artist_ids = Vec::with_capacity(ARTISTS.len());
    for artist in ARTISTS {
        let created = artist_service
            .create(NewArtist {
                name: artist.name.to_string(),
                phone: artist.phone.to_string(),
                genres: genres(artist.genres),
                website: artist.website.map(str::to_string),
                facebook_link: Some(artist.facebook_link.to_string()),
                image_link: Some(Some(artist.image_link.to_string())),
                seeking_venue: artist.seeking_description.is_some(),
                seeking_description: artist.seeking_description.map(str::to_string),
                city: artist.city.to_string(),
                state: artist.state.to_string(),
            })
            .await?;
        log::debug!("Seeded artist {} ({})", created.name, created.id);
        artist_ids.push(created.id);
        summary.artists += 1;
    }

    for &(venue, artist, start_time) in SHOWS {
        show_service
            .create(NewShow {
                artist_id: artist_ids[artist],
                venue_id: venue_ids[venue],
                start_time: schedule::parse_start_time(start_time)?,
            })
            .await?;
        summary.shows += 1;
    }

    log::info!(
        "Seeded {} venues, {} artists and {} shows",
        summary.venues,
        summary.artists,
        summary.shows
    );
    Ok(summary)
}
