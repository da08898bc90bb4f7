//! Submitted form bodies. Fields are only checked for presence.

use serde::Deserialize;

use crate::entities;
use crate::error::{BookingError, BookingResult};
use crate::services::artist::NewArtist;
use crate::services::schedule;
use crate::services::show::NewShow;
use crate::services::venue::NewVenue;

#[derive(Debug, Default, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub search_term: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VenueForm {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    #[serde(default, alias = "genres[]")]
    pub genres: Vec<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub image_link: Option<String>,
    pub seeking_talent: Option<String>,
    pub seeking_description: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArtistForm {
    pub name: Option<String>,
    pub phone: Option<String>,
    #[serde(default, alias = "genres[]")]
    pub genres: Vec<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub image_link: Option<String>,
    pub seeking_venue: Option<String>,
    pub seeking_description: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShowForm {
    pub artist_id: Option<String>,
    pub venue_id: Option<String>,
    pub start_time: Option<String>,
}

fn required(value: Option<String>, field: &'static str) -> BookingResult<String> {
    value.ok_or(BookingError::MissingField(field))
}

/// Blank optional inputs are stored as NULL.
fn optional(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

/// Distinguishes a field left out of the body (`None`) from one sent blank
/// (`Some(None)`).
fn submitted(value: Option<String>) -> Option<Option<String>> {
    value.map(|value| optional(Some(value)))
}

/// Unchecked checkboxes are simply absent from the body.
fn checked(value: &Option<String>) -> bool {
    value
        .as_deref()
        .is_some_and(|value| !matches!(value.trim(), "" | "false"))
}

fn checkbox_value(checked: bool) -> Option<String> {
    checked.then(|| "y".to_string())
}

impl VenueForm {
    /// Name to use in flash messages, even when the submission is incomplete.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn into_new_venue(self) -> BookingResult<NewVenue> {
        let seeking_talent = checked(&self.seeking_talent);
        Ok(NewVenue {
            name: required(self.name, "name")?,
            address: required(self.address, "address")?,
            phone: required(self.phone, "phone")?,
            genres: self.genres,
            website: optional(self.website),
            facebook_link: optional(self.facebook_link),
            image_link: submitted(self.image_link),
            seeking_talent,
            seeking_description: optional(self.seeking_description),
            city: required(self.city, "city")?,
            state: required(self.state, "state")?,
        })
    }

    pub fn from_model(
        venue: entities::venue::Model,
        location: entities::location::Model,
    ) -> Self {
        Self {
            name: Some(venue.name),
            address: Some(venue.address),
            phone: Some(venue.phone),
            genres: venue.genres.0,
            website: venue.website,
            facebook_link: venue.facebook_link,
            image_link: venue.image_link,
            seeking_talent: checkbox_value(venue.seeking_talent),
            seeking_description: venue.seeking_description,
            city: Some(location.city),
            state: Some(location.state),
        }
    }
}

impl ArtistForm {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn into_new_artist(self) -> BookingResult<NewArtist> {
        let seeking_venue = checked(&self.seeking_venue);
        Ok(NewArtist {
            name: required(self.name, "name")?,
            phone: required(self.phone, "phone")?,
            genres: self.genres,
            website: optional(self.website),
            facebook_link: optional(self.facebook_link),
            image_link: submitted(self.image_link),
            seeking_venue,
            seeking_description: optional(self.seeking_description),
            city: required(self.city, "city")?,
            state: required(self.state, "state")?,
        })
    }

    pub fn from_model(
        artist: entities::artist::Model,
        location: entities::location::Model,
    ) -> Self {
        Self {
            name: Some(artist.name),
            phone: Some(artist.phone),
            genres: artist.genres.0,
            website: artist.website,
            facebook_link: artist.facebook_link,
            image_link: artist.image_link,
            seeking_venue: checkbox_value(artist.seeking_venue),
            seeking_description: artist.seeking_description,
            city: Some(location.city),
            state: Some(location.state),
        }
    }
}

impl ShowForm {
    pub fn into_new_show(self) -> BookingResult<NewShow> {
        let artist_id = required(self.artist_id, "artist_id")?;
        let venue_id = required(self.venue_id, "venue_id")?;
        let start_time = required(self.start_time, "start_time")?;

        Ok(NewShow {
            artist_id: artist_id
                .trim()
                .parse()
                .map_err(|_| BookingError::InvalidField("artist_id", artist_id.clone()))?,
            venue_id: venue_id
                .trim()
                .parse()
                .map_err(|_| BookingError::InvalidField("venue_id", venue_id.clone()))?,
            start_time: schedule::parse_start_time(&start_time)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn venue_body() -> &'static str {
        "name=The+Musical+Hop&address=1015+Folsom+Street&phone=123&genres=Jazz&genres=Folk\
         &city=San+Francisco&state=CA&website=&facebook_link=&seeking_talent=y"
    }

    #[test]
    fn test_venue_form_collects_repeated_genres() {
        let form: VenueForm = serde_html_form::from_str(venue_body()).unwrap();
        let venue = form.into_new_venue().unwrap();

        assert_eq!(venue.name, "The Musical Hop");
        assert_eq!(venue.genres, vec!["Jazz".to_string(), "Folk".to_string()]);
        assert!(venue.seeking_talent);
        assert_eq!(venue.website, None);
        assert_eq!(venue.facebook_link, None);
    }

    #[test]
    fn test_bracketed_genres_are_accepted() {
        let form: ArtistForm = serde_html_form::from_str(
            "name=Guns+N+Petals&phone=326&genres%5B%5D=Rock+n+Roll&city=San+Francisco&state=CA",
        )
        .unwrap();

        let artist = form.into_new_artist().unwrap();

        assert_eq!(artist.genres, vec!["Rock n Roll".to_string()]);
        assert!(!artist.seeking_venue);
    }

    #[test]
    fn test_missing_required_field() {
        let form: VenueForm =
            serde_html_form::from_str("name=The+Musical+Hop&phone=123&city=SF&state=CA").unwrap();

        assert_eq!(form.display_name(), "The Musical Hop");
        let err = form.into_new_venue().unwrap_err();
        assert!(matches!(err, BookingError::MissingField("address")));
    }

    #[test]
    fn test_show_form() {
        let form: ShowForm =
            serde_html_form::from_str("artist_id=4&venue_id=1&start_time=2019-05-21+21%3A30%3A00")
                .unwrap();

        let show = form.into_new_show().unwrap();

        assert_eq!(show.artist_id, 4);
        assert_eq!(show.venue_id, 1);
        assert_eq!(
            schedule::format_start_time(&show.start_time),
            "2019-05-21 21:30:00"
        );
    }

    #[test]
    fn test_show_form_rejects_bad_id() {
        let form = ShowForm {
            artist_id: Some("four".to_string()),
            venue_id: Some("1".to_string()),
            start_time: Some("2019-05-21 21:30:00".to_string()),
        };

        let err = form.into_new_show().unwrap_err();
        assert!(matches!(err, BookingError::InvalidField("artist_id", _)));
    }

    #[test]
    fn test_blank_image_link_clears_and_missing_keeps() {
        let blank: VenueForm = serde_html_form::from_str(
            "name=Hop&address=1&phone=2&city=SF&state=CA&image_link=",
        )
        .unwrap();
        assert_eq!(blank.into_new_venue().unwrap().image_link, Some(None));

        let missing: ArtistForm =
            serde_html_form::from_str("name=Hop&phone=2&city=SF&state=CA").unwrap();
        assert_eq!(missing.into_new_artist().unwrap().image_link, None);

        let given: ArtistForm = serde_html_form::from_str(
            "name=Hop&phone=2&city=SF&state=CA&image_link=http%3A%2F%2Fimg",
        )
        .unwrap();
        assert_eq!(
            given.into_new_artist().unwrap().image_link,
            Some(Some("http://img".to_string()))
        );
    }

    #[test]
    fn test_unchecked_checkbox() {
        assert!(!checked(&None));
        assert!(!checked(&Some("false".to_string())));
        assert!(checked(&Some("y".to_string())));
    }
}
