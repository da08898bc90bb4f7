//! Server-rendered HTML pages.

use crate::http_server::forms::{ArtistForm, ShowForm, VenueForm};
use crate::services::artist::ArtistDetail;
use crate::services::schedule;
use crate::services::search::{SearchHit, SearchResults};
use crate::services::show::ShowListing;
use crate::services::venue::{VenueArea, VenueDetail};

const DEFAULT_VENUE_IMAGE: &str = "https://images.unsplash.com/photo-1543900694-133f37abaaa5?ixlib=rb-1.2.1&auto=format&fit=crop&w=400&q=60";
const DEFAULT_ARTIST_IMAGE: &str = "https://images.unsplash.com/photo-1549213783-8284d0336c4f?ixlib=rb-1.2.1&auto=format&fit=crop&w=300&q=80";

pub const GENRES: [&str; 19] = [
    "Alternative",
    "Blues",
    "Classical",
    "Country",
    "Electronic",
    "Folk",
    "Funk",
    "Hip-Hop",
    "Heavy Metal",
    "Instrumental",
    "Jazz",
    "Musical Theatre",
    "Pop",
    "Punk",
    "R&B",
    "Reggae",
    "Rock n Roll",
    "Soul",
    "Other",
];

/// Escape text for use in element content and quoted attribute values.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Sends `DELETE` for buttons carrying `data-delete` and returns home.
const DELETE_SCRIPT: &str = "<script>\n\
document.addEventListener('click', function (event) {\n\
  var button = event.target.closest('[data-delete]');\n\
  if (!button) { return; }\n\
  fetch(button.dataset.delete, { method: 'DELETE' })\n\
    .then(function () { window.location.href = '/'; });\n\
});\n\
</script>";

pub fn layout(title: &str, flash: Option<&str>, body: &str) -> String {
    let flash = flash
        .map(|message| format!("<div class=\"alert\">{}</div>", escape(message)))
        .unwrap_or_default();

    format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title} | Fyyur</title>\n</head>\n<body>\n\
         <nav><a href=\"/\">Fyyur</a> <a href=\"/venues\">Venues</a> \
         <a href=\"/artists\">Artists</a> <a href=\"/shows\">Shows</a></nav>\n\
         {flash}\n<main>\n{body}\n</main>\n{DELETE_SCRIPT}\n</body>\n</html>\n",
        title = escape(title),
    )
}

pub fn home_page() -> String {
    "<h1>Fyyur</h1>\n<p>Find your next gig, or your next act.</p>\n\
     <p><a href=\"/venues/create\">Post a venue</a> \
     <a href=\"/artists/create\">Post an artist</a> \
     <a href=\"/shows/create\">Post a show</a></p>"
        .to_string()
}

pub fn venues_page(areas: &[VenueArea]) -> String {
    let mut html = search_box("/venues/search", "Find a venue");
    for area in areas {
        html.push_str(&format!(
            "<h3>{}, {}</h3>\n<ul class=\"items\">\n",
            escape(&area.city),
            escape(&area.state)
        ));
        for venue in &area.venues {
            html.push_str(&format!(
                "<li><a href=\"/venues/{}\">{}</a> <small>{} upcoming shows</small></li>\n",
                venue.id,
                escape(&venue.name),
                venue.num_upcoming_shows
            ));
        }
        html.push_str("</ul>\n");
    }
    html
}

pub fn artists_page(artists: &[SearchHit]) -> String {
    let mut html = search_box("/artists/search", "Find an artist");
    html.push_str(&hit_list("artists", artists));
    html
}

pub fn search_page(kind: &str, search_term: &str, results: &SearchResults) -> String {
    let mut html = search_box(&format!("/{kind}/search"), "Search");
    html.push_str(&format!(
        "<h3>Number of search results for \"{}\": {}</h3>\n",
        escape(search_term),
        results.count
    ));
    html.push_str(&hit_list(kind, &results.data));
    html
}

pub fn venue_page(venue: &VenueDetail) -> String {
    let mut html = format!(
        "<h1>{}</h1>\n<p class=\"subtitle\">ID: {}</p>\n{}\n\
         <p>{}, {}, {}</p>\n<p>{}</p>\n",
        escape(&venue.name),
        venue.id,
        genre_tags(&venue.genres),
        escape(&venue.address),
        escape(&venue.city),
        escape(&venue.state),
        escape(&venue.phone)
    );
    html.push_str(&links(venue.website.as_deref(), venue.facebook_link.as_deref()));
    html.push_str(&seeking(
        venue.seeking_talent,
        "talent",
        venue.seeking_description.as_deref(),
    ));
    html.push_str(&format!(
        "<img src=\"{}\" alt=\"Venue Image\">\n",
        escape(venue.image_link.as_deref().unwrap_or(DEFAULT_VENUE_IMAGE))
    ));

    for (heading, count, shows) in [
        ("Upcoming Shows", venue.upcoming_shows_count, &venue.upcoming_shows),
        ("Past Shows", venue.past_shows_count, &venue.past_shows),
    ] {
        html.push_str(&format!("<section>\n<h2>{count} {heading}</h2>\n"));
        for show in shows {
            html.push_str(&show_card(
                show.artist_image_link.as_deref().unwrap_or(DEFAULT_ARTIST_IMAGE),
                &format!("/artists/{}", show.artist_id),
                &show.artist_name,
                &show.start_time,
            ));
        }
        html.push_str("</section>\n");
    }

    html.push_str(&profile_actions(&format!("/venues/{}", venue.id)));
    html
}

pub fn artist_page(artist: &ArtistDetail) -> String {
    let mut html = format!(
        "<h1>{}</h1>\n<p class=\"subtitle\">ID: {}</p>\n{}\n<p>{}, {}</p>\n<p>{}</p>\n",
        escape(&artist.name),
        artist.id,
        genre_tags(&artist.genres),
        escape(&artist.city),
        escape(&artist.state),
        escape(&artist.phone)
    );
    html.push_str(&links(artist.website.as_deref(), artist.facebook_link.as_deref()));
    html.push_str(&seeking(
        artist.seeking_venue,
        "performance venues",
        artist.seeking_description.as_deref(),
    ));
    html.push_str(&format!(
        "<img src=\"{}\" alt=\"Artist Image\">\n",
        escape(artist.image_link.as_deref().unwrap_or(DEFAULT_ARTIST_IMAGE))
    ));

    for (heading, count, shows) in [
        ("Upcoming Shows", artist.upcoming_shows_count, &artist.upcoming_shows),
        ("Past Shows", artist.past_shows_count, &artist.past_shows),
    ] {
        html.push_str(&format!("<section>\n<h2>{count} {heading}</h2>\n"));
        for show in shows {
            html.push_str(&show_card(
                show.venue_image_link.as_deref().unwrap_or(DEFAULT_VENUE_IMAGE),
                &format!("/venues/{}", show.venue_id),
                &show.venue_name,
                &show.start_time,
            ));
        }
        html.push_str("</section>\n");
    }

    html.push_str(&profile_actions(&format!("/artists/{}", artist.id)));
    html
}

pub fn shows_page(shows: &[ShowListing]) -> String {
    let cards: String = shows
        .iter()
        .map(|show| {
            format!(
                "<div class=\"show\"><img src=\"{}\" alt=\"Artist Image\">\
                 <h4>{}</h4><h5><a href=\"/artists/{}\">{}</a></h5>\
                 <p>playing at</p><h5><a href=\"/venues/{}\">{}</a></h5></div>\n",
                escape(show.artist_image_link.as_deref().unwrap_or(DEFAULT_ARTIST_IMAGE)),
                escape(&display_time(&show.start_time)),
                show.artist_id,
                escape(&show.artist_name),
                show.venue_id,
                escape(&show.venue_name)
            )
        })
        .collect();
    format!("<div class=\"shows\">\n{cards}</div>")
}

pub fn venue_form_page(heading: &str, action: &str, form: &VenueForm) -> String {
    let mut html = format!(
        "<h3>{}</h3>\n<form method=\"post\" action=\"{}\">\n",
        escape(heading),
        escape(action)
    );
    html.push_str(&text_input("name", "Name", form.name.as_deref()));
    html.push_str(&text_input("city", "City", form.city.as_deref()));
    html.push_str(&text_input("state", "State", form.state.as_deref()));
    html.push_str(&text_input("address", "Address", form.address.as_deref()));
    html.push_str(&text_input("phone", "Phone", form.phone.as_deref()));
    html.push_str(&genre_select(&form.genres));
    html.push_str(&text_input("image_link", "Image Link", form.image_link.as_deref()));
    html.push_str(&text_input("website", "Website", form.website.as_deref()));
    html.push_str(&text_input(
        "facebook_link",
        "Facebook Link",
        form.facebook_link.as_deref(),
    ));
    html.push_str(&checkbox(
        "seeking_talent",
        "Looking for Talent",
        form.seeking_talent.is_some(),
    ));
    html.push_str(&text_input(
        "seeking_description",
        "Seeking Description",
        form.seeking_description.as_deref(),
    ));
    html.push_str("<input type=\"submit\" value=\"Submit\">\n</form>");
    html
}

pub fn artist_form_page(heading: &str, action: &str, form: &ArtistForm) -> String {
    let mut html = format!(
        "<h3>{}</h3>\n<form method=\"post\" action=\"{}\">\n",
        escape(heading),
        escape(action)
    );
    html.push_str(&text_input("name", "Name", form.name.as_deref()));
    html.push_str(&text_input("city", "City", form.city.as_deref()));
    html.push_str(&text_input("state", "State", form.state.as_deref()));
    html.push_str(&text_input("phone", "Phone", form.phone.as_deref()));
    html.push_str(&genre_select(&form.genres));
    html.push_str(&text_input("image_link", "Image Link", form.image_link.as_deref()));
    html.push_str(&text_input("website", "Website", form.website.as_deref()));
    html.push_str(&text_input(
        "facebook_link",
        "Facebook Link",
        form.facebook_link.as_deref(),
    ));
    html.push_str(&checkbox(
        "seeking_venue",
        "Looking for Venues",
        form.seeking_venue.is_some(),
    ));
    html.push_str(&text_input(
        "seeking_description",
        "Seeking Description",
        form.seeking_description.as_deref(),
    ));
    html.push_str("<input type=\"submit\" value=\"Submit\">\n</form>");
    html
}

pub fn show_form_page(form: &ShowForm) -> String {
    let mut html =
        String::from("<h3>List a new show</h3>\n<form method=\"post\" action=\"/shows/create\">\n");
    html.push_str(&text_input("artist_id", "Artist ID", form.artist_id.as_deref()));
    html.push_str(&text_input("venue_id", "Venue ID", form.venue_id.as_deref()));
    html.push_str(&text_input(
        "start_time",
        "Start Time (YYYY-MM-DD HH:MM:SS)",
        form.start_time.as_deref(),
    ));
    html.push_str("<input type=\"submit\" value=\"Create Show\">\n</form>");
    html
}

pub fn not_found_page() -> String {
    layout(
        "Not Found",
        None,
        "<h1>404</h1>\n<p>Not found</p>\n<a href=\"/\">Back to home</a>",
    )
}

pub fn server_error_page() -> String {
    layout(
        "Server Error",
        None,
        "<h1>500</h1>\n<p>Something went wrong</p>\n<a href=\"/\">Back to home</a>",
    )
}

fn search_box(action: &str, placeholder: &str) -> String {
    format!(
        "<form class=\"search\" method=\"post\" action=\"{}\">\
         <input name=\"search_term\" placeholder=\"{}\"></form>\n",
        escape(action),
        escape(placeholder)
    )
}

fn hit_list(kind: &str, hits: &[SearchHit]) -> String {
    let items: String = hits
        .iter()
        .map(|hit| {
            format!(
                "<li><a href=\"/{}/{}\">{}</a></li>\n",
                kind,
                hit.id,
                escape(&hit.name)
            )
        })
        .collect();
    format!("<ul class=\"items\">\n{items}</ul>\n")
}

fn genre_tags(genres: &[String]) -> String {
    let tags: String = genres
        .iter()
        .map(|genre| format!("<span class=\"genre\">{}</span>", escape(genre)))
        .collect();
    format!("<div class=\"genres\">{tags}</div>")
}

fn links(website: Option<&str>, facebook_link: Option<&str>) -> String {
    [website, facebook_link]
        .into_iter()
        .flatten()
        .map(|link| format!("<p><a href=\"{0}\">{0}</a></p>\n", escape(link)))
        .collect()
}

/// Start times are rendered long-form; anything unparseable is shown as stored.
fn display_time(start_time: &str) -> String {
    schedule::parse_start_time(start_time)
        .map(|start_time| schedule::display_start_time(&start_time))
        .unwrap_or_else(|_| start_time.to_string())
}

fn show_card(image_link: &str, href: &str, name: &str, start_time: &str) -> String {
    format!(
        "<div class=\"show\"><img src=\"{}\" alt=\"Show Image\">\
         <h5><a href=\"{}\">{}</a></h5><h6>{}</h6></div>\n",
        escape(image_link),
        escape(href),
        escape(name),
        escape(&display_time(start_time))
    )
}

fn profile_actions(path: &str) -> String {
    format!(
        "<a href=\"{0}/edit\">Edit</a>\n<button data-delete=\"{0}\">Delete</button>",
        escape(path)
    )
}

fn seeking(seeking: bool, what: &str, description: Option<&str>) -> String {
    if seeking {
        format!(
            "<div class=\"seeking\"><p>Currently seeking {}</p><p>{}</p></div>\n",
            what,
            escape(description.unwrap_or_default())
        )
    } else {
        format!("<p class=\"not-seeking\">Not currently seeking {what}</p>\n")
    }
}

fn text_input(name: &str, label: &str, value: Option<&str>) -> String {
    format!(
        "<label>{label}<input type=\"text\" name=\"{name}\" value=\"{}\"></label>\n",
        escape(value.unwrap_or_default())
    )
}

fn checkbox(name: &str, label: &str, checked: bool) -> String {
    format!(
        "<label>{label}<input type=\"checkbox\" name=\"{name}\" value=\"y\"{}></label>\n",
        if checked { " checked" } else { "" }
    )
}

fn genre_select(selected: &[String]) -> String {
    let options: String = GENRES
        .iter()
        .map(|genre| {
            let is_selected = selected.iter().any(|s| s == genre);
            format!(
                "<option value=\"{0}\"{1}>{0}</option>\n",
                escape(genre),
                if is_selected { " selected" } else { "" }
            )
        })
        .collect();
    format!("<label>Genres<select name=\"genres\" multiple>\n{options}</select></label>\n")
}
