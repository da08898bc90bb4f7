use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::{Html, Redirect},
};
use axum_extra::extract::{Form, FormRejection, cookie::CookieJar};
use serde_json::{Value, json};

use crate::error::BookingError;
use crate::http_server::error::{PageResult, parse_id};
use crate::http_server::forms::{ArtistForm, SearchForm};
use crate::http_server::http_routes::render;
use crate::http_server::{flash, state::AppState, views};
use crate::services::artist::ArtistService;
use crate::services::schedule;

pub async fn list_artists(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
) -> PageResult<(CookieJar, Html<String>)> {
    let artists = ArtistService::new(app_state.db.clone()).list().await?;
    Ok(render(jar, "Artists", &views::artists_page(&artists)))
}

pub async fn search_artists(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
    form: Result<Form<SearchForm>, FormRejection>,
) -> PageResult<(CookieJar, Html<String>)> {
    let Form(form) =
        form.map_err(|rejection| BookingError::InvalidForm(rejection.to_string()))?;
    let results = ArtistService::new(app_state.db.clone())
        .search(&form.search_term)
        .await?;
    Ok(render(
        jar,
        "Artist Search",
        &views::search_page("artists", &form.search_term, &results),
    ))
}

pub async fn show_artist(
    State(app_state): State<Arc<AppState>>,
    Path(artist_id): Path<String>,
    jar: CookieJar,
) -> PageResult<(CookieJar, Html<String>)> {
    let artist_id = parse_id(&artist_id)?;
    let artist = ArtistService::new(app_state.db.clone())
        .detail(artist_id, schedule::now())
        .await?;
    Ok(render(jar, &artist.name, &views::artist_page(&artist)))
}

pub async fn create_artist_form(jar: CookieJar) -> (CookieJar, Html<String>) {
    render(
        jar,
        "New Artist",
        &views::artist_form_page("List a new artist", "/artists/create", &ArtistForm::default()),
    )
}

pub async fn create_artist_submission(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
    form: Result<Form<ArtistForm>, FormRejection>,
) -> (CookieJar, Redirect) {
    let (name, new_artist) = match form {
        Ok(Form(form)) => (form.display_name().to_string(), form.into_new_artist()),
        Err(rejection) => (
            String::new(),
            Err(BookingError::InvalidForm(rejection.to_string())),
        ),
    };
    let outcome = match new_artist {
        Ok(new_artist) => ArtistService::new(app_state.db.clone()).create(new_artist).await,
        Err(err) => Err(err),
    };

    let message = match outcome {
        Ok(artist) => format!("Artist {} was successfully listed!", artist.name),
        Err(err) => {
            log::error!("Failed to create artist '{}': {}", name, err);
            format!("An error occurred. Artist {name} could not be listed.")
        }
    };

    (flash::set(jar, &message), Redirect::to("/"))
}

/// Always acknowledges success; failures are only logged.
pub async fn delete_artist(
    State(app_state): State<Arc<AppState>>,
    Path(artist_id): Path<String>,
    jar: CookieJar,
) -> (CookieJar, Json<Value>) {
    match parse_id(&artist_id) {
        Ok(id) => match ArtistService::new(app_state.db.clone()).delete(id).await {
            Ok(()) => {}
            Err(err) if err.is_not_found() => log::warn!("Delete matched nothing: {err}"),
            Err(err) => log::error!("Failed to delete artist {}: {:?}", id, err),
        },
        Err(_) => log::warn!("Delete of artist with invalid id {artist_id:?}"),
    }

    (
        flash::set(jar, "Artist deleted!"),
        Json(json!({ "success": true })),
    )
}

pub async fn edit_artist(
    State(app_state): State<Arc<AppState>>,
    Path(artist_id): Path<String>,
    jar: CookieJar,
) -> PageResult<(CookieJar, Html<String>)> {
    let artist_id = parse_id(&artist_id)?;
    let (artist, location) = ArtistService::new(app_state.db.clone())
        .get_with_location(artist_id)
        .await?;

    let heading = format!("Edit artist {}", artist.name);
    let form = ArtistForm::from_model(artist, location);
    Ok(render(
        jar,
        "Edit Artist",
        &views::artist_form_page(&heading, &format!("/artists/{artist_id}/edit"), &form),
    ))
}

pub async fn edit_artist_submission(
    State(app_state): State<Arc<AppState>>,
    Path(artist_id): Path<String>,
    jar: CookieJar,
    form: Result<Form<ArtistForm>, FormRejection>,
) -> PageResult<(CookieJar, Redirect)> {
    let artist_id = parse_id(&artist_id)?;
    let changes = form
        .map_err(|rejection| BookingError::InvalidForm(rejection.to_string()))
        .and_then(|Form(form)| form.into_new_artist());
    let outcome = match changes {
        Ok(changes) => {
            ArtistService::new(app_state.db.clone())
                .update(artist_id, changes)
                .await
        }
        Err(err) => Err(err),
    };

    let message = match outcome {
        Ok(_) => "Profile updated!",
        Err(err) => {
            log::error!("Failed to update artist {}: {}", artist_id, err);
            "Nothing changed."
        }
    };

    Ok((
        flash::set(jar, message),
        Redirect::to(&format!("/artists/{artist_id}")),
    ))
}
