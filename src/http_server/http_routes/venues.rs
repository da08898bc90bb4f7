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
use crate::http_server::forms::{SearchForm, VenueForm};
use crate::http_server::http_routes::render;
use crate::http_server::{flash, state::AppState, views};
use crate::services::schedule;
use crate::services::venue::VenueService;

pub async fn list_venues(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
) -> PageResult<(CookieJar, Html<String>)> {
    let areas = VenueService::new(app_state.db.clone())
        .list_by_area()
        .await?;
    Ok(render(jar, "Venues", &views::venues_page(&areas)))
}

pub async fn search_venues(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
    form: Result<Form<SearchForm>, FormRejection>,
) -> PageResult<(CookieJar, Html<String>)> {
    let Form(form) =
        form.map_err(|rejection| BookingError::InvalidForm(rejection.to_string()))?;
    let results = VenueService::new(app_state.db.clone())
        .search(&form.search_term)
        .await?;
    Ok(render(
        jar,
        "Venue Search",
        &views::search_page("venues", &form.search_term, &results),
    ))
}

pub async fn show_venue(
    State(app_state): State<Arc<AppState>>,
    Path(venue_id): Path<String>,
    jar: CookieJar,
) -> PageResult<(CookieJar, Html<String>)> {
    let venue_id = parse_id(&venue_id)?;
    let venue = VenueService::new(app_state.db.clone())
        .detail(venue_id, schedule::now())
        .await?;
    Ok(render(jar, &venue.name, &views::venue_page(&venue)))
}

pub async fn create_venue_form(jar: CookieJar) -> (CookieJar, Html<String>) {
    render(
        jar,
        "New Venue",
        &views::venue_form_page("List a new venue", "/venues/create", &VenueForm::default()),
    )
}

pub async fn create_venue_submission(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
    form: Result<Form<VenueForm>, FormRejection>,
) -> (CookieJar, Redirect) {
    let (name, new_venue) = match form {
        Ok(Form(form)) => (form.display_name().to_string(), form.into_new_venue()),
        Err(rejection) => (
            String::new(),
            Err(BookingError::InvalidForm(rejection.to_string())),
        ),
    };
    let outcome = match new_venue {
        Ok(new_venue) => VenueService::new(app_state.db.clone()).create(new_venue).await,
        Err(err) => Err(err),
    };

    let message = match outcome {
        Ok(venue) => format!("Venue {} was successfully listed!", venue.name),
        Err(err) => {
            log::error!("Failed to create venue '{}': {}", name, err);
            format!("An error occurred. Venue {name} could not be listed.")
        }
    };

    (flash::set(jar, &message), Redirect::to("/"))
}

/// Always acknowledges success; failures are only logged.
pub async fn delete_venue(
    State(app_state): State<Arc<AppState>>,
    Path(venue_id): Path<String>,
    jar: CookieJar,
) -> (CookieJar, Json<Value>) {
    match parse_id(&venue_id) {
        Ok(id) => match VenueService::new(app_state.db.clone()).delete(id).await {
            Ok(()) => {}
            Err(err) if err.is_not_found() => log::warn!("Delete matched nothing: {err}"),
            Err(err) => log::error!("Failed to delete venue {}: {:?}", id, err),
        },
        Err(_) => log::warn!("Delete of venue with invalid id {venue_id:?}"),
    }

    (
        flash::set(jar, "Venue deleted!"),
        Json(json!({ "success": true })),
    )
}

pub async fn edit_venue(
    State(app_state): State<Arc<AppState>>,
    Path(venue_id): Path<String>,
    jar: CookieJar,
) -> PageResult<(CookieJar, Html<String>)> {
    let venue_id = parse_id(&venue_id)?;
    let (venue, location) = VenueService::new(app_state.db.clone())
        .get_with_location(venue_id)
        .await?;

    let heading = format!("Edit venue {}", venue.name);
    let form = VenueForm::from_model(venue, location);
    Ok(render(
        jar,
        "Edit Venue",
        &views::venue_form_page(&heading, &format!("/venues/{venue_id}/edit"), &form),
    ))
}

pub async fn edit_venue_submission(
    State(app_state): State<Arc<AppState>>,
    Path(venue_id): Path<String>,
    jar: CookieJar,
    form: Result<Form<VenueForm>, FormRejection>,
) -> PageResult<(CookieJar, Redirect)> {
    let venue_id = parse_id(&venue_id)?;
    let changes = form
        .map_err(|rejection| BookingError::InvalidForm(rejection.to_string()))
        .and_then(|Form(form)| form.into_new_venue());
    let outcome = match changes {
        Ok(changes) => {
            VenueService::new(app_state.db.clone())
                .update(venue_id, changes)
                .await
        }
        Err(err) => Err(err),
    };

    let message = match outcome {
        Ok(_) => "Venue updated!",
        Err(err) => {
            log::error!("Failed to update venue {}: {}", venue_id, err);
            "Nothing changed."
        }
    };

    Ok((
        flash::set(jar, message),
        Redirect::to(&format!("/venues/{venue_id}")),
    ))
}
