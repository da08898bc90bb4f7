use std::sync::Arc;

use axum::{
    extract::State,
    response::{Html, Redirect},
};
use axum_extra::extract::{Form, FormRejection, cookie::CookieJar};

use crate::error::BookingError;
use crate::http_server::error::PageResult;
use crate::http_server::forms::ShowForm;
use crate::http_server::http_routes::render;
use crate::http_server::{flash, state::AppState, views};
use crate::services::show::ShowService;

pub async fn list_shows(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
) -> PageResult<(CookieJar, Html<String>)> {
    let shows = ShowService::new(app_state.db.clone()).list().await?;
    Ok(render(jar, "Shows", &views::shows_page(&shows)))
}

pub async fn create_show_form(jar: CookieJar) -> (CookieJar, Html<String>) {
    render(jar, "New Show", &views::show_form_page(&ShowForm::default()))
}

pub async fn create_show_submission(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
    form: Result<Form<ShowForm>, FormRejection>,
) -> (CookieJar, Redirect) {
    let new_show = form
        .map_err(|rejection| BookingError::InvalidForm(rejection.to_string()))
        .and_then(|Form(form)| form.into_new_show());
    let outcome = match new_show {
        Ok(new_show) => ShowService::new(app_state.db.clone()).create(new_show).await,
        Err(err) => Err(err),
    };

    let message = match outcome {
        Ok(_) => "Show was successfully listed!",
        Err(err) => {
            log::error!("Failed to create show: {}", err);
            "An error occurred. Show could not be listed."
        }
    };

    (flash::set(jar, message), Redirect::to("/"))
}
