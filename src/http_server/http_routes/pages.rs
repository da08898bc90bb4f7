use axum::response::Html;
use axum_extra::extract::cookie::CookieJar;

use crate::http_server::error::PageError;
use crate::http_server::http_routes::render;
use crate::http_server::views;

pub async fn home(jar: CookieJar) -> (CookieJar, Html<String>) {
    render(jar, "Home", &views::home_page())
}

pub async fn not_found() -> PageError {
    PageError::NotFound
}
