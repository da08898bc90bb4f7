pub mod artists;
pub mod pages;
pub mod shows;
pub mod venues;

use axum::response::Html;
use axum_extra::extract::cookie::CookieJar;

use crate::http_server::{flash, views};

/// Wrap `body` in the page layout, consuming any pending flash message.
pub fn render(jar: CookieJar, title: &str, body: &str) -> (CookieJar, Html<String>) {
    let (jar, message) = flash::take(jar);
    (jar, Html(views::layout(title, message.as_deref(), body)))
}
