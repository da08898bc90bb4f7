use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::error::BookingError;
use crate::http_server::views;

/// Failure of a page request: either the 404 page or the 500 page.
#[derive(Debug)]
pub enum PageError {
    NotFound,
    Internal(BookingError),
}

impl From<BookingError> for PageError {
    fn from(err: BookingError) -> Self {
        if err.is_not_found() {
            log::debug!("{err}");
            Self::NotFound
        } else {
            Self::Internal(err)
        }
    }
}

// Tell axum how to convert `PageError` into a response.
impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            PageError::NotFound => {
                (StatusCode::NOT_FOUND, Html(views::not_found_page())).into_response()
            }
            PageError::Internal(err) => {
                log::error!("Request failed: {err:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(views::server_error_page()),
                )
                    .into_response()
            }
        }
    }
}

pub type PageResult<T> = Result<T, PageError>;

/// Path ids that are not integers name no row at all.
pub fn parse_id(raw: &str) -> PageResult<i64> {
    raw.parse().map_err(|_| PageError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::DbErr;

    #[test]
    fn test_not_found_maps_to_404() {
        let response = PageError::from(BookingError::not_found("Venue", 1)).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_other_failures_map_to_500() {
        let response =
            PageError::from(BookingError::Database(DbErr::Custom("locked".into()))).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = PageError::from(BookingError::MissingLocation {
            entity: "Venue",
            id: 1,
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(matches!(parse_id("abc"), Err(PageError::NotFound)));
    }
}
