use sea_orm::DbErr;

/// Failure of a directory query or mutation.
///
/// `NotFound` is the only variant that means "the requested row does not
/// exist". Everything else is an operation failure and should be treated
/// as such by callers.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[error("Malformed form body: {0}")]
    InvalidForm(String),
    #[error("Missing form field: {0}")]
    MissingField(&'static str),
    #[error("Invalid value for form field {0}: {1:?}")]
    InvalidField(&'static str, String),
    #[error("Invalid show start time: {0:?}")]
    InvalidStartTime(String),
    #[error("{entity} {id} references a location that does not exist")]
    MissingLocation { entity: &'static str, id: i64 },
    #[error("Location {0} is still referenced by a venue or artist")]
    LocationInUse(i64),
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl BookingError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type BookingResult<T> = Result<T, BookingError>;
