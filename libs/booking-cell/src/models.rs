use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use shared_models::error::AppError;

/// Outcome of detaching a removed practitioner from a clinic's bookings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetachResult {
    pub detached_count: i64,
    pub booking_ids: Vec<Uuid>,
}

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Booking service unavailable: {0}")]
    Unavailable(String),

    #[error("Booking service protocol error: {0}")]
    Protocol(String),
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::Unavailable(msg) => AppError::ServiceUnavailable(msg),
            BookingError::Protocol(msg) => AppError::Internal(msg),
        }
    }
}
