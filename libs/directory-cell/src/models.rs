use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use shared_models::error::AppError;

/// Identity record owned by the Practitioner Directory. This subsystem
/// only references it, never writes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Practitioner {
    pub id: Uuid,
    pub practitioner_code: String,
    pub full_name: String,
    pub specializations: Vec<String>,
    pub is_active: bool,
}

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Practitioner not found: {0}")]
    NotFound(String),

    #[error("Directory unavailable: {0}")]
    Unavailable(String),

    #[error("Directory protocol error: {0}")]
    Protocol(String),
}

impl From<DirectoryError> for AppError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::NotFound(msg) => AppError::NotFound(msg),
            DirectoryError::Unavailable(msg) => AppError::ServiceUnavailable(msg),
            DirectoryError::Protocol(msg) => AppError::Internal(msg),
        }
    }
}
