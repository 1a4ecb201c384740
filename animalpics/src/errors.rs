use crate::acquisition::{AcquisitionError, SaveError};
use crate::db::errors::DbError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Invalid request data, e.g. an unknown animal type or out-of-range count
    #[error("{message}")]
    BadRequest { message: String },

    /// Requested resource not found
    #[error("{resource} {id} not found")]
    NotFound { resource: String, id: String },

    /// Generic internal service error
    #[error("Failed to {operation}")]
    Internal { operation: String },

    /// Database operation error
    #[error(transparent)]
    Database(#[from] DbError),

    /// Picture acquisition error
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Acquisition(acq_err) => match acq_err {
                AcquisitionError::UnsupportedAnimalType(_) => StatusCode::BAD_REQUEST,
                AcquisitionError::Download { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::BadRequest { message } => message.clone(),
            Error::NotFound { resource, id } => format!("{resource} {id} not found"),
            Error::Acquisition(AcquisitionError::UnsupportedAnimalType(animal_type)) => {
                format!(
                    "Unsupported animal type '{animal_type}'. Supported types: {}",
                    crate::types::AnimalType::supported()
                )
            }
            Error::Internal { .. } | Error::Database(_) | Error::Acquisition(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details for debugging - different log levels based on severity
        match &self {
            Error::Database(_) | Error::Internal { .. } => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::Acquisition(AcquisitionError::Download { url, source }) => {
                tracing::error!(%url, error = %source, "Picture acquisition failed");
            }
            Error::BadRequest { .. } | Error::NotFound { .. } | Error::Acquisition(_) => {
                tracing::debug!("Client error: {}", self);
            }
        }

        (self.status_code(), self.user_message()).into_response()
    }
}

impl From<SaveError> for Error {
    fn from(err: SaveError) -> Self {
        match err {
            SaveError::Acquisition(e) => Error::Acquisition(e),
            SaveError::Database(e) => Error::Database(e),
            e @ SaveError::NothingSaved { .. } => Error::Internal {
                operation: format!("save pictures: {e}"),
            },
        }
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;
