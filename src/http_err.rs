use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use crate::ledger::commands::TransactionCommandError;
use crate::ledger::domain::transactions::NewTransactionError;
use crate::notes::commands::NoteCommandError;
use crate::notes::domain::NewNoteError;
use crate::stp::domain::StpError;

#[derive(Serialize)]
pub struct ErrorRep {
    pub message: String,
}

pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    UnprocessableEntity(String),
    Conflict(String),
    InternalServerError,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message),
            Self::UnprocessableEntity(message) => (StatusCode::UNPROCESSABLE_ENTITY, message),
            Self::Conflict(message) => (StatusCode::CONFLICT, message),
            Self::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error.".to_owned(),
            ),
        };

        (status, Json(ErrorRep { message })).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(error: anyhow::Error) -> Self {
        error!(?error, "Received error.");

        Self::InternalServerError
    }
}

impl From<StpError> for ApiError {
    fn from(error: StpError) -> Self {
        match error {
            StpError::InvalidTransaction(message) => Self::BadRequest(message),
            StpError::InsufficientBalance(message) => Self::UnprocessableEntity(message),
            StpError::NotFound(message) => Self::NotFound(message),
            StpError::Conflict(message) => Self::Conflict(message),
            StpError::Database(error) => {
                error!(?error, "STP operation failed.");

                Self::InternalServerError
            }
        }
    }
}

impl From<NewTransactionError> for ApiError {
    fn from(error: NewTransactionError) -> Self {
        Self::BadRequest(error.to_string())
    }
}

impl From<TransactionCommandError> for ApiError {
    fn from(error: TransactionCommandError) -> Self {
        match error {
            TransactionCommandError::ClientNotFound => Self::NotFound("Client not found.".to_owned()),
            TransactionCommandError::TransactionNotFound => {
                Self::NotFound("Transaction not found.".to_owned())
            }
            TransactionCommandError::Database(error) => {
                error!(?error, "Transaction command failed.");

                Self::InternalServerError
            }
        }
    }
}

impl From<NewNoteError> for ApiError {
    fn from(error: NewNoteError) -> Self {
        Self::BadRequest(error.to_string())
    }
}

impl From<NoteCommandError> for ApiError {
    fn from(error: NoteCommandError) -> Self {
        match error {
            NoteCommandError::ClientNotFound => Self::NotFound("Client not found.".to_owned()),
            NoteCommandError::NoteNotFound => Self::NotFound("Note not found.".to_owned()),
            NoteCommandError::Database(error) => {
                error!(?error, "Note command failed.");

                Self::InternalServerError
            }
        }
    }
}

pub type ApiResponse<T> = Result<T, ApiError>;
