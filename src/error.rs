use mongodb::bson;
use rocket::http::Status;
use rocket::response::{self, status::Custom, Responder};
use rocket::serde::json::Json;
use rocket::Request;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error};

/// Failures raised while reading or writing event documents.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Database(#[from] mongodb::error::Error),

    #[error("{0}")]
    Serialize(#[from] bson::ser::Error),

    #[error("{0}")]
    Malformed(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned to API callers as `{"detail": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid event ID format")]
    InvalidId,

    #[error("Event not found")]
    NotFound,

    #[error("{context}: {source}")]
    InvalidPayload {
        context: &'static str,
        source: StoreError,
    },

    #[error("{context}: {source}")]
    Store {
        context: &'static str,
        source: StoreError,
    },
}

impl ApiError {
    /// Maps a store failure to a client error, e.g. a rejected write.
    pub fn invalid(context: &'static str) -> impl FnOnce(StoreError) -> ApiError {
        move |source| ApiError::InvalidPayload { context, source }
    }

    /// Maps a store failure to a server error.
    pub fn store(context: &'static str) -> impl FnOnce(StoreError) -> ApiError {
        move |source| ApiError::Store { context, source }
    }

    pub fn status(&self) -> Status {
        match self {
            ApiError::InvalidId | ApiError::InvalidPayload { .. } => Status::BadRequest,
            ApiError::NotFound => Status::NotFound,
            ApiError::Store { .. } => Status::InternalServerError,
        }
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status();
        let detail = self.to_string();
        if status.code >= 500 {
            error!(method = %request.method(), uri = %request.uri(), %detail, "request failed");
        } else {
            debug!(method = %request.method(), uri = %request.uri(), %status, %detail, "request rejected");
        }

        Custom(status, Json(json!({ "detail": detail }))).respond_to(request)
    }
}
