//! Errors returned by the HTTP endpoints.

use crate::store::StoreError;
use rocket::http::Status;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use rocket::Request;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("The requested resource could not be found")]
    NotFound,
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Conflict(String),
    #[error("An internal server error occurred")]
    Store(#[from] StoreError),
}

/// JSON body of an error response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    errors: String,
}

impl ApiError {
    pub fn status(&self) -> Status {
        match self {
            ApiError::NotFound | ApiError::Store(StoreError::NotFound) => Status::NotFound,
            ApiError::BadRequest(_) => Status::BadRequest,
            ApiError::Conflict(_) => Status::Conflict,
            ApiError::Store(_) => Status::InternalServerError,
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for ApiError {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'o> {
        let status = self.status();
        if let ApiError::Store(e) = &self {
            log::error!("{} {} failed: {}", req.method(), req.uri(), e);
        }
        let body = match &self {
            ApiError::Store(StoreError::NotFound) => ApiError::NotFound.to_string(),
            other => other.to_string(),
        };
        (status, Json(ErrorBody { errors: body })).respond_to(req)
    }
}
