//! Common request handling.
//!
//! # Responsibilities
//! - Gather request arguments from the query string and form body
//! - Typed argument access with 400 responses on bad input
//! - Map handler failures to plain text API errors
//!
//! # Design Decisions
//! - Errors are sent as the response body, text only
//! - Body arguments override query arguments of the same name

use std::collections::HashMap;

use axum::{
    extract::{FromRequest, Query, Request},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Form,
};
use serde::de::DeserializeOwned;

/// Errors returned to API clients.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Missing argument {0}")]
    MissingArgument(String),

    #[error("Invalid argument {name}: {reason}")]
    InvalidArgument { name: String, reason: String },

    #[error("{0}")]
    BadRequest(String),

    #[error("Unsupported formatter")]
    UnsupportedFormatter(String),

    #[error("{0}")]
    NotFound(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::debug!(error = %self, status = %self.status(), "API error");
        (self.status(), self.to_string()).into_response()
    }
}

/// Request arguments, from the query string and the form body.
#[derive(Debug, Clone, Default)]
pub struct Arguments(HashMap<String, String>);

impl Arguments {
    pub fn new(args: HashMap<String, String>) -> Self {
        Self(args)
    }

    /// Value of a required argument.
    pub fn required(&self, name: &str) -> Result<&str, ApiError> {
        self.optional(name)
            .ok_or_else(|| ApiError::MissingArgument(name.to_string()))
    }

    pub fn optional(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Decode an argument holding JSON, using `default` when it is absent.
    pub fn json<T: DeserializeOwned>(&self, name: &str, default: &str) -> Result<T, ApiError> {
        let raw = self.optional(name).unwrap_or(default);
        serde_json::from_str(raw).map_err(|e| ApiError::InvalidArgument {
            name: name.to_string(),
            reason: e.to_string(),
        })
    }
}

impl<S> FromRequest<S> for Arguments
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Query(mut args) = Query::<HashMap<String, String>>::try_from_uri(req.uri())
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;

        if req.method() != Method::GET && req.method() != Method::HEAD {
            let Form(body) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            args.extend(body);
        }

        Ok(Self(args))
    }
}
