//! Errors raised by the StormGlass client.

use serde_json::Value;
use thiserror::Error;

use crate::http::{BoxError, HttpError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The service answered with an error status.
    Response,
    /// The request never produced a usable response.
    Request,
}

#[derive(Error, Debug)]
pub enum StormGlassError {
    #[error("Unexpected error returned by the StormGlass service: Error: {body} Code: {status}")]
    Response {
        status: u16,
        /// Serialized JSON body of the error response.
        body: String,
        #[source]
        source: HttpError,
    },

    #[error("Unexpected error when trying to communicate to StormGlass: {detail}")]
    Request {
        detail: String,
        #[source]
        source: BoxError,
    },
}

impl StormGlassError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Response { .. } => ErrorKind::Response,
            Self::Request { .. } => ErrorKind::Request,
        }
    }

    /// Status code returned by the service, for response errors only.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Response { status, .. } => Some(*status),
            Self::Request { .. } => None,
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status() == Some(429)
    }

    pub(crate) fn request(source: impl Into<BoxError>) -> Self {
        let source = source.into();
        Self::Request { detail: describe_chain(source.as_ref()), source }
    }
}

impl From<HttpError> for StormGlassError {
    fn from(err: HttpError) -> Self {
        if let HttpError::Status { status, body } = &err {
            let (status, body) = (*status, serialize_body(body));
            return Self::Response { status, body, source: err };
        }

        Self::request(err)
    }
}

fn serialize_body(body: &Value) -> String {
    // Serializing a `Value` cannot fail.
    serde_json::to_string(body).unwrap_or_default()
}

fn describe_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut detail = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        detail.push_str(": ");
        detail.push_str(&cause.to_string());
        source = cause.source();
    }
    detail
}
