use serde_json::json;
use thiserror::Error;

use crate::response::{Response, StatusCode};

/// Standard error type for the Atelier core.
///
/// Every variant maps onto one of the response statuses the rendering layer
/// understands; nothing here is allowed to escape to the transport
/// untranslated (see [`Error::into_response`]).
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    #[error("Malformed identifier: {0}")]
    MalformedIdentifier(String),

    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Access denied")]
    AuthorizationDenied,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    DuplicateResource(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Get the response status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BadRequest,
            Error::MalformedIdentifier(_) => StatusCode::BadRequest,
            Error::AuthenticationRequired => StatusCode::Unauthorized,
            Error::AuthorizationDenied => StatusCode::Forbidden,
            Error::NotFound(_) => StatusCode::NotFound,
            Error::DuplicateResource(_) => StatusCode::BadRequest,
            Error::Internal(_) => StatusCode::InternalServerError,
        }
    }

    /// Translate this error into a response descriptor.
    ///
    /// Authentication failures redirect to the login page; everything else
    /// renders the error view. Internal detail never reaches the caller:
    /// `Internal` surfaces a generic message only.
    pub fn into_response(self) -> Response {
        match &self {
            Error::AuthenticationRequired => Response::redirect(
                StatusCode::Unauthorized,
                "Authentication required",
                "/login",
            ),
            Error::Internal(_) => Response::render(
                StatusCode::InternalServerError,
                "Something went wrong",
                "errorView",
            )
            .with_payload(json!({ "errorMessage": "Something went wrong." })),
            _ => {
                let message = self.to_string();
                Response::render(self.status_code(), &message, "errorView")
                    .with_payload(json!({ "errorMessage": message }))
            }
        }
    }
}
