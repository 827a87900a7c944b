use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::auth::cookie::Cookie;

/// Response statuses the rendering layer understands.
///
/// Serializes as the numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok,
    Created,
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    MethodNotAllowed,
    InternalServerError,
}

impl StatusCode {
    pub fn as_u16(self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::Created => 201,
            StatusCode::BadRequest => 400,
            StatusCode::Unauthorized => 401,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
            StatusCode::InternalServerError => 500,
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, StatusCode::Ok | StatusCode::Created)
    }
}

impl Serialize for StatusCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.as_u16())
    }
}

/// Structured outcome descriptor consumed by the rendering layer.
///
/// Exactly one of `template` or `redirect` is set — the constructors are the
/// only way the rest of the crate builds one, so the invariant holds by
/// construction. `payload` carries template data; `cookies` are attached to
/// the outgoing call by the transport.
#[derive(Debug, Serialize)]
pub struct Response {
    pub status: StatusCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    #[serde(skip)]
    pub cookies: Vec<Cookie>,
}

impl Response {
    /// A response that renders the named template.
    pub fn render(status: StatusCode, message: impl Into<String>, template: impl Into<String>) -> Self {
        Response {
            status,
            message: message.into(),
            payload: None,
            template: Some(template.into()),
            redirect: None,
            cookies: Vec::new(),
        }
    }

    /// A response that redirects the caller to `location`.
    pub fn redirect(status: StatusCode, message: impl Into<String>, location: impl Into<String>) -> Self {
        Response {
            status,
            message: message.into(),
            payload: None,
            template: None,
            redirect: Some(location.into()),
            cookies: Vec::new(),
        }
    }

    /// Attach a payload for the template.
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Attach a cookie to round-trip on the next request.
    pub fn with_cookie(mut self, cookie: Cookie) -> Self {
        self.cookies.push(cookie);
        self
    }

    /// Look up a field of the payload, if any.
    pub fn payload_field(&self, key: &str) -> Option<&Value> {
        self.payload.as_ref().and_then(|p| p.get(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_numbers() {
        assert_eq!(StatusCode::Ok.as_u16(), 200);
        assert_eq!(StatusCode::Created.as_u16(), 201);
        assert_eq!(StatusCode::BadRequest.as_u16(), 400);
        assert_eq!(StatusCode::Unauthorized.as_u16(), 401);
        assert_eq!(StatusCode::Forbidden.as_u16(), 403);
        assert_eq!(StatusCode::NotFound.as_u16(), 404);
        assert_eq!(StatusCode::MethodNotAllowed.as_u16(), 405);
    }

    #[test]
    fn render_and_redirect_are_exclusive() {
        let rendered = Response::render(StatusCode::Ok, "ok", "projectListView");
        assert!(rendered.template.is_some());
        assert!(rendered.redirect.is_none());

        let redirected = Response::redirect(StatusCode::Created, "created", "/projects");
        assert!(redirected.template.is_none());
        assert_eq!(redirected.redirect.as_deref(), Some("/projects"));
    }
}
