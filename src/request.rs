use std::collections::HashMap;

use serde_json::Value;

use crate::auth::cookie::parse_cookie_header;
use crate::auth::guard::{Loaded, Owned};
use crate::auth::session::Session;
use crate::error::Error;
use crate::routing::Method;

/// Immutable view of an incoming call: method, path, captured params, query,
/// parsed body, cookies, and the session resolved from the cookie header.
///
/// Assembled once per request by the dispatch pipeline; handlers only read
/// from it. The one exception is the guard's resource attachment, which the
/// pipeline sets before the handler runs.
pub struct Request {
    method: Method,
    path: String,
    params: HashMap<String, String>,
    query: HashMap<String, String>,
    body: Value,
    cookies: HashMap<String, String>,
    session: Session,
    resource: Option<Loaded>,
}

impl Request {
    pub(crate) fn new(
        method: Method,
        path: &str,
        params: HashMap<String, String>,
        query: Option<&str>,
        cookie_header: Option<&str>,
        body: Option<&str>,
        session: Session,
    ) -> Self {
        Request {
            method,
            path: path.to_string(),
            params,
            query: query.map(parse_query).unwrap_or_default(),
            body: body.map(parse_body).unwrap_or(Value::Null),
            cookies: cookie_header.map(parse_cookie_header).unwrap_or_default(),
            session,
            resource: None,
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// A named path parameter captured by the route pattern.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// The `:id` path parameter as a numeric identifier.
    pub fn id_param(&self) -> Result<i64, Error> {
        let raw = self
            .param("id")
            .ok_or_else(|| Error::Internal("route without an :id parameter".to_string()))?;
        raw.parse()
            .map_err(|_| Error::MalformedIdentifier(raw.to_string()))
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    /// A string field of the parsed body, with empty strings treated as
    /// absent (form posts submit empty inputs as `""`).
    pub fn body_field(&self, name: &str) -> Option<&str> {
        self.body
            .get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The authenticated identity. Handlers behind `Authenticated` or
    /// `Owned` policies can rely on this succeeding.
    pub fn user_id(&self) -> Result<i64, Error> {
        self.session.user_id.ok_or(Error::AuthenticationRequired)
    }

    pub(crate) fn attach_resource(&mut self, loaded: Loaded) {
        self.resource = Some(loaded);
    }

    /// The resource the guard loaded and ownership-checked for this route.
    pub fn resource<T: Owned>(&self) -> Result<&T, Error> {
        self.resource
            .as_ref()
            .and_then(Loaded::downcast_ref)
            .ok_or_else(|| Error::Internal("no guarded resource of the requested type".to_string()))
    }
}

fn parse_query(query: &str) -> HashMap<String, String> {
    serde_urlencoded::from_str(query).unwrap_or_default()
}

/// Parse a raw body as JSON when it looks like JSON, urlencoded form data
/// otherwise. Unparseable bodies become `Null`; required-field validation
/// in the handlers reports the missing fields.
fn parse_body(raw: &str) -> Value {
    let trimmed = raw.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return serde_json::from_str(raw).unwrap_or(Value::Null);
    }
    match serde_urlencoded::from_str::<HashMap<String, String>>(raw) {
        Ok(fields) => Value::Object(
            fields
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect(),
        ),
        Err(_) => Value::Null,
    }
}
