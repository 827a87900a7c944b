use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session_id";

/// A typed name/value pair with transport attributes. No behavior beyond
/// serialization; attached to a Response and round-tripped on the next
/// request's header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub path: Option<String>,
    pub http_only: bool,
    pub expires: Option<DateTime<Utc>>,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Cookie {
            name: name.into(),
            value: value.into(),
            path: None,
            http_only: false,
            expires: None,
        }
    }

    /// The session cookie: http-only, scoped to `/`.
    pub fn session(token: impl Into<String>, expires: DateTime<Utc>) -> Self {
        Cookie {
            name: SESSION_COOKIE.to_string(),
            value: token.into(),
            path: Some("/".to_string()),
            http_only: true,
            expires: Some(expires),
        }
    }

    /// A cookie that instructs the client to drop `name` (epoch expiry).
    pub fn cleared(name: impl Into<String>) -> Self {
        Cookie {
            name: name.into(),
            value: "deleted".to_string(),
            path: Some("/".to_string()),
            http_only: true,
            expires: Some(Utc.timestamp_opt(0, 0).unwrap()),
        }
    }

    /// Serialize into a `Set-Cookie` header value.
    pub fn to_header_value(&self) -> String {
        let mut out = format!("{}={}", self.name, self.value);
        if let Some(expires) = self.expires {
            out.push_str("; Expires=");
            out.push_str(&expires.format("%a, %d %b %Y %H:%M:%S GMT").to_string());
        }
        if let Some(path) = &self.path {
            out.push_str("; Path=");
            out.push_str(path);
        }
        if self.http_only {
            out.push_str("; HttpOnly");
        }
        out
    }
}

/// Parse a `Cookie` request header into name/value pairs. Malformed pairs
/// are skipped, never an error.
pub fn parse_cookie_header(header: &str) -> HashMap<String, String> {
    header
        .split(';')
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), value.to_string()))
        })
        .collect()
}
