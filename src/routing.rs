use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use thiserror::Error;

use crate::auth::guard::Policy;
use crate::error::Error as AppError;
use crate::request::Request;
use crate::response::Response;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
        }
    }
}

pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<Response, AppError>> + Send>>;

/// A registered request handler. Built by the controllers, invoked by the
/// dispatch pipeline after the route's policy has passed.
pub type Handler = Arc<dyn Fn(Request) -> HandlerFuture + Send + Sync>;

/// Route-table construction failure. Registration happens once at startup,
/// so these abort the process rather than shadow routes silently.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouterError {
    #[error("duplicate route: {method} {pattern}")]
    DuplicateRoute { method: &'static str, pattern: String },
}

/// Resolution outcome when no handler runs.
#[derive(Debug, PartialEq, Eq)]
pub enum ResolveError {
    RouteNotFound,
    MethodNotAllowed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A slash-delimited path template mixing literal and `:name` segments.
#[derive(Debug, Clone)]
struct Pattern {
    raw: String,
    segments: Vec<Segment>,
}

impl Pattern {
    fn parse(pattern: &str) -> Self {
        let segments = split_segments(pattern)
            .into_iter()
            .map(|s| match s.strip_prefix(':') {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Literal(s.to_string()),
            })
            .collect();
        Pattern {
            raw: pattern.to_string(),
            segments,
        }
    }

    /// Full match: equal segment counts, literals equal, params capture any
    /// non-empty segment.
    fn matches(&self, path: &[&str]) -> Option<HashMap<String, String>> {
        if self.segments.len() != path.len() {
            return None;
        }
        let mut params = HashMap::new();
        for (segment, value) in self.segments.iter().zip(path) {
            match segment {
                Segment::Literal(lit) if lit == value => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => {
                    params.insert(name.clone(), (*value).to_string());
                }
            }
        }
        Some(params)
    }

    /// Two patterns collide when every segment pair is either equal literals
    /// or two params, regardless of param names. A later registration of a
    /// colliding pattern could never be reached.
    fn collides_with(&self, other: &Pattern) -> bool {
        self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|(a, b)| match (a, b) {
                    (Segment::Literal(x), Segment::Literal(y)) => x == y,
                    (Segment::Param(_), Segment::Param(_)) => true,
                    _ => false,
                })
    }
}

struct Route {
    pattern: Pattern,
    policy: Policy,
    handler: Handler,
}

/// A successful resolution: the handler to run, its route policy, and the
/// captured path parameters.
pub struct RouteMatch<'r> {
    pub handler: &'r Handler,
    pub policy: &'r Policy,
    pub params: HashMap<String, String>,
}

/// Ordered, per-method route table.
///
/// Matching is attempted in registration order and the first full match
/// wins. A parameterized route that shares a prefix with a literal route
/// (`/projects/:id` vs `/projects/new`) must therefore be registered after
/// the literal one; registering the same shape twice is rejected outright.
///
/// The table is built single-threaded at startup and read-only afterwards,
/// so resolution is safe under arbitrary concurrent callers.
#[derive(Default)]
pub struct Router {
    routes: HashMap<Method, Vec<Route>>,
}

impl Router {
    pub fn new() -> Self {
        Router {
            routes: HashMap::new(),
        }
    }

    /// Register a handler for `(method, pattern)` under the given policy.
    pub fn register(
        &mut self,
        method: Method,
        pattern: &str,
        policy: Policy,
        handler: Handler,
    ) -> Result<(), RouterError> {
        let pattern = Pattern::parse(pattern);
        let routes = self.routes.entry(method).or_default();
        if routes.iter().any(|r| r.pattern.collides_with(&pattern)) {
            return Err(RouterError::DuplicateRoute {
                method: method.as_str(),
                pattern: pattern.raw,
            });
        }
        routes.push(Route {
            pattern,
            policy,
            handler,
        });
        Ok(())
    }

    /// Resolve `(method, path)` to the first matching route.
    ///
    /// Pure with respect to the built table: identical inputs always yield
    /// identical outcomes. A path whose shape matches some route under a
    /// different method reports `MethodNotAllowed` instead of a blanket
    /// not-found.
    pub fn resolve(&self, method: Method, path: &str) -> Result<RouteMatch<'_>, ResolveError> {
        let segments = split_segments(path);

        if let Some(routes) = self.routes.get(&method) {
            for route in routes {
                if let Some(params) = route.pattern.matches(&segments) {
                    return Ok(RouteMatch {
                        handler: &route.handler,
                        policy: &route.policy,
                        params,
                    });
                }
            }
        }

        let shape_matches_elsewhere = self
            .routes
            .iter()
            .filter(|(m, _)| **m != method)
            .flat_map(|(_, routes)| routes)
            .any(|route| route.pattern.matches(&segments).is_some());

        if shape_matches_elsewhere {
            Err(ResolveError::MethodNotAllowed)
        } else {
            Err(ResolveError::RouteNotFound)
        }
    }

    // Convenience methods, registration-order preserving.
    pub fn get(&mut self, pattern: &str, policy: Policy, handler: Handler) -> Result<(), RouterError> {
        self.register(Method::Get, pattern, policy, handler)
    }
    pub fn post(&mut self, pattern: &str, policy: Policy, handler: Handler) -> Result<(), RouterError> {
        self.register(Method::Post, pattern, policy, handler)
    }
    pub fn put(&mut self, pattern: &str, policy: Policy, handler: Handler) -> Result<(), RouterError> {
        self.register(Method::Put, pattern, policy, handler)
    }
    pub fn delete(&mut self, pattern: &str, policy: Policy, handler: Handler) -> Result<(), RouterError> {
        self.register(Method::Delete, pattern, policy, handler)
    }
}

/// Normalize a path or pattern into its non-empty segments: leading and
/// trailing slashes drop out, empty segments collapse.
fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}
