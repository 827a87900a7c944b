use std::sync::Arc;

use serde_json::json;

use crate::auth::guard;
use crate::auth::session::SessionStore;
use crate::colors::ColorClient;
use crate::config::Config;
use crate::controllers::{self, AppState};
use crate::models::{MemoryProjectStore, MemoryTodoStore, MemoryUserStore};
use crate::request::Request;
use crate::response::{Response, StatusCode};
use crate::routing::{Method, ResolveError, Router, RouterError};

/// The assembled application: configuration, session store, resource
/// stores, and the route table.
///
/// Construction is the single-threaded startup phase — controllers register
/// their routes here, and a duplicate registration aborts with an error
/// instead of shadowing. After that the app is immutable; [`App::handle`]
/// is safe under arbitrary concurrent callers.
pub struct App {
    state: AppState,
    router: Router,
}

impl App {
    /// Build an app over the in-memory reference stores.
    pub fn new(config: Config) -> Result<Self, RouterError> {
        let config = Arc::new(config);
        let state = AppState {
            sessions: Arc::new(SessionStore::new(config.session_ttl_hours)),
            users: Arc::new(MemoryUserStore::new()),
            projects: Arc::new(MemoryProjectStore::new()),
            todos: Arc::new(MemoryTodoStore::new()),
            colors: Arc::new(ColorClient::new(&config)),
            config,
        };
        Self::with_state(state)
    }

    /// Build an app over caller-supplied collaborators.
    pub fn with_state(state: AppState) -> Result<Self, RouterError> {
        let mut router = Router::new();
        controllers::users::register_routes(&mut router, state.clone())?;
        controllers::projects::register_routes(&mut router, state.clone())?;
        controllers::todos::register_routes(&mut router, state.clone())?;
        Ok(App { state, router })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Handle one logical request: resolve the route, assemble the request
    /// (session included), run the route's policy, run the handler, and
    /// translate any error into a response descriptor. Nothing propagates
    /// to the transport.
    pub async fn handle(
        &self,
        method: Method,
        target: &str,
        cookie_header: Option<&str>,
        body: Option<&str>,
    ) -> Response {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (target, None),
        };

        let matched = match self.router.resolve(method, path) {
            Ok(matched) => matched,
            Err(ResolveError::RouteNotFound) => {
                tracing::debug!(method = method.as_str(), path, "no route");
                return Response::render(StatusCode::NotFound, "Page not found", "errorView")
                    .with_payload(json!({ "errorMessage": "Page not found." }));
            }
            Err(ResolveError::MethodNotAllowed) => {
                tracing::debug!(method = method.as_str(), path, "method not allowed");
                return Response::render(
                    StatusCode::MethodNotAllowed,
                    "Method not allowed",
                    "errorView",
                )
                .with_payload(json!({ "errorMessage": "Method not allowed." }));
            }
        };

        let session = self.state.sessions.resolve(cookie_header);
        tracing::debug!(
            method = method.as_str(),
            path,
            authenticated = session.is_authenticated(),
            "dispatch"
        );

        let mut request = Request::new(method, path, matched.params, query, cookie_header, body, session);

        let outcome = match guard::authorize(matched.policy, &request).await {
            Ok(Some(loaded)) => {
                request.attach_resource(loaded);
                (matched.handler)(request).await
            }
            Ok(None) => (matched.handler)(request).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(response) => response,
            Err(err) => {
                match err.status_code() {
                    StatusCode::InternalServerError => {
                        tracing::error!(path, "request failed: {}", err)
                    }
                    StatusCode::Unauthorized | StatusCode::Forbidden => {
                        tracing::warn!(path, "request denied: {}", err)
                    }
                    _ => tracing::debug!(path, "request rejected: {}", err),
                }
                err.into_response()
            }
        }
    }
}
