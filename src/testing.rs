use std::sync::Arc;

use serde_json::json;

use crate::app::App;
use crate::auth::cookie::SESSION_COOKIE;
use crate::auth::session::SessionStore;
use crate::colors::ColorClient;
use crate::config::Config;
use crate::controllers::AppState;
use crate::models::{MemoryProjectStore, MemoryTodoStore, MemoryUserStore};
use crate::response::{Response, StatusCode};
use crate::routing::Method;

/// A test application over the in-memory stores.
///
/// Drives [`App::handle`] directly — no socket, no renderer — which is all
/// the integration tests need:
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_register() {
///     let app = TestApp::new();
///     let cookie = app.register("alice", "secret123").await;
///     let res = app.get("/projects", Some(&cookie)).await;
///     assert_eq!(res.status, StatusCode::Ok);
/// }
/// ```
pub struct TestApp {
    pub app: App,
    pub users: Arc<MemoryUserStore>,
    pub projects: Arc<MemoryProjectStore>,
    pub todos: Arc<MemoryTodoStore>,
}

impl TestApp {
    /// Create a test app with fresh in-memory stores and the color client
    /// disabled.
    pub fn new() -> Self {
        let config = Config {
            environment: "test".to_string(),
            session_ttl_hours: 24,
            color_api: None,
        };

        let users = Arc::new(MemoryUserStore::new());
        let projects = Arc::new(MemoryProjectStore::new());
        let todos = Arc::new(MemoryTodoStore::new());

        let state = AppState {
            sessions: Arc::new(SessionStore::new(config.session_ttl_hours)),
            users: users.clone(),
            projects: projects.clone(),
            todos: todos.clone(),
            colors: Arc::new(ColorClient::disabled()),
            config: Arc::new(config),
        };

        let app = App::with_state(state).expect("failed to build test route table");

        TestApp {
            app,
            users,
            projects,
            todos,
        }
    }

    pub async fn dispatch(
        &self,
        method: Method,
        target: &str,
        cookie: Option<&str>,
        body: Option<&str>,
    ) -> Response {
        self.app.handle(method, target, cookie, body).await
    }

    pub async fn get(&self, target: &str, cookie: Option<&str>) -> Response {
        self.dispatch(Method::Get, target, cookie, None).await
    }

    pub async fn post(&self, target: &str, cookie: Option<&str>, body: &str) -> Response {
        self.dispatch(Method::Post, target, cookie, Some(body)).await
    }

    pub async fn put(&self, target: &str, cookie: Option<&str>, body: &str) -> Response {
        self.dispatch(Method::Put, target, cookie, Some(body)).await
    }

    pub async fn delete(&self, target: &str, cookie: Option<&str>) -> Response {
        self.dispatch(Method::Delete, target, cookie, None).await
    }

    /// Register an account and return its session cookie header value.
    pub async fn register(&self, username: &str, password: &str) -> String {
        let body = json!({
            "username": username,
            "password": password,
            "confirmPassword": password,
        });

        let res = self.post("/register", None, &body.to_string()).await;
        assert_eq!(
            res.status,
            StatusCode::Created,
            "registration failed: {}",
            res.message
        );

        session_cookie(&res).expect("registration set no session cookie")
    }

    /// Log an account in and return its session cookie header value.
    pub async fn login(&self, username: &str, password: &str) -> String {
        let body = json!({
            "username": username,
            "password": password,
        });

        let res = self.post("/login", None, &body.to_string()).await;
        assert_eq!(res.status, StatusCode::Ok, "login failed: {}", res.message);

        session_cookie(&res).expect("login set no session cookie")
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract the session cookie from a response as a `Cookie` request header
/// value, ready to pass back on the next dispatch.
pub fn session_cookie(response: &Response) -> Option<String> {
    response
        .cookies
        .iter()
        .find(|c| c.name == SESSION_COOKIE)
        .map(|c| format!("{}={}", c.name, c.value))
}
