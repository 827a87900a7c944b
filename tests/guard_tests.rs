//! The authorization check order is a contract: identifier format before
//! authentication, authentication before any store lookup, existence before
//! ownership. The counting store proves the short-circuits with call-count
//! assertions.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use atelier::app::App;
use atelier::auth::session::SessionStore;
use atelier::colors::ColorClient;
use atelier::config::Config;
use atelier::controllers::AppState;
use atelier::error::Error;
use atelier::models::{
    MemoryProjectStore, MemoryTodoStore, MemoryUserStore, NewProject, Project, ProjectPatch,
    ProjectStore, Status,
};
use atelier::testing::session_cookie;
use atelier::{Method, StatusCode, TestApp};
use serde_json::json;

/// Delegates to the in-memory store while counting `read` calls.
struct CountingProjectStore {
    inner: MemoryProjectStore,
    reads: AtomicUsize,
}

impl CountingProjectStore {
    fn new() -> Self {
        CountingProjectStore {
            inner: MemoryProjectStore::new(),
            reads: AtomicUsize::new(0),
        }
    }

    fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProjectStore for CountingProjectStore {
    async fn create(&self, new: NewProject) -> Result<Project, Error> {
        self.inner.create(new).await
    }

    async fn read(&self, id: i64) -> Result<Option<Project>, Error> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.read(id).await
    }

    async fn read_all(&self, owner_id: i64) -> Result<Vec<Project>, Error> {
        self.inner.read_all(owner_id).await
    }

    async fn update(&self, id: i64, patch: ProjectPatch) -> Result<Project, Error> {
        self.inner.update(id, patch).await
    }

    async fn set_status(&self, id: i64, status: Status) -> Result<Project, Error> {
        self.inner.set_status(id, status).await
    }

    async fn delete(&self, id: i64) -> Result<bool, Error> {
        self.inner.delete(id).await
    }
}

fn counting_app() -> (App, Arc<CountingProjectStore>) {
    let config = Config {
        environment: "test".to_string(),
        session_ttl_hours: 24,
        color_api: None,
    };
    let projects = Arc::new(CountingProjectStore::new());
    let state = AppState {
        sessions: Arc::new(SessionStore::new(config.session_ttl_hours)),
        users: Arc::new(MemoryUserStore::new()),
        projects: projects.clone(),
        todos: Arc::new(MemoryTodoStore::new()),
        colors: Arc::new(ColorClient::disabled()),
        config: Arc::new(config),
    };
    let app = App::with_state(state).expect("failed to build route table");
    (app, projects)
}

async fn register(app: &App, username: &str) -> String {
    let body = json!({
        "username": username,
        "password": "secret123",
        "confirmPassword": "secret123",
    });
    let res = app
        .handle(Method::Post, "/register", None, Some(&body.to_string()))
        .await;
    assert_eq!(res.status, StatusCode::Created);
    session_cookie(&res).unwrap()
}

#[tokio::test]
async fn unauthenticated_owner_route_denies_before_any_load() {
    let (app, projects) = counting_app();

    let res = app.handle(Method::Get, "/projects/5", None, None).await;
    assert_eq!(res.status, StatusCode::Unauthorized);
    assert_eq!(projects.reads(), 0);

    let res = app.handle(Method::Delete, "/projects/5", None, None).await;
    assert_eq!(res.status, StatusCode::Unauthorized);
    assert_eq!(projects.reads(), 0);
}

#[tokio::test]
async fn malformed_id_rejects_before_any_load() {
    let (app, projects) = counting_app();
    let cookie = register(&app, "frank").await;

    let res = app
        .handle(Method::Get, "/projects/abc", Some(&cookie), None)
        .await;
    assert_eq!(res.status, StatusCode::BadRequest);
    assert_eq!(projects.reads(), 0);

    // The id check runs even before authentication.
    let res = app.handle(Method::Get, "/projects/abc", None, None).await;
    assert_eq!(res.status, StatusCode::BadRequest);
    assert_eq!(projects.reads(), 0);
}

#[tokio::test]
async fn missing_resource_is_not_found_for_its_owner() {
    let (app, projects) = counting_app();
    let cookie = register(&app, "grace").await;

    let res = app
        .handle(Method::Get, "/projects/999", Some(&cookie), None)
        .await;
    assert_eq!(res.status, StatusCode::NotFound);
    assert_eq!(projects.reads(), 1);
}

#[tokio::test]
async fn foreign_owner_is_forbidden_on_every_single_resource_operation() {
    let app = TestApp::new();
    let owner = app.register("owner", "secret123").await;
    let intruder = app.register("intruder", "secret123").await;

    let created = app
        .post("/projects", Some(&owner), "name=Fresco")
        .await;
    assert_eq!(created.status, StatusCode::Created);
    let location = created.redirect.clone().unwrap();

    for (method, target, body) in [
        (Method::Get, location.clone(), None),
        (Method::Get, format!("{}/edit", location), None),
        (Method::Put, location.clone(), Some("name=Taken")),
        (Method::Put, format!("{}/complete", location), None),
        (Method::Delete, location.clone(), None),
    ] {
        let res = app
            .dispatch(method, &target, Some(&intruder), body)
            .await;
        assert_eq!(
            res.status,
            StatusCode::Forbidden,
            "{} {} let a foreign user through",
            method.as_str(),
            target
        );
    }

    // The owner still succeeds after all that.
    let res = app.get(&location, Some(&owner)).await;
    assert_eq!(res.status, StatusCode::Ok);
}

#[tokio::test]
async fn owner_scoped_lists_reject_anonymous_callers() {
    let app = TestApp::new();
    let res = app.get("/todos", None).await;
    assert_eq!(res.status, StatusCode::Unauthorized);
}
