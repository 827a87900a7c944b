use atelier::{StatusCode, TestApp};

#[tokio::test]
async fn create_then_show_round_trips() {
    let app = TestApp::new();
    let cookie = app.register("al", "secret123").await;

    let created = app
        .post(
            "/todos",
            Some(&cookie),
            "title=Prime+the+canvas&dueAt=2026-09-01T12:00:00Z",
        )
        .await;
    assert_eq!(created.status, StatusCode::Created);
    let location = created.redirect.clone().unwrap();

    let shown = app.get(&location, Some(&cookie)).await;
    assert_eq!(shown.status, StatusCode::Ok);
    assert_eq!(shown.template.as_deref(), Some("todoView"));

    let todo = shown.payload_field("todo").unwrap();
    assert_eq!(todo["title"], "Prime the canvas");
    assert_eq!(todo["status"], "incomplete");
    assert!(todo["completed_at"].is_null());
}

#[tokio::test]
async fn create_requires_a_title() {
    let app = TestApp::new();
    let cookie = app.register("bea", "secret123").await;

    let res = app.post("/todos", Some(&cookie), "title=").await;
    assert_eq!(res.status, StatusCode::BadRequest);
}

#[tokio::test]
async fn bad_due_date_is_a_validation_error() {
    let app = TestApp::new();
    let cookie = app.register("cy", "secret123").await;

    let res = app
        .post("/todos", Some(&cookie), "title=Varnish&dueAt=tomorrow")
        .await;
    assert_eq!(res.status, StatusCode::BadRequest);
    assert_eq!(res.template.as_deref(), Some("errorView"));
}

#[tokio::test]
async fn complete_stamps_completed_at() {
    let app = TestApp::new();
    let cookie = app.register("dot", "secret123").await;

    let created = app.post("/todos", Some(&cookie), "title=Frame").await;
    let location = created.redirect.clone().unwrap();

    let completed = app
        .put(&format!("{}/complete", location), Some(&cookie), "")
        .await;
    assert_eq!(completed.status, StatusCode::Ok);

    let shown = app.get(&location, Some(&cookie)).await;
    let todo = shown.payload_field("todo").unwrap();
    assert_eq!(todo["status"], "complete");
    assert!(!todo["completed_at"].is_null());
}

#[tokio::test]
async fn update_and_delete_round_trip() {
    let app = TestApp::new();
    let cookie = app.register("eve", "secret123").await;

    let created = app.post("/todos", Some(&cookie), "title=Sketch").await;
    let location = created.redirect.clone().unwrap();

    let updated = app
        .put(&location, Some(&cookie), "title=Sketch+in+ink")
        .await;
    assert_eq!(updated.status, StatusCode::Ok);

    let shown = app.get(&location, Some(&cookie)).await;
    assert_eq!(
        shown.payload_field("todo").unwrap()["title"],
        "Sketch in ink"
    );

    let deleted = app.delete(&location, Some(&cookie)).await;
    assert_eq!(deleted.status, StatusCode::Ok);
    assert_eq!(deleted.redirect.as_deref(), Some("/todos"));

    let gone = app.get(&location, Some(&cookie)).await;
    assert_eq!(gone.status, StatusCode::NotFound);
}

#[tokio::test]
async fn list_is_scoped_to_the_caller() {
    let app = TestApp::new();
    let mine = app.register("fay", "secret123").await;
    let theirs = app.register("gil", "secret123").await;

    app.post("/todos", Some(&mine), "title=Mix+pigments").await;
    app.post("/todos", Some(&theirs), "title=Clean+brushes").await;

    let res = app.get("/todos", Some(&mine)).await;
    let todos = res.payload_field("todos").unwrap().as_array().unwrap();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0]["title"], "Mix pigments");
}
