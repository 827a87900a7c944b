use atelier::{Method, StatusCode, TestApp};

#[tokio::test]
async fn unknown_path_renders_not_found() {
    let app = TestApp::new();
    let res = app.get("/nowhere", None).await;
    assert_eq!(res.status, StatusCode::NotFound);
    assert_eq!(res.template.as_deref(), Some("errorView"));
}

#[tokio::test]
async fn known_shape_under_wrong_method_is_method_not_allowed() {
    let app = TestApp::new();
    // /register only accepts GET and POST.
    let res = app
        .dispatch(Method::Delete, "/register", None, None)
        .await;
    assert_eq!(res.status, StatusCode::MethodNotAllowed);
}

#[tokio::test]
async fn trailing_slash_resolves_the_same_route() {
    let app = TestApp::new();
    let cookie = app.register("router_user", "secret123").await;

    let plain = app.get("/projects", Some(&cookie)).await;
    let slashed = app.get("/projects/", Some(&cookie)).await;
    assert_eq!(plain.status, StatusCode::Ok);
    assert_eq!(slashed.status, StatusCode::Ok);
    assert_eq!(plain.template, slashed.template);
}

#[tokio::test]
async fn literal_new_route_wins_over_param_route() {
    let app = TestApp::new();
    let cookie = app.register("precedence_user", "secret123").await;

    // If /projects/:id matched first, "new" would be a malformed id (400).
    let res = app.get("/projects/new", Some(&cookie)).await;
    assert_eq!(res.status, StatusCode::Ok);
    assert_eq!(res.template.as_deref(), Some("newProjectView"));
}

#[tokio::test]
async fn resolution_is_stable_across_identical_dispatches() {
    let app = TestApp::new();
    let cookie = app.register("stable_user", "secret123").await;

    let first = app.get("/todos/new", Some(&cookie)).await;
    let second = app.get("/todos/new", Some(&cookie)).await;
    assert_eq!(first.status, second.status);
    assert_eq!(first.template, second.template);
}
