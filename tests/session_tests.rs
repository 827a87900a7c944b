use atelier::auth::session::SessionStore;

fn cookie(token: &str) -> String {
    format!("session_id={}", token)
}

#[test]
fn create_then_resolve_yields_the_user() {
    let store = SessionStore::new(24);
    let (session, cookie_out) = store.create(7);
    assert_eq!(cookie_out.name, "session_id");

    let resolved = store.resolve(Some(&cookie(&session.id)));
    assert_eq!(resolved.user_id, Some(7));
}

#[test]
fn lookup_never_fails() {
    let store = SessionStore::new(24);

    for header in [
        None,
        Some("session_id=unknown-token"),
        Some("garbage"),
        Some(""),
        Some("other=value"),
    ] {
        let session = store.resolve(header);
        assert!(!session.is_authenticated());
        assert!(!session.id.is_empty());
    }
}

#[test]
fn distinct_users_get_distinct_tokens() {
    let store = SessionStore::new(24);
    let (a, _) = store.create(1);
    let (b, _) = store.create(2);
    assert_ne!(a.id, b.id);

    assert_eq!(store.resolve(Some(&cookie(&a.id))).user_id, Some(1));
    assert_eq!(store.resolve(Some(&cookie(&b.id))).user_id, Some(2));
}

#[test]
fn destroyed_sessions_resolve_anonymous() {
    let store = SessionStore::new(24);
    let (session, _) = store.create(3);
    assert!(store.destroy(&session.id));

    let resolved = store.resolve(Some(&cookie(&session.id)));
    assert!(!resolved.is_authenticated());
}

#[test]
fn zero_ttl_sessions_expire_immediately() {
    let store = SessionStore::new(0);
    let (session, _) = store.create(4);
    assert!(!store.resolve(Some(&cookie(&session.id))).is_authenticated());
}
