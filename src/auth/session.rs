use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::auth::cookie::{parse_cookie_header, Cookie, SESSION_COOKIE};

/// Server-side record binding an opaque token to an optional authenticated
/// identity. A session with no `user_id` is anonymous.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub user_id: Option<i64>,
    pub data: HashMap<String, String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    fn anonymous(ttl: Duration) -> Self {
        let now = Utc::now();
        Session {
            id: generate_token(),
            user_id: None,
            data: HashMap::new(),
            created_at: now,
            expires_at: now + ttl,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Generate a cryptographically secure session token (hex-encoded, 256 bits).
fn generate_token() -> String {
    let mut rng = rand::thread_rng();
    let bytes: [u8; 32] = rng.gen();
    hex::encode(bytes)
}

/// Process-wide table mapping opaque tokens to session records.
///
/// Constructed once at startup and shared by reference; the backing map
/// tolerates concurrent lookups and writes from many simultaneous requests.
/// No lock is ever held across an await point.
pub struct SessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    /// Create a store whose sessions expire after `ttl_hours` of inactivity.
    pub fn new(ttl_hours: i64) -> Self {
        SessionStore {
            ttl: Duration::hours(ttl_hours),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Create and store a session for `user_id`, returning the record and
    /// the cookie that carries its token. The token is guaranteed unique
    /// against current live sessions.
    pub fn create(&self, user_id: i64) -> (Session, Cookie) {
        let now = Utc::now();
        let mut sessions = self.sessions.write().unwrap();
        let token = loop {
            let candidate = generate_token();
            if !sessions.contains_key(&candidate) {
                break candidate;
            }
        };
        let session = Session {
            id: token.clone(),
            user_id: Some(user_id),
            data: HashMap::new(),
            created_at: now,
            expires_at: now + self.ttl,
        };
        sessions.insert(token.clone(), session.clone());
        let cookie = Cookie::session(token, session.expires_at);
        (session, cookie)
    }

    /// Resolve the session for an incoming cookie header.
    ///
    /// Lookup never fails: a missing, malformed, unknown, or expired token
    /// yields a fresh anonymous session so callers branch uniformly on
    /// `session.is_authenticated()`. Each successful lookup slides
    /// `expires_at` forward by the store TTL.
    pub fn resolve(&self, cookie_header: Option<&str>) -> Session {
        let token = cookie_header
            .map(parse_cookie_header)
            .and_then(|cookies| cookies.get(SESSION_COOKIE).cloned());

        let Some(token) = token else {
            return Session::anonymous(self.ttl);
        };

        let now = Utc::now();
        let mut sessions = self.sessions.write().unwrap();
        match sessions.get_mut(&token) {
            Some(session) if session.is_expired(now) => {
                sessions.remove(&token);
                Session::anonymous(self.ttl)
            }
            Some(session) => {
                session.expires_at = now + self.ttl;
                session.clone()
            }
            None => Session::anonymous(self.ttl),
        }
    }

    /// Remove a session (logout). Returns whether a record was removed.
    pub fn destroy(&self, token: &str) -> bool {
        self.sessions.write().unwrap().remove(token).is_some()
    }

    /// Drop expired records to bound memory growth. Call periodically.
    pub fn purge_expired(&self) {
        let now = Utc::now();
        self.sessions
            .write()
            .unwrap()
            .retain(|_, session| !session.is_expired(now));
    }
}
