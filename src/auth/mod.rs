pub mod cookie;
pub mod guard;
pub mod password;
pub mod session;

pub use cookie::{parse_cookie_header, Cookie, SESSION_COOKIE};
pub use guard::{Loaded, Owned, Policy};
pub use password::{hash_password, verify_password};
pub use session::{Session, SessionStore};
