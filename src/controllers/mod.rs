use std::future::Future;
use std::sync::Arc;

use crate::auth::session::SessionStore;
use crate::colors::ColorClient;
use crate::config::Config;
use crate::error::Error;
use crate::models::{ProjectStore, TodoStore, UserResponse, UserStore};
use crate::request::Request;
use crate::response::Response;
use crate::routing::Handler;

/// Shared application state available in all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sessions: Arc<SessionStore>,
    pub users: Arc<dyn UserStore>,
    pub projects: Arc<dyn ProjectStore>,
    pub todos: Arc<dyn TodoStore>,
    pub colors: Arc<ColorClient>,
}

/// Adapt an `async fn(AppState, Request)` into a registrable [`Handler`].
pub(crate) fn handler<F, Fut>(state: &AppState, f: F) -> Handler
where
    F: Fn(AppState, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, Error>> + Send + 'static,
{
    let state = state.clone();
    Arc::new(move |req| Box::pin(f(state.clone(), req)))
}

/// The caller's account, for templates that display the signed-in identity.
pub(crate) async fn current_user(
    state: &AppState,
    req: &Request,
) -> Result<Option<UserResponse>, Error> {
    match req.session().user_id {
        Some(id) => Ok(state.users.read(id).await?.map(UserResponse::from)),
        None => Ok(None),
    }
}

pub mod projects;
pub mod todos;
pub mod users;
