//! Route-level access control.
//!
//! Every protected route carries a [`Policy`]; the dispatch pipeline runs
//! [`authorize`] against it before the handler body executes. The check
//! order is a contract: cheap, information-safe checks (identifier format,
//! authentication) run before anything that could reveal whether a resource
//! exists (loading, ownership).

use std::any::Any;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::Error;
use crate::request::Request;

/// A resource with an owning identity.
pub trait Owned: Send + Sync + 'static {
    fn owner_id(&self) -> i64;
}

/// A resource the guard has loaded and ownership-checked, attached to the
/// request so the handler never re-loads or re-checks it.
pub struct Loaded {
    owner_id: i64,
    resource: Box<dyn Any + Send + Sync>,
}

impl Loaded {
    pub fn new<T: Owned>(resource: T) -> Self {
        Loaded {
            owner_id: resource.owner_id(),
            resource: Box::new(resource),
        }
    }

    pub fn owner_id(&self) -> i64 {
        self.owner_id
    }

    pub fn downcast_ref<T: Owned>(&self) -> Option<&T> {
        self.resource.downcast_ref::<T>()
    }
}

pub type LoadFuture = Pin<Box<dyn Future<Output = Result<Option<Loaded>, Error>> + Send>>;

/// Type-erased resource loader supplied per-route by the controllers.
pub type Loader = Arc<dyn Fn(i64) -> LoadFuture + Send + Sync>;

/// Per-route authorization configuration.
#[derive(Clone)]
pub enum Policy {
    /// No checks; the handler sees whatever session resolved.
    Public,
    /// Requires an authenticated session. List and create endpoints use
    /// this and scope their queries to the session identity themselves.
    Authenticated,
    /// Requires an authenticated session owning the resource the route's
    /// `:id` names. The loaded resource is attached to the request.
    Owned(Loader),
}

impl Policy {
    /// Build an `Owned` policy from a typed loader.
    pub fn owned<T, F, Fut>(load: F) -> Self
    where
        T: Owned,
        F: Fn(i64) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<T>, Error>> + Send + 'static,
    {
        Policy::Owned(Arc::new(move |id| {
            let fut = load(id);
            Box::pin(async move { Ok(fut.await?.map(Loaded::new)) })
        }))
    }
}

/// Run a route's policy against the assembled request.
///
/// Check order for `Owned` routes, in sequence and short-circuiting:
/// 1. parse the `:id` path parameter — malformed → 400, before any lookup;
/// 2. authentication — anonymous → 401, before any loader call;
/// 3. load — absent → 404;
/// 4. ownership — foreign owner → 403.
pub async fn authorize(policy: &Policy, request: &Request) -> Result<Option<Loaded>, Error> {
    match policy {
        Policy::Public => Ok(None),
        Policy::Authenticated => {
            if !request.session().is_authenticated() {
                return Err(Error::AuthenticationRequired);
            }
            Ok(None)
        }
        Policy::Owned(loader) => {
            let raw = request
                .param("id")
                .ok_or_else(|| Error::Internal("owned route without an :id parameter".to_string()))?;
            let id: i64 = raw
                .parse()
                .map_err(|_| Error::MalformedIdentifier(raw.to_string()))?;

            let Some(user_id) = request.session().user_id else {
                return Err(Error::AuthenticationRequired);
            };

            let loaded = loader(id)
                .await?
                .ok_or_else(|| Error::NotFound(format!("resource {} not found", id)))?;

            if loaded.owner_id() != user_id {
                tracing::warn!(resource = id, user = user_id, "ownership check failed");
                return Err(Error::AuthorizationDenied);
            }

            Ok(Some(loaded))
        }
    }
}
