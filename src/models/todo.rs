use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::auth::guard::Owned;
use crate::error::Error;
use crate::models::Status;

/// A todo item, owned by the user who created it.
#[derive(Debug, Clone, Serialize)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub status: Status,
    pub user_id: i64,
    pub due_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Owned for Todo {
    fn owner_id(&self) -> i64 {
        self.user_id
    }
}

#[derive(Debug)]
pub struct NewTodo {
    pub title: String,
    pub user_id: i64,
    pub due_at: Option<DateTime<Utc>>,
}

/// Partial update; absent fields are left untouched. `id` and `user_id`
/// are immutable.
#[derive(Debug, Default)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub due_at: Option<DateTime<Utc>>,
}

/// Persistence contract for todos.
#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn create(&self, new: NewTodo) -> Result<Todo, Error>;

    async fn read(&self, id: i64) -> Result<Option<Todo>, Error>;

    /// All todos belonging to `owner_id`, oldest first.
    async fn read_all(&self, owner_id: i64) -> Result<Vec<Todo>, Error>;

    /// Apply only the provided fields; missing id yields [`Error::NotFound`].
    async fn update(&self, id: i64, patch: TodoPatch) -> Result<Todo, Error>;

    /// Completing stamps `completed_at`; reopening clears it.
    async fn set_status(&self, id: i64, status: Status) -> Result<Todo, Error>;

    /// Returns true iff exactly one record was removed.
    async fn delete(&self, id: i64) -> Result<bool, Error>;
}
