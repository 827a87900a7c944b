use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::auth::guard::Owned;
use crate::error::Error;
use crate::models::Status;

/// A tracked project, owned by the user who created it.
#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub status: Status,
    pub user_id: i64,
    /// Cover image; when set, the color-recognition client derives a
    /// palette for the project view.
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Owned for Project {
    fn owner_id(&self) -> i64 {
        self.user_id
    }
}

#[derive(Debug)]
pub struct NewProject {
    pub name: String,
    pub user_id: i64,
    pub image_url: Option<String>,
}

/// Partial update; absent fields are left untouched. `id` and `user_id`
/// are immutable.
#[derive(Debug, Default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub image_url: Option<String>,
}

/// Persistence contract for projects.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn create(&self, new: NewProject) -> Result<Project, Error>;

    async fn read(&self, id: i64) -> Result<Option<Project>, Error>;

    /// All projects belonging to `owner_id`, oldest first.
    async fn read_all(&self, owner_id: i64) -> Result<Vec<Project>, Error>;

    /// Apply only the provided fields; missing id yields [`Error::NotFound`].
    async fn update(&self, id: i64, patch: ProjectPatch) -> Result<Project, Error>;

    async fn set_status(&self, id: i64, status: Status) -> Result<Project, Error>;

    /// Returns true iff exactly one record was removed.
    async fn delete(&self, id: i64) -> Result<bool, Error>;
}
