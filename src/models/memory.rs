//! In-memory reference implementations of the store contracts.
//!
//! These back the integration tests and the default app wiring. They hold
//! no lock across an await point and keep the same observable semantics a
//! relational store would: duplicate detection, partial updates, delete
//! reporting whether exactly one record went away.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use crate::error::Error;
use crate::models::project::{NewProject, Project, ProjectPatch, ProjectStore};
use crate::models::todo::{NewTodo, Todo, TodoPatch, TodoStore};
use crate::models::user::{NewUser, User, UserStore};
use crate::models::Status;

#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<i64, User>>,
    next_id: AtomicI64,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, new: NewUser) -> Result<User, Error> {
        let mut users = self.users.write().unwrap();
        if users.values().any(|u| u.username == new.username) {
            return Err(Error::DuplicateResource(
                "User with this username already exists.".to_string(),
            ));
        }
        let user = User {
            id: self.allocate_id(),
            username: new.username,
            password_hash: new.password_hash,
            created_at: Utc::now(),
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn read(&self, id: i64) -> Result<Option<User>, Error> {
        Ok(self.users.read().unwrap().get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, Error> {
        Ok(self
            .users
            .read()
            .unwrap()
            .values()
            .find(|u| u.username == username)
            .cloned())
    }
}

#[derive(Default)]
pub struct MemoryProjectStore {
    projects: RwLock<HashMap<i64, Project>>,
    next_id: AtomicI64,
}

impl MemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }
}

#[async_trait]
impl ProjectStore for MemoryProjectStore {
    async fn create(&self, new: NewProject) -> Result<Project, Error> {
        let project = Project {
            id: self.allocate_id(),
            name: new.name,
            status: Status::Incomplete,
            user_id: new.user_id,
            image_url: new.image_url,
            created_at: Utc::now(),
        };
        self.projects
            .write()
            .unwrap()
            .insert(project.id, project.clone());
        Ok(project)
    }

    async fn read(&self, id: i64) -> Result<Option<Project>, Error> {
        Ok(self.projects.read().unwrap().get(&id).cloned())
    }

    async fn read_all(&self, owner_id: i64) -> Result<Vec<Project>, Error> {
        let mut projects: Vec<Project> = self
            .projects
            .read()
            .unwrap()
            .values()
            .filter(|p| p.user_id == owner_id)
            .cloned()
            .collect();
        projects.sort_by_key(|p| p.id);
        Ok(projects)
    }

    async fn update(&self, id: i64, patch: ProjectPatch) -> Result<Project, Error> {
        let mut projects = self.projects.write().unwrap();
        let project = projects
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("project {} not found", id)))?;
        if let Some(name) = patch.name {
            project.name = name;
        }
        if let Some(image_url) = patch.image_url {
            project.image_url = Some(image_url);
        }
        Ok(project.clone())
    }

    async fn set_status(&self, id: i64, status: Status) -> Result<Project, Error> {
        let mut projects = self.projects.write().unwrap();
        let project = projects
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("project {} not found", id)))?;
        project.status = status;
        Ok(project.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool, Error> {
        Ok(self.projects.write().unwrap().remove(&id).is_some())
    }
}

#[derive(Default)]
pub struct MemoryTodoStore {
    todos: RwLock<HashMap<i64, Todo>>,
    next_id: AtomicI64,
}

impl MemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    async fn create(&self, new: NewTodo) -> Result<Todo, Error> {
        let todo = Todo {
            id: self.allocate_id(),
            title: new.title,
            status: Status::Incomplete,
            user_id: new.user_id,
            due_at: new.due_at,
            created_at: Utc::now(),
            completed_at: None,
        };
        self.todos.write().unwrap().insert(todo.id, todo.clone());
        Ok(todo)
    }

    async fn read(&self, id: i64) -> Result<Option<Todo>, Error> {
        Ok(self.todos.read().unwrap().get(&id).cloned())
    }

    async fn read_all(&self, owner_id: i64) -> Result<Vec<Todo>, Error> {
        let mut todos: Vec<Todo> = self
            .todos
            .read()
            .unwrap()
            .values()
            .filter(|t| t.user_id == owner_id)
            .cloned()
            .collect();
        todos.sort_by_key(|t| t.id);
        Ok(todos)
    }

    async fn update(&self, id: i64, patch: TodoPatch) -> Result<Todo, Error> {
        let mut todos = self.todos.write().unwrap();
        let todo = todos
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("todo {} not found", id)))?;
        if let Some(title) = patch.title {
            todo.title = title;
        }
        if let Some(due_at) = patch.due_at {
            todo.due_at = Some(due_at);
        }
        Ok(todo.clone())
    }

    async fn set_status(&self, id: i64, status: Status) -> Result<Todo, Error> {
        let mut todos = self.todos.write().unwrap();
        let todo = todos
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("todo {} not found", id)))?;
        todo.status = status;
        todo.completed_at = match status {
            Status::Complete => Some(Utc::now()),
            Status::Incomplete => None,
        };
        Ok(todo.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool, Error> {
        Ok(self.todos.write().unwrap().remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn duplicate_usernames_rejected() {
        let store = MemoryUserStore::new();
        store
            .create(NewUser {
                username: "alice".to_string(),
                password_hash: "h1".to_string(),
            })
            .await
            .unwrap();

        let err = store
            .create(NewUser {
                username: "alice".to_string(),
                password_hash: "h2".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateResource(_)));
    }

    #[tokio::test]
    async fn update_leaves_missing_fields_untouched() {
        let store = MemoryProjectStore::new();
        let project = store
            .create(NewProject {
                name: "Mural".to_string(),
                user_id: 1,
                image_url: Some("https://img.example/mural.png".to_string()),
            })
            .await
            .unwrap();

        let updated = store
            .update(
                project.id,
                ProjectPatch {
                    name: Some("Mural v2".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Mural v2");
        assert_eq!(updated.image_url.as_deref(), Some("https://img.example/mural.png"));
        assert_eq!(updated.user_id, 1);
    }

    #[tokio::test]
    async fn read_all_scopes_to_owner() {
        let store = MemoryTodoStore::new();
        for (title, owner) in [("a", 1), ("b", 2), ("c", 1)] {
            store
                .create(NewTodo {
                    title: title.to_string(),
                    user_id: owner,
                    due_at: None,
                })
                .await
                .unwrap();
        }
        let mine = store.read_all(1).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|t| t.user_id == 1));
    }

    #[tokio::test]
    async fn delete_reports_exactly_one_removal() {
        let store = MemoryProjectStore::new();
        let project = store
            .create(NewProject {
                name: "x".to_string(),
                user_id: 1,
                image_url: None,
            })
            .await
            .unwrap();
        assert!(store.delete(project.id).await.unwrap());
        assert!(!store.delete(project.id).await.unwrap());
    }

    #[tokio::test]
    async fn completing_a_todo_stamps_completed_at() {
        let store = MemoryTodoStore::new();
        let todo = store
            .create(NewTodo {
                title: "ship".to_string(),
                user_id: 1,
                due_at: None,
            })
            .await
            .unwrap();
        let done = store.set_status(todo.id, Status::Complete).await.unwrap();
        assert_eq!(done.status, Status::Complete);
        assert!(done.completed_at.is_some());

        let reopened = store.set_status(todo.id, Status::Incomplete).await.unwrap();
        assert!(reopened.completed_at.is_none());
    }
}
