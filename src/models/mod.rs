use serde::{Deserialize, Serialize};

pub mod memory;
pub mod project;
pub mod todo;
pub mod user;

pub use memory::{MemoryProjectStore, MemoryTodoStore, MemoryUserStore};
pub use project::{NewProject, Project, ProjectPatch, ProjectStore};
pub use todo::{NewTodo, Todo, TodoPatch, TodoStore};
pub use user::{NewUser, User, UserResponse, UserStore};

/// Completion state shared by projects and todos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Incomplete,
    Complete,
}
