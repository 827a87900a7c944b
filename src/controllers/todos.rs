use chrono::{DateTime, Utc};
use serde_json::json;

use crate::auth::guard::Policy;
use crate::error::Error;
use crate::models::todo::{NewTodo, Todo, TodoPatch};
use crate::models::Status;
use crate::request::Request;
use crate::response::{Response, StatusCode};
use crate::routing::{Router, RouterError};

use super::{current_user, handler, AppState};

pub fn register_routes(router: &mut Router, state: AppState) -> Result<(), RouterError> {
    let owned = owned_policy(&state);

    router.get("/todos", Policy::Authenticated, handler(&state, list_todos))?;
    // The literal route must precede /todos/:id; first full match wins.
    router.get("/todos/new", Policy::Authenticated, handler(&state, new_todo_form))?;
    router.get("/todos/:id", owned.clone(), handler(&state, show_todo))?;
    router.get("/todos/:id/edit", owned.clone(), handler(&state, edit_todo_form))?;
    router.post("/todos", Policy::Authenticated, handler(&state, create_todo))?;
    router.put("/todos/:id", owned.clone(), handler(&state, update_todo))?;
    router.put("/todos/:id/complete", owned.clone(), handler(&state, complete_todo))?;
    router.delete("/todos/:id", owned, handler(&state, delete_todo))?;
    Ok(())
}

fn owned_policy(state: &AppState) -> Policy {
    let todos = state.todos.clone();
    Policy::owned(move |id| {
        let todos = todos.clone();
        async move { todos.read(id).await }
    })
}

fn parse_due_at(req: &Request) -> Result<Option<DateTime<Utc>>, Error> {
    match req.body_field("dueAt") {
        None => Ok(None),
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|due| Some(due.with_timezone(&Utc)))
            .map_err(|_| Error::Validation("Due date must be an RFC 3339 timestamp.".to_string())),
    }
}

async fn list_todos(state: AppState, req: Request) -> Result<Response, Error> {
    let owner = req.user_id()?;
    let todos = state.todos.read_all(owner).await?;
    let user = current_user(&state, &req).await?;
    Ok(Response::render(StatusCode::Ok, "Todo list", "todoListView")
        .with_payload(json!({ "todos": todos, "user": user })))
}

async fn new_todo_form(_state: AppState, _req: Request) -> Result<Response, Error> {
    Ok(Response::render(StatusCode::Ok, "New todo form", "newTodoView"))
}

async fn create_todo(state: AppState, req: Request) -> Result<Response, Error> {
    let owner = req.user_id()?;
    let Some(title) = req.body_field("title") else {
        return Err(Error::Validation("Todo title is required.".to_string()));
    };

    let todo = state
        .todos
        .create(NewTodo {
            title: title.to_string(),
            user_id: owner,
            due_at: parse_due_at(&req)?,
        })
        .await?;

    Ok(Response::redirect(
        StatusCode::Created,
        "Todo created",
        format!("/todos/{}", todo.id),
    ))
}

async fn show_todo(_state: AppState, req: Request) -> Result<Response, Error> {
    let todo: &Todo = req.resource()?;
    Ok(Response::render(StatusCode::Ok, "Todo", "todoView")
        .with_payload(json!({ "todo": todo })))
}

async fn edit_todo_form(_state: AppState, req: Request) -> Result<Response, Error> {
    let todo: &Todo = req.resource()?;
    Ok(Response::render(StatusCode::Ok, "Edit todo form", "editTodoView")
        .with_payload(json!({ "todo": todo })))
}

async fn update_todo(state: AppState, req: Request) -> Result<Response, Error> {
    let id = req.id_param()?;

    // An explicitly blank title is invalid; an absent one means keep.
    let title = match req.body().get("title").and_then(serde_json::Value::as_str) {
        Some("") => return Err(Error::Validation("Todo title is required.".to_string())),
        Some(title) => Some(title.to_string()),
        None => None,
    };

    let todo = state
        .todos
        .update(
            id,
            TodoPatch {
                title,
                due_at: parse_due_at(&req)?,
            },
        )
        .await?;

    Ok(Response::redirect(
        StatusCode::Ok,
        "Todo updated",
        format!("/todos/{}", todo.id),
    ))
}

async fn complete_todo(state: AppState, req: Request) -> Result<Response, Error> {
    let id = req.id_param()?;
    state.todos.set_status(id, Status::Complete).await?;
    Ok(Response::redirect(
        StatusCode::Ok,
        "Todo completed",
        format!("/todos/{}", id),
    ))
}

async fn delete_todo(state: AppState, req: Request) -> Result<Response, Error> {
    let id = req.id_param()?;
    if !state.todos.delete(id).await? {
        return Err(Error::NotFound(format!("todo {} not found", id)));
    }
    Ok(Response::redirect(StatusCode::Ok, "Todo deleted", "/todos"))
}
