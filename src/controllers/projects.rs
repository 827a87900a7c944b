use serde_json::json;

use crate::auth::guard::Policy;
use crate::error::Error;
use crate::models::project::{NewProject, Project, ProjectPatch};
use crate::models::Status;
use crate::request::Request;
use crate::response::{Response, StatusCode};
use crate::routing::{Router, RouterError};

use super::{current_user, handler, AppState};

pub fn register_routes(router: &mut Router, state: AppState) -> Result<(), RouterError> {
    let owned = owned_policy(&state);

    router.get("/projects", Policy::Authenticated, handler(&state, list_projects))?;
    // The literal route must precede /projects/:id; first full match wins.
    router.get("/projects/new", Policy::Authenticated, handler(&state, new_project_form))?;
    router.get("/projects/:id", owned.clone(), handler(&state, show_project))?;
    router.get("/projects/:id/edit", owned.clone(), handler(&state, edit_project_form))?;
    router.post("/projects", Policy::Authenticated, handler(&state, create_project))?;
    router.put("/projects/:id", owned.clone(), handler(&state, update_project))?;
    router.put("/projects/:id/complete", owned.clone(), handler(&state, complete_project))?;
    router.delete("/projects/:id", owned, handler(&state, delete_project))?;
    Ok(())
}

fn owned_policy(state: &AppState) -> Policy {
    let projects = state.projects.clone();
    Policy::owned(move |id| {
        let projects = projects.clone();
        async move { projects.read(id).await }
    })
}

async fn list_projects(state: AppState, req: Request) -> Result<Response, Error> {
    let owner = req.user_id()?;
    let projects = state.projects.read_all(owner).await?;
    let user = current_user(&state, &req).await?;
    Ok(
        Response::render(StatusCode::Ok, "Project list", "projectListView")
            .with_payload(json!({ "projects": projects, "user": user })),
    )
}

async fn new_project_form(_state: AppState, _req: Request) -> Result<Response, Error> {
    Ok(Response::render(
        StatusCode::Ok,
        "New project form",
        "newProjectView",
    ))
}

async fn create_project(state: AppState, req: Request) -> Result<Response, Error> {
    let owner = req.user_id()?;
    let Some(name) = req.body_field("name") else {
        return Err(Error::Validation("Project name is required.".to_string()));
    };

    let project = state
        .projects
        .create(NewProject {
            name: name.to_string(),
            user_id: owner,
            image_url: req.body_field("imageUrl").map(str::to_string),
        })
        .await?;

    Ok(Response::redirect(
        StatusCode::Created,
        "Project created",
        format!("/projects/{}", project.id),
    ))
}

/// Render a single project; when it has a cover image and the recognition
/// client yields a palette, the payload carries a `colors` field.
async fn show_project(state: AppState, req: Request) -> Result<Response, Error> {
    let project: &Project = req.resource()?;

    let palette = match &project.image_url {
        Some(image_url) => state.colors.palette(image_url).await,
        None => None,
    };
    let payload = match palette {
        Some(colors) => json!({ "project": project, "colors": colors }),
        None => json!({ "project": project }),
    };

    Ok(Response::render(StatusCode::Ok, "Project", "projectView").with_payload(payload))
}

async fn edit_project_form(_state: AppState, req: Request) -> Result<Response, Error> {
    let project: &Project = req.resource()?;
    Ok(
        Response::render(StatusCode::Ok, "Edit project form", "editProjectView")
            .with_payload(json!({ "project": project })),
    )
}

async fn update_project(state: AppState, req: Request) -> Result<Response, Error> {
    let id = req.id_param()?;

    // An explicitly blank name is invalid; an absent one means keep.
    let name = match req.body().get("name").and_then(serde_json::Value::as_str) {
        Some("") => return Err(Error::Validation("Project name is required.".to_string())),
        Some(name) => Some(name.to_string()),
        None => None,
    };

    let project = state
        .projects
        .update(
            id,
            ProjectPatch {
                name,
                image_url: req.body_field("imageUrl").map(str::to_string),
            },
        )
        .await?;

    Ok(Response::redirect(
        StatusCode::Ok,
        "Project updated",
        format!("/projects/{}", project.id),
    ))
}

async fn complete_project(state: AppState, req: Request) -> Result<Response, Error> {
    let id = req.id_param()?;
    state.projects.set_status(id, Status::Complete).await?;
    Ok(Response::redirect(
        StatusCode::Ok,
        "Project completed",
        format!("/projects/{}", id),
    ))
}

async fn delete_project(state: AppState, req: Request) -> Result<Response, Error> {
    let id = req.id_param()?;
    if !state.projects.delete(id).await? {
        return Err(Error::NotFound(format!("project {} not found", id)));
    }
    Ok(Response::redirect(
        StatusCode::Ok,
        "Project deleted",
        "/projects",
    ))
}
