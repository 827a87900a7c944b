//! Registration, login, and logout.
//!
//! Validation failures on the form posts redirect back to the page with an
//! `error` query parameter; the GET handlers translate those codes into the
//! message the view renders. Successful registration and login mint a
//! session and attach its cookie.

use serde_json::json;

use crate::auth::cookie::{Cookie, SESSION_COOKIE};
use crate::auth::guard::Policy;
use crate::auth::password::{hash_password, verify_password};
use crate::error::Error;
use crate::models::user::NewUser;
use crate::request::Request;
use crate::response::{Response, StatusCode};
use crate::routing::{Router, RouterError};

use super::{handler, AppState};

pub fn register_routes(router: &mut Router, state: AppState) -> Result<(), RouterError> {
    router.get("/register", Policy::Public, handler(&state, get_register))?;
    router.post("/register", Policy::Public, handler(&state, create_user))?;
    router.get("/login", Policy::Public, handler(&state, get_login))?;
    router.post("/login", Policy::Public, handler(&state, login_user))?;
    router.post("/logout", Policy::Public, handler(&state, logout_user))?;
    Ok(())
}

fn register_error_message(code: &str) -> Option<&'static str> {
    match code {
        "missing_name" => Some("Username is required."),
        "missing_password" => Some("Password is required."),
        "password_dont_match" => Some("Passwords do not match."),
        "creation_error" => Some("User with this username already exists."),
        _ => None,
    }
}

fn login_error_message(code: &str) -> Option<&'static str> {
    match code {
        "missing_name" => Some("Username is required."),
        "missing_password" => Some("Password is required."),
        "login_error" => Some("Username or password is incorrect."),
        _ => None,
    }
}

async fn get_register(_state: AppState, req: Request) -> Result<Response, Error> {
    if let Some(message) = req.query_param("error").and_then(register_error_message) {
        return Ok(
            Response::render(StatusCode::BadRequest, "Invalid registration", "registerView")
                .with_payload(json!({ "errorMessage": message })),
        );
    }
    Ok(Response::render(
        StatusCode::Ok,
        "User registration page",
        "registerView",
    ))
}

async fn create_user(state: AppState, req: Request) -> Result<Response, Error> {
    let Some(username) = req.body_field("username") else {
        return Ok(Response::redirect(
            StatusCode::BadRequest,
            "Missing username",
            "/register?error=missing_name",
        ));
    };
    let Some(password) = req.body_field("password") else {
        return Ok(Response::redirect(
            StatusCode::BadRequest,
            "Missing password",
            "/register?error=missing_password",
        ));
    };
    if req.body_field("confirmPassword") != Some(password) {
        return Ok(Response::redirect(
            StatusCode::BadRequest,
            "Passwords do not match",
            "/register?error=password_dont_match",
        ));
    }

    let new_user = NewUser {
        username: username.to_string(),
        password_hash: hash_password(password)?,
    };
    let user = match state.users.create(new_user).await {
        Ok(user) => user,
        Err(Error::DuplicateResource(_)) => {
            return Ok(Response::redirect(
                StatusCode::BadRequest,
                "User with this username already exists",
                "/register?error=creation_error",
            ));
        }
        Err(e) => return Err(e),
    };

    tracing::info!(user = user.id, "account created");
    let (_, cookie) = state.sessions.create(user.id);
    Ok(
        Response::redirect(StatusCode::Created, "User created", "/projects")
            .with_cookie(cookie),
    )
}

async fn get_login(_state: AppState, req: Request) -> Result<Response, Error> {
    if let Some(message) = req.query_param("error").and_then(login_error_message) {
        return Ok(
            Response::render(StatusCode::BadRequest, "Invalid credentials", "loginView")
                .with_payload(json!({ "errorMessage": message })),
        );
    }
    Ok(Response::render(StatusCode::Ok, "User login page", "loginView"))
}

async fn login_user(state: AppState, req: Request) -> Result<Response, Error> {
    let Some(username) = req.body_field("username") else {
        return Ok(Response::redirect(
            StatusCode::BadRequest,
            "Missing username",
            "/login?error=missing_name",
        ));
    };
    let Some(password) = req.body_field("password") else {
        return Ok(Response::redirect(
            StatusCode::BadRequest,
            "Missing password",
            "/login?error=missing_password",
        ));
    };

    let user = state.users.find_by_username(username).await?;
    match user {
        Some(user) if verify_password(password, &user.password_hash)? => {
            let (_, cookie) = state.sessions.create(user.id);
            Ok(
                Response::redirect(StatusCode::Ok, "Logged in", "/projects")
                    .with_cookie(cookie),
            )
        }
        _ => {
            tracing::warn!(username, "failed login attempt");
            Ok(Response::redirect(
                StatusCode::BadRequest,
                "Invalid credentials",
                "/login?error=login_error",
            ))
        }
    }
}

async fn logout_user(state: AppState, req: Request) -> Result<Response, Error> {
    if let Some(token) = req.cookie(SESSION_COOKIE) {
        state.sessions.destroy(token);
    }
    Ok(Response::redirect(StatusCode::Ok, "Logged out", "/login")
        .with_cookie(Cookie::cleared(SESSION_COOKIE)))
}
