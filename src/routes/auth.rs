// SPDX-License-Identifier: MIT

//! Signup, login, and role-selection routes.
//!
//! Sessions are demo-grade JWT cookies; passwords are stored and compared
//! as plaintext inside the store (accepted gap for a single-user demo).

use axum::{
    extract::State,
    response::Redirect,
    routing::{get, post},
    Extension, Form, Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, AuthUser, SESSION_COOKIE};
use crate::models::{NewUser, User, UserRole};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/logout", get(logout))
}

/// Routes mounted behind the auth middleware.
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/set-role", post(set_role))
}

/// User fields returned to the client (never the password).
#[derive(Serialize)]
pub struct UserResponse {
    pub id: String,
    pub user_type: UserRole,
    pub name: String,
    pub email: String,
    pub mobile: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        UserResponse {
            id: user.id.clone(),
            user_type: user.user_type,
            name: user.name.clone(),
            email: user.email.clone(),
            mobile: user.mobile.clone(),
        }
    }
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

// ─── Signup ──────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct SignupRequest {
    pub user_type: UserRole,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 100))]
    pub password: String,
    #[validate(length(min = 1, max = 32))]
    pub mobile: String,
}

/// Create an account. An email may hold one account per role.
async fn signup(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<SignupRequest>,
) -> Result<(CookieJar, Json<AuthResponse>)> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let role = req.user_type;
    let user = state
        .store
        .create_user(NewUser {
            user_type: role,
            name: req.name,
            email: req.email,
            password: req.password,
            mobile: req.mobile,
        })
        .ok_or_else(|| {
            AppError::Conflict(format!("A {role} account with this email already exists"))
        })?;

    tracing::info!(user_id = %user.id, role = %user.user_type, "User signed up");

    let token = create_jwt(&user.id, user.user_type, &state.config.jwt_signing_key)?;
    let response = AuthResponse {
        token: token.clone(),
        user: UserResponse::from(&user),
    };
    Ok((jar.add(session_cookie(token)), Json(response)))
}

// ─── Login ───────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
    pub user_type: UserRole,
}

/// Log in with email, password, and role.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>)> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    if !state
        .store
        .validate_user_password(&req.email, &req.password, req.user_type)
    {
        return Err(AppError::Unauthorized);
    }

    // The password check just passed, so the user exists.
    let user = state
        .store
        .get_user_by_email_and_type(&req.email, req.user_type)
        .ok_or(AppError::Unauthorized)?;

    tracing::info!(user_id = %user.id, role = %user.user_type, "User logged in");

    let token = create_jwt(&user.id, user.user_type, &state.config.jwt_signing_key)?;
    let response = AuthResponse {
        token: token.clone(),
        user: UserResponse::from(&user),
    };
    Ok((jar.add(session_cookie(token)), Json(response)))
}

// ─── Logout ──────────────────────────────────────────────────

#[derive(Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

/// Clear the session cookie.
async fn logout(jar: CookieJar) -> (CookieJar, Json<LogoutResponse>) {
    let mut removal = Cookie::from(SESSION_COOKIE);
    removal.set_path("/");
    (jar.remove(removal), Json(LogoutResponse { success: true }))
}

// ─── Role selection ──────────────────────────────────────────

#[derive(Deserialize)]
pub struct SetRoleForm {
    role: String,
}

/// Form submission from the role-selection page.
///
/// Re-issues the session token with the chosen role and redirects to the
/// matching dashboard; anything but `driver`/`passenger` is a client
/// error.
async fn set_role(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    jar: CookieJar,
    Form(form): Form<SetRoleForm>,
) -> Result<(CookieJar, Redirect)> {
    let role: UserRole = form
        .role
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid role".to_string()))?;

    let token = create_jwt(&user.user_id, role, &state.config.jwt_signing_key)?;

    tracing::info!(user_id = %user.user_id, role = %role, "Role selected");

    let destination = match role {
        UserRole::Driver => "/driver",
        UserRole::Passenger => "/passenger",
    };
    Ok((jar.add(session_cookie(token)), Redirect::to(destination)))
}
