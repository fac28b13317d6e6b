//! Auth Endpoints
//!
//! - POST /auth/signup - create an attendee account
//! - POST /auth/login  - open a session, set the cookie
//! - GET  /auth/logout - drop the session, clear the cookie

use axum::extract::State;
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Form, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;

use crate::api::common::found;
use crate::api::middleware::{AppState, SESSION_COOKIE};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

pub async fn signup(
    State(state): State<AppState>,
    Form(form): Form<SignupForm>,
) -> Result<Response, AppError> {
    state.auth.signup(&form.name, &form.email, &form.password).await?;
    Ok(found("/login"))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(CookieJar, Response), AppError> {
    let (_user, session) = state.auth.login(&form.email, &form.password).await?;

    let cookie = Cookie::build((SESSION_COOKIE, session.token))
        .http_only(true)
        .path("/")
        .build();

    Ok((jar.add(cookie), found("/")))
}

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Response), AppError> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.auth.logout(cookie.value()).await?;
    }
    // The removal cookie must carry the same path as the one set at
    // login, or the browser keeps the stale copy.
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    Ok((jar, found("/")))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/logout", get(logout))
}
