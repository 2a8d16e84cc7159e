//! Login and logout handlers

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::HeaderMap;
use axum::response::{AppendHeaders, IntoResponse, Redirect, Response};
use axum::Form;
use minijinja::context;
use serde::Deserialize;

use crate::auth::middleware::{clear_session_cookie, session_cookie, session_token};
use crate::auth::token::{decode_token, issue_token};
use crate::error::Result;
use crate::web::server::SharedState;

/// Shown for an unknown username, a wrong password and a locked account
/// alike; the login page must not reveal which one it was.
const LOGIN_FAILED: &str = "Username or password is incorrect.";

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

pub async fn login_form(State(state): State<SharedState>, headers: HeaderMap) -> Result<Response> {
    // Already logged in? Straight to the dashboard.
    if let Some(token) = session_token(&headers) {
        if let Ok(claims) = decode_token(&token, &state.config.session.secret_key) {
            if state.sessions.get(&claims.sid).await.is_some() {
                return Ok(Redirect::to("/").into_response());
            }
        }
    }

    Ok(state
        .templates
        .render(
            "login.html",
            context! { user => None::<()>, error => None::<String> },
        )?
        .into_response())
}

pub async fn login_submit(
    State(state): State<SharedState>,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    match state
        .policy
        .login(&state.sessions, &state.store, &form.username, &form.password)
        .await
    {
        Some(session_id) => {
            let token = issue_token(
                &session_id,
                &state.config.session.secret_key,
                state.policy.max_duration(),
            )?;
            Ok((
                AppendHeaders([(SET_COOKIE, session_cookie(&token))]),
                Redirect::to("/"),
            )
                .into_response())
        }
        None => {
            tracing::info!(username = %form.username, "failed login attempt");
            Ok(state
                .templates
                .render(
                    "login.html",
                    context! { user => None::<()>, error => LOGIN_FAILED },
                )?
                .into_response())
        }
    }
}

pub async fn logout(State(state): State<SharedState>, headers: HeaderMap) -> Result<Response> {
    if let Some(token) = session_token(&headers) {
        if let Ok(claims) = decode_token(&token, &state.config.session.secret_key) {
            state.sessions.remove(&claims.sid).await;
        }
    }

    Ok((
        AppendHeaders([(SET_COOKIE, clear_session_cookie())]),
        Redirect::to("/login"),
    )
        .into_response())
}
