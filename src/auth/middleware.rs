//! Authentication extractors
//!
//! Handlers take a [`CurrentUser`] (or [`AdminUser`]) argument and get a
//! resolved principal; the extractor owns cookie parsing and the policy
//! check. A rejected session answers with a 303 to the login page, a role
//! failure with a 403.

use crate::auth::models::{Principal, UserRole};
use crate::auth::token::decode_token;
use crate::web::server::SharedState;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use chrono::Utc;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "keydesk_session";

/// Pull the session token out of the Cookie header
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let cookie_header = headers.get(header::COOKIE)?;
    let cookie_str = cookie_header.to_str().ok()?;

    for cookie in cookie_str.split(';') {
        if let Some((name, value)) = cookie.trim().split_once('=') {
            if name == SESSION_COOKIE {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// Set-Cookie value establishing a session
pub fn session_cookie(token: &str) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, token
    )
}

/// Set-Cookie value clearing the session cookie
pub fn clear_session_cookie() -> String {
    format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        SESSION_COOKIE
    )
}

fn login_redirect() -> Response {
    Redirect::to("/login").into_response()
}

/// The authenticated principal for this request
pub struct CurrentUser(pub Principal);

impl<S> FromRequestParts<S> for CurrentUser
where
    SharedState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = SharedState::from_ref(state);

        let Some(token) = session_token(&parts.headers) else {
            return Err(login_redirect());
        };
        let Ok(claims) = decode_token(&token, &state.config.session.secret_key) else {
            return Err(login_redirect());
        };

        match state
            .policy
            .authenticate(&state.sessions, &state.store, &claims.sid, Utc::now())
            .await
        {
            Ok(principal) => Ok(CurrentUser(principal)),
            Err(denial) => {
                tracing::debug!(?denial, "session rejected");
                Err(login_redirect())
            }
        }
    }
}

/// Like [`CurrentUser`], but additionally requires the admin role
pub struct AdminUser(pub Principal);

impl<S> FromRequestParts<S> for AdminUser
where
    SharedState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentUser(principal) = CurrentUser::from_request_parts(parts, state).await?;

        if principal.require_role(UserRole::Admin).is_err() {
            return Err((StatusCode::FORBIDDEN, "Insufficient privileges").into_response());
        }
        Ok(AdminUser(principal))
    }
}
