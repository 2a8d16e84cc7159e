//! User administration handlers, admin role required

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use minijinja::context;
use serde::Deserialize;

use crate::auth::{hash_password, AdminUser, UserRole};
use crate::error::{Error, Result};
use crate::store::NewUser;
use crate::web::server::SharedState;

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct CreateUserForm {
    pub username: String,
    pub password: String,
    pub role: UserRole,
    #[serde(default = "default_active")]
    pub active: bool,
}

#[derive(Debug, Deserialize)]
pub struct EditUserForm {
    pub username: String,
    pub role: UserRole,
    #[serde(default = "default_active")]
    pub active: bool,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordForm {
    pub password: String,
}

pub async fn list(State(state): State<SharedState>, AdminUser(user): AdminUser) -> Result<Response> {
    let users = state.store.list_users().await;

    Ok(state
        .templates
        .render("users_list.html", context! { user => user, users => users })?
        .into_response())
}

pub async fn new_form(
    State(state): State<SharedState>,
    AdminUser(user): AdminUser,
) -> Result<Response> {
    Ok(state
        .templates
        .render(
            "user_form.html",
            context! { user => user, user_obj => None::<()> },
        )?
        .into_response())
}

pub async fn create(
    State(state): State<SharedState>,
    AdminUser(_user): AdminUser,
    Form(form): Form<CreateUserForm>,
) -> Result<Response> {
    state
        .store
        .create_user(NewUser {
            username: form.username.trim().to_string(),
            password_hash: hash_password(&form.password)?,
            role: form.role,
            active: form.active,
        })
        .await?;

    Ok(Redirect::to("/admin/users").into_response())
}

pub async fn edit_form(
    State(state): State<SharedState>,
    AdminUser(user): AdminUser,
    Path(id): Path<u64>,
) -> Result<Response> {
    let user_obj = state
        .store
        .user_by_id(id)
        .await
        .ok_or(Error::UserNotFound(id))?;

    Ok(state
        .templates
        .render(
            "user_form.html",
            context! { user => user, user_obj => user_obj },
        )?
        .into_response())
}

pub async fn update(
    State(state): State<SharedState>,
    AdminUser(_user): AdminUser,
    Path(id): Path<u64>,
    Form(form): Form<EditUserForm>,
) -> Result<Response> {
    state
        .store
        .update_user(id, form.username.trim().to_string(), form.role, form.active)
        .await?;

    Ok(Redirect::to("/admin/users").into_response())
}

pub async fn reset_password_form(
    State(state): State<SharedState>,
    AdminUser(user): AdminUser,
    Path(id): Path<u64>,
) -> Result<Response> {
    let user_obj = state
        .store
        .user_by_id(id)
        .await
        .ok_or(Error::UserNotFound(id))?;

    Ok(state
        .templates
        .render(
            "user_reset_password.html",
            context! { user => user, user_obj => user_obj },
        )?
        .into_response())
}

pub async fn reset_password(
    State(state): State<SharedState>,
    AdminUser(_user): AdminUser,
    Path(id): Path<u64>,
    Form(form): Form<ResetPasswordForm>,
) -> Result<Response> {
    state
        .store
        .reset_password(id, hash_password(&form.password)?)
        .await?;

    Ok(Redirect::to("/admin/users").into_response())
}
