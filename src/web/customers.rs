//! Customer CRUD handlers

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use minijinja::context;
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::error::Result;
use crate::store::NewCustomer;
use crate::web::blank_to_none;
use crate::web::server::SharedState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CustomerForm {
    pub customer_number: String,
    pub name: String,
    #[serde(default)]
    pub contact_name: String,
    #[serde(default)]
    pub contact_email: String,
    #[serde(default)]
    pub contact_phone: String,
    #[serde(default)]
    pub notes: String,
}

impl From<CustomerForm> for NewCustomer {
    fn from(form: CustomerForm) -> Self {
        Self {
            customer_number: form.customer_number.trim().to_string(),
            name: form.name.trim().to_string(),
            contact_name: blank_to_none(form.contact_name),
            contact_email: blank_to_none(form.contact_email),
            contact_phone: blank_to_none(form.contact_phone),
            notes: blank_to_none(form.notes),
        }
    }
}

pub async fn list(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ListQuery>,
) -> Result<Response> {
    let q = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty());
    let customers = state.store.list_customers(q).await;

    Ok(state
        .templates
        .render(
            "customers_list.html",
            context! { user => user, customers => customers, q => q },
        )?
        .into_response())
}

pub async fn new_form(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
) -> Result<Response> {
    Ok(state
        .templates
        .render(
            "customer_form.html",
            context! { user => user, customer => None::<()> },
        )?
        .into_response())
}

pub async fn create(
    State(state): State<SharedState>,
    CurrentUser(_user): CurrentUser,
    Form(form): Form<CustomerForm>,
) -> Result<Response> {
    state.store.create_customer(form.into()).await?;
    Ok(Redirect::to("/customers").into_response())
}

pub async fn detail(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<u64>,
) -> Result<Response> {
    let customer = state.store.customer(id).await?;

    Ok(state
        .templates
        .render(
            "customer_detail.html",
            context! { user => user, customer => customer },
        )?
        .into_response())
}

pub async fn edit_form(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<u64>,
) -> Result<Response> {
    let customer = state.store.customer(id).await?;

    Ok(state
        .templates
        .render(
            "customer_form.html",
            context! { user => user, customer => customer },
        )?
        .into_response())
}

pub async fn update(
    State(state): State<SharedState>,
    CurrentUser(_user): CurrentUser,
    Path(id): Path<u64>,
    Form(form): Form<CustomerForm>,
) -> Result<Response> {
    state.store.update_customer(id, form.into()).await?;
    Ok(Redirect::to(&format!("/customers/{}", id)).into_response())
}

pub async fn delete(
    State(state): State<SharedState>,
    CurrentUser(_user): CurrentUser,
    Path(id): Path<u64>,
) -> Result<Response> {
    state.store.delete_customer(id).await?;
    Ok(Redirect::to("/customers").into_response())
}
