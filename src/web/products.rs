//! Product CRUD handlers

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use minijinja::context;
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::error::Result;
use crate::store::NewProduct;
use crate::web::blank_to_none;
use crate::web::server::SharedState;

#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub manufacturer: String,
    #[serde(default)]
    pub notes: String,
}

impl From<ProductForm> for NewProduct {
    fn from(form: ProductForm) -> Self {
        Self {
            name: form.name.trim().to_string(),
            category: blank_to_none(form.category),
            manufacturer: blank_to_none(form.manufacturer),
            notes: blank_to_none(form.notes),
        }
    }
}

pub async fn list(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
) -> Result<Response> {
    let products = state.store.list_products().await;

    Ok(state
        .templates
        .render(
            "products_list.html",
            context! { user => user, products => products },
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
            "product_form.html",
            context! { user => user, product => None::<()> },
        )?
        .into_response())
}

pub async fn create(
    State(state): State<SharedState>,
    CurrentUser(_user): CurrentUser,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    state.store.create_product(form.into()).await?;
    Ok(Redirect::to("/products").into_response())
}

pub async fn detail(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<u64>,
) -> Result<Response> {
    let product = state.store.product(id).await?;

    Ok(state
        .templates
        .render(
            "product_detail.html",
            context! { user => user, product => product },
        )?
        .into_response())
}

pub async fn edit_form(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<u64>,
) -> Result<Response> {
    let product = state.store.product(id).await?;

    Ok(state
        .templates
        .render(
            "product_form.html",
            context! { user => user, product => product },
        )?
        .into_response())
}

pub async fn update(
    State(state): State<SharedState>,
    CurrentUser(_user): CurrentUser,
    Path(id): Path<u64>,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    state.store.update_product(id, form.into()).await?;
    Ok(Redirect::to(&format!("/products/{}", id)).into_response())
}

pub async fn delete(
    State(state): State<SharedState>,
    CurrentUser(_user): CurrentUser,
    Path(id): Path<u64>,
) -> Result<Response> {
    state.store.delete_product(id).await?;
    Ok(Redirect::to("/products").into_response())
}
