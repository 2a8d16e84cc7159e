//! License CRUD handlers

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use chrono::Utc;
use minijinja::context;
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::error::Result;
use crate::store::{Expiring, LicenseFilter, LicenseStatus, NewLicense};
use crate::web::server::SharedState;
use crate::web::{blank_to_none, parse_date, parse_u32};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub expiring: Option<String>,
    pub status: Option<String>,
    pub customer_id: Option<String>,
    pub product_id: Option<String>,
    pub q: Option<String>,
}

impl ListQuery {
    /// Unrecognized filter values mean "no filter", matching how browsers
    /// submit the blank select options.
    fn to_filter(&self) -> LicenseFilter {
        LicenseFilter {
            expiring: self.expiring.as_deref().and_then(Expiring::parse),
            status: self
                .status
                .as_deref()
                .filter(|s| *s != "all")
                .and_then(LicenseStatus::parse),
            customer_id: self.customer_id.as_deref().and_then(|s| s.parse().ok()),
            product_id: self.product_id.as_deref().and_then(|s| s.parse().ok()),
            q: self
                .q
                .as_deref()
                .map(str::trim)
                .filter(|q| !q.is_empty())
                .map(str::to_string),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LicenseForm {
    pub customer_id: u64,
    pub product_id: u64,
    #[serde(default)]
    pub license_key: String,
    #[serde(default)]
    pub seats: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub interval: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub notes: String,
}

impl LicenseForm {
    fn into_new_license(self) -> Result<NewLicense> {
        Ok(NewLicense {
            customer_id: self.customer_id,
            product_id: self.product_id,
            license_key: blank_to_none(self.license_key),
            seats: parse_u32("seats", &self.seats)?,
            start_date: parse_date("start_date", &self.start_date)?,
            end_date: parse_date("end_date", &self.end_date)?,
            interval: blank_to_none(self.interval),
            price: blank_to_none(self.price),
            status: LicenseStatus::parse(self.status.trim()),
            notes: blank_to_none(self.notes),
        })
    }
}

pub async fn list(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ListQuery>,
) -> Result<Response> {
    let filter = query.to_filter();
    let today = Utc::now().date_naive();

    let licenses = state.store.list_licenses(&filter, today).await;
    let customers = state.store.list_customers(None).await;
    let products = state.store.list_products().await;

    Ok(state
        .templates
        .render(
            "licenses_list.html",
            context! {
                user => user,
                licenses => licenses,
                customers => customers,
                products => products,
                expiring => query.expiring,
                status => query.status,
                customer_id => filter.customer_id,
                product_id => filter.product_id,
                q => filter.q,
            },
        )?
        .into_response())
}

pub async fn new_form(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
) -> Result<Response> {
    let customers = state.store.list_customers(None).await;
    let products = state.store.list_products().await;

    Ok(state
        .templates
        .render(
            "license_form.html",
            context! {
                user => user,
                license => None::<()>,
                customers => customers,
                products => products,
            },
        )?
        .into_response())
}

pub async fn create(
    State(state): State<SharedState>,
    CurrentUser(_user): CurrentUser,
    Form(form): Form<LicenseForm>,
) -> Result<Response> {
    state.store.create_license(form.into_new_license()?).await?;
    Ok(Redirect::to("/licenses").into_response())
}

pub async fn detail(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<u64>,
) -> Result<Response> {
    let license = state.store.license_view(id).await?;

    Ok(state
        .templates
        .render(
            "license_detail.html",
            context! { user => user, license => license },
        )?
        .into_response())
}

pub async fn edit_form(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<u64>,
) -> Result<Response> {
    let license = state.store.license(id).await?;
    let customers = state.store.list_customers(None).await;
    let products = state.store.list_products().await;

    Ok(state
        .templates
        .render(
            "license_form.html",
            context! {
                user => user,
                license => license,
                customers => customers,
                products => products,
            },
        )?
        .into_response())
}

pub async fn update(
    State(state): State<SharedState>,
    CurrentUser(_user): CurrentUser,
    Path(id): Path<u64>,
    Form(form): Form<LicenseForm>,
) -> Result<Response> {
    state
        .store
        .update_license(id, form.into_new_license()?)
        .await?;
    Ok(Redirect::to(&format!("/licenses/{}", id)).into_response())
}

pub async fn delete(
    State(state): State<SharedState>,
    CurrentUser(_user): CurrentUser,
    Path(id): Path<u64>,
) -> Result<Response> {
    state.store.delete_license(id).await?;
    Ok(Redirect::to("/licenses").into_response())
}
