//! Dashboard handler

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use minijinja::context;

use crate::auth::CurrentUser;
use crate::error::Result;
use crate::web::server::SharedState;

pub async fn dashboard(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
) -> Result<Response> {
    let stats = state.store.dashboard_stats(Utc::now().date_naive()).await;

    Ok(state
        .templates
        .render("index.html", context! { user => user, stats => stats })?
        .into_response())
}
