//! HTTP server and router

use axum::{
    routing::{get, post},
    Router,
};
use chrono::Utc;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::auth::{SessionPolicy, SessionStore};
use crate::config::Config;
use crate::error::Result;
use crate::store::Store;

use super::templates::Templates;
use super::{admin_users, customers, dashboard, licenses, login, products};

/// Application state shared across handlers. The store and session store
/// lock internally, so handlers share a plain Arc.
pub struct AppState {
    pub config: Config,
    pub store: Store,
    pub sessions: SessionStore,
    pub policy: SessionPolicy,
    pub templates: Templates,
}

pub type SharedState = Arc<AppState>;

/// Run the HTTP server
pub async fn run_server(config: Config, host: &str, port: u16) -> Result<()> {
    if config.session.is_default_secret() {
        tracing::warn!(
            "session.secret_key is the development default; set KEYDESK_SECRET before exposing this server"
        );
    }

    let store = Store::open(&config.store.data_file)?;
    store.seed_demo_data().await?;

    let policy = SessionPolicy::from_config(&config.session);
    let state = Arc::new(AppState {
        config,
        store,
        sessions: SessionStore::new(),
        policy,
        templates: Templates::new()?,
    });

    spawn_session_sweeper(Arc::clone(&state));

    let app = create_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Periodically drop sessions past either timeout, so records for browsers
/// that never come back do not pile up.
fn spawn_session_sweeper(state: SharedState) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(600));
        loop {
            interval.tick().await;
            let purged = state
                .sessions
                .purge_expired(
                    state.policy.idle_timeout(),
                    state.policy.max_duration(),
                    Utc::now(),
                )
                .await;
            if purged > 0 {
                tracing::debug!(purged, "removed expired sessions");
            }
        }
    });
}

/// Create the router with all routes
fn create_router(state: SharedState) -> Router {
    Router::new()
        // Authentication
        .route("/login", get(login::login_form).post(login::login_submit))
        .route("/logout", get(login::logout))
        // Dashboard
        .route("/", get(dashboard::dashboard))
        // Customers
        .route("/customers", get(customers::list))
        .route(
            "/customers/new",
            get(customers::new_form).post(customers::create),
        )
        .route("/customers/{id}", get(customers::detail))
        .route(
            "/customers/{id}/edit",
            get(customers::edit_form).post(customers::update),
        )
        .route("/customers/{id}/delete", post(customers::delete))
        // Products
        .route("/products", get(products::list))
        .route(
            "/products/new",
            get(products::new_form).post(products::create),
        )
        .route("/products/{id}", get(products::detail))
        .route(
            "/products/{id}/edit",
            get(products::edit_form).post(products::update),
        )
        .route("/products/{id}/delete", post(products::delete))
        // Licenses
        .route("/licenses", get(licenses::list))
        .route(
            "/licenses/new",
            get(licenses::new_form).post(licenses::create),
        )
        .route("/licenses/{id}", get(licenses::detail))
        .route(
            "/licenses/{id}/edit",
            get(licenses::edit_form).post(licenses::update),
        )
        .route("/licenses/{id}/delete", post(licenses::delete))
        // User administration
        .route("/admin/users", get(admin_users::list))
        .route(
            "/admin/users/new",
            get(admin_users::new_form).post(admin_users::create),
        )
        .route(
            "/admin/users/{id}/edit",
            get(admin_users::edit_form).post(admin_users::update),
        )
        .route(
            "/admin/users/{id}/reset-password",
            get(admin_users::reset_password_form).post(admin_users::reset_password),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
