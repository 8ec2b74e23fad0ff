//! Backend for the VELONIX symposium registration site.
//!
//! # General Infrastructure
//! - Public API: registration submission (multipart form with a payment
//!   screenshot), contact form, and the static event catalog
//! - Admin API: token-protected review endpoints (list registrations,
//!   update status, aggregate stats)
//! - Storage: one SQLite file in WAL mode, single `registrations` table
//!   plus the seeded `admins` credential table
//! - Uploaded screenshots are written under the uploads directory and
//!   served back at `/uploads/<name>`
//! - Confirmation/alert emails are dispatched on detached tasks and never
//!   block or fail a request
//!
//! # Configuration
//!
//! All configuration comes from environment variables (a `.env` file is
//! honored):
//!
//! - `PORT` (3000), `DATABASE_PATH` (`velonix.db`), `UPLOADS_DIR` (`uploads`)
//! - `ADMIN_PASSWORD`, `JWT_SECRET` -- both fall back to development values
//!   with a logged warning
//! - `APP_URL` -- externally reachable base URL used in email links
//! - `SMTP_HOST`, `SMTP_PORT`, `SMTP_USER`, `SMTP_PASS` -- email delivery is
//!   disabled unless user and pass are both set
//!
//! # Setup
//!
//! Run the server.
//! ```sh
//! cargo run
//! ```
//!
//! View current docs.
//! ```sh
//! cargo doc --open
//! ```
use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::{get, post},
};
use dotenv::dotenv;
use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::{cors::CorsLayer, services::ServeDir};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod events;
pub mod mail;
pub mod routes;
pub mod state;
pub mod ticket;
pub mod validate;

use routes::{
    contact_handler, events_handler, login_handler, register_handler, registrations_handler,
    stats_handler, update_status_handler,
};
use state::AppState;

/// Largest accepted request body; payment screenshots stay well under this.
const BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api/register", post(register_handler))
        .route("/api/contact", post(contact_handler))
        .route("/api/events", get(events_handler))
        .route("/api/admin/login", post(login_handler))
        .route("/api/admin/registrations", get(registrations_handler))
        .route("/api/admin/update-status", post(update_status_handler))
        .route("/api/admin/stats", get(stats_handler))
        .nest_service("/uploads", ServeDir::new(&state.config.uploads_dir))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(cors)
        .with_state(state)
}

pub async fn start_server() {
    dotenv().ok();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new();

    info!("Starting server...");
    let app = router(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
