mod api;
mod password;
mod state;
mod store;

use std::path::PathBuf;
use std::sync::Arc;

use axum::routing::{get, post};
use tracing::{error, info};

use crate::state::AppState;
use crate::store::UserStore;

const PORT: u32 = 3000;
const DEFAULT_STORE_PATH: &str = "users.json";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().init();

    let store_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH));
    let store = match UserStore::load(&store_path) {
        Ok(store) => store,
        Err(err) => {
            error!(%err, path = %store_path.display(), "failed to load user store");
            std::process::exit(1);
        }
    };
    info!(path = %store_path.display(), users = store.users.len(), "user store loaded");

    let state = Arc::new(AppState::new(store_path, store));

    let app = axum::Router::new()
        .route("/api/test", get(api::health))
        .route("/api/register", post(api::register))
        .route("/api/login", post(api::login))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{PORT}"))
        .await
        .expect("failed to bind server port");
    info!("Listening on port {PORT}");
    axum::serve(listener, app)
        .await
        .expect("server terminated unexpectedly");
}
