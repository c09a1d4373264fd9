//! HTTP surface: shared state and the route table.

pub mod handlers;
pub mod render;

use crate::auth::sessions::SessionStore;
use crate::config::Config;
use crate::db::pool::DbPool;
use axum::Router;
use axum::routing::get;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    /// Single connection behind an async mutex: each handler's reads and
    /// writes form one serialized unit against the database.
    pub db: Arc<Mutex<DbPool>>,
    pub sessions: SessionStore,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(pool: DbPool, config: Config) -> Self {
        Self {
            db: Arc::new(Mutex::new(pool)),
            sessions: SessionStore::new(),
            config: Arc::new(config),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::dashboard))
        .route(
            "/login",
            get(handlers::login_page).post(handlers::login_submit),
        )
        .route("/logout", get(handlers::logout))
        .route("/places/", get(handlers::show_places))
        .route(
            "/places/new",
            get(handlers::add_place_page).post(handlers::add_place_submit),
        )
        .route(
            "/places/{pid}",
            get(handlers::place_page).post(handlers::place_submit),
        )
        .route("/nights/", get(handlers::show_nights))
        .route(
            "/nights/{datekey}",
            get(handlers::night_page).post(handlers::night_submit),
        )
        .with_state(state)
}
