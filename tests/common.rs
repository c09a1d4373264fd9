#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use nightlog::auth::ensure_admin_exists;
use nightlog::config::Config;
use nightlog::db::initialize::init_db;
use nightlog::db::pool::DbPool;
use nightlog::http::{AppState, router};
use axum::Router;
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn nlog() -> Command {
    cargo_bin_cmd!("nightlog")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_nightlog.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

pub const TEST_ADMIN_USER: &str = "admin";
pub const TEST_ADMIN_PASSWORD: &str = "hunter2";

/// Fresh app state over an initialized temp database with the test admin
/// bootstrapped. Returns the state plus the DB path for direct assertions.
pub fn build_state(name: &str) -> (AppState, String) {
    let db_path = setup_test_db(name);
    let pool = DbPool::new(&db_path).expect("open db");
    init_db(&pool.conn).expect("init db");

    let cfg = Config {
        database: db_path.clone(),
        listen_addr: "127.0.0.1:0".to_string(),
        admin_user: TEST_ADMIN_USER.to_string(),
        admin_password: TEST_ADMIN_PASSWORD.to_string(),
    };
    ensure_admin_exists(&pool.conn, &cfg).expect("bootstrap admin");

    (AppState::new(pool, cfg), db_path)
}

/// Router over a fresh test state.
pub fn build_router(name: &str) -> (Router, String) {
    let (state, db_path) = build_state(name);
    (router(state), db_path)
}
