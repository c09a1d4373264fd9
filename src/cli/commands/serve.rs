use crate::auth::ensure_admin_exists;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::http::{self, AppState};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Handle the `serve` command: bring the schema up to date, bootstrap the
/// admin user if needed, then serve the HTTP surface until terminated.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Serve { listen } = cmd else {
        return Err(AppError::Other("unexpected command".into()));
    };

    let mut cfg = cfg.clone();
    if let Some(addr) = listen {
        cfg.listen_addr = addr.clone();
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run(cfg))
}

async fn run(cfg: Config) -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let pool = DbPool::new(&cfg.database)?;
    init_db(&pool.conn)?;
    ensure_admin_exists(&pool.conn, &cfg)?;

    let listen_addr = cfg.listen_addr.clone();
    let database = cfg.database.clone();
    let state = AppState::new(pool, cfg);
    let app = http::router(state);

    let listener = TcpListener::bind(&listen_addr).await?;
    info!(addr = %listen_addr, db = %database, "nightlog ready");
    println!();
    println!("  nightlog ready");
    println!();
    println!("  \x1b[32mOpen in browser: http://{listen_addr}\x1b[0m");
    println!();

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Other(format!("HTTP server error: {e}")))?;
    Ok(())
}
