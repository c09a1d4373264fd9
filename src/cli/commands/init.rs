use crate::auth::ensure_admin_exists;
use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::initialize::init_db;
use crate::errors::AppResult;
use crate::utils::path::expand_tilde;
use rusqlite::Connection;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file
///  - the SQLite database schema (all pending migrations)
///  - the admin user, when the user table is empty
pub fn handle(cli: &Cli) -> AppResult<()> {
    Config::init_all(cli.db.clone(), cli.test)?;

    let mut cfg = Config::load()?;
    if let Some(custom) = &cli.db {
        cfg.database = expand_tilde(custom).to_string_lossy().to_string();
    }

    println!("⚙️  Initializing nightlog…");
    println!("📄 Config file : {}", Config::config_file().display());
    println!("🗄️  Database   : {}", &cfg.database);

    let conn = Connection::open(&cfg.database)?;
    init_db(&conn)?;

    if ensure_admin_exists(&conn, &cfg)? {
        println!("👤 Admin user  : {}", &cfg.admin_user);
    }

    println!("✅ Database initialized at {}", &cfg.database);
    Ok(())
}
