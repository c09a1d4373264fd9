use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::migrate::{check_integrity, run_pending_migrations};
use crate::db::pool::DbPool;
use crate::db::stats::print_db_info;
use crate::errors::{AppError, AppResult};

/// Handle the `db` command (maintenance operations).
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Db { migrate, check, info } = cmd else {
        return Err(AppError::Other("unexpected command".into()));
    };

    let mut pool = DbPool::new(&cfg.database)?;

    if *migrate {
        run_pending_migrations(&pool.conn)?;
        println!("✅ Migrations up to date.");
    }

    if *check {
        let verdict = check_integrity(&pool.conn)?;
        if verdict == "ok" {
            println!("✅ Database integrity: ok");
        } else {
            println!("⚠️ Database integrity: {verdict}");
        }
    }

    if *info {
        print_db_info(&mut pool, &cfg.database)?;
    }

    if !*migrate && !*check && !*info {
        println!("Nothing to do: specify at least --migrate, --check or --info.");
    }

    Ok(())
}
