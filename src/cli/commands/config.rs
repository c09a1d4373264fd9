use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use std::fs;

/// Handle the `config` command (inspect the configuration file).
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Config { print_config, check } = cmd else {
        return Err(AppError::Other("unexpected command".into()));
    };

    let path = Config::config_file();

    if *print_config {
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            println!("{content}");
        } else {
            println!("No config file at {} (using defaults).", path.display());
        }
    }

    if *check {
        // Config::load already applied env overrides; report what resolved.
        println!("Database   : {}", cfg.database);
        println!("Listen addr: {}", cfg.listen_addr);
        println!("Admin user : {}", cfg.admin_user);
        println!("✅ Configuration loads cleanly.");
    }

    if !*print_config && !*check {
        println!("Nothing to do: specify --print or --check.");
    }

    Ok(())
}
