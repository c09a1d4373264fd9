use clap::{Parser, Subcommand};

/// Command-line interface definition for nightlog
/// Self-hosted sleep tracking web app backed by SQLite
#[derive(Parser)]
#[command(
    name = "nightlog",
    version = env!("CARGO_PKG_VERSION"),
    about = "A small self-hosted sleep tracker: log nights, places and review your sleep history",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Run the web application
    Serve {
        /// Address to bind (host:port); overrides the configured value
        #[arg(long = "listen", value_name = "ADDR")]
        listen: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Manage the configuration file
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check the configuration file for problems")]
        check: bool,
    },
}
