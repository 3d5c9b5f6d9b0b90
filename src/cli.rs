use clap::{Args, Parser, Subcommand};
use pv_core::config::Config;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pixvault")]
#[command(author, version, about = "Image upload service")]
pub struct Cli {
    /// Path to a JSON config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub overrides: Overrides,

    /// Defaults to `serve`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve,

    /// Print warnings for the effective configuration
    Validate,

    /// Display version information
    Version,
}

/// Settings that take precedence over the config file.
#[derive(Args, Debug, Default)]
pub struct Overrides {
    /// Host to bind to
    #[arg(long, env = "HOST", global = true)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "PORT", global = true)]
    pub port: Option<u16>,

    /// SQLite file holding image metadata
    #[arg(long, env = "PIXVAULT_DB_PATH", global = true)]
    pub db_path: Option<PathBuf>,

    /// Directory uploaded images are written to
    #[arg(long, env = "PIXVAULT_UPLOAD_DIR", global = true)]
    pub upload_dir: Option<PathBuf>,

    /// Landing page served at `/`
    #[arg(long, env = "PIXVAULT_INDEX_PATH", global = true)]
    pub index_path: Option<PathBuf>,
}

impl Overrides {
    pub fn apply(self, config: &mut Config) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(index_path) = self.index_path {
            config.server.index_path = index_path;
        }
        if let Some(db_path) = self.db_path {
            config.store.db_path = db_path;
        }
        if let Some(dir) = self.upload_dir {
            config.uploads.dir = dir;
        }
    }
}
