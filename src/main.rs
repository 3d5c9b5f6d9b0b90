mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use pv_core::config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG if set, otherwise pick defaults based on the verbose flag.
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "pixvault=trace,pv_server=trace,pv_db=debug,pv_core=debug,tower_http=debug".to_string()
        } else {
            "pixvault=info,pv_server=info,pv_db=info,pv_core=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    let mut config = Config::load_or_default(cli.config.as_deref());
    cli.overrides.apply(&mut config);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(pv_server::start(config))
                .context("server exited with an error")
        }
        Commands::Validate => validate_config(&config),
        Commands::Version => {
            println!("pixvault {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn validate_config(config: &Config) -> Result<()> {
    let warnings = config.validate();
    if warnings.is_empty() {
        println!("Configuration OK");
    } else {
        for warning in &warnings {
            println!("warning: {warning}");
        }
    }
    Ok(())
}
