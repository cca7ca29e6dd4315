use anyhow::Result;
use clap::Parser;
use keytoken_cli::args::{CliArgs, LogLevel};
use keytoken_cli::commands;
use keytoken_config::KeytoolConfig;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    let cli = CliArgs::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => {
            debug!(path = %path.display(), "loading configuration");
            KeytoolConfig::load(path)?
        }
        None => KeytoolConfig::default(),
    };

    let output = commands::execute(&cli.command, &config)?;
    println!("{output}");
    Ok(())
}

fn init_tracing(level: LogLevel) {
    let default_level = tracing::Level::from(level).to_string().to_lowercase();
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}
