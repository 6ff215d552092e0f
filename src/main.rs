use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Env, Target};
use log::info;
use nav3d::config::Config;
use nav3d::terminal;
use std::fs::File;
use std::io::{self, Write};

/// Installs the logger. An interactive session owns the screen, so logs only
/// go somewhere when a log file was given.
fn init_logging(config: &Config) -> Result<()> {
    let target = match &config.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            Target::Pipe(Box::new(file))
        }
        None if config.snapshot => Target::Stderr,
        None => Target::Pipe(Box::new(io::sink())),
    };

    env_logger::Builder::new()
        .filter_level(config.log_level())
        .parse_env(Env::default())
        .target(target)
        .init();
    Ok(())
}

/// Main function
fn main() -> Result<()> {
    let config = Config::parse();
    init_logging(&config)?;
    info!("{} {} starting", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    if config.snapshot {
        let frame = terminal::snapshot(&config).context("failed to render snapshot")?;
        let mut stdout = io::stdout().lock();
        stdout.write_all(frame.as_bytes())?;
        stdout.flush()?;
        return Ok(());
    }

    terminal::run(&config).context("viewer failed")?;
    Ok(())
}
