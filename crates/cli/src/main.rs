use anyhow::{Context, Result};
use mailbox_backup::cli::{self, Settings};
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<()> {
    init_tracing();

    let registry = cli::registry().context("failed to describe command line arguments")?;
    let parsed = registry.parse(cli::tokens(std::env::args_os().skip(1)))?;
    tracing::debug!("parsed {} values", parsed.values.len());

    if parsed.values.bool_or(cli::HELP, false) {
        println!("{}", cli::BANNER);
        print!("{}", registry.help(cli::terminal_width()));
        return Ok(());
    }

    if !parsed.is_valid() {
        print!("{}", registry.render_errors(&parsed.errors));
        return Ok(());
    }

    let settings = Settings::from_values(&parsed.values)?;
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
