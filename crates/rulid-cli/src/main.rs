mod commands;
mod config;
mod telemetry;

use std::io::{BufWriter, Write};

use clap::Parser;
use config::{CliArgs, Config};
use telemetry::init_telemetry;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = Config::try_from(args)?;

    init_telemetry()?;
    tracing::debug!(?config, "starting");

    let mut out = BufWriter::new(std::io::stdout().lock());
    match &config {
        Config::Generate(cfg) => commands::generate(cfg, rulid::now_ms, &mut out)?,
        Config::Inspect(cfg) => commands::inspect(cfg, &mut out)?,
    }
    out.flush()?;
    Ok(())
}
