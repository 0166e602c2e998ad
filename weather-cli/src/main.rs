//! Binary crate for the `weather-etl` command.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Logging setup
//! - Wiring the QWeather provider and PostgreSQL store into the core pipeline
//!
//! Any error returned from `main` is printed once to stderr by the runtime and
//! exits non-zero, which is what the external scheduler keys its retries and
//! failure notifications on.

use clap::Parser;

mod cli;
mod logger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    logger::init(cmd.debug)?;

    cmd.run().await
}
