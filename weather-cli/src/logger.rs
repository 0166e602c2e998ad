use anyhow::Result;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

/// Install the global subscriber. Logs go to stderr so stdout stays free for the run summary.
pub fn init(debug: bool) -> Result<()> {
    let level = if debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env()?,
        )
        .with_writer(std::io::stderr)
        .with_file(debug)
        .with_line_number(debug)
        .with_target(debug)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
