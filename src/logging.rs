//! Tracing subscriber setup for the simulation binary.

use tracing::{Level, Subscriber};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::error::{Result, ZkpError};

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Most verbose level that is emitted
    pub level: Level,
    /// Include the module target in each line
    pub with_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: Level::WARN, with_target: false }
    }
}

impl LogConfig {
    pub fn verbose() -> Self {
        Self { level: Level::DEBUG, with_target: true }
    }
}

/// Builds the `fmt` subscriber described by `config` without installing it.
pub fn build_subscriber(config: &LogConfig) -> impl Subscriber + Send + Sync + 'static {
    let filter =
        EnvFilter::builder().with_default_directive(config.level.into()).parse_lossy("");

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(config.with_target).with_writer(std::io::stderr))
        .with(filter)
}

/// Installs [`build_subscriber`] as the global default.
///
/// Fails if a global subscriber is already set.
pub fn init_tracing(config: &LogConfig) -> Result<()> {
    build_subscriber(config).try_init().map_err(|e| ZkpError::Logging(e.to_string()))
}
