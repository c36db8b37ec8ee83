//!
//! Module to initialize tracing logs.
//!
//! Logs go to stderr so command output on stdout stays machine readable.
//! `RUST_LOG` wins over the config file when set.
//!

use tracing_subscriber::{
    EnvFilter,
    filter::{Directive, LevelFilter},
};

use crate::config::LoggingToml;

/// Build the filter for `config`, with `level` replacing the configured base level.
///
/// A base level of `off` silences every target, `module_levels` included.
pub fn env_filter(config: &LoggingToml, level: Option<&str>) -> anyhow::Result<EnvFilter> {
    let level = level.unwrap_or(&config.level);
    let level: LevelFilter = level
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid log level: {level}"))?;
    let mut filter = EnvFilter::new("").add_directive(level.into());

    if level == LevelFilter::OFF {
        return Ok(filter);
    }

    for directive in &config.module_levels {
        if !directive.contains('=') {
            anyhow::bail!("invalid target log level directive: {directive}");
        }
        filter = filter.add_directive(parse_directive(directive)?);
    }

    Ok(filter)
}

/// Initialize tracing logger based on the values defined in the config file.
pub fn init_tracing_logs_with_config_if_set(
    config: Option<&LoggingToml>,
    level: Option<&str>,
) -> anyhow::Result<()> {
    let config = match (config, level) {
        (Some(config), _) => config.clone(),
        (None, Some(level)) => LoggingToml {
            level: level.to_string(),
            module_levels: Vec::new(),
        },
        (None, None) => return Ok(()),
    };

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => env_filter(&config, level)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    Ok(())
}

fn parse_directive(raw: &str) -> anyhow::Result<Directive> {
    raw.parse()
        .map_err(|_| anyhow::anyhow!("invalid log level directive: {raw}"))
}
