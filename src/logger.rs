//! Console logging.
//!
//! Call sites use the `log` macros; records are forwarded into a
//! `tracing-subscriber` formatter on stderr, filtered with an `EnvFilter`.
//! `-v`/`-q` pick a level for this crate only. Without them `INKPRESS_LOG`
//! takes full filter directives (`debug`, `inkpress=trace,aws_sdk_s3=debug`),
//! and the default is `info` for this crate.

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "INKPRESS_LOG";

const CRATE: &str = env!("CARGO_CRATE_NAME");

/// The level the command line flags ask for, if any.
fn flag_level(verbose: u8, quiet: bool) -> Option<&'static str> {
    if quiet {
        return Some("warn");
    }
    match verbose {
        0 => None,
        1 => Some("debug"),
        _ => Some("trace"),
    }
}

/// Build the filter: flags win over the environment, which wins over the
/// default.
pub fn filter(verbose: u8, quiet: bool, env: Option<&str>) -> Result<EnvFilter> {
    if let Some(level) = flag_level(verbose, quiet) {
        return Ok(EnvFilter::new(format!("{CRATE}={level}")));
    }
    match env.map(str::trim) {
        Some(directives) if !directives.is_empty() => EnvFilter::try_new(directives)
            .with_context(|| format!("Invalid {LOG_ENV} filter `{directives}`")),
        _ => Ok(EnvFilter::new(format!("{CRATE}=info"))),
    }
}

/// Install the stderr subscriber. Can only be called once per process.
pub fn init(filter: EnvFilter) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init()
        .map_err(|e| anyhow!("Failed to install logger: {e}"))
}

#[cfg(test)]
mod test {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    fn max_level(verbose: u8, quiet: bool, env: Option<&str>) -> Option<LevelFilter> {
        filter(verbose, quiet, env)
            .expect("valid filter")
            .max_level_hint()
    }

    #[test]
    fn can_choose_level() {
        assert_eq!(max_level(0, false, None), Some(LevelFilter::INFO));
        assert_eq!(max_level(1, false, None), Some(LevelFilter::DEBUG));
        assert_eq!(max_level(3, false, None), Some(LevelFilter::TRACE));
        assert_eq!(max_level(2, true, None), Some(LevelFilter::WARN));
    }

    #[test]
    fn flags_override_environment() {
        assert_eq!(max_level(0, false, Some("debug")), Some(LevelFilter::DEBUG));
        assert_eq!(max_level(0, false, Some("  ")), Some(LevelFilter::INFO));
        assert_eq!(max_level(1, false, Some("error")), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn can_take_per_crate_directives() {
        assert_eq!(
            max_level(0, false, Some("inkpress=trace,aws_sdk_s3=warn")),
            Some(LevelFilter::TRACE)
        );
    }

    #[test]
    fn bad_directives_are_an_error() {
        assert!(filter(0, false, Some("inkpress=loudest")).is_err());
    }
}
