//! Subscriber installation.
//!
//! A log setting is either a bare level (`debug`) or a comma-separated list
//! of `target=level` directives, optionally led by a default level:
//! `info,interhook_std=debug`. [`ServerConfig`](crate::ServerConfig)
//! validates its `log_level` with [`parse_filter`] when it is loaded, so a
//! typo fails at startup rather than silently logging everything.

use crate::error::ServerError;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

/// A log setting that cannot become a filter.
#[derive(Error, Debug)]
pub enum FilterError {
    /// Nothing but whitespace.
    #[error("log level must not be empty")]
    Empty,

    /// A bare word that is not a level.
    #[error("unrecognised log level '{0}'")]
    UnknownLevel(String),

    /// A `target=level` directive that does not parse.
    #[error(transparent)]
    Directive(#[from] ParseError),
}

/// Turn a log setting into an [`EnvFilter`].
///
/// Bare words must be levels; `EnvFilter` would otherwise read them as
/// target names.
pub fn parse_filter(setting: &str) -> Result<EnvFilter, FilterError> {
    let directives: Vec<&str> = setting
        .split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .collect();
    if directives.is_empty() {
        return Err(FilterError::Empty);
    }

    for directive in &directives {
        if !directive.contains('=') && directive.parse::<LevelFilter>().is_err() {
            return Err(FilterError::UnknownLevel((*directive).to_owned()));
        }
    }

    Ok(EnvFilter::try_new(directives.join(","))?)
}

/// Install the global fmt subscriber, writing to stderr.
///
/// With `prefer_level`, `level` is used and `RUST_LOG` only rescues an
/// unusable `level`. Without it, `RUST_LOG` wins whenever it is set.
pub fn init(level: &str, prefer_level: bool) -> Result<(), ServerError> {
    let filter = if prefer_level {
        parse_filter(level).or_else(|err| EnvFilter::try_from_default_env().map_err(|_| err))
    } else {
        EnvFilter::try_from_default_env().or_else(|_| parse_filter(level))
    }
    .map_err(|err| ServerError::Logger(format!("invalid log level '{level}': {err}")))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| ServerError::Logger(format!("subscriber already installed: {err}")))
}
