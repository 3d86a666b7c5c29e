//! Structured logging for the fractanet CLI.
//!
//! A global `tracing` subscriber writes to `stderr`, keeping `stdout` free
//! for command output. Three environment variables shape it:
//!
//! - `RUST_LOG` selects levels through [`EnvFilter`] (default `info`).
//! - `FRACTANET_LOG_FORMAT` picks `human` (default) or `json` lines.
//! - `FRACTANET_LOG_SPANS` picks which span lifecycle events are logged:
//!   `none`, `close` (default) or `full`.
//!
//! The `log` facade is bridged so crates using either API are captured.

use std::{env, fmt, str::FromStr, sync::OnceLock};

use thiserror::Error;
use tracing_log::LogTracer;
use tracing_subscriber::{
    EnvFilter, Layer, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Environment variable selecting the log line format.
pub const LOG_FORMAT_ENV: &str = "FRACTANET_LOG_FORMAT";
/// Environment variable selecting the logged span events.
pub const LOG_SPANS_ENV: &str = "FRACTANET_LOG_SPANS";

static OUTCOME: OnceLock<LoggingStatus> = OnceLock::new();

/// Errors raised while initialising structured logging.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// An environment variable contained invalid UTF-8.
    #[error("environment variable `{name}` contained invalid UTF-8")]
    InvalidUnicode {
        /// Name of the offending variable.
        name: &'static str,
    },
    /// An environment variable held an unsupported value.
    #[error("unsupported value `{provided}` for `{name}`; expected one of {expected}")]
    UnsupportedValue {
        /// Name of the offending variable.
        name: &'static str,
        /// Raw value supplied by the user.
        provided: String,
        /// Accepted spellings.
        expected: &'static str,
    },
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Human,
    /// One JSON object per line, including the current span list.
    Json,
}

impl FromStr for LogFormat {
    type Err = &'static str;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            _ => Err("`human` or `json`"),
        }
    }
}

/// Span lifecycle events written alongside ordinary events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpanEvents {
    /// No span events.
    None,
    /// One event when each span closes, carrying its timings.
    #[default]
    Close,
    /// Events for every span transition.
    Full,
}

impl SpanEvents {
    fn fmt_span(self) -> FmtSpan {
        match self {
            Self::None => FmtSpan::NONE,
            Self::Close => FmtSpan::CLOSE,
            Self::Full => FmtSpan::FULL,
        }
    }
}

impl FromStr for SpanEvents {
    type Err = &'static str;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "close" => Ok(Self::Close),
            "full" => Ok(Self::Full),
            _ => Err("`none`, `close` or `full`"),
        }
    }
}

/// Logging options resolved from the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LogSettings {
    /// Line format.
    pub format: LogFormat,
    /// Span events to log.
    pub spans: SpanEvents,
}

impl LogSettings {
    /// Resolves settings through `lookup`, which returns `Err(())` for a
    /// value that is present but not valid UTF-8.
    ///
    /// # Errors
    /// Returns [`LoggingError`] for a non-UTF-8 or unsupported value.
    ///
    /// # Examples
    /// ```
    /// use fractanet_cli::logging::{LogFormat, LogSettings, SpanEvents};
    ///
    /// let settings = LogSettings::from_lookup(|key| {
    ///     Ok((key == "FRACTANET_LOG_FORMAT").then(|| "json".to_owned()))
    /// })?;
    /// assert_eq!(settings.format, LogFormat::Json);
    /// assert_eq!(settings.spans, SpanEvents::Close);
    /// # Ok::<(), fractanet_cli::logging::LoggingError>(())
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LoggingError>
    where
        F: Fn(&'static str) -> Result<Option<String>, ()>,
    {
        Ok(Self {
            format: resolve(&lookup, LOG_FORMAT_ENV)?,
            spans: resolve(&lookup, LOG_SPANS_ENV)?,
        })
    }

    /// Resolves settings from the process environment.
    ///
    /// # Errors
    /// Returns [`LoggingError`] for a non-UTF-8 or unsupported value.
    pub fn from_env() -> Result<Self, LoggingError> {
        Self::from_lookup(|key| match env::var(key) {
            Ok(value) => Ok(Some(value)),
            Err(env::VarError::NotPresent) => Ok(None),
            Err(env::VarError::NotUnicode(_)) => Err(()),
        })
    }
}

fn resolve<T, F>(lookup: &F, name: &'static str) -> Result<T, LoggingError>
where
    T: FromStr<Err = &'static str> + Default,
    F: Fn(&'static str) -> Result<Option<String>, ()>,
{
    match lookup(name) {
        Ok(None) => Ok(T::default()),
        Ok(Some(raw)) => raw.parse().map_err(|expected| LoggingError::UnsupportedValue {
            name,
            provided: raw.trim().to_owned(),
            expected,
        }),
        Err(()) => Err(LoggingError::InvalidUnicode { name }),
    }
}

/// Whether [`init_logging`] installed the subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggingStatus {
    /// The fractanet subscriber is the global default.
    Installed,
    /// Another subscriber already owned the global slot and was kept.
    AlreadyConfigured,
}

impl fmt::Display for LoggingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Installed => "installed",
            Self::AlreadyConfigured => "already configured",
        })
    }
}

/// Installs global structured logging once per process. Later calls return
/// the first outcome without touching the environment.
///
/// # Errors
/// Returns [`LoggingError`] when the environment holds an invalid setting.
pub fn init_logging() -> Result<LoggingStatus, LoggingError> {
    if let Some(status) = OUTCOME.get() {
        return Ok(*status);
    }
    let status = install(LogSettings::from_env()?);
    Ok(*OUTCOME.get_or_init(|| status))
}

fn install(settings: LogSettings) -> LoggingStatus {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_span_events(settings.spans.fmt_span())
        .with_writer(std::io::stderr);
    let fmt_layer = match settings.format {
        LogFormat::Human => fmt_layer.boxed(),
        LogFormat::Json => fmt_layer
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .boxed(),
    };

    // Best effort: another logger may already own the `log` slot.
    let _bridge = LogTracer::init();

    match tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
    {
        Ok(()) => LoggingStatus::Installed,
        Err(_) => LoggingStatus::AlreadyConfigured,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rstest::rstest;

    use super::*;

    fn settings_with(values: &[(&'static str, &str)]) -> Result<LogSettings, LoggingError> {
        let values: HashMap<&str, String> = values
            .iter()
            .map(|(key, value)| (*key, (*value).to_owned()))
            .collect();
        LogSettings::from_lookup(|key| Ok(values.get(key).cloned()))
    }

    #[test]
    fn defaults_apply_without_overrides() {
        let settings = settings_with(&[]).expect("defaults resolve");
        assert_eq!(settings, LogSettings::default());
    }

    #[rstest]
    #[case::human("human", LogFormat::Human)]
    #[case::upper("HUMAN", LogFormat::Human)]
    #[case::padded(" json ", LogFormat::Json)]
    fn formats_are_parsed(#[case] raw: &str, #[case] expected: LogFormat) {
        let settings = settings_with(&[(LOG_FORMAT_ENV, raw)]).expect("format parses");
        assert_eq!(settings.format, expected);
    }

    #[rstest]
    #[case::none("none", SpanEvents::None)]
    #[case::close("Close", SpanEvents::Close)]
    #[case::full("full", SpanEvents::Full)]
    fn span_events_are_parsed(#[case] raw: &str, #[case] expected: SpanEvents) {
        let settings = settings_with(&[(LOG_SPANS_ENV, raw)]).expect("span events parse");
        assert_eq!(settings.spans, expected);
    }

    #[rstest]
    #[case::format(LOG_FORMAT_ENV, "xml")]
    #[case::spans(LOG_SPANS_ENV, "enter")]
    fn unsupported_values_are_rejected(#[case] name: &'static str, #[case] raw: &str) {
        match settings_with(&[(name, raw)]) {
            Err(LoggingError::UnsupportedValue { name: got, provided, .. }) => {
                assert_eq!(got, name);
                assert_eq!(provided, raw);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn non_unicode_values_are_rejected() {
        let result = LogSettings::from_lookup(|key| if key == LOG_SPANS_ENV { Err(()) } else { Ok(None) });
        assert!(matches!(
            result,
            Err(LoggingError::InvalidUnicode { name: LOG_SPANS_ENV })
        ));
    }

    #[test]
    fn init_logging_is_idempotent() {
        let first = init_logging().expect("logging must initialise");
        let second = init_logging().expect("subsequent calls must be no-ops");
        assert_eq!(first, second);
    }
}
