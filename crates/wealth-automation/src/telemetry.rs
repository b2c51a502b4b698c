use crate::config::TelemetryConfig;
use chrono::Local;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
pub enum TelemetryError {
    EnvFilter { value: String, source: ParseError },
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::EnvFilter { value, .. } => {
                write!(
                    f,
                    "invalid log level/filter '{}': unable to build EnvFilter",
                    value
                )
            }
            TelemetryError::Subscriber(err) => write!(f, "telemetry error: {err}"),
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::EnvFilter { source, .. } => Some(source),
            TelemetryError::Subscriber(err) => Some(&**err),
        }
    }
}

/// Where diagnostic lines end up after [`init`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticSink {
    File(PathBuf),
    ConsoleOnly,
}

pub fn init(config: &TelemetryConfig) -> Result<DiagnosticSink, TelemetryError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            EnvFilter::try_new(&config.log_level).map_err(|source| TelemetryError::EnvFilter {
                value: config.log_level.clone(),
                source,
            })?
        }
    };

    let console = tracing_subscriber::fmt::layer()
        .with_target(false)
        .compact()
        .with_ansi(false)
        .with_writer(std::io::stderr);

    let log_file = config.log_file.as_deref().and_then(open_log_file);
    let sink = match (&log_file, &config.log_file) {
        (Some(_), Some(path)) => DiagnosticSink::File(path.clone()),
        _ => DiagnosticSink::ConsoleOnly,
    };
    let file_layer = log_file.map(|file| {
        tracing_subscriber::fmt::layer()
            .event_format(BracketedFormat)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console)
        .with(file_layer)
        .try_init()
        .map_err(|err| TelemetryError::Subscriber(Box::new(err)))?;

    if let (DiagnosticSink::ConsoleOnly, Some(path)) = (&sink, &config.log_file) {
        tracing::warn!(
            path = %path.display(),
            "diagnostic log directory missing; logging to console only"
        );
    }

    Ok(sink)
}

/// Opens the diagnostic log for appending. A missing parent directory is not
/// an error: the caller falls back to console output.
fn open_log_file(path: &Path) -> Option<File> {
    let parent_exists = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.is_dir(),
        _ => true,
    };
    if !parent_exists {
        return None;
    }

    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => Some(file),
        Err(err) => {
            eprintln!(
                "unable to open diagnostic log {}: {err}",
                path.display()
            );
            None
        }
    }
}

fn level_label(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "ERROR",
        Level::WARN => "WARNING",
        Level::INFO => "INFO",
        Level::DEBUG => "DEBUG",
        Level::TRACE => "TRACE",
    }
}

/// `[2025-01-31 09:15:00] [WARNING] message key=value`
struct BracketedFormat;

impl<S, N> FormatEvent<S, N> for BracketedFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(
            writer,
            "[{}] [{}] ",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            level_label(event.metadata().level())
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
