use std::path::Path;

use wealth_automation::config::AppConfig;
use wealth_automation::error::AppError;
use wealth_automation::offers::{OfferLibrary, Position, RandomSource, SeededSource};
use wealth_automation::telemetry::{self, DiagnosticSink};

/// Loads configuration and installs tracing. Every command starts here.
pub(crate) fn bootstrap() -> Result<AppConfig, AppError> {
    let config = AppConfig::load()?;
    match telemetry::init(&config.telemetry)? {
        DiagnosticSink::File(path) => {
            tracing::debug!(path = %path.display(), "writing diagnostic log")
        }
        DiagnosticSink::ConsoleOnly => {}
    }
    Ok(config)
}

pub(crate) fn random_source(seed: Option<u64>) -> Box<dyn RandomSource> {
    match seed {
        Some(seed) => Box::new(SeededSource::seeded(seed)),
        None => Box::new(SeededSource::from_entropy()),
    }
}

pub(crate) fn offer_library(config: &AppConfig, seed: Option<u64>) -> OfferLibrary {
    OfferLibrary::from_config(&config.offers, random_source(seed))
}

pub(crate) fn read_content(path: &Path) -> Result<String, AppError> {
    let content = std::fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "read content file");
    Ok(content)
}

/// Case-insensitive for the command line; the library itself only knows the
/// exact lowercase labels.
pub(crate) fn parse_position(raw: &str) -> Result<Position, String> {
    Ok(Position::from_label(&raw.trim().to_ascii_lowercase()))
}
