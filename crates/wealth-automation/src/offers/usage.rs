use super::catalog::Offer;
use chrono::{DateTime, Local};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

const HEADER: [&str; 5] = [
    "Timestamp",
    "OfferID",
    "OfferName",
    "ContentType",
    "ContentTitle",
];

#[derive(Debug, thiserror::Error)]
pub enum UsageLogError {
    #[error("usage log io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("usage log write failure: {0}")]
    Csv(#[from] csv::Error),
}

/// Append-only CSV ledger of injected offers. Never read back.
#[derive(Debug, Clone)]
pub struct UsageLog {
    path: PathBuf,
}

impl UsageLog {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn directory_available(&self) -> bool {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.is_dir(),
            _ => true,
        }
    }

    /// Creates the ledger with its header row when the directory exists and
    /// the file does not.
    pub fn ensure_header(&self) {
        if !self.directory_available() {
            tracing::warn!(
                path = %self.path.display(),
                "usage log directory not found; log creation skipped"
            );
            return;
        }
        if self.path.exists() {
            return;
        }

        match self.write_row(HEADER.map(str::to_string)) {
            Ok(()) => tracing::info!(path = %self.path.display(), "created offer usage log"),
            Err(err) => tracing::error!(error = %err, "error creating usage log file"),
        }
    }

    /// Appends one usage row. Failures are logged and never surface.
    pub fn record(&self, offer: &Offer, content_title: &str, content_type: &str) {
        if !self.directory_available() {
            tracing::warn!(
                path = %self.path.display(),
                "usage log directory not found; usage log skipped"
            );
            return;
        }

        let row = usage_row(Local::now(), offer, content_title, content_type);
        match self.write_row(row) {
            Ok(()) => tracing::info!(offer = offer.display_name(), "logged offer usage"),
            Err(err) => tracing::error!(error = %err, "error logging offer usage"),
        }
    }

    fn write_row(&self, row: [String; 5]) -> Result<(), UsageLogError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        // Fields arrive pre-quoted so the ledger keeps its fixed column layout.
        let mut writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Never)
            .from_writer(file);
        writer.write_record(&row)?;
        writer.flush()?;
        Ok(())
    }
}

fn usage_row(
    timestamp: DateTime<Local>,
    offer: &Offer,
    content_title: &str,
    content_type: &str,
) -> [String; 5] {
    let name = offer.name.as_deref().unwrap_or("N/A");
    [
        timestamp.to_rfc3339(),
        bare(offer.id.as_deref().unwrap_or("N/A")),
        quote(&single_line(name)),
        bare(content_type),
        quote(&bare(content_title)),
    ]
}

/// Rows are joined verbatim, so no field may break the line.
fn single_line(field: &str) -> String {
    field.replace(['\r', '\n'], " ")
}

/// Unquoted columns also lose their commas.
fn bare(field: &str) -> String {
    single_line(field).replace(',', ";")
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
