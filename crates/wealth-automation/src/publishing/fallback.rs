use chrono::Local;
use std::path::{Path, PathBuf};

const MAX_SLUG_CHARS: usize = 50;

/// Local drop folder for drafts that could not be delivered.
#[derive(Debug, Clone)]
pub struct FallbackStore {
    dir: PathBuf,
    prefix: &'static str,
}

impl FallbackStore {
    pub fn new<P: Into<PathBuf>>(dir: P, prefix: &'static str) -> Self {
        Self {
            dir: dir.into(),
            prefix,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `<h1>title</h1>` followed by the content. Returns the file path,
    /// or `None` when the draft could not be written.
    pub fn save(&self, title: &str, content: &str) -> Option<PathBuf> {
        let filename = format!(
            "{}_fallback_{}_{}.html",
            self.prefix,
            Local::now().format("%Y%m%d_%H%M%S"),
            safe_slug(title)
        );
        let path = self.dir.join(filename);

        let written = std::fs::create_dir_all(&self.dir)
            .and_then(|_| std::fs::write(&path, format!("<h1>{title}</h1>\n{content}")));
        match written {
            Ok(()) => {
                tracing::warn!(path = %path.display(), "saved fallback content");
                Some(path)
            }
            Err(err) => {
                tracing::error!(error = %err, "error saving fallback file");
                None
            }
        }
    }
}

fn safe_slug(title: &str) -> String {
    title
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .take(MAX_SLUG_CHARS)
        .collect()
}
