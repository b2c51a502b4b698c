use super::catalog::Offer;
use super::cta::render_cta;
use super::random::RandomSource;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

pub const CTA_CONTAINER_CLASS: &str = "wealthautomation-cta";

/// Where the CTA goes in the content body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    Start,
    Middle,
    #[default]
    End,
}

impl Position {
    /// Exact lowercase labels only; anything else maps to [`Position::End`].
    pub fn from_label(raw: &str) -> Self {
        match raw {
            "start" => Self::Start,
            "middle" => Self::Middle,
            _ => Self::End,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders a CTA for `offer` and places it in `content`. Content is returned
/// unchanged when the offer has nothing to render.
pub fn inject_cta(
    content: &str,
    offer: &Offer,
    position: Position,
    rng: &mut dyn RandomSource,
) -> String {
    let cta_html = render_cta(offer, rng);
    if cta_html.is_empty() {
        return content.to_string();
    }
    place_cta(content, &cta_html, position)
}

/// Wraps `cta_html` in the CTA container and splices it into `content`.
pub fn place_cta(content: &str, cta_html: &str, position: Position) -> String {
    let wrapped = format!("<div class=\"{CTA_CONTAINER_CLASS}\">{cta_html}</div>");

    match position {
        Position::Start => format!("{wrapped}\n\n{content}"),
        Position::End => append(content, &wrapped),
        Position::Middle => {
            let mut segments = split_paragraphs(content);
            if segments.len() <= 3 {
                tracing::warn!(
                    "content too short or not structured with <p> tags for middle injection, falling back to end"
                );
                return append(content, &wrapped);
            }

            // Delimiters sit at odd indices; step back onto one when the
            // midpoint lands on a text segment.
            let mut middle = segments.len() / 2;
            if middle % 2 == 0 {
                middle -= 1;
            }
            segments.insert(middle + 1, wrapped.as_str());
            segments.concat()
        }
    }
}

fn append(content: &str, wrapped: &str) -> String {
    format!("{content}\n\n{wrapped}")
}

fn paragraph_close() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)</p>\s*").expect("paragraph pattern compiles"))
}

/// Splits on closing paragraph tags (plus trailing whitespace), keeping each
/// delimiter as its own segment: `[text, delim, text, delim, ..., text]`.
fn split_paragraphs(content: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut cursor = 0;
    for found in paragraph_close().find_iter(content) {
        segments.push(&content[cursor..found.start()]);
        segments.push(found.as_str());
        cursor = found.end();
    }
    segments.push(&content[cursor..]);
    segments
}
