use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::io::Read;
use std::path::{Path, PathBuf};

const DEFAULT_URL: &str = "#";
const DEFAULT_PRIORITY: i64 = 1;

/// An affiliate offer as normalized at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct Offer {
    pub id: Option<String>,
    pub name: Option<String>,
    pub url: String,
    pub description: Option<String>,
    pub commission: Option<String>,
    pub categories: Vec<String>,
    pub keywords: Vec<String>,
    /// `None` when the catalog carried a non-numeric priority.
    pub priority: Option<i64>,
    pub cta_templates: Vec<String>,
}

impl Offer {
    /// Builds an offer from one catalog entry. Fields with the wrong type fall
    /// back to their defaults rather than rejecting the record.
    pub fn from_record(record: &Map<String, Value>) -> Self {
        Self {
            id: record.get("id").and_then(identifier),
            name: string_field(record, "name"),
            url: string_field(record, "url").unwrap_or_else(|| DEFAULT_URL.to_string()),
            description: string_field(record, "description"),
            commission: string_field(record, "commission"),
            categories: string_list(record.get("categories")),
            keywords: string_list(record.get("keywords")),
            priority: match record.get("priority") {
                None => Some(DEFAULT_PRIORITY),
                Some(value) => numeric_priority(value),
            },
            cta_templates: string_list(record.get("ctaTemplates")),
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unnamed Offer")
    }
}

fn identifier(value: &Value) -> Option<String> {
    match value {
        Value::String(id) => Some(id.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn string_field(record: &Map<String, Value>, key: &str) -> Option<String> {
    record
        .get(key)
        .and_then(Value::as_str)
        .map(ToString::to_string)
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(ToString::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn numeric_priority(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|float| float.trunc() as i64)),
        _ => None,
    }
}

/// Outcome of validating one element of the `offers` array.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedOffer {
    Valid(Offer),
    Invalid { index: usize, reason: String },
}

impl ParsedOffer {
    pub fn parse(index: usize, value: &Value) -> Self {
        match value {
            Value::Object(record) => ParsedOffer::Valid(Offer::from_record(record)),
            other => ParsedOffer::Invalid {
                index,
                reason: format!("expected an object, found {}", json_kind(other)),
            },
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("unable to read offer catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("offer catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("offer catalog root must be an object")]
    NotAnObject,
    #[error("offer catalog has no 'offers' field")]
    MissingOffers,
    #[error("'offers' field must be an array")]
    OffersNotAList,
}

/// Immutable set of valid offers, in catalog order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    offers: Vec<Offer>,
    source: Option<PathBuf>,
}

impl Catalog {
    pub fn new(offers: Vec<Offer>) -> Self {
        Self {
            offers,
            source: None,
        }
    }

    /// Loads the catalog at `path`. Any load failure is logged and yields an
    /// empty catalog.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(catalog) => catalog,
            Err(err) => {
                tracing::error!(path = %path.display(), error = %err, "failed to load offer catalog");
                Self {
                    offers: Vec::new(),
                    source: Some(path.to_path_buf()),
                }
            }
        }
    }

    pub fn try_load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let mut catalog = Self::from_reader(file)?;
        catalog.source = Some(path.to_path_buf());
        tracing::info!(
            path = %path.display(),
            count = catalog.len(),
            "loaded valid offers"
        );
        Ok(catalog)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let document: Value = serde_json::from_reader(reader)?;
        Self::from_json(&document)
    }

    pub fn from_json(document: &Value) -> Result<Self, CatalogError> {
        let root = document.as_object().ok_or(CatalogError::NotAnObject)?;
        let entries = root
            .get("offers")
            .ok_or(CatalogError::MissingOffers)?
            .as_array()
            .ok_or(CatalogError::OffersNotAList)?;

        let mut offers = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            match ParsedOffer::parse(index, entry) {
                ParsedOffer::Valid(offer) => offers.push(offer),
                ParsedOffer::Invalid { index, reason } => {
                    tracing::warn!(index, %reason, "skipping malformed offer entry");
                }
            }
        }

        Ok(Self::new(offers))
    }

    pub fn offers(&self) -> &[Offer] {
        &self.offers
    }

    pub fn len(&self) -> usize {
        self.offers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Union of every offer's categories.
    pub fn categories(&self) -> BTreeSet<String> {
        self.offers
            .iter()
            .flat_map(|offer| offer.categories.iter().cloned())
            .collect()
    }
}
