pub mod catalog;
pub mod cta;
pub mod injector;
pub mod random;
pub mod scoring;
pub mod selector;
pub mod usage;

pub use catalog::{Catalog, CatalogError, Offer, ParsedOffer};
pub use cta::{render_cta, tracked_url};
pub use injector::{inject_cta, place_cta, Position};
pub use random::{RandomSource, ScriptedSource, SeededSource};
pub use scoring::{rank, score, ScoredOffer};
pub use selector::{select_offer, Selection, SelectionKind};
pub use usage::{UsageLog, UsageLogError};

use crate::config::OfferConfig;
use std::collections::BTreeSet;

/// The loaded catalog together with the usage ledger and the random source
/// used for template and fallback choices.
#[derive(Debug)]
pub struct OfferLibrary {
    catalog: Catalog,
    usage_log: UsageLog,
    rng: Box<dyn RandomSource>,
}

impl OfferLibrary {
    pub fn new(catalog: Catalog, usage_log: UsageLog, rng: Box<dyn RandomSource>) -> Self {
        usage_log.ensure_header();
        Self {
            catalog,
            usage_log,
            rng,
        }
    }

    pub fn from_config(config: &OfferConfig, rng: Box<dyn RandomSource>) -> Self {
        let catalog = Catalog::load(&config.catalog_path);
        Self::new(catalog, UsageLog::new(config.usage_log_path.clone()), rng)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn categories(&self) -> BTreeSet<String> {
        self.catalog.categories()
    }

    pub fn select_offer(&mut self, body: &str, title: &str) -> Option<Selection<'_>> {
        select_offer(&self.catalog, body, title, self.rng.as_mut())
    }

    pub fn render_cta(&mut self, offer: &Offer) -> String {
        render_cta(offer, self.rng.as_mut())
    }

    pub fn inject_cta(&mut self, content: &str, offer: &Offer, position: Position) -> String {
        inject_cta(content, offer, position, self.rng.as_mut())
    }

    /// Selects the best offer for the content and injects its CTA. Returns the
    /// chosen offer (owned) alongside the final content.
    pub fn enrich(
        &mut self,
        content: &str,
        title: &str,
        position: Position,
    ) -> (Option<Offer>, String) {
        let chosen = self
            .select_offer(content, title)
            .map(|selection| selection.offer.clone());
        match chosen {
            Some(offer) => {
                let enriched = self.inject_cta(content, &offer, position);
                (Some(offer), enriched)
            }
            None => (None, content.to_string()),
        }
    }

    pub fn record_usage(&self, offer: &Offer, content_title: &str, content_type: &str) {
        self.usage_log.record(offer, content_title, content_type);
    }
}
