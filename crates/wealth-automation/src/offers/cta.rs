use super::catalog::Offer;
use super::random::RandomSource;

pub const URL_PLACEHOLDER: &str = "{{url}}";
pub const UTM_SOURCE: &str = "wealthautomation";
pub const UTM_MEDIUM: &str = "blog";
const DEFAULT_CAMPAIGN: &str = "offer";

/// Destination URL with the attribution query appended.
pub fn tracked_url(offer: &Offer) -> String {
    let separator = if offer.url.contains('?') { '&' } else { '?' };
    let campaign = offer.id.as_deref().unwrap_or(DEFAULT_CAMPAIGN);
    format!(
        "{}{separator}utm_source={UTM_SOURCE}&utm_medium={UTM_MEDIUM}&utm_campaign={campaign}",
        offer.url
    )
}

/// Renders one randomly chosen CTA template with the tracked URL substituted.
/// Returns an empty string when the offer has no usable template.
pub fn render_cta(offer: &Offer, rng: &mut dyn RandomSource) -> String {
    if offer.cta_templates.is_empty() {
        tracing::warn!(
            offer = offer.display_name(),
            "offer has no valid CTA templates"
        );
        return String::new();
    }

    let template = &offer.cta_templates[rng.choose_index(offer.cta_templates.len())];
    template.replace(URL_PLACEHOLDER, &tracked_url(offer))
}
