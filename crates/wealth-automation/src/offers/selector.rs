use super::catalog::{Catalog, Offer};
use super::random::RandomSource;
use super::scoring::score;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    /// The offer scored above zero against the content.
    Relevant,
    /// Nothing scored above zero; the offer was drawn at random.
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection<'a> {
    pub offer: &'a Offer,
    pub score: i64,
    pub kind: SelectionKind,
}

/// Picks the most relevant offer for the content. Ties on score go to the
/// higher numeric priority, then to the earlier catalog entry. When no offer
/// scores above zero a uniformly random offer is returned instead.
pub fn select_offer<'a>(
    catalog: &'a Catalog,
    body: &str,
    title: &str,
    rng: &mut dyn RandomSource,
) -> Option<Selection<'a>> {
    let offers = catalog.offers();
    if offers.is_empty() {
        tracing::warn!("no offers loaded; cannot match content");
        return None;
    }

    let mut best: Option<(&Offer, i64)> = None;
    for offer in offers {
        let current = score(offer, body, title);
        best = match best {
            Some((leader, top))
                if current < top || (current == top && !outranks(offer, leader)) =>
            {
                Some((leader, top))
            }
            _ => Some((offer, current)),
        };
    }

    if let Some((offer, top)) = best.filter(|(_, top)| *top > 0) {
        tracing::info!(
            offer_id = offer.id.as_deref().unwrap_or("N/A"),
            offer = offer.display_name(),
            score = top,
            "matched content to offer"
        );
        return Some(Selection {
            offer,
            score: top,
            kind: SelectionKind::Relevant,
        });
    }

    let offer = &offers[rng.choose_index(offers.len())];
    tracing::warn!(
        offer_id = offer.id.as_deref().unwrap_or("N/A"),
        offer = offer.display_name(),
        "no relevant offer found (score <= 0), falling back to random offer"
    );
    Some(Selection {
        offer,
        score: score(offer, body, title),
        kind: SelectionKind::Fallback,
    })
}

fn outranks(challenger: &Offer, leader: &Offer) -> bool {
    match (challenger.priority, leader.priority) {
        (Some(challenger), Some(leader)) => challenger > leader,
        _ => false,
    }
}
