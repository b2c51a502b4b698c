use super::catalog::Offer;

pub const KEYWORD_IN_BODY: i64 = 2;
pub const KEYWORD_IN_TITLE: i64 = 5;
pub const CATEGORY_IN_BODY: i64 = 1;
pub const CATEGORY_IN_TITLE: i64 = 3;

/// An offer paired with its relevance score for one piece of content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredOffer<'a> {
    pub offer: &'a Offer,
    pub score: i64,
}

/// Weighted case-insensitive substring match of the offer's keywords and
/// categories against the content, plus the offer's priority. Sums saturate
/// at the `i64` bounds.
pub fn score(offer: &Offer, body: &str, title: &str) -> i64 {
    let body = body.to_lowercase();
    let title = title.to_lowercase();

    let keyword_score: i64 = offer
        .keywords
        .iter()
        .map(|keyword| term_score(keyword, &body, &title, KEYWORD_IN_BODY, KEYWORD_IN_TITLE))
        .fold(0, i64::saturating_add);
    let category_score: i64 = offer
        .categories
        .iter()
        .map(|category| {
            term_score(
                category,
                &body,
                &title,
                CATEGORY_IN_BODY,
                CATEGORY_IN_TITLE,
            )
        })
        .fold(0, i64::saturating_add);

    keyword_score
        .saturating_add(category_score)
        .saturating_add(offer.priority.unwrap_or(0))
}

fn term_score(term: &str, body: &str, title: &str, body_weight: i64, title_weight: i64) -> i64 {
    let term = term.to_lowercase();
    let mut total = 0;
    if body.contains(&term) {
        total += body_weight;
    }
    if title.contains(&term) {
        total += title_weight;
    }
    total
}

/// Every offer with its score, highest first. Equal scores keep catalog order.
pub fn rank<'a>(offers: &'a [Offer], body: &str, title: &str) -> Vec<ScoredOffer<'a>> {
    let mut ranked: Vec<ScoredOffer<'a>> = offers
        .iter()
        .map(|offer| ScoredOffer {
            offer,
            score: score(offer, body, title),
        })
        .collect();
    ranked.sort_by(|left, right| right.score.cmp(&left.score));
    ranked
}
