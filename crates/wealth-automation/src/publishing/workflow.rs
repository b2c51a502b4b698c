use super::{BroadcastOutcome, BroadcastSender, PostOutcome, PostPublisher};
use crate::offers::{OfferLibrary, Position};

const BLOG_CONTENT_TYPE: &str = "blog";
const EMAIL_CONTENT_TYPE: &str = "email";

/// One piece of generated content on its way out the door.
#[derive(Debug, Clone)]
pub struct ContentDraft {
    pub title: String,
    pub body: String,
    pub position: Position,
}

#[derive(Debug, Clone)]
pub struct PublishReport {
    pub offer_id: Option<String>,
    pub cta_injected: bool,
    pub content: String,
    pub outcome: PostOutcome,
}

#[derive(Debug, Clone)]
pub struct NewsletterReport {
    pub offer_id: Option<String>,
    pub cta_injected: bool,
    pub content: String,
    pub outcome: BroadcastOutcome,
}

struct Enriched {
    offer_id: Option<String>,
    cta_injected: bool,
    content: String,
}

/// Matches an offer to each draft, injects its CTA, and hands the result to
/// the CMS or the email service.
#[derive(Debug)]
pub struct PublishingWorkflow {
    library: OfferLibrary,
    cms: Box<dyn PostPublisher>,
    email: Box<dyn BroadcastSender>,
}

impl PublishingWorkflow {
    pub fn new(
        library: OfferLibrary,
        cms: Box<dyn PostPublisher>,
        email: Box<dyn BroadcastSender>,
    ) -> Self {
        Self {
            library,
            cms,
            email,
        }
    }

    pub fn library(&self) -> &OfferLibrary {
        &self.library
    }

    pub fn publish_article(&mut self, draft: ContentDraft) -> PublishReport {
        let enriched = self.enrich(&draft, BLOG_CONTENT_TYPE);
        let outcome = self.cms.create_post(&draft.title, &enriched.content);
        PublishReport {
            offer_id: enriched.offer_id,
            cta_injected: enriched.cta_injected,
            content: enriched.content,
            outcome,
        }
    }

    pub fn send_newsletter(&mut self, draft: ContentDraft) -> NewsletterReport {
        let enriched = self.enrich(&draft, EMAIL_CONTENT_TYPE);
        let outcome = self.email.send_broadcast(&draft.title, &enriched.content);
        NewsletterReport {
            offer_id: enriched.offer_id,
            cta_injected: enriched.cta_injected,
            content: enriched.content,
            outcome,
        }
    }

    fn enrich(&mut self, draft: &ContentDraft, content_type: &str) -> Enriched {
        let (offer, content) = self
            .library
            .enrich(&draft.body, &draft.title, draft.position);
        let cta_injected = offer.is_some() && content != draft.body;

        if let (Some(offer), true) = (&offer, cta_injected) {
            self.library.record_usage(offer, &draft.title, content_type);
        }

        Enriched {
            offer_id: offer.and_then(|offer| offer.id),
            cta_injected,
            content,
        }
    }
}
