pub mod convertkit;
pub mod fallback;
pub(crate) mod http;
pub mod wordpress;
pub mod workflow;

pub use convertkit::{BroadcastOutcome, ConvertKitClient, Form};
pub use fallback::FallbackStore;
pub use wordpress::{AuthMethod, PostOutcome, WordPressClient};
pub use workflow::{ContentDraft, NewsletterReport, PublishReport, PublishingWorkflow};

use std::fmt::Debug;

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("network error: {0}")]
    Network(String),
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
    #[error("unable to decode response: {0}")]
    Decode(String),
    #[error("request rejected: {0}")]
    Rejected(String),
    #[error("missing credentials: {0}")]
    MissingCredentials(&'static str),
    #[error("http runtime unavailable: {0}")]
    Runtime(String),
}

impl From<reqwest::Error> for PublishError {
    fn from(err: reqwest::Error) -> Self {
        PublishError::Network(err.to_string())
    }
}

/// Content management system that accepts finished posts.
pub trait PostPublisher: Debug {
    fn create_post(&mut self, title: &str, content: &str) -> PostOutcome;
}

/// Email marketing service that sends a broadcast to the list.
pub trait BroadcastSender: Debug {
    fn send_broadcast(&mut self, subject: &str, content: &str) -> BroadcastOutcome;
}
