use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use serde_json::json;

use super::fallback::FallbackStore;
use super::http::BlockingHttp;
use super::{BroadcastSender, PublishError};
use crate::config::ConvertKitConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastOutcome {
    pub broadcast_id: Option<u64>,
    pub fallback_path: Option<PathBuf>,
    pub sent: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Form {
    pub id: u64,
    /// Untitled forms come back with a null or missing name.
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FormsResponse {
    #[serde(default)]
    forms: Vec<Form>,
}

#[derive(Debug, Deserialize)]
struct BlastResponse {
    email_blast: Option<BlastBody>,
}

#[derive(Debug, Deserialize)]
struct BlastBody {
    id: Option<u64>,
}

/// ConvertKit v4 client using the API secret as a bearer token. Email blasts
/// are sent as soon as they are created.
#[derive(Debug)]
pub struct ConvertKitClient {
    config: ConvertKitConfig,
    http: BlockingHttp,
    fallback: FallbackStore,
}

impl ConvertKitClient {
    pub fn new(config: ConvertKitConfig, timeout: Duration) -> Result<Self, PublishError> {
        let http = BlockingHttp::new(timeout)?;
        let fallback = FallbackStore::new(config.fallback_dir.clone(), "ck");
        if config.api_secret.is_none() {
            tracing::error!("missing CONVERTKIT_API_SECRET in environment variables");
        }
        if config.api_key_v4.is_none() {
            tracing::warn!("missing CONVERTKIT_API_KEY_V4 in environment variables");
        }
        Ok(Self {
            config,
            http,
            fallback,
        })
    }

    fn endpoint(&self, route: &str) -> String {
        format!("{}/{route}", self.config.api_url.trim_end_matches('/'))
    }

    fn secret(&self) -> Result<&str, PublishError> {
        self.config
            .api_secret
            .as_deref()
            .ok_or(PublishError::MissingCredentials("CONVERTKIT_API_SECRET"))
    }

    /// Lists the account's forms; any failure is logged and yields no forms.
    pub fn list_forms(&self) -> Vec<Form> {
        match self.fetch_forms() {
            Ok(forms) => {
                tracing::info!(count = forms.len(), "retrieved forms");
                forms
            }
            Err(err) => {
                tracing::error!(error = %err, "error getting forms");
                Vec::new()
            }
        }
    }

    fn fetch_forms(&self) -> Result<Vec<Form>, PublishError> {
        let secret = self.secret()?;
        let request = self
            .http
            .client()
            .get(self.endpoint("forms"))
            .bearer_auth(secret);
        let body = self.http.execute(request)?;
        let parsed: FormsResponse =
            serde_json::from_str(&body).map_err(|err| PublishError::Decode(err.to_string()))?;
        Ok(parsed.forms)
    }

    fn create_blast(&self, subject: &str, content: &str) -> Result<u64, PublishError> {
        let secret = self.secret()?;
        let request = self
            .http
            .client()
            .post(self.endpoint("email_blasts"))
            .bearer_auth(secret)
            .json(&json!({ "subject": subject, "content": content }));
        let body = self.http.execute(request)?;
        let parsed: BlastResponse =
            serde_json::from_str(&body).map_err(|err| PublishError::Decode(err.to_string()))?;
        parsed
            .email_blast
            .and_then(|blast| blast.id)
            .ok_or_else(|| PublishError::Rejected(format!("no email blast id in response: {body}")))
    }
}

impl BroadcastSender for ConvertKitClient {
    fn send_broadcast(&mut self, subject: &str, content: &str) -> BroadcastOutcome {
        tracing::info!("creating and sending email blast");
        match self.create_blast(subject, content) {
            Ok(id) => {
                tracing::info!(broadcast_id = id, "created and sent email blast");
                BroadcastOutcome {
                    broadcast_id: Some(id),
                    fallback_path: None,
                    sent: true,
                }
            }
            Err(err) => {
                tracing::error!(error = %err, "error creating/sending email blast");
                BroadcastOutcome {
                    broadcast_id: None,
                    fallback_path: self.fallback.save(subject, content),
                    sent: false,
                }
            }
        }
    }
}
