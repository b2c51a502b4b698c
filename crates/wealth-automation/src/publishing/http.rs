use std::time::Duration;

use tokio::runtime::Runtime;

use super::PublishError;

/// Browser-like agent; some WordPress hosts reject library user agents.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36";

const MAX_LOGGED_BODY: usize = 1000;

/// Synchronous facade over `reqwest` so the single-run publishing flow never
/// has to be async.
pub(crate) struct BlockingHttp {
    client: reqwest::Client,
    runtime: Runtime,
}

impl BlockingHttp {
    pub(crate) fn new(timeout: Duration) -> Result<Self, PublishError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(BROWSER_USER_AGENT)
            .build()?;
        let runtime = Runtime::new().map_err(|err| PublishError::Runtime(err.to_string()))?;
        Ok(Self { client, runtime })
    }

    pub(crate) fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Sends the request and returns the body of a successful response.
    pub(crate) fn execute(&self, request: reqwest::RequestBuilder) -> Result<String, PublishError> {
        let result = self.runtime.block_on(async {
            let response = request.send().await?;
            let status = response.status();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>((status, body))
        });

        let (status, body) = result?;
        if !status.is_success() {
            return Err(PublishError::Api {
                status: status.as_u16(),
                message: truncate_body(&body),
            });
        }
        Ok(body)
    }
}

impl std::fmt::Debug for BlockingHttp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingHttp").finish_non_exhaustive()
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    if body.chars().count() <= MAX_LOGGED_BODY {
        return body.to_string();
    }
    let mut truncated: String = body.chars().take(MAX_LOGGED_BODY).collect();
    truncated.push_str("...");
    truncated
}
