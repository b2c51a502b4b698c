use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use serde_json::json;

use super::fallback::FallbackStore;
use super::http::BlockingHttp;
use super::{PostPublisher, PublishError};
use crate::config::WordPressConfig;

const POSTS_ROUTE: &str = "/wp/v2/posts";
const TOKEN_ROUTE: &str = "/jwt-auth/v1/token";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    Jwt,
    Basic,
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMethod::Jwt => f.write_str("JWT"),
            AuthMethod::Basic => f.write_str("Basic"),
        }
    }
}

/// Result of one `create_post` call. Exactly one of `post_id`/`fallback_path`
/// is normally set; both are `None` when the fallback write also failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostOutcome {
    pub post_id: Option<u64>,
    pub url: Option<String>,
    pub fallback_path: Option<PathBuf>,
    pub auth_method: Option<AuthMethod>,
}

impl PostOutcome {
    pub fn published(&self) -> bool {
        self.post_id.is_some()
    }
}

#[derive(Debug, Clone)]
enum Credentials {
    Bearer(String),
    Basic { user: String, password: String },
}

impl Credentials {
    fn method(&self) -> AuthMethod {
        match self {
            Credentials::Bearer(_) => AuthMethod::Jwt,
            Credentials::Basic { .. } => AuthMethod::Basic,
        }
    }

    fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            Credentials::Bearer(token) => request.bearer_auth(token),
            Credentials::Basic { user, password } => request.basic_auth(user, Some(password)),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreatedPost {
    id: Option<u64>,
    link: Option<String>,
}

/// WordPress REST client. Authenticates with a JWT when possible and falls
/// back to an application password when the token endpoint answers with
/// something other than JSON.
#[derive(Debug)]
pub struct WordPressClient {
    config: WordPressConfig,
    http: BlockingHttp,
    fallback: FallbackStore,
    jwt_token: Option<String>,
}

impl WordPressClient {
    pub fn new(config: WordPressConfig, timeout: Duration) -> Result<Self, PublishError> {
        let http = BlockingHttp::new(timeout)?;
        let fallback = FallbackStore::new(config.fallback_dir.clone(), "wp");
        tracing::info!(endpoint = %config.api_url, "WordPress client initialized");
        Ok(Self {
            config,
            http,
            fallback,
            jwt_token: None,
        })
    }

    fn token_endpoint(&self) -> String {
        token_endpoint(&self.config.api_url)
    }

    fn stripped_password(&self) -> Option<String> {
        self.config
            .app_password
            .as_deref()
            .map(|password| password.replace(' ', ""))
    }

    fn request_jwt_token(&self) -> Result<String, PublishError> {
        let (Some(user), Some(_secret)) = (&self.config.user, &self.config.jwt_secret) else {
            return Err(PublishError::MissingCredentials(
                "WORDPRESS_USER or WORDPRESS_JWT_SECRET",
            ));
        };
        let password = self
            .stripped_password()
            .ok_or(PublishError::MissingCredentials("WORDPRESS_APP_PASSWORD"))?;

        let endpoint = self.token_endpoint();
        tracing::info!(%endpoint, "requesting JWT token");
        let request = self
            .http
            .client()
            .post(&endpoint)
            .json(&json!({ "username": user, "password": password }));

        let body = self.http.execute(request)?;
        let parsed: serde_json::Value =
            serde_json::from_str(&body).map_err(|err| PublishError::Decode(err.to_string()))?;
        parsed
            .get("token")
            .and_then(serde_json::Value::as_str)
            .map(ToString::to_string)
            .ok_or_else(|| PublishError::Rejected("token missing from JWT response".to_string()))
    }

    fn basic_credentials(&self) -> Option<Credentials> {
        match (&self.config.user, self.stripped_password()) {
            (Some(user), Some(password)) => Some(Credentials::Basic {
                user: user.clone(),
                password,
            }),
            _ => None,
        }
    }

    fn credentials(&mut self) -> Option<Credentials> {
        if let Some(token) = &self.jwt_token {
            return Some(Credentials::Bearer(token.clone()));
        }

        match self.request_jwt_token() {
            Ok(token) => {
                tracing::info!("obtained JWT token");
                self.jwt_token = Some(token.clone());
                Some(Credentials::Bearer(token))
            }
            Err(PublishError::Decode(reason)) => {
                tracing::warn!(%reason, "JWT token response was not JSON; trying Basic auth");
                let basic = self.basic_credentials();
                if basic.is_none() {
                    tracing::error!("Basic auth fallback failed: missing credentials");
                }
                basic
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to obtain JWT token; no fallback attempted");
                None
            }
        }
    }

    fn submit(
        &self,
        credentials: &Credentials,
        title: &str,
        content: &str,
    ) -> Result<(u64, String), PublishError> {
        let request = credentials.apply(
            self.http
                .client()
                .post(&self.config.api_url)
                .json(&json!({ "title": title, "content": content, "status": "publish" })),
        );
        let body = self.http.execute(request)?;
        let created: CreatedPost =
            serde_json::from_str(&body).map_err(|err| PublishError::Decode(err.to_string()))?;
        match (created.id, created.link) {
            (Some(id), Some(link)) => Ok((id, link)),
            _ => Err(PublishError::Decode(
                "response missing post id or link".to_string(),
            )),
        }
    }
}

impl PostPublisher for WordPressClient {
    fn create_post(&mut self, title: &str, content: &str) -> PostOutcome {
        let Some(credentials) = self.credentials() else {
            tracing::error!("no valid authentication available; cannot create post");
            return PostOutcome {
                post_id: None,
                url: None,
                fallback_path: self.fallback.save(title, content),
                auth_method: None,
            };
        };

        let method = credentials.method();
        let preview: String = title.chars().take(60).collect();
        tracing::info!(auth = %method, title = %preview, "creating post");

        match self.submit(&credentials, title, content) {
            Ok((post_id, url)) => {
                tracing::info!(auth = %method, post_id, %url, "created post");
                PostOutcome {
                    post_id: Some(post_id),
                    url: Some(url),
                    fallback_path: None,
                    auth_method: Some(method),
                }
            }
            Err(err) => {
                if method == AuthMethod::Basic
                    && matches!(err, PublishError::Api { status: 401 | 403, .. })
                {
                    tracing::error!(
                        "Basic authentication rejected; check the application password and user permissions"
                    );
                }
                tracing::error!(auth = %method, error = %err, "error creating post");
                PostOutcome {
                    post_id: None,
                    url: None,
                    fallback_path: self.fallback.save(title, content),
                    auth_method: Some(method),
                }
            }
        }
    }
}

/// `https://site/wp-json/wp/v2/posts` -> `https://site/wp-json/jwt-auth/v1/token`
fn token_endpoint(posts_url: &str) -> String {
    format!("{}{TOKEN_ROUTE}", posts_url.replace(POSTS_ROUTE, ""))
}
