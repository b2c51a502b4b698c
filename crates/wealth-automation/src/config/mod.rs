use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_WORDPRESS_API_URL: &str = "https://wealthautomationhq.com/wp-json/wp/v2/posts";
const DEFAULT_CONVERTKIT_API_URL: &str = "https://api.convertkit.com/v4";

/// Top-level configuration for a single publishing run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub offers: OfferConfig,
    pub reports: ReportsConfig,
    pub wordpress: WordPressConfig,
    pub convertkit: ConvertKitConfig,
    pub telemetry: TelemetryConfig,
    pub http_timeout: Duration,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let reports_dir =
            PathBuf::from(env::var("REPORTS_DIR").unwrap_or_else(|_| "drop_reports".to_string()));
        let catalog_path = PathBuf::from(
            env::var("OFFERS_FILE").unwrap_or_else(|_| "affiliate_offers.json".to_string()),
        );

        let wordpress_api_url = env::var("WORDPRESS_API_URL")
            .unwrap_or_else(|_| DEFAULT_WORDPRESS_API_URL.to_string());
        validate_url("WORDPRESS_API_URL", &wordpress_api_url)?;

        let convertkit_api_url = env::var("CONVERTKIT_API_URL")
            .unwrap_or_else(|_| DEFAULT_CONVERTKIT_API_URL.to_string());
        validate_url("CONVERTKIT_API_URL", &convertkit_api_url)?;

        let timeout_secs = env::var("HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".to_string())
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or(ConfigError::InvalidTimeout)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let reports = ReportsConfig { dir: reports_dir };

        Ok(Self {
            offers: OfferConfig {
                catalog_path,
                usage_log_path: reports.usage_log_path(),
            },
            wordpress: WordPressConfig {
                api_url: wordpress_api_url,
                user: non_empty_var("WORDPRESS_USER"),
                app_password: non_empty_var("WORDPRESS_APP_PASSWORD"),
                jwt_secret: non_empty_var("WORDPRESS_JWT_SECRET"),
                fallback_dir: reports.dir.join("wp_fallback"),
            },
            convertkit: ConvertKitConfig {
                api_url: convertkit_api_url,
                api_secret: non_empty_var("CONVERTKIT_API_SECRET"),
                api_key_v4: non_empty_var("CONVERTKIT_API_KEY_V4"),
                fallback_dir: reports.dir.join("ck_fallback"),
            },
            telemetry: TelemetryConfig {
                log_level,
                log_file: Some(reports.diagnostic_log_path()),
            },
            reports,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn validate_url(var: &'static str, value: &str) -> Result<(), ConfigError> {
    reqwest::Url::parse(value)
        .map(|_| ())
        .map_err(|err| ConfigError::InvalidUrl {
            var,
            reason: err.to_string(),
        })
}

/// Where the offer catalog lives and where usage rows are appended.
#[derive(Debug, Clone)]
pub struct OfferConfig {
    pub catalog_path: PathBuf,
    pub usage_log_path: PathBuf,
}

/// Root directory for the diagnostic log, the usage log, and fallback drafts.
#[derive(Debug, Clone)]
pub struct ReportsConfig {
    pub dir: PathBuf,
}

impl ReportsConfig {
    pub fn usage_log_path(&self) -> PathBuf {
        self.dir.join("offer_usage_log.csv")
    }

    pub fn diagnostic_log_path(&self) -> PathBuf {
        self.dir.join("wealth_automation.log")
    }
}

#[derive(Clone)]
pub struct WordPressConfig {
    pub api_url: String,
    pub user: Option<String>,
    pub app_password: Option<String>,
    pub jwt_secret: Option<String>,
    pub fallback_dir: PathBuf,
}

impl fmt::Debug for WordPressConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WordPressConfig")
            .field("api_url", &self.api_url)
            .field("user", &self.user)
            .field("app_password", &self.app_password.as_ref().map(|_| "***"))
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "***"))
            .field("fallback_dir", &self.fallback_dir)
            .finish()
    }
}

#[derive(Clone)]
pub struct ConvertKitConfig {
    pub api_url: String,
    pub api_secret: Option<String>,
    pub api_key_v4: Option<String>,
    pub fallback_dir: PathBuf,
}

impl fmt::Debug for ConvertKitConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConvertKitConfig")
            .field("api_url", &self.api_url)
            .field("api_secret", &self.api_secret.as_ref().map(|_| "***"))
            .field("api_key_v4", &self.api_key_v4.as_ref().map(|_| "***"))
            .field("fallback_dir", &self.fallback_dir)
            .finish()
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    /// Diagnostic log file; only written when its parent directory exists.
    pub log_file: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidUrl { var: &'static str, reason: String },
    InvalidTimeout,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidUrl { var, reason } => {
                write!(f, "{var} must be an absolute URL ({reason})")
            }
            ConfigError::InvalidTimeout => {
                write!(f, "HTTP_TIMEOUT_SECS must be a positive integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
