/**
 * Server Configuration
 *
 * This module builds the immutable `ServerConfig` the server runs with. It is
 * read once at startup (from the process environment, after `.env` has been
 * loaded) and handed to every adapter that needs credentials or URLs. Nothing
 * below the binary reads environment variables.
 *
 * # Configuration Sources
 *
 * | Variable                 | Default                      |
 * |--------------------------|------------------------------|
 * | `SERVER_PORT`            | `5000`                       |
 * | `CLIENT_URL`             | `http://localhost:3000`      |
 * | `DATABASE_URL`           | unset (in-memory store)      |
 * | `SESSION_SECRET`         | required                     |
 * | `SESSION_TTL_SECS`       | `86400`                      |
 * | `AI_API_URL`             | required                     |
 * | `AI_TIMEOUT_SECS`        | `30`                         |
 * | `VIOLATION_LABEL`        | `cyberbullying`              |
 * | `CLOUDINARY_CLOUD_NAME`  | required                     |
 * | `CLOUDINARY_API_KEY`     | required                     |
 * | `CLOUDINARY_API_SECRET`  | required                     |
 * | `CLOUDINARY_BASE_URL`    | `https://api.cloudinary.com` |
 * | `UPLOAD_TIMEOUT_SECS`    | `120`                        |
 * | `MAX_UPLOAD_BYTES`       | `52428800`                   |
 * | `SMTP_HOST`              | empty (mail disabled)        |
 * | `SMTP_PORT`              | `587`                        |
 * | `EMAIL_USER`             | unset                        |
 * | `EMAIL_PASSWORD`         | unset                        |
 * | `REQUEST_TIMEOUT_SECS`   | `180`                        |
 * | `GOOGLE_CLIENT_ID`       | required                     |
 * | `GOOGLE_CLIENT_SECRET`   | required                     |
 * | `GOOGLE_CALLBACK_URL`    | `http://localhost:5000/auth/google/callback` |
 * | `GOOGLE_AUTH_URL`        | Google's authorization endpoint |
 * | `GOOGLE_TOKEN_URL`       | Google's token endpoint      |
 * | `GOOGLE_USERINFO_URL`    | Google's userinfo endpoint   |
 */

use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Session signing and lifetime
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub secret: String,
    pub ttl: Duration,
    pub cookie_name: String,
}

/// Remote content classifier
#[derive(Debug, Clone)]
pub struct ClassifierSettings {
    pub url: String,
    pub timeout: Duration,
    /// The single label that blocks publication
    pub violation_label: String,
}

/// Cloudinary-compatible media store
#[derive(Debug, Clone)]
pub struct MediaStoreSettings {
    pub base_url: String,
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub timeout: Duration,
}

/// Google OAuth 2.0 client
#[derive(Debug, Clone)]
pub struct GoogleOAuthSettings {
    pub client_id: String,
    pub client_secret: String,
    /// Must match the redirect URI registered with Google
    pub redirect_url: String,
    pub authorize_url: String,
    pub token_url: String,
    pub userinfo_url: String,
    pub timeout: Duration,
}

const GOOGLE_AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";

/// Outbound mail. An empty `smtp_host` puts the mailer in no-op mode.
#[derive(Debug, Clone)]
pub struct EmailSettings {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from_address: String,
    pub timeout: Duration,
}

/// Immutable server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Browser client origin, used for CORS and redirects
    pub client_url: String,
    pub database_url: Option<String>,
    pub request_timeout: Duration,
    pub max_upload_bytes: usize,
    pub session: SessionSettings,
    pub classifier: ClassifierSettings,
    pub media: MediaStoreSettings,
    pub email: EmailSettings,
    pub google: GoogleOAuthSettings,
}

impl ServerConfig {
    /// Create a new ServerConfigBuilder seeded with development defaults
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Load the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = EnvReader { lookup };

        let smtp_user = env.optional("EMAIL_USER");
        let config = ServerConfig {
            port: env.parse_or("SERVER_PORT", 5000)?,
            client_url: env.string_or("CLIENT_URL", "http://localhost:3000"),
            database_url: env.optional("DATABASE_URL"),
            request_timeout: Duration::from_secs(env.parse_or("REQUEST_TIMEOUT_SECS", 180)?),
            max_upload_bytes: env.parse_or("MAX_UPLOAD_BYTES", 50 * 1024 * 1024)?,
            session: SessionSettings {
                secret: env.required("SESSION_SECRET")?,
                ttl: Duration::from_secs(env.parse_or("SESSION_TTL_SECS", 24 * 60 * 60)?),
                cookie_name: "socialhub_session".to_string(),
            },
            classifier: ClassifierSettings {
                url: env.required("AI_API_URL")?,
                timeout: Duration::from_secs(env.parse_or("AI_TIMEOUT_SECS", 30)?),
                violation_label: env.string_or("VIOLATION_LABEL", "cyberbullying"),
            },
            media: MediaStoreSettings {
                base_url: env.string_or("CLOUDINARY_BASE_URL", "https://api.cloudinary.com"),
                cloud_name: env.required("CLOUDINARY_CLOUD_NAME")?,
                api_key: env.required("CLOUDINARY_API_KEY")?,
                api_secret: env.required("CLOUDINARY_API_SECRET")?,
                timeout: Duration::from_secs(env.parse_or("UPLOAD_TIMEOUT_SECS", 120)?),
            },
            email: EmailSettings {
                smtp_host: env.string_or("SMTP_HOST", ""),
                smtp_port: env.parse_or("SMTP_PORT", 587)?,
                from_address: smtp_user
                    .clone()
                    .unwrap_or_else(|| "no-reply@socialhub.local".to_string()),
                username: smtp_user,
                password: env.optional("EMAIL_PASSWORD"),
                timeout: Duration::from_secs(10),
            },
            google: GoogleOAuthSettings {
                client_id: env.required("GOOGLE_CLIENT_ID")?,
                client_secret: env.required("GOOGLE_CLIENT_SECRET")?,
                redirect_url: env.string_or(
                    "GOOGLE_CALLBACK_URL",
                    "http://localhost:5000/auth/google/callback",
                ),
                authorize_url: env.string_or("GOOGLE_AUTH_URL", GOOGLE_AUTHORIZE_URL),
                token_url: env.string_or("GOOGLE_TOKEN_URL", GOOGLE_TOKEN_URL),
                userinfo_url: env.string_or("GOOGLE_USERINFO_URL", GOOGLE_USERINFO_URL),
                timeout: Duration::from_secs(30),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session.secret.trim().is_empty() {
            return Err(ConfigError::MissingValue("SESSION_SECRET"));
        }
        for url in [
            &self.client_url,
            &self.classifier.url,
            &self.media.base_url,
            &self.google.redirect_url,
            &self.google.authorize_url,
            &self.google.token_url,
            &self.google.userinfo_url,
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidUrl(url.clone()));
            }
        }
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                key: "MAX_UPLOAD_BYTES",
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

struct EnvReader<F> {
    lookup: F,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|value| !value.trim().is_empty())
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.optional(key).ok_or(ConfigError::MissingValue(key))
    }

    fn string_or(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    fn parse_or<T: FromStr>(&self, key: &'static str, default: T) -> Result<T, ConfigError> {
        match self.optional(key) {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue { key, value }),
            None => Ok(default),
        }
    }
}

/// Builder for ServerConfig
///
/// Starts from values suitable for local development and tests; every
/// external URL points at localhost.
#[derive(Debug)]
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl Default for ServerConfigBuilder {
    fn default() -> Self {
        Self {
            config: ServerConfig {
                port: 5000,
                client_url: "http://localhost:3000".to_string(),
                database_url: None,
                request_timeout: Duration::from_secs(180),
                max_upload_bytes: 50 * 1024 * 1024,
                session: SessionSettings {
                    secret: "development-session-secret".to_string(),
                    ttl: Duration::from_secs(24 * 60 * 60),
                    cookie_name: "socialhub_session".to_string(),
                },
                classifier: ClassifierSettings {
                    url: "http://localhost:8000/predict".to_string(),
                    timeout: Duration::from_secs(30),
                    violation_label: "cyberbullying".to_string(),
                },
                media: MediaStoreSettings {
                    base_url: "http://localhost:8001".to_string(),
                    cloud_name: "socialhub".to_string(),
                    api_key: "key".to_string(),
                    api_secret: "secret".to_string(),
                    timeout: Duration::from_secs(120),
                },
                email: EmailSettings {
                    smtp_host: String::new(),
                    smtp_port: 587,
                    username: None,
                    password: None,
                    from_address: "no-reply@socialhub.local".to_string(),
                    timeout: Duration::from_secs(10),
                },
                google: GoogleOAuthSettings {
                    client_id: "socialhub-dev".to_string(),
                    client_secret: "google-secret".to_string(),
                    redirect_url: "http://localhost:5000/auth/google/callback".to_string(),
                    authorize_url: GOOGLE_AUTHORIZE_URL.to_string(),
                    token_url: GOOGLE_TOKEN_URL.to_string(),
                    userinfo_url: GOOGLE_USERINFO_URL.to_string(),
                    timeout: Duration::from_secs(30),
                },
            },
        }
    }
}

impl ServerConfigBuilder {
    pub fn client_url(mut self, url: impl Into<String>) -> Self {
        self.config.client_url = url.into();
        self
    }

    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.config.database_url = Some(url.into());
        self
    }

    pub fn session_secret(mut self, secret: impl Into<String>) -> Self {
        self.config.session.secret = secret.into();
        self
    }

    pub fn session_ttl(mut self, ttl: Duration) -> Self {
        self.config.session.ttl = ttl;
        self
    }

    pub fn classifier_url(mut self, url: impl Into<String>) -> Self {
        self.config.classifier.url = url.into();
        self
    }

    pub fn violation_label(mut self, label: impl Into<String>) -> Self {
        self.config.classifier.violation_label = label.into();
        self
    }

    pub fn media_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.media.base_url = url.into();
        self
    }

    /// Point token exchange and userinfo at `base_url` (`/token`, `/userinfo`)
    pub fn google_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.config.google.token_url = format!("{}/token", base_url);
        self.config.google.userinfo_url = format!("{}/userinfo", base_url);
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    pub fn max_upload_bytes(mut self, bytes: usize) -> Self {
        self.config.max_upload_bytes = bytes;
        self
    }

    pub fn outbound_timeout(mut self, timeout: Duration) -> Self {
        self.config.classifier.timeout = timeout;
        self.config.media.timeout = timeout;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<ServerConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
