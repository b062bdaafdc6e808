use serde::Deserialize;
use shared::jwt::{JwtConfig, JwtError};
use std::net::SocketAddr;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
    pub limits: LimitsConfig,
    /// Identity token verification
    pub jwt: JwtAuthConfig,
    /// Photo object storage naming
    #[serde(default)]
    pub storage: StorageConfig,
    /// Startup admin provisioning
    #[serde(default)]
    pub admin: AdminConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

impl From<&DatabaseConfig> for persistence::db::DatabaseConfig {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            url: config.url.clone(),
            max_connections: config.max_connections,
            min_connections: config.min_connections,
            connect_timeout_secs: config.connect_timeout_secs,
            idle_timeout_secs: config.idle_timeout_secs,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Requests per minute per caller; 0 disables rate limiting
    #[serde(default = "default_rate_limit")]
    pub rate_limit_per_minute: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Default number of messages per history page
    #[serde(default = "default_message_page_size")]
    pub message_page_size: i64,

    #[serde(default = "default_max_bio_length")]
    pub max_bio_length: usize,

    /// When true, a declined request no longer keeps the pair apart
    #[serde(default)]
    pub allow_rerequest_after_decline: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtAuthConfig {
    /// HS256 (shared secret) or RS256 (public key)
    #[serde(default = "default_jwt_algorithm")]
    pub algorithm: String,

    /// Shared secret for HS256
    #[serde(default)]
    pub secret: String,

    /// Identity provider RSA public key in PEM format for RS256
    #[serde(default)]
    pub public_key: String,

    /// Optional RSA private key, only used to mint tokens locally
    #[serde(default)]
    pub private_key: Option<String>,

    /// Required audience, if any
    #[serde(default)]
    pub audience: Option<String>,

    /// Lifetime of locally minted tokens
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: i64,

    /// Leeway in seconds for clock skew tolerance
    #[serde(default = "default_jwt_leeway")]
    pub leeway_secs: u64,
}

impl JwtAuthConfig {
    /// Builds the token verifier described by this section.
    pub fn verifier(&self) -> Result<JwtConfig, JwtError> {
        let base = match self.algorithm.to_ascii_uppercase().as_str() {
            "HS256" => JwtConfig::from_secret(&self.secret)?,
            "RS256" => JwtConfig::from_rsa_pem(&self.public_key, self.private_key.as_deref())?,
            other => {
                return Err(JwtError::InvalidKey(format!(
                    "Unsupported JWT algorithm: {}",
                    other
                )))
            }
        };
        let verifier = base
            .with_leeway(self.leeway_secs)
            .with_expiry(self.access_token_expiry_secs);
        Ok(match &self.audience {
            Some(aud) if !aud.is_empty() => verifier.with_audience(aud.clone()),
            _ => verifier,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Public base URL of the object store
    #[serde(default = "default_storage_base_url")]
    pub public_base_url: String,

    #[serde(default = "default_storage_bucket")]
    pub bucket: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            public_base_url: default_storage_base_url(),
            bucket: default_storage_bucket(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminConfig {
    /// Identity ids given the admin role on startup
    #[serde(default)]
    pub bootstrap_user_ids: Vec<Uuid>,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_request_timeout() -> u64 {
    30
}
fn default_max_body_size() -> usize {
    1_048_576
}
fn default_max_connections() -> u32 {
    20
}
fn default_min_connections() -> u32 {
    5
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_idle_timeout() -> u64 {
    600
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_rate_limit() -> u32 {
    100
}
fn default_message_page_size() -> i64 {
    shared::pagination::DEFAULT_PAGE_SIZE
}
fn default_max_bio_length() -> usize {
    1000
}
fn default_jwt_algorithm() -> String {
    "HS256".to_string()
}
fn default_access_token_expiry() -> i64 {
    3600 // 1 hour
}
fn default_jwt_leeway() -> u64 {
    30
}
fn default_storage_base_url() -> String {
    "http://localhost:54321/storage/v1/object/public".to_string()
}
fn default_storage_bucket() -> String {
    "profile-photos".to_string()
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with MK__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("MK")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("security.cors_origins")
                    .with_list_parse_key("admin.bootstrap_user_ids")
                    .try_parsing(true),
            )
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides.
    ///
    /// Defaults are embedded so tests do not depend on the working directory.
    #[cfg(test)]
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [server]
            host = "0.0.0.0"
            port = 8080
            request_timeout_secs = 30
            max_body_size = 1048576

            [database]
            url = ""
            max_connections = 20
            min_connections = 5
            connect_timeout_secs = 10
            idle_timeout_secs = 600

            [logging]
            level = "info"
            format = "json"

            [security]
            cors_origins = []
            rate_limit_per_minute = 100

            [limits]
            message_page_size = 50
            max_bio_length = 1000
            allow_rerequest_after_decline = false

            [jwt]
            algorithm = "HS256"
            secret = "test-secret"
            leeway_secs = 30

            [storage]
            public_base_url = "https://storage.example.com/object/public"
            bucket = "profile-photos"
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        // Skip validation in tests to allow partial configs
        Ok(cfg)
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.database.url.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "MK__DATABASE__URL environment variable must be set".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "Server port cannot be 0".to_string(),
            ));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigValidationError::InvalidValue(
                "min_connections cannot exceed max_connections".to_string(),
            ));
        }

        if !(1..=shared::pagination::MAX_PAGE_SIZE).contains(&self.limits.message_page_size) {
            return Err(ConfigValidationError::InvalidValue(format!(
                "limits.message_page_size must be between 1 and {}",
                shared::pagination::MAX_PAGE_SIZE
            )));
        }

        if self.limits.max_bio_length == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "limits.max_bio_length must be positive".to_string(),
            ));
        }

        self.jwt
            .verifier()
            .map_err(|e| ConfigValidationError::InvalidValue(format!("jwt: {}", e)))?;

        self.socket_addr()?;

        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigValidationError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|_| {
                ConfigValidationError::InvalidValue(format!(
                    "Invalid socket address {}:{}",
                    self.server.host, self.server.port
                ))
            })
    }
}
