//! src/configuration.rs

use secrecy::Secret;
use serde_aux::field_attributes::deserialize_number_from_string;

use secrecy::ExposeSecret;
use sqlx::postgres::{PgConnectOptions, PgSslMode};

#[derive(serde::Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub application: ApplicationSettings,
    pub site: SiteSettings,
    pub health_check: HealthCheckSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: Secret<String>,
    // Converts from str to u16 in case we set it through an environment variable
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    pub database_name: String,
    pub require_ssl: bool,
}

impl DatabaseSettings {
    pub fn connect_options(&self) -> PgConnectOptions {
        let ssl_mode = if self.require_ssl {
            PgSslMode::Require
        } else {
            PgSslMode::Prefer
        };
        PgConnectOptions::new()
            .host(&self.host)
            .username(&self.username)
            .password(self.password.expose_secret())
            .port(self.port)
            .ssl_mode(ssl_mode)
            .database(&self.database_name)
    }
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    // Converts from str to u16 in case we set it through an environment variable
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
}

/// Presentation metadata served alongside the feedback form.
///
/// Every field falls back to a hardcoded default when the configuration files
/// and `APP_SITE__*` environment variables stay silent, so a bare checkout
/// still serves a sensible form descriptor.
#[derive(serde::Deserialize, Clone)]
pub struct SiteSettings {
    #[serde(default = "SiteSettings::default_name")]
    pub name: String,
    #[serde(default = "SiteSettings::default_description")]
    pub description: String,
    #[serde(default = "SiteSettings::default_base_url")]
    pub base_url: String,
}

impl SiteSettings {
    fn default_name() -> String {
        "Feedback Form - Share Your Valuable Experience".into()
    }

    fn default_description() -> String {
        "Share your valuable feedback and help us improve. \
Rate your experience and provide suggestions for improvement."
            .into()
    }

    fn default_base_url() -> String {
        "http://localhost:8000".into()
    }
}

/// Knobs for the database liveness probe.
#[derive(serde::Deserialize, Clone, Copy)]
pub struct HealthCheckSettings {
    #[serde(
        default = "HealthCheckSettings::default_period_seconds",
        deserialize_with = "deserialize_number_from_string"
    )]
    pub period_seconds: u64,
    // A healthy database should not spam user-facing notifications,
    // so successes default to silent while failures default to loud.
    #[serde(default)]
    pub notify_on_success: bool,
    #[serde(default = "HealthCheckSettings::default_notify_on_failure")]
    pub notify_on_failure: bool,
}

impl HealthCheckSettings {
    pub fn period(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.period_seconds)
    }

    fn default_period_seconds() -> u64 {
        120
    }

    fn default_notify_on_failure() -> bool {
        true
    }
}

/// The possible runtime environment for our application
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    // We cant use the Enum directly, so this helps us get the Enum as a str
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

/// This helps us parse the value of APP_ENVIRONMENT safely.
/// When we read APP_ENVIRONMENT from the OS using std::env::var, we get a raw
/// String; TryFrom turns that unchecked value into the Environment enum or
/// refuses it with a readable error.
impl TryFrom<String> for Environment {
    type Error = String;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. \
Use either `local` or `production`.",
                other
            )),
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().expect("Failed to determine the current directory");
    let configuration_directory = base_path.join("configuration");
    // Detect the running environment, defaults to `local` if unspecified
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .expect("Failed to parse APP_ENVIRONMENT");
    let environment_filename = format!("{}.yaml", environment.as_str());

    // Init the config reader
    let settings = config::Config::builder()
        .add_source(config::File::from(
            configuration_directory.join("base.yaml"),
        ))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        // Add in settings from environment variables (with a prefix of APP and
        // '__' as separator)
        // E.g. `APP_APPLICATION__PORT=5001 would set `Settings.application.port`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;
    // Try to convert the configuration values it read into our Settings type
    settings.try_deserialize::<Settings>()
}
