//! Command-line arguments and the optional TOML settings file.
//!
//! Precedence, highest first: flag, environment variable, settings file,
//! built-in default. The base origin has no default; startup aborts without
//! one.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use http_transport::{TransportConfig, DEFAULT_TIMEOUT};
use serde::Deserialize;
use signup::{CurrencyCode, FlowSettings, Locale, RoutePath};

/// Output format of the log layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// `finance-signup` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "finance-signup",
    about = "Create a finance account through the sign-up endpoint",
    version
)]
pub struct Args {
    /// Optional TOML settings file.
    #[arg(long, env = "SIGNUP_CONFIG", value_name = "path")]
    pub config: Option<PathBuf>,

    /// Backend origin, e.g. `https://api.example.com`.
    #[arg(long = "base-url", env = "SIGNUP_BASE_URL", value_name = "url")]
    pub base_url: Option<String>,

    /// Message language (`ua` or `en`).
    #[arg(long, env = "SIGNUP_LOCALE", value_name = "tag")]
    pub locale: Option<Locale>,

    /// Per-request timeout in seconds.
    #[arg(long = "timeout-secs", env = "SIGNUP_TIMEOUT_SECS", value_name = "secs")]
    pub timeout_secs: Option<u64>,

    /// Do not store or send cookies.
    #[arg(long = "no-credentials")]
    pub no_credentials: bool,

    /// Session cookie to seed (`name=value`); repeatable.
    #[arg(long = "session-cookie", value_name = "cookie")]
    pub session_cookies: Vec<String>,

    /// Pause before the post-success redirect, in milliseconds.
    #[arg(long = "redirect-delay-ms", env = "SIGNUP_REDIRECT_DELAY_MS", value_name = "ms")]
    pub redirect_delay_ms: Option<u64>,

    /// Log output format.
    #[arg(long = "log-format", env = "SIGNUP_LOG_FORMAT", value_enum, default_value_t)]
    pub log_format: LogFormat,

    /// OTLP collector endpoint; traces are exported only when set.
    #[arg(long = "otlp-endpoint", env = "OTEL_EXPORTER_OTLP_ENDPOINT", value_name = "url")]
    pub otlp_endpoint: Option<String>,

    /// Account e-mail address.
    #[arg(long, default_value = "", hide_default_value = true)]
    pub email: String,

    /// Account password.
    #[arg(
        long,
        env = "SIGNUP_PASSWORD",
        hide_env_values = true,
        default_value = "",
        hide_default_value = true
    )]
    pub password: String,

    /// Password confirmation.
    #[arg(
        long = "confirm-password",
        env = "SIGNUP_CONFIRM_PASSWORD",
        hide_env_values = true,
        default_value = "",
        hide_default_value = true
    )]
    pub confirm_password: String,

    /// Display name.
    #[arg(long = "full-name", default_value = "", hide_default_value = true)]
    pub full_name: String,

    /// Account currency (`UAH`, `USD`, `EUR`).
    #[arg(long, default_value_t = CurrencyCode::default())]
    pub currency: CurrencyCode,

    /// Avatar image to upload.
    #[arg(long, value_name = "path")]
    pub avatar: Option<PathBuf>,
}

/// Contents of the `--config` file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileSettings {
    /// Backend origin.
    pub base_url: Option<String>,
    /// Message language tag.
    pub locale: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Whether cookies are stored and sent.
    pub with_credentials: Option<bool>,
    /// Session cookies to seed.
    #[serde(default)]
    pub session_cookies: Vec<String>,
    /// Pause before the post-success redirect, in milliseconds.
    pub redirect_delay_ms: Option<u64>,
    /// Route navigated to after success.
    pub sign_in_route: Option<String>,
}

impl FileSettings {
    /// Parses settings from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid settings file")
    }

    /// Reads and parses the settings file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read settings file {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("in {}", path.display()))
    }
}

/// Fully resolved startup settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Transport adapter configuration.
    pub transport: TransportConfig,
    /// Message language.
    pub locale: Locale,
    /// Submission flow settings.
    pub flow: FlowSettings,
}

impl Settings {
    /// Layers `args` over `file` and validates the result.
    ///
    /// # Errors
    ///
    /// Fails when the base origin is missing or invalid, or a file value does
    /// not parse.
    pub fn resolve(args: &Args, file: FileSettings) -> Result<Self> {
        let base_url = args.base_url.clone().or(file.base_url).unwrap_or_default();
        let timeout = args
            .timeout_secs
            .or(file.timeout_secs)
            .map_or(DEFAULT_TIMEOUT, Duration::from_secs);
        let with_credentials = !args.no_credentials && file.with_credentials.unwrap_or(true);

        let mut transport = TransportConfig::parse(&base_url)
            .context("cannot configure the transport")?
            .with_credentials(with_credentials)
            .with_timeout(timeout);
        for cookie in file.session_cookies.iter().chain(&args.session_cookies) {
            transport = transport.with_session_cookie(cookie.clone());
        }

        let locale = match (args.locale, file.locale) {
            (Some(locale), _) => locale,
            (None, Some(tag)) => tag.parse().context("invalid locale in settings file")?,
            (None, None) => Locale::default(),
        };

        let mut flow = FlowSettings::default();
        if let Some(ms) = args.redirect_delay_ms.or(file.redirect_delay_ms) {
            flow.redirect_delay = Duration::from_millis(ms);
        }
        if let Some(route) = file.sign_in_route {
            flow.sign_in_route = RoutePath::new(route.clone())
                .with_context(|| format!("invalid sign-in route '{route}'"))?;
        }

        Ok(Self {
            transport,
            locale,
            flow,
        })
    }
}
