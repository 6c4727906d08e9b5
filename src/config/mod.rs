//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{num::NonZeroU32, path::PathBuf, str::FromStr};

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "carewell";
const ENV_PREFIX: &str = "CAREWELL";
const DEFAULT_POSTS_TABLE: &str = "posts";
const DEFAULT_BLOG_PAGE_SIZE: u32 = 6;
pub(crate) const DEFAULT_DOCTOR_PAGE_SIZE: u32 =
    crate::domain::doctors::DEFAULT_DOCTOR_PAGE_SIZE as u32;
pub(crate) const DEFAULT_AUDIT_RECENT_LIMIT: u32 = 20;

/// Command-line arguments for the CareWell binary.
#[derive(Debug, Parser)]
#[command(name = "carewell", version, about = "CareWell Hospital content tools")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "CAREWELL_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: GlobalOverrides,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args, Default, Clone)]
pub struct GlobalOverrides {
    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub log_json: Option<bool>,

    /// Override the hosted backend base URL.
    #[arg(long = "backend-url", value_name = "URL", global = true)]
    pub backend_url: Option<String>,

    /// Override the hosted backend API key.
    #[arg(long = "backend-api-key", value_name = "KEY", global = true)]
    pub backend_api_key: Option<String>,

    /// Override the content overrides file.
    #[arg(long = "content-file", value_name = "PATH", value_hint = ValueHint::FilePath, global = true)]
    pub content_file: Option<PathBuf>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Read or edit the site content tree.
    #[command(subcommand)]
    Content(ContentCommand),
    /// Inspect blog posts.
    #[command(subcommand)]
    Posts(PostsCommand),
    /// Search the doctor directory.
    Doctors(DoctorsArgs),
    /// Inspect or edit doctor schedules.
    #[command(subcommand)]
    Schedule(ScheduleCommand),
    /// Resolve a URL fragment to a view.
    Route(RouteArgs),
}

#[derive(Debug, Subcommand, Clone)]
pub enum ContentCommand {
    /// Print the value at a content path.
    Get {
        /// Dotted path such as `doctors[0].name`.
        path: String,
    },
    /// Replace the value at a content path.
    Set(ContentSetArgs),
}

#[derive(Debug, Args, Clone)]
pub struct ContentSetArgs {
    /// Dotted path such as `hero.title`.
    pub path: String,

    /// New value as JSON; bare text is stored as a string.
    pub value: String,

    #[command(flatten)]
    pub admin: AdminArgs,
}

#[derive(Debug, Args, Clone)]
pub struct AdminArgs {
    /// Admin username recorded in the audit trail.
    #[arg(long = "actor", value_name = "USER", default_value = "admin")]
    pub actor: String,

    /// Persist the edited tree back to the content file.
    #[arg(long = "write", action = clap::ArgAction::SetTrue)]
    pub write: bool,
}

#[derive(Debug, Subcommand, Clone)]
pub enum PostsCommand {
    /// List a page of posts.
    List {
        /// Restrict to one category.
        #[arg(long = "category")]
        category: Option<String>,

        /// One-based page number.
        #[arg(long = "page", default_value_t = 1)]
        page: usize,
    },
    /// Show a single post.
    Show {
        /// Post id such as `post_1`.
        id: String,
    },
}

#[derive(Debug, Args, Clone)]
pub struct DoctorsArgs {
    /// Case-insensitive text matched against name and specialty.
    #[arg(long = "query", default_value = "")]
    pub query: String,

    /// Exact specialty facet.
    #[arg(long = "specialty")]
    pub specialty: Option<String>,

    /// Number of "load more" steps to apply.
    #[arg(long = "more", default_value_t = 0)]
    pub more: usize,
}

#[derive(Debug, Subcommand, Clone)]
pub enum ScheduleCommand {
    /// List the slots a doctor offers on a date.
    Slots { doctor_id: String, date: String },
    /// Switch a slot on or off.
    Toggle {
        doctor_id: String,
        date: String,
        /// Slot label such as "10:00 AM".
        slot: String,

        #[command(flatten)]
        admin: AdminArgs,
    },
}

#[derive(Debug, Args, Clone)]
pub struct RouteArgs {
    /// Fragment such as `#post/post_1`.
    pub fragment: String,
}

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub backend: BackendSettings,
    pub content: ContentSettings,
    pub blog: BlogSettings,
    pub doctors: DoctorSettings,
    pub audit: AuditSettings,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub url: Option<Url>,
    pub api_key: Option<String>,
    pub posts_table: String,
}

#[derive(Debug, Clone)]
pub struct ContentSettings {
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct BlogSettings {
    pub page_size: NonZeroU32,
}

#[derive(Debug, Clone)]
pub struct DoctorSettings {
    pub page_size: NonZeroU32,
}

#[derive(Debug, Clone)]
pub struct AuditSettings {
    pub recent_limit: NonZeroU32,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_overrides(&cli.overrides);

    Settings::from_raw(raw)
}

/// Resolve configuration using the supplied CLI arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    logging: RawLoggingSettings,
    backend: RawBackendSettings,
    content: RawContentSettings,
    blog: RawPageSettings,
    doctors: RawPageSettings,
    audit: RawAuditSettings,
}

impl RawSettings {
    fn apply_overrides(&mut self, overrides: &GlobalOverrides) {
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
        if let Some(url) = overrides.backend_url.as_ref() {
            self.backend.url = Some(url.clone());
        }
        if let Some(key) = overrides.backend_api_key.as_ref() {
            self.backend.api_key = Some(key.clone());
        }
        if let Some(file) = overrides.content_file.as_ref() {
            self.content.file = Some(file.clone());
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            logging,
            backend,
            content,
            blog,
            doctors,
            audit,
        } = raw;

        Ok(Self {
            logging: build_logging_settings(logging)?,
            backend: build_backend_settings(backend)?,
            content: ContentSettings { file: content.file },
            blog: BlogSettings {
                page_size: non_zero_u32(
                    blog.page_size.unwrap_or(DEFAULT_BLOG_PAGE_SIZE.into()),
                    "blog.page_size",
                )?,
            },
            doctors: DoctorSettings {
                page_size: non_zero_u32(
                    doctors.page_size.unwrap_or(DEFAULT_DOCTOR_PAGE_SIZE.into()),
                    "doctors.page_size",
                )?,
            },
            audit: AuditSettings {
                recent_limit: non_zero_u32(
                    audit
                        .recent_limit
                        .unwrap_or(DEFAULT_AUDIT_RECENT_LIMIT.into()),
                    "audit.recent_limit",
                )?,
            },
        })
    }
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::WARN,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_backend_settings(backend: RawBackendSettings) -> Result<BackendSettings, LoadError> {
    let url = match non_blank(backend.url) {
        Some(value) => Some(
            Url::parse(&value)
                .map_err(|err| LoadError::invalid("backend.url", format!("`{value}`: {err}")))?,
        ),
        None => None,
    };
    let api_key = non_blank(backend.api_key);
    if url.is_some() && api_key.is_none() {
        return Err(LoadError::invalid(
            "backend.api_key",
            "required when backend.url is set",
        ));
    }

    let posts_table =
        non_blank(backend.posts_table).unwrap_or_else(|| DEFAULT_POSTS_TABLE.to_string());

    Ok(BackendSettings {
        url,
        api_key,
        posts_table,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

fn non_zero_u32(value: u64, key: &'static str) -> Result<NonZeroU32, LoadError> {
    if value == 0 {
        return Err(LoadError::invalid(key, "must be greater than zero"));
    }
    let value_u32: u32 = value
        .try_into()
        .map_err(|_| LoadError::invalid(key, "value exceeds supported range for u32"))?;
    NonZeroU32::new(value_u32).ok_or_else(|| LoadError::invalid(key, "must be greater than zero"))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawBackendSettings {
    url: Option<String>,
    api_key: Option<String>,
    posts_table: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawContentSettings {
    file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawPageSettings {
    page_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawAuditSettings {
    recent_limit: Option<u64>,
}

#[cfg(test)]
mod tests;
