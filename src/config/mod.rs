//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{path::PathBuf, str::FromStr};

use chrono_tz::Tz;
use clap::{Args, Parser, Subcommand, builder::BoolishValueParser};
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "folio";
const DEFAULT_SUMMARY_PATH: &str = "data/blog/summary.json";
const DEFAULT_POSTS_PATH: &str = "data/blog/posts";
const DEFAULT_USER_AGENT: &str = concat!("folio/", env!("CARGO_PKG_VERSION"));
const DEFAULT_SITE_TITLE: &str = "Alphanumeric Sheep Pig";
const DEFAULT_TIMEZONE: Tz = Tz::UTC;
const DEFAULT_ABOUT: &str = "Notes on software, science and whatever else seemed worth writing down.";

/// Command-line arguments for the folio binary.
#[derive(Debug, Parser)]
#[command(
    name = "folio",
    version,
    about = "Read a blog published as a static JSON API"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "FOLIO_CONFIG_FILE",
        value_name = "PATH",
        global = true
    )]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: Overrides,

    /// Print views as JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone, PartialEq, Eq)]
pub enum Command {
    /// List every post, in the order the API serves them.
    Summary(SummaryArgs),
    /// Show one post.
    Post {
        /// Post id; a trailing `.html` is ignored.
        id: String,
    },
    /// List the posts of one category, newest first.
    Category { name: String },
    /// List categories with their post counts.
    Categories,
    /// Show the about page.
    About,
    /// Resolve a site path, including legacy `/YYYY/MM/<id>.html` links, and show its view.
    Route { path: String },
}

#[derive(Debug, Args, Default, Clone, PartialEq, Eq)]
pub struct SummaryArgs {
    /// Show at most this many posts.
    #[arg(long, value_name = "COUNT")]
    pub limit: Option<usize>,

    /// Fetch each listed post and include its content.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub snippets: bool,
}

#[derive(Debug, Args, Default, Clone)]
pub struct Overrides {
    /// Override the API base URL.
    #[arg(long = "api-base-url", value_name = "URL", global = true)]
    pub api_base_url: Option<String>,

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
}

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api: ApiSettings,
    pub logging: LoggingSettings,
    pub site: SiteSettings,
}

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: Url,
    pub summary_url: Url,
    pub posts_url: Url,
    pub user_agent: String,
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
pub struct SiteSettings {
    pub title: String,
    pub timezone: Tz,
    pub about: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            title: DEFAULT_SITE_TITLE.to_string(),
            timezone: DEFAULT_TIMEZONE,
            about: DEFAULT_ABOUT.to_string(),
        }
    }
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

    builder = builder.add_source(Environment::with_prefix("FOLIO").separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_overrides(&cli.overrides);

    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    api: RawApiSettings,
    logging: RawLoggingSettings,
    site: RawSiteSettings,
}

impl RawSettings {
    fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(url) = overrides.api_base_url.as_ref() {
            self.api.base_url = Some(url.clone());
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings { api, logging, site } = raw;

        let api = build_api_settings(api)?;
        let logging = build_logging_settings(logging)?;
        let site = build_site_settings(site)?;

        Ok(Self { api, logging, site })
    }
}

fn build_api_settings(api: RawApiSettings) -> Result<ApiSettings, LoadError> {
    let raw_base = api.base_url.ok_or_else(|| {
        LoadError::invalid(
            "api.base_url",
            "must be set (use --api-base-url or FOLIO__API__BASE_URL)",
        )
    })?;
    let mut base_url = Url::parse(raw_base.trim())
        .map_err(|err| LoadError::invalid("api.base_url", format!("failed to parse: {err}")))?;
    if base_url.cannot_be_a_base() {
        return Err(LoadError::invalid(
            "api.base_url",
            "must be a hierarchical URL such as https://example.com/",
        ));
    }
    if !base_url.path().ends_with('/') {
        let path = format!("{}/", base_url.path());
        base_url.set_path(&path);
    }

    let summary_path = api
        .summary_path
        .unwrap_or_else(|| DEFAULT_SUMMARY_PATH.to_string());
    let summary_url = join_endpoint(&base_url, &summary_path, "api.summary_path")?;

    let posts_path = api
        .posts_path
        .unwrap_or_else(|| DEFAULT_POSTS_PATH.to_string());
    let posts_url = join_endpoint(&base_url, &posts_path, "api.posts_path")?;

    let user_agent = api
        .user_agent
        .filter(|agent| !agent.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

    Ok(ApiSettings {
        base_url,
        summary_url,
        posts_url,
        user_agent,
    })
}

fn join_endpoint(base: &Url, path: &str, key: &'static str) -> Result<Url, LoadError> {
    if path.trim().is_empty() {
        return Err(LoadError::invalid(key, "path must not be empty"));
    }
    base.join(path.trim())
        .map_err(|err| LoadError::invalid(key, format!("failed to join with base URL: {err}")))
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_site_settings(site: RawSiteSettings) -> Result<SiteSettings, LoadError> {
    let defaults = SiteSettings::default();

    let title = site.title.unwrap_or(defaults.title);
    if title.trim().is_empty() {
        return Err(LoadError::invalid("site.title", "must not be empty"));
    }

    let timezone = match site.timezone {
        Some(name) => name
            .trim()
            .parse::<Tz>()
            .map_err(|err| LoadError::invalid("site.timezone", format!("unknown time zone: {err}")))?,
        None => defaults.timezone,
    };

    Ok(SiteSettings {
        title,
        timezone,
        about: site.about.unwrap_or(defaults.about),
    })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawApiSettings {
    base_url: Option<String>,
    summary_path: Option<String>,
    posts_path: Option<String>,
    user_agent: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSiteSettings {
    title: Option<String>,
    timezone: Option<String>,
    about: Option<String>,
}

/// Resolve configuration using the process arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}
