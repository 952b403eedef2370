//! Application configuration loading for CLI defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use catalog_core::catalog::{DEFAULT_BASE_URL, DEFAULT_SUBJECT};
use catalog_core::{CatalogConfig, DEFAULT_DISPLAY_TIMEOUT, RetryPolicy};

use crate::cli::Cli;

/// Accepted range for every millisecond timeout key.
const TIMEOUT_MS_RANGE: std::ops::RangeInclusive<u64> = 100..=60_000;

/// Accepted range for `max_attempts`.
const MAX_ATTEMPTS_RANGE: std::ops::RangeInclusive<u32> = 1..=5;

/// File configuration for catalog-browser defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    /// Catalog API base URL.
    pub base_url: Option<String>,
    /// Subject listed by the list view.
    pub subject: Option<String>,
    /// Listing and search request timeout in milliseconds.
    pub request_timeout_ms: Option<u64>,
    /// Per-candidate detail request timeout in milliseconds.
    pub detail_timeout_ms: Option<u64>,
    /// How long the detail view shows its loading state before falling back.
    pub detail_display_timeout_ms: Option<u64>,
    /// Total attempts for listing and search requests.
    pub max_attempts: Option<u32>,
    /// Default verbosity mode.
    pub verbosity: Option<VerbositySetting>,
}

impl FileConfig {
    /// Validates config values against runtime constraints.
    pub fn validate(&self) -> Result<()> {
        validate_timeout_ms("request_timeout_ms", self.request_timeout_ms)?;
        validate_timeout_ms("detail_timeout_ms", self.detail_timeout_ms)?;
        validate_timeout_ms("detail_display_timeout_ms", self.detail_display_timeout_ms)?;

        if let Some(attempts) = self.max_attempts
            && !MAX_ATTEMPTS_RANGE.contains(&attempts)
        {
            bail!("Invalid config value for `max_attempts`: {attempts}. Expected range: 1..=5");
        }

        if let Some(base_url) = &self.base_url
            && !(base_url.starts_with("http://") || base_url.starts_with("https://"))
        {
            bail!("Invalid config value for `base_url`: '{base_url}'. Expected an http(s) URL");
        }

        if let Some(subject) = &self.subject
            && subject.trim().is_empty()
        {
            bail!("Invalid config value for `subject`: must not be empty");
        }

        Ok(())
    }
}

fn validate_timeout_ms(field: &str, value: Option<u64>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !TIMEOUT_MS_RANGE.contains(&value) {
        bail!("Invalid config value for `{field}`: {value}. Expected range: 100..=60000");
    }
    Ok(())
}

/// Supported config verbosity labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbositySetting {
    Default,
    Verbose,
    Quiet,
    Debug,
}

impl VerbositySetting {
    /// Returns the stable string label for display output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Verbose => "verbose",
            Self::Quiet => "quiet",
            Self::Debug => "debug",
        }
    }

    /// Log level used when neither `RUST_LOG` nor a CLI flag decides.
    #[must_use]
    pub fn log_level(self) -> &'static str {
        match self {
            Self::Default => "info",
            Self::Verbose => "debug",
            Self::Quiet => "error",
            Self::Debug => "trace",
        }
    }
}

/// Loaded config metadata.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    /// Resolved config path if a base directory is known.
    pub path: Option<PathBuf>,
    /// Parsed file config when a config file exists and was valid.
    pub config: Option<FileConfig>,
    /// Indicates whether configuration was loaded from disk.
    pub loaded_from_file: bool,
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/catalog-browser/config.toml`
/// 2. `$HOME/.config/catalog-browser/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("catalog-browser")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("catalog-browser")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from default path if present.
pub fn load_default_file_config() -> Result<LoadedConfig> {
    let path = resolve_default_config_path();
    let Some(path_ref) = path.as_deref() else {
        return Ok(LoadedConfig::default());
    };

    if !path_ref.exists() {
        return Ok(LoadedConfig {
            path,
            config: None,
            loaded_from_file: false,
        });
    }

    let config = load_file_config(path_ref)?;
    Ok(LoadedConfig {
        path,
        config: Some(config),
        loaded_from_file: true,
    })
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line_number = line_index + 1;
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!("Invalid config syntax on line {line_number}: expected key = value");
        };

        let key = raw_key.trim();
        let value = raw_value.trim();
        let invalid = || format!("Invalid `{key}` value on line {line_number}");

        match key {
            "base_url" => {
                let parsed = parse_string_literal(value).with_context(invalid)?;
                cfg.base_url = Some(parsed.trim_end_matches('/').to_string());
            }
            "subject" => {
                cfg.subject = Some(parse_string_literal(value).with_context(invalid)?);
            }
            "request_timeout_ms" => {
                cfg.request_timeout_ms = Some(parse_integer_u64(value).with_context(invalid)?);
            }
            "detail_timeout_ms" => {
                cfg.detail_timeout_ms = Some(parse_integer_u64(value).with_context(invalid)?);
            }
            "detail_display_timeout_ms" => {
                cfg.detail_display_timeout_ms =
                    Some(parse_integer_u64(value).with_context(invalid)?);
            }
            "max_attempts" => {
                let parsed = parse_integer_u64(value).with_context(invalid)?;
                let attempts = u32::try_from(parsed)
                    .map_err(|_| anyhow::anyhow!("max_attempts out of range for u32"))
                    .with_context(invalid)?;
                cfg.max_attempts = Some(attempts);
            }
            "verbosity" => {
                let parsed = parse_string_literal(value).with_context(invalid)?;
                cfg.verbosity = Some(parse_verbosity(&parsed).with_context(|| {
                    format!("Invalid `verbosity` value '{parsed}' on line {line_number}")
                })?);
            }
            unknown => {
                bail!("Unknown configuration key: '{unknown}' on line {line_number}");
            }
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(raw_value: &str) -> Result<String> {
    if raw_value.len() < 2 || !raw_value.starts_with('"') || !raw_value.ends_with('"') {
        bail!("Expected double-quoted string");
    }
    Ok(raw_value[1..raw_value.len() - 1].to_string())
}

fn parse_integer_u64(raw_value: &str) -> Result<u64> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected integer value");
    }
    let value = token.parse::<i128>()?;
    if value < 0 {
        bail!("Expected non-negative integer");
    }
    u64::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range for u64"))
}

fn parse_verbosity(value: &str) -> Result<VerbositySetting> {
    match value {
        "default" => Ok(VerbositySetting::Default),
        "verbose" => Ok(VerbositySetting::Verbose),
        "quiet" => Ok(VerbositySetting::Quiet),
        "debug" => Ok(VerbositySetting::Debug),
        _ => bail!("Expected one of: default, verbose, quiet, debug"),
    }
}

/// Where an effective value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    Cli,
    File,
    Default,
}

impl ValueSource {
    /// Returns the stable string label for display output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cli => "cli",
            Self::File => "file",
            Self::Default => "default",
        }
    }
}

/// Settings after merging CLI flags, the config file and built-in defaults.
#[derive(Debug, Clone)]
pub struct EffectiveConfig {
    /// Client configuration (base URL, timeouts, retry policy).
    pub catalog: CatalogConfig,
    /// Origin of the base URL.
    pub base_url_source: ValueSource,
    /// Subject for the list view.
    pub subject: String,
    /// Detail loading timer.
    pub display_timeout: Duration,
    /// Verbosity from the config file.
    pub verbosity: VerbositySetting,
}

impl EffectiveConfig {
    /// Merges CLI flags over file values over defaults.
    #[must_use]
    pub fn resolve(cli: &Cli, file: Option<&FileConfig>) -> Self {
        let file = file.cloned().unwrap_or_default();

        let (base_url, base_url_source) = match (&cli.base_url, &file.base_url) {
            (Some(url), _) => (url.clone(), ValueSource::Cli),
            (None, Some(url)) => (url.clone(), ValueSource::File),
            (None, None) => (DEFAULT_BASE_URL.to_string(), ValueSource::Default),
        };

        let mut catalog = CatalogConfig::with_base_url(base_url);
        if let Some(ms) = file.request_timeout_ms {
            catalog = catalog.request_timeout(Duration::from_millis(ms));
        }
        if let Some(ms) = file.detail_timeout_ms {
            catalog = catalog.detail_timeout(Duration::from_millis(ms));
        }
        if let Some(attempts) = file.max_attempts {
            catalog = catalog.retry_policy(RetryPolicy::with_max_attempts(attempts));
        }

        Self {
            catalog,
            base_url_source,
            subject: file
                .subject
                .unwrap_or_else(|| DEFAULT_SUBJECT.to_string()),
            display_timeout: file
                .detail_display_timeout_ms
                .map_or(DEFAULT_DISPLAY_TIMEOUT, Duration::from_millis),
            verbosity: file.verbosity.unwrap_or(VerbositySetting::Default),
        }
    }
}
