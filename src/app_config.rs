//! Application configuration loading for CLI defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use imgpull_core::parser::Platform;

/// File configuration for imgpull defaults.
#[derive(Debug, Clone, Default)]
pub struct FileConfig {
    /// Default source platform.
    pub platform: Option<Platform>,
    /// Default output directory for converted images.
    pub output_dir: Option<PathBuf>,
    /// Default attempts per image (same range as CLI).
    pub max_retries: Option<u32>,
    /// Default concurrency (same range as CLI).
    pub max_concurrent: Option<u8>,
    /// Per-request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: Option<u64>,
    /// Delay before a retry in seconds.
    pub retry_delay_secs: Option<u64>,
}

impl FileConfig {
    /// Validates config values against runtime and CLI constraints.
    pub fn validate(&self) -> Result<()> {
        if let Some(max_retries) = self.max_retries
            && !(1..=20).contains(&max_retries)
        {
            bail!("Invalid config value for `max_retries`: {max_retries}. Expected range: 1..=20");
        }

        if let Some(max_concurrent) = self.max_concurrent
            && !(1..=100).contains(&max_concurrent)
        {
            bail!(
                "Invalid config value for `max_concurrent`: {max_concurrent}. Expected range: 1..=100"
            );
        }

        validate_timeout_secs("timeout_secs", self.timeout_secs)?;
        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;

        if let Some(retry_delay) = self.retry_delay_secs
            && retry_delay > 600
        {
            bail!(
                "Invalid config value for `retry_delay_secs`: {retry_delay}. Expected range: 0..=600"
            );
        }

        Ok(())
    }
}

fn validate_timeout_secs(field: &str, value: Option<u64>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(1..=3600).contains(&value) {
        bail!("Invalid config value for `{field}`: {value}. Expected range: 1..=3600");
    }
    Ok(())
}

/// Loaded config metadata.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Resolved config path if a base directory is known.
    pub path: Option<PathBuf>,
    /// Parsed file config when a config file exists and was valid.
    pub config: Option<FileConfig>,
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/imgpull/config.toml`
/// 2. `$HOME/.config/imgpull/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("imgpull")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("imgpull")
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
    let config = match path.as_deref() {
        Some(path_ref) if path_ref.exists() => Some(load_file_config(path_ref)?),
        _ => None,
    };
    Ok(LoadedConfig { path, config })
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
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }
        let line_number = line_index + 1;

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!("Invalid config syntax on line {line_number}: expected key = value");
        };

        let key = raw_key.trim();
        let value = raw_value.trim();
        let context = || format!("Invalid `{key}` value on line {line_number}");

        match key {
            "platform" => {
                let parsed = parse_string_literal(value).with_context(context)?;
                cfg.platform = Some(parsed.parse::<Platform>().with_context(context)?);
            }
            "output_dir" => {
                let parsed = parse_string_literal(value).with_context(context)?;
                cfg.output_dir = Some(PathBuf::from(parsed));
            }
            "max_retries" => {
                let parsed = parse_integer_u64(value).with_context(context)?;
                cfg.max_retries = Some(
                    u32::try_from(parsed)
                        .map_err(|_| anyhow::anyhow!("Integer value out of range for u32"))
                        .with_context(context)?,
                );
            }
            "max_concurrent" => {
                cfg.max_concurrent = Some(parse_integer_u8(value).with_context(context)?);
            }
            "timeout_secs" => {
                cfg.timeout_secs = Some(parse_integer_u64(value).with_context(context)?);
            }
            "connect_timeout_secs" => {
                cfg.connect_timeout_secs = Some(parse_integer_u64(value).with_context(context)?);
            }
            "retry_delay_secs" => {
                cfg.retry_delay_secs = Some(parse_integer_u64(value).with_context(context)?);
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

fn parse_integer_u8(raw_value: &str) -> Result<u8> {
    let value = parse_integer_u64(raw_value)?;
    u8::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range for u8"))
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
