//! Configuration loader
//!
//! Loads the connector configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If the credential variables are missing, falls back to a file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `FISHBOWL_SERVER_URL`: Server base URL (required)
//! - `FISHBOWL_USERNAME`: Account name (required)
//! - `FISHBOWL_PASSWORD`: Account password (required)
//! - `FISHBOWL_PORT`: Server port, 443 when unset
//! - `FISHBOWL_APP_NAME`: App name registered with Fishbowl
//! - `FISHBOWL_APP_ID`: App id registered with Fishbowl
//! - `FISHBOWL_HTTP_TIMEOUT_SECONDS`: Client-side request timeout
//! - `FISHBOWL_USER_AGENT`: User agent header
//! - `FISHBOWL_ACCEPT_INVALID_CERTS`: Accept self-signed certificates
//! - `FISHBOWL_POLL_STATE_PATH`: JSON file for poll cursors
//!
//! ## File Locations
//! The loader probes `fishbowl.{json,toml}` then `config.{json,toml}` in the
//! current directory, its parent and grandparent, then the same names next
//! to the executable.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use fishbowl_domain::{
    Credential, FishbowlConfig, FishbowlError, HttpSettings, PollSettings, Result,
};

const CONFIG_FILE_NAMES: [&str; 4] =
    ["fishbowl.json", "fishbowl.toml", "config.json", "config.toml"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `FishbowlError::Config` if neither source yields a valid
/// configuration.
pub fn load() -> Result<FishbowlConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("config_loaded_from_env");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "config_env_incomplete_trying_file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `FishbowlError::Config` if a required variable is missing or a
/// numeric variable does not parse.
pub fn load_from_env() -> Result<FishbowlConfig> {
    let mut credential = Credential::new(
        env_var("FISHBOWL_SERVER_URL")?,
        env_var("FISHBOWL_USERNAME")?,
        env_var("FISHBOWL_PASSWORD")?,
    );
    credential.port = env_parse::<u16>("FISHBOWL_PORT")?;
    if let Some(app_name) = env_opt("FISHBOWL_APP_NAME") {
        credential.app_name = app_name;
    }
    if let Some(app_id) = env_parse::<u32>("FISHBOWL_APP_ID")? {
        credential.app_id = app_id;
    }

    Ok(FishbowlConfig {
        credential,
        http: HttpSettings {
            timeout_seconds: env_parse::<u64>("FISHBOWL_HTTP_TIMEOUT_SECONDS")?,
            user_agent: env_opt("FISHBOWL_USER_AGENT"),
            accept_invalid_certs: env_bool("FISHBOWL_ACCEPT_INVALID_CERTS", false),
        },
        poll: PollSettings { state_path: env_opt("FISHBOWL_POLL_STATE_PATH").map(PathBuf::from) },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. The format follows
/// the file extension.
///
/// # Errors
/// Returns `FishbowlError::Config` if the file is missing, unreadable or
/// malformed.
pub fn load_from_file(path: Option<PathBuf>) -> Result<FishbowlConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(FishbowlError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            FishbowlError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "config_loading_from_file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| FishbowlError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

fn parse_config(contents: &str, path: &Path) -> Result<FishbowlConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| FishbowlError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| FishbowlError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(FishbowlError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// First existing config file among the standard locations.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

fn env_var(key: &str) -> Result<String> {
    env_opt(key).ok_or_else(|| {
        FishbowlError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Value of `key`, treating an empty variable as unset.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| FishbowlError::Config(format!("Invalid value for {key}: {e}")))
        })
        .transpose()
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
