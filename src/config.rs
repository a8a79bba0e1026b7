//! Client configuration from the environment.

use std::path::PathBuf;

use crate::identity::DEFAULT_LOGIN_PATH;

pub const ENV_API_URL: &str = "STOCKDASH_API_URL";
pub const ENV_SESSION_FILE: &str = "STOCKDASH_SESSION_FILE";
pub const ENV_LOGIN_PATH: &str = "STOCKDASH_LOGIN_PATH";
pub const ENV_OUTPUT: &str = "STOCKDASH_OUTPUT";

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8001";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Some(OutputFormat::Table),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub session_file: PathBuf,
    pub login_path: String,
    pub output: OutputFormat,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Build from any key lookup; unset or blank values fall back to defaults.
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let get = |k: &str| lookup(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        Self {
            api_url: get(ENV_API_URL).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            session_file: get(ENV_SESSION_FILE).map(PathBuf::from).unwrap_or_else(default_session_file),
            login_path: get(ENV_LOGIN_PATH).unwrap_or_else(|| DEFAULT_LOGIN_PATH.to_string()),
            output: get(ENV_OUTPUT).and_then(|v| OutputFormat::parse(&v)).unwrap_or(OutputFormat::Table),
        }
    }
}

pub fn default_session_file() -> PathBuf {
    match dirs::config_dir() {
        Some(dir) => dir.join("stockdash").join("session.json"),
        None => PathBuf::from(".stockdash").join("session.json"),
    }
}
