use anyhow::{Context, Result};
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";

/// Client configuration loaded from the environment (and `.env`, if present).
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub parser_url: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_url = lookup("JOBBOARD_API_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = normalize_url(&api_url).context("JOBBOARD_API_URL must be an http(s) URL")?;

        let parser_url = match lookup("JOBBOARD_PARSER_URL").filter(|url| !url.trim().is_empty()) {
            Some(url) => Some(normalize_url(&url).context("JOBBOARD_PARSER_URL must be an http(s) URL")?),
            None => None,
        };

        Ok(Config {
            api_url,
            parser_url,
            data_dir: lookup("JOBBOARD_DATA_DIR").map(PathBuf::from),
            log_level: lookup("JOBBOARD_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn normalize_url(url: &str) -> Result<String> {
    let url = url.trim().trim_end_matches('/');
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(url.to_string())
    } else {
        Err(anyhow::anyhow!("'{}' is not an http(s) URL", url))
    }
}
