use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use log::warn;
use crate::error::ConfigError;

const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
const DEFAULT_STUDENTS_CSV: &str = "data/students.csv";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_GEMINI_MODEL: &str = "gemini-pro";
const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";

/// Direct summarizer settings; only present when the fallback is explicitly enabled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectSummaryConfig {
    pub api_key: String,
    pub model: String,
    pub api_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub admin_password: String,
    pub students_csv: PathBuf,
    pub summary_proxy_url: String,
    pub summary_timeout: Duration,
    pub direct_summary: Option<DirectSummaryConfig>,
}

impl Config {
    /// Reads configuration from the process environment (after loading `.env`, if any)
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => log::info!("Loaded .env from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => warn!("Could not load .env file: {}", e),
        }
        Self::from_vars(std::env::vars().collect())
    }

    /// Builds a configuration from an explicit variable map
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |name: &str| {
            vars.get(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let admin_password = get("ADMIN_PASSWORD").unwrap_or_else(|| {
            warn!("ADMIN_PASSWORD not set, using the default password");
            DEFAULT_ADMIN_PASSWORD.to_string()
        });

        let students_csv = get("STUDENTS_CSV")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STUDENTS_CSV));

        let summary_proxy_url = get("SUMMARY_PROXY_URL").ok_or(ConfigError::Missing("SUMMARY_PROXY_URL"))?;

        let summary_timeout = match get("SUMMARY_TIMEOUT_SECS") {
            Some(value) => match value.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::Invalid { name: "SUMMARY_TIMEOUT_SECS", value }),
            },
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let allow_direct = match get("SUMMARY_ALLOW_DIRECT_FALLBACK") {
            Some(value) => parse_bool(&value)
                .ok_or(ConfigError::Invalid { name: "SUMMARY_ALLOW_DIRECT_FALLBACK", value })?,
            None => false,
        };

        let direct_summary = match (allow_direct, get("GEMINI_API_KEY")) {
            (true, Some(api_key)) => Some(DirectSummaryConfig {
                api_key,
                model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
                api_url: get("GEMINI_API_URL").unwrap_or_else(|| DEFAULT_GEMINI_API_URL.to_string()),
            }),
            (true, None) => {
                warn!("SUMMARY_ALLOW_DIRECT_FALLBACK is set but GEMINI_API_KEY is missing; direct fallback disabled");
                None
            }
            (false, _) => None,
        };

        Ok(Config {
            admin_password,
            students_csv,
            summary_proxy_url,
            summary_timeout,
            direct_summary,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn proxy_url_is_required() {
        assert_eq!(Config::from_vars(vars(&[])), Err(ConfigError::Missing("SUMMARY_PROXY_URL")));
    }

    #[test]
    fn defaults_apply() {
        let config = Config::from_vars(vars(&[("SUMMARY_PROXY_URL", "http://proxy/summarize")])).unwrap();

        assert_eq!(config.admin_password, DEFAULT_ADMIN_PASSWORD);
        assert_eq!(config.students_csv, PathBuf::from(DEFAULT_STUDENTS_CSV));
        assert_eq!(config.summary_timeout, Duration::from_secs(30));
        assert_eq!(config.direct_summary, None);
    }

    #[test]
    fn direct_fallback_needs_opt_in_and_key() {
        let key_only = Config::from_vars(vars(&[
            ("SUMMARY_PROXY_URL", "http://proxy"),
            ("GEMINI_API_KEY", "secret"),
        ]))
        .unwrap();
        assert_eq!(key_only.direct_summary, None);

        let opted_in = Config::from_vars(vars(&[
            ("SUMMARY_PROXY_URL", "http://proxy"),
            ("GEMINI_API_KEY", "secret"),
            ("SUMMARY_ALLOW_DIRECT_FALLBACK", "true"),
        ]))
        .unwrap();
        let direct = opted_in.direct_summary.unwrap();
        assert_eq!(direct.api_key, "secret");
        assert_eq!(direct.model, DEFAULT_GEMINI_MODEL);
    }

    #[test]
    fn rejects_bad_numbers() {
        let result = Config::from_vars(vars(&[
            ("SUMMARY_PROXY_URL", "http://proxy"),
            ("SUMMARY_TIMEOUT_SECS", "soon"),
        ]));
        assert_eq!(
            result,
            Err(ConfigError::Invalid { name: "SUMMARY_TIMEOUT_SECS", value: "soon".to_string() })
        );
    }
}
