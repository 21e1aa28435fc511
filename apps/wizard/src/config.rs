use std::env;
use std::path::PathBuf;
use std::time::Duration;

use stepform_core::{AppError, AppResult};
use url::Url;

const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_STATE_PATH: &str = ".stepform/state.json";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Runtime settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardConfig {
    pub api_base_url: String,
    pub state_path: PathBuf,
    pub http_timeout: Duration,
}

impl WizardConfig {
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let api_base_url = non_empty(&lookup, "STEPFORM_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned());
        let parsed = Url::parse(api_base_url.as_str()).map_err(|error| {
            AppError::Validation(format!(
                "invalid STEPFORM_API_BASE_URL value '{api_base_url}': {error}"
            ))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AppError::Validation(format!(
                "STEPFORM_API_BASE_URL must use http or https, got '{}'",
                parsed.scheme()
            )));
        }

        let state_path = non_empty(&lookup, "STEPFORM_STATE_PATH")
            .map_or_else(|| PathBuf::from(DEFAULT_STATE_PATH), PathBuf::from);

        let http_timeout_secs = match non_empty(&lookup, "STEPFORM_HTTP_TIMEOUT_SECS") {
            Some(value) => value.parse::<u64>().map_err(|error| {
                AppError::Validation(format!(
                    "invalid STEPFORM_HTTP_TIMEOUT_SECS value '{value}': {error}"
                ))
            })?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };
        if http_timeout_secs == 0 {
            return Err(AppError::Validation(
                "STEPFORM_HTTP_TIMEOUT_SECS must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            api_base_url: api_base_url.trim_end_matches('/').to_owned(),
            state_path,
            http_timeout: Duration::from_secs(http_timeout_secs),
        })
    }
}

fn non_empty(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::time::Duration;

    use stepform_core::AppError;

    use super::WizardConfig;

    fn load(pairs: &[(&str, &str)]) -> Result<WizardConfig, AppError> {
        let variables: HashMap<String, String> = pairs
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        WizardConfig::from_lookup(|name| variables.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = load(&[]).unwrap_or_else(|_| unreachable!());
        assert_eq!(config.api_base_url, "http://127.0.0.1:8000");
        assert_eq!(config.state_path, PathBuf::from(".stepform/state.json"));
        assert_eq!(config.http_timeout, Duration::from_secs(30));
    }

    #[test]
    fn overrides_are_trimmed() {
        let config = load(&[
            ("STEPFORM_API_BASE_URL", " https://apply.example.org/ "),
            ("STEPFORM_STATE_PATH", "/tmp/wizard.json"),
            ("STEPFORM_HTTP_TIMEOUT_SECS", "5"),
        ])
        .unwrap_or_else(|_| unreachable!());
        assert_eq!(config.api_base_url, "https://apply.example.org");
        assert_eq!(config.state_path, PathBuf::from("/tmp/wizard.json"));
        assert_eq!(config.http_timeout, Duration::from_secs(5));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            load(&[("STEPFORM_API_BASE_URL", "not a url")]),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            load(&[("STEPFORM_API_BASE_URL", "ftp://example.org")]),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn timeout_must_be_a_positive_integer() {
        assert!(matches!(
            load(&[("STEPFORM_HTTP_TIMEOUT_SECS", "0")]),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            load(&[("STEPFORM_HTTP_TIMEOUT_SECS", "soon")]),
            Err(AppError::Validation(_))
        ));
    }
}
