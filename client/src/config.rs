use serde::Deserialize;

const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_SAVED_FLAG_MS: u64 = 2000;

/// Runtime settings shared by the frontend and the client core
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the gateway REST API, without a trailing slash
    pub api_base_url: String,
    /// How long a row keeps its "saved" badge after a successful save
    pub saved_flag_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            saved_flag_ms: DEFAULT_SAVED_FLAG_MS,
        }
    }
}

impl ClientConfig {
    /// Build a config from optional raw values (the frontend passes `option_env!` values)
    pub fn from_values(api_base_url: Option<&str>, saved_flag_ms: Option<&str>) -> Self {
        let defaults = Self::default();

        let api_base_url = api_base_url
            .map(|url| url.trim().trim_end_matches('/'))
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .unwrap_or(defaults.api_base_url);

        let saved_flag_ms = saved_flag_ms
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .unwrap_or(defaults.saved_flag_ms);

        Self {
            api_base_url,
            saved_flag_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:3000");
        assert_eq!(config.saved_flag_ms, 2000);
    }

    #[test]
    fn test_from_values_trims_trailing_slash() {
        let config = ClientConfig::from_values(Some("https://ledger.example.com/ "), Some("500"));
        assert_eq!(config.api_base_url, "https://ledger.example.com");
        assert_eq!(config.saved_flag_ms, 500);
    }

    #[test]
    fn test_from_values_falls_back_on_bad_input() {
        let config = ClientConfig::from_values(Some("  "), Some("soon"));
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"api_base_url":"http://10.0.0.2:8080"}"#).unwrap();
        assert_eq!(config.api_base_url, "http://10.0.0.2:8080");
        assert_eq!(config.saved_flag_ms, 2000);
    }
}
