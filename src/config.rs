use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use std::env;
use tracing::warn;

pub const DEFAULT_GITHUB_GRAPHQL_URL: &str = "https://api.github.com/graphql";
pub const DEFAULT_ATCODER_API_URL: &str = "https://kenkoooo.com/atcoder/atcoder-api/results";
const GITHUB_AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub github_graphql_url: String,
    pub atcoder_api_url: String,
    pub allowed_origin: String,
    pub github_client_id: Option<String>,
    /// Timezone used to bucket activity into calendar days.
    pub utc_offset: FixedOffset,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            github_graphql_url: DEFAULT_GITHUB_GRAPHQL_URL.to_string(),
            atcoder_api_url: DEFAULT_ATCODER_API_URL.to_string(),
            allowed_origin: "http://localhost:3000".to_string(),
            github_client_id: None,
            utc_offset: jst(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(defaults.port);
        let utc_offset = match lookup("ACTIVITY_UTC_OFFSET_HOURS") {
            Some(value) => parse_offset(&value).unwrap_or_else(|| {
                warn!("ignoring invalid ACTIVITY_UTC_OFFSET_HOURS={value}");
                defaults.utc_offset
            }),
            None => defaults.utc_offset,
        };

        Self {
            port,
            github_graphql_url: lookup("GITHUB_GRAPHQL_URL").unwrap_or(defaults.github_graphql_url),
            atcoder_api_url: lookup("ATCODER_API_URL").unwrap_or(defaults.atcoder_api_url),
            allowed_origin: lookup("ALLOWED_ORIGIN").unwrap_or(defaults.allowed_origin),
            github_client_id: lookup("GITHUB_CLIENT_ID").filter(|id| !id.trim().is_empty()),
            utc_offset,
        }
    }

    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.utc_offset).date_naive()
    }

    pub fn authorize_url(&self) -> Option<String> {
        self.github_client_id
            .as_ref()
            .map(|id| format!("{GITHUB_AUTHORIZE_URL}?client_id={id}"))
    }
}

fn jst() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).unwrap_or_else(|| Utc.fix())
}

fn parse_offset(value: &str) -> Option<FixedOffset> {
    let hours = value.trim().parse::<i32>().ok()?;
    FixedOffset::east_opt(hours.checked_mul(3600)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.port, 8080);
        assert_eq!(config.github_graphql_url, DEFAULT_GITHUB_GRAPHQL_URL);
        assert_eq!(config.utc_offset.local_minus_utc(), 9 * 3600);
        assert_eq!(config.authorize_url(), None);
    }

    #[test]
    fn env_values_override_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "9000"),
            ("ACTIVITY_UTC_OFFSET_HOURS", "-5"),
            ("GITHUB_CLIENT_ID", "abc123"),
            ("ALLOWED_ORIGIN", "https://grass.example"),
        ]));
        assert_eq!(config.port, 9000);
        assert_eq!(config.utc_offset.local_minus_utc(), -5 * 3600);
        assert_eq!(config.allowed_origin, "https://grass.example");
        assert_eq!(
            config.authorize_url().as_deref(),
            Some("https://github.com/login/oauth/authorize?client_id=abc123")
        );
    }

    #[test]
    fn bad_values_fall_back() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "eighty"),
            ("ACTIVITY_UTC_OFFSET_HOURS", "48"),
        ]));
        assert_eq!(config.port, 8080);
        assert_eq!(config.utc_offset.local_minus_utc(), 9 * 3600);
    }
}
