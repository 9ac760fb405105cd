//! Environment-backed checkout settings.

use std::str::FromStr;
use std::time::Duration;

use crate::infrastructure::commerce::DEFAULT_COMMERCE_API_URL;
use crate::infrastructure::resilient_provider::RetryConfig;

pub const ENV_API_URL: &str = "COMMERCE_API_URL";
pub const ENV_PUBLIC_KEY: &str = "COMMERCE_PUBLIC_KEY";
pub const ENV_REQUEST_TIMEOUT_MS: &str = "COMMERCE_REQUEST_TIMEOUT_MS";
pub const ENV_MAX_RETRIES: &str = "COMMERCE_MAX_RETRIES";
pub const ENV_RETRY_BASE_DELAY_MS: &str = "COMMERCE_RETRY_BASE_DELAY_MS";
pub const ENV_CART_ID: &str = "STOREFRONT_CART_ID";

const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Settings for talking to the commerce API and driving the shipping chain.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSettings {
    pub api_url: String,
    /// Public (storefront) API key; required to reach the API
    pub public_key: Option<String>,
    /// Cart the binary prepares a checkout for
    pub cart_id: Option<String>,
    /// HTTP timeout of a single commerce request
    pub request_timeout: Duration,
    pub retry: RetryConfig,
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_COMMERCE_API_URL.to_string(),
            public_key: None,
            cart_id: None,
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            retry: RetryConfig {
                attempt_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
                ..RetryConfig::default()
            },
        }
    }
}

impl CheckoutSettings {
    /// Read settings from the process environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, falling back to defaults.
    ///
    /// Empty values count as unset. Unparseable numbers are logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let request_timeout_ms = parse_or(
            ENV_REQUEST_TIMEOUT_MS,
            value(ENV_REQUEST_TIMEOUT_MS),
            DEFAULT_REQUEST_TIMEOUT_MS,
        );
        let retry = RetryConfig {
            max_retries: parse_or(
                ENV_MAX_RETRIES,
                value(ENV_MAX_RETRIES),
                defaults.retry.max_retries,
            ),
            base_delay_ms: parse_or(
                ENV_RETRY_BASE_DELAY_MS,
                value(ENV_RETRY_BASE_DELAY_MS),
                defaults.retry.base_delay_ms,
            ),
            attempt_timeout_ms: request_timeout_ms,
            ..defaults.retry
        };

        Self {
            api_url: value(ENV_API_URL).unwrap_or(defaults.api_url),
            public_key: value(ENV_PUBLIC_KEY),
            cart_id: value(ENV_CART_ID),
            request_timeout: Duration::from_millis(request_timeout_ms),
            retry,
        }
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    let Some(raw) = raw else {
        return default;
    };
    match raw.parse() {
        Ok(parsed) => parsed,
        Err(_) => {
            tracing::warn!(
                key,
                value = %raw,
                default = %default,
                "Invalid numeric setting, using default"
            );
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> CheckoutSettings {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CheckoutSettings::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let settings = settings(&[]);
        assert_eq!(settings.api_url, "https://api.chec.io/v1");
        assert_eq!(settings.public_key, None);
        assert_eq!(settings.cart_id, None);
        assert_eq!(settings.request_timeout, Duration::from_secs(10));
        assert_eq!(settings.retry.max_retries, 2);
        assert_eq!(settings.retry.base_delay_ms, 250);
        assert_eq!(settings.retry.attempt_timeout_ms, 10_000);
    }

    #[test]
    fn reads_overrides() {
        let settings = settings(&[
            (ENV_API_URL, "http://localhost:4000/v1"),
            (ENV_PUBLIC_KEY, "pk_test_abc"),
            (ENV_CART_ID, " cart_123 "),
            (ENV_REQUEST_TIMEOUT_MS, "2500"),
            (ENV_MAX_RETRIES, "0"),
            (ENV_RETRY_BASE_DELAY_MS, "50"),
        ]);
        assert_eq!(settings.api_url, "http://localhost:4000/v1");
        assert_eq!(settings.public_key.as_deref(), Some("pk_test_abc"));
        assert_eq!(settings.cart_id.as_deref(), Some("cart_123"));
        assert_eq!(settings.request_timeout, Duration::from_millis(2500));
        assert_eq!(settings.retry.attempt_timeout_ms, 2500);
        assert_eq!(settings.retry.max_retries, 0);
        assert_eq!(settings.retry.base_delay_ms, 50);
    }

    #[test]
    fn invalid_numbers_fall_back_to_defaults() {
        let settings = settings(&[
            (ENV_REQUEST_TIMEOUT_MS, "soon"),
            (ENV_MAX_RETRIES, "-1"),
            (ENV_PUBLIC_KEY, "   "),
        ]);
        assert_eq!(settings.request_timeout, Duration::from_secs(10));
        assert_eq!(settings.retry.max_retries, 2);
        assert_eq!(settings.public_key, None);
    }
}
