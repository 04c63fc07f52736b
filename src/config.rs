// Catalog Rust Client Library
// Copyright 2025 catalog-rs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Client configuration, with defaults and environment overrides.
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `CATALOG_BASE_URL` | tenant URL, e.g. `https://tenant.example.com` | required |
//! | `CATALOG_API_KEY` | API key sent as bearer token | none (anonymous) |
//! | `CATALOG_CONNECT_TIMEOUT_SECS` | TCP connect timeout | 30 |
//! | `CATALOG_READ_TIMEOUT_SECS` | whole-request timeout | 900 |
//! | `CATALOG_MAX_RETRIES` | retries of retryable statuses | 5 |

use crate::error::ValidationErr;
use std::time::Duration;
use url::Url;

pub const ENV_BASE_URL: &str = "CATALOG_BASE_URL";
pub const ENV_API_KEY: &str = "CATALOG_API_KEY";
pub const ENV_CONNECT_TIMEOUT: &str = "CATALOG_CONNECT_TIMEOUT_SECS";
pub const ENV_READ_TIMEOUT: &str = "CATALOG_READ_TIMEOUT_SECS";
pub const ENV_MAX_RETRIES: &str = "CATALOG_MAX_RETRIES";

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(900);

/// Retry policy for transient HTTP failures.
///
/// The n-th retry waits `backoff_factor * 2^(n-1)`, capped at `max_backoff`,
/// unless the server sent a `Retry-After` header.
#[derive(Clone, Debug, PartialEq)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub backoff_factor: Duration,
    pub max_backoff: Duration,
    pub retry_statuses: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            backoff_factor: Duration::from_secs(1),
            max_backoff: Duration::from_secs(60),
            retry_statuses: vec![429, 500, 502, 503, 504],
        }
    }
}

impl RetryConfig {
    /// No retries at all.
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.max_retries = n;
        self
    }

    pub fn backoff_factor(mut self, d: Duration) -> Self {
        self.backoff_factor = d;
        self
    }

    pub fn max_backoff(mut self, d: Duration) -> Self {
        self.max_backoff = d;
        self
    }

    pub fn should_retry(&self, status: u16) -> bool {
        self.retry_statuses.contains(&status)
    }

    /// Delay before retry number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        if let Some(d) = retry_after {
            return d.min(self.max_backoff);
        }
        let exp = attempt.saturating_sub(1).min(31);
        self.backoff_factor
            .saturating_mul(1_u32 << exp)
            .min(self.max_backoff)
    }
}

/// Everything needed to build a [`CatalogClient`](crate::client::CatalogClient).
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: Url,
    pub api_key: Option<String>,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub retry: RetryConfig,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Result<Self, ValidationErr> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            api_key: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            retry: RetryConfig::default(),
        })
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ValidationErr> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ValidationErr>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(ENV_BASE_URL)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ValidationErr::MissingConfig(ENV_BASE_URL.to_string()))?;
        let mut config = ClientConfig::new(base_url.trim())?;
        config.api_key = lookup(ENV_API_KEY).filter(|v| !v.is_empty());

        if let Some(secs) = parse_number(&lookup, ENV_CONNECT_TIMEOUT)? {
            config.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_number(&lookup, ENV_READ_TIMEOUT)? {
            config.read_timeout = Duration::from_secs(secs);
        }
        if let Some(n) = parse_number(&lookup, ENV_MAX_RETRIES)? {
            config.retry.max_retries = u32::try_from(n).map_err(|_| ValidationErr::InvalidConfig {
                key: ENV_MAX_RETRIES.to_string(),
                value: n.to_string(),
            })?;
        }

        log::debug!(
            "{ENV_BASE_URL}={} {ENV_API_KEY}={}",
            config.base_url,
            if config.api_key.is_some() { "*****" } else { "<unset>" }
        );
        Ok(config)
    }
}

fn parse_number<F>(lookup: &F, key: &str) -> Result<Option<u64>, ValidationErr>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(v) if v.trim().is_empty() => Ok(None),
        Some(v) => v
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ValidationErr::InvalidConfig {
                key: key.to_string(),
                value: v,
            }),
    }
}

/// Parses a tenant URL. Only http and https with a host are accepted; a bare
/// host name is taken as https.
pub fn parse_base_url(s: &str) -> Result<Url, ValidationErr> {
    let candidate = if s.contains("://") {
        s.to_string()
    } else {
        format!("https://{s}")
    };
    let url = Url::parse(&candidate).map_err(|e| ValidationErr::InvalidBaseUrl {
        url: s.to_string(),
        cause: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ValidationErr::InvalidBaseUrl {
            url: s.to_string(),
            cause: format!("unsupported scheme {}", url.scheme()),
        });
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(ValidationErr::InvalidBaseUrl {
            url: s.to_string(),
            cause: "missing host".to_string(),
        });
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn from_lookup_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[(ENV_BASE_URL, "tenant.example.com")]))
            .unwrap();
        assert_eq!(config.base_url.as_str(), "https://tenant.example.com/");
        assert_eq!(config.api_key, None);
        assert_eq!(config.connect_timeout, DEFAULT_CONNECT_TIMEOUT);
        assert_eq!(config.read_timeout, DEFAULT_READ_TIMEOUT);
        assert_eq!(config.retry, RetryConfig::default());
    }

    #[test]
    fn from_lookup_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_BASE_URL, "http://localhost:21000"),
            (ENV_API_KEY, "secret"),
            (ENV_CONNECT_TIMEOUT, "5"),
            (ENV_READ_TIMEOUT, " 60 "),
            (ENV_MAX_RETRIES, "0"),
        ]))
        .unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:21000/");
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.read_timeout, Duration::from_secs(60));
        assert_eq!(config.retry.max_retries, 0);
    }

    #[test]
    fn from_lookup_errors() {
        assert!(matches!(
            ClientConfig::from_lookup(lookup(&[])),
            Err(ValidationErr::MissingConfig(k)) if k == ENV_BASE_URL
        ));
        assert!(matches!(
            ClientConfig::from_lookup(lookup(&[(ENV_BASE_URL, "x.io"), (ENV_MAX_RETRIES, "many")])),
            Err(ValidationErr::InvalidConfig { key, .. }) if key == ENV_MAX_RETRIES
        ));
        assert!(matches!(
            parse_base_url("ftp://files.example.com"),
            Err(ValidationErr::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn retry_delays_grow_and_cap() {
        let retry = RetryConfig::default();
        assert_eq!(retry.delay_for(1, None), Duration::from_secs(1));
        assert_eq!(retry.delay_for(2, None), Duration::from_secs(2));
        assert_eq!(retry.delay_for(4, None), Duration::from_secs(8));
        assert_eq!(retry.delay_for(10, None), Duration::from_secs(60));
        assert_eq!(
            retry.delay_for(1, Some(Duration::from_secs(7))),
            Duration::from_secs(7)
        );
        assert_eq!(
            retry.delay_for(1, Some(Duration::from_secs(600))),
            Duration::from_secs(60)
        );
        assert!(retry.should_retry(503));
        assert!(!retry.should_retry(400));
    }
}
