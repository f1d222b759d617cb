//! Server configuration from environment variables
//!
//! - `CONTENT_DIR`: directory holding the collection JSON files (default `content`)
//! - `PORT`: listen port (default 3000)
//! - `CACHE_TTL_SECS`: how long a validated collection stays cached (default 300)
//! - `CACHE_MAX_ENTRIES`: cache capacity in collections (default 64)
//! - `RELATED_LIMIT`: cap on related news articles (default 3)

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::lookup::DEFAULT_RELATED_LIMIT;

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub content_dir: PathBuf,
    pub port: u16,
    pub cache_ttl: Duration,
    pub cache_max_entries: u64,
    pub related_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("content"),
            port: 3000,
            cache_ttl: Duration::from_secs(300),
            cache_max_entries: 64,
            related_limit: DEFAULT_RELATED_LIMIT,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults and
    /// unparsable values fall back to the default with a warning
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let content_dir = lookup("CONTENT_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.content_dir);

        let ttl_secs = parse_or(&lookup, "CACHE_TTL_SECS", defaults.cache_ttl.as_secs());

        Self {
            content_dir,
            port: parse_or(&lookup, "PORT", defaults.port),
            cache_ttl: Duration::from_secs(ttl_secs),
            cache_max_entries: parse_or(&lookup, "CACHE_MAX_ENTRIES", defaults.cache_max_entries),
            related_limit: parse_or(&lookup, "RELATED_LIMIT", defaults.related_limit),
        }
    }
}

fn parse_or<T: FromStr + Copy + std::fmt::Display>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid {}={:?}, using {}", key, raw, default);
            default
        }),
    }
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
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ServerConfig::from_lookup(|_| None);
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.related_limit, 3);
    }

    #[test]
    fn reads_overrides() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("CONTENT_DIR", "/srv/content"),
            ("PORT", "8080"),
            ("CACHE_TTL_SECS", "30"),
            ("RELATED_LIMIT", "5"),
        ]));
        assert_eq!(config.content_dir, PathBuf::from("/srv/content"));
        assert_eq!(config.port, 8080);
        assert_eq!(config.cache_ttl, Duration::from_secs(30));
        assert_eq!(config.related_limit, 5);
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = ServerConfig::from_lookup(lookup_from(&[("PORT", "eighty"), ("CACHE_MAX_ENTRIES", "-1")]));
        assert_eq!(config.port, 3000);
        assert_eq!(config.cache_max_entries, 64);
    }
}
