use std::{env, fmt::Display, str::FromStr};
use thiserror::Error;
use tracing::info;

pub const DEFAULT_CHANNEL_BUFFER: usize = 32;
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Runtime settings, read from `MARKETPLACE_*` environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketplaceConfig {
    /// Capacity of every actor mailbox.
    pub channel_buffer: usize,
    /// Tax rate in basis points applied to each order subtotal.
    pub tax_rate_bps: u32,
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            channel_buffer: DEFAULT_CHANNEL_BUFFER,
            tax_rate_bps: 0,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl MarketplaceConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let config = Self {
            channel_buffer: try_load(&lookup, "MARKETPLACE_CHANNEL_BUFFER", DEFAULT_CHANNEL_BUFFER)?,
            tax_rate_bps: try_load(&lookup, "MARKETPLACE_TAX_RATE_BPS", 0)?,
            log_filter: lookup("MARKETPLACE_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        };
        if config.channel_buffer == 0 {
            return Err(ConfigError::Invalid {
                key: "MARKETPLACE_CHANNEL_BUFFER",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(config)
    }
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    match lookup(key) {
        None => {
            info!("{key} not set, using default");
            Ok(default)
        }
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(MarketplaceConfig::from_lookup(lookup(&[])), Ok(MarketplaceConfig::default()));
    }

    #[test]
    fn reads_overrides() {
        let config = MarketplaceConfig::from_lookup(lookup(&[
            ("MARKETPLACE_CHANNEL_BUFFER", "8"),
            ("MARKETPLACE_TAX_RATE_BPS", " 825 "),
            ("MARKETPLACE_LOG", "debug"),
        ]))
        .unwrap();
        assert_eq!(config.channel_buffer, 8);
        assert_eq!(config.tax_rate_bps, 825);
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn rejects_garbage() {
        let err = MarketplaceConfig::from_lookup(lookup(&[("MARKETPLACE_TAX_RATE_BPS", "ten")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "MARKETPLACE_TAX_RATE_BPS", .. }));

        let err = MarketplaceConfig::from_lookup(lookup(&[("MARKETPLACE_CHANNEL_BUFFER", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "MARKETPLACE_CHANNEL_BUFFER", .. }));
    }
}
