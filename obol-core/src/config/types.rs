//! Configuration type definitions

use heapless::{String, Vec};

use crate::portfolio::MAX_ACCOUNTS;

pub const MAX_SSID_LEN: usize = 32;
pub const MAX_PASSWORD_LEN: usize = 64;
pub const MAX_HOST_LEN: usize = 64;
pub const MAX_PATH_LEN: usize = 64;
/// Three-letter codes or 40-character hex codes
pub const MAX_CURRENCY_LEN: usize = 40;
/// Classic addresses are 25 to 35 characters
pub const MAX_ADDRESS_LEN: usize = 35;
pub const MAX_SYMBOL_LEN: usize = 8;
pub const MAX_LABEL_LEN: usize = 16;
/// Most decimals the ticker will print
pub const MAX_DECIMALS: u8 = 8;

/// Wi-Fi credentials
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WifiConfig {
    pub ssid: String<MAX_SSID_LEN>,
    pub password: String<MAX_PASSWORD_LEN>,
}

/// Ledger server WebSocket endpoint
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EndpointConfig {
    pub host: String<MAX_HOST_LEN>,
    pub port: u16,
    pub path: String<MAX_PATH_LEN>,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            host: str_or_empty("xrplcluster.com"),
            port: 443,
            path: str_or_empty("/"),
        }
    }
}

/// The issued currency XRP is quoted in
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QuoteConfig {
    pub currency: String<MAX_CURRENCY_LEN>,
    pub issuer: String<MAX_ADDRESS_LEN>,
    /// Printed before prices, e.g. "$"
    pub symbol: String<MAX_SYMBOL_LEN>,
    /// Decimals shown on the ticker
    pub decimals: u8,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            currency: str_or_empty("USD"),
            issuer: str_or_empty("rhub8VRN55s94qWKDv6jmDy1pUykJzF3wq"),
            symbol: str_or_empty("$"),
            decimals: 4,
        }
    }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayConfig {
    /// Pair label shown on the ticker screen
    pub label: String<MAX_LABEL_LEN>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            label: str_or_empty("XRP/USD"),
        }
    }
}

/// Periodic behaviour, all in milliseconds
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollingConfig {
    pub price_interval_ms: u32,
    pub sample_interval_ms: u32,
    pub portfolio_interval_ms: u32,
    pub reconnect_delay_ms: u32,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            price_interval_ms: 10_000,
            sample_interval_ms: 5_000,
            portfolio_interval_ms: 30_000,
            reconnect_delay_ms: 5_000,
        }
    }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlertConfig {
    /// Absolute percent change that raises the alert
    pub threshold_percent: f64,
    /// How long the screen stays inverted
    pub flash_ms: u32,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            threshold_percent: 1.0,
            flash_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PortfolioConfig {
    pub accounts: Vec<String<MAX_ADDRESS_LEN>, MAX_ACCOUNTS>,
}

/// Board pin assignment (GPIO numbers)
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinConfig {
    pub button: u8,
    pub sda: u8,
    pub scl: u8,
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            button: 15,
            sda: 4,
            scl: 5,
        }
    }
}

/// Complete device configuration
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickerConfig {
    pub wifi: WifiConfig,
    pub endpoint: EndpointConfig,
    pub quote: QuoteConfig,
    pub display: DisplayConfig,
    pub polling: PollingConfig,
    pub alert: AlertConfig,
    pub portfolio: PortfolioConfig,
    pub pins: PinConfig,
}

/// Semantic problems found by [`TickerConfig::validate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    EmptyHost,
    EmptyCurrency,
    EmptyIssuer,
    ZeroInterval,
    TooManyDecimals,
    InvalidThreshold,
    InvalidAccount,
}

impl TickerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.host.is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        if self.quote.currency.is_empty() {
            return Err(ConfigError::EmptyCurrency);
        }
        if self.quote.issuer.is_empty() {
            return Err(ConfigError::EmptyIssuer);
        }
        if self.quote.decimals > MAX_DECIMALS {
            return Err(ConfigError::TooManyDecimals);
        }

        let p = &self.polling;
        if [
            p.price_interval_ms,
            p.sample_interval_ms,
            p.portfolio_interval_ms,
            p.reconnect_delay_ms,
            self.alert.flash_ms,
        ]
        .contains(&0)
        {
            return Err(ConfigError::ZeroInterval);
        }

        let threshold = self.alert.threshold_percent;
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(ConfigError::InvalidThreshold);
        }

        if self
            .portfolio
            .accounts
            .iter()
            .any(|a| !a.starts_with('r') || a.len() < 25)
        {
            return Err(ConfigError::InvalidAccount);
        }

        Ok(())
    }
}

fn str_or_empty<const N: usize>(s: &str) -> String<N> {
    String::try_from(s).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = TickerConfig::new();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.endpoint.port, 443);
        assert_eq!(config.quote.currency.as_str(), "USD");
    }

    #[test]
    fn test_rejects_zero_interval() {
        let mut config = TickerConfig::new();
        config.polling.price_interval_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroInterval));
    }

    #[test]
    fn test_rejects_bad_threshold() {
        let mut config = TickerConfig::new();
        config.alert.threshold_percent = 0.0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidThreshold));
    }

    #[test]
    fn test_rejects_bad_account() {
        let mut config = TickerConfig::new();
        config
            .portfolio
            .accounts
            .push(String::try_from("xyz").unwrap())
            .unwrap();
        assert_eq!(config.validate(), Err(ConfigError::InvalidAccount));
    }
}
