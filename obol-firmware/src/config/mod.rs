//! Configuration loading
//!
//! ticker.toml is embedded at compile time and parsed at boot. Invalid
//! contents fall back to the compiled-in defaults.

use defmt::*;

use obol_core::config::toml::parse_config;
use obol_core::config::TickerConfig;

/// Embedded configuration (compiled into firmware)
/// Edit ticker.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../../ticker.toml");

/// Parse and validate the embedded configuration
pub fn load() -> TickerConfig {
    let config = match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            // build.rs validates the file, so this is a parser mismatch
            error!("Failed to parse embedded config: {:?}", e);
            error!("Using default configuration");
            return TickerConfig::default();
        }
    };

    if let Err(e) = config.validate() {
        error!("Invalid embedded config: {:?}", e);
        error!("Using default configuration");
        return TickerConfig::default();
    }

    log_config_summary(&config);
    config
}

/// Log a summary of the loaded configuration
fn log_config_summary(config: &TickerConfig) {
    info!("Configuration loaded successfully");
    debug!(
        "  endpoint {}:{}{}",
        config.endpoint.host.as_str(),
        config.endpoint.port,
        config.endpoint.path.as_str()
    );
    debug!(
        "  quote {} / {}",
        config.quote.currency.as_str(),
        config.quote.issuer.as_str()
    );
    debug!("  {} accounts", config.portfolio.accounts.len());
    debug!(
        "  alert {}% over {} ms samples",
        config.alert.threshold_percent,
        config.polling.sample_interval_ms
    );
}
