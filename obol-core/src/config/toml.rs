//! Simple TOML parser for the ticker configuration
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! `ticker.toml`. It does NOT support the full TOML spec.
//!
//! Supported features:
//! - Key = value pairs (string, integer, float)
//! - [section] headers
//! - Arrays of strings, on one line or spread over several
//! - Comments (# ...)
//!
//! NOT supported:
//! - Multi-line strings
//! - Inline tables
//! - Dotted keys

use alloc::string::String;
use heapless::String as HString;

use super::types::{PinConfig, TickerConfig};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Invalid value type
    InvalidValue,
    /// Value longer than its fixed-capacity field
    TooLong,
    /// Too many items (exceeded heapless capacity)
    TooManyItems,
    /// Invalid pin string
    InvalidPin,
    /// Array opened but never closed
    UnterminatedArray,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Wifi,
    Endpoint,
    Quote,
    Display,
    Polling,
    Alert,
    Portfolio,
    Pins,
}

/// Parse TOML configuration into TickerConfig
///
/// Keys that are not present keep their defaults; unknown keys are ignored.
pub fn parse_config(input: &str) -> Result<TickerConfig, ParseError> {
    let mut config = TickerConfig::new();
    let mut section = Section::Root;

    // Array value spread over several lines: (key, text so far)
    let mut pending_array: Option<(HString<32>, String)> = None;

    for line in input.lines() {
        let line = strip_comment(line.trim());

        if let Some((key, mut text)) = pending_array.take() {
            text.push(' ');
            text.push_str(line);
            if line.ends_with(']') {
                apply_value(section, &key, &text, &mut config)?;
            } else {
                pending_array = Some((key, text));
            }
            continue;
        }

        // Skip empty lines and comments
        if line.is_empty() {
            continue;
        }

        // Check for section header
        if line.starts_with('[') && line.ends_with(']') && !line.contains('=') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        // Parse key = value
        if let Some((key, value)) = parse_key_value(line) {
            if value.starts_with('[') && !value.ends_with(']') {
                let key = HString::try_from(key).map_err(|_| ParseError::TooLong)?;
                pending_array = Some((key, String::from(value)));
                continue;
            }
            apply_value(section, key, value, &mut config)?;
        }
    }

    if pending_array.is_some() {
        return Err(ParseError::UnterminatedArray);
    }

    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "wifi" => Ok(Section::Wifi),
        "endpoint" => Ok(Section::Endpoint),
        "quote" => Ok(Section::Quote),
        "display" => Ok(Section::Display),
        "polling" => Ok(Section::Polling),
        "alert" => Ok(Section::Alert),
        "portfolio" => Ok(Section::Portfolio),
        "pins" => Ok(Section::Pins),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Remove a trailing comment, leaving `#` inside strings alone
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return line[..i].trim_end(),
            _ => {}
        }
    }
    line
}

fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> &str {
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        &value[1..value.len() - 1]
    } else {
        // Allow unquoted strings for simple values
        value
    }
}

fn parse_hstring<const N: usize>(value: &str) -> Result<HString<N>, ParseError> {
    HString::try_from(parse_string(value)).map_err(|_| ParseError::TooLong)
}

/// Parse an integer value
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    without_underscores(value)
        .parse()
        .map_err(|_| ParseError::InvalidValue)
}

/// Parse a float value
fn parse_float(value: &str) -> Result<f64, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

/// Parse a pin like "gpio15" or 15
fn parse_pin(value: &str) -> Result<u8, ParseError> {
    let value = parse_string(value);
    let digits = value.strip_prefix("gpio").unwrap_or(value);
    let pin: u8 = digits.parse().map_err(|_| ParseError::InvalidPin)?;
    if pin > 29 {
        return Err(ParseError::InvalidPin);
    }
    Ok(pin)
}

/// Parse an array of strings like ["a", "b"]
fn parse_string_array<const L: usize, const N: usize>(
    value: &str,
) -> Result<heapless::Vec<HString<L>, N>, ParseError> {
    let value = value.trim();
    let inner = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .ok_or(ParseError::InvalidValue)?;

    let mut items = heapless::Vec::new();
    for item in inner.split(',') {
        let item = item.trim();
        // Trailing comma
        if item.is_empty() {
            continue;
        }
        if !(item.starts_with('"') && item.ends_with('"') && item.len() >= 2) {
            return Err(ParseError::InvalidValue);
        }
        let item = parse_hstring(item)?;
        items.push(item).map_err(|_| ParseError::TooManyItems)?;
    }
    Ok(items)
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut TickerConfig,
) -> Result<(), ParseError> {
    match section {
        Section::Root => {}
        Section::Wifi => match key {
            "ssid" => config.wifi.ssid = parse_hstring(value)?,
            "password" => config.wifi.password = parse_hstring(value)?,
            _ => {} // Ignore unknown keys
        },
        Section::Endpoint => match key {
            "host" => config.endpoint.host = parse_hstring(value)?,
            "port" => config.endpoint.port = parse_int(value)?,
            "path" => config.endpoint.path = parse_hstring(value)?,
            _ => {}
        },
        Section::Quote => match key {
            "currency" => config.quote.currency = parse_hstring(value)?,
            "issuer" => config.quote.issuer = parse_hstring(value)?,
            "symbol" => config.quote.symbol = parse_hstring(value)?,
            "decimals" => config.quote.decimals = parse_int(value)?,
            _ => {}
        },
        Section::Display => {
            if key == "label" {
                config.display.label = parse_hstring(value)?;
            }
        }
        Section::Polling => match key {
            "price_interval_ms" => config.polling.price_interval_ms = parse_int(value)?,
            "sample_interval_ms" => config.polling.sample_interval_ms = parse_int(value)?,
            "portfolio_interval_ms" => config.polling.portfolio_interval_ms = parse_int(value)?,
            "reconnect_delay_ms" => config.polling.reconnect_delay_ms = parse_int(value)?,
            _ => {}
        },
        Section::Alert => match key {
            "threshold_percent" => config.alert.threshold_percent = parse_float(value)?,
            "flash_ms" => config.alert.flash_ms = parse_int(value)?,
            _ => {}
        },
        Section::Portfolio => {
            if key == "accounts" {
                config.portfolio.accounts = parse_string_array(value)?;
            }
        }
        Section::Pins => {
            let pins: &mut PinConfig = &mut config.pins;
            match key {
                "button" => pins.button = parse_pin(value)?,
                "sda" => pins.sda = parse_pin(value)?,
                "scl" => pins.scl = parse_pin(value)?,
                _ => {}
            }
        }
    }
    Ok(())
}

/// TOML allows `10_000`; `str::parse` does not
fn without_underscores(value: &str) -> HString<24> {
    let mut out = HString::new();
    for c in value.chars().filter(|c| *c != '_') {
        // Overlong input fails to parse anyway
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pin() {
        assert_eq!(parse_pin("\"gpio15\""), Ok(15));
        assert_eq!(parse_pin("4"), Ok(4));
        assert_eq!(parse_pin("gpio40"), Err(ParseError::InvalidPin));
        assert_eq!(parse_pin("pa3"), Err(ParseError::InvalidPin));
    }

    #[test]
    fn test_strip_comment() {
        assert_eq!(strip_comment("port = 443 # tls"), "port = 443");
        assert_eq!(strip_comment("password = \"a#b\""), "password = \"a#b\"");
        assert_eq!(strip_comment("# only"), "");
    }

    #[test]
    fn test_parse_int_underscores() {
        let value: u32 = parse_int("30_000").unwrap();
        assert_eq!(value, 30_000);
    }

    #[test]
    fn test_parse_string_array() {
        let accounts: heapless::Vec<HString<35>, 8> =
            parse_string_array(r#"["rA", "rB",]"#).unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[1].as_str(), "rB");

        let result: Result<heapless::Vec<HString<35>, 1>, _> =
            parse_string_array(r#"["rA", "rB"]"#);
        assert_eq!(result, Err(ParseError::TooManyItems));
    }

    #[test]
    fn test_parse_full_config() {
        let config_str = r#"
# Obol ticker
[wifi]
ssid = "home"
password = "hunter2#x"

[endpoint]
host = "s1.ripple.com"
port = 443
path = "/"

[quote]
currency = "USD"
issuer = "rhub8VRN55s94qWKDv6jmDy1pUykJzF3wq"
symbol = "$"
decimals = 4

[display]
label = "XRP/USD"

[polling]
price_interval_ms = 10_000
sample_interval_ms = 5000

[alert]
threshold_percent = 1.5
flash_ms = 8000

[portfolio]
accounts = [
    "rN7n7otQDd6FczFgLdSqtcsAUxDkw6fzRH",  # cold
    "rPT1Sjq2YGrBMTttX4GZHjKu9dyfzbpAYe",
]

[pins]
button = "gpio14"
"#;

        let config = parse_config(config_str).unwrap();
        assert_eq!(config.wifi.password.as_str(), "hunter2#x");
        assert_eq!(config.endpoint.host.as_str(), "s1.ripple.com");
        assert_eq!(config.quote.decimals, 4);
        assert_eq!(config.polling.price_interval_ms, 10_000);
        assert_eq!(config.polling.portfolio_interval_ms, 30_000);
        assert_eq!(config.alert.threshold_percent, 1.5);
        assert_eq!(config.alert.flash_ms, 8000);
        assert_eq!(config.portfolio.accounts.len(), 2);
        assert_eq!(config.pins.button, 14);
        assert_eq!(config.pins.sda, 4);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_unknown_section() {
        assert_eq!(
            parse_config("[motors]\nspeed = 3\n").err(),
            Some(ParseError::InvalidSection)
        );
    }

    #[test]
    fn test_unterminated_array() {
        let config_str = "[portfolio]\naccounts = [\n  \"rA\",\n";
        assert_eq!(
            parse_config(config_str).err(),
            Some(ParseError::UnterminatedArray)
        );
    }
}
