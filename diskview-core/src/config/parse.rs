//! Minimal TOML parser for `diskview.toml`
//!
//! Handles only the subset the configuration needs. It does NOT support
//! the full TOML spec.
//!
//! Supported features:
//! - `[section]` headers
//! - `key = value` pairs (string, integer, boolean)
//! - Comments (`# ...`), also after a value
//!
//! NOT supported:
//! - Arrays and inline tables
//! - Multi-line strings and escapes
//! - Dotted keys

use heapless::String;

use super::types::{
    AppConfig, FailurePolicy, StatusConfig, StorageConfig, TimingConfig, TouchConfig,
};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Key not valid for the current section
    UnknownKey,
    /// Value has the wrong type or is out of range
    InvalidValue,
    /// String value exceeds its fixed capacity
    ValueTooLong,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Storage,
    Timing,
    Status,
    Touch,
}

/// Parse TOML text into an [`AppConfig`]
///
/// Sections and keys that are absent keep their defaults.
pub fn parse_config(input: &str) -> Result<AppConfig, ParseError> {
    let mut config = AppConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            let header = strip_comment(line);
            if !header.ends_with(']') {
                return Err(ParseError::InvalidSection);
            }
            section = parse_section_header(&header[1..header.len() - 1])?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidValue)?;
        match section {
            Section::Root => return Err(ParseError::UnknownKey),
            Section::Storage => apply_storage(&mut config.storage, key, value)?,
            Section::Timing => apply_timing(&mut config.timing, key, value)?,
            Section::Status => apply_status(&mut config.status, key, value)?,
            Section::Touch => apply_touch(&mut config.touch, key, value)?,
        }
    }

    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "storage" => Ok(Section::Storage),
        "timing" => Ok(Section::Timing),
        "status" => Ok(Section::Status),
        "touch" => Ok(Section::Touch),
        _ => Err(ParseError::InvalidSection),
    }
}

fn apply_storage(storage: &mut StorageConfig, key: &str, value: &str) -> Result<(), ParseError> {
    match key {
        "volume" => storage.volume = parse_heapless(value)?,
        "file" => storage.file = parse_heapless(value)?,
        "policy" => {
            storage.policy =
                FailurePolicy::from_name(parse_string(value)?).ok_or(ParseError::InvalidValue)?
        }
        _ => return Err(ParseError::UnknownKey),
    }
    Ok(())
}

fn apply_timing(timing: &mut TimingConfig, key: &str, value: &str) -> Result<(), ParseError> {
    let ms: u32 = parse_int(value)?;
    match key {
        "watcher_period_ms" => timing.watcher_period_ms = ms,
        "display_period_ms" => timing.display_period_ms = ms,
        "section_budget_ms" => timing.section_budget_ms = ms,
        "load_window_ms" => timing.load_window_ms = ms,
        _ => return Err(ParseError::UnknownKey),
    }
    // A zero period would spin the executor; a zero window divides by zero
    if ms == 0 && key != "section_budget_ms" {
        return Err(ParseError::InvalidValue);
    }
    Ok(())
}

fn apply_status(status: &mut StatusConfig, key: &str, value: &str) -> Result<(), ParseError> {
    match key {
        "x" => status.x = parse_int(value)?,
        "y" => status.y = parse_int(value)?,
        _ => return Err(ParseError::UnknownKey),
    }
    Ok(())
}

fn apply_touch(touch: &mut TouchConfig, key: &str, value: &str) -> Result<(), ParseError> {
    match key {
        "x_min" => touch.x_min = parse_int(value)?,
        "x_max" => touch.x_max = parse_int(value)?,
        "y_min" => touch.y_min = parse_int(value)?,
        "y_max" => touch.y_max = parse_int(value)?,
        "swap_xy" => touch.swap_xy = parse_bool(value)?,
        _ => return Err(ParseError::UnknownKey),
    }
    Ok(())
}

/// Drop a trailing comment that is not inside a string
fn strip_comment(text: &str) -> &str {
    match text.find('#') {
        Some(hash_pos) if text[..hash_pos].matches('"').count() % 2 == 0 => {
            text[..hash_pos].trim()
        }
        _ => text,
    }
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = strip_comment(line[eq_pos + 1..].trim());

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a quoted string value
fn parse_string(value: &str) -> Result<&str, ParseError> {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        Ok(&value[1..value.len() - 1])
    } else {
        Err(ParseError::InvalidValue)
    }
}

fn parse_heapless<const N: usize>(value: &str) -> Result<String<N>, ParseError> {
    let s = parse_string(value)?;
    if s.is_empty() {
        return Err(ParseError::InvalidValue);
    }
    String::try_from(s).map_err(|_| ParseError::ValueTooLong)
}

/// Parse an integer value
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
# Stock discovery board
[storage]
volume = "0:/"
file = "notes.txt"   # read at attach
policy = "visible"

[timing]
watcher_period_ms = 10
display_period_ms = 40
section_budget_ms = 250
load_window_ms = 500

[status]
x = 10
y = 280

[touch]
x_min = 200
x_max = 3900
y_min = 180
y_max = 3800
swap_xy = true
"#;

    #[test]
    fn test_empty_input_gives_defaults() {
        assert_eq!(parse_config("").unwrap(), AppConfig::default());
        assert_eq!(parse_config("# only a comment\n\n").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_full_config() {
        let config = parse_config(FULL).unwrap();
        assert_eq!(config.storage.file.as_str(), "notes.txt");
        assert_eq!(config.storage.policy, FailurePolicy::Visible);
        assert_eq!(config.timing.watcher_period_ms, 10);
        assert_eq!(config.timing.section_budget_ms, 250);
        assert_eq!(config.status, StatusConfig { x: 10, y: 280 });
        assert_eq!(config.touch.x_max, 3900);
        assert!(config.touch.swap_xy);
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let config = parse_config("[timing]\ndisplay_period_ms = 50\n").unwrap();
        assert_eq!(config.timing.display_period_ms, 50);
        assert_eq!(config.timing.watcher_period_ms, 5);
        assert_eq!(config.storage, StorageConfig::default());
    }

    #[test]
    fn test_hash_inside_string_is_kept() {
        let config = parse_config("[storage]\nfile = \"a#b.txt\"\n").unwrap();
        assert_eq!(config.storage.file.as_str(), "a#b.txt");
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse_config("[network]"), Err(ParseError::InvalidSection));
        assert_eq!(parse_config("[storage"), Err(ParseError::InvalidSection));
        assert_eq!(parse_config("file = \"m.txt\""), Err(ParseError::UnknownKey));
        assert_eq!(
            parse_config("[storage]\nsize = 4"),
            Err(ParseError::UnknownKey)
        );
        assert_eq!(
            parse_config("[storage]\npolicy = \"loud\""),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_config("[storage]\nfile = m.txt"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_config("[storage]\nvolume = \"a-very-long-volume\""),
            Err(ParseError::ValueTooLong)
        );
        assert_eq!(
            parse_config("[status]\nx = -3"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_config("[touch]\nswap_xy = yes"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(parse_config("[storage]\njunk"), Err(ParseError::InvalidValue));
    }

    #[test]
    fn test_zero_period_rejected() {
        assert_eq!(
            parse_config("[timing]\nwatcher_period_ms = 0"),
            Err(ParseError::InvalidValue)
        );
        let config = parse_config("[timing]\nsection_budget_ms = 0").unwrap();
        assert_eq!(config.timing.section_budget_ms, 0);
    }
}
