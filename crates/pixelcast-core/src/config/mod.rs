//! Validated-input boundary for device configuration.
//!
//! A raw mapping (typically JSON) deserializes into [`RawDeviceConfig`],
//! whose fields are all optional so that missing-field errors can name the
//! field instead of surfacing as deserialization noise. [`RawDeviceConfig::validate`]
//! checks the declared constraints exactly once and produces the immutable
//! [`DeviceConfig`] record devices are built from. Framing bytes are decoded
//! from hex here and never re-parsed per frame.

use serde::Deserialize;
use thiserror::Error;

/// Transport variant selected by the `type` tag of a raw mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    /// Connectionless datagram transport, one datagram per frame.
    #[default]
    Udp,
}

/// Raw device mapping as it arrives from the configuration boundary.
///
/// # Examples
/// ```
/// use pixelcast_core::RawDeviceConfig;
///
/// let raw: RawDeviceConfig = serde_json::from_str(
///     r#"{"ip_address": "10.0.0.7", "port": 21324, "pixel_count": 16}"#,
/// ).unwrap();
/// let config = raw.validate().unwrap();
/// assert_eq!(config.pixel_count, 16);
/// assert!(!config.include_indexes);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawDeviceConfig {
    /// Transport variant; defaults to `udp`.
    #[serde(rename = "type")]
    pub kind: DeviceKind,
    /// Hostname or IP address of the device.
    pub ip_address: Option<String>,
    /// Destination port, 1..=65535.
    pub port: Option<i64>,
    /// Number of addressable pixels, at least 1.
    pub pixel_count: Option<i64>,
    /// Prepend the pixel position byte to every pixel.
    pub include_indexes: Option<bool>,
    /// Hex-encoded bytes sent before the pixel data.
    pub data_prefix: Option<String>,
    /// Hex-encoded bytes sent after the pixel data.
    pub data_postfix: Option<String>,
}

/// Immutable, validated device configuration.
///
/// Once constructed, `pixel_count` and the framing options are fixed for the
/// lifetime of the device built from it; reconfiguration means destroying
/// and recreating the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Hostname or IP address of the device.
    pub ip_address: String,
    /// Destination port.
    pub port: u16,
    /// Number of addressable pixels.
    pub pixel_count: usize,
    /// Whether every pixel is preceded by its position byte.
    pub include_indexes: bool,
    /// Decoded prefix bytes; empty when not configured.
    pub data_prefix: Vec<u8>,
    /// Decoded postfix bytes; empty when not configured.
    pub data_postfix: Vec<u8>,
}

/// Errors detected at the configuration boundary; always fatal to
/// construction, and no resource is acquired once one is returned.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed device mapping: {0}")]
    Mapping(#[from] serde_json::Error),
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("{field} out of range: {value} not in {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
    #[error("invalid hex in {field}: {source}")]
    Hex {
        field: &'static str,
        source: hex::FromHexError,
    },
}

impl DeviceConfig {
    /// Deserialize and validate a raw mapping in one step.
    ///
    /// # Examples
    /// ```
    /// use pixelcast_core::DeviceConfig;
    /// use serde_json::json;
    ///
    /// let config = DeviceConfig::from_value(&json!({
    ///     "ip_address": "127.0.0.1",
    ///     "port": 21324,
    ///     "pixel_count": 3,
    ///     "data_prefix": "c0ffee",
    /// })).unwrap();
    /// assert_eq!(config.data_prefix, vec![0xc0, 0xff, 0xee]);
    /// ```
    pub fn from_value(value: &serde_json::Value) -> Result<Self, ConfigError> {
        let raw: RawDeviceConfig = serde_json::from_value(value.clone())?;
        raw.validate()
    }
}

impl RawDeviceConfig {
    /// Check every declared constraint and produce the typed record.
    ///
    /// Validation names the offending field; defaults are applied only where
    /// documented (`include_indexes` false, framing empty).
    pub fn validate(&self) -> Result<DeviceConfig, ConfigError> {
        let ip_address = self
            .ip_address
            .clone()
            .ok_or(ConfigError::MissingField { field: "ip_address" })?;
        if ip_address.is_empty() {
            return Err(ConfigError::Invalid {
                field: "ip_address",
                reason: "must not be empty".to_string(),
            });
        }

        let port = require_in_range("port", self.port, 1, 65535)? as u16;

        let pixel_count = self
            .pixel_count
            .ok_or(ConfigError::MissingField { field: "pixel_count" })?;
        if pixel_count < 1 {
            return Err(ConfigError::Invalid {
                field: "pixel_count",
                reason: format!("must be at least 1, got {pixel_count}"),
            });
        }

        Ok(DeviceConfig {
            ip_address,
            port,
            pixel_count: pixel_count as usize,
            include_indexes: self.include_indexes.unwrap_or(false),
            data_prefix: decode_hex_field("data_prefix", self.data_prefix.as_deref())?,
            data_postfix: decode_hex_field("data_postfix", self.data_postfix.as_deref())?,
        })
    }
}

fn require_in_range(
    field: &'static str,
    value: Option<i64>,
    min: i64,
    max: i64,
) -> Result<i64, ConfigError> {
    let value = value.ok_or(ConfigError::MissingField { field })?;
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(value)
}

fn decode_hex_field(field: &'static str, value: Option<&str>) -> Result<Vec<u8>, ConfigError> {
    match value {
        None => Ok(Vec::new()),
        Some(text) => hex::decode(text).map_err(|source| ConfigError::Hex { field, source }),
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, DeviceConfig, DeviceKind, RawDeviceConfig};
    use serde_json::json;

    fn base_value() -> serde_json::Value {
        json!({
            "ip_address": "192.168.1.40",
            "port": 21324,
            "pixel_count": 30,
        })
    }

    #[test]
    fn validate_applies_documented_defaults() {
        let config = DeviceConfig::from_value(&base_value()).unwrap();
        assert_eq!(config.ip_address, "192.168.1.40");
        assert_eq!(config.port, 21324);
        assert_eq!(config.pixel_count, 30);
        assert!(!config.include_indexes);
        assert!(config.data_prefix.is_empty());
        assert!(config.data_postfix.is_empty());
    }

    #[test]
    fn validate_decodes_framing_hex_once() {
        let mut value = base_value();
        value["data_prefix"] = json!("FF");
        value["data_postfix"] = json!("0010");
        let config = DeviceConfig::from_value(&value).unwrap();
        assert_eq!(config.data_prefix, vec![0xff]);
        assert_eq!(config.data_postfix, vec![0x00, 0x10]);
    }

    #[test]
    fn missing_ip_address_names_the_field() {
        let value = json!({ "port": 1, "pixel_count": 1 });
        let err = DeviceConfig::from_value(&value).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingField { field: "ip_address" }
        ));
    }

    #[test]
    fn missing_port_names_the_field() {
        let value = json!({ "ip_address": "10.0.0.1", "pixel_count": 1 });
        let err = DeviceConfig::from_value(&value).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { field: "port" }));
    }

    #[test]
    fn port_out_of_range_is_rejected() {
        let mut value = base_value();
        value["port"] = json!(70000);
        let err = DeviceConfig::from_value(&value).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange {
                field: "port",
                value: 70000,
                ..
            }
        ));

        value["port"] = json!(0);
        let err = DeviceConfig::from_value(&value).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { field: "port", .. }));
    }

    #[test]
    fn zero_pixel_count_is_rejected() {
        let mut value = base_value();
        value["pixel_count"] = json!(0);
        let err = DeviceConfig::from_value(&value).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "pixel_count",
                ..
            }
        ));
    }

    #[test]
    fn odd_length_hex_is_rejected() {
        let mut value = base_value();
        value["data_prefix"] = json!("f");
        let err = DeviceConfig::from_value(&value).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Hex {
                field: "data_prefix",
                ..
            }
        ));
    }

    #[test]
    fn non_hex_characters_are_rejected() {
        let mut value = base_value();
        value["data_postfix"] = json!("zz");
        let err = DeviceConfig::from_value(&value).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Hex {
                field: "data_postfix",
                ..
            }
        ));
    }

    #[test]
    fn unknown_device_type_fails_deserialization() {
        let mut value = base_value();
        value["type"] = json!("serial");
        let err = DeviceConfig::from_value(&value).unwrap_err();
        assert!(matches!(err, ConfigError::Mapping(_)));
    }

    #[test]
    fn wrong_field_type_fails_deserialization() {
        let mut value = base_value();
        value["port"] = json!("loud");
        let err = DeviceConfig::from_value(&value).unwrap_err();
        assert!(matches!(err, ConfigError::Mapping(_)));
    }

    #[test]
    fn kind_defaults_to_udp() {
        let raw: RawDeviceConfig = serde_json::from_value(base_value()).unwrap();
        assert_eq!(raw.kind, DeviceKind::Udp);
    }
}
