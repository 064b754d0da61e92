#![forbid(unsafe_code)]

//! Carousel options.
//!
//! [`CarouselConfig`] carries the three recognized options. It can be built
//! in code, parsed from `(key, value)` attribute pairs (the shape of an
//! element's data attributes), or, with the `config-files` feature, loaded
//! from TOML or JSON.
//!
//! ```toml
//! rate = 0.75
//! autoSlide = true
//! delayBetweenSlides = 4000
//! ```
//!
//! # Defaults
//!
//! `rate = 0.5` seconds, `autoSlide = false`, `delayBetweenSlides = 5000` ms.

use core::fmt;
use core::time::Duration;

use tracing::warn;

#[cfg(feature = "config-files")]
use std::path::Path;

#[cfg(feature = "config-files")]
use serde::{Deserialize, Serialize};

/// Default transition duration (seconds).
pub const DEFAULT_RATE_SECS: f64 = 0.5;
/// Default interval between auto-advances (milliseconds).
pub const DEFAULT_DELAY_MS: u64 = 5000;

/// Construction-time options for a carousel.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-files", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-files", serde(default, rename_all = "camelCase"))]
pub struct CarouselConfig {
    /// Transition duration in seconds.
    pub rate: f64,
    /// Advance on a timer until the user interacts.
    #[cfg_attr(
        feature = "config-files",
        serde(deserialize_with = "serde_bool_like::deserialize")
    )]
    pub auto_slide: bool,
    /// Interval between auto-advances in milliseconds.
    pub delay_between_slides: u64,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            rate: DEFAULT_RATE_SECS,
            auto_slide: false,
            delay_between_slides: DEFAULT_DELAY_MS,
        }
    }
}

impl CarouselConfig {
    /// Set the transition duration in seconds.
    #[must_use]
    pub fn with_rate(mut self, seconds: f64) -> Self {
        self.rate = seconds;
        self
    }

    /// Enable or disable auto-advance.
    #[must_use]
    pub fn with_auto_slide(mut self, enabled: bool) -> Self {
        self.auto_slide = enabled;
        self
    }

    /// Set the auto-advance interval in milliseconds.
    #[must_use]
    pub fn with_delay_between_slides(mut self, millis: u64) -> Self {
        self.delay_between_slides = millis;
        self
    }

    /// Transition duration, rounded to the nanosecond. Invalid rates
    /// collapse to zero.
    #[must_use]
    pub fn rate_duration(&self) -> Duration {
        if !self.rate.is_finite() || self.rate <= 0.0 {
            return Duration::ZERO;
        }
        // Saturating float-to-int cast.
        Duration::from_nanos((self.rate * 1e9).round() as u64)
    }

    /// Auto-advance interval.
    #[must_use]
    pub fn delay_duration(&self) -> Duration {
        Duration::from_millis(self.delay_between_slides)
    }

    /// Validate all options.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !self.rate.is_finite() || self.rate < 0.0 {
            errors.push(format!("rate must be a non-negative number of seconds, got {}", self.rate));
        }
        if self.delay_between_slides == 0 {
            errors.push("delayBetweenSlides must be > 0".into());
        }
        errors
    }

    /// Validate, returning the config on success.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Replace out-of-range options with their defaults, logging each one.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        if !self.rate.is_finite() || self.rate < 0.0 {
            warn!(rate = self.rate, "rate out of range; using default");
            self.rate = DEFAULT_RATE_SECS;
        }
        if self.delay_between_slides == 0 {
            warn!("delayBetweenSlides must be > 0; using default");
            self.delay_between_slides = DEFAULT_DELAY_MS;
        }
        self
    }

    /// Parse options from attribute-style `(key, value)` pairs.
    ///
    /// Recognizes `rate`, `autoSlide` / `auto-slide`, and
    /// `delayBetweenSlides` / `delay-between-slides`. Unknown keys are ignored;
    /// missing keys keep their defaults. Only unparsable values are errors;
    /// out-of-range values fall back to defaults via [`sanitized`](Self::sanitized).
    pub fn from_attributes<'a, I>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut config = Self::default();
        for (key, value) in pairs {
            let trimmed = value.trim();
            match key {
                "rate" => {
                    config.rate = trimmed
                        .parse::<f64>()
                        .map_err(|_| ConfigError::invalid(key, value))?;
                }
                "autoSlide" | "auto-slide" => config.auto_slide = parse_bool_like(trimmed),
                "delayBetweenSlides" | "delay-between-slides" => {
                    config.delay_between_slides = trimmed
                        .parse::<u64>()
                        .map_err(|_| ConfigError::invalid(key, value))?;
                }
                _ => {}
            }
        }
        Ok(config.sanitized())
    }

    /// Load from a TOML string.
    #[cfg(feature = "config-files")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(ConfigError::Toml)?;
        config.validated()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-files")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config-files")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s).map_err(ConfigError::Json)?;
        config.validated()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config-files")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }
}

/// Interpret a boolean-like option value.
///
/// `false`, `0`, `no`, `off` (any case) and the empty string are false;
/// everything else is true.
#[must_use]
pub fn parse_bool_like(value: &str) -> bool {
    let v = value.trim();
    !(v.is_empty()
        || v == "0"
        || v.eq_ignore_ascii_case("false")
        || v.eq_ignore_ascii_case("no")
        || v.eq_ignore_ascii_case("off"))
}

#[cfg(feature = "config-files")]
mod serde_bool_like {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolLike {
        Bool(bool),
        Int(i64),
        Float(f64),
        Str(String),
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match BoolLike::deserialize(deserializer)? {
            BoolLike::Bool(b) => b,
            BoolLike::Int(i) => i != 0,
            BoolLike::Float(f) => f != 0.0,
            BoolLike::Str(s) => super::parse_bool_like(&s),
        })
    }
}

/// Errors from building a [`CarouselConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// An option value could not be parsed.
    InvalidValue {
        /// Option name as given.
        key: String,
        /// Raw value.
        value: String,
    },
    /// Options parsed but are out of range.
    Validation(Vec<String>),
    /// I/O error reading a file.
    #[cfg(feature = "config-files")]
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config-files")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config-files")]
    Json(serde_json::Error),
}

impl ConfigError {
    fn invalid(key: &str, value: &str) -> Self {
        Self::InvalidValue {
            key: key.to_owned(),
            value: value.to_owned(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { key, value } => {
                write!(f, "invalid value {value:?} for option {key}")
            }
            Self::Validation(errors) => {
                write!(f, "config validation failed: {}", errors.join("; "))
            }
            #[cfg(feature = "config-files")]
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config-files")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config-files")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            #[cfg(feature = "config-files")]
            Self::Io(e) => Some(e),
            #[cfg(feature = "config-files")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config-files")]
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let c = CarouselConfig::default();
        assert_eq!(c.rate_duration(), Duration::from_millis(500));
        assert!(!c.auto_slide);
        assert_eq!(c.delay_duration(), Duration::from_secs(5));
        assert!(c.validate().is_empty());
    }

    #[test]
    fn attributes_override_defaults() {
        let c = CarouselConfig::from_attributes([
            ("rate", "0.25"),
            ("autoSlide", "true"),
            ("delayBetweenSlides", "1200"),
            ("unrelated", "x"),
        ])
        .expect("valid attributes");
        assert_eq!(c.rate, 0.25);
        assert!(c.auto_slide);
        assert_eq!(c.delay_between_slides, 1200);
    }

    #[test]
    fn kebab_case_keys_are_recognized() {
        let c = CarouselConfig::from_attributes([("auto-slide", "1"), ("delay-between-slides", "800")])
            .expect("valid attributes");
        assert!(c.auto_slide);
        assert_eq!(c.delay_between_slides, 800);
    }

    #[test]
    fn bool_like_values() {
        for v in ["true", "1", "yes", "on", "autoSlide", "TRUE"] {
            assert!(parse_bool_like(v), "{v}");
        }
        for v in ["false", "0", "no", "off", "", "  ", "False"] {
            assert!(!parse_bool_like(v), "{v}");
        }
    }

    #[test]
    fn unparsable_rate_is_reported() {
        let err = CarouselConfig::from_attributes([("rate", "fast")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "rate"));
        assert!(err.to_string().contains("fast"));
    }

    #[test]
    fn out_of_range_attributes_fall_back_to_defaults() {
        let c = CarouselConfig::from_attributes([
            ("delayBetweenSlides", "0"),
            ("rate", "-1"),
            ("autoSlide", "true"),
        ])
        .expect("range problems are not parse errors");
        assert_eq!(c.delay_between_slides, DEFAULT_DELAY_MS);
        assert_eq!(c.rate, DEFAULT_RATE_SECS);
        assert!(c.auto_slide);
        assert!(c.validate().is_empty());
    }

    #[test]
    fn validated_rejects_zero_delay() {
        let err = CarouselConfig::default()
            .with_delay_between_slides(0)
            .validated()
            .unwrap_err();
        match err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 1),
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn negative_rate_fails_validation() {
        let errors = CarouselConfig::default().with_rate(-1.0).validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("rate"));
    }

    #[test]
    fn invalid_rate_duration_collapses_to_zero() {
        let c = CarouselConfig::default().with_rate(f64::NAN);
        assert_eq!(c.rate_duration(), Duration::ZERO);
    }

    #[cfg(feature = "config-files")]
    #[test]
    fn toml_uses_camel_case_keys() {
        let c = CarouselConfig::from_toml_str("rate = 1.5\nautoSlide = \"yes\"\ndelayBetweenSlides = 3000\n")
            .expect("valid toml");
        assert_eq!(c.rate, 1.5);
        assert!(c.auto_slide);
        assert_eq!(c.delay_between_slides, 3000);
    }

    #[cfg(feature = "config-files")]
    #[test]
    fn json_accepts_numeric_auto_slide_and_fills_defaults() {
        let c = CarouselConfig::from_json_str(r#"{"autoSlide": 1}"#).expect("valid json");
        assert!(c.auto_slide);
        assert_eq!(c.rate, DEFAULT_RATE_SECS);
        assert_eq!(c.delay_between_slides, DEFAULT_DELAY_MS);
    }

    #[cfg(feature = "config-files")]
    #[test]
    fn json_file_round_trip_through_disk() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"rate": 0.2, "autoSlide": false}}"#).expect("write");
        let c = CarouselConfig::from_json_file(file.path()).expect("valid file");
        assert_eq!(c.rate, 0.2);
        assert!(!c.auto_slide);
    }

    #[cfg(feature = "config-files")]
    #[test]
    fn missing_file_is_io_error() {
        let err = CarouselConfig::from_toml_file("/nonexistent/glissade.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
