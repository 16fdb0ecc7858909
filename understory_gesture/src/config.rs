// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recognizer configuration.

/// Tunables for a [`GestureRecognizer`](crate::recognizer::GestureRecognizer).
///
/// ```
/// use understory_gesture::config::GestureConfig;
///
/// let config = GestureConfig::default().with_click_zone(8.0).with_click_timeout(250);
/// assert_eq!(config.click_zone, 8.0);
/// assert_eq!(config.click_timeout, 250);
/// assert_eq!(config.wheel_divisor, 10.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GestureConfig {
    /// Pixel distance (per axis, exclusive) within which a release still counts as a tap.
    pub click_zone: f64,
    /// Milliseconds after press within which the release must happen to count as a tap.
    pub click_timeout: u64,
    /// Raw wheel deltas are divided by this to produce a zoom value.
    pub wheel_divisor: f64,
}

impl GestureConfig {
    /// Default tap zone in pixels.
    pub const DEFAULT_CLICK_ZONE: f64 = 5.0;
    /// Default tap timeout in milliseconds.
    pub const DEFAULT_CLICK_TIMEOUT: u64 = 300;
    /// Default wheel divisor.
    pub const DEFAULT_WHEEL_DIVISOR: f64 = 10.0;

    /// Set the tap zone.
    pub fn with_click_zone(mut self, click_zone: f64) -> Self {
        self.click_zone = click_zone;
        self
    }

    /// Set the tap timeout.
    pub fn with_click_timeout(mut self, click_timeout: u64) -> Self {
        self.click_timeout = click_timeout;
        self
    }

    /// Set the wheel divisor.
    pub fn with_wheel_divisor(mut self, wheel_divisor: f64) -> Self {
        self.wheel_divisor = wheel_divisor;
        self
    }

    /// Replace unusable values with defaults.
    ///
    /// A non-finite or negative zone, and a zero or non-finite divisor, fall back
    /// to the defaults. A zero zone is kept and disables taps.
    pub fn sanitized(self) -> Self {
        let mut out = self;
        if !out.click_zone.is_finite() || out.click_zone < 0.0 {
            log::debug!("click_zone {} unusable, using default", out.click_zone);
            out.click_zone = Self::DEFAULT_CLICK_ZONE;
        }
        if !out.wheel_divisor.is_finite() || out.wheel_divisor == 0.0 {
            log::debug!("wheel_divisor {} unusable, using default", out.wheel_divisor);
            out.wheel_divisor = Self::DEFAULT_WHEEL_DIVISOR;
        }
        out
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            click_zone: Self::DEFAULT_CLICK_ZONE,
            click_timeout: Self::DEFAULT_CLICK_TIMEOUT,
            wheel_divisor: Self::DEFAULT_WHEEL_DIVISOR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = GestureConfig::default();
        assert_eq!(config.click_zone, 5.0);
        assert_eq!(config.click_timeout, 300);
        assert_eq!(config.wheel_divisor, 10.0);
    }

    #[test]
    fn sanitized_replaces_unusable_values() {
        let config = GestureConfig::default()
            .with_click_zone(f64::NAN)
            .with_wheel_divisor(0.0)
            .sanitized();
        assert_eq!(config, GestureConfig::default());

        let negative = GestureConfig::default().with_click_zone(-1.0).sanitized();
        assert_eq!(negative.click_zone, GestureConfig::DEFAULT_CLICK_ZONE);
    }

    #[test]
    fn sanitized_keeps_valid_values() {
        let config = GestureConfig::default()
            .with_click_zone(0.0)
            .with_wheel_divisor(-20.0)
            .with_click_timeout(0);
        assert_eq!(config.sanitized(), config);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserializes_partial_config() {
        let config: GestureConfig = serde_json::from_str(r#"{ "click_zone": 12.0 }"#).unwrap();
        assert_eq!(config.click_zone, 12.0);
        assert_eq!(config.click_timeout, GestureConfig::DEFAULT_CLICK_TIMEOUT);
    }
}
