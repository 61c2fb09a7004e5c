// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pump accessory configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::types::RECIRCULATION_PUMP;

/// Default time for the simulated pump to engage.
pub const DEFAULT_ENGAGEMENT_DELAY: Duration = Duration::from_millis(1000);

/// Default time after activation at which the pump is forced off.
pub const DEFAULT_SHUTOFF_DELAY: Duration = Duration::from_millis(120_000);

/// What a new activation does to shutoff timers that are still pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShutoffPolicy {
    /// Every activation schedules its own shutoff and nothing is cancelled.
    ///
    /// The earliest pending shutoff turns the pump off even if a later
    /// activation just engaged it.
    #[default]
    Independent,
    /// An activation cancels all pending shutoffs before scheduling its own,
    /// so the run window restarts on every trigger.
    ///
    /// This deviates from the pump's historical behavior and must be opted
    /// into explicitly.
    RestartOnActivate,
}

/// Configuration for a [`PumpAccessory`](crate::PumpAccessory).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use recirc_pump::{PumpConfig, ShutoffPolicy};
///
/// // Defaults: 1 s engagement, 120 s shutoff, independent timers
/// let config = PumpConfig::default();
/// assert_eq!(config.engagement_delay, Duration::from_secs(1));
///
/// let config = PumpConfig::default()
///     .with_serial_number("0042")
///     .with_shutoff_delay(Duration::from_secs(300))
///     .with_shutoff_policy(ShutoffPolicy::RestartOnActivate);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PumpConfig {
    /// Manufacturer written to the information service.
    pub manufacturer: String,
    /// Model written to the information service.
    pub model: String,
    /// Serial number written to the information service.
    pub serial_number: String,
    /// Descriptive label written to the information service's `ValveType`.
    /// The valve's own `ValveType` read always reports "Recirculation Pump".
    pub valve_type_label: String,
    /// Time between activation and the pump running.
    pub engagement_delay: Duration,
    /// Time between activation and the pump being forced off.
    pub shutoff_delay: Duration,
    /// Treatment of pending shutoffs on re-activation.
    pub shutoff_policy: ShutoffPolicy,
}

impl Default for PumpConfig {
    fn default() -> Self {
        Self {
            manufacturer: "Kyle".to_string(),
            model: "Raspberry-Pi-Pico-2-W".to_string(),
            serial_number: "0001".to_string(),
            valve_type_label: RECIRCULATION_PUMP.to_string(),
            engagement_delay: DEFAULT_ENGAGEMENT_DELAY,
            shutoff_delay: DEFAULT_SHUTOFF_DELAY,
            shutoff_policy: ShutoffPolicy::Independent,
        }
    }
}

/// JSON form of [`PumpConfig`]. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPumpConfig {
    manufacturer: Option<String>,
    model: Option<String>,
    serial_number: Option<String>,
    valve_type_label: Option<String>,
    engagement_delay_ms: Option<u64>,
    shutoff_delay_ms: Option<u64>,
    shutoff_policy: Option<ShutoffPolicy>,
}

impl PumpConfig {
    /// Parses and validates a JSON configuration.
    ///
    /// Missing fields take their default values.
    ///
    /// ```
    /// use std::time::Duration;
    /// use recirc_pump::{PumpConfig, ShutoffPolicy};
    ///
    /// let config = PumpConfig::from_json(r#"{
    ///     "serial_number": "0002",
    ///     "shutoff_delay_ms": 60000,
    ///     "shutoff_policy": "restart_on_activate"
    /// }"#).unwrap();
    ///
    /// assert_eq!(config.shutoff_delay, Duration::from_secs(60));
    /// assert_eq!(config.shutoff_policy, ShutoffPolicy::RestartOnActivate);
    /// assert_eq!(config.manufacturer, "Kyle");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the JSON is malformed or the delays are
    /// invalid (see [`validate`](Self::validate)).
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawPumpConfig = serde_json::from_str(json).map_err(ConfigError::from)?;
        let defaults = Self::default();

        let config = Self {
            manufacturer: raw.manufacturer.unwrap_or(defaults.manufacturer),
            model: raw.model.unwrap_or(defaults.model),
            serial_number: raw.serial_number.unwrap_or(defaults.serial_number),
            valve_type_label: raw.valve_type_label.unwrap_or(defaults.valve_type_label),
            engagement_delay: raw
                .engagement_delay_ms
                .map_or(defaults.engagement_delay, Duration::from_millis),
            shutoff_delay: raw
                .shutoff_delay_ms
                .map_or(defaults.shutoff_delay, Duration::from_millis),
            shutoff_policy: raw.shutoff_policy.unwrap_or(defaults.shutoff_policy),
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks that both delays are non-zero and that the shutoff outlasts
    /// the engagement.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` describing the first violated constraint.
    pub fn validate(&self) -> Result<()> {
        if self.engagement_delay.is_zero() {
            return Err(ConfigError::ZeroDelay("engagement delay").into());
        }
        if self.shutoff_delay.is_zero() {
            return Err(ConfigError::ZeroDelay("shutoff delay").into());
        }
        if self.shutoff_delay <= self.engagement_delay {
            return Err(ConfigError::ShutoffBeforeEngagement {
                engagement_ms: duration_ms(self.engagement_delay),
                shutoff_ms: duration_ms(self.shutoff_delay),
            }
            .into());
        }
        Ok(())
    }

    /// Sets the manufacturer.
    #[must_use]
    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = manufacturer.into();
        self
    }

    /// Sets the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the serial number.
    #[must_use]
    pub fn with_serial_number(mut self, serial_number: impl Into<String>) -> Self {
        self.serial_number = serial_number.into();
        self
    }

    /// Sets the information-service valve label.
    #[must_use]
    pub fn with_valve_type_label(mut self, label: impl Into<String>) -> Self {
        self.valve_type_label = label.into();
        self
    }

    /// Sets the engagement delay.
    #[must_use]
    pub fn with_engagement_delay(mut self, delay: Duration) -> Self {
        self.engagement_delay = delay;
        self
    }

    /// Sets the shutoff delay.
    #[must_use]
    pub fn with_shutoff_delay(mut self, delay: Duration) -> Self {
        self.shutoff_delay = delay;
        self
    }

    /// Sets the shutoff policy.
    #[must_use]
    pub fn with_shutoff_policy(mut self, policy: ShutoffPolicy) -> Self {
        self.shutoff_policy = policy;
        self
    }
}

pub(crate) fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
