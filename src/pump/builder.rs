// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pump accessory builder.

use std::sync::Arc;

use tokio::runtime::Handle;

use crate::accessory::AccessoryRecord;
use crate::clock::{Clock, SystemClock};
use crate::config::PumpConfig;
use crate::error::{Error, Result};
use crate::host::{Characteristic, Host, ServiceKind};

use super::PumpAccessory;

/// Builder for wiring a [`PumpAccessory`] into its host.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
/// use recirc_pump::host::InMemoryHost;
/// use recirc_pump::{AccessoryRecord, PumpAccessory, PumpConfig};
///
/// # #[tokio::main]
/// # async fn main() -> recirc_pump::Result<()> {
/// let host = Arc::new(InMemoryHost::new());
/// let record = AccessoryRecord::new("Recirculation Pump");
/// host.register_accessory(record.id());
///
/// let pump = PumpAccessory::builder(host, &record)
///     .with_config(PumpConfig::default().with_shutoff_delay(Duration::from_secs(60)))
///     .build()?;
///
/// assert!(!pump.is_on());
/// # Ok(())
/// # }
/// ```
pub struct PumpAccessoryBuilder<'a, H: Host> {
    host: Arc<H>,
    record: &'a AccessoryRecord,
    config: PumpConfig,
    clock: Arc<dyn Clock>,
}

impl<'a, H: Host + 'static> PumpAccessoryBuilder<'a, H> {
    /// Creates a builder with the default configuration and system clock.
    pub(crate) fn new(host: Arc<H>, record: &'a AccessoryRecord) -> Self {
        Self {
            host,
            record,
            config: PumpConfig::default(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Sets the pump configuration.
    #[must_use]
    pub fn with_config(mut self, config: PumpConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the clock used to stamp pump runs.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns the configuration that will be used.
    #[must_use]
    pub fn config(&self) -> &PumpConfig {
        &self.config
    }

    /// Publishes the accessory's metadata and binds its handlers.
    ///
    /// Must be called from within a tokio runtime; timers are scheduled on
    /// that runtime for the lifetime of the accessory.
    ///
    /// Services are resolved before anything is written. Every host call
    /// after that overwrites or reuses what a previous call left behind, so
    /// a failed build can simply be retried on the same record.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - the configuration is invalid
    /// - no tokio runtime is available
    /// - the accessory has no accessory-information service
    /// - the host does not know the accessory
    /// - the host rejects a service handle
    pub fn build(self) -> Result<PumpAccessory<H>> {
        self.config.validate()?;
        let runtime = Handle::try_current().map_err(|_| Error::NoRuntime)?;

        let id = self.record.id();
        let info = self
            .host
            .service(id, ServiceKind::AccessoryInformation)
            .ok_or(Error::MissingService(ServiceKind::AccessoryInformation))?;
        let valve = self.host.get_or_create_service(id, ServiceKind::Valve)?;

        let metadata = [
            (Characteristic::Manufacturer, &self.config.manufacturer),
            (Characteristic::Model, &self.config.model),
            (Characteristic::SerialNumber, &self.config.serial_number),
            (Characteristic::ValveType, &self.config.valve_type_label),
        ];
        for (key, value) in metadata {
            self.host
                .set_characteristic(&info, key, value.as_str().into())?;
        }

        self.host.set_characteristic(
            &valve,
            Characteristic::Name,
            self.record.display_name().into(),
        )?;

        let pump = PumpAccessory::new(
            self.host,
            id,
            valve,
            self.config,
            self.clock,
            runtime,
        );
        pump.bind_handlers()?;

        tracing::debug!(
            accessory = %id,
            name = %self.record.display_name(),
            "Pump accessory ready"
        );
        Ok(pump)
    }
}
