// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `recirc_pump` - A simulated recirculation pump exposed as a smart-home valve.
//!
//! The pump is an accessory plugged into an accessory-hosting framework.
//! It publishes identification metadata, binds handlers for the valve's
//! Active, `InUse` and `ValveType` characteristics, and simulates a run cycle
//! each time a client activates it:
//!
//! - after the **engagement delay** (1 s) the pump reports active and in use;
//! - after the **shutoff delay** (120 s from activation) it reports inactive
//!   again.
//!
//! No hardware is involved. The hosting framework is abstracted behind the
//! [`Host`](host::Host) trait; [`InMemoryHost`](host::InMemoryHost) is a
//! complete in-memory implementation.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use recirc_pump::host::{Characteristic, CharacteristicValue, InMemoryHost};
//! use recirc_pump::{AccessoryRecord, PumpAccessory};
//!
//! #[tokio::main]
//! async fn main() -> recirc_pump::Result<()> {
//!     let host = Arc::new(InMemoryHost::new());
//!     let record = AccessoryRecord::new("Hot Water Loop");
//!     host.register_accessory(record.id());
//!
//!     let pump = PumpAccessory::new_with_defaults(Arc::clone(&host), &record)?;
//!
//!     assert_eq!(
//!         host.read(pump.service(), Characteristic::ValveType)?,
//!         Some(CharacteristicValue::from("Recirculation Pump"))
//!     );
//!
//!     // Start a run cycle
//!     host.write(pump.service(), Characteristic::Active, CharacteristicValue::UInt8(1))?;
//!     Ok(())
//! }
//! ```

mod accessory;
pub mod clock;
mod config;
pub mod error;
pub mod host;
mod pump;
pub mod types;

pub use accessory::{AccessoryId, AccessoryRecord, DeviceContext};
pub use config::{DEFAULT_ENGAGEMENT_DELAY, DEFAULT_SHUTOFF_DELAY, PumpConfig, ShutoffPolicy};
pub use error::{ConfigError, Error, Result};
pub use pump::{Activation, PumpAccessory, PumpAccessoryBuilder, PumpState, TimerHandle};
