// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The simulated recirculation pump accessory.
//!
//! # Run Cycle
//!
//! Every activation schedules two timers at the same instant:
//!
//! - the **engagement** timer (1 s by default) turns the pump on and stamps
//!   its last run time;
//! - the **shutoff** timer (120 s by default) turns the pump off.
//!
//! With the default [`ShutoffPolicy::Independent`] no timer is ever
//! cancelled. Activating again while a cycle is pending adds a second pair
//! of timers, and the first shutoff still turns the pump off at its own
//! deadline.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use recirc_pump::host::{Characteristic, CharacteristicValue, InMemoryHost};
//! use recirc_pump::{AccessoryRecord, PumpAccessory};
//!
//! # #[tokio::main(flavor = "current_thread", start_paused = true)]
//! # async fn main() -> recirc_pump::Result<()> {
//! let host = Arc::new(InMemoryHost::new());
//! let record = AccessoryRecord::new("Recirculation Pump");
//! host.register_accessory(record.id());
//!
//! let pump = PumpAccessory::new_with_defaults(Arc::clone(&host), &record)?;
//!
//! // A client turns the valve on
//! host.write(pump.service(), Characteristic::Active, CharacteristicValue::UInt8(1))?;
//!
//! tokio::time::sleep(Duration::from_millis(1001)).await;
//! assert_eq!(
//!     host.read(pump.service(), Characteristic::InUse)?,
//!     Some(CharacteristicValue::UInt8(1))
//! );
//! # Ok(())
//! # }
//! ```

mod builder;
mod state;
mod timer;

pub use builder::PumpAccessoryBuilder;
pub use state::PumpState;
pub use timer::TimerHandle;

use std::fmt;
use std::sync::{Arc, Weak};

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::AbortHandle;

use crate::accessory::{AccessoryId, AccessoryRecord};
use crate::clock::Clock;
use crate::config::{PumpConfig, ShutoffPolicy, duration_ms};
use crate::error::Result;
use crate::host::{
    Characteristic, CharacteristicHandlers, CharacteristicValue, Host, ServiceHandle,
};
use crate::types::{Active, InUse, RECIRCULATION_PUMP};

/// A simulated recirculation pump exposed as a valve.
///
/// The accessory is cheap to clone; clones share the same pump. The host's
/// handlers only hold a weak reference, so keep a clone alive for as long as
/// the accessory should answer. Pending timers keep the pump alive until
/// they fire.
pub struct PumpAccessory<H: Host> {
    inner: Arc<PumpInner<H>>,
}

struct PumpInner<H: Host> {
    host: Arc<H>,
    accessory: AccessoryId,
    service: ServiceHandle,
    config: PumpConfig,
    clock: Arc<dyn Clock>,
    runtime: Handle,
    state: RwLock<PumpState>,
    state_tx: watch::Sender<PumpState>,
    pending_shutoffs: Mutex<Vec<AbortHandle>>,
}

/// Timers scheduled by a single activation.
#[derive(Debug)]
pub struct Activation {
    engagement: TimerHandle,
    shutoff: TimerHandle,
}

impl Activation {
    /// Returns the timer that turns the pump on.
    #[must_use]
    pub fn engagement(&self) -> &TimerHandle {
        &self.engagement
    }

    /// Returns the timer that turns the pump off.
    #[must_use]
    pub fn shutoff(&self) -> &TimerHandle {
        &self.shutoff
    }

    /// Splits the activation into `(engagement, shutoff)`.
    #[must_use]
    pub fn into_parts(self) -> (TimerHandle, TimerHandle) {
        (self.engagement, self.shutoff)
    }
}

impl<H: Host + 'static> PumpAccessory<H> {
    /// Starts building a pump for an accessory record.
    pub fn builder(host: Arc<H>, record: &AccessoryRecord) -> PumpAccessoryBuilder<'_, H> {
        PumpAccessoryBuilder::new(host, record)
    }

    /// Builds a pump with the default configuration and system clock.
    ///
    /// # Errors
    ///
    /// See [`PumpAccessoryBuilder::build`].
    pub fn new_with_defaults(host: Arc<H>, record: &AccessoryRecord) -> Result<Self> {
        Self::builder(host, record).build()
    }

    pub(crate) fn new(
        host: Arc<H>,
        accessory: AccessoryId,
        service: ServiceHandle,
        config: PumpConfig,
        clock: Arc<dyn Clock>,
        runtime: Handle,
    ) -> Self {
        let state = PumpState::new(clock.now());
        let (state_tx, _) = watch::channel(state);
        Self {
            inner: Arc::new(PumpInner {
                host,
                accessory,
                service,
                config,
                clock,
                runtime,
                state: RwLock::new(state),
                state_tx,
                pending_shutoffs: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Binds the Active, `InUse` and `ValveType` handlers on the valve service.
    ///
    /// Handlers only keep a weak reference to the pump. Once every
    /// `PumpAccessory` clone is gone, reads report an idle pump and writes
    /// are ignored.
    fn bind_handlers(&self) -> Result<()> {
        let host = &self.inner.host;
        let service = &self.inner.service;

        let (get_pump, set_pump) = (self.downgrade(), self.downgrade());
        host.bind_handlers(
            service,
            Characteristic::Active,
            CharacteristicHandlers::new()
                .with_get(move || {
                    Self::upgrade(&get_pump)
                        .map_or(Active::Inactive, |pump| pump.active())
                        .into()
                })
                .with_set(move |value| match Self::upgrade(&set_pump) {
                    Some(pump) => {
                        pump.activate(&value);
                    }
                    None => tracing::debug!(value = %value, "Ignoring write to dropped pump"),
                }),
        )?;

        let pump = self.downgrade();
        host.bind_handlers(
            service,
            Characteristic::InUse,
            CharacteristicHandlers::new().with_get(move || {
                Self::upgrade(&pump)
                    .map_or(InUse::NotInUse, |pump| pump.in_use())
                    .into()
            }),
        )?;

        let pump = self.downgrade();
        host.bind_handlers(
            service,
            Characteristic::ValveType,
            CharacteristicHandlers::new().with_get(move || {
                Self::upgrade(&pump)
                    .map_or(RECIRCULATION_PUMP, |pump| pump.valve_type())
                    .into()
            }),
        )?;

        Ok(())
    }

    fn downgrade(&self) -> Weak<PumpInner<H>> {
        Arc::downgrade(&self.inner)
    }

    fn upgrade(weak: &Weak<PumpInner<H>>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    /// Activates the pump.
    ///
    /// Any written value counts as an activation. Schedules the engagement
    /// and shutoff timers and returns immediately; their effect is only
    /// visible through later reads.
    pub fn activate(&self, value: &CharacteristicValue) -> Activation {
        let inner = &self.inner;
        inner.host.log_debug(&format!("Setting pump to {value}"));

        let mut pending = inner.pending_shutoffs.lock();
        pending.retain(|timer| !timer.is_finished());
        if inner.config.shutoff_policy == ShutoffPolicy::RestartOnActivate && !pending.is_empty() {
            tracing::debug!(
                accessory = %inner.accessory,
                cancelled = pending.len(),
                "Restarting shutoff window"
            );
            for timer in pending.drain(..) {
                timer.abort();
            }
        }

        let pump = self.clone();
        let engagement = TimerHandle::schedule(
            &inner.runtime,
            inner.config.engagement_delay,
            move || pump.engage(),
        );

        let pump = self.clone();
        let shutoff = TimerHandle::schedule(
            &inner.runtime,
            inner.config.shutoff_delay,
            move || pump.shut_off(),
        );
        pending.push(shutoff.abort_handle());

        tracing::trace!(
            accessory = %inner.accessory,
            engagement_ms = duration_ms(inner.config.engagement_delay),
            shutoff_ms = duration_ms(inner.config.shutoff_delay),
            "Scheduled pump cycle"
        );

        Activation {
            engagement,
            shutoff,
        }
    }

    /// Returns the Active state, logging the read.
    #[must_use]
    pub fn active(&self) -> Active {
        self.inner.host.log_debug("Checking if pump is active");
        self.inner.state.read().active()
    }

    /// Returns the `InUse` state, logging the read.
    #[must_use]
    pub fn in_use(&self) -> InUse {
        self.inner.host.log_debug("Checking if pump is in use");
        self.inner.state.read().in_use()
    }

    /// Returns the valve type, logging the read.
    ///
    /// Always [`RECIRCULATION_PUMP`]; the configurable label only affects the
    /// information service.
    #[must_use]
    pub fn valve_type(&self) -> &'static str {
        self.inner.host.log_debug("Getting Valve Type");
        RECIRCULATION_PUMP
    }

    fn engage(&self) {
        let at = self.inner.clock.now();
        self.update(|state| state.engage(at));
        tracing::debug!(accessory = %self.inner.accessory, last_run = %at, "Pump engaged");
    }

    fn shut_off(&self) {
        self.update(PumpState::shut_off);
        tracing::debug!(accessory = %self.inner.accessory, "Pump shut off");
    }

    fn update(&self, change: impl FnOnce(&mut PumpState)) {
        let mut state = self.inner.state.write();
        change(&mut state);
        self.inner.state_tx.send_replace(*state);
    }
}

impl<H: Host> PumpAccessory<H> {
    /// Returns a snapshot of the pump state.
    #[must_use]
    pub fn state(&self) -> PumpState {
        *self.inner.state.read()
    }

    /// Returns `true` while the pump is running.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.inner.state.read().is_on()
    }

    /// Returns the time the pump last engaged.
    #[must_use]
    pub fn last_run(&self) -> DateTime<Utc> {
        self.inner.state.read().last_run()
    }

    /// Subscribes to state changes.
    ///
    /// The receiver sees every engagement and shutoff, including redundant
    /// shutoffs of an already stopped pump.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<PumpState> {
        self.inner.state_tx.subscribe()
    }

    /// Returns the identifier of the accessory record.
    #[must_use]
    pub fn accessory_id(&self) -> AccessoryId {
        self.inner.accessory
    }

    /// Returns the valve service the handlers are bound on.
    #[must_use]
    pub fn service(&self) -> &ServiceHandle {
        &self.inner.service
    }

    /// Returns the pump configuration.
    #[must_use]
    pub fn config(&self) -> &PumpConfig {
        &self.inner.config
    }

    /// Returns the host the pump is bound to.
    #[must_use]
    pub fn host(&self) -> &Arc<H> {
        &self.inner.host
    }
}

impl<H: Host> Clone for PumpAccessory<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<H: Host> fmt::Debug for PumpAccessory<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PumpAccessory")
            .field("accessory", &self.inner.accessory)
            .field("service", &self.inner.service)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
