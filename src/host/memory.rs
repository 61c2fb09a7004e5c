// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory host implementation.

use std::collections::{HashMap, VecDeque};

use parking_lot::RwLock;

use crate::accessory::AccessoryId;
use crate::error::{Error, Result};

use super::{
    Characteristic, CharacteristicHandlers, CharacteristicValue, Host, ServiceHandle, ServiceKind,
};

/// Number of debug messages [`InMemoryHost`] keeps by default.
pub const DEFAULT_DEBUG_LOG_CAPACITY: usize = 256;

/// Stored value and bound handlers of one characteristic.
#[derive(Debug, Default)]
struct CharacteristicSlot {
    value: Option<CharacteristicValue>,
    handlers: CharacteristicHandlers,
}

/// A service and its characteristics.
#[derive(Debug)]
struct ServiceEntry {
    kind: ServiceKind,
    characteristics: HashMap<Characteristic, CharacteristicSlot>,
}

impl ServiceEntry {
    fn new(kind: ServiceKind) -> Self {
        Self {
            kind,
            characteristics: HashMap::new(),
        }
    }
}

/// A host that keeps accessories, services and characteristics in memory.
///
/// Accessories registered through [`register_accessory`](Self::register_accessory)
/// start with an accessory-information service, as on a real bridge.
/// [`read`](Self::read) and [`write`](Self::write) play the role of a client:
/// they dispatch to bound handlers, falling back to stored values.
///
/// # Thread Safety
///
/// All state sits behind `parking_lot::RwLock`s. Handlers are cloned out of
/// the registry before they are invoked, so a handler may call back into the
/// host without deadlocking.
///
/// # Debug Log
///
/// Messages passed to [`Host::log_debug`] are kept in a ring of
/// [`DEFAULT_DEBUG_LOG_CAPACITY`] entries; the oldest message is dropped once
/// it is full. Every handler read logs a line, so an unbounded log would grow
/// with client traffic.
///
/// # Examples
///
/// ```
/// use recirc_pump::host::{Characteristic, CharacteristicValue, Host, InMemoryHost, ServiceKind};
/// use recirc_pump::AccessoryId;
///
/// let host = InMemoryHost::new();
/// let id = AccessoryId::new();
/// host.register_accessory(id);
///
/// let info = host.service(id, ServiceKind::AccessoryInformation).unwrap();
/// host.set_characteristic(&info, Characteristic::Manufacturer, "Kyle".into()).unwrap();
///
/// assert_eq!(
///     host.read(&info, Characteristic::Manufacturer).unwrap(),
///     Some(CharacteristicValue::from("Kyle"))
/// );
/// ```
#[derive(Debug)]
pub struct InMemoryHost {
    accessories: RwLock<HashMap<AccessoryId, Vec<ServiceEntry>>>,
    debug_log: RwLock<VecDeque<String>>,
    debug_capacity: usize,
}

impl Default for InMemoryHost {
    fn default() -> Self {
        Self::with_debug_capacity(DEFAULT_DEBUG_LOG_CAPACITY)
    }
}

impl InMemoryHost {
    /// Creates a host with no accessories.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a host that keeps at most `capacity` debug messages.
    ///
    /// A capacity of zero disables capture; messages still go to `tracing`.
    #[must_use]
    pub fn with_debug_capacity(capacity: usize) -> Self {
        Self {
            accessories: RwLock::new(HashMap::new()),
            debug_log: RwLock::new(VecDeque::with_capacity(capacity)),
            debug_capacity: capacity,
        }
    }

    /// Registers an accessory with an accessory-information service.
    ///
    /// Registering an already known accessory leaves it untouched.
    pub fn register_accessory(&self, accessory: AccessoryId) {
        let mut accessories = self.accessories.write();
        accessories.entry(accessory).or_insert_with(|| {
            tracing::debug!(accessory = %accessory, "Registering accessory");
            vec![ServiceEntry::new(ServiceKind::AccessoryInformation)]
        });
    }

    /// Registers an accessory with no services at all.
    ///
    /// Useful to exercise accessories whose record is missing the
    /// information service.
    pub fn register_bare_accessory(&self, accessory: AccessoryId) {
        self.accessories.write().entry(accessory).or_default();
    }

    /// Appends a new service of `kind`, even if one already exists.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownAccessory` if the accessory is not registered.
    pub fn add_service(&self, accessory: AccessoryId, kind: ServiceKind) -> Result<ServiceHandle> {
        let mut accessories = self.accessories.write();
        let services = accessories
            .get_mut(&accessory)
            .ok_or(Error::UnknownAccessory(accessory))?;
        Ok(push_service(accessory, services, kind))
    }

    /// Returns the number of services of `kind` on an accessory.
    #[must_use]
    pub fn service_count(&self, accessory: AccessoryId, kind: ServiceKind) -> usize {
        self.accessories
            .read()
            .get(&accessory)
            .map_or(0, |services| {
                services.iter().filter(|service| service.kind == kind).count()
            })
    }

    /// Reads a characteristic the way a client would.
    ///
    /// Calls the bound read handler if there is one, otherwise returns the
    /// stored value. Returns `Ok(None)` for a characteristic that was never
    /// written or bound.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownService` if the service does not exist.
    pub fn read(
        &self,
        service: &ServiceHandle,
        key: Characteristic,
    ) -> Result<Option<CharacteristicValue>> {
        let (handler, stored) = self.with_service(service, |entry| {
            entry
                .characteristics
                .get(&key)
                .map_or((None, None), |slot| {
                    (slot.handlers.on_get.clone(), slot.value.clone())
                })
        })?;

        Ok(match handler {
            Some(get) => Some(get()),
            None => stored,
        })
    }

    /// Writes a characteristic the way a client would.
    ///
    /// Calls the bound write handler if there is one, otherwise stores the
    /// value.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownService` if the service does not exist.
    pub fn write(
        &self,
        service: &ServiceHandle,
        key: Characteristic,
        value: CharacteristicValue,
    ) -> Result<()> {
        let handler = self.with_service(service, |entry| {
            entry
                .characteristics
                .get(&key)
                .and_then(|slot| slot.handlers.on_set.clone())
        })?;

        match handler {
            Some(set) => set(value),
            None => self.set_characteristic(service, key, value)?,
        }
        Ok(())
    }

    /// Returns `true` if a read or write handler is bound to the characteristic.
    #[must_use]
    pub fn is_bound(&self, service: &ServiceHandle, key: Characteristic) -> bool {
        self.with_service(service, |entry| {
            entry.characteristics.get(&key).is_some_and(|slot| {
                slot.handlers.on_get.is_some() || slot.handlers.on_set.is_some()
            })
        })
        .unwrap_or(false)
    }

    /// Returns the retained messages passed to [`Host::log_debug`], oldest
    /// first.
    #[must_use]
    pub fn debug_messages(&self) -> Vec<String> {
        self.debug_log.read().iter().cloned().collect()
    }

    fn with_service<T>(
        &self,
        service: &ServiceHandle,
        f: impl FnOnce(&ServiceEntry) -> T,
    ) -> Result<T> {
        let accessories = self.accessories.read();
        find_service(&accessories, service)
            .map(f)
            .ok_or(Error::UnknownService(*service))
    }

    fn with_service_mut<T>(
        &self,
        service: &ServiceHandle,
        f: impl FnOnce(&mut ServiceEntry) -> T,
    ) -> Result<T> {
        let mut accessories = self.accessories.write();
        accessories
            .get_mut(&service.accessory())
            .and_then(|services| {
                services
                    .iter_mut()
                    .filter(|entry| entry.kind == service.kind())
                    .nth(service.index())
            })
            .map(f)
            .ok_or(Error::UnknownService(*service))
    }
}

impl Host for InMemoryHost {
    fn service(&self, accessory: AccessoryId, kind: ServiceKind) -> Option<ServiceHandle> {
        let accessories = self.accessories.read();
        let services = accessories.get(&accessory)?;
        services
            .iter()
            .any(|entry| entry.kind == kind)
            .then(|| ServiceHandle::new(accessory, kind, 0))
    }

    fn get_or_create_service(
        &self,
        accessory: AccessoryId,
        kind: ServiceKind,
    ) -> Result<ServiceHandle> {
        let mut accessories = self.accessories.write();
        let services = accessories
            .get_mut(&accessory)
            .ok_or(Error::UnknownAccessory(accessory))?;
        if services.iter().any(|entry| entry.kind == kind) {
            Ok(ServiceHandle::new(accessory, kind, 0))
        } else {
            Ok(push_service(accessory, services, kind))
        }
    }

    fn set_characteristic(
        &self,
        service: &ServiceHandle,
        key: Characteristic,
        value: CharacteristicValue,
    ) -> Result<()> {
        self.with_service_mut(service, |entry| {
            entry.characteristics.entry(key).or_default().value = Some(value);
        })
    }

    fn bind_handlers(
        &self,
        service: &ServiceHandle,
        key: Characteristic,
        handlers: CharacteristicHandlers,
    ) -> Result<()> {
        self.with_service_mut(service, |entry| {
            entry
                .characteristics
                .entry(key)
                .or_default()
                .handlers
                .merge(handlers);
        })
    }

    fn log_debug(&self, message: &str) {
        tracing::debug!(target: "recirc_pump::host", "{message}");
        if self.debug_capacity == 0 {
            return;
        }
        let mut log = self.debug_log.write();
        if log.len() == self.debug_capacity {
            log.pop_front();
        }
        log.push_back(message.to_string());
    }
}

fn find_service<'a>(
    accessories: &'a HashMap<AccessoryId, Vec<ServiceEntry>>,
    service: &ServiceHandle,
) -> Option<&'a ServiceEntry> {
    accessories
        .get(&service.accessory())?
        .iter()
        .filter(|entry| entry.kind == service.kind())
        .nth(service.index())
}

fn push_service(
    accessory: AccessoryId,
    services: &mut Vec<ServiceEntry>,
    kind: ServiceKind,
) -> ServiceHandle {
    let index = services.iter().filter(|entry| entry.kind == kind).count();
    tracing::debug!(accessory = %accessory, kind = %kind, index, "Adding service");
    services.push(ServiceEntry::new(kind));
    ServiceHandle::new(accessory, kind, index)
}
