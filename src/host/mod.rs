// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Interface to the accessory-hosting framework.
//!
//! The pump never talks to clients directly. It asks its [`Host`] for
//! services, writes identification metadata, and binds read/write handlers
//! that the host invokes when a client touches a characteristic.
//!
//! [`InMemoryHost`] is a complete host over an in-memory registry. It is what
//! the tests drive, and it is usable by embedders that bridge the accessory
//! to their own transport.
//!
//! # Examples
//!
//! ```
//! use recirc_pump::host::{Host, InMemoryHost, ServiceKind};
//! use recirc_pump::AccessoryId;
//!
//! let host = InMemoryHost::new();
//! let id = AccessoryId::new();
//! host.register_accessory(id);
//!
//! let valve = host.get_or_create_service(id, ServiceKind::Valve)?;
//! assert_eq!(host.get_or_create_service(id, ServiceKind::Valve)?, valve);
//! # Ok::<(), recirc_pump::Error>(())
//! ```

mod characteristic;
mod memory;

pub use characteristic::{
    Characteristic, CharacteristicHandlers, CharacteristicValue, GetHandler, SetHandler,
};
pub use memory::{DEFAULT_DEBUG_LOG_CAPACITY, InMemoryHost};

use std::fmt;

use crate::accessory::AccessoryId;
use crate::error::Result;

/// Capability kind of a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ServiceKind {
    /// Identification metadata; present on every accessory.
    AccessoryInformation,
    /// A water valve.
    Valve,
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Reference to a service owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ServiceHandle {
    accessory: AccessoryId,
    kind: ServiceKind,
    index: usize,
}

impl ServiceHandle {
    /// Creates a handle for the `index`-th service of `kind` on an accessory.
    #[must_use]
    pub fn new(accessory: AccessoryId, kind: ServiceKind, index: usize) -> Self {
        Self {
            accessory,
            kind,
            index,
        }
    }

    /// Returns the owning accessory.
    #[must_use]
    pub fn accessory(&self) -> AccessoryId {
        self.accessory
    }

    /// Returns the service kind.
    #[must_use]
    pub fn kind(&self) -> ServiceKind {
        self.kind
    }

    /// Returns the position of this service among services of the same kind.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for ServiceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]@{}", self.kind, self.index, self.accessory)
    }
}

/// Capabilities the pump consumes from its hosting framework.
///
/// Implementations must be shareable across the runtime's worker threads
/// because bound handlers and timers call back into the host.
pub trait Host: Send + Sync {
    /// Looks up an existing service without creating one.
    fn service(&self, accessory: AccessoryId, kind: ServiceKind) -> Option<ServiceHandle>;

    /// Returns the first service of `kind`, creating it if the accessory has
    /// none. Repeated calls return the same handle.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownAccessory` if the host has no record for
    /// `accessory`. Implementations must not register it implicitly.
    fn get_or_create_service(
        &self,
        accessory: AccessoryId,
        kind: ServiceKind,
    ) -> Result<ServiceHandle>;

    /// Writes a metadata value on a service.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownService` if the handle does not refer to a
    /// service the host knows.
    fn set_characteristic(
        &self,
        service: &ServiceHandle,
        key: Characteristic,
        value: CharacteristicValue,
    ) -> Result<()>;

    /// Binds read/write handlers to a characteristic of a service.
    ///
    /// Handlers present in `handlers` replace any previously bound ones.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownService` if the handle does not refer to a
    /// service the host knows.
    fn bind_handlers(
        &self,
        service: &ServiceHandle,
        key: Characteristic,
        handlers: CharacteristicHandlers,
    ) -> Result<()>;

    /// Emits a diagnostic message.
    fn log_debug(&self, message: &str) {
        tracing::debug!(target: "recirc_pump::host", "{message}");
    }
}
