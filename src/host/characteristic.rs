// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Characteristic keys, values and handler bundles.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Characteristics the pump accessory reads, writes or binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Characteristic {
    /// Display name of a service.
    Name,
    /// Manufacturer identification.
    Manufacturer,
    /// Model identification.
    Model,
    /// Serial number identification.
    SerialNumber,
    /// Valve subtype.
    ValveType,
    /// Commanded on/off state of a valve.
    Active,
    /// Whether a valve is currently operating.
    InUse,
}

impl fmt::Display for Characteristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A value carried by a characteristic.
///
/// Hosts deliver whatever a client wrote, so the set of variants is kept
/// loose; the accessory only ever produces `UInt8` state values and
/// `String` labels.
///
/// # Examples
///
/// ```
/// use recirc_pump::host::CharacteristicValue;
///
/// let label = CharacteristicValue::from("Recirculation Pump");
/// assert_eq!(label.as_str(), Some("Recirculation Pump"));
/// assert_eq!(CharacteristicValue::UInt8(1).to_string(), "1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CharacteristicValue {
    /// Boolean value.
    Bool(bool),
    /// Unsigned 8-bit value (enumerated states).
    UInt8(u8),
    /// String value.
    String(String),
}

impl CharacteristicValue {
    /// Returns the string payload, if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the numeric payload, if this is a `UInt8` value.
    #[must_use]
    pub fn as_u8(&self) -> Option<u8> {
        match self {
            Self::UInt8(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for CharacteristicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::UInt8(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for CharacteristicValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<u8> for CharacteristicValue {
    fn from(value: u8) -> Self {
        Self::UInt8(value)
    }
}

impl From<&str> for CharacteristicValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for CharacteristicValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// Type alias for read handlers.
pub type GetHandler = Arc<dyn Fn() -> CharacteristicValue + Send + Sync>;

/// Type alias for write handlers.
pub type SetHandler = Arc<dyn Fn(CharacteristicValue) + Send + Sync>;

/// Read and write callables bound to a single characteristic.
///
/// The host invokes `on_get` when a client reads the characteristic and
/// `on_set` when a client writes it. Either may be absent.
///
/// # Examples
///
/// ```
/// use recirc_pump::host::{CharacteristicHandlers, CharacteristicValue};
///
/// let handlers = CharacteristicHandlers::new()
///     .with_get(|| CharacteristicValue::UInt8(0))
///     .with_set(|value| println!("written: {value}"));
///
/// assert!(handlers.on_get.is_some());
/// assert!(handlers.on_set.is_some());
/// ```
#[derive(Clone, Default)]
pub struct CharacteristicHandlers {
    /// Called on external reads.
    pub on_get: Option<GetHandler>,
    /// Called on external writes.
    pub on_set: Option<SetHandler>,
}

impl CharacteristicHandlers {
    /// Creates an empty handler bundle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the read handler.
    #[must_use]
    pub fn with_get<F>(mut self, handler: F) -> Self
    where
        F: Fn() -> CharacteristicValue + Send + Sync + 'static,
    {
        self.on_get = Some(Arc::new(handler));
        self
    }

    /// Sets the write handler.
    #[must_use]
    pub fn with_set<F>(mut self, handler: F) -> Self
    where
        F: Fn(CharacteristicValue) + Send + Sync + 'static,
    {
        self.on_set = Some(Arc::new(handler));
        self
    }

    /// Overlays the handlers present in `other` onto `self`.
    pub(crate) fn merge(&mut self, other: Self) {
        if other.on_get.is_some() {
            self.on_get = other.on_get;
        }
        if other.on_set.is_some() {
            self.on_set = other.on_set;
        }
    }
}

impl fmt::Debug for CharacteristicHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CharacteristicHandlers")
            .field("on_get", &self.on_get.is_some())
            .field("on_set", &self.on_set.is_some())
            .finish()
    }
}
