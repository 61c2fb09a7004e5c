// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Accessory identity and context.
//!
//! The host keeps an accessory record per device. The pump needs two things
//! from it: the identifier used to address the record's services, and the
//! device context that carries the display name.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ConfigError, Result};

/// Key of an accessory record on the host.
///
/// Service handles and log fields carry the full UUID, so an identifier read
/// from a log line can be matched against the host's record as is.
///
/// ```
/// use recirc_pump::host::{Host, InMemoryHost, ServiceKind};
/// use recirc_pump::AccessoryId;
///
/// let host = InMemoryHost::new();
/// let id = AccessoryId::new();
/// host.register_accessory(id);
/// assert!(host.service(id, ServiceKind::AccessoryInformation).is_some());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessoryId(Uuid);

impl AccessoryId {
    /// Generates a random identifier for a new accessory record.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps the UUID of a record the host already persisted.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for AccessoryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccessoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for AccessoryId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Per-device context stored alongside an accessory record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceContext {
    /// Name shown to users for the valve service.
    #[serde(rename = "DisplayName")]
    pub display_name: String,
}

impl DeviceContext {
    /// Creates a context with the given display name.
    #[must_use]
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
        }
    }
}

/// An accessory record as handed over by the host.
///
/// # Examples
///
/// ```
/// use recirc_pump::AccessoryRecord;
///
/// let record = AccessoryRecord::from_context_json(
///     r#"{ "device": { "DisplayName": "Hot Water Loop" } }"#,
/// ).unwrap();
///
/// assert_eq!(record.display_name(), "Hot Water Loop");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessoryRecord {
    id: AccessoryId,
    device: DeviceContext,
}

/// Shape of the JSON context a host caches for an accessory.
#[derive(Deserialize)]
struct CachedContext {
    device: DeviceContext,
}

impl AccessoryRecord {
    /// Creates a record with a fresh identifier.
    #[must_use]
    pub fn new(display_name: impl Into<String>) -> Self {
        Self::with_id(AccessoryId::new(), DeviceContext::new(display_name))
    }

    /// Creates a record for an existing identifier.
    #[must_use]
    pub fn with_id(id: AccessoryId, device: DeviceContext) -> Self {
        Self { id, device }
    }

    /// Creates a record with a fresh identifier from a cached JSON context
    /// of the form `{"device": {"DisplayName": "..."}}`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the JSON does not match.
    pub fn from_context_json(json: &str) -> Result<Self> {
        let context: CachedContext = serde_json::from_str(json).map_err(ConfigError::from)?;
        Ok(Self::with_id(AccessoryId::new(), context.device))
    }

    /// Returns the record identifier.
    #[must_use]
    pub fn id(&self) -> AccessoryId {
        self.id
    }

    /// Returns the device context.
    #[must_use]
    pub fn device(&self) -> &DeviceContext {
        &self.device
    }

    /// Returns the display name from the device context.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.device.display_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn new_creates_unique_ids() {
        assert_ne!(AccessoryId::new(), AccessoryId::new());
    }

    #[test]
    fn debug_shows_full_uuid() {
        let id = AccessoryId::new();
        assert_eq!(format!("{id:?}"), format!("AccessoryId({id})"));
    }

    #[test]
    fn display_format() {
        let uuid = Uuid::parse_str("a1a2a3a4-b1b2-c1c2-d1d2-d3d4d5d6d7d8").unwrap();
        assert_eq!(
            AccessoryId::from_uuid(uuid).to_string(),
            "a1a2a3a4-b1b2-c1c2-d1d2-d3d4d5d6d7d8"
        );
    }

    #[test]
    fn context_uses_display_name_key() {
        let context: DeviceContext =
            serde_json::from_value(serde_json::json!({ "DisplayName": "Pump" })).unwrap();
        assert_eq!(context, DeviceContext::new("Pump"));
    }

    #[test]
    fn record_from_context_json() {
        let record =
            AccessoryRecord::from_context_json(r#"{"device":{"DisplayName":"Loop"}}"#).unwrap();
        assert_eq!(record.display_name(), "Loop");
    }

    #[test]
    fn record_from_invalid_json() {
        let result = AccessoryRecord::from_context_json(r#"{"device":{}}"#);
        assert!(matches!(result, Err(Error::Config(ConfigError::Json(_)))));
    }

    #[test]
    fn with_id_keeps_id() {
        let id = AccessoryId::new();
        let record = AccessoryRecord::with_id(id, DeviceContext::new("Pump"));
        assert_eq!(record.id(), id);
        assert_eq!(record.device().display_name, "Pump");
    }
}
