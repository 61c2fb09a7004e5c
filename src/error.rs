// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `recirc_pump` library.
//!
//! Pump operations themselves cannot fail: activation and state queries only
//! touch in-memory state and schedule timers. Errors surface while wiring the
//! accessory into its host and while loading configuration.

use thiserror::Error;

use crate::accessory::AccessoryId;
use crate::host::{ServiceHandle, ServiceKind};

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// The accessory record lacks a service the host must always provide.
    #[error("accessory has no {0} service")]
    MissingService(ServiceKind),

    /// The host has no record for the given accessory.
    #[error("unknown accessory {0}")]
    UnknownAccessory(AccessoryId),

    /// The host does not know the given service handle.
    #[error("unknown service {0}")]
    UnknownService(ServiceHandle),

    /// The accessory was constructed outside of a tokio runtime.
    #[error("no tokio runtime available to schedule pump timers")]
    NoRuntime,

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors related to loading and validating [`PumpConfig`](crate::PumpConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A delay was configured as zero.
    #[error("{0} must be greater than zero")]
    ZeroDelay(&'static str),

    /// The shutoff delay does not outlast the engagement delay.
    #[error("shutoff delay ({shutoff_ms} ms) must exceed engagement delay ({engagement_ms} ms)")]
    ShutoffBeforeEngagement {
        /// Configured engagement delay in milliseconds.
        engagement_ms: u64,
        /// Configured shutoff delay in milliseconds.
        shutoff_ms: u64,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
