// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Simulated pump state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Active, InUse};

/// Running flag and last engagement time of the simulated pump.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use recirc_pump::PumpState;
/// use recirc_pump::types::{Active, InUse};
///
/// let state = PumpState::new(Utc::now());
/// assert!(!state.is_on());
/// assert_eq!(state.active(), Active::Inactive);
/// assert_eq!(state.in_use(), InUse::NotInUse);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PumpState {
    on: bool,
    last_run: DateTime<Utc>,
}

impl PumpState {
    /// Creates an idle state whose last run is `created_at`.
    #[must_use]
    pub fn new(created_at: DateTime<Utc>) -> Self {
        Self {
            on: false,
            last_run: created_at,
        }
    }

    /// Returns `true` while the pump is running.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Returns the time the pump last engaged.
    ///
    /// Before the first engagement this is the time the state was created.
    #[must_use]
    pub fn last_run(&self) -> DateTime<Utc> {
        self.last_run
    }

    /// Returns the state as reported on the Active characteristic.
    #[must_use]
    pub fn active(&self) -> Active {
        Active::from(self.on)
    }

    /// Returns the state as reported on the `InUse` characteristic.
    #[must_use]
    pub fn in_use(&self) -> InUse {
        InUse::from(self.on)
    }

    /// Marks the pump as running since `at`.
    pub(crate) fn engage(&mut self, at: DateTime<Utc>) {
        self.on = true;
        self.last_run = at;
    }

    /// Marks the pump as stopped. `last_run` is left as is.
    pub(crate) fn shut_off(&mut self) {
        self.on = false;
    }
}
