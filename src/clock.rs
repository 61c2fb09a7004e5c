// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall-clock sources used to stamp pump runs.

use chrono::{DateTime, TimeDelta, Utc};
use tokio::time::Instant;

/// Source of wall-clock timestamps.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A wall clock driven by tokio's clock.
///
/// The wall time is captured once at creation; afterwards the clock advances
/// with [`tokio::time::Instant`]. Under a paused runtime
/// (`tokio::time::pause`) it therefore follows simulated time, which lets
/// timestamps be compared exactly against timer deadlines.
///
/// # Examples
///
/// ```
/// use recirc_pump::clock::{Clock, RuntimeClock};
///
/// let clock = RuntimeClock::new();
/// assert!(clock.now() >= clock.anchor());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RuntimeClock {
    wall: DateTime<Utc>,
    instant: Instant,
}

impl RuntimeClock {
    /// Creates a clock anchored at the current system time.
    #[must_use]
    pub fn new() -> Self {
        Self::anchored_at(Utc::now())
    }

    /// Creates a clock that reads `wall` right now.
    #[must_use]
    pub fn anchored_at(wall: DateTime<Utc>) -> Self {
        Self {
            wall,
            instant: Instant::now(),
        }
    }

    /// Returns the wall time captured at creation.
    #[must_use]
    pub fn anchor(&self) -> DateTime<Utc> {
        self.wall
    }
}

impl Default for RuntimeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for RuntimeClock {
    fn now(&self) -> DateTime<Utc> {
        TimeDelta::from_std(self.instant.elapsed())
            .ok()
            .and_then(|elapsed| self.wall.checked_add_signed(elapsed))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}
