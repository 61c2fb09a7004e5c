// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Deferred callbacks with an optional cancel handle.

use std::fmt;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::{AbortHandle, JoinHandle};

/// A callback scheduled to run once after a delay.
///
/// Dropping the handle does not cancel the timer; only [`cancel`](Self::cancel)
/// does. A timer whose delay has elapsed always runs its callback to
/// completion.
pub struct TimerHandle {
    delay: Duration,
    task: JoinHandle<()>,
}

impl TimerHandle {
    /// Schedules `callback` to run on `runtime` after `delay`.
    pub(crate) fn schedule<F>(runtime: &Handle, delay: Duration, callback: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let task = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            callback();
        });
        Self { delay, task }
    }

    /// Returns the delay the timer was scheduled with.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancels the timer if it has not fired yet.
    pub fn cancel(&self) {
        self.task.abort();
    }

    /// Returns `true` once the timer has fired or been cancelled.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Returns a handle that can cancel the timer without owning it.
    #[must_use]
    pub fn abort_handle(&self) -> AbortHandle {
        self.task.abort_handle()
    }

    /// Waits for the timer to finish.
    ///
    /// Returns `true` if the callback ran and `false` if the timer was
    /// cancelled first.
    pub async fn wait(self) -> bool {
        self.task.await.is_ok()
    }
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerHandle")
            .field("delay", &self.delay)
            .field("finished", &self.is_finished())
            .finish()
    }
}
