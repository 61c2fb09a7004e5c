// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types reported by the pump accessory.

mod state;

pub use state::{Active, InUse};

/// Valve subtype label reported by the pump.
pub const RECIRCULATION_PUMP: &str = "Recirculation Pump";
