// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the pump run cycle, driven through the in-memory host.
//!
//! All tests run on a paused tokio clock so timer deadlines are exact.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use recirc_pump::clock::RuntimeClock;
use recirc_pump::host::{Characteristic, CharacteristicValue, InMemoryHost, ServiceHandle};
use recirc_pump::{AccessoryRecord, PumpAccessory, PumpConfig};
use tokio::time::sleep;

const ACTIVE: CharacteristicValue = CharacteristicValue::UInt8(1);
const INACTIVE: CharacteristicValue = CharacteristicValue::UInt8(0);
const IN_USE: CharacteristicValue = CharacteristicValue::UInt8(1);
const NOT_IN_USE: CharacteristicValue = CharacteristicValue::UInt8(0);

fn anchor() -> DateTime<Utc> {
    DateTime::from_timestamp(1_750_000_000, 0).unwrap()
}

/// Builds a pump whose clock reads `anchor()` at paused time zero.
fn setup() -> (Arc<InMemoryHost>, PumpAccessory<InMemoryHost>) {
    let host = Arc::new(InMemoryHost::new());
    let record = AccessoryRecord::new("Recirculation Pump");
    host.register_accessory(record.id());

    let pump = PumpAccessory::builder(Arc::clone(&host), &record)
        .with_config(PumpConfig::default())
        .with_clock(Arc::new(RuntimeClock::anchored_at(anchor())))
        .build()
        .unwrap();
    (host, pump)
}

fn read(host: &InMemoryHost, service: &ServiceHandle, key: Characteristic) -> CharacteristicValue {
    host.read(service, key).unwrap().unwrap()
}

fn activate(host: &InMemoryHost, service: &ServiceHandle) {
    host.write(service, Characteristic::Active, ACTIVE).unwrap();
}

fn assert_running(host: &InMemoryHost, service: &ServiceHandle) {
    assert_eq!(read(host, service, Characteristic::Active), ACTIVE);
    assert_eq!(read(host, service, Characteristic::InUse), IN_USE);
}

fn assert_idle(host: &InMemoryHost, service: &ServiceHandle) {
    assert_eq!(read(host, service, Characteristic::Active), INACTIVE);
    assert_eq!(read(host, service, Characteristic::InUse), NOT_IN_USE);
}

// ============================================================================
// Single Activation
// ============================================================================

mod single_activation {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn fresh_pump_is_idle() {
        let (host, pump) = setup();
        assert_idle(&host, pump.service());
        assert_eq!(pump.last_run(), anchor());
    }

    #[tokio::test(start_paused = true)]
    async fn idle_until_engagement_delay() {
        let (host, pump) = setup();
        activate(&host, pump.service());
        assert_idle(&host, pump.service());

        sleep(Duration::from_millis(999)).await;
        assert_idle(&host, pump.service());

        sleep(Duration::from_millis(2)).await;
        assert_running(&host, pump.service());
    }

    #[tokio::test(start_paused = true)]
    async fn shuts_off_after_shutoff_delay() {
        let (host, pump) = setup();
        activate(&host, pump.service());

        sleep(Duration::from_millis(119_999)).await;
        assert_running(&host, pump.service());

        sleep(Duration::from_millis(2)).await;
        assert_idle(&host, pump.service());
    }

    #[tokio::test(start_paused = true)]
    async fn last_run_is_engagement_time() {
        let (host, pump) = setup();
        sleep(Duration::from_millis(250)).await;
        activate(&host, pump.service());

        sleep(Duration::from_millis(500)).await;
        assert_eq!(pump.last_run(), anchor());

        sleep(Duration::from_millis(600)).await;
        assert!(pump.is_on());
        assert_eq!(pump.last_run(), anchor() + TimeDelta::milliseconds(1250));
    }

    #[tokio::test(start_paused = true)]
    async fn last_run_survives_shutoff() {
        let (host, pump) = setup();
        activate(&host, pump.service());

        sleep(Duration::from_millis(121_000)).await;
        assert!(!pump.is_on());
        assert_eq!(pump.last_run(), anchor() + TimeDelta::milliseconds(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn written_value_is_ignored() {
        let (host, pump) = setup();
        host.write(pump.service(), Characteristic::Active, INACTIVE)
            .unwrap();

        sleep(Duration::from_millis(1001)).await;
        assert_running(&host, pump.service());
    }

    #[tokio::test(start_paused = true)]
    async fn valve_type_is_constant() {
        let (host, pump) = setup();
        let label = CharacteristicValue::from("Recirculation Pump");
        assert_eq!(read(&host, pump.service(), Characteristic::ValveType), label);

        activate(&host, pump.service());
        sleep(Duration::from_millis(1001)).await;
        assert_eq!(read(&host, pump.service(), Characteristic::ValveType), label);

        sleep(Duration::from_millis(120_000)).await;
        assert_eq!(read(&host, pump.service(), Characteristic::ValveType), label);
    }
}

// ============================================================================
// Overlapping Activations
// ============================================================================

mod overlapping_activations {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn first_shutoff_wins() {
        let (host, pump) = setup();
        activate(&host, pump.service());
        sleep(Duration::from_millis(500)).await;
        activate(&host, pump.service());

        sleep(Duration::from_millis(119_499)).await;
        assert_running(&host, pump.service());

        // T = 120001: the first activation's shutoff has fired
        sleep(Duration::from_millis(2)).await;
        assert_idle(&host, pump.service());

        // T = 120499: the second shutoff is still pending, pump stays off
        sleep(Duration::from_millis(498)).await;
        assert_idle(&host, pump.service());

        sleep(Duration::from_millis(2)).await;
        assert_idle(&host, pump.service());
    }

    #[tokio::test(start_paused = true)]
    async fn reactivation_restamps_last_run() {
        let (host, pump) = setup();
        activate(&host, pump.service());
        sleep(Duration::from_millis(5000)).await;
        assert_eq!(pump.last_run(), anchor() + TimeDelta::milliseconds(1000));

        activate(&host, pump.service());
        sleep(Duration::from_millis(1001)).await;
        assert_eq!(pump.last_run(), anchor() + TimeDelta::milliseconds(6000));
    }

    #[tokio::test(start_paused = true)]
    async fn stale_shutoff_clears_newer_run() {
        let (host, pump) = setup();
        activate(&host, pump.service());

        // Re-activate late in the first window; the new run is cut short
        sleep(Duration::from_millis(110_000)).await;
        activate(&host, pump.service());
        sleep(Duration::from_millis(1001)).await;
        assert!(pump.is_on());

        sleep(Duration::from_millis(9000)).await;
        assert!(!pump.is_on());
    }
}

// ============================================================================
// Logging
// ============================================================================

mod logging {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn reads_and_writes_are_logged() {
        let (host, pump) = setup();
        read(&host, pump.service(), Characteristic::Active);
        read(&host, pump.service(), Characteristic::InUse);
        read(&host, pump.service(), Characteristic::ValveType);
        activate(&host, pump.service());

        assert_eq!(
            host.debug_messages(),
            vec![
                "Checking if pump is active".to_string(),
                "Checking if pump is in use".to_string(),
                "Getting Valve Type".to_string(),
                "Setting pump to 1".to_string(),
            ]
        );
    }
}
