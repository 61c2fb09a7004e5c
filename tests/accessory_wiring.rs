// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for wiring the pump into its host.

use std::sync::Arc;

use recirc_pump::host::{
    Characteristic, CharacteristicValue, Host, InMemoryHost, ServiceKind,
};
use recirc_pump::{AccessoryRecord, Error, PumpAccessory, PumpConfig};

fn registered(display_name: &str) -> (Arc<InMemoryHost>, AccessoryRecord) {
    let host = Arc::new(InMemoryHost::new());
    let record = AccessoryRecord::new(display_name);
    host.register_accessory(record.id());
    (host, record)
}

// ============================================================================
// Metadata
// ============================================================================

mod metadata {
    use super::*;

    #[tokio::test]
    async fn information_service_is_populated() {
        let (host, record) = registered("Pump");
        PumpAccessory::new_with_defaults(Arc::clone(&host), &record).unwrap();

        let info = host
            .service(record.id(), ServiceKind::AccessoryInformation)
            .unwrap();
        let expected = [
            (Characteristic::Manufacturer, "Kyle"),
            (Characteristic::Model, "Raspberry-Pi-Pico-2-W"),
            (Characteristic::SerialNumber, "0001"),
            (Characteristic::ValveType, "Recirculation Pump"),
        ];
        for (key, value) in expected {
            assert_eq!(
                host.read(&info, key).unwrap(),
                Some(CharacteristicValue::from(value)),
                "{key}"
            );
        }
    }

    #[tokio::test]
    async fn custom_metadata() {
        let (host, record) = registered("Pump");
        let config = PumpConfig::default()
            .with_manufacturer("Acme")
            .with_serial_number("0042");
        PumpAccessory::builder(Arc::clone(&host), &record)
            .with_config(config)
            .build()
            .unwrap();

        let info = host
            .service(record.id(), ServiceKind::AccessoryInformation)
            .unwrap();
        assert_eq!(
            host.read(&info, Characteristic::Manufacturer).unwrap(),
            Some(CharacteristicValue::from("Acme"))
        );
        assert_eq!(
            host.read(&info, Characteristic::SerialNumber).unwrap(),
            Some(CharacteristicValue::from("0042"))
        );
    }

    #[tokio::test]
    async fn valve_name_comes_from_context() {
        let host = Arc::new(InMemoryHost::new());
        let record =
            AccessoryRecord::from_context_json(r#"{"device":{"DisplayName":"Hot Water Loop"}}"#)
                .unwrap();
        host.register_accessory(record.id());

        let pump = PumpAccessory::new_with_defaults(Arc::clone(&host), &record).unwrap();
        assert_eq!(
            host.read(pump.service(), Characteristic::Name).unwrap(),
            Some(CharacteristicValue::from("Hot Water Loop"))
        );
    }
}

// ============================================================================
// Service Acquisition
// ============================================================================

mod service_acquisition {
    use super::*;

    #[tokio::test]
    async fn creates_valve_service() {
        let (host, record) = registered("Pump");
        assert_eq!(host.service_count(record.id(), ServiceKind::Valve), 0);

        let pump = PumpAccessory::new_with_defaults(Arc::clone(&host), &record).unwrap();
        assert_eq!(host.service_count(record.id(), ServiceKind::Valve), 1);
        assert_eq!(pump.service().kind(), ServiceKind::Valve);
        assert_eq!(pump.accessory_id(), record.id());
    }

    #[tokio::test]
    async fn reuses_existing_valve_service() {
        let (host, record) = registered("Pump");
        let existing = host
            .get_or_create_service(record.id(), ServiceKind::Valve)
            .unwrap();

        let pump = PumpAccessory::new_with_defaults(Arc::clone(&host), &record).unwrap();
        assert_eq!(pump.service(), &existing);
        assert_eq!(host.service_count(record.id(), ServiceKind::Valve), 1);
    }

    #[tokio::test]
    async fn repeated_construction_keeps_one_service() {
        let (host, record) = registered("Pump");
        for _ in 0..3 {
            PumpAccessory::new_with_defaults(Arc::clone(&host), &record).unwrap();
        }
        assert_eq!(host.service_count(record.id(), ServiceKind::Valve), 1);
    }

    #[tokio::test]
    async fn handlers_are_bound() {
        let (host, record) = registered("Pump");
        let pump = PumpAccessory::new_with_defaults(Arc::clone(&host), &record).unwrap();

        for key in [
            Characteristic::Active,
            Characteristic::InUse,
            Characteristic::ValveType,
        ] {
            assert!(host.is_bound(pump.service(), key), "{key}");
        }
        assert!(!host.is_bound(pump.service(), Characteristic::Name));
    }
}

// ============================================================================
// Construction Failures
// ============================================================================

mod construction_failures {
    use super::*;

    #[tokio::test]
    async fn missing_information_service() {
        let host = Arc::new(InMemoryHost::new());
        let record = AccessoryRecord::new("Pump");
        host.register_bare_accessory(record.id());

        let result = PumpAccessory::new_with_defaults(host, &record);
        assert!(matches!(
            result,
            Err(Error::MissingService(ServiceKind::AccessoryInformation))
        ));
    }

    #[tokio::test]
    async fn unregistered_accessory() {
        let host = Arc::new(InMemoryHost::new());
        let record = AccessoryRecord::new("Pump");

        let result = PumpAccessory::new_with_defaults(host, &record);
        assert!(matches!(result, Err(Error::MissingService(_))));
    }

    #[test]
    fn outside_runtime() {
        let (host, record) = registered("Pump");
        let result = PumpAccessory::new_with_defaults(host, &record);
        assert!(matches!(result, Err(Error::NoRuntime)));
    }
}
