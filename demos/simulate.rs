// SPDX-License-Identifier: MPL-2.0

//! Run cycle simulation example.
//!
//! Wires a pump into the in-memory host with shortened delays, activates it
//! the way a client would, and prints what a client reads over time.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example simulate
//! ```

use std::sync::Arc;
use std::time::Duration;

use recirc_pump::host::{Characteristic, CharacteristicValue, InMemoryHost};
use recirc_pump::{AccessoryRecord, PumpAccessory, PumpConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let host = Arc::new(InMemoryHost::new());
    let record = AccessoryRecord::new("Recirculation Pump");
    host.register_accessory(record.id());

    let config = PumpConfig::default()
        .with_engagement_delay(Duration::from_millis(500))
        .with_shutoff_delay(Duration::from_secs(3));
    let pump = PumpAccessory::builder(Arc::clone(&host), &record)
        .with_config(config)
        .build()?;

    println!("Valve type: {:?}", host.read(pump.service(), Characteristic::ValveType)?);
    print_state(&host, &pump, "before activation")?;

    host.write(pump.service(), Characteristic::Active, CharacteristicValue::UInt8(1))?;
    print_state(&host, &pump, "just activated")?;

    tokio::time::sleep(Duration::from_millis(600)).await;
    print_state(&host, &pump, "after engagement")?;
    println!("Last run: {}", pump.last_run());

    tokio::time::sleep(Duration::from_secs(3)).await;
    print_state(&host, &pump, "after shutoff")?;

    Ok(())
}

fn print_state(
    host: &InMemoryHost,
    pump: &PumpAccessory<InMemoryHost>,
    label: &str,
) -> recirc_pump::Result<()> {
    let active = host.read(pump.service(), Characteristic::Active)?;
    let in_use = host.read(pump.service(), Characteristic::InUse)?;
    println!("{label:>20}: active={active:?} in_use={in_use:?}");
    Ok(())
}
