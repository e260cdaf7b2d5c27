//! Devices and device command implementations.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use qbridge_hal::{DeviceStatus, QuantumDevice};

use super::common::load_provider;

/// List devices of every enabled vendor.
pub fn list(config: Option<&Path>) -> Result<()> {
    let provider = load_provider(config)?;
    let devices = provider.get_devices();

    if devices.is_empty() {
        println!("No devices configured.");
        return Ok(());
    }

    println!("{} Available devices:\n", style("qbridge").cyan().bold());
    for device in &devices {
        print_device(device);
    }
    Ok(())
}

/// Resolve a platform device id and print the vendor device.
pub fn resolve(id: &str, config: Option<&Path>) -> Result<()> {
    let provider = load_provider(config)?;
    let device = provider
        .get_device(id)
        .with_context(|| format!("Failed to resolve device '{id}'"))?;
    print_device(&device);
    Ok(())
}

fn print_device(device: &QuantumDevice) {
    let bullet = match device.status {
        DeviceStatus::Online => style("●").green(),
        DeviceStatus::Offline => style("○").yellow(),
        DeviceStatus::Retired => style("○").red(),
    };
    println!(
        "  {} {} ({})",
        bullet,
        style(&device.name).bold(),
        device.vendor
    );
    println!("    Device id: {}", device.vendor_device_id);
    println!("    Qubits: {}", device.num_qubits);
    println!("    Status: {}", device.status);
    println!();
}
