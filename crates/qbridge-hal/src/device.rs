//! Device records and the device catalog.

use std::fmt;
use std::str::FromStr;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{HalError, HalResult};
use crate::vendor::Vendor;

/// Availability of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Online,
    Offline,
    Retired,
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceStatus::Online => write!(f, "online"),
            DeviceStatus::Offline => write!(f, "offline"),
            DeviceStatus::Retired => write!(f, "retired"),
        }
    }
}

impl FromStr for DeviceStatus {
    type Err = HalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "online" => Ok(DeviceStatus::Online),
            "offline" => Ok(DeviceStatus::Offline),
            "retired" => Ok(DeviceStatus::Retired),
            _ => Err(HalError::Configuration(format!("Unknown device status: {s}"))),
        }
    }
}

/// A catalog entry, keyed by platform id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    /// Platform device id.
    pub id: String,
    /// Device id in the vendor's own SDK.
    pub obj_arg: Option<String>,
    pub vendor: Option<Vendor>,
    pub name: String,
    pub num_qubits: u32,
    pub status: DeviceStatus,
}

impl DeviceRecord {
    /// Vendor from the record, else inferred from the vendor device id.
    pub fn resolved_vendor(&self) -> Option<Vendor> {
        self.vendor
            .or_else(|| self.obj_arg.as_deref().and_then(Vendor::infer))
    }
}

/// A device as served by a vendor provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantumDevice {
    pub vendor: Vendor,
    pub vendor_device_id: String,
    pub name: String,
    pub num_qubits: u32,
    pub status: DeviceStatus,
}

/// In-memory device catalog with lookups by platform id and vendor device id.
#[derive(Debug, Clone, Default)]
pub struct DeviceCatalog {
    records: Vec<DeviceRecord>,
    by_id: FxHashMap<String, usize>,
    by_obj_arg: FxHashMap<String, usize>,
}

impl DeviceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record. Platform ids must be unique.
    pub fn insert(&mut self, record: DeviceRecord) -> HalResult<()> {
        if self.by_id.contains_key(&record.id) {
            return Err(HalError::Configuration(format!(
                "Duplicate device id: {}",
                record.id
            )));
        }
        debug!("Adding device to catalog: {}", record.id);
        let slot = self.records.len();
        self.by_id.insert(record.id.clone(), slot);
        if let Some(obj_arg) = &record.obj_arg {
            self.by_obj_arg.entry(obj_arg.clone()).or_insert(slot);
        }
        self.records.push(record);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&DeviceRecord> {
        self.by_id.get(id).map(|&i| &self.records[i])
    }

    /// First record with the given vendor device id.
    pub fn find_by_obj_arg(&self, obj_arg: &str) -> Option<&DeviceRecord> {
        self.by_obj_arg.get(obj_arg).map(|&i| &self.records[i])
    }

    /// Records in insertion order.
    pub fn records(&self) -> &[DeviceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
