//! Vendor providers and device dispatch.
//!
//! [`QuantumProvider`] resolves platform device ids through the catalog and
//! hands each lookup to the provider of the device's vendor. Vendor providers
//! form a closed set, see [`VendorProvider`].

use rustc_hash::FxHashMap;
use tracing::{debug, instrument};

use crate::config::ProviderConfig;
use crate::device::{DeviceCatalog, QuantumDevice};
use crate::error::{HalError, HalResult};
use crate::vendor::Vendor;

/// Device lookup offered by a vendor.
pub trait DeviceProvider {
    fn vendor(&self) -> Vendor;

    /// All devices this provider serves.
    fn get_devices(&self) -> Vec<QuantumDevice>;

    /// A device by its vendor device id.
    fn get_device(&self, vendor_device_id: &str) -> HalResult<QuantumDevice>;
}

/// Devices of one vendor taken from the catalog.
#[derive(Debug, Clone, Default)]
struct VendorDevices {
    devices: Vec<QuantumDevice>,
}

impl VendorDevices {
    fn from_catalog(catalog: &DeviceCatalog, vendor: Vendor) -> Self {
        let devices = catalog
            .records()
            .iter()
            .filter(|r| r.resolved_vendor() == Some(vendor))
            .filter_map(|r| {
                let obj_arg = r.obj_arg.as_ref()?;
                Some(QuantumDevice {
                    vendor,
                    vendor_device_id: obj_arg.clone(),
                    name: r.name.clone(),
                    num_qubits: r.num_qubits,
                    status: r.status,
                })
            })
            .collect();
        Self { devices }
    }

    fn get(&self, vendor_device_id: &str) -> HalResult<QuantumDevice> {
        self.devices
            .iter()
            .find(|d| d.vendor_device_id == vendor_device_id)
            .cloned()
            .ok_or_else(|| HalError::DeviceNotFound(vendor_device_id.to_string()))
    }
}

/// IBM Quantum backends.
#[derive(Debug, Clone, Default)]
pub struct IbmProvider {
    devices: VendorDevices,
}

impl IbmProvider {
    pub fn from_catalog(catalog: &DeviceCatalog) -> Self {
        Self {
            devices: VendorDevices::from_catalog(catalog, Vendor::Ibm),
        }
    }
}

impl DeviceProvider for IbmProvider {
    fn vendor(&self) -> Vendor {
        Vendor::Ibm
    }

    fn get_devices(&self) -> Vec<QuantumDevice> {
        self.devices.devices.clone()
    }

    fn get_device(&self, vendor_device_id: &str) -> HalResult<QuantumDevice> {
        self.devices.get(vendor_device_id)
    }
}

/// Amazon Braket devices, addressed by ARN.
#[derive(Debug, Clone, Default)]
pub struct BraketProvider {
    devices: VendorDevices,
}

impl BraketProvider {
    pub fn from_catalog(catalog: &DeviceCatalog) -> Self {
        Self {
            devices: VendorDevices::from_catalog(catalog, Vendor::Aws),
        }
    }
}

impl DeviceProvider for BraketProvider {
    fn vendor(&self) -> Vendor {
        Vendor::Aws
    }

    fn get_devices(&self) -> Vec<QuantumDevice> {
        self.devices.devices.clone()
    }

    fn get_device(&self, vendor_device_id: &str) -> HalResult<QuantumDevice> {
        self.devices.get(vendor_device_id)
    }
}

/// The vendor providers this crate knows.
#[derive(Debug, Clone)]
pub enum VendorProvider {
    Ibm(IbmProvider),
    Aws(BraketProvider),
}

impl VendorProvider {
    /// Provider for a vendor, if one exists.
    pub fn for_vendor(vendor: Vendor, catalog: &DeviceCatalog) -> Option<Self> {
        match vendor {
            Vendor::Ibm => Some(VendorProvider::Ibm(IbmProvider::from_catalog(catalog))),
            Vendor::Aws => Some(VendorProvider::Aws(BraketProvider::from_catalog(catalog))),
            _ => None,
        }
    }
}

impl DeviceProvider for VendorProvider {
    fn vendor(&self) -> Vendor {
        match self {
            VendorProvider::Ibm(p) => p.vendor(),
            VendorProvider::Aws(p) => p.vendor(),
        }
    }

    fn get_devices(&self) -> Vec<QuantumDevice> {
        match self {
            VendorProvider::Ibm(p) => p.get_devices(),
            VendorProvider::Aws(p) => p.get_devices(),
        }
    }

    fn get_device(&self, vendor_device_id: &str) -> HalResult<QuantumDevice> {
        match self {
            VendorProvider::Ibm(p) => p.get_device(vendor_device_id),
            VendorProvider::Aws(p) => p.get_device(vendor_device_id),
        }
    }
}

/// Entry point for device lookup across vendors.
#[derive(Debug, Clone, Default)]
pub struct QuantumProvider {
    catalog: DeviceCatalog,
    providers: FxHashMap<Vendor, VendorProvider>,
}

impl QuantumProvider {
    /// Order in which [`QuantumProvider::get_devices`] lists vendors.
    const LISTING_ORDER: [Vendor; 2] = [Vendor::Aws, Vendor::Ibm];

    /// Build providers for the enabled vendors that have one.
    pub fn new(catalog: DeviceCatalog, vendors: &[Vendor]) -> Self {
        let mut provider = Self {
            catalog,
            providers: FxHashMap::default(),
        };
        for &vendor in vendors {
            match VendorProvider::for_vendor(vendor, &provider.catalog) {
                Some(p) => provider.register(p),
                None => debug!("No provider for vendor: {}", vendor),
            }
        }
        provider
    }

    pub fn from_config(config: &ProviderConfig) -> HalResult<Self> {
        Ok(Self::new(config.catalog()?, &config.enabled_vendors()?))
    }

    /// Add or replace the provider of a vendor.
    pub fn register(&mut self, provider: VendorProvider) {
        debug!("Registering provider: {}", provider.vendor());
        self.providers.insert(provider.vendor(), provider);
    }

    pub fn provider(&self, vendor: Vendor) -> Option<&VendorProvider> {
        self.providers.get(&vendor)
    }

    pub fn catalog(&self) -> &DeviceCatalog {
        &self.catalog
    }

    /// Devices of every registered provider, AWS first, then IBM.
    pub fn get_devices(&self) -> Vec<QuantumDevice> {
        Self::LISTING_ORDER
            .iter()
            .filter_map(|v| self.providers.get(v))
            .flat_map(|p| p.get_devices())
            .collect()
    }

    /// The vendor of a vendor device id.
    ///
    /// Falls back to the catalog when the id has no recognizable shape.
    pub fn vendor_of(&self, vendor_device_id: &str) -> HalResult<Vendor> {
        if let Some(vendor) = Vendor::infer(vendor_device_id) {
            return Ok(vendor);
        }
        let record = self
            .catalog
            .find_by_obj_arg(vendor_device_id)
            .ok_or_else(|| HalError::DeviceNotFound(vendor_device_id.to_string()))?;
        record.vendor.ok_or_else(|| {
            HalError::ResourceNotFound(format!(
                "device {} has no vendor",
                record.id
            ))
        })
    }

    /// A device by vendor device id, dispatched to its vendor's provider.
    pub fn get_vendor_device(
        &self,
        vendor_device_id: &str,
        vendor: Option<Vendor>,
    ) -> HalResult<QuantumDevice> {
        let vendor = match vendor {
            Some(v) => v,
            None => self.vendor_of(vendor_device_id)?,
        };
        match self.providers.get(&vendor) {
            Some(provider) => provider.get_device(vendor_device_id),
            None => Err(HalError::DeviceNotFound(vendor_device_id.to_string())),
        }
    }

    /// A device by platform id.
    #[instrument(skip(self))]
    pub fn get_device(&self, platform_id: &str) -> HalResult<QuantumDevice> {
        let record = self
            .catalog
            .get(platform_id)
            .ok_or_else(|| HalError::DeviceNotFound(platform_id.to_string()))?;
        let obj_arg = record.obj_arg.as_deref().ok_or_else(|| {
            HalError::ResourceNotFound("missing required field 'obj_arg'".to_string())
        })?;
        self.get_vendor_device(obj_arg, record.vendor)
    }
}
