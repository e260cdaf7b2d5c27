//! qbridge Hardware Abstraction Layer
//!
//! This crate resolves quantum devices operated by external vendors.
//!
//! # Overview
//!
//! - A [`DeviceCatalog`] maps platform device ids to vendor device ids
//! - [`Vendor`] providers implement [`DeviceProvider`]
//! - [`QuantumProvider`] dispatches a lookup to the right vendor provider
//! - [`ProviderConfig`] loads the catalog and enabled vendors from YAML
//!
//! # Supported Vendors
//!
//! | Vendor | Provider | Device ids |
//! |--------|----------|------------|
//! | IBM Quantum | [`IbmProvider`] | `ibm_*`, `simulator_*` |
//! | Amazon Braket | [`BraketProvider`] | `arn:aws:...` |
//! | IonQ, QuEra, Rigetti, OQC | none | catalog only |
//!
//! # Example: Looking Up a Device
//!
//! ```rust
//! use qbridge_hal::{ProviderConfig, QuantumProvider, Vendor};
//!
//! let config = ProviderConfig::from_yaml(r#"
//! devices:
//!   - id: ibm_q_perth
//!     obj_arg: ibm_perth
//!     name: Perth
//!     num_qubits: 7
//! "#).unwrap();
//!
//! let provider = QuantumProvider::from_config(&config).unwrap();
//! let device = provider.get_device("ibm_q_perth").unwrap();
//! assert_eq!(device.vendor, Vendor::Ibm);
//! assert_eq!(device.vendor_device_id, "ibm_perth");
//! ```

pub mod config;
pub mod device;
pub mod error;
pub mod provider;
pub mod vendor;

pub use config::{DeviceEntry, ProviderConfig};
pub use device::{DeviceCatalog, DeviceRecord, DeviceStatus, QuantumDevice};
pub use error::{HalError, HalResult};
pub use provider::{BraketProvider, DeviceProvider, IbmProvider, QuantumProvider, VendorProvider};
pub use vendor::Vendor;
