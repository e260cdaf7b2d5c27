//! Provider configuration.
//!
//! Supports loading configuration from:
//! 1. An explicit file (`--config`)
//! 2. The file named by `QBRIDGE_CONFIG`
//! 3. `~/.qbridge/config.yaml`
//!
//! The first that applies wins; with none of them the defaults are used.
//! `QBRIDGE_VENDORS` (comma separated) then overrides the enabled vendors.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::device::{DeviceCatalog, DeviceRecord, DeviceStatus};
use crate::error::{HalError, HalResult};
use crate::vendor::Vendor;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "QBRIDGE_CONFIG";

/// Environment variable overriding the enabled vendors.
pub const VENDORS_ENV: &str = "QBRIDGE_VENDORS";

/// Complete provider configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Vendors whose providers are enabled.
    #[serde(default = "default_vendors")]
    pub vendors: Vec<String>,

    /// Device catalog.
    #[serde(default)]
    pub devices: Vec<DeviceEntry>,
}

/// One catalog entry as written in the configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceEntry {
    /// Platform device id
    pub id: String,

    /// Vendor device id
    #[serde(default)]
    pub obj_arg: Option<String>,

    #[serde(default)]
    pub vendor: Option<String>,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub num_qubits: u32,

    /// "online", "offline" or "retired"
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_vendors() -> Vec<String> {
    vec!["ibm".to_string(), "aws".to_string()]
}

fn default_status() -> String {
    "online".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            vendors: default_vendors(),
            devices: Vec::new(),
        }
    }
}

impl ProviderConfig {
    /// Parse a YAML document.
    pub fn from_yaml(contents: &str) -> HalResult<Self> {
        let config: ProviderConfig = serde_yaml_ng::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> HalResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| HalError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded provider configuration from {}", path.display());
        Self::from_yaml(&contents)
    }

    /// Load configuration with the following precedence:
    /// 1. `config_file` if provided
    /// 2. `$QBRIDGE_CONFIG`
    /// 3. `~/.qbridge/config.yaml` if it exists
    /// 4. Defaults
    ///
    /// Environment overrides are applied last.
    pub fn load(config_file: Option<&Path>) -> HalResult<Self> {
        let path = match config_file {
            Some(p) => Some(p.to_path_buf()),
            None => std::env::var_os(CONFIG_ENV)
                .map(PathBuf::from)
                .or_else(|| Self::default_path().filter(|p| p.exists())),
        };

        let mut config = match path {
            Some(p) => {
                info!("Using provider configuration {}", p.display());
                Self::from_file(p)?
            }
            None => Self::default(),
        };

        if let Ok(vendors) = std::env::var(VENDORS_ENV) {
            config.override_vendors(&vendors);
        }

        config.validate()?;
        Ok(config)
    }

    /// `~/.qbridge/config.yaml`, if a home directory is known.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".qbridge").join("config.yaml"))
    }

    /// Replace the enabled vendors with a comma-separated list.
    pub fn override_vendors(&mut self, list: &str) {
        self.vendors = list
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect();
    }

    /// Validate configuration values.
    pub fn validate(&self) -> HalResult<()> {
        self.enabled_vendors()?;
        self.catalog()?;
        Ok(())
    }

    /// Enabled vendors, parsed.
    pub fn enabled_vendors(&self) -> HalResult<Vec<Vendor>> {
        self.vendors.iter().map(|v| v.parse()).collect()
    }

    /// Build the device catalog. Fails on duplicate ids and unknown names.
    pub fn catalog(&self) -> HalResult<DeviceCatalog> {
        let mut catalog = DeviceCatalog::new();
        for entry in &self.devices {
            catalog.insert(entry.to_record()?)?;
        }
        Ok(catalog)
    }
}

impl DeviceEntry {
    fn to_record(&self) -> HalResult<DeviceRecord> {
        let vendor = self
            .vendor
            .as_deref()
            .map(str::parse::<Vendor>)
            .transpose()?;
        let status = self.status.parse::<DeviceStatus>()?;
        Ok(DeviceRecord {
            id: self.id.clone(),
            obj_arg: self.obj_arg.clone(),
            vendor,
            name: if self.name.is_empty() {
                self.id.clone()
            } else {
                self.name.clone()
            },
            num_qubits: self.num_qubits,
            status,
        })
    }
}
