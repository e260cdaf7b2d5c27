//! Device vendors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HalError;

/// Companies operating quantum devices.
///
/// Only [`Vendor::Ibm`] and [`Vendor::Aws`] have a provider; devices of the
/// other vendors can be listed in the catalog but not loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Vendor {
    Ibm,
    Aws,
    IonQ,
    Quera,
    Rigetti,
    Oqc,
}

impl Vendor {
    pub const ALL: [Vendor; 6] = [
        Vendor::Ibm,
        Vendor::Aws,
        Vendor::IonQ,
        Vendor::Quera,
        Vendor::Rigetti,
        Vendor::Oqc,
    ];

    /// Guess the vendor from the shape of a vendor device id.
    ///
    /// IBM backends are named `ibm_*` or `simulator_*`; Braket devices are ARNs.
    pub fn infer(vendor_device_id: &str) -> Option<Vendor> {
        if vendor_device_id.starts_with("ibm") || vendor_device_id.starts_with("simulator") {
            Some(Vendor::Ibm)
        } else if vendor_device_id.starts_with("arn:aws") {
            Some(Vendor::Aws)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Vendor::Ibm => "ibm",
            Vendor::Aws => "aws",
            Vendor::IonQ => "ionq",
            Vendor::Quera => "quera",
            Vendor::Rigetti => "rigetti",
            Vendor::Oqc => "oqc",
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Vendor {
    type Err = HalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Vendor::ALL
            .into_iter()
            .find(|v| v.as_str() == lower)
            .ok_or_else(|| HalError::Configuration(format!("Unknown vendor: {s}")))
    }
}

impl TryFrom<String> for Vendor {
    type Error = HalError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
