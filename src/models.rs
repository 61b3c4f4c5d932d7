//! Data models for the network reporter.
//!
//! This module contains the inventory document as it arrives from the
//! inventory export, the flattened per-device records derived from it,
//! and the error type shared by loading and rendering.

use crate::analysis::NetworkStats;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading an inventory or writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The inventory file could not be read.
    #[error("Failed to read inventory {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A required structural field is missing or has the wrong shape.
    #[error("Invalid inventory document: {0}")]
    InvalidInventory(#[source] serde_json::Error),

    /// The report model could not be serialized.
    #[error("Failed to serialize report: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Writing to the report sink failed.
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

/// Operational status of a device.
///
/// Matching is exact: `"Online"` is not `"online"` and lands in `Other`.
/// Devices with an `Other` status are counted in totals but in none of
/// the status buckets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeviceStatus {
    Online,
    Offline,
    Warning,
    Other(String),
}

impl DeviceStatus {
    pub fn as_str(&self) -> &str {
        match self {
            DeviceStatus::Online => "online",
            DeviceStatus::Offline => "offline",
            DeviceStatus::Warning => "warning",
            DeviceStatus::Other(s) => s,
        }
    }
}

impl From<&str> for DeviceStatus {
    fn from(s: &str) -> Self {
        match s {
            "online" => DeviceStatus::Online,
            "offline" => DeviceStatus::Offline,
            "warning" => DeviceStatus::Warning,
            other => DeviceStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for DeviceStatus {
    fn from(s: String) -> Self {
        DeviceStatus::from(s.as_str())
    }
}

impl From<DeviceStatus> for String {
    fn from(status: DeviceStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of network element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeviceKind {
    Switch,
    Router,
    AccessPoint,
    Server,
    Other(String),
}

impl DeviceKind {
    /// The identifier as it appears in the inventory.
    pub fn as_str(&self) -> &str {
        match self {
            DeviceKind::Switch => "switch",
            DeviceKind::Router => "router",
            DeviceKind::AccessPoint => "access_point",
            DeviceKind::Server => "server",
            DeviceKind::Other(s) => s,
        }
    }
}

impl From<&str> for DeviceKind {
    fn from(s: &str) -> Self {
        match s {
            "switch" => DeviceKind::Switch,
            "router" => DeviceKind::Router,
            "access_point" => DeviceKind::AccessPoint,
            "server" => DeviceKind::Server,
            other => DeviceKind::Other(other.to_string()),
        }
    }
}

impl From<String> for DeviceKind {
    fn from(s: String) -> Self {
        DeviceKind::from(s.as_str())
    }
}

impl From<DeviceKind> for String {
    fn from(kind: DeviceKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A VLAN identifier. Inventories use both numeric ids and names.
///
/// Ordering: all numeric ids ascending, then all names lexically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VlanId {
    Number(i64),
    Name(String),
}

impl fmt::Display for VlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VlanId::Number(n) => write!(f, "{}", n),
            VlanId::Name(s) => write!(f, "{}", s),
        }
    }
}

/// Port capacity of a switch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ports {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub used: u64,
}

impl Ports {
    /// Used ports as a percentage of total, `None` when there are no ports.
    pub fn usage_percent(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(self.used as f64 / self.total as f64 * 100.0)
        }
    }
}

/// A device as listed under a location in the inventory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceRaw {
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<DeviceKind>,
    #[serde(default)]
    pub status: Option<DeviceStatus>,
    #[serde(default, deserialize_with = "lenient")]
    pub uptime_days: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub ports: Option<Ports>,
    #[serde(default, deserialize_with = "lenient")]
    pub vlans: Option<Vec<VlanId>>,
}

/// Deserialize an optional field, treating a value of the wrong shape as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match serde_json::from_value(value) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) => {
            tracing::debug!("Ignoring malformed device field: {}", e);
            Ok(None)
        }
    }
}

/// An organizational site and the devices installed there.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub site: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub devices: Vec<DeviceRaw>,
}

/// The complete inventory document.
///
/// `locations` is required; everything else is optional and unknown
/// fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
    pub locations: Vec<Location>,
}

impl Inventory {
    /// Parse an inventory from JSON text.
    pub fn from_json(content: &str) -> Result<Self, ReportError> {
        serde_json::from_str(content).map_err(ReportError::InvalidInventory)
    }

    /// Read and parse an inventory file.
    pub fn load(path: &Path) -> Result<Self, ReportError> {
        let content = std::fs::read_to_string(path).map_err(|source| ReportError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Total number of devices across all locations.
    pub fn device_count(&self) -> usize {
        self.locations.iter().map(|l| l.devices.len()).sum()
    }
}

/// A device annotated with the site and city it was listed under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub hostname: Option<String>,
    pub ip_address: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<DeviceKind>,
    pub status: Option<DeviceStatus>,
    pub uptime_days: Option<u64>,
    pub ports: Option<Ports>,
    pub vlans: Option<Vec<VlanId>>,
    pub site: Option<String>,
    pub city: Option<String>,
}

impl Device {
    /// Create a device record owned by `location`.
    pub fn from_raw(raw: &DeviceRaw, location: &Location) -> Self {
        Self {
            hostname: raw.hostname.clone(),
            ip_address: raw.ip_address.clone(),
            kind: raw.kind.clone(),
            status: raw.status.clone(),
            uptime_days: raw.uptime_days,
            ports: raw.ports,
            vlans: raw.vlans.clone(),
            site: location.site.clone(),
            city: location.city.clone(),
        }
    }

    pub fn is_switch(&self) -> bool {
        self.kind == Some(DeviceKind::Switch)
    }

    /// Port data for switches with a non-zero port count.
    pub fn switch_ports(&self) -> Option<Ports> {
        if !self.is_switch() {
            return None;
        }
        self.ports.filter(|p| p.total > 0)
    }

    /// Port usage percentage; only defined for switches with ports.
    pub fn port_usage_percent(&self) -> Option<f64> {
        self.switch_ports().and_then(|p| p.usage_percent())
    }
}

/// Metadata about the report run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Company named in the inventory.
    pub company: Option<String>,
    /// When the inventory data was last updated.
    pub last_updated: Option<String>,
    /// When this report was rendered.
    pub generated_at: DateTime<Utc>,
}

/// The complete network status report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkReport {
    /// Metadata about the report.
    pub metadata: ReportMetadata,
    /// All devices, in inventory order.
    pub devices: Vec<Device>,
    /// Statistics derived from the devices.
    pub stats: NetworkStats,
}
