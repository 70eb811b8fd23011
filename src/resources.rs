/// Integer configuration resources read and written around a snapshot

use crate::error::{Result, SnapshotError};
use crate::format::{FIRST_UNIT_ADDRESS, NUM_DISK_UNITS};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Hardware-level drive emulation switch
pub const DRIVE_TRUE_EMULATION: &str = "DriveTrueEmulation";

/// Video timing standard of the host machine
pub const MACHINE_VIDEO_STANDARD: &str = "MachineVideoStandard";

/// PAL timing
pub const VIDEO_STANDARD_PAL: i32 = 1;

/// Name of the idling-method resource for a bus address
pub fn idle_method_resource(address: u8) -> String {
    format!("Drive{}IdleMethod", address)
}

/// Named integer configuration values
pub trait Resources {
    /// Current value of a resource
    fn get_int(&self, name: &str) -> Option<i32>;

    /// Set a resource
    fn set_int(&mut self, name: &str, value: i32);
}

/// In-memory resource table, persisted as JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceStore {
    values: BTreeMap<String, i32>,
}

impl Default for ResourceStore {
    fn default() -> Self {
        let mut values = BTreeMap::new();
        values.insert(DRIVE_TRUE_EMULATION.to_string(), 1);
        values.insert(MACHINE_VIDEO_STANDARD.to_string(), VIDEO_STANDARD_PAL);
        for unit in 0..NUM_DISK_UNITS {
            values.insert(idle_method_resource(FIRST_UNIT_ADDRESS + unit as u8), 0);
        }
        Self { values }
    }
}

impl ResourceStore {
    /// Create a store holding the defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON resource file over the defaults
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)?;
        let loaded: ResourceStore = serde_json::from_str(&content).map_err(|e| {
            SnapshotError::Config(format!("Failed to parse {:?}: {}", path.as_ref(), e))
        })?;

        let mut store = Self::default();
        store.values.extend(loaded.values);
        Ok(store)
    }

    /// Save as pretty-printed JSON
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| SnapshotError::Config(format!("Failed to serialize resources: {}", e)))?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Iterate over `(name, value)` in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl Resources for ResourceStore {
    fn get_int(&self, name: &str) -> Option<i32> {
        self.values.get(name).copied()
    }

    fn set_int(&mut self, name: &str, value: i32) {
        self.values.insert(name.to_string(), value);
    }
}
