use std::path::Path;

use crate::errors::CoreError;
use crate::models::dashboard::DashboardSnapshot;

use super::format;

/// Save/load dashboard snapshots to/from bytes or files.
pub struct StorageManager;

impl StorageManager {
    /// DashboardSnapshot → bincode → BBDS frame.
    pub fn save_to_bytes(snapshot: &DashboardSnapshot) -> Result<Vec<u8>, CoreError> {
        let payload = bincode::serialize(snapshot)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize snapshot: {e}")))?;
        Ok(format::write_file(format::CURRENT_VERSION, &payload))
    }

    /// BBDS frame → bincode → DashboardSnapshot.
    pub fn load_from_bytes(data: &[u8]) -> Result<DashboardSnapshot, CoreError> {
        let (_header, payload) = format::read_file(data)?;
        bincode::deserialize(payload)
            .map_err(|e| CoreError::Deserialization(format!("Failed to deserialize snapshot: {e}")))
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(snapshot: &DashboardSnapshot, path: impl AsRef<Path>) -> Result<(), CoreError> {
        let bytes = Self::save_to_bytes(snapshot)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<DashboardSnapshot, CoreError> {
        let bytes = std::fs::read(path)?;
        Self::load_from_bytes(&bytes)
    }
}
