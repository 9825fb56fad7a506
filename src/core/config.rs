//! Engine configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::Result;
use crate::session::Surface;

/// Runtime configuration for a voxelamming process.
///
/// Every field has a default, so a config file only needs the keys it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Room the session starts in
    pub room_name: String,
    /// Renderer relay that receives snapshots
    pub server_addr: String,
    /// Port of the command server (0 picks a free one)
    pub listen_port: u16,
    /// Period of the outbound queue drain timer
    pub drain_interval_ms: u64,
    /// Which command surface the session exposes
    pub surface: Surface,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            room_name: "1000".to_string(),
            server_addr: voxelamming_link::DEFAULT_RELAY_ADDR.to_string(),
            listen_port: voxelamming_link::DEFAULT_PORT,
            drain_interval_ms: 1000,
            surface: Surface::Turtle,
        }
    }
}

impl EngineConfig {
    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Drain timer period
    pub fn drain_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.drain_interval_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.drain_interval_ms == 0 {
            return Err(Error::Config("drain_interval_ms must be positive".into()));
        }
        if self.room_name.is_empty() {
            return Err(Error::Config("room_name must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("voxelamming.json");
        std::fs::write(&path, r#"{"room_name":"art-class","surface":"animated"}"#).unwrap();

        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.room_name, "art-class");
        assert_eq!(config.surface, Surface::Animated);
        assert_eq!(config.drain_interval_ms, 1000);
        assert_eq!(config.listen_port, voxelamming_link::DEFAULT_PORT);
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let config = EngineConfig {
            drain_interval_ms: 250,
            ..Default::default()
        };
        config.save(&path).unwrap();
        assert_eq!(EngineConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"drain_interval_ms":0}"#).unwrap();
        assert!(matches!(EngineConfig::load(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let result = EngineConfig::load(dir.path().join("absent.json"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
