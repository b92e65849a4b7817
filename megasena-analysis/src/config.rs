use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use megasena_data::models::Pool;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub pool_size: u8,
    /// Size of the "top N" rankings.
    pub top: usize,
    /// Reject non-increasing contest ids instead of clamping the gap to 1.
    pub strict_order: bool,
    /// Upper end of the delay thermometer, in contests.
    pub thermometer_scale: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            pool_size: 60,
            top: 10,
            strict_order: false,
            thermometer_scale: 100,
        }
    }
}

impl AnalysisConfig {
    pub fn pool(&self) -> Result<Pool> {
        Pool::new(self.pool_size)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Impossível ler {:?}", path))?;
        let config: AnalysisConfig = serde_json::from_str(&json)
            .with_context(|| format!("JSON inválido em {:?}", path))?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_context(|| format!("Impossível gravar {:?}", path))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert_eq!(config.pool().unwrap(), Pool::MEGA_SENA);
        assert_eq!(config.top, 10);
        assert!(!config.strict_order);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = AnalysisConfig {
            top: 5,
            strict_order: true,
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let restored: AnalysisConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AnalysisConfig = serde_json::from_str(r#"{"top": 3}"#).unwrap();
        assert_eq!(config.top, 3);
        assert_eq!(config.pool_size, 60);
        assert_eq!(config.thermometer_scale, 100);
    }

    #[test]
    fn test_invalid_pool() {
        let config = AnalysisConfig {
            pool_size: 4,
            ..Default::default()
        };
        assert!(config.pool().is_err());
    }
}
