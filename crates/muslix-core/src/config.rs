//! Runtime configuration for muslix
//!
//! Configuration is read from an optional `muslix.toml`, with environment
//! overrides for the geodata client timeout.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::Result;

/// Default number of independent hash functions in a MinHash signature
pub const DEFAULT_MINHASH_HASHES: usize = 100;

/// Default shingle size (contiguous token window) for MinHash
pub const DEFAULT_SHINGLE_SIZE: usize = 3;

/// Default timeout for geodata lookup requests
pub const DEFAULT_GEODATA_TIMEOUT_SECONDS: u64 = 10;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub similarity: SimilarityConfig,
    pub geodata: GeodataConfig,
}

/// Settings for the similarity engine
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    /// Number of seeded hash functions per MinHash signature
    pub minhash_hashes: usize,
    /// Tokens per shingle for MinHash set construction
    pub shingle_size: usize,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            minhash_hashes: DEFAULT_MINHASH_HASHES,
            shingle_size: DEFAULT_SHINGLE_SIZE,
        }
    }
}

/// Settings for the geodata lookup client
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeodataConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for GeodataConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_GEODATA_TIMEOUT_SECONDS,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load `muslix.toml` from a directory if present, defaults otherwise
    pub fn load_or_default(dir: &Path) -> Result<Self> {
        let path = dir.join("muslix.toml");
        if path.exists() {
            Self::load(&path)
        } else {
            let mut config = Config::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(timeout) = std::env::var("MUSLIX_GEODATA_TIMEOUT") {
            if let Ok(seconds) = timeout.parse::<u64>() {
                self.geodata.timeout_seconds = seconds.clamp(1, 120);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.similarity.minhash_hashes, 100);
        assert_eq!(config.similarity.shingle_size, 3);
        assert_eq!(config.geodata.timeout_seconds, 10);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("muslix.toml");
        std::fs::write(&path, "[similarity]\nminhash_hashes = 64\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.similarity.minhash_hashes, 64);
        assert_eq!(config.similarity.shingle_size, 3);
        assert_eq!(config.geodata.timeout_seconds, 10);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(dir.path()).unwrap();
        assert_eq!(config.similarity.minhash_hashes, 100);
    }
}
