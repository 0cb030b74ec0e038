// slip39-core/src/config.rs
//
// Runtime configuration. Every field has a default, so an empty file (or no
// file at all) is a valid configuration.

use crate::crypto::key_deriver::MAX_PATH_DEPTH;
use crate::error::{WalletError, WalletResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub deriver: DeriverConfig,
    pub stream: StreamConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeriverConfig {
    pub max_path_depth: usize,
    /// Attach private keys to derived accounts. They are never streamed.
    pub include_private_keys: bool,
}

impl Default for DeriverConfig {
    fn default() -> Self {
        Self {
            max_path_depth: MAX_PATH_DEPTH,
            include_private_keys: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Prefix each record with its index. Forced on when encrypting.
    pub enumerated: bool,
    /// Percentage of output symbols to corrupt (testing only).
    pub corrupt_percent: f64,
    pub kdf: KdfParams,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            enumerated: true,
            corrupt_percent: 0.0,
            kdf: KdfParams::default(),
        }
    }
}

/// Argon2id parameters for the stream password.
///
/// | Parameter | Default | Meaning |
/// |-----------|---------|---------|
/// | `m_cost`  | 19 456  | Memory usage in KiB |
/// | `t_cost`  | 2       | Number of passes |
/// | `p_cost`  | 1       | Degree of parallelism |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KdfParams {
    pub m_cost: u32,
    pub t_cost: u32,
    pub p_cost: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            m_cost: argon2::Params::DEFAULT_M_COST,
            t_cost: argon2::Params::DEFAULT_T_COST,
            p_cost: argon2::Params::DEFAULT_P_COST,
        }
    }
}

impl KdfParams {
    pub(crate) fn to_argon2(self) -> WalletResult<argon2::Params> {
        argon2::Params::new(self.m_cost, self.t_cost, self.p_cost, Some(32))
            .map_err(|e| WalletError::Config(format!("invalid Argon2 parameters: {}", e)))
    }
}

impl Config {
    pub fn from_toml_str(text: &str) -> WalletResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| WalletError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a `.toml` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> WalletResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("toml");
        let config: Self = match ext {
            "toml" => toml::from_str(&content).map_err(|e| WalletError::Config(e.to_string()))?,
            "json" => serde_json::from_str(&content).map_err(|e| WalletError::Config(e.to_string()))?,
            other => {
                return Err(WalletError::Config(format!(
                    "unsupported config format '{}'",
                    other
                )))
            }
        };

        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn validate(&self) -> WalletResult<()> {
        if self.deriver.max_path_depth == 0 || self.deriver.max_path_depth > MAX_PATH_DEPTH {
            return Err(WalletError::Config(format!(
                "max_path_depth must be within 1..={}, got {}",
                MAX_PATH_DEPTH, self.deriver.max_path_depth
            )));
        }
        let corrupt = self.stream.corrupt_percent;
        if !(0.0..=100.0).contains(&corrupt) {
            return Err(WalletError::Config(format!(
                "corrupt_percent must be within 0..=100, got {}",
                corrupt
            )));
        }
        self.stream.kdf.to_argon2()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.deriver.max_path_depth, 255);
        assert!(!config.deriver.include_private_keys);
        assert!(config.stream.enumerated);
        assert_eq!(config.stream.corrupt_percent, 0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config = Config::from_toml_str(
            r#"
            [stream]
            corrupt_percent = 5.0

            [stream.kdf]
            m_cost = 64
            t_cost = 1
            "#,
        )
        .unwrap();
        assert_eq!(config.stream.corrupt_percent, 5.0);
        assert_eq!(config.stream.kdf.m_cost, 64);
        assert_eq!(config.stream.kdf.p_cost, 1);
        assert_eq!(config.deriver, DeriverConfig::default());
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn test_validation() {
        assert!(Config::from_toml_str("[stream]\ncorrupt_percent = 150.0").is_err());
        assert!(Config::from_toml_str("[deriver]\nmax_path_depth = 0").is_err());
        assert!(Config::from_toml_str("[stream.kdf]\nt_cost = 0").is_err());
        assert!(Config::from_toml_str("[deriver]\nmax_path_depth = \"deep\"").is_err());
    }

    #[test]
    fn test_load_files() {
        let dir = tempfile::tempdir().unwrap();

        let toml_path = dir.path().join("slip39.toml");
        std::fs::File::create(&toml_path)
            .unwrap()
            .write_all(b"[deriver]\ninclude_private_keys = true\n")
            .unwrap();
        assert!(Config::load(&toml_path).unwrap().deriver.include_private_keys);

        let json_path = dir.path().join("slip39.json");
        std::fs::write(&json_path, r#"{"stream": {"enumerated": false}}"#).unwrap();
        assert!(!Config::load(&json_path).unwrap().stream.enumerated);

        let yaml_path = dir.path().join("slip39.yaml");
        std::fs::write(&yaml_path, "deriver: {}").unwrap();
        assert!(matches!(Config::load(&yaml_path), Err(WalletError::Config(_))));

        assert!(matches!(
            Config::load(dir.path().join("missing.toml")),
            Err(WalletError::Io(_))
        ));
    }
}
