use crate::preprocessing::scaling::NUM_SCALED;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";
pub const CONFIG_PATH_ENV: &str = "HEARTNX_CONFIG";

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub logging: LoggingConfig,
    pub scaling: ScalingConfig,
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            host: "127.0.0.1".to_string(),
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ModelConfig {
    pub path: String,
    pub intra_threads: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: "./heart_disease_model.onnx".to_string(),
            intra_threads: 4,
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct LoggingConfig {
    /// Append-only log file; request payloads and errors land here.
    pub file: String,
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: "app.log".to_string(),
            level: "info".to_string(),
        }
    }
}

#[derive(Deserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScalingMode {
    /// Standardize the scaled columns with statistics taken from the request itself.
    #[default]
    PerRequest,
    /// Standardize with training-time statistics supplied in `mean` / `std`.
    Fixed,
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct ScalingConfig {
    pub mode: ScalingMode,
    pub mean: Option<Vec<f64>>,
    pub std: Option<Vec<f64>>,
}

impl ScalingConfig {
    fn validate(&self) -> anyhow::Result<()> {
        if self.mode != ScalingMode::Fixed {
            return Ok(());
        }
        let (Some(mean), Some(std)) = (&self.mean, &self.std) else {
            anyhow::bail!("scaling.mode 'fixed' requires both scaling.mean and scaling.std");
        };
        let expected = NUM_SCALED;
        if mean.len() != expected || std.len() != expected {
            anyhow::bail!(
                "scaling.mean and scaling.std need {} entries each, got {} and {}",
                expected,
                mean.len(),
                std.len()
            );
        }
        if std.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            anyhow::bail!("scaling.std entries must be finite and positive");
        }
        Ok(())
    }
}

impl AppConfig {
    /// Reads the YAML config at `path`. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let config = match fs::read_to_string(path.as_ref()) {
            Ok(content) => Self::from_yaml(&content)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Self::default(),
            Err(e) => return Err(e.into()),
        };
        config.scaling.validate()?;
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        // An empty document deserializes to unit, not a mapping.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_match_demo_service() {
        let config = AppConfig::default();
        assert_eq!(config.bind_address(), "127.0.0.1:5000");
        assert_eq!(config.model.path, "./heart_disease_model.onnx");
        assert_eq!(config.logging.file, "app.log");
        assert_eq!(config.scaling.mode, ScalingMode::PerRequest);
    }

    #[test]
    fn test_partial_yaml_keeps_other_defaults() {
        let config = AppConfig::from_yaml("server:\n  port: 8080\n").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.model.intra_threads, 4);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = AppConfig::load("definitely_not_here.yaml").unwrap();
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_load_fixed_scaling() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "scaling:\n  mode: fixed\n  mean: [54.4, 131.6, 246.3, 149.6, 1.0]\n  std: [9.0, 17.5, 51.8, 22.9, 1.2]"
        )
        .unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.scaling.mode, ScalingMode::Fixed);
        assert_eq!(config.scaling.mean.unwrap().len(), 5);
    }

    #[test]
    fn test_fixed_scaling_requires_statistics() {
        let config = AppConfig::from_yaml("scaling:\n  mode: fixed\n").unwrap();
        assert!(config.scaling.validate().is_err());
    }

    #[test]
    fn test_fixed_scaling_rejects_zero_std() {
        let config = AppConfig::from_yaml(
            "scaling:\n  mode: fixed\n  mean: [0, 0, 0, 0, 0]\n  std: [1, 1, 0, 1, 1]\n",
        )
        .unwrap();
        assert!(config.scaling.validate().is_err());
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        assert!(AppConfig::from_yaml("server:\n  port: not-a-port\n").is_err());
    }
}
