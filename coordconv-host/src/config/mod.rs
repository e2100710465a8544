//! Configuration des conversions

use serde::{Deserialize, Serialize};
use std::path::Path;

use anyhow::{bail, Context, Result};
use coordconv::ConversionOptions;
use tracing::debug;

/// Variable d'environnement: fréquence de progression
pub const ENV_PROGRESS_INTERVAL: &str = "COORDCONV_PROGRESS_INTERVAL";
/// Variable d'environnement: suffixe de la nouvelle couche
pub const ENV_LAYER_SUFFIX: &str = "COORDCONV_LAYER_SUFFIX";

/// Charge un fichier .env (répertoire courant, puis répertoire du binaire)
pub fn load_env() {
    if dotenvy::dotenv().is_err() {
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                let _ = dotenvy::from_path(dir.join(".env"));
            }
        }
    }
}

/// Configuration principale
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(flatten)]
    pub options: ConversionOptions,
}

impl Config {
    /// Charge une configuration depuis un fichier
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Charge une configuration depuis un preset embarqué
    pub fn from_preset(preset: &str) -> Result<Self> {
        match preset {
            "default" => Self::load_embedded(include_str!("presets/default.json")),
            "compact" => Self::load_embedded(include_str!("presets/compact.json")),
            _ => bail!("Unknown preset: {}. Use: default, compact", preset),
        }
    }

    fn load_embedded(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse embedded config")
    }

    /// Applique les surcharges des variables d'environnement
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(value) = std::env::var(ENV_PROGRESS_INTERVAL) {
            self.options.progress_interval = value.trim().parse().context(format!(
                "Invalid {}: '{}' is not a positive integer",
                ENV_PROGRESS_INTERVAL, value
            ))?;
            debug!(progress_interval = self.options.progress_interval, "Override from environment");
        }
        if let Ok(value) = std::env::var(ENV_LAYER_SUFFIX) {
            self.options.layer_suffix = value;
            debug!(layer_suffix = %self.options.layer_suffix, "Override from environment");
        }
        Ok(())
    }

    /// Vérifie la cohérence des longueurs et précisions
    pub fn validate(&self) -> Result<()> {
        let o = &self.options;
        if o.dd_length == 0 || o.dms_length == 0 || o.xy_length == 0 {
            bail!("Field lengths must be greater than zero");
        }
        if u16::from(o.dd_precision) >= o.dd_length {
            bail!(
                "dd_precision ({}) must be lower than dd_length ({})",
                o.dd_precision,
                o.dd_length
            );
        }
        if u16::from(o.xy_precision) >= o.xy_length {
            bail!(
                "xy_precision ({}) must be lower than xy_length ({})",
                o.xy_precision,
                o.xy_length
            );
        }
        if o.progress_interval == 0 {
            bail!("progress_interval must be greater than zero");
        }
        Ok(())
    }

    /// Options validées pour le moteur
    pub fn into_options(self) -> Result<ConversionOptions> {
        self.validate()?;
        Ok(self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_preset_matches_defaults() {
        let config = Config::from_preset("default").unwrap();
        assert_eq!(config.options, ConversionOptions::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_compact_preset() {
        let options = Config::from_preset("compact").unwrap().into_options().unwrap();
        assert_eq!(options.dd_precision, 7);
        assert_eq!(options.xy_precision, 2);
    }

    #[test]
    fn test_unknown_preset() {
        assert!(Config::from_preset("huge").is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"layer_suffix": "_wgs84"}"#).unwrap();
        assert_eq!(config.options.layer_suffix, "_wgs84");
        assert_eq!(config.options.dd_precision, 10);
    }

    #[test]
    fn test_validate_rejects_precision_overflow() {
        let mut config = Config::default();
        config.options.dd_precision = 30;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.options.xy_length = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let path =
            std::env::temp_dir().join(format!("coordconv-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"progress_interval": 10}"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.options.progress_interval, 10);

        std::fs::remove_file(&path).unwrap();
        assert!(Config::load(&path).is_err());
    }
}
