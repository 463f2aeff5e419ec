//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::worldgen::{
    BiomeConfig, ClassifierConfig, NamedNoise, default_biomes, default_noise,
};

const CONFIG_FILE: &str = "config.ron";

/// Top-level generator configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// World identity and global terrain constants.
    pub world: WorldConfig,
    /// Climate noise used for biome classification.
    pub climate: ClimateConfig,
    /// Named noise modules, in declaration order.
    pub noise: Vec<NamedNoise>,
    /// Registered biomes. Registration order assigns biome ids.
    pub biomes: Vec<BiomeConfig>,
    /// Climate-to-biome rules.
    pub classifier: ClassifierConfig,
    /// Background worker pool settings.
    pub workers: WorkerConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// World identity and global terrain constants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// World seed.
    pub seed: u64,
    /// Water fills columns whose surface lies below this height.
    pub sea_level: u32,
    /// When set, every column uses this biome instead of climate classification.
    pub forced_biome: Option<String>,
}

/// Climate noise settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClimateConfig {
    /// Frequency of the temperature field. Lower values give broader zones.
    pub temperature_frequency: f64,
    /// Frequency of the humidity field.
    pub humidity_frequency: f64,
}

/// Background generation worker pool settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorkerConfig {
    /// Worker thread count. `0` picks one from the available cores.
    pub threads: usize,
    /// Maximum queued or executing requests.
    pub max_in_flight: usize,
    /// Capacity of the completed-chunk channel.
    pub result_capacity: usize,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level filter (e.g., "debug", "info", "loam_terrain=trace").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for Config {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            climate: ClimateConfig::default(),
            noise: default_noise(),
            biomes: default_biomes(),
            classifier: ClassifierConfig::default(),
            workers: WorkerConfig::default(),
            debug: DebugConfig::default(),
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            sea_level: 64,
            forced_biome: None,
        }
    }
}

impl Default for ClimateConfig {
    fn default() -> Self {
        Self {
            temperature_frequency: 0.002,
            humidity_frequency: 0.0025,
        }
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            max_in_flight: 64,
            result_capacity: 128,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Default config directory: `<os config dir>/loam`, or `./loam` when the OS
/// exposes none.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("loam")
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents =
                std::fs::read_to_string(&config_path).map_err(ConfigError::read(&config_path))?;
            let config: Config =
                ron::from_str(&contents).map_err(ConfigError::parse(&config_path))?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::write(config_dir))?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(6)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::write(&config_path))?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    ///
    /// A reloaded config only affects generators built from it afterwards;
    /// a running generator keeps the registry it was built with.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);
        let contents =
            std::fs::read_to_string(&config_path).map_err(ConfigError::read(&config_path))?;
        let new_config: Config =
            ron::from_str(&contents).map_err(ConfigError::parse(&config_path))?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worldgen::DecoratorConfig;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(6))
                .unwrap();
        assert!(ron_str.contains("sea_level: 64"));
        assert!(ron_str.contains("\"forest\""));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: Config = ron::from_str("(world: (seed: 42))").unwrap();
        assert_eq!(config.world.seed, 42);
        assert_eq!(config.world.sea_level, 64);
        assert_eq!(config.biomes, default_biomes());
        assert_eq!(config.workers, WorkerConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_custom_biome_list_parses() {
        let ron_str = r#"(
            world: (seed: 7, forced_biome: Some("flat")),
            noise: [(name: "flat", spec: Constant(0.0))],
            biomes: [(
                name: "flat",
                noise: "flat",
                surface: "grass",
                filler: "dirt",
                underwater: "dirt",
                topsoil_depth: 4,
                base_height: 68.0,
                height_variation: 8.0,
                decorators: [Pond(one_in: 0), Tree(one_in: 1, kind: Oak)],
            )],
        )"#;
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.world.forced_biome.as_deref(), Some("flat"));
        assert_eq!(config.biomes.len(), 1);
        assert_eq!(config.biomes[0].decorators[0], DecoratorConfig::Pond { one_in: 0 });
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.world.seed = 1234;
        config.world.forced_biome = Some("desert".to_string());

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join(CONFIG_FILE).exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.world.seed = 99;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.map(|c| c.world.seed), Some(99));
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let result: Result<Config, _> = ron::from_str("{{not valid}}");
        assert!(result.is_err());
    }

    #[test]
    fn test_corrupt_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{{not valid}}").unwrap();
        let err = Config::load_or_create(dir.path()).unwrap_err();
        match &err {
            ConfigError::Parse { path, .. } => assert_eq!(path, &dir.path().join(CONFIG_FILE)),
            other => panic!("expected parse error, got {other:?}"),
        }
        assert!(err.to_string().contains(CONFIG_FILE));
    }

    #[test]
    fn test_reload_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::default().reload(dir.path());
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_default_config_dir_ends_with_app_name() {
        assert!(default_config_dir().ends_with("loam"));
    }
}
