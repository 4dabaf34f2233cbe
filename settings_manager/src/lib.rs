//! Configuration management for canopy
//!
//! This crate handles loading, saving and accessing the soundscape
//! configuration: which recordings exist, how they are mixed, and where
//! the demo scene places them.

use audio_io::{AssetType, NatureAsset};
use log::debug;
use scene_core::Error;
use serde::{Deserialize, Serialize};
use spatial::{CoincidentPolicy, ReverbPreset, SpatialPipeline};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// One recording in the asset table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetEntry {
    /// Identifier sources refer to
    pub identifier: String,
    /// File name, relative to the asset directory
    pub file: String,
    /// Stream from disk instead of decoding up front
    #[serde(default)]
    pub streamed: bool,
}

impl AssetEntry {
    pub fn asset_type(&self) -> AssetType {
        if self.streamed {
            AssetType::Streamed
        } else {
            AssetType::Resident
        }
    }
}

impl From<NatureAsset> for AssetEntry {
    fn from(asset: NatureAsset) -> Self {
        Self {
            identifier: asset.identifier().to_string(),
            file: asset.file_name().to_string(),
            streamed: false,
        }
    }
}

/// The looping bed attached at the reference frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmbientSettings {
    pub asset: String,
    /// Fixed linear gain, never attenuated
    pub gain: f64,
}

impl Default for AmbientSettings {
    fn default() -> Self {
        Self {
            asset: NatureAsset::Forest.identifier().to_string(),
            gain: 12.0,
        }
    }
}

/// Mixer and reverb parameters shared by every sound event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixerSettings {
    pub reverb_preset: ReverbPreset,
    /// Sampler calibration, dB relative SPL
    pub calibration_db: f32,
    pub pipeline: SpatialPipeline,
    /// Radius of the sphere every source radiates from, metres
    #[serde(default = "default_source_radius")]
    pub source_radius: f32,
}

fn default_source_radius() -> f32 {
    1.0
}

impl Default for MixerSettings {
    fn default() -> Self {
        Self {
            reverb_preset: ReverbPreset::MediumRoom,
            calibration_db: 0.0,
            pipeline: SpatialPipeline::default(),
            source_radius: default_source_radius(),
        }
    }
}

/// A source the demo places at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedSource {
    pub asset: String,
    /// World position in metres
    pub position: [f32; 3],
}

impl PlacedSource {
    fn new(asset: NatureAsset, position: [f32; 3]) -> Self {
        Self {
            asset: asset.identifier().to_string(),
            position,
        }
    }
}

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Directory holding the recordings
    pub asset_dir: PathBuf,

    /// Every recording that gets registered at startup
    pub assets: Vec<AssetEntry>,

    pub ambient: AmbientSettings,

    pub mixer: MixerSettings,

    /// Behaviour when a source coincides with the listener
    #[serde(default)]
    pub attenuation: CoincidentPolicy,

    /// Sources anchored by the demo
    #[serde(default)]
    pub scene: Vec<PlacedSource>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("assets"),
            assets: NatureAsset::ALL.iter().copied().map(AssetEntry::from).collect(),
            ambient: AmbientSettings::default(),
            mixer: MixerSettings::default(),
            attenuation: CoincidentPolicy::PassThrough,
            scene: vec![
                PlacedSource::new(NatureAsset::Rain, [0.0, 0.0, -2.0]),
                PlacedSource::new(NatureAsset::Bird, [3.0, 1.5, -1.0]),
                PlacedSource::new(NatureAsset::Wind, [-2.5, 0.5, 1.0]),
                PlacedSource::new(NatureAsset::Frog, [1.0, -0.5, 3.0]),
            ],
        }
    }
}

impl Settings {
    /// Full path of an asset table entry
    pub fn asset_path(&self, entry: &AssetEntry) -> PathBuf {
        self.asset_dir.join(&entry.file)
    }

    pub fn asset(&self, identifier: &str) -> Option<&AssetEntry> {
        self.assets.iter().find(|a| a.identifier == identifier)
    }

    /// Check the settings for values the engine cannot use
    pub fn validate(&self) -> Result<(), Error> {
        let mut seen = HashSet::new();
        for entry in &self.assets {
            if !seen.insert(entry.identifier.as_str()) {
                return Err(Error::Config(format!(
                    "Duplicate asset identifier '{}'",
                    entry.identifier
                )));
            }
        }

        if self.asset(&self.ambient.asset).is_none() {
            return Err(Error::Config(format!(
                "Ambient asset '{}' is not in the asset table",
                self.ambient.asset
            )));
        }
        if !self.ambient.gain.is_finite() || self.ambient.gain < 0.0 {
            return Err(Error::Config(format!(
                "Ambient gain must be a finite, non-negative number, got {}",
                self.ambient.gain
            )));
        }

        let send = self.mixer.pipeline.late_reverb_send_level;
        if !(0.0..=1.0).contains(&send) {
            return Err(Error::Config(format!(
                "Late reverb send level must be within 0.0-1.0, got {}",
                send
            )));
        }

        let radius = self.mixer.source_radius;
        if !radius.is_finite() || radius <= 0.0 {
            return Err(Error::Config(format!(
                "Source radius must be positive, got {}",
                radius
            )));
        }

        if let CoincidentPolicy::Clamp { min_distance } = self.attenuation {
            if !min_distance.is_finite() || min_distance <= 0.0 {
                return Err(Error::Config(format!(
                    "Minimum distance must be positive, got {}",
                    min_distance
                )));
            }
        }

        for placed in &self.scene {
            if self.asset(&placed.asset).is_none() {
                return Err(Error::Config(format!(
                    "Scene source uses unknown asset '{}'",
                    placed.asset
                )));
            }
        }

        Ok(())
    }
}

/// Configuration manager
pub struct ConfigManager {
    settings: Settings,
    config_file: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager from the user's config directory
    pub fn new() -> Result<Self, Error> {
        // Get user's config directory
        let mut config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Failed to determine config directory".to_string()))?;
        config_dir.push("canopy");

        // Create config directory if it doesn't exist
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .map_err(|e| Error::Config(format!("Failed to create config directory: {}", e)))?;
        }

        Self::with_file(config_dir.join("config.toml"))
    }

    /// Create a new ConfigManager with a custom file path
    pub fn with_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let config_file = path.as_ref().to_path_buf();

        // Try to load config from file, fall back to defaults if not found
        let settings = if config_file.exists() {
            Self::load_from_file(&config_file)?
        } else {
            debug!("Config file {:?} not found, using defaults", config_file);
            Settings::default()
        };
        settings.validate()?;

        Ok(Self {
            settings,
            config_file,
        })
    }

    /// Load settings from a TOML file
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Settings, Error> {
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Save settings to the config file
    pub fn save(&self) -> Result<(), Error> {
        self.settings.validate()?;
        let toml = toml::to_string_pretty(&self.settings)
            .map_err(|e| Error::Config(format!("Failed to serialize settings: {}", e)))?;

        // Ensure parent directory exists
        if let Some(parent) = self.config_file.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    Error::Config(format!("Failed to create config directory: {}", e))
                })?;
            }
        }

        fs::write(&self.config_file, toml)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        debug!("Saved config to {:?}", self.config_file);
        Ok(())
    }

    /// Get the current settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Get a mutable reference to settings
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Replace the settings after validating them
    pub fn update_settings(&mut self, new_settings: Settings) -> Result<(), Error> {
        new_settings.validate()?;
        self.settings = new_settings;
        Ok(())
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.assets.len(), 8);
        assert_eq!(settings.ambient.asset, "forest");
        assert_eq!(settings.ambient.gain, 12.0);
        assert_eq!(settings.mixer.reverb_preset, ReverbPreset::MediumRoom);
        assert!((settings.mixer.pipeline.late_reverb_send_level - 0.1).abs() < f32::EPSILON);
        assert_eq!(settings.attenuation, CoincidentPolicy::PassThrough);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn asset_path_joins_directory() {
        let settings = Settings::default();
        let pine = settings.asset("pine").unwrap();
        assert_eq!(
            settings.asset_path(pine),
            PathBuf::from("assets").join("NHU05070109.wav")
        );
        assert_eq!(pine.asset_type(), AssetType::Resident);
    }

    #[test]
    fn save_refuses_invalid_settings() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let mut config = ConfigManager::with_file(&config_path).unwrap();
        config.settings_mut().ambient.asset = "thunder".to_string();
        assert!(matches!(config.save(), Err(Error::Config(_))));
        assert!(!config_path.exists());

        config.settings_mut().ambient.asset = "forest".to_string();
        config.settings_mut().mixer.source_radius = 0.0;
        assert!(matches!(config.save(), Err(Error::Config(_))));
        assert!(!config_path.exists());
    }

    #[test]
    fn source_radius_defaults_when_absent() {
        let mixer: MixerSettings = toml::from_str(
            r#"
reverb_preset = "large_hall"
calibration_db = -3.0

[pipeline]
direct_path_transmission = true
early_reflections = false
late_reverb = true
late_reverb_send_level = 0.2
"#,
        )
        .unwrap();
        assert_eq!(mixer.source_radius, 1.0);
        assert_eq!(mixer.reverb_preset, ReverbPreset::LargeHall);
    }

    #[test]
    fn save_and_load() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("test_config.toml");

        let mut config = ConfigManager::with_file(&config_path).unwrap();
        config.settings_mut().asset_dir = PathBuf::from("/opt/canopy/sounds");
        config.settings_mut().attenuation = CoincidentPolicy::Clamp { min_distance: 0.25 };
        config.settings_mut().mixer.reverb_preset = ReverbPreset::LargeHall;
        config.settings_mut().assets[0].streamed = true;

        config.save().unwrap();
        assert!(config_path.exists());

        let loaded = ConfigManager::with_file(&config_path).unwrap();
        assert_eq!(loaded.settings(), config.settings());
    }

    #[test]
    fn partial_file_uses_defaults_for_optional_sections() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("partial.toml");
        fs::write(
            &config_path,
            r#"
asset_dir = "sounds"

[[assets]]
identifier = "forest"
file = "Forest_Amb.wav"

[ambient]
asset = "forest"
gain = 6.0

[mixer]
reverb_preset = "small_room"
calibration_db = -3.0

[mixer.pipeline]
direct_path_transmission = true
early_reflections = true
late_reverb = true
late_reverb_send_level = 0.3
"#,
        )
        .unwrap();

        let config = ConfigManager::with_file(&config_path).unwrap();
        let settings = config.settings();
        assert_eq!(settings.ambient.gain, 6.0);
        assert_eq!(settings.mixer.reverb_preset, ReverbPreset::SmallRoom);
        assert_eq!(settings.attenuation, CoincidentPolicy::PassThrough);
        assert!(settings.scene.is_empty());
    }

    #[test]
    fn reject_policy_parses() {
        let mut settings = Settings::default();
        settings.attenuation = CoincidentPolicy::Reject;
        let text = toml::to_string_pretty(&settings).unwrap();
        assert!(text.contains("mode = \"reject\""));
        let back: Settings = toml::from_str(&text).unwrap();
        assert_eq!(back.attenuation, CoincidentPolicy::Reject);
    }

    #[test]
    fn file_not_found_uses_defaults() {
        let temp_dir = tempdir().unwrap();
        let nonexistent_path = temp_dir.path().join("nonexistent.toml");

        let config = ConfigManager::with_file(&nonexistent_path).unwrap();
        assert_eq!(config.settings(), &Settings::default());
    }

    #[test]
    fn malformed_file_is_config_error() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("broken.toml");
        fs::write(&config_path, "asset_dir = [").unwrap();
        assert!(matches!(
            ConfigManager::with_file(&config_path),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut settings = Settings::default();
        settings.attenuation = CoincidentPolicy::Clamp { min_distance: 0.0 };
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.mixer.pipeline.late_reverb_send_level = 1.5;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.ambient.asset = "waterfall".to_string();
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.scene.push(PlacedSource {
            asset: "stream".to_string(),
            position: [0.0, 0.0, 0.0],
        });
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        let dup = settings.assets[1].clone();
        settings.assets.push(dup);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn update_settings_validates() {
        let temp_dir = tempdir().unwrap();
        let mut config = ConfigManager::with_file(temp_dir.path().join("c.toml")).unwrap();
        let mut bad = Settings::default();
        bad.ambient.gain = f64::NAN;
        assert!(config.update_settings(bad).is_err());
        assert_eq!(config.settings().ambient.gain, 12.0);
    }
}
