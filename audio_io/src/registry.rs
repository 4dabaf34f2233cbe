use crate::{
    decode_file, normalize_peak, AssetType, NormalizationMode, SamplerNodeDefinition, SoundAsset,
    SoundEventAsset,
};
use log::{debug, info};
use scene_core::Error;
use std::collections::HashMap;
use std::path::Path;

/// Sound files and sound events known to the engine, by identifier
#[derive(Debug, Default)]
pub struct AssetRegistry {
    sound_assets: HashMap<String, SoundAsset>,
    event_assets: HashMap<String, SoundEventAsset>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the file at `path` under `identifier`.
    ///
    /// Resident assets are decoded now; streamed assets only have to exist.
    pub fn register_sound_asset<P: AsRef<Path>>(
        &mut self,
        path: P,
        identifier: impl Into<String>,
        asset_type: AssetType,
        normalization: NormalizationMode,
    ) -> Result<&SoundAsset, Error> {
        let identifier = identifier.into();
        let path = path.as_ref();

        if self.sound_assets.contains_key(&identifier) {
            return Err(Error::InvalidState(format!(
                "Sound asset '{}' is already registered",
                identifier
            )));
        }
        if !path.is_file() {
            return Err(Error::NotFound(format!(
                "Sound file for '{}' not found: {}",
                identifier,
                path.display()
            )));
        }

        let data = match asset_type {
            AssetType::Resident => {
                let mut decoded = decode_file(path)?;
                if normalization == NormalizationMode::Dynamic {
                    let scale = normalize_peak(&mut decoded.samples);
                    debug!("Normalized '{}' by {:.3}", identifier, scale);
                }
                Some(decoded)
            }
            AssetType::Streamed => None,
        };

        info!(
            "Registered sound asset '{}' from {} ({:?})",
            identifier,
            path.display(),
            asset_type
        );
        let asset = SoundAsset::new(
            identifier.clone(),
            path.to_path_buf(),
            asset_type,
            normalization,
            data,
        );
        Ok(self.sound_assets.entry(identifier).or_insert(asset))
    }

    /// Register a sound event whose root sampler plays a registered asset
    pub fn register_sound_event_asset(
        &mut self,
        root: SamplerNodeDefinition,
        identifier: impl Into<String>,
    ) -> Result<&SoundEventAsset, Error> {
        let identifier = identifier.into();

        if self.event_assets.contains_key(&identifier) {
            return Err(Error::InvalidState(format!(
                "Sound event '{}' is already registered",
                identifier
            )));
        }
        if !self.sound_assets.contains_key(root.sound_asset()) {
            return Err(Error::NotFound(format!(
                "Sound event '{}' refers to unknown asset '{}'",
                identifier,
                root.sound_asset()
            )));
        }

        debug!(
            "Registered sound event '{}' ({} / {:?})",
            identifier,
            root.sound_asset(),
            root.playback_mode()
        );
        let event = SoundEventAsset::new(identifier.clone(), root);
        Ok(self.event_assets.entry(identifier).or_insert(event))
    }

    pub fn unregister_sound_event_asset(&mut self, identifier: &str) -> Option<SoundEventAsset> {
        self.event_assets.remove(identifier)
    }

    pub fn sound_asset(&self, identifier: &str) -> Option<&SoundAsset> {
        self.sound_assets.get(identifier)
    }

    pub fn event_asset(&self, identifier: &str) -> Option<&SoundEventAsset> {
        self.event_assets.get(identifier)
    }

    pub fn contains_sound_asset(&self, identifier: &str) -> bool {
        self.sound_assets.contains_key(identifier)
    }

    /// Registered sound asset identifiers, sorted
    pub fn sound_asset_identifiers(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.sound_assets.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}
