use crate::DecodedAudio;
use scene_core::Error;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// The nature recordings shipped with the demo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NatureAsset {
    Forest,
    Pine,
    Bird,
    Bird2,
    Frog,
    Monkey,
    Rain,
    Wind,
}

impl NatureAsset {
    pub const ALL: [NatureAsset; 8] = [
        NatureAsset::Forest,
        NatureAsset::Pine,
        NatureAsset::Bird,
        NatureAsset::Bird2,
        NatureAsset::Frog,
        NatureAsset::Monkey,
        NatureAsset::Rain,
        NatureAsset::Wind,
    ];

    /// Identifier the asset is registered under
    pub fn identifier(&self) -> &'static str {
        match self {
            NatureAsset::Forest => "forest",
            NatureAsset::Pine => "pine",
            NatureAsset::Bird => "bird",
            NatureAsset::Bird2 => "bird2",
            NatureAsset::Frog => "frog",
            NatureAsset::Monkey => "monkey",
            NatureAsset::Rain => "rain",
            NatureAsset::Wind => "wind",
        }
    }

    /// File name of the recording in the asset directory
    pub fn file_name(&self) -> &'static str {
        match self {
            NatureAsset::Forest => "Forest_Amb.wav",
            // BBC sound effects archive, wind through pines
            NatureAsset::Pine => "NHU05070109.wav",
            NatureAsset::Bird => "Bird.wav",
            NatureAsset::Bird2 => "Bird2.wav",
            NatureAsset::Frog => "Frog.wav",
            NatureAsset::Monkey => "Monkey.wav",
            NatureAsset::Rain => "Rain.wav",
            NatureAsset::Wind => "Wind.wav",
        }
    }
}

impl std::fmt::Display for NatureAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

impl FromStr for NatureAsset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NatureAsset::ALL
            .iter()
            .copied()
            .find(|asset| asset.identifier() == s)
            .ok_or_else(|| Error::NotFound(format!("Unknown nature asset: {}", s)))
    }
}

/// How the engine holds an asset's samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssetType {
    /// Decoded up front and kept in memory
    #[default]
    Resident,
    /// Read from disk while playing
    Streamed,
}

/// Loudness treatment applied at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalizationMode {
    None,
    /// Scale so the loudest sample reaches full scale
    #[default]
    Dynamic,
}

/// A registered sound file
#[derive(Debug, Clone)]
pub struct SoundAsset {
    identifier: String,
    path: PathBuf,
    asset_type: AssetType,
    normalization: NormalizationMode,
    data: Option<DecodedAudio>,
}

impl SoundAsset {
    pub(crate) fn new(
        identifier: String,
        path: PathBuf,
        asset_type: AssetType,
        normalization: NormalizationMode,
        data: Option<DecodedAudio>,
    ) -> Self {
        Self {
            identifier,
            path,
            asset_type,
            normalization,
            data,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn asset_type(&self) -> AssetType {
        self.asset_type
    }

    pub fn normalization(&self) -> NormalizationMode {
        self.normalization
    }

    /// Decoded samples, present for resident assets only
    pub fn data(&self) -> Option<&DecodedAudio> {
        self.data.as_ref()
    }
}
