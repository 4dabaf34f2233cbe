//! Sound asset handling for canopy
//!
//! This crate registers pre-recorded sound files by identifier, decodes
//! resident assets with symphonia and defines the sound events the
//! rendering engine plays.

mod asset;
mod decoder;
mod event;
mod registry;
pub mod tone;

pub use asset::{AssetType, NatureAsset, NormalizationMode, SoundAsset};
pub use decoder::{decode_file, normalize_peak, DecodedAudio};
pub use event::{CalibrationMode, PlaybackMode, SamplerNodeDefinition, SoundEventAsset};
pub use registry::AssetRegistry;
