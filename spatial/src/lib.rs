//! Spatial scene for canopy
//!
//! This crate holds the listener, the anchored sound sources and the
//! inverse-square attenuation applied on every listener update. Mixer
//! and reverb definitions handed to the rendering engine live here too.

mod attenuation;
mod listener;
mod mixer;
mod scene;
mod source;

pub use attenuation::{CoincidentPolicy, InverseSquare};
pub use listener::Listener;
pub use mixer::{MixerDefinition, MixerId, ReverbPreset, SpatialPipeline};
pub use scene::SpatialScene;
pub use source::{SoundSource, SourceKind};
