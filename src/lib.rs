// canopy: spatial nature soundscape
// Re-export the workspace crates for integration tests and embedders

pub use audio;
pub use audio_io;
pub use scene_core;
pub use settings_manager;
pub use spatial;

// Re-export commonly used types for convenience
pub use audio::{HeadlessEngine, SceneHandler, SpatialEngine, Spatializer, SpatializerConfig};
pub use audio_io::{AssetRegistry, NatureAsset};
pub use scene_core::{Error, Pose, SceneCommand, SceneEvent, SourceId};
pub use settings_manager::{ConfigManager, Settings};
pub use spatial::{CoincidentPolicy, SpatialScene};
