//! Shared types for canopy
//!
//! Identifiers, poses, the unified error type and the commands/events
//! exchanged between the tracking side and the spatial scene.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub mod events;
pub mod pose;

pub use events::{SceneCommand, SceneEvent};
pub use pose::Pose;

/// Unique identifier for a sound source in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct SourceId(Uuid);

impl SourceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a SourceId from a UUID
    pub fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for SourceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Display only the first 8 characters for brevity
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// Unified error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Audio error: {0}")]
    Audio(String),

    #[error("Asset error: {0}")]
    Asset(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Source {source_id} coincides with the listener")]
    CoincidentPosition { source_id: SourceId },

    #[error(transparent)]
    Other(#[from] anyhow::Error), // Catch-all for other errors
}

/// Interleaved f32 samples.
pub type AudioBuffer = Vec<f32>;
