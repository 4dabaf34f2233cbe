//! Audio subsystem for canopy
//!
//! This crate drives the spatial rendering engine: it runs the startup
//! sequence, anchors sound sources, and re-attenuates them as listener
//! poses arrive from the tracker.

mod engine;
mod handler;
mod spatializer;

pub use engine::{EngineSource, EventId, HeadlessEngine, PlayingEvent, SpatialEngine};
pub use handler::SceneHandler;
pub use spatializer::{register_configured_assets, Spatializer, SpatializerConfig, AMBIENT_EVENT};
