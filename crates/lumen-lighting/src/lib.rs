//! Per-chunk light volumes and the sky/propagation passes that fill them.
#![forbid(unsafe_code)]

mod error;
mod neighborhood;
mod pipeline;
mod propagate;
mod sky;
mod store;
mod volume;

pub use error::LightingError;
pub use neighborhood::VoxelNeighborhood;
pub use pipeline::LightingPipeline;
pub use propagate::{PropagationPass, PropagationStats};
pub use sky::SkyLightPass;
pub use store::{LightStorage, NeighborLight};
pub use volume::{Channel, LightValue, LightVolume};
