use lumen_world::ChunkCoord;

/// Announcements sent to every subscriber of a `LightingService`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LightingEvent {
    /// New light for the chunk has been merged into storage.
    Ready(ChunkCoord),
    /// The chunk's job kept faulting and was dropped.
    Failed { coord: ChunkCoord, error: String },
}

/// Why a lighting job was scheduled. When requests for one chunk collapse,
/// the greatest cause is kept.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum JobCause {
    /// A neighbor's shared face changed.
    BorderRefresh,
    Generated,
    /// A voxel in the chunk was edited; loaded neighbors are refreshed after.
    Edit,
}
