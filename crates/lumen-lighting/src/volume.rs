use lumen_blocks::Rgb;
use lumen_world::{ChunkDims, Side};

use crate::LightingError;

/// One of the six byte planes a `LightVolume` stores.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    SkyR,
    SkyG,
    SkyB,
    BlockR,
    BlockG,
    BlockB,
}

impl Channel {
    pub const ALL: [Channel; 6] = [
        Channel::SkyR,
        Channel::SkyG,
        Channel::SkyB,
        Channel::BlockR,
        Channel::BlockG,
        Channel::BlockB,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Sky and block light of a single voxel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LightValue {
    pub sky: Rgb,
    pub block: Rgb,
}

impl LightValue {
    pub const FULL_BRIGHT: LightValue = LightValue {
        sky: Rgb::FULL,
        block: Rgb::FULL,
    };

    #[inline]
    pub fn new(sky: Rgb, block: Rgb) -> Self {
        Self { sky, block }
    }

    /// Per-channel max of sky and block light.
    #[inline]
    pub fn combined(self) -> Rgb {
        self.sky.max(self.block)
    }

    /// Combined light scaled to `0.0..=1.0`, floored at `min_ambient`.
    pub fn normalized(self, min_ambient: f32) -> [f32; 3] {
        let floor = if min_ambient.is_finite() {
            min_ambient.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let c = self.combined();
        let max = f32::from(Rgb::MAX_LEVEL);
        [c.r, c.g, c.b].map(|v| (f32::from(v) / max).max(floor))
    }
}

/// Dense light storage for one chunk: six parallel planes laid out in
/// `ChunkDims` index order. Every stored byte is in `0..=15`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LightVolume {
    dims: ChunkDims,
    channels: [Vec<u8>; 6],
}

impl LightVolume {
    pub fn new(dims: ChunkDims) -> Result<Self, LightingError> {
        let len = dims.volume().ok_or_else(|| LightingError::invalid_dims(dims))?;
        Ok(Self {
            dims,
            channels: std::array::from_fn(|_| vec![0; len]),
        })
    }

    /// Rehydrates a volume from raw planes received over the wire. Lengths
    /// must match `dims` exactly; out-of-range bytes are clamped.
    pub fn from_channels(dims: ChunkDims, channels: [Vec<u8>; 6]) -> Result<Self, LightingError> {
        let len = dims.volume().ok_or_else(|| LightingError::invalid_dims(dims))?;
        let mut channels = channels;
        for (channel, plane) in Channel::ALL.iter().zip(channels.iter_mut()) {
            if plane.len() != len {
                return Err(LightingError::ChannelLength {
                    channel: *channel,
                    expected: len,
                    actual: plane.len(),
                });
            }
            for v in plane.iter_mut() {
                *v = (*v).min(Rgb::MAX_LEVEL);
            }
        }
        Ok(Self { dims, channels })
    }

    #[inline]
    pub fn dims(&self) -> ChunkDims {
        self.dims
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.channels[0].len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn channel(&self, channel: Channel) -> &[u8] {
        &self.channels[channel.index()]
    }

    #[inline]
    pub(crate) fn channel_mut(&mut self, channel: Channel) -> &mut [u8] {
        &mut self.channels[channel.index()]
    }

    #[inline]
    pub(crate) fn channels_mut(&mut self) -> &mut [Vec<u8>; 6] {
        &mut self.channels
    }

    pub fn channels(&self) -> &[Vec<u8>; 6] {
        &self.channels
    }

    pub fn into_channels(self) -> [Vec<u8>; 6] {
        self.channels
    }

    pub fn get(&self, x: usize, y: usize, z: usize) -> Option<LightValue> {
        let i = self.dims.checked_index(x, y, z)?;
        Some(LightValue {
            sky: self.sky_at_index(i),
            block: self.block_at_index(i),
        })
    }

    /// Writes both triples at a local position, clamping each channel.
    pub fn set(&mut self, x: usize, y: usize, z: usize, value: LightValue) -> Result<(), LightingError> {
        let i = self
            .dims
            .checked_index(x, y, z)
            .ok_or(LightingError::OutOfBounds { x, y, z })?;
        self.set_sky_at_index(i, value.sky);
        self.set_block_at_index(i, value.block);
        Ok(())
    }

    #[inline]
    pub fn sky_at_index(&self, i: usize) -> Rgb {
        Rgb::new(self.channels[0][i], self.channels[1][i], self.channels[2][i])
    }

    #[inline]
    pub fn block_at_index(&self, i: usize) -> Rgb {
        Rgb::new(self.channels[3][i], self.channels[4][i], self.channels[5][i])
    }

    #[inline]
    pub fn set_sky_at_index(&mut self, i: usize, c: Rgb) {
        let c = c.clamped();
        self.channels[0][i] = c.r;
        self.channels[1][i] = c.g;
        self.channels[2][i] = c.b;
    }

    #[inline]
    pub fn set_block_at_index(&mut self, i: usize, c: Rgb) {
        let c = c.clamped();
        self.channels[3][i] = c.r;
        self.channels[4][i] = c.g;
        self.channels[5][i] = c.b;
    }

    /// Zeroes all three block-light planes.
    pub fn clear_block(&mut self) {
        for plane in &mut self.channels[3..] {
            plane.fill(0);
        }
    }

    pub fn max_block(&self) -> Rgb {
        let m = |c: usize| self.channels[c].iter().copied().max().unwrap_or(0);
        Rgb::new(m(3), m(4), m(5))
    }

    /// Block light along one vertical face, in `face_cells` order then `y`.
    pub fn face_block(&self, side: Side) -> impl Iterator<Item = Rgb> + '_ {
        let dims = self.dims;
        dims.face_cells(side).flat_map(move |(x, z)| {
            (0..dims.sy).map(move |y| self.block_at_index(dims.index(x, y, z)))
        })
    }

    pub fn face_has_block_light(&self, side: Side) -> bool {
        self.face_block(side).any(|c| !c.is_zero())
    }
}
