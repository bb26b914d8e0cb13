use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Horizontal chunk position. Chunks span the full world height, so there is
/// no vertical component.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Coordinates wrap at the ends of the `i32` range.
    #[inline]
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            x: self.x.wrapping_add(dx),
            z: self.z.wrapping_add(dz),
        }
    }

    #[inline]
    pub fn neighbor(self, side: Side) -> Self {
        let (dx, dz) = side.offset();
        self.offset(dx, dz)
    }

    /// The four orthogonal neighbors, paired with the side they lie on.
    pub fn neighbors(self) -> [(Side, ChunkCoord); 4] {
        Side::ALL.map(|side| (side, self.neighbor(side)))
    }

    /// Packs both components into one integer: x in the high half, z in the
    /// low half, each as its two's-complement bit pattern.
    #[inline]
    pub fn key(self) -> u64 {
        (u64::from(self.x as u32) << 32) | u64::from(self.z as u32)
    }

    #[inline]
    pub fn from_key(key: u64) -> Self {
        Self {
            x: (key >> 32) as u32 as i32,
            z: key as u32 as i32,
        }
    }
}

impl From<(i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<ChunkCoord> for (i32, i32) {
    fn from(value: ChunkCoord) -> Self {
        (value.x, value.z)
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.z)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid chunk coordinate {0:?}, expected \"x,z\"")]
pub struct ParseChunkCoordError(pub String);

impl FromStr for ChunkCoord {
    type Err = ParseChunkCoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseChunkCoordError(s.to_string());
        let (x, z) = s.split_once(',').ok_or_else(err)?;
        let x = x.trim().parse::<i32>().map_err(|_| err())?;
        let z = z.trim().parse::<i32>().map_err(|_| err())?;
        Ok(Self::new(x, z))
    }
}

/// One of the four vertical faces a chunk shares with a neighbor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    NegX,
    PosX,
    NegZ,
    PosZ,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::NegX, Side::PosX, Side::NegZ, Side::PosZ];

    #[inline]
    pub fn offset(self) -> (i32, i32) {
        match self {
            Side::NegX => (-1, 0),
            Side::PosX => (1, 0),
            Side::NegZ => (0, -1),
            Side::PosZ => (0, 1),
        }
    }

    /// Position of this side in `Side::ALL`.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Side::NegX => 0,
            Side::PosX => 1,
            Side::NegZ => 2,
            Side::PosZ => 3,
        }
    }

    #[inline]
    pub fn opposite(self) -> Side {
        match self {
            Side::NegX => Side::PosX,
            Side::PosX => Side::NegX,
            Side::NegZ => Side::PosZ,
            Side::PosZ => Side::NegZ,
        }
    }
}
