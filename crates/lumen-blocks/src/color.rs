use serde::{Deserialize, Serialize};

/// Light level triple. Each channel is a block-game light level in
/// `0..=MAX_LEVEL`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const MAX_LEVEL: u8 = 15;
    pub const ZERO: Rgb = Rgb::new(0, 0, 0);
    pub const FULL: Rgb = Rgb::splat(Rgb::MAX_LEVEL);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub const fn splat(v: u8) -> Self {
        Self { r: v, g: v, b: v }
    }

    #[inline]
    pub fn clamped(self) -> Self {
        Self {
            r: self.r.min(Self::MAX_LEVEL),
            g: self.g.min(Self::MAX_LEVEL),
            b: self.b.min(Self::MAX_LEVEL),
        }
    }

    #[inline]
    pub fn max(self, other: Rgb) -> Self {
        Self {
            r: self.r.max(other.r),
            g: self.g.max(other.g),
            b: self.b.max(other.b),
        }
    }

    /// One step of attenuation, saturating at zero per channel.
    #[inline]
    pub fn attenuated(self) -> Self {
        Self {
            r: self.r.saturating_sub(1),
            g: self.g.saturating_sub(1),
            b: self.b.saturating_sub(1),
        }
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.r == 0 && self.g == 0 && self.b == 0
    }

    /// True when any channel is strictly brighter than in `other`.
    #[inline]
    pub fn exceeds_any(self, other: Rgb) -> bool {
        self.r > other.r || self.g > other.g || self.b > other.b
    }

    /// True when no channel is brighter than in `other`.
    #[inline]
    pub fn dominated_by(self, other: Rgb) -> bool {
        !self.exceeds_any(other)
    }

    #[inline]
    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(v: [u8; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        c.to_array()
    }
}
