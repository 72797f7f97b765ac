//! Dual-resolution channel-voice values
//!
//! Several channel-voice quantities exist at two bit widths depending on
//! which wire protocol carried them: 7-bit on MIDI 1.0 against 16 or 32 bits
//! on MIDI 2.0, and 14-bit against 32 bits for pitch bend. Each wrapper
//! stores the value at the resolution it arrived in and converts on demand
//! using the MIDI 2.0 scaling rules (see [`crate::num`]).
//!
//! Conversion low → high is lossless; high → low truncates. Equality and
//! hashing are defined over the high-resolution form, so a value constructed
//! from MIDI 1.0 wire data compares equal to the same value after a round
//! trip through a MIDI 2.0 stream.

use std::hash::{Hash, Hasher};

use crate::num::{
    U7, U14, scale_7_to_16, scale_7_to_32, scale_14_to_32, scale_16_to_7, scale_32_to_7,
    scale_32_to_14,
};

/// Note velocity: 7-bit (MIDI 1.0) or 16-bit (MIDI 2.0)
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Velocity {
    /// 7-bit resolution value
    Midi1(U7),
    /// 16-bit resolution value
    Midi2(u16),
}

impl Velocity {
    /// Value at 7-bit resolution (truncating if stored at 16-bit)
    #[must_use]
    pub const fn midi1(self) -> U7 {
        match self {
            Self::Midi1(v) => v,
            Self::Midi2(v) => scale_16_to_7(v),
        }
    }

    /// Value at 16-bit resolution (upscaled if stored at 7-bit)
    #[must_use]
    pub const fn midi2(self) -> u16 {
        match self {
            Self::Midi1(v) => scale_7_to_16(v),
            Self::Midi2(v) => v,
        }
    }
}

impl PartialEq for Velocity {
    fn eq(&self, other: &Self) -> bool {
        self.midi2() == other.midi2()
    }
}

impl Eq for Velocity {}

impl Hash for Velocity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.midi2().hash(state);
    }
}

/// 7-bit (MIDI 1.0) or 32-bit (MIDI 2.0) controller-style value
///
/// Used for control change, note pressure and channel pressure amounts.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value7 {
    /// 7-bit resolution value
    Midi1(U7),
    /// 32-bit resolution value
    Midi2(u32),
}

impl Value7 {
    /// Value at 7-bit resolution (truncating if stored at 32-bit)
    #[must_use]
    pub const fn midi1(self) -> U7 {
        match self {
            Self::Midi1(v) => v,
            Self::Midi2(v) => scale_32_to_7(v),
        }
    }

    /// Value at 32-bit resolution (upscaled if stored at 7-bit)
    #[must_use]
    pub const fn midi2(self) -> u32 {
        match self {
            Self::Midi1(v) => scale_7_to_32(v),
            Self::Midi2(v) => v,
        }
    }
}

impl PartialEq for Value7 {
    fn eq(&self, other: &Self) -> bool {
        self.midi2() == other.midi2()
    }
}

impl Eq for Value7 {}

impl Hash for Value7 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.midi2().hash(state);
    }
}

/// 14-bit (MIDI 1.0) or 32-bit (MIDI 2.0) value
///
/// Used for pitch bend.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value14 {
    /// 14-bit resolution value
    Midi1(U14),
    /// 32-bit resolution value
    Midi2(u32),
}

impl Value14 {
    /// Value at 14-bit resolution (truncating if stored at 32-bit)
    #[must_use]
    pub const fn midi1(self) -> U14 {
        match self {
            Self::Midi1(v) => v,
            Self::Midi2(v) => scale_32_to_14(v),
        }
    }

    /// Value at 32-bit resolution (upscaled if stored at 14-bit)
    #[must_use]
    pub const fn midi2(self) -> u32 {
        match self {
            Self::Midi1(v) => scale_14_to_32(v),
            Self::Midi2(v) => v,
        }
    }
}

impl PartialEq for Value14 {
    fn eq(&self, other: &Self) -> bool {
        self.midi2() == other.midi2()
    }
}

impl Eq for Value14 {}

impl Hash for Value14 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.midi2().hash(state);
    }
}
