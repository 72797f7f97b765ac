//! Bit-width-constrained integer types and MIDI 2.0 value scaling
//!
//! MIDI wire formats deal in fields of 4, 7, 9, 14 and 25 bits. Each width
//! gets a validating newtype so out-of-range values are unrepresentable past
//! the construction boundary.

use std::fmt;

macro_rules! midi_uint {
    (
        $(#[$meta:meta])*
        $name:ident, $repr:ty, $bits:expr
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name($repr);

        impl $name {
            /// Number of bits in this type
            pub const BITS: u8 = $bits;

            /// Smallest representable value (zero)
            pub const MIN: Self = Self(0);

            /// Largest representable value
            pub const MAX: Self = Self((1 << $bits) - 1);

            /// Create from a raw value, rejecting values that do not fit
            #[must_use]
            pub const fn new(value: $repr) -> Option<Self> {
                if value <= Self::MAX.0 {
                    Some(Self(value))
                } else {
                    None
                }
            }

            /// Create from a raw value, saturating at the maximum
            #[must_use]
            pub const fn new_clamped(value: $repr) -> Self {
                if value <= Self::MAX.0 {
                    Self(value)
                } else {
                    Self::MAX
                }
            }

            /// Create from a raw value, keeping only the low bits
            #[must_use]
            pub const fn new_truncated(value: $repr) -> Self {
                Self(value & Self::MAX.0)
            }

            /// Raw value
            #[must_use]
            pub const fn get(self) -> $repr {
                self.0
            }

            /// Raw value widened to `u32`
            #[must_use]
            #[allow(clippy::cast_lossless)]
            pub const fn as_u32(self) -> u32 {
                self.0 as u32
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<$name> for $repr {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

midi_uint! {
    /// 4-bit unsigned integer (`0..=15`): channels, UMP groups, nibbles
    U4, u8, 4
}

midi_uint! {
    /// 7-bit unsigned integer (`0..=127`): MIDI 1.0 data bytes
    U7, u8, 7
}

midi_uint! {
    /// 9-bit unsigned integer (`0..=511`): MIDI 2.0 pitch fractions
    U9, u16, 9
}

midi_uint! {
    /// 14-bit unsigned integer (`0..=16383`): pitch bend, song position,
    /// paired-CC values
    U14, u16, 14
}

midi_uint! {
    /// 25-bit unsigned integer: MIDI 2.0 note pitch (7.9 fixed point plus
    /// flag bits)
    U25, u32, 25
}

impl From<U4> for U7 {
    fn from(value: U4) -> Self {
        Self(value.0)
    }
}

impl From<U7> for U14 {
    fn from(value: U7) -> Self {
        Self(u16::from(value.0))
    }
}

impl U14 {
    /// Assemble from a 7-bit MSB/LSB pair
    #[must_use]
    pub const fn from_pair(msb: U7, lsb: U7) -> Self {
        Self(((msb.0 as u16) << 7) | lsb.0 as u16)
    }

    /// High 7 bits
    #[must_use]
    pub const fn msb(self) -> U7 {
        U7((self.0 >> 7) as u8)
    }

    /// Low 7 bits
    #[must_use]
    pub const fn lsb(self) -> U7 {
        U7((self.0 & 0x7F) as u8)
    }

    /// Midpoint value (`0x2000`), the center of a pitch bend range
    pub const MIDPOINT: Self = Self(0x2000);
}

// MARK: scaling
//
// The MIDI 2.0 spec defines min-center-max scaling for translating values
// between resolutions: upscaling left-shifts, and for source values above
// the midpoint additionally bit-repeats the low bits of the source into the
// vacated low bits so that the source maximum maps to the target maximum.
// A naive left shift would not round-trip (0x7F would become 0xFE00_0000,
// not 0xFFFF_FFFF). Downscaling always truncates.

/// Scale a 7-bit value to 16 bits per the MIDI 2.0 scaling rules.
#[must_use]
pub const fn scale_7_to_16(value: U7) -> u16 {
    let shifted = (value.get() as u16) << 9;
    if value.get() <= 0x40 {
        return shifted;
    }
    let repeat = (value.get() as u16) & 0b11_1111;
    shifted | (repeat << 3) | (repeat >> 3)
}

/// Scale a 16-bit value down to 7 bits by truncation.
#[must_use]
pub const fn scale_16_to_7(value: u16) -> U7 {
    U7((value >> 9) as u8)
}

/// Scale a 7-bit value to 32 bits per the MIDI 2.0 scaling rules.
#[must_use]
pub const fn scale_7_to_32(value: U7) -> u32 {
    let mut shifted = (value.get() as u32) << 25;
    if value.get() <= 0x40 {
        return shifted;
    }
    let mut repeat = (value.get() as u32) & 0b11_1111;
    repeat <<= 19;
    while repeat != 0 {
        shifted |= repeat;
        repeat >>= 6;
    }
    shifted
}

/// Scale a 32-bit value down to 7 bits by truncation.
#[must_use]
pub const fn scale_32_to_7(value: u32) -> U7 {
    U7((value >> 25) as u8)
}

/// Scale a 14-bit value to 32 bits per the MIDI 2.0 scaling rules.
#[must_use]
pub const fn scale_14_to_32(value: U14) -> u32 {
    let mut shifted = (value.get() as u32) << 18;
    if value.get() <= 0x2000 {
        return shifted;
    }
    let mut repeat = (value.get() as u32) & 0b1_1111_1111_1111;
    repeat <<= 5;
    while repeat != 0 {
        shifted |= repeat;
        repeat >>= 13;
    }
    shifted
}

/// Scale a 32-bit value down to 14 bits by truncation.
#[must_use]
pub const fn scale_32_to_14(value: u32) -> U14 {
    U14((value >> 18) as u16)
}
