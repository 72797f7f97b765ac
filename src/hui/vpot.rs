//! V-Pot identities, LED ring display and signed delta encoding
//!
//! Each V-Pot has a ring of 11 LEDs plus a single LED underneath. The host
//! drives the ring with a 7-bit preset index: the low 6 bits select one of
//! four preset families (single LED, center-to, left-to, symmetrical
//! spread) and bit `0x40` lights the lower LED. In the opposite direction
//! the surface reports knob rotation as a sign-magnitude 7-bit delta, which
//! is also the encoding the jog wheel uses.

/// Identity of a rotary V-Pot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HuiVPot {
    /// Channel strip V-Pot, strip index `0..=7`
    Channel(u8),
    /// Edit/Assign section pot A
    EditAssignA,
    /// Edit/Assign section pot B
    EditAssignB,
    /// Edit/Assign section pot C
    EditAssignC,
    /// Edit/Assign section pot D
    EditAssignD,
    /// Edit/Assign scroll pot
    EditAssignScroll,
}

impl HuiVPot {
    /// Wire pot number `0x0..=0xC`.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Channel(n) => n,
            Self::EditAssignA => 0x8,
            Self::EditAssignB => 0x9,
            Self::EditAssignC => 0xA,
            Self::EditAssignD => 0xB,
            Self::EditAssignScroll => 0xC,
        }
    }

    /// Looks up a pot by wire number; `None` above `0xC`.
    #[must_use]
    pub const fn from_number(number: u8) -> Option<Self> {
        match number {
            0x0..=0x7 => Some(Self::Channel(number)),
            0x8 => Some(Self::EditAssignA),
            0x9 => Some(Self::EditAssignB),
            0xA => Some(Self::EditAssignC),
            0xB => Some(Self::EditAssignD),
            0xC => Some(Self::EditAssignScroll),
            _ => None,
        }
    }
}

/// LED ring position `0..=10`; index 5 is the center LED.
pub type Led = u8;

/// Preset LED ring states.
///
/// The wire encodes a family in the high nibble of the 6-bit preset value
/// and a 1-based LED index in the low nibble; low nibble zero is all-off in
/// every family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VPotLedState {
    /// No ring LEDs lit
    #[default]
    AllOff,
    /// A single LED
    Single(Led),
    /// From the center LED out to the given LED
    CenterTo(Led),
    /// From the leftmost LED to the given LED
    LeftTo(Led),
    /// Symmetrical spread from the center, `width` LEDs to each side
    /// (`1..=6`, where 6 lights the full ring)
    CenterSymmetrical(u8),
}

impl VPotLedState {
    /// Decodes the low 6 bits of a preset index.
    #[must_use]
    pub fn from_raw(raw: u8) -> Self {
        let raw = raw & 0x3F;
        let family = raw >> 4;
        let index = raw & 0x0F;
        if index == 0 {
            return Self::AllOff;
        }
        let led = index - 1;
        match family {
            0x0 if led <= 10 => Self::Single(led),
            0x1 if led <= 10 => Self::CenterTo(led),
            0x2 if led <= 10 => Self::LeftTo(led),
            0x3 => match index {
                0x1..=0x5 => Self::CenterSymmetrical(index),
                0x6..=0xB => Self::CenterSymmetrical(6),
                _ => Self::AllOff,
            },
            _ => Self::AllOff,
        }
    }

    /// The 6-bit preset index for this state.
    #[must_use]
    pub fn raw(self) -> u8 {
        match self {
            Self::AllOff => 0x00,
            Self::Single(led) => 0x01 + led.min(10),
            Self::CenterTo(led) => 0x11 + led.min(10),
            Self::LeftTo(led) => 0x21 + led.min(10),
            Self::CenterSymmetrical(width) => 0x30 + width.clamp(1, 6),
        }
    }

    /// The physical 11-LED pattern, most significant bit = leftmost LED.
    #[must_use]
    pub fn bit_pattern(self) -> u16 {
        LED_MATRIX[self.raw() as usize]
    }

    /// The ring as 11 booleans, leftmost LED first.
    #[must_use]
    pub fn led_array(self) -> [bool; 11] {
        let bits = self.bit_pattern();
        let mut out = [false; 11];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = bits >> (10 - i) & 1 == 1;
        }
        out
    }
}

/// Physical LED patterns for every preset index `0x00..=0x3F`.
///
/// Unused slots decode to all-off.
const LED_MATRIX: [u16; 64] = [
    // 0x00..=0x0B: single LED
    0b000_0000_0000,
    0b100_0000_0000,
    0b010_0000_0000,
    0b001_0000_0000,
    0b000_1000_0000,
    0b000_0100_0000,
    0b000_0010_0000,
    0b000_0001_0000,
    0b000_0000_1000,
    0b000_0000_0100,
    0b000_0000_0010,
    0b000_0000_0001,
    // 0x0C..=0x0F unused
    0, 0, 0, 0,
    // 0x10..=0x1B: center to LED
    0b000_0000_0000,
    0b111_1110_0000,
    0b011_1110_0000,
    0b001_1110_0000,
    0b000_1110_0000,
    0b000_0110_0000,
    0b000_0010_0000,
    0b000_0011_0000,
    0b000_0011_1000,
    0b000_0011_1100,
    0b000_0011_1110,
    0b000_0011_1111,
    // 0x1C..=0x1F unused
    0, 0, 0, 0,
    // 0x20..=0x2B: left to LED
    0b000_0000_0000,
    0b100_0000_0000,
    0b110_0000_0000,
    0b111_0000_0000,
    0b111_1000_0000,
    0b111_1100_0000,
    0b111_1110_0000,
    0b111_1111_0000,
    0b111_1111_1000,
    0b111_1111_1100,
    0b111_1111_1110,
    0b111_1111_1111,
    // 0x2C..=0x2F unused
    0, 0, 0, 0,
    // 0x30..=0x3B: symmetrical spread from center
    0b000_0000_0000,
    0b000_0010_0000,
    0b000_0111_0000,
    0b000_1111_1000,
    0b001_1111_1100,
    0b011_1111_1110,
    0b111_1111_1111,
    0b111_1111_1111,
    0b111_1111_1111,
    0b111_1111_1111,
    0b111_1111_1111,
    0b111_1111_1111,
    // 0x3C..=0x3F unused
    0, 0, 0, 0,
];

/// Full V-Pot readout: the ring plus the lower LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VPotDisplay {
    /// Ring LED state
    pub leds: VPotLedState,
    /// Single LED centered under the pot
    pub lower_led: bool,
}

impl VPotDisplay {
    /// Decodes a raw preset index `0x00..=0x7F`.
    #[must_use]
    pub fn from_raw(raw: u8) -> Self {
        Self {
            leds: VPotLedState::from_raw(raw),
            lower_led: raw & 0x40 != 0,
        }
    }

    /// Raw preset index for the wire.
    #[must_use]
    pub fn raw(self) -> u8 {
        self.leds.raw() | if self.lower_led { 0x40 } else { 0x00 }
    }
}

/// Encodes a signed rotation delta to the sign-magnitude wire byte.
///
/// Clamped to `-63..=63`; bit `0x40` set means positive.
#[must_use]
pub fn encode_delta(delta: i8) -> u8 {
    let magnitude = (delta.unsigned_abs()).min(63);
    if delta < 0 { magnitude } else { magnitude | 0x40 }
}

/// Decodes a sign-magnitude wire byte to a signed rotation delta.
#[must_use]
pub fn decode_delta(raw: u8) -> i8 {
    let magnitude = (raw & 0x3F) as i8;
    if raw & 0x40 == 0 { -magnitude } else { magnitude }
}
