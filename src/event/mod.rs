//! Typed MIDI event model
//!
//! [`MidiEvent`] is the protocol-neutral representation both codecs decode
//! into and encode from. Channel-voice variants carry their channel and UMP
//! group inline; values that exist at two resolutions (7 vs 16/32 bits) are
//! held in the dual-resolution wrappers from [`value`] so an event decoded
//! from a MIDI 1.0 byte stream compares equal to the same event decoded from
//! a MIDI 2.0 packet stream.

mod sysex;
mod value;

pub use sysex::{ManufacturerId, UniversalKind};
pub use value::{Value7, Value14, Velocity};

pub(crate) use sysex::{SysExHeader, split_payload};

use bytes::Bytes;

use crate::num::{U4, U7, U14};

/// Wire protocol selector for UMP encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MidiProtocol {
    /// MIDI 1.0 semantics (UMP message type 0x2, 7/14-bit values)
    Midi1,
    /// MIDI 2.0 semantics (UMP message type 0x4, 16/32-bit values)
    Midi2,
}

/// A single decoded MIDI event
///
/// Immutable value semantics throughout. `group` is the UMP group the event
/// was carried in; events decoded from a MIDI 1.0 byte stream always report
/// group 0 and ignore the group on encode.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)]
pub enum MidiEvent {
    // -- channel voice --
    NoteOff {
        note: U7,
        velocity: Velocity,
        channel: U4,
        group: U4,
    },
    NoteOn {
        note: U7,
        velocity: Velocity,
        channel: U4,
        group: U4,
    },
    /// Polyphonic (per-note) pressure
    NotePressure {
        note: U7,
        amount: Value7,
        channel: U4,
        group: U4,
    },
    /// Per-note management flags (MIDI 2.0 only)
    NoteManagement {
        note: U7,
        detach: bool,
        reset: bool,
        channel: U4,
        group: U4,
    },
    ControlChange {
        controller: U7,
        value: Value7,
        channel: U4,
        group: U4,
    },
    /// Program change, optionally with a bank select (MIDI 2.0 carries the
    /// bank in the same packet; MIDI 1.0 encodes it as two leading CCs)
    ProgramChange {
        program: U7,
        bank: Option<U14>,
        channel: U4,
        group: U4,
    },
    ChannelPressure {
        amount: Value7,
        channel: U4,
        group: U4,
    },
    PitchBend {
        value: Value14,
        channel: U4,
        group: U4,
    },
    /// Registered parameter number with optional data entry bytes
    Rpn {
        parameter: (U7, U7),
        data_msb: Option<U7>,
        data_lsb: Option<U7>,
        channel: U4,
        group: U4,
    },
    /// Non-registered parameter number with optional data entry bytes
    Nrpn {
        parameter: (U7, U7),
        data_msb: Option<U7>,
        data_lsb: Option<U7>,
        channel: U4,
        group: U4,
    },

    // -- system common --
    TimecodeQuarterFrame {
        data_byte: U7,
        group: U4,
    },
    SongPositionPointer {
        beat: U14,
        group: U4,
    },
    SongSelect {
        number: U7,
        group: U4,
    },
    TuneRequest {
        group: U4,
    },

    // -- system real-time --
    TimingClock {
        group: U4,
    },
    Start {
        group: U4,
    },
    Continue {
        group: U4,
    },
    Stop {
        group: U4,
    },
    ActiveSensing {
        group: U4,
    },
    SystemReset {
        group: U4,
    },

    // -- system exclusive --
    /// Manufacturer-specific SysEx, 7-bit payload (framing bytes excluded)
    SysEx7 {
        manufacturer: ManufacturerId,
        data: Bytes,
        group: U4,
    },
    /// Universal SysEx (stream ID 0x7E/0x7F), 7-bit payload
    UniversalSysEx7 {
        kind: UniversalKind,
        device_id: U7,
        sub_id1: U7,
        sub_id2: U7,
        data: Bytes,
        group: U4,
    },
    /// 8-bit-clean SysEx (UMP only)
    SysEx8 {
        stream_id: u8,
        data: Bytes,
        group: U4,
    },

    // -- utility (UMP only) --
    NoOp {
        group: U4,
    },
    JrClock {
        time: u16,
        group: U4,
    },
    JrTimestamp {
        time: u16,
        group: U4,
    },
}

impl MidiEvent {
    /// The UMP group this event was carried in (0 for byte-stream sources)
    #[must_use]
    pub const fn group(&self) -> U4 {
        match self {
            Self::NoteOff { group, .. }
            | Self::NoteOn { group, .. }
            | Self::NotePressure { group, .. }
            | Self::NoteManagement { group, .. }
            | Self::ControlChange { group, .. }
            | Self::ProgramChange { group, .. }
            | Self::ChannelPressure { group, .. }
            | Self::PitchBend { group, .. }
            | Self::Rpn { group, .. }
            | Self::Nrpn { group, .. }
            | Self::TimecodeQuarterFrame { group, .. }
            | Self::SongPositionPointer { group, .. }
            | Self::SongSelect { group, .. }
            | Self::TuneRequest { group }
            | Self::TimingClock { group }
            | Self::Start { group }
            | Self::Continue { group }
            | Self::Stop { group }
            | Self::ActiveSensing { group }
            | Self::SystemReset { group }
            | Self::SysEx7 { group, .. }
            | Self::UniversalSysEx7 { group, .. }
            | Self::SysEx8 { group, .. }
            | Self::NoOp { group }
            | Self::JrClock { group, .. }
            | Self::JrTimestamp { group, .. } => *group,
        }
    }

    /// The channel for channel-voice events, `None` for system events
    #[must_use]
    pub const fn channel(&self) -> Option<U4> {
        match self {
            Self::NoteOff { channel, .. }
            | Self::NoteOn { channel, .. }
            | Self::NotePressure { channel, .. }
            | Self::NoteManagement { channel, .. }
            | Self::ControlChange { channel, .. }
            | Self::ProgramChange { channel, .. }
            | Self::ChannelPressure { channel, .. }
            | Self::PitchBend { channel, .. }
            | Self::Rpn { channel, .. }
            | Self::Nrpn { channel, .. } => Some(*channel),
            _ => None,
        }
    }

    /// Short name for diagnostics and error reporting
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::NoteOff { .. } => "note off",
            Self::NoteOn { .. } => "note on",
            Self::NotePressure { .. } => "note pressure",
            Self::NoteManagement { .. } => "note management",
            Self::ControlChange { .. } => "control change",
            Self::ProgramChange { .. } => "program change",
            Self::ChannelPressure { .. } => "channel pressure",
            Self::PitchBend { .. } => "pitch bend",
            Self::Rpn { .. } => "rpn",
            Self::Nrpn { .. } => "nrpn",
            Self::TimecodeQuarterFrame { .. } => "timecode quarter frame",
            Self::SongPositionPointer { .. } => "song position pointer",
            Self::SongSelect { .. } => "song select",
            Self::TuneRequest { .. } => "tune request",
            Self::TimingClock { .. } => "timing clock",
            Self::Start { .. } => "start",
            Self::Continue { .. } => "continue",
            Self::Stop { .. } => "stop",
            Self::ActiveSensing { .. } => "active sensing",
            Self::SystemReset { .. } => "system reset",
            Self::SysEx7 { .. } => "sysex7",
            Self::UniversalSysEx7 { .. } => "universal sysex7",
            Self::SysEx8 { .. } => "sysex8",
            Self::NoOp { .. } => "no-op",
            Self::JrClock { .. } => "jr clock",
            Self::JrTimestamp { .. } => "jr timestamp",
        }
    }
}

impl std::fmt::Display for MidiEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_compare_across_resolutions() {
        let from_midi1 = MidiEvent::NoteOn {
            note: U7::new(60).unwrap(),
            velocity: Velocity::Midi1(U7::new(0x40).unwrap()),
            channel: U4::MIN,
            group: U4::MIN,
        };
        let from_ump = MidiEvent::NoteOn {
            note: U7::new(60).unwrap(),
            velocity: Velocity::Midi2(0x8000),
            channel: U4::MIN,
            group: U4::MIN,
        };
        assert_eq!(from_midi1, from_ump);
    }

    #[test]
    fn channel_accessor() {
        let cc = MidiEvent::ControlChange {
            controller: U7::new(7).unwrap(),
            value: Value7::Midi1(U7::new(100).unwrap()),
            channel: U4::new(9).unwrap(),
            group: U4::MIN,
        };
        assert_eq!(cc.channel(), U4::new(9));
        assert_eq!(MidiEvent::TuneRequest { group: U4::MIN }.channel(), None);
    }
}
