//! Typed HUI messages and their MIDI encodings
//!
//! Traffic is asymmetric: [`HuiHostEvent`] is what a DAW sends to the
//! surface (LED and display state, fader positions, pings),
//! [`HuiSurfaceEvent`] is what the surface sends back (switch presses,
//! fader moves, pot deltas, ping replies). Everything rides on MIDI channel
//! 0; displays travel as Mackie SysEx.

use bytes::Bytes;

use crate::event::{MidiEvent, Value7, Velocity};
use crate::num::{U4, U7, U14};

use super::display::{LargeDisplaySlice, SmallDisplay, TimeDisplayChar};
use super::switch::HuiSwitch;
use super::vpot::{HuiVPot, VPotDisplay, encode_delta};
use super::{
    CC_FADER_LSB_BASE, CC_FADER_MSB_BASE, CC_JOG, CC_PORT_TO_HOST, CC_PORT_TO_SURFACE,
    CC_VPOT_TO_HOST_BASE, CC_VPOT_TO_SURFACE_BASE, CC_ZONE_TO_HOST, CC_ZONE_TO_SURFACE,
    DISPLAY_LARGE, DISPLAY_SMALL, DISPLAY_TIME, MACKIE, STATE_OFF, STATE_ON, SYSEX_SUB_IDS,
};

/// Which side of a stereo level meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MeterSide {
    /// Left channel (wire nibble 0)
    Left,
    /// Right channel (wire nibble 1)
    Right,
}

impl MeterSide {
    pub(super) const fn nibble(self) -> u8 {
        match self {
            Self::Left => 0x0,
            Self::Right => 0x1,
        }
    }
}

/// A message from the host (DAW) to the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HuiHostEvent {
    /// Keep-alive ping, sent roughly once a second
    Ping,
    /// Move a motorized fader, strip `0..=7`
    FaderLevel {
        /// Channel strip index
        channel: u8,
        /// 14-bit fader position
        level: U14,
    },
    /// Drive a V-Pot LED ring
    VPotRing {
        /// Which pot
        vpot: HuiVPot,
        /// Ring and lower LED state
        display: VPotDisplay,
    },
    /// Drive one side of a strip's stereo level meter
    LevelMeter {
        /// Channel strip index `0..=7`
        channel: u8,
        /// Meter side
        side: MeterSide,
        /// Segment count `0..=0xC`
        level: u8,
    },
    /// Set a switch LED
    Switch {
        /// Which switch
        switch: HuiSwitch,
        /// LED on or off
        on: bool,
    },
    /// Set a channel strip's 4-character name display, strip `0..=7`
    ChannelName {
        /// Channel strip index
        channel: u8,
        /// Display text
        text: SmallDisplay,
    },
    /// Set the Select Assign 4-character display
    SelectAssign {
        /// Display text
        text: SmallDisplay,
    },
    /// Set one 10-character slice of the large display, slice `0..=7`
    LargeDisplay {
        /// Slice index; `0..=3` top row, `4..=7` bottom row
        slice: u8,
        /// Slice text
        text: LargeDisplaySlice,
    },
    /// Partial time display update, rightmost character first
    TimeDisplay {
        /// New characters starting from the rightmost position
        chars: Vec<TimeDisplayChar>,
    },
    /// Surface power-cycle announcement
    SystemReset,
}

impl HuiHostEvent {
    /// Encodes to the MIDI events a host would transmit.
    #[must_use]
    pub fn encode(&self) -> Vec<MidiEvent> {
        match self {
            Self::Ping => vec![ping(0x00)],
            Self::FaderLevel { channel, level } => fader(*channel, *level),
            Self::VPotRing { vpot, display } => {
                vec![cc(CC_VPOT_TO_SURFACE_BASE + vpot.number(), display.raw())]
            }
            Self::LevelMeter {
                channel,
                side,
                level,
            } => vec![MidiEvent::NotePressure {
                note: U7::new_truncated(*channel),
                amount: Value7::Midi1(U7::new_truncated(side.nibble() << 4 | (*level).min(0xC))),
                channel: U4::MIN,
                group: U4::MIN,
            }],
            Self::Switch { switch, on } => {
                switch_pair(*switch, *on, CC_ZONE_TO_SURFACE, CC_PORT_TO_SURFACE)
            }
            Self::ChannelName { channel, text } => {
                small_display((*channel).min(7), text)
            }
            Self::SelectAssign { text } => small_display(8, text),
            Self::LargeDisplay { slice, text } => {
                let mut body = vec![DISPLAY_LARGE, (*slice).min(7)];
                for code in text.codes() {
                    body.push(code.get());
                }
                vec![display_sysex(body)]
            }
            Self::TimeDisplay { chars } => {
                let mut body = vec![DISPLAY_TIME];
                for c in chars.iter().take(8) {
                    body.push(c.code().get());
                }
                vec![display_sysex(body)]
            }
            Self::SystemReset => vec![MidiEvent::SystemReset { group: U4::MIN }],
        }
    }
}

/// A message from the surface to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HuiSurfaceEvent {
    /// Ping reply
    Ping,
    /// Fader moved by hand, strip `0..=7`
    FaderLevel {
        /// Channel strip index
        channel: u8,
        /// 14-bit fader position
        level: U14,
    },
    /// V-Pot rotated
    VPotDelta {
        /// Which pot
        vpot: HuiVPot,
        /// Signed rotation amount, clamped to `-63..=63`
        delta: i8,
    },
    /// Jog wheel rotated
    JogWheel {
        /// Signed rotation amount, clamped to `-63..=63`
        delta: i8,
    },
    /// Switch pressed or released
    Switch {
        /// Which switch
        switch: HuiSwitch,
        /// Pressed (true) or released
        pressed: bool,
    },
    /// Surface power-cycle announcement
    SystemReset,
}

impl HuiSurfaceEvent {
    /// Encodes to the MIDI events a surface would transmit.
    #[must_use]
    pub fn encode(&self) -> Vec<MidiEvent> {
        match self {
            Self::Ping => vec![ping(0x7F)],
            Self::FaderLevel { channel, level } => fader(*channel, *level),
            Self::VPotDelta { vpot, delta } => {
                vec![cc(CC_VPOT_TO_HOST_BASE + vpot.number(), encode_delta(*delta))]
            }
            Self::JogWheel { delta } => vec![cc(CC_JOG, encode_delta(*delta))],
            Self::Switch { switch, pressed } => {
                switch_pair(*switch, *pressed, CC_ZONE_TO_HOST, CC_PORT_TO_HOST)
            }
            Self::SystemReset => vec![MidiEvent::SystemReset { group: U4::MIN }],
        }
    }
}

/// Keep-alive note message; velocity 0 pings, 0x7F replies.
fn ping(velocity: u8) -> MidiEvent {
    MidiEvent::NoteOn {
        note: U7::MIN,
        velocity: Velocity::Midi1(U7::new_truncated(velocity)),
        channel: U4::MIN,
        group: U4::MIN,
    }
}

fn cc(controller: u8, value: u8) -> MidiEvent {
    MidiEvent::ControlChange {
        controller: U7::new_truncated(controller),
        value: Value7::Midi1(U7::new_truncated(value)),
        channel: U4::MIN,
        group: U4::MIN,
    }
}

fn fader(channel: u8, level: U14) -> Vec<MidiEvent> {
    let channel = channel.min(7);
    vec![
        cc(CC_FADER_MSB_BASE + channel, level.msb().get()),
        cc(CC_FADER_LSB_BASE + channel, level.lsb().get()),
    ]
}

fn switch_pair(switch: HuiSwitch, on: bool, zone_cc: u8, port_cc: u8) -> Vec<MidiEvent> {
    let (zone, port) = switch.zone_and_port();
    let state = if on { STATE_ON } else { STATE_OFF };
    vec![cc(zone_cc, zone), cc(port_cc, state << 4 | port)]
}

fn small_display(channel: u8, text: &SmallDisplay) -> Vec<MidiEvent> {
    let mut body = vec![DISPLAY_SMALL, channel];
    for code in text.codes() {
        body.push(code.get());
    }
    vec![display_sysex(body)]
}

fn display_sysex(body: Vec<u8>) -> MidiEvent {
    let mut data = Vec::with_capacity(body.len() + SYSEX_SUB_IDS.len());
    data.extend_from_slice(&SYSEX_SUB_IDS);
    data.extend_from_slice(&body);
    MidiEvent::SysEx7 {
        manufacturer: MACKIE,
        data: Bytes::from(data),
        group: U4::MIN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hui::switch::Transport;
    use crate::midi1;

    fn bytes_of(events: &[MidiEvent]) -> Vec<u8> {
        events
            .iter()
            .flat_map(|e| midi1::encode(e).unwrap())
            .collect()
    }

    #[test]
    fn ping_and_reply_wire_bytes() {
        assert_eq!(bytes_of(&HuiHostEvent::Ping.encode()), [0x90, 0x00, 0x00]);
        assert_eq!(
            bytes_of(&HuiSurfaceEvent::Ping.encode()),
            [0x90, 0x00, 0x7F]
        );
    }

    #[test]
    fn switch_press_is_zone_then_port() {
        let event = HuiSurfaceEvent::Switch {
            switch: HuiSwitch::Transport(Transport::Play),
            pressed: true,
        };
        assert_eq!(
            bytes_of(&event.encode()),
            [0xB0, 0x0F, 0x0E, 0xB0, 0x2F, 0x44]
        );
        let release = HuiSurfaceEvent::Switch {
            switch: HuiSwitch::Transport(Transport::Play),
            pressed: false,
        };
        assert_eq!(
            bytes_of(&release.encode()),
            [0xB0, 0x0F, 0x0E, 0xB0, 0x2F, 0x04]
        );
    }

    #[test]
    fn fader_level_splits_to_msb_lsb() {
        let event = HuiHostEvent::FaderLevel {
            channel: 2,
            level: U14::new(0x1A2B).unwrap(),
        };
        assert_eq!(
            bytes_of(&event.encode()),
            [0xB0, 0x02, 0x34, 0xB0, 0x22, 0x2B]
        );
    }

    #[test]
    fn channel_name_sysex() {
        let event = HuiHostEvent::ChannelName {
            channel: 3,
            text: SmallDisplay::from_str_lossy("Gtr"),
        };
        assert_eq!(
            bytes_of(&event.encode()),
            [0xF0, 0x00, 0x00, 0x66, 0x05, 0x00, 0x10, 0x03, b'G', b't', b'r', b' ', 0xF7]
        );
    }

    #[test]
    fn vpot_delta_sign_magnitude() {
        let event = HuiSurfaceEvent::VPotDelta {
            vpot: HuiVPot::Channel(4),
            delta: -3,
        };
        assert_eq!(bytes_of(&event.encode()), [0xB0, 0x44, 0x03]);
        let event = HuiSurfaceEvent::JogWheel { delta: 5 };
        assert_eq!(bytes_of(&event.encode()), [0xB0, 0x0D, 0x45]);
    }

    #[test]
    fn out_of_range_indices_clamp_on_encode() {
        let meter = HuiHostEvent::LevelMeter {
            channel: 0,
            side: MeterSide::Left,
            level: 0x3F,
        };
        assert_eq!(bytes_of(&meter.encode()), [0xA0, 0x00, 0x0C]);

        let name = HuiHostEvent::ChannelName {
            channel: 12,
            text: SmallDisplay::from_str_lossy("Kick"),
        };
        assert_eq!(bytes_of(&name.encode())[7], 0x07);

        let slice = HuiHostEvent::LargeDisplay {
            slice: 9,
            text: LargeDisplaySlice::default(),
        };
        assert_eq!(bytes_of(&slice.encode())[7], 0x07);
    }

    #[test]
    fn level_meter_packs_side_and_level() {
        let event = HuiHostEvent::LevelMeter {
            channel: 1,
            side: MeterSide::Right,
            level: 0x9,
        };
        assert_eq!(bytes_of(&event.encode()), [0xA0, 0x01, 0x19]);
    }
}
