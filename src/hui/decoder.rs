//! Stateful decoders for the two HUI traffic directions
//!
//! Several HUI messages span more than one MIDI event: a fader position is
//! an MSB controller followed by an LSB controller, and a switch is a zone
//! select followed by a port/state pair. Each decoder instance owns that
//! pending state, so use one decoder per stream and feed it every event in
//! arrival order.

use tracing::debug;

use crate::error::{Error, Result};
use crate::event::{ManufacturerId, MidiEvent};
use crate::num::{U7, U14};

use super::display::{LargeDisplaySlice, SmallDisplay, TimeDisplayChar};
use super::event::{HuiHostEvent, HuiSurfaceEvent, MeterSide};
use super::switch::HuiSwitch;
use super::vpot::{HuiVPot, VPotDisplay, decode_delta};
use super::{
    CC_FADER_LSB_BASE, CC_FADER_MSB_BASE, CC_JOG, CC_PORT_TO_HOST, CC_PORT_TO_SURFACE,
    CC_VPOT_TO_HOST_BASE, CC_VPOT_TO_SURFACE_BASE, CC_ZONE_TO_HOST, CC_ZONE_TO_SURFACE,
    DISPLAY_LARGE, DISPLAY_SMALL, DISPLAY_TIME, MACKIE, STATE_IGNORED, STATE_OFF, STATE_ON,
    SYSEX_SUB_IDS,
};

/// Pending multi-event state shared by both decoder directions.
#[derive(Debug, Default)]
struct PartialState {
    fader_msb: [Option<U7>; 8],
    zone: Option<u8>,
}

impl PartialState {
    fn fader_msb(&mut self, channel: u8, value: U7) {
        self.fader_msb[channel as usize] = Some(value);
    }

    fn fader_complete(&mut self, channel: u8, lsb: U7) -> Option<U14> {
        let Some(msb) = self.fader_msb[channel as usize].take() else {
            debug!(channel, "fader LSB with no buffered MSB, dropping");
            return None;
        };
        Some(U14::from_pair(msb, lsb))
    }

    /// Resolves a port/state byte against the pending zone select.
    ///
    /// The zone select stays armed afterwards; a host may address several
    /// ports in the same zone without repeating it.
    fn switch(&self, value: u8) -> Option<(HuiSwitch, bool)> {
        let Some(zone) = self.zone else {
            debug!(value, "switch port/state with no zone select, dropping");
            return None;
        };
        let port = value & 0x0F;
        let on = match value >> 4 {
            STATE_ON => true,
            STATE_OFF => false,
            STATE_IGNORED => {
                debug!(zone, port, "switch state 0x2 (ignored), dropping");
                return None;
            }
            state => {
                debug!(zone, port, state, "unknown switch state nibble, dropping");
                return None;
            }
        };
        Some((HuiSwitch::from_zone_port(zone, port), on))
    }
}

/// Decodes host-to-surface traffic; runs on the surface side.
#[derive(Debug, Default)]
pub struct HuiHostEventDecoder {
    partial: PartialState,
}

impl HuiHostEventDecoder {
    /// Creates a decoder with no pending state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes one MIDI event into zero or more HUI events.
    ///
    /// Zero events means the input was consumed as the first half of a
    /// multi-event message, or was a recoverable malformation that has been
    /// logged and skipped.
    ///
    /// # Errors
    ///
    /// [`Error::NotHui`] when the event is not HUI traffic at all and
    /// [`Error::MalformedHui`] when a recognized HUI message carries
    /// out-of-range content.
    pub fn decode(&mut self, event: &MidiEvent) -> Result<Vec<HuiHostEvent>> {
        match event {
            MidiEvent::NoteOn { note, velocity, .. }
            | MidiEvent::NoteOff { note, velocity, .. } => {
                // a velocity-0 note on arrives as a note off
                if note.get() == 0 && velocity.midi1().get() == 0 {
                    Ok(vec![HuiHostEvent::Ping])
                } else {
                    Err(Error::NotHui {
                        detail: "note message is not a HUI ping",
                    })
                }
            }
            MidiEvent::NotePressure { note, amount, .. } => {
                let raw = amount.midi1().get();
                let side = match raw >> 4 {
                    0x0 => MeterSide::Left,
                    0x1 => MeterSide::Right,
                    _ => {
                        return Err(Error::MalformedHui {
                            detail: "level meter side nibble",
                        });
                    }
                };
                let level = raw & 0x0F;
                if note.get() > 7 || level > 0xC {
                    return Err(Error::MalformedHui {
                        detail: "level meter channel or segment count",
                    });
                }
                Ok(vec![HuiHostEvent::LevelMeter {
                    channel: note.get(),
                    side,
                    level,
                }])
            }
            MidiEvent::ControlChange {
                controller,
                value,
                channel,
                ..
            } => {
                if channel.get() != 0 {
                    return Err(Error::NotHui {
                        detail: "control change on a non-HUI channel",
                    });
                }
                let value = value.midi1();
                match controller.get() {
                    c @ CC_FADER_MSB_BASE..=0x07 => {
                        self.partial.fader_msb(c, value);
                        Ok(vec![])
                    }
                    c @ CC_FADER_LSB_BASE..=0x27 => {
                        Ok(match self.partial.fader_complete(c - CC_FADER_LSB_BASE, value) {
                            Some(level) => vec![HuiHostEvent::FaderLevel {
                                channel: c - CC_FADER_LSB_BASE,
                                level,
                            }],
                            None => vec![],
                        })
                    }
                    c @ CC_VPOT_TO_SURFACE_BASE..=0x1C => Ok(vec![HuiHostEvent::VPotRing {
                        vpot: HuiVPot::from_number(c - CC_VPOT_TO_SURFACE_BASE)
                            .unwrap_or(HuiVPot::Channel(0)),
                        display: VPotDisplay::from_raw(value.get()),
                    }]),
                    CC_ZONE_TO_SURFACE => {
                        self.partial.zone = Some(value.get());
                        Ok(vec![])
                    }
                    CC_PORT_TO_SURFACE => Ok(match self.partial.switch(value.get()) {
                        Some((switch, on)) => vec![HuiHostEvent::Switch { switch, on }],
                        None => vec![],
                    }),
                    _ => Err(Error::NotHui {
                        detail: "unrecognized host controller",
                    }),
                }
            }
            MidiEvent::SysEx7 {
                manufacturer, data, ..
            } => decode_display_sysex(*manufacturer, data),
            MidiEvent::SystemReset { .. } => Ok(vec![HuiHostEvent::SystemReset]),
            _ => Err(Error::NotHui {
                detail: "event type has no HUI meaning",
            }),
        }
    }
}

/// Decodes surface-to-host traffic; runs on the host side.
#[derive(Debug, Default)]
pub struct HuiSurfaceEventDecoder {
    partial: PartialState,
}

impl HuiSurfaceEventDecoder {
    /// Creates a decoder with no pending state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes one MIDI event into zero or more HUI events.
    ///
    /// Zero events means the input was consumed as the first half of a
    /// multi-event message, or was a recoverable malformation that has been
    /// logged and skipped.
    ///
    /// # Errors
    ///
    /// [`Error::NotHui`] when the event is not HUI traffic at all.
    pub fn decode(&mut self, event: &MidiEvent) -> Result<Vec<HuiSurfaceEvent>> {
        match event {
            MidiEvent::NoteOn { note, velocity, .. } => {
                if note.get() == 0 && velocity.midi1().get() == 0x7F {
                    Ok(vec![HuiSurfaceEvent::Ping])
                } else {
                    Err(Error::NotHui {
                        detail: "note message is not a HUI ping reply",
                    })
                }
            }
            MidiEvent::ControlChange {
                controller,
                value,
                channel,
                ..
            } => {
                if channel.get() != 0 {
                    return Err(Error::NotHui {
                        detail: "control change on a non-HUI channel",
                    });
                }
                let value = value.midi1();
                match controller.get() {
                    c @ CC_FADER_MSB_BASE..=0x07 => {
                        self.partial.fader_msb(c, value);
                        Ok(vec![])
                    }
                    c @ CC_FADER_LSB_BASE..=0x27 => {
                        Ok(match self.partial.fader_complete(c - CC_FADER_LSB_BASE, value) {
                            Some(level) => vec![HuiSurfaceEvent::FaderLevel {
                                channel: c - CC_FADER_LSB_BASE,
                                level,
                            }],
                            None => vec![],
                        })
                    }
                    CC_JOG => Ok(vec![HuiSurfaceEvent::JogWheel {
                        delta: decode_delta(value.get()),
                    }]),
                    c @ CC_VPOT_TO_HOST_BASE..=0x4C => Ok(vec![HuiSurfaceEvent::VPotDelta {
                        vpot: HuiVPot::from_number(c - CC_VPOT_TO_HOST_BASE)
                            .unwrap_or(HuiVPot::Channel(0)),
                        delta: decode_delta(value.get()),
                    }]),
                    CC_ZONE_TO_HOST => {
                        self.partial.zone = Some(value.get());
                        Ok(vec![])
                    }
                    CC_PORT_TO_HOST => Ok(match self.partial.switch(value.get()) {
                        Some((switch, on)) => vec![HuiSurfaceEvent::Switch {
                            switch,
                            pressed: on,
                        }],
                        None => vec![],
                    }),
                    _ => Err(Error::NotHui {
                        detail: "unrecognized surface controller",
                    }),
                }
            }
            MidiEvent::SystemReset { .. } => Ok(vec![HuiSurfaceEvent::SystemReset]),
            _ => Err(Error::NotHui {
                detail: "event type has no HUI meaning",
            }),
        }
    }
}

/// Parses a Mackie display SysEx body into display events.
fn decode_display_sysex(manufacturer: ManufacturerId, data: &[u8]) -> Result<Vec<HuiHostEvent>> {
    if manufacturer != MACKIE {
        return Err(Error::NotHui {
            detail: "SysEx manufacturer is not Mackie",
        });
    }
    let Some(body) = data.strip_prefix(&SYSEX_SUB_IDS) else {
        return Err(Error::NotHui {
            detail: "SysEx sub IDs are not HUI",
        });
    };
    let [display_type, payload @ ..] = body else {
        return Err(Error::MalformedHui {
            detail: "display SysEx with no type byte",
        });
    };
    match *display_type {
        DISPLAY_SMALL => {
            let mut out = Vec::with_capacity(payload.len() / 5);
            for group in payload.chunks(5) {
                let [channel, codes @ ..] = group else {
                    unreachable!()
                };
                if codes.len() != 4 {
                    return Err(Error::MalformedHui {
                        detail: "small display group shorter than 5 bytes",
                    });
                }
                let text = SmallDisplay::from_codes(&display_codes(codes)?);
                out.push(match channel {
                    0..=7 => HuiHostEvent::ChannelName {
                        channel: *channel,
                        text,
                    },
                    8 => HuiHostEvent::SelectAssign { text },
                    _ => {
                        return Err(Error::MalformedHui {
                            detail: "small display channel above 8",
                        });
                    }
                });
            }
            Ok(out)
        }
        DISPLAY_LARGE => {
            let mut out = Vec::with_capacity(payload.len() / 11);
            for group in payload.chunks(11) {
                let [slice, codes @ ..] = group else {
                    unreachable!()
                };
                if codes.len() != 10 {
                    return Err(Error::MalformedHui {
                        detail: "large display slice shorter than 11 bytes",
                    });
                }
                if *slice > 7 {
                    return Err(Error::MalformedHui {
                        detail: "large display slice index above 7",
                    });
                }
                out.push(HuiHostEvent::LargeDisplay {
                    slice: *slice,
                    text: LargeDisplaySlice::from_codes(&display_codes(codes)?),
                });
            }
            Ok(out)
        }
        DISPLAY_TIME => {
            if payload.is_empty() || payload.len() > 8 {
                return Err(Error::MalformedHui {
                    detail: "time display update length",
                });
            }
            let chars = display_codes(payload)?
                .iter()
                .map(|&code| TimeDisplayChar::from_code(code))
                .collect();
            Ok(vec![HuiHostEvent::TimeDisplay { chars }])
        }
        _ => Err(Error::MalformedHui {
            detail: "unknown display type byte",
        }),
    }
}

fn display_codes(bytes: &[u8]) -> Result<Vec<U7>> {
    bytes
        .iter()
        .map(|&b| {
            U7::new(b).ok_or(Error::MalformedHui {
                detail: "8-bit display code",
            })
        })
        .collect()
}
