//! Stateful MIDI 1.0 byte-stream parser

use tracing::{debug, trace};

use crate::MAX_SYSEX_SIZE;
use crate::event::{MidiEvent, SysExHeader, Value7, Value14, Velocity, split_payload};
use crate::num::{U4, U7, U14};
use crate::pn::PnAccumulator;

/// Number of data bytes following a status byte, by status.
fn data_len(status: u8) -> Option<usize> {
    match status & 0xF0 {
        0x80 | 0x90 | 0xA0 | 0xB0 | 0xE0 => Some(2),
        0xC0 | 0xD0 => Some(1),
        0xF0 => match status {
            0xF1 | 0xF3 => Some(1),
            0xF2 => Some(2),
            0xF6 => Some(0),
            _ => None,
        },
        _ => None,
    }
}

/// Incremental MIDI 1.0 byte-stream decoder.
///
/// One instance per input stream. State carried across [`parse`] calls:
/// running status, an in-flight SysEx payload, and the per-channel RPN/NRPN
/// accumulators.
///
/// [`parse`]: Midi1Parser::parse
#[derive(Debug, Default)]
pub struct Midi1Parser {
    status: Option<u8>,
    data: Vec<u8>,
    sysex: Option<Vec<u8>>,
    pn: PnAccumulator,
}

impl Midi1Parser {
    /// Creates a parser with empty stream state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a buffer of raw bytes, returning every event completed by it.
    ///
    /// Messages left incomplete at the end of the buffer (including an open
    /// SysEx) are held until the next call. Malformed spans are dropped.
    pub fn parse(&mut self, bytes: &[u8]) -> Vec<MidiEvent> {
        let mut out = Vec::new();
        for &byte in bytes {
            self.feed(byte, &mut out);
        }
        self.pn.flush(&mut out);
        out
    }

    fn feed(&mut self, byte: u8, out: &mut Vec<MidiEvent>) {
        // real-time bytes are transparent to any in-progress message
        if byte >= 0xF8 {
            let group = U4::MIN;
            match byte {
                0xF8 => out.push(MidiEvent::TimingClock { group }),
                0xFA => out.push(MidiEvent::Start { group }),
                0xFB => out.push(MidiEvent::Continue { group }),
                0xFC => out.push(MidiEvent::Stop { group }),
                0xFE => out.push(MidiEvent::ActiveSensing { group }),
                0xFF => out.push(MidiEvent::SystemReset { group }),
                _ => trace!(byte, "ignoring undefined real-time byte"),
            }
            return;
        }

        if byte >= 0x80 {
            self.on_status(byte, out);
        } else {
            self.on_data(byte, out);
        }
    }

    fn on_status(&mut self, byte: u8, out: &mut Vec<MidiEvent>) {
        // any status byte terminates an open SysEx, 0xF7 explicitly
        if self.sysex.is_some() {
            self.finish_sysex(out);
            if byte == 0xF7 {
                return;
            }
        } else if byte == 0xF7 {
            trace!("ignoring stray end-of-sysex byte");
            return;
        }

        if let Some(status) = self.status {
            if !self.data.is_empty() {
                debug!(
                    status,
                    collected = self.data.len(),
                    "dropping incomplete message at new status byte"
                );
            }
        }
        self.data.clear();

        match byte {
            0xF0 => {
                self.status = None;
                self.sysex = Some(Vec::new());
            }
            0xF1..=0xF6 => {
                // system common cancels running status
                if data_len(byte) == Some(0) {
                    self.status = None;
                    out.push(MidiEvent::TuneRequest { group: U4::MIN });
                } else if data_len(byte).is_some() {
                    self.status = Some(byte);
                } else {
                    trace!(byte, "ignoring undefined system common byte");
                    self.status = None;
                }
            }
            _ => self.status = Some(byte),
        }
    }

    fn on_data(&mut self, byte: u8, out: &mut Vec<MidiEvent>) {
        if let Some(buf) = &mut self.sysex {
            if buf.len() >= MAX_SYSEX_SIZE {
                debug!(max = MAX_SYSEX_SIZE, "dropping oversized sysex");
                self.sysex = None;
            } else {
                buf.push(byte);
            }
            return;
        }

        let Some(status) = self.status else {
            trace!(byte, "dropping stray data byte");
            return;
        };
        self.data.push(byte);
        let expected = data_len(status).unwrap_or(0);
        if self.data.len() < expected {
            return;
        }

        let data: [u8; 2] = [
            self.data.first().copied().unwrap_or(0),
            self.data.get(1).copied().unwrap_or(0),
        ];
        self.data.clear();
        // running status persists for channel voice only
        if status >= 0xF0 {
            self.status = None;
        }
        self.emit(status, data, out);
    }

    fn emit(&mut self, status: u8, data: [u8; 2], out: &mut Vec<MidiEvent>) {
        let group = U4::MIN;
        let channel = U4::new_truncated(status & 0x0F);
        let d0 = U7::new_truncated(data[0]);
        let d1 = U7::new_truncated(data[1]);

        let event = match status & 0xF0 {
            0x80 => MidiEvent::NoteOff {
                note: d0,
                velocity: Velocity::Midi1(d1),
                channel,
                group,
            },
            // note on with zero velocity is a note off on this wire format
            0x90 if data[1] == 0 => MidiEvent::NoteOff {
                note: d0,
                velocity: Velocity::Midi1(U7::MIN),
                channel,
                group,
            },
            0x90 => MidiEvent::NoteOn {
                note: d0,
                velocity: Velocity::Midi1(d1),
                channel,
                group,
            },
            0xA0 => MidiEvent::NotePressure {
                note: d0,
                amount: Value7::Midi1(d1),
                channel,
                group,
            },
            0xB0 => {
                if self.pn.handle_cc(channel, group, d0, d1, out) {
                    return;
                }
                MidiEvent::ControlChange {
                    controller: d0,
                    value: Value7::Midi1(d1),
                    channel,
                    group,
                }
            }
            0xC0 => MidiEvent::ProgramChange {
                program: d0,
                bank: None,
                channel,
                group,
            },
            0xD0 => MidiEvent::ChannelPressure {
                amount: Value7::Midi1(d0),
                channel,
                group,
            },
            0xE0 => MidiEvent::PitchBend {
                value: Value14::Midi1(U14::from_pair(d1, d0)),
                channel,
                group,
            },
            _ => match status {
                0xF1 => MidiEvent::TimecodeQuarterFrame {
                    data_byte: d0,
                    group,
                },
                0xF2 => MidiEvent::SongPositionPointer {
                    beat: U14::from_pair(d1, d0),
                    group,
                },
                0xF3 => MidiEvent::SongSelect { number: d0, group },
                _ => return,
            },
        };
        out.push(event);
    }

    fn finish_sysex(&mut self, out: &mut Vec<MidiEvent>) {
        let Some(payload) = self.sysex.take() else {
            return;
        };
        match split_payload(&payload) {
            Ok((SysExHeader::Manufacturer(manufacturer), data)) => {
                out.push(MidiEvent::SysEx7 {
                    manufacturer,
                    data,
                    group: U4::MIN,
                });
            }
            Ok((
                SysExHeader::Universal {
                    kind,
                    device_id,
                    sub_id1,
                    sub_id2,
                },
                data,
            )) => {
                out.push(MidiEvent::UniversalSysEx7 {
                    kind,
                    device_id,
                    sub_id1,
                    sub_id2,
                    data,
                    group: U4::MIN,
                });
            }
            Err(err) => debug!(%err, "dropping malformed sysex"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{ManufacturerId, UniversalKind};

    fn note_on(note: u8, vel: u8, ch: u8) -> MidiEvent {
        MidiEvent::NoteOn {
            note: U7::new(note).unwrap(),
            velocity: Velocity::Midi1(U7::new(vel).unwrap()),
            channel: U4::new(ch).unwrap(),
            group: U4::MIN,
        }
    }

    #[test]
    fn basic_channel_voice() {
        let mut parser = Midi1Parser::new();
        let events = parser.parse(&[0x90, 0x3C, 0x64, 0x80, 0x3C, 0x40]);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], note_on(0x3C, 0x64, 0));
        assert_eq!(
            events[1],
            MidiEvent::NoteOff {
                note: U7::new(0x3C).unwrap(),
                velocity: Velocity::Midi1(U7::new(0x40).unwrap()),
                channel: U4::MIN,
                group: U4::MIN,
            }
        );
    }

    #[test]
    fn running_status_spans_calls() {
        let mut parser = Midi1Parser::new();
        let first = parser.parse(&[0x91, 0x40, 0x50, 0x41]);
        assert_eq!(first, [note_on(0x40, 0x50, 1)]);
        // the second note's data continues under the retained status
        let second = parser.parse(&[0x51, 0x42, 0x52]);
        assert_eq!(second, [note_on(0x41, 0x51, 1), note_on(0x42, 0x52, 1)]);
    }

    #[test]
    fn note_on_zero_velocity_is_note_off() {
        let mut parser = Midi1Parser::new();
        let events = parser.parse(&[0x90, 0x3C, 0x00]);
        assert!(matches!(events[0], MidiEvent::NoteOff { .. }));
    }

    #[test]
    fn real_time_interleaves_without_breaking_running_status() {
        let mut parser = Midi1Parser::new();
        let events = parser.parse(&[0x90, 0x3C, 0xF8, 0x64]);
        assert_eq!(
            events,
            [MidiEvent::TimingClock { group: U4::MIN }, note_on(0x3C, 0x64, 0)]
        );
    }

    #[test]
    fn pitch_bend_byte_order() {
        let mut parser = Midi1Parser::new();
        let events = parser.parse(&[0xE0, 0x02, 0x40]);
        assert_eq!(
            events,
            [MidiEvent::PitchBend {
                value: Value14::Midi1(U14::new(0x2002).unwrap()),
                channel: U4::MIN,
                group: U4::MIN,
            }]
        );
    }

    #[test]
    fn stray_data_bytes_dropped() {
        let mut parser = Midi1Parser::new();
        assert!(parser.parse(&[0x12, 0x34]).is_empty());
        // parser recovers at the next status byte
        assert_eq!(parser.parse(&[0x90, 0x3C, 0x64]), [note_on(0x3C, 0x64, 0)]);
    }

    #[test]
    fn interrupted_message_dropped_and_resynced() {
        let mut parser = Midi1Parser::new();
        let events = parser.parse(&[0x90, 0x3C, 0x91, 0x40, 0x50]);
        assert_eq!(events, [note_on(0x40, 0x50, 1)]);
    }

    #[test]
    fn sysex_manufacturer() {
        let mut parser = Midi1Parser::new();
        let events = parser.parse(&[0xF0, 0x41, 0x10, 0x42, 0xF7]);
        assert_eq!(
            events,
            [MidiEvent::SysEx7 {
                manufacturer: ManufacturerId::OneByte(U7::new(0x41).unwrap()),
                data: bytes::Bytes::from_static(&[0x10, 0x42]),
                group: U4::MIN,
            }]
        );
    }

    #[test]
    fn sysex_implicit_termination_by_status() {
        let mut parser = Midi1Parser::new();
        let events = parser.parse(&[0xF0, 0x7E, 0x7F, 0x06, 0x01, 0x90, 0x3C, 0x64]);
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[0],
            MidiEvent::UniversalSysEx7 {
                kind: UniversalKind::NonRealtime,
                ..
            }
        ));
        assert_eq!(events[1], note_on(0x3C, 0x64, 0));
    }

    #[test]
    fn sysex_split_across_calls() {
        let mut parser = Midi1Parser::new();
        assert!(parser.parse(&[0xF0, 0x41, 0x01]).is_empty());
        let events = parser.parse(&[0x02, 0xF7]);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], MidiEvent::SysEx7 { ref data, .. } if data.len() == 2));
    }

    #[test]
    fn oversized_sysex_dropped_and_resynced() {
        let mut stream = vec![0xF0, 0x41];
        stream.extend(vec![0x01; crate::MAX_SYSEX_SIZE + 8]);
        stream.push(0xF7);
        stream.extend([0x90, 0x3C, 0x64]);

        let mut parser = Midi1Parser::new();
        let events = parser.parse(&stream);
        assert_eq!(events, [note_on(0x3C, 0x64, 0)]);
    }

    #[test]
    fn nrpn_three_message_scenario() {
        let mut parser = Midi1Parser::new();
        let events = parser.parse(&[0xB9, 0x63, 0x42, 0xB9, 0x62, 0x67, 0xB9, 0x06, 0x7F]);
        assert_eq!(
            events,
            [MidiEvent::Nrpn {
                parameter: (U7::new(0x42).unwrap(), U7::new(0x67).unwrap()),
                data_msb: U7::new(0x7F),
                data_lsb: None,
                channel: U4::new(9).unwrap(),
                group: U4::MIN,
            }]
        );
    }

    #[test]
    fn pn_controllers_not_emitted_as_plain_cc() {
        let mut parser = Midi1Parser::new();
        let events = parser.parse(&[0xB0, 0x65, 0x00, 0xB0, 0x64, 0x00, 0xB0, 0x06, 0x02, 0xB0, 0x26, 0x00]);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], MidiEvent::Rpn { .. }));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn arbitrary_bytes_never_panic(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
                let mut parser = Midi1Parser::new();
                let _ = parser.parse(&bytes);
            }

            #[test]
            fn note_on_round_trip(note in 0u8..=0x7F, vel in 1u8..=0x7F, ch in 0u8..=0x0F) {
                let mut parser = Midi1Parser::new();
                let events = parser.parse(&[0x90 | ch, note, vel]);
                prop_assert_eq!(events.len(), 1);
                let bytes = crate::midi1::encode(&events[0]).unwrap();
                prop_assert_eq!(bytes, vec![0x90 | ch, note, vel]);
            }
        }
    }
}
