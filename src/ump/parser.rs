//! Stateful UMP word-stream parser

use std::collections::HashMap;

use bytes::Bytes;
use tracing::{debug, trace};

use super::UmpMessageType;
use crate::MAX_SYSEX_SIZE;
use crate::event::{MidiEvent, SysExHeader, Value7, Value14, Velocity, split_payload};
use crate::num::{U4, U7, U14, scale_32_to_14};
use crate::pn::PnAccumulator;

const STATUS_COMPLETE: u8 = 0x0;
const STATUS_START: u8 = 0x1;
const STATUS_CONTINUE: u8 = 0x2;
const STATUS_END: u8 = 0x3;
const STATUS_MDS_HEADER: u8 = 0x8;
const STATUS_MDS_PAYLOAD: u8 = 0x9;

/// Incremental UMP word-stream decoder.
///
/// One instance per input stream. Carries SysEx7 reassembly buffers per UMP
/// group, SysEx8 buffers per (group, stream ID), and the RPN/NRPN
/// accumulators fed by MIDI 1.0 channel voice packets.
#[derive(Debug, Default)]
pub struct UmpParser {
    sysex7: [Option<Vec<u8>>; 16],
    sysex8: HashMap<(u8, u8), Vec<u8>>,
    pn: PnAccumulator,
}

impl UmpParser {
    /// Creates a parser with empty stream state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a buffer of 32-bit words, returning every event completed by
    /// it.
    ///
    /// A packet whose declared length extends past the end of the buffer is
    /// truncated wire data: the remainder is dropped with a log. SysEx
    /// fragments spanning multiple calls are held until their End packet.
    pub fn parse(&mut self, words: &[u32]) -> Vec<MidiEvent> {
        let mut out = Vec::new();
        let mut idx = 0;
        while idx < words.len() {
            let mt = UmpMessageType::from_word(words[idx]);
            let len = mt.word_count();
            if idx + len > words.len() {
                debug!(
                    needed = len,
                    got = words.len() - idx,
                    "dropping truncated packet at end of buffer"
                );
                break;
            }
            self.packet(mt, &words[idx..idx + len], &mut out);
            idx += len;
        }
        self.pn.flush(&mut out);
        out
    }

    fn packet(&mut self, mt: UmpMessageType, words: &[u32], out: &mut Vec<MidiEvent>) {
        match mt {
            UmpMessageType::Utility => Self::utility(words[0], out),
            UmpMessageType::System => Self::system(words[0], out),
            UmpMessageType::Midi1ChannelVoice => self.midi1_voice(words[0], out),
            UmpMessageType::SysEx7 => self.sysex7(words, out),
            UmpMessageType::Midi2ChannelVoice => Self::midi2_voice(words, out),
            UmpMessageType::Data128 => self.data128(words, out),
            UmpMessageType::Reserved(n) => {
                trace!(message_type = n, "skipping reserved message type");
            }
        }
    }

    fn utility(word: u32, out: &mut Vec<MidiEvent>) {
        let group = U4::new_truncated((word >> 24) as u8);
        let status = ((word >> 20) & 0xF) as u8;
        let time = (word & 0xFFFF) as u16;
        match status {
            0x0 => out.push(MidiEvent::NoOp { group }),
            0x1 => out.push(MidiEvent::JrClock { time, group }),
            0x2 => out.push(MidiEvent::JrTimestamp { time, group }),
            _ => trace!(status, "skipping unknown utility status"),
        }
    }

    fn system(word: u32, out: &mut Vec<MidiEvent>) {
        let [b0, status, d0, d1] = word.to_be_bytes();
        let group = U4::new_truncated(b0);
        let d0 = U7::new_truncated(d0);
        let event = match status {
            0xF1 => MidiEvent::TimecodeQuarterFrame {
                data_byte: d0,
                group,
            },
            0xF2 => MidiEvent::SongPositionPointer {
                beat: U14::from_pair(U7::new_truncated(d1), d0),
                group,
            },
            0xF3 => MidiEvent::SongSelect { number: d0, group },
            0xF6 => MidiEvent::TuneRequest { group },
            0xF8 => MidiEvent::TimingClock { group },
            0xFA => MidiEvent::Start { group },
            0xFB => MidiEvent::Continue { group },
            0xFC => MidiEvent::Stop { group },
            0xFE => MidiEvent::ActiveSensing { group },
            0xFF => MidiEvent::SystemReset { group },
            _ => {
                trace!(status, "skipping unknown system status");
                return;
            }
        };
        out.push(event);
    }

    fn midi1_voice(&mut self, word: u32, out: &mut Vec<MidiEvent>) {
        let [b0, status, d0, d1] = word.to_be_bytes();
        let group = U4::new_truncated(b0);
        let channel = U4::new_truncated(status);
        let d0 = U7::new_truncated(d0);
        let d1 = U7::new_truncated(d1);

        let event = match status & 0xF0 {
            0x80 => MidiEvent::NoteOff {
                note: d0,
                velocity: Velocity::Midi1(d1),
                channel,
                group,
            },
            0x90 if d1.get() == 0 => MidiEvent::NoteOff {
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
            _ => {
                trace!(status, "skipping malformed midi1 channel voice packet");
                return;
            }
        };
        out.push(event);
    }

    fn midi2_voice(words: &[u32], out: &mut Vec<MidiEvent>) {
        let [b0, status_byte, index1, index2] = words[0].to_be_bytes();
        let data = words[1];
        let group = U4::new_truncated(b0);
        let channel = U4::new_truncated(status_byte);
        let status = status_byte >> 4;

        let event = match status {
            0x2 | 0x3 => {
                let parameter = (U7::new_truncated(index1), U7::new_truncated(index2));
                let pair = scale_32_to_14(data);
                let (data_msb, data_lsb) = (Some(pair.msb()), Some(pair.lsb()));
                if status == 0x2 {
                    MidiEvent::Rpn {
                        parameter,
                        data_msb,
                        data_lsb,
                        channel,
                        group,
                    }
                } else {
                    MidiEvent::Nrpn {
                        parameter,
                        data_msb,
                        data_lsb,
                        channel,
                        group,
                    }
                }
            }
            0x8 => MidiEvent::NoteOff {
                note: U7::new_truncated(index1),
                velocity: Velocity::Midi2((data >> 16) as u16),
                channel,
                group,
            },
            0x9 => MidiEvent::NoteOn {
                note: U7::new_truncated(index1),
                velocity: Velocity::Midi2((data >> 16) as u16),
                channel,
                group,
            },
            0xA => MidiEvent::NotePressure {
                note: U7::new_truncated(index1),
                amount: Value7::Midi2(data),
                channel,
                group,
            },
            0xB => MidiEvent::ControlChange {
                controller: U7::new_truncated(index1),
                value: Value7::Midi2(data),
                channel,
                group,
            },
            0xC => {
                let [program, _, bank_msb, bank_lsb] = data.to_be_bytes();
                let bank = if index2 & 0x01 == 0x01 {
                    Some(U14::from_pair(
                        U7::new_truncated(bank_msb),
                        U7::new_truncated(bank_lsb),
                    ))
                } else {
                    None
                };
                MidiEvent::ProgramChange {
                    program: U7::new_truncated(program),
                    bank,
                    channel,
                    group,
                }
            }
            0xD => MidiEvent::ChannelPressure {
                amount: Value7::Midi2(data),
                channel,
                group,
            },
            0xE => MidiEvent::PitchBend {
                value: Value14::Midi2(data),
                channel,
                group,
            },
            0xF => MidiEvent::NoteManagement {
                note: U7::new_truncated(index1),
                detach: index2 & 0x02 != 0,
                reset: index2 & 0x01 != 0,
                channel,
                group,
            },
            _ => {
                trace!(status, "skipping unhandled midi2 channel voice status");
                return;
            }
        };
        out.push(event);
    }

    fn sysex7(&mut self, words: &[u32], out: &mut Vec<MidiEvent>) {
        let [b0, b1, b2, b3] = words[0].to_be_bytes();
        let group = b0 & 0x0F;
        let status = b1 >> 4;
        let count = (b1 & 0x0F) as usize;
        if count > 6 {
            debug!(count, "dropping sysex7 packet with invalid byte count");
            return;
        }
        let tail = words[1].to_be_bytes();
        let chunk_buf = [b2, b3, tail[0], tail[1], tail[2], tail[3]];
        let chunk = &chunk_buf[..count];
        let slot = &mut self.sysex7[group as usize];

        match status {
            STATUS_COMPLETE => {
                if slot.take().is_some() {
                    debug!(group, "complete sysex7 packet interrupts reassembly");
                }
                Self::finish_sysex7(chunk.to_vec(), group, out);
            }
            STATUS_START => {
                if slot.is_some() {
                    debug!(group, "new sysex7 start discards reassembly in progress");
                }
                *slot = Some(chunk.to_vec());
            }
            STATUS_CONTINUE | STATUS_END => {
                let Some(buf) = slot.as_mut() else {
                    debug!(group, status, "dropping sysex7 fragment without start");
                    return;
                };
                if buf.len() + chunk.len() > MAX_SYSEX_SIZE {
                    debug!(group, max = MAX_SYSEX_SIZE, "dropping oversized sysex7");
                    *slot = None;
                    return;
                }
                buf.extend_from_slice(chunk);
                if status == STATUS_END {
                    let payload = slot.take().unwrap_or_default();
                    Self::finish_sysex7(payload, group, out);
                }
            }
            _ => debug!(status, "skipping unknown sysex7 status"),
        }
    }

    fn finish_sysex7(payload: Vec<u8>, group: u8, out: &mut Vec<MidiEvent>) {
        let group = U4::new_truncated(group);
        match split_payload(&payload) {
            Ok((SysExHeader::Manufacturer(manufacturer), data)) => {
                out.push(MidiEvent::SysEx7 {
                    manufacturer,
                    data,
                    group,
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
                    group,
                });
            }
            Err(err) => debug!(%err, "dropping malformed sysex7"),
        }
    }

    fn data128(&mut self, words: &[u32], out: &mut Vec<MidiEvent>) {
        let mut bytes = [0u8; 16];
        for (i, word) in words.iter().enumerate() {
            bytes[i * 4..i * 4 + 4].copy_from_slice(&word.to_be_bytes());
        }
        let group = bytes[0] & 0x0F;
        let status = bytes[1] >> 4;
        let count = (bytes[1] & 0x0F) as usize;

        match status {
            STATUS_MDS_HEADER | STATUS_MDS_PAYLOAD => {
                debug!(group, status, "skipping mixed data set packet");
                return;
            }
            STATUS_COMPLETE | STATUS_START | STATUS_CONTINUE | STATUS_END => {}
            _ => {
                debug!(status, "skipping unknown data128 status");
                return;
            }
        }
        // the byte count includes the stream ID
        if count == 0 || count > 14 {
            debug!(count, "dropping sysex8 packet with invalid byte count");
            return;
        }
        let stream_id = bytes[2];
        let chunk = &bytes[3..2 + count];
        let key = (group, stream_id);

        match status {
            STATUS_COMPLETE => {
                self.sysex8.remove(&key);
                out.push(MidiEvent::SysEx8 {
                    stream_id,
                    data: Bytes::copy_from_slice(chunk),
                    group: U4::new_truncated(group),
                });
            }
            STATUS_START => {
                if self.sysex8.insert(key, chunk.to_vec()).is_some() {
                    debug!(group, stream_id, "new sysex8 start discards reassembly in progress");
                }
            }
            _ => {
                let Some(buf) = self.sysex8.get_mut(&key) else {
                    debug!(group, stream_id, "dropping sysex8 fragment without start");
                    return;
                };
                if buf.len() + chunk.len() > MAX_SYSEX_SIZE {
                    debug!(group, max = MAX_SYSEX_SIZE, "dropping oversized sysex8");
                    self.sysex8.remove(&key);
                    return;
                }
                buf.extend_from_slice(chunk);
                if status == STATUS_END {
                    let payload = self.sysex8.remove(&key).unwrap_or_default();
                    out.push(MidiEvent::SysEx8 {
                        stream_id,
                        data: Bytes::from(payload),
                        group: U4::new_truncated(group),
                    });
                }
            }
        }
    }
}
