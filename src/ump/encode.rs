//! UMP word encoding for both protocol generations

use crate::error::{Error, Result};
use crate::event::{MidiEvent, MidiProtocol};
use crate::num::{U4, U7, U14, scale_14_to_32};

/// Encodes a single event into UMP words.
///
/// `protocol` selects the channel voice packet family: MIDI 1.0 channel
/// voice (type 0x2, one word, legacy bit widths) or MIDI 2.0 channel voice
/// (type 0x4, two words, extended bit widths). System, utility and data
/// messages encode identically under either protocol. Events with no
/// representation under the requested protocol return an error.
///
/// A native MIDI 2.0 RPN/NRPN packet always carries a data word, so an
/// [`MidiEvent::Rpn`]/[`MidiEvent::Nrpn`] with absent data bytes encodes
/// with those bytes read as zero and decodes back with them present.
pub fn encode(event: &MidiEvent, protocol: MidiProtocol) -> Result<Vec<u32>> {
    let group = event.group();
    let out = match event {
        MidiEvent::NoteOff {
            note,
            velocity,
            channel,
            ..
        } => match protocol {
            MidiProtocol::Midi1 => vec![word1(group, 0x80, *channel, note.get(), velocity.midi1().get())],
            MidiProtocol::Midi2 => vec![
                word2_head(group, 0x8, *channel, note.get(), 0),
                u32::from(velocity.midi2()) << 16,
            ],
        },
        MidiEvent::NoteOn {
            note,
            velocity,
            channel,
            ..
        } => match protocol {
            MidiProtocol::Midi1 => vec![word1(group, 0x90, *channel, note.get(), velocity.midi1().get())],
            MidiProtocol::Midi2 => vec![
                word2_head(group, 0x9, *channel, note.get(), 0),
                u32::from(velocity.midi2()) << 16,
            ],
        },
        MidiEvent::NotePressure {
            note,
            amount,
            channel,
            ..
        } => match protocol {
            MidiProtocol::Midi1 => vec![word1(group, 0xA0, *channel, note.get(), amount.midi1().get())],
            MidiProtocol::Midi2 => vec![
                word2_head(group, 0xA, *channel, note.get(), 0),
                amount.midi2(),
            ],
        },
        MidiEvent::NoteManagement {
            note,
            detach,
            reset,
            channel,
            ..
        } => match protocol {
            MidiProtocol::Midi1 => {
                return Err(Error::UnsupportedOnMidi1 {
                    event: event.name(),
                });
            }
            MidiProtocol::Midi2 => {
                let flags = u8::from(*detach) << 1 | u8::from(*reset);
                vec![word2_head(group, 0xF, *channel, note.get(), flags), 0]
            }
        },
        MidiEvent::ControlChange {
            controller,
            value,
            channel,
            ..
        } => match protocol {
            MidiProtocol::Midi1 => {
                vec![word1(group, 0xB0, *channel, controller.get(), value.midi1().get())]
            }
            MidiProtocol::Midi2 => vec![
                word2_head(group, 0xB, *channel, controller.get(), 0),
                value.midi2(),
            ],
        },
        MidiEvent::ProgramChange {
            program,
            bank,
            channel,
            ..
        } => match protocol {
            MidiProtocol::Midi1 => {
                let mut out = Vec::with_capacity(3);
                if let Some(bank) = bank {
                    out.push(word1(group, 0xB0, *channel, 0x00, bank.msb().get()));
                    out.push(word1(group, 0xB0, *channel, 0x20, bank.lsb().get()));
                }
                out.push(word1(group, 0xC0, *channel, program.get(), 0));
                out
            }
            MidiProtocol::Midi2 => {
                let flags = u8::from(bank.is_some());
                let data = u32::from(program.get()) << 24
                    | bank.map_or(0, |b| u32::from(b.msb().get()) << 8 | u32::from(b.lsb().get()));
                vec![word2_head(group, 0xC, *channel, 0, flags), data]
            }
        },
        MidiEvent::ChannelPressure {
            amount, channel, ..
        } => match protocol {
            MidiProtocol::Midi1 => vec![word1(group, 0xD0, *channel, amount.midi1().get(), 0)],
            MidiProtocol::Midi2 => {
                vec![word2_head(group, 0xD, *channel, 0, 0), amount.midi2()]
            }
        },
        MidiEvent::PitchBend { value, channel, .. } => match protocol {
            MidiProtocol::Midi1 => {
                let v = value.midi1();
                vec![word1(group, 0xE0, *channel, v.lsb().get(), v.msb().get())]
            }
            MidiProtocol::Midi2 => {
                vec![word2_head(group, 0xE, *channel, 0, 0), value.midi2()]
            }
        },
        MidiEvent::Rpn {
            parameter,
            data_msb,
            data_lsb,
            channel,
            ..
        } => pn_words(
            protocol, true, *parameter, *data_msb, *data_lsb, *channel, group,
        ),
        MidiEvent::Nrpn {
            parameter,
            data_msb,
            data_lsb,
            channel,
            ..
        } => pn_words(
            protocol, false, *parameter, *data_msb, *data_lsb, *channel, group,
        ),
        MidiEvent::TimecodeQuarterFrame { data_byte, .. } => {
            vec![system(group, 0xF1, data_byte.get(), 0)]
        }
        MidiEvent::SongPositionPointer { beat, .. } => {
            vec![system(group, 0xF2, beat.lsb().get(), beat.msb().get())]
        }
        MidiEvent::SongSelect { number, .. } => vec![system(group, 0xF3, number.get(), 0)],
        MidiEvent::TuneRequest { .. } => vec![system(group, 0xF6, 0, 0)],
        MidiEvent::TimingClock { .. } => vec![system(group, 0xF8, 0, 0)],
        MidiEvent::Start { .. } => vec![system(group, 0xFA, 0, 0)],
        MidiEvent::Continue { .. } => vec![system(group, 0xFB, 0, 0)],
        MidiEvent::Stop { .. } => vec![system(group, 0xFC, 0, 0)],
        MidiEvent::ActiveSensing { .. } => vec![system(group, 0xFE, 0, 0)],
        MidiEvent::SystemReset { .. } => vec![system(group, 0xFF, 0, 0)],
        MidiEvent::SysEx7 {
            manufacturer, data, ..
        } => {
            check_7bit(data)?;
            let mut payload = manufacturer.to_bytes();
            payload.extend_from_slice(data);
            sysex7_words(group, &payload)
        }
        MidiEvent::UniversalSysEx7 {
            kind,
            device_id,
            sub_id1,
            sub_id2,
            data,
            ..
        } => {
            check_7bit(data)?;
            let mut payload = vec![kind.byte(), device_id.get(), sub_id1.get(), sub_id2.get()];
            payload.extend_from_slice(data);
            sysex7_words(group, &payload)
        }
        MidiEvent::SysEx8 {
            stream_id, data, ..
        } => {
            check_size(data)?;
            sysex8_words(group, *stream_id, data)
        }
        MidiEvent::NoOp { .. } => vec![u32::from(group.get()) << 24],
        MidiEvent::JrClock { time, .. } => {
            vec![u32::from(group.get()) << 24 | 0x1 << 20 | u32::from(*time)]
        }
        MidiEvent::JrTimestamp { time, .. } => {
            vec![u32::from(group.get()) << 24 | 0x2 << 20 | u32::from(*time)]
        }
    };
    Ok(out)
}

/// MIDI 1.0 channel voice word (type 0x2)
fn word1(group: U4, status: u8, channel: U4, d0: u8, d1: u8) -> u32 {
    0x2000_0000
        | u32::from(group.get()) << 24
        | u32::from(status | channel.get()) << 16
        | u32::from(d0) << 8
        | u32::from(d1)
}

/// First word of a MIDI 2.0 channel voice packet (type 0x4)
fn word2_head(group: U4, status: u8, channel: U4, index1: u8, index2: u8) -> u32 {
    0x4000_0000
        | u32::from(group.get()) << 24
        | u32::from(status << 4 | channel.get()) << 16
        | u32::from(index1) << 8
        | u32::from(index2)
}

/// System common / real-time word (type 0x1)
fn system(group: U4, status: u8, d0: u8, d1: u8) -> u32 {
    0x1000_0000
        | u32::from(group.get()) << 24
        | u32::from(status) << 16
        | u32::from(d0) << 8
        | u32::from(d1)
}

fn pn_words(
    protocol: MidiProtocol,
    registered: bool,
    parameter: (U7, U7),
    data_msb: Option<U7>,
    data_lsb: Option<U7>,
    channel: U4,
    group: U4,
) -> Vec<u32> {
    match protocol {
        MidiProtocol::Midi1 => {
            // same control change sequence as the byte-stream encoding
            let (cc_msb, cc_lsb) = if registered { (0x65, 0x64) } else { (0x63, 0x62) };
            let mut out = vec![
                word1(group, 0xB0, channel, cc_msb, parameter.0.get()),
                word1(group, 0xB0, channel, cc_lsb, parameter.1.get()),
            ];
            if let Some(msb) = data_msb {
                out.push(word1(group, 0xB0, channel, 0x06, msb.get()));
            }
            if let Some(lsb) = data_lsb {
                out.push(word1(group, 0xB0, channel, 0x26, lsb.get()));
            }
            out
        }
        MidiProtocol::Midi2 => {
            let status = if registered { 0x2 } else { 0x3 };
            let pair = U14::from_pair(
                data_msb.unwrap_or(U7::MIN),
                data_lsb.unwrap_or(U7::MIN),
            );
            vec![
                word2_head(group, status, channel, parameter.0.get(), parameter.1.get()),
                scale_14_to_32(pair),
            ]
        }
    }
}

/// Fragments a SysEx7 payload (header bytes included, framing excluded)
/// into type 0x3 packets of up to six bytes.
fn sysex7_words(group: U4, payload: &[u8]) -> Vec<u32> {
    let chunks: Vec<&[u8]> = payload.chunks(6).collect();
    let single = chunks.len() <= 1;
    let mut out = Vec::with_capacity(chunks.len().max(1) * 2);
    if chunks.is_empty() {
        out.extend_from_slice(&pack_sysex7(group, 0x0, &[]));
        return out;
    }
    for (i, chunk) in chunks.iter().enumerate() {
        let status = if single {
            0x0
        } else if i == 0 {
            0x1
        } else if i == chunks.len() - 1 {
            0x3
        } else {
            0x2
        };
        out.extend_from_slice(&pack_sysex7(group, status, chunk));
    }
    out
}

fn pack_sysex7(group: U4, status: u8, chunk: &[u8]) -> [u32; 2] {
    let mut bytes = [0u8; 8];
    bytes[0] = 0x30 | group.get();
    bytes[1] = status << 4 | chunk.len() as u8;
    bytes[2..2 + chunk.len()].copy_from_slice(chunk);
    [
        u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
        u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
    ]
}

/// Fragments an 8-bit payload into type 0x5 packets: a stream ID byte then
/// up to 13 data bytes per packet; the wire byte count includes the ID.
fn sysex8_words(group: U4, stream_id: u8, payload: &[u8]) -> Vec<u32> {
    let chunks: Vec<&[u8]> = if payload.is_empty() {
        vec![&[]]
    } else {
        payload.chunks(13).collect()
    };
    let single = chunks.len() <= 1;
    let mut out = Vec::with_capacity(chunks.len() * 4);
    for (i, chunk) in chunks.iter().enumerate() {
        let status = if single {
            0x0
        } else if i == 0 {
            0x1
        } else if i == chunks.len() - 1 {
            0x3
        } else {
            0x2
        };
        let mut bytes = [0u8; 16];
        bytes[0] = 0x50 | group.get();
        bytes[1] = status << 4 | (chunk.len() as u8 + 1);
        bytes[2] = stream_id;
        bytes[3..3 + chunk.len()].copy_from_slice(chunk);
        for w in 0..4 {
            out.push(u32::from_be_bytes([
                bytes[w * 4],
                bytes[w * 4 + 1],
                bytes[w * 4 + 2],
                bytes[w * 4 + 3],
            ]));
        }
    }
    out
}

fn check_7bit(data: &[u8]) -> Result<()> {
    check_size(data)?;
    match data.iter().find(|&&b| b >= 0x80) {
        Some(&byte) => Err(Error::InvalidDataByte { byte }),
        None => Ok(()),
    }
}

fn check_size(data: &[u8]) -> Result<()> {
    if data.len() > crate::MAX_SYSEX_SIZE {
        return Err(Error::SysExTooLarge {
            size: data.len(),
            max: crate::MAX_SYSEX_SIZE,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{ManufacturerId, Velocity};
    use crate::ump::UmpParser;

    fn note_on(vel: Velocity) -> MidiEvent {
        MidiEvent::NoteOn {
            note: U7::new(0x3C).unwrap(),
            velocity: vel,
            channel: U4::new(1).unwrap(),
            group: U4::new(2).unwrap(),
        }
    }

    #[test]
    fn midi1_protocol_packs_one_word() {
        let words = encode(&note_on(Velocity::Midi1(U7::new(0x64).unwrap())), MidiProtocol::Midi1)
            .unwrap();
        assert_eq!(words, [0x2291_3C64]);
    }

    #[test]
    fn midi2_protocol_upscales_velocity() {
        let words = encode(&note_on(Velocity::Midi1(U7::new(0x40).unwrap())), MidiProtocol::Midi2)
            .unwrap();
        assert_eq!(words, [0x4291_3C00, 0x8000_0000]);
    }

    #[test]
    fn note_management_requires_midi2() {
        let event = MidiEvent::NoteManagement {
            note: U7::MIN,
            detach: true,
            reset: false,
            channel: U4::MIN,
            group: U4::MIN,
        };
        assert!(matches!(
            encode(&event, MidiProtocol::Midi1),
            Err(Error::UnsupportedOnMidi1 { .. })
        ));
        assert_eq!(
            encode(&event, MidiProtocol::Midi2).unwrap(),
            [0x40F0_0002, 0]
        );
    }

    #[test]
    fn sysex7_fragmentation_boundaries() {
        // 1-byte manufacturer + 5 data bytes = exactly one complete packet
        let event = MidiEvent::SysEx7 {
            manufacturer: ManufacturerId::OneByte(U7::new(0x41).unwrap()),
            data: bytes::Bytes::from_static(&[1, 2, 3, 4, 5]),
            group: U4::MIN,
        };
        let words = encode(&event, MidiProtocol::Midi1).unwrap();
        assert_eq!(words.len(), 2);
        assert_eq!(words[0] >> 16 & 0xF0, 0x00); // complete status

        // one more byte forces start + end
        let event = MidiEvent::SysEx7 {
            manufacturer: ManufacturerId::OneByte(U7::new(0x41).unwrap()),
            data: bytes::Bytes::from_static(&[1, 2, 3, 4, 5, 6]),
            group: U4::MIN,
        };
        let words = encode(&event, MidiProtocol::Midi1).unwrap();
        assert_eq!(words.len(), 4);
        assert_eq!(words[0] >> 20 & 0xF, 0x1);
        assert_eq!(words[2] >> 20 & 0xF, 0x3);
    }

    #[test]
    fn midi2_rpn_normalizes_absent_data_to_zero() {
        let event = MidiEvent::Rpn {
            parameter: (U7::new(0x12).unwrap(), U7::new(0x34).unwrap()),
            data_msb: None,
            data_lsb: None,
            channel: U4::MIN,
            group: U4::MIN,
        };
        let words = encode(&event, MidiProtocol::Midi2).unwrap();
        assert_eq!(words, [0x4020_1234, 0x0000_0000]);

        let mut parser = UmpParser::new();
        assert_eq!(
            parser.parse(&words),
            [MidiEvent::Rpn {
                parameter: (U7::new(0x12).unwrap(), U7::new(0x34).unwrap()),
                data_msb: Some(U7::MIN),
                data_lsb: Some(U7::MIN),
                channel: U4::MIN,
                group: U4::MIN,
            }]
        );
    }

    mod properties {
        use super::*;
        use crate::event::{Value7, Value14};
        use crate::num::U14;
        use proptest::prelude::*;

        fn arb_channel_voice() -> impl Strategy<Value = MidiEvent> {
            let u7 = || (0u8..=0x7F).prop_map(|v| U7::new(v).unwrap());
            let ch = (0u8..=0xF).prop_map(|v| U4::new(v).unwrap());
            let group = (0u8..=0xF).prop_map(|v| U4::new(v).unwrap());
            prop_oneof![
                (u7(), u7(), ch.clone(), group.clone()).prop_map(|(note, vel, channel, group)| {
                    MidiEvent::NoteOn {
                        note,
                        velocity: Velocity::Midi1(vel),
                        channel,
                        group,
                    }
                }),
                (u7(), u7(), ch.clone(), group.clone()).prop_map(|(c, v, channel, group)| {
                    MidiEvent::ControlChange {
                        controller: c,
                        value: Value7::Midi1(v),
                        channel,
                        group,
                    }
                }),
                (0u16..=0x3FFF, ch, group).prop_map(|(v, channel, group)| {
                    MidiEvent::PitchBend {
                        value: Value14::Midi1(U14::new(v).unwrap()),
                        channel,
                        group,
                    }
                }),
            ]
        }

        proptest! {
            #[test]
            fn round_trip_both_protocols(event in arb_channel_voice()) {
                // note-on velocity 0 legitimately re-decodes as note-off and
                // CC 6/38/98..101 divert into parameter number accumulation
                let skip = matches!(
                    &event,
                    MidiEvent::NoteOn { velocity, .. } if velocity.midi1().get() == 0
                ) || matches!(
                    &event,
                    MidiEvent::ControlChange { controller, .. }
                        if matches!(controller.get(), 0x06 | 0x26 | 0x62..=0x65)
                );
                prop_assume!(!skip);

                for protocol in [MidiProtocol::Midi1, MidiProtocol::Midi2] {
                    let words = encode(&event, protocol).unwrap();
                    let mut parser = UmpParser::new();
                    let decoded = parser.parse(&words);
                    prop_assert_eq!(&decoded, &[event.clone()]);
                }
            }
        }
    }
}
