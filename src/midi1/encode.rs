//! Canonical MIDI 1.0 byte encoding

use crate::error::{Error, Result};
use crate::event::MidiEvent;
use crate::num::U7;

/// Encodes a single event to its canonical MIDI 1.0 byte sequence.
///
/// Canonical means no running-status compression: every message carries its
/// status byte, RPN/NRPN expand to their full control-change sequence, and a
/// program change with a bank emits the two bank-select controllers first.
/// Events with no MIDI 1.0 representation return
/// [`Error::UnsupportedOnMidi1`].
pub fn encode(event: &MidiEvent) -> Result<Vec<u8>> {
    let out = match event {
        MidiEvent::NoteOff {
            note,
            velocity,
            channel,
            ..
        } => vec![0x80 | channel.get(), note.get(), velocity.midi1().get()],
        MidiEvent::NoteOn {
            note,
            velocity,
            channel,
            ..
        } => vec![0x90 | channel.get(), note.get(), velocity.midi1().get()],
        MidiEvent::NotePressure {
            note,
            amount,
            channel,
            ..
        } => vec![0xA0 | channel.get(), note.get(), amount.midi1().get()],
        MidiEvent::ControlChange {
            controller,
            value,
            channel,
            ..
        } => vec![0xB0 | channel.get(), controller.get(), value.midi1().get()],
        MidiEvent::ProgramChange {
            program,
            bank,
            channel,
            ..
        } => {
            let mut out = Vec::with_capacity(8);
            if let Some(bank) = bank {
                out.extend_from_slice(&[0xB0 | channel.get(), 0x00, bank.msb().get()]);
                out.extend_from_slice(&[0xB0 | channel.get(), 0x20, bank.lsb().get()]);
            }
            out.extend_from_slice(&[0xC0 | channel.get(), program.get()]);
            out
        }
        MidiEvent::ChannelPressure {
            amount, channel, ..
        } => vec![0xD0 | channel.get(), amount.midi1().get()],
        MidiEvent::PitchBend { value, channel, .. } => {
            let v = value.midi1();
            vec![0xE0 | channel.get(), v.lsb().get(), v.msb().get()]
        }
        MidiEvent::Rpn {
            parameter,
            data_msb,
            data_lsb,
            channel,
            ..
        } => pn_sequence(0x65, 0x64, *parameter, *data_msb, *data_lsb, channel.get()),
        MidiEvent::Nrpn {
            parameter,
            data_msb,
            data_lsb,
            channel,
            ..
        } => pn_sequence(0x63, 0x62, *parameter, *data_msb, *data_lsb, channel.get()),
        MidiEvent::TimecodeQuarterFrame { data_byte, .. } => vec![0xF1, data_byte.get()],
        MidiEvent::SongPositionPointer { beat, .. } => {
            vec![0xF2, beat.lsb().get(), beat.msb().get()]
        }
        MidiEvent::SongSelect { number, .. } => vec![0xF3, number.get()],
        MidiEvent::TuneRequest { .. } => vec![0xF6],
        MidiEvent::TimingClock { .. } => vec![0xF8],
        MidiEvent::Start { .. } => vec![0xFA],
        MidiEvent::Continue { .. } => vec![0xFB],
        MidiEvent::Stop { .. } => vec![0xFC],
        MidiEvent::ActiveSensing { .. } => vec![0xFE],
        MidiEvent::SystemReset { .. } => vec![0xFF],
        MidiEvent::SysEx7 {
            manufacturer, data, ..
        } => {
            check_7bit(data)?;
            let mut out = Vec::with_capacity(data.len() + 5);
            out.push(0xF0);
            out.extend_from_slice(&manufacturer.to_bytes());
            out.extend_from_slice(data);
            out.push(0xF7);
            out
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
            let mut out = Vec::with_capacity(data.len() + 6);
            out.push(0xF0);
            out.push(kind.byte());
            out.push(device_id.get());
            out.push(sub_id1.get());
            out.push(sub_id2.get());
            out.extend_from_slice(data);
            out.push(0xF7);
            out
        }
        MidiEvent::NoteManagement { .. }
        | MidiEvent::SysEx8 { .. }
        | MidiEvent::NoOp { .. }
        | MidiEvent::JrClock { .. }
        | MidiEvent::JrTimestamp { .. } => {
            return Err(Error::UnsupportedOnMidi1 {
                event: event.name(),
            });
        }
    };
    Ok(out)
}

fn pn_sequence(
    cc_msb: u8,
    cc_lsb: u8,
    parameter: (U7, U7),
    data_msb: Option<U7>,
    data_lsb: Option<U7>,
    channel: u8,
) -> Vec<u8> {
    let status = 0xB0 | channel;
    let mut out = vec![
        status,
        cc_msb,
        parameter.0.get(),
        status,
        cc_lsb,
        parameter.1.get(),
    ];
    if let Some(msb) = data_msb {
        out.extend_from_slice(&[status, 0x06, msb.get()]);
    }
    if let Some(lsb) = data_lsb {
        out.extend_from_slice(&[status, 0x26, lsb.get()]);
    }
    out
}

fn check_7bit(data: &[u8]) -> Result<()> {
    if data.len() > crate::MAX_SYSEX_SIZE {
        return Err(Error::SysExTooLarge {
            size: data.len(),
            max: crate::MAX_SYSEX_SIZE,
        });
    }
    match data.iter().find(|&&b| b >= 0x80) {
        Some(&byte) => Err(Error::InvalidDataByte { byte }),
        None => Ok(()),
    }
}
