//! Cross-format translation: MIDI 1.0 byte streams in, UMP words out, and
//! back again, through the shared event model.

use midiwire::event::{ManufacturerId, MidiEvent, Value14, Velocity};
use midiwire::midi1::{self, Midi1Parser};
use midiwire::num::{U4, U7, U14};
use midiwire::ump::{self, UmpParser};
use midiwire::MidiProtocol;

fn bytes_to_events(bytes: &[u8]) -> Vec<MidiEvent> {
    Midi1Parser::new().parse(bytes)
}

fn words_to_events(words: &[u32]) -> Vec<MidiEvent> {
    UmpParser::new().parse(words)
}

#[test]
fn byte_stream_to_ump_and_back() {
    let bytes = [
        0x93, 0x3C, 0x64, // note on, channel 3
        0xB0, 0x07, 0x50, // volume CC
        0xE2, 0x00, 0x60, // pitch bend
        0xF8, // clock
        0x83, 0x3C, 0x40, // note off
    ];
    let events = bytes_to_events(&bytes);
    assert_eq!(events.len(), 5);

    for protocol in [MidiProtocol::Midi1, MidiProtocol::Midi2] {
        let mut words = Vec::new();
        for event in &events {
            words.extend(ump::encode(event, protocol).unwrap());
        }
        let decoded = words_to_events(&words);
        assert_eq!(decoded, events, "{protocol:?}");
    }
}

#[test]
fn ump_to_byte_stream() {
    // MIDI 2.0 channel voice note on, group 0, channel 3, velocity 0x8000
    let events = words_to_events(&[0x4093_3C00, 0x8000_0000]);
    assert_eq!(
        events,
        [MidiEvent::NoteOn {
            note: U7::new(0x3C).unwrap(),
            velocity: Velocity::Midi2(0x8000),
            channel: U4::new(3).unwrap(),
            group: U4::MIN,
        }]
    );
    // the 16-bit velocity folds back to its 7-bit origin
    assert_eq!(midi1::encode(&events[0]).unwrap(), [0x93, 0x3C, 0x40]);
}

#[test]
fn running_status_survives_translation() {
    let bytes = [0x90, 0x3C, 0x64, 0x3E, 0x64, 0x3C, 0x00, 0x3E, 0x00];
    let events = bytes_to_events(&bytes);
    assert_eq!(events.len(), 4);
    assert!(matches!(events[2], MidiEvent::NoteOff { .. }));

    // canonical re-encoding expands the running status
    let mut round: Vec<u8> = Vec::new();
    for event in &events {
        round.extend(midi1::encode(event).unwrap());
    }
    assert_eq!(bytes_to_events(&round), events);
}

#[test]
fn sysex_crosses_formats_fragmented() {
    let bytes = [
        0xF0, 0x00, 0x00, 0x66, 0x05, 0x00, 0x10, 0x00, 0x41, 0x42, 0x43, 0x44, 0xF7,
    ];
    let events = bytes_to_events(&bytes);
    let MidiEvent::SysEx7 {
        manufacturer, data, ..
    } = &events[0]
    else {
        panic!("expected sysex");
    };
    assert_eq!(
        *manufacturer,
        ManufacturerId::ThreeByte(U7::MIN, U7::new(0x66).unwrap())
    );
    assert_eq!(data.len(), 8);

    // eleven payload bytes (ID included) span two SysEx7 packets
    let words = ump::encode(&events[0], MidiProtocol::Midi2).unwrap();
    assert_eq!(words.len(), 4);
    assert_eq!(words[0] >> 20 & 0xF, 0x1); // start
    assert_eq!(words[2] >> 20 & 0xF, 0x3); // end

    assert_eq!(words_to_events(&words), events);
}

#[test]
fn nrpn_reconstruction_matches_on_both_transports() {
    // three-message NRPN: parameter select then data entry MSB
    let bytes = [0xB9, 0x63, 0x42, 0xB9, 0x62, 0x67, 0xB9, 0x06, 0x7F];
    let expected = MidiEvent::Nrpn {
        parameter: (U7::new(0x42).unwrap(), U7::new(0x67).unwrap()),
        data_msb: U7::new(0x7F),
        data_lsb: None,
        channel: U4::new(9).unwrap(),
        group: U4::MIN,
    };
    assert_eq!(bytes_to_events(&bytes), [expected.clone()]);

    // the same CC sequence carried as MIDI 1.0 channel voice UMP words
    let words = [
        0x20B9_6342, 0x20B9_6267, 0x20B9_067F,
    ];
    assert_eq!(words_to_events(&words), [expected]);
}

#[test]
fn pitch_bend_midpoint_is_stable() {
    let bytes = [0xE0, 0x00, 0x40];
    let events = bytes_to_events(&bytes);
    assert_eq!(
        events,
        [MidiEvent::PitchBend {
            value: Value14::Midi1(U14::MIDPOINT),
            channel: U4::MIN,
            group: U4::MIN,
        }]
    );

    let words = ump::encode(&events[0], MidiProtocol::Midi2).unwrap();
    assert_eq!(words[1], 0x8000_0000);
    assert_eq!(midi1::encode(&words_to_events(&words)[0]).unwrap(), bytes);
}

#[test]
fn interleaved_groups_keep_their_streams_apart() {
    // two SysEx7 streams interleaved across UMP groups 0 and 5
    let words = [
        0x3012_0203, 0x0000_0000, // group 0 start: 02 03
        0x3512_0A0B, 0x0000_0000, // group 5 start: 0A 0B
        0x3031_0400, 0x0000_0000, // group 0 end: 04
        0x3531_0C00, 0x0000_0000, // group 5 end: 0C
    ];
    let events = words_to_events(&words);
    assert_eq!(events.len(), 2);
    let MidiEvent::SysEx7 {
        manufacturer,
        data,
        group,
    } = &events[0]
    else {
        panic!("expected sysex");
    };
    assert_eq!(group.get(), 0);
    assert_eq!(*manufacturer, ManufacturerId::OneByte(U7::new(0x02).unwrap()));
    assert_eq!(&data[..], [0x03, 0x04]);
    let MidiEvent::SysEx7 {
        manufacturer,
        data,
        group,
    } = &events[1]
    else {
        panic!("expected sysex");
    };
    assert_eq!(group.get(), 5);
    assert_eq!(*manufacturer, ManufacturerId::OneByte(U7::new(0x0A).unwrap()));
    assert_eq!(&data[..], [0x0B, 0x0C]);
}
