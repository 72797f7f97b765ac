use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use midiwire::event::{MidiEvent, Value7, Velocity};
use midiwire::midi1::{self, Midi1Parser};
use midiwire::num::{U4, U7};
use midiwire::ump::{self, UmpParser};
use midiwire::MidiProtocol;

/// A dense channel-voice byte stream with running status, the shape of a
/// busy keyboard performance.
fn voice_bytes(messages: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(messages * 3);
    out.push(0x90);
    for i in 0..messages {
        out.push((i % 0x60) as u8);
        out.push(0x40 + (i % 0x20) as u8);
    }
    out
}

fn voice_events(count: usize) -> Vec<MidiEvent> {
    (0..count)
        .map(|i| MidiEvent::NoteOn {
            note: U7::new_truncated((i % 0x60) as u8),
            velocity: Velocity::Midi1(U7::new_truncated(0x40)),
            channel: U4::new_truncated((i % 16) as u8),
            group: U4::MIN,
        })
        .collect()
}

fn bench_midi1_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("midi1");

    for messages in [64, 1024] {
        let bytes = voice_bytes(messages);
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_function(format!("parse_{messages}_msgs"), |b| {
            let mut parser = Midi1Parser::new();
            b.iter(|| {
                black_box(parser.parse(&bytes));
            });
        });
    }

    // worst case: one maximum-size sysex
    let mut sysex = vec![0xF0, 0x7D];
    sysex.resize(16 * 1024, 0x55);
    sysex.push(0xF7);
    group.throughput(Throughput::Bytes(sysex.len() as u64));
    group.bench_function("parse_sysex_16kb", |b| {
        let mut parser = Midi1Parser::new();
        b.iter(|| {
            black_box(parser.parse(&sysex));
        });
    });

    group.finish();
}

fn bench_midi1_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("midi1");

    let events = voice_events(1024);
    group.throughput(Throughput::Elements(events.len() as u64));
    group.bench_function("encode_1024_events", |b| {
        b.iter(|| {
            for event in &events {
                black_box(midi1::encode(event).unwrap());
            }
        });
    });

    group.finish();
}

fn bench_ump(c: &mut Criterion) {
    let mut group = c.benchmark_group("ump");

    let events = voice_events(1024);
    for protocol in [MidiProtocol::Midi1, MidiProtocol::Midi2] {
        let mut words = Vec::new();
        for event in &events {
            words.extend(ump::encode(event, protocol).unwrap());
        }
        group.throughput(Throughput::Bytes(4 * words.len() as u64));
        group.bench_function(format!("parse_1024_msgs_{protocol:?}"), |b| {
            let mut parser = UmpParser::new();
            b.iter(|| {
                black_box(parser.parse(&words));
            });
        });
        group.bench_function(format!("encode_1024_events_{protocol:?}"), |b| {
            b.iter(|| {
                for event in &events {
                    black_box(ump::encode(event, protocol).unwrap());
                }
            });
        });
    }

    group.finish();
}

fn bench_translate(c: &mut Criterion) {
    let mut group = c.benchmark_group("translate");

    let bytes = voice_bytes(1024);
    group.throughput(Throughput::Bytes(bytes.len() as u64));
    group.bench_function("bytes_to_ump_1024_msgs", |b| {
        let mut parser = Midi1Parser::new();
        b.iter(|| {
            for event in parser.parse(&bytes) {
                black_box(ump::encode(&event, MidiProtocol::Midi2).unwrap());
            }
        });
    });

    group.finish();
}

fn bench_value_scaling(c: &mut Criterion) {
    use midiwire::num::{U14, scale_7_to_32, scale_14_to_32, scale_32_to_14};

    let mut group = c.benchmark_group("scaling");
    group.bench_function("upscale_downscale_sweep", |b| {
        b.iter(|| {
            for v in 0..=0x3FFF_u16 {
                let value = U14::new_truncated(v);
                black_box(scale_32_to_14(scale_14_to_32(black_box(value))));
            }
            for v in 0..=0x7F_u8 {
                let value = U7::new_truncated(v);
                black_box(scale_7_to_32(black_box(value)));
            }
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_midi1_parse,
    bench_midi1_encode,
    bench_ump,
    bench_translate,
    bench_value_scaling
);
criterion_main!(benches);
