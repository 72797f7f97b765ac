//! midiwire - Bidirectional codec for the MIDI wire protocol family
//!
//! This library translates between raw wire data and a strongly-typed,
//! validated MIDI event model, in both directions and for both wire formats:
//!
//! - **MIDI 1.0** serial byte streams ([`midi1`]), including running status
//!   and stateful RPN/NRPN reconstruction
//! - **MIDI 2.0** Universal MIDI Packet 32-bit word streams ([`ump`]),
//!   including SysEx7/SysEx8 reassembly and protocol-version-aware encoding
//! - **HUI** ([`hui`]), the control-surface remote-control protocol layered
//!   on MIDI, with zone/port switch addressing, display encodings and a
//!   mirrored surface-state model
//!
//! # Quick Start
//!
//! ```rust
//! use midiwire::event::{MidiEvent, Velocity};
//! use midiwire::midi1::Midi1Parser;
//! use midiwire::num::{U4, U7};
//!
//! // Decode a raw MIDI 1.0 byte stream
//! let mut parser = Midi1Parser::new();
//! let events = parser.parse(&[0x90, 0x3C, 0x64]);
//!
//! assert_eq!(
//!     events,
//!     [MidiEvent::NoteOn {
//!         note: U7::new(0x3C).unwrap(),
//!         velocity: Velocity::Midi1(U7::new(0x64).unwrap()),
//!         channel: U4::MIN,
//!         group: U4::MIN,
//!     }]
//! );
//!
//! // Encode it back to canonical bytes
//! let bytes = midiwire::midi1::encode(&events[0]).unwrap();
//! assert_eq!(bytes, [0x90, 0x3C, 0x64]);
//! ```
//!
//! # Design
//!
//! The codec is synchronous and performs no I/O: it is handed buffers and
//! returns events, or is handed events and returns buffers. The only mutable
//! state is per-stream (running status, RPN/NRPN accumulators, SysEx
//! reassembly buffers), owned by a parser instance. Use one parser instance
//! per logical input stream and never share it across streams.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod event;
pub mod hui;
pub mod midi1;
pub mod num;
pub mod ump;

mod pn;

pub use error::{Error, Result};
pub use event::{MidiEvent, MidiProtocol};

/// Maximum accepted System Exclusive payload size, in bytes.
///
/// Reassembly buffers are bounded by this limit so a malformed producer that
/// never terminates a SysEx stream cannot grow memory without bound.
pub const MAX_SYSEX_SIZE: usize = 64 * 1024;
