//! MIDI 1.0 serial byte-stream codec
//!
//! [`Midi1Parser`] consumes raw byte buffers (as read from a serial MIDI
//! port) and yields typed events, maintaining the cross-buffer state the
//! wire format demands: running status, in-flight System Exclusive
//! payloads, and per-channel RPN/NRPN accumulation. [`encode`] performs the
//! reverse, producing the canonical byte sequence for a single event.
//!
//! Malformed input never fails a parse call: the offending message is
//! dropped with a `tracing` log and the parser resynchronizes at the next
//! status byte.

mod encode;
mod parser;

pub use encode::encode;
pub use parser::Midi1Parser;
