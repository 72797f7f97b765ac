//! midiwire error types

use thiserror::Error;

/// midiwire codec errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A data byte had its high bit set where a 7-bit value was required
    #[error("data byte {byte:#04x} has high bit set")]
    InvalidDataByte {
        /// Offending byte
        byte: u8,
    },

    /// A message declared more content than the buffer holds
    #[error("truncated packet: need {needed}, got {got}")]
    TruncatedPacket {
        /// Declared length (bytes or words)
        needed: usize,
        /// Remaining length in the buffer
        got: usize,
    },

    /// SysEx payload exceeds [`crate::MAX_SYSEX_SIZE`]
    #[error("SysEx payload too large: {size} bytes (max {max})")]
    SysExTooLarge {
        /// Payload size
        size: usize,
        /// Maximum allowed
        max: usize,
    },

    /// SysEx message carried no payload bytes
    #[error("SysEx message contains no payload")]
    SysExEmpty,

    /// Event cannot be expressed on the MIDI 1.0 byte protocol
    #[error("event {event} has no MIDI 1.0 byte encoding")]
    UnsupportedOnMidi1 {
        /// Human-readable event name
        event: &'static str,
    },

    /// A HUI MIDI message was structurally valid but not a HUI message
    #[error("not a HUI message: {detail}")]
    NotHui {
        /// What was unexpected about the message
        detail: &'static str,
    },

    /// A HUI message was recognized but carried malformed content
    #[error("malformed HUI message: {detail}")]
    MalformedHui {
        /// What was malformed
        detail: &'static str,
    },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
