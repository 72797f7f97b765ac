//! System Exclusive identification
//!
//! The first payload bytes of a SysEx message identify the sender: either a
//! registered manufacturer (a single ID byte, or `0x00` followed by two
//! extension bytes) or one of the two universal stream IDs `0x7E` (non
//! realtime) and `0x7F` (realtime).

use bytes::Bytes;

use crate::error::{Error, Result};
use crate::num::U7;

/// SysEx manufacturer identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ManufacturerId {
    /// Single-byte ID (`0x01..=0x7D`)
    OneByte(U7),
    /// Extended ID: `0x00` lead byte followed by two bytes
    ThreeByte(U7, U7),
}

impl ManufacturerId {
    /// Wire bytes for this identifier (one or three bytes)
    #[must_use]
    pub fn to_bytes(self) -> Vec<u8> {
        match self {
            Self::OneByte(b) => vec![b.get()],
            Self::ThreeByte(b1, b2) => vec![0x00, b1.get(), b2.get()],
        }
    }
}

/// Scope of a universal SysEx message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UniversalKind {
    /// Stream ID `0x7E`
    NonRealtime,
    /// Stream ID `0x7F`
    Realtime,
}

impl UniversalKind {
    /// The stream ID byte for this scope
    #[must_use]
    pub const fn byte(self) -> u8 {
        match self {
            Self::NonRealtime => 0x7E,
            Self::Realtime => 0x7F,
        }
    }
}

/// Parsed leading portion of a SysEx payload
pub(crate) enum SysExHeader {
    Manufacturer(ManufacturerId),
    Universal {
        kind: UniversalKind,
        device_id: U7,
        sub_id1: U7,
        sub_id2: U7,
    },
}

/// Splits a raw payload (bytes between `F0` and `F7`, exclusive) into its
/// header and remaining data.
pub(crate) fn split_payload(payload: &[u8]) -> Result<(SysExHeader, Bytes)> {
    let (&first, rest) = payload.split_first().ok_or(Error::SysExEmpty)?;
    match first {
        0x7E | 0x7F => {
            let kind = if first == 0x7E {
                UniversalKind::NonRealtime
            } else {
                UniversalKind::Realtime
            };
            if rest.len() < 3 {
                return Err(Error::TruncatedPacket {
                    needed: 4,
                    got: payload.len(),
                });
            }
            let header = SysExHeader::Universal {
                kind,
                device_id: u7(rest[0])?,
                sub_id1: u7(rest[1])?,
                sub_id2: u7(rest[2])?,
            };
            Ok((header, Bytes::copy_from_slice(&rest[3..])))
        }
        0x00 => {
            if rest.len() < 2 {
                return Err(Error::TruncatedPacket {
                    needed: 3,
                    got: payload.len(),
                });
            }
            let id = ManufacturerId::ThreeByte(u7(rest[0])?, u7(rest[1])?);
            Ok((
                SysExHeader::Manufacturer(id),
                Bytes::copy_from_slice(&rest[2..]),
            ))
        }
        b => {
            let id = ManufacturerId::OneByte(u7(b)?);
            Ok((
                SysExHeader::Manufacturer(id),
                Bytes::copy_from_slice(rest),
            ))
        }
    }
}

fn u7(byte: u8) -> Result<U7> {
    U7::new(byte).ok_or(Error::InvalidDataByte { byte })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_byte_manufacturer() {
        let (header, data) = split_payload(&[0x41, 0x10, 0x42]).unwrap();
        match header {
            SysExHeader::Manufacturer(ManufacturerId::OneByte(b)) => assert_eq!(b.get(), 0x41),
            _ => panic!("expected one-byte manufacturer"),
        }
        assert_eq!(&data[..], &[0x10, 0x42]);
    }

    #[test]
    fn three_byte_manufacturer() {
        let (header, data) = split_payload(&[0x00, 0x00, 0x66, 0x05]).unwrap();
        match header {
            SysExHeader::Manufacturer(ManufacturerId::ThreeByte(b1, b2)) => {
                assert_eq!((b1.get(), b2.get()), (0x00, 0x66));
            }
            _ => panic!("expected three-byte manufacturer"),
        }
        assert_eq!(&data[..], &[0x05]);
    }

    #[test]
    fn universal_realtime() {
        let (header, data) = split_payload(&[0x7F, 0x7F, 0x04, 0x01, 0x00, 0x40]).unwrap();
        match header {
            SysExHeader::Universal {
                kind,
                device_id,
                sub_id1,
                sub_id2,
            } => {
                assert_eq!(kind, UniversalKind::Realtime);
                assert_eq!(device_id.get(), 0x7F);
                assert_eq!(sub_id1.get(), 0x04);
                assert_eq!(sub_id2.get(), 0x01);
            }
            SysExHeader::Manufacturer(_) => panic!("expected universal"),
        }
        assert_eq!(&data[..], &[0x00, 0x40]);
    }

    #[test]
    fn empty_payload_rejected() {
        assert!(matches!(split_payload(&[]), Err(Error::SysExEmpty)));
    }
}
