//! Mackie HUI control surface protocol
//!
//! HUI rides on ordinary MIDI 1.0 messages: every controller lives on
//! channel 0, switches are addressed as a zone-select controller followed
//! by a port/state controller, faders split into MSB/LSB controller pairs
//! and the text displays travel as Mackie SysEx. This module turns those
//! message conventions into typed events ([`HuiHostEvent`] /
//! [`HuiSurfaceEvent`]), stateful per-stream decoders, and a mirrored
//! surface model ([`HuiSurfaceModel`]) with idempotent change
//! notifications.

mod decoder;
mod display;
mod event;
mod model;
mod switch;
mod vpot;

pub use decoder::{HuiHostEventDecoder, HuiSurfaceEventDecoder};
pub use display::{
    DISPLAY_CHARS, LargeDisplaySlice, SmallDisplay, TimeDisplay, TimeDisplayChar,
};
pub use event::{HuiHostEvent, HuiSurfaceEvent, MeterSide};
pub use model::{HuiChannelStrip, HuiInbound, HuiNotification, HuiSurface, HuiSurfaceModel};
pub use switch::{
    Assign, AutoEnable, AutoMode, BankMove, ControlRoom, Cursor, Edit, FootswitchesAndSounds,
    FunctionKey, HotKey, HuiSwitch, NumPad, ParamEdit, StatusAndGroup, StripElement,
    TimeDisplayStatus, Transport, Window,
};
pub use vpot::{HuiVPot, Led, VPotDisplay, VPotLedState, decode_delta, encode_delta};

use crate::event::ManufacturerId;
use crate::num::U7;

/// Mackie's manufacturer SysEx ID.
pub(crate) const MACKIE: ManufacturerId = ManufacturerId::ThreeByte(U7::MIN, U7::new_truncated(0x66));

/// HUI device and revision sub IDs, leading every display SysEx body.
pub(crate) const SYSEX_SUB_IDS: [u8; 2] = [0x05, 0x00];

// Display type bytes inside the SysEx body.
pub(crate) const DISPLAY_SMALL: u8 = 0x10;
pub(crate) const DISPLAY_TIME: u8 = 0x11;
pub(crate) const DISPLAY_LARGE: u8 = 0x12;

// Controller numbers, host-to-surface direction.
pub(crate) const CC_ZONE_TO_SURFACE: u8 = 0x0C;
pub(crate) const CC_PORT_TO_SURFACE: u8 = 0x2C;
pub(crate) const CC_VPOT_TO_SURFACE_BASE: u8 = 0x10;

// Controller numbers, surface-to-host direction.
pub(crate) const CC_ZONE_TO_HOST: u8 = 0x0F;
pub(crate) const CC_PORT_TO_HOST: u8 = 0x2F;
pub(crate) const CC_VPOT_TO_HOST_BASE: u8 = 0x40;
pub(crate) const CC_JOG: u8 = 0x0D;

// Controller numbers shared by both directions.
pub(crate) const CC_FADER_MSB_BASE: u8 = 0x00;
pub(crate) const CC_FADER_LSB_BASE: u8 = 0x20;

// State nibble of a port/state byte. 0x2 is transmitted by some hosts for
// switches they do not implement and is skipped on decode.
pub(crate) const STATE_OFF: u8 = 0x0;
pub(crate) const STATE_IGNORED: u8 = 0x2;
pub(crate) const STATE_ON: u8 = 0x4;
