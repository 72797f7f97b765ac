//! RPN / NRPN control-change accumulation
//!
//! Registered and non-registered parameter numbers arrive as a sequence of
//! plain control changes (CC 101/100 or 99/98 select the parameter, CC 6 and
//! CC 38 carry the data entry bytes). Both the byte-stream parser and the
//! UMP parser (for MIDI 1.0 channel-voice packets) divert those controllers
//! here so the sequence surfaces as a single [`MidiEvent::Rpn`] or
//! [`MidiEvent::Nrpn`] instead of loose control changes.
//!
//! Emission points:
//! - a data entry LSB (CC 38) completes the 4-message form immediately
//! - a pending data entry MSB (CC 6) with no LSB is held until the end of
//!   the decode call, or until the parameter selection changes
//! - the null function pair (0x7F, 0x7F) emits a bare null-parameter event
//!   and clears the channel's state

use crate::event::MidiEvent;
use crate::num::{U4, U7};

const CC_DATA_MSB: u8 = 0x06;
const CC_DATA_LSB: u8 = 0x26;
const CC_NRPN_LSB: u8 = 0x62;
const CC_NRPN_MSB: u8 = 0x63;
const CC_RPN_LSB: u8 = 0x64;
const CC_RPN_MSB: u8 = 0x65;

const NULL_FUNCTION: u8 = 0x7F;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PnKind {
    Registered,
    NonRegistered,
}

#[derive(Debug, Clone, Copy, Default)]
struct ChannelState {
    kind: Option<PnKind>,
    param_msb: Option<U7>,
    param_lsb: Option<U7>,
    data_msb: Option<U7>,
    group: U4,
}

/// Per-stream RPN/NRPN accumulator, one slot per MIDI channel.
#[derive(Debug, Default)]
pub(crate) struct PnAccumulator {
    channels: [ChannelState; 16],
}

impl PnAccumulator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Feeds a control change. Returns `true` when the controller belongs to
    /// the parameter-number protocol and was consumed; `false` means the
    /// caller should emit it as a plain control change. Completed events are
    /// appended to `out`.
    pub(crate) fn handle_cc(
        &mut self,
        channel: U4,
        group: U4,
        controller: U7,
        value: U7,
        out: &mut Vec<MidiEvent>,
    ) -> bool {
        let idx = channel.get() as usize;
        match controller.get() {
            CC_NRPN_MSB => {
                self.select(idx, channel, group, PnKind::NonRegistered, Some(value), None, out);
                true
            }
            CC_NRPN_LSB => {
                self.select(idx, channel, group, PnKind::NonRegistered, None, Some(value), out);
                true
            }
            CC_RPN_MSB => {
                self.select(idx, channel, group, PnKind::Registered, Some(value), None, out);
                true
            }
            CC_RPN_LSB => {
                self.select(idx, channel, group, PnKind::Registered, None, Some(value), out);
                true
            }
            CC_DATA_MSB if self.parameter_complete(idx) => {
                // a second data MSB for the same parameter is its own event
                if self.channels[idx].data_msb.is_some() {
                    self.flush_channel(idx, channel, out);
                }
                self.channels[idx].data_msb = Some(value);
                self.channels[idx].group = group;
                true
            }
            CC_DATA_LSB if self.parameter_complete(idx) => {
                let state = &mut self.channels[idx];
                let data_msb = state.data_msb.take();
                out.push(Self::event(
                    state.kind,
                    (state.param_msb, state.param_lsb),
                    data_msb,
                    Some(value),
                    channel,
                    group,
                ));
                true
            }
            _ => false,
        }
    }

    /// Emits any events still pending at the end of a decode call
    /// (3-message form: parameter plus data MSB, no LSB).
    pub(crate) fn flush(&mut self, out: &mut Vec<MidiEvent>) {
        for idx in 0..16 {
            let channel = U4::new_truncated(idx as u8);
            self.flush_channel(idx, channel, out);
        }
    }

    fn parameter_complete(&self, idx: usize) -> bool {
        let state = &self.channels[idx];
        state.kind.is_some() && state.param_msb.is_some() && state.param_lsb.is_some()
    }

    fn select(
        &mut self,
        idx: usize,
        channel: U4,
        group: U4,
        kind: PnKind,
        msb: Option<U7>,
        lsb: Option<U7>,
        out: &mut Vec<MidiEvent>,
    ) {
        self.flush_channel(idx, channel, out);
        let state = &mut self.channels[idx];
        if state.kind != Some(kind) {
            state.param_msb = None;
            state.param_lsb = None;
        }
        state.kind = Some(kind);
        state.data_msb = None;
        state.group = group;
        if let Some(msb) = msb {
            state.param_msb = Some(msb);
        }
        if let Some(lsb) = lsb {
            state.param_lsb = Some(lsb);
        }

        // the null function deselects the current parameter
        if state.param_msb.map(U7::get) == Some(NULL_FUNCTION)
            && state.param_lsb.map(U7::get) == Some(NULL_FUNCTION)
        {
            let kind = state.kind;
            out.push(Self::event(
                kind,
                (state.param_msb, state.param_lsb),
                None,
                None,
                channel,
                group,
            ));
            self.channels[idx] = ChannelState::default();
        }
    }

    fn flush_channel(&mut self, idx: usize, channel: U4, out: &mut Vec<MidiEvent>) {
        if !self.parameter_complete(idx) {
            return;
        }
        let state = &mut self.channels[idx];
        if let Some(data_msb) = state.data_msb.take() {
            let group = state.group;
            out.push(Self::event(
                state.kind,
                (state.param_msb, state.param_lsb),
                Some(data_msb),
                None,
                channel,
                group,
            ));
        }
    }

    fn event(
        kind: Option<PnKind>,
        parameter: (Option<U7>, Option<U7>),
        data_msb: Option<U7>,
        data_lsb: Option<U7>,
        channel: U4,
        group: U4,
    ) -> MidiEvent {
        let parameter = (
            parameter.0.unwrap_or(U7::MIN),
            parameter.1.unwrap_or(U7::MIN),
        );
        match kind {
            Some(PnKind::NonRegistered) => MidiEvent::Nrpn {
                parameter,
                data_msb,
                data_lsb,
                channel,
                group,
            },
            _ => MidiEvent::Rpn {
                parameter,
                data_msb,
                data_lsb,
                channel,
                group,
            },
        }
    }
}
