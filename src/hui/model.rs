//! Mirrored surface state and the surface session wrapper

use crate::error::Result;
use crate::event::MidiEvent;
use crate::num::U14;

use super::decoder::HuiHostEventDecoder;
use super::display::{LargeDisplaySlice, SmallDisplay, TimeDisplay, TimeDisplayChar};
use super::event::{HuiHostEvent, HuiSurfaceEvent, MeterSide};
use super::switch::{HuiSwitch, StripElement};
use super::vpot::{HuiVPot, VPotDisplay};

/// State of one of the eight channel strips.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HuiChannelStrip {
    /// Motorized fader position
    pub fader_level: U14,
    /// Fader touch sensor
    pub fader_touched: bool,
    /// Left meter segment count `0..=0xC`
    pub meter_left: u8,
    /// Right meter segment count `0..=0xC`
    pub meter_right: u8,
    /// Select button LED
    pub select: bool,
    /// Mute button LED
    pub mute: bool,
    /// Solo button LED
    pub solo: bool,
    /// Auto button LED
    pub auto: bool,
    /// Record-ready button LED
    pub record_ready: bool,
    /// Insert button LED
    pub insert: bool,
    /// V-Pot select button LED
    pub vpot_select: bool,
    /// 4-character name display
    pub name: SmallDisplay,
    /// V-Pot LED ring
    pub vpot: VPotDisplay,
}

impl Default for HuiChannelStrip {
    fn default() -> Self {
        Self {
            fader_level: U14::MIN,
            fader_touched: false,
            meter_left: 0,
            meter_right: 0,
            select: false,
            mute: false,
            solo: false,
            auto: false,
            record_ready: false,
            insert: false,
            vpot_select: false,
            name: SmallDisplay::default(),
            vpot: VPotDisplay::default(),
        }
    }
}

impl HuiChannelStrip {
    /// LED state of one of the strip's buttons.
    #[must_use]
    pub const fn element_led(&self, element: StripElement) -> bool {
        match element {
            StripElement::FaderTouched => self.fader_touched,
            StripElement::Select => self.select,
            StripElement::Mute => self.mute,
            StripElement::Solo => self.solo,
            StripElement::Auto => self.auto,
            StripElement::VPotSelect => self.vpot_select,
            StripElement::Insert => self.insert,
            StripElement::RecordReady => self.record_ready,
        }
    }

    fn element(&mut self, element: StripElement) -> &mut bool {
        match element {
            StripElement::FaderTouched => &mut self.fader_touched,
            StripElement::Select => &mut self.select,
            StripElement::Mute => &mut self.mute,
            StripElement::Solo => &mut self.solo,
            StripElement::Auto => &mut self.auto,
            StripElement::VPotSelect => &mut self.vpot_select,
            StripElement::Insert => &mut self.insert,
            StripElement::RecordReady => &mut self.record_ready,
        }
    }
}

/// A state change produced by [`HuiSurfaceModel::apply_host_event`].
///
/// Only emitted when the applied event actually changed the model, so a
/// host re-sending its full state produces no notification churn.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HuiNotification {
    /// A fader moved
    FaderLevel {
        /// Channel strip index `0..=7`
        channel: u8,
        /// New position
        level: U14,
    },
    /// A V-Pot ring changed
    VPotRing {
        /// Which pot
        vpot: HuiVPot,
        /// New display
        display: VPotDisplay,
    },
    /// A level meter changed
    LevelMeter {
        /// Channel strip index `0..=7`
        channel: u8,
        /// Meter side
        side: MeterSide,
        /// New segment count
        level: u8,
    },
    /// A switch LED changed
    Switch {
        /// Which switch
        switch: HuiSwitch,
        /// New LED state
        on: bool,
    },
    /// A channel strip name changed
    ChannelName {
        /// Channel strip index `0..=7`
        channel: u8,
        /// New text
        text: SmallDisplay,
    },
    /// The Select Assign display changed
    SelectAssign {
        /// New text
        text: SmallDisplay,
    },
    /// A large display slice changed
    LargeDisplay {
        /// Slice index `0..=7`
        slice: u8,
        /// New text
        text: LargeDisplaySlice,
    },
    /// The time display changed
    TimeDisplay {
        /// Full new contents, leftmost character first
        chars: [TimeDisplayChar; 8],
    },
    /// The surface state was reset
    Reset,
}

/// Mirror of everything a HUI surface shows.
///
/// Mutated only through [`apply_host_event`](Self::apply_host_event);
/// reads are free-form through the public fields and accessors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HuiSurfaceModel {
    strips: [HuiChannelStrip; 8],
    edit_assign_vpots: [VPotDisplay; 5],
    large_display: [LargeDisplaySlice; 8],
    time_display: TimeDisplay,
    select_assign: SmallDisplay,
    switch_leds: SwitchLedBank,
}

/// LED state per (zone, port) address outside the channel strips.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct SwitchLedBank {
    leds: [[bool; 8]; 0x20],
}

impl SwitchLedBank {
    fn slot(&mut self, zone: u8, port: u8) -> Option<&mut bool> {
        self.leds
            .get_mut(usize::from(zone))
            .and_then(|zone| zone.get_mut(usize::from(port)))
    }

    fn get(&self, zone: u8, port: u8) -> bool {
        self.leds
            .get(usize::from(zone))
            .and_then(|zone| zone.get(usize::from(port)))
            .copied()
            .unwrap_or(false)
    }
}

impl HuiSurfaceModel {
    /// Creates a model with every control at its power-on default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// One channel strip, or `None` for an index above 7.
    #[must_use]
    pub fn strip(&self, channel: u8) -> Option<&HuiChannelStrip> {
        self.strips.get(usize::from(channel))
    }

    /// All eight channel strips.
    #[must_use]
    pub const fn strips(&self) -> &[HuiChannelStrip; 8] {
        &self.strips
    }

    /// The large display, 8 slices of 10 characters.
    #[must_use]
    pub const fn large_display(&self) -> &[LargeDisplaySlice; 8] {
        &self.large_display
    }

    /// The time display, leftmost character first.
    #[must_use]
    pub const fn time_display(&self) -> &TimeDisplay {
        &self.time_display
    }

    /// The Select Assign 4-character display.
    #[must_use]
    pub const fn select_assign(&self) -> &SmallDisplay {
        &self.select_assign
    }

    /// Current LED state of a switch.
    ///
    /// Channel strip switches read from the strip state; everything else
    /// reads from the LED bank. Out-of-range addresses read as off.
    #[must_use]
    pub fn switch_led(&self, switch: HuiSwitch) -> bool {
        match switch {
            HuiSwitch::ChannelStrip(strip, element) if strip < 8 => {
                self.strips[usize::from(strip)].element_led(element)
            }
            _ => {
                let (zone, port) = switch.zone_and_port();
                self.switch_leds.get(zone, port)
            }
        }
    }

    /// Applies a host event, returning a notification when state changed.
    ///
    /// Replaying an event the model has already absorbed returns `None`.
    /// Pings carry no state and always return `None`; answering them is the
    /// session's job, see [`HuiSurface`].
    pub fn apply_host_event(&mut self, event: &HuiHostEvent) -> Option<HuiNotification> {
        match event {
            HuiHostEvent::Ping => None,
            HuiHostEvent::FaderLevel { channel, level } => {
                let strip = self.strips.get_mut(usize::from(*channel))?;
                update(&mut strip.fader_level, *level).then(|| HuiNotification::FaderLevel {
                    channel: *channel,
                    level: *level,
                })
            }
            HuiHostEvent::VPotRing { vpot, display } => {
                let slot = match vpot {
                    HuiVPot::Channel(n) => &mut self.strips.get_mut(usize::from(*n))?.vpot,
                    pot => &mut self.edit_assign_vpots[usize::from(pot.number()) - 8],
                };
                update(slot, *display).then(|| HuiNotification::VPotRing {
                    vpot: *vpot,
                    display: *display,
                })
            }
            HuiHostEvent::LevelMeter {
                channel,
                side,
                level,
            } => {
                let strip = self.strips.get_mut(usize::from(*channel))?;
                let slot = match side {
                    MeterSide::Left => &mut strip.meter_left,
                    MeterSide::Right => &mut strip.meter_right,
                };
                update(slot, *level).then(|| HuiNotification::LevelMeter {
                    channel: *channel,
                    side: *side,
                    level: *level,
                })
            }
            HuiHostEvent::Switch { switch, on } => {
                let slot = match switch {
                    HuiSwitch::ChannelStrip(strip, element) => {
                        self.strips.get_mut(usize::from(*strip))?.element(*element)
                    }
                    other => {
                        let (zone, port) = other.zone_and_port();
                        self.switch_leds.slot(zone, port)?
                    }
                };
                update(slot, *on).then(|| HuiNotification::Switch {
                    switch: *switch,
                    on: *on,
                })
            }
            HuiHostEvent::ChannelName { channel, text } => {
                let strip = self.strips.get_mut(usize::from(*channel))?;
                update(&mut strip.name, *text).then(|| HuiNotification::ChannelName {
                    channel: *channel,
                    text: *text,
                })
            }
            HuiHostEvent::SelectAssign { text } => update(&mut self.select_assign, *text)
                .then(|| HuiNotification::SelectAssign { text: *text }),
            HuiHostEvent::LargeDisplay { slice, text } => {
                let slot = self.large_display.get_mut(usize::from(*slice))?;
                update(slot, *text).then(|| HuiNotification::LargeDisplay {
                    slice: *slice,
                    text: *text,
                })
            }
            HuiHostEvent::TimeDisplay { chars } => self
                .time_display
                .update_right_to_left(chars)
                .then(|| HuiNotification::TimeDisplay {
                    chars: *self.time_display.chars(),
                }),
            HuiHostEvent::SystemReset => {
                if *self == Self::default() {
                    None
                } else {
                    *self = Self::default();
                    Some(HuiNotification::Reset)
                }
            }
        }
    }
}

fn update<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

/// What came out of feeding one MIDI event to a [`HuiSurface`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HuiInbound {
    /// State changes the event caused
    pub notifications: Vec<HuiNotification>,
    /// MIDI events to transmit back to the host (ping replies)
    pub replies: Vec<MidiEvent>,
}

/// A running surface session: decoder, mirrored model and keep-alive.
///
/// Feed every host-to-surface MIDI event to [`midi_in`](Self::midi_in) and
/// transmit whatever it returns in `replies`; pings are answered
/// automatically.
#[derive(Debug, Default)]
pub struct HuiSurface {
    model: HuiSurfaceModel,
    decoder: HuiHostEventDecoder,
}

impl HuiSurface {
    /// Creates a session with a fresh model and decoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The mirrored surface state.
    #[must_use]
    pub const fn model(&self) -> &HuiSurfaceModel {
        &self.model
    }

    /// Decodes one host MIDI event, applies it and answers pings.
    ///
    /// # Errors
    ///
    /// Propagates the decoder's [`crate::Error::NotHui`] and
    /// [`crate::Error::MalformedHui`]; neither disturbs the session state.
    pub fn midi_in(&mut self, event: &MidiEvent) -> Result<HuiInbound> {
        let mut out = HuiInbound::default();
        for host_event in self.decoder.decode(event)? {
            if host_event == HuiHostEvent::Ping {
                out.replies.extend(HuiSurfaceEvent::Ping.encode());
                continue;
            }
            if let Some(notification) = self.model.apply_host_event(&host_event) {
                out.notifications.push(notification);
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hui::switch::Transport;

    #[test]
    fn replayed_event_is_idempotent() {
        let mut model = HuiSurfaceModel::new();
        let event = HuiHostEvent::FaderLevel {
            channel: 2,
            level: U14::new(0x1000).unwrap(),
        };
        assert_eq!(
            model.apply_host_event(&event),
            Some(HuiNotification::FaderLevel {
                channel: 2,
                level: U14::new(0x1000).unwrap(),
            })
        );
        assert_eq!(model.apply_host_event(&event), None);
        assert_eq!(
            model.strip(2).unwrap().fader_level,
            U14::new(0x1000).unwrap()
        );
    }

    #[test]
    fn strip_index_above_seven_is_none() {
        let model = HuiSurfaceModel::new();
        assert!(model.strip(7).is_some());
        assert!(model.strip(8).is_none());
    }

    #[test]
    fn strip_switch_updates_strip_state() {
        let mut model = HuiSurfaceModel::new();
        let event = HuiHostEvent::Switch {
            switch: HuiSwitch::ChannelStrip(5, StripElement::Mute),
            on: true,
        };
        assert!(model.apply_host_event(&event).is_some());
        assert!(model.strip(5).unwrap().mute);
        assert!(model.switch_led(HuiSwitch::ChannelStrip(5, StripElement::Mute)));
    }

    #[test]
    fn led_bank_covers_non_strip_switches() {
        let mut model = HuiSurfaceModel::new();
        let switch = HuiSwitch::Transport(Transport::Record);
        let event = HuiHostEvent::Switch { switch, on: true };
        assert!(model.apply_host_event(&event).is_some());
        assert!(model.switch_led(switch));
        let event = HuiHostEvent::Switch { switch, on: false };
        assert!(model.apply_host_event(&event).is_some());
        assert!(!model.switch_led(switch));
    }

    #[test]
    fn time_display_notification_carries_full_contents() {
        let mut model = HuiSurfaceModel::new();
        let event = HuiHostEvent::TimeDisplay {
            chars: vec![
                TimeDisplayChar::digit(5, false),
                TimeDisplayChar::digit(4, true),
            ],
        };
        let Some(HuiNotification::TimeDisplay { chars }) = model.apply_host_event(&event) else {
            panic!("expected a time display notification");
        };
        assert_eq!(chars[7], TimeDisplayChar::digit(5, false));
        assert_eq!(chars[6], TimeDisplayChar::digit(4, true));
        assert_eq!(chars[0], TimeDisplayChar::SPACE);
        // same digits again change nothing
        assert_eq!(model.apply_host_event(&event), None);
    }

    #[test]
    fn reset_returns_to_defaults() {
        let mut model = HuiSurfaceModel::new();
        model.apply_host_event(&HuiHostEvent::SelectAssign {
            text: SmallDisplay::from_str_lossy("Send"),
        });
        assert_eq!(
            model.apply_host_event(&HuiHostEvent::SystemReset),
            Some(HuiNotification::Reset)
        );
        assert_eq!(model, HuiSurfaceModel::default());
        // resetting a pristine model is a no-op
        assert_eq!(model.apply_host_event(&HuiHostEvent::SystemReset), None);
    }

    #[test]
    fn surface_answers_pings() {
        let mut surface = HuiSurface::new();
        let ping = HuiHostEvent::Ping.encode().remove(0);
        let out = surface.midi_in(&ping).unwrap();
        assert!(out.notifications.is_empty());
        assert_eq!(out.replies, HuiSurfaceEvent::Ping.encode());
    }
}
