//! HUI switch addressing
//!
//! Every button, fader touch sensor and status LED on a HUI surface is
//! addressed by a (zone, port) pair: zones `0x00..=0x1F`, ports `0..=7`.
//! Zones `0x00..=0x07` are the eight channel strips; the remaining zones
//! cover the fixed sections of the control surface. [`HuiSwitch`] is the
//! typed form of that address space, with [`HuiSwitch::Undefined`] covering
//! pairs the protocol leaves unassigned so unknown-but-well-formed wire data
//! stays representable.

/// Per-channel-strip switch elements (zones `0x00..=0x07`, port = element).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)]
pub enum StripElement {
    FaderTouched,
    Select,
    Mute,
    Solo,
    Auto,
    VPotSelect,
    Insert,
    RecordReady,
}

impl StripElement {
    pub(crate) const ALL: [Self; 8] = [
        Self::FaderTouched,
        Self::Select,
        Self::Mute,
        Self::Solo,
        Self::Auto,
        Self::VPotSelect,
        Self::Insert,
        Self::RecordReady,
    ];
}

macro_rules! hui_section {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $variant:ident => ($zone:literal, $port:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[allow(missing_docs)]
        pub enum $name {
            $( $variant, )+
        }

        impl $name {
            pub(crate) const ALL: &'static [Self] = &[ $( Self::$variant, )+ ];

            /// Wire (zone, port) address of this switch.
            #[must_use]
            pub const fn zone_and_port(self) -> (u8, u8) {
                match self {
                    $( Self::$variant => ($zone, $port), )+
                }
            }
        }
    };
}

hui_section! {
    /// Keyboard shortcut keys (zone `0x08`)
    HotKey {
        Ctrl => (0x08, 0), Shift => (0x08, 1), EditMode => (0x08, 2),
        Undo => (0x08, 3), Cmd => (0x08, 4), Option => (0x08, 5),
        EditTool => (0x08, 6), Save => (0x08, 7),
    }
}

hui_section! {
    /// Window function keys (zone `0x09`)
    Window {
        Mix => (0x09, 0), Edit => (0x09, 1), Transport => (0x09, 2),
        MemLoc => (0x09, 3), Status => (0x09, 4), Alt => (0x09, 5),
    }
}

hui_section! {
    /// Channel/bank scrolling (zone `0x0A`)
    BankMove {
        ChannelLeft => (0x0A, 0), BankLeft => (0x0A, 1),
        ChannelRight => (0x0A, 2), BankRight => (0x0A, 3),
    }
}

hui_section! {
    /// Assign sections 1 and 2, top left of the channel strips
    /// (zones `0x0B` and `0x0C`)
    Assign {
        Output => (0x0B, 0), Input => (0x0B, 1), Pan => (0x0B, 2),
        SendE => (0x0B, 3), SendD => (0x0B, 4), SendC => (0x0B, 5),
        SendB => (0x0B, 6), SendA => (0x0B, 7),
        Assign => (0x0C, 0), Default => (0x0C, 1), Suspend => (0x0C, 2),
        Shift => (0x0C, 3), Mute => (0x0C, 4), Bypass => (0x0C, 5),
        RecordReadyAll => (0x0C, 6),
    }
}

hui_section! {
    /// Cursor movement, mode, scrub and shuttle (zone `0x0D`)
    Cursor {
        Down => (0x0D, 0), Left => (0x0D, 1), Mode => (0x0D, 2),
        Right => (0x0D, 3), Up => (0x0D, 4), Scrub => (0x0D, 5),
        Shuttle => (0x0D, 6),
    }
}

hui_section! {
    /// Transport controls (zones `0x0E..=0x10`)
    Transport {
        Talkback => (0x0E, 0), Rewind => (0x0E, 1), FastFwd => (0x0E, 2),
        Stop => (0x0E, 3), Play => (0x0E, 4), Record => (0x0E, 5),
        Rtz => (0x0F, 0), End => (0x0F, 1), Online => (0x0F, 2),
        Loop => (0x0F, 3), QuickPunch => (0x0F, 4),
        PunchAudition => (0x10, 0), PunchPre => (0x10, 1), PunchIn => (0x10, 2),
        PunchOut => (0x10, 3), PunchPost => (0x10, 4),
    }
}

hui_section! {
    /// Control room monitoring (zones `0x11` and `0x12`)
    ControlRoom {
        Input3 => (0x11, 0), Input2 => (0x11, 1), Input1 => (0x11, 2),
        Mute => (0x11, 3), DiscreteInput1To1 => (0x11, 4),
        Output3 => (0x12, 0), Output2 => (0x12, 1), Output1 => (0x12, 2),
        Dim => (0x12, 3), Mono => (0x12, 4),
    }
}

hui_section! {
    /// Numeric keypad (zones `0x13..=0x15`)
    NumPad {
        Num0 => (0x13, 0), Num1 => (0x13, 1), Num4 => (0x13, 2),
        Num2 => (0x13, 3), Num5 => (0x13, 4), Period => (0x13, 5),
        Num3 => (0x13, 6), Num6 => (0x13, 7),
        Enter => (0x14, 0), Plus => (0x14, 1),
        Num7 => (0x15, 0), Num8 => (0x15, 1), Num9 => (0x15, 2),
        Minus => (0x15, 3), Clr => (0x15, 4), Equals => (0x15, 5),
        ForwardSlash => (0x15, 6), Asterisk => (0x15, 7),
    }
}

hui_section! {
    /// Time display mode LEDs, no buttons (zone `0x16`)
    TimeDisplayStatus {
        Timecode => (0x16, 0), Feet => (0x16, 1), Beats => (0x16, 2),
        RudeSolo => (0x16, 3),
    }
}

hui_section! {
    /// Automation enable section (zone `0x17`)
    AutoEnable {
        Plugin => (0x17, 0), Pan => (0x17, 1), Fader => (0x17, 2),
        SendMute => (0x17, 3), Send => (0x17, 4), Mute => (0x17, 5),
    }
}

hui_section! {
    /// Automation mode section (zone `0x18`)
    AutoMode {
        Trim => (0x18, 0), Latch => (0x18, 1), Read => (0x18, 2),
        Off => (0x18, 3), Write => (0x18, 4), Touch => (0x18, 5),
    }
}

hui_section! {
    /// Status/Group section (zone `0x19`)
    StatusAndGroup {
        Phase => (0x19, 0), Monitor => (0x19, 1), Auto => (0x19, 2),
        Suspend => (0x19, 3), Create => (0x19, 4), Group => (0x19, 5),
    }
}

hui_section! {
    /// Edit section (zone `0x1A`)
    Edit {
        Paste => (0x1A, 0), Cut => (0x1A, 1), Capture => (0x1A, 2),
        Delete => (0x1A, 3), Copy => (0x1A, 4), Separate => (0x1A, 5),
    }
}

hui_section! {
    /// Function keys (zone `0x1B`)
    FunctionKey {
        F1 => (0x1B, 0), F2 => (0x1B, 1), F3 => (0x1B, 2), F4 => (0x1B, 3),
        F5 => (0x1B, 4), F6 => (0x1B, 5), F7 => (0x1B, 6), F8OrEsc => (0x1B, 7),
    }
}

hui_section! {
    /// Parameter edit section below the large display (zone `0x1C`)
    ParamEdit {
        InsertOrParam => (0x1C, 0), Assign => (0x1C, 1),
        Param1Select => (0x1C, 2), Param2Select => (0x1C, 3),
        Param3Select => (0x1C, 4), Param4Select => (0x1C, 5),
        Bypass => (0x1C, 6), Compare => (0x1C, 7),
    }
}

hui_section! {
    /// Footswitch relays and sounds, functions only (zone `0x1D`)
    FootswitchesAndSounds {
        FootswitchRelay1 => (0x1D, 0), FootswitchRelay2 => (0x1D, 1),
        Click => (0x1D, 2), Beep => (0x1D, 3),
    }
}

/// A single HUI switch (button, touch sensor or LED).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)]
pub enum HuiSwitch {
    /// Channel strip element; strip index `0..=7`
    ChannelStrip(u8, StripElement),
    HotKey(HotKey),
    Window(Window),
    BankMove(BankMove),
    Assign(Assign),
    Cursor(Cursor),
    Transport(Transport),
    ControlRoom(ControlRoom),
    NumPad(NumPad),
    TimeDisplayStatus(TimeDisplayStatus),
    AutoEnable(AutoEnable),
    AutoMode(AutoMode),
    StatusAndGroup(StatusAndGroup),
    Edit(Edit),
    FunctionKey(FunctionKey),
    ParamEdit(ParamEdit),
    FootswitchesAndSounds(FootswitchesAndSounds),
    /// A (zone, port) pair with no assigned switch.
    ///
    /// Not an error; unknown pairs survive a decode/encode round trip.
    Undefined { zone: u8, port: u8 },
}

impl HuiSwitch {
    /// Number of defined switches.
    pub const COUNT: usize = 196;

    /// Every defined switch, ordered by (zone, port).
    pub const ALL: [Self; Self::COUNT] = build_all();

    /// Wire (zone, port) address of this switch.
    #[must_use]
    pub const fn zone_and_port(self) -> (u8, u8) {
        match self {
            Self::ChannelStrip(strip, element) => (strip, element as u8),
            Self::HotKey(p) => p.zone_and_port(),
            Self::Window(p) => p.zone_and_port(),
            Self::BankMove(p) => p.zone_and_port(),
            Self::Assign(p) => p.zone_and_port(),
            Self::Cursor(p) => p.zone_and_port(),
            Self::Transport(p) => p.zone_and_port(),
            Self::ControlRoom(p) => p.zone_and_port(),
            Self::NumPad(p) => p.zone_and_port(),
            Self::TimeDisplayStatus(p) => p.zone_and_port(),
            Self::AutoEnable(p) => p.zone_and_port(),
            Self::AutoMode(p) => p.zone_and_port(),
            Self::StatusAndGroup(p) => p.zone_and_port(),
            Self::Edit(p) => p.zone_and_port(),
            Self::FunctionKey(p) => p.zone_and_port(),
            Self::ParamEdit(p) => p.zone_and_port(),
            Self::FootswitchesAndSounds(p) => p.zone_and_port(),
            Self::Undefined { zone, port } => (zone, port),
        }
    }

    /// Looks up the switch assigned to a wire (zone, port) pair.
    ///
    /// Unassigned pairs return [`HuiSwitch::Undefined`].
    #[must_use]
    pub fn from_zone_port(zone: u8, port: u8) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|s| s.zone_and_port() == (zone, port))
            .unwrap_or(Self::Undefined { zone, port })
    }
}

macro_rules! copy_section {
    ($all:ident, $i:ident, $section:ident, $variant:ident) => {{
        let mut k = 0;
        while k < $section::ALL.len() {
            $all[$i] = HuiSwitch::$variant($section::ALL[k]);
            $i += 1;
            k += 1;
        }
    }};
}

const fn build_all() -> [HuiSwitch; HuiSwitch::COUNT] {
    let mut all = [HuiSwitch::Undefined { zone: 0, port: 0 }; HuiSwitch::COUNT];
    let mut i = 0;

    let mut strip = 0;
    while strip < 8 {
        let mut e = 0;
        while e < StripElement::ALL.len() {
            all[i] = HuiSwitch::ChannelStrip(strip, StripElement::ALL[e]);
            i += 1;
            e += 1;
        }
        strip += 1;
    }

    copy_section!(all, i, HotKey, HotKey);
    copy_section!(all, i, Window, Window);
    copy_section!(all, i, BankMove, BankMove);
    copy_section!(all, i, Assign, Assign);
    copy_section!(all, i, Cursor, Cursor);
    copy_section!(all, i, Transport, Transport);
    copy_section!(all, i, ControlRoom, ControlRoom);
    copy_section!(all, i, NumPad, NumPad);
    copy_section!(all, i, TimeDisplayStatus, TimeDisplayStatus);
    copy_section!(all, i, AutoEnable, AutoEnable);
    copy_section!(all, i, AutoMode, AutoMode);
    copy_section!(all, i, StatusAndGroup, StatusAndGroup);
    copy_section!(all, i, Edit, Edit);
    copy_section!(all, i, FunctionKey, FunctionKey);
    copy_section!(all, i, ParamEdit, ParamEdit);
    copy_section!(all, i, FootswitchesAndSounds, FootswitchesAndSounds);

    assert!(i == HuiSwitch::COUNT);
    all
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn all_table_has_unique_addresses() {
        let mut seen = HashSet::new();
        for sw in HuiSwitch::ALL {
            assert!(
                seen.insert(sw.zone_and_port()),
                "duplicate address {:?} for {sw:?}",
                sw.zone_and_port()
            );
        }
        assert_eq!(seen.len(), HuiSwitch::COUNT);
    }

    #[test]
    fn zone_port_round_trip_is_bijective() {
        for sw in HuiSwitch::ALL {
            let (zone, port) = sw.zone_and_port();
            assert_eq!(HuiSwitch::from_zone_port(zone, port), sw);
        }
    }

    #[test]
    fn unmapped_pairs_decode_to_undefined() {
        assert_eq!(
            HuiSwitch::from_zone_port(0x1E, 0),
            HuiSwitch::Undefined { zone: 0x1E, port: 0 }
        );
        // zone 0x14 defines only two ports
        assert_eq!(
            HuiSwitch::from_zone_port(0x14, 5),
            HuiSwitch::Undefined { zone: 0x14, port: 5 }
        );
        // and undefined addresses survive a round trip
        let sw = HuiSwitch::Undefined { zone: 0x1F, port: 7 };
        let (zone, port) = sw.zone_and_port();
        assert_eq!(HuiSwitch::from_zone_port(zone, port), sw);
    }

    #[test]
    fn known_addresses() {
        assert_eq!(
            HuiSwitch::Transport(Transport::Play).zone_and_port(),
            (0x0E, 4)
        );
        assert_eq!(
            HuiSwitch::Transport(Transport::PunchIn).zone_and_port(),
            (0x10, 2)
        );
        assert_eq!(
            HuiSwitch::ChannelStrip(3, StripElement::Solo).zone_and_port(),
            (0x03, 3)
        );
        assert_eq!(
            HuiSwitch::NumPad(NumPad::Asterisk).zone_and_port(),
            (0x15, 7)
        );
    }
}
