//! HUI text displays and character encodings
//!
//! HUI surfaces carry three kinds of text readout, each with a fixed wire
//! width:
//!
//! - nine small 4-character displays (one per channel strip plus the Select
//!   Assign readout), using the HUI display character set (near-ASCII with
//!   an accented low range)
//! - one large display of 8 slices of 10 characters (two 40-character rows)
//! - one 8-digit time display whose characters are transmitted right to left
//!   and use a dedicated digit table with optional trailing dots
//!
//! The string types here are fixed width by construction: every constructor
//! pads with spaces or truncates, so a stored display value is always
//! exactly its wire length.

use crate::num::U7;

/// HUI display character set, indexed by the 7-bit wire code.
///
/// Codes `0x20..=0x7F` are near-ASCII; the low range holds accented and
/// symbol characters.
pub const DISPLAY_CHARS: [&str; 128] = [
    "ì", "↑", "→", "↓", "←", "¿", "à", "Ø", "ø", "ò", "ù", "Ň", "Ç", "ê", "É", "é",
    "è", "Æ", "æ", "Å", "å", "Ä", "ä", "Ö", "ö", "Ü", "ü", "°C", "°F", "ß", "£", "¥",
    " ", "!", "\"", "#", "$", "%", "&", "'", "(", ")", "*", "+", ",", "-", ".", "/",
    "0", "1", "2", "3", "4", "5", "6", "7", "8", "9", ":", ";", "<", "=", ">", "?",
    "@", "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O",
    "P", "Q", "R", "S", "T", "U", "V", "W", "X", "Y", "Z", "[", "\\", "]", "^", "_",
    "`", "a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n", "o",
    "p", "q", "r", "s", "t", "u", "v", "w", "x", "y", "z", "{", "|", "}", "~", "░",
];

const SPACE: U7 = U7::new_truncated(0x20);

/// Encodes one character to its HUI display code; unmapped characters
/// become a space.
#[must_use]
pub fn encode_display_char(c: char) -> U7 {
    let mut buf = [0u8; 4];
    let s: &str = c.encode_utf8(&mut buf);
    DISPLAY_CHARS
        .iter()
        .position(|&entry| entry == s)
        .map_or(SPACE, |i| U7::new_truncated(i as u8))
}

macro_rules! display_string {
    (
        $(#[$meta:meta])*
        $name:ident, $len:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name {
            chars: [U7; $len],
        }

        impl Default for $name {
            /// All spaces.
            fn default() -> Self {
                Self { chars: [SPACE; $len] }
            }
        }

        impl $name {
            /// Wire width in characters.
            pub const LEN: usize = $len;

            /// Builds from raw display codes, padding with spaces or
            /// truncating to the fixed width.
            #[must_use]
            pub fn from_codes(codes: &[U7]) -> Self {
                let mut chars = [SPACE; $len];
                for (slot, &code) in chars.iter_mut().zip(codes.iter()) {
                    *slot = code;
                }
                Self { chars }
            }

            /// Encodes a string, padding with spaces or truncating to the
            /// fixed width. Characters outside the HUI display set become
            /// spaces.
            #[must_use]
            pub fn from_str_lossy(text: &str) -> Self {
                let mut chars = [SPACE; $len];
                for (slot, c) in chars.iter_mut().zip(text.chars()) {
                    *slot = encode_display_char(c);
                }
                Self { chars }
            }

            /// Raw display codes, always exactly [`Self::LEN`] long.
            #[must_use]
            pub const fn codes(&self) -> &[U7; $len] {
                &self.chars
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                for c in self.chars {
                    f.write_str(DISPLAY_CHARS[c.get() as usize])?;
                }
                Ok(())
            }
        }
    };
}

display_string! {
    /// 4-character text of a channel strip name or the Select Assign
    /// readout.
    SmallDisplay, 4
}

display_string! {
    /// One 10-character slice of the large display.
    ///
    /// Slices `0..=3` form the top 40-character row, `4..=7` the bottom row.
    LargeDisplaySlice, 10
}

/// Time display digit table, indexed by wire code `0x00..=0x30`.
///
/// `0x00..=0x0F` are hex digits, `0x10..=0x1F` the same digits with a
/// trailing dot, `0x20` a space and `0x30` a space with a trailing dot.
/// Codes in the gaps are unassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeDisplayChar(U7);

impl TimeDisplayChar {
    /// A blank digit position.
    pub const SPACE: Self = Self(U7::new_truncated(0x20));

    /// Wraps a raw wire code.
    #[must_use]
    pub const fn from_code(code: U7) -> Self {
        Self(code)
    }

    /// The digit `0..=15` with an optional trailing dot.
    #[must_use]
    pub fn digit(value: u8, dot: bool) -> Self {
        let base = value & 0x0F;
        Self(U7::new_truncated(if dot { base | 0x10 } else { base }))
    }

    /// Raw wire code.
    #[must_use]
    pub const fn code(self) -> U7 {
        self.0
    }

    /// Readable form; unassigned codes render as `?`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        const DIGITS: [&str; 16] = [
            "0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "A", "B", "C", "D", "E", "F",
        ];
        const DIGITS_DOT: [&str; 16] = [
            "0.", "1.", "2.", "3.", "4.", "5.", "6.", "7.", "8.", "9.", "A.", "B.", "C.", "D.",
            "E.", "F.",
        ];
        match self.0.get() {
            c @ 0x00..=0x0F => DIGITS[c as usize],
            c @ 0x10..=0x1F => DIGITS_DOT[(c - 0x10) as usize],
            0x20 => " ",
            0x30 => " .",
            _ => "?",
        }
    }
}

impl Default for TimeDisplayChar {
    fn default() -> Self {
        Self::SPACE
    }
}

/// The 8-digit time display, stored in logical left-to-right order.
///
/// The wire transmits digits right to left (the rightmost digits change
/// most often, so partial updates save bandwidth); [`update_right_to_left`]
/// applies such a partial update.
///
/// [`update_right_to_left`]: TimeDisplay::update_right_to_left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeDisplay {
    chars: [TimeDisplayChar; 8],
}

impl TimeDisplay {
    /// Builds from logical left-to-right characters, padding on the left
    /// with spaces or truncating to eight digits.
    #[must_use]
    pub fn from_chars(chars: &[TimeDisplayChar]) -> Self {
        let mut out = Self::default();
        let take = chars.len().min(8);
        let start = 8 - take;
        out.chars[start..].copy_from_slice(&chars[chars.len() - take..]);
        out
    }

    /// Applies a partial update of up to eight characters in wire order
    /// (first element is the rightmost digit). Returns whether anything
    /// changed.
    pub fn update_right_to_left(&mut self, chars: &[TimeDisplayChar]) -> bool {
        let mut changed = false;
        for (i, &c) in chars.iter().take(8).enumerate() {
            let slot = &mut self.chars[7 - i];
            if *slot != c {
                *slot = c;
                changed = true;
            }
        }
        changed
    }

    /// Logical left-to-right characters.
    #[must_use]
    pub const fn chars(&self) -> &[TimeDisplayChar; 8] {
        &self.chars
    }
}

impl std::fmt::Display for TimeDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for c in self.chars {
            f.write_str(c.as_str())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_display_is_always_four_chars() {
        assert_eq!(SmallDisplay::from_str_lossy("Kick").to_string(), "Kick");
        assert_eq!(SmallDisplay::from_str_lossy("Vox").to_string(), "Vox ");
        assert_eq!(
            SmallDisplay::from_str_lossy("Overheads").to_string(),
            "Over"
        );
        assert_eq!(SmallDisplay::from_str_lossy("").to_string(), "    ");
    }

    #[test]
    fn unmapped_characters_become_spaces() {
        assert_eq!(SmallDisplay::from_str_lossy("a€b").to_string(), "a b ");
    }

    #[test]
    fn display_codes_are_ascii_in_the_ascii_range() {
        let d = SmallDisplay::from_str_lossy("A z~");
        let codes: Vec<u8> = d.codes().iter().map(|c| c.get()).collect();
        assert_eq!(codes, [0x41, 0x20, 0x7A, 0x7E]);
    }

    #[test]
    fn accented_low_range_round_trips() {
        let code = encode_display_char('ö');
        assert_eq!(code.get(), 0x18);
        assert_eq!(DISPLAY_CHARS[code.get() as usize], "ö");
    }

    #[test]
    fn time_display_partial_update_is_right_aligned() {
        let mut td = TimeDisplay::default();
        let changed = td.update_right_to_left(&[
            TimeDisplayChar::digit(5, false),
            TimeDisplayChar::digit(4, true),
        ]);
        assert!(changed);
        assert_eq!(td.to_string(), "      4.5");
        // replaying the identical update reports no change
        assert!(!td.update_right_to_left(&[
            TimeDisplayChar::digit(5, false),
            TimeDisplayChar::digit(4, true),
        ]));
    }
}
