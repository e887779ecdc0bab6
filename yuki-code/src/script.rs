//! The three source scripts

use std::fmt::{self, Display};

/// Which source font a glyph comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Script {
    Latin,
    Cjk,
    Ligature,
}

impl Script {
    /// The one-letter prefix used in glyph names.
    pub fn tag(self) -> char {
        match self {
            Script::Latin => 'a',
            Script::Cjk => 'c',
            Script::Ligature => 'l',
        }
    }

    /// The composite glyph name for a character taken from this script's font.
    ///
    /// This is the script tag followed by the lowercase hex code point,
    /// zero-padded to at least four digits.
    pub fn glyph_name(self, ch: char) -> String {
        format!("{}{:04x}", self.tag(), u32::from(ch))
    }
}

impl Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Script::Latin => "Latin",
            Script::Cjk => "CJK",
            Script::Ligature => "ligature",
        };
        f.write_str(name)
    }
}
