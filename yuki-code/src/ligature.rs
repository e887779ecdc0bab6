//! Ligature definitions
//!
//! Each non-comment, non-blank line of a ligature file is
//! `SEQUENCE [GLYPH_NAME]`. The characters of every sequence are added to
//! the ligature character set; lines that also carry a glyph name add a
//! substitution rule.
//!
//! ```text
//! # arrows
//! ->   hyphen_greater.liga
//! =>   equal_greater.liga
//! <=>  less_equal_greater.liga
//! ```

use std::{collections::BTreeSet, path::Path};

use indexmap::IndexMap;

use crate::{error::Error, subset::read_text};

/// The parsed contents of a ligature file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LigatureData {
    chars: BTreeSet<char>,
    // sequence -> glyph name, in order of first appearance
    rules: IndexMap<String, String>,
}

/// One ligature substitution: a character sequence and the glyph replacing it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LigatureRule<'a> {
    /// The characters being replaced.
    pub sequence: &'a str,
    /// The name of the replacement glyph in the ligature font.
    pub target: &'a str,
}

impl LigatureRule<'_> {
    /// The number of characters in the sequence.
    pub fn len(&self) -> usize {
        self.sequence.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

impl LigatureData {
    /// Parse the contents of a ligature file.
    ///
    /// If a sequence appears twice the later glyph name wins, but the rule
    /// keeps the position of its first appearance.
    pub fn parse(text: &str) -> Self {
        let mut data = LigatureData::default();
        for line in text.lines() {
            if line.starts_with('#') {
                continue;
            }
            let mut fields = line.split_whitespace();
            let Some(from) = fields.next() else {
                continue;
            };
            data.chars.extend(from.chars());
            let Some(to) = fields.next() else {
                continue;
            };
            if from.chars().nth(1).is_none() {
                log::warn!("ignoring ligature for single character '{from}'");
                continue;
            }
            data.rules.insert(from.to_owned(), to.to_owned());
        }
        data
    }

    /// Read and parse a ligature file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        read_text(path.as_ref()).map(|text| Self::parse(&text))
    }

    /// Returns `true` if `ch` occurs in any ligature sequence.
    pub fn contains(&self, ch: char) -> bool {
        self.chars.contains(&ch)
    }

    /// The set of characters used by ligature sequences.
    pub fn chars(&self) -> &BTreeSet<char> {
        &self.chars
    }

    /// The character set as an ascending sequence.
    pub fn subset(&self) -> Vec<char> {
        self.chars.iter().copied().collect()
    }

    /// The substitution rules, in definition order.
    pub fn rules(&self) -> impl Iterator<Item = LigatureRule<'_>> + '_ {
        self.rules.iter().map(|(sequence, target)| LigatureRule {
            sequence: sequence.as_str(),
            target: target.as_str(),
        })
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}
