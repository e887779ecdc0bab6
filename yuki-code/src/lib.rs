//! Build the Yuki Code composite monospace font.
//!
//! Yuki Code merges three independently designed fonts into one:
//!
//! - a Latin font supplying the ASCII repertoire,
//! - a CJK font supplying kana and ideographs,
//! - a ligature font supplying programming ligatures (and the per-character
//!   glyphs that pair with them).
//!
//! Every glyph is rescaled onto a shared grid: Latin and ligature glyphs
//! occupy one cell, CJK glyphs occupy exactly two. The ligature glyphs are
//! then wired up with a `calt` substitution lookup.
//!
//! The reading side is [skrifa], the writing side is [write-fonts]; both are
//! hidden behind the [`SourceFont`] trait and [`compile_font`].
//!
//! [skrifa]: https://docs.rs/skrifa
//! [write-fonts]: https://docs.rs/write-fonts

#![cfg_attr(not(test), deny(clippy::unwrap_used))]

mod codec;
mod compose;
mod config;
mod error;
mod font;
mod ligature;
mod outline;
mod pipeline;
mod profile;
mod script;
mod subset;
mod substitution;
#[cfg(test)]
mod testing;

pub use codec::{compile_font, FontFile, SourceFont};
pub use compose::{GlyphTable, GlyphTableComposer, SourceFonts, Subsets};
pub use config::{BuildConfig, LigatureMultiplier, Preset, ProfileConfig, ReferenceChars};
pub use error::{BuildWarning, Error};
pub use font::{CompositeFont, FontMetrics, GlyphRecord, SubstitutionRule, NOTDEF};
pub use ligature::{LigatureData, LigatureRule};
pub use outline::{transform_path, PathRecorder};
pub use pipeline::{build, build_font, BuildInputs, BuildOutput, FontBuild};
pub use profile::{
    Layout, LayoutProfile, LigatureOffset, ReferenceWidths, Rounding, ScaleOffset,
    DEFAULT_CJK_CENTERING, DEFAULT_CJK_CORRECTION, DEFAULT_LIGATURE_FALLBACK,
    DEFAULT_LIGATURE_MULTIPLIERS,
};
pub use script::Script;
pub use subset::{load_subset, parse_subset};
pub use substitution::{build_gsub, LigatureTableBuilder, CALT};
