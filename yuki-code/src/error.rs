//! Errors and build warnings

use std::{
    fmt::{self, Display},
    io,
    path::PathBuf,
};

use skrifa::{outline::DrawError, raw::ReadError, GlyphId};
use thiserror::Error;
use write_fonts::{tables::cmap::CmapConflict, BuilderError};

use crate::script::Script;

/// A fatal error; the build stops and nothing is written.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Unable to read '{path}': {source}")]
    ResourceUnavailable { path: PathBuf, source: io::Error },

    #[error("Unable to parse font '{path}': {source}")]
    FontParse { path: PathBuf, source: ReadError },

    #[error("Invalid config file '{path}': {source}")]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Reference character {ch:?} is missing from the {script} font")]
    MissingReferenceGlyph { script: Script, ch: char },

    #[error("Reference width {width} of the {script} font must be positive")]
    InvalidReferenceWidth { script: Script, width: f64 },

    #[error("Ligature '{sequence}' needs {ch:?}, which has no glyph")]
    MissingSubstitutionInput { sequence: String, ch: char },

    #[error("Unable to draw glyph {glyph_id} of '{path}': {source}")]
    Outline {
        path: PathBuf,
        glyph_id: GlyphId,
        source: DrawError,
    },

    #[error("Glyph '{name}' has a malformed outline: {reason}")]
    MalformedOutline { name: String, reason: String },

    #[error("Unable to compile glyph '{name}': {source}")]
    GlyphCompile {
        name: String,
        source: write_fonts::error::Error,
    },

    #[error("Too many glyphs: {0} (the limit is 65535)")]
    TooManyGlyphs(usize),

    #[error(transparent)]
    Cmap(#[from] CmapConflict),

    #[error(transparent)]
    Builder(#[from] BuilderError),

    #[error("Unable to write '{path}': {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// A recoverable problem; the glyph or rule is skipped and the build goes on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BuildWarning {
    /// A character from a subset has no glyph in its source font.
    MissingGlyph { script: Script, ch: char },
    /// A ligature rule names a glyph the ligature font doesn't have.
    MissingLigatureGlyph { sequence: String, name: String },
}

impl Display for BuildWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildWarning::MissingGlyph { script, ch } => write!(
                f,
                "missing glyph in {script} font: {ch} (U+{:04X})",
                u32::from(*ch)
            ),
            BuildWarning::MissingLigatureGlyph { sequence, name } => {
                write!(f, "missing ligature glyph: {name} (for '{sequence}')")
            }
        }
    }
}
