//! The composite font model

use kurbo::BezPath;
use write_fonts::types::GlyphId16;

/// Name of the glyph at index 0.
pub const NOTDEF: &str = ".notdef";

/// A glyph: a name, an optional code point, an advance and an outline.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GlyphRecord {
    pub name: String,
    pub codepoint: Option<char>,
    pub advance_width: f64,
    pub outline: BezPath,
}

/// Font-wide vertical metrics.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FontMetrics {
    pub units_per_em: f64,
    pub ascender: f64,
    /// Negative below the baseline.
    pub descender: f64,
}

/// Replace the sequence `input` with the glyph `output`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubstitutionRule {
    pub input: Vec<GlyphId16>,
    pub output: GlyphId16,
}

/// Everything needed to write the output font.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CompositeFont {
    pub family_name: String,
    pub style_name: String,
    pub metrics: FontMetrics,
    /// Index 0 is always [`NOTDEF`].
    pub glyphs: Vec<GlyphRecord>,
    pub substitutions: Vec<SubstitutionRule>,
}

impl GlyphRecord {
    /// The empty not-defined glyph.
    pub fn notdef(advance_width: f64) -> Self {
        GlyphRecord {
            name: NOTDEF.into(),
            codepoint: None,
            advance_width,
            outline: BezPath::new(),
        }
    }
}

impl CompositeFont {
    /// `Family-Style`, with spaces removed from the family name.
    pub fn postscript_name(&self) -> String {
        format!(
            "{}-{}",
            self.family_name.replace(' ', ""),
            self.style_name.replace(' ', "")
        )
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.family_name, self.style_name)
    }
}
