//! In-memory source fonts for unit tests

use std::collections::BTreeMap;

use kurbo::BezPath;
use skrifa::GlyphId;

use crate::{
    codec::SourceFont,
    error::Error,
    font::{FontMetrics, GlyphRecord},
};

#[derive(Clone, Debug, Default)]
pub(crate) struct MockFont {
    metrics: FontMetrics,
    glyphs: Vec<GlyphRecord>,
    cmap: BTreeMap<char, usize>,
}

/// A box `width` wide and `height` tall with its lower left corner at `x`, 0.
pub(crate) fn rect(x: f64, width: f64, height: f64) -> BezPath {
    let mut path = BezPath::new();
    path.move_to((x, 0.0));
    path.line_to((x + width, 0.0));
    path.line_to((x + width, height));
    path.line_to((x, height));
    path.close_path();
    path
}

impl MockFont {
    pub(crate) fn new(units_per_em: f64) -> Self {
        MockFont {
            metrics: FontMetrics {
                units_per_em,
                ascender: units_per_em * 0.8,
                descender: units_per_em * -0.2,
            },
            glyphs: vec![GlyphRecord::notdef(0.0)],
            cmap: BTreeMap::new(),
        }
    }

    /// Add an encoded glyph whose outline fills its advance.
    pub(crate) fn with_char(mut self, ch: char, advance: f64) -> Self {
        self.cmap.insert(ch, self.glyphs.len());
        self.glyphs.push(GlyphRecord {
            name: format!("uni{:04X}", u32::from(ch)),
            codepoint: Some(ch),
            advance_width: advance,
            outline: rect(0.0, advance, advance),
        });
        self
    }

    pub(crate) fn with_chars(self, chars: &str, advance: f64) -> Self {
        chars
            .chars()
            .fold(self, |font, ch| font.with_char(ch, advance))
    }

    /// Add an unencoded glyph.
    pub(crate) fn with_named(mut self, name: &str, advance: f64, outline: BezPath) -> Self {
        self.glyphs.push(GlyphRecord {
            name: name.into(),
            codepoint: None,
            advance_width: advance,
            outline,
        });
        self
    }
}

impl SourceFont for MockFont {
    fn metrics(&self) -> Result<FontMetrics, Error> {
        Ok(self.metrics)
    }

    fn glyph_count(&self) -> u32 {
        self.glyphs.len() as u32
    }

    fn has_glyph_for_char(&self, ch: char) -> bool {
        self.cmap.contains_key(&ch)
    }

    fn glyph_for_char(&self, ch: char) -> Result<Option<GlyphRecord>, Error> {
        Ok(self.cmap.get(&ch).map(|idx| self.glyphs[*idx].clone()))
    }

    fn glyph_by_name(&self, name: &str) -> Result<Option<GlyphRecord>, Error> {
        Ok(self.glyphs.iter().find(|glyph| glyph.name == name).cloned())
    }

    fn glyph_at(&self, glyph_id: GlyphId) -> Result<Option<GlyphRecord>, Error> {
        Ok(self.glyphs.get(glyph_id.to_u32() as usize).cloned())
    }
}
