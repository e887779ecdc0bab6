//! Assembling the glyph table
//!
//! Glyphs are appended in a fixed order:
//!
//! 1. `.notdef`
//! 2. the ligature font's glyphs for every character used in a ligature
//! 3. the Latin font's glyphs, except for characters taken in step 2
//! 4. the CJK font's glyphs
//!
//! Within each step characters go in code point order. The ligature font
//! wins shared characters because its plain glyphs are designed to match its
//! ligatures.

use std::collections::HashMap;

use write_fonts::types::GlyphId16;

use crate::{
    codec::SourceFont,
    error::{BuildWarning, Error},
    font::GlyphRecord,
    outline::transform_path,
    profile::Layout,
    script::Script,
};

/// The three source fonts.
#[derive(Clone, Copy)]
pub struct SourceFonts<'a> {
    pub latin: &'a dyn SourceFont,
    pub cjk: &'a dyn SourceFont,
    pub ligature: &'a dyn SourceFont,
}

/// The characters to take from each source font, each sorted ascending.
#[derive(Clone, Copy, Debug)]
pub struct Subsets<'a> {
    pub latin: &'a [char],
    pub cjk: &'a [char],
    pub ligature: &'a [char],
}

/// The glyphs of the composite font under construction.
#[derive(Clone, Debug)]
pub struct GlyphTable {
    glyphs: Vec<GlyphRecord>,
    char_map: HashMap<char, GlyphId16>,
    warnings: Vec<BuildWarning>,
}

/// Builds the per-character part of the [`GlyphTable`].
pub struct GlyphTableComposer<'a> {
    layout: &'a Layout,
}

impl GlyphTable {
    /// A table holding only `.notdef`.
    pub fn new(notdef_advance: f64) -> Self {
        GlyphTable {
            glyphs: vec![GlyphRecord::notdef(notdef_advance)],
            char_map: HashMap::new(),
            warnings: Vec::new(),
        }
    }

    /// Append a glyph, returning its id.
    ///
    /// An encoded glyph also claims its code point.
    pub fn push(&mut self, glyph: GlyphRecord) -> Result<GlyphId16, Error> {
        let glyph_id = u16::try_from(self.glyphs.len())
            .map(GlyphId16::new)
            .map_err(|_| Error::TooManyGlyphs(self.glyphs.len() + 1))?;
        if let Some(ch) = glyph.codepoint {
            self.char_map.entry(ch).or_insert(glyph_id);
        }
        self.glyphs.push(glyph);
        Ok(glyph_id)
    }

    /// The glyph that claimed `ch`.
    pub fn glyph_for_char(&self, ch: char) -> Option<GlyphId16> {
        self.char_map.get(&ch).copied()
    }

    pub fn glyphs(&self) -> &[GlyphRecord] {
        &self.glyphs
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Always `false`; `.notdef` is never removed.
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn warnings(&self) -> &[BuildWarning] {
        &self.warnings
    }

    pub(crate) fn warn(&mut self, warning: BuildWarning) {
        log::warn!("{warning}");
        self.warnings.push(warning);
    }

    pub fn into_parts(self) -> (Vec<GlyphRecord>, Vec<BuildWarning>) {
        (self.glyphs, self.warnings)
    }
}

impl<'a> SourceFonts<'a> {
    pub fn get(&self, script: Script) -> &'a dyn SourceFont {
        match script {
            Script::Latin => self.latin,
            Script::Cjk => self.cjk,
            Script::Ligature => self.ligature,
        }
    }
}

impl<'a> Subsets<'a> {
    pub fn get(&self, script: Script) -> &'a [char] {
        match script {
            Script::Latin => self.latin,
            Script::Cjk => self.cjk,
            Script::Ligature => self.ligature,
        }
    }
}

impl<'a> GlyphTableComposer<'a> {
    pub fn new(layout: &'a Layout) -> Self {
        GlyphTableComposer { layout }
    }

    pub fn compose(&self, fonts: &SourceFonts, subsets: &Subsets) -> Result<GlyphTable, Error> {
        let mut table = GlyphTable::new(self.layout.cell_advance());
        for script in [Script::Ligature, Script::Latin, Script::Cjk] {
            log::info!("Copying glyphs from {script} font");
            self.append_script(&mut table, script, fonts.get(script), subsets.get(script))?;
        }
        Ok(table)
    }

    fn append_script(
        &self,
        table: &mut GlyphTable,
        script: Script,
        font: &dyn SourceFont,
        chars: &[char],
    ) -> Result<(), Error> {
        let transform = self.layout.transform(script);
        let advance_width = self.layout.advance(script);
        for &ch in chars {
            // first writer wins; only the ligature font shares characters
            // with another source in practice
            if table.glyph_for_char(ch).is_some() {
                log::debug!("{script} glyph for {ch:?} skipped, already taken");
                continue;
            }
            let Some(source) = font.glyph_for_char(ch)? else {
                table.warn(BuildWarning::MissingGlyph { script, ch });
                continue;
            };
            table.push(GlyphRecord {
                name: script.glyph_name(ch),
                codepoint: Some(ch),
                advance_width,
                outline: transform_path(&source.outline, transform, self.layout.rounding()),
            })?;
        }
        Ok(())
    }
}
