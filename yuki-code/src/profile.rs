//! Grid layout: scale ratios and offsets for each source script
//!
//! The grid is anchored on the CJK font. Half the advance of a reference
//! CJK character is the *cell*, the advance of every Latin and ligature
//! glyph; CJK glyphs take two cells. All values are in CJK font units,
//! which are also the units of the composite font.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::{error::Error, font::FontMetrics, script::Script};

/// CJK outlines are drawn on a wider design grid than the other two fonts
/// (2:1 against 5:3), so they are shrunk by this factor to sit well next to
/// Latin glyphs. Found by eye, not derived from font metrics.
pub const DEFAULT_CJK_CORRECTION: f64 = 5.0 / 6.0;

/// Horizontal shift of CJK outlines, as a fraction of the double cell.
///
/// This is `(1 - 5/6) / 2`: it centers an outline shrunk by
/// [`DEFAULT_CJK_CORRECTION`] in its double cell.
pub const DEFAULT_CJK_CENTERING: f64 = 1.0 / 12.0;

/// Calibrated ligature offset multipliers by sequence length, tuned by eye
/// against Fira Code Regular.
pub const DEFAULT_LIGATURE_MULTIPLIERS: [(usize, f64); 1] = [(3, 4.75)];

/// Calibrated multiplier for sequence lengths not in
/// [`DEFAULT_LIGATURE_MULTIPLIERS`].
pub const DEFAULT_LIGATURE_FALLBACK: f64 = 2.25;

/// How transformed coordinates are rounded to integers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rounding {
    /// 0.5 rounds to 1, -0.5 rounds to -1.
    #[default]
    HalfAwayFromZero,
    /// 0.5 rounds to 0, 1.5 rounds to 2.
    HalfToEven,
}

impl Rounding {
    pub fn round(self, value: f64) -> f64 {
        match self {
            Rounding::HalfAwayFromZero => value.round(),
            Rounding::HalfToEven => value.round_ties_even(),
        }
    }
}

/// Horizontal offset of ligature replacement glyphs.
///
/// Ligature fonts draw a ligature at the position of the *last* character
/// of its sequence, so the outline has to move right to start where the
/// sequence starts.
#[derive(Clone, Debug, PartialEq)]
pub enum LigatureOffset {
    /// `(len - 1) * cell`
    Grid,
    /// `cell * ligature_ratio * multiplier`, with a multiplier per sequence
    /// length. Calibrated against Fira Code.
    Calibrated {
        multipliers: BTreeMap<usize, f64>,
        fallback: f64,
    },
}

impl LigatureOffset {
    /// The multipliers tuned for Fira Code Regular.
    pub fn calibrated() -> Self {
        LigatureOffset::Calibrated {
            multipliers: BTreeMap::from(DEFAULT_LIGATURE_MULTIPLIERS),
            fallback: DEFAULT_LIGATURE_FALLBACK,
        }
    }

    fn offset(&self, len: usize, cell: f64, ligature_ratio: f64) -> f64 {
        match self {
            LigatureOffset::Grid => len.saturating_sub(1) as f64 * cell,
            LigatureOffset::Calibrated {
                multipliers,
                fallback,
            } => cell * ligature_ratio * multipliers.get(&len).copied().unwrap_or(*fallback),
        }
    }
}

/// The tunable part of the layout.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutProfile {
    /// Scale applied to CJK outlines on top of the grid ratio.
    pub cjk_correction: f64,
    /// Right shift of CJK outlines, as a fraction of the double cell.
    pub cjk_centering: f64,
    pub ligature_offset: LigatureOffset,
    pub rounding: Rounding,
}

/// Advance widths of the reference characters, in each font's own units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReferenceWidths {
    pub latin: f64,
    pub cjk: f64,
    pub ligature: f64,
}

/// A scale followed by a translation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleOffset {
    pub scale_x: f64,
    pub scale_y: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

/// The resolved grid for one build.
#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    cell: f64,
    latin_ratio: f64,
    ligature_ratio: f64,
    cjk_ratio: f64,
    cjk_offset: f64,
    ligature_offset: LigatureOffset,
    rounding: Rounding,
}

impl Default for LayoutProfile {
    fn default() -> Self {
        Self::grid()
    }
}

impl LayoutProfile {
    /// Offsets derived from the grid itself.
    pub fn grid() -> Self {
        LayoutProfile {
            cjk_correction: DEFAULT_CJK_CORRECTION,
            cjk_centering: DEFAULT_CJK_CENTERING,
            ligature_offset: LigatureOffset::Grid,
            rounding: Rounding::HalfAwayFromZero,
        }
    }

    /// Ligature offsets calibrated by hand against Fira Code.
    pub fn calibrated() -> Self {
        LayoutProfile {
            ligature_offset: LigatureOffset::calibrated(),
            ..Self::grid()
        }
    }

    /// Compute the grid from the reference widths.
    pub fn resolve(&self, widths: ReferenceWidths) -> Result<Layout, Error> {
        for (script, width) in [
            (Script::Latin, widths.latin),
            (Script::Cjk, widths.cjk),
            (Script::Ligature, widths.ligature),
        ] {
            if !(width.is_finite() && width > 0.0) {
                return Err(Error::InvalidReferenceWidth { script, width });
            }
        }
        let cell = widths.cjk / 2.0;
        Ok(Layout {
            cell,
            latin_ratio: cell / widths.latin,
            ligature_ratio: cell / widths.ligature,
            cjk_ratio: self.cjk_correction,
            cjk_offset: 2.0 * cell * self.cjk_centering,
            ligature_offset: self.ligature_offset.clone(),
            rounding: self.rounding,
        })
    }
}

impl ScaleOffset {
    pub const IDENTITY: ScaleOffset = ScaleOffset::uniform(1.0);

    pub const fn uniform(scale: f64) -> Self {
        ScaleOffset {
            scale_x: scale,
            scale_y: scale,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    pub const fn with_offset_x(self, offset_x: f64) -> Self {
        ScaleOffset { offset_x, ..self }
    }
}

impl Layout {
    /// The canonical cell width, unrounded.
    pub fn cell(&self) -> f64 {
        self.cell
    }

    pub fn rounding(&self) -> Rounding {
        self.rounding
    }

    /// The scale ratio for glyphs of the given script.
    pub fn ratio(&self, script: Script) -> f64 {
        match script {
            Script::Latin => self.latin_ratio,
            Script::Cjk => self.cjk_ratio,
            Script::Ligature => self.ligature_ratio,
        }
    }

    /// The outline transform for per-character glyphs of the given script.
    pub fn transform(&self, script: Script) -> ScaleOffset {
        let transform = ScaleOffset::uniform(self.ratio(script));
        match script {
            Script::Cjk => transform.with_offset_x(self.cjk_offset),
            Script::Latin | Script::Ligature => transform,
        }
    }

    /// The outline transform for a ligature replacing `len` characters.
    pub fn ligature_transform(&self, len: usize) -> ScaleOffset {
        let offset = self
            .ligature_offset
            .offset(len, self.cell, self.ligature_ratio);
        ScaleOffset::uniform(self.ligature_ratio).with_offset_x(offset)
    }

    /// The advance of a single-cell glyph.
    ///
    /// Rounded once so that every other advance is an exact multiple of it.
    pub fn cell_advance(&self) -> f64 {
        self.rounding.round(self.cell)
    }

    /// The advance of a per-character glyph of the given script.
    pub fn advance(&self, script: Script) -> f64 {
        match script {
            Script::Cjk => 2.0 * self.cell_advance(),
            Script::Latin | Script::Ligature => self.cell_advance(),
        }
    }

    /// The advance of a ligature replacing `len` characters.
    pub fn ligature_advance(&self, len: usize) -> f64 {
        len as f64 * self.cell_advance()
    }

    /// Vertical metrics of the composite font, from those of the CJK font.
    pub fn font_metrics(&self, cjk: &FontMetrics) -> FontMetrics {
        let scale = |value: f64| self.rounding.round(value * self.cjk_ratio);
        FontMetrics {
            units_per_em: scale(cjk.units_per_em),
            ascender: scale(cjk.ascender),
            descender: scale(cjk.descender),
        }
    }
}
