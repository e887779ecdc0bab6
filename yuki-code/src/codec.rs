//! Reading source fonts and writing the composite font
//!
//! Source fonts are read with skrifa, so both TrueType and CFF flavored
//! OpenType fonts work. The composite font is written with write-fonts as a
//! TrueType flavored font; cubic curves are approximated with quadratics
//! on the way out.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use kurbo::{BezPath, CubicBez, PathEl, Point};
use skrifa::{
    outline::DrawSettings,
    prelude::{LocationRef, Size},
    raw::FontRef,
    GlyphId, GlyphNames, MetadataProvider,
};
use write_fonts::{
    tables::{
        cmap::Cmap,
        glyf::{Bbox, GlyfLocaBuilder, SimpleGlyph},
        head::Head,
        hhea::Hhea,
        hmtx::{Hmtx, LongMetric},
        loca::LocaFormat,
        maxp::Maxp,
        name::{Name, NameRecord},
        os2::Os2,
        post::Post,
    },
    types::{FWord, Fixed, NameId, UfWord},
    FontBuilder,
};

use crate::{
    error::Error,
    font::{CompositeFont, FontMetrics, GlyphRecord},
    outline::PathRecorder,
    substitution::build_gsub,
};

/// Maximum distance between a cubic and its quadratic approximation, in
/// font units.
const CUBIC_TOLERANCE: f64 = 1.0;

// OS/2 code page bits
const CODE_PAGE_LATIN_1: u32 = 1 << 0;
const CODE_PAGE_JIS: u32 = 1 << 17;

const VERSION_STRING: &str = "Version 1.000";

/// A font glyphs can be taken from.
pub trait SourceFont {
    /// Units per em, ascender and descender.
    fn metrics(&self) -> Result<FontMetrics, Error>;

    fn glyph_count(&self) -> u32;

    /// Returns `true` if the character map has an entry for `ch`.
    fn has_glyph_for_char(&self, ch: char) -> bool;

    /// The glyph mapped to `ch`, if any.
    fn glyph_for_char(&self, ch: char) -> Result<Option<GlyphRecord>, Error>;

    /// The glyph with the given name in the font's own glyph table.
    ///
    /// Ligature glyphs are usually unencoded, so this is the only way to
    /// reach them.
    fn glyph_by_name(&self, name: &str) -> Result<Option<GlyphRecord>, Error>;

    /// The glyph at `glyph_id`, if it is in range.
    fn glyph_at(&self, glyph_id: GlyphId) -> Result<Option<GlyphRecord>, Error>;
}

/// A font file held in memory.
pub struct FontFile {
    path: PathBuf,
    data: Vec<u8>,
    // indexed by glyph id
    names: Vec<String>,
    ids: HashMap<String, GlyphId>,
}

impl FontFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|source| Error::ResourceUnavailable {
            path: path.to_owned(),
            source,
        })?;
        Self::new(path.to_owned(), data)
    }

    /// Wrap font data that did not come from a file.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, Error> {
        Self::new(PathBuf::from("<memory>"), data)
    }

    fn new(path: PathBuf, data: Vec<u8>) -> Result<Self, Error> {
        let font = FontRef::new(&data).map_err(|source| Error::FontParse {
            path: path.clone(),
            source,
        })?;
        let names: Vec<String> = GlyphNames::new(&font)
            .iter()
            .map(|(_, name)| name.as_str().to_owned())
            .collect();
        let ids = names
            .iter()
            .enumerate()
            .map(|(gid, name)| (name.clone(), GlyphId::new(gid as u32)))
            .collect();
        log::debug!("loaded '{}' with {} glyphs", path.display(), names.len());
        Ok(FontFile {
            path,
            data,
            names,
            ids,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn font(&self) -> Result<FontRef<'_>, Error> {
        FontRef::new(&self.data).map_err(|source| Error::FontParse {
            path: self.path.clone(),
            source,
        })
    }

    fn glyph_record(
        &self,
        font: &FontRef,
        glyph_id: GlyphId,
        codepoint: Option<char>,
    ) -> Result<GlyphRecord, Error> {
        let advance_width = font
            .glyph_metrics(Size::unscaled(), LocationRef::default())
            .advance_width(glyph_id)
            .unwrap_or_default();
        let mut pen = PathRecorder::default();
        if let Some(outline) = font.outline_glyphs().get(glyph_id) {
            let settings = DrawSettings::unhinted(Size::unscaled(), LocationRef::default());
            outline
                .draw(settings, &mut pen)
                .map_err(|source| Error::Outline {
                    path: self.path.clone(),
                    glyph_id,
                    source,
                })?;
        }
        let name = self
            .names
            .get(glyph_id.to_u32() as usize)
            .cloned()
            .unwrap_or_default();
        Ok(GlyphRecord {
            name,
            codepoint,
            advance_width: advance_width as f64,
            outline: pen.into_path(),
        })
    }
}

impl SourceFont for FontFile {
    fn metrics(&self) -> Result<FontMetrics, Error> {
        let metrics = self
            .font()?
            .metrics(Size::unscaled(), LocationRef::default());
        Ok(FontMetrics {
            units_per_em: metrics.units_per_em as f64,
            ascender: metrics.ascent as f64,
            descender: metrics.descent as f64,
        })
    }

    fn glyph_count(&self) -> u32 {
        self.names.len() as u32
    }

    fn has_glyph_for_char(&self, ch: char) -> bool {
        // `new` already parsed `data`, so this can't fail
        self.font()
            .map(|font| font.charmap().map(ch).is_some())
            .unwrap_or(false)
    }

    fn glyph_for_char(&self, ch: char) -> Result<Option<GlyphRecord>, Error> {
        let font = self.font()?;
        match font.charmap().map(ch) {
            Some(glyph_id) => self.glyph_record(&font, glyph_id, Some(ch)).map(Some),
            None => Ok(None),
        }
    }

    fn glyph_by_name(&self, name: &str) -> Result<Option<GlyphRecord>, Error> {
        match self.ids.get(name) {
            Some(glyph_id) => self.glyph_at(*glyph_id),
            None => Ok(None),
        }
    }

    fn glyph_at(&self, glyph_id: GlyphId) -> Result<Option<GlyphRecord>, Error> {
        if glyph_id.to_u32() >= self.glyph_count() {
            return Ok(None);
        }
        let font = self.font()?;
        self.glyph_record(&font, glyph_id, None).map(Some)
    }
}

/// Serialize the composite font, including its substitutions.
pub fn compile_font(font: &CompositeFont) -> Result<Vec<u8>, Error> {
    let num_glyphs =
        u16::try_from(font.glyphs.len()).map_err(|_| Error::TooManyGlyphs(font.glyphs.len()))?;

    let mut glyf_builder = GlyfLocaBuilder::new();
    let mut h_metrics = Vec::with_capacity(font.glyphs.len());
    let mut extents = Extents::default();
    for glyph in &font.glyphs {
        let simple = simple_glyph(glyph)?;
        glyf_builder
            .add_glyph(&simple)
            .map_err(|source| Error::GlyphCompile {
                name: glyph.name.clone(),
                source,
            })?;
        let advance = to_u16(glyph.advance_width);
        extents.add(&simple, advance);
        h_metrics.push(LongMetric {
            advance,
            side_bearing: if simple.contours.is_empty() {
                0
            } else {
                simple.bbox.x_min
            },
        });
    }
    let (glyf, loca, loca_format) = glyf_builder.build();
    let bbox = extents.bbox.unwrap_or_default();

    let ascender = to_i16(font.metrics.ascender);
    let descender = to_i16(font.metrics.descender);

    let head = Head {
        font_revision: Fixed::from_f64(1.0),
        units_per_em: to_u16(font.metrics.units_per_em),
        x_min: bbox.x_min,
        y_min: bbox.y_min,
        x_max: bbox.x_max,
        y_max: bbox.y_max,
        lowest_rec_ppem: 8,
        index_to_loc_format: match loca_format {
            LocaFormat::Short => 0,
            LocaFormat::Long => 1,
        },
        ..Default::default()
    };
    let hhea = Hhea {
        ascender: FWord::new(ascender),
        descender: FWord::new(descender),
        advance_width_max: UfWord::new(extents.advance_max),
        min_left_side_bearing: FWord::new(extents.min_lsb.unwrap_or_default()),
        min_right_side_bearing: FWord::new(extents.min_rsb.unwrap_or_default()),
        x_max_extent: FWord::new(extents.x_max_extent.unwrap_or_default()),
        caret_slope_rise: 1,
        number_of_h_metrics: num_glyphs,
        ..Default::default()
    };
    let maxp = Maxp {
        num_glyphs,
        max_points: Some(extents.max_points),
        max_contours: Some(extents.max_contours),
        max_composite_points: Some(0),
        max_composite_contours: Some(0),
        max_zones: Some(1),
        max_twilight_points: Some(0),
        max_storage: Some(0),
        max_function_defs: Some(0),
        max_instruction_defs: Some(0),
        max_stack_elements: Some(0),
        max_size_of_instructions: Some(0),
        max_component_elements: Some(0),
        max_component_depth: Some(0),
    };
    let hmtx = Hmtx {
        h_metrics,
        left_side_bearings: Vec::new(),
    };

    let mappings: Vec<(char, write_fonts::types::GlyphId)> = font
        .glyphs
        .iter()
        .enumerate()
        .filter_map(|(gid, glyph)| {
            glyph
                .codepoint
                .map(|ch| (ch, write_fonts::types::GlyphId::new(gid as u32)))
        })
        .collect();
    let first_char = mappings.iter().map(|(ch, _)| *ch).min();
    let last_char = mappings.iter().map(|(ch, _)| *ch).max();
    let cmap = Cmap::from_mappings(mappings)?;

    let os2 = Os2 {
        x_avg_char_width: extents.average_advance(),
        us_weight_class: 400,
        us_width_class: 5,
        s_typo_ascender: ascender,
        s_typo_descender: descender,
        s_typo_line_gap: 0,
        us_win_ascent: ascender.max(0) as u16,
        us_win_descent: descender.min(0).unsigned_abs(),
        us_first_char_index: first_char.map(bmp_index).unwrap_or_default(),
        us_last_char_index: last_char.map(bmp_index).unwrap_or_default(),
        ul_code_page_range_1: Some(CODE_PAGE_LATIN_1 | CODE_PAGE_JIS),
        ul_code_page_range_2: Some(0),
        ..Default::default()
    };

    let mut post = Post::new_v2(font.glyphs.iter().map(|glyph| glyph.name.as_str()));
    post.is_fixed_pitch = 1;

    let name = name_table(font);

    let mut builder = FontBuilder::new();
    builder
        .add_table(&head)?
        .add_table(&hhea)?
        .add_table(&maxp)?
        .add_table(&os2)?
        .add_table(&hmtx)?
        .add_table(&cmap)?
        .add_table(&loca)?
        .add_table(&glyf)?
        .add_table(&post)?
        .add_table(&name)?;
    if let Some(gsub) = build_gsub(&font.substitutions) {
        builder.add_table(&gsub)?;
    }
    Ok(builder.build())
}

fn name_table(font: &CompositeFont) -> Name {
    let full_name = font.full_name();
    let strings = [
        (NameId::FAMILY_NAME, font.family_name.clone()),
        (NameId::SUBFAMILY_NAME, font.style_name.clone()),
        (NameId::UNIQUE_ID, format!("1.000;{}", font.postscript_name())),
        (NameId::FULL_NAME, full_name),
        (NameId::VERSION_STRING, VERSION_STRING.to_owned()),
        (NameId::POSTSCRIPT_NAME, font.postscript_name()),
    ];
    // already sorted by name id, all on the Windows Unicode BMP platform
    Name::new(
        strings
            .into_iter()
            .map(|(name_id, string)| NameRecord::new(3, 1, 0x409, name_id, string.into()))
            .collect(),
    )
}

fn simple_glyph(glyph: &GlyphRecord) -> Result<SimpleGlyph, Error> {
    if glyph.outline.elements().is_empty() {
        return Ok(SimpleGlyph::default());
    }
    SimpleGlyph::from_bezpath(&cubics_to_quads(&glyph.outline)).map_err(|e| {
        Error::MalformedOutline {
            name: glyph.name.clone(),
            reason: format!("{e:?}"),
        }
    })
}

/// Replace every cubic segment with a run of quadratic ones.
fn cubics_to_quads(path: &BezPath) -> BezPath {
    let mut result = BezPath::new();
    let mut start = Point::ZERO;
    let mut current = Point::ZERO;
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p0) => {
                result.move_to(p0);
                start = p0;
                current = p0;
            }
            PathEl::LineTo(p0) => {
                result.line_to(p0);
                current = p0;
            }
            PathEl::QuadTo(p0, p1) => {
                result.quad_to(p0, p1);
                current = p1;
            }
            PathEl::CurveTo(p0, p1, p2) => {
                for (_, _, quad) in CubicBez::new(current, p0, p1, p2).to_quads(CUBIC_TOLERANCE) {
                    result.quad_to(quad.p1, quad.p2);
                }
                current = p2;
            }
            PathEl::ClosePath => {
                result.close_path();
                current = start;
            }
        }
    }
    result
}

/// Running totals for the font-wide metrics.
#[derive(Default)]
struct Extents {
    bbox: Option<Bbox>,
    advance_max: u16,
    advance_total: u64,
    advance_count: u64,
    min_lsb: Option<i16>,
    min_rsb: Option<i16>,
    x_max_extent: Option<i16>,
    max_points: u16,
    max_contours: u16,
}

impl Extents {
    fn add(&mut self, glyph: &SimpleGlyph, advance: u16) {
        self.advance_max = self.advance_max.max(advance);
        if advance > 0 {
            self.advance_total += advance as u64;
            self.advance_count += 1;
        }
        if glyph.contours.is_empty() {
            return;
        }
        let bbox = glyph.bbox;
        self.bbox = Some(self.bbox.map_or(bbox, |current| current.union(bbox)));
        let rsb = (advance as i32 - bbox.x_max as i32).clamp(i16::MIN as i32, i16::MAX as i32);
        self.min_lsb = Some(self.min_lsb.map_or(bbox.x_min, |v| v.min(bbox.x_min)));
        self.min_rsb = Some(self.min_rsb.map_or(rsb as i16, |v| v.min(rsb as i16)));
        self.x_max_extent = Some(self.x_max_extent.map_or(bbox.x_max, |v| v.max(bbox.x_max)));
        let points: usize = glyph.contours.iter().map(|contour| contour.len()).sum();
        self.max_points = self.max_points.max(points.min(u16::MAX as usize) as u16);
        let contours = glyph.contours.len().min(u16::MAX as usize) as u16;
        self.max_contours = self.max_contours.max(contours);
    }

    fn average_advance(&self) -> i16 {
        if self.advance_count == 0 {
            return 0;
        }
        let average = (self.advance_total as f64 / self.advance_count as f64).round();
        average.min(i16::MAX as f64) as i16
    }
}

fn to_u16(value: f64) -> u16 {
    value.round().clamp(0.0, u16::MAX as f64) as u16
}

fn to_i16(value: f64) -> i16 {
    value.round().clamp(i16::MIN as f64, i16::MAX as f64) as i16
}

fn bmp_index(ch: char) -> u16 {
    u16::try_from(u32::from(ch)).unwrap_or(u16::MAX)
}
