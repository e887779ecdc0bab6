//! The build, from resource files to the output font file

use std::{fs, path::PathBuf};

use crate::{
    codec::{compile_font, FontFile, SourceFont},
    compose::{GlyphTableComposer, SourceFonts, Subsets},
    config::{BuildConfig, ReferenceChars},
    error::{BuildWarning, Error},
    font::CompositeFont,
    ligature::LigatureData,
    profile::{Layout, LayoutProfile, ReferenceWidths},
    script::Script,
    subset::load_subset,
    substitution::LigatureTableBuilder,
};

/// Everything [`build_font`] reads, already loaded.
#[derive(Clone, Copy)]
pub struct BuildInputs<'a> {
    pub fonts: SourceFonts<'a>,
    pub latin_subset: &'a [char],
    pub cjk_subset: &'a [char],
    pub ligatures: &'a LigatureData,
    pub profile: &'a LayoutProfile,
    pub reference: ReferenceChars,
    pub family_name: &'a str,
    pub style_name: &'a str,
}

/// An in-memory build result.
#[derive(Clone, Debug)]
pub struct FontBuild {
    pub font: CompositeFont,
    pub layout: Layout,
    pub warnings: Vec<BuildWarning>,
}

/// What [`build`] wrote.
#[derive(Clone, Debug)]
pub struct BuildOutput {
    pub path: PathBuf,
    pub glyph_count: usize,
    pub substitution_count: usize,
    pub warnings: Vec<BuildWarning>,
}

/// Compose the font from loaded inputs.
pub fn build_font(inputs: &BuildInputs) -> Result<FontBuild, Error> {
    let widths = ReferenceWidths {
        latin: reference_width(inputs.fonts.latin, Script::Latin, inputs.reference.latin)?,
        cjk: reference_width(inputs.fonts.cjk, Script::Cjk, inputs.reference.cjk)?,
        ligature: reference_width(
            inputs.fonts.ligature,
            Script::Ligature,
            inputs.reference.ligature,
        )?,
    };
    let layout = inputs.profile.resolve(widths)?;
    log::debug!("cell width {}, layout {layout:?}", layout.cell());

    let ligature_subset = inputs.ligatures.subset();
    let subsets = Subsets {
        latin: inputs.latin_subset,
        cjk: inputs.cjk_subset,
        ligature: &ligature_subset,
    };
    let mut table = GlyphTableComposer::new(&layout).compose(&inputs.fonts, &subsets)?;

    log::info!("Adding ligatures");
    let substitutions = LigatureTableBuilder::new(&layout, inputs.fonts.ligature)
        .build(inputs.ligatures.rules(), &mut table)?;

    let metrics = layout.font_metrics(&inputs.fonts.cjk.metrics()?);
    let (glyphs, warnings) = table.into_parts();
    Ok(FontBuild {
        font: CompositeFont {
            family_name: inputs.family_name.to_owned(),
            style_name: inputs.style_name.to_owned(),
            metrics,
            glyphs,
            substitutions,
        },
        layout,
        warnings,
    })
}

fn reference_width(font: &dyn SourceFont, script: Script, ch: char) -> Result<f64, Error> {
    font.glyph_for_char(ch)?
        .map(|glyph| glyph.advance_width)
        .ok_or(Error::MissingReferenceGlyph { script, ch })
}

/// Run the whole build described by `config` and write the output font.
///
/// Nothing is written if any step fails.
pub fn build(config: &BuildConfig) -> Result<BuildOutput, Error> {
    log::info!("Loading data");
    let latin_subset = load_subset(&config.latin_subset)?;
    let cjk_subset = load_subset(&config.cjk_subset)?;
    let ligatures = LigatureData::load(&config.ligatures)?;
    log::info!(
        "{} Latin, {} CJK and {} ligature characters, {} ligatures",
        latin_subset.len(),
        cjk_subset.len(),
        ligatures.chars().len(),
        ligatures.rule_count()
    );

    log::info!("Loading fonts");
    let latin_font = FontFile::load(&config.latin_font)?;
    let cjk_font = FontFile::load(&config.cjk_font)?;
    let ligature_font = FontFile::load(&config.ligature_font)?;

    let profile = config.layout_profile();
    let FontBuild { font, warnings, .. } = build_font(&BuildInputs {
        fonts: SourceFonts {
            latin: &latin_font,
            cjk: &cjk_font,
            ligature: &ligature_font,
        },
        latin_subset: &latin_subset,
        cjk_subset: &cjk_subset,
        ligatures: &ligatures,
        profile: &profile,
        reference: config.reference,
        family_name: &config.family_name,
        style_name: &config.style_name,
    })?;

    log::info!("Writing {}", config.output.display());
    let data = compile_font(&font)?;
    let write_error = |source: std::io::Error| Error::Write {
        path: config.output.clone(),
        source,
    };
    if let Some(dir) = config.output.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(write_error)?;
    }
    fs::write(&config.output, data).map_err(write_error)?;

    Ok(BuildOutput {
        path: config.output.clone(),
        glyph_count: font.glyphs.len(),
        substitution_count: font.substitutions.len(),
        warnings,
    })
}
