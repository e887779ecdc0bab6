//! End-to-end builds from font files on disk

use std::{fs, path::Path};

use kurbo::BezPath;
use skrifa::{
    prelude::{LocationRef, Size},
    raw::{FontRef, TableProvider},
    GlyphNames, MetadataProvider,
};
use yuki_code::{
    build, build_font, compile_font, BuildConfig, BuildInputs, BuildWarning, CompositeFont,
    Error, FontFile, FontMetrics, GlyphRecord, LayoutProfile, LigatureData, ReferenceChars,
    Script, SourceFonts, CALT, NOTDEF,
};

fn rect(x: f64, width: f64, height: f64) -> BezPath {
    let mut path = BezPath::new();
    path.move_to((x, 0.0));
    path.line_to((x + width, 0.0));
    path.line_to((x + width, height));
    path.line_to((x, height));
    path.close_path();
    path
}

fn encoded(ch: char, advance: f64) -> GlyphRecord {
    GlyphRecord {
        name: format!("uni{:04X}", u32::from(ch)),
        codepoint: Some(ch),
        advance_width: advance,
        outline: rect(0.0, advance, advance),
    }
}

/// Compile a source font with one square glyph per character.
fn source_font(units_per_em: f64, chars: &str, advance: f64, extra: Vec<GlyphRecord>) -> Vec<u8> {
    let mut glyphs = vec![GlyphRecord::notdef(advance)];
    glyphs.extend(chars.chars().map(|ch| encoded(ch, advance)));
    glyphs.extend(extra);
    compile_font(&CompositeFont {
        family_name: "Source".into(),
        style_name: "Regular".into(),
        metrics: FontMetrics {
            units_per_em,
            ascender: units_per_em * 0.8,
            descender: units_per_em * -0.2,
        },
        glyphs,
        substitutions: Vec::new(),
    })
    .unwrap()
}

fn latin_font() -> Vec<u8> {
    source_font(1000.0, "-<=>abc", 600.0, Vec::new())
}

fn cjk_font() -> Vec<u8> {
    source_font(1000.0, "あいう", 1000.0, Vec::new())
}

fn ligature_font() -> Vec<u8> {
    let ligatures = vec![
        GlyphRecord {
            name: "hyphen_greater.liga".into(),
            codepoint: None,
            advance_width: 1200.0,
            outline: rect(-1200.0, 2400.0, 1200.0),
        },
        GlyphRecord {
            name: "less_equal_greater.liga".into(),
            codepoint: None,
            advance_width: 1200.0,
            outline: rect(-2400.0, 3600.0, 1200.0),
        },
    ];
    source_font(1950.0, "-<=>a", 1200.0, ligatures)
}

const LIGATURES: &str = "\
# arrows
-> hyphen_greater.liga
<=> less_equal_greater.liga
=> equal_greater.liga
==
";

/// Lay out the default resource tree under `root`.
fn write_resources(root: &Path, ligatures: &str) -> BuildConfig {
    let config = BuildConfig::with_root(root);
    let files = [
        (&config.latin_subset, "# ascii\n-<=>\nabcd\n".as_bytes().to_vec()),
        (&config.cjk_subset, "あいう字\n".as_bytes().to_vec()),
        (&config.ligatures, ligatures.as_bytes().to_vec()),
        (&config.latin_font, latin_font()),
        (&config.cjk_font, cjk_font()),
        (&config.ligature_font, ligature_font()),
    ];
    for (path, data) in files {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, data).unwrap();
    }
    config
}

fn advance(font: &FontRef, ch: char) -> f32 {
    let glyph_id = font.charmap().map(ch).unwrap();
    font.glyph_metrics(Size::unscaled(), LocationRef::default())
        .advance_width(glyph_id)
        .unwrap()
}

#[test]
fn build_from_resource_tree() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_resources(dir.path(), LIGATURES);
    let output = build(&config).unwrap();

    assert_eq!(output.path, dir.path().join("output/YukiCode-Regular.ttf"));
    // notdef, 4 from the ligature font, 3 Latin, 3 CJK, 2 ligatures
    assert_eq!(output.glyph_count, 13);
    assert_eq!(output.substitution_count, 2);
    assert_eq!(
        output.warnings,
        vec![
            BuildWarning::MissingGlyph {
                script: Script::Latin,
                ch: 'd'
            },
            BuildWarning::MissingGlyph {
                script: Script::Cjk,
                ch: '字'
            },
            BuildWarning::MissingLigatureGlyph {
                sequence: "=>".into(),
                name: "equal_greater.liga".into(),
            },
        ]
    );

    let data = fs::read(&output.path).unwrap();
    let font = FontRef::new(&data).unwrap();
    assert_eq!(font.head().unwrap().units_per_em(), 833);
    assert_eq!(font.maxp().unwrap().num_glyphs(), 13);
    assert_eq!(font.post().unwrap().is_fixed_pitch(), 1);

    assert_eq!(advance(&font, 'a'), 500.0);
    assert_eq!(advance(&font, '>'), 500.0);
    assert_eq!(advance(&font, 'あ'), 1000.0);
    assert!(font.charmap().map('字').is_none());

    let names: Vec<String> = GlyphNames::new(&font)
        .iter()
        .map(|(_, name)| name.as_str().to_owned())
        .collect();
    assert_eq!(names[0], NOTDEF);
    assert_eq!(&names[1..5], ["l002d", "l003c", "l003d", "l003e"]);
    assert_eq!(names[5], "a0061");
    assert_eq!(names[8], "c3042");
    assert_eq!(&names[11..], ["hyphen_greater.liga", "less_equal_greater.liga"]);

    let gsub = font.gsub().unwrap();
    let features = gsub.feature_list().unwrap();
    assert_eq!(features.feature_records().len(), 1);
    assert_eq!(features.feature_records()[0].feature_tag(), CALT);
    assert_eq!(gsub.script_list().unwrap().script_count(), 2);
    assert_eq!(gsub.lookup_list().unwrap().lookup_count(), 1);
}

#[test]
fn ligature_advances_span_their_sequence() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_resources(dir.path(), LIGATURES);
    let output = build(&config).unwrap();
    let data = fs::read(&output.path).unwrap();
    let font = FontRef::new(&data).unwrap();
    let metrics = font.glyph_metrics(Size::unscaled(), LocationRef::default());
    let names = GlyphNames::new(&font);
    let advance_of = |name: &str| {
        names
            .iter()
            .find(|(_, glyph_name)| glyph_name.as_str() == name)
            .and_then(|(glyph_id, _)| metrics.advance_width(glyph_id))
            .unwrap()
    };
    assert_eq!(advance_of("hyphen_greater.liga"), 1000.0);
    assert_eq!(advance_of("less_equal_greater.liga"), 1500.0);
}

#[test]
fn no_ligatures_no_gsub() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_resources(dir.path(), "");
    let output = build(&config).unwrap();
    assert_eq!(output.substitution_count, 0);
    // notdef, 7 Latin, 3 CJK
    assert_eq!(output.glyph_count, 11);

    let data = fs::read(&output.path).unwrap();
    let font = FontRef::new(&data).unwrap();
    assert!(font.gsub().is_err());
    assert_eq!(advance(&font, '-'), 500.0);
}

#[test]
fn config_file_overrides() {
    let dir = tempfile::tempdir().unwrap();
    write_resources(dir.path(), LIGATURES);
    let config_path = dir.path().join("yuki.toml");
    fs::write(
        &config_path,
        r#"
        family-name = "Yuki Code Calibrated"
        output = "dist/yuki.ttf"

        [profile]
        preset = "calibrated"
        "#,
    )
    .unwrap();
    let config = BuildConfig::load(&config_path).unwrap();
    let output = build(&config).unwrap();
    assert_eq!(output.path, dir.path().join("dist/yuki.ttf"));

    let data = fs::read(&output.path).unwrap();
    let font = FontRef::new(&data).unwrap();
    let family = font
        .localized_strings(skrifa::string::StringId::FAMILY_NAME)
        .english_or_first()
        .unwrap()
        .to_string();
    assert_eq!(family, "Yuki Code Calibrated");
}

#[test]
fn failed_build_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    // '~' is in neither the ligature nor the Latin font
    let config = write_resources(dir.path(), "~> hyphen_greater.liga\n");
    let err = build(&config).unwrap_err();
    assert!(matches!(
        err,
        Error::MissingSubstitutionInput { ch: '~', .. }
    ));
    assert!(!config.output.exists());
}

#[test]
fn in_memory_fonts() {
    let latin = FontFile::from_bytes(latin_font()).unwrap();
    let cjk = FontFile::from_bytes(cjk_font()).unwrap();
    let ligature = FontFile::from_bytes(ligature_font()).unwrap();
    let ligatures = LigatureData::parse("-> hyphen_greater.liga\n");
    let profile = LayoutProfile::grid();
    let result = build_font(&BuildInputs {
        fonts: SourceFonts {
            latin: &latin,
            cjk: &cjk,
            ligature: &ligature,
        },
        latin_subset: &['a', 'b'],
        cjk_subset: &['あ'],
        ligatures: &ligatures,
        profile: &profile,
        reference: ReferenceChars::default(),
        family_name: "Yuki Code",
        style_name: "Regular",
    })
    .unwrap();
    assert_eq!(result.layout.cell(), 500.0);
    assert!(result.warnings.is_empty());

    let font = result.font;
    let names: Vec<_> = font.glyphs.iter().map(|glyph| glyph.name.as_str()).collect();
    assert_eq!(
        names,
        [NOTDEF, "l002d", "l003e", "a0061", "a0062", "c3042", "hyphen_greater.liga"]
    );
    let cjk_glyph = &font.glyphs[5];
    assert_eq!(cjk_glyph.advance_width, 2.0 * font.glyphs[3].advance_width);
}
