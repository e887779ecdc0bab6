//! Build configuration
//!
//! Every field has a default, so an empty file (or no file at all) builds the
//! font from the standard resource layout:
//!
//! ```toml
//! family-name = "Yuki Code"
//! output = "output/YukiCode-Regular.ttf"
//!
//! [reference]
//! cjk = "あ"
//!
//! [profile]
//! preset = "calibrated"
//! rounding = "half-to-even"
//! ```

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{
    error::Error,
    profile::{
        LayoutProfile, LigatureOffset, Rounding, DEFAULT_LIGATURE_FALLBACK,
        DEFAULT_LIGATURE_MULTIPLIERS,
    },
    subset::read_text,
};

/// Where the inputs live, where the output goes and how to lay it out.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct BuildConfig {
    pub family_name: String,
    pub style_name: String,
    pub latin_subset: PathBuf,
    pub cjk_subset: PathBuf,
    pub ligatures: PathBuf,
    pub latin_font: PathBuf,
    pub cjk_font: PathBuf,
    pub ligature_font: PathBuf,
    pub output: PathBuf,
    pub reference: ReferenceChars,
    pub profile: ProfileConfig,
}

/// The characters whose advances define each font's reference width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReferenceChars {
    pub latin: char,
    pub cjk: char,
    pub ligature: char,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    #[default]
    Grid,
    Calibrated,
}

/// A preset with optional overrides of its tuning constants.
///
/// Setting either ligature override switches ligature placement to the
/// calibrated scheme, with the other value taken from its default.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ProfileConfig {
    pub preset: Preset,
    pub cjk_correction: Option<f64>,
    pub cjk_centering: Option<f64>,
    pub rounding: Option<Rounding>,
    pub ligature_multipliers: Option<Vec<LigatureMultiplier>>,
    pub ligature_fallback: Option<f64>,
}

/// The calibrated offset multiplier for ligatures of one sequence length.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LigatureMultiplier {
    pub length: usize,
    pub multiplier: f64,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig::with_root("")
    }
}

impl Default for ReferenceChars {
    fn default() -> Self {
        ReferenceChars {
            latin: 'a',
            cjk: 'あ',
            ligature: 'a',
        }
    }
}

impl BuildConfig {
    /// The default configuration, with all paths under `root`.
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let data = root.join("resources").join("data");
        let fonts = root.join("resources").join("fonts");
        BuildConfig {
            family_name: "Yuki Code".into(),
            style_name: "Regular".into(),
            latin_subset: data.join("ascii.txt"),
            cjk_subset: data.join("cjk.txt"),
            ligatures: data.join("ligature.txt"),
            latin_font: fonts.join("nova-mono").join("NovaMono-Regular.ttf"),
            cjk_font: fonts
                .join("source-han-code-jp")
                .join("SourceHanCodeJP-Regular.otf"),
            ligature_font: fonts.join("fira-code").join("FiraCode-Regular.otf"),
            output: root.join("output").join("YukiCode-Regular.ttf"),
            reference: ReferenceChars::default(),
            profile: ProfileConfig::default(),
        }
    }

    /// Load a TOML config file.
    ///
    /// Relative paths, including defaulted ones, are resolved against the
    /// directory containing the file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = read_text(path)?;
        let mut config = Self::parse(&text).map_err(|source| Error::Config {
            path: path.to_owned(),
            source,
        })?;
        if let Some(dir) = path.parent() {
            config.rebase(dir);
        }
        Ok(config)
    }

    fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    fn rebase(&mut self, dir: &Path) {
        for path in [
            &mut self.latin_subset,
            &mut self.cjk_subset,
            &mut self.ligatures,
            &mut self.latin_font,
            &mut self.cjk_font,
            &mut self.ligature_font,
            &mut self.output,
        ] {
            if path.is_relative() {
                *path = dir.join(&*path);
            }
        }
    }

    pub fn layout_profile(&self) -> LayoutProfile {
        self.profile.layout_profile()
    }
}

impl ProfileConfig {
    pub fn layout_profile(&self) -> LayoutProfile {
        let base = match self.preset {
            Preset::Grid => LayoutProfile::grid(),
            Preset::Calibrated => LayoutProfile::calibrated(),
        };
        let ligature_offset =
            if self.ligature_multipliers.is_none() && self.ligature_fallback.is_none() {
                base.ligature_offset
            } else {
                let multipliers = match &self.ligature_multipliers {
                    Some(entries) => entries
                        .iter()
                        .map(|entry| (entry.length, entry.multiplier))
                        .collect(),
                    None => BTreeMap::from(DEFAULT_LIGATURE_MULTIPLIERS),
                };
                LigatureOffset::Calibrated {
                    multipliers,
                    fallback: self.ligature_fallback.unwrap_or(DEFAULT_LIGATURE_FALLBACK),
                }
            };
        LayoutProfile {
            cjk_correction: self.cjk_correction.unwrap_or(base.cjk_correction),
            cjk_centering: self.cjk_centering.unwrap_or(base.cjk_centering),
            rounding: self.rounding.unwrap_or(base.rounding),
            ligature_offset,
        }
    }
}
