//! Ligature glyphs and the GSUB table

use std::{
    cmp::Reverse,
    collections::{BTreeMap, HashMap},
};

use write_fonts::{
    tables::{
        gsub::{
            Gsub, Ligature, LigatureSet, LigatureSubstFormat1, SubstitutionLookup,
            SubstitutionLookupList,
        },
        layout::{
            Feature, FeatureList, FeatureRecord, LangSys, Lookup, LookupFlag,
            Script as ScriptTable, ScriptList, ScriptRecord,
        },
    },
    types::{GlyphId16, Tag},
};

use crate::{
    codec::SourceFont,
    compose::GlyphTable,
    error::{BuildWarning, Error},
    font::{GlyphRecord, SubstitutionRule},
    ligature::LigatureRule,
    outline::transform_path,
    profile::Layout,
};

/// Contextual alternates, which shapers apply by default in code editors.
pub const CALT: Tag = Tag::new(b"calt");
const DFLT: Tag = Tag::new(b"DFLT");
const LATN: Tag = Tag::new(b"latn");

/// Appends ligature glyphs to a [`GlyphTable`] and builds the rules
/// pointing at them.
pub struct LigatureTableBuilder<'a> {
    layout: &'a Layout,
    font: &'a dyn SourceFont,
}

enum Target {
    Appended(GlyphId16),
    New(GlyphRecord),
}

impl<'a> LigatureTableBuilder<'a> {
    /// `font` is the ligature font; targets are looked up there by name.
    pub fn new(layout: &'a Layout, font: &'a dyn SourceFont) -> Self {
        LigatureTableBuilder { layout, font }
    }

    /// Resolve `rules` in order.
    ///
    /// A rule whose target glyph is missing is skipped with a warning. A rule
    /// using a character that has no glyph in `table` is an error.
    pub fn build<'r>(
        &self,
        rules: impl IntoIterator<Item = LigatureRule<'r>>,
        table: &mut GlyphTable,
    ) -> Result<Vec<SubstitutionRule>, Error> {
        // (target, sequence length) -> glyph; same name and length means same glyph
        let mut appended: HashMap<(&str, usize), GlyphId16> = HashMap::new();
        let mut substitutions = Vec::new();
        for rule in rules {
            let key = (rule.target, rule.len());
            let target = match appended.get(&key) {
                Some(glyph_id) => Target::Appended(*glyph_id),
                None => match self.font.glyph_by_name(rule.target)? {
                    Some(glyph) => Target::New(glyph),
                    None => {
                        table.warn(BuildWarning::MissingLigatureGlyph {
                            sequence: rule.sequence.to_owned(),
                            name: rule.target.to_owned(),
                        });
                        continue;
                    }
                },
            };
            let input = rule
                .sequence
                .chars()
                .map(|ch| {
                    table
                        .glyph_for_char(ch)
                        .ok_or_else(|| Error::MissingSubstitutionInput {
                            sequence: rule.sequence.to_owned(),
                            ch,
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            let output = match target {
                Target::Appended(glyph_id) => glyph_id,
                Target::New(source) => {
                    let glyph_id = table.push(self.ligature_glyph(&rule, &source))?;
                    appended.insert(key, glyph_id);
                    glyph_id
                }
            };
            substitutions.push(SubstitutionRule { input, output });
        }
        Ok(substitutions)
    }

    fn ligature_glyph(&self, rule: &LigatureRule, source: &GlyphRecord) -> GlyphRecord {
        let len = rule.len();
        GlyphRecord {
            name: rule.target.to_owned(),
            codepoint: None,
            // the source advance is that of a single character
            advance_width: self.layout.ligature_advance(len),
            outline: transform_path(
                &source.outline,
                self.layout.ligature_transform(len),
                self.layout.rounding(),
            ),
        }
    }
}

/// Build a GSUB table with one ligature lookup under `calt`.
///
/// Returns `None` if there are no rules.
pub fn build_gsub(rules: &[SubstitutionRule]) -> Option<Gsub> {
    let mut sets: BTreeMap<GlyphId16, Vec<(&[GlyphId16], GlyphId16)>> = BTreeMap::new();
    for rule in rules {
        let Some((first, rest)) = rule.input.split_first() else {
            continue;
        };
        let ligatures = sets.entry(*first).or_default();
        // the first rule for a sequence wins
        if !ligatures.iter().any(|(components, _)| *components == rest) {
            ligatures.push((rest, rule.output));
        }
    }
    if sets.is_empty() {
        return None;
    }

    let coverage = sets.keys().copied().collect();
    let ligature_sets = sets
        .into_values()
        .map(|mut ligatures| {
            // longer sequences must be tried first
            ligatures.sort_by_key(|(components, _)| Reverse(components.len()));
            LigatureSet::new(
                ligatures
                    .into_iter()
                    .map(|(components, output)| Ligature::new(output, components.to_vec()))
                    .collect(),
            )
        })
        .collect();
    let lookup = SubstitutionLookup::Ligature(Lookup::new(
        LookupFlag::empty(),
        vec![LigatureSubstFormat1::new(coverage, ligature_sets)],
    ));

    let features = FeatureList::new(vec![FeatureRecord::new(CALT, Feature::new(None, vec![0]))]);
    let scripts = ScriptList::new(
        [DFLT, LATN]
            .into_iter()
            .map(|tag| {
                ScriptRecord::new(
                    tag,
                    ScriptTable::new(Some(LangSys::new(vec![0])), Vec::new()),
                )
            })
            .collect(),
    );
    Some(Gsub::new(
        scripts,
        features,
        SubstitutionLookupList::new(vec![lookup]),
    ))
}
