//! Formula-variant extraction.
//!
//! Slots are filled by scanning an inscription's word tokens in reading order:
//! each slot takes the first token at or after the cursor that its recognizer
//! accepts. Nothing is backfilled; a slot nobody recognizes stays absent. An
//! optional slot leaves its words alone when taking them would leave a later
//! mandatory slot with nothing to fill.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sigla_core::corpus::{Corpus, Inscription, InscriptionId, Token, TokenRef};
use sigla_core::errors::AnalysisError;
use sigla_core::types::collections::SmallVec2;
use tracing::{debug, info};

use super::template::{SlotSpec, SlotTemplate};

/// The token(s) occupying one slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotFill {
    pub tokens: SmallVec2<TokenRef>,
    /// Signs of all occupying tokens, in order.
    pub signs: Vec<String>,
    pub text: String,
    /// Some occupying sign is illegible.
    pub has_unknown: bool,
}

impl SlotFill {
    pub fn sign_strs(&self) -> Vec<&str> {
        self.signs.iter().map(String::as_str).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotAssignment {
    pub label: String,
    pub fill: Option<SlotFill>,
}

/// One inscription parsed against a slot template. Never mutated after extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulaVariant {
    pub inscription: InscriptionId,
    pub site: String,
    pub slots: Vec<SlotAssignment>,
    /// Every template slot is present.
    pub complete: bool,
}

impl FormulaVariant {
    pub fn slot(&self, label: &str) -> Option<&SlotFill> {
        self.slots
            .iter()
            .find(|s| s.label == label)
            .and_then(|s| s.fill.as_ref())
    }

    pub fn present_count(&self) -> usize {
        self.slots.iter().filter(|s| s.fill.is_some()).count()
    }

    pub fn present_labels(&self) -> Vec<&str> {
        self.slots
            .iter()
            .filter(|s| s.fill.is_some())
            .map(|s| s.label.as_str())
            .collect()
    }

    pub fn absent_labels(&self) -> Vec<&str> {
        self.slots
            .iter()
            .filter(|s| s.fill.is_none())
            .map(|s| s.label.as_str())
            .collect()
    }
}

/// Result of running the extractor over a corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormulaExtraction {
    pub template: String,
    pub min_slots: usize,
    pub variants: Vec<FormulaVariant>,
    /// Inscriptions that filled some slots but fell below the threshold.
    pub excluded: Vec<InscriptionId>,
    pub scanned: usize,
}

enum Parsed {
    Variant(FormulaVariant),
    Excluded(InscriptionId),
}

pub struct FormulaAnalyzer {
    template: SlotTemplate,
    min_slots: usize,
}

impl FormulaAnalyzer {
    pub fn new(template: SlotTemplate, min_slots: usize) -> Result<Self, AnalysisError> {
        template.validate()?;
        if min_slots > template.len() {
            return Err(AnalysisError::ThresholdExceedsTemplate {
                min_slots,
                template_size: template.len(),
            });
        }
        Ok(Self {
            template,
            min_slots: min_slots.max(1),
        })
    }

    pub fn template(&self) -> &SlotTemplate {
        &self.template
    }

    pub fn min_slots(&self) -> usize {
        self.min_slots
    }

    /// Extract variants from every inscription in the corpus.
    pub fn extract(&self, corpus: &Corpus) -> FormulaExtraction {
        let _span = tracing::info_span!("sigla.formula.extract", template = %self.template.name)
            .entered();

        let parsed: Vec<Parsed> = corpus
            .inscriptions()
            .par_iter()
            .enumerate()
            .filter_map(|(i, inscription)| self.parse(i, inscription))
            .collect();

        let mut variants = Vec::new();
        let mut excluded = Vec::new();
        for p in parsed {
            match p {
                Parsed::Variant(v) => variants.push(v),
                Parsed::Excluded(id) => excluded.push(id),
            }
        }

        info!(
            variants = variants.len(),
            excluded = excluded.len(),
            scanned = corpus.len(),
            "formula variants extracted"
        );

        FormulaExtraction {
            template: self.template.name.clone(),
            min_slots: self.min_slots,
            variants,
            excluded,
            scanned: corpus.len(),
        }
    }

    fn parse(&self, index: usize, inscription: &Inscription) -> Option<Parsed> {
        let words: Vec<(TokenRef, &Token)> = inscription
            .lines
            .iter()
            .enumerate()
            .flat_map(|(l, line)| {
                line.tokens.iter().enumerate().map(move |(t, token)| {
                    (
                        TokenRef {
                            inscription: index,
                            line: l,
                            index: t,
                        },
                        token,
                    )
                })
            })
            .filter(|(_, token)| token.is_word())
            .collect();

        let mut cursor = 0;
        let mut slots = Vec::with_capacity(self.template.len());
        for (k, spec) in self.template.slots.iter().enumerate() {
            let span = find_run(spec, &words, cursor).and_then(|(start, longest)| {
                if spec.mandatory {
                    return Some((start, longest));
                }
                // An optional slot gives up words a later mandatory slot needs.
                let rest = &self.template.slots[k + 1..];
                (start + 1..=longest)
                    .rev()
                    .find(|&end| mandatory_fit(rest, &words, end))
                    .map(|end| (start, end))
                    .or_else(|| (!mandatory_fit(rest, &words, cursor)).then_some((start, longest)))
            });
            let fill = span.map(|(start, end)| {
                cursor = end;
                slot_fill(&words[start..end])
            });
            slots.push(SlotAssignment {
                label: spec.label.clone(),
                fill,
            });
        }

        let present = slots.iter().filter(|s| s.fill.is_some()).count();
        if present == 0 {
            return None;
        }
        let mandatory_ok = self
            .template
            .slots
            .iter()
            .zip(&slots)
            .all(|(spec, slot)| !spec.mandatory || slot.fill.is_some());

        if !mandatory_ok || present < self.min_slots {
            debug!(inscription = %inscription.id, present, "below slot threshold");
            return Some(Parsed::Excluded(inscription.id.clone()));
        }

        Some(Parsed::Variant(FormulaVariant {
            inscription: inscription.id.clone(),
            site: inscription.site.clone(),
            complete: present == self.template.len(),
            slots,
        }))
    }
}

fn recognizes(spec: &SlotSpec, token: &Token) -> bool {
    let signs: Vec<&str> = token.sign_strs().collect();
    spec.recognizer.evaluate(&signs) == Some(true)
}

/// First run of tokens from `from` recognized by `spec`: its start and the
/// end of the longest run the slot may absorb.
fn find_run(spec: &SlotSpec, words: &[(TokenRef, &Token)], from: usize) -> Option<(usize, usize)> {
    let start = (from..words.len()).find(|&j| recognizes(spec, words[j].1))?;
    let mut end = start + 1;
    while end < words.len() && end - start < spec.max_tokens.max(1) && recognizes(spec, words[end].1) {
        end += 1;
    }
    Some((start, end))
}

/// Whether every mandatory slot in `rest` can still be placed, in order, from `from`.
fn mandatory_fit(rest: &[SlotSpec], words: &[(TokenRef, &Token)], from: usize) -> bool {
    let mut cursor = from;
    rest.iter().filter(|spec| spec.mandatory).all(|spec| match find_run(spec, words, cursor) {
        Some((_, end)) => {
            cursor = end;
            true
        }
        None => false,
    })
}

fn slot_fill(run: &[(TokenRef, &Token)]) -> SlotFill {
    let mut fill = SlotFill {
        tokens: SmallVec2::new(),
        signs: Vec::new(),
        text: String::new(),
        has_unknown: false,
    };
    for (r, token) in run {
        fill.tokens.push(*r);
        fill.signs.extend(token.sign_strs().map(str::to_string));
        fill.has_unknown |= token.has_unknown;
    }
    fill.text = fill.signs.join("-");
    fill
}
