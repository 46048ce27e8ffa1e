//! Splits raw lines into tokens.

use super::raw::{RawInscription, RawSign, RawSignKind};
use super::sign::SignKind;
use super::token::{Token, TokenClass, TokenPosition};
use crate::constants::{SIGN_SEPARATOR, UNKNOWN_SIGN};
use crate::errors::CorpusFormatError;
use crate::types::collections::{FxHashMap, SignRun};
use crate::types::{SignId, SignInterner};

/// Shared state while tokenizing a whole corpus.
pub(crate) struct Tokenizer {
    pub interner: SignInterner,
    pub kinds: FxHashMap<SignId, SignKind>,
}

struct Pending {
    class: TokenClass,
    signs: SignRun<SignId>,
    parts: Vec<String>,
    value: Option<f64>,
    has_unknown: bool,
}

impl Pending {
    fn new(class: TokenClass) -> Self {
        Self {
            class,
            signs: SignRun::new(),
            parts: Vec::new(),
            value: if class == TokenClass::Number {
                Some(0.0)
            } else {
                None
            },
            has_unknown: false,
        }
    }
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            interner: SignInterner::new(),
            kinds: FxHashMap::default(),
        }
    }

    /// Tokenize every line of `raw`. Positions are assigned per line.
    pub fn lines(&mut self, raw: &RawInscription) -> Result<Vec<Vec<Token>>, CorpusFormatError> {
        let mut lines = Vec::with_capacity(raw.lines.len());
        for (line_idx, line) in raw.lines.iter().enumerate() {
            let tokens = self.line(raw, line_idx, line)?;
            if tokens.is_empty() {
                return Err(CorpusFormatError::EmptyLine {
                    id: raw.id.clone(),
                    line: line_idx,
                });
            }
            lines.push(tokens);
        }
        Ok(lines)
    }

    fn line(
        &mut self,
        raw: &RawInscription,
        line_idx: usize,
        signs: &[RawSign],
    ) -> Result<Vec<Token>, CorpusFormatError> {
        let mut pending: Vec<Pending> = Vec::new();
        let mut current: Option<Pending> = None;

        for (pos, sign) in signs.iter().enumerate() {
            let Some(kind) = SignKind::from_raw(sign.kind) else {
                pending.extend(current.take());
                continue;
            };
            let text = SignInterner::normalize(&sign.sign_id);
            if text.is_empty() {
                return Err(CorpusFormatError::EmptySignId {
                    id: raw.id.clone(),
                    line: line_idx,
                    position: pos,
                });
            }
            let id = self.register(&raw.id, &text, kind)?;
            let class = match kind {
                SignKind::Syllabogram | SignKind::Unclassified => TokenClass::Word,
                SignKind::Logogram => TokenClass::Logogram,
                SignKind::Numeral | SignKind::Fraction => TokenClass::Number,
            };

            let continues = matches!(&current, Some(p) if p.class == class && class != TokenClass::Logogram);
            if !continues {
                pending.extend(current.take());
                current = Some(Pending::new(class));
            }
            if let Some(p) = current.as_mut() {
                p.signs.push(id);
                p.has_unknown |= text == UNKNOWN_SIGN;
                if class == TokenClass::Number {
                    let value = numeric_value(&raw.id, &text, kind)?;
                    p.value = match (p.value, value) {
                        (Some(acc), Some(v)) => Some(acc + v),
                        _ => None,
                    };
                }
                p.parts.push(text);
            }
        }
        pending.extend(current.take());

        let len = pending.len();
        Ok(pending
            .into_iter()
            .enumerate()
            .map(|(index, p)| Token {
                text: p.parts.join(&SIGN_SEPARATOR.to_string()),
                signs: p.signs,
                class: p.class,
                position: TokenPosition::of(index, len),
                line: line_idx,
                index,
                value: p.value,
                has_unknown: p.has_unknown,
            })
            .collect())
    }

    fn register(&mut self, id: &str, text: &str, kind: SignKind) -> Result<SignId, CorpusFormatError> {
        let sign = self.interner.intern(text);
        match self.kinds.get(&sign) {
            Some(&existing) if existing != kind && text != UNKNOWN_SIGN => {
                Err(CorpusFormatError::InconsistentSignKind {
                    sign: text.to_string(),
                    first: existing.to_string(),
                    second: kind.to_string(),
                    id: id.to_string(),
                })
            }
            Some(_) => Ok(sign),
            None => {
                self.kinds.insert(sign, kind);
                Ok(sign)
            }
        }
    }
}

/// Numerals must be integers. Fractions are `n/d`; anything else is unreadable (`None`).
fn numeric_value(id: &str, text: &str, kind: SignKind) -> Result<Option<f64>, CorpusFormatError> {
    match kind {
        SignKind::Numeral => text
            .parse::<u64>()
            .map(|v| Some(v as f64))
            .map_err(|_| CorpusFormatError::BadNumeral {
                id: id.to_string(),
                sign: text.to_string(),
            }),
        SignKind::Fraction => Ok(text.split_once('/').and_then(|(n, d)| {
            let n = n.trim().parse::<f64>().ok()?;
            let d = d.trim().parse::<f64>().ok()?;
            (d > 0.0).then(|| n / d)
        })),
        _ => Ok(None),
    }
}
