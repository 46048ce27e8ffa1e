//! The loaded corpus.

use tracing::{debug, info};

use super::alphabet::SignAlphabet;
use super::inscription::{Inscription, InscriptionId, Line};
use super::raw::RawInscription;
use super::token::{Token, TokenPosition, TokenRef};
use super::tokenizer::Tokenizer;
use crate::errors::CorpusFormatError;
use crate::types::collections::FxHashMap;
use crate::types::SignId;

/// Immutable, thread-safe corpus of inscriptions.
///
/// Built once by [`Corpus::load`]; every accessor borrows.
#[derive(Debug)]
pub struct Corpus {
    inscriptions: Vec<Inscription>,
    alphabet: SignAlphabet,
    by_id: FxHashMap<String, usize>,
    by_sign: FxHashMap<SignId, Vec<TokenRef>>,
}

impl Corpus {
    /// Load raw inscriptions. Fails fast on the first malformed record.
    pub fn load(raw: Vec<RawInscription>) -> Result<Self, CorpusFormatError> {
        let _span = tracing::info_span!("sigla.corpus.load", inscriptions = raw.len()).entered();

        if raw.is_empty() {
            return Err(CorpusFormatError::EmptyCorpus);
        }

        let mut tokenizer = Tokenizer::new();
        let mut inscriptions = Vec::with_capacity(raw.len());
        let mut by_id = FxHashMap::default();

        for (index, record) in raw.iter().enumerate() {
            let id = record.id.trim();
            if id.is_empty() {
                return Err(CorpusFormatError::EmptyId { index });
            }
            if by_id.insert(id.to_string(), index).is_some() {
                return Err(CorpusFormatError::DuplicateId { id: id.to_string() });
            }
            if record.lines.is_empty() {
                return Err(CorpusFormatError::NoLines { id: id.to_string() });
            }
            let lines = tokenizer
                .lines(record)?
                .into_iter()
                .map(|tokens| Line { tokens })
                .collect();
            inscriptions.push(Inscription {
                id: InscriptionId(id.to_string()),
                site: record.site.trim().to_string(),
                lines,
            });
        }

        let mut by_sign: FxHashMap<SignId, Vec<TokenRef>> = FxHashMap::default();
        for (i, inscription) in inscriptions.iter().enumerate() {
            for (l, line) in inscription.lines.iter().enumerate() {
                for (t, token) in line.tokens.iter().enumerate() {
                    let r = TokenRef {
                        inscription: i,
                        line: l,
                        index: t,
                    };
                    let mut seen: Vec<SignId> = Vec::with_capacity(token.signs.len());
                    for &sign in &token.signs {
                        if !seen.contains(&sign) {
                            seen.push(sign);
                            by_sign.entry(sign).or_default().push(r);
                        }
                    }
                }
            }
        }

        let Tokenizer { interner, kinds } = tokenizer;
        let alphabet = SignAlphabet::new(interner.into_reader(), kinds);

        info!(
            inscriptions = inscriptions.len(),
            signs = alphabet.len(),
            "corpus loaded"
        );
        debug!(indexed_signs = by_sign.len(), "sign index built");

        Ok(Self {
            inscriptions,
            alphabet,
            by_id,
            by_sign,
        })
    }

    /// Parse a JSON array of raw inscriptions and load it.
    pub fn from_json(json: &str) -> Result<Self, CorpusFormatError> {
        let raw: Vec<RawInscription> =
            serde_json::from_str(json).map_err(|e| CorpusFormatError::Json {
                message: e.to_string(),
            })?;
        Self::load(raw)
    }

    pub fn alphabet(&self) -> &SignAlphabet {
        &self.alphabet
    }

    pub fn inscriptions(&self) -> &[Inscription] {
        &self.inscriptions
    }

    pub fn len(&self) -> usize {
        self.inscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inscriptions.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Inscription> {
        self.by_id.get(id).map(|&i| &self.inscriptions[i])
    }

    pub fn inscription(&self, index: usize) -> Option<&Inscription> {
        self.inscriptions.get(index)
    }

    pub fn token(&self, r: TokenRef) -> Option<&Token> {
        self.inscriptions
            .get(r.inscription)?
            .lines
            .get(r.line)?
            .tokens
            .get(r.index)
    }

    /// Every token containing `sign`, each reported once, in corpus order.
    pub fn tokens_by_sign<'a>(
        &'a self,
        sign: &str,
    ) -> impl Iterator<Item = (&'a Inscription, &'a Token)> + 'a {
        let refs: &'a [TokenRef] = self
            .alphabet
            .id(sign)
            .and_then(|id| self.by_sign.get(&id))
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        refs.iter().filter_map(move |r| {
            let token = self.token(*r)?;
            Some((&self.inscriptions[r.inscription], token))
        })
    }

    /// Every token at the given line position, in corpus order.
    pub fn tokens_at_position(
        &self,
        position: TokenPosition,
    ) -> impl Iterator<Item = (&Inscription, &Token)> {
        self.inscriptions.iter().flat_map(move |inscription| {
            inscription
                .tokens()
                .filter(move |t| t.position == position)
                .map(move |t| (inscription, t))
        })
    }

    /// Lazily filter inscriptions.
    pub fn inscriptions_matching<'a, P>(&'a self, predicate: P) -> impl Iterator<Item = &'a Inscription> + 'a
    where
        P: Fn(&Inscription) -> bool + 'a,
    {
        self.inscriptions.iter().filter(move |i| predicate(i))
    }

    /// Every token with its address, in corpus order.
    pub fn token_refs(&self) -> impl Iterator<Item = (TokenRef, &Token)> {
        self.inscriptions.iter().enumerate().flat_map(|(i, inscription)| {
            inscription.lines.iter().enumerate().flat_map(move |(l, line)| {
                line.tokens.iter().enumerate().map(move |(t, token)| {
                    (
                        TokenRef {
                            inscription: i,
                            line: l,
                            index: t,
                        },
                        token,
                    )
                })
            })
        })
    }

    pub fn total_tokens(&self) -> usize {
        self.inscriptions.iter().map(Inscription::token_count).sum()
    }
}
