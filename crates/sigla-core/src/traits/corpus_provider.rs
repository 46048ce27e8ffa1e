//! CorpusProvider: the ingestion collaborator's side of the corpus boundary.
//!
//! Parsing of transcription files lives outside sigla. Anything that can hand
//! over raw inscription records implements this trait.

use crate::corpus::{Corpus, RawInscription};
use crate::errors::CorpusFormatError;

pub trait CorpusProvider: Send + Sync {
    /// Name used in log output.
    fn name(&self) -> &str {
        "corpus"
    }

    /// Supply the raw records, in catalog order.
    fn raw_inscriptions(&self) -> Result<Vec<RawInscription>, CorpusFormatError>;

    /// Load the records into an immutable [`Corpus`].
    fn load(&self) -> Result<Corpus, CorpusFormatError> {
        let raw = self.raw_inscriptions()?;
        tracing::debug!(provider = self.name(), records = raw.len(), "loading corpus");
        Corpus::load(raw)
    }
}

impl CorpusProvider for Vec<RawInscription> {
    fn raw_inscriptions(&self) -> Result<Vec<RawInscription>, CorpusFormatError> {
        Ok(self.clone())
    }
}

/// Provider over an in-memory JSON document (`[{id, site, lines}, ...]`).
#[derive(Debug, Clone)]
pub struct JsonCorpusProvider {
    name: String,
    json: String,
}

impl JsonCorpusProvider {
    pub fn new(name: impl Into<String>, json: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            json: json.into(),
        }
    }
}

impl CorpusProvider for JsonCorpusProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn raw_inscriptions(&self) -> Result<Vec<RawInscription>, CorpusFormatError> {
        serde_json::from_str(&self.json).map_err(|e| CorpusFormatError::Json {
            message: e.to_string(),
        })
    }
}
