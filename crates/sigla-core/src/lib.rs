//! sigla-core: corpus model, interning, errors, config, tracing, and traits
//! shared by every sigla analysis crate.

pub mod config;
pub mod constants;
pub mod corpus;
pub mod errors;
pub mod traits;
pub mod tracing;
pub mod types;

pub use config::SiglaConfig;
pub use corpus::{
    Corpus, Inscription, InscriptionId, Line, RawInscription, RawSign, RawSignKind, Sign,
    SignAlphabet, SignId, SignKind, Token, TokenClass, TokenPosition, TokenRef,
};
pub use errors::{PipelineError, SiglaErrorCode};
