//! Corpus model: signs, tokens, inscriptions, and the loaded corpus.
//!
//! Everything here is immutable once [`Corpus::load`] returns.

pub mod alphabet;
pub mod inscription;
pub mod model;
pub mod raw;
pub mod sign;
pub mod token;
mod tokenizer;

pub use alphabet::SignAlphabet;
pub use inscription::{Inscription, InscriptionId, Line};
pub use model::Corpus;
pub use raw::{RawInscription, RawSign, RawSignKind};
pub use sign::{Sign, SignKind};
pub use token::{Token, TokenClass, TokenPosition, TokenRef};

pub use crate::types::SignId;
