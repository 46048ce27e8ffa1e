//! Information-theoretic characterization of sign streams.
//!
//! Deterministic given a fixed stream; no sampling at this layer.

pub mod entropy;
pub mod stream;

pub use entropy::{shannon_entropy, BigramMetrics, InformationAnalyzer, InformationProfile, SignFrequency};
pub use stream::{SignStream, StreamScope};
