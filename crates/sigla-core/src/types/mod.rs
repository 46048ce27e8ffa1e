//! Shared types: interned identifiers, interners, collection aliases.

pub mod collections;
pub mod identifiers;
pub mod interning;

pub use identifiers::SignId;
pub use interning::SignInterner;
