//! Formula-variant extraction and agreement-rule testing.

pub mod predicate;
pub mod rule;
pub mod suffix;
pub mod template;
pub mod testing;
pub mod variant;

pub use predicate::SignPredicate;
pub use rule::{AgreementRule, RuleKind, RuleRegistry, SlotCondition};
pub use suffix::{SuffixInventory, SuffixProfile};
pub use template::{SlotSpec, SlotTemplate};
pub use testing::{confirmation_interval, RegistrySummary, RuleOutcome, RuleTester, RuleVerdict};
pub use variant::{FormulaAnalyzer, FormulaExtraction, FormulaVariant, SlotAssignment, SlotFill};
