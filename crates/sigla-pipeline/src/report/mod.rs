//! The analysis report and its flattening into records.

pub mod assembler;
pub mod record;

pub use assembler::{
    AnalysisReport, CorpusSummary, FormulaSection, InformationSection, ReportAssembler, StageResults,
};
pub use record::ReportRecord;
