//! sigla-pipeline: composes corpus analysis, candidate scoring and the
//! validation battery into one run, and turns the result into stable report
//! records for downstream formatting.

pub mod pipeline;
pub mod report;
pub mod sink;

pub use pipeline::Pipeline;
pub use report::{AnalysisReport, CorpusSummary, FormulaSection, InformationSection, ReportAssembler, ReportRecord};
pub use sink::{JsonLinesSink, MemorySink, ReportSink};
