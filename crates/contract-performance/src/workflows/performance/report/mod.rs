mod export;
mod summary;
pub mod views;

pub use export::{ExportSequence, ExportTable, ReportExporter};
pub use summary::PerformanceReport;
