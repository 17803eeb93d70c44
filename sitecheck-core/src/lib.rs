//! Audit engine for sitecheck: rule evaluators, scoring, and report
//! rendering over a finished crawl.

pub mod checks;
pub mod engine;
pub mod model;
pub mod report;
pub mod score;

pub use engine::{AuditOutput, audit};
pub use model::{AuditResult, Category, Issue, Severity, SeverityCounts};
pub use report::ReportFormat;
