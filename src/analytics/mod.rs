pub mod classifier;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod title_normalizer;

pub use classifier::*;
pub use metrics::*;
pub use models::*;
pub use pipeline::*;
pub use report::{ReportError, ReportFormat, ReportManager, ReportRenderer};
pub use title_normalizer::*;
