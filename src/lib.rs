pub mod analytics;
pub mod config;
pub mod error;
pub mod io;
pub mod logging;

// Re-export the main error types for convenience
pub use error::{ViewstatsError, ViewstatsResult};

// Re-export I/O utilities for convenience
pub use io::{load_history_file, load_records, read_history_file, RawHistoryRow};

// Re-export the analysis pipeline and its result object
pub use analytics::{
    analyze, analyze_file, ClassifiedEntry, ClassifiedTable, EntryKind, MetricsEngine,
    ShowOccurrenceCount, ViewingRecord, ViewingReport,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_structure() {
        // Test that the main modules are accessible
        assert!(std::any::type_name::<analytics::EntryClassifier>().contains("EntryClassifier"));
        assert!(std::any::type_name::<config::ConfigManager>().contains("ConfigManager"));
    }

    #[test]
    fn test_public_api_error_variants() {
        let result: ViewstatsResult<Vec<ViewingRecord>> =
            load_history_file("non_existent_history.csv");
        assert!(matches!(result, Err(ViewstatsError::Io { .. })));

        let report: ViewstatsResult<ViewingReport> = analyze(&[], 10);
        assert!(matches!(report, Err(ViewstatsError::EmptyDataset { .. })));
    }

    #[test]
    fn test_error_types_re_exported() {
        let error = ViewstatsError::empty_dataset("test");
        assert!(format!("{}", error).contains("test"));
    }
}
