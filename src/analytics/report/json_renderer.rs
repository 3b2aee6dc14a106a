use super::{ReportError, ReportFormat, ReportRenderer};
use crate::analytics::models::ViewingReport;

/// JSON形式レポート
pub struct JsonRenderer {
    pretty_print: bool,
}

impl JsonRenderer {
    pub fn new() -> Self {
        Self { pretty_print: true }
    }

    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }
}

impl ReportRenderer for JsonRenderer {
    fn render(&self, report: &ViewingReport) -> Result<Vec<u8>, ReportError> {
        let result = if self.pretty_print {
            serde_json::to_vec_pretty(report)
        } else {
            serde_json::to_vec(report)
        };

        result.map_err(|e| ReportError::Serialization(format!("JSON encoding failed: {}", e)))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }
}

impl Default for JsonRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::report::test_support::sample_report;

    #[test]
    fn test_json_render_parses_back() {
        let report = sample_report();
        let bytes = JsonRenderer::new().render(&report).unwrap();

        let parsed: ViewingReport = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn test_json_compact() {
        let bytes = JsonRenderer::new()
            .with_pretty_print(false)
            .render(&sample_report())
            .unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(!text.contains('\n'));
        assert!(text.contains("\"tenure_days\":365"));
    }
}
