//! End-to-end analysis run: model call, parse, normalize, postprocess,
//! validate, review. Each stage logs what it did so a failed run can be
//! traced back to the stage that broke.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ids::IdSource;
use crate::models::PidDocument;
use crate::review::{generate_review_queue, project_graph, ReviewReport};
use crate::standards::StandardsProfile;

use super::normalizer::normalize_document;
use super::postprocess::postprocess_document;
use super::response::parse_document;
use super::validate::validate_document;
use super::vision::VisionModel;
use super::ExtractionError;

/// Everything produced by one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub analysis_id: Uuid,
    pub source_image: String,
    pub analyzed_at: DateTime<Utc>,
    pub document: PidDocument,
    pub review: ReviewReport,
}

/// Run the full pipeline against one drawing image.
pub fn run_pipeline(
    model: &dyn VisionModel,
    image_bytes: &[u8],
    source_image: &str,
    profile: &StandardsProfile,
    ids: &mut IdSource,
) -> Result<AnalysisResult, ExtractionError> {
    let analysis_id = Uuid::new_v4();
    tracing::info!(%analysis_id, source_image, "Starting drawing analysis");

    let raw = model.analyze_image(image_bytes)?;
    tracing::debug!(response_len = raw.len(), "Model response received");

    let document = parse_document(&raw)?;
    tracing::info!(items = document.item_count(), "Model response parsed");

    let mut document = normalize_document(&document, profile);
    postprocess_document(&mut document, ids);
    tracing::info!(items = document.item_count(), "Document normalized");

    validate_document(&document)?;

    let graph = project_graph(&document);
    let review = generate_review_queue(&graph);
    tracing::info!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        warnings = review.warnings.len(),
        "Analysis complete"
    );

    Ok(AnalysisResult {
        analysis_id,
        source_image: source_image.to_string(),
        analyzed_at: Utc::now(),
        document,
        review,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CannedModel(&'static str);

    impl VisionModel for CannedModel {
        fn analyze_image(&self, _image_bytes: &[u8]) -> Result<String, ExtractionError> {
            Ok(self.0.to_string())
        }
    }

    const GOOD_RESPONSE: &str = r#"```json
    {
      "metadata": {"drawing_number": "PID-001", "revision": "B"},
      "equipment": [
        {"tag": "P-101", "type": "Pump", "bounding_box": [10, 10, 40, 40]}
      ],
      "instrumentation": [
        {"tag": "FT-101", "type": "Flow Transmitter",
         "connected_to_tag": "P-101", "bounding_box": [50, 10, 70, 30]}
      ],
      "lines": [
        {"source_tag": "P-101", "destination_tag": "FT-101",
         "line_type": "process", "bounding_box": [40, 20, 50, 22]}
      ]
    }
    ```"#;

    #[test]
    fn full_run_produces_reviewed_result() {
        let model = CannedModel(GOOD_RESPONSE);
        let profile = StandardsProfile::default();
        let mut ids = IdSource::with_seed(7);

        let result =
            run_pipeline(&model, b"fake-image", "unit.png", &profile, &mut ids).unwrap();

        assert_eq!(result.source_image, "unit.png");
        assert_eq!(result.document.equipment.len(), 1);
        assert_eq!(result.document.instrumentation.len(), 1);
        assert_eq!(result.document.lines.len(), 1);
        // Both components sit on the line, so nothing is orphaned.
        assert!(result
            .review
            .warnings
            .iter()
            .all(|w| w.issue_type != crate::review::IssueType::OrphanNode));
        // Normalizer stamped loop metadata on the instrument.
        assert_eq!(
            result.document.instrumentation[0].loop_id.as_deref(),
            Some("101")
        );
    }

    #[test]
    fn non_object_response_fails_at_parse_stage() {
        let model = CannedModel(r#"["not", "a", "document"]"#);
        let profile = StandardsProfile::default();
        let mut ids = IdSource::with_seed(7);

        let err = run_pipeline(&model, b"x", "unit.png", &profile, &mut ids).unwrap_err();
        assert!(matches!(err, ExtractionError::MalformedResponse(_)));
    }

    #[test]
    fn model_errors_propagate() {
        struct DeadModel;
        impl VisionModel for DeadModel {
            fn analyze_image(&self, _: &[u8]) -> Result<String, ExtractionError> {
                Err(ExtractionError::ModelConnection("http://localhost:11434".into()))
            }
        }

        let profile = StandardsProfile::default();
        let mut ids = IdSource::with_seed(7);
        let err = run_pipeline(&DeadModel, b"x", "unit.png", &profile, &mut ids).unwrap_err();
        assert!(matches!(err, ExtractionError::ModelConnection(_)));
    }
}
