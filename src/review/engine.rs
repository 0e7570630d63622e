//! The review queue generator.

use std::collections::BTreeSet;

use crate::tags::{parse_equipment_tag, parse_instrument_tag};

use super::graph::{NodeCategory, PidGraph};
use super::{IssueType, ReviewIssue, ReviewReport};

/// Detections below this confidence go to a human.
pub const LOW_CONFIDENCE_THRESHOLD: f32 = 0.85;

/// Derive the review queue from the graph view.
///
/// Warnings accumulate independently: one node can be an orphan, low
/// confidence AND badly tagged at once. Orphan warnings come out in node
/// order, so the queue is deterministic.
pub fn generate_review_queue(graph: &PidGraph) -> ReviewReport {
    let mut report = ReviewReport::default();

    if graph.nodes.is_empty() {
        return report;
    }

    let mut connected: BTreeSet<&str> = BTreeSet::new();
    for edge in &graph.edges {
        connected.insert(edge.source.as_str());
        connected.insert(edge.target.as_str());
    }

    for node in &graph.nodes {
        if !connected.contains(node.id.as_str()) {
            report.warnings.push(ReviewIssue {
                id: node.id.clone(),
                issue_type: IssueType::OrphanNode,
                details: format!("Component '{}' is not connected to any lines.", node.id),
                bounding_box: node.bounding_box.clone(),
            });
        }
    }

    for node in &graph.nodes {
        if node.flag_for_review {
            report.warnings.push(ReviewIssue {
                id: node.id.clone(),
                issue_type: IssueType::AiFlagged,
                details: node
                    .review_reason
                    .clone()
                    .unwrap_or_else(|| "AI detected a potential ambiguity.".to_string()),
                bounding_box: node.bounding_box.clone(),
            });
        }

        let confidence = node.confidence.unwrap_or(1.0);
        if confidence < LOW_CONFIDENCE_THRESHOLD {
            report.warnings.push(ReviewIssue {
                id: node.id.clone(),
                issue_type: IssueType::LowConfidence,
                details: format!("Detection confidence is only {confidence:.2}."),
                bounding_box: node.bounding_box.clone(),
            });
        }

        match node.category {
            NodeCategory::Instrumentation => {
                if parse_instrument_tag(&node.id).is_none() {
                    report.warnings.push(ReviewIssue {
                        id: node.id.clone(),
                        issue_type: IssueType::InvalidTagFormat,
                        details: format!(
                            "Instrument tag '{}' does not follow standard ISA-5.1 format.",
                            node.id
                        ),
                        bounding_box: node.bounding_box.clone(),
                    });
                }
            }
            NodeCategory::Equipment => {
                if parse_equipment_tag(&node.id).is_none() {
                    report.warnings.push(ReviewIssue {
                        id: node.id.clone(),
                        issue_type: IssueType::InvalidTagFormat,
                        details: format!(
                            "Equipment tag '{}' does not follow a standard format.",
                            node.id
                        ),
                        bounding_box: node.bounding_box.clone(),
                    });
                }
            }
            NodeCategory::Valves => {}
        }
    }

    tracing::info!(
        warnings = report.warnings.len(),
        "Review queue generated"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::graph::{GraphEdge, GraphNode};

    fn node(id: &str, category: NodeCategory) -> GraphNode {
        GraphNode {
            id: id.to_string(),
            category,
            confidence: None,
            flag_for_review: false,
            review_reason: None,
            bounding_box: None,
        }
    }

    fn edge(source: &str, target: &str) -> GraphEdge {
        GraphEdge {
            source: source.to_string(),
            target: target.to_string(),
            label: None,
        }
    }

    fn warnings_of(report: &ReviewReport, issue: IssueType) -> Vec<&ReviewIssue> {
        report
            .warnings
            .iter()
            .filter(|w| w.issue_type == issue)
            .collect()
    }

    // ── Orphan detection ────────────────────────────────────────────

    #[test]
    fn single_unconnected_node_yields_one_orphan_warning() {
        let graph = PidGraph {
            nodes: vec![node("P-101", NodeCategory::Equipment)],
            edges: vec![],
        };
        let report = generate_review_queue(&graph);
        let orphans = warnings_of(&report, IssueType::OrphanNode);
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].id, "P-101");
        assert!(report.errors.is_empty());
    }

    #[test]
    fn connected_nodes_not_orphans() {
        let graph = PidGraph {
            nodes: vec![
                node("P-101", NodeCategory::Equipment),
                node("V-201", NodeCategory::Equipment),
                node("T-301", NodeCategory::Equipment),
            ],
            edges: vec![edge("P-101", "V-201")],
        };
        let report = generate_review_queue(&graph);
        let orphans = warnings_of(&report, IssueType::OrphanNode);
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].id, "T-301");
    }

    #[test]
    fn empty_graph_yields_empty_report() {
        let report = generate_review_queue(&PidGraph::default());
        assert!(report.warnings.is_empty());
        assert!(report.errors.is_empty());
    }

    // ── Confidence and AI flags ─────────────────────────────────────

    #[test]
    fn low_confidence_flagged_below_threshold() {
        let mut low = node("FT-101", NodeCategory::Instrumentation);
        low.confidence = Some(0.60);
        let mut high = node("FT-102", NodeCategory::Instrumentation);
        high.confidence = Some(0.97);
        let graph = PidGraph {
            nodes: vec![low, high],
            edges: vec![edge("FT-101", "FT-102")],
        };
        let report = generate_review_queue(&graph);
        let lows = warnings_of(&report, IssueType::LowConfidence);
        assert_eq!(lows.len(), 1);
        assert_eq!(lows[0].id, "FT-101");
        assert!(lows[0].details.contains("0.60"));
    }

    #[test]
    fn missing_confidence_defaults_to_full() {
        let graph = PidGraph {
            nodes: vec![node("FT-101", NodeCategory::Instrumentation)],
            edges: vec![edge("FT-101", "X")],
        };
        let report = generate_review_queue(&graph);
        assert!(warnings_of(&report, IssueType::LowConfidence).is_empty());
    }

    #[test]
    fn ai_flag_carries_stated_reason() {
        let mut flagged = node("XV-9", NodeCategory::Valves);
        flagged.flag_for_review = true;
        flagged.review_reason = Some("Symbol partially occluded".to_string());
        let graph = PidGraph {
            nodes: vec![flagged],
            edges: vec![edge("XV-9", "X")],
        };
        let report = generate_review_queue(&graph);
        let flagged = warnings_of(&report, IssueType::AiFlagged);
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].details, "Symbol partially occluded");
    }

    // ── Tag format checks ───────────────────────────────────────────

    #[test]
    fn bad_instrument_tag_flagged_by_loose_grammar() {
        let graph = PidGraph {
            nodes: vec![
                node("FT-101", NodeCategory::Instrumentation),
                node("flow thing", NodeCategory::Instrumentation),
            ],
            edges: vec![edge("FT-101", "flow thing")],
        };
        let report = generate_review_queue(&graph);
        let bad = warnings_of(&report, IssueType::InvalidTagFormat);
        assert_eq!(bad.len(), 1);
        assert_eq!(bad[0].id, "flow thing");
    }

    #[test]
    fn equipment_checked_with_equipment_grammar() {
        let graph = PidGraph {
            nodes: vec![
                node("P-101", NodeCategory::Equipment),
                node("EQUIP-3F2A", NodeCategory::Equipment),
            ],
            edges: vec![edge("P-101", "EQUIP-3F2A")],
        };
        let report = generate_review_queue(&graph);
        let bad = warnings_of(&report, IssueType::InvalidTagFormat);
        // Synthetic EQUIP tags are deliberately non-standard: they must
        // stay visible in the queue until someone supplies a real tag.
        assert_eq!(bad.len(), 1);
        assert_eq!(bad[0].id, "EQUIP-3F2A");
    }

    #[test]
    fn valves_exempt_from_tag_format_check() {
        let graph = PidGraph {
            nodes: vec![node("weird valve", NodeCategory::Valves)],
            edges: vec![edge("weird valve", "X")],
        };
        let report = generate_review_queue(&graph);
        assert!(warnings_of(&report, IssueType::InvalidTagFormat).is_empty());
    }

    // ── Accumulation ────────────────────────────────────────────────

    #[test]
    fn one_node_accumulates_independent_warnings() {
        let mut bad = node("???", NodeCategory::Instrumentation);
        bad.confidence = Some(0.40);
        bad.flag_for_review = true;
        let graph = PidGraph {
            nodes: vec![bad],
            edges: vec![],
        };
        let report = generate_review_queue(&graph);
        // Orphan + AI flagged + low confidence + invalid tag.
        assert_eq!(report.warnings.len(), 4);
        assert!(report.errors.is_empty());
    }
}
