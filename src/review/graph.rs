//! Projection of the category-keyed document into a node/edge view.

use serde::{Deserialize, Serialize};

use crate::models::PidDocument;

/// Category a graph node came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum NodeCategory {
    Equipment,
    Instrumentation,
    Valves,
}

/// A tag-bearing component.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphNode {
    pub id: String,
    pub category: NodeCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    #[serde(default)]
    pub flag_for_review: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<Vec<i64>>,
}

/// A line between two tagged endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PidGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Project a document onto its connectivity graph.
///
/// Nodes come from the tag-bearing categories (equipment, instruments,
/// valves). Edges come from lines carrying both endpoint tags; the
/// endpoints need not be known nodes, since off-page references are
/// normal on real drawings and must not make every node an orphan.
pub fn project_graph(doc: &PidDocument) -> PidGraph {
    let mut graph = PidGraph::default();

    for item in &doc.equipment {
        if let Some(tag) = item.tag.as_deref().filter(|t| !t.is_empty()) {
            graph.nodes.push(GraphNode {
                id: tag.to_string(),
                category: NodeCategory::Equipment,
                confidence: item.base.confidence,
                flag_for_review: item.base.flag_for_review.unwrap_or(false),
                review_reason: item.base.review_reason.clone(),
                bounding_box: item.base.bounding_box.clone(),
            });
        }
    }
    for item in &doc.instrumentation {
        if let Some(tag) = item.tag.as_deref().filter(|t| !t.is_empty()) {
            graph.nodes.push(GraphNode {
                id: tag.to_string(),
                category: NodeCategory::Instrumentation,
                confidence: item.base.confidence,
                flag_for_review: item.base.flag_for_review.unwrap_or(false),
                review_reason: item.base.review_reason.clone(),
                bounding_box: item.base.bounding_box.clone(),
            });
        }
    }
    for item in &doc.valves {
        if let Some(tag) = item.tag.as_deref().filter(|t| !t.is_empty()) {
            graph.nodes.push(GraphNode {
                id: tag.to_string(),
                category: NodeCategory::Valves,
                confidence: item.base.confidence,
                flag_for_review: item.base.flag_for_review.unwrap_or(false),
                review_reason: item.base.review_reason.clone(),
                bounding_box: item.base.bounding_box.clone(),
            });
        }
    }

    for line in &doc.lines {
        let source = line.source_tag.as_deref().filter(|t| !t.is_empty());
        let target = line.destination_tag.as_deref().filter(|t| !t.is_empty());
        if let (Some(source), Some(target)) = (source, target) {
            graph.edges.push(GraphEdge {
                source: source.to_string(),
                target: target.to_string(),
                label: line.line_number_tag.clone(),
            });
        }
    }

    graph
}
