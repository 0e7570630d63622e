//! Human-review queue derivation.
//!
//! The engine works on a node/edge projection of the document rather than
//! the category-keyed document itself, so connectivity checks are simple
//! set operations.

pub mod engine;
pub mod graph;

pub use engine::*;
pub use graph::*;

use serde::{Deserialize, Serialize};

/// Why an item landed in the review queue.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum IssueType {
    /// Component with no line connecting it to anything.
    OrphanNode,
    /// The model itself asked for review.
    AiFlagged,
    /// Detection confidence below the review threshold.
    LowConfidence,
    /// Identifier does not follow the standard tag format.
    InvalidTagFormat,
}

impl IssueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::OrphanNode => "Orphan Node",
            IssueType::AiFlagged => "AI Flagged",
            IssueType::LowConfidence => "Low Confidence",
            IssueType::InvalidTagFormat => "Invalid Tag Format",
        }
    }
}

/// One queue entry. A node can appear several times, once per issue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReviewIssue {
    pub id: String,
    pub issue_type: IssueType,
    pub details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<Vec<i64>>,
}

/// The review queue. `errors` is a reserved severity channel: nothing
/// currently classifies as a hard failure, but downstream consumers
/// already distinguish the two.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReviewReport {
    pub errors: Vec<ReviewIssue>,
    pub warnings: Vec<ReviewIssue>,
}
