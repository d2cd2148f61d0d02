use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tree::TreeFrame;

#[derive(Debug, Error)]
#[error("layout engine failed: {0}")]
pub struct LayoutError(pub String);

/// Graph description exchanged with the external layout engine. Field names
/// follow the engine's JSON convention; position fields are absent on the way
/// in and filled on the way back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutGraph {
    pub id: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub layout_options: HashMap<String, String>,
    #[serde(default)]
    pub children: Vec<LayoutNode>,
    #[serde(default)]
    pub edges: Vec<LayoutEdge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl LayoutGraph {
    pub fn new(id: impl Into<String>, layout_options: HashMap<String, String>) -> Self {
        Self {
            id: id.into(),
            layout_options,
            children: Vec::new(),
            edges: Vec::new(),
            x: None,
            y: None,
            width: None,
            height: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    pub id: String,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<LayoutLabel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl LayoutNode {
    pub fn new(id: impl Into<String>, width: f64, height: f64, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            width,
            height,
            labels: vec![LayoutLabel::new(label)],
            x: None,
            y: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutEdge {
    pub id: String,
    pub sources: Vec<String>,
    pub targets: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<LayoutLabel>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<EdgeSection>,
}

impl LayoutEdge {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        label: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            sources: vec![source.into()],
            targets: vec![target.into()],
            labels: label.map(LayoutLabel::new).into_iter().collect(),
            sections: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutLabel {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl LayoutLabel {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            x: None,
            y: None,
            width: None,
            height: None,
        }
    }
}

/// One routed polyline segment of a laid-out edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub start_point: Point,
    pub end_point: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Options requesting a top-down layered layout.
pub fn elk_layout_options() -> HashMap<String, String> {
    HashMap::from([
        ("elk.algorithm".to_string(), "layered".to_string()),
        ("elk.direction".to_string(), "DOWN".to_string()),
        (
            "elk.padding".to_string(),
            "[top=25,left=25,bottom=25,right=25]".to_string(),
        ),
    ])
}

/// External layout engine: the graph description goes in, the same structure
/// comes back annotated with positions. Treated as a black box.
pub trait LayoutEngine {
    fn layout(
        &self,
        graph: LayoutGraph,
    ) -> impl Future<Output = Result<LayoutGraph, LayoutError>>;
}

/// Lay out one tree frame. Callers await the result before drawing and never
/// issue a new request while a prior one is outstanding; frames are not
/// pipelined.
pub async fn layout_tree_frame<E: LayoutEngine>(
    engine: &E,
    frame: &TreeFrame,
) -> Result<LayoutGraph, LayoutError> {
    engine.layout(frame.graph.clone()).await
}
