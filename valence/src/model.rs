use crate::config::{self, MAX_NAME_CHARS};
use serde::{Deserialize, Serialize};

/// Canvas-space coordinates, independent of zoom and pan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self { Position { x, y } }
    pub fn is_finite(&self) -> bool { self.x.is_finite() && self.y.is_finite() }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrustLevel {
    High,
    Medium,
    Low,
    #[default]
    Unscored,
}

impl TrustLevel {
    pub const ALL: [TrustLevel; 4] = [TrustLevel::High, TrustLevel::Medium, TrustLevel::Low, TrustLevel::Unscored];

    pub fn as_str(self) -> &'static str {
        match self {
            TrustLevel::High => "high",
            TrustLevel::Medium => "medium",
            TrustLevel::Low => "low",
            TrustLevel::Unscored => "unscored",
        }
    }

    pub fn parse(s: &str) -> Option<TrustLevel> {
        TrustLevel::ALL.into_iter().find(|l| l.as_str() == s)
    }

    pub fn label(self) -> &'static str {
        match self {
            TrustLevel::High => "High Trust",
            TrustLevel::Medium => "Medium Trust",
            TrustLevel::Low => "Low Trust",
            TrustLevel::Unscored => "Not Scored",
        }
    }
}

/// `outward` is the subject's trust in the person, `inward` the trust the
/// subject believes the person has in them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustScore {
    pub outward: TrustLevel,
    pub inward: TrustLevel,
    pub uncertain: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonNode {
    pub id: String,
    pub name: String,
    pub position: Position,
    pub is_self: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trust_score: Option<TrustScore>,
}

impl PersonNode {
    pub fn person(id: String, name: String, position: Position) -> Self {
        PersonNode { id, name, position, is_self: false, trust_score: None }
    }

    pub fn self_node(id: String, name: String, position: Position) -> Self {
        PersonNode { id, name, position, is_self: true, trust_score: None }
    }
}

/// Trims and truncates a display name. `None` when nothing is left.
pub fn sanitize_name(raw: &str) -> Option<String> {
    let name: String = raw.trim().chars().take(MAX_NAME_CHARS).collect();
    if name.is_empty() { None } else { Some(name) }
}

/// Zoom/pan applied at render time only.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewTransform {
    pub zoom: f64,
    pub pan_x: f64,
    pub pan_y: f64,
}

impl Default for ViewTransform {
    fn default() -> Self { ViewTransform { zoom: 1.0, pan_x: 0.0, pan_y: 0.0 } }
}

impl ViewTransform {
    /// Merges a partial update. Zoom is clamped whether or not the patch sets
    /// it; non-finite pan values are dropped since they cannot be stored.
    pub fn merged(&self, patch: &ViewTransformPatch) -> ViewTransform {
        let finite = |v: Option<f64>| v.filter(|v| v.is_finite());
        ViewTransform {
            zoom: config::clamp_zoom(patch.zoom.unwrap_or(self.zoom)),
            pan_x: finite(patch.pan_x).unwrap_or(self.pan_x),
            pan_y: finite(patch.pan_y).unwrap_or(self.pan_y),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewTransformPatch {
    pub zoom: Option<f64>,
    pub pan_x: Option<f64>,
    pub pan_y: Option<f64>,
}

impl ViewTransformPatch {
    pub fn zoom(zoom: f64) -> Self { ViewTransformPatch { zoom: Some(zoom), ..Default::default() } }
    pub fn pan(pan_x: f64, pan_y: f64) -> Self {
        ViewTransformPatch { zoom: None, pan_x: Some(pan_x), pan_y: Some(pan_y) }
    }
}

/// Size of the visible container in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self { Viewport { width, height } }

    pub fn is_measured(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Returns `self` when measured, otherwise `fallback`.
    pub fn or(self, fallback: Viewport) -> Viewport {
        if self.is_measured() { self } else { fallback }
    }

    pub fn center(&self) -> Position { Position::new(self.width / 2.0, self.height / 2.0) }
}

/// Volatile in-memory state of one canvas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasState {
    pub nodes: Vec<PersonNode>,
    pub view_transform: ViewTransform,
    pub editing_node_id: Option<String>,
    pub selected_node_id: Option<String>,
}

impl CanvasState {
    pub fn self_node(&self) -> Option<&PersonNode> { self.nodes.iter().find(|n| n.is_self) }

    pub fn node(&self, id: &str) -> Option<&PersonNode> { self.nodes.iter().find(|n| n.id == id) }

    pub(crate) fn node_mut(&mut self, id: &str) -> Option<&mut PersonNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Non-self nodes in insertion order.
    pub fn people(&self) -> impl Iterator<Item = &PersonNode> { self.nodes.iter().filter(|n| !n.is_self) }
}

/// Durable snapshot written to local storage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedCanvasState {
    pub version: String,
    pub nodes: Vec<PersonNode>,
    pub view_transform: ViewTransform,
    pub saved_at: String,
}
