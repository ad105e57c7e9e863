// Trust arrow geometry between the self node and each scored person.

use crate::config::{ARROW_PERP_OFFSET, NODE_RADIUS};
use crate::model::{PersonNode, Position, TrustLevel};
use serde::Serialize;

const EPS_DIST: f64 = 1e-6;
const OUTWARD_OPACITY: f32 = 0.7;
const INWARD_OPACITY: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn css(&self) -> String { format!("rgb({}, {}, {})", self.r, self.g, self.b) }
}

pub fn trust_color(level: TrustLevel) -> Rgb {
    match level {
        TrustLevel::High => Rgb { r: 16, g: 185, b: 129 },
        TrustLevel::Medium => Rgb { r: 234, g: 179, b: 8 },
        TrustLevel::Low => Rgb { r: 239, g: 68, b: 68 },
        TrustLevel::Unscored => Rgb { r: 148, g: 163, b: 184 },
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowDirection {
    Outward,
    Inward,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustArrow {
    pub node_id: String,
    pub direction: ArrowDirection,
    pub level: TrustLevel,
    pub start: Position,
    pub end: Position,
    pub color: Rgb,
    pub dashed: bool,
    pub opacity: f32,
}

/// Two arrows per scored person: self -> person (outward) and person -> self
/// (inward, shifted sideways so the pair stays readable). Endpoints stop at
/// the node circles. People sitting on top of the self node get none.
pub fn trust_arrows(nodes: &[PersonNode]) -> Vec<TrustArrow> {
    let Some(me) = nodes.iter().find(|n| n.is_self) else { return Vec::new() };
    let mut out = Vec::new();
    for node in nodes.iter().filter(|n| !n.is_self) {
        let Some(score) = node.trust_score else { continue };
        let dx = node.position.x - me.position.x;
        let dy = node.position.y - me.position.y;
        let dist = (dx * dx + dy * dy).sqrt();
        if dist <= EPS_DIST {
            continue;
        }
        let (ux, uy) = (dx / dist, dy / dist);
        let (ox, oy) = (ux * NODE_RADIUS, uy * NODE_RADIUS);
        let (px, py) = (-uy * ARROW_PERP_OFFSET, ux * ARROW_PERP_OFFSET);
        out.push(TrustArrow {
            node_id: node.id.clone(),
            direction: ArrowDirection::Outward,
            level: score.outward,
            start: Position::new(me.position.x + ox, me.position.y + oy),
            end: Position::new(node.position.x - ox, node.position.y - oy),
            color: trust_color(score.outward),
            dashed: score.uncertain,
            opacity: OUTWARD_OPACITY,
        });
        out.push(TrustArrow {
            node_id: node.id.clone(),
            direction: ArrowDirection::Inward,
            level: score.inward,
            start: Position::new(node.position.x - ox + px, node.position.y - oy + py),
            end: Position::new(me.position.x + ox + px, me.position.y + oy + py),
            color: trust_color(score.inward),
            dashed: score.uncertain,
            opacity: INWARD_OPACITY,
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TrustScore;

    fn nodes() -> Vec<PersonNode> {
        let mut p = PersonNode::person("p".into(), "P".into(), Position::new(100.0, 0.0));
        p.trust_score = Some(TrustScore { outward: TrustLevel::High, inward: TrustLevel::Low, uncertain: true });
        vec![
            PersonNode::self_node("s".into(), "You".into(), Position::new(0.0, 0.0)),
            p,
            PersonNode::person("q".into(), "Q".into(), Position::new(0.0, 100.0)),
        ]
    }

    #[test]
    fn arrows_for_scored_people_only() {
        let arrows = trust_arrows(&nodes());
        assert_eq!(arrows.len(), 2);
        let out = &arrows[0];
        assert_eq!(out.direction, ArrowDirection::Outward);
        assert_eq!(out.start, Position::new(30.0, 0.0));
        assert_eq!(out.end, Position::new(70.0, 0.0));
        assert_eq!(out.color, trust_color(TrustLevel::High));
        assert!(out.dashed);
        let inw = &arrows[1];
        assert_eq!(inw.start, Position::new(70.0, 8.0));
        assert_eq!(inw.end, Position::new(30.0, 8.0));
        assert_eq!(inw.level, TrustLevel::Low);
    }

    #[test]
    fn coincident_nodes_produce_nothing() {
        let mut ns = nodes();
        ns[1].position = Position::new(0.0, 0.0);
        assert!(trust_arrows(&ns).is_empty());
    }

    #[test]
    fn css_color() {
        assert_eq!(trust_color(TrustLevel::Unscored).css(), "rgb(148, 163, 184)");
    }
}
