//! Radial placement of people around the viewport center.
//!
//! Every insertion relays out all non-self nodes: node `i` (insertion order,
//! self excluded) sits at angle `i * 2π / count` on a circle whose radius
//! grows once the ring gets crowded. The fit zoom only ever zooms out.

use crate::config::{LAYOUT_BASE_RADIUS, LAYOUT_CROWD_THRESHOLD, LAYOUT_MARGIN, LAYOUT_RADIUS_STEP};
use crate::model::{Position, Viewport};
use std::f64::consts::TAU;

pub fn layout_radius(count: usize) -> f64 {
    if count <= LAYOUT_CROWD_THRESHOLD {
        LAYOUT_BASE_RADIUS
    } else {
        LAYOUT_BASE_RADIUS + LAYOUT_RADIUS_STEP * (count - LAYOUT_CROWD_THRESHOLD) as f64
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RadialLayout {
    pub center: Position,
    pub radius: f64,
    pub positions: Vec<Position>,
}

pub fn radial_layout(center: Position, count: usize) -> RadialLayout {
    let radius = layout_radius(count);
    let step = if count > 0 { TAU / count as f64 } else { 0.0 };
    let positions = (0..count)
        .map(|i| {
            let angle = i as f64 * step;
            Position::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
        })
        .collect();
    RadialLayout { center, radius, positions }
}

/// Largest zoom (capped at 1.0) at which a ring of `radius` plus margin fits.
pub fn fit_zoom(radius: f64, viewport: Viewport) -> f64 {
    let required = 2.0 * radius + LAYOUT_MARGIN;
    1.0f64.min(viewport.width / required).min(viewport.height / required)
}

/// `Some(zoom)` when fitting needs a smaller zoom than `current`.
pub fn zoom_out_to_fit(current: f64, radius: f64, viewport: Viewport) -> Option<f64> {
    let z = fit_zoom(radius, viewport);
    if z < current { Some(z) } else { None }
}
