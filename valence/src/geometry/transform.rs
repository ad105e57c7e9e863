// Screen <-> canvas conversions. screen = canvas * zoom + pan + offset.

use crate::model::{Position, ViewTransform, Viewport};

const EPS_ZOOM: f64 = 1e-9;

/// Position of the canvas container relative to the page viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CanvasOffset {
    pub left: f64,
    pub top: f64,
}

impl CanvasOffset {
    pub const fn new(left: f64, top: f64) -> Self { CanvasOffset { left, top } }
}

#[inline]
fn safe_zoom(zoom: f64) -> f64 {
    if zoom.abs() <= EPS_ZOOM || !zoom.is_finite() { 1.0 } else { zoom }
}

pub fn screen_to_canvas(screen: Position, vt: &ViewTransform, offset: CanvasOffset) -> Position {
    let rx = screen.x - offset.left;
    let ry = screen.y - offset.top;
    let z = safe_zoom(vt.zoom);
    Position::new((rx - vt.pan_x) / z, (ry - vt.pan_y) / z)
}

pub fn canvas_to_screen(canvas: Position, vt: &ViewTransform, offset: CanvasOffset) -> Position {
    Position::new(
        canvas.x * vt.zoom + vt.pan_x + offset.left,
        canvas.y * vt.zoom + vt.pan_y + offset.top,
    )
}

/// Pan offsets that put `target` at the viewport center under `zoom`. At
/// zoom 1 this is the plain `center - target`.
pub fn centering_pan(target: Position, viewport: Viewport, zoom: f64) -> (f64, f64) {
    let c = viewport.center();
    (c.x - target.x * zoom, c.y - target.y * zoom)
}
