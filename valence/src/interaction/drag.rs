//! Per-node pointer drag recognition.
//!
//! The recognizer only reports raw screen positions. Turning them into
//! canvas movement is the job of [`NodeDragTracker`], which adds each
//! screen delta straight onto the node's canvas position, so the same
//! physical pointer travel moves a node the same canvas distance at any
//! zoom.

use crate::model::Position;

/// Raw pointer event data (mouse, pen or touch).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    pub pointer_id: i32,
    pub client_x: f64,
    pub client_y: f64,
}

impl PointerSample {
    pub fn new(pointer_id: i32, client_x: f64, client_y: f64) -> Self {
        PointerSample { pointer_id, client_x, client_y }
    }

    pub fn position(&self) -> Position { Position::new(self.client_x, self.client_y) }
}

/// Element that can capture a pointer so move/up keep arriving outside its bounds.
pub trait PointerCapture {
    fn set_pointer_capture(&mut self, pointer_id: i32);
    fn release_pointer_capture(&mut self, pointer_id: i32);
}

/// For hosts with no capture concept.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCapture;

impl PointerCapture for NoCapture {
    fn set_pointer_capture(&mut self, _pointer_id: i32) {}
    fn release_pointer_capture(&mut self, _pointer_id: i32) {}
}

#[derive(Clone, Debug, PartialEq)]
pub enum DragEvent {
    Start { node_id: String, position: Position },
    Move { node_id: String, position: Position },
    End { node_id: String, position: Position },
}

impl DragEvent {
    pub fn node_id(&self) -> &str {
        match self {
            DragEvent::Start { node_id, .. } | DragEvent::Move { node_id, .. } | DragEvent::End { node_id, .. } => {
                node_id
            }
        }
    }

    pub fn position(&self) -> Position {
        match self {
            DragEvent::Start { position, .. } | DragEvent::Move { position, .. } | DragEvent::End { position, .. } => {
                *position
            }
        }
    }
}

/// Screen-space gesture state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DragState {
    pub is_dragging: bool,
    pub start_position: Position,
    pub current_position: Position,
}

#[derive(Clone, Debug)]
pub struct DragRecognizer {
    node_id: String,
    disabled: bool,
    state: DragState,
}

impl DragRecognizer {
    pub fn new(node_id: &str) -> Self {
        DragRecognizer { node_id: node_id.to_string(), disabled: false, state: DragState::default() }
    }

    pub fn node_id(&self) -> &str { &self.node_id }
    pub fn is_disabled(&self) -> bool { self.disabled }
    pub fn set_disabled(&mut self, disabled: bool) { self.disabled = disabled }
    pub fn state(&self) -> DragState { self.state }
    pub fn is_dragging(&self) -> bool { self.state.is_dragging }

    pub fn pointer_down(&mut self, sample: PointerSample, target: &mut dyn PointerCapture) -> Option<DragEvent> {
        if self.disabled {
            return None;
        }
        target.set_pointer_capture(sample.pointer_id);
        let p = sample.position();
        self.state = DragState { is_dragging: true, start_position: p, current_position: p };
        Some(DragEvent::Start { node_id: self.node_id.clone(), position: p })
    }

    pub fn pointer_move(&mut self, sample: PointerSample) -> Option<DragEvent> {
        if self.disabled || !self.state.is_dragging {
            return None;
        }
        let p = sample.position();
        self.state.current_position = p;
        Some(DragEvent::Move { node_id: self.node_id.clone(), position: p })
    }

    pub fn pointer_up(&mut self, sample: PointerSample, target: &mut dyn PointerCapture) -> Option<DragEvent> {
        if self.disabled || !self.state.is_dragging {
            return None;
        }
        target.release_pointer_capture(sample.pointer_id);
        let p = sample.position();
        self.state.current_position = p;
        self.state.is_dragging = false;
        Some(DragEvent::End { node_id: self.node_id.clone(), position: p })
    }

    /// Capture lost (touch cancelled, window blur). Ends the gesture silently.
    pub fn pointer_cancel(&mut self) -> bool {
        let was = self.state.is_dragging;
        self.state.is_dragging = false;
        was
    }
}

/// Consumer side of a drag: accumulates screen deltas onto a canvas position.
#[derive(Clone, Copy, Debug, Default)]
pub struct NodeDragTracker {
    last_screen: Option<Position>,
}

impl NodeDragTracker {
    pub fn begin(&mut self, screen: Position) { self.last_screen = Some(screen) }

    /// New canvas position for a node currently at `current`, or `None`
    /// when no drag is in progress.
    pub fn follow(&mut self, screen: Position, current: Position) -> Option<Position> {
        let last = self.last_screen?;
        self.last_screen = Some(screen);
        Some(Position::new(current.x + (screen.x - last.x), current.y + (screen.y - last.y)))
    }

    pub fn end(&mut self) { self.last_screen = None }

    pub fn is_active(&self) -> bool { self.last_screen.is_some() }
}
