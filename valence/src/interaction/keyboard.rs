//! Global keyboard shortcuts.
//!
//! Nothing fires while the dispatcher is disabled or a text input has focus.
//! A key is consumed, meaning its default action is prevented, only when a
//! handler reports that it handled the action.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanDirection {
    Up,
    Down,
    Left,
    Right,
}

impl PanDirection {
    /// Pan offset change for one step. Content moves toward the viewed
    /// direction: looking up increases `pan_y`.
    pub fn pan_delta(self, step: f64) -> (f64, f64) {
        match self {
            PanDirection::Up => (0.0, step),
            PanDirection::Down => (0.0, -step),
            PanDirection::Left => (step, 0.0),
            PanDirection::Right => (-step, 0.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShortcutAction {
    Cancel,
    Confirm,
    ZoomIn,
    ZoomOut,
    Pan(PanDirection),
    Delete,
    Center,
}

impl ShortcutAction {
    /// Maps a `KeyboardEvent.key` value.
    pub fn from_key(key: &str) -> Option<ShortcutAction> {
        Some(match key {
            "Escape" => ShortcutAction::Cancel,
            "Enter" => ShortcutAction::Confirm,
            "+" | "=" => ShortcutAction::ZoomIn,
            "-" | "_" => ShortcutAction::ZoomOut,
            "ArrowUp" => ShortcutAction::Pan(PanDirection::Up),
            "ArrowDown" => ShortcutAction::Pan(PanDirection::Down),
            "ArrowLeft" => ShortcutAction::Pan(PanDirection::Left),
            "ArrowRight" => ShortcutAction::Pan(PanDirection::Right),
            "Delete" | "Backspace" => ShortcutAction::Delete,
            " " => ShortcutAction::Center,
            _ => return None,
        })
    }
}

/// Answers whether typing is going on somewhere.
pub trait FocusContext {
    fn is_text_input_focused(&self) -> bool;
}

impl FocusContext for bool {
    fn is_text_input_focused(&self) -> bool { *self }
}

/// True for `input`, `textarea`, and any element with `contenteditable`
/// set to something other than `"false"`.
pub fn is_text_input(tag_name: &str, content_editable: Option<&str>) -> bool {
    let tag = tag_name.to_ascii_uppercase();
    if tag == "INPUT" || tag == "TEXTAREA" {
        return true;
    }
    matches!(content_editable, Some(v) if !v.eq_ignore_ascii_case("false"))
}

/// Receivers return `true` when they handled the action. The defaults
/// model an unregistered handler.
pub trait ShortcutHandler {
    fn on_cancel(&mut self) -> bool { false }
    fn on_confirm(&mut self) -> bool { false }
    /// `+1` zoom in, `-1` zoom out.
    fn on_zoom(&mut self, _delta: i8) -> bool { false }
    fn on_pan(&mut self, _direction: PanDirection) -> bool { false }
    fn on_delete(&mut self) -> bool { false }
    fn on_center(&mut self) -> bool { false }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyDisposition {
    /// Dispatcher disabled, text input focused, or unmapped key.
    Ignored,
    /// Mapped but nobody handled it; let the browser have it.
    Unhandled,
    /// Handled; the host must prevent the default action.
    Consumed,
}

impl KeyDisposition {
    pub fn prevent_default(self) -> bool { self == KeyDisposition::Consumed }
}

#[derive(Clone, Copy, Debug)]
pub struct KeyboardDispatcher {
    enabled: bool,
}

impl Default for KeyboardDispatcher {
    fn default() -> Self { KeyboardDispatcher { enabled: true } }
}

impl KeyboardDispatcher {
    pub fn new(enabled: bool) -> Self { KeyboardDispatcher { enabled } }
    pub fn is_enabled(&self) -> bool { self.enabled }
    pub fn set_enabled(&mut self, enabled: bool) { self.enabled = enabled }

    pub fn dispatch(&self, key: &str, focus: &dyn FocusContext, handler: &mut dyn ShortcutHandler) -> KeyDisposition {
        if !self.enabled || focus.is_text_input_focused() {
            return KeyDisposition::Ignored;
        }
        let Some(action) = ShortcutAction::from_key(key) else { return KeyDisposition::Ignored };
        let handled = match action {
            ShortcutAction::Cancel => handler.on_cancel(),
            ShortcutAction::Confirm => handler.on_confirm(),
            ShortcutAction::ZoomIn => handler.on_zoom(1),
            ShortcutAction::ZoomOut => handler.on_zoom(-1),
            ShortcutAction::Pan(d) => handler.on_pan(d),
            ShortcutAction::Delete => handler.on_delete(),
            ShortcutAction::Center => handler.on_center(),
        };
        if handled { KeyDisposition::Consumed } else { KeyDisposition::Unhandled }
    }
}
