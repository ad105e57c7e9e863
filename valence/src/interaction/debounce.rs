// Single-flight trailing debounce driven by host time.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Debouncer {
    window_ms: u64,
    deadline: Option<u64>,
}

impl Debouncer {
    pub fn new(window_ms: u64) -> Self { Debouncer { window_ms, deadline: None } }

    pub fn window_ms(&self) -> u64 { self.window_ms }

    /// (Re)starts the quiet period; any earlier deadline is dropped.
    pub fn schedule(&mut self, now_ms: u64) -> u64 {
        let d = now_ms.saturating_add(self.window_ms);
        self.deadline = Some(d);
        d
    }

    pub fn cancel(&mut self) { self.deadline = None }

    pub fn is_pending(&self) -> bool { self.deadline.is_some() }

    pub fn deadline(&self) -> Option<u64> { self.deadline }

    /// Clears and returns true once the quiet period has elapsed.
    pub fn fire_if_due(&mut self, now_ms: u64) -> bool {
        match self.deadline {
            Some(d) if now_ms >= d => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Clears and returns whether anything was pending.
    pub fn take(&mut self) -> bool { self.deadline.take().is_some() }
}
