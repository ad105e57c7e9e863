//! Injectable id generation and time.
//!
//! The store and the persistence service never read ambient randomness or
//! the wall clock directly; they go through an [`Environment`] so tests can
//! run with deterministic ids and a hand-driven clock.

use std::cell::Cell;
use std::rc::Rc;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

const EPOCH_ISO: &str = "1970-01-01T00:00:00Z";

pub trait IdGenerator {
    fn next_id(&self) -> String;
}

pub trait Clock {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> u64;

    /// ISO-8601 (RFC 3339) timestamp for `savedAt`.
    fn now_iso(&self) -> String { iso_from_ms(self.now_ms()) }
}

pub fn iso_from_ms(ms: u64) -> String {
    OffsetDateTime::from_unix_timestamp_nanos(ms as i128 * 1_000_000)
        .ok()
        .and_then(|t| t.format(&Rfc3339).ok())
        .unwrap_or_else(|| EPOCH_ISO.to_string())
}

/// Random v4 UUIDs.
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&self) -> String { uuid::Uuid::new_v4().to_string() }
}

/// `prefix-1`, `prefix-2`, ...
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: Cell<u64>,
}

impl SequentialIds {
    pub fn new(prefix: &str) -> Self { SequentialIds { prefix: prefix.to_string(), next: Cell::new(1) } }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.next.get();
        self.next.set(n + 1);
        format!("{}-{}", self.prefix, n)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos();
        if nanos <= 0 { 0 } else { (nanos / 1_000_000) as u64 }
    }

    fn now_iso(&self) -> String {
        OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_else(|_| EPOCH_ISO.to_string())
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    ms: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self { ManualClock { ms: Rc::new(Cell::new(start_ms)) } }
    pub fn set(&self, ms: u64) { self.ms.set(ms) }
    pub fn advance(&self, ms: u64) { self.ms.set(self.ms.get().saturating_add(ms)) }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 { self.ms.get() }
}

/// Collaborators shared by the store and the persistence service.
#[derive(Clone)]
pub struct Environment {
    pub ids: Rc<dyn IdGenerator>,
    pub clock: Rc<dyn Clock>,
}

impl Environment {
    pub fn new(ids: Rc<dyn IdGenerator>, clock: Rc<dyn Clock>) -> Self { Environment { ids, clock } }

    pub fn system() -> Self { Environment::new(Rc::new(UuidIds), Rc::new(SystemClock)) }

    /// Sequential ids and a manual clock starting at `start_ms`; the clock
    /// handle is returned so callers can advance it.
    pub fn deterministic(prefix: &str, start_ms: u64) -> (Self, ManualClock) {
        let clock = ManualClock::new(start_ms);
        (Environment::new(Rc::new(SequentialIds::new(prefix)), Rc::new(clock.clone())), clock)
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment").field("now_ms", &self.clock.now_ms()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_ids_are_unique() {
        let ids = SequentialIds::new("n");
        assert_eq!(ids.next_id(), "n-1");
        assert_eq!(ids.next_id(), "n-2");
    }

    #[test]
    fn uuid_ids_differ() {
        assert_ne!(UuidIds.next_id(), UuidIds.next_id());
    }

    #[test]
    fn manual_clock_is_shared_and_formats_iso() {
        let (env, clock) = Environment::deterministic("n", 0);
        assert_eq!(env.clock.now_iso(), "1970-01-01T00:00:00Z");
        clock.advance(1_500);
        assert_eq!(env.clock.now_ms(), 1_500);
        assert!(env.clock.now_iso().starts_with("1970-01-01T00:00:01"));
    }
}
