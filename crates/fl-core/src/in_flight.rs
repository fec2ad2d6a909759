// ABOUTME: Single-threaded "operation in flight" guard.
// ABOUTME: Callers that find the guard held are dropped rather than queued.

use std::cell::Cell;
use std::rc::Rc;

/// Shared flag marking that a layout operation is running.
///
/// Clones share the same flag, so the controller and the explorer hooks can
/// each hold one.
#[derive(Debug, Clone, Default)]
pub struct InFlight(Rc<Cell<bool>>);

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_set(&self) -> bool {
        self.0.get()
    }

    /// Take the flag, or `None` if someone else holds it
    pub fn try_enter(&self) -> Option<InFlightGuard> {
        if self.0.replace(true) {
            return None;
        }
        Some(InFlightGuard(Rc::clone(&self.0)))
    }
}

/// Releases the flag when dropped
#[derive(Debug)]
pub struct InFlightGuard(Rc<Cell<bool>>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_entry_is_refused_until_release() {
        let flag = InFlight::new();
        let other = flag.clone();

        let guard = flag.try_enter().unwrap();
        assert!(other.is_set());
        assert!(other.try_enter().is_none());

        drop(guard);
        assert!(!flag.is_set());
        assert!(other.try_enter().is_some());
    }
}
