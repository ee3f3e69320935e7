use std::cell::Cell;
use std::rc::Rc;

/// Shared flag telling async work whether the view that spawned it is still
/// mounted. Clones observe the same flag; once ended it stays ended.
#[derive(Debug, Clone)]
pub struct Liveness(Rc<Cell<bool>>);

impl Liveness {
    pub fn new() -> Self {
        Self(Rc::new(Cell::new(true)))
    }

    pub fn is_live(&self) -> bool {
        self.0.get()
    }

    pub fn end(&self) {
        self.0.set(false);
    }

    /// Runs `f` only while still live; a late completion is logged and dropped.
    pub fn run_if_live<R>(&self, what: &str, f: impl FnOnce() -> R) -> Option<R> {
        if self.is_live() {
            Some(f())
        } else {
            log::debug!("Dropping {} after unmount", what);
            None
        }
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Liveness {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ending_one_clone_ends_all() {
        let liveness = Liveness::new();
        let in_flight = liveness.clone();
        assert!(in_flight.is_live());

        liveness.end();
        assert!(!in_flight.is_live());
        assert_eq!(liveness, in_flight);
        assert_ne!(liveness, Liveness::new());
    }

    #[test]
    fn late_start_completion_does_not_navigate() {
        let liveness = Liveness::new();
        let in_flight = liveness.clone();
        let mut navigated = Vec::new();

        // Unmount happens before the start call resolves.
        liveness.end();
        let ran = in_flight.run_if_live("start navigation", || navigated.push("/processing/j1"));
        assert_eq!(ran, None);
        assert!(navigated.is_empty());
    }

    #[test]
    fn completion_while_mounted_runs() {
        let liveness = Liveness::default();
        assert_eq!(liveness.run_if_live("catalog", || 3), Some(3));
    }
}
