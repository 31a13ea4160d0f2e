use std::sync::atomic::{AtomicBool, Ordering};

/// Single-flight admission state: `idle -> executing -> (process restart)`.
///
/// At most one task may hold the executing slot per process lifetime; since
/// every execution ends in a forced restart, no task ever returns the slot
/// within the same process. [`finish`](TaskCoordinator::finish) exists for
/// the pre-acceptance failure paths, where the slot was claimed but nothing
/// is in flight.
pub struct TaskCoordinator {
    executing: AtomicBool,
}

impl TaskCoordinator {
    pub fn new() -> Self {
        Self {
            executing: AtomicBool::new(false),
        }
    }

    /// Atomically claim the executing slot. `false` means another task
    /// already holds it.
    pub fn try_begin(&self) -> bool {
        self.executing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// Release the slot. Advisory once execution has started: the process
    /// restart clears it anyway.
    pub fn finish(&self) {
        self.executing.store(false, Ordering::SeqCst);
    }

    /// Lock-free read for the health probe; staleness is acceptable there.
    pub fn is_executing(&self) -> bool {
        self.executing.load(Ordering::Relaxed)
    }
}

impl Default for TaskCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle() {
        let coordinator = TaskCoordinator::new();
        assert!(!coordinator.is_executing());
    }

    #[test]
    fn only_one_claim_succeeds() {
        let coordinator = TaskCoordinator::new();
        assert!(coordinator.try_begin());
        assert!(!coordinator.try_begin());
        assert!(coordinator.is_executing());
    }

    #[test]
    fn finish_releases_the_slot() {
        let coordinator = TaskCoordinator::new();
        assert!(coordinator.try_begin());
        coordinator.finish();
        assert!(!coordinator.is_executing());
        assert!(coordinator.try_begin());
    }

    #[test]
    fn concurrent_claims_admit_exactly_one() {
        use std::sync::Arc;

        let coordinator = Arc::new(TaskCoordinator::new());
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let c = Arc::clone(&coordinator);
                std::thread::spawn(move || c.try_begin())
            })
            .collect();

        let admitted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|admitted| *admitted)
            .count();
        assert_eq!(admitted, 1);
    }
}
