//! Scoped subscription handles
//!
//! A `Subscription` runs its release closure exactly once: on `release()` or
//! on drop, whichever comes first. Dropping during unwinding releases too.

use std::fmt;

#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    /// Unsubscribe now
    pub fn release(mut self) {
        self.run();
    }

    fn run(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counter() -> (Rc<Cell<u32>>, Subscription) {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        (count, Subscription::new(move || c.set(c.get() + 1)))
    }

    #[test]
    fn test_release_on_drop() {
        let (count, sub) = counter();
        assert!(sub.is_active());
        drop(sub);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_explicit_release_runs_once() {
        let (count, sub) = counter();
        sub.release();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_release_during_unwind() {
        let (count, sub) = counter();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _held = sub;
            panic!("teardown");
        }));
        assert!(result.is_err());
        assert_eq!(count.get(), 1);
    }
}
