use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use web_time::Instant;

/// Time source for event and listener timestamps.
pub trait Clock: 'static {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A test clock you can drive deterministically.
///
/// Clones share the same time. With a non-zero `step`, every reading
/// advances the clock, so two successive readings are never equal.
#[derive(Clone)]
pub struct TestClock {
    t: Rc<Cell<Instant>>,
    step: Duration,
}

impl TestClock {
    pub fn new(start: Instant) -> Self {
        Self {
            t: Rc::new(Cell::new(start)),
            step: Duration::ZERO,
        }
    }

    pub fn with_step(start: Instant, step: Duration) -> Self {
        Self {
            t: Rc::new(Cell::new(start)),
            step,
        }
    }

    pub fn advance(&self, by: Duration) {
        self.t.set(self.t.get() + by);
    }
}

impl Clock for TestClock {
    fn now(&self) -> Instant {
        let now = self.t.get();
        self.t.set(now + self.step);
        now
    }
}
