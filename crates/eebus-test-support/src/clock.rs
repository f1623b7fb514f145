use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// A manually-advanced clock for exercising timeout logic (session T1-T8
/// timers, Dispatcher's `expire_overdue`) without sleeping in real time.
/// Code under test must be written against `now()`/`Duration` rather than
/// `Instant::now()` directly to make use of this.
#[derive(Default)]
pub struct FakeClock {
    elapsed_ms: AtomicU64,
}

impl FakeClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.elapsed_ms.fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.elapsed_ms.load(Ordering::SeqCst))
    }
}
