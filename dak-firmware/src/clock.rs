use embassy_time::Instant;

/// Monotonic time source for the scan loop.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// The embassy time driver.
#[derive(Default, Clone, Copy)]
pub struct SystemClock;
impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

impl<C: Clock> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }
}
