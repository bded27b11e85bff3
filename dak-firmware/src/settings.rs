use dak_common::globals;
use embassy_time::Duration;

/// Timing parameters of the scan loop and the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    pub bounce_time: Duration,
    /// How long a double-action key's first action is held back.
    pub delay_time: Duration,
    pub scan_period: Duration,
    /// Idle time before entering sleep mode.
    pub sleep_after: Duration,
    /// Added to the scan period while asleep. Zero disables sleep mode.
    pub sleep_delay: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bounce_time: Duration::from_micros(globals::BOUNCE_TIME_DEFAULT_US),
            delay_time: Duration::from_millis(globals::DELAY_TIME_DEFAULT_MS),
            scan_period: Duration::from_micros(globals::SCAN_PERIOD_DEFAULT_US),
            sleep_after: Duration::from_millis(globals::DELAY_SLEEP_MODE_DEFAULT_MS),
            sleep_delay: Duration::from_millis(globals::SLEEP_DELAY_TIME_DEFAULT_MS),
        }
    }
}

impl Settings {
    pub fn bounce_time(mut self, bounce_time: Duration) -> Self {
        self.bounce_time = bounce_time;
        self
    }

    pub fn delay_time(mut self, delay_time: Duration) -> Self {
        self.delay_time = delay_time;
        self
    }

    pub fn scan_period(mut self, scan_period: Duration) -> Self {
        self.scan_period = scan_period;
        self
    }

    pub fn sleep_after(mut self, sleep_after: Duration) -> Self {
        self.sleep_after = sleep_after;
        self
    }

    pub fn sleep_delay(mut self, sleep_delay: Duration) -> Self {
        self.sleep_delay = sleep_delay;
        self
    }
}
