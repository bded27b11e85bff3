//! Default timings and capacities. Units are given by the constant's suffix.

/// How long the first depth of a double-action key is held back before it is sent.
pub const DELAY_TIME_DEFAULT_MS: u64 = 400;
/// A raw switch reading must hold this long before it is accepted.
pub const BOUNCE_TIME_DEFAULT_US: u64 = 6000;
/// Idle time before the scan loop slows down.
pub const DELAY_SLEEP_MODE_DEFAULT_MS: u64 = 10_000;
/// Extra delay added to each scan tick while asleep. Zero disables sleep mode.
pub const SLEEP_DELAY_TIME_DEFAULT_MS: u64 = 10;
pub const SCAN_PERIOD_DEFAULT_US: u64 = 1000;
pub const FN_LOCK_HOLD_TIME_DEFAULT_MS: u64 = 1000;

/// Simultaneous ordinary actions; matches the boot keyboard report.
pub const KEY_SLOTS: usize = 6;
/// Simultaneous modifier-lock holders.
pub const MODIFIER_SLOTS: usize = 10;
