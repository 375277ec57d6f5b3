//! Liveness supervision.
//!
//! The hardware watchdog is the firmware's only recovery mechanism: if the
//! poll loop stops feeding it (a handler that never returns, a wedged
//! transfer) the chip resets and boots from scratch.  There is no
//! software retry or degraded mode.

/// Hardware watchdog.
pub trait Watchdog {
    /// Start the countdown. Called once, after the boot mode is decided.
    fn arm(&mut self);

    /// Restart the countdown. Called once per poll.
    fn feed(&mut self);
}
