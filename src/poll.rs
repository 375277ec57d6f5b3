//! The main poll loop body.
//!
//! [`MacroPad`] owns all mutable state of the running firmware (key
//! channels, indicator levels, key handlers).  The board calls
//! [`MacroPad::poll`] once per [`POLL_INTERVAL_MS`](crate::config::POLL_INTERVAL_MS);
//! one call:
//!
//! 1. samples each key, advances its channel and dispatches the event;
//!    on a press the indicators are rendered *before* the press handler
//!    runs, so the light never lags behind a slow macro,
//! 2. renders all indicators,
//! 3. fades every indicator by one step,
//! 4. feeds the watchdog.
//!
//! Handler failures are logged and the loop carries on; any keys the
//! failed handler left down are released.

use crate::action::{dispatch, KeyHandler};
use crate::config::{PadConfig, KEY_COUNT};
use crate::hid::HidOutput;
use crate::indicator::{self, IndicatorDriver, Indicators};
use crate::key::{KeyChannel, KeyEvent, KeyInputs};
use crate::supervisor::Watchdog;

/// Running state of the pad.
pub struct MacroPad<K> {
    keys: [KeyChannel; KEY_COUNT],
    handlers: [K; KEY_COUNT],
    indicators: Indicators,
    hold_keeps_lit: bool,
}

impl<K: KeyHandler> MacroPad<K> {
    pub fn new(handlers: [K; KEY_COUNT]) -> Self {
        Self::with_config(handlers, PadConfig::default())
    }

    pub fn with_config(handlers: [K; KEY_COUNT], config: PadConfig) -> Self {
        Self {
            keys: [KeyChannel::with_debounce(config.debounce_polls); KEY_COUNT],
            handlers,
            indicators: Indicators::new(config.initial_intensity),
            hold_keeps_lit: config.hold_keeps_lit,
        }
    }

    pub fn indicators(&self) -> &Indicators {
        &self.indicators
    }

    pub fn key(&self, key: usize) -> &KeyChannel {
        &self.keys[key]
    }

    pub fn handler(&self, key: usize) -> &K {
        &self.handlers[key]
    }

    /// One iteration of the poll loop. Returns the event of every key.
    pub fn poll<I, L, H, W>(
        &mut self,
        inputs: &mut I,
        leds: &mut L,
        hid: &mut H,
        watchdog: &mut W,
    ) -> [KeyEvent; KEY_COUNT]
    where
        I: KeyInputs,
        L: IndicatorDriver,
        H: HidOutput,
        W: Watchdog,
    {
        let mut events = [KeyEvent::NoChange; KEY_COUNT];

        for (key, slot) in events.iter_mut().enumerate() {
            let event = self.keys[key].update(inputs.level(key));
            *slot = event;

            match event {
                KeyEvent::PressedEdge => {
                    debug!("key {} pressed", key + 1);
                    self.indicators.light(key);
                    self.render(leds);
                }
                KeyEvent::StillHeld if self.hold_keeps_lit => self.indicators.light(key),
                KeyEvent::ReleasedEdge => debug!("key {} released", key + 1),
                _ => {}
            }

            if let Err(e) = dispatch(&mut self.handlers[key], event, hid) {
                warn!("key {}: {} handler failed: {}", key + 1, event, e);
                if let Err(e) = hid.release_all() {
                    warn!("key {}: release after failure: {}", key + 1, e);
                }
            }
        }

        self.render(leds);
        self.indicators.decay();
        watchdog.feed();

        events
    }

    fn render<L: IndicatorDriver>(&self, leds: &mut L) {
        if let Err(e) = indicator::render(leds, self.indicators.levels()) {
            warn!("indicator render failed: {}", e);
        }
    }
}
