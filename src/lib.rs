//! Core logic of the MacroPad Mini firmware.
//!
//! A three-key USB macro pad: every key has an indicator that flashes on
//! press and fades out, and a user-programmable macro that runs on press,
//! hold and release.
//!
//! Everything here is hardware-independent and tested on the host.  The
//! board talks to it through a handful of traits:
//!
//! - [`KeyInputs`] - raw, active-low key levels
//! - [`IndicatorDriver`] - the LED strip
//! - [`HidOutput`] - keyboard / consumer-control emulation
//! - [`Watchdog`] - the liveness supervisor
//! - [`Bootloader`] - firmware-update entry
//!
//! Usage: `cargo test`
//!
//! Note: The embedded binary (`--features embedded`) uses main.rs with
//! #![no_std] and #![no_main] and pulls this crate in as a library.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod action;
pub mod boot;
pub mod config;
pub mod error;
pub mod hid;
pub mod indicator;
pub mod key;
pub mod keymap;
pub mod poll;
pub mod supervisor;

pub use action::{Action, KeyHandler, Macro};
pub use boot::{Bootloader, DeviceMode};
pub use error::Error;
pub use hid::HidOutput;
pub use indicator::{IndicatorDriver, Indicators};
pub use key::{KeyChannel, KeyEvent, KeyInputs};
pub use poll::MacroPad;
pub use supervisor::Watchdog;
