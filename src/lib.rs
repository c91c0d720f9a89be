//! Calendar clock with temperature display
//!
//! Board independent part of the clock firmware: a seconds counter shared
//! with the 1 Hz tick, conversion between that counter and month/day/time
//! fields, the HOME/EDIT state machine that lets the user set the time with
//! a potentiometer and push buttons, a rolling temperature average and the
//! text shown on the display.

#![cfg_attr(not(test), no_std)]

// Must come first so the logging macros are visible to the other modules.
mod fmt;

pub mod app;
pub mod calendar;
pub mod clock;
pub mod config;
pub mod edit;
pub mod error;
pub mod field;
pub mod hardware;
pub mod input;
pub mod presenter;
pub mod retry;
pub mod temperature;

pub use app::{Controller, Inputs};
pub use calendar::{CalendarFields, compose, decompose};
pub use clock::SharedClock;
pub use config::EngineConfig;
pub use edit::{Engine, Mode};
pub use error::{Error, Faults, HardwareFault};
pub use field::{Field, FieldSet, adjust};
pub use presenter::Frame;
