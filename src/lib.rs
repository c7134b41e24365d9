//! Temp-Lab node control core.
//!
//! Line protocol, run/stop dispatcher, safety watchdog and trimmed-mean
//! ADC filter, plus the host adapters the `templab` binary wires
//! together.  Everything below `app` is hardware-agnostic and talks to the
//! outside world only through the traits in [`app::ports`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod error;
pub mod protocol;
pub mod safety;
pub mod scheduler;
pub mod sensors;
