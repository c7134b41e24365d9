//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the business rules for a Temp-Lab node: the
//! run/stop dispatcher, watchdog enforcement and the per-iteration control
//! loop.  All interaction with hardware and the host link happens through
//! **port traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod dispatcher;
pub mod events;
pub mod ports;
pub mod service;
pub mod state;
