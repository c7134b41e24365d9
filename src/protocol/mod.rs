//! Line protocol subsystem.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                    Protocol Stack                          │
//! │                                                            │
//! │  ┌───────────┐   ┌──────────┐   ┌──────────┐              │
//! │  │ Transport │──▶│   Line   │──▶│ Command  │──▶ Dispatcher │
//! │  │ (trait)   │   │ (framing)│   │ (parser) │              │
//! │  └───────────┘   └──────────┘   └──────────┘              │
//! │       ▲                                                    │
//! │       │          ┌──────────┐                              │
//! │       └──────────│ Messages │◀── AppEvent                  │
//! │                  │ (JSON)   │                              │
//! │                  └──────────┘                              │
//! └────────────────────────────────────────────────────────────┘
//! ```

pub mod command;
pub mod line;
pub mod messages;
pub mod transport;
