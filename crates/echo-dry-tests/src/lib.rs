// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared test doubles and fixtures for Echo scene-control crates.
#![forbid(unsafe_code)]
//!
//! # Modules
//!
//! - [`ack`] - Deliver renderer results for recorded commands
//! - [`config`] - In-memory config store fake for testing without filesystem
//! - [`ids`] - Short id constructors
//! - [`sender`] - Recording reference event sender
//! - [`sink`] - Recording command sink with scriptable assignment answers

pub mod ack;
pub mod config;
pub mod ids;
pub mod sender;
pub mod sink;

pub use ack::{acknowledge_pending, publish, settle, MAX_SETTLE_ROUNDS};
pub use config::InMemoryConfigStore;
pub use ids::{buffer, display, handle, scene, slot};
pub use sender::RecordingEventSender;
pub use sink::RecordingCommandSink;
