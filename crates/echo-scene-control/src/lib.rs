// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Renderer scene control for Echo.
//!
//! Keeps every scene's renderer-visible state in step with what its owner
//! asks for, over a renderer that only talks in asynchronous,
//! possibly-failing, one-command-at-a-time round trips.
//!
//! # Layers
//!
//! - [`ladder`] - Pure per-scene state machine (steps, commands, verdicts).
//! - [`SceneLifecycleController`] - Owns the scene records and reconciles
//!   desired against confirmed state.
//! - [`SceneReferenceLogic`] - Caps referenced scenes by their master and
//!   routes their events to it.
//! - [`SceneControlLoop`] - Runs both once per cycle.
//!
//! Production collaborators ([`CommandBuffer`], [`EventOutbox`],
//! [`SceneReferenceTable`]) implement the port traits from
//! `echo-renderer-port`.
#![forbid(unsafe_code)]

mod command_buffer;
mod config;
mod control_loop;
mod controller;
mod event;
pub mod ladder;
mod outbox;
mod record;
mod reference;
mod reference_table;

pub use command_buffer::CommandBuffer;
pub use config::{RetryPolicy, SceneControlConfig, SCENE_CONTROL_CONFIG_KEY};
pub use control_loop::SceneControlLoop;
pub use controller::SceneLifecycleController;
pub use event::{SceneControlEvent, SceneControlEventKind};
pub use ladder::{LadderStep, PendingCommand};
pub use outbox::EventOutbox;
pub use record::{MappingInfo, SceneInfo, SceneRecord};
pub use reference::{ReferenceError, SceneReferenceLogic};
pub use reference_table::SceneReferenceTable;
