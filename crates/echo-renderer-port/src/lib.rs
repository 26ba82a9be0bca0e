// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Renderer scene-control port contract for Echo.
//!
//! This crate defines the boundary between the scene-control core and the
//! collaborators around it: the renderer's command sink, the outward event
//! sender, and the scene-graph side that declares scene references.
//! It contains no control logic; that lives in echo-scene-control.
//!
//! # Design Principles
//!
//! - **Commands are fire-and-forget**: Every command is acknowledged later
//!   through a dedicated result, never synchronously.
//! - **Ids are opaque**: Scene, display, buffer and slot ids are plain newtypes
//!   compared by value.
//! - **Narrow ports**: Each collaborator is a small trait with one production
//!   implementation and one test double.
//!
//! # Crate Features
//!
//! - `serde`: Serde derives for ids and states.

mod command;
mod event;
mod graph;
mod ids;
mod state;

pub use command::{RendererCommand, SceneCommandSink, SceneResult, SceneResultKind};
pub use event::{RendererEvent, SceneReferenceEvent, SceneReferenceEventSender};
pub use graph::{SceneGraphSource, SceneLinkEndpoint, SceneReferenceAction, SceneReferenceDecl};
pub use ids::{BufferId, DataSlotId, DisplayId, SceneId, SceneReferenceHandle, SceneVersionTag};
pub use state::{ParseStateError, RendererSceneState, ResultOutcome};
