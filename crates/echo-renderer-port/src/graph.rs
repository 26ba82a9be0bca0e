// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scene-graph side of scene references: declarations and link actions.

use crate::{BufferId, DataSlotId, RendererSceneState, SceneId, SceneReferenceHandle};

/// A reference as declared by its master scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneReferenceDecl {
    /// Handle of the reference inside the master.
    pub handle: SceneReferenceHandle,
    /// Scene being referenced.
    pub referenced: SceneId,
    /// State the master asks for. Capped by the master's own state.
    pub requested_state: RendererSceneState,
    /// Render order relative to the master's render order.
    pub render_order_offset: i32,
}

impl SceneReferenceDecl {
    /// Declaration with `Unavailable` requested and no render order offset.
    pub const fn new(handle: SceneReferenceHandle, referenced: SceneId) -> Self {
        Self {
            handle,
            referenced,
            requested_state: RendererSceneState::Unavailable,
            render_order_offset: 0,
        }
    }
}

/// One side of a data link as named by the master scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneLinkEndpoint {
    /// The master scene itself.
    Master,
    /// A scene reference of the master, resolved through its reference table.
    Reference(SceneReferenceHandle),
}

/// Link action queued by a master scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneReferenceAction {
    /// Link a provider slot to a consumer slot.
    LinkData {
        /// Providing side.
        provider: SceneLinkEndpoint,
        /// Provider slot.
        provider_slot: DataSlotId,
        /// Consuming side.
        consumer: SceneLinkEndpoint,
        /// Consumer slot.
        consumer_slot: DataSlotId,
    },
    /// Link a display buffer to a consumer slot.
    LinkBuffer {
        /// Providing buffer.
        buffer: BufferId,
        /// Consuming side.
        consumer: SceneLinkEndpoint,
        /// Consumer slot.
        consumer_slot: DataSlotId,
    },
    /// Remove the link feeding a consumer slot.
    Unlink {
        /// Consuming side.
        consumer: SceneLinkEndpoint,
        /// Consumer slot.
        consumer_slot: DataSlotId,
    },
}

/// Scene-graph collaborator polled once per cycle by the reference logic.
pub trait SceneGraphSource {
    /// Master scenes that currently declare references.
    fn master_scenes(&self) -> Vec<SceneId>;

    /// Current reference table of `master`.
    fn scene_references(&self, master: SceneId) -> Vec<SceneReferenceDecl>;

    /// Drain the link actions `master` queued since the last cycle.
    fn take_reference_actions(&mut self, master: SceneId) -> Vec<SceneReferenceAction>;

    /// Drain the master scenes destroyed since the last cycle.
    fn take_destroyed_masters(&mut self) -> Vec<SceneId>;
}
