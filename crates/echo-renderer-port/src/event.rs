// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Generic renderer event stream and the master-addressed reference events.

use crate::{BufferId, DataSlotId, RendererSceneState, SceneId, SceneVersionTag};

/// One entry of the renderer's generic per-cycle event stream.
///
/// Scene-control state changes and renderer-originated notifications share
/// this stream; reference filtering rewrites it in place before it leaves
/// the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RendererEvent {
    /// A scene was published and is known to the renderer.
    ScenePublished {
        /// Subject scene.
        scene: SceneId,
    },
    /// A scene's confirmed state crossed an external-state boundary.
    SceneStateChanged {
        /// Subject scene.
        scene: SceneId,
        /// New confirmed state.
        state: RendererSceneState,
    },
    /// A scene flush carrying a version tag was applied.
    SceneFlushed {
        /// Subject scene.
        scene: SceneId,
        /// Version tag of the flush.
        version: SceneVersionTag,
    },
    /// A scene exceeded its expiration deadline.
    SceneExpired {
        /// Subject scene.
        scene: SceneId,
    },
    /// A previously expired scene is up to date again.
    SceneRecoveredFromExpiration {
        /// Subject scene.
        scene: SceneId,
    },
    /// Result of a scene-to-scene data link request.
    SceneDataLinked {
        /// Providing scene.
        provider: SceneId,
        /// Provider slot.
        provider_slot: DataSlotId,
        /// Consuming scene.
        consumer: SceneId,
        /// Consumer slot.
        consumer_slot: DataSlotId,
        /// Whether the link was established.
        success: bool,
    },
    /// Result of a buffer-to-scene data link request.
    SceneDataBufferLinked {
        /// Providing buffer.
        buffer: BufferId,
        /// Consuming scene.
        consumer: SceneId,
        /// Consumer slot.
        consumer_slot: DataSlotId,
        /// Whether the link was established.
        success: bool,
    },
    /// Result of a data unlink request.
    SceneDataUnlinked {
        /// Consuming scene.
        consumer: SceneId,
        /// Consumer slot.
        consumer_slot: DataSlotId,
        /// Whether the link was removed.
        success: bool,
    },
    /// Result of a display buffer assignment.
    SceneDisplayBufferAssigned {
        /// Subject scene.
        scene: SceneId,
        /// Assigned buffer, `None` for the framebuffer.
        buffer: Option<BufferId>,
        /// Whether the assignment was applied.
        success: bool,
    },
    /// A data provider slot was created in a scene.
    DataProviderCreated {
        /// Subject scene.
        scene: SceneId,
        /// Created slot.
        slot: DataSlotId,
    },
    /// A data provider slot was destroyed in a scene.
    DataProviderDestroyed {
        /// Subject scene.
        scene: SceneId,
        /// Destroyed slot.
        slot: DataSlotId,
    },
    /// A data consumer slot was created in a scene.
    DataConsumerCreated {
        /// Subject scene.
        scene: SceneId,
        /// Created slot.
        slot: DataSlotId,
    },
    /// A data consumer slot was destroyed in a scene.
    DataConsumerDestroyed {
        /// Subject scene.
        scene: SceneId,
        /// Destroyed slot.
        slot: DataSlotId,
    },
}

/// Outward event sender for events that concern scene references.
///
/// Every event is addressed to the master scene owning the reference.
pub trait SceneReferenceEventSender {
    /// A referenced scene changed state.
    fn send_scene_state_changed(
        &mut self,
        master: SceneId,
        reference: SceneId,
        state: RendererSceneState,
    );

    /// A referenced scene applied a flush with a version tag.
    fn send_scene_flushed(&mut self, master: SceneId, reference: SceneId, version: SceneVersionTag);

    /// A data link involving a referenced scene was answered.
    fn send_data_linked(
        &mut self,
        master: SceneId,
        provider: SceneId,
        provider_slot: DataSlotId,
        consumer: SceneId,
        consumer_slot: DataSlotId,
        success: bool,
    );

    /// A data unlink involving a referenced scene was answered.
    fn send_data_unlinked(
        &mut self,
        master: SceneId,
        consumer: SceneId,
        consumer_slot: DataSlotId,
        success: bool,
    );
}

/// A [`SceneReferenceEventSender`] call captured as a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneReferenceEvent {
    /// `send_scene_state_changed`.
    StateChanged {
        /// Owning master scene.
        master: SceneId,
        /// Referenced scene.
        reference: SceneId,
        /// New state.
        state: RendererSceneState,
    },
    /// `send_scene_flushed`.
    Flushed {
        /// Owning master scene.
        master: SceneId,
        /// Referenced scene.
        reference: SceneId,
        /// Flushed version tag.
        version: SceneVersionTag,
    },
    /// `send_data_linked`.
    DataLinked {
        /// Owning master scene.
        master: SceneId,
        /// Providing scene.
        provider: SceneId,
        /// Provider slot.
        provider_slot: DataSlotId,
        /// Consuming scene.
        consumer: SceneId,
        /// Consumer slot.
        consumer_slot: DataSlotId,
        /// Whether the link was established.
        success: bool,
    },
    /// `send_data_unlinked`.
    DataUnlinked {
        /// Owning master scene.
        master: SceneId,
        /// Consuming scene.
        consumer: SceneId,
        /// Consumer slot.
        consumer_slot: DataSlotId,
        /// Whether the link was removed.
        success: bool,
    },
}

impl SceneReferenceEvent {
    /// Master scene the event is addressed to.
    pub const fn master(&self) -> SceneId {
        match *self {
            Self::StateChanged { master, .. }
            | Self::Flushed { master, .. }
            | Self::DataLinked { master, .. }
            | Self::DataUnlinked { master, .. } => master,
        }
    }
}
