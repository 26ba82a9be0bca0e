// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Outbound renderer commands and their acknowledgments.

use crate::{BufferId, DataSlotId, DisplayId, ResultOutcome, SceneId};

/// Renderer command sink.
///
/// Every scene-lifecycle request is fire-and-forget: the renderer answers
/// later with exactly one [`SceneResult`] per request. Link requests sit
/// outside the lifecycle and are answered through renderer events instead.
///
/// # Design
///
/// This trait is the outbound port of the scene-control core. The production
/// adapter queues commands for the renderer thread; test doubles record them.
pub trait SceneCommandSink {
    /// Request subscription of a published scene.
    fn handle_scene_subscription_request(&mut self, scene: SceneId);

    /// Request unsubscription. `indirect` marks renderer-internal unwinding.
    fn handle_scene_unsubscription_request(&mut self, scene: SceneId, indirect: bool);

    /// Request mapping of a subscribed scene to `display`.
    fn handle_scene_mapping_request(&mut self, scene: SceneId, display: DisplayId);

    /// Request unmapping of a mapped scene.
    fn handle_scene_unmapping_request(&mut self, scene: SceneId);

    /// Request showing a mapped scene.
    fn handle_scene_show_request(&mut self, scene: SceneId);

    /// Request hiding a shown scene.
    fn handle_scene_hide_request(&mut self, scene: SceneId);

    /// Assign a mapped scene to a display buffer (`None` = framebuffer) with
    /// the given render order. Returns whether the request was accepted.
    fn handle_scene_display_buffer_assignment_request(
        &mut self,
        scene: SceneId,
        buffer: Option<BufferId>,
        render_order: i32,
    ) -> bool;

    /// Link a provider data slot to a consumer data slot.
    fn handle_scene_data_link_request(
        &mut self,
        provider: SceneId,
        provider_slot: DataSlotId,
        consumer: SceneId,
        consumer_slot: DataSlotId,
    );

    /// Link a display buffer to a consumer data slot.
    fn handle_buffer_to_scene_data_link_request(
        &mut self,
        buffer: BufferId,
        consumer: SceneId,
        consumer_slot: DataSlotId,
    );

    /// Remove whatever link feeds the consumer data slot.
    fn handle_data_unlink_request(&mut self, consumer: SceneId, consumer_slot: DataSlotId);
}

/// A [`SceneCommandSink`] call captured as a value.
///
/// Used by queueing adapters and recording test doubles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RendererCommand {
    /// `handle_scene_subscription_request`.
    SubscribeScene {
        /// Target scene.
        scene: SceneId,
    },
    /// `handle_scene_unsubscription_request`.
    UnsubscribeScene {
        /// Target scene.
        scene: SceneId,
        /// Renderer-internal unwinding.
        indirect: bool,
    },
    /// `handle_scene_mapping_request`.
    MapScene {
        /// Target scene.
        scene: SceneId,
        /// Display to map to.
        display: DisplayId,
    },
    /// `handle_scene_unmapping_request`.
    UnmapScene {
        /// Target scene.
        scene: SceneId,
    },
    /// `handle_scene_show_request`.
    ShowScene {
        /// Target scene.
        scene: SceneId,
    },
    /// `handle_scene_hide_request`.
    HideScene {
        /// Target scene.
        scene: SceneId,
    },
    /// `handle_scene_display_buffer_assignment_request`.
    AssignSceneDisplayBuffer {
        /// Target scene.
        scene: SceneId,
        /// Display buffer, `None` for the framebuffer.
        buffer: Option<BufferId>,
        /// Render order within the buffer.
        render_order: i32,
    },
    /// `handle_scene_data_link_request`.
    LinkData {
        /// Providing scene.
        provider: SceneId,
        /// Provider slot.
        provider_slot: DataSlotId,
        /// Consuming scene.
        consumer: SceneId,
        /// Consumer slot.
        consumer_slot: DataSlotId,
    },
    /// `handle_buffer_to_scene_data_link_request`.
    LinkBuffer {
        /// Providing buffer.
        buffer: BufferId,
        /// Consuming scene.
        consumer: SceneId,
        /// Consumer slot.
        consumer_slot: DataSlotId,
    },
    /// `handle_data_unlink_request`.
    UnlinkData {
        /// Consuming scene.
        consumer: SceneId,
        /// Consumer slot.
        consumer_slot: DataSlotId,
    },
}

impl RendererCommand {
    /// The scene a lifecycle command targets, or the consumer for link commands.
    pub const fn scene(&self) -> SceneId {
        match *self {
            Self::SubscribeScene { scene }
            | Self::UnsubscribeScene { scene, .. }
            | Self::MapScene { scene, .. }
            | Self::UnmapScene { scene }
            | Self::ShowScene { scene }
            | Self::HideScene { scene }
            | Self::AssignSceneDisplayBuffer { scene, .. } => scene,
            Self::LinkData { consumer, .. }
            | Self::LinkBuffer { consumer, .. }
            | Self::UnlinkData { consumer, .. } => consumer,
        }
    }

    /// The lifecycle result this command is answered with, if any.
    ///
    /// Buffer assignment and link commands are not part of the lifecycle ladder.
    pub const fn result_kind(&self) -> Option<SceneResultKind> {
        match self {
            Self::SubscribeScene { .. } => Some(SceneResultKind::Subscribed),
            Self::UnsubscribeScene { .. } => Some(SceneResultKind::Unsubscribed),
            Self::MapScene { .. } => Some(SceneResultKind::Mapped),
            Self::UnmapScene { .. } => Some(SceneResultKind::Unmapped),
            Self::ShowScene { .. } => Some(SceneResultKind::Shown),
            Self::HideScene { .. } => Some(SceneResultKind::Hidden),
            Self::AssignSceneDisplayBuffer { .. }
            | Self::LinkData { .. }
            | Self::LinkBuffer { .. }
            | Self::UnlinkData { .. } => None,
        }
    }

    /// Replay this command onto a sink. Returns the assignment answer for
    /// buffer assignments and `true` otherwise.
    pub fn dispatch<S: SceneCommandSink + ?Sized>(&self, sink: &mut S) -> bool {
        match *self {
            Self::SubscribeScene { scene } => sink.handle_scene_subscription_request(scene),
            Self::UnsubscribeScene { scene, indirect } => {
                sink.handle_scene_unsubscription_request(scene, indirect);
            }
            Self::MapScene { scene, display } => sink.handle_scene_mapping_request(scene, display),
            Self::UnmapScene { scene } => sink.handle_scene_unmapping_request(scene),
            Self::ShowScene { scene } => sink.handle_scene_show_request(scene),
            Self::HideScene { scene } => sink.handle_scene_hide_request(scene),
            Self::AssignSceneDisplayBuffer {
                scene,
                buffer,
                render_order,
            } => {
                return sink.handle_scene_display_buffer_assignment_request(
                    scene,
                    buffer,
                    render_order,
                );
            }
            Self::LinkData {
                provider,
                provider_slot,
                consumer,
                consumer_slot,
            } => sink.handle_scene_data_link_request(provider, provider_slot, consumer, consumer_slot),
            Self::LinkBuffer {
                buffer,
                consumer,
                consumer_slot,
            } => sink.handle_buffer_to_scene_data_link_request(buffer, consumer, consumer_slot),
            Self::UnlinkData {
                consumer,
                consumer_slot,
            } => sink.handle_data_unlink_request(consumer, consumer_slot),
        }
        true
    }
}

/// Which lifecycle acknowledgment a [`SceneResult`] carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SceneResultKind {
    /// The scene appeared (spontaneous, never requested).
    Published,
    /// The scene disappeared (spontaneous, never requested).
    Unpublished,
    /// Answer to a subscription request.
    Subscribed,
    /// Answer to an unsubscription request.
    Unsubscribed,
    /// Answer to a mapping request.
    Mapped,
    /// Answer to an unmapping request.
    Unmapped,
    /// Answer to a show request.
    Shown,
    /// Answer to a hide request.
    Hidden,
}

/// A lifecycle acknowledgment from the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneResult {
    /// Scene the acknowledgment is about.
    pub scene: SceneId,
    /// Which request (or spontaneous change) is acknowledged.
    pub kind: SceneResultKind,
    /// How it went.
    pub outcome: ResultOutcome,
}

impl SceneResult {
    /// Build an acknowledgment.
    pub const fn new(scene: SceneId, kind: SceneResultKind, outcome: ResultOutcome) -> Self {
        Self {
            scene,
            kind,
            outcome,
        }
    }
}
