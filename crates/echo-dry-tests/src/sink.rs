// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Recording command sink.

use echo_renderer_port::{
    BufferId, DataSlotId, DisplayId, RendererCommand, SceneCommandSink, SceneId,
};

/// [`SceneCommandSink`] that records every call as a [`RendererCommand`].
///
/// Display buffer assignments are answered with a scriptable flag
/// (accepted by default).
#[derive(Clone, Debug)]
pub struct RecordingCommandSink {
    log: Vec<RendererCommand>,
    unread: usize,
    accept_assignments: bool,
}

impl Default for RecordingCommandSink {
    fn default() -> Self {
        Self {
            log: Vec::new(),
            unread: 0,
            accept_assignments: true,
        }
    }
}

impl RecordingCommandSink {
    /// Create an empty sink accepting assignments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer subsequent assignment requests with `accept`.
    pub fn set_accept_assignments(&mut self, accept: bool) {
        self.accept_assignments = accept;
    }

    /// Every command recorded so far.
    pub fn commands(&self) -> &[RendererCommand] {
        &self.log
    }

    /// Commands recorded for `scene`.
    pub fn commands_for(&self, scene: SceneId) -> Vec<RendererCommand> {
        self.log
            .iter()
            .copied()
            .filter(|command| command.scene() == scene)
            .collect()
    }

    /// Commands recorded since the previous call, oldest first.
    pub fn take_new(&mut self) -> Vec<RendererCommand> {
        let fresh = self.log[self.unread..].to_vec();
        self.unread = self.log.len();
        fresh
    }

    /// Forget everything recorded so far.
    pub fn clear(&mut self) {
        self.log.clear();
        self.unread = 0;
    }

    fn record(&mut self, command: RendererCommand) {
        self.log.push(command);
    }
}

impl SceneCommandSink for RecordingCommandSink {
    fn handle_scene_subscription_request(&mut self, scene: SceneId) {
        self.record(RendererCommand::SubscribeScene { scene });
    }

    fn handle_scene_unsubscription_request(&mut self, scene: SceneId, indirect: bool) {
        self.record(RendererCommand::UnsubscribeScene { scene, indirect });
    }

    fn handle_scene_mapping_request(&mut self, scene: SceneId, display: DisplayId) {
        self.record(RendererCommand::MapScene { scene, display });
    }

    fn handle_scene_unmapping_request(&mut self, scene: SceneId) {
        self.record(RendererCommand::UnmapScene { scene });
    }

    fn handle_scene_show_request(&mut self, scene: SceneId) {
        self.record(RendererCommand::ShowScene { scene });
    }

    fn handle_scene_hide_request(&mut self, scene: SceneId) {
        self.record(RendererCommand::HideScene { scene });
    }

    fn handle_scene_display_buffer_assignment_request(
        &mut self,
        scene: SceneId,
        buffer: Option<BufferId>,
        render_order: i32,
    ) -> bool {
        self.record(RendererCommand::AssignSceneDisplayBuffer {
            scene,
            buffer,
            render_order,
        });
        self.accept_assignments
    }

    fn handle_scene_data_link_request(
        &mut self,
        provider: SceneId,
        provider_slot: DataSlotId,
        consumer: SceneId,
        consumer_slot: DataSlotId,
    ) {
        self.record(RendererCommand::LinkData {
            provider,
            provider_slot,
            consumer,
            consumer_slot,
        });
    }

    fn handle_buffer_to_scene_data_link_request(
        &mut self,
        buffer: BufferId,
        consumer: SceneId,
        consumer_slot: DataSlotId,
    ) {
        self.record(RendererCommand::LinkBuffer {
            buffer,
            consumer,
            consumer_slot,
        });
    }

    fn handle_data_unlink_request(&mut self, consumer: SceneId, consumer_slot: DataSlotId) {
        self.record(RendererCommand::UnlinkData {
            consumer,
            consumer_slot,
        });
    }
}
