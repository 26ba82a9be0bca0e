// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Queueing command sink handed from the control thread to the renderer.

use std::sync::{Arc, Mutex, MutexGuard};

use echo_renderer_port::{
    BufferId, DataSlotId, DisplayId, RendererCommand, SceneCommandSink, SceneId,
};

/// Thread-safe [`SceneCommandSink`] that queues commands for the renderer.
///
/// Clones share the same queue: the control thread pushes through one clone
/// and the renderer drains through another.
#[derive(Clone, Debug, Default)]
pub struct CommandBuffer {
    queue: Arc<Mutex<Vec<RendererCommand>>>,
}

impl CommandBuffer {
    /// Empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every queued command in submission order.
    pub fn drain(&self) -> Vec<RendererCommand> {
        std::mem::take(&mut *self.lock())
    }

    /// Number of queued commands.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn push(&self, command: RendererCommand) {
        self.lock().push(command);
    }

    fn lock(&self) -> MutexGuard<'_, Vec<RendererCommand>> {
        self.queue.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SceneCommandSink for CommandBuffer {
    fn handle_scene_subscription_request(&mut self, scene: SceneId) {
        self.push(RendererCommand::SubscribeScene { scene });
    }

    fn handle_scene_unsubscription_request(&mut self, scene: SceneId, indirect: bool) {
        self.push(RendererCommand::UnsubscribeScene { scene, indirect });
    }

    fn handle_scene_mapping_request(&mut self, scene: SceneId, display: DisplayId) {
        self.push(RendererCommand::MapScene { scene, display });
    }

    fn handle_scene_unmapping_request(&mut self, scene: SceneId) {
        self.push(RendererCommand::UnmapScene { scene });
    }

    fn handle_scene_show_request(&mut self, scene: SceneId) {
        self.push(RendererCommand::ShowScene { scene });
    }

    fn handle_scene_hide_request(&mut self, scene: SceneId) {
        self.push(RendererCommand::HideScene { scene });
    }

    fn handle_scene_display_buffer_assignment_request(
        &mut self,
        scene: SceneId,
        buffer: Option<BufferId>,
        render_order: i32,
    ) -> bool {
        self.push(RendererCommand::AssignSceneDisplayBuffer {
            scene,
            buffer,
            render_order,
        });
        true
    }

    fn handle_scene_data_link_request(
        &mut self,
        provider: SceneId,
        provider_slot: DataSlotId,
        consumer: SceneId,
        consumer_slot: DataSlotId,
    ) {
        self.push(RendererCommand::LinkData {
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
        self.push(RendererCommand::LinkBuffer {
            buffer,
            consumer,
            consumer_slot,
        });
    }

    fn handle_data_unlink_request(&mut self, consumer: SceneId, consumer_slot: DataSlotId) {
        self.push(RendererCommand::UnlinkData {
            consumer,
            consumer_slot,
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_one_queue() {
        let mut control = CommandBuffer::new();
        let renderer = control.clone();

        control.handle_scene_subscription_request(SceneId(1));
        control.handle_scene_mapping_request(SceneId(1), DisplayId(2));
        assert_eq!(renderer.len(), 2);

        assert_eq!(
            renderer.drain(),
            vec![
                RendererCommand::SubscribeScene { scene: SceneId(1) },
                RendererCommand::MapScene {
                    scene: SceneId(1),
                    display: DisplayId(2)
                },
            ]
        );
        assert!(control.is_empty());
    }

    #[test]
    fn assignment_is_accepted_once_queued() {
        let mut buffer = CommandBuffer::new();
        assert!(buffer.handle_scene_display_buffer_assignment_request(
            SceneId(4),
            Some(BufferId(9)),
            -1
        ));
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn send_across_threads() {
        let control = CommandBuffer::new();
        let mut producer = control.clone();
        std::thread::spawn(move || producer.handle_scene_show_request(SceneId(5)))
            .join()
            .unwrap();
        assert_eq!(
            control.drain(),
            vec![RendererCommand::ShowScene { scene: SceneId(5) }]
        );
    }
}
