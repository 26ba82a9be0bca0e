// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Recording event sender.

use echo_renderer_port::{
    DataSlotId, RendererSceneState, SceneId, SceneReferenceEvent, SceneReferenceEventSender,
    SceneVersionTag,
};

/// [`SceneReferenceEventSender`] that records every call in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingEventSender {
    /// Events sent so far.
    pub sent: Vec<SceneReferenceEvent>,
}

impl RecordingEventSender {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every recorded event.
    pub fn take(&mut self) -> Vec<SceneReferenceEvent> {
        std::mem::take(&mut self.sent)
    }
}

impl SceneReferenceEventSender for RecordingEventSender {
    fn send_scene_state_changed(
        &mut self,
        master: SceneId,
        reference: SceneId,
        state: RendererSceneState,
    ) {
        self.sent.push(SceneReferenceEvent::StateChanged {
            master,
            reference,
            state,
        });
    }

    fn send_scene_flushed(&mut self, master: SceneId, reference: SceneId, version: SceneVersionTag) {
        self.sent.push(SceneReferenceEvent::Flushed {
            master,
            reference,
            version,
        });
    }

    fn send_data_linked(
        &mut self,
        master: SceneId,
        provider: SceneId,
        provider_slot: DataSlotId,
        consumer: SceneId,
        consumer_slot: DataSlotId,
        success: bool,
    ) {
        self.sent.push(SceneReferenceEvent::DataLinked {
            master,
            provider,
            provider_slot,
            consumer,
            consumer_slot,
            success,
        });
    }

    fn send_data_unlinked(
        &mut self,
        master: SceneId,
        consumer: SceneId,
        consumer_slot: DataSlotId,
        success: bool,
    ) {
        self.sent.push(SceneReferenceEvent::DataUnlinked {
            master,
            consumer,
            consumer_slot,
            success,
        });
    }
}
