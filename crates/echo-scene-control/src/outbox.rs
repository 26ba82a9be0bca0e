// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Queueing event sender for master-addressed reference events.

use std::sync::{Arc, Mutex, MutexGuard};

use echo_renderer_port::{
    DataSlotId, RendererSceneState, SceneId, SceneReferenceEvent, SceneReferenceEventSender,
    SceneVersionTag,
};

/// Thread-safe [`SceneReferenceEventSender`] collecting events for delivery
/// to master scenes. Clones share the same queue.
#[derive(Clone, Debug, Default)]
pub struct EventOutbox {
    queue: Arc<Mutex<Vec<SceneReferenceEvent>>>,
}

impl EventOutbox {
    /// Empty outbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every queued event in send order.
    pub fn drain(&self) -> Vec<SceneReferenceEvent> {
        std::mem::take(&mut *self.lock())
    }

    /// Take the queued events addressed to `master`, leaving the rest.
    pub fn drain_for(&self, master: SceneId) -> Vec<SceneReferenceEvent> {
        let mut queue = self.lock();
        let (taken, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut *queue)
            .into_iter()
            .partition(|event| event.master() == master);
        *queue = kept;
        taken
    }

    /// Number of queued events.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<SceneReferenceEvent>> {
        self.queue.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SceneReferenceEventSender for EventOutbox {
    fn send_scene_state_changed(
        &mut self,
        master: SceneId,
        reference: SceneId,
        state: RendererSceneState,
    ) {
        self.lock().push(SceneReferenceEvent::StateChanged {
            master,
            reference,
            state,
        });
    }

    fn send_scene_flushed(&mut self, master: SceneId, reference: SceneId, version: SceneVersionTag) {
        self.lock().push(SceneReferenceEvent::Flushed {
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
        self.lock().push(SceneReferenceEvent::DataLinked {
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
        self.lock().push(SceneReferenceEvent::DataUnlinked {
            master,
            consumer,
            consumer_slot,
            success,
        });
    }
}
