// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Routing of renderer events that concern referenced scenes.

use echo_renderer_port::{RendererEvent, SceneReferenceEventSender};
use tracing::trace;

use super::SceneReferenceLogic;

impl SceneReferenceLogic {
    /// Filter one cycle of renderer events.
    ///
    /// Events about referenced scenes never leave the renderer as-is:
    ///
    /// - state changes, flushes and data link results are removed and sent
    ///   to the owning master through `sender`;
    /// - buffer assignment, buffer link and data slot events are removed;
    /// - expiration events stay in `events`, re-addressed to the master.
    ///
    /// Everything else, publication events included, passes through
    /// untouched. References released during the cycle and already settled
    /// are forgotten afterwards.
    pub fn extract_and_send_scene_reference_events<E>(
        &mut self,
        events: &mut Vec<RendererEvent>,
        sender: &mut E,
    ) where
        E: SceneReferenceEventSender + ?Sized,
    {
        events.retain_mut(|event| self.route(event, sender));
        self.released.retain(|_, released| !released.settled);
    }

    /// Route one event; returns whether it stays in the stream.
    fn route<E>(&self, event: &mut RendererEvent, sender: &mut E) -> bool
    where
        E: SceneReferenceEventSender + ?Sized,
    {
        match event {
            RendererEvent::ScenePublished { .. } => true,
            RendererEvent::SceneStateChanged { scene, state } => {
                let Some(master) = self.master_of(*scene) else {
                    return true;
                };
                sender.send_scene_state_changed(master, *scene, *state);
                false
            }
            RendererEvent::SceneFlushed { scene, version } => {
                let Some(master) = self.master_of(*scene) else {
                    return true;
                };
                sender.send_scene_flushed(master, *scene, *version);
                false
            }
            RendererEvent::SceneDataLinked {
                provider,
                provider_slot,
                consumer,
                consumer_slot,
                success,
            } => {
                let Some(master) = self
                    .master_of(*provider)
                    .or_else(|| self.master_of(*consumer))
                else {
                    return true;
                };
                sender.send_data_linked(
                    master,
                    *provider,
                    *provider_slot,
                    *consumer,
                    *consumer_slot,
                    *success,
                );
                false
            }
            RendererEvent::SceneDataUnlinked {
                consumer,
                consumer_slot,
                success,
            } => {
                let Some(master) = self.master_of(*consumer) else {
                    return true;
                };
                sender.send_data_unlinked(master, *consumer, *consumer_slot, *success);
                false
            }
            RendererEvent::SceneDataBufferLinked { consumer: scene, .. }
            | RendererEvent::SceneDisplayBufferAssigned { scene, .. }
            | RendererEvent::DataProviderCreated { scene, .. }
            | RendererEvent::DataProviderDestroyed { scene, .. }
            | RendererEvent::DataConsumerCreated { scene, .. }
            | RendererEvent::DataConsumerDestroyed { scene, .. } => {
                if self.is_reference(*scene) {
                    trace!(%scene, "dropping internal event of referenced scene");
                    false
                } else {
                    true
                }
            }
            RendererEvent::SceneExpired { scene }
            | RendererEvent::SceneRecoveredFromExpiration { scene } => {
                if let Some(master) = self.master_of(*scene) {
                    *scene = master;
                }
                true
            }
        }
    }
}
