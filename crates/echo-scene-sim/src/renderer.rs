// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Simulated renderer answering scene commands with injected failures.

use std::collections::BTreeSet;

use echo_renderer_port::{
    BufferId, DataSlotId, DisplayId, RendererEvent, ResultOutcome, SceneCommandSink, SceneId,
    SceneResult, SceneResultKind, SceneVersionTag,
};

/// Answers every lifecycle command with exactly one result.
///
/// Commands for unpublished scenes fail. Otherwise every `fail_every`-th
/// answer fails; the rest succeed. Data links always succeed.
#[derive(Debug, Default)]
pub struct SimRenderer {
    fail_every: u32,
    answered: u32,
    failures: u32,
    version: u64,
    published: BTreeSet<SceneId>,
    results: Vec<SceneResult>,
    events: Vec<RendererEvent>,
}

impl SimRenderer {
    /// Renderer failing every `fail_every`-th answer (0 never fails).
    pub fn new(fail_every: u32) -> Self {
        Self {
            fail_every,
            ..Self::default()
        }
    }

    /// Make `scene` available to subscribers.
    pub fn publish(&mut self, scene: SceneId) {
        if self.published.insert(scene) {
            self.push(scene, SceneResultKind::Published, ResultOutcome::Ok);
        }
    }

    /// Withdraw `scene`.
    pub fn unpublish(&mut self, scene: SceneId) {
        if self.published.remove(&scene) {
            self.push(scene, SceneResultKind::Unpublished, ResultOutcome::Ok);
        }
    }

    /// Failures injected so far.
    pub const fn failures(&self) -> u32 {
        self.failures
    }

    /// Results produced since the last call.
    pub fn take_results(&mut self) -> Vec<SceneResult> {
        std::mem::take(&mut self.results)
    }

    /// Renderer events produced since the last call.
    pub fn take_events(&mut self) -> Vec<RendererEvent> {
        std::mem::take(&mut self.events)
    }

    fn answer(&mut self, scene: SceneId, kind: SceneResultKind) {
        let outcome = if !self.published.contains(&scene) || self.inject_failure() {
            ResultOutcome::Failed
        } else {
            ResultOutcome::Ok
        };
        self.push(scene, kind, outcome);
        if kind == SceneResultKind::Shown && outcome == ResultOutcome::Ok {
            self.version += 1;
            self.events.push(RendererEvent::SceneFlushed {
                scene,
                version: SceneVersionTag(self.version),
            });
        }
    }

    fn inject_failure(&mut self) -> bool {
        if self.fail_every == 0 {
            return false;
        }
        self.answered += 1;
        let fail = self.answered % self.fail_every == 0;
        if fail {
            self.failures += 1;
        }
        fail
    }

    fn push(&mut self, scene: SceneId, kind: SceneResultKind, outcome: ResultOutcome) {
        self.results.push(SceneResult::new(scene, kind, outcome));
    }
}

impl SceneCommandSink for SimRenderer {
    fn handle_scene_subscription_request(&mut self, scene: SceneId) {
        self.answer(scene, SceneResultKind::Subscribed);
    }

    fn handle_scene_unsubscription_request(&mut self, scene: SceneId, _indirect: bool) {
        self.answer(scene, SceneResultKind::Unsubscribed);
    }

    fn handle_scene_mapping_request(&mut self, scene: SceneId, _display: DisplayId) {
        self.answer(scene, SceneResultKind::Mapped);
    }

    fn handle_scene_unmapping_request(&mut self, scene: SceneId) {
        self.answer(scene, SceneResultKind::Unmapped);
    }

    fn handle_scene_show_request(&mut self, scene: SceneId) {
        self.answer(scene, SceneResultKind::Shown);
    }

    fn handle_scene_hide_request(&mut self, scene: SceneId) {
        self.answer(scene, SceneResultKind::Hidden);
    }

    fn handle_scene_display_buffer_assignment_request(
        &mut self,
        scene: SceneId,
        buffer: Option<BufferId>,
        _render_order: i32,
    ) -> bool {
        self.events.push(RendererEvent::SceneDisplayBufferAssigned {
            scene,
            buffer,
            success: true,
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
        self.events.push(RendererEvent::SceneDataLinked {
            provider,
            provider_slot,
            consumer,
            consumer_slot,
            success: true,
        });
    }

    fn handle_buffer_to_scene_data_link_request(
        &mut self,
        buffer: BufferId,
        consumer: SceneId,
        consumer_slot: DataSlotId,
    ) {
        self.events.push(RendererEvent::SceneDataBufferLinked {
            buffer,
            consumer,
            consumer_slot,
            success: true,
        });
    }

    fn handle_data_unlink_request(&mut self, consumer: SceneId, consumer_slot: DataSlotId) {
        self.events.push(RendererEvent::SceneDataUnlinked {
            consumer,
            consumer_slot,
            success: true,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcomes(renderer: &mut SimRenderer) -> Vec<ResultOutcome> {
        renderer
            .take_results()
            .into_iter()
            .map(|result| result.outcome)
            .collect()
    }

    #[test]
    fn every_nth_answer_fails() {
        let mut renderer = SimRenderer::new(2);
        renderer.publish(SceneId(1));
        renderer.take_results();
        for _ in 0..4 {
            renderer.handle_scene_subscription_request(SceneId(1));
        }
        assert_eq!(
            outcomes(&mut renderer),
            vec![
                ResultOutcome::Ok,
                ResultOutcome::Failed,
                ResultOutcome::Ok,
                ResultOutcome::Failed
            ]
        );
        assert_eq!(renderer.failures(), 2);
    }

    #[test]
    fn unpublished_scenes_fail_without_counting() {
        let mut renderer = SimRenderer::new(0);
        renderer.handle_scene_show_request(SceneId(3));
        assert_eq!(outcomes(&mut renderer), vec![ResultOutcome::Failed]);
        assert_eq!(renderer.failures(), 0);
        assert!(renderer.take_events().is_empty());
    }

    #[test]
    fn publication_changes_are_reported_once() {
        let mut renderer = SimRenderer::new(0);
        renderer.publish(SceneId(1));
        renderer.publish(SceneId(1));
        renderer.unpublish(SceneId(1));
        renderer.unpublish(SceneId(1));
        let kinds: Vec<_> = renderer
            .take_results()
            .into_iter()
            .map(|result| result.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![SceneResultKind::Published, SceneResultKind::Unpublished]
        );
    }

    #[test]
    fn successful_show_flushes() {
        let mut renderer = SimRenderer::new(0);
        renderer.publish(SceneId(1));
        renderer.handle_scene_show_request(SceneId(1));
        assert_eq!(
            renderer.take_events(),
            vec![RendererEvent::SceneFlushed {
                scene: SceneId(1),
                version: SceneVersionTag(1)
            }]
        );
    }
}
