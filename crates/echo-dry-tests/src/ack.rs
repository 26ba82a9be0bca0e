// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Acknowledgment helpers: play the renderer's side of the round trip.

use echo_renderer_port::{ResultOutcome, SceneId, SceneResult};
use echo_scene_control::SceneLifecycleController;

use crate::sink::RecordingCommandSink;

/// Upper bound on [`settle`] rounds; the ladder is four rungs tall.
pub const MAX_SETTLE_ROUNDS: usize = 64;

/// Answer every lifecycle command recorded since the last call with
/// `outcome`. Returns how many results were delivered.
///
/// Assignment and link commands have no lifecycle result and are skipped.
pub fn acknowledge_pending(
    controller: &mut SceneLifecycleController<RecordingCommandSink>,
    outcome: ResultOutcome,
) -> usize {
    let mut delivered = 0;
    for command in controller.sink_mut().take_new() {
        if let Some(kind) = command.result_kind() {
            controller.handle_result(SceneResult::new(command.scene(), kind, outcome));
            delivered += 1;
        }
    }
    delivered
}

/// Acknowledge with `Ok` until no new lifecycle command is issued.
/// Returns the number of results delivered.
pub fn settle(controller: &mut SceneLifecycleController<RecordingCommandSink>) -> usize {
    let mut total = 0;
    for _ in 0..MAX_SETTLE_ROUNDS {
        let delivered = acknowledge_pending(controller, ResultOutcome::Ok);
        if delivered == 0 {
            break;
        }
        total += delivered;
    }
    total
}

/// Publish `scene` as the renderer would.
pub fn publish(controller: &mut SceneLifecycleController<RecordingCommandSink>, scene: SceneId) {
    controller.scene_published(scene, ResultOutcome::Ok);
}
