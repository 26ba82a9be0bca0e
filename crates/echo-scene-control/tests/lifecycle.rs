// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Lifecycle controller behavior against a recording command sink.

use echo_dry_tests::{
    acknowledge_pending, buffer, display, publish, scene, settle, RecordingCommandSink,
};
use echo_renderer_port::{RendererCommand, RendererSceneState, ResultOutcome, SceneId};
use echo_scene_control::{
    PendingCommand, RetryPolicy, SceneControlConfig, SceneControlEvent, SceneInfo,
    SceneLifecycleController,
};
use RendererSceneState::{Available, Ready, Rendered, Unavailable};

const S: SceneId = scene(1);

fn controller() -> SceneLifecycleController<RecordingCommandSink> {
    SceneLifecycleController::new(RecordingCommandSink::new())
}

/// Controller with `S` published, mapped on display 1 and shown.
fn rendered() -> SceneLifecycleController<RecordingCommandSink> {
    let mut c = controller();
    c.set_scene_mapping(S, display(1));
    c.set_scene_state(S, Rendered);
    publish(&mut c, S);
    settle(&mut c);
    c.consume_events();
    c
}

fn changed(state: RendererSceneState) -> SceneControlEvent {
    SceneControlEvent::state_changed(S, state)
}

#[test]
fn publish_to_rendered_round_trip() {
    let mut c = controller();
    c.set_scene_mapping(S, display(1));
    c.set_scene_state(S, Rendered);
    assert!(c.sink().commands().is_empty(), "unpublished scenes get no commands");

    publish(&mut c, S);
    assert_eq!(settle(&mut c), 3);

    assert_eq!(
        c.consume_events(),
        vec![
            SceneControlEvent::published(S),
            changed(Available),
            changed(Ready),
            changed(Rendered),
        ]
    );
    assert_eq!(
        c.sink().commands(),
        &[
            RendererCommand::SubscribeScene { scene: S },
            RendererCommand::MapScene {
                scene: S,
                display: display(1)
            },
            RendererCommand::ShowScene { scene: S },
        ]
    );
    assert!(c.consume_events().is_empty(), "events are drained once");
}

#[test]
fn one_command_in_flight_per_scene() {
    let mut c = controller();
    c.set_scene_mapping(S, display(1));
    publish(&mut c, S);
    c.set_scene_state(S, Rendered);
    c.set_scene_state(S, Ready);
    c.set_scene_state(S, Rendered);
    assert_eq!(
        c.sink_mut().take_new(),
        vec![RendererCommand::SubscribeScene { scene: S }]
    );
    assert_eq!(c.pending_command(S), Some(PendingCommand::Subscribe));
}

#[test]
fn target_changes_are_picked_up_after_the_pending_result() {
    let mut c = controller();
    c.set_scene_mapping(S, display(1));
    publish(&mut c, S);
    c.set_scene_state(S, Rendered);
    c.set_scene_state(S, Available);
    settle(&mut c);
    assert_eq!(c.scene_state(S), Available);
    assert_eq!(c.sink().commands().len(), 1, "only the subscription was needed");
}

#[test]
fn failed_results_reissue_the_identical_command() {
    let mut c = controller();
    c.set_scene_mapping(S, display(1));
    publish(&mut c, S);
    c.set_scene_state(S, Ready);
    acknowledge_pending(&mut c, ResultOutcome::Ok);
    c.consume_events();

    // A display change while the map is in flight does not alter the retry.
    c.set_scene_mapping(S, display(2));
    for _ in 0..3 {
        assert_eq!(acknowledge_pending(&mut c, ResultOutcome::Failed), 1);
    }
    assert_eq!(
        c.sink_mut().take_new(),
        vec![RendererCommand::MapScene {
            scene: S,
            display: display(1)
        }]
    );
    assert_eq!(c.scene_state(S), Available);
    assert!(c.consume_events().is_empty());
}

#[test]
fn unpublish_cascades_without_commands() {
    let mut c = rendered();
    c.sink_mut().take_new();

    c.scene_unpublished(S, ResultOutcome::Ok);

    assert_eq!(
        c.consume_events(),
        vec![
            changed(Ready).with_indirect(true),
            changed(Available).with_indirect(true),
        ]
    );
    assert!(c.sink_mut().take_new().is_empty());
    assert_eq!(c.scene_info(S).state, Unavailable);
    assert_eq!(c.scene_info(S).target_state, Rendered);
    assert_eq!(c.pending_command(S), None);
}

#[test]
fn unpublish_of_a_published_only_scene_is_silent() {
    let mut c = controller();
    publish(&mut c, S);
    c.consume_events();
    c.scene_unpublished(S, ResultOutcome::Ok);
    assert!(c.consume_events().is_empty());
    c.scene_unpublished(S, ResultOutcome::Ok);
    assert!(c.consume_events().is_empty());
}

#[test]
fn republish_race_absorbs_the_stale_map_failure() {
    let mut c = controller();
    c.set_scene_mapping(S, display(1));
    c.set_scene_state(S, Rendered);
    publish(&mut c, S);
    acknowledge_pending(&mut c, ResultOutcome::Ok);
    assert!(matches!(c.pending_command(S), Some(PendingCommand::Map { .. })));

    c.scene_unpublished(S, ResultOutcome::Ok);
    c.sink_mut().take_new();
    publish(&mut c, S);
    c.scene_mapped(S, ResultOutcome::Failed);

    let mark = c.sink().commands().len();
    c.sink_mut().take_new();
    c.scene_subscribed(S, ResultOutcome::Ok);
    settle(&mut c);

    let clean = rendered();
    assert_eq!(c.scene_info(S), clean.scene_info(S));
    assert_eq!(
        &c.sink().commands()[mark - 1..],
        clean.sink().commands(),
        "same commands as a clean publish, none duplicated or missing"
    );
}

#[test]
fn stale_and_duplicate_results_are_absorbed() {
    let mut c = controller();
    c.set_scene_mapping(S, display(1));
    c.set_scene_state(S, Available);
    publish(&mut c, S);
    publish(&mut c, S);
    settle(&mut c);
    c.scene_subscribed(S, ResultOutcome::Ok);
    c.scene_shown(S, ResultOutcome::Ok);
    c.scene_hidden(S, ResultOutcome::Failed);

    assert_eq!(
        c.consume_events(),
        vec![SceneControlEvent::published(S), changed(Available)]
    );
    assert_eq!(c.sink().commands().len(), 1);
}

#[test]
fn indirect_result_moves_the_ladder_and_reconciles() {
    let mut c = rendered();
    c.sink_mut().take_new();

    c.scene_hidden(S, ResultOutcome::Indirect);

    assert_eq!(c.consume_events(), vec![changed(Ready).with_indirect(true)]);
    assert_eq!(
        c.sink_mut().take_new(),
        vec![RendererCommand::ShowScene { scene: S }]
    );
}

#[test]
fn indirect_result_of_the_awaited_kind_completes_the_command() {
    let mut c = rendered();
    c.set_scene_state(S, Available);
    assert_eq!(c.pending_command(S), Some(PendingCommand::Hide));

    c.scene_hidden(S, ResultOutcome::Indirect);
    assert_eq!(c.pending_command(S), Some(PendingCommand::Unmap));
    // A late duplicate of the hide answer no longer matches anything.
    c.scene_hidden(S, ResultOutcome::Ok);
    assert_eq!(c.pending_command(S), Some(PendingCommand::Unmap));
    assert_eq!(c.scene_state(S), Ready);
}

#[test]
fn indirect_change_under_another_command_waits_for_its_answer() {
    let mut c = controller();
    c.set_scene_mapping(S, display(1));
    c.set_scene_state(S, Rendered);
    publish(&mut c, S);
    c.scene_subscribed(S, ResultOutcome::Ok);
    c.scene_mapped(S, ResultOutcome::Ok);
    assert_eq!(c.pending_command(S), Some(PendingCommand::Show));
    c.sink_mut().take_new();
    c.consume_events();

    // The renderer unmaps on its own while the show is still out.
    c.scene_unmapped(S, ResultOutcome::Indirect);
    assert_eq!(c.scene_state(S), Available);
    assert_eq!(c.consume_events(), vec![changed(Available).with_indirect(true)]);
    assert_eq!(c.pending_command(S), Some(PendingCommand::Show));
    assert!(c.sink_mut().take_new().is_empty());

    // The show's own answer frees the scene, which then climbs again.
    c.scene_shown(S, ResultOutcome::Failed);
    assert_eq!(c.scene_state(S), Available);
    assert_eq!(
        c.sink_mut().take_new(),
        vec![RendererCommand::MapScene {
            scene: S,
            display: display(1)
        }]
    );
    assert!(c.consume_events().is_empty());

    c.scene_mapped(S, ResultOutcome::Ok);
    c.scene_shown(S, ResultOutcome::Ok);
    assert_eq!(c.scene_state(S), Rendered);
    assert_eq!(c.pending_command(S), None);
}

#[test]
fn display_change_while_mapped_waits_for_the_next_mapping() {
    let mut c = rendered();
    let mark = c.sink().commands().len();

    c.set_scene_mapping(S, display(2));
    assert!(c.sink_mut().take_new().is_empty());
    assert_eq!(c.scene_info(S).display, Some(display(2)));

    c.set_scene_state(S, Available);
    settle(&mut c);
    c.set_scene_state(S, Rendered);
    settle(&mut c);
    assert_eq!(
        &c.sink().commands()[mark..],
        &[
            RendererCommand::HideScene { scene: S },
            RendererCommand::UnmapScene { scene: S },
            RendererCommand::MapScene {
                scene: S,
                display: display(2)
            },
            RendererCommand::ShowScene { scene: S },
        ]
    );
}

#[test]
fn mapping_waits_for_a_display() {
    let mut c = controller();
    c.set_scene_state(S, Ready);
    publish(&mut c, S);
    settle(&mut c);
    assert_eq!(c.scene_state(S), Available);
    assert_eq!(c.pending_command(S), None);

    c.set_scene_mapping(S, display(3));
    settle(&mut c);
    assert_eq!(c.scene_state(S), Ready);
}

#[test]
fn buffer_assignment_follows_the_mapping() {
    let mut c = controller();
    c.set_scene_mapping(S, display(1));
    c.set_scene_display_buffer_assignment(S, Some(buffer(4)), 7);
    c.set_scene_state(S, Rendered);
    publish(&mut c, S);
    settle(&mut c);

    let commands = c.sink().commands();
    assert_eq!(
        &commands[1..],
        &[
            RendererCommand::MapScene {
                scene: S,
                display: display(1)
            },
            RendererCommand::AssignSceneDisplayBuffer {
                scene: S,
                buffer: Some(buffer(4)),
                render_order: 7
            },
            RendererCommand::ShowScene { scene: S },
        ]
    );
    let info = c.scene_info(S);
    assert_eq!((info.buffer, info.render_order), (Some(buffer(4)), 7));
}

#[test]
fn buffer_change_while_shown_does_not_touch_the_ladder() {
    let mut c = rendered();
    c.sink_mut().take_new();

    c.set_scene_display_buffer_assignment(S, None, -3);
    assert_eq!(
        c.sink_mut().take_new(),
        vec![RendererCommand::AssignSceneDisplayBuffer {
            scene: S,
            buffer: None,
            render_order: -3
        }]
    );
    assert_eq!(c.scene_state(S), Rendered);
    assert!(c.consume_events().is_empty());

    // Same values again: nothing to do.
    c.set_scene_display_buffer_assignment(S, None, -3);
    assert!(c.sink_mut().take_new().is_empty());
}

#[test]
fn rejected_assignment_is_retried_on_the_next_trigger() {
    let mut c = rendered();
    c.sink_mut().take_new();
    c.sink_mut().set_accept_assignments(false);

    c.set_scene_display_buffer_assignment(S, Some(buffer(2)), 1);
    assert_eq!(c.sink_mut().take_new().len(), 1);

    c.sink_mut().set_accept_assignments(true);
    c.set_scene_state(S, Rendered);
    assert_eq!(c.sink_mut().take_new().len(), 1);
    c.set_scene_state(S, Rendered);
    assert!(c.sink_mut().take_new().is_empty());
}

#[test]
fn outdated_assignment_is_sent_before_descending() {
    let mut c = rendered();
    c.sink_mut().take_new();
    c.sink_mut().set_accept_assignments(false);
    c.set_scene_display_buffer_assignment(S, Some(buffer(3)), 2);
    c.sink_mut().take_new();
    c.sink_mut().set_accept_assignments(true);

    c.set_scene_state(S, Available);
    assert_eq!(
        c.sink_mut().take_new(),
        vec![
            RendererCommand::AssignSceneDisplayBuffer {
                scene: S,
                buffer: Some(buffer(3)),
                render_order: 2
            },
            RendererCommand::HideScene { scene: S },
        ]
    );
}

#[test]
fn unknown_scenes_report_defaults() {
    let c = controller();
    assert_eq!(
        c.scene_info(scene(99)),
        SceneInfo {
            state: Unavailable,
            target_state: Unavailable,
            display: None,
            buffer: None,
            render_order: 0,
        }
    );
    assert_eq!(c.pending_command(scene(99)), None);
    assert!(c.record(scene(99)).is_none());
}

#[test]
fn results_for_unknown_scenes_create_no_commands() {
    let mut c = controller();
    c.scene_mapped(scene(5), ResultOutcome::Ok);
    c.scene_unpublished(scene(6), ResultOutcome::Ok);
    assert!(c.sink().commands().is_empty());
    assert!(c.consume_events().is_empty());
}

#[test]
fn failures_stay_local_to_their_scene() {
    let other = scene(2);
    let mut c = controller();
    for id in [S, other] {
        c.set_scene_mapping(id, display(1));
        c.set_scene_state(id, Ready);
        publish(&mut c, id);
    }
    c.sink_mut().take_new();
    c.scene_subscribed(S, ResultOutcome::Failed);
    c.scene_subscribed(other, ResultOutcome::Ok);
    c.scene_mapped(other, ResultOutcome::Ok);

    assert_eq!(c.scene_state(S), Unavailable);
    assert_eq!(c.scene_state(other), Ready);
}

#[test]
fn limited_retries_park_until_the_target_changes() {
    let config = SceneControlConfig {
        retry: RetryPolicy::Limited { max_retries: 1 },
    };
    let mut c = SceneLifecycleController::with_config(RecordingCommandSink::new(), config);
    c.set_scene_state(S, Available);
    publish(&mut c, S);

    assert_eq!(acknowledge_pending(&mut c, ResultOutcome::Failed), 1);
    assert_eq!(acknowledge_pending(&mut c, ResultOutcome::Failed), 1);
    assert_eq!(c.pending_command(S), None);
    assert!(c.record(S).unwrap().parked);
    assert_eq!(acknowledge_pending(&mut c, ResultOutcome::Failed), 0);

    c.set_scene_state(S, Available);
    assert!(c.sink_mut().take_new().is_empty(), "same target stays parked");

    c.set_scene_state(S, Ready);
    assert_eq!(
        c.sink_mut().take_new(),
        vec![RendererCommand::SubscribeScene { scene: S }]
    );
}
