// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scene lifecycle controller: desired state → command ladder → confirmed state.
//!
//! The controller keeps one [`SceneRecord`] per scene id it has ever seen and
//! drives each record toward its target one command at a time. It never
//! blocks: commands go out through the [`SceneCommandSink`] and come back
//! later as results, which are matched against the rung they were meant to
//! confirm before anything changes.

use std::collections::BTreeMap;

use echo_renderer_port::{
    BufferId, DisplayId, RendererSceneState, ResultOutcome, SceneCommandSink, SceneId, SceneResult,
    SceneResultKind,
};
use tracing::{debug, trace, warn};

use crate::config::SceneControlConfig;
use crate::event::SceneControlEvent;
use crate::ladder::{self, LadderStep, PendingCommand, Rung, Verdict};
use crate::record::{MappingInfo, SceneInfo, SceneRecord};

/// Per-scene lifecycle reconciliation.
///
/// All entry points run on the control thread; there is no internal locking.
#[derive(Debug)]
pub struct SceneLifecycleController<S> {
    sink: S,
    config: SceneControlConfig,
    scenes: BTreeMap<SceneId, SceneRecord>,
    events: Vec<SceneControlEvent>,
}

impl<S> SceneLifecycleController<S> {
    /// Create a controller with default settings.
    pub fn new(sink: S) -> Self {
        Self::with_config(sink, SceneControlConfig::default())
    }

    /// Create a controller with explicit settings.
    pub fn with_config(sink: S, config: SceneControlConfig) -> Self {
        Self {
            sink,
            config,
            scenes: BTreeMap::new(),
            events: Vec::new(),
        }
    }

    /// The command sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// The command sink, mutably (link requests bypass the ladder).
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consume the controller and return its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Active settings.
    pub fn config(&self) -> &SceneControlConfig {
        &self.config
    }

    /// Confirmed state and requested mapping of `scene`.
    ///
    /// Unknown scenes report `Unavailable` with no display or buffer.
    pub fn scene_info(&self, scene: SceneId) -> SceneInfo {
        self.scenes
            .get(&scene)
            .map(SceneInfo::from)
            .unwrap_or_default()
    }

    /// Confirmed external state of `scene`.
    pub fn scene_state(&self, scene: SceneId) -> RendererSceneState {
        self.scene_info(scene).state
    }

    /// Command currently in flight for `scene`.
    pub fn pending_command(&self, scene: SceneId) -> Option<PendingCommand> {
        self.scenes.get(&scene).and_then(|record| record.pending)
    }

    /// Bookkeeping of `scene`, if it was ever referenced.
    pub fn record(&self, scene: SceneId) -> Option<&SceneRecord> {
        self.scenes.get(&scene)
    }

    /// Ids of every scene with a record, in ascending order.
    pub fn scenes(&self) -> impl Iterator<Item = SceneId> + '_ {
        self.scenes.keys().copied()
    }

    /// Drain accumulated events in causal order. Call once per cycle.
    pub fn consume_events(&mut self) -> Vec<SceneControlEvent> {
        std::mem::take(&mut self.events)
    }
}

impl<S: SceneCommandSink> SceneLifecycleController<S> {
    /// Request `target` for `scene`.
    ///
    /// Issues the next command if the scene is idle; otherwise the new target
    /// is picked up when the in-flight command is answered.
    pub fn set_scene_state(&mut self, scene: SceneId, target: RendererSceneState) {
        let record = self.scenes.entry(scene).or_default();
        if record.target_state != target {
            debug!(%scene, from = %record.target_state, to = %target, "scene target changed");
            record.target_state = target;
            record.unpark();
        }
        self.reconcile(scene);
    }

    /// Record the display `scene` is mapped on by its next map command.
    ///
    /// A scene already mapped on another display stays there until it is
    /// brought down to `Available` and mapped again.
    pub fn set_scene_mapping(&mut self, scene: SceneId, display: DisplayId) {
        let record = self.scenes.entry(scene).or_default();
        if record.target_display != Some(display) {
            if record.confirmed.is_mapped() {
                // Rebind: tracing's macro expansion shadows an ident named `display`.
                let next_display = display;
                debug!(
                    %scene,
                    %next_display,
                    "display change takes effect on the next mapping"
                );
            }
            record.target_display = Some(display);
            record.unpark();
        }
        self.reconcile(scene);
    }

    /// Record the display buffer and render order of `scene`.
    ///
    /// Applied right away when the scene is idle and mapped, otherwise as
    /// soon as it is.
    pub fn set_scene_display_buffer_assignment(
        &mut self,
        scene: SceneId,
        buffer: Option<BufferId>,
        render_order: i32,
    ) {
        let record = self.scenes.entry(scene).or_default();
        if record.target_buffer != buffer || record.target_render_order != render_order {
            record.target_buffer = buffer;
            record.target_render_order = render_order;
            record.unpark();
        }
        self.reconcile(scene);
    }

    /// The scene appeared on the renderer.
    pub fn scene_published(&mut self, scene: SceneId, outcome: ResultOutcome) {
        self.handle_result(SceneResult::new(scene, SceneResultKind::Published, outcome));
    }

    /// The scene disappeared; unwinds its ladder without sending commands.
    pub fn scene_unpublished(&mut self, scene: SceneId, outcome: ResultOutcome) {
        self.handle_result(SceneResult::new(scene, SceneResultKind::Unpublished, outcome));
    }

    /// Answer to a subscription request.
    pub fn scene_subscribed(&mut self, scene: SceneId, outcome: ResultOutcome) {
        self.handle_result(SceneResult::new(scene, SceneResultKind::Subscribed, outcome));
    }

    /// Answer to an unsubscription request.
    pub fn scene_unsubscribed(&mut self, scene: SceneId, outcome: ResultOutcome) {
        self.handle_result(SceneResult::new(scene, SceneResultKind::Unsubscribed, outcome));
    }

    /// Answer to a mapping request.
    pub fn scene_mapped(&mut self, scene: SceneId, outcome: ResultOutcome) {
        self.handle_result(SceneResult::new(scene, SceneResultKind::Mapped, outcome));
    }

    /// Answer to an unmapping request.
    pub fn scene_unmapped(&mut self, scene: SceneId, outcome: ResultOutcome) {
        self.handle_result(SceneResult::new(scene, SceneResultKind::Unmapped, outcome));
    }

    /// Answer to a show request.
    pub fn scene_shown(&mut self, scene: SceneId, outcome: ResultOutcome) {
        self.handle_result(SceneResult::new(scene, SceneResultKind::Shown, outcome));
    }

    /// Answer to a hide request.
    pub fn scene_hidden(&mut self, scene: SceneId, outcome: ResultOutcome) {
        self.handle_result(SceneResult::new(scene, SceneResultKind::Hidden, outcome));
    }

    /// Apply one renderer acknowledgment.
    ///
    /// Results that do not match the record (stale after an unpublish, or a
    /// duplicate) are absorbed without effect.
    pub fn handle_result(&mut self, result: SceneResult) {
        let SceneResult {
            scene,
            kind,
            outcome,
        } = result;
        let record = self.scenes.entry(scene).or_default();
        match ladder::judge(record.confirmed, record.pending, kind, outcome) {
            Verdict::Stale => {
                trace!(
                    %scene,
                    ?kind,
                    ?outcome,
                    step = ?record.confirmed,
                    pending = ?record.pending,
                    "absorbing stale scene result"
                );
                return;
            }
            Verdict::Retry => {
                record.failures = record.failures.saturating_add(1);
                let Some(command) = record.pending else {
                    return;
                };
                if self.config.retry.allows(record.failures) {
                    debug!(%scene, ?command, failures = record.failures, "retrying scene command");
                    command.issue(scene, &mut self.sink);
                } else {
                    warn!(
                        %scene,
                        ?command,
                        failures = record.failures,
                        "scene command keeps failing; parking until the target changes"
                    );
                    record.pending = None;
                    record.parked = true;
                }
                return;
            }
            Verdict::Advance { rung, indirect } => {
                let completed = record
                    .pending
                    .filter(|command| command.result_kind() == kind);
                confirm_rung(record, &mut self.events, scene, rung, completed, indirect);
            }
            Verdict::Cascade => unwind_unpublished(record, &mut self.events, scene),
            Verdict::Settle => {
                debug!(
                    %scene,
                    ?kind,
                    ?outcome,
                    step = ?record.confirmed,
                    "in-flight scene command overtaken by an indirect change"
                );
                record.pending = None;
                record.failures = 0;
            }
        }
        self.reconcile(scene);
    }

    fn reconcile(&mut self, scene: SceneId) {
        let Self { sink, scenes, .. } = self;
        let Some(record) = scenes.get_mut(&scene) else {
            return;
        };
        if !record.is_idle() || record.parked {
            return;
        }
        if record.confirmed.is_mapped() && record.assignment_outdated() {
            assign_display_buffer(sink, record, scene);
        }
        if let Some(command) =
            ladder::next_command(record.confirmed, record.target_state, record.target_display)
        {
            debug!(%scene, ?command, target = %record.target_state, "issuing scene command");
            record.pending = Some(command);
            command.issue(scene, sink);
        }
    }
}

fn confirm_rung(
    record: &mut SceneRecord,
    events: &mut Vec<SceneControlEvent>,
    scene: SceneId,
    rung: Rung,
    completed: Option<PendingCommand>,
    indirect: bool,
) {
    // An indirect change of another kind leaves the in-flight command alone;
    // its own answer settles it later.
    if completed.is_some() {
        record.pending = None;
        record.failures = 0;
    }
    match (rung.from, rung.to) {
        (LadderStep::Subscribed, LadderStep::Mapped) => {
            let display = match completed {
                Some(PendingCommand::Map { display }) => Some(display),
                _ => record.target_display,
            };
            record.last_mapped = display.map(|display| MappingInfo {
                display,
                buffer: None,
                render_order: 0,
            });
        }
        (LadderStep::Mapped, LadderStep::Subscribed) => record.last_mapped = None,
        _ => {}
    }
    record.confirmed = rung.to;
    debug!(%scene, step = ?rung.to, indirect, "scene step confirmed");
    if let Some(event) = ladder::transition_event(scene, rung.from, rung.to, indirect) {
        events.push(event);
    }
}

fn unwind_unpublished(record: &mut SceneRecord, events: &mut Vec<SceneControlEvent>, scene: SceneId) {
    debug!(%scene, from = ?record.confirmed, pending = ?record.pending, "scene unpublished");
    let mut step = record.confirmed;
    while step > LadderStep::Subscribed {
        let lower = step.lower();
        if let Some(event) = ladder::transition_event(scene, step, lower, true) {
            events.push(event);
        }
        step = lower;
    }
    record.confirmed = LadderStep::Unpublished;
    record.pending = None;
    record.last_mapped = None;
    record.unpark();
}

fn assign_display_buffer<S: SceneCommandSink>(
    sink: &mut S,
    record: &mut SceneRecord,
    scene: SceneId,
) {
    let Some(mapped) = record.last_mapped else {
        return;
    };
    let (buffer, render_order) = (record.target_buffer, record.target_render_order);
    if sink.handle_scene_display_buffer_assignment_request(scene, buffer, render_order) {
        debug!(%scene, ?buffer, render_order, "display buffer assigned");
        record.last_mapped = Some(MappingInfo {
            buffer,
            render_order,
            ..mapped
        });
    } else {
        debug!(%scene, ?buffer, render_order, "display buffer assignment rejected");
    }
}
