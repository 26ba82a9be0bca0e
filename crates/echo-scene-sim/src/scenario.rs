// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The simulated scenario: masters with references, churn and failures.

use echo_renderer_port::{
    DataSlotId, RendererSceneState, SceneId, SceneLinkEndpoint, SceneReferenceAction,
    SceneReferenceHandle,
};
use echo_scene_control::{
    CommandBuffer, EventOutbox, SceneControlLoop, SceneLifecycleController, SceneReferenceTable,
};
use tracing::{debug, info, warn};

use crate::prefs::SimPrefs;
use crate::renderer::SimRenderer;

type Control = SceneControlLoop<CommandBuffer, SceneReferenceTable, EventOutbox>;

/// Counters collected over one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimReport {
    /// Cycles executed.
    pub cycles: u32,
    /// Commands the renderer received.
    pub commands: usize,
    /// Failures injected by the renderer.
    pub failures_injected: u32,
    /// Events left in the outward stream.
    pub events_out: usize,
    /// Events routed to master scenes.
    pub reference_events: usize,
    /// Whether every scene ended on its target state.
    pub converged: bool,
}

fn master_id(index: u32) -> SceneId {
    SceneId(u64::from(index + 1) * 1_000)
}

fn reference_id(master: SceneId, index: u32) -> SceneId {
    SceneId(master.0 + u64::from(index) + 1)
}

/// Run the scenario described by `prefs` to completion.
pub fn run(prefs: &SimPrefs) -> SimReport {
    let commands = CommandBuffer::new();
    let outbox = EventOutbox::new();
    let controller = SceneLifecycleController::with_config(commands.clone(), prefs.control.clone());
    let mut control = SceneControlLoop::new(controller, SceneReferenceTable::new(), outbox.clone());
    let mut renderer = SimRenderer::new(prefs.fail_every);

    let masters: Vec<SceneId> = (0..prefs.masters).map(master_id).collect();
    for (index, &master) in masters.iter().enumerate() {
        declare_master(&mut control, &mut renderer, prefs, master, index);
    }

    let churn_at = (prefs.churn && !masters.is_empty()).then_some(prefs.cycles / 3);
    let mut report = SimReport::default();
    for cycle in 0..prefs.cycles {
        if let Some(first) = masters.first().copied() {
            if churn_at == Some(cycle) {
                info!(cycle, scene = %first, "unpublishing master");
                renderer.unpublish(first);
            } else if churn_at.map(|at| at + 1) == Some(cycle) {
                info!(cycle, scene = %first, "republishing master");
                renderer.publish(first);
            }
        }

        for command in commands.drain() {
            command.dispatch(&mut renderer);
            report.commands += 1;
        }
        for result in renderer.take_results() {
            control.handle_result(result);
        }
        let out = control.run_cycle(renderer.take_events());
        let routed = outbox.drain();
        debug!(cycle, emitted = out.len(), routed = routed.len(), "cycle complete");
        report.events_out += out.len();
        report.reference_events += routed.len();
        report.cycles += 1;
    }

    report.failures_injected = renderer.failures();
    report.converged = converged(&control, prefs, &masters);
    report
}

fn declare_master(
    control: &mut Control,
    renderer: &mut SimRenderer,
    prefs: &SimPrefs,
    master: SceneId,
    index: usize,
) {
    let render_order = i32::try_from(index).map_or(i32::MAX, |i| i.saturating_mul(10));
    let controller = control.controller_mut();
    controller.set_scene_mapping(master, prefs.display);
    controller.set_scene_display_buffer_assignment(master, None, render_order);
    controller.set_scene_state(master, RendererSceneState::Rendered);
    renderer.publish(master);

    let graph = control.graph_mut();
    for k in 0..prefs.references_per_master {
        let handle = SceneReferenceHandle(k);
        let scene = reference_id(master, k);
        graph.declare_reference(master, handle, scene);
        let offset = i32::try_from(k).map_or(i32::MAX, |k| k.saturating_add(1));
        let requested = graph
            .request_reference_state(master, handle, RendererSceneState::Rendered)
            .and_then(|()| graph.set_reference_render_order(master, handle, offset));
        if let Err(err) = requested {
            warn!(%err, "reference setup failed");
        }
        graph.queue_action(
            master,
            SceneReferenceAction::LinkData {
                provider: SceneLinkEndpoint::Master,
                provider_slot: DataSlotId(0),
                consumer: SceneLinkEndpoint::Reference(handle),
                consumer_slot: DataSlotId(k),
            },
        );
        renderer.publish(scene);
    }
}

fn converged(control: &Control, prefs: &SimPrefs, masters: &[SceneId]) -> bool {
    let controller = control.controller();
    masters.iter().all(|&master| {
        controller.scene_state(master) == RendererSceneState::Rendered
            && (0..prefs.references_per_master).all(|k| {
                controller.scene_state(reference_id(master, k)) == RendererSceneState::Rendered
            })
    })
}
