// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-cycle driver tying the controller, reference logic and collaborators.

use echo_renderer_port::{
    RendererEvent, SceneCommandSink, SceneGraphSource, SceneReferenceEventSender, SceneResult,
};

use crate::controller::SceneLifecycleController;
use crate::reference::SceneReferenceLogic;

/// One renderer's scene control, driven once per frame/update cycle.
///
/// Renderer acknowledgments go to [`handle_result`](Self::handle_result) as
/// they arrive; [`run_cycle`](Self::run_cycle) then runs the reference
/// logic and returns the cycle's outward event stream.
#[derive(Debug)]
pub struct SceneControlLoop<S, G, E> {
    controller: SceneLifecycleController<S>,
    references: SceneReferenceLogic,
    graph: G,
    sender: E,
}

impl<S, G, E> SceneControlLoop<S, G, E>
where
    S: SceneCommandSink,
    G: SceneGraphSource,
    E: SceneReferenceEventSender,
{
    /// Assemble a loop around an existing controller.
    pub fn new(controller: SceneLifecycleController<S>, graph: G, sender: E) -> Self {
        Self {
            controller,
            references: SceneReferenceLogic::new(),
            graph,
            sender,
        }
    }

    /// The lifecycle controller; desired states are set through it.
    pub fn controller(&self) -> &SceneLifecycleController<S> {
        &self.controller
    }

    /// The lifecycle controller, mutably.
    pub fn controller_mut(&mut self) -> &mut SceneLifecycleController<S> {
        &mut self.controller
    }

    /// Reference bookkeeping.
    pub fn references(&self) -> &SceneReferenceLogic {
        &self.references
    }

    /// The scene-graph collaborator.
    pub fn graph(&self) -> &G {
        &self.graph
    }

    /// The scene-graph collaborator, mutably.
    pub fn graph_mut(&mut self) -> &mut G {
        &mut self.graph
    }

    /// The outward event sender.
    pub fn sender(&self) -> &E {
        &self.sender
    }

    /// The outward event sender, mutably.
    pub fn sender_mut(&mut self) -> &mut E {
        &mut self.sender
    }

    /// Forward one renderer acknowledgment to the controller.
    pub fn handle_result(&mut self, result: SceneResult) {
        self.controller.handle_result(result);
    }

    /// Run one cycle.
    ///
    /// Controller events come first in the returned stream, converted to
    /// [`RendererEvent`]s, followed by `renderer_events`; events about
    /// referenced scenes are routed to their masters before returning.
    pub fn run_cycle<I>(&mut self, renderer_events: I) -> Vec<RendererEvent>
    where
        I: IntoIterator<Item = RendererEvent>,
    {
        self.references.update(&mut self.controller, &mut self.graph);
        let mut events: Vec<RendererEvent> = self
            .controller
            .consume_events()
            .into_iter()
            .map(RendererEvent::from)
            .collect();
        events.extend(renderer_events);
        self.references
            .extract_and_send_scene_reference_events(&mut events, &mut self.sender);
        events
    }

    /// Split the loop back into its parts.
    pub fn into_parts(self) -> (SceneLifecycleController<S>, SceneReferenceLogic, G, E) {
        (self.controller, self.references, self.graph, self.sender)
    }
}
