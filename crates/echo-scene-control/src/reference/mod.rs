// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scene references: master-driven constraints and event routing.
//!
//! A master scene embeds other scenes through reference handles. Every cycle
//! the reference tables are pulled from the [`SceneGraphSource`] and each
//! referenced scene is driven through the same [`SceneLifecycleController`]
//! as any other scene, with two constraints derived from its master:
//!
//! - its requested state never exceeds the master's confirmed state;
//! - it is mapped on the master's display and buffer, at the master's render
//!   order plus the reference's offset.
//!
//! Renderer events about referenced scenes are routed to the master by
//! [`SceneReferenceLogic::extract_and_send_scene_reference_events`].

mod extract;

use std::collections::{BTreeMap, BTreeSet};

use echo_renderer_port::{
    RendererSceneState, SceneCommandSink, SceneGraphSource, SceneId, SceneLinkEndpoint,
    SceneReferenceAction, SceneReferenceDecl, SceneReferenceHandle,
};
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::controller::SceneLifecycleController;
use crate::record::MappingInfo;

/// Why a reference declaration or link action was not applied.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceError {
    /// The scene is already referenced by another handle.
    #[error("{scene} is already referenced by master {owner}; {claimant} cannot claim it")]
    AlreadyOwned {
        /// Referenced scene.
        scene: SceneId,
        /// Master currently owning the reference.
        owner: SceneId,
        /// Master whose claim was rejected.
        claimant: SceneId,
    },
    /// A master declared a reference to itself.
    #[error("{master} cannot reference itself")]
    SelfReference {
        /// Offending master.
        master: SceneId,
    },
    /// A link endpoint names a handle missing from the master's table.
    #[error("{handle} is not a reference of {master}")]
    UnknownHandle {
        /// Master that queued the action.
        master: SceneId,
        /// Unresolved handle.
        handle: SceneReferenceHandle,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct ReferenceRecord {
    referenced: SceneId,
    requested_state: RendererSceneState,
    render_order_offset: i32,
    // Last values pushed to the controller.
    applied_state: Option<RendererSceneState>,
    applied_mapping: Option<MappingInfo>,
}

impl ReferenceRecord {
    const fn new(decl: &SceneReferenceDecl) -> Self {
        Self {
            referenced: decl.referenced,
            requested_state: decl.requested_state,
            render_order_offset: decl.render_order_offset,
            applied_state: None,
            applied_mapping: None,
        }
    }
}

/// A reference dropped by its master, kept until it winds down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ReleasedReference {
    master: SceneId,
    state: RendererSceneState,
    settled: bool,
}

/// Master/reference bookkeeping for one renderer.
///
/// Owns no scene state of its own: every state and mapping request goes
/// through the lifecycle controller passed to [`update`](Self::update).
#[derive(Debug, Default)]
pub struct SceneReferenceLogic {
    tables: BTreeMap<SceneId, BTreeMap<SceneReferenceHandle, ReferenceRecord>>,
    owners: BTreeMap<SceneId, SceneId>,
    released: BTreeMap<SceneId, ReleasedReference>,
    rejected: BTreeSet<(SceneId, SceneReferenceHandle)>,
}

impl SceneReferenceLogic {
    /// Empty bookkeeping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one cycle against the scene graph.
    ///
    /// Destroyed masters release their references to `Unavailable`; masters
    /// that no longer declare a reference release it to `Available`. Every
    /// remaining reference is capped by its master's confirmed state and
    /// follows the master's mapping. Queued link actions are executed last.
    pub fn update<S, G>(&mut self, controller: &mut SceneLifecycleController<S>, graph: &mut G)
    where
        S: SceneCommandSink,
        G: SceneGraphSource + ?Sized,
    {
        for master in graph.take_destroyed_masters() {
            debug!(%master, "master scene destroyed");
            self.release_master(controller, master, RendererSceneState::Unavailable);
        }

        let live = graph.master_scenes();
        let vanished: Vec<SceneId> = self
            .tables
            .keys()
            .copied()
            .filter(|master| !live.contains(master))
            .collect();
        for master in vanished {
            self.release_master(controller, master, RendererSceneState::Available);
        }

        for master in live {
            let declared = graph.scene_references(master);
            self.sync_table(controller, master, &declared);
            self.apply_constraints(controller, master);
            for action in graph.take_reference_actions(master) {
                if let Err(err) = self.execute_action(controller.sink_mut(), master, action) {
                    warn!(%err, ?action, "skipping scene reference action");
                }
            }
        }

        for (scene, released) in &mut self.released {
            if !released.settled && controller.scene_state(*scene) <= released.state {
                trace!(%scene, master = %released.master, "released reference settled");
                released.settled = true;
            }
        }
    }

    /// Master owning `scene`, including references still winding down.
    pub fn master_of(&self, scene: SceneId) -> Option<SceneId> {
        self.owners
            .get(&scene)
            .copied()
            .or_else(|| self.released.get(&scene).map(|released| released.master))
    }

    /// Whether `scene` is (or was until recently) a referenced scene.
    pub fn is_reference(&self, scene: SceneId) -> bool {
        self.master_of(scene).is_some()
    }

    /// Scene behind `handle` in `master`'s table.
    pub fn referenced_scene(
        &self,
        master: SceneId,
        handle: SceneReferenceHandle,
    ) -> Option<SceneId> {
        self.tables
            .get(&master)
            .and_then(|table| table.get(&handle))
            .map(|record| record.referenced)
    }

    /// Number of live references across all masters.
    pub fn reference_count(&self) -> usize {
        self.owners.len()
    }

    /// Translate a link endpoint named by `master` into a scene id.
    pub fn resolve(
        &self,
        master: SceneId,
        endpoint: SceneLinkEndpoint,
    ) -> Result<SceneId, ReferenceError> {
        match endpoint {
            SceneLinkEndpoint::Master => Ok(master),
            SceneLinkEndpoint::Reference(handle) => self
                .referenced_scene(master, handle)
                .ok_or(ReferenceError::UnknownHandle { master, handle }),
        }
    }

    /// Resolve and send one link action. Links bypass the lifecycle ladder.
    pub fn execute_action<S: SceneCommandSink + ?Sized>(
        &self,
        sink: &mut S,
        master: SceneId,
        action: SceneReferenceAction,
    ) -> Result<(), ReferenceError> {
        match action {
            SceneReferenceAction::LinkData {
                provider,
                provider_slot,
                consumer,
                consumer_slot,
            } => {
                let provider = self.resolve(master, provider)?;
                let consumer = self.resolve(master, consumer)?;
                debug!(%master, %provider, %consumer, "linking scene data");
                sink.handle_scene_data_link_request(provider, provider_slot, consumer, consumer_slot);
            }
            SceneReferenceAction::LinkBuffer {
                buffer,
                consumer,
                consumer_slot,
            } => {
                let consumer = self.resolve(master, consumer)?;
                debug!(%master, %buffer, %consumer, "linking buffer data");
                sink.handle_buffer_to_scene_data_link_request(buffer, consumer, consumer_slot);
            }
            SceneReferenceAction::Unlink {
                consumer,
                consumer_slot,
            } => {
                let consumer = self.resolve(master, consumer)?;
                debug!(%master, %consumer, "unlinking scene data");
                sink.handle_data_unlink_request(consumer, consumer_slot);
            }
        }
        Ok(())
    }

    fn sync_table<S: SceneCommandSink>(
        &mut self,
        controller: &mut SceneLifecycleController<S>,
        master: SceneId,
        declared: &[SceneReferenceDecl],
    ) {
        self.rejected.retain(|&(owner, handle)| {
            owner != master || declared.iter().any(|decl| decl.handle == handle)
        });

        let mut table = self.tables.remove(&master).unwrap_or_default();
        let dropped: Vec<(SceneReferenceHandle, SceneId)> = table
            .iter()
            .filter(|(handle, record)| {
                !declared
                    .iter()
                    .any(|decl| decl.handle == **handle && decl.referenced == record.referenced)
            })
            .map(|(handle, record)| (*handle, record.referenced))
            .collect();
        for (handle, scene) in dropped {
            table.remove(&handle);
            self.release(controller, master, scene, RendererSceneState::Available);
        }

        for decl in declared {
            if let Some(record) = table.get_mut(&decl.handle) {
                record.requested_state = decl.requested_state;
                record.render_order_offset = decl.render_order_offset;
                continue;
            }
            match self.claim(master, decl) {
                Ok(()) => {
                    self.rejected.remove(&(master, decl.handle));
                    table.insert(decl.handle, ReferenceRecord::new(decl));
                }
                Err(err) => {
                    if self.rejected.insert((master, decl.handle)) {
                        warn!(%err, handle = %decl.handle, "rejecting scene reference");
                    }
                }
            }
        }

        if !table.is_empty() {
            self.tables.insert(master, table);
        }
    }

    fn claim(&mut self, master: SceneId, decl: &SceneReferenceDecl) -> Result<(), ReferenceError> {
        let scene = decl.referenced;
        if scene == master {
            return Err(ReferenceError::SelfReference { master });
        }
        if let Some(&owner) = self.owners.get(&scene) {
            return Err(ReferenceError::AlreadyOwned {
                scene,
                owner,
                claimant: master,
            });
        }
        debug!(%master, %scene, handle = %decl.handle, "scene reference claimed");
        self.owners.insert(scene, master);
        self.released.remove(&scene);
        Ok(())
    }

    fn apply_constraints<S: SceneCommandSink>(
        &mut self,
        controller: &mut SceneLifecycleController<S>,
        master: SceneId,
    ) {
        let info = controller.scene_info(master);
        let Some(table) = self.tables.get_mut(&master) else {
            return;
        };
        for record in table.values_mut() {
            let scene = record.referenced;
            if let Some(display) = info.display {
                let mapping = MappingInfo {
                    display,
                    buffer: info.buffer,
                    render_order: info.render_order.saturating_add(record.render_order_offset),
                };
                if record.applied_mapping != Some(mapping) {
                    controller.set_scene_mapping(scene, display);
                    controller.set_scene_display_buffer_assignment(
                        scene,
                        mapping.buffer,
                        mapping.render_order,
                    );
                    record.applied_mapping = Some(mapping);
                }
            }
            let effective = record.requested_state.min(info.state);
            if record.applied_state != Some(effective) {
                debug!(
                    %master,
                    %scene,
                    requested = %record.requested_state,
                    %effective,
                    "updating referenced scene state"
                );
                controller.set_scene_state(scene, effective);
                record.applied_state = Some(effective);
            }
        }
    }

    fn release<S: SceneCommandSink>(
        &mut self,
        controller: &mut SceneLifecycleController<S>,
        master: SceneId,
        scene: SceneId,
        state: RendererSceneState,
    ) {
        debug!(%master, %scene, %state, "releasing scene reference");
        self.owners.remove(&scene);
        controller.set_scene_state(scene, state);
        self.released.insert(
            scene,
            ReleasedReference {
                master,
                state,
                settled: false,
            },
        );
    }

    fn release_master<S: SceneCommandSink>(
        &mut self,
        controller: &mut SceneLifecycleController<S>,
        master: SceneId,
        state: RendererSceneState,
    ) {
        self.rejected.retain(|&(owner, _)| owner != master);
        let Some(table) = self.tables.remove(&master) else {
            return;
        };
        for record in table.into_values() {
            self.release(controller, master, record.referenced, state);
        }
    }
}
