// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! In-process scene graph: reference tables filled by the master-scene side.

use std::collections::BTreeMap;

use echo_renderer_port::{
    RendererSceneState, SceneGraphSource, SceneId, SceneReferenceAction, SceneReferenceDecl,
    SceneReferenceHandle,
};

use crate::reference::ReferenceError;

#[derive(Debug, Default)]
struct MasterEntry {
    references: BTreeMap<SceneReferenceHandle, SceneReferenceDecl>,
    actions: Vec<SceneReferenceAction>,
}

/// [`SceneGraphSource`] backed by plain per-master tables.
///
/// The master-scene side declares references and queues link actions here;
/// the reference logic polls it once per cycle.
#[derive(Debug, Default)]
pub struct SceneReferenceTable {
    masters: BTreeMap<SceneId, MasterEntry>,
    destroyed: Vec<SceneId>,
}

impl SceneReferenceTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare (or re-target) `handle` in `master` as a reference to
    /// `referenced`, requesting `Unavailable` with no render order offset.
    pub fn declare_reference(
        &mut self,
        master: SceneId,
        handle: SceneReferenceHandle,
        referenced: SceneId,
    ) {
        self.masters
            .entry(master)
            .or_default()
            .references
            .insert(handle, SceneReferenceDecl::new(handle, referenced));
    }

    /// Request `state` for the scene behind `handle`.
    pub fn request_reference_state(
        &mut self,
        master: SceneId,
        handle: SceneReferenceHandle,
        state: RendererSceneState,
    ) -> Result<(), ReferenceError> {
        self.decl_mut(master, handle)?.requested_state = state;
        Ok(())
    }

    /// Set the render order of `handle` relative to its master.
    pub fn set_reference_render_order(
        &mut self,
        master: SceneId,
        handle: SceneReferenceHandle,
        offset: i32,
    ) -> Result<(), ReferenceError> {
        self.decl_mut(master, handle)?.render_order_offset = offset;
        Ok(())
    }

    /// Remove `handle` from `master`; returns the removed declaration.
    pub fn remove_reference(
        &mut self,
        master: SceneId,
        handle: SceneReferenceHandle,
    ) -> Option<SceneReferenceDecl> {
        self.masters
            .get_mut(&master)
            .and_then(|entry| entry.references.remove(&handle))
    }

    /// Queue a link action for the next cycle.
    pub fn queue_action(&mut self, master: SceneId, action: SceneReferenceAction) {
        self.masters.entry(master).or_default().actions.push(action);
    }

    /// Forget `master` and report it destroyed. Queued actions are discarded.
    pub fn destroy_master(&mut self, master: SceneId) {
        self.masters.remove(&master);
        self.destroyed.push(master);
    }

    /// Current declaration of `handle` in `master`.
    pub fn reference(
        &self,
        master: SceneId,
        handle: SceneReferenceHandle,
    ) -> Option<&SceneReferenceDecl> {
        self.masters
            .get(&master)
            .and_then(|entry| entry.references.get(&handle))
    }

    fn decl_mut(
        &mut self,
        master: SceneId,
        handle: SceneReferenceHandle,
    ) -> Result<&mut SceneReferenceDecl, ReferenceError> {
        self.masters
            .get_mut(&master)
            .and_then(|entry| entry.references.get_mut(&handle))
            .ok_or(ReferenceError::UnknownHandle { master, handle })
    }
}

impl SceneGraphSource for SceneReferenceTable {
    fn master_scenes(&self) -> Vec<SceneId> {
        self.masters.keys().copied().collect()
    }

    fn scene_references(&self, master: SceneId) -> Vec<SceneReferenceDecl> {
        self.masters
            .get(&master)
            .map(|entry| entry.references.values().copied().collect())
            .unwrap_or_default()
    }

    fn take_reference_actions(&mut self, master: SceneId) -> Vec<SceneReferenceAction> {
        self.masters
            .get_mut(&master)
            .map(|entry| std::mem::take(&mut entry.actions))
            .unwrap_or_default()
    }

    fn take_destroyed_masters(&mut self) -> Vec<SceneId> {
        std::mem::take(&mut self.destroyed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const MASTER: SceneId = SceneId(1);
    const HANDLE: SceneReferenceHandle = SceneReferenceHandle(7);

    #[test]
    fn declared_references_are_listed_per_master() {
        let mut table = SceneReferenceTable::new();
        table.declare_reference(MASTER, HANDLE, SceneId(10));
        table
            .request_reference_state(MASTER, HANDLE, RendererSceneState::Rendered)
            .unwrap();
        table.set_reference_render_order(MASTER, HANDLE, 3).unwrap();

        assert_eq!(table.master_scenes(), vec![MASTER]);
        assert_eq!(
            table.scene_references(MASTER),
            vec![SceneReferenceDecl {
                handle: HANDLE,
                referenced: SceneId(10),
                requested_state: RendererSceneState::Rendered,
                render_order_offset: 3,
            }]
        );
        assert!(table.scene_references(SceneId(99)).is_empty());
    }

    #[test]
    fn unknown_handles_are_reported() {
        let mut table = SceneReferenceTable::new();
        assert_eq!(
            table.request_reference_state(MASTER, HANDLE, RendererSceneState::Ready),
            Err(ReferenceError::UnknownHandle {
                master: MASTER,
                handle: HANDLE
            })
        );
    }

    #[test]
    fn destroyed_masters_are_drained_once() {
        let mut table = SceneReferenceTable::new();
        table.declare_reference(MASTER, HANDLE, SceneId(10));
        table.destroy_master(MASTER);
        assert!(table.master_scenes().is_empty());
        assert_eq!(table.take_destroyed_masters(), vec![MASTER]);
        assert!(table.take_destroyed_masters().is_empty());
    }
}
