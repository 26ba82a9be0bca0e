// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Events produced by the lifecycle controller.

use echo_renderer_port::{RendererEvent, RendererSceneState, SceneId};

/// Kind of a [`SceneControlEvent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SceneControlEventKind {
    /// The scene appeared; its state is `Unavailable`.
    ScenePublished,
    /// The scene's confirmed state crossed an external boundary.
    SceneStateChanged,
}

/// Confirmed, externally visible change of one scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneControlEvent {
    /// What happened.
    pub kind: SceneControlEventKind,
    /// Subject scene.
    pub scene: SceneId,
    /// Confirmed state after the change.
    pub state: RendererSceneState,
    /// Set when the change was not caused by a command of ours
    /// (cascading unpublish or renderer-initiated unwinding).
    pub indirect: bool,
}

impl SceneControlEvent {
    /// Publication event.
    pub const fn published(scene: SceneId) -> Self {
        Self {
            kind: SceneControlEventKind::ScenePublished,
            scene,
            state: RendererSceneState::Unavailable,
            indirect: false,
        }
    }

    /// State change confirmed by a command result.
    pub const fn state_changed(scene: SceneId, state: RendererSceneState) -> Self {
        Self {
            kind: SceneControlEventKind::SceneStateChanged,
            scene,
            state,
            indirect: false,
        }
    }

    /// Same event with the indirect tag set as given.
    pub const fn with_indirect(mut self, indirect: bool) -> Self {
        self.indirect = indirect;
        self
    }
}

impl From<SceneControlEvent> for RendererEvent {
    fn from(event: SceneControlEvent) -> Self {
        match event.kind {
            SceneControlEventKind::ScenePublished => Self::ScenePublished { scene: event.scene },
            SceneControlEventKind::SceneStateChanged => Self::SceneStateChanged {
                scene: event.scene,
                state: event.state,
            },
        }
    }
}
