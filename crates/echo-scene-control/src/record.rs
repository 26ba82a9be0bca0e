// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-scene bookkeeping owned by the lifecycle controller.

use echo_renderer_port::{BufferId, DisplayId, RendererSceneState};

use crate::ladder::{LadderStep, PendingCommand};

/// Mapping confirmed by the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MappingInfo {
    /// Display the scene is mapped on.
    pub display: DisplayId,
    /// Display buffer, `None` for the framebuffer.
    pub buffer: Option<BufferId>,
    /// Render order within the buffer.
    pub render_order: i32,
}

/// Desired and confirmed state of one scene.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SceneRecord {
    /// Acknowledged ladder step.
    pub confirmed: LadderStep,
    /// Last requested state.
    pub target_state: RendererSceneState,
    /// Command in flight, at most one.
    pub pending: Option<PendingCommand>,
    /// Display used by the next map command.
    pub target_display: Option<DisplayId>,
    /// Display buffer to assign once mapped.
    pub target_buffer: Option<BufferId>,
    /// Render order to assign once mapped.
    pub target_render_order: i32,
    /// Mapping as last confirmed; `None` unless mapped.
    pub last_mapped: Option<MappingInfo>,
    /// Consecutive failures of the in-flight command.
    pub failures: u32,
    /// Retries exhausted; no commands until the target changes.
    pub parked: bool,
}

impl SceneRecord {
    /// Whether no command is in flight.
    pub const fn is_idle(&self) -> bool {
        self.pending.is_none()
    }

    /// Whether the buffer assignment differs from what is confirmed.
    pub fn assignment_outdated(&self) -> bool {
        self.last_mapped.is_some_and(|mapped| {
            mapped.buffer != self.target_buffer || mapped.render_order != self.target_render_order
        })
    }

    pub(crate) fn unpark(&mut self) {
        self.parked = false;
        self.failures = 0;
    }
}

/// Snapshot returned by `SceneLifecycleController::scene_info`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SceneInfo {
    /// Confirmed external state.
    pub state: RendererSceneState,
    /// Last requested state.
    pub target_state: RendererSceneState,
    /// Requested display.
    pub display: Option<DisplayId>,
    /// Requested display buffer, `None` for the framebuffer.
    pub buffer: Option<BufferId>,
    /// Requested render order.
    pub render_order: i32,
}

impl From<&SceneRecord> for SceneInfo {
    fn from(record: &SceneRecord) -> Self {
        Self {
            state: record.confirmed.external_state(),
            target_state: record.target_state,
            display: record.target_display,
            buffer: record.target_buffer,
            render_order: record.target_render_order,
        }
    }
}
