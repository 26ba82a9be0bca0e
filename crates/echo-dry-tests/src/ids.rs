// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Short id constructors for tests.

use echo_renderer_port::{BufferId, DataSlotId, DisplayId, SceneId, SceneReferenceHandle};

/// Scene id `n`.
pub const fn scene(n: u64) -> SceneId {
    SceneId(n)
}

/// Display id `n`.
pub const fn display(n: u32) -> DisplayId {
    DisplayId(n)
}

/// Buffer id `n`.
pub const fn buffer(n: u32) -> BufferId {
    BufferId(n)
}

/// Data slot id `n`.
pub const fn slot(n: u32) -> DataSlotId {
    DataSlotId(n)
}

/// Reference handle `n`.
pub const fn handle(n: u32) -> SceneReferenceHandle {
    SceneReferenceHandle(n)
}
