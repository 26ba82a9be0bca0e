// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Externally visible scene state and command outcomes.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Renderer-visible lifecycle state of a scene.
///
/// The order is total and meaningful: a scene at `Rendered` has passed through
/// every lower state, and a reference is never allowed above its master.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum RendererSceneState {
    /// Scene is unknown to the renderer or not subscribed.
    #[default]
    Unavailable = 0,
    /// Scene content is subscribed and received by the renderer.
    Available = 1,
    /// Scene is mapped to a display and its resources are uploaded.
    Ready = 2,
    /// Scene is shown on its display.
    Rendered = 3,
}

impl RendererSceneState {
    /// All states in ascending order.
    pub const ALL: [Self; 4] = [
        Self::Unavailable,
        Self::Available,
        Self::Ready,
        Self::Rendered,
    ];

    /// Lower-case name used in logs, config files and CLI flags.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unavailable => "unavailable",
            Self::Available => "available",
            Self::Ready => "ready",
            Self::Rendered => "rendered",
        }
    }
}

impl fmt::Display for RendererSceneState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a [`RendererSceneState`] from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown renderer scene state `{0}` (expected unavailable, available, ready or rendered)")]
pub struct ParseStateError(pub String);

impl FromStr for RendererSceneState {
    type Err = ParseStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseStateError(s.to_owned()))
    }
}

/// Outcome attached to every command acknowledgment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResultOutcome {
    /// The command was executed.
    Ok,
    /// The command was rejected; the state did not change.
    Failed,
    /// The state changed without a matching request (e.g. the renderer
    /// unwound a scene on its own, or a cascading unpublish).
    Indirect,
}
