// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scene-control configuration (serde-friendly, stored via `ConfigService`).

use echo_app_core::config::ConfigSection;
use serde::{Deserialize, Serialize};

/// Config key the scene-control settings are stored under.
pub const SCENE_CONTROL_CONFIG_KEY: &str = "scene-control";

/// How failed lifecycle commands are retried.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RetryPolicy {
    /// Re-issue immediately after every failure, forever.
    #[default]
    Unbounded,
    /// Re-issue up to `max_retries` times in a row, then park the scene until
    /// its target state or mapping changes.
    Limited {
        /// Consecutive retries allowed for the same command.
        max_retries: u32,
    },
}

impl RetryPolicy {
    /// Whether the `failures`-th consecutive failure may still be retried.
    pub const fn allows(self, failures: u32) -> bool {
        match self {
            Self::Unbounded => true,
            Self::Limited { max_retries } => failures <= max_retries,
        }
    }
}

/// Scene-control settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneControlConfig {
    /// Retry behavior for failed lifecycle commands.
    #[serde(default)]
    pub retry: RetryPolicy,
}

impl ConfigSection for SceneControlConfig {
    const KEY: &'static str = SCENE_CONTROL_CONFIG_KEY;
}
