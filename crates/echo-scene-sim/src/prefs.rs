// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Simulator settings, stored under the `scene-sim` config key.

use echo_app_core::config::ConfigSection;
use echo_renderer_port::DisplayId;
use echo_scene_control::SceneControlConfig;
use serde::{Deserialize, Serialize};

/// Scenario shape and failure injection. Missing fields take defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimPrefs {
    /// Control cycles to run.
    pub cycles: u32,
    /// Master scenes.
    pub masters: u32,
    /// References declared by each master.
    pub references_per_master: u32,
    /// Fail every Nth lifecycle answer; 0 never fails.
    pub fail_every: u32,
    /// Unpublish and republish the first master a third of the way in.
    pub churn: bool,
    /// Display every master is mapped on.
    pub display: DisplayId,
    /// Settings handed to the lifecycle controller.
    pub control: SceneControlConfig,
}

impl Default for SimPrefs {
    fn default() -> Self {
        Self {
            cycles: 48,
            masters: 2,
            references_per_master: 2,
            fail_every: 0,
            churn: true,
            display: DisplayId(0),
            control: SceneControlConfig::default(),
        }
    }
}

impl ConfigSection for SimPrefs {
    const KEY: &'static str = "scene-sim";
}
