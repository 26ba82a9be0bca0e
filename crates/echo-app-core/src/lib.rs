// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared application services for Echo renderer tools.
//!
//! Currently the config service: typed settings sections persisted as JSON
//! through a pluggable [`config::ConfigStore`].

pub mod config;
