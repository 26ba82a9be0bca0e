// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Headless scene-control simulator.
//! Drives the lifecycle controller and scene references against a simulated
//! renderer that fails on a fixed cadence, then reports whether every scene
//! reached its target.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use echo_app_core::config::ConfigService;
use echo_config_fs::FsConfigStore;
use echo_scene_control::RetryPolicy;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod prefs;
mod renderer;
mod scenario;

use prefs::SimPrefs;

#[derive(Parser, Debug)]
#[command(author, version, about = "Echo renderer scene-control simulator")]
struct Args {
    /// Directory holding scene-sim.json (defaults to the platform config dir)
    #[arg(long)]
    config_dir: Option<PathBuf>,
    /// Control cycles to run
    #[arg(long)]
    cycles: Option<u32>,
    /// Master scenes to create
    #[arg(long)]
    masters: Option<u32>,
    /// References declared by each master
    #[arg(long)]
    references: Option<u32>,
    /// Fail every Nth lifecycle answer (0 disables failures)
    #[arg(long)]
    fail_every: Option<u32>,
    /// Park a scene after this many consecutive retries (default: retry forever)
    #[arg(long)]
    max_retries: Option<u32>,
    /// Skip the mid-run unpublish/republish of the first master
    #[arg(long)]
    no_churn: bool,
    /// Persist the effective settings to the config store
    #[arg(long)]
    save: bool,
}

impl Args {
    fn apply(&self, prefs: &mut SimPrefs) {
        if let Some(cycles) = self.cycles {
            prefs.cycles = cycles;
        }
        if let Some(masters) = self.masters {
            prefs.masters = masters;
        }
        if let Some(references) = self.references {
            prefs.references_per_master = references;
        }
        if let Some(fail_every) = self.fail_every {
            prefs.fail_every = fail_every;
        }
        if let Some(max_retries) = self.max_retries {
            prefs.control.retry = RetryPolicy::Limited { max_retries };
        }
        if self.no_churn {
            prefs.churn = false;
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let store = match &args.config_dir {
        Some(dir) => FsConfigStore::with_base(dir),
        None => FsConfigStore::new(),
    }
    .context("open config store")?;
    let service = ConfigService::new(store);
    let mut prefs: SimPrefs = service
        .load_section()
        .context("load simulator settings")?;
    args.apply(&mut prefs);

    if args.save {
        service
            .save_section(&prefs)
            .context("save simulator settings")?;
        info!(dir = %service.store().base().display(), "settings saved");
    }

    info!(?prefs, "starting simulation");
    let report = scenario::run(&prefs);
    info!(
        cycles = report.cycles,
        commands = report.commands,
        failures = report.failures_injected,
        events = report.events_out,
        routed = report.reference_events,
        converged = report.converged,
        "simulation finished"
    );
    if !report.converged {
        warn!("some scenes did not reach their target; raise --cycles or lower the failure rate");
    }
    Ok(())
}
