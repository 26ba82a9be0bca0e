// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-scene lifecycle ladder: confirmed steps, commands and pure transitions.
//!
//! The ladder is finer-grained than [`RendererSceneState`]:
//!
//! ```text
//! Unpublished < Published < Subscribed < Mapped < Shown
//! └── Unavailable ──────┘   Available    Ready    Rendered
//! ```
//!
//! Everything here is a pure function of `(confirmed, pending, target)`; the
//! controller owns the records and performs the side effects.

use echo_renderer_port::{
    DisplayId, RendererSceneState, ResultOutcome, SceneCommandSink, SceneId, SceneResultKind,
};

use crate::event::SceneControlEvent;

/// Confirmed position of a scene on the lifecycle ladder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum LadderStep {
    /// Not published (or unpublished again).
    #[default]
    Unpublished = 0,
    /// Published, not subscribed.
    Published = 1,
    /// Subscribed.
    Subscribed = 2,
    /// Mapped to a display.
    Mapped = 3,
    /// Shown.
    Shown = 4,
}

impl LadderStep {
    /// The renderer-visible state this step reports as.
    pub const fn external_state(self) -> RendererSceneState {
        match self {
            Self::Unpublished | Self::Published => RendererSceneState::Unavailable,
            Self::Subscribed => RendererSceneState::Available,
            Self::Mapped => RendererSceneState::Ready,
            Self::Shown => RendererSceneState::Rendered,
        }
    }

    /// Whether the scene is currently published.
    pub const fn is_published(self) -> bool {
        !matches!(self, Self::Unpublished)
    }

    /// Whether the scene currently holds a display mapping.
    pub const fn is_mapped(self) -> bool {
        matches!(self, Self::Mapped | Self::Shown)
    }

    /// One rung down, saturating at `Unpublished`.
    pub const fn lower(self) -> Self {
        match self {
            Self::Unpublished | Self::Published => Self::Unpublished,
            Self::Subscribed => Self::Published,
            Self::Mapped => Self::Subscribed,
            Self::Shown => Self::Mapped,
        }
    }
}

/// The single command a scene may have in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PendingCommand {
    /// Subscription request.
    Subscribe,
    /// Unsubscription request.
    Unsubscribe,
    /// Mapping request to the recorded display.
    Map {
        /// Display the request was issued for; a retry reuses it.
        display: DisplayId,
    },
    /// Unmapping request.
    Unmap,
    /// Show request.
    Show,
    /// Hide request.
    Hide,
}

impl PendingCommand {
    /// Result kind that acknowledges this command.
    pub const fn result_kind(self) -> SceneResultKind {
        match self {
            Self::Subscribe => SceneResultKind::Subscribed,
            Self::Unsubscribe => SceneResultKind::Unsubscribed,
            Self::Map { .. } => SceneResultKind::Mapped,
            Self::Unmap => SceneResultKind::Unmapped,
            Self::Show => SceneResultKind::Shown,
            Self::Hide => SceneResultKind::Hidden,
        }
    }

    /// Send the command for `scene` to the sink.
    pub fn issue<S: SceneCommandSink + ?Sized>(self, scene: SceneId, sink: &mut S) {
        match self {
            Self::Subscribe => sink.handle_scene_subscription_request(scene),
            Self::Unsubscribe => sink.handle_scene_unsubscription_request(scene, false),
            Self::Map { display } => sink.handle_scene_mapping_request(scene, display),
            Self::Unmap => sink.handle_scene_unmapping_request(scene),
            Self::Show => sink.handle_scene_show_request(scene),
            Self::Hide => sink.handle_scene_hide_request(scene),
        }
    }
}

/// A single ladder transition confirmed by a result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rung {
    /// Step the transition starts from.
    pub from: LadderStep,
    /// Step the transition ends on.
    pub to: LadderStep,
}

/// The rung a result kind confirms. `Unpublished` has none: it cascades.
pub const fn rung(kind: SceneResultKind) -> Option<Rung> {
    let (from, to) = match kind {
        SceneResultKind::Published => (LadderStep::Unpublished, LadderStep::Published),
        SceneResultKind::Subscribed => (LadderStep::Published, LadderStep::Subscribed),
        SceneResultKind::Unsubscribed => (LadderStep::Subscribed, LadderStep::Published),
        SceneResultKind::Mapped => (LadderStep::Subscribed, LadderStep::Mapped),
        SceneResultKind::Unmapped => (LadderStep::Mapped, LadderStep::Subscribed),
        SceneResultKind::Shown => (LadderStep::Mapped, LadderStep::Shown),
        SceneResultKind::Hidden => (LadderStep::Shown, LadderStep::Mapped),
        SceneResultKind::Unpublished => return None,
    };
    Some(Rung { from, to })
}

/// What to do with an incoming result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// The result does not match the record; absorb it without effect.
    Stale,
    /// The in-flight command failed; send it again.
    Retry,
    /// Move along the rung.
    Advance {
        /// Confirmed transition.
        rung: Rung,
        /// Whether the change was renderer-initiated.
        indirect: bool,
    },
    /// The scene was unpublished; unwind everything.
    Cascade,
    /// Answer to the in-flight command after an indirect change moved the
    /// ladder away from the step it was issued against. Clears the command
    /// without moving the ladder.
    Settle,
}

/// Judge a result against the record it is meant to confirm.
///
/// `Ok` and `Failed` only count when the matching command is in flight and the
/// ladder still sits on the rung's source step. `Indirect` only needs the
/// source step: the renderer moved on its own. It completes the in-flight
/// command only when it is of the awaited kind; any other command stays in
/// flight until its own answer arrives, which then settles it.
pub fn judge(
    confirmed: LadderStep,
    pending: Option<PendingCommand>,
    kind: SceneResultKind,
    outcome: ResultOutcome,
) -> Verdict {
    if kind == SceneResultKind::Unpublished {
        return if confirmed.is_published() && outcome != ResultOutcome::Failed {
            Verdict::Cascade
        } else {
            Verdict::Stale
        };
    }
    let Some(rung) = rung(kind) else {
        return Verdict::Stale;
    };
    let awaited = pending.map(PendingCommand::result_kind) == Some(kind);
    if confirmed != rung.from {
        return if awaited {
            Verdict::Settle
        } else {
            Verdict::Stale
        };
    }
    if kind == SceneResultKind::Published {
        // Publication is spontaneous; there is never a command to match.
        return match outcome {
            ResultOutcome::Failed => Verdict::Stale,
            ResultOutcome::Ok | ResultOutcome::Indirect => Verdict::Advance {
                rung,
                indirect: false,
            },
        };
    }
    match outcome {
        ResultOutcome::Ok if awaited => Verdict::Advance {
            rung,
            indirect: false,
        },
        ResultOutcome::Failed if awaited => Verdict::Retry,
        ResultOutcome::Indirect => Verdict::Advance {
            rung,
            indirect: true,
        },
        ResultOutcome::Ok | ResultOutcome::Failed => Verdict::Stale,
    }
}

/// Next single command moving `confirmed` toward `target`, if any.
///
/// Mapping needs a display; without one the scene waits at `Subscribed`.
/// A mapped scene whose target display changed is not remapped.
pub fn next_command(
    confirmed: LadderStep,
    target: RendererSceneState,
    display: Option<DisplayId>,
) -> Option<PendingCommand> {
    if confirmed.external_state() == target {
        return None;
    }
    match confirmed {
        LadderStep::Unpublished => None,
        LadderStep::Published => Some(PendingCommand::Subscribe),
        LadderStep::Subscribed if target == RendererSceneState::Unavailable => {
            Some(PendingCommand::Unsubscribe)
        }
        LadderStep::Subscribed => display.map(|display| PendingCommand::Map { display }),
        LadderStep::Mapped if target == RendererSceneState::Rendered => Some(PendingCommand::Show),
        LadderStep::Mapped => Some(PendingCommand::Unmap),
        LadderStep::Shown => Some(PendingCommand::Hide),
    }
}

/// Event emitted for a confirmed transition, if it is visible from outside.
pub fn transition_event(
    scene: SceneId,
    from: LadderStep,
    to: LadderStep,
    indirect: bool,
) -> Option<SceneControlEvent> {
    if from == LadderStep::Unpublished && to == LadderStep::Published {
        return Some(SceneControlEvent::published(scene));
    }
    let state = to.external_state();
    if from.external_state() == state {
        return None;
    }
    Some(SceneControlEvent::state_changed(scene, state).with_indirect(indirect))
}

#[cfg(test)]
mod tests {
    use super::*;
    use RendererSceneState::{Available, Ready, Rendered, Unavailable};

    const DISPLAY: Option<DisplayId> = Some(DisplayId(1));

    #[test]
    fn steps_report_external_states() {
        assert_eq!(LadderStep::Unpublished.external_state(), Unavailable);
        assert_eq!(LadderStep::Published.external_state(), Unavailable);
        assert_eq!(LadderStep::Subscribed.external_state(), Available);
        assert_eq!(LadderStep::Mapped.external_state(), Ready);
        assert_eq!(LadderStep::Shown.external_state(), Rendered);
    }

    #[test]
    fn next_command_climbs_one_rung_at_a_time() {
        assert_eq!(
            next_command(LadderStep::Published, Rendered, DISPLAY),
            Some(PendingCommand::Subscribe)
        );
        assert_eq!(
            next_command(LadderStep::Subscribed, Rendered, DISPLAY),
            Some(PendingCommand::Map {
                display: DisplayId(1)
            })
        );
        assert_eq!(
            next_command(LadderStep::Mapped, Rendered, DISPLAY),
            Some(PendingCommand::Show)
        );
        assert_eq!(next_command(LadderStep::Shown, Rendered, DISPLAY), None);
    }

    #[test]
    fn next_command_descends_one_rung_at_a_time() {
        assert_eq!(
            next_command(LadderStep::Shown, Unavailable, DISPLAY),
            Some(PendingCommand::Hide)
        );
        assert_eq!(
            next_command(LadderStep::Mapped, Available, DISPLAY),
            Some(PendingCommand::Unmap)
        );
        assert_eq!(
            next_command(LadderStep::Subscribed, Unavailable, DISPLAY),
            Some(PendingCommand::Unsubscribe)
        );
        assert_eq!(next_command(LadderStep::Published, Unavailable, DISPLAY), None);
    }

    #[test]
    fn unpublished_scenes_never_get_commands() {
        for target in RendererSceneState::ALL {
            assert_eq!(next_command(LadderStep::Unpublished, target, DISPLAY), None);
        }
    }

    #[test]
    fn mapping_waits_for_a_display() {
        assert_eq!(next_command(LadderStep::Subscribed, Ready, None), None);
        // Going down never needs a display.
        assert_eq!(
            next_command(LadderStep::Subscribed, Unavailable, None),
            Some(PendingCommand::Unsubscribe)
        );
    }

    #[test]
    fn ok_result_needs_matching_pending_command() {
        let verdict = judge(
            LadderStep::Published,
            Some(PendingCommand::Subscribe),
            SceneResultKind::Subscribed,
            ResultOutcome::Ok,
        );
        assert!(matches!(verdict, Verdict::Advance { indirect: false, .. }));

        let stale = judge(
            LadderStep::Published,
            None,
            SceneResultKind::Subscribed,
            ResultOutcome::Ok,
        );
        assert_eq!(stale, Verdict::Stale);

        let wrong_command = judge(
            LadderStep::Subscribed,
            Some(PendingCommand::Unsubscribe),
            SceneResultKind::Mapped,
            ResultOutcome::Failed,
        );
        assert_eq!(wrong_command, Verdict::Stale);
    }

    #[test]
    fn failed_result_retries_only_the_awaited_command() {
        assert_eq!(
            judge(
                LadderStep::Subscribed,
                Some(PendingCommand::Map {
                    display: DisplayId(1)
                }),
                SceneResultKind::Mapped,
                ResultOutcome::Failed,
            ),
            Verdict::Retry
        );
    }

    #[test]
    fn indirect_result_ignores_pending_but_checks_source_step() {
        let verdict = judge(
            LadderStep::Mapped,
            Some(PendingCommand::Show),
            SceneResultKind::Unmapped,
            ResultOutcome::Indirect,
        );
        assert!(matches!(verdict, Verdict::Advance { indirect: true, .. }));

        let stale = judge(
            LadderStep::Subscribed,
            None,
            SceneResultKind::Unmapped,
            ResultOutcome::Indirect,
        );
        assert_eq!(stale, Verdict::Stale);
    }

    #[test]
    fn answer_to_an_overtaken_command_settles_it() {
        // Show went out at Mapped, then an indirect unmap moved the ladder down.
        for outcome in [ResultOutcome::Ok, ResultOutcome::Failed] {
            assert_eq!(
                judge(
                    LadderStep::Subscribed,
                    Some(PendingCommand::Show),
                    SceneResultKind::Shown,
                    outcome
                ),
                Verdict::Settle
            );
        }
        assert_eq!(
            judge(
                LadderStep::Subscribed,
                None,
                SceneResultKind::Shown,
                ResultOutcome::Ok
            ),
            Verdict::Stale
        );
    }

    #[test]
    fn publish_and_unpublish_are_spontaneous() {
        assert!(matches!(
            judge(
                LadderStep::Unpublished,
                None,
                SceneResultKind::Published,
                ResultOutcome::Ok
            ),
            Verdict::Advance { .. }
        ));
        assert_eq!(
            judge(
                LadderStep::Published,
                None,
                SceneResultKind::Published,
                ResultOutcome::Ok
            ),
            Verdict::Stale
        );
        assert_eq!(
            judge(
                LadderStep::Shown,
                Some(PendingCommand::Hide),
                SceneResultKind::Unpublished,
                ResultOutcome::Ok
            ),
            Verdict::Cascade
        );
        assert_eq!(
            judge(
                LadderStep::Unpublished,
                None,
                SceneResultKind::Unpublished,
                ResultOutcome::Ok
            ),
            Verdict::Stale
        );
    }

    #[test]
    fn events_only_on_external_boundaries() {
        let scene = SceneId(3);
        assert_eq!(
            transition_event(scene, LadderStep::Unpublished, LadderStep::Published, false),
            Some(SceneControlEvent::published(scene))
        );
        assert_eq!(
            transition_event(scene, LadderStep::Published, LadderStep::Subscribed, false),
            Some(SceneControlEvent::state_changed(scene, Available))
        );
        assert_eq!(
            transition_event(scene, LadderStep::Subscribed, LadderStep::Published, true),
            Some(SceneControlEvent::state_changed(scene, Unavailable).with_indirect(true))
        );
    }
}
