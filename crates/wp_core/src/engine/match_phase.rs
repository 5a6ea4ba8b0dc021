//! Match Phase Controller
//!
//! Single writer of the match phase. Other components read `current()` and ask
//! for a change with `request()`; they never hold their own copy of the phase.
//!
//! Only one rule is enforced: once the match reaches `Postgame` the next phase
//! must be `Pregame`. Everything else, including entry into `Paused`,
//! `Timeout` and `Postgame`, is allowed.

use serde::{Deserialize, Serialize};

use super::event_bus::Publisher;
use crate::error::PhaseTransitionError;
use crate::models::MatchNotification;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchPhase {
    Pregame,
    Playing,
    FoulCalled,
    FreeThrow,
    Penalty,
    ExclusionSetup,
    GoalScored,
    QuarterEnd,
    Timeout,
    Paused,
    Postgame,
}

impl MatchPhase {
    pub const ALL: [MatchPhase; 11] = [
        MatchPhase::Pregame,
        MatchPhase::Playing,
        MatchPhase::FoulCalled,
        MatchPhase::FreeThrow,
        MatchPhase::Penalty,
        MatchPhase::ExclusionSetup,
        MatchPhase::GoalScored,
        MatchPhase::QuarterEnd,
        MatchPhase::Timeout,
        MatchPhase::Paused,
        MatchPhase::Postgame,
    ];

    /// Phases the referee owns between a whistle and the restart.
    pub fn is_foul_phase(self) -> bool {
        matches!(
            self,
            MatchPhase::FoulCalled
                | MatchPhase::FreeThrow
                | MatchPhase::Penalty
                | MatchPhase::ExclusionSetup
        )
    }

    pub fn is_live(self) -> bool {
        self == MatchPhase::Playing
    }

    /// Phases in which a goal may be registered.
    pub fn accepts_goal(self) -> bool {
        matches!(self, MatchPhase::Playing | MatchPhase::Penalty)
    }
}

/// Whether `from -> to` is allowed.
pub fn is_valid_transition(from: MatchPhase, to: MatchPhase) -> bool {
    match from {
        MatchPhase::Postgame => matches!(to, MatchPhase::Pregame | MatchPhase::Postgame),
        _ => true,
    }
}

pub struct MatchPhaseController {
    current: MatchPhase,
    paused_from: Option<MatchPhase>,
    history: Vec<(f32, MatchPhase, MatchPhase)>,
    publisher: Publisher<MatchNotification>,
}

impl MatchPhaseController {
    pub fn new(publisher: Publisher<MatchNotification>) -> Self {
        Self {
            current: MatchPhase::Pregame,
            paused_from: None,
            history: Vec::new(),
            publisher,
        }
    }

    pub fn current(&self) -> MatchPhase {
        self.current
    }

    /// Transitions applied so far as `(match_secs, from, to)`.
    pub fn history(&self) -> &[(f32, MatchPhase, MatchPhase)] {
        &self.history
    }

    pub fn is_paused(&self) -> bool {
        self.current == MatchPhase::Paused
    }

    /// Ask for a phase change. A request for the current phase is a no-op.
    /// On rejection the phase is unchanged and a `TransitionRejected`
    /// notification goes out.
    pub fn request(&mut self, to: MatchPhase, at_secs: f32) -> Result<(), PhaseTransitionError> {
        let from = self.current;
        if from == to {
            return Ok(());
        }
        if !is_valid_transition(from, to) {
            log::warn!("Rejected phase transition {:?} -> {:?}", from, to);
            self.publisher.publish(MatchNotification::TransitionRejected { from, requested: to });
            return Err(PhaseTransitionError::LockedAfterPostgame { requested: to });
        }

        self.current = to;
        if to == MatchPhase::Pregame {
            self.paused_from = None;
        }
        self.history.push((at_secs, from, to));
        log::info!("Phase {:?} -> {:?} at {:.1}s", from, to, at_secs);
        self.publisher.publish(MatchNotification::PhaseChanged { from, to });
        Ok(())
    }

    /// Enter `Paused`, remembering the phase to come back to.
    pub fn pause(&mut self, at_secs: f32) -> Result<(), PhaseTransitionError> {
        if self.current == MatchPhase::Paused {
            return Ok(());
        }
        let before = self.current;
        self.request(MatchPhase::Paused, at_secs)?;
        self.paused_from = Some(before);
        Ok(())
    }

    /// Leave `Paused` for the phase that was active when `pause` was called.
    pub fn resume(&mut self, at_secs: f32) -> Result<MatchPhase, PhaseTransitionError> {
        if self.current != MatchPhase::Paused {
            return Err(PhaseTransitionError::NotPaused);
        }
        let back_to = self.paused_from.take().unwrap_or(MatchPhase::Playing);
        self.request(back_to, at_secs)?;
        Ok(back_to)
    }

    /// Back to `Pregame` with an empty history.
    pub fn reset(&mut self) {
        self.current = MatchPhase::Pregame;
        self.paused_from = None;
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::event_bus::EventBus;

    fn controller() -> (MatchPhaseController, crate::engine::event_bus::Subscription<MatchNotification>) {
        let bus = EventBus::new();
        let sub = bus.subscribe();
        (MatchPhaseController::new(bus.publisher()), sub)
    }

    #[test]
    fn test_starts_in_pregame() {
        let (c, _) = controller();
        assert_eq!(c.current(), MatchPhase::Pregame);
        assert!(c.history().is_empty());
    }

    #[test]
    fn test_transitions_are_recorded_and_published() {
        let (mut c, sub) = controller();
        c.request(MatchPhase::Playing, 0.0).unwrap();
        c.request(MatchPhase::FoulCalled, 12.5).unwrap();

        assert_eq!(c.current(), MatchPhase::FoulCalled);
        assert_eq!(
            c.history(),
            &[
                (0.0, MatchPhase::Pregame, MatchPhase::Playing),
                (12.5, MatchPhase::Playing, MatchPhase::FoulCalled)
            ]
        );
        let events = sub.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[1],
            MatchNotification::PhaseChanged { from: MatchPhase::Playing, to: MatchPhase::FoulCalled }
        );
    }

    #[test]
    fn test_same_phase_is_noop() {
        let (mut c, sub) = controller();
        c.request(MatchPhase::Pregame, 1.0).unwrap();
        assert!(c.history().is_empty());
        assert!(sub.drain().is_empty());
    }

    #[test]
    fn test_postgame_only_leads_to_pregame() {
        let (mut c, sub) = controller();
        c.request(MatchPhase::Playing, 0.0).unwrap();
        c.request(MatchPhase::Postgame, 100.0).unwrap();
        sub.drain();

        let err = c.request(MatchPhase::Playing, 101.0).unwrap_err();
        assert_eq!(err, PhaseTransitionError::LockedAfterPostgame { requested: MatchPhase::Playing });
        assert_eq!(c.current(), MatchPhase::Postgame);
        assert_eq!(
            sub.drain(),
            vec![MatchNotification::TransitionRejected {
                from: MatchPhase::Postgame,
                requested: MatchPhase::Playing
            }]
        );

        assert!(c.request(MatchPhase::Paused, 101.0).is_err());
        c.request(MatchPhase::Pregame, 102.0).unwrap();
        assert_eq!(c.current(), MatchPhase::Pregame);
    }

    #[test]
    fn test_pause_and_resume_restore_phase() {
        let (mut c, _) = controller();
        c.request(MatchPhase::Playing, 0.0).unwrap();
        c.request(MatchPhase::ExclusionSetup, 5.0).unwrap();
        c.pause(6.0).unwrap();
        assert!(c.is_paused());

        assert_eq!(c.resume(9.0).unwrap(), MatchPhase::ExclusionSetup);
        assert_eq!(c.current(), MatchPhase::ExclusionSetup);
        assert_eq!(c.resume(9.0), Err(PhaseTransitionError::NotPaused));
    }

    #[test]
    fn test_validity_table() {
        for from in MatchPhase::ALL {
            for to in [MatchPhase::Paused, MatchPhase::Timeout, MatchPhase::Postgame] {
                if from != MatchPhase::Postgame {
                    assert!(is_valid_transition(from, to));
                }
            }
        }
        assert!(!is_valid_transition(MatchPhase::Postgame, MatchPhase::Playing));
        assert!(is_valid_transition(MatchPhase::Postgame, MatchPhase::Pregame));
    }

    #[test]
    fn test_reset_returns_to_pregame() {
        let (mut c, _) = controller();
        c.request(MatchPhase::Playing, 0.0).unwrap();
        c.request(MatchPhase::Postgame, 10.0).unwrap();
        c.reset();
        assert_eq!(c.current(), MatchPhase::Pregame);
        assert!(c.history().is_empty());
    }
}
