use std::error::Error;
use std::fmt;
use std::time::{Duration, Instant};

use crate::stimulus::SymbolSource;

/// Phases of one assessment run. Each trial walks Target -> Stimulus ->
/// Advancing, then either re-enters Target or ends the run in Complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Target,
    Stimulus,
    Advancing,
    Complete,
}

/// What the student did while a stimulus was on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum ResponseKind {
    /// Claimed the stimulus matches the remembered target
    MatchClaim,
    /// Let the stimulus pass
    Skip,
}

/// State machine operations, named for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Action {
    AdvanceToStimulus,
    Respond,
    AdvanceTrial,
}

/// An operation was issued in a phase that does not accept it. This points at
/// a presentation-layer bug and is surfaced rather than swallowed; the
/// session itself is left untouched and remains usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTransition {
    pub action: Action,
    pub phase: Phase,
}

impl fmt::Display for InvalidTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is not valid in the {} phase", self.action, self.phase)
    }
}

impl Error for InvalidTransition {}

/// One in-progress assessment run: a fixed number of target-then-stimulus
/// trials with hit/miss/false-click bookkeeping.
///
/// The session never reads the clock or draws randomness on its own; the
/// caller supplies a [`SymbolSource`] and `Instant`s, which keeps runs fully
/// scriptable.
#[derive(Debug)]
pub struct TrialSession {
    total_trials: usize,
    trial_index: usize,
    phase: Phase,
    target: char,
    stimulus: Option<char>,
    stimulus_shown_at: Option<Instant>,
    hits: usize,
    misses: usize,
    false_clicks: usize,
    reaction_times: Vec<Duration>,
}

impl TrialSession {
    /// Start a new run and enter the Target phase of trial 1.
    pub fn new(total_trials: usize, symbols: &mut dyn SymbolSource) -> Self {
        let mut session = Self {
            total_trials,
            trial_index: 1,
            phase: Phase::Complete,
            target: ' ',
            stimulus: None,
            stimulus_shown_at: None,
            hits: 0,
            misses: 0,
            false_clicks: 0,
            reaction_times: Vec::new(),
        };

        if total_trials > 0 {
            session.begin_trial(symbols);
        }

        session
    }

    fn begin_trial(&mut self, symbols: &mut dyn SymbolSource) {
        self.target = symbols.next_symbol();
        self.stimulus = None;
        self.stimulus_shown_at = None;
        self.phase = Phase::Target;
    }

    fn guard(&self, action: Action, expected: Phase) -> Result<(), InvalidTransition> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(InvalidTransition {
                action,
                phase: self.phase,
            })
        }
    }

    /// Leave the Target phase: draw the stimulus and start the reaction
    /// clock. `now` is the instant the stimulus goes on screen.
    pub fn advance_to_stimulus(
        &mut self,
        symbols: &mut dyn SymbolSource,
        now: Instant,
    ) -> Result<(), InvalidTransition> {
        self.guard(Action::AdvanceToStimulus, Phase::Target)?;

        self.stimulus = Some(symbols.next_symbol());
        self.stimulus_shown_at = Some(now);
        self.phase = Phase::Stimulus;
        Ok(())
    }

    /// Record the student's response to the current stimulus.
    ///
    /// A match claim on the target counts a hit and its reaction time; on a
    /// non-target it counts a false click. A skip on the target counts a
    /// miss; a skip on a non-target is a correct rejection and is not
    /// counted. Either way the phase moves to Advancing, so a second
    /// response to the same stimulus is rejected.
    pub fn respond(&mut self, kind: ResponseKind, now: Instant) -> Result<(), InvalidTransition> {
        self.guard(Action::Respond, Phase::Stimulus)?;

        let is_target = self.stimulus == Some(self.target);
        match kind {
            ResponseKind::MatchClaim => {
                if is_target {
                    self.hits += 1;
                    let shown_at = self.stimulus_shown_at.unwrap_or(now);
                    self.reaction_times.push(now.saturating_duration_since(shown_at));
                } else {
                    self.false_clicks += 1;
                }
            }
            ResponseKind::Skip => {
                if is_target {
                    self.misses += 1;
                }
            }
        }

        self.phase = Phase::Advancing;
        Ok(())
    }

    /// Move past the Advancing phase: either enter the next trial's Target
    /// phase or finish the run.
    pub fn advance_trial(&mut self, symbols: &mut dyn SymbolSource) -> Result<(), InvalidTransition> {
        self.guard(Action::AdvanceTrial, Phase::Advancing)?;

        self.trial_index += 1;
        if self.trial_index > self.total_trials {
            self.phase = Phase::Complete;
        } else {
            self.begin_trial(symbols);
        }
        Ok(())
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    /// 1-based index of the current trial, clamped to the run length once
    /// the session is complete.
    pub fn trial_index(&self) -> usize {
        self.trial_index.min(self.total_trials)
    }

    pub fn total_trials(&self) -> usize {
        self.total_trials
    }

    pub fn target(&self) -> char {
        self.target
    }

    pub fn stimulus(&self) -> Option<char> {
        self.stimulus
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }

    pub fn false_clicks(&self) -> usize {
        self.false_clicks
    }

    pub fn reaction_times(&self) -> &[Duration] {
        &self.reaction_times
    }
}
