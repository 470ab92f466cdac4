use chrono::{DateTime, Local};
use serde::Serialize;

use crate::trial::TrialSession;
use crate::util::{mean, round_to};

/// Categorical summary of an assessment run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
pub enum FocusLevel {
    High,
    Moderate,
    Developing,
}

impl FocusLevel {
    /// The SEL remark printed alongside the level.
    pub fn remark(&self) -> &'static str {
        match self {
            FocusLevel::High => "Excellent focus and strong self-regulation skills.",
            FocusLevel::Moderate => "Good focus. Can further improve sustained attention.",
            FocusLevel::Developing => "Needs support in maintaining focus and impulse control.",
        }
    }
}

/// Scorer output before the student identity is merged in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    /// hits / total trials as a percentage, rounded to one decimal
    pub accuracy_pct: f64,
    /// mean reaction time over all hits, 0.0 when there were none
    pub avg_reaction_secs: f64,
    pub focus_level: FocusLevel,
}

/// One completed assessment as it appears on the class dashboard. Immutable
/// once created.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRecord {
    pub student_name: String,
    pub student_class: String,
    pub accuracy_pct: f64,
    /// rounded to two decimals when the record is built
    pub avg_reaction_secs: f64,
    pub focus_level: FocusLevel,
    pub recorded_at: DateTime<Local>,
}

/// Score a completed run. Pure and deterministic: everything is read off the
/// session's counters.
///
/// Tiers are evaluated in order, first match wins. High requires both the
/// accuracy floor and the false-click cap; an accurate but impulsive run
/// falls through to Moderate on accuracy alone.
pub fn score(session: &TrialSession) -> Score {
    let total = session.total_trials().max(1);
    let accuracy_pct = round_to(100.0 * session.hits() as f64 / total as f64, 1);

    let reaction_secs: Vec<f64> = session
        .reaction_times()
        .iter()
        .map(|d| d.as_secs_f64())
        .collect();
    let avg_reaction_secs = mean(&reaction_secs).unwrap_or(0.0);

    let focus_level = if accuracy_pct >= 80.0 && session.false_clicks() <= 2 {
        FocusLevel::High
    } else if accuracy_pct >= 60.0 {
        FocusLevel::Moderate
    } else {
        FocusLevel::Developing
    };

    Score {
        accuracy_pct,
        avg_reaction_secs,
        focus_level,
    }
}

impl Score {
    /// Merge in the student identity to form the dashboard record.
    pub fn into_record(self, student_name: &str, student_class: &str) -> ResultRecord {
        ResultRecord {
            student_name: student_name.to_string(),
            student_class: student_class.to_string(),
            accuracy_pct: self.accuracy_pct,
            avg_reaction_secs: round_to(self.avg_reaction_secs, 2),
            focus_level: self.focus_level,
            recorded_at: Local::now(),
        }
    }
}
