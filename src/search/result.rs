//! Per-record observations and the terminal match decision.

use crate::util::ScoreError;

/// Whether a record's score was computed or substituted after a failure.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScoreOutcome {
    Computed,
    Failed(ScoreError),
}

/// Score observed for one reference record during a scan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreObservation {
    /// Position of the record in the reference collection.
    pub index: usize,
    /// Similarity score, `0.0` when the outcome is `Failed`.
    pub score: f64,
    pub outcome: ScoreOutcome,
}

impl ScoreObservation {
    pub(crate) fn computed(index: usize, score: f64) -> Self {
        Self {
            index,
            score,
            outcome: ScoreOutcome::Computed,
        }
    }

    pub(crate) fn failed(index: usize, err: ScoreError) -> Self {
        Self {
            index,
            score: 0.0,
            outcome: ScoreOutcome::Failed(err),
        }
    }

    /// Returns true when the score is a real measurement.
    pub fn is_computed(&self) -> bool {
        matches!(self.outcome, ScoreOutcome::Computed)
    }

    /// Returns the scoring error, if any.
    pub fn error(&self) -> Option<ScoreError> {
        match self.outcome {
            ScoreOutcome::Computed => None,
            ScoreOutcome::Failed(err) => Some(err),
        }
    }
}

/// The record selected by a scan.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordMatch {
    pub index: usize,
    pub label: String,
    pub auxiliary_value: String,
    pub score: f64,
}

/// Outcome of one matcher invocation.
///
/// Carries the decision and every observation made before it, in scan order.
/// No summary score exists when nothing matched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MatchResult {
    found: Option<RecordMatch>,
    observations: Vec<ScoreObservation>,
}

impl MatchResult {
    pub(crate) fn new(found: Option<RecordMatch>, observations: Vec<ScoreObservation>) -> Self {
        Self {
            found,
            observations,
        }
    }

    /// Returns true when a record met the threshold.
    pub fn matched(&self) -> bool {
        self.found.is_some()
    }

    /// Returns the selected record, if any.
    pub fn found(&self) -> Option<&RecordMatch> {
        self.found.as_ref()
    }

    pub fn label(&self) -> Option<&str> {
        self.found.as_ref().map(|m| m.label.as_str())
    }

    pub fn auxiliary_value(&self) -> Option<&str> {
        self.found.as_ref().map(|m| m.auxiliary_value.as_str())
    }

    pub fn score(&self) -> Option<f64> {
        self.found.as_ref().map(|m| m.score)
    }

    pub fn index(&self) -> Option<usize> {
        self.found.as_ref().map(|m| m.index)
    }

    /// Returns every per-record observation in scan order.
    pub fn observations(&self) -> &[ScoreObservation] {
        &self.observations
    }

    /// Returns how many records were scored before the scan ended.
    pub fn records_scored(&self) -> usize {
        self.observations.len()
    }

    /// Returns the number of records whose score could not be computed.
    pub fn failures(&self) -> usize {
        self.observations.iter().filter(|o| !o.is_computed()).count()
    }
}
