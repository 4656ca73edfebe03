//! Streaming access to a scan in progress.

use crate::search::{MatchResult, ScoreObservation};

/// Receives per-record observations in scan order, then the decision.
///
/// Both hooks default to doing nothing.
pub trait ScanObserver {
    fn on_score(&mut self, _observation: &ScoreObservation) {}

    fn on_decision(&mut self, _result: &MatchResult) {}
}

/// Observer that ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl ScanObserver for NoopObserver {}

impl<O: ScanObserver + ?Sized> ScanObserver for &mut O {
    fn on_score(&mut self, observation: &ScoreObservation) {
        (**self).on_score(observation);
    }

    fn on_decision(&mut self, result: &MatchResult) {
        (**self).on_decision(result);
    }
}
