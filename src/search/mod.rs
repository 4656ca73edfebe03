//! First-match scan over an ordered reference collection.
//!
//! Records are scored in collection order and the scan stops at the first
//! record whose score meets the threshold; later records are never scored,
//! even if they would score higher. A record that cannot be scored counts
//! as a failed observation with score `0.0`, never matches, and does not
//! stop the scan. The matcher itself never fails.

pub mod observer;
mod result;
mod threshold;

pub use observer::{NoopObserver, ScanObserver};
pub use result::{MatchResult, RecordMatch, ScoreObservation, ScoreOutcome};
pub use threshold::Threshold;

use crate::image::ImageView;
use crate::reference::ReferenceRecord;
use crate::score::{Scorer, SsimScorer};
use crate::trace::{trace_debug, trace_event, trace_span, trace_warn};

/// Matches a query image against labeled references.
///
/// Holds no state between invocations beyond its scorer.
#[derive(Clone, Debug, Default)]
pub struct Matcher<S = SsimScorer> {
    scorer: S,
}

impl Matcher<SsimScorer> {
    /// Creates a matcher backed by the default SSIM scorer.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: Scorer> Matcher<S> {
    /// Creates a matcher backed by a custom scorer.
    pub fn with_scorer(scorer: S) -> Self {
        Self { scorer }
    }

    /// Returns the scorer.
    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    /// Returns the first record whose score meets `threshold`.
    pub fn find_match(
        &self,
        query: ImageView<'_, u8>,
        references: &[ReferenceRecord],
        threshold: Threshold,
    ) -> MatchResult {
        self.find_match_observed(query, references, threshold, &mut NoopObserver)
    }

    /// Like [`Matcher::find_match`], streaming observations to `observer`.
    ///
    /// `observer` sees each observation as soon as it is made, then the
    /// decision exactly once.
    pub fn find_match_observed<O: ScanObserver + ?Sized>(
        &self,
        query: ImageView<'_, u8>,
        references: &[ReferenceRecord],
        threshold: Threshold,
        observer: &mut O,
    ) -> MatchResult {
        let _guard = trace_span!(
            "find_match",
            records = references.len(),
            threshold = threshold.value()
        )
        .entered();

        let mut observations = Vec::with_capacity(references.len());
        let mut found = None;
        for (index, record) in references.iter().enumerate() {
            let observation = match self.scorer.score(record.image().view(), query) {
                Ok(score) => ScoreObservation::computed(index, score),
                Err(err) => ScoreObservation::failed(index, err),
            };
            match observation.error() {
                None => {
                    trace_debug!("record_scored", index = index, score = observation.score);
                }
                Some(err) => {
                    let reason = err.to_string();
                    trace_warn!("record_unscored", index = index, reason = reason.as_str());
                }
            }
            observer.on_score(&observation);
            observations.push(observation);

            if observation.is_computed() && threshold.accepts(observation.score) {
                found = Some(RecordMatch {
                    index,
                    label: record.label().to_owned(),
                    auxiliary_value: record.auxiliary_value().to_owned(),
                    score: observation.score,
                });
                break;
            }
        }

        let result = MatchResult::new(found, observations);
        trace_event!(
            "match_decision",
            matched = result.matched(),
            records_scored = result.records_scored(),
            failures = result.failures()
        );
        observer.on_decision(&result);
        result
    }
}

/// Runs [`Matcher::find_match`] with the default SSIM scorer.
pub fn find_match(
    query: ImageView<'_, u8>,
    references: &[ReferenceRecord],
    threshold: Threshold,
) -> MatchResult {
    Matcher::new().find_match(query, references, threshold)
}
