//! Similarity scoring between a reference and a query image.
//!
//! The [`Scorer`] trait is the seam between the matcher and the metric. The
//! shipped implementation is [`SsimScorer`], a windowed structural similarity
//! index over 8-bit grayscale samples.

use crate::image::ImageView;
use crate::util::ScoreError;

mod integral;
pub mod ssim;

pub use ssim::{ssim, SsimParams, SsimScorer};

/// Scores how closely a reference image resembles a query image.
///
/// Implementations may resample the reference to the query geometry but
/// must never resample the query.
pub trait Scorer {
    /// Returns a similarity score, `1.0` meaning identical.
    fn score(
        &self,
        reference: ImageView<'_, u8>,
        query: ImageView<'_, u8>,
    ) -> Result<f64, ScoreError>;
}

impl<S: Scorer + ?Sized> Scorer for &S {
    fn score(
        &self,
        reference: ImageView<'_, u8>,
        query: ImageView<'_, u8>,
    ) -> Result<f64, ScoreError> {
        (**self).score(reference, query)
    }
}

/// Outcome of a single thresholded comparison.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Comparison {
    /// Similarity score, `0.0` when the computation failed.
    pub score: f64,
    /// Whether `score` met the threshold. Always false on failure.
    pub is_match: bool,
    /// Why the score could not be computed, if it could not.
    pub error: Option<ScoreError>,
}

impl Comparison {
    /// Evaluates `scorer` once and applies `threshold` to the result.
    pub fn evaluate<S: Scorer + ?Sized>(
        scorer: &S,
        reference: ImageView<'_, u8>,
        query: ImageView<'_, u8>,
        threshold: f64,
    ) -> Self {
        match scorer.score(reference, query) {
            Ok(score) => Self {
                score,
                is_match: score >= threshold,
                error: None,
            },
            Err(err) => Self {
                score: 0.0,
                is_match: false,
                error: Some(err),
            },
        }
    }

    /// Returns true when the score was actually computed.
    pub fn is_computed(&self) -> bool {
        self.error.is_none()
    }
}
