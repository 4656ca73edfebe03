//! Presentation and notification contracts for match outcomes.
//!
//! The matcher's job ends when it returns a [`MatchResult`]. Everything here
//! turns that result into user-facing text and hands it to a [`Notifier`];
//! notifier failures are reported separately and never alter the result.

use crate::search::{MatchResult, ScoreObservation};
use crate::util::NotifyError;

/// Subject and plain-text body of an outbound notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub body: String,
}

impl Notification {
    /// Builds the notification describing `result`.
    pub fn for_result(result: &MatchResult) -> Self {
        match result.found() {
            Some(found) => Self {
                subject: format!(
                    "Disease Detection Alert: {} - Recommended Fertilizer: {}",
                    found.label, found.auxiliary_value
                ),
                body: format!(
                    "Disease detected in the captured image: {}. Recommended Fertilizer: {}.",
                    found.label, found.auxiliary_value
                ),
            },
            None => Self {
                subject: "Disease Detection Result".to_owned(),
                body: "No disease was detected in the captured image.".to_owned(),
            },
        }
    }
}

/// Delivers notifications over some transport.
pub trait Notifier {
    fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        (**self).send(notification)
    }
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        (**self).send(notification)
    }
}

/// Progress line for one observation; records are numbered from one.
pub fn score_line(observation: &ScoreObservation) -> String {
    format!(
        "SSIM Score for Image {}: {:.2}",
        observation.index + 1,
        observation.score
    )
}

/// Final line summarizing the decision.
pub fn decision_line(result: &MatchResult) -> String {
    match result.found() {
        Some(found) => format!(
            "Disease Detected: {} - Recommended Fertilizer: {} (Score = {:.2})",
            found.label, found.auxiliary_value, found.score
        ),
        None => "No Disease Detected.".to_owned(),
    }
}
