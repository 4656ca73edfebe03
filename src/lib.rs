//! LeafMatch classifies a photo by structural similarity to a labeled
//! reference set.
//!
//! The core is a small synchronous pipeline: a color image is normalized to
//! grayscale, each reference is resampled onto the query grid and scored
//! with SSIM, and the first reference meeting the threshold wins. The
//! optional `dataset` feature loads references from CSV metadata plus an
//! image directory; `image-io` decodes files; `tracing` emits spans and
//! events; `rayon` decodes dataset images in parallel.

#[cfg(feature = "dataset")]
pub mod dataset;
pub mod image;
pub mod reference;
pub mod report;
pub mod score;
pub mod search;
mod trace;
pub mod util;

pub use crate::image::{normalize, resize_bilinear, ChannelOrder, ColorImage, GrayImage, ImageView};
pub use reference::{ReferenceRecord, MISSING_AUXILIARY};
pub use report::{Notification, Notifier};
pub use score::{ssim, Comparison, Scorer, SsimParams, SsimScorer};
pub use search::{
    find_match, MatchResult, Matcher, RecordMatch, ScanObserver, ScoreObservation, ScoreOutcome,
    Threshold,
};
pub use util::{
    DatasetError, DecodeError, LeafMatchError, LeafMatchResult, NotifyError, ScoreError,
};
