//! Shared utility helpers.

pub mod error;

pub use error::{
    DatasetError, DecodeError, LeafMatchError, LeafMatchResult, NotifyError, ScoreError,
};
