//! Minimum acceptable similarity for a match.

use crate::util::{LeafMatchError, LeafMatchResult};

/// Validated similarity threshold in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Threshold(f64);

impl Threshold {
    /// Threshold used by the capture and upload flow.
    pub const DEFAULT: Threshold = Threshold(0.7);

    /// Validates `value` as a threshold.
    pub fn new(value: f64) -> LeafMatchResult<Self> {
        if !(0.0..=1.0).contains(&value) {
            return Err(LeafMatchError::InvalidThreshold(value));
        }
        Ok(Self(value))
    }

    /// Returns the raw threshold value.
    pub fn value(self) -> f64 {
        self.0
    }

    /// Returns true when `score` meets or exceeds the threshold.
    pub fn accepts(self, score: f64) -> bool {
        score >= self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<f64> for Threshold {
    type Error = LeafMatchError;

    fn try_from(value: f64) -> LeafMatchResult<Self> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::Threshold;
    use crate::util::LeafMatchError;

    #[test]
    fn accepts_inclusive_bound() {
        let t = Threshold::new(0.7).unwrap();
        assert!(t.accepts(0.7));
        assert!(t.accepts(0.71));
        assert!(!t.accepts(0.69));
    }

    #[test]
    fn rejects_out_of_range_and_nan() {
        assert_eq!(
            Threshold::new(1.5).err(),
            Some(LeafMatchError::InvalidThreshold(1.5))
        );
        assert!(Threshold::new(-0.1).is_err());
        assert!(Threshold::new(f64::NAN).is_err());
        assert!(Threshold::try_from(1.0).is_ok());
        assert!(Threshold::try_from(0.0).is_ok());
    }
}
