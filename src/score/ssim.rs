//! Structural similarity index (SSIM) over 8-bit grayscale images.
//!
//! Each `window x window` placement that lies fully inside the image yields
//! a local index combining luminance, contrast and structure agreement:
//!
//! ```text
//! (2 ux uy + C1) (2 vxy + C2) / ((ux^2 + uy^2 + C1) (vx + vy + C2))
//! ```
//!
//! with `C1 = (k1 R)^2`, `C2 = (k2 R)^2` and `R` the data range. Variances use
//! the sample normalization `N / (N - 1)`. The reported score is the mean of
//! the local indices.

use crate::image::{resize_bilinear, ImageView};
use crate::score::integral::PairMoments;
use crate::score::{Comparison, Scorer};
use crate::util::ScoreError;

/// Parameters of the SSIM computation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SsimParams {
    /// Side length of the uniform comparison window.
    pub window: usize,
    /// Luminance stabilization constant.
    pub k1: f64,
    /// Contrast stabilization constant.
    pub k2: f64,
    /// Dynamic range of the samples.
    pub data_range: f64,
}

impl Default for SsimParams {
    fn default() -> Self {
        Self {
            window: 7,
            k1: 0.01,
            k2: 0.03,
            data_range: 255.0,
        }
    }
}

/// Computes the mean SSIM of two images with identical dimensions.
pub fn ssim(
    a: ImageView<'_, u8>,
    b: ImageView<'_, u8>,
    params: &SsimParams,
) -> Result<f64, ScoreError> {
    let win = params.window;
    if win < 2 {
        return Err(ScoreError::InvalidWindow { window: win });
    }
    let (width, height) = (a.width(), a.height());
    if (width, height) != (b.width(), b.height()) {
        return Err(ScoreError::ShapeMismatch {
            a_width: width,
            a_height: height,
            b_width: b.width(),
            b_height: b.height(),
        });
    }
    ensure_window_fits(win, width, height)?;

    let moments = PairMoments::build(a, b);
    let n = (win * win) as f64;
    let cov_norm = n / (n - 1.0);
    let c1 = (params.k1 * params.data_range).powi(2);
    let c2 = (params.k2 * params.data_range).powi(2);

    let mut total = 0.0f64;
    let mut count = 0usize;
    for y in 0..=height - win {
        for x in 0..=width - win {
            let s = moments.window(x, y, win);
            let ux = s.a / n;
            let uy = s.b / n;
            let vx = cov_norm * (s.aa / n - ux * ux);
            let vy = cov_norm * (s.bb / n - uy * uy);
            let vxy = cov_norm * (s.ab / n - ux * uy);

            let num = (2.0 * ux * uy + c1) * (2.0 * vxy + c2);
            let den = (ux * ux + uy * uy + c1) * (vx + vy + c2);
            total += num / den;
            count += 1;
        }
    }

    Ok(total / count as f64)
}

fn ensure_window_fits(window: usize, width: usize, height: usize) -> Result<(), ScoreError> {
    if width < window || height < window {
        return Err(ScoreError::WindowTooLarge {
            window,
            width,
            height,
        });
    }
    Ok(())
}

/// SSIM scorer that resamples the reference onto the query grid.
#[derive(Clone, Debug, Default)]
pub struct SsimScorer {
    params: SsimParams,
}

impl SsimScorer {
    /// Threshold applied by [`SsimScorer::compare_default`].
    ///
    /// Independent of the threshold the matcher is invoked with.
    pub const DEFAULT_THRESHOLD: f64 = 0.8;

    /// Creates a scorer with the default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scorer with explicit parameters.
    pub fn with_params(params: SsimParams) -> Self {
        Self { params }
    }

    /// Returns the SSIM parameters.
    pub fn params(&self) -> &SsimParams {
        &self.params
    }

    /// Scores the pair and applies `threshold`.
    pub fn compare(
        &self,
        reference: ImageView<'_, u8>,
        query: ImageView<'_, u8>,
        threshold: f64,
    ) -> Comparison {
        Comparison::evaluate(self, reference, query, threshold)
    }

    /// Scores the pair against [`SsimScorer::DEFAULT_THRESHOLD`].
    pub fn compare_default(
        &self,
        reference: ImageView<'_, u8>,
        query: ImageView<'_, u8>,
    ) -> Comparison {
        self.compare(reference, query, Self::DEFAULT_THRESHOLD)
    }
}

impl Scorer for SsimScorer {
    /// Resizes `reference` to the dimensions of `query`, then computes SSIM.
    ///
    /// A reference smaller than one window is rejected before resampling, as
    /// is a query smaller than one window.
    fn score(
        &self,
        reference: ImageView<'_, u8>,
        query: ImageView<'_, u8>,
    ) -> Result<f64, ScoreError> {
        let win = self.params.window;
        ensure_window_fits(win, reference.width(), reference.height())?;
        ensure_window_fits(win, query.width(), query.height())?;
        let resized = resize_bilinear(reference, query.width(), query.height())?;
        ssim(resized.view(), query, &self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(width: usize, height: usize, seed: usize) -> Vec<u8> {
        (0..width * height)
            .map(|i| ((i * (31 + seed)) ^ (i / width * 7)) as u8)
            .collect()
    }

    fn ssim_naive(a: &[u8], b: &[u8], width: usize, height: usize, params: &SsimParams) -> f64 {
        let win = params.window;
        let n = (win * win) as f64;
        let c1 = (params.k1 * params.data_range).powi(2);
        let c2 = (params.k2 * params.data_range).powi(2);
        let mut total = 0.0;
        let mut count = 0.0;
        for y in 0..=height - win {
            for x in 0..=width - win {
                let px = |buf: &[u8], wx: usize, wy: usize| f64::from(buf[(y + wy) * width + x + wx]);
                let (mut ux, mut uy) = (0.0, 0.0);
                for wy in 0..win {
                    for wx in 0..win {
                        ux += px(a, wx, wy);
                        uy += px(b, wx, wy);
                    }
                }
                ux /= n;
                uy /= n;
                let (mut vx, mut vy, mut vxy) = (0.0, 0.0, 0.0);
                for wy in 0..win {
                    for wx in 0..win {
                        let dx = px(a, wx, wy) - ux;
                        let dy = px(b, wx, wy) - uy;
                        vx += dx * dx;
                        vy += dy * dy;
                        vxy += dx * dy;
                    }
                }
                vx /= n - 1.0;
                vy /= n - 1.0;
                vxy /= n - 1.0;
                total += (2.0 * ux * uy + c1) * (2.0 * vxy + c2)
                    / ((ux * ux + uy * uy + c1) * (vx + vy + c2));
                count += 1.0;
            }
        }
        total / count
    }

    #[test]
    fn matches_direct_window_evaluation() {
        let (w, h) = (13, 10);
        let a = pattern(w, h, 0);
        let b = pattern(w, h, 5);
        let params = SsimParams::default();
        let va = ImageView::from_slice(&a, w, h).unwrap();
        let vb = ImageView::from_slice(&b, w, h).unwrap();
        let fast = ssim(va, vb, &params).unwrap();
        let slow = ssim_naive(&a, &b, w, h, &params);
        assert!((fast - slow).abs() < 1e-9, "fast={fast} slow={slow}");
    }

    #[test]
    fn identical_images_score_one() {
        let a = pattern(20, 15, 3);
        let view = ImageView::from_slice(&a, 20, 15).unwrap();
        let score = ssim(view, view, &SsimParams::default()).unwrap();
        assert!((score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn flat_black_versus_flat_white_is_near_zero() {
        let black = vec![0u8; 49];
        let white = vec![255u8; 49];
        let vb = ImageView::from_slice(&black, 7, 7).unwrap();
        let vw = ImageView::from_slice(&white, 7, 7).unwrap();
        let score = ssim(vb, vw, &SsimParams::default()).unwrap();
        let c1 = (0.01f64 * 255.0).powi(2);
        assert!((score - c1 / (255.0 * 255.0 + c1)).abs() < 1e-12);
    }

    #[test]
    fn rejects_shapes_and_small_inputs() {
        let a = vec![0u8; 64];
        let params = SsimParams::default();
        let va = ImageView::from_slice(&a, 8, 8).unwrap();
        let vb = ImageView::from_slice(&a, 16, 4).unwrap();
        assert_eq!(
            ssim(va, vb, &params).err(),
            Some(ScoreError::ShapeMismatch {
                a_width: 8,
                a_height: 8,
                b_width: 16,
                b_height: 4
            })
        );
        let small = ImageView::from_slice(&a, 6, 6).unwrap();
        assert_eq!(
            ssim(small, small, &params).err(),
            Some(ScoreError::WindowTooLarge {
                window: 7,
                width: 6,
                height: 6
            })
        );
        let bad = SsimParams {
            window: 1,
            ..params
        };
        assert_eq!(
            ssim(va, va, &bad).err(),
            Some(ScoreError::InvalidWindow { window: 1 })
        );
    }

    #[test]
    fn compare_reports_failures_as_zero() {
        let a = vec![7u8; 16];
        let tiny = ImageView::from_slice(&a, 4, 4).unwrap();
        let big = vec![7u8; 100];
        let query = ImageView::from_slice(&big, 10, 10).unwrap();
        let cmp = SsimScorer::new().compare(tiny, query, 0.0);
        assert_eq!(cmp.score, 0.0);
        assert!(!cmp.is_match);
        assert!(!cmp.is_computed());
    }

    #[test]
    fn default_threshold_is_independent() {
        let a = pattern(12, 12, 1);
        let view = ImageView::from_slice(&a, 12, 12).unwrap();
        let cmp = SsimScorer::new().compare_default(view, view);
        assert!(cmp.is_match);
        assert_eq!(SsimScorer::DEFAULT_THRESHOLD, 0.8);
    }
}
