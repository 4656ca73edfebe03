//! Summed-area tables for windowed first and second moments.
//!
//! Tables have one extra leading row and column of zeros so the sum over
//! `[x0, x1) x [y0, y1)` is `t[y1][x1] - t[y0][x1] - t[y1][x0] + t[y0][x0]`.
//! All entries are integer valued, so `f64` accumulation is exact for any
//! image that fits in memory.

use crate::image::ImageView;

/// Windowed moment sums for a pair of equally sized images.
pub(crate) struct PairMoments {
    /// Stride of every table (`width + 1`).
    stride: usize,
    a: Vec<f64>,
    b: Vec<f64>,
    aa: Vec<f64>,
    bb: Vec<f64>,
    ab: Vec<f64>,
}

/// Raw sums over one window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct WindowSums {
    pub a: f64,
    pub b: f64,
    pub aa: f64,
    pub bb: f64,
    pub ab: f64,
}

impl PairMoments {
    /// Builds tables for `a` and `b`, which must share dimensions.
    pub(crate) fn build(a: ImageView<'_, u8>, b: ImageView<'_, u8>) -> Self {
        let width = a.width();
        let height = a.height();
        debug_assert_eq!((width, height), (b.width(), b.height()));
        let stride = width + 1;
        let len = stride * (height + 1);
        let mut tables = Self {
            stride,
            a: vec![0.0; len],
            b: vec![0.0; len],
            aa: vec![0.0; len],
            bb: vec![0.0; len],
            ab: vec![0.0; len],
        };

        for (y, (row_a, row_b)) in a.rows().zip(b.rows()).enumerate() {
            let mut run = [0.0f64; 5];
            let above = y * stride;
            let here = (y + 1) * stride;
            for (x, (&va, &vb)) in row_a.iter().zip(row_b).enumerate() {
                let va = f64::from(va);
                let vb = f64::from(vb);
                run[0] += va;
                run[1] += vb;
                run[2] += va * va;
                run[3] += vb * vb;
                run[4] += va * vb;
                let idx = here + x + 1;
                let up = above + x + 1;
                tables.a[idx] = tables.a[up] + run[0];
                tables.b[idx] = tables.b[up] + run[1];
                tables.aa[idx] = tables.aa[up] + run[2];
                tables.bb[idx] = tables.bb[up] + run[3];
                tables.ab[idx] = tables.ab[up] + run[4];
            }
        }
        tables
    }

    /// Returns the sums over the `size x size` window with top-left `(x, y)`.
    pub(crate) fn window(&self, x: usize, y: usize, size: usize) -> WindowSums {
        let s = self.stride;
        let tl = y * s + x;
        let tr = tl + size;
        let bl = (y + size) * s + x;
        let br = bl + size;
        let rect = |t: &[f64]| t[br] - t[tr] - t[bl] + t[tl];
        WindowSums {
            a: rect(&self.a),
            b: rect(&self.b),
            aa: rect(&self.aa),
            bb: rect(&self.bb),
            ab: rect(&self.ab),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PairMoments;
    use crate::image::ImageView;

    #[test]
    fn window_sums_match_brute_force() {
        let width = 9;
        let height = 6;
        let a: Vec<u8> = (0..width * height).map(|i| (i * 37 % 251) as u8).collect();
        let b: Vec<u8> = (0..width * height).map(|i| (i * 11 % 239) as u8).collect();
        let va = ImageView::from_slice(&a, width, height).unwrap();
        let vb = ImageView::from_slice(&b, width, height).unwrap();
        let moments = PairMoments::build(va, vb);

        let size = 3;
        for y in 0..=height - size {
            for x in 0..=width - size {
                let mut expected = [0.0f64; 5];
                for wy in 0..size {
                    for wx in 0..size {
                        let pa = f64::from(a[(y + wy) * width + x + wx]);
                        let pb = f64::from(b[(y + wy) * width + x + wx]);
                        expected[0] += pa;
                        expected[1] += pb;
                        expected[2] += pa * pa;
                        expected[3] += pb * pb;
                        expected[4] += pa * pb;
                    }
                }
                let got = moments.window(x, y, size);
                assert_eq!(
                    [got.a, got.b, got.aa, got.bb, got.ab],
                    expected,
                    "window at ({x}, {y})"
                );
            }
        }
    }
}
