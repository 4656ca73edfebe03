//! Bilinear resampling of grayscale images.

use crate::image::{GrayImage, ImageView};
use crate::util::ScoreError;

/// Source sampling position for one destination coordinate.
#[derive(Clone, Copy)]
struct Tap {
    lo: usize,
    hi: usize,
    frac: f64,
}

fn taps(src_len: usize, dst_len: usize) -> Vec<Tap> {
    let scale = src_len as f64 / dst_len as f64;
    let max = (src_len - 1) as f64;
    (0..dst_len)
        .map(|d| {
            let pos = ((d as f64 + 0.5) * scale - 0.5).clamp(0.0, max);
            let lo = pos.floor() as usize;
            let hi = (lo + 1).min(src_len - 1);
            Tap {
                lo,
                hi,
                frac: pos - lo as f64,
            }
        })
        .collect()
}

/// Resizes a grayscale image to `width x height` using bilinear sampling.
///
/// Destination pixel centers map to source coordinates with
/// `src = (dst + 0.5) * (src_len / dst_len) - 0.5`, clamped to the image, so
/// edges replicate instead of fading. Output values are rounded to the
/// nearest integer. Resizing to the source dimensions returns an exact copy.
pub fn resize_bilinear(
    src: ImageView<'_, u8>,
    width: usize,
    height: usize,
) -> Result<GrayImage, ScoreError> {
    if width == 0 || height == 0 {
        return Err(ScoreError::InvalidResizeTarget { width, height });
    }
    if width == src.width() && height == src.height() {
        return Ok(GrayImage::from_view(src));
    }

    let x_taps = taps(src.width(), width);
    let y_taps = taps(src.height(), height);
    let mut out = Vec::with_capacity(width * height);

    for ty in &y_taps {
        let (Some(row0), Some(row1)) = (src.row(ty.lo), src.row(ty.hi)) else {
            return Err(ScoreError::InvalidResizeTarget { width, height });
        };
        let fy = ty.frac;
        for tx in &x_taps {
            let fx = tx.frac;
            let a = f64::from(row0[tx.lo]);
            let b = f64::from(row0[tx.hi]);
            let c = f64::from(row1[tx.lo]);
            let d = f64::from(row1[tx.hi]);

            let top = a + (b - a) * fx;
            let bottom = c + (d - c) * fx;
            let value = top + (bottom - top) * fy;
            out.push(value.round().clamp(0.0, 255.0) as u8);
        }
    }

    Ok(GrayImage::from_raw_parts(out, width, height))
}

#[cfg(test)]
mod tests {
    use super::resize_bilinear;
    use crate::image::ImageView;
    use crate::util::ScoreError;

    #[test]
    fn same_size_is_a_copy() {
        let data: Vec<u8> = (0u8..20).collect();
        let view = ImageView::from_slice(&data, 5, 4).unwrap();
        let out = resize_bilinear(view, 5, 4).unwrap();
        assert_eq!(out.data(), data.as_slice());
    }

    #[test]
    fn halving_averages_pixel_quads() {
        let data: Vec<u8> = (0u8..16).collect();
        let view = ImageView::from_slice(&data, 4, 4).unwrap();
        let out = resize_bilinear(view, 2, 2).unwrap();
        assert_eq!(out.data(), &[3, 5, 11, 13]);
    }

    #[test]
    fn upscaling_replicates_edges() {
        let data = [0u8, 100];
        let view = ImageView::from_slice(&data, 2, 1).unwrap();
        let out = resize_bilinear(view, 4, 1).unwrap();
        assert_eq!(out.data(), &[0, 25, 75, 100]);
    }

    #[test]
    fn strided_views_ignore_padding() {
        let data = [10u8, 20, 255, 30, 40, 255];
        let view = ImageView::new(&data, 2, 2, 3).unwrap();
        let out = resize_bilinear(view, 1, 1).unwrap();
        assert_eq!(out.data(), &[25]);
    }

    #[test]
    fn zero_target_is_rejected() {
        let data = [0u8; 4];
        let view = ImageView::from_slice(&data, 2, 2).unwrap();
        assert_eq!(
            resize_bilinear(view, 0, 2).err(),
            Some(ScoreError::InvalidResizeTarget {
                width: 0,
                height: 2
            })
        );
    }
}
