//! Three-channel color images and grayscale normalization.
//!
//! Luminance uses the BT.601 weights in 14-bit fixed point,
//! `Y = (4899 * R + 9617 * G + 1868 * B + 8192) >> 14`. The weights sum to
//! `1 << 14`, so a pixel with equal channels maps to exactly that value.

use crate::image::GrayImage;
use crate::util::DecodeError;

const LUMA_SHIFT: u32 = 14;
const LUMA_ROUND: u32 = 1 << (LUMA_SHIFT - 1);
const R_WEIGHT: u32 = 4899;
const G_WEIGHT: u32 = 9617;
const B_WEIGHT: u32 = 1868;

/// Interleaving order of the three color samples of a pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChannelOrder {
    /// Red, green, blue. Produced by the image decoders.
    #[default]
    Rgb,
    /// Blue, green, red. Native order of capture devices.
    Bgr,
}

impl ChannelOrder {
    /// Offsets of the red, green and blue samples within a pixel.
    fn offsets(self) -> (usize, usize, usize) {
        match self {
            ChannelOrder::Rgb => (0, 1, 2),
            ChannelOrder::Bgr => (2, 1, 0),
        }
    }
}

/// Owned interleaved three-channel image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
    order: ChannelOrder,
}

impl ColorImage {
    /// Number of interleaved samples per pixel.
    pub const CHANNELS: usize = 3;

    /// Creates a color image from interleaved three-channel samples.
    pub fn new(
        data: Vec<u8>,
        width: usize,
        height: usize,
        order: ChannelOrder,
    ) -> Result<Self, DecodeError> {
        Self::from_interleaved(data, width, height, Self::CHANNELS, order)
    }

    /// Creates a color image from a buffer with an explicit channel count.
    ///
    /// Anything other than three channels is rejected.
    pub fn from_interleaved(
        data: Vec<u8>,
        width: usize,
        height: usize,
        channels: usize,
        order: ChannelOrder,
    ) -> Result<Self, DecodeError> {
        if width == 0 || height == 0 {
            return Err(DecodeError::InvalidDimensions { width, height });
        }
        if channels != Self::CHANNELS {
            return Err(DecodeError::UnsupportedChannels { channels });
        }
        let expected = width
            .checked_mul(height)
            .and_then(|v| v.checked_mul(Self::CHANNELS))
            .ok_or(DecodeError::InvalidDimensions { width, height })?;
        if data.len() < expected {
            return Err(DecodeError::BufferTooSmall {
                needed: expected,
                got: data.len(),
            });
        }
        if data.len() > expected {
            return Err(DecodeError::BufferTooLarge {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            order,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the channel order of the stored samples.
    pub fn order(&self) -> ChannelOrder {
        self.order
    }

    /// Returns the interleaved samples.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the stored samples of pixel `(x, y)` in storage order.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = (y * self.width + x) * Self::CHANNELS;
        let px = self.data.get(start..start + Self::CHANNELS)?;
        Some([px[0], px[1], px[2]])
    }

    /// Returns a copy with samples stored in the requested order.
    pub fn to_order(&self, order: ChannelOrder) -> ColorImage {
        if order == self.order {
            return self.clone();
        }
        let mut data = self.data.clone();
        for px in data.chunks_exact_mut(Self::CHANNELS) {
            px.swap(0, 2);
        }
        ColorImage {
            data,
            width: self.width,
            height: self.height,
            order,
        }
    }

    /// Returns a copy in blue, green, red order.
    pub fn to_bgr(&self) -> ColorImage {
        self.to_order(ChannelOrder::Bgr)
    }
}

/// Converts a color image to its canonical grayscale form.
///
/// The declared channel order is honored, so the same scene stored as RGB
/// or BGR normalizes to identical samples.
pub fn normalize(image: &ColorImage) -> GrayImage {
    let (r, g, b) = image.order.offsets();
    let data = image
        .data
        .chunks_exact(ColorImage::CHANNELS)
        .map(|px| {
            let y = R_WEIGHT * u32::from(px[r])
                + G_WEIGHT * u32::from(px[g])
                + B_WEIGHT * u32::from(px[b])
                + LUMA_ROUND;
            (y >> LUMA_SHIFT) as u8
        })
        .collect();
    GrayImage::from_raw_parts(data, image.width, image.height)
}

/// Validates raw interleaved samples and normalizes them in one step.
pub fn normalize_interleaved(
    data: Vec<u8>,
    width: usize,
    height: usize,
    channels: usize,
    order: ChannelOrder,
) -> Result<GrayImage, DecodeError> {
    let color = ColorImage::from_interleaved(data, width, height, channels, order)?;
    Ok(normalize(&color))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(rgb: [u8; 3], order: ChannelOrder) -> ColorImage {
        let px = match order {
            ChannelOrder::Rgb => rgb,
            ChannelOrder::Bgr => [rgb[2], rgb[1], rgb[0]],
        };
        let data = px.iter().copied().cycle().take(2 * 2 * 3).collect();
        ColorImage::new(data, 2, 2, order).unwrap()
    }

    #[test]
    fn primaries_map_to_luma_weights() {
        assert_eq!(normalize(&solid([255, 0, 0], ChannelOrder::Rgb)).data(), &[76; 4]);
        assert_eq!(normalize(&solid([0, 255, 0], ChannelOrder::Rgb)).data(), &[150; 4]);
        assert_eq!(normalize(&solid([0, 0, 255], ChannelOrder::Rgb)).data(), &[29; 4]);
        assert_eq!(normalize(&solid([255, 255, 255], ChannelOrder::Rgb)).data(), &[255; 4]);
    }

    #[test]
    fn channel_order_is_honored() {
        let rgb = solid([200, 40, 10], ChannelOrder::Rgb);
        let bgr = solid([200, 40, 10], ChannelOrder::Bgr);
        assert_eq!(normalize(&rgb), normalize(&bgr));
        assert_eq!(normalize(&rgb.to_bgr()), normalize(&rgb));

        // Misreading RGB samples as BGR swaps the red and blue weights.
        let misread = ColorImage::new(rgb.data().to_vec(), 2, 2, ChannelOrder::Bgr).unwrap();
        assert_ne!(normalize(&misread), normalize(&rgb));
    }

    #[test]
    fn to_bgr_swaps_outer_samples() {
        let img = ColorImage::new(vec![1, 2, 3, 4, 5, 6], 2, 1, ChannelOrder::Rgb).unwrap();
        let bgr = img.to_bgr();
        assert_eq!(bgr.data(), &[3, 2, 1, 6, 5, 4]);
        assert_eq!(bgr.order(), ChannelOrder::Bgr);
        assert_eq!(bgr.pixel(1, 0), Some([6, 5, 4]));
        assert_eq!(bgr.pixel(2, 0), None);
    }

    #[test]
    fn equal_channels_are_preserved() {
        let data: Vec<u8> = (0u8..=255).flat_map(|v| [v, v, v]).collect();
        let gray = normalize_interleaved(data, 16, 16, 3, ChannelOrder::Rgb).unwrap();
        let expected: Vec<u8> = (0u8..=255).collect();
        assert_eq!(gray.data(), expected.as_slice());
    }

    #[test]
    fn rejects_invalid_input() {
        assert_eq!(
            normalize_interleaved(vec![0; 16], 2, 2, 4, ChannelOrder::Rgb).err(),
            Some(DecodeError::UnsupportedChannels { channels: 4 })
        );
        assert_eq!(
            ColorImage::new(Vec::new(), 0, 3, ChannelOrder::Rgb).err(),
            Some(DecodeError::InvalidDimensions {
                width: 0,
                height: 3
            })
        );
        assert_eq!(
            ColorImage::new(vec![0; 11], 2, 2, ChannelOrder::Rgb).err(),
            Some(DecodeError::BufferTooSmall { needed: 12, got: 11 })
        );
    }
}
