//! Convenience helpers for decoding images via the `image` crate.
//!
//! Available when the `image-io` feature is enabled. Decoders always yield
//! RGB samples; the grayscale helpers route through [`normalize`] so every
//! entry point produces identical luminance.

use crate::image::{normalize, ChannelOrder, ColorImage, GrayImage};
use crate::util::DecodeError;
use std::path::Path;

fn codec_error(err: ::image::ImageError) -> DecodeError {
    DecodeError::Codec {
        reason: err.to_string(),
    }
}

/// Creates an owned color image from a decoded dynamic image.
///
/// Alpha is discarded and grayscale sources are expanded to three channels.
pub fn color_from_dynamic_image(img: &::image::DynamicImage) -> Result<ColorImage, DecodeError> {
    let rgb = img.to_rgb8();
    let width = rgb.width() as usize;
    let height = rgb.height() as usize;
    ColorImage::new(rgb.into_raw(), width, height, ChannelOrder::Rgb)
}

/// Decodes an encoded image held in memory.
pub fn decode_color_image(bytes: &[u8]) -> Result<ColorImage, DecodeError> {
    let img = ::image::load_from_memory(bytes).map_err(codec_error)?;
    color_from_dynamic_image(&img)
}

/// Loads an image from disk as a color image.
pub fn load_color_image<P: AsRef<Path>>(path: P) -> Result<ColorImage, DecodeError> {
    let img = ::image::open(path).map_err(codec_error)?;
    color_from_dynamic_image(&img)
}

/// Loads an image from disk and normalizes it to grayscale.
pub fn load_gray_image<P: AsRef<Path>>(path: P) -> Result<GrayImage, DecodeError> {
    load_color_image(path).map(|color| normalize(&color))
}
