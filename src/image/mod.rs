//! Image views and owned buffers.
//!
//! `ImageView` is a borrowed 2D view into a 1D buffer with an explicit stride.
//! The stride counts elements between the starts of consecutive rows, so a
//! stride larger than the width represents padded rows. `GrayImage` is the
//! owned, contiguous single-channel form every comparison works on.

use crate::util::DecodeError;

pub mod color;
#[cfg(feature = "image-io")]
pub mod io;
pub mod resize;

pub use color::{normalize, normalize_interleaved, ChannelOrder, ColorImage};
pub use resize::resize_bilinear;

/// Borrowed 2D image view with an explicit stride.
#[derive(Copy, Clone, Debug)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a, T> ImageView<'a, T> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [T], width: usize, height: usize) -> Result<Self, DecodeError> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride.
    pub fn new(
        data: &'a [T],
        width: usize,
        height: usize,
        stride: usize,
    ) -> Result<Self, DecodeError> {
        let needed = required_len(width, height, stride)?;
        if data.len() < needed {
            return Err(DecodeError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
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

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the backing slice including any row padding.
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Returns the element at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y.checked_mul(self.stride)?.checked_add(x)?;
        self.data.get(idx)
    }

    /// Returns a contiguous slice for row `y` with length `width`.
    pub fn row(&self, y: usize) -> Option<&'a [T]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        let end = start.checked_add(self.width)?;
        self.data.get(start..end)
    }

    /// Iterates over rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &'a [T]> + '_ {
        (0..self.height).filter_map(move |y| self.row(y))
    }
}

fn required_len(width: usize, height: usize, stride: usize) -> Result<usize, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidDimensions { width, height });
    }
    if stride < width {
        return Err(DecodeError::InvalidStride { width, stride });
    }
    let needed = (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(width))
        .ok_or(DecodeError::InvalidDimensions { width, height })?;
    Ok(needed)
}

/// Owned contiguous single-channel image.
///
/// Dimensions are always non-zero and `data.len() == width * height`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl GrayImage {
    /// Creates an image from a contiguous row-major buffer.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> Result<Self, DecodeError> {
        if width == 0 || height == 0 {
            return Err(DecodeError::InvalidDimensions { width, height });
        }
        let expected = width
            .checked_mul(height)
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
        Ok(Self::from_raw_parts(data, width, height))
    }

    /// Wraps a buffer whose geometry the caller has already established.
    pub(crate) fn from_raw_parts(data: Vec<u8>, width: usize, height: usize) -> Self {
        debug_assert!(width > 0 && height > 0 && data.len() == width * height);
        Self {
            data,
            width,
            height,
        }
    }

    /// Copies a possibly strided view into a contiguous image.
    pub fn from_view(view: ImageView<'_, u8>) -> Self {
        let mut data = Vec::with_capacity(view.width() * view.height());
        for row in view.rows() {
            data.extend_from_slice(row);
        }
        Self::from_raw_parts(data, view.width(), view.height())
    }

    /// Returns a borrowed view of the image.
    pub fn view(&self) -> ImageView<'_, u8> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the row-major samples.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the image and returns its samples.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }
}
