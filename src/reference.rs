//! Labeled reference records the matcher compares against.

use crate::image::GrayImage;

/// Auxiliary value recorded when the metadata does not provide one.
pub const MISSING_AUXILIARY: &str = "N/A";

/// One labeled entry of the comparison dataset.
///
/// The image is stored in normalized grayscale form. Labels and auxiliary
/// values need not be unique across a collection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferenceRecord {
    image: GrayImage,
    label: String,
    auxiliary_value: String,
}

impl ReferenceRecord {
    /// Creates a record whose auxiliary value is [`MISSING_AUXILIARY`].
    pub fn new(image: GrayImage, label: impl Into<String>) -> Self {
        Self {
            image,
            label: label.into(),
            auxiliary_value: MISSING_AUXILIARY.to_owned(),
        }
    }

    /// Sets the auxiliary value (the recommendation attached to the label).
    pub fn with_auxiliary_value(mut self, value: impl Into<String>) -> Self {
        self.auxiliary_value = value.into();
        self
    }

    pub fn image(&self) -> &GrayImage {
        &self.image
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn auxiliary_value(&self) -> &str {
        &self.auxiliary_value
    }
}
