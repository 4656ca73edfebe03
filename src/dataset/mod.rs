//! Reference set loading from CSV metadata plus an image directory.
//!
//! Available when the `dataset` feature is enabled.
//!
//! Each metadata row names an image by id. The id's stem is looked up
//! case-insensitively in the image directory under [`SUPPORTED_EXTENSIONS`],
//! in order; the first file found is decoded and normalized. Loading is
//! lossy: rows without a label, without a backing file, or whose file fails
//! to decode are omitted and recorded in the [`LoadReport`] instead of
//! failing the load. Only unusable metadata or an unlistable directory fail
//! the whole load.

mod lookup;

pub use lookup::SUPPORTED_EXTENSIONS;

use crate::image::io::load_gray_image;
use crate::image::GrayImage;
use crate::reference::{ReferenceRecord, MISSING_AUXILIARY};
use crate::trace::{trace_event, trace_span, trace_warn};
use crate::util::{DatasetError, DecodeError};
use lookup::ImageDirectory;
use std::path::{Path, PathBuf};

/// Required column holding the image id.
pub const IMAGE_ID_COLUMN: &str = "image_id";
/// Required column holding the label.
pub const LABEL_COLUMN: &str = "label";
/// Default optional column holding the auxiliary value.
pub const DEFAULT_AUXILIARY_COLUMN: &str = "fertilizer";

/// Where the reference set lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatasetConfig {
    /// CSV file with a header row.
    pub metadata_path: PathBuf,
    /// Directory holding the reference images.
    pub images_dir: PathBuf,
    /// Optional column mapped to the auxiliary value.
    pub auxiliary_column: String,
}

impl DatasetConfig {
    pub fn new(metadata_path: impl Into<PathBuf>, images_dir: impl Into<PathBuf>) -> Self {
        Self {
            metadata_path: metadata_path.into(),
            images_dir: images_dir.into(),
            auxiliary_column: DEFAULT_AUXILIARY_COLUMN.to_owned(),
        }
    }

    /// Overrides the auxiliary column name.
    pub fn with_auxiliary_column(mut self, column: impl Into<String>) -> Self {
        self.auxiliary_column = column.into();
        self
    }
}

/// Why a metadata row did not produce a record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OmissionReason {
    /// The label cell is blank.
    MissingLabel,
    /// No file with a supported extension matches the id.
    ImageNotFound,
    /// The file exists but could not be decoded.
    Unreadable(DecodeError),
}

impl OmissionReason {
    /// Short machine-friendly name.
    pub fn kind(&self) -> &'static str {
        match self {
            OmissionReason::MissingLabel => "missing_label",
            OmissionReason::ImageNotFound => "image_not_found",
            OmissionReason::Unreadable(_) => "unreadable",
        }
    }
}

/// A skipped metadata row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Omission {
    /// Zero-based data row, not counting the header.
    pub row: usize,
    pub image_id: String,
    pub reason: OmissionReason,
}

/// Counts describing a lossy load.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Metadata rows examined.
    pub attempted: usize,
    /// Records produced.
    pub loaded: usize,
    /// Rows skipped, in metadata order.
    pub omissions: Vec<Omission>,
}

impl LoadReport {
    /// Returns the number of skipped rows.
    pub fn omitted(&self) -> usize {
        self.omissions.len()
    }
}

/// Loaded records together with the load report.
#[derive(Clone, Debug)]
pub struct ReferenceSet {
    records: Vec<ReferenceRecord>,
    report: LoadReport,
}

impl ReferenceSet {
    /// Returns the records in metadata order.
    pub fn records(&self) -> &[ReferenceRecord] {
        &self.records
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Splits the set into its records and report.
    pub fn into_parts(self) -> (Vec<ReferenceRecord>, LoadReport) {
        (self.records, self.report)
    }
}

/// A row that survived metadata checks and has a candidate file.
struct PendingRow {
    row: usize,
    image_id: String,
    label: String,
    auxiliary_value: String,
    path: PathBuf,
}

/// Loads the reference set described by `config`.
pub fn load_reference_set(config: &DatasetConfig) -> Result<ReferenceSet, DatasetError> {
    let _guard = trace_span!("load_reference_set").entered();
    let metadata_path = config.metadata_path.as_path();
    if !metadata_path.is_file() {
        return Err(DatasetError::MetadataNotFound {
            path: metadata_path.to_path_buf(),
        });
    }

    let metadata_error = |err: csv::Error| DatasetError::Metadata {
        path: metadata_path.to_path_buf(),
        reason: err.to_string(),
    };
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_path(metadata_path)
        .map_err(metadata_error)?;

    let headers = reader.headers().map_err(metadata_error)?.clone();
    let column = |name: &str| headers.iter().position(|h| h == name);
    let id_col = column(IMAGE_ID_COLUMN).ok_or(DatasetError::MissingColumn {
        column: IMAGE_ID_COLUMN,
    })?;
    let label_col = column(LABEL_COLUMN).ok_or(DatasetError::MissingColumn {
        column: LABEL_COLUMN,
    })?;
    let aux_col = column(config.auxiliary_column.as_str());

    let directory =
        ImageDirectory::scan(&config.images_dir).map_err(|err| DatasetError::DirectoryUnreadable {
            path: config.images_dir.clone(),
            reason: err.to_string(),
        })?;

    let mut report = LoadReport::default();
    let mut pending = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(metadata_error)?;
        report.attempted += 1;

        let cell = |idx: usize| record.get(idx).unwrap_or("").trim();
        let image_id = cell(id_col).to_owned();
        let label = cell(label_col);
        if label.is_empty() {
            report.omissions.push(Omission {
                row,
                image_id,
                reason: OmissionReason::MissingLabel,
            });
            continue;
        }
        let Some(path) = directory.find(&image_id) else {
            report.omissions.push(Omission {
                row,
                image_id,
                reason: OmissionReason::ImageNotFound,
            });
            continue;
        };
        let auxiliary_value = match aux_col.map(cell) {
            Some(value) if !value.is_empty() => value.to_owned(),
            _ => MISSING_AUXILIARY.to_owned(),
        };
        pending.push(PendingRow {
            row,
            image_id,
            label: label.to_owned(),
            auxiliary_value,
            path: path.to_path_buf(),
        });
    }

    let decoded = decode_all(&pending);

    let mut records = Vec::with_capacity(pending.len());
    for (row, image) in pending.into_iter().zip(decoded) {
        match image {
            Ok(image) => records.push(
                ReferenceRecord::new(image, row.label).with_auxiliary_value(row.auxiliary_value),
            ),
            Err(err) => report.omissions.push(Omission {
                row: row.row,
                image_id: row.image_id,
                reason: OmissionReason::Unreadable(err),
            }),
        }
    }
    report.omissions.sort_by_key(|o| o.row);
    report.loaded = records.len();

    for omission in &report.omissions {
        trace_warn!(
            "reference_omitted",
            row = omission.row,
            image_id = omission.image_id.as_str(),
            reason = omission.reason.kind()
        );
    }
    trace_event!(
        "reference_set_loaded",
        attempted = report.attempted,
        loaded = report.loaded,
        omitted = report.omitted(),
        files_indexed = directory.len()
    );

    Ok(ReferenceSet { records, report })
}

fn decode_one(row: &PendingRow) -> Result<GrayImage, DecodeError> {
    load_gray_image(&row.path)
}

#[cfg(not(feature = "rayon"))]
fn decode_all(rows: &[PendingRow]) -> Vec<Result<GrayImage, DecodeError>> {
    rows.iter().map(decode_one).collect()
}

/// Decodes in parallel; `collect` keeps the metadata order.
#[cfg(feature = "rayon")]
fn decode_all(rows: &[PendingRow]) -> Vec<Result<GrayImage, DecodeError>> {
    use rayon::prelude::*;
    rows.par_iter().map(decode_one).collect()
}

/// Returns true when `path` has one of the supported image extensions.
pub fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = format!(".{}", ext.to_lowercase());
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}
