//! Failures of a dataset build.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(
        "invalid set of split tags {found:?}, expect exactly train, test and validation, optionally with unused"
    )]
    InvalidTagSet { found: Vec<String> },
    #[error("the image file '{}' does not exist", .path.display())]
    MissingImageFile { path: PathBuf },
    #[error("the file '{}' does not exist", .path.display())]
    MissingFile { path: PathBuf },
    #[error("the predictions of model '{model}' have {found} rows, but {expected} rows are expected")]
    RowCountMismatch {
        model: String,
        expected: usize,
        found: usize,
    },
    #[error("{names} model names are given for {files} prediction sources")]
    ModelNameCountMismatch { names: usize, files: usize },
    #[error("the model name '{name}' is given more than once")]
    DuplicateModelName { name: String },
    #[error("the predictions file '{}' of model '{model}' does not exist", .path.display())]
    MissingPredictionFile { model: String, path: PathBuf },
    #[error("the table '{}' has no split-tag column", .path.display())]
    MissingTagColumn { path: PathBuf },
    #[error("the keypoint '{keypoint}' is not found in the {table} table")]
    UnknownKeypoint { keypoint: String, table: String },
    #[error("row {row} is out of range for the {table} table with {num_rows} rows")]
    RowOutOfRange {
        table: String,
        row: usize,
        num_rows: usize,
    },
    #[error("no prediction files are given")]
    NoPredictionFiles,
    #[error("no video file is given")]
    NoVideoFile,
    #[error("failed to load table '{}'", .path.display())]
    LoadTable {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
