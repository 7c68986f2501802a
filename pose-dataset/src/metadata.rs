//! Per-sample media metadata, computed after a dataset is assembled.
//!
//! Failures here never abort the build. Offending samples are logged and
//! reported, and the dataset is returned as is.

use crate::{
    common::*,
    dataset::{Dataset, FileSample, ImageSample, VideoSample},
};

/// File size and, for images, the pixel size of a sample's media file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleMetadata {
    pub size_bytes: u64,
    pub width: Option<usize>,
    pub height: Option<usize>,
}

/// The sample whose media metadata can be computed.
pub trait MediaSample
where
    Self: FileSample,
{
    fn compute_metadata(&self) -> anyhow::Result<SampleMetadata>;
}

impl MediaSample for ImageSample {
    fn compute_metadata(&self) -> anyhow::Result<SampleMetadata> {
        let size_bytes = fs::metadata(&self.filepath)?.len();
        let imagesize::ImageSize { width, height } = imagesize::size(&self.filepath)?;
        Ok(SampleMetadata {
            size_bytes,
            width: Some(width),
            height: Some(height),
        })
    }
}

impl MediaSample for VideoSample {
    fn compute_metadata(&self) -> anyhow::Result<SampleMetadata> {
        let metadata = fs::metadata(&self.filepath)?;
        anyhow::ensure!(
            metadata.is_file(),
            "'{}' is not a regular file",
            self.filepath.display()
        );
        Ok(SampleMetadata {
            size_bytes: metadata.len(),
            width: None,
            height: None,
        })
    }
}

/// A sample whose metadata could not be computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataFailure {
    pub index: usize,
    pub filepath: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MetadataReport {
    /// Metadata per sample in dataset order, `None` for failed samples.
    pub metadata: Vec<Option<SampleMetadata>>,
    pub failures: Vec<MetadataFailure>,
}

impl MetadataReport {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Compute metadata of every sample, reporting bad samples without failing.
pub fn check_dataset<S>(dataset: &Dataset<S>) -> MetadataReport
where
    S: MediaSample,
{
    let mut report = MetadataReport::default();

    for (index, sample) in dataset.samples.iter().enumerate() {
        match sample.compute_metadata() {
            Ok(metadata) => report.metadata.push(Some(metadata)),
            Err(err) => {
                report.metadata.push(None);
                report.failures.push(MetadataFailure {
                    index,
                    filepath: sample.filepath().to_owned(),
                    reason: format!("{:#}", err),
                });
            }
        }
    }

    if !report.failures.is_empty() {
        warn!(
            "failed to compute metadata for {} of {} samples in dataset '{}'",
            report.failures.len(),
            dataset.len(),
            dataset.name
        );
        for failure in &report.failures {
            warn!(
                "bad sample {} '{}': {}",
                failure.index,
                failure.filepath.display(),
                failure.reason
            );
        }
    }

    report
}
