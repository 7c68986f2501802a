//! Annotated samples handed to the viewer.

use crate::{aggregate::FramePredictions, common::*, keypoint::Keypoints, tags::Tag};

/// The field name of ground-truth keypoints on image samples.
pub const GROUND_TRUTH_FIELD: &str = "ground_truth";

/// The field name of a model's predicted keypoints.
pub fn prediction_field(model: &str) -> String {
    format!("{}_preds", model)
}

/// The sample with a media file on disk.
pub trait FileSample {
    fn filepath(&self) -> &Path;
}

/// A labeled image with ground-truth and predicted keypoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageSample {
    pub filepath: PathBuf,
    /// The split tag, held as a one-element list like the viewer's sample tags.
    pub tags: Vec<Tag>,
    /// Keypoint fields in insertion order, ground truth first.
    pub fields: IndexMap<String, Keypoints>,
}

impl ImageSample {
    pub fn new(filepath: PathBuf, tag: Tag, fields: IndexMap<String, Keypoints>) -> Self {
        Self {
            filepath,
            tags: vec![tag],
            fields,
        }
    }

    /// The split tag of the image.
    pub fn tag(&self) -> Option<Tag> {
        self.tags.first().copied()
    }

    pub fn ground_truth(&self) -> Option<&Keypoints> {
        self.fields.get(GROUND_TRUTH_FIELD)
    }

    /// The keypoints predicted by a model.
    pub fn predictions(&self, model: &str) -> Option<&Keypoints> {
        self.fields.get(&prediction_field(model))
    }
}

impl FileSample for ImageSample {
    fn filepath(&self) -> &Path {
        &self.filepath
    }
}

/// A video with per-frame predicted keypoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoSample {
    pub filepath: PathBuf,
    /// Keypoint fields keyed by 1-based frame number.
    pub frames: BTreeMap<usize, IndexMap<String, Keypoints>>,
}

impl VideoSample {
    /// Attach per-frame model predictions to a video. The first entry becomes frame 1.
    pub fn new<P, I>(filepath: P, predictions: I) -> Self
    where
        P: Into<PathBuf>,
        I: IntoIterator<Item = FramePredictions>,
    {
        let frames = predictions
            .into_iter()
            .enumerate()
            .map(|(index, models)| {
                let fields: IndexMap<_, _> = models
                    .into_iter()
                    .map(|(model, keypoints)| (prediction_field(&model), keypoints))
                    .collect();
                (index + 1, fields)
            })
            .collect();

        Self {
            filepath: filepath.into(),
            frames,
        }
    }

    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    /// The fields of a 1-based frame number.
    pub fn frame(&self, number: usize) -> Option<&IndexMap<String, Keypoints>> {
        self.frames.get(&number)
    }
}

impl FileSample for VideoSample {
    fn filepath(&self) -> &Path {
        &self.filepath
    }
}

/// A named collection of samples.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset<S> {
    pub name: String,
    pub samples: Vec<S>,
}

pub type ImageDataset = Dataset<ImageSample>;
pub type VideoDataset = Dataset<VideoSample>;

impl<S> Dataset<S> {
    pub fn new(name: impl Into<String>, samples: Vec<S>) -> Self {
        Self {
            name: name.into(),
            samples,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &S> {
        self.samples.iter()
    }
}

impl ImageDataset {
    /// Count samples per split tag.
    pub fn tag_counts(&self) -> BTreeMap<Tag, usize> {
        self.samples
            .iter()
            .flat_map(|sample| sample.tags.iter().copied())
            .counts()
            .into_iter()
            .collect()
    }
}
