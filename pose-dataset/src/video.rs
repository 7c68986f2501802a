//! Video dataset assembly from per-model prediction tables.

use crate::{
    aggregate::aggregate_predictions,
    common::*,
    config::{Config, ImageDims},
    dataset::{VideoDataset, VideoSample},
    keypoint::{filter_reserved, select_keypoint_names},
    utils::{load_table, resolve_model_names},
};

/// Builds a dataset with a single video sample carrying per-frame predictions.
#[derive(Debug, Clone)]
pub struct VideoDatasetAssembler {
    dataset_name: String,
    video_file: PathBuf,
    ground_truth_file: PathBuf,
    header_rows: HeaderRows,
    dims: ImageDims,
    keypoints_to_plot: Option<Vec<String>>,
    /// Model name to prediction table path.
    pred_files: IndexMap<String, PathBuf>,
}

impl VideoDatasetAssembler {
    /// Create the assembler after checking the video and every prediction file exist.
    pub fn from_config(config: &Config) -> Result<Self> {
        let Config { data, eval } = config;
        let video_file = eval.video_file.clone().ok_or(Error::NoVideoFile)?;

        if eval.pred_csv_files.is_empty() {
            return Err(Error::NoPredictionFiles);
        }
        for path in eval.pred_csv_files.iter().chain(iter::once(&video_file)) {
            if !path.is_file() {
                return Err(Error::MissingFile { path: path.clone() });
            }
        }

        let names = resolve_model_names(
            eval.model_display_names.as_deref(),
            eval.pred_csv_files.len(),
        )?;
        let pred_files = names
            .into_iter()
            .zip(eval.pred_csv_files.iter().cloned())
            .collect();

        Ok(Self {
            dataset_name: eval.dataset_name.clone(),
            video_file,
            ground_truth_file: data.ground_truth_file(),
            header_rows: data.header_rows,
            dims: data.image_orig_dims,
            keypoints_to_plot: eval.keypoints_to_plot.clone(),
            pred_files,
        })
    }

    /// Model names in declaration order.
    pub fn model_names(&self) -> impl Iterator<Item = &str> {
        self.pred_files.keys().map(String::as_str)
    }

    /// The dataset name, suffixed so it does not overwrite the image dataset.
    pub fn dataset_name(&self) -> String {
        format!("{}_videos", self.dataset_name)
    }

    pub fn build(&self) -> Result<VideoDataset> {
        let model_tables: IndexMap<String, KeypointTable> = self
            .pred_files
            .iter()
            .map(|(model, path)| -> Result<_> {
                debug!("loading predictions of model '{}'", model);
                Ok((model.clone(), load_table(path, self.header_rows)?))
            })
            .try_collect()?;

        let names = match &self.keypoints_to_plot {
            Some(names) => filter_reserved(names),
            None => {
                let ground_truth = load_table(&self.ground_truth_file, self.header_rows)?;
                select_keypoint_names(None, ground_truth.schema())
            }
        };

        let num_frames = match model_tables.get_index(0) {
            Some((_, table)) => table.num_rows(),
            None => return Err(Error::NoPredictionFiles),
        };

        let predictions = aggregate_predictions(&model_tables, num_frames, &names, self.dims)?;
        let sample = VideoSample::new(&self.video_file, predictions);

        info!(
            "assembled video '{}' with {} frames",
            self.video_file.display(),
            sample.num_frames()
        );
        Ok(VideoDataset::new(self.dataset_name(), vec![sample]))
    }
}
