//! Image dataset assembly from labeled frames and model predictions.

use crate::{
    aggregate::aggregate_predictions,
    common::*,
    config::{Config, ImageDims},
    dataset::{prediction_field, ImageDataset, ImageSample, GROUND_TRUTH_FIELD},
    keypoint::{select_keypoint_names, KeypointRecordBuilder, Keypoints},
    tags::{validate_tags, Tag},
    utils::{load_table, resolve_model_names},
};

/// The file name of predictions inside a model output directory.
pub const PREDICTIONS_FILE: &str = "predictions.csv";

/// Builds an image dataset, one sample per labeled image.
#[derive(Debug, Clone)]
pub struct ImageDatasetAssembler {
    dataset_name: String,
    data_dir: PathBuf,
    ground_truth_file: PathBuf,
    header_rows: HeaderRows,
    dims: ImageDims,
    keypoints_to_plot: Option<Vec<String>>,
    /// Model name to model output directory.
    model_dirs: IndexMap<String, PathBuf>,
}

impl ImageDatasetAssembler {
    pub fn from_config(config: &Config) -> Result<Self> {
        let Config { data, eval } = config;
        let names = resolve_model_names(eval.model_display_names.as_deref(), eval.model_dirs.len())?;
        let model_dirs = names.into_iter().zip(eval.model_dirs.iter().cloned()).collect();

        Ok(Self {
            dataset_name: eval.dataset_name.clone(),
            data_dir: data.data_dir.clone(),
            ground_truth_file: data.ground_truth_file(),
            header_rows: data.header_rows,
            dims: data.image_orig_dims,
            keypoints_to_plot: eval.keypoints_to_plot.clone(),
            model_dirs,
        })
    }

    /// Model names in declaration order.
    pub fn model_names(&self) -> impl Iterator<Item = &str> {
        self.model_dirs.keys().map(String::as_str)
    }

    pub fn build(&self) -> Result<ImageDataset> {
        let ground_truth = load_table(&self.ground_truth_file, self.header_rows)?;
        let image_paths = self.image_paths(&ground_truth)?;
        let model_tables = self.load_model_predictions()?;

        // assume every model shares the split of the first one
        let tags = self.image_tags(&ground_truth, &model_tables)?;

        let names =
            select_keypoint_names(self.keypoints_to_plot.as_deref(), ground_truth.schema());

        info!("collecting ground-truth keypoints");
        let ground_truth_keypoints: Vec<Keypoints> =
            KeypointRecordBuilder::new("ground truth", &ground_truth, &names, self.dims)?
                .frames()
                .collect();

        let predictions = aggregate_predictions(
            &model_tables,
            ground_truth.num_rows(),
            &names,
            self.dims,
        )?;

        let samples: Vec<_> = izip!(image_paths, tags, ground_truth_keypoints, predictions)
            .map(|(filepath, tag, ground_truth, predictions)| {
                let fields: IndexMap<_, _> = iter::once((GROUND_TRUTH_FIELD.to_owned(), ground_truth))
                    .chain(
                        predictions
                            .into_iter()
                            .map(|(model, keypoints)| (prediction_field(&model), keypoints)),
                    )
                    .collect();
                ImageSample::new(filepath, tag, fields)
            })
            .collect();

        info!(
            "assembled dataset '{}' with {} images",
            self.dataset_name,
            samples.len()
        );
        Ok(ImageDataset::new(self.dataset_name.clone(), samples))
    }

    /// Absolute image paths of every ground-truth row, checked to exist.
    fn image_paths(&self, ground_truth: &KeypointTable) -> Result<Vec<PathBuf>> {
        ground_truth
            .row_labels()
            .iter()
            .map(|label| {
                let path = self.data_dir.join(label);
                if !path.is_file() {
                    return Err(Error::MissingImageFile { path });
                }
                Ok(path)
            })
            .try_collect()
    }

    fn load_model_predictions(&self) -> Result<IndexMap<String, KeypointTable>> {
        self.model_dirs
            .iter()
            .map(|(model, dir)| {
                let path = dir.join(PREDICTIONS_FILE);
                if !path.is_file() {
                    return Err(Error::MissingPredictionFile {
                        model: model.clone(),
                        path,
                    });
                }
                debug!("loading predictions of model '{}'", model);
                let table = load_table(&path, self.header_rows)?;
                Ok((model.clone(), table))
            })
            .try_collect()
    }

    /// Split tags from the first model's table, or from the ground truth if no
    /// model is declared.
    fn image_tags(
        &self,
        ground_truth: &KeypointTable,
        model_tables: &IndexMap<String, KeypointTable>,
    ) -> Result<Vec<Tag>> {
        let (path, table) = match self.model_dirs.get_index(0).zip(model_tables.get_index(0)) {
            Some(((_, dir), (_, table))) => (dir.join(PREDICTIONS_FILE), table),
            None => (self.ground_truth_file.clone(), ground_truth),
        };
        let raw_tags = table.tags().ok_or(Error::MissingTagColumn { path })?;
        validate_tags(raw_tags)
    }
}
