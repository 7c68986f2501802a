//! Dataset build configuration format.

use crate::common::*;
use anyhow::Context as _;

pub use data::*;
pub use eval::*;

/// The main configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub data: DataConfig,
    pub eval: EvalConfig,
}

impl Config {
    /// Load a JSON5 configuration file.
    ///
    /// Relative paths are resolved against the directory containing the file.
    pub fn open<P>(path: P) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        let config: Self = json5::from_str(&text)
            .with_context(|| format!("invalid configuration in '{}'", path.display()))?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(config.resolve_paths(base_dir))
    }

    /// Join every relative path with `base_dir`.
    pub fn resolve_paths(self, base_dir: &Path) -> Self {
        let Self { data, eval } = self;
        let resolve = |path: PathBuf| crate::utils::resolve_path(base_dir, path);

        let data = DataConfig {
            data_dir: resolve(data.data_dir),
            ..data
        };
        let eval = EvalConfig {
            model_dirs: eval.model_dirs.into_iter().map(resolve).collect(),
            video_file: eval.video_file.map(resolve),
            pred_csv_files: eval.pred_csv_files.into_iter().map(resolve).collect(),
            ..eval
        };

        Self { data, eval }
    }
}

mod data {
    use super::*;

    /// Labeled data options.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct DataConfig {
        /// The directory of labeled images. Image paths in the ground-truth table are relative to it.
        pub data_dir: PathBuf,
        /// The ground-truth table, relative to `data_dir`.
        pub csv_file: PathBuf,
        /// The zero-based indexes of the two header rows.
        #[serde(default)]
        pub header_rows: HeaderRows,
        /// The original image size that keypoint coordinates refer to.
        pub image_orig_dims: ImageDims,
    }

    impl DataConfig {
        pub fn ground_truth_file(&self) -> PathBuf {
            self.data_dir.join(&self.csv_file)
        }
    }

    /// The original image size in pixels.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ImageDims {
        pub width: NonZeroUsize,
        pub height: NonZeroUsize,
    }

    impl ImageDims {
        pub fn new(width: usize, height: usize) -> Option<Self> {
            Some(Self {
                width: NonZeroUsize::new(width)?,
                height: NonZeroUsize::new(height)?,
            })
        }

        pub fn width(&self) -> f64 {
            self.width.get() as f64
        }

        pub fn height(&self) -> f64 {
            self.height.get() as f64
        }
    }
}

mod eval {
    use super::*;

    /// Prediction sources and output options.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct EvalConfig {
        /// The name of the assembled dataset.
        pub dataset_name: String,
        /// Display names of models in declaration order.
        ///
        /// If not set, models are named `model_0`, `model_1` and so on.
        pub model_display_names: Option<Vec<String>>,
        /// Model output directories, each holding a `predictions.csv`. Used for images.
        #[serde(default)]
        pub model_dirs: Vec<PathBuf>,
        /// The video to annotate.
        pub video_file: Option<PathBuf>,
        /// Prediction tables of the video, one per model.
        #[serde(default)]
        pub pred_csv_files: Vec<PathBuf>,
        /// Keypoints to include. If not set, every keypoint of the ground truth is included.
        pub keypoints_to_plot: Option<Vec<String>>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"{
        // labeled frames
        data: {
            data_dir: "data/mirror-mouse",
            csv_file: "CollectedData.csv",
            header_rows: [1, 2],
            image_orig_dims: { width: 396, height: 406 },
        },
        eval: {
            dataset_name: "mirror-mouse",
            model_display_names: ["baseline", "semi"],
            model_dirs: ["outputs/baseline", "/abs/outputs/semi"],
            video_file: "videos/test.mp4",
            pred_csv_files: [],
        },
    }"#;

    #[test]
    fn parse_and_resolve() -> anyhow::Result<()> {
        let config: Config = json5::from_str(CONFIG)?;
        assert_eq!(config.data.image_orig_dims, ImageDims::new(396, 406).unwrap());
        assert_eq!(config.data.header_rows, HeaderRows::default());
        assert!(config.eval.keypoints_to_plot.is_none());

        let config = config.resolve_paths(Path::new("/project"));
        assert_eq!(config.data.data_dir, Path::new("/project/data/mirror-mouse"));
        assert_eq!(
            config.data.ground_truth_file(),
            Path::new("/project/data/mirror-mouse/CollectedData.csv")
        );
        assert_eq!(
            config.eval.model_dirs,
            [
                PathBuf::from("/project/outputs/baseline"),
                PathBuf::from("/abs/outputs/semi")
            ]
        );
        assert_eq!(
            config.eval.video_file.as_deref(),
            Some(Path::new("/project/videos/test.mp4"))
        );
        Ok(())
    }

    #[test]
    fn reject_bad_values() {
        let zero_width = CONFIG.replace("width: 396", "width: 0");
        assert!(json5::from_str::<Config>(&zero_width).is_err());

        let bad_header = CONFIG.replace("header_rows: [1, 2]", "header_rows: [1, 3]");
        assert!(json5::from_str::<Config>(&bad_header).is_err());
    }

    #[test]
    fn ignore_unknown_data_options() -> anyhow::Result<()> {
        let text = CONFIG.replace("data_dir:", "video_dir: \"videos\", data_dir:");
        let config: Config = json5::from_str(&text)?;
        assert_eq!(config.data.data_dir, Path::new("data/mirror-mouse"));
        Ok(())
    }

    #[test]
    fn missing_config_file() {
        let path = Path::new("/nonexistent/pose/config.json5");
        let error = Config::open(path).unwrap_err();
        assert!(format!("{:#}", error)
            .contains("failed to read config file '/nonexistent/pose/config.json5'"));
    }
}
