use anyhow::Result;
use approx::assert_abs_diff_eq;
use pose_dataset::{check_dataset, Config, Error, VideoDatasetAssembler};
use std::path::{Path, PathBuf};

fn data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("data")
}

fn config() -> Result<Config> {
    Config::open(data_dir().join("video.json5"))
}

#[test]
fn build_video_dataset() -> Result<()> {
    let config = config()?;
    let assembler = VideoDatasetAssembler::from_config(&config)?;
    assert_eq!(
        assembler.model_names().collect::<Vec<_>>(),
        ["model_0", "model_1"]
    );

    let dataset = assembler.build()?;
    assert_eq!(dataset.name, "mouse_videos");
    assert_eq!(dataset.len(), 1);

    let sample = &dataset.samples[0];
    assert!(sample.filepath.ends_with("videos/test_vid.mp4"));
    assert_eq!(sample.num_frames(), 3);
    assert_eq!(sample.frames.keys().copied().collect::<Vec<_>>(), [1, 2, 3]);

    for fields in sample.frames.values() {
        assert_eq!(
            fields.keys().collect::<Vec<_>>(),
            ["model_0_preds", "model_1_preds"]
        );
        assert!(!fields.contains_key("ground_truth"));
    }

    let nose = sample.frame(2).unwrap()["model_1_preds"].get("nose").unwrap();
    assert_eq!(nose.points.len(), 1);
    assert_abs_diff_eq!(nose.points[0][0], 45.0 / 200.0);
    assert_abs_diff_eq!(nose.points[0][1], 25.0 / 100.0);
    assert_eq!(nose.confidence, Some(0.8));

    let report = check_dataset(&dataset);
    assert!(report.is_ok());
    Ok(())
}

#[test]
fn explicit_model_names() -> Result<()> {
    let mut config = config()?;
    config.eval.model_display_names = Some(vec!["baseline".to_owned(), "semi".to_owned()]);
    let dataset = VideoDatasetAssembler::from_config(&config)?.build()?;

    let fields = dataset.samples[0].frame(1).unwrap();
    assert_eq!(
        fields.keys().collect::<Vec<_>>(),
        ["baseline_preds", "semi_preds"]
    );
    Ok(())
}

#[test]
fn model_name_count_mismatch() -> Result<()> {
    let mut config = config()?;
    config
        .eval
        .pred_csv_files
        .push(data_dir().join("video_preds").join("semi.csv"));
    config.eval.model_display_names = Some(vec!["baseline".to_owned(), "semi".to_owned()]);

    assert!(matches!(
        VideoDatasetAssembler::from_config(&config),
        Err(Error::ModelNameCountMismatch { names: 2, files: 3 })
    ));
    Ok(())
}

#[test]
fn missing_prediction_file() -> Result<()> {
    let mut config = config()?;
    let missing = data_dir().join("video_preds").join("missing.csv");
    config.eval.pred_csv_files.push(missing.clone());

    match VideoDatasetAssembler::from_config(&config) {
        Err(Error::MissingFile { path }) => assert_eq!(path, missing),
        other => panic!("unexpected result {:?}", other),
    }
    Ok(())
}

#[test]
fn missing_video_file() -> Result<()> {
    let mut config = config()?;
    config.eval.video_file = Some(data_dir().join("videos").join("missing.mp4"));
    assert!(matches!(
        VideoDatasetAssembler::from_config(&config),
        Err(Error::MissingFile { .. })
    ));

    config.eval.video_file = None;
    assert!(matches!(
        VideoDatasetAssembler::from_config(&config),
        Err(Error::NoVideoFile)
    ));
    Ok(())
}

#[test]
fn no_prediction_files() -> Result<()> {
    let mut config = config()?;
    config.eval.pred_csv_files.clear();
    assert!(matches!(
        VideoDatasetAssembler::from_config(&config),
        Err(Error::NoPredictionFiles)
    ));
    Ok(())
}

#[test]
fn row_count_mismatch() -> Result<()> {
    let mut config = config()?;
    // the labeled-frame predictions have four rows, the video ones three
    config.eval.pred_csv_files[1] = data_dir()
        .join("models")
        .join("baseline")
        .join("predictions.csv");
    let result = VideoDatasetAssembler::from_config(&config)?.build();
    assert!(matches!(
        result,
        Err(Error::RowCountMismatch {
            expected: 3,
            found: 4,
            ..
        })
    ));
    Ok(())
}
