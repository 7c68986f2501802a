use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use pose_dataset::{
    check_dataset, Config, ImageDataset, ImageDatasetAssembler, MetadataReport, VideoDataset,
    VideoDatasetAssembler,
};
use prettytable::{cell, row, Table};
use serde::Serialize;
use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, Parser)]
/// Assemble keypoint datasets to compare pose models against ground truth.
enum Opts {
    /// Build a dataset of labeled images with ground-truth and predicted keypoints.
    Images {
        #[clap(long, default_value = "pose.json5")]
        /// configuration file
        config_file: PathBuf,
        #[clap(long)]
        /// output JSON file
        output_file: PathBuf,
    },
    /// Build a dataset of one video with per-frame predicted keypoints.
    Video {
        #[clap(long, default_value = "pose.json5")]
        /// configuration file
        config_file: PathBuf,
        #[clap(long)]
        /// output JSON file
        output_file: PathBuf,
    },
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    match Opts::parse() {
        Opts::Images {
            config_file,
            output_file,
        } => {
            images(config_file, output_file)?;
        }
        Opts::Video {
            config_file,
            output_file,
        } => {
            video(config_file, output_file)?;
        }
    }

    Ok(())
}

fn images(config_file: impl AsRef<Path>, output_file: impl AsRef<Path>) -> Result<()> {
    let config = open_config(config_file)?;
    let dataset = ImageDatasetAssembler::from_config(&config)?.build()?;
    let report = check_dataset(&dataset);

    print_image_summary(&dataset, &report);
    save_json(&dataset, output_file)?;
    Ok(())
}

fn video(config_file: impl AsRef<Path>, output_file: impl AsRef<Path>) -> Result<()> {
    let config = open_config(config_file)?;
    let dataset = VideoDatasetAssembler::from_config(&config)?.build()?;
    let report = check_dataset(&dataset);

    print_video_summary(&dataset, &report);
    save_json(&dataset, output_file)?;
    Ok(())
}

fn open_config(config_file: impl AsRef<Path>) -> Result<Config> {
    let config_file = config_file.as_ref();
    Config::open(config_file)
        .with_context(|| format!("failed to load config file '{}'", config_file.display()))
}

fn save_json<T>(value: &T, output_file: impl AsRef<Path>) -> Result<()>
where
    T: Serialize,
{
    let output_file = output_file.as_ref();
    let writer = BufWriter::new(
        File::create(output_file)
            .with_context(|| format!("failed to create '{}'", output_file.display()))?,
    );
    serde_json::to_writer_pretty(writer, value)?;
    info!("dataset is saved to '{}'", output_file.display());
    Ok(())
}

fn print_image_summary(dataset: &ImageDataset, report: &MetadataReport) {
    let mut table = Table::new();
    table.add_row(row!["tag", "images"]);
    dataset.tag_counts().into_iter().for_each(|(tag, count)| {
        table.add_row(row![tag, count]);
    });
    table.add_row(row!["bad metadata", report.failures.len()]);
    table.printstd();

    let fields = dataset
        .samples
        .first()
        .map(|sample| sample.fields.keys().cloned().collect::<Vec<_>>())
        .unwrap_or_default();
    println!("dataset '{}' fields: {}", dataset.name, fields.join(", "));
}

fn print_video_summary(dataset: &VideoDataset, report: &MetadataReport) {
    let mut table = Table::new();
    table.add_row(row!["video", "frames", "fields"]);
    dataset.samples.iter().for_each(|sample| {
        let fields = sample
            .frame(1)
            .map(|fields| fields.keys().cloned().collect::<Vec<_>>())
            .unwrap_or_default();
        table.add_row(row![
            sample.filepath.display(),
            sample.num_frames(),
            fields.join(", ")
        ]);
    });
    table.printstd();

    if !report.is_ok() {
        println!("{} samples have bad metadata", report.failures.len());
    }
}
