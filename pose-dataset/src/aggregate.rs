//! Per-frame alignment of keypoints predicted by several models.

use crate::{common::*, config::ImageDims, keypoint::{KeypointRecordBuilder, Keypoints}};

/// The keypoints of one frame, keyed by model name in declaration order.
pub type FramePredictions = IndexMap<String, Keypoints>;

/// Build per-frame keypoint sets of every model.
///
/// Every table must have exactly `num_frames` rows. The result has one entry
/// per frame, each keyed by model name in the order of `tables`.
pub fn aggregate_predictions(
    tables: &IndexMap<String, KeypointTable>,
    num_frames: usize,
    names: &[String],
    dims: ImageDims,
) -> Result<Vec<FramePredictions>> {
    // check frame counts before building anything
    for (model, table) in tables {
        if table.num_rows() != num_frames {
            return Err(Error::RowCountMismatch {
                model: model.clone(),
                expected: num_frames,
                found: table.num_rows(),
            });
        }
    }

    let builders: Vec<(&String, KeypointRecordBuilder<'_>)> = tables
        .iter()
        .map(|(model, table)| -> Result<_> {
            let builder = KeypointRecordBuilder::new(model, table, names, dims)?;
            Ok((model, builder))
        })
        .try_collect()?;

    info!(
        "collecting predicted keypoints of {} models over {} frames",
        builders.len(),
        num_frames
    );

    (0..num_frames)
        .map(|frame| {
            builders
                .iter()
                .map(|(model, builder)| -> Result<_> {
                    let keypoints: Keypoints = builder.frame(frame)?.collect();
                    Ok(((*model).clone(), keypoints))
                })
                .try_collect()
        })
        .try_collect()
}
