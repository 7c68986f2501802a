//! Normalized keypoints and per-frame keypoint records.

use crate::{common::*, config::ImageDims};

/// One named keypoint in unit-square coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Keypoint {
    pub label: String,
    /// The `[x, y]` position divided by the original image width and height.
    ///
    /// Holds exactly one point, in the viewer's list-of-points shape.
    pub points: Vec<[f64; 2]>,
    pub confidence: Option<f64>,
}

impl Keypoint {
    /// The normalized `[x, y]` position.
    pub fn position(&self) -> Option<[f64; 2]> {
        self.points.first().copied()
    }
}

/// All keypoints of one frame from one source table.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Keypoints {
    pub keypoints: Vec<Keypoint>,
}

impl Keypoints {
    pub fn len(&self) -> usize {
        self.keypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keypoints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Keypoint> {
        self.keypoints.iter()
    }

    /// Find the keypoint with the given label.
    pub fn get(&self, label: &str) -> Option<&Keypoint> {
        self.keypoints.iter().find(|kp| kp.label == label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.keypoints.iter().map(|kp| kp.label.as_str())
    }
}

impl FromIterator<Keypoint> for Keypoints {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Keypoint>,
    {
        Self {
            keypoints: iter.into_iter().collect(),
        }
    }
}

/// Map a raw pixel reading into unit-square coordinates.
///
/// Tables without a likelihood field carry no confidence signal, and the
/// keypoint gets confidence 1.0. An empty likelihood cell yields no confidence.
pub fn normalize_reading(name: &str, reading: KeypointReading, dims: ImageDims) -> Keypoint {
    let KeypointReading { x, y, likelihood } = reading;
    let confidence = match likelihood {
        Some(likelihood) if likelihood.is_nan() => None,
        Some(likelihood) => Some(likelihood),
        None => Some(1.0),
    };

    Keypoint {
        label: name.to_owned(),
        points: vec![[x / dims.width(), y / dims.height()]],
        confidence,
    }
}

/// Read and normalize one keypoint of one table row.
///
/// Returns `None` for the reserved row-label column, unknown keypoints and
/// out-of-range rows.
pub fn normalize_keypoint(
    table: &KeypointTable,
    row: usize,
    name: &str,
    dims: ImageDims,
) -> Option<Keypoint> {
    if name == RESERVED_COLUMN {
        return None;
    }
    let reading = table.reading(row, name)?;
    Some(normalize_reading(name, reading, dims))
}

/// List every keypoint name of a table schema in column order.
pub fn infer_keypoint_names(schema: &TableSchema) -> Vec<String> {
    schema
        .keypoint_names()
        .filter(|&name| name != RESERVED_COLUMN)
        .map(ToOwned::to_owned)
        .collect()
}

/// Drop the reserved row-label name and repeated names from an explicit keypoint list.
pub fn filter_reserved(names: &[String]) -> Vec<String> {
    names
        .iter()
        .filter(|name| name.as_str() != RESERVED_COLUMN)
        .unique()
        .cloned()
        .collect()
}

/// Pick the keypoints to emit: the explicit list if given, otherwise every
/// keypoint of the reference schema.
pub fn select_keypoint_names(explicit: Option<&[String]>, reference: &TableSchema) -> Vec<String> {
    match explicit {
        Some(names) => filter_reserved(names),
        None => infer_keypoint_names(reference),
    }
}

/// Builds the keypoint records of one table, one frame at a time.
#[derive(Debug, Clone)]
pub struct KeypointRecordBuilder<'a> {
    source: &'a str,
    table: &'a KeypointTable,
    names: &'a [String],
    dims: ImageDims,
}

impl<'a> KeypointRecordBuilder<'a> {
    /// Create a builder after checking the table provides every requested keypoint.
    ///
    /// The `source` names the table in error messages.
    pub fn new(
        source: &'a str,
        table: &'a KeypointTable,
        names: &'a [String],
        dims: ImageDims,
    ) -> Result<Self> {
        let schema = table.schema();
        if let Some(missing) = names
            .iter()
            .find(|&name| name != RESERVED_COLUMN && !schema.contains(name))
        {
            return Err(Error::UnknownKeypoint {
                keypoint: missing.clone(),
                table: source.to_owned(),
            });
        }

        Ok(Self {
            source,
            table,
            names,
            dims,
        })
    }

    pub fn num_rows(&self) -> usize {
        self.table.num_rows()
    }

    /// The keypoints of one row in the requested order.
    pub fn frame(&self, row: usize) -> Result<FrameKeypoints<'a>> {
        let num_rows = self.table.num_rows();
        if row >= num_rows {
            return Err(Error::RowOutOfRange {
                table: self.source.to_owned(),
                row,
                num_rows,
            });
        }

        Ok(FrameKeypoints {
            table: self.table,
            row,
            names: self.names.iter(),
            dims: self.dims,
        })
    }

    /// The collected keypoints of every row in table order.
    pub fn frames(&self) -> impl Iterator<Item = Keypoints> + 'a {
        let Self {
            table, names, dims, ..
        } = *self;

        (0..table.num_rows()).map(move |row| {
            FrameKeypoints {
                table,
                row,
                names: names.iter(),
                dims,
            }
            .collect()
        })
    }
}

/// The keypoints of one row, yielded in the requested name order.
#[derive(Debug, Clone)]
pub struct FrameKeypoints<'a> {
    table: &'a KeypointTable,
    row: usize,
    names: std::slice::Iter<'a, String>,
    dims: ImageDims,
}

impl<'a> Iterator for FrameKeypoints<'a> {
    type Item = Keypoint;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let name = self.names.next()?;
            // the row-label column is never a keypoint
            if name == RESERVED_COLUMN {
                continue;
            }
            if let Some(keypoint) = normalize_keypoint(self.table, self.row, name, self.dims) {
                return Some(keypoint);
            }
        }
    }
}
