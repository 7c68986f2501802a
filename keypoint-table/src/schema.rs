use crate::common::*;

/// The outer header name of the row-label column.
///
/// It is written by DeepLabCut-style exporters and never denotes a keypoint.
pub const RESERVED_COLUMN: &str = "bodyparts";

/// The inner header of a keypoint column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoordField {
    X,
    Y,
    Likelihood,
}

impl CoordField {
    pub fn parse(text: &str) -> Option<Self> {
        let field = match text {
            "x" => Self::X,
            "y" => Self::Y,
            "likelihood" => Self::Likelihood,
            _ => return None,
        };
        Some(field)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Likelihood => "likelihood",
        }
    }
}

impl fmt::Display for CoordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column indexes of one keypoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeypointColumns {
    pub x: usize,
    pub y: usize,
    pub likelihood: Option<usize>,
}

/// The validated column layout of a keypoint table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    label_column: String,
    keypoints: IndexMap<String, KeypointColumns>,
    tag_column: Option<usize>,
    num_columns: usize,
}

impl TableSchema {
    /// Build the schema from the outer (keypoint name) and inner (coordinate field) header rows.
    pub fn from_headers<O, I>(outer: &[O], inner: &[I]) -> Result<Self>
    where
        O: AsRef<str>,
        I: AsRef<str>,
    {
        ensure!(
            outer.len() == inner.len(),
            "header rows have different lengths ({} and {})",
            outer.len(),
            inner.len()
        );
        let num_columns = outer.len();
        ensure!(num_columns > 0, "the table has no columns");

        let label_column = outer[0].as_ref().trim().to_owned();
        if label_column != RESERVED_COLUMN {
            debug!(
                "the row-label column is named '{}' rather than '{}'",
                label_column, RESERVED_COLUMN
            );
        }

        let mut partial: IndexMap<String, [Option<usize>; 3]> = IndexMap::new();
        let mut tag_column = None;

        for (index, (name, field)) in outer.iter().zip(inner).enumerate().skip(1) {
            let name = name.as_ref().trim();
            let field = field.as_ref().trim();

            let field = match CoordField::parse(field) {
                Some(field) => field,
                None if index + 1 == num_columns => {
                    tag_column = Some(index);
                    continue;
                }
                None => bail!(
                    "unknown coordinate field '{}' for '{}' in column {}",
                    field,
                    name,
                    index
                ),
            };

            ensure!(
                !name.is_empty(),
                "column {} has field '{}' but no keypoint name",
                index,
                field
            );
            ensure!(
                name != RESERVED_COLUMN,
                "the reserved name '{}' cannot be used as a keypoint (column {})",
                RESERVED_COLUMN,
                index
            );

            let slot = &mut partial.entry(name.to_owned()).or_default()[field as usize];
            ensure!(
                slot.is_none(),
                "duplicated column '{}/{}' at column {}",
                name,
                field,
                index
            );
            *slot = Some(index);
        }

        let keypoints: IndexMap<_, _> = partial
            .into_iter()
            .map(|(name, [x, y, likelihood])| -> Result<_> {
                let x = x.ok_or_else(|| format_err!("keypoint '{}' has no 'x' column", name))?;
                let y = y.ok_or_else(|| format_err!("keypoint '{}' has no 'y' column", name))?;
                Ok((name, KeypointColumns { x, y, likelihood }))
            })
            .try_collect()?;

        Ok(Self {
            label_column,
            keypoints,
            tag_column,
            num_columns,
        })
    }

    /// The outer header of the first column.
    pub fn label_column(&self) -> &str {
        &self.label_column
    }

    /// Keypoint names in column order.
    pub fn keypoint_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.keypoints.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&KeypointColumns> {
        self.keypoints.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.keypoints.contains_key(name)
    }

    pub fn has_likelihood(&self, name: &str) -> bool {
        matches!(
            self.keypoints.get(name),
            Some(KeypointColumns {
                likelihood: Some(_),
                ..
            })
        )
    }

    pub fn num_keypoints(&self) -> usize {
        self.keypoints.len()
    }

    pub fn tag_column(&self) -> Option<usize> {
        self.tag_column
    }

    pub fn num_columns(&self) -> usize {
        self.num_columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prediction_headers() -> Result<()> {
        let outer = ["bodyparts", "nose", "nose", "nose", "tail", "tail", "tail", "set"];
        let inner = ["coords", "x", "y", "likelihood", "x", "y", "likelihood", ""];
        let schema = TableSchema::from_headers(&outer, &inner)?;

        assert_eq!(schema.label_column(), RESERVED_COLUMN);
        assert_eq!(schema.keypoint_names().collect::<Vec<_>>(), ["nose", "tail"]);
        assert_eq!(schema.tag_column(), Some(7));
        assert_eq!(
            schema.get("tail"),
            Some(&KeypointColumns {
                x: 4,
                y: 5,
                likelihood: Some(6)
            })
        );
        assert!(schema.has_likelihood("nose"));
        Ok(())
    }

    #[test]
    fn ground_truth_headers() -> Result<()> {
        let outer = ["bodyparts", "paw", "paw", "ear", "ear"];
        let inner = ["coords", "x", "y", "x", "y"];
        let schema = TableSchema::from_headers(&outer, &inner)?;

        assert_eq!(schema.keypoint_names().collect::<Vec<_>>(), ["paw", "ear"]);
        assert_eq!(schema.tag_column(), None);
        assert!(!schema.has_likelihood("paw"));
        assert!(!schema.contains(RESERVED_COLUMN));
        Ok(())
    }

    #[test]
    fn reject_bad_headers() {
        // unknown field in the middle
        let outer = ["bodyparts", "paw", "paw", "paw"];
        let inner = ["coords", "x", "z", "y"];
        assert!(TableSchema::from_headers(&outer, &inner).is_err());

        // duplicated field
        let outer = ["bodyparts", "paw", "paw", "paw"];
        let inner = ["coords", "x", "y", "x"];
        assert!(TableSchema::from_headers(&outer, &inner).is_err());

        // missing y
        let outer = ["bodyparts", "paw", "ear", "ear"];
        let inner = ["coords", "x", "x", "y"];
        assert!(TableSchema::from_headers(&outer, &inner).is_err());

        // reserved name used as keypoint
        let outer = ["bodyparts", "bodyparts", "bodyparts"];
        let inner = ["coords", "x", "y"];
        assert!(TableSchema::from_headers(&outer, &inner).is_err());
    }
}
