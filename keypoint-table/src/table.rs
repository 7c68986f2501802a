use crate::{common::*, schema::TableSchema};

/// The zero-based indexes of the outer and inner header rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[usize; 2]", into = "[usize; 2]")]
pub struct HeaderRows {
    outer: usize,
    inner: usize,
}

impl HeaderRows {
    pub fn new(outer: usize, inner: usize) -> Result<Self> {
        ensure!(
            inner == outer + 1,
            "header rows must be two adjacent rows, but get [{}, {}]",
            outer,
            inner
        );
        Ok(Self { outer, inner })
    }

    pub fn outer(&self) -> usize {
        self.outer
    }

    pub fn inner(&self) -> usize {
        self.inner
    }
}

impl Default for HeaderRows {
    fn default() -> Self {
        Self { outer: 1, inner: 2 }
    }
}

impl TryFrom<[usize; 2]> for HeaderRows {
    type Error = Error;

    fn try_from([outer, inner]: [usize; 2]) -> Result<Self, Self::Error> {
        Self::new(outer, inner)
    }
}

impl From<HeaderRows> for [usize; 2] {
    fn from(rows: HeaderRows) -> Self {
        [rows.outer, rows.inner]
    }
}

/// The raw reading of one keypoint in one row, in pixel units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeypointReading {
    pub x: f64,
    pub y: f64,
    /// Present iff the table defines a likelihood field for the keypoint.
    pub likelihood: Option<f64>,
}

/// A keypoint table loaded into memory.
#[derive(Debug, Clone)]
pub struct KeypointTable {
    schema: TableSchema,
    labels: Vec<String>,
    values: Vec<Vec<f64>>,
    tags: Option<Vec<String>>,
}

impl KeypointTable {
    /// Load a table from a CSV file.
    pub fn open(path: impl AsRef<Path>, header_rows: HeaderRows) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("failed to open table file '{}'", path.display()))?;
        let table = Self::from_reader(file, header_rows)
            .with_context(|| format!("failed to parse table file '{}'", path.display()))?;
        debug!(
            "loaded {} rows and {} keypoints from '{}'",
            table.num_rows(),
            table.schema.num_keypoints(),
            path.display()
        );
        Ok(table)
    }

    /// Parse a table from CSV text.
    pub fn from_reader<R>(reader: R, header_rows: HeaderRows) -> Result<Self>
    where
        R: Read,
    {
        let mut reader = ::csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut outer_header: Option<Vec<String>> = None;
        let mut schema: Option<TableSchema> = None;
        let mut labels = vec![];
        let mut values = vec![];
        let mut tags = vec![];

        for (row_index, record) in reader.records().enumerate() {
            let record = record?;

            if row_index < header_rows.outer() {
                continue;
            }
            if row_index == header_rows.outer() {
                outer_header = Some(record.iter().map(ToOwned::to_owned).collect());
                continue;
            }

            if row_index == header_rows.inner() {
                let outer = outer_header
                    .as_deref()
                    .ok_or_else(|| format_err!("the outer header row is missing"))?;
                let inner: Vec<_> = record.iter().collect();
                schema = Some(TableSchema::from_headers(outer, &inner)?);
                continue;
            }

            let schema = schema
                .as_ref()
                .ok_or_else(|| format_err!("the inner header row is missing"))?;

            ensure!(
                record.len() == schema.num_columns(),
                "row {} has {} cells, but the header has {} columns",
                row_index,
                record.len(),
                schema.num_columns()
            );

            let row: Vec<f64> = record
                .iter()
                .enumerate()
                .map(|(column, cell)| -> Result<_> {
                    if column == 0 || Some(column) == schema.tag_column() {
                        return Ok(f64::NAN);
                    }
                    parse_cell(cell).with_context(|| {
                        format!(
                            "invalid number '{}' at row {}, column {}",
                            cell, row_index, column
                        )
                    })
                })
                .try_collect()?;

            labels.push(record[0].to_owned());
            if let Some(column) = schema.tag_column() {
                tags.push(record[column].trim().to_owned());
            }
            values.push(row);
        }

        let schema = schema.ok_or_else(|| {
            format_err!(
                "the table ends before the header rows {} and {}",
                header_rows.outer(),
                header_rows.inner()
            )
        })?;
        let tags = schema.tag_column().map(|_| tags);

        Ok(Self {
            schema,
            labels,
            values,
            tags,
        })
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    pub fn num_rows(&self) -> usize {
        self.values.len()
    }

    /// The cells of the row-label column, e.g. relative image paths.
    pub fn row_labels(&self) -> &[String] {
        &self.labels
    }

    /// The raw cells of the trailing split-tag column, if the table has one.
    pub fn tags(&self) -> Option<&[String]> {
        self.tags.as_deref()
    }

    /// Read one keypoint in one row.
    ///
    /// Returns `None` if the row is out of range or the table has no such keypoint.
    pub fn reading(&self, row: usize, name: &str) -> Option<KeypointReading> {
        let columns = self.schema.get(name)?;
        let values = self.values.get(row)?;
        Some(KeypointReading {
            x: values[columns.x],
            y: values[columns.y],
            likelihood: columns.likelihood.map(|column| values[column]),
        })
    }
}

fn parse_cell(cell: &str) -> Result<f64> {
    let cell = cell.trim();
    if cell.is_empty() || cell.eq_ignore_ascii_case("nan") {
        return Ok(f64::NAN);
    }
    Ok(cell.parse()?)
}
