use crate::common::*;

/// Join a relative path with `base_dir`. Absolute paths are kept.
pub fn resolve_path(base_dir: &Path, path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
        path.to_owned()
    } else {
        base_dir.join(path)
    }
}

/// Load a keypoint table, keeping the path in the error.
pub fn load_table(path: &Path, header_rows: HeaderRows) -> Result<KeypointTable> {
    KeypointTable::open(path, header_rows).map_err(|err| Error::LoadTable {
        path: path.to_owned(),
        source: err.into(),
    })
}

/// Resolve model display names for a number of prediction sources.
///
/// Explicit names must match the source count and be unique. Without explicit
/// names, sources are named `model_0`, `model_1` and so on.
pub fn resolve_model_names(explicit: Option<&[String]>, num_sources: usize) -> Result<Vec<String>> {
    let names: Vec<String> = match explicit {
        Some(names) => {
            if names.len() != num_sources {
                return Err(Error::ModelNameCountMismatch {
                    names: names.len(),
                    files: num_sources,
                });
            }
            names.to_vec()
        }
        None => (0..num_sources).map(|index| format!("model_{}", index)).collect(),
    };

    if let Some(name) = names.iter().duplicates().next() {
        return Err(Error::DuplicateModelName { name: name.clone() });
    }

    Ok(names)
}
