pub use crate::error::{Error, Result};
pub use indexmap::IndexMap;
pub use itertools::{izip, Itertools as _};
pub use keypoint_table::{
    HeaderRows, KeypointReading, KeypointTable, TableSchema, RESERVED_COLUMN,
};
pub use log::{debug, info, warn};
pub use serde::{Deserialize, Serialize};
pub use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    fs,
    iter::{self, FromIterator},
    num::NonZeroUsize,
    path::{Path, PathBuf},
};
