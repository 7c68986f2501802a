pub use anyhow::{bail, ensure, format_err, Context as _, Error, Result};
pub use indexmap::IndexMap;
pub use itertools::Itertools as _;
pub use log::debug;
pub use serde::{Deserialize, Serialize};
pub use std::{
    convert::TryFrom,
    fmt,
    fs::File,
    io::Read,
    path::Path,
};
