//! Train/test/validation split tags of labeled images.

use crate::common::*;

/// The split an image belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Train,
    Test,
    Validation,
    /// The image was not used in any split.
    Unused,
}

impl Tag {
    pub fn parse(text: &str) -> Option<Self> {
        let tag = match text {
            "train" => Self::Train,
            "test" => Self::Test,
            "validation" => Self::Validation,
            "unused" => Self::Unused,
            _ => return None,
        };
        Some(tag)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Test => "test",
            Self::Validation => "validation",
            Self::Unused => "unused",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check if a raw cell is the zero marker written for images left out of every split.
///
/// The exporter writes the marker as a floating-point zero, so any cell that
/// parses to numeric zero counts ("0.0", "0", "0.00").
pub fn is_unused_marker(raw: &str) -> bool {
    matches!(raw.trim().parse::<f64>(), Ok(value) if value == 0.0)
}

/// Replace the zero marker by the literal "unused".
pub fn substitute_unused<S>(raw_tags: &[S]) -> Vec<String>
where
    S: AsRef<str>,
{
    raw_tags
        .iter()
        .map(|raw| {
            let raw = raw.as_ref();
            if is_unused_marker(raw) {
                Tag::Unused.as_str().to_owned()
            } else {
                raw.to_owned()
            }
        })
        .collect()
}

/// Substitute and validate the split-tag column of a prediction table.
///
/// The distinct values must be exactly {train, test, validation}, or exactly
/// {train, test, validation, unused}.
pub fn validate_tags<S>(raw_tags: &[S]) -> Result<Vec<Tag>>
where
    S: AsRef<str>,
{
    let tags = substitute_unused(raw_tags);
    let distinct: BTreeSet<&str> = tags.iter().map(String::as_str).collect();

    let required = [Tag::Train, Tag::Test, Tag::Validation];
    let has_required = required.iter().all(|tag| distinct.contains(tag.as_str()));
    let allowed_len = if distinct.contains(Tag::Unused.as_str()) {
        required.len() + 1
    } else {
        required.len()
    };

    if !has_required || distinct.len() != allowed_len {
        return Err(Error::InvalidTagSet {
            found: distinct.into_iter().map(ToOwned::to_owned).collect(),
        });
    }

    let tags = tags
        .iter()
        .map(|tag| {
            Tag::parse(tag).ok_or_else(|| Error::InvalidTagSet {
                found: vec![tag.clone()],
            })
        })
        .try_collect()?;
    Ok(tags)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitute_zero_marker() {
        let tags = substitute_unused(&["train", "test", "0.0", "validation"]);
        assert_eq!(tags, ["train", "test", "unused", "validation"]);

        let tags = validate_tags(&["train", "test", "0.0", "validation"]).unwrap();
        assert_eq!(tags, [Tag::Train, Tag::Test, Tag::Unused, Tag::Validation]);
    }

    #[test]
    fn zero_marker_variants() {
        assert!(is_unused_marker("0.0"));
        assert!(is_unused_marker("0"));
        assert!(is_unused_marker(" 0.00 "));
        assert!(!is_unused_marker("1.0"));
        assert!(!is_unused_marker(""));
        assert!(!is_unused_marker("train"));
    }

    #[test]
    fn accept_exact_tag_sets() {
        assert!(validate_tags(&["validation", "train", "test", "train"]).is_ok());
        assert!(validate_tags(&["validation", "train", "test", "unused"]).is_ok());
        assert!(validate_tags(&["validation", "train", "test", "0.0", "0"]).is_ok());
    }

    #[test]
    fn reject_other_tag_sets() {
        let reject = |tags: &[&str]| {
            matches!(validate_tags(tags), Err(Error::InvalidTagSet { .. }))
        };

        // missing split
        assert!(reject(&["train", "test"]));
        assert!(reject(&["train", "test", "unused"]));
        // foreign value
        assert!(reject(&["train", "test", "validation", "holdout"]));
        assert!(reject(&["train", "test", "validation", "1.0"]));
        // case matters
        assert!(reject(&["Train", "test", "validation"]));
        assert!(reject(&[]));
    }

    #[test]
    fn report_distinct_values() {
        match validate_tags(&["train", "extra", "train"]) {
            Err(Error::InvalidTagSet { found }) => assert_eq!(found, ["extra", "train"]),
            other => panic!("unexpected result {:?}", other),
        }
    }
}
