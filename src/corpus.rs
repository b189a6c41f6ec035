//! Dataset-file loading for train/dev/test session splits.
//!
//! Dataset files are a single JSON object with per-split session lists:
//! `{"train": [...], "dev": [...], "test": [...]}`. Each split feeds one
//! [`DataSource`](crate::source::DataSource) construction.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::data::RawSession;
use crate::errors::SegmentError;

/// Session lists for the three standard splits. Missing splits are empty.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SplitSessions {
    /// Training sessions.
    #[serde(default)]
    pub train: Vec<RawSession>,
    /// Development sessions.
    #[serde(default)]
    pub dev: Vec<RawSession>,
    /// Test sessions.
    #[serde(default)]
    pub test: Vec<RawSession>,
}

/// Load a split dataset file.
pub fn load_dataset(path: &Path) -> Result<SplitSessions, SegmentError> {
    let file = File::open(path)?;
    let splits: SplitSessions = serde_json::from_reader(BufReader::new(file))?;
    info!(
        path = %path.display(),
        train = splits.train.len(),
        dev = splits.dev.len(),
        test = splits.test.len(),
        "dataset loaded"
    );
    Ok(splits)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn loads_all_three_splits() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "train": [{{"utterances": [{{"text": "hi", "floor": "A"}}]}}],
                "dev": [],
                "test": [{{"utterances": []}}]
            }}"#
        )
        .unwrap();

        let splits = load_dataset(file.path()).unwrap();
        assert_eq!(splits.train.len(), 1);
        assert!(splits.dev.is_empty());
        assert_eq!(splits.test.len(), 1);
        assert_eq!(splits.train[0].utterances[0].text, "hi");
    }

    #[test]
    fn missing_splits_default_to_empty() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"train": []}}"#).unwrap();
        let splits = load_dataset(file.path()).unwrap();
        assert!(splits.train.is_empty());
        assert!(splits.dev.is_empty());
        assert!(splits.test.is_empty());
    }

    #[test]
    fn malformed_json_surfaces_as_dataset_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            load_dataset(file.path()),
            Err(SegmentError::Dataset(_))
        ));
    }

    #[test]
    fn missing_file_surfaces_as_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_dataset(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, SegmentError::Io(_)));
    }
}
