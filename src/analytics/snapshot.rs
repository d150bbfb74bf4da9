use crate::AnteaterError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// The page with the most tokens seen so far
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LongestPage {
    pub url: Option<String>,
    pub word_count: u64,
}

/// Point-in-time copy of the crawl analytics
///
/// Serialized as a JSON object with exactly these four keys. Maps are
/// ordered and `unique_urls` is sorted so consecutive snapshots diff cleanly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub unique_urls: Vec<String>,
    pub word_freq: BTreeMap<String, u64>,
    pub subdomains: BTreeMap<String, u64>,
    pub longest_page: LongestPage,
}

/// Destination for analytics snapshots
pub trait SnapshotSink: Send + Sync {
    /// Persists a snapshot, replacing any previous one
    fn write(&self, snapshot: &AnalyticsSnapshot) -> Result<(), AnteaterError>;

    /// Human-readable location, for logs
    fn describe(&self) -> String;
}

/// Writes snapshots as pretty-printed JSON to a fixed path
#[derive(Debug, Clone)]
pub struct JsonSnapshotWriter {
    path: PathBuf,
}

impl JsonSnapshotWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotSink for JsonSnapshotWriter {
    /// Creates the parent directory if needed, writes to a temporary file
    /// next to the target and renames it into place.
    fn write(&self, snapshot: &AnalyticsSnapshot) -> Result<(), AnteaterError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        {
            let mut writer = BufWriter::new(File::create(&tmp_path)?);
            serde_json::to_writer_pretty(&mut writer, snapshot)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        fs::rename(&tmp_path, &self.path)?;

        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Reads a snapshot previously written by [`JsonSnapshotWriter`]
pub fn load_snapshot(path: &Path) -> Result<AnalyticsSnapshot, AnteaterError> {
    let file = File::open(path)?;
    let snapshot = serde_json::from_reader(BufReader::new(file))?;
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> AnalyticsSnapshot {
        AnalyticsSnapshot {
            unique_urls: vec!["https://www.ics.uci.edu/".to_string()],
            word_freq: BTreeMap::from([("irvine".to_string(), 3), ("zot".to_string(), 1)]),
            subdomains: BTreeMap::from([("www.ics.uci.edu".to_string(), 1)]),
            longest_page: LongestPage {
                url: Some("https://www.ics.uci.edu/".to_string()),
                word_count: 4,
            },
        }
    }

    #[test]
    fn test_json_layout() {
        let value = serde_json::to_value(sample()).unwrap();
        let object = value.as_object().unwrap();

        let mut keys: Vec<_> = object.keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["longest_page", "subdomains", "unique_urls", "word_freq"]);
        assert_eq!(value["word_freq"]["irvine"], 3);
        assert_eq!(value["longest_page"]["word_count"], 4);
    }

    #[test]
    fn test_empty_longest_page_is_null() {
        let value = serde_json::to_value(AnalyticsSnapshot::default()).unwrap();
        assert!(value["longest_page"]["url"].is_null());
        assert_eq!(value["longest_page"]["word_count"], 0);
    }

    #[test]
    fn test_writer_creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("analytics").join("nested").join("stats.json");
        let writer = JsonSnapshotWriter::new(&path);

        writer.write(&sample()).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
        assert_eq!(load_snapshot(&path).unwrap(), sample());
    }

    #[test]
    fn test_writer_overwrites_wholesale() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stats.json");
        let writer = JsonSnapshotWriter::new(&path);

        writer.write(&sample()).unwrap();
        writer.write(&AnalyticsSnapshot::default()).unwrap();

        let loaded = load_snapshot(&path).unwrap();
        assert!(loaded.unique_urls.is_empty());
        assert!(loaded.word_freq.is_empty());
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let result = load_snapshot(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(AnteaterError::Io(_))));
    }
}
