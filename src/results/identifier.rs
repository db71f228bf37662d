//! Session identifiers
//!
//! A session is a directory under the results root carrying a `dirmeta.json`
//! with the timestamp fields and the user-supplied label of the run.

use serde::Deserialize;
use std::cmp::Ordering;
use std::fmt;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::Path;

use crate::consts::DIRMETA_FILE;
use crate::error::ResultsError;

#[derive(Debug, Deserialize)]
struct DirMeta {
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
    label: String,
}

/// Identifier of one performance analysis session.
///
/// The timestamp fields are kept exactly as stored in `dirmeta.json`; the
/// profiler writes them, the viewer only displays and compares them.
/// Equality and hashing go by the raw directory name ("value"); ordering is
/// reverse-chronological with the label and the value as tiebreakers, so a
/// sorted listing shows the newest session first.
#[derive(Debug, Clone)]
pub(crate) struct Identifier {
    label: String,
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
    value: String,
}

impl Identifier {
    /// Read the `dirmeta.json` of a session directory. All timestamp fields
    /// must be present and integer-typed; their values are taken verbatim.
    pub(crate) fn from_dir(dir: &Path) -> Result<Self, ResultsError> {
        let meta_path = dir.join(DIRMETA_FILE);
        if !meta_path.exists() {
            return Err(ResultsError::MetadataMissing { path: meta_path });
        }

        let content = fs::read_to_string(&meta_path)?;
        let meta: DirMeta =
            serde_json::from_str(&content).map_err(|e| ResultsError::MetadataInvalid {
                path: meta_path.clone(),
                reason: e.to_string(),
            })?;

        let value = dir
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();

        Ok(Self {
            label: meta.label,
            year: meta.year,
            month: meta.month,
            day: meta.day,
            hour: meta.hour,
            minute: meta.minute,
            second: meta.second,
            value,
        })
    }

    pub(crate) fn label(&self) -> &str {
        &self.label
    }

    pub(crate) fn year(&self) -> i32 {
        self.year
    }

    pub(crate) fn month(&self) -> u32 {
        self.month
    }

    pub(crate) fn day(&self) -> u32 {
        self.day
    }

    pub(crate) fn hour(&self) -> u32 {
        self.hour
    }

    pub(crate) fn minute(&self) -> u32 {
        self.minute
    }

    pub(crate) fn second(&self) -> u32 {
        self.second
    }

    /// The raw directory name this identifier was read from.
    pub(crate) fn value(&self) -> &str {
        &self.value
    }

    /// The timestamp fields as one zero-padded string.
    pub(crate) fn date_time(&self) -> String {
        format!(
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year(),
            self.month(),
            self.day(),
            self.hour(),
            self.minute(),
            self.second()
        )
    }

    fn sort_key(&self) -> (i32, u32, u32, u32, u32, u32) {
        (
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
        )
    }
}

impl fmt::Display for Identifier {
    /// User-friendly form: `<label> (<year>-<month>-<day> <hour>:<minute>:<second>)`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.date_time())
    }
}

impl PartialEq for Identifier {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Identifier {}

impl Hash for Identifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl Ord for Identifier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .sort_key()
            .cmp(&self.sort_key())
            .then_with(|| self.label.cmp(&other.label))
            .then_with(|| self.value.cmp(&other.value))
    }
}

impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn meta_json(year: i32, month: u32, day: u32, label: &str) -> String {
        format!(
            r#"{{"year": {year}, "month": {month}, "day": {day},
                "hour": 15, "minute": 18, "second": 33, "label": "{label}"}}"#
        )
    }

    fn write_session(root: &Path, folder: &str, meta: &str) -> std::path::PathBuf {
        let dir = root.join(folder);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("dirmeta.json"), meta).unwrap();
        dir
    }

    #[test]
    fn well_formed_metadata_round_trips() {
        let root = tempfile::tempdir().unwrap();
        let dir = write_session(root.path(), "run1", &meta_json(2023, 10, 11, "test"));

        let id = Identifier::from_dir(&dir).unwrap();
        assert_eq!(id.to_string(), "test (2023-10-11 15:18:33)");
        assert_eq!(id.year(), 2023);
        assert_eq!(id.month(), 10);
        assert_eq!(id.day(), 11);
        assert_eq!(id.hour(), 15);
        assert_eq!(id.minute(), 18);
        assert_eq!(id.second(), 33);
        assert_eq!(id.label(), "test");
        assert_eq!(id.value(), "run1");
    }

    #[test]
    fn display_zero_pads_fields() {
        let root = tempfile::tempdir().unwrap();
        let dir = write_session(
            root.path(),
            "run2",
            r#"{"year": 2024, "month": 3, "day": 5,
               "hour": 7, "minute": 4, "second": 9, "label": "short"}"#,
        );

        let id = Identifier::from_dir(&dir).unwrap();
        assert_eq!(id.to_string(), "short (2024-03-05 07:04:09)");
    }

    #[test]
    fn out_of_range_fields_are_kept_verbatim() {
        let root = tempfile::tempdir().unwrap();
        // a leap second, as some profiler clocks emit
        let dir = write_session(
            root.path(),
            "run-leap",
            r#"{"year": 2016, "month": 12, "day": 31,
               "hour": 23, "minute": 59, "second": 60, "label": "leap"}"#,
        );
        let id = Identifier::from_dir(&dir).unwrap();
        assert_eq!(id.second(), 60);
        assert_eq!(id.to_string(), "leap (2016-12-31 23:59:60)");

        let dir = write_session(root.path(), "run-odd", &meta_json(2023, 13, 40, "odd"));
        let id = Identifier::from_dir(&dir).unwrap();
        assert_eq!(id.to_string(), "odd (2023-13-40 15:18:33)");
    }

    #[test]
    fn missing_metadata_file_is_an_error() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("empty");
        fs::create_dir(&dir).unwrap();
        assert!(matches!(
            Identifier::from_dir(&dir),
            Err(ResultsError::MetadataMissing { .. })
        ));
    }

    #[test]
    fn missing_field_is_an_error() {
        let root = tempfile::tempdir().unwrap();
        let dir = write_session(
            root.path(),
            "run3",
            r#"{"year": 2023, "month": 10, "day": 11, "hour": 15, "minute": 18, "label": "x"}"#,
        );
        assert!(matches!(
            Identifier::from_dir(&dir),
            Err(ResultsError::MetadataInvalid { .. })
        ));
    }

    #[test]
    fn wrong_field_type_is_an_error() {
        let root = tempfile::tempdir().unwrap();
        let dir = write_session(
            root.path(),
            "run4",
            r#"{"year": "2023", "month": 10, "day": 11,
               "hour": 15, "minute": 18, "second": 33, "label": "x"}"#,
        );
        assert!(matches!(
            Identifier::from_dir(&dir),
            Err(ResultsError::MetadataInvalid { .. })
        ));

        let dir = write_session(
            root.path(),
            "run5",
            r#"{"year": 2023, "month": -1, "day": 11,
               "hour": 15, "minute": 18, "second": 33, "label": "x"}"#,
        );
        assert!(matches!(
            Identifier::from_dir(&dir),
            Err(ResultsError::MetadataInvalid { .. })
        ));
    }

    #[test]
    fn equality_and_hash_go_by_value() {
        use std::collections::HashSet;

        let root = tempfile::tempdir().unwrap();
        let a = Identifier::from_dir(&write_session(
            root.path(),
            "same",
            &meta_json(2023, 1, 1, "a"),
        ))
        .unwrap();
        let b = Identifier::from_dir(&write_session(
            root.path(),
            "same",
            &meta_json(2024, 2, 2, "b"),
        ))
        .unwrap();
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn sorting_is_descending_timestamp_then_ascending_label() {
        let root = tempfile::tempdir().unwrap();
        let old = Identifier::from_dir(&write_session(
            root.path(),
            "old",
            &meta_json(2022, 5, 1, "zeta"),
        ))
        .unwrap();
        let newer_b = Identifier::from_dir(&write_session(
            root.path(),
            "newer-b",
            &meta_json(2023, 5, 1, "beta"),
        ))
        .unwrap();
        let newer_a = Identifier::from_dir(&write_session(
            root.path(),
            "newer-a",
            &meta_json(2023, 5, 1, "alpha"),
        ))
        .unwrap();

        let mut ids = vec![old.clone(), newer_b.clone(), newer_a.clone()];
        ids.sort();
        assert_eq!(
            ids.iter().map(Identifier::value).collect::<Vec<_>>(),
            vec!["newer-a", "newer-b", "old"]
        );

        // total order: same timestamp and label fall back to the value
        assert_eq!(newer_a.cmp(&newer_a.clone()), Ordering::Equal);
        assert!(newer_a < newer_b);
        assert!(newer_b < old);
    }
}
