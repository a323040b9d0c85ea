// Data models for the labeled hand-sign dataset: schema, rows, labels, counts

use crate::models::pose::HAND_LANDMARK_COUNT;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::OnceLock;

/// Values contributed by one landmark group (21 keypoints x 3 axes)
pub const LANDMARK_VALUES: usize = HAND_LANDMARK_COUNT * 3;

/// Columns in a sample row: local group, world group, handedness, letter
pub const SCHEMA_WIDTH: usize = LANDMARK_VALUES * 2 + 2;

// ==============================================================================
// Sign Labels
// ==============================================================================

/// Static hand-sign letters. `j` and `z` are spelled with motion and cannot
/// be captured from a single pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignLabel {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
}

impl SignLabel {
    /// The full alphabet in display order
    pub const ALL: [SignLabel; 24] = [
        SignLabel::A,
        SignLabel::B,
        SignLabel::C,
        SignLabel::D,
        SignLabel::E,
        SignLabel::F,
        SignLabel::G,
        SignLabel::H,
        SignLabel::I,
        SignLabel::K,
        SignLabel::L,
        SignLabel::M,
        SignLabel::N,
        SignLabel::O,
        SignLabel::P,
        SignLabel::Q,
        SignLabel::R,
        SignLabel::S,
        SignLabel::T,
        SignLabel::U,
        SignLabel::V,
        SignLabel::W,
        SignLabel::X,
        SignLabel::Y,
    ];

    pub fn code(&self) -> char {
        match self {
            SignLabel::A => 'a',
            SignLabel::B => 'b',
            SignLabel::C => 'c',
            SignLabel::D => 'd',
            SignLabel::E => 'e',
            SignLabel::F => 'f',
            SignLabel::G => 'g',
            SignLabel::H => 'h',
            SignLabel::I => 'i',
            SignLabel::K => 'k',
            SignLabel::L => 'l',
            SignLabel::M => 'm',
            SignLabel::N => 'n',
            SignLabel::O => 'o',
            SignLabel::P => 'p',
            SignLabel::Q => 'q',
            SignLabel::R => 'r',
            SignLabel::S => 's',
            SignLabel::T => 't',
            SignLabel::U => 'u',
            SignLabel::V => 'v',
            SignLabel::W => 'w',
            SignLabel::X => 'x',
            SignLabel::Y => 'y',
        }
    }

    /// Parse a single-character label code. Only the lowercase codes are valid.
    pub fn from_code(code: char) -> CaptureResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|label| label.code() == code)
            .ok_or_else(|| CaptureError::InvalidLabel(code.to_string()))
    }
}

impl FromStr for SignLabel {
    type Err = CaptureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(code), None) => Self::from_code(code),
            _ => Err(CaptureError::InvalidLabel(s.to_string())),
        }
    }
}

impl fmt::Display for SignLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ==============================================================================
// Schema
// ==============================================================================

/// The fixed column layout every dataset file shares
pub struct Schema;

impl Schema {
    /// `landmark_{0..20}.{x,y,z}`, `world_landmark_{0..20}.{x,y,z}`,
    /// `handedness`, `letter`
    pub fn columns() -> &'static [String] {
        static COLUMNS: OnceLock<Vec<String>> = OnceLock::new();
        COLUMNS.get_or_init(|| {
            let mut columns = Vec::with_capacity(SCHEMA_WIDTH);
            for prefix in ["landmark", "world_landmark"] {
                for i in 0..HAND_LANDMARK_COUNT {
                    for axis in ["x", "y", "z"] {
                        columns.push(format!("{}_{}.{}", prefix, i, axis));
                    }
                }
            }
            columns.push("handedness".to_string());
            columns.push("letter".to_string());
            columns
        })
    }

    /// Describe the first difference between `header` and the schema, if any
    pub fn mismatch<'a, I>(header: I) -> Option<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let header: Vec<&str> = header.into_iter().collect();
        let expected = Self::columns();

        for (i, column) in expected.iter().enumerate() {
            match header.get(i) {
                Some(found) if *found == column.as_str() => continue,
                Some(found) => {
                    return Some(format!(
                        "column {} is '{}', expected '{}'",
                        i, found, column
                    ))
                }
                None => {
                    return Some(format!(
                        "header has {} columns, expected {}",
                        header.len(),
                        expected.len()
                    ))
                }
            }
        }

        if header.len() > expected.len() {
            return Some(format!(
                "header has {} columns, expected {}",
                header.len(),
                expected.len()
            ));
        }

        None
    }
}

// ==============================================================================
// Sample Rows
// ==============================================================================

/// One persisted capture, in schema order
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRow {
    pub landmarks: [f64; LANDMARK_VALUES],
    pub world_landmarks: [f64; LANDMARK_VALUES],
    pub handedness: f64,
    pub letter: String,
}

impl SampleRow {
    /// Schema-ordered cells, without the index column
    pub fn to_record(&self) -> Vec<String> {
        let mut record = Vec::with_capacity(SCHEMA_WIDTH);
        record.extend(self.landmarks.iter().map(|v| v.to_string()));
        record.extend(self.world_landmarks.iter().map(|v| v.to_string()));
        record.push(self.handedness.to_string());
        record.push(self.letter.clone());
        record
    }

    /// The label when it belongs to the sign alphabet
    pub fn sign_label(&self) -> Option<SignLabel> {
        self.letter.parse().ok()
    }
}

/// In-memory dataset. Rows are only ever appended.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    rows: Vec<SampleRow>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<SampleRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[SampleRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub(crate) fn push(&mut self, row: SampleRow) {
        self.rows.push(row);
    }

    pub(crate) fn pop(&mut self) -> Option<SampleRow> {
        self.rows.pop()
    }
}

// ==============================================================================
// Statistics
// ==============================================================================

/// Per-label row counts shown next to the label buttons
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelStatistics {
    pub counts: BTreeMap<SignLabel, usize>,
    pub total_rows: usize,
    pub unrecognized_rows: usize, // Rows whose letter is outside the alphabet
}

impl LabelStatistics {
    /// Every label present with a zero count
    pub fn zeroed() -> Self {
        Self {
            counts: SignLabel::ALL.iter().map(|label| (*label, 0)).collect(),
            total_rows: 0,
            unrecognized_rows: 0,
        }
    }

    pub fn count(&self, label: SignLabel) -> usize {
        self.counts.get(&label).copied().unwrap_or(0)
    }
}

impl Default for LabelStatistics {
    fn default() -> Self {
        Self::zeroed()
    }
}

// ==============================================================================
// Error Types
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("No dataset file is bound")]
    NotBound,

    #[error("Schema mismatch in {path}: {detail}")]
    SchemaMismatch { path: PathBuf, detail: String },

    #[error("Malformed dataset file {path}: {reason}")]
    FileFormat { path: PathBuf, reason: String },

    #[error("File system error on {path}: {source}")]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No hand detected in the latest frame")]
    NoHandDetected,

    #[error("No detection has been produced yet")]
    NotReady,

    #[error("Invalid label: {0:?}")]
    InvalidLabel(String),

    #[error("No dataset loaded")]
    NoDataset,
}

pub type CaptureResult<T> = Result<T, CaptureError>;

impl CaptureError {
    pub(crate) fn file_system(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CaptureError::FileSystem {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn file_format(path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        CaptureError::FileFormat {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// The message box the UI should raise for this error
    pub fn notification(&self) -> Notification {
        let (title, message) = match self {
            CaptureError::NotBound | CaptureError::NoDataset => (
                "DataFrame Error",
                "Error: No DataFrame loaded! Create new file or load an existing one!".to_string(),
            ),
            CaptureError::SchemaMismatch { .. } | CaptureError::FileFormat { .. } => {
                ("Dataset File Error", format!("Error: {}", self))
            }
            CaptureError::FileSystem { .. } => ("File Error", format!("Error: {}", self)),
            CaptureError::NoHandDetected | CaptureError::NotReady => {
                ("Detection Error", format!("Error: {}!", self))
            }
            CaptureError::InvalidLabel(_) => ("Label Error", format!("Error: {}", self)),
        };

        Notification {
            title: title.to_string(),
            message,
        }
    }
}

/// User-visible error popup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphabet_excludes_motion_letters() {
        assert_eq!(SignLabel::ALL.len(), 24);
        assert!(SignLabel::from_code('j').is_err());
        assert!(SignLabel::from_code('z').is_err());
        assert_eq!(SignLabel::from_code('k').unwrap(), SignLabel::K);
        assert!(matches!(
            SignLabel::from_code('K'),
            Err(CaptureError::InvalidLabel(s)) if s == "K"
        ));
    }

    #[test]
    fn test_label_parsing() {
        assert_eq!("y".parse::<SignLabel>().unwrap(), SignLabel::Y);
        assert!(matches!(
            "ab".parse::<SignLabel>(),
            Err(CaptureError::InvalidLabel(s)) if s == "ab"
        ));
        assert!("".parse::<SignLabel>().is_err());
        assert!("1".parse::<SignLabel>().is_err());
        assert!("A".parse::<SignLabel>().is_err());
    }

    #[test]
    fn test_alphabet_is_sorted_by_code() {
        let codes: String = SignLabel::ALL.iter().map(|l| l.code()).collect();
        assert_eq!(codes, "abcdefghiklmnopqrstuvwxy");
        let mut sorted = SignLabel::ALL;
        sorted.sort();
        assert_eq!(sorted, SignLabel::ALL);
    }

    #[test]
    fn test_schema_columns() {
        let columns = Schema::columns();
        assert_eq!(columns.len(), SCHEMA_WIDTH);
        assert_eq!(columns.len(), 128);
        assert_eq!(columns[0], "landmark_0.x");
        assert_eq!(columns[62], "landmark_20.z");
        assert_eq!(columns[63], "world_landmark_0.x");
        assert_eq!(columns[125], "world_landmark_20.z");
        assert_eq!(columns[126], "handedness");
        assert_eq!(columns[127], "letter");
    }

    #[test]
    fn test_schema_mismatch_detection() {
        let exact: Vec<&str> = Schema::columns().iter().map(String::as_str).collect();
        assert!(Schema::mismatch(exact.iter().copied()).is_none());

        let mut swapped = exact.clone();
        swapped.swap(0, 1);
        let detail = Schema::mismatch(swapped.iter().copied()).unwrap();
        assert!(detail.contains("column 0"));

        let short = &exact[..127];
        assert!(Schema::mismatch(short.iter().copied()).is_some());

        let mut long = exact.clone();
        long.push("extra");
        assert!(Schema::mismatch(long.iter().copied()).is_some());
    }

    #[test]
    fn test_statistics_zeroed() {
        let stats = LabelStatistics::zeroed();
        assert_eq!(stats.counts.len(), 24);
        assert!(SignLabel::ALL.iter().all(|l| stats.count(*l) == 0));
    }

    #[test]
    fn test_statistics_serialize_with_letter_keys() {
        let json = serde_json::to_value(LabelStatistics::zeroed()).unwrap();
        assert_eq!(json["counts"]["a"], 0);
        assert_eq!(json["counts"]["y"], 0);
    }

    #[test]
    fn test_not_bound_notification() {
        let note = CaptureError::NotBound.notification();
        assert_eq!(note.title, "DataFrame Error");
        assert!(note.message.contains("No DataFrame loaded"));
    }
}
