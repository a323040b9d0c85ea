// Dataset file storage - owns the CSV representation of a labeled dataset
//
// Every append rewrites the whole file. Datasets stay in the hundreds to low
// thousands of rows; an append-only writer is the upgrade path if that changes.

use crate::models::dataset::{
    CaptureError, CaptureResult, Dataset, SampleRow, Schema, LANDMARK_VALUES, SCHEMA_WIDTH,
};
use std::fs::{File, Permissions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A dataset bound to the file it persists to
#[derive(Debug)]
pub struct DatasetStore {
    path: PathBuf,
    dataset: Dataset,
}

impl DatasetStore {
    /// Write a header-only file at `path` and bind an empty dataset to it
    pub fn create(path: impl Into<PathBuf>) -> CaptureResult<Self> {
        let path = path.into();
        let dataset = Dataset::new();

        write_dataset(&path, &dataset)?;
        tracing::info!(path = %path.display(), "Created dataset file");

        Ok(Self { path, dataset })
    }

    /// Parse an existing dataset file, checking its header against the schema
    pub fn open(path: impl Into<PathBuf>) -> CaptureResult<Self> {
        let path = path.into();
        let dataset = read_dataset(&path)?;
        tracing::info!(path = %path.display(), rows = dataset.len(), "Loaded dataset file");

        Ok(Self { path, dataset })
    }

    /// Append a row and persist the whole dataset.
    ///
    /// If the file cannot be written the row is dropped again, so memory and
    /// disk never disagree, and the previous file is left as it was.
    pub fn append(&mut self, row: SampleRow) -> CaptureResult<()> {
        self.dataset.push(row);

        if let Err(e) = write_dataset(&self.path, &self.dataset) {
            self.dataset.pop();
            tracing::error!(path = %self.path.display(), error = %e, "Failed to persist dataset");
            return Err(e);
        }

        tracing::debug!(path = %self.path.display(), rows = self.dataset.len(), "Appended sample");
        Ok(())
    }

    /// Write a full snapshot to `target` without changing the bound path
    pub fn backup(&self, target: &Path) -> CaptureResult<()> {
        write_dataset(target, &self.dataset)?;
        tracing::info!(
            source = %self.path.display(),
            target = %target.display(),
            rows = self.dataset.len(),
            "Backed up dataset"
        );
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }
}

// ==============================================================================
// CSV encoding
// ==============================================================================

/// Write `dataset` to a temp file next to `path`, then rename it into place.
/// The temp file is removed on every early return.
fn write_dataset(path: &Path, dataset: &Dataset) -> CaptureResult<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&parent).map_err(|e| CaptureError::file_system(&parent, e))?;

    let mut tmp = NamedTempFile::new_in(&parent).map_err(|e| CaptureError::file_system(&parent, e))?;

    {
        let mut writer = csv::Writer::from_writer(&mut tmp);

        // Leading unnamed index column
        let header = std::iter::once("").chain(Schema::columns().iter().map(String::as_str));
        writer
            .write_record(header)
            .map_err(|e| CaptureError::file_system(path, e.into()))?;

        for (index, row) in dataset.rows().iter().enumerate() {
            let record = std::iter::once(index.to_string()).chain(row.to_record());
            writer
                .write_record(record)
                .map_err(|e| CaptureError::file_system(path, e.into()))?;
        }

        writer.flush().map_err(|e| CaptureError::file_system(path, e))?;
    }

    tmp.flush().map_err(|e| CaptureError::file_system(path, e))?;
    if let Some(permissions) = target_permissions(path)? {
        tmp.as_file()
            .set_permissions(permissions)
            .map_err(|e| CaptureError::file_system(path, e))?;
    }
    tmp.as_file()
        .sync_all()
        .map_err(|e| CaptureError::file_system(path, e))?;
    tmp.persist(path)
        .map_err(|e| CaptureError::file_system(path, e.error))?;

    Ok(())
}

/// Permissions the rewritten file should carry: the existing file's, or the
/// usual mode for a new data file. Temp files are created owner-only.
fn target_permissions(path: &Path) -> CaptureResult<Option<Permissions>> {
    match std::fs::metadata(path) {
        Ok(metadata) => Ok(Some(metadata.permissions())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(new_file_permissions()),
        Err(e) => Err(CaptureError::file_system(path, e)),
    }
}

#[cfg(unix)]
fn new_file_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(0o644))
}

// Only the read-only flag exists here, and temp files are writable already
#[cfg(not(unix))]
fn new_file_permissions() -> Option<Permissions> {
    None
}

fn read_dataset(path: &Path) -> CaptureResult<Dataset> {
    let file = File::open(path).map_err(|e| CaptureError::file_system(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(file);

    let header = reader.headers().map_err(|e| read_error(path, e))?.clone();
    if header.is_empty() {
        return Err(CaptureError::file_format(path, "missing header row"));
    }

    // The first header cell names the index column and is not part of the schema
    if let Some(detail) = Schema::mismatch(header.iter().skip(1)) {
        return Err(CaptureError::SchemaMismatch {
            path: path.to_path_buf(),
            detail,
        });
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| read_error(path, e))?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        rows.push(parse_row(path, line, &record)?);
    }

    Ok(Dataset::from_rows(rows))
}

fn parse_row(path: &Path, line: u64, record: &csv::StringRecord) -> CaptureResult<SampleRow> {
    if record.len() != SCHEMA_WIDTH + 1 {
        return Err(CaptureError::file_format(
            path,
            format!("line {}: expected {} fields, found {}", line, SCHEMA_WIDTH + 1, record.len()),
        ));
    }

    let number = |i: usize| -> CaptureResult<f64> {
        let cell = record[i].trim();
        cell.parse::<f64>().map_err(|_| {
            CaptureError::file_format(
                path,
                format!("line {}: column {} is not a number: {:?}", line, Schema::columns()[i - 1], cell),
            )
        })
    };

    let mut landmarks = [0.0f64; LANDMARK_VALUES];
    let mut world_landmarks = [0.0f64; LANDMARK_VALUES];
    for j in 0..LANDMARK_VALUES {
        landmarks[j] = number(1 + j)?;
        world_landmarks[j] = number(1 + LANDMARK_VALUES + j)?;
    }
    let handedness = number(1 + 2 * LANDMARK_VALUES)?;
    let letter = record[SCHEMA_WIDTH].to_string();

    Ok(SampleRow {
        landmarks,
        world_landmarks,
        handedness,
        letter,
    })
}

fn read_error(path: &Path, err: csv::Error) -> CaptureError {
    let reason = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => CaptureError::file_system(path, source),
        _ => CaptureError::file_format(path, reason),
    }
}
