//! File-backed high-score stores.
//!
//! Two formats are supported: a versioned JSON document and a one-column
//! CSV table with a `score` header. Both treat a missing file as an empty
//! table and write through a temp file followed by a rename.

use gridshot_common::{SchemaVersion, ScoreError};
use gridshot_gameplay::{HighScoreStore, HighScoreTable};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::ScoreFormat;

/// CSV column header.
const CSV_HEADER: &str = "score";

/// On-disk JSON layout.
#[derive(Debug, Serialize, Deserialize)]
struct HighScoreFile {
    version: SchemaVersion,
    scores: Vec<i64>,
}

/// Runs `write` against a temp file next to `path`, then renames it into place.
/// The temp file is removed if any step fails.
fn atomic_write(
    path: &Path,
    write: impl FnOnce(&mut BufWriter<File>) -> Result<(), ScoreError>,
) -> Result<(), ScoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let temp_path = path.with_extension("tmp");
    if let Err(e) = write_temp(&temp_path, write) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        ScoreError::Io(e)
    })?;
    debug!("Wrote high scores to {}", path.display());
    Ok(())
}

fn write_temp(
    temp_path: &Path,
    write: impl FnOnce(&mut BufWriter<File>) -> Result<(), ScoreError>,
) -> Result<(), ScoreError> {
    let mut writer = BufWriter::new(File::create(temp_path)?);
    write(&mut writer)?;
    writer.flush()?;
    Ok(())
}

/// High scores as a versioned JSON document.
#[derive(Debug, Clone)]
pub struct JsonScoreStore {
    path: PathBuf,
}

impl JsonScoreStore {
    /// Creates a store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for JsonScoreStore {
    fn load(&self) -> Result<HighScoreTable, ScoreError> {
        if !self.path.exists() {
            return Ok(HighScoreTable::new());
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let file: HighScoreFile =
            serde_json::from_reader(reader).map_err(|e| ScoreError::Serialization(e.to_string()))?;

        if !SchemaVersion::HIGH_SCORES.can_read(&file.version) {
            return Err(ScoreError::VersionMismatch {
                expected: SchemaVersion::HIGH_SCORES.to_string(),
                actual: file.version.to_string(),
            });
        }

        Ok(HighScoreTable::from_scores(file.scores))
    }

    fn save(&self, table: &HighScoreTable) -> Result<(), ScoreError> {
        let file = HighScoreFile {
            version: SchemaVersion::HIGH_SCORES,
            scores: table.scores().to_vec(),
        };
        atomic_write(&self.path, |writer| {
            serde_json::to_writer_pretty(writer, &file).map_err(|e| ScoreError::Serialization(e.to_string()))
        })
    }
}

/// High scores as a one-column CSV table.
#[derive(Debug, Clone)]
pub struct CsvScoreStore {
    path: PathBuf,
}

impl CsvScoreStore {
    /// Creates a store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parse(contents: &str) -> Result<HighScoreTable, ScoreError> {
        let mut lines = contents.lines().map(str::trim).filter(|line| !line.is_empty());
        match lines.next() {
            None => return Ok(HighScoreTable::new()),
            Some(CSV_HEADER) => {},
            Some(other) => {
                return Err(ScoreError::Serialization(format!(
                    "expected `{CSV_HEADER}` header, found `{other}`"
                )))
            },
        }

        let scores = lines
            .enumerate()
            .map(|(i, line)| {
                line.parse::<i64>().map_err(|e| {
                    ScoreError::Serialization(format!("line {}: `{line}`: {e}", i + 2))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(HighScoreTable::from_scores(scores))
    }
}

impl HighScoreStore for CsvScoreStore {
    fn load(&self) -> Result<HighScoreTable, ScoreError> {
        if !self.path.exists() {
            return Ok(HighScoreTable::new());
        }
        Self::parse(&fs::read_to_string(&self.path)?)
    }

    fn save(&self, table: &HighScoreTable) -> Result<(), ScoreError> {
        atomic_write(&self.path, |writer| {
            writeln!(writer, "{CSV_HEADER}")?;
            for score in table.scores() {
                writeln!(writer, "{score}")?;
            }
            Ok(())
        })
    }
}

/// Opens the store matching a configured format.
pub fn open_store(format: ScoreFormat, path: impl Into<PathBuf>) -> Box<dyn HighScoreStore> {
    match format {
        ScoreFormat::Json => Box::new(JsonScoreStore::new(path)),
        ScoreFormat::Csv => Box::new(CsvScoreStore::new(path)),
    }
}
