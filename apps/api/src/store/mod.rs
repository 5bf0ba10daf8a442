//! Flat-file job store.
//!
//! Listings live at `<root>/<category>/Job_<id>.txt`. The whole tree is read
//! once at startup into an in-memory collection; new listings are written to
//! disk and appended. There is no update or delete.

pub mod codec;

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::models::record::{NewJob, Record};

/// Finder metadata that shows up in folders copied from macOS.
const SKIPPED_ENTRIES: &[&str] = &[".DS_Store"];

/// Filter value that selects every listing.
pub const ALL_CATEGORIES: &str = "All";

const ID_WIDTH: usize = 5;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error at {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("Malformed line {line} in {}: expected '<field>: <value>'", path.display())]
    MalformedLine { path: PathBuf, line: usize },

    #[error("File name {} does not carry a numeric Job_<id>", path.display())]
    InvalidFileName { path: PathBuf },

    #[error("Invalid category '{0}': must be a single folder name")]
    InvalidCategory(String),

    #[error("No job IDs left after {0}")]
    IdExhausted(u64),
}

/// The in-memory collection of listings plus the folder tree backing it.
#[derive(Debug)]
pub struct JobStore {
    root: PathBuf,
    records: Vec<Record>,
    /// Highest numeric ID seen so far, loaded or appended.
    max_id: u64,
}

impl JobStore {
    /// Reads every listing under `root`, depth-first in file-name order.
    ///
    /// Each file takes the name of its immediate parent folder as `Category`;
    /// files directly under `root` get an empty category. Files not named
    /// `Job_<digits>.*` are skipped; any unreadable or malformed listing
    /// aborts the load.
    pub fn load(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(StoreError::Io {
                path: root,
                source: io::Error::new(io::ErrorKind::NotFound, "data directory not found"),
            });
        }

        let mut store = JobStore {
            root,
            records: Vec::new(),
            max_id: 0,
        };
        for record in walk(&store.root)? {
            store.append(record);
        }

        if store.is_empty() {
            warn!("No job listings found under {}", store.root.display());
        } else {
            info!(
                "Loaded {} job listings from {}",
                store.len(),
                store.root.display()
            );
        }
        Ok(store)
    }

    pub fn list(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First listing whose numeric ID equals `id`.
    pub fn get(&self, id: u64) -> Option<&Record> {
        self.records.iter().find(|r| r.numeric_id() == Some(id))
    }

    /// Adds a listing to the in-memory collection only.
    pub fn append(&mut self, record: Record) {
        if let Some(id) = record.numeric_id() {
            self.max_id = self.max_id.max(id);
        }
        self.records.push(record);
    }

    /// The ID the next created listing will receive, zero-padded to width 5.
    pub fn next_id(&self) -> Result<String, StoreError> {
        let next = self
            .max_id
            .checked_add(1)
            .ok_or(StoreError::IdExhausted(self.max_id))?;
        Ok(format!("{:0width$}", next, width = ID_WIDTH))
    }

    /// Assigns an ID, writes the listing to disk and appends it.
    pub fn create(&mut self, job: NewJob) -> Result<Record, StoreError> {
        let record = job.into_record(self.next_id()?);
        self.save(&record)?;
        self.append(record.clone());
        Ok(record)
    }

    /// Writes `record` to `<root>/<Category>/Job_<ID>.txt`, creating the
    /// category folder if needed.
    pub fn save(&self, record: &Record) -> Result<PathBuf, StoreError> {
        let category = record.category();
        validate_category(category)?;

        let folder = self.root.join(category);
        if !folder.exists() {
            fs::create_dir_all(&folder).map_err(|source| StoreError::Io {
                path: folder.clone(),
                source,
            })?;
        }

        let path = folder.join(codec::file_name_for(record.id()));
        codec::encode(record, &path)?;
        info!("Saved job {} to {}", record.id(), path.display());
        Ok(path)
    }

    /// `All` selects everything; anything else must equal `Category` exactly.
    pub fn filter(&self, category: &str) -> Vec<Record> {
        if category == ALL_CATEGORIES {
            return self.records.clone();
        }
        self.records
            .iter()
            .filter(|r| r.category() == category)
            .cloned()
            .collect()
    }

    /// Case-insensitive substring match over every field value.
    pub fn search(&self, keyword: &str) -> Vec<Record> {
        let needle = keyword.to_lowercase();
        self.records
            .iter()
            .filter(|r| r.iter().any(|(_, v)| v.to_lowercase().contains(&needle)))
            .cloned()
            .collect()
    }

    /// Distinct categories in use, sorted.
    pub fn categories(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.category().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

fn walk(root: &Path) -> Result<Vec<Record>, StoreError> {
    let mut records = Vec::new();
    let entries = WalkDir::new(root)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            !SKIPPED_ENTRIES
                .iter()
                .any(|skipped| e.file_name() == *skipped)
        });

    for entry in entries {
        let entry = entry.map_err(|err| {
            let path = err
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf());
            let source = err
                .into_io_error()
                .unwrap_or_else(|| io::Error::other("filesystem loop"));
            StoreError::Io { path, source }
        })?;

        if !entry.file_type().is_file() {
            continue;
        }
        if codec::id_from_file_name(entry.path()).is_err() {
            warn!("Skipping {}: not a Job_<id> listing", entry.path().display());
            continue;
        }

        let category = if entry.depth() == 1 {
            String::new()
        } else {
            entry
                .path()
                .parent()
                .and_then(Path::file_name)
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        };

        debug!("Decoding {} as '{}'", entry.path().display(), category);
        records.push(codec::decode(entry.path(), &category)?);
    }
    Ok(records)
}

/// A category becomes a folder name, so it must be one plain path component.
/// The empty category maps to the data root.
fn validate_category(category: &str) -> Result<(), StoreError> {
    let bad = category.contains(['/', '\\'])
        || category == "."
        || category == ".."
        || SKIPPED_ENTRIES.contains(&category);
    if bad {
        return Err(StoreError::InvalidCategory(category.to_string()));
    }
    Ok(())
}
