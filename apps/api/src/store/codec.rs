//! Flat-file codec for job listings.
//!
//! One field per line, `<name>: <value>`. The listing ID lives in the file name
//! (`Job_<id>.txt`) and the category in the enclosing folder name, so both are
//! injected on decode rather than trusted from the file body.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::models::record::{Record, FIELD_CATEGORY, FIELD_DESCRIPTION, FIELD_ID};
use crate::store::StoreError;

pub const FILE_MARKER: &str = "Job_";
pub const FILE_EXTENSION: &str = "txt";

/// `Job_<id>.txt`
pub fn file_name_for(id: &str) -> String {
    format!("{FILE_MARKER}{id}.{FILE_EXTENSION}")
}

/// Extracts the ID between the last `Job_` marker and the first following `.`.
pub fn id_from_file_name(path: &Path) -> Result<String, StoreError> {
    let invalid = || StoreError::InvalidFileName {
        path: path.to_path_buf(),
    };

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(invalid)?;
    let (_, tail) = name.rsplit_once(FILE_MARKER).ok_or_else(invalid)?;
    let id = tail.split('.').next().unwrap_or_default();

    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    Ok(id.to_string())
}

/// Reads a listing file. `category` is the name of the folder the file sits in.
pub fn decode(path: &Path, category: &str) -> Result<Record, StoreError> {
    let id = id_from_file_name(path)?;
    let contents = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut record = Record::new();
    record.insert(FIELD_ID, id);
    record.insert(FIELD_CATEGORY, category);

    for (idx, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let (name, rest) = line
            .split_once(':')
            .ok_or_else(|| StoreError::MalformedLine {
                path: path.to_path_buf(),
                line: idx + 1,
            })?;
        let name = name.trim();

        // File name and folder are authoritative for these two.
        if name == FIELD_ID || name == FIELD_CATEGORY {
            continue;
        }

        let value = if name == FIELD_DESCRIPTION {
            // Descriptions may legitimately contain colons.
            rest.trim().to_string()
        } else {
            // Other fields lose any literal colon.
            rest.replace(':', "").trim().to_string()
        };
        record.insert(name, value);
    }

    Ok(record)
}

/// Writes `record` to `path`, one `<name>: <value>` line per field, replacing
/// any existing file. Content is staged in a temp file in the same folder and
/// renamed into place.
pub fn encode(record: &Record, path: &Path) -> Result<(), StoreError> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let io_err = |source: std::io::Error| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut body = String::new();
    for (name, value) in record.iter() {
        body.push_str(name);
        body.push_str(": ");
        body.push_str(value);
        body.push('\n');
    }

    let mut staged = NamedTempFile::new_in(dir).map_err(io_err)?;
    staged.write_all(body.as_bytes()).map_err(io_err)?;
    staged.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}
