//! JSONL storage: one hierarchy row per line.
//!
//! Companies and nodes share a file, told apart by their `kind` tag:
//!
//! ```text
//! {"kind":"company","id":"acme","name":"Acme Mining"}
//! {"kind":"node","id":1,"level":"business_unit","parent_id":"acme","name":"West"}
//! {"kind":"node","id":2,"level":"region","parent_id":1,"name":"Pilbara"}
//! ```
//!
//! Rows are checked against the level schema as they are read, so a region
//! pointing at a company fails with the line it sits on. Whether a parent
//! actually exists is a store-level question and is not checked here.

use orgscope_kernel::{HierarchyRow, Level, NodeId};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Errors from JSONL operations.
#[derive(Debug, thiserror::Error)]
pub enum JsonlError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("line {line}: parse error: {message}")]
    Parse { line: usize, message: String },

    #[error("line {line}: {level} {id} cannot have parent {parent}")]
    ParentKind {
        line: usize,
        level: Level,
        id: NodeId,
        parent: String,
    },

    #[error("serialization error: {0}")]
    Serialize(String),

    #[error("corrupted file {}: {description}", path.display())]
    Corrupt {
        path: PathBuf,
        description: &'static str,
    },
}

impl JsonlError {
    fn parse(line: usize, error: serde_json::Error) -> Self {
        JsonlError::Parse {
            line,
            message: error.to_string(),
        }
    }

    fn io(path: &Path) -> impl FnOnce(io::Error) -> JsonlError + '_ {
        move |source| JsonlError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Parse JSONL text into rows. Blank lines and `#` comments are skipped.
pub fn parse_rows(text: &str) -> Result<Vec<HierarchyRow>, JsonlError> {
    let mut rows = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let row: HierarchyRow = serde_json::from_str(trimmed)
            .map_err(|e| JsonlError::parse(line, e))?;
        if let HierarchyRow::Node(node) = &row
            && !node.parent_level_matches()
        {
            return Err(JsonlError::ParentKind {
                line,
                level: node.level,
                id: node.id,
                parent: node.parent.to_string(),
            });
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Render rows as JSONL text, one row per line.
pub fn render_rows(rows: &[HierarchyRow]) -> Result<String, JsonlError> {
    let mut out = String::new();
    for row in rows {
        let line =
            serde_json::to_string(row).map_err(|e| JsonlError::Serialize(e.to_string()))?;
        out.push_str(&line);
        out.push('\n');
    }
    Ok(out)
}

/// Read rows from a JSONL file, rejecting NUL bytes and invalid UTF-8.
pub fn read_rows_from_path(path: impl AsRef<Path>) -> Result<Vec<HierarchyRow>, JsonlError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(JsonlError::io(path))?;
    let corrupt = |description| JsonlError::Corrupt {
        path: path.to_path_buf(),
        description,
    };
    if bytes.contains(&0) {
        return Err(corrupt("contains NUL bytes"));
    }
    let text = std::str::from_utf8(&bytes).map_err(|_| corrupt("contains non-UTF-8 bytes"))?;
    parse_rows(text)
}

/// Replace the file at `path` with `rows`.
///
/// Rows are rendered before anything touches disk. The new content goes to
/// a synced sibling temp file which is renamed over `path`, then the
/// directory itself is synced so the rename survives a crash.
pub fn write_rows_to_path(path: impl AsRef<Path>, rows: &[HierarchyRow]) -> Result<(), JsonlError> {
    let path = path.as_ref();
    let text = render_rows(rows)?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(JsonlError::io(dir))?;

    let tmp_path = sibling_tmp_path(path);
    if let Err(error) = write_synced(&tmp_path, text.as_bytes()) {
        let _ = fs::remove_file(&tmp_path);
        return Err(error);
    }
    if let Err(source) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(JsonlError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    File::open(dir)
        .and_then(|handle| handle.sync_all())
        .map_err(JsonlError::io(dir))
}

fn write_synced(path: &Path, bytes: &[u8]) -> Result<(), JsonlError> {
    let mut file = File::create(path).map_err(JsonlError::io(path))?;
    file.write_all(bytes).map_err(JsonlError::io(path))?;
    file.sync_all().map_err(JsonlError::io(path))
}

fn sibling_tmp_path(path: &Path) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let mut name: OsString = path.as_os_str().to_os_string();
    name.push(format!(".{}.{nanos}.tmp", std::process::id()));
    PathBuf::from(name)
}
