//! Local copy of the workout store's session history.
//!
//! Sessions are appended to a JSONL (JSON Lines) file with file locking.
//! The log is append-only; a later line for the same id supersedes earlier ones.

use crate::{Result, WorkoutSession};
use fs2::FileExt;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Session sink trait for persisting sessions
pub trait SessionSink {
    fn append(&mut self, session: &WorkoutSession) -> Result<()>;
}

/// JSONL-based session sink with file locking
pub struct JsonlSink {
    path: PathBuf,
}

impl JsonlSink {
    /// Create a new JSONL sink for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Ensure the parent directory exists
    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl SessionSink for JsonlSink {
    fn append(&mut self, session: &WorkoutSession) -> Result<()> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        let mut writer = BufWriter::new(&file);
        let line = serde_json::to_string(session)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        drop(writer);

        file.unlock()?;

        tracing::debug!("Appended session {} to log", session.id);
        Ok(())
    }
}

/// Read all sessions from a log file
///
/// A missing file is an empty history. Lines that fail to parse are skipped.
/// When an id appears more than once the last line wins, so a corrected
/// session replaces the earlier copy.
pub fn read_sessions(path: &Path) -> Result<Vec<WorkoutSession>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;
    let sessions = parse_log(BufReader::new(&file));
    file.unlock()?;

    let sessions = sessions?;
    tracing::debug!("Read {} sessions from log", sessions.len());
    Ok(sessions)
}

/// Parse JSONL sessions, keeping the first position and the last content per id
fn parse_log<R: BufRead>(reader: R) -> Result<Vec<WorkoutSession>> {
    let mut sessions: Vec<WorkoutSession> = Vec::new();
    let mut positions: HashMap<Uuid, usize> = HashMap::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<WorkoutSession>(&line) {
            Ok(session) => match positions.get(&session.id) {
                Some(&i) => sessions[i] = session,
                None => {
                    positions.insert(session.id, sessions.len());
                    sessions.push(session);
                }
            },
            Err(e) => {
                tracing::warn!("Failed to parse session at line {}: {}", line_num + 1, e);
            }
        }
    }

    Ok(sessions)
}

/// Import a JSON array export from the workout store into the log
///
/// New sessions are appended. A session whose id is already logged is
/// appended again only if its content changed, which supersedes the old
/// copy on read. Importing the same export twice writes nothing. The log
/// stays exclusively locked from the id check to the last write. Returns
/// the number of sessions written.
pub fn import_sessions(export_path: &Path, log_path: &Path) -> Result<usize> {
    let contents = std::fs::read_to_string(export_path)?;
    let incoming: Vec<WorkoutSession> = serde_json::from_str(&contents)?;

    if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .read(true)
        .append(true)
        .open(log_path)?;

    file.lock_exclusive()?;
    let written = merge_into_log(&file, &incoming);
    file.unlock()?;
    let written = written?;

    tracing::info!(
        "Imported {} of {} sessions from {:?}",
        written,
        incoming.len(),
        export_path
    );
    Ok(written)
}

/// Append sessions that are new or changed; caller holds the exclusive lock
fn merge_into_log(file: &File, incoming: &[WorkoutSession]) -> Result<usize> {
    let mut known: HashMap<Uuid, WorkoutSession> = parse_log(BufReader::new(file))?
        .into_iter()
        .map(|s| (s.id, s))
        .collect();

    let mut writer = BufWriter::new(file);
    let mut written = 0;
    for session in incoming {
        match known.get(&session.id) {
            Some(existing) if existing == session => {
                tracing::debug!("Skipping already imported session {}", session.id);
                continue;
            }
            Some(_) => tracing::info!("Session {} changed, storing corrected copy", session.id),
            None => {}
        }

        let line = serde_json::to_string(session)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        known.insert(session.id, session.clone());
        written += 1;
    }
    writer.flush()?;
    drop(writer);
    file.sync_all()?;

    Ok(written)
}
