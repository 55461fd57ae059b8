//! Personal records: 1RM estimation and the user-curated record store.
//!
//! Records hold an estimated one-rep max in kilograms. A record only moves
//! when a new estimate is strictly higher than the stored one.

use crate::{Error, PersonalRecord, Result};
use chrono::NaiveDate;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// Epley coefficient per repetition
pub const EPLEY_COEFFICIENT: f64 = 0.0333;

/// Estimate a one-rep max with the Epley formula: `weight * (1 + 0.0333 * reps)`.
///
/// Weight must be positive and finite, reps at least 1. Units are whatever the
/// caller passes in; the stored records use kilograms.
pub fn estimate_one_rep_max(weight: f64, reps: u32) -> Result<f64> {
    validate_lift(weight, reps)?;
    Ok(weight * (1.0 + EPLEY_COEFFICIENT * f64::from(reps)))
}

fn validate_lift(weight: f64, reps: u32) -> Result<()> {
    if !weight.is_finite() || weight <= 0.0 {
        return Err(Error::InvalidInput(format!(
            "weight must be a positive number, got {}",
            weight
        )));
    }
    if reps < 1 {
        return Err(Error::InvalidInput("reps must be at least 1".into()));
    }
    Ok(())
}

/// A weight/reps pair parsed from user input
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LiftInput {
    pub weight: f64,
    pub reps: u32,
}

impl LiftInput {
    /// Parse and validate raw text input
    pub fn parse(weight: &str, reps: &str) -> Result<Self> {
        let weight: f64 = weight
            .trim()
            .parse()
            .map_err(|_| Error::InvalidInput(format!("'{}' is not a number", weight.trim())))?;
        let reps: u32 = reps.trim().parse().map_err(|_| {
            Error::InvalidInput(format!("'{}' is not a whole number of reps", reps.trim()))
        })?;
        validate_lift(weight, reps)?;
        Ok(Self { weight, reps })
    }
}

// ============================================================================
// Store
// ============================================================================

/// External personal-record store
pub trait RecordStore {
    fn list(&self, owner: &str) -> Result<Vec<PersonalRecord>>;
    fn get(&self, id: Uuid) -> Result<Option<PersonalRecord>>;
    fn insert(&mut self, record: &PersonalRecord) -> Result<()>;
    /// Replace an existing record; `RecordNotFound` if the id is unknown
    fn update(&mut self, record: &PersonalRecord) -> Result<()>;
    /// Returns whether a record was removed
    fn delete(&mut self, id: Uuid) -> Result<bool>;

    /// Point lookup expecting zero or one record per (owner, exercise)
    fn find_by_exercise(&self, owner: &str, exercise: &str) -> Result<Option<PersonalRecord>> {
        let mut matches: Vec<PersonalRecord> = self
            .list(owner)?
            .into_iter()
            .filter(|r| r.is_for(owner, exercise))
            .collect();

        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            count => Err(Error::AmbiguousRecord {
                exercise: exercise.trim().to_string(),
                count,
            }),
        }
    }
}

/// In-process record store
#[derive(Clone, Debug, Default)]
pub struct MemoryRecordStore {
    records: Vec<PersonalRecord>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryRecordStore {
    fn list(&self, owner: &str) -> Result<Vec<PersonalRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.owner == owner)
            .cloned()
            .collect())
    }

    fn get(&self, id: Uuid) -> Result<Option<PersonalRecord>> {
        Ok(self.records.iter().find(|r| r.id == id).cloned())
    }

    fn insert(&mut self, record: &PersonalRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn update(&mut self, record: &PersonalRecord) -> Result<()> {
        let slot = self
            .records
            .iter_mut()
            .find(|r| r.id == record.id)
            .ok_or(Error::RecordNotFound(record.id))?;
        *slot = record.clone();
        Ok(())
    }

    fn delete(&mut self, id: Uuid) -> Result<bool> {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        Ok(self.records.len() != before)
    }
}

/// JSON file record store.
///
/// Every mutation is a locked read-modify-write: an exclusive lock on a
/// sidecar `.lock` file, then an atomic rename of a fully written temp file.
pub struct JsonRecordStore {
    path: PathBuf,
}

impl JsonRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("json.lock")
    }

    /// Load all records with a shared lock
    fn load_all(&self) -> Result<Vec<PersonalRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        file.lock_shared()?;

        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;
        read?;

        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&contents).map_err(|e| {
            tracing::warn!("Record file {:?} is unreadable: {}", self.path, e);
            Error::Corrupt(format!("record file {:?} is unreadable: {}", self.path, e))
        })
    }

    /// Atomically write all records
    fn save_all(&self, records: &[PersonalRecord]) -> Result<()> {
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            serde_json::to_writer_pretty(&mut writer, records)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved {} records to {:?}", records.len(), self.path);
        Ok(())
    }

    /// Run a read-modify-write cycle under the store lock
    fn modify<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<PersonalRecord>) -> Result<T>,
    {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path())?;
        lock.lock_exclusive()?;

        let result = self.load_all().and_then(|mut records| {
            let out = f(&mut records)?;
            self.save_all(&records)?;
            Ok(out)
        });

        lock.unlock()?;
        result
    }
}

impl RecordStore for JsonRecordStore {
    fn list(&self, owner: &str) -> Result<Vec<PersonalRecord>> {
        Ok(self
            .load_all()?
            .into_iter()
            .filter(|r| r.owner == owner)
            .collect())
    }

    fn get(&self, id: Uuid) -> Result<Option<PersonalRecord>> {
        Ok(self.load_all()?.into_iter().find(|r| r.id == id))
    }

    fn insert(&mut self, record: &PersonalRecord) -> Result<()> {
        self.modify(|records| {
            records.push(record.clone());
            Ok(())
        })
    }

    fn update(&mut self, record: &PersonalRecord) -> Result<()> {
        self.modify(|records| {
            let slot = records
                .iter_mut()
                .find(|r| r.id == record.id)
                .ok_or(Error::RecordNotFound(record.id))?;
            *slot = record.clone();
            Ok(())
        })
    }

    fn delete(&mut self, id: Uuid) -> Result<bool> {
        self.modify(|records| {
            let before = records.len();
            records.retain(|r| r.id != id);
            Ok(records.len() != before)
        })
    }
}

// ============================================================================
// Tracker
// ============================================================================

/// What happened to a record after a new estimate
#[derive(Clone, Debug, PartialEq)]
pub enum RecordOutcome {
    /// No record existed; one was created
    Created(PersonalRecord),
    /// The estimate beat the stored value
    Improved {
        previous_kg: f64,
        record: PersonalRecord,
    },
    /// The estimate was equal or lower; nothing changed
    NotImproved {
        stored: PersonalRecord,
        candidate_kg: f64,
    },
}

/// Create/update/delete operations for one owner's records
pub struct PersonalRecordTracker<S: RecordStore> {
    store: S,
    owner: String,
}

impl<S: RecordStore> PersonalRecordTracker<S> {
    pub fn new(store: S, owner: impl Into<String>) -> Self {
        Self {
            store,
            owner: owner.into(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// All of this owner's records, by exercise name then date
    pub fn records(&self) -> Result<Vec<PersonalRecord>> {
        let mut records = self.store.list(&self.owner)?;
        records.sort_by(|a, b| {
            a.exercise_name
                .to_lowercase()
                .cmp(&b.exercise_name.to_lowercase())
                .then(a.date.cmp(&b.date))
        });
        Ok(records)
    }

    /// The record for an exercise; fails with `AmbiguousRecord` on duplicates
    pub fn find(&self, exercise: &str) -> Result<Option<PersonalRecord>> {
        self.store.find_by_exercise(&self.owner, exercise)
    }

    /// The most recent record for an exercise, tolerating duplicates
    pub fn latest_for(&self, exercise: &str) -> Result<Option<PersonalRecord>> {
        Ok(self
            .store
            .list(&self.owner)?
            .into_iter()
            .filter(|r| r.is_for(&self.owner, exercise))
            .max_by_key(|r| r.date))
    }

    /// Insert a new record. Does not check for an existing one.
    pub fn create_record(
        &mut self,
        exercise: &str,
        one_rep_max_kg: f64,
        today: NaiveDate,
    ) -> Result<PersonalRecord> {
        let exercise = exercise.trim();
        if exercise.is_empty() {
            return Err(Error::InvalidInput("exercise name must not be empty".into()));
        }
        if !one_rep_max_kg.is_finite() || one_rep_max_kg <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "estimated 1RM must be positive, got {}",
                one_rep_max_kg
            )));
        }

        let record = PersonalRecord {
            id: Uuid::new_v4(),
            owner: self.owner.clone(),
            exercise_name: exercise.to_string(),
            weight_kg: one_rep_max_kg,
            date: today,
        };
        self.store.insert(&record)?;

        tracing::info!(
            "Created record {} for '{}': {:.2} kg",
            record.id,
            record.exercise_name,
            record.weight_kg
        );
        Ok(record)
    }

    /// Re-estimate a record from a new lift; stored only if strictly higher
    pub fn update_record(
        &mut self,
        id: Uuid,
        weight_kg: f64,
        reps: u32,
        today: NaiveDate,
    ) -> Result<RecordOutcome> {
        let candidate_kg = estimate_one_rep_max(weight_kg, reps)?;

        let stored = self
            .store
            .get(id)?
            .filter(|r| r.owner == self.owner)
            .ok_or(Error::RecordNotFound(id))?;

        if candidate_kg <= stored.weight_kg {
            tracing::debug!(
                "Estimate {:.2} kg does not beat {:.2} kg for '{}'",
                candidate_kg,
                stored.weight_kg,
                stored.exercise_name
            );
            return Ok(RecordOutcome::NotImproved {
                stored,
                candidate_kg,
            });
        }

        let record = PersonalRecord {
            weight_kg: candidate_kg,
            date: today,
            ..stored.clone()
        };
        self.store.update(&record)?;

        tracing::info!(
            "Improved record {} for '{}': {:.2} -> {:.2} kg",
            record.id,
            record.exercise_name,
            stored.weight_kg,
            record.weight_kg
        );
        Ok(RecordOutcome::Improved {
            previous_kg: stored.weight_kg,
            record,
        })
    }

    /// Remove a record; returns whether it existed
    pub fn delete_record(&mut self, id: Uuid) -> Result<bool> {
        let removed = self.store.delete(id)?;
        if removed {
            tracing::info!("Deleted record {}", id);
        } else {
            tracing::debug!("No record {} to delete", id);
        }
        Ok(removed)
    }

    /// Create the exercise's record if it has none, otherwise try to improve it
    pub fn record_estimate(
        &mut self,
        exercise: &str,
        weight_kg: f64,
        reps: u32,
        today: NaiveDate,
    ) -> Result<RecordOutcome> {
        let one_rep_max_kg = estimate_one_rep_max(weight_kg, reps)?;

        match self.find(exercise)? {
            Some(existing) => self.update_record(existing.id, weight_kg, reps, today),
            None => self
                .create_record(exercise, one_rep_max_kg, today)
                .map(RecordOutcome::Created),
        }
    }
}

// ============================================================================
// Stale lookup guard
// ============================================================================

/// Ticket for one in-flight lookup
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LookupTicket(u64);

/// Drops lookup results that arrive after their view was closed or after a
/// newer lookup was issued.
#[derive(Debug)]
pub struct LookupGate {
    generation: u64,
    open: bool,
}

impl Default for LookupGate {
    fn default() -> Self {
        Self::new()
    }
}

impl LookupGate {
    pub fn new() -> Self {
        Self {
            generation: 0,
            open: true,
        }
    }

    /// Start a lookup; any earlier ticket becomes stale
    pub fn issue(&mut self) -> LookupTicket {
        self.generation += 1;
        LookupTicket(self.generation)
    }

    /// Close the view; every outstanding ticket becomes stale
    pub fn close(&mut self) {
        self.open = false;
        self.generation += 1;
    }

    pub fn reopen(&mut self) {
        self.open = true;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Hand back `result` only if `ticket` is still current
    pub fn deliver<T>(&self, ticket: LookupTicket, result: T) -> Option<T> {
        if self.open && ticket.0 == self.generation {
            Some(result)
        } else {
            tracing::debug!("Discarding stale lookup result");
            None
        }
    }
}

/// Today's date in local time
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
