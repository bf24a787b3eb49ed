use crate::storage::{ConsecutiveCounterStore, CounterError};
use crate::types::dates::compact;
use crate::types::Consecutive;
use chrono::NaiveDate;
#[cfg(test)]
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::debug;

/// Stored count once `99` has been used; no further file may be generated that day.
const EXHAUSTED: u8 = 0;

fn exhausted(date: NaiveDate) -> CounterError {
    CounterError::Exhausted { date: compact(date) }
}

fn current(stored: Option<u8>, date: NaiveDate) -> Result<Consecutive, CounterError> {
    match stored {
        None => Ok(Consecutive::FIRST),
        Some(EXHAUSTED) => Err(exhausted(date)),
        Some(count) => Consecutive::new(count).map_err(|error| CounterError::Corrupt(error.to_string()))
    }
}

/// Returns the count to store after advancing, together with the caller's result.
fn advance(stored: Option<u8>, date: NaiveDate) -> Result<(u8, Result<Consecutive, CounterError>), CounterError> {
    let next = current(stored, date)?.next();

    Ok(match next {
        Some(next) => (next.value(), Ok(next)),
        None => (EXHAUSTED, Err(exhausted(date)))
    })
}

#[cfg(test)]
pub struct InMemoryCounterStore {
    counts: DashMap<NaiveDate, u8>
}

#[cfg(test)]
impl InMemoryCounterStore {
    pub fn new() -> Self {
        Self {
            counts: DashMap::new()
        }
    }
}

#[cfg(test)]
impl ConsecutiveCounterStore for InMemoryCounterStore {
    fn read(&self, date: NaiveDate) -> Result<Consecutive, CounterError> {
        current(self.counts.get(&date).map(|count| *count), date)
    }

    fn increment(&self, date: NaiveDate) -> Result<Consecutive, CounterError> {
        let result = {
            let mut entry = self.counts.entry(date).or_insert(Consecutive::FIRST.value());
            let (stored, result) = advance(Some(*entry), date)?;
            *entry = stored;
            result
        };

        self.counts.retain(|stored_date, _| *stored_date == date);

        result
    }
}

/// Persisted form of the counter: `{ "date": "YYYYMMDD", "count": "NN" }`.
#[derive(Debug, Serialize, Deserialize)]
struct DailyConsecutive {
    date: String,
    count: String
}

/// Counter persisted as a small JSON document, surviving process restarts.
///
/// Updates are serialized within the process only. Two processes sharing the
/// same file can still hand out the same consecutive.
pub struct FileCounterStore {
    path: PathBuf,
    lock: Mutex<()>
}

impl FileCounterStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(())
        }
    }

    fn load(&self, date: NaiveDate) -> Result<Option<u8>, CounterError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let stored: DailyConsecutive = serde_json::from_str(&fs::read_to_string(&self.path)?)?;

        if stored.date != compact(date) {
            debug!("Stored consecutive belongs to [{}], starting over for [{}]", stored.date, compact(date));
            return Ok(None);
        }

        stored.count.parse::<u8>()
            .map(Some)
            .map_err(|error| CounterError::Corrupt(format!("count '{}': {error}", stored.count)))
    }

    fn save(&self, date: NaiveDate, count: u8) -> Result<(), CounterError> {
        let state = DailyConsecutive {
            date: compact(date),
            count: format!("{:02}", count)
        };

        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let staging = self.path.with_extension("tmp");
        fs::write(&staging, serde_json::to_string_pretty(&state)?)?;
        fs::rename(&staging, &self.path)?;

        Ok(())
    }
}

impl ConsecutiveCounterStore for FileCounterStore {
    fn read(&self, date: NaiveDate) -> Result<Consecutive, CounterError> {
        let _guard = self.lock.lock().map_err(|_| CounterError::Corrupt("counter lock poisoned".to_string()))?;

        current(self.load(date)?, date)
    }

    fn increment(&self, date: NaiveDate) -> Result<Consecutive, CounterError> {
        let _guard = self.lock.lock().map_err(|_| CounterError::Corrupt("counter lock poisoned".to_string()))?;

        let (stored, result) = advance(Some(self.load(date)?.unwrap_or(Consecutive::FIRST.value())), date)?;
        self.save(date, stored)?;

        result
    }
}
