use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::scenario::{ScenarioInput, ScenarioPatch, ScenarioRecord, ScenarioSummary};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to (de)serialize scenario: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("connection error: {0}")]
    Connection(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("backend error: {0}")]
    Backend(String),
    #[error("scenario name must not be empty")]
    InvalidName,
    #[error("invalid scenario id: {0}")]
    InvalidId(String),
}

/// Reachability report for a store backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreHealth {
    pub backend: String,
    pub configured: bool,
    pub connected: bool,
    pub message: String,
}

pub type Clock = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

pub fn system_clock() -> Clock {
    Box::new(Utc::now)
}

/// Persists named scenario inputs.
///
/// Backends provide the raw record operations; the create/update/list
/// semantics are shared. Each operation is attempted once.
pub trait ScenarioStore {
    fn backend(&self) -> &'static str;

    fn now(&self) -> DateTime<Utc>;

    fn fetch(&self, id: &str) -> Result<Option<ScenarioRecord>, StoreError>;

    fn put(&self, record: &ScenarioRecord) -> Result<(), StoreError>;

    fn remove(&self, id: &str) -> Result<(), StoreError>;

    /// All records, in no particular order. Unreadable entries are skipped.
    fn fetch_all(&self) -> Result<Vec<ScenarioRecord>, StoreError>;

    fn health(&self) -> StoreHealth;

    fn create(&self, name: &str, input: ScenarioInput) -> Result<ScenarioRecord, StoreError> {
        if name.trim().is_empty() {
            return Err(StoreError::InvalidName);
        }
        let now = self.now();
        let id = self.next_id(now)?;
        let timestamp = format_timestamp(now);
        let record = ScenarioRecord {
            id,
            name: name.to_string(),
            input,
            created_at: timestamp.clone(),
            updated_at: timestamp,
        };
        self.put(&record)?;
        info!(id = %record.id, backend = self.backend(), "scenario created");
        Ok(record)
    }

    fn read(&self, id: &str) -> Result<Option<ScenarioRecord>, StoreError> {
        validate_id(id)?;
        self.fetch(id)
    }

    fn update(&self, id: &str, patch: ScenarioPatch) -> Result<Option<ScenarioRecord>, StoreError> {
        validate_id(id)?;
        let Some(mut record) = self.fetch(id)? else {
            return Ok(None);
        };
        patch.apply(&mut record, format_timestamp(self.now()));
        self.put(&record)?;
        info!(id = %record.id, backend = self.backend(), "scenario updated");
        Ok(Some(record))
    }

    /// Deleting an unknown id succeeds.
    fn delete(&self, id: &str) -> Result<(), StoreError> {
        validate_id(id)?;
        self.remove(id)?;
        info!(id, backend = self.backend(), "scenario deleted");
        Ok(())
    }

    /// Summaries, most recently updated first.
    fn list(&self) -> Result<Vec<ScenarioSummary>, StoreError> {
        let mut summaries: Vec<ScenarioSummary> =
            self.fetch_all()?.iter().map(ScenarioRecord::summary).collect();
        sort_by_updated_desc(&mut summaries);
        Ok(summaries)
    }

    /// `scenario_<unix millis>`, bumped until unused.
    fn next_id(&self, now: DateTime<Utc>) -> Result<String, StoreError> {
        let mut millis = now.timestamp_millis();
        loop {
            let id = format!("scenario_{millis}");
            match self.fetch(&id) {
                Ok(None) => return Ok(id),
                Ok(Some(_)) => {}
                Err(StoreError::Serialization(err)) => {
                    warn!(id = %id, "id held by unreadable scenario: {err}");
                }
                Err(err) => return Err(err),
            }
            millis += 1;
        }
    }
}

/// RFC 3339 in UTC with millisecond precision.
pub fn format_timestamp(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Ids double as file names and key suffixes.
pub fn validate_id(id: &str) -> Result<(), StoreError> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidId(id.to_string()))
    }
}

/// Unparsable timestamps sort as the epoch. Ties fall back to id order.
pub fn sort_by_updated_desc(summaries: &mut [ScenarioSummary]) {
    summaries.sort_by(|a, b| {
        parse_millis(&b.updated_at)
            .cmp(&parse_millis(&a.updated_at))
            .then_with(|| a.id.cmp(&b.id))
    });
}

fn parse_millis(value: &str) -> i64 {
    DateTime::parse_from_rfc3339(value)
        .map(|time| time.timestamp_millis())
        .unwrap_or(0)
}


#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: &str, updated_at: &str) -> ScenarioSummary {
        ScenarioSummary {
            id: id.to_string(),
            name: id.to_string(),
            created_at: updated_at.to_string(),
            updated_at: updated_at.to_string(),
        }
    }

    #[test]
    fn sort_by_updated_desc_puts_latest_first() {
        let mut summaries = vec![
            summary("a", "2026-01-01T00:00:00.000Z"),
            summary("b", "2026-03-01T00:00:00.000Z"),
            summary("c", "2026-02-01T00:00:00.000+01:00"),
        ];
        sort_by_updated_desc(&mut summaries);

        let ids: Vec<_> = summaries.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn sort_by_updated_desc_treats_garbage_as_oldest_and_breaks_ties_by_id() {
        let mut summaries = vec![
            summary("z", "2026-01-01T00:00:00.000Z"),
            summary("broken", "yesterday"),
            summary("y", "2026-01-01T00:00:00.000Z"),
        ];
        sort_by_updated_desc(&mut summaries);

        let ids: Vec<_> = summaries.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["y", "z", "broken"]);
    }

    #[test]
    fn validate_id_rejects_path_characters() {
        assert!(validate_id("scenario_1700000000000").is_ok());
        assert!(validate_id("pit-a_2").is_ok());
        assert!(matches!(validate_id(""), Err(StoreError::InvalidId(_))));
        assert!(matches!(validate_id("../etc"), Err(StoreError::InvalidId(_))));
        assert!(matches!(validate_id("a b"), Err(StoreError::InvalidId(_))));
    }

    #[test]
    fn format_timestamp_uses_millis_and_z_suffix() {
        let time = DateTime::parse_from_rfc3339("2026-05-04T03:02:01.5+00:00")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(format_timestamp(time), "2026-05-04T03:02:01.500Z");
    }
}
