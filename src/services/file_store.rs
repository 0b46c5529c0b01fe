use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::domain::scenario::ScenarioRecord;
use crate::services::scenario_store::{
    Clock, ScenarioStore, StoreError, StoreHealth, system_clock,
};

/// Keeps one pretty-printed `<id>.json` file per scenario in a directory.
pub struct FileScenarioStore {
    dir: PathBuf,
    clock: Clock,
}

impl FileScenarioStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            dir: dir.into(),
            clock: system_clock(),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    fn record_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    fn ensure_dir(&self) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    fn load_record(path: &Path) -> Result<ScenarioRecord, StoreError> {
        let contents = std::fs::read_to_string(path)?;
        let mut record: ScenarioRecord = serde_json::from_str(&contents)?;
        // The file name is authoritative for the id.
        if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
            record.id = stem.to_string();
        }
        Ok(record)
    }
}

fn is_json_file(path: &Path) -> bool {
    path.is_file() && matches!(path.extension().and_then(|ext| ext.to_str()), Some("json"))
}

impl ScenarioStore for FileScenarioStore {
    fn backend(&self) -> &'static str {
        "file"
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    fn fetch(&self, id: &str) -> Result<Option<ScenarioRecord>, StoreError> {
        let path = self.record_path(id);
        match Self::load_record(&path) {
            Ok(record) => Ok(Some(record)),
            Err(StoreError::Io(err)) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn put(&self, record: &ScenarioRecord) -> Result<(), StoreError> {
        self.ensure_dir()?;
        let contents = serde_json::to_string_pretty(record)?;
        let path = self.record_path(&record.id);
        std::fs::write(&path, contents)?;
        debug!(path = %path.display(), "scenario file written");
        Ok(())
    }

    fn remove(&self, id: &str) -> Result<(), StoreError> {
        match std::fs::remove_file(self.record_path(id)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    fn fetch_all(&self) -> Result<Vec<ScenarioRecord>, StoreError> {
        self.ensure_dir()?;
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if is_json_file(&path) {
                paths.push(path);
            }
        }
        paths.sort();

        let mut records = Vec::with_capacity(paths.len());
        for path in paths {
            match Self::load_record(&path) {
                Ok(record) => records.push(record),
                Err(err) => warn!(path = %path.display(), "skipping unreadable scenario: {err}"),
            }
        }
        Ok(records)
    }

    fn health(&self) -> StoreHealth {
        let (connected, message) = match self.ensure_dir() {
            Ok(()) => (
                true,
                format!("scenario directory {} is available", self.dir.display()),
            ),
            Err(err) => (
                false,
                format!("scenario directory {} is not usable: {err}", self.dir.display()),
            ),
        };
        StoreHealth {
            backend: self.backend().to_string(),
            configured: true,
            connected,
            message,
        }
    }
}
