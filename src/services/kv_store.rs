use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::scenario::ScenarioRecord;
use crate::services::scenario_store::{
    Clock, ScenarioStore, StoreError, StoreHealth, system_clock,
};

/// Set holding every stored scenario id.
pub const SCENARIOS_KEY: &str = "scenarios";
/// Prefix of the key holding one scenario's JSON.
pub const SCENARIO_PREFIX: &str = "scenario:";

/// Scenario store backed by a Redis-compatible REST endpoint.
///
/// Commands are POSTed as JSON string arrays (`["GET", "scenario:x"]`) with a
/// bearer token; replies carry either `result` or `error`.
pub struct KvScenarioStore {
    base_url: String,
    token: String,
    client: Client,
    clock: Clock,
}

impl KvScenarioStore {
    pub fn new(base_url: &str, token: &str) -> Result<Self, StoreError> {
        let base_url = base_url.trim_end_matches('/');
        if base_url.is_empty() {
            return Err(StoreError::Backend(
                "key-value store url is not configured".to_string(),
            ));
        }
        Ok(Self {
            base_url: base_url.to_string(),
            token: token.to_string(),
            client: Client::new(),
            clock: system_clock(),
        })
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    fn command(&self, args: &[&str]) -> Result<Value, StoreError> {
        debug!(command = args.first().copied().unwrap_or_default(), "kv command");
        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.token)
            .json(args)
            .send()
            .map_err(|err| StoreError::Connection(err.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(StoreError::Unauthorized);
        }
        let payload: Value = response
            .json()
            .map_err(|err| StoreError::Backend(format!("unreadable reply ({status}): {err}")))?;
        if let Some(message) = payload.get("error").and_then(Value::as_str) {
            return Err(StoreError::Backend(message.to_string()));
        }
        if !status.is_success() {
            return Err(StoreError::Backend(format!("unexpected status {status}")));
        }
        payload
            .get("result")
            .cloned()
            .ok_or_else(|| StoreError::Backend("reply has no result".to_string()))
    }

    fn get_record(&self, id: &str) -> Result<Option<ScenarioRecord>, StoreError> {
        let key = format!("{SCENARIO_PREFIX}{id}");
        match self.command(&["GET", &key])? {
            Value::Null => Ok(None),
            Value::String(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            other => Err(StoreError::Backend(format!(
                "unexpected value for {key}: {other}"
            ))),
        }
    }

    fn scenario_ids(&self) -> Result<Vec<String>, StoreError> {
        let members = self.command(&["SMEMBERS", SCENARIOS_KEY])?;
        let mut ids: Vec<String> = members
            .as_array()
            .map(|values| {
                values
                    .iter()
                    .filter_map(|value| value.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();
        ids.sort();
        Ok(ids)
    }
}

impl ScenarioStore for KvScenarioStore {
    fn backend(&self) -> &'static str {
        "kv"
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    fn fetch(&self, id: &str) -> Result<Option<ScenarioRecord>, StoreError> {
        self.get_record(id)
    }

    fn put(&self, record: &ScenarioRecord) -> Result<(), StoreError> {
        let key = format!("{SCENARIO_PREFIX}{}", record.id);
        let raw = serde_json::to_string(record)?;
        self.command(&["SET", &key, &raw])?;
        self.command(&["SADD", SCENARIOS_KEY, &record.id])?;
        Ok(())
    }

    fn remove(&self, id: &str) -> Result<(), StoreError> {
        let key = format!("{SCENARIO_PREFIX}{id}");
        self.command(&["SREM", SCENARIOS_KEY, id])?;
        self.command(&["DEL", &key])?;
        Ok(())
    }

    fn fetch_all(&self) -> Result<Vec<ScenarioRecord>, StoreError> {
        let mut records = Vec::new();
        for id in self.scenario_ids()? {
            match self.get_record(&id) {
                Ok(Some(record)) => records.push(record),
                Ok(None) => debug!(id = %id, "listed scenario has no value"),
                Err(StoreError::Serialization(err)) => {
                    warn!(id = %id, "skipping unreadable scenario: {err}")
                }
                Err(err) => return Err(err),
            }
        }
        Ok(records)
    }

    fn health(&self) -> StoreHealth {
        let configured = !self.token.is_empty();
        let (connected, message) = match self.command(&["PING"]) {
            Ok(Value::String(reply)) if reply == "PONG" => (
                true,
                "key-value store is configured and connected".to_string(),
            ),
            Ok(other) => (false, format!("unexpected PING reply: {other}")),
            Err(err) => (false, format!("connection test failed: {err}")),
        };
        StoreHealth {
            backend: self.backend().to_string(),
            configured,
            connected,
            message,
        }
    }
}
