use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Outcome of evaluating one scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResult {
    pub trucks_needed: u64,

    pub tons_per_year_target: f64,
    pub tons_per_truck_per_year: f64,

    pub cycle_time_minutes: f64,

    pub capex_eur: f64,
    pub opex_eur_per_year: f64,
    /// Distance based service cost, kept in SEK.
    pub service_sek_per_year: f64,

    pub cost_per_ton_year1_eur: f64,

    pub explain: Explain,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExplainValue {
    Number(f64),
    Text(String),
}

impl ExplainValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ExplainValue::Number(value) => Some(*value),
            ExplainValue::Text(_) => None,
        }
    }
}

impl std::fmt::Display for ExplainValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExplainValue::Number(value) => write!(f, "{value}"),
            ExplainValue::Text(value) => write!(f, "{value}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExplainEntry {
    pub label: &'static str,
    pub value: ExplainValue,
}

/// Named intermediates in derivation order.
///
/// Serializes as a map whose key order is the insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Explain {
    entries: Vec<ExplainEntry>,
}

impl Explain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn number(&mut self, label: &'static str, value: f64) {
        self.entries.push(ExplainEntry {
            label,
            value: ExplainValue::Number(value),
        });
    }

    pub fn text(&mut self, label: &'static str, value: impl Into<String>) {
        self.entries.push(ExplainEntry {
            label,
            value: ExplainValue::Text(value.into()),
        });
    }

    pub fn get(&self, label: &str) -> Option<&ExplainValue> {
        self.entries
            .iter()
            .find(|entry| entry.label == label)
            .map(|entry| &entry.value)
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.entries.iter().map(|entry| entry.label).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExplainEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Explain {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(entry.label, &entry.value)?;
        }
        map.end()
    }
}
