use serde::{Deserialize, Serialize};

/// Mine description fed to the evaluator.
///
/// Every field is optional: records saved by older clients or typed by hand
/// may leave values out, and the evaluator defaults them instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScenarioInput {
    pub material_ktons_per_year: Option<f64>,

    pub haul_distance_km_one_way: Option<f64>,
    pub avg_speed_loaded_kmph: Option<f64>,
    pub avg_speed_empty_kmph: Option<f64>,
    pub avg_grade_percent: Option<f64>,

    pub queue_to_loader_seconds_avg: Option<f64>,
    pub queue_to_dump_seconds_avg: Option<f64>,

    pub loading_time_min: Option<f64>,
    pub dumping_time_min: Option<f64>,

    pub uptime_percent: Option<f64>,
    pub shift_change_min_per_shift: Option<f64>,

    pub price_vehicle_eur: Option<f64>,
    pub price_hw_eur: Option<f64>,
    pub license_eur_per_year_per_truck: Option<f64>,
    pub site_license_eur_per_year: Option<f64>,
    pub fms_fixed_eur_per_year: Option<f64>,
    pub fms_per_truck_eur_per_year: Option<f64>,

    pub service_sek_per_km: Option<f64>,
}

impl ScenarioInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// The reference open-pit scenario used as the starting form values.
    pub fn default_scenario() -> Self {
        Self {
            material_ktons_per_year: Some(5000.0),
            haul_distance_km_one_way: Some(2.5),
            avg_speed_loaded_kmph: Some(25.0),
            avg_speed_empty_kmph: Some(30.0),
            avg_grade_percent: Some(4.0),
            queue_to_loader_seconds_avg: Some(45.0),
            queue_to_dump_seconds_avg: Some(60.0),
            loading_time_min: Some(3.5),
            dumping_time_min: Some(1.2),
            uptime_percent: Some(90.0),
            shift_change_min_per_shift: Some(20.0),
            price_vehicle_eur: Some(250_000.0),
            price_hw_eur: Some(100_000.0),
            license_eur_per_year_per_truck: Some(50_000.0),
            site_license_eur_per_year: Some(100_000.0),
            fms_fixed_eur_per_year: Some(200_000.0),
            fms_per_truck_eur_per_year: Some(10_000.0),
            service_sek_per_km: Some(85.0),
        }
    }
}

/// A named scenario as held by a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioRecord {
    pub id: String,
    #[serde(default = "unnamed")]
    pub name: String,
    #[serde(default)]
    pub input: ScenarioInput,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

fn unnamed() -> String {
    "Unnamed Scenario".to_string()
}

impl ScenarioRecord {
    pub fn summary(&self) -> ScenarioSummary {
        ScenarioSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            created_at: self.created_at.clone(),
            updated_at: self.updated_at.clone(),
        }
    }
}

/// Listing entry, without the input payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioSummary {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Partial update. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenarioPatch {
    pub name: Option<String>,
    pub input: Option<ScenarioInput>,
}

impl ScenarioPatch {
    /// Applies the patch, refreshing `updated_at`. Blank names are ignored.
    pub fn apply(self, record: &mut ScenarioRecord, updated_at: String) {
        if let Some(name) = self.name.filter(|name| !name.trim().is_empty()) {
            record.name = name;
        }
        if let Some(input) = self.input {
            record.input = input;
        }
        record.updated_at = updated_at;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_record() -> ScenarioRecord {
        ScenarioRecord {
            id: "scenario_1".to_string(),
            name: "Pit A".to_string(),
            input: ScenarioInput::default_scenario(),
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
            updated_at: "2026-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn input_deserializes_camel_case_and_tolerates_missing_fields() {
        let json = r#"{"materialKtonsPerYear": 1200, "avgGradePercent": -3.5, "legacyField": true}"#;
        let input: ScenarioInput = serde_json::from_str(json).unwrap();

        assert_eq!(input.material_ktons_per_year, Some(1200.0));
        assert_eq!(input.avg_grade_percent, Some(-3.5));
        assert_eq!(input.haul_distance_km_one_way, None);
        assert_eq!(input.uptime_percent, None);
    }

    #[test]
    fn input_accepts_null_values() {
        let json = r#"{"avgSpeedLoadedKmph": null, "uptimePercent": 75}"#;
        let input: ScenarioInput = serde_json::from_str(json).unwrap();

        assert_eq!(input.avg_speed_loaded_kmph, None);
        assert_eq!(input.uptime_percent, Some(75.0));
    }

    #[test]
    fn record_serializes_with_camel_case_field_names() {
        let json = serde_json::to_string(&build_record()).unwrap();

        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"updatedAt\""));
        assert!(json.contains("\"haulDistanceKmOneWay\":2.5"));
        assert!(json.contains("\"serviceSekPerKm\":85.0"));
    }

    #[test]
    fn patch_replaces_present_fields_only() {
        let mut record = build_record();
        let mut input = ScenarioInput::new();
        input.material_ktons_per_year = Some(10.0);

        ScenarioPatch {
            name: None,
            input: Some(input.clone()),
        }
        .apply(&mut record, "2026-02-01T00:00:00.000Z".to_string());

        assert_eq!(record.name, "Pit A");
        assert_eq!(record.input, input);
        assert_eq!(record.created_at, "2026-01-01T00:00:00.000Z");
        assert_eq!(record.updated_at, "2026-02-01T00:00:00.000Z");
    }

    #[test]
    fn patch_ignores_blank_name() {
        let mut record = build_record();
        ScenarioPatch {
            name: Some("   ".to_string()),
            input: None,
        }
        .apply(&mut record, "2026-02-01T00:00:00.000Z".to_string());

        assert_eq!(record.name, "Pit A");
        assert_eq!(record.input, ScenarioInput::default_scenario());
    }

    #[test]
    fn record_without_name_is_unnamed() {
        let record: ScenarioRecord = serde_json::from_str(r#"{"id": "scenario_9"}"#).unwrap();
        assert_eq!(record.name, "Unnamed Scenario");
        assert_eq!(record.input, ScenarioInput::new());
        assert_eq!(record.updated_at, "");
    }

    #[test]
    fn summary_drops_input() {
        let summary = build_record().summary();
        assert_eq!(summary.id, "scenario_1");
        assert_eq!(summary.name, "Pit A");
        assert_eq!(summary.updated_at, "2026-01-01T00:00:00.000Z");
    }
}
