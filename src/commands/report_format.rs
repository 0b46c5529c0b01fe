use crate::domain::result::{ExplainValue, ScenarioResult};
use crate::domain::scenario::ScenarioSummary;
use crate::services::report::{format_eur, format_grouped, format_sek};
use crate::services::scenario_store::StoreHealth;

pub fn format_evaluation(name: Option<&str>, result: &ScenarioResult) -> String {
    let mut lines = Vec::new();
    lines.push("Scenario Evaluation".to_string());
    if let Some(name) = name {
        lines.push(format!("Scenario: {name}"));
    }
    lines.push(format!("Trucks needed: {}", result.trucks_needed));
    lines.push(format!(
        "Annual tonnage: {} t",
        format_grouped(result.tons_per_year_target, 0)
    ));
    lines.push(format!(
        "Tons per truck and year: {} t",
        format_grouped(result.tons_per_truck_per_year, 0)
    ));
    lines.push(format!("Cycle time: {:.2} min", result.cycle_time_minutes));
    lines.push(format!("CAPEX: {}", format_eur(result.capex_eur, 0)));
    lines.push(format!("OPEX/year: {}", format_eur(result.opex_eur_per_year, 0)));
    lines.push(format!("Service/year: {}", format_sek(result.service_sek_per_year)));
    lines.push(format!(
        "Cost per ton (year 1): {}",
        format_eur(result.cost_per_ton_year1_eur, 2)
    ));
    lines.push(String::new());
    lines.push("Explain:".to_string());
    lines.push("Step | Value".to_string());
    lines.push("-----|------".to_string());
    for entry in result.explain.iter() {
        lines.push(format!("{} | {}", entry.label, format_explain_value(&entry.value)));
    }

    lines.join("\n")
}

fn format_explain_value(value: &ExplainValue) -> String {
    match value {
        ExplainValue::Number(number) if number.fract() == 0.0 => format!("{number:.0}"),
        ExplainValue::Number(number) => format!("{number:.4}"),
        ExplainValue::Text(text) => text.clone(),
    }
}

pub fn format_scenario_list(summaries: &[ScenarioSummary]) -> String {
    if summaries.is_empty() {
        return "No saved scenarios".to_string();
    }
    let mut lines = Vec::new();
    lines.push("Id | Name | Updated".to_string());
    lines.push("---|------|--------".to_string());
    for summary in summaries {
        lines.push(format!(
            "{} | {} | {}",
            summary.id, summary.name, summary.updated_at
        ));
    }
    lines.join("\n")
}

pub fn format_store_health(health: &StoreHealth) -> String {
    let yes_no = |flag: bool| if flag { "yes" } else { "no" };
    [
        format!("Store backend: {}", health.backend),
        format!("Configured: {}", yes_no(health.configured)),
        format!("Connected: {}", yes_no(health.connected)),
        health.message.clone(),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::scenario::ScenarioInput;
    use crate::services::evaluator::evaluate;

    #[test]
    fn format_evaluation_includes_headline_figures() {
        let result = evaluate(&ScenarioInput::default_scenario());
        let output = format_evaluation(Some("Pit A"), &result);

        assert!(output.contains("Scenario Evaluation"));
        assert!(output.contains("Scenario: Pit A"));
        assert!(output.contains("Trucks needed: 7"));
        assert!(output.contains("Annual tonnage: 5 000 000 t"));
        assert!(output.contains("Cycle time: 18.41 min"));
        assert!(output.contains("CAPEX: 2 450 000 €"));
        assert!(output.contains("OPEX/year: 720 000 €"));
        assert!(output.contains("Service/year: 61 589 773 kr"));
        assert!(output.contains("Cost per ton (year 1): 0,63 €"));
    }

    #[test]
    fn format_evaluation_lists_explain_steps_in_order() {
        let result = evaluate(&ScenarioInput::default_scenario());
        let output = format_evaluation(None, &result);

        assert!(!output.contains("Scenario:"));
        assert!(output.contains("speedFactor | 0.9200"));
        assert!(output.contains("trucksNeeded | 7"));
        assert!(output.contains("serviceCurrency | SEK"));
        let speed = output.find("speedFactor |").unwrap();
        let trucks = output.find("trucksNeeded |").unwrap();
        assert!(speed < trucks);
    }

    #[test]
    fn format_scenario_list_renders_rows() {
        let summaries = vec![ScenarioSummary {
            id: "scenario_2".to_string(),
            name: "Pit B".to_string(),
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
            updated_at: "2026-01-02T00:00:00.000Z".to_string(),
        }];

        let output = format_scenario_list(&summaries);
        assert!(output.contains("Id | Name | Updated"));
        assert!(output.contains("scenario_2 | Pit B | 2026-01-02T00:00:00.000Z"));
        assert_eq!(format_scenario_list(&[]), "No saved scenarios");
    }

    #[test]
    fn format_store_health_shows_flags() {
        let output = format_store_health(&StoreHealth {
            backend: "kv".to_string(),
            configured: true,
            connected: false,
            message: "connection test failed".to_string(),
        });

        assert!(output.contains("Store backend: kv"));
        assert!(output.contains("Configured: yes"));
        assert!(output.contains("Connected: no"));
        assert!(output.ends_with("connection test failed"));
    }
}
