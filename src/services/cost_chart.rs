use std::path::Path;

use plotters::prelude::*;
use thiserror::Error;

use crate::domain::result::ScenarioResult;
use crate::services::report::format_grouped;

#[derive(Error, Debug)]
pub enum CostChartError {
    #[error("failed to render cost chart: {0}")]
    Render(String),
}

/// Year-1 cost bars in EUR. Service cost is SEK and stays off the chart.
pub fn cost_bars(result: &ScenarioResult) -> [(&'static str, f64); 3] {
    [
        ("CAPEX", result.capex_eur),
        ("OPEX/year", result.opex_eur_per_year),
        ("Year 1 total", result.capex_eur + result.opex_eur_per_year),
    ]
}

pub fn write_cost_chart_png(output_path: &Path, result: &ScenarioResult) -> Result<(), CostChartError> {
    let bars = cost_bars(result);
    let max_value = bars.iter().map(|(_, value)| *value).fold(0.0_f64, f64::max);
    let max_y = if max_value > 0.0 { max_value * 1.1 } else { 1.0 };

    let root = BitMapBackend::new(output_path, (900, 600)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| CostChartError::Render(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption("Year 1 Costs (EUR)", ("sans-serif", 30))
        .x_label_area_size(55)
        .y_label_area_size(110)
        .build_cartesian_2d(0..bars.len() as i32, 0.0..max_y)
        .map_err(|e| CostChartError::Render(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .y_desc("EUR")
        .label_style(("sans-serif", 18))
        .axis_desc_style(("sans-serif", 22))
        .x_labels(bars.len())
        .x_label_formatter(&|index| {
            usize::try_from(*index)
                .ok()
                .and_then(|idx| bars.get(idx))
                .map(|(label, _)| label.to_string())
                .unwrap_or_default()
        })
        .y_label_formatter(&|value| format_grouped(*value, 0))
        .draw()
        .map_err(|e| CostChartError::Render(e.to_string()))?;

    let bar_color = RGBColor(0, 102, 153);
    let bar_style = ShapeStyle::from(&bar_color).filled();
    chart
        .draw_series(bars.iter().enumerate().map(|(idx, (_, value))| {
            let idx = idx as i32;
            Rectangle::new([(idx, 0.0), (idx + 1, value.max(0.0))], bar_style)
        }))
        .map_err(|e| CostChartError::Render(e.to_string()))?;

    root.present()
        .map_err(|e| CostChartError::Render(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::scenario::ScenarioInput;
    use crate::services::evaluator::evaluate;
    use predicates::prelude::*;

    #[test]
    fn cost_bars_add_capex_and_opex_for_year_one() {
        let result = evaluate(&ScenarioInput::default_scenario());
        let bars = cost_bars(&result);

        assert_eq!(bars[0], ("CAPEX", 2_450_000.0));
        assert_eq!(bars[1], ("OPEX/year", 720_000.0));
        assert_eq!(bars[2], ("Year 1 total", 3_170_000.0));
    }

    #[test]
    fn write_cost_chart_png_creates_file() {
        let temp = assert_fs::TempDir::new().unwrap();
        let output = temp.path().join("costs.png");
        let result = evaluate(&ScenarioInput::default_scenario());

        write_cost_chart_png(&output, &result).unwrap();

        assert!(predicate::path::exists().eval(&output));
        assert!(std::fs::metadata(&output).unwrap().len() > 0);
    }

    #[test]
    fn write_cost_chart_png_handles_all_zero_costs() {
        let temp = assert_fs::TempDir::new().unwrap();
        let output = temp.path().join("zero.png");
        let result = evaluate(&ScenarioInput::new());

        write_cost_chart_png(&output, &result).unwrap();

        assert!(std::fs::metadata(&output).unwrap().len() > 0);
    }
}
