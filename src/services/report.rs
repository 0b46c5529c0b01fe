//! Printable scenario report.
//!
//! The report is a paginated plain-text document: a title block followed by
//! two-column tables for fleet sizing, costs and the input parameters. Numbers
//! use Swedish conventions (space digit grouping, decimal comma).

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;
use tracing::info;

use crate::domain::result::ScenarioResult;
use crate::domain::scenario::ScenarioInput;
use crate::services::cost_chart::{CostChartError, write_cost_chart_png};

pub const REPORT_TITLE: &str = "Pre-Sales Mining Calculator";
/// Lines per page, footer included.
pub const PAGE_HEIGHT: usize = 60;

const FOOTER_LINES: usize = 2;
const MISSING: &str = "-";

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to write report: {0}")]
    Write(#[from] std::io::Error),
    #[error(transparent)]
    Chart(#[from] CostChartError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pages: Vec<Vec<String>>,
}

impl Report {
    pub fn pages(&self) -> &[Vec<String>] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Pages separated by form feeds.
    pub fn to_text(&self) -> String {
        self.pages
            .iter()
            .map(|page| {
                let mut text = page.join("\n");
                text.push('\n');
                text
            })
            .collect::<Vec<_>>()
            .join("\u{c}")
    }
}

struct Section {
    title: &'static str,
    header: (&'static str, &'static str),
    rows: Vec<(&'static str, String)>,
}

impl Section {
    fn lines(&self) -> Vec<String> {
        let width = self
            .rows
            .iter()
            .map(|(label, _)| label.chars().count())
            .chain(std::iter::once(self.header.0.chars().count()))
            .max()
            .unwrap_or(0);

        let mut lines = vec![
            self.title.to_string(),
            "-".repeat(self.title.chars().count()),
            format!("{:<width$}  {}", self.header.0, self.header.1),
        ];
        for (label, value) in &self.rows {
            lines.push(format!("{label:<width$}  {value}"));
        }
        lines.push(String::new());
        lines
    }
}

pub fn render_report(
    result: &ScenarioResult,
    input: &ScenarioInput,
    name: Option<&str>,
    generated_on: NaiveDate,
) -> Report {
    render_report_with_page_height(result, input, name, generated_on, PAGE_HEIGHT)
}

pub fn render_report_with_page_height(
    result: &ScenarioResult,
    input: &ScenarioInput,
    name: Option<&str>,
    generated_on: NaiveDate,
    page_height: usize,
) -> Report {
    let mut blocks = vec![title_block(name, generated_on)];
    blocks.extend(
        [
            fleet_section(result),
            cost_section(result),
            input_section(input),
            financial_section(input),
        ]
        .iter()
        .map(Section::lines),
    );
    paginate(blocks, page_height)
}

fn title_block(name: Option<&str>, generated_on: NaiveDate) -> Vec<String> {
    let mut lines = vec![REPORT_TITLE.to_string(), "=".repeat(REPORT_TITLE.len())];
    if let Some(name) = scenario_name(name) {
        lines.push(format!("Scenario: {name}"));
    }
    lines.push(format!("Generated: {}", generated_on.format("%Y-%m-%d")));
    lines.push(String::new());
    lines
}

fn fleet_section(result: &ScenarioResult) -> Section {
    Section {
        title: "Fleet Sizing",
        header: ("Metric", "Value"),
        rows: vec![
            ("Number of trucks", format_grouped(result.trucks_needed as f64, 0)),
            ("Annual tonnage (tons)", format_grouped(result.tons_per_year_target, 0)),
            (
                "Tons per truck and year (tons)",
                format_grouped(result.tons_per_truck_per_year, 0),
            ),
            ("Cycle time (min)", format!("{:.2}", result.cycle_time_minutes)),
        ],
    }
}

fn cost_section(result: &ScenarioResult) -> Section {
    Section {
        title: "Cost Analysis",
        header: ("Cost Item", "Value"),
        rows: vec![
            ("CAPEX (EUR)", format_eur(result.capex_eur, 0)),
            ("OPEX/year (EUR)", format_eur(result.opex_eur_per_year, 0)),
            ("Service/year (SEK)", format_sek(result.service_sek_per_year)),
            (
                "Cost per ton (Year 1, EUR/ton)",
                format_eur(result.cost_per_ton_year1_eur, 2),
            ),
        ],
    }
}

fn input_section(input: &ScenarioInput) -> Section {
    let grouped = |value: Option<f64>| or_missing(value, |v| format_grouped(v, 0));
    let fixed = |value: Option<f64>, decimals: usize| or_missing(value, |v| format!("{v:.decimals$}"));
    Section {
        title: "Input Parameters",
        header: ("Parameter", "Value"),
        rows: vec![
            ("Material per year (kton)", grouped(input.material_ktons_per_year)),
            (
                "Distance loading → dump (km, one way)",
                fixed(input.haul_distance_km_one_way, 2),
            ),
            ("Speed loaded (km/h)", grouped(input.avg_speed_loaded_kmph)),
            ("Speed empty (km/h)", grouped(input.avg_speed_empty_kmph)),
            ("Average grade (%)", fixed(input.avg_grade_percent, 1)),
            (
                "Spotting time → loader (seconds)",
                grouped(input.queue_to_loader_seconds_avg),
            ),
            (
                "Spotting time → dump area (seconds)",
                grouped(input.queue_to_dump_seconds_avg),
            ),
            ("Loading time (min)", fixed(input.loading_time_min, 1)),
            ("Dumping time (min)", fixed(input.dumping_time_min, 1)),
            ("Uptime (%)", fixed(input.uptime_percent, 1)),
            (
                "Shift change time (min/shift)",
                fixed(input.shift_change_min_per_shift, 1),
            ),
        ],
    }
}

fn financial_section(input: &ScenarioInput) -> Section {
    let eur = |value: Option<f64>| or_missing(value, |v| format_eur(v, 0));
    Section {
        title: "Financial Parameters",
        header: ("Parameter", "Value"),
        rows: vec![
            ("Vehicle (EUR, each)", eur(input.price_vehicle_eur)),
            ("HW (EUR, each)", eur(input.price_hw_eur)),
            (
                "License (EUR/year per truck)",
                eur(input.license_eur_per_year_per_truck),
            ),
            ("Site license (EUR/year)", eur(input.site_license_eur_per_year)),
            ("FMS fixed (EUR/year)", eur(input.fms_fixed_eur_per_year)),
            (
                "FMS per truck (EUR/year per truck)",
                eur(input.fms_per_truck_eur_per_year),
            ),
            (
                "Service cost (SEK/km)",
                or_missing(input.service_sek_per_km, format_sek),
            ),
        ],
    }
}

fn or_missing(value: Option<f64>, format: impl Fn(f64) -> String) -> String {
    value
        .filter(|v| v.is_finite())
        .map(format)
        .unwrap_or_else(|| MISSING.to_string())
}

/// Blocks never straddle a page unless a block alone exceeds one.
fn paginate(blocks: Vec<Vec<String>>, page_height: usize) -> Report {
    let capacity = page_height.saturating_sub(FOOTER_LINES).max(1);
    let mut pages: Vec<Vec<String>> = vec![Vec::new()];

    for block in blocks {
        let used = pages.last().map(Vec::len).unwrap_or(0);
        if used > 0 && used + block.len() > capacity {
            pages.push(Vec::new());
        }
        for line in block {
            if pages.last().map(Vec::len).unwrap_or(0) >= capacity {
                pages.push(Vec::new());
            }
            if let Some(page) = pages.last_mut() {
                page.push(line);
            }
        }
    }

    let total = pages.len();
    for (index, page) in pages.iter_mut().enumerate() {
        page.push(String::new());
        page.push(format!("Page {} of {total} - {REPORT_TITLE}", index + 1));
    }
    Report { pages }
}

fn scenario_name(name: Option<&str>) -> Option<&str> {
    name.map(str::trim).filter(|name| !name.is_empty())
}

/// `Mining_Calculator_<name>_<date>.txt`, with every character outside
/// `[A-Za-z0-9]` in the name replaced by `_`.
pub fn report_file_name(name: Option<&str>, date: NaiveDate) -> String {
    let date = date.format("%Y-%m-%d");
    match scenario_name(name) {
        Some(name) => {
            let safe: String = name
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
                .collect();
            format!("Mining_Calculator_{safe}_{date}.txt")
        }
        None => format!("Mining_Calculator_{date}.txt"),
    }
}

/// Groups the integer part in threes with spaces and uses a decimal comma.
pub fn format_grouped(value: f64, decimals: usize) -> String {
    // Ties round away from zero; `format!` alone rounds them to even.
    let scale = 10f64.powi(i32::try_from(decimals).unwrap_or(i32::MAX));
    let rounded = (value.abs() * scale).round() / scale;
    let rounded = if rounded.is_finite() { rounded } else { value.abs() };
    let fixed = format!("{rounded:.decimals$}");
    let (integer, fraction) = match fixed.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (fixed.as_str(), None),
    };

    let digits: Vec<char> = integer.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.iter().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(*digit);
    }
    if let Some(fraction) = fraction {
        grouped.push(',');
        grouped.push_str(fraction);
    }

    let is_zero = fixed.chars().all(|c| c == '0' || c == '.');
    if value < 0.0 && !is_zero {
        format!("-{grouped}")
    } else {
        grouped
    }
}

pub fn format_eur(value: f64, decimals: usize) -> String {
    format!("{} €", format_grouped(value, decimals))
}

pub fn format_sek(value: f64) -> String {
    format!("{} kr", format_grouped(value, 0))
}

/// Writes the report, and the cost chart when asked, into `dir`.
///
/// Returns the written paths, report first.
pub fn export_report(
    dir: &Path,
    result: &ScenarioResult,
    input: &ScenarioInput,
    name: Option<&str>,
    generated_on: NaiveDate,
    with_chart: bool,
) -> Result<Vec<PathBuf>, ReportError> {
    std::fs::create_dir_all(dir)?;
    let report = render_report(result, input, name, generated_on);
    let report_path = dir.join(report_file_name(name, generated_on));
    std::fs::write(&report_path, report.to_text())?;
    info!(path = %report_path.display(), pages = report.page_count(), "report written");

    let mut written = vec![report_path];
    if with_chart {
        let chart_path = written[0].with_extension("png");
        write_cost_chart_png(&chart_path, result)?;
        written.push(chart_path);
    }
    Ok(written)
}
