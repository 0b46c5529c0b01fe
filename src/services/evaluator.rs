//! Fleet sizing and cost evaluation.
//!
//! `evaluate` is total: absent, NaN or negative inputs are defaulted and
//! clamped up front, magnitudes are bounded to
//! `[MIN_INPUT_MAGNITUDE, MAX_INPUT_MAGNITUDE]` (or zero), and every division
//! is guarded, so the result never holds NaN or infinity.

use tracing::debug;

use crate::domain::assumptions::{
    DEFAULT_SPEED_EMPTY_KMPH, DEFAULT_SPEED_LOADED_KMPH, DEFAULT_UPTIME_PERCENT,
    GRADE_PENALTY_PER_PERCENT, MAX_INPUT_MAGNITUDE, MIN_INPUT_MAGNITUDE, MIN_SPEED_FACTOR,
    MIN_SPEED_KMPH, OPERATING_DAYS_PER_YEAR, OPERATING_HOURS_PER_DAY, PAYLOAD_TONS_PER_TRIP,
    SHIFTS_PER_DAY,
};
use crate::domain::result::{Explain, ScenarioResult};
use crate::domain::scenario::ScenarioInput;

/// Input after defaulting. Every value is finite and within its domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SanitizedInput {
    pub material_ktons_per_year: f64,
    pub haul_km_one_way: f64,
    pub grade_abs_percent: f64,
    pub speed_loaded_kmph: f64,
    pub speed_empty_kmph: f64,
    pub queue_to_loader_seconds: f64,
    pub queue_to_dump_seconds: f64,
    pub loading_minutes: f64,
    pub dumping_minutes: f64,
    pub uptime: f64,
    pub shift_change_min_per_shift: f64,
    pub price_vehicle_eur: f64,
    pub price_hw_eur: f64,
    pub license_eur_per_year_per_truck: f64,
    pub site_license_eur_per_year: f64,
    pub fms_fixed_eur_per_year: f64,
    pub fms_per_truck_eur_per_year: f64,
    pub service_sek_per_km: f64,
}

/// Treats NaN and infinities like an absent value and bounds the rest.
fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite()).map(bounded)
}

fn bounded(value: f64) -> f64 {
    if value.abs() < MIN_INPUT_MAGNITUDE {
        0.0
    } else {
        clamp(value, -MAX_INPUT_MAGNITUDE, MAX_INPUT_MAGNITUDE)
    }
}

fn non_negative(value: Option<f64>) -> f64 {
    finite(value).unwrap_or(0.0).max(0.0)
}

fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}

pub(crate) fn sanitize(input: &ScenarioInput) -> SanitizedInput {
    let uptime_percent = finite(input.uptime_percent).unwrap_or(DEFAULT_UPTIME_PERCENT);

    SanitizedInput {
        material_ktons_per_year: non_negative(input.material_ktons_per_year),
        haul_km_one_way: non_negative(input.haul_distance_km_one_way),
        grade_abs_percent: finite(input.avg_grade_percent).unwrap_or(0.0).abs(),
        speed_loaded_kmph: finite(input.avg_speed_loaded_kmph)
            .unwrap_or(DEFAULT_SPEED_LOADED_KMPH)
            .max(MIN_SPEED_KMPH),
        speed_empty_kmph: finite(input.avg_speed_empty_kmph)
            .unwrap_or(DEFAULT_SPEED_EMPTY_KMPH)
            .max(MIN_SPEED_KMPH),
        queue_to_loader_seconds: non_negative(input.queue_to_loader_seconds_avg),
        queue_to_dump_seconds: non_negative(input.queue_to_dump_seconds_avg),
        loading_minutes: non_negative(input.loading_time_min),
        dumping_minutes: non_negative(input.dumping_time_min),
        uptime: clamp(uptime_percent / 100.0, 0.0, 1.0),
        shift_change_min_per_shift: non_negative(input.shift_change_min_per_shift),
        price_vehicle_eur: non_negative(input.price_vehicle_eur),
        price_hw_eur: non_negative(input.price_hw_eur),
        license_eur_per_year_per_truck: non_negative(input.license_eur_per_year_per_truck),
        site_license_eur_per_year: non_negative(input.site_license_eur_per_year),
        fms_fixed_eur_per_year: non_negative(input.fms_fixed_eur_per_year),
        fms_per_truck_eur_per_year: non_negative(input.fms_per_truck_eur_per_year),
        service_sek_per_km: non_negative(input.service_sek_per_km),
    }
}

/// Grade penalty in `[MIN_SPEED_FACTOR, 1]`. Favorable grades give no bonus.
pub fn speed_factor(grade_abs_percent: f64) -> f64 {
    clamp(
        1.0 - GRADE_PENALTY_PER_PERCENT * grade_abs_percent,
        MIN_SPEED_FACTOR,
        1.0,
    )
}

/// Smallest fleet moving `target_tons` a year. Always rounds up, and
/// saturates at `u64::MAX` when the fleet does not fit.
pub fn fleet_size(target_tons: f64, tons_per_truck_per_year: f64) -> u64 {
    if tons_per_truck_per_year <= 0.0 || target_tons <= 0.0 || target_tons.is_nan() {
        return 0;
    }
    let trucks = (target_tons / tons_per_truck_per_year).ceil();
    if trucks.is_finite() && trucks < u64::MAX as f64 {
        trucks as u64
    } else {
        u64::MAX
    }
}

/// Maps a scenario to fleet size, cycle time and costs.
pub fn evaluate(input: &ScenarioInput) -> ScenarioResult {
    let input = sanitize(input);
    let mut explain = Explain::new();
    explain.number("payloadTonsPerTrip", PAYLOAD_TONS_PER_TRIP);
    explain.number("hoursPerDay", OPERATING_HOURS_PER_DAY);
    explain.number("shiftsPerDay", SHIFTS_PER_DAY);
    explain.number("daysPerYear", OPERATING_DAYS_PER_YEAR);

    let tons_per_year_target = input.material_ktons_per_year * 1000.0;
    explain.number("tonsPerYearTarget", tons_per_year_target);

    let haul_km_round_trip = 2.0 * input.haul_km_one_way;
    explain.number("haulKmRoundTrip", haul_km_round_trip);

    let speed_factor = speed_factor(input.grade_abs_percent);
    explain.number("gradeAbsPercent", input.grade_abs_percent);
    explain.number("speedFactor", speed_factor);

    let effective_speed_loaded = input.speed_loaded_kmph * speed_factor;
    let effective_speed_empty = input.speed_empty_kmph * speed_factor;
    explain.number("effectiveSpeedLoadedKmph", effective_speed_loaded);
    explain.number("effectiveSpeedEmptyKmph", effective_speed_empty);

    let travel_hours_loaded = input.haul_km_one_way / effective_speed_loaded;
    let travel_hours_empty = input.haul_km_one_way / effective_speed_empty;
    let travel_minutes = (travel_hours_loaded + travel_hours_empty) * 60.0;
    explain.number("travelMinutes", travel_minutes);

    let queue_seconds = input.queue_to_loader_seconds + input.queue_to_dump_seconds;
    let queue_minutes = queue_seconds / 60.0;
    explain.number("queueSeconds", queue_seconds);
    explain.number("queueMinutes", queue_minutes);
    explain.number("loadingMinutes", input.loading_minutes);
    explain.number("dumpingMinutes", input.dumping_minutes);

    let cycle_time_minutes =
        travel_minutes + queue_minutes + input.loading_minutes + input.dumping_minutes;
    explain.number("cycleTimeMinutes", cycle_time_minutes);

    let shift_change_hours_per_day = input.shift_change_min_per_shift * SHIFTS_PER_DAY / 60.0;
    let effective_hours_per_day = (OPERATING_HOURS_PER_DAY - shift_change_hours_per_day).max(0.0);
    let effective_hours_per_year = effective_hours_per_day * OPERATING_DAYS_PER_YEAR * input.uptime;
    explain.number("uptime", input.uptime);
    explain.number("shiftChangeHoursPerDay", shift_change_hours_per_day);
    explain.number("effectiveHoursPerDay", effective_hours_per_day);
    explain.number("effectiveHoursPerYear", effective_hours_per_year);

    let cycles_per_hour = if cycle_time_minutes > 0.0 {
        60.0 / cycle_time_minutes
    } else {
        0.0
    };
    let tons_per_hour_per_truck = cycles_per_hour * PAYLOAD_TONS_PER_TRIP;
    let tons_per_truck_per_year = tons_per_hour_per_truck * effective_hours_per_year;
    explain.number("cyclesPerHour", cycles_per_hour);
    explain.number("tonsPerHourPerTruck", tons_per_hour_per_truck);
    explain.number("tonsPerTruckPerYear", tons_per_truck_per_year);

    let trucks_needed = fleet_size(tons_per_year_target, tons_per_truck_per_year);
    let trucks = trucks_needed as f64;
    explain.number("trucksNeeded", trucks);

    let capex_eur = trucks * (input.price_vehicle_eur + input.price_hw_eur);
    explain.number("capexEur", capex_eur);

    let license_eur = trucks * input.license_eur_per_year_per_truck;
    let fms_eur = input.fms_fixed_eur_per_year + trucks * input.fms_per_truck_eur_per_year;
    let opex_eur_per_year = license_eur + input.site_license_eur_per_year + fms_eur;
    explain.number("licenseEur", license_eur);
    explain.number("siteLicenseEur", input.site_license_eur_per_year);
    explain.number("fmsEur", fms_eur);
    explain.number("opexEurPerYear", opex_eur_per_year);

    // Service cost stays in SEK; no exchange rate is applied.
    let km_per_year_fleet =
        haul_km_round_trip * cycles_per_hour * effective_hours_per_year * trucks;
    let service_sek_per_year = km_per_year_fleet * input.service_sek_per_km;
    explain.number("kmPerYearFleet", km_per_year_fleet);
    explain.number("serviceSekPerYear", service_sek_per_year);
    explain.text("serviceCurrency", "SEK");

    let cost_per_ton_year1_eur = if tons_per_year_target > 0.0 {
        (capex_eur + opex_eur_per_year) / tons_per_year_target
    } else {
        0.0
    };
    explain.number("costPerTonYear1Eur", cost_per_ton_year1_eur);

    debug!(
        trucks_needed,
        cycle_time_minutes, tons_per_truck_per_year, "scenario evaluated"
    );

    ScenarioResult {
        trucks_needed,
        tons_per_year_target,
        tons_per_truck_per_year,
        cycle_time_minutes,
        capex_eur,
        opex_eur_per_year,
        service_sek_per_year,
        cost_per_ton_year1_eur,
        explain,
    }
}
