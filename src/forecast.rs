//! Projection of future periods and ovulation windows, plus the recorded
//! period days the calendar highlights next to them.

use chrono::NaiveDate;

use crate::clock::Clock;
use crate::dates;
use crate::history::recorded_days;
use crate::models::Cycle;
use crate::phase::{OVULATION_OFFSET_DAYS, OVULATION_WINDOW_DAYS};
use crate::stats::{average_period_length, displayed, estimated_cycle_length};

/// Number of future cycles projected from the current one.
pub const FORECAST_CYCLES: i64 = 6;

/// Period length assumed for a period marked today when nothing is known yet.
pub const DEFAULT_PERIOD_LENGTH: i64 = 5;

/// Start days of the projected cycles, every one a full estimated length apart.
fn projected_starts(cycles: &[Cycle], window: usize) -> Vec<NaiveDate> {
    let Some(current) = cycles.first() else {
        return Vec::new();
    };
    let cycle_length = estimated_cycle_length(cycles, window);
    (1..=FORECAST_CYCLES)
        .map(|step| dates::add_days(current.start_date, step.saturating_mul(cycle_length)))
        .collect()
}

fn ovulation_days_from(cycle_start: NaiveDate, cycle_length: i64) -> Vec<NaiveDate> {
    dates::date_range(
        dates::add_days(cycle_start, cycle_length.saturating_sub(OVULATION_OFFSET_DAYS)),
        OVULATION_WINDOW_DAYS,
    )
}

pub fn forecast_period_dates(cycles: &[Cycle], window: usize) -> Vec<NaiveDate> {
    let period_length = average_period_length(cycles, window).max(1);
    projected_starts(cycles, window)
        .into_iter()
        .flat_map(|start| dates::date_range(start, period_length))
        .collect()
}

pub fn forecast_ovulation_dates(cycles: &[Cycle], window: usize) -> Vec<NaiveDate> {
    let cycle_length = estimated_cycle_length(cycles, window);
    projected_starts(cycles, window)
        .into_iter()
        .flat_map(|start| ovulation_days_from(start, cycle_length))
        .collect()
}

/// Ovulation windows of the displayed cycles followed by the forecast ones.
///
/// Empty until at least two cycles are recorded.
pub fn ovulation_dates(cycles: &[Cycle], window: usize) -> Vec<NaiveDate> {
    if cycles.len() <= 1 {
        return Vec::new();
    }
    let estimate = estimated_cycle_length(cycles, window);
    let mut days: Vec<NaiveDate> = displayed(cycles, window)
        .iter()
        .flat_map(|cycle| {
            let length = if cycle.is_open() { estimate } else { cycle.cycle_length };
            ovulation_days_from(cycle.start_date, length)
        })
        .collect();
    days.extend(forecast_ovulation_dates(cycles, window));
    days
}

/// Recorded period days of the displayed cycles, newest cycle first.
pub fn period_dates(cycles: &[Cycle], window: usize) -> Vec<NaiveDate> {
    recorded_days(displayed(cycles, window))
}

pub fn period_dates_of_last_cycle(cycles: &[Cycle]) -> Vec<NaiveDate> {
    cycles.first().map(Cycle::period_days).unwrap_or_default()
}

/// The displayed period days plus a new period starting today: the mark set
/// that results from "my period started today".
pub fn period_dates_with_new_element(
    cycles: &[Cycle],
    window: usize,
    clock: &impl Clock,
) -> Vec<NaiveDate> {
    let length = match average_period_length(cycles, window) {
        0 => DEFAULT_PERIOD_LENGTH,
        average => average,
    };
    let mut days = period_dates(cycles, window);
    days.extend(dates::date_range(clock.today(), length));
    days
}
