use chrono::NaiveDate;

use crate::clock::Clock;
use crate::dates;
use crate::models::{Cycle, CycleSummary};

pub const DEFAULT_CYCLE_LENGTH: i64 = 28;

/// 1-based day of the current cycle; `0` without history.
pub fn day_of_cycle(cycles: &[Cycle], clock: &impl Clock) -> i64 {
    match cycles.first() {
        Some(current) => dates::days_between(current.start_date, clock.today()) + 1,
        None => 0,
    }
}

/// Mean cycle length over the displayed cycles, ignoring the open cycle.
pub fn average_cycle_length(cycles: &[Cycle], window: usize) -> i64 {
    let lengths: Vec<i64> = displayed(cycles, window)
        .iter()
        .map(|c| c.cycle_length)
        .filter(|&len| len != 0)
        .collect();
    floor_mean(&lengths)
}

/// Mean period length over the displayed cycles.
pub fn average_period_length(cycles: &[Cycle], window: usize) -> i64 {
    let lengths: Vec<i64> = displayed(cycles, window)
        .iter()
        .map(|c| c.period_length)
        .collect();
    floor_mean(&lengths)
}

pub fn last_start_date(cycles: &[Cycle]) -> Option<NaiveDate> {
    cycles.first().map(|c| c.start_date)
}

pub fn last_period_length(cycles: &[Cycle]) -> i64 {
    cycles.first().map_or(0, |c| c.period_length)
}

/// Cycle length assumed for the current cycle.
///
/// The current cycle's own length when it is already known, otherwise the
/// average of the displayed cycles, otherwise [`DEFAULT_CYCLE_LENGTH`].
pub fn estimated_cycle_length(cycles: &[Cycle], window: usize) -> i64 {
    match cycles.first() {
        None => DEFAULT_CYCLE_LENGTH,
        Some(current) if current.cycle_length > 0 => current.cycle_length,
        Some(_) => match average_cycle_length(cycles, window) {
            0 => DEFAULT_CYCLE_LENGTH,
            average => average,
        },
    }
}

/// Whether today is one of the days of the latest recorded period.
pub fn is_period_today(cycles: &[Cycle], clock: &impl Clock) -> bool {
    cycles
        .first()
        .is_some_and(|current| current.contains_period_day(clock.today()))
}

/// Completed displayed cycles, newest first.
pub fn cycle_summaries(cycles: &[Cycle], window: usize) -> Vec<CycleSummary> {
    displayed(cycles, window)
        .iter()
        .skip(1)
        .map(|c| CycleSummary {
            start: c.start_date,
            end: dates::add_days(c.start_date, c.cycle_length.saturating_sub(1)),
            cycle_length: c.cycle_length,
            period_length: c.period_length,
        })
        .collect()
}

/// Common scale for cycle progress bars: the longest of any recorded cycle
/// and the current one so far.
pub fn progress_scale(cycles: &[Cycle], clock: &impl Clock) -> i64 {
    cycles
        .iter()
        .map(|c| c.cycle_length)
        .fold(day_of_cycle(cycles, clock), i64::max)
}

pub(crate) fn displayed(cycles: &[Cycle], window: usize) -> &[Cycle] {
    &cycles[..cycles.len().min(window)]
}

fn floor_mean(values: &[i64]) -> i64 {
    if values.is_empty() {
        return 0;
    }
    let sum = values.iter().fold(0i64, |acc, &v| acc.saturating_add(v));
    sum.div_euclid(values.len() as i64)
}
