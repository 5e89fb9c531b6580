//! Rules for editing the marked days in the month calendar.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::clock::Clock;
use crate::dates;
use crate::forecast::{forecast_period_dates, period_dates, period_dates_of_last_cycle};
use crate::history::{build_history, recorded_days};
use crate::models::{CalendarBounds, Cycle};

/// How far past today the read-only calendar always reaches.
pub const VIEW_MONTHS_AHEAD: u32 = 6;

/// Whether `candidate` may be toggled in the edit calendar.
///
/// Days of a recorded period are always editable, as is anything before the
/// recorded history. Any other day is measured from the nearest period start
/// before it: inside a completed cycle it is always editable; inside the
/// current cycle it must not lie after today nor further from the start than
/// the longest completed cycle.
pub fn is_date_editable(candidate: NaiveDate, cycles: &[Cycle], clock: &impl Clock) -> bool {
    if cycles.is_empty() || cycles.iter().any(|c| c.contains_period_day(candidate)) {
        return true;
    }
    let Some(anchor) = cycles.iter().find(|c| c.start_date <= candidate) else {
        return true;
    };
    if !anchor.is_open() {
        return true;
    }

    let day = dates::days_between(anchor.start_date, candidate) + 1;
    let mut limit = dates::days_between(anchor.start_date, clock.today()) + 1;
    if let Some(longest) = cycles.iter().map(|c| c.cycle_length).max().filter(|&l| l > 0) {
        limit = limit.min(longest);
    }
    day <= limit
}

/// First day whose marking differs between `marked` and the recorded history
/// and that [`is_date_editable`] refuses, if any.
pub fn first_uneditable_toggle(
    marked: &[NaiveDate],
    cycles: &[Cycle],
    clock: &impl Clock,
) -> Option<NaiveDate> {
    let recorded: BTreeSet<NaiveDate> = recorded_days(cycles).into_iter().collect();
    let marked: BTreeSet<NaiveDate> = marked.iter().copied().collect();
    recorded
        .symmetric_difference(&marked)
        .copied()
        .find(|&day| !is_date_editable(day, cycles, clock))
}

/// Bounds of the read-only calendar: from the month of the first displayed
/// period to the end of the month of the last forecast (at least six months ahead).
pub fn view_calendar_bounds(cycles: &[Cycle], window: usize, clock: &impl Clock) -> CalendarBounds {
    let today = clock.today();
    let first = period_dates(cycles, window).into_iter().min().unwrap_or(today);
    let last_forecast = forecast_period_dates(cycles, window)
        .into_iter()
        .max()
        .unwrap_or(today);

    CalendarBounds {
        min: dates::start_of_month(first),
        max: dates::end_of_month(last_forecast.max(dates::add_months(today, VIEW_MONTHS_AHEAD))),
    }
}

/// Bounds of the edit calendar: nothing after today unless already recorded.
pub fn edit_calendar_bounds(cycles: &[Cycle], window: usize, clock: &impl Clock) -> CalendarBounds {
    let today = clock.today();
    let recorded = period_dates(cycles, window);
    let first = recorded.iter().copied().min().unwrap_or(today);
    let last = recorded.iter().copied().max().unwrap_or(today);
    let months_back = u32::try_from(window).unwrap_or(u32::MAX);

    CalendarBounds {
        min: dates::start_of_month(first.min(dates::sub_months(today, months_back))),
        max: today.max(last),
    }
}

/// Rebuild the history from the days left marked after an edit.
///
/// Un-marking today while the latest period covers today is taken as
/// withdrawing that whole period.
pub fn commit_calendar_edit(
    marked: &[NaiveDate],
    cycles: &[Cycle],
    clock: &impl Clock,
) -> Vec<Cycle> {
    let today = clock.today();
    let last_period = period_dates_of_last_cycle(cycles);

    let mut marked = marked.to_vec();
    if last_period.contains(&today) && !marked.contains(&today) {
        marked.retain(|day| !last_period.contains(day));
        tracing::debug!(dropped = last_period.len(), "latest period withdrawn");
    }
    build_history(&marked)
}
