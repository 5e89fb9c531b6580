//! Reconstruction of the cycle history from the raw marked days.

use chrono::NaiveDate;

use crate::dates;
use crate::models::Cycle;

/// Largest distance between two consecutive marked days that still belong to
/// the same bleeding episode. A distance of 1 means adjacent days.
pub const EPISODE_GAP_TOLERANCE_DAYS: i64 = 5;

/// Build the cycle history, most recent cycle first.
///
/// Duplicates and ordering of `marked` do not matter. Only the first and last
/// day of each episode are kept; unmarked days inside an episode still count
/// towards its period length.
pub fn build_history(marked: &[NaiveDate]) -> Vec<Cycle> {
    let mut days = marked.to_vec();
    days.sort_unstable_by(|a, b| b.cmp(a));
    days.dedup();

    let Some((&newest, rest)) = days.split_first() else {
        return Vec::new();
    };

    // (first, last) day per episode, newest episode first
    let mut episodes: Vec<(NaiveDate, NaiveDate)> = Vec::new();
    let mut episode_first = newest;
    let mut episode_last = newest;

    for &day in rest {
        if dates::days_between(day, episode_first) <= EPISODE_GAP_TOLERANCE_DAYS {
            episode_first = day;
        } else {
            episodes.push((episode_first, episode_last));
            episode_first = day;
            episode_last = day;
        }
    }
    episodes.push((episode_first, episode_last));

    let mut cycles = Vec::with_capacity(episodes.len());
    let mut next_start: Option<NaiveDate> = None;
    for (first, last) in episodes {
        let cycle_length = next_start.map_or(0, |next| dates::days_between(first, next));
        cycles.push(Cycle::new(
            first,
            dates::days_between(first, last) + 1,
            cycle_length,
        ));
        next_start = Some(first);
    }

    tracing::debug!(
        marked = days.len(),
        cycles = cycles.len(),
        "rebuilt cycle history"
    );
    cycles
}

/// Parse each text with [`dates::parse_date`], skip what does not parse, and build.
pub fn build_history_from_strings<S: AsRef<str>>(marked: &[S]) -> Vec<Cycle> {
    let days: Vec<NaiveDate> = marked
        .iter()
        .filter_map(|text| match dates::parse_date(text.as_ref()) {
            Ok(day) => Some(day),
            Err(err) => {
                tracing::warn!(%err, "skipping marked day");
                None
            }
        })
        .collect();
    build_history(&days)
}

/// Every day covered by a recorded period, newest cycle first.
pub fn recorded_days(cycles: &[Cycle]) -> Vec<NaiveDate> {
    cycles.iter().flat_map(Cycle::period_days).collect()
}
