use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates;

/// Longest bleeding episode accepted from stored or imported data.
pub const MAX_PERIOD_LENGTH_DAYS: i64 = 366;

/// One menstrual cycle, anchored at the first day of its bleeding episode.
///
/// `cycle_length` is the distance to the next more recent cycle's start;
/// `0` marks the current cycle whose length is not known yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cycle {
    #[serde(with = "dates::long_form")]
    pub start_date: NaiveDate,
    pub period_length: i64,
    pub cycle_length: i64,
}

impl Cycle {
    pub fn new(start_date: NaiveDate, period_length: i64, cycle_length: i64) -> Self {
        Self {
            start_date,
            period_length,
            cycle_length,
        }
    }

    /// Last marked day of the bleeding episode.
    pub fn period_end(&self) -> NaiveDate {
        dates::add_days(self.start_date, self.period_length.saturating_sub(1))
    }

    pub fn period_days(&self) -> Vec<NaiveDate> {
        dates::date_range(self.start_date, self.period_length)
    }

    pub fn contains_period_day(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.period_end()
    }

    pub fn is_open(&self) -> bool {
        self.cycle_length == 0
    }

    /// Lengths a recorded cycle can actually have.
    pub fn is_plausible(&self) -> bool {
        (1..=MAX_PERIOD_LENGTH_DAYS).contains(&self.period_length) && self.cycle_length >= 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    /// How many recent cycles feed averages, forecasts and lists.
    pub max_displayed_cycles: usize,
    #[serde(default = "default_show_fertility")]
    pub show_fertility: bool,
}

pub const DEFAULT_DISPLAYED_CYCLES: usize = 6;
pub const MAX_DISPLAYED_CYCLES: usize = 24;

fn default_show_fertility() -> bool {
    true
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            max_displayed_cycles: DEFAULT_DISPLAYED_CYCLES,
            show_fertility: true,
        }
    }
}

impl AppSettings {
    pub fn clamp_displayed_cycles(requested: usize) -> usize {
        requested.clamp(1, MAX_DISPLAYED_CYCLES)
    }
}

/// Everything persisted in the vault.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppData {
    pub cycles: Vec<Cycle>,
    pub settings: AppSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    None,
    Menstrual,
    Follicular,
    Ovulation,
    Luteal,
}

/// Static description of a phase for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhaseInfo {
    pub title: &'static str,
    pub description: &'static str,
    pub symptoms: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OvulationStatus {
    Finished,
    Today,
    Tomorrow,
    Possible,
    InDays(i64),
}

impl fmt::Display for OvulationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finished => f.write_str("finished"),
            Self::Today => f.write_str("today"),
            Self::Tomorrow => f.write_str("tomorrow"),
            Self::Possible => f.write_str("possible"),
            Self::InDays(days) => write!(f, "in {}", days_label(*days)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PregnancyChance {
    High,
    Low,
}

impl fmt::Display for PregnancyChance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => f.write_str("High"),
            Self::Low => f.write_str("Low"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CountdownTitle {
    PeriodIn,
    Period,
    PeriodIs,
    Delay,
}

impl fmt::Display for CountdownTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PeriodIn => "Period in",
            Self::Period => "Period",
            Self::PeriodIs => "Period is",
            Self::Delay => "Delay",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CountdownDays {
    /// No history to count from.
    Unknown,
    /// Today is the first day of the current period.
    Today,
    /// Today is the n-th day of the current period.
    PeriodDay(i64),
    PossibleToday,
    Days(i64),
}

impl fmt::Display for CountdownDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => f.write_str("---"),
            Self::Today => f.write_str("today"),
            Self::PeriodDay(_) => f.write_str("day"),
            Self::PossibleToday => f.write_str("possible today"),
            Self::Days(days) => f.write_str(&days_label(*days)),
        }
    }
}

/// Headline of the home screen: how far away (or late) the next period is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodCountdown {
    pub title: CountdownTitle,
    pub days: CountdownDays,
}

impl PeriodCountdown {
    pub fn new(title: CountdownTitle, days: CountdownDays) -> Self {
        Self { title, days }
    }
}

impl fmt::Display for PeriodCountdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.title, self.days)
    }
}

/// English fallback for a day count; shells with translations use the number.
pub fn days_label(days: i64) -> String {
    if days == 1 {
        "1 Day".to_string()
    } else {
        format!("{days} Days")
    }
}

/// A completed cycle as listed on the details screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleSummary {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub cycle_length: i64,
    pub period_length: i64,
}

/// Inclusive first/last selectable day of a calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarBounds {
    pub min: NaiveDate,
    pub max: NaiveDate,
}

/// Data for the home screen.
#[derive(Debug, Clone, Serialize)]
pub struct HomeView {
    pub today: NaiveDate,
    pub countdown: PeriodCountdown,
    pub countdown_text: String,
    pub day_of_cycle: i64,
    pub phase: Phase,
    pub phase_info: PhaseInfo,
    pub ovulation: Option<OvulationStatus>,
    pub pregnancy_chance: Option<PregnancyChance>,
    pub period_today: bool,
}

/// Data for the details screen.
#[derive(Debug, Clone, Serialize)]
pub struct DetailsView {
    pub average_cycle_length: i64,
    pub average_period_length: i64,
    pub last_start_date: Option<NaiveDate>,
    pub last_period_length: i64,
    pub day_of_cycle: i64,
    pub progress_scale: i64,
    pub history: Vec<CycleSummary>,
    pub stored_cycles: usize,
}

/// Highlight sets and bounds for the month calendar, as short keys.
#[derive(Debug, Clone, Serialize)]
pub struct CalendarView {
    pub bounds: CalendarBounds,
    pub edit_bounds: CalendarBounds,
    pub period_days: Vec<String>,
    pub forecast_period_days: Vec<String>,
    pub ovulation_days: Vec<String>,
}
