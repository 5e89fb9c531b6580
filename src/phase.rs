//! Where today falls inside the current cycle.
//!
//! All positions are 1-based days of the cycle. With an estimated cycle
//! length `L` the ovulation window covers days `L - 15 ..= L - 12` (the four
//! days starting `L - 16` days after the cycle start) and the most likely
//! ovulation day is `L - 14`.

use crate::clock::Clock;
use crate::dates;
use crate::models::{
    CountdownDays, CountdownTitle, Cycle, OvulationStatus, PeriodCountdown, Phase, PhaseInfo,
    PregnancyChance,
};
use crate::stats::{day_of_cycle, estimated_cycle_length};

/// Days between the start of the ovulation window and the end of the cycle.
pub const OVULATION_OFFSET_DAYS: i64 = 16;
pub const OVULATION_WINDOW_DAYS: i64 = 4;

/// Ovulation window of a cycle of `cycle_length` days, as days of the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OvulationWindow {
    pub first_day: i64,
    pub last_day: i64,
}

impl OvulationWindow {
    pub fn for_cycle_length(cycle_length: i64) -> Self {
        let first_day = cycle_length.saturating_sub(OVULATION_OFFSET_DAYS - 1);
        Self {
            first_day,
            last_day: first_day.saturating_add(OVULATION_WINDOW_DAYS - 1),
        }
    }

    pub fn ovulation_day(&self) -> i64 {
        self.first_day.saturating_add(1)
    }

    pub fn contains(&self, day: i64) -> bool {
        day >= self.first_day && day <= self.last_day
    }
}

fn current_window(cycles: &[Cycle], window: usize) -> OvulationWindow {
    OvulationWindow::for_cycle_length(estimated_cycle_length(cycles, window))
}

pub fn current_phase(cycles: &[Cycle], window: usize, clock: &impl Clock) -> Phase {
    let Some(current) = cycles.first() else {
        return Phase::None;
    };
    let day = day_of_cycle(cycles, clock);
    let ovulation = current_window(cycles, window);

    if day < 1 {
        Phase::None
    } else if day <= current.period_length {
        Phase::Menstrual
    } else if day < ovulation.first_day {
        Phase::Follicular
    } else if day <= ovulation.last_day {
        Phase::Ovulation
    } else {
        Phase::Luteal
    }
}

pub fn ovulation_status(
    cycles: &[Cycle],
    window: usize,
    clock: &impl Clock,
) -> Option<OvulationStatus> {
    if cycles.is_empty() {
        return None;
    }
    let day = day_of_cycle(cycles, clock);
    let ovulation = current_window(cycles, window);
    let ovulation_day = ovulation.ovulation_day();

    let status = if day > ovulation.last_day {
        OvulationStatus::Finished
    } else if day == ovulation_day {
        OvulationStatus::Today
    } else if day == ovulation_day.saturating_sub(1) {
        OvulationStatus::Tomorrow
    } else if day > ovulation_day {
        OvulationStatus::Possible
    } else {
        OvulationStatus::InDays(ovulation_day.saturating_sub(day))
    };
    Some(status)
}

/// High from the day before the ovulation window through its last day.
pub fn pregnancy_chance(
    cycles: &[Cycle],
    window: usize,
    clock: &impl Clock,
) -> Option<PregnancyChance> {
    if cycles.is_empty() {
        return None;
    }
    let day = day_of_cycle(cycles, clock);
    let ovulation = current_window(cycles, window);
    if day >= ovulation.first_day.saturating_sub(1) && day <= ovulation.last_day {
        Some(PregnancyChance::High)
    } else {
        Some(PregnancyChance::Low)
    }
}

pub fn days_before_period(cycles: &[Cycle], window: usize, clock: &impl Clock) -> PeriodCountdown {
    let Some(current) = cycles.first() else {
        return PeriodCountdown::new(CountdownTitle::PeriodIn, CountdownDays::Unknown);
    };
    let today = clock.today();

    if today == current.start_date {
        return PeriodCountdown::new(CountdownTitle::Period, CountdownDays::Today);
    }
    if current.contains_period_day(today) {
        let day = day_of_cycle(cycles, clock);
        return PeriodCountdown::new(CountdownTitle::Period, CountdownDays::PeriodDay(day));
    }

    let predicted = dates::add_days(current.start_date, estimated_cycle_length(cycles, window));
    let remaining = dates::days_between(today, predicted);

    if remaining > 0 {
        PeriodCountdown::new(CountdownTitle::PeriodIn, CountdownDays::Days(remaining))
    } else if remaining == 0 || cycles.len() == 1 {
        // a single cycle has no learned length to call a delay against
        PeriodCountdown::new(CountdownTitle::PeriodIs, CountdownDays::PossibleToday)
    } else {
        PeriodCountdown::new(CountdownTitle::Delay, CountdownDays::Days(-remaining))
    }
}

static NO_PHASE: PhaseInfo = PhaseInfo {
    title: "",
    description: "",
    symptoms: &[""],
};

static MENSTRUAL: PhaseInfo = PhaseInfo {
    title: "Menstrual phase",
    description: "This cycle is accompanied by low hormone levels.",
    symptoms: &[
        "lack of energy and strength",
        "pain",
        "weakness and irritability",
        "increased appetite",
    ],
};

static FOLLICULAR: PhaseInfo = PhaseInfo {
    title: "Follicular phase",
    description: "The level of estrogen in this phase rises and reaches a maximum level.",
    symptoms: &[
        "strength and vigor appear",
        "endurance increases",
        "new ideas and plans appear",
        "libido increases",
    ],
};

static OVULATION: PhaseInfo = PhaseInfo {
    title: "Ovulation phase",
    description: "Once estrogen levels peak, they trigger the release of two important \
        ovulation hormones, follicle-stimulating hormone and luteinizing hormone.",
    symptoms: &[
        "increased sexual desire",
        "optimistic mood",
        "mild fever",
        "lower abdominal pain",
        "chest discomfort and bloating",
        "characteristic secretions",
    ],
};

static LUTEAL: PhaseInfo = PhaseInfo {
    title: "Luteal phase",
    description: "Levels of the hormones estrogen and progesterone first rise and then drop \
        sharply just before a period. Progesterone reaches its peak in the luteal phase.",
    symptoms: &[
        "breast tenderness",
        "puffiness",
        "acne and skin rashes",
        "increased appetite",
        "diarrhea or constipation",
        "irritability and depressed mood",
    ],
};

impl Phase {
    pub fn info(self) -> &'static PhaseInfo {
        match self {
            Phase::None => &NO_PHASE,
            Phase::Menstrual => &MENSTRUAL,
            Phase::Follicular => &FOLLICULAR,
            Phase::Ovulation => &OVULATION,
            Phase::Luteal => &LUTEAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    /// Six regular 28-day cycles; the newest started `28 - offset` days ago.
    fn regular(offset: i64) -> Vec<Cycle> {
        let mut start = dates::add_days(today(), offset);
        let mut cycles = Vec::new();
        for _ in 0..6 {
            start = dates::sub_days(start, 28);
            cycles.push(Cycle::new(start, 6, 28));
        }
        cycles[0].cycle_length = 0;
        cycles
    }

    fn clock() -> FixedClock {
        FixedClock(today())
    }

    #[test]
    fn window_positions() {
        let window = OvulationWindow::for_cycle_length(28);
        assert_eq!(window, OvulationWindow { first_day: 13, last_day: 16 });
        assert_eq!(window.ovulation_day(), 14);
    }

    #[test]
    fn empty_history_has_no_phase() {
        assert_eq!(current_phase(&[], 6, &clock()), Phase::None);
        assert_eq!(Phase::None.info().title, "");
        assert_eq!(ovulation_status(&[], 6, &clock()), None);
        assert_eq!(pregnancy_chance(&[], 6, &clock()), None);
    }

    #[test]
    fn phases_follow_the_cycle() {
        assert_eq!(current_phase(&regular(26), 6, &clock()), Phase::Menstrual);
        assert_eq!(current_phase(&regular(20), 6, &clock()), Phase::Follicular);
        assert_eq!(current_phase(&regular(14), 6, &clock()), Phase::Ovulation);
        assert_eq!(current_phase(&regular(5), 6, &clock()), Phase::Luteal);
        assert_eq!(Phase::Luteal.info().symptoms.len(), 6);
    }

    #[test]
    fn ovulation_countdown() {
        assert_eq!(
            ovulation_status(&regular(24), 6, &clock()),
            Some(OvulationStatus::InDays(9))
        );
        assert_eq!(ovulation_status(&regular(16), 6, &clock()), Some(OvulationStatus::Tomorrow));
        assert_eq!(ovulation_status(&regular(15), 6, &clock()), Some(OvulationStatus::Today));
        assert_eq!(ovulation_status(&regular(14), 6, &clock()), Some(OvulationStatus::Possible));
        assert_eq!(ovulation_status(&regular(10), 6, &clock()), Some(OvulationStatus::Finished));
        assert_eq!(OvulationStatus::InDays(9).to_string(), "in 9 Days");
    }

    #[test]
    fn pregnancy_chance_around_ovulation() {
        assert_eq!(pregnancy_chance(&regular(15), 6, &clock()), Some(PregnancyChance::High));
        assert_eq!(pregnancy_chance(&regular(20), 6, &clock()), Some(PregnancyChance::Low));
    }

    #[test]
    fn countdown_without_history() {
        let countdown = days_before_period(&[], 6, &clock());
        assert_eq!(countdown.to_string(), "Period in ---");
    }

    #[test]
    fn countdown_before_the_period() {
        assert_eq!(
            days_before_period(&regular(10), 6, &clock()),
            PeriodCountdown::new(CountdownTitle::PeriodIn, CountdownDays::Days(10))
        );
        let tomorrow = days_before_period(&regular(1), 6, &clock());
        assert_eq!(tomorrow.days, CountdownDays::Days(1));
        assert_eq!(tomorrow.to_string(), "Period in 1 Day");
    }

    #[test]
    fn countdown_on_the_predicted_day() {
        let countdown = days_before_period(&regular(0), 6, &clock());
        assert_eq!(
            countdown,
            PeriodCountdown::new(CountdownTitle::PeriodIs, CountdownDays::PossibleToday)
        );
        assert_eq!(countdown.to_string(), "Period is possible today");
    }

    #[test]
    fn single_cycle_never_reports_a_delay() {
        let on_time = vec![Cycle::new(dates::sub_days(today(), 28), 6, 28)];
        let late = vec![Cycle::new(dates::sub_days(today(), 38), 6, 28)];
        for cycles in [on_time, late] {
            assert_eq!(
                days_before_period(&cycles, 6, &clock()),
                PeriodCountdown::new(CountdownTitle::PeriodIs, CountdownDays::PossibleToday)
            );
        }
    }

    #[test]
    fn countdown_reports_delays() {
        let one = days_before_period(&regular(-1), 6, &clock());
        assert_eq!(one, PeriodCountdown::new(CountdownTitle::Delay, CountdownDays::Days(1)));
        assert_eq!(one.to_string(), "Delay 1 Day");
        assert_eq!(
            days_before_period(&regular(-10), 6, &clock()),
            PeriodCountdown::new(CountdownTitle::Delay, CountdownDays::Days(10))
        );
    }

    #[test]
    fn countdown_during_the_period() {
        assert_eq!(
            days_before_period(&regular(25), 6, &clock()),
            PeriodCountdown::new(CountdownTitle::Period, CountdownDays::PeriodDay(4))
        );
        assert_eq!(
            days_before_period(&regular(28), 6, &clock()),
            PeriodCountdown::new(CountdownTitle::Period, CountdownDays::Today)
        );
    }
}
