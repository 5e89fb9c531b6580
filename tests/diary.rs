use chrono::NaiveDate;
use period_diary::dates;
use period_diary::models::{CountdownDays, CountdownTitle, Phase};
use period_diary::{
    build_history, AppData, AppSettings, Cycle, Diary, DiaryError, FixedClock, Vault,
};

const PASS: &str = "correct horse battery";

fn day(key: &str) -> NaiveDate {
    dates::parse_key(key).unwrap()
}

fn new_diary(dir: &tempfile::TempDir) -> Diary {
    let mut diary = Diary::new(Vault::at(dir.path().join("diary.vault")));
    diary.setup(PASS.to_string()).unwrap();
    diary
}

fn three_periods() -> Vec<NaiveDate> {
    let mut marked = dates::date_range(day("2023-06-09"), 6);
    marked.extend(dates::date_range(day("2023-07-07"), 6));
    marked.extend(dates::date_range(day("2023-08-04"), 6));
    marked
}

#[test]
fn locked_diary_refuses_access() {
    let dir = tempfile::tempdir().unwrap();
    let mut diary = new_diary(&dir);
    diary.lock();
    assert!(matches!(diary.cycles(), Err(DiaryError::Locked)));
    assert!(matches!(diary.export_json(), Err(DiaryError::Locked)));
}

#[test]
fn setup_twice_is_rejected_and_unlock_checks_passphrase() {
    let dir = tempfile::tempdir().unwrap();
    let _ = new_diary(&dir);

    let mut again = Diary::new(Vault::at(dir.path().join("diary.vault")));
    assert!(again.is_setup());
    assert!(matches!(again.setup(PASS.into()), Err(DiaryError::AlreadySetUp)));
    assert!(!again.unlock("nope".into()).unwrap());
    assert!(again.unlock(PASS.into()).unwrap());
    assert!(again.is_unlocked());
}

#[test]
fn unlock_without_setup_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut diary = Diary::new(Vault::at(dir.path().join("missing.vault")));
    assert!(matches!(diary.unlock(PASS.into()), Err(DiaryError::NotSetUp)));
}

#[test]
fn edits_persist_across_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let clock = FixedClock(day("2023-08-20"));
    let mut diary = new_diary(&dir);

    let cycles = diary.save_calendar_edit(&three_periods(), &clock).unwrap().to_vec();
    assert_eq!(
        cycles,
        vec![
            Cycle::new(day("2023-08-04"), 6, 0),
            Cycle::new(day("2023-07-07"), 6, 28),
            Cycle::new(day("2023-06-09"), 6, 28),
        ]
    );
    diary.lock();

    let mut reopened = Diary::new(Vault::at(dir.path().join("diary.vault")));
    assert!(reopened.unlock(PASS.into()).unwrap());
    assert_eq!(reopened.cycles().unwrap(), cycles.as_slice());
}

#[test]
fn marking_today_starts_a_new_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let mut diary = new_diary(&dir);
    let setup_clock = FixedClock(day("2023-08-20"));
    diary.save_calendar_edit(&three_periods(), &setup_clock).unwrap();

    let clock = FixedClock(day("2023-09-01"));
    let cycles = diary.mark_period_today(&clock).unwrap().to_vec();
    assert_eq!(cycles.len(), 4);
    assert_eq!(cycles[0], Cycle::new(day("2023-09-01"), 6, 0));
    assert_eq!(cycles[1].cycle_length, 28);

    assert!(matches!(diary.mark_period_today(&clock), Err(DiaryError::PeriodAlreadyMarked)));

    let home = diary.home(&clock).unwrap();
    assert_eq!(home.countdown.title, CountdownTitle::Period);
    assert_eq!(home.countdown.days, CountdownDays::Today);
    assert_eq!(home.phase, Phase::Menstrual);
    assert!(home.period_today);
}

#[test]
fn empty_diary_views() {
    let dir = tempfile::tempdir().unwrap();
    let diary = new_diary(&dir);
    let clock = FixedClock(day("2023-08-20"));

    let home = diary.home(&clock).unwrap();
    assert_eq!(home.countdown_text, "Period in ---");
    assert_eq!(home.phase, Phase::None);
    assert_eq!(home.ovulation, None);

    let details = diary.details(&clock).unwrap();
    assert_eq!(details.average_cycle_length, 0);
    assert_eq!(details.stored_cycles, 0);

    let calendar = diary.calendar(&clock).unwrap();
    assert!(calendar.period_days.is_empty());
    assert!(calendar.forecast_period_days.is_empty());
}

#[test]
fn views_over_a_regular_history() {
    let dir = tempfile::tempdir().unwrap();
    let mut diary = new_diary(&dir);
    let clock = FixedClock(day("2023-08-20"));
    diary.save_calendar_edit(&three_periods(), &clock).unwrap();

    let home = diary.home(&clock).unwrap();
    assert_eq!(home.day_of_cycle, 17);
    assert_eq!(home.phase, Phase::Luteal);
    assert_eq!(home.countdown_text, "Period in 12 Days");

    let details = diary.details(&clock).unwrap();
    assert_eq!(details.average_cycle_length, 28);
    assert_eq!(details.average_period_length, 6);
    assert_eq!(details.history.len(), 2);

    let calendar = diary.calendar(&clock).unwrap();
    assert_eq!(calendar.period_days.len(), 18);
    assert_eq!(calendar.forecast_period_days[0], "2023-09-01");
    assert_eq!(calendar.ovulation_days.len(), 3 * 4 + 6 * 4);

    diary.set_show_fertility(false).unwrap();
    assert!(diary.calendar(&clock).unwrap().ovulation_days.is_empty());
    assert_eq!(diary.home(&clock).unwrap().ovulation, None);
}

#[test]
fn shrinking_the_window_drops_old_cycles() {
    let dir = tempfile::tempdir().unwrap();
    let mut diary = new_diary(&dir);
    let clock = FixedClock(day("2023-08-20"));
    diary.save_calendar_edit(&three_periods(), &clock).unwrap();

    assert_eq!(diary.set_max_displayed_cycles(2).unwrap(), 2);
    assert_eq!(diary.cycles().unwrap().len(), 2);
    assert_eq!(diary.set_max_displayed_cycles(0).unwrap(), 1);
    assert_eq!(diary.settings().unwrap().max_displayed_cycles, 1);
}

#[test]
fn export_then_import_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let mut diary = new_diary(&dir);
    let clock = FixedClock(day("2023-08-20"));
    diary.save_calendar_edit(&three_periods(), &clock).unwrap();
    let exported = diary.export_json().unwrap();
    assert!(exported.contains("\"startDate\": \"2023-08-04T00:00:00\""));

    let other_dir = tempfile::tempdir().unwrap();
    let mut other = new_diary(&other_dir);
    other.import_json(&exported).unwrap();
    assert_eq!(other.data().unwrap(), diary.data().unwrap());

    assert!(matches!(other.import_json("{not json"), Err(DiaryError::Config(_))));
}

#[test]
fn edits_outside_the_gate_are_refused() {
    let dir = tempfile::tempdir().unwrap();
    let mut diary = new_diary(&dir);
    let clock = FixedClock(day("2023-08-10"));
    let mut marked = dates::date_range(day("2023-07-07"), 6);
    marked.extend(dates::date_range(day("2023-08-04"), 6));
    let before = diary.save_calendar_edit(&marked, &clock).unwrap().to_vec();

    marked.push(day("2024-03-01"));
    match diary.save_calendar_edit(&marked, &clock) {
        Err(DiaryError::NotEditable { date, bounds }) => {
            assert_eq!(date, day("2024-03-01"));
            assert_eq!(bounds.max, day("2023-08-10"));
        }
        other => panic!("expected a refused edit, got {other:?}"),
    }
    assert_eq!(diary.cycles().unwrap(), before.as_slice());
    assert_eq!(diary.calendar(&clock).unwrap().edit_bounds.max, day("2023-08-10"));
}

#[test]
fn import_rejects_impossible_period_lengths() {
    let dir = tempfile::tempdir().unwrap();
    let mut diary = new_diary(&dir);
    let data = AppData {
        cycles: vec![Cycle::new(day("2023-08-04"), 100_000_000, 0)],
        settings: AppSettings::default(),
    };
    let json = serde_json::to_string(&data).unwrap();

    let result = diary.import_json(&json);
    assert!(matches!(
        result,
        Err(DiaryError::ImplausibleCycle { period_length: 100_000_000, .. })
    ));
    assert!(diary.cycles().unwrap().is_empty());
}

#[test]
fn unlock_drops_impossible_stored_cycles() {
    let dir = tempfile::tempdir().unwrap();
    let vault = Vault::at(dir.path().join("diary.vault"));
    let data = AppData {
        cycles: vec![
            Cycle::new(day("2023-08-04"), 100_000_000, 0),
            Cycle::new(day("2023-07-07"), 6, 28),
        ],
        settings: AppSettings::default(),
    };
    vault.save(PASS, &data).unwrap();

    let mut diary = Diary::new(vault);
    assert!(diary.unlock(PASS.into()).unwrap());
    assert_eq!(diary.cycles().unwrap(), &[Cycle::new(day("2023-07-07"), 6, 0)]);
}

#[test]
fn import_keeps_only_the_displayed_cycles() {
    let dir = tempfile::tempdir().unwrap();
    let mut diary = new_diary(&dir);
    let mut marked = Vec::new();
    for step in 0..8 {
        marked.extend(dates::date_range(dates::add_days(day("2023-01-06"), 28 * step), 5));
    }
    let data = AppData {
        cycles: build_history(&marked),
        settings: AppSettings {
            max_displayed_cycles: 3,
            show_fertility: true,
        },
    };
    assert_eq!(data.cycles.len(), 8);
    diary.import_json(&serde_json::to_string(&data).unwrap()).unwrap();
    assert_eq!(diary.cycles().unwrap().len(), 3);

    let clock = FixedClock(dates::add_days(data.cycles[0].start_date, 28));
    let cycles = diary.mark_period_today(&clock).unwrap();
    assert_eq!(cycles.len(), 3);
    assert_eq!(cycles[0].start_date, clock.0);
    assert_eq!(cycles[1], Cycle::new(data.cycles[0].start_date, 5, 28));
}

#[test]
fn text_edits_reject_bad_dates() {
    let dir = tempfile::tempdir().unwrap();
    let mut diary = new_diary(&dir);
    let clock = FixedClock(day("2023-08-20"));
    let result = diary.save_calendar_edit_keys(&["2023-08-04", "04/08/2023"], &clock);
    assert!(matches!(result, Err(DiaryError::Date(_))));
}

#[test]
fn wipe_removes_the_vault() {
    let dir = tempfile::tempdir().unwrap();
    let mut diary = new_diary(&dir);
    diary.wipe().unwrap();
    assert!(!diary.is_setup());
    assert!(!diary.is_unlocked());
}
