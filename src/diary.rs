//! The unlocked diary: decrypted data plus the operations a shell invokes.

use chrono::NaiveDate;
use zeroize::Zeroizing;

use crate::clock::Clock;
use crate::dates::{self, DateParseError};
use crate::edit;
use crate::forecast;
use crate::history::{build_history, recorded_days};
use crate::models::*;
use crate::phase;
use crate::stats;
use crate::storage::{StorageError, Vault};

#[derive(Debug, thiserror::Error)]
pub enum DiaryError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error(transparent)]
    Date(#[from] DateParseError),
    #[error("diary is locked")]
    Locked,
    #[error("diary is already set up")]
    AlreadySetUp,
    #[error("diary has not been set up yet")]
    NotSetUp,
    #[error("today is already marked as a period day")]
    PeriodAlreadyMarked,
    #[error("{date} cannot be edited (editable range {} to {})", .bounds.min, .bounds.max)]
    NotEditable {
        date: NaiveDate,
        bounds: CalendarBounds,
    },
    #[error("implausible cycle starting {start}: period of {period_length} days")]
    ImplausibleCycle {
        start: NaiveDate,
        period_length: i64,
    },
}

struct Session {
    passphrase: Zeroizing<String>,
    data: AppData,
}

/// Diary state: the vault, and while unlocked the passphrase and data.
pub struct Diary {
    vault: Vault,
    session: Option<Session>,
}

impl Diary {
    pub fn new(vault: Vault) -> Self {
        Self {
            vault,
            session: None,
        }
    }

    pub fn is_setup(&self) -> bool {
        self.vault.exists()
    }

    pub fn is_unlocked(&self) -> bool {
        self.session.is_some()
    }

    /// Create an empty diary protected by `passphrase` and unlock it.
    pub fn setup(&mut self, passphrase: String) -> Result<(), DiaryError> {
        if self.vault.exists() {
            return Err(DiaryError::AlreadySetUp);
        }
        let data = AppData::default();
        self.vault.save(&passphrase, &data)?;
        self.session = Some(Session {
            passphrase: Zeroizing::new(passphrase),
            data,
        });
        tracing::info!(path = %self.vault.path().display(), "diary set up");
        Ok(())
    }

    /// Returns `false` when the passphrase does not open the vault.
    pub fn unlock(&mut self, passphrase: String) -> Result<bool, DiaryError> {
        if !self.vault.exists() {
            return Err(DiaryError::NotSetUp);
        }
        let mut data = match self.vault.load(&passphrase) {
            Ok(data) => data,
            Err(StorageError::Crypto(err)) => {
                tracing::warn!(%err, "unlock refused");
                return Ok(false);
            }
            Err(err) => return Err(err.into()),
        };
        normalize(&mut data);
        self.session = Some(Session {
            passphrase: Zeroizing::new(passphrase),
            data,
        });
        self.persist()?;
        Ok(true)
    }

    /// Drop the decrypted data and zeroize the passphrase.
    pub fn lock(&mut self) {
        if self.session.take().is_some() {
            tracing::info!("diary locked");
        }
    }

    pub fn data(&self) -> Result<&AppData, DiaryError> {
        self.session
            .as_ref()
            .map(|s| &s.data)
            .ok_or(DiaryError::Locked)
    }

    pub fn cycles(&self) -> Result<&[Cycle], DiaryError> {
        Ok(&self.data()?.cycles)
    }

    pub fn settings(&self) -> Result<&AppSettings, DiaryError> {
        Ok(&self.data()?.settings)
    }

    /// "My period started today": add a period block from today and rebuild.
    pub fn mark_period_today(&mut self, clock: &impl Clock) -> Result<&[Cycle], DiaryError> {
        let data = self.data_mut()?;
        if stats::is_period_today(&data.cycles, clock) {
            return Err(DiaryError::PeriodAlreadyMarked);
        }
        let window = data.settings.max_displayed_cycles;
        let marked = forecast::period_dates_with_new_element(&data.cycles, window, clock);
        data.cycles = build_history(&marked);
        keep_window(data);
        tracing::info!(start = %clock.today(), "period marked");

        self.persist()?;
        self.cycles()
    }

    /// Replace the marked days with the edit calendar's selection.
    ///
    /// Every day whose marking changes must pass [`edit::is_date_editable`];
    /// otherwise nothing is saved.
    pub fn save_calendar_edit(
        &mut self,
        marked: &[NaiveDate],
        clock: &impl Clock,
    ) -> Result<&[Cycle], DiaryError> {
        let data = self.data_mut()?;
        if let Some(date) = edit::first_uneditable_toggle(marked, &data.cycles, clock) {
            let window = data.settings.max_displayed_cycles;
            let bounds = edit::edit_calendar_bounds(&data.cycles, window, clock);
            tracing::warn!(%date, "calendar edit refused");
            return Err(DiaryError::NotEditable { date, bounds });
        }
        data.cycles = edit::commit_calendar_edit(marked, &data.cycles, clock);
        keep_window(data);
        tracing::info!(marked = marked.len(), cycles = data.cycles.len(), "calendar edit saved");

        self.persist()?;
        self.cycles()
    }

    /// Same as [`Diary::save_calendar_edit`] for days given as text.
    pub fn save_calendar_edit_keys<S: AsRef<str>>(
        &mut self,
        marked: &[S],
        clock: &impl Clock,
    ) -> Result<&[Cycle], DiaryError> {
        let days = marked
            .iter()
            .map(|text| dates::parse_date(text.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        self.save_calendar_edit(&days, clock)
    }

    /// Change the display window. Shrinking it drops the older cycles for good.
    pub fn set_max_displayed_cycles(&mut self, requested: usize) -> Result<usize, DiaryError> {
        let data = self.data_mut()?;
        let window = AppSettings::clamp_displayed_cycles(requested);
        data.settings.max_displayed_cycles = window;
        keep_window(data);
        self.persist()?;
        Ok(window)
    }

    pub fn set_show_fertility(&mut self, enabled: bool) -> Result<(), DiaryError> {
        self.data_mut()?.settings.show_fertility = enabled;
        self.persist()
    }

    pub fn export_json(&self) -> Result<String, DiaryError> {
        Ok(serde_json::to_string_pretty(self.data()?)?)
    }

    /// Replace everything with an exported configuration.
    ///
    /// Rejected as a whole if any cycle has impossible lengths.
    pub fn import_json(&mut self, json: &str) -> Result<(), DiaryError> {
        let mut imported: AppData = serde_json::from_str(json)?;
        if let Some(bad) = imported.cycles.iter().find(|c| !c.is_plausible()) {
            return Err(DiaryError::ImplausibleCycle {
                start: bad.start_date,
                period_length: bad.period_length,
            });
        }
        normalize(&mut imported);
        *self.data_mut()? = imported;
        tracing::info!("configuration imported");
        self.persist()
    }

    /// Lock and delete the vault.
    pub fn wipe(&mut self) -> Result<(), DiaryError> {
        self.lock();
        self.vault.wipe()?;
        Ok(())
    }

    pub fn home(&self, clock: &impl Clock) -> Result<HomeView, DiaryError> {
        let data = self.data()?;
        let cycles = &data.cycles;
        let window = data.settings.max_displayed_cycles;
        let fertility = data.settings.show_fertility;

        let countdown = phase::days_before_period(cycles, window, clock);
        let current = phase::current_phase(cycles, window, clock);
        Ok(HomeView {
            today: clock.today(),
            countdown,
            countdown_text: countdown.to_string(),
            day_of_cycle: stats::day_of_cycle(cycles, clock),
            phase: current,
            phase_info: *current.info(),
            ovulation: phase::ovulation_status(cycles, window, clock).filter(|_| fertility),
            pregnancy_chance: phase::pregnancy_chance(cycles, window, clock)
                .filter(|_| fertility && cycles.len() > 1),
            period_today: stats::is_period_today(cycles, clock),
        })
    }

    pub fn details(&self, clock: &impl Clock) -> Result<DetailsView, DiaryError> {
        let data = self.data()?;
        let cycles = &data.cycles;
        let window = data.settings.max_displayed_cycles;

        Ok(DetailsView {
            average_cycle_length: stats::average_cycle_length(cycles, window),
            average_period_length: stats::average_period_length(cycles, window),
            last_start_date: stats::last_start_date(cycles),
            last_period_length: stats::last_period_length(cycles),
            day_of_cycle: stats::day_of_cycle(cycles, clock),
            progress_scale: stats::progress_scale(cycles, clock),
            history: stats::cycle_summaries(cycles, window),
            stored_cycles: cycles.len(),
        })
    }

    pub fn calendar(&self, clock: &impl Clock) -> Result<CalendarView, DiaryError> {
        let data = self.data()?;
        let cycles = &data.cycles;
        let window = data.settings.max_displayed_cycles;

        let ovulation_days = if data.settings.show_fertility {
            dates::to_keys(&forecast::ovulation_dates(cycles, window))
        } else {
            Vec::new()
        };
        Ok(CalendarView {
            bounds: edit::view_calendar_bounds(cycles, window, clock),
            edit_bounds: edit::edit_calendar_bounds(cycles, window, clock),
            period_days: dates::to_keys(&forecast::period_dates(cycles, window)),
            forecast_period_days: dates::to_keys(&forecast::forecast_period_dates(cycles, window)),
            ovulation_days,
        })
    }

    fn data_mut(&mut self) -> Result<&mut AppData, DiaryError> {
        self.session
            .as_mut()
            .map(|s| &mut s.data)
            .ok_or(DiaryError::Locked)
    }

    fn persist(&self) -> Result<(), DiaryError> {
        let session = self.session.as_ref().ok_or(DiaryError::Locked)?;
        self.vault.save(&session.passphrase, &session.data)?;
        Ok(())
    }
}

/// Clamp settings, drop cycles with impossible lengths, recompute the
/// history from its own recorded days and cut it to the display window.
fn normalize(data: &mut AppData) {
    data.settings.max_displayed_cycles =
        AppSettings::clamp_displayed_cycles(data.settings.max_displayed_cycles);
    data.cycles.retain(|cycle| {
        let keep = cycle.is_plausible();
        if !keep {
            tracing::warn!(start = %cycle.start_date, "dropping implausible cycle");
        }
        keep
    });
    data.cycles = build_history(&recorded_days(&data.cycles));
    keep_window(data);
}

/// Only the displayed cycles are kept.
fn keep_window(data: &mut AppData) {
    let window = data.settings.max_displayed_cycles;
    if data.cycles.len() > window {
        tracing::info!(dropped = data.cycles.len() - window, "old cycles removed");
        data.cycles.truncate(window);
    }
}
