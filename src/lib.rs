//! Period diary: rebuilds a cycle history from marked bleeding days and
//! derives statistics, the current phase, forecasts and calendar edit rules.
//!
//! The engine modules (`history`, `stats`, `phase`, `forecast`, `edit`) are
//! pure functions over a `&[Cycle]` (most recent first) and an injected
//! [`clock::Clock`]. `storage` and `diary` keep the data in an encrypted vault.

pub mod clock;
pub mod crypto;
pub mod dates;
pub mod diary;
pub mod edit;
pub mod forecast;
pub mod history;
pub mod logging;
pub mod models;
pub mod phase;
pub mod stats;
pub mod storage;

pub use clock::{Clock, FixedClock, SystemClock};
pub use diary::{Diary, DiaryError};
pub use history::build_history;
pub use models::{AppData, AppSettings, Cycle, Phase};
pub use storage::Vault;
