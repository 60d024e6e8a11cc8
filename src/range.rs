//! Date range resolution for stats queries
//!
//! Every stats endpoint accepts an optional `from`/`to` pair. The resolver
//! turns that into a concrete inclusive interval: missing `to` means today,
//! missing `from` means `to` minus the endpoint's lookback window, and an
//! inverted pair is swapped rather than rejected.

use chrono::{Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Lookback used by weekly volume, best run, Hyrox stations and calendar
pub const TRAINING_WINDOW_DAYS: u64 = 28;

/// Lookback used by personal bests
pub const PERSONAL_BESTS_WINDOW_DAYS: u64 = 365;

/// Per-endpoint default window applied when `from` is absent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookback {
  Training,
  PersonalBests,
}

impl Lookback {
  pub fn days(self) -> u64 {
    match self {
      Lookback::Training => TRAINING_WINDOW_DAYS,
      Lookback::PersonalBests => PERSONAL_BESTS_WINDOW_DAYS,
    }
  }
}

/// Raw `from`/`to` query parameters, ISO-8601 dates
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RangeQuery {
  #[serde(default)]
  pub from: Option<NaiveDate>,
  #[serde(default)]
  pub to: Option<NaiveDate>,
}

/// Inclusive `[from, to]` interval with `from <= to`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
  pub from: NaiveDate,
  pub to: NaiveDate,
}

impl DateRange {
  pub fn resolve(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    lookback: Lookback,
    today: NaiveDate,
  ) -> Self {
    let to = to.unwrap_or(today);
    let from = from.unwrap_or_else(|| {
      to.checked_sub_days(Days::new(lookback.days()))
        .unwrap_or(NaiveDate::MIN)
    });

    if from > to {
      Self { from: to, to: from }
    } else {
      Self { from, to }
    }
  }

  pub fn from_query(query: RangeQuery, lookback: Lookback, today: NaiveDate) -> Self {
    Self::resolve(query.from, query.to, lookback, today)
  }

  pub fn contains(&self, date: NaiveDate) -> bool {
    self.from <= date && date <= self.to
  }
}

/// Current local calendar date
pub fn today() -> NaiveDate {
  Local::now().date_naive()
}
