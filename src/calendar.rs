use chrono::{Datelike, Duration, NaiveDate};

pub const WEEKS: usize = 53;
pub const WEEKDAY: usize = 7;
pub const WINDOW_LEN: usize = WEEKS * WEEKDAY;

/// The date axis of the grass: 53 Sunday-started weeks ending with the week
/// that contains "today".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarWindow {
    dates: Vec<NaiveDate>,
}

impl CalendarWindow {
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn start(&self) -> NaiveDate {
        self.dates[0]
    }

    pub fn end(&self) -> NaiveDate {
        self.dates[self.dates.len() - 1]
    }

    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        let offset = (date - self.start()).num_days();
        usize::try_from(offset).ok().filter(|idx| *idx < self.len())
    }

    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.dates.iter().copied()
    }
}

/// Dates too close to either end of chrono's range get the nearest window
/// that fits inside it.
pub fn compute_window(today: NaiveDate) -> CalendarWindow {
    let span = Duration::days(WINDOW_LEN as i64);
    let start = next_sunday(today)
        .and_then(|sunday| sunday.checked_sub_signed(span))
        .unwrap_or_else(|| {
            if today.checked_sub_signed(span).is_none() {
                first_window_start()
            } else {
                last_window_start()
            }
        });
    let dates = start.iter_days().take(WINDOW_LEN).collect();
    CalendarWindow { dates }
}

// The first Sunday strictly after `date`, so the week holding `date` is the
// last week of the window.
fn next_sunday(date: NaiveDate) -> Option<NaiveDate> {
    let ahead = WEEKDAY as u32 - date.weekday().num_days_from_sunday();
    date.checked_add_signed(Duration::days(i64::from(ahead)))
}

fn first_window_start() -> NaiveDate {
    let behind = NaiveDate::MIN.weekday().num_days_from_sunday();
    let ahead = (WEEKDAY as u32 - behind) % WEEKDAY as u32;
    NaiveDate::MIN + Duration::days(i64::from(ahead))
}

// Day iteration never yields `NaiveDate::MAX`, so the last window ends before it.
fn last_window_start() -> NaiveDate {
    let latest = NaiveDate::MAX - Duration::days(WINDOW_LEN as i64);
    latest - Duration::days(i64::from(latest.weekday().num_days_from_sunday()))
}
