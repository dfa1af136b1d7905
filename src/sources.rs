use crate::calendar::CalendarWindow;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One week bucket of the GitHub contribution calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionWeek {
    pub first_day: NaiveDate,
    pub contribution_days: Vec<ContributionDay>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionDay {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    pub contribution_count: u64,
}

/// Flattens week buckets into one sequence, bucket by bucket and day by day.
/// Nothing is padded or truncated.
pub fn flatten_contributions(weeks: &[ContributionWeek]) -> Vec<u64> {
    weeks
        .iter()
        .flat_map(|week| week.contribution_days.iter())
        .map(|day| day.contribution_count)
        .collect()
}

/// Activity counts keyed by calendar date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyCounts {
    days: BTreeMap<NaiveDate, u64>,
}

impl DailyCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, date: NaiveDate, count: u64) {
        let entry = self.days.entry(date).or_default();
        *entry = entry.saturating_add(count);
    }

    pub fn get(&self, date: NaiveDate) -> u64 {
        self.days.get(&date).copied().unwrap_or_default()
    }

    /// Keys every day record by its own date, falling back to its position
    /// inside the week when the record carries no date.
    pub fn from_contribution_weeks(weeks: &[ContributionWeek]) -> Self {
        let mut counts = Self::new();
        for week in weeks {
            for (offset, day) in week.contribution_days.iter().enumerate() {
                let date = day
                    .date
                    .unwrap_or_else(|| week.first_day + Duration::days(offset as i64));
                counts.add(date, day.contribution_count);
            }
        }
        counts
    }

    /// One count per window date, zero where nothing was recorded.
    pub fn project(&self, window: &CalendarWindow) -> Vec<u64> {
        window.iter().map(|date| self.get(date)).collect()
    }
}

impl FromIterator<(NaiveDate, u64)> for DailyCounts {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, u64)>>(iter: I) -> Self {
        let mut counts = Self::new();
        for (date, count) in iter {
            counts.add(date, count);
        }
        counts
    }
}
