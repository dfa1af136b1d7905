use crate::calendar::CalendarWindow;
use crate::sources::DailyCounts;
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fmt};

pub const ACCEPTED: &str = "AC";

/// How AtCoder activity is turned into a daily count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CountingMode {
    #[default]
    Submissions,
    #[serde(rename = "AC")]
    Ac,
    #[serde(rename = "UniqueAC")]
    UniqueAc,
}

impl fmt::Display for CountingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Submissions => "Submissions",
            Self::Ac => "AC",
            Self::UniqueAc => "UniqueAC",
        };
        f.write_str(name)
    }
}

/// A single record from the AtCoder Problems results feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub id: i64,
    pub epoch_second: i64,
    pub problem_id: String,
    #[serde(default)]
    pub contest_id: String,
    pub result: String,
}

impl Submission {
    pub fn is_accepted(&self) -> bool {
        self.result == ACCEPTED
    }

    pub fn local_date(&self, offset: FixedOffset) -> Option<NaiveDate> {
        DateTime::from_timestamp(self.epoch_second, 0)
            .map(|utc| utc.with_timezone(&offset).date_naive())
    }
}

pub fn aggregate(
    submissions: &[Submission],
    mode: CountingMode,
    offset: FixedOffset,
) -> DailyCounts {
    match mode {
        CountingMode::Submissions => count_days(submissions.iter(), offset),
        CountingMode::Ac => {
            count_days(submissions.iter().filter(|sub| sub.is_accepted()), offset)
        }
        CountingMode::UniqueAc => {
            let mut accepted: Vec<&Submission> =
                submissions.iter().filter(|sub| sub.is_accepted()).collect();
            accepted.sort_by_key(|sub| sub.epoch_second);
            let mut solved = HashSet::new();
            let first_solves = accepted
                .into_iter()
                .filter(|&sub| solved.insert(sub.problem_id.as_str()));
            count_days(first_solves, offset)
        }
    }
}

/// Daily counts for every date of `window`; activity outside it is ignored.
pub fn counts_for_window(
    submissions: &[Submission],
    mode: CountingMode,
    window: &CalendarWindow,
    offset: FixedOffset,
) -> Vec<u64> {
    aggregate(submissions, mode, offset).project(window)
}

fn count_days<'a>(
    submissions: impl Iterator<Item = &'a Submission>,
    offset: FixedOffset,
) -> DailyCounts {
    submissions
        .filter_map(|sub| sub.local_date(offset))
        .map(|date| (date, 1))
        .collect()
}
