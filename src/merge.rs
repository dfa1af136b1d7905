use crate::calendar::CalendarWindow;
use crate::sources::DailyCounts;
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    GitHub,
    AtCoder,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GitHub => f.write_str("GitHub"),
            Self::AtCoder => f.write_str("AtCoder"),
        }
    }
}

/// Reasons a merge leaves the published series untouched.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MergeError {
    #[error("login required before merging")]
    NotAuthenticated,
    #[error("{missing} data is not available")]
    IncompleteData { missing: Source },
}

/// Per-day combined counts; `None` marks a day that has not been merged yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MergedSeries(Vec<Option<u64>>);

impl MergedSeries {
    pub fn unknown(len: usize) -> Self {
        Self(vec![None; len])
    }

    pub fn is_unknown(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }

    pub fn values(&self) -> &[Option<u64>] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u64>> for MergedSeries {
    fn from(values: Vec<u64>) -> Self {
        Self(values.into_iter().map(Some).collect())
    }
}

/// Positional merge: a fresh copy of `github` with `atcoder` added index by
/// index. Requires a login and both series.
pub fn merge(
    authenticated: bool,
    github: Option<&[u64]>,
    atcoder: Option<&[u64]>,
) -> Result<Vec<u64>, MergeError> {
    if !authenticated {
        return Err(MergeError::NotAuthenticated);
    }
    let (github, atcoder) = require_both(github, atcoder)?;
    Ok(merge_counts(github, atcoder))
}

/// The result always has `github.len()` entries: extra AtCoder values are
/// dropped and missing ones leave the GitHub value as is.
pub fn merge_counts(github: &[u64], atcoder: &[u64]) -> Vec<u64> {
    if github.len() != atcoder.len() {
        warn!(
            github = github.len(),
            atcoder = atcoder.len(),
            "merging series of different lengths"
        );
    }
    let mut merged = github.to_vec();
    for (total, extra) in merged.iter_mut().zip(atcoder) {
        *total = total.saturating_add(*extra);
    }
    merged
}

/// Projects both sources onto `window` by date before summing.
pub fn merge_aligned(
    window: &CalendarWindow,
    github: &DailyCounts,
    atcoder: &DailyCounts,
) -> Vec<u64> {
    merge_counts(&github.project(window), &atcoder.project(window))
}

/// Date-keyed counterpart of [`merge`] for callers that already checked the
/// login.
pub fn merge_sources(
    window: &CalendarWindow,
    github: Option<&DailyCounts>,
    atcoder: Option<&DailyCounts>,
) -> Result<Vec<u64>, MergeError> {
    let (github, atcoder) = require_both(github, atcoder)?;
    Ok(merge_aligned(window, github, atcoder))
}

fn require_both<'a, T: ?Sized>(
    github: Option<&'a T>,
    atcoder: Option<&'a T>,
) -> Result<(&'a T, &'a T), MergeError> {
    match (github, atcoder) {
        (Some(github), Some(atcoder)) => Ok((github, atcoder)),
        (None, _) => Err(MergeError::IncompleteData {
            missing: Source::GitHub,
        }),
        (_, None) => Err(MergeError::IncompleteData {
            missing: Source::AtCoder,
        }),
    }
}
