use crate::atcoder::CountingMode;
use crate::calendar::CalendarWindow;
use crate::merge::MergedSeries;
use crate::session::Session;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct AtCoderQuery {
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub show_mode: CountingMode,
}

#[derive(Debug, Deserialize)]
pub struct MergeRequest {
    pub uid: String,
    #[serde(default)]
    pub show_mode: CountingMode,
}

#[derive(Debug, Serialize)]
pub struct WindowResponse {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub dates: Vec<NaiveDate>,
}

impl From<&CalendarWindow> for WindowResponse {
    fn from(window: &CalendarWindow) -> Self {
        Self {
            start: window.start(),
            end: window.end(),
            dates: window.dates().to_vec(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GrassResponse {
    pub dates: Vec<NaiveDate>,
    pub values: MergedSeries,
    pub atcoder_user: Option<String>,
    pub show_mode: Option<CountingMode>,
    pub generation: u64,
}

impl GrassResponse {
    pub fn new(window: &CalendarWindow, session: &Session) -> Self {
        Self {
            dates: window.dates().to_vec(),
            values: session.series().clone(),
            atcoder_user: session.atcoder_user().map(str::to_string),
            show_mode: session.mode(),
            generation: session.generation(),
        }
    }
}
