use crate::calendar::{compute_window, CalendarWindow};
use crate::config::Config;
use crate::fetch::ActivitySource;
use crate::session::Session;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub source: Arc<dyn ActivitySource>,
    /// Grass sessions keyed by GitHub login.
    pub sessions: Arc<Mutex<HashMap<String, Session>>>,
}

impl AppState {
    pub fn new(config: Config, source: Arc<dyn ActivitySource>) -> Self {
        Self {
            config: Arc::new(config),
            source,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn window(&self) -> CalendarWindow {
        compute_window(self.config.today())
    }
}
