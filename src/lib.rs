pub mod app;
pub mod atcoder;
pub mod calendar;
pub mod config;
pub mod errors;
pub mod fetch;
pub mod handlers;
pub mod merge;
pub mod models;
pub mod session;
pub mod sources;
pub mod state;

pub use app::router;
pub use atcoder::CountingMode;
pub use calendar::{compute_window, CalendarWindow};
pub use config::Config;
pub use fetch::{ActivitySource, FetchError, HttpSource};
pub use merge::{merge, MergeError, MergedSeries};
pub use state::AppState;
