use crate::atcoder::CountingMode;
use crate::merge::MergedSeries;

/// Grass state of one logged-in user. Lives only in memory.
#[derive(Debug, Clone)]
pub struct Session {
    series: MergedSeries,
    generation: u64,
    atcoder_user: Option<String>,
    mode: Option<CountingMode>,
}

impl Session {
    pub fn new(len: usize) -> Self {
        Self {
            series: MergedSeries::unknown(len),
            generation: 0,
            atcoder_user: None,
            mode: None,
        }
    }

    /// Marks the start of a merge request and returns its generation.
    pub fn begin_request(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Replaces the series wholesale, unless a newer request has been issued
    /// since `generation` was handed out.
    pub fn publish(
        &mut self,
        generation: u64,
        series: MergedSeries,
        atcoder_user: String,
        mode: CountingMode,
    ) -> bool {
        if generation != self.generation {
            return false;
        }
        self.series = series;
        self.atcoder_user = Some(atcoder_user);
        self.mode = Some(mode);
        true
    }

    pub fn series(&self) -> &MergedSeries {
        &self.series
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn atcoder_user(&self) -> Option<&str> {
        self.atcoder_user.as_deref()
    }

    pub fn mode(&self) -> Option<CountingMode> {
        self.mode
    }
}
