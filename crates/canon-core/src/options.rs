use canon_map::MatchOptions;
use serde::{Deserialize, Serialize};

/// Number of validation messages kept in metadata before the summary line.
pub const DEFAULT_MAX_REPORTED_ERRORS: usize = 10;

/// Allowed absolute difference between supplied and derived net revenue.
pub const DEFAULT_REVENUE_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeOptions {
    pub matching: MatchOptions,
    pub max_reported_errors: usize,
    pub revenue_tolerance: f64,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            matching: MatchOptions::default(),
            max_reported_errors: DEFAULT_MAX_REPORTED_ERRORS,
            revenue_tolerance: DEFAULT_REVENUE_TOLERANCE,
        }
    }
}

impl NormalizeOptions {
    #[must_use]
    pub fn with_matching(mut self, matching: MatchOptions) -> Self {
        self.matching = matching;
        self
    }

    #[must_use]
    pub fn with_max_reported_errors(mut self, max: usize) -> Self {
        self.max_reported_errors = max;
        self
    }

    #[must_use]
    pub fn with_revenue_tolerance(mut self, tolerance: f64) -> Self {
        self.revenue_tolerance = tolerance.abs();
        self
    }
}
