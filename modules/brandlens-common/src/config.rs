/// Tunable constants for the leaderboard computation.
///
/// The defaults match the observed product behavior; the tolerance is
/// only consulted by invariant checks, never by a runtime branch.
#[derive(Debug, Clone)]
pub struct LeaderboardConfig {
    /// Mention rate (percent) at or above which the target is "leading".
    pub leading_threshold: f64,

    /// Mention rate (percent) at or above which the target is
    /// "competitive". Below this it is "emerging".
    pub competitive_threshold: f64,

    /// Allowed drift, in percentage points, between 100 and the sum of
    /// all market shares (rounding slack).
    pub share_tolerance: f64,

    /// Candidate names shorter than this are rejected.
    pub min_name_len: usize,

    /// Candidate names longer than this are rejected.
    pub max_name_len: usize,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            leading_threshold: 60.0,
            competitive_threshold: 30.0,
            share_tolerance: 2.0,
            min_name_len: 2,
            max_name_len: 50,
        }
    }
}
