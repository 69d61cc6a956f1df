/// Percentage of frames done, capped at 100.
///
/// An unknown total (0) reports 0 no matter how many frames have gone by;
/// the caller publishes 100 itself once the run completes.
pub fn progress_percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 * 100.0 / total as f64).min(100.0)
}

/// Progress value that may be published while the run is still going.
///
/// 100 is reserved for completed runs, so anything that would reach it
/// mid-run is withheld (`None`).
pub fn running_progress(count: usize, total: usize) -> Option<f64> {
    let pct = progress_percent(count, total);
    (pct < 100.0).then_some(pct)
}
