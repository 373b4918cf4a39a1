// src/progress.rs
/// Status hooks for the per-date fetch loop in [`crate::scrape::Collector::collect`].
/// Every method defaults to a no-op; the CLI prints, tests record.
pub trait Progress {
    /// Number of dashboard periods about to be fetched.
    fn begin(&mut self, _periods: usize) {}

    fn log(&mut self, _msg: &str) {}

    /// `label` is the dashboard date, or `current`. `count` is builds kept after filtering.
    fn period_done(&mut self, _label: &str, _count: usize) {}

    /// Runs once after the last period, placeholders included.
    fn finish(&mut self) {}
}
