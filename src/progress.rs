//! Upload progress shared between a transfer and whoever renders it.

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Delay after an upload settles before the indicator is cleared.
pub const PROGRESS_RESET_DELAY: Duration = Duration::from_millis(1000);

/// Callback receiving `(bytes_sent, bytes_total)` as a transfer advances.
pub type ProgressFn = Arc<dyn Fn(u64, u64) + Send + Sync>;

/// Rounded percentage of `sent` over `total`; an empty transfer is complete.
pub fn percent(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let pct = (sent.min(total) as f64 * 100.0 / total as f64).round();
    pct as u8
}

#[derive(Debug, Default)]
struct Inner {
    percent: AtomicU8,
    generation: AtomicU64,
}

/// Percentage (0-100) of the upload in flight, 0 when idle.
///
/// Each upload bumps a generation counter so that a delayed reset scheduled
/// by an earlier upload leaves a newer one alone.
#[derive(Debug, Clone, Default)]
pub struct UploadProgress {
    inner: Arc<Inner>,
}

impl UploadProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> u8 {
        self.inner.percent.load(Ordering::Relaxed)
    }

    pub fn is_active(&self) -> bool {
        self.get() > 0
    }

    /// Starts a new upload at 0% and returns its generation.
    pub fn begin(&self) -> u64 {
        self.inner.percent.store(0, Ordering::Relaxed);
        self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::SeqCst)
    }

    pub fn set(&self, value: u8) {
        self.inner.percent.store(value.min(100), Ordering::Relaxed);
    }

    /// Callback that feeds byte counts from a transfer into this handle.
    pub fn reporter(&self) -> ProgressFn {
        let progress = self.clone();
        Arc::new(move |sent, total| progress.set(percent(sent, total)))
    }

    /// Clears the indicator if no newer upload has begun since `generation`.
    pub fn reset_if_current(&self, generation: u64) -> bool {
        if self.generation() == generation {
            self.inner.percent.store(0, Ordering::Relaxed);
            true
        } else {
            false
        }
    }

    /// Clears the indicator after [`PROGRESS_RESET_DELAY`] on the tokio runtime.
    pub fn schedule_reset(&self, generation: u64) {
        let progress = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(PROGRESS_RESET_DELAY).await;
            progress.reset_if_current(generation);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_rounding() {
        assert_eq!(percent(0, 200), 0);
        assert_eq!(percent(1, 200), 1);
        assert_eq!(percent(100, 200), 50);
        assert_eq!(percent(199, 200), 100);
        assert_eq!(percent(300, 200), 100);
        assert_eq!(percent(0, 0), 100);
    }

    #[test]
    fn test_reporter_updates_handle() {
        let progress = UploadProgress::new();
        progress.begin();
        let report = progress.reporter();
        report(25, 100);
        assert_eq!(progress.get(), 25);
        report(100, 100);
        assert_eq!(progress.get(), 100);
    }

    #[test]
    fn test_stale_reset_is_ignored() {
        let progress = UploadProgress::new();
        let first = progress.begin();
        progress.set(100);
        let second = progress.begin();
        progress.set(40);

        assert!(!progress.reset_if_current(first));
        assert_eq!(progress.get(), 40);
        assert!(progress.reset_if_current(second));
        assert!(!progress.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_scheduled_reset_fires_after_delay() {
        let progress = UploadProgress::new();
        let generation = progress.begin();
        progress.set(100);
        progress.schedule_reset(generation);

        tokio::time::sleep(PROGRESS_RESET_DELAY / 2).await;
        assert_eq!(progress.get(), 100);

        tokio::time::sleep(PROGRESS_RESET_DELAY).await;
        assert_eq!(progress.get(), 0);
    }
}
