//! Scan loop: every feed in turn, one flush per pass, optional repeat.
//!
//! Cancellation is cooperative. SIGINT/SIGTERM clear the running flag, which
//! is checked before each feed and at every sleep step; the feed being
//! scanned when the signal arrives is finished first, and whatever it queued
//! is still flushed.

use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use tracing::{error, info, warn};

use crate::app::Result;
use crate::notify::{DispatchError, Dispatcher};
use crate::scanner::Scanner;
use crate::store::{FeedStore, SeenStore};

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Hours between passes; zero or negative runs a single pass.
    pub interval_hours: f64,
    /// Random pause between feeds, in milliseconds.
    pub feed_delay_ms: RangeInclusive<u64>,
    /// Granularity at which sleeps notice cancellation.
    pub sleep_step: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_hours: 0.0,
            feed_delay_ms: 2_000..=4_000,
            sleep_step: Duration::from_secs(1),
        }
    }
}

impl MonitorConfig {
    pub fn with_interval_hours(mut self, hours: f64) -> Self {
        self.interval_hours = hours;
        self
    }

    pub fn interval(&self) -> Option<Duration> {
        if self.interval_hours.is_finite() && self.interval_hours > 0.0 {
            Some(Duration::from_secs_f64(self.interval_hours * 3600.0))
        } else {
            None
        }
    }

    /// Format interval for display
    pub fn format_interval(secs: u64) -> String {
        if secs >= 86400 && secs % 86400 == 0 {
            format!("{}d", secs / 86400)
        } else if secs >= 3600 && secs % 3600 == 0 {
            format!("{}h", secs / 3600)
        } else if secs >= 60 && secs % 60 == 0 {
            format!("{}m", secs / 60)
        } else {
            format!("{}s", secs)
        }
    }
}

/// Totals for one pass over all feeds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    pub feeds_scanned: usize,
    pub fetch_failures: usize,
    pub queued: usize,
    pub sent: usize,
    pub interrupted: bool,
}

pub struct Monitor {
    feeds: FeedStore,
    scanner: Scanner,
    dispatcher: Dispatcher,
    config: MonitorConfig,
    running: Arc<AtomicBool>,
}

impl Monitor {
    pub fn new(
        feeds: FeedStore,
        scanner: Scanner,
        dispatcher: Dispatcher,
        config: MonitorConfig,
    ) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        Self {
            feeds,
            scanner,
            dispatcher: dispatcher.with_running_flag(running.clone()),
            config,
            running,
        }
    }

    /// Shared flag; storing `false` asks the monitor to wind down.
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }

    /// Clears the running flag; the current feed and flush wind down first.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Clears the running flag on SIGINT/SIGTERM (Ctrl-C on Windows).
    pub fn install_signal_handlers(&self) {
        let running = self.running.clone();

        #[cfg(unix)]
        tokio::spawn(async move {
            use tokio::signal::unix::{signal, SignalKind};

            let (mut sigterm, mut sigint) =
                match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                    (Ok(term), Ok(int)) => (term, int),
                    (Err(e), _) | (_, Err(e)) => {
                        error!("Failed to set up signal handlers: {}", e);
                        return;
                    }
                };

            tokio::select! {
                _ = sigterm.recv() => {},
                _ = sigint.recv() => {},
            }
            info!("Interrupt received, finishing current step");
            running.store(false, Ordering::SeqCst);
        });

        #[cfg(windows)]
        tokio::spawn(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("Interrupt received, finishing current step");
            running.store(false, Ordering::SeqCst);
        });
    }

    /// Runs passes until the interval is unset, a flush fails, or the
    /// running flag is cleared.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            let report = self.run_pass().await?;
            if report.interrupted || !self.is_running() {
                info!("Monitor stopped");
                break;
            }

            let Some(interval) = self.config.interval() else {
                break;
            };

            info!(
                "Sleeping for {} before next scan...",
                MonitorConfig::format_interval(interval.as_secs())
            );
            if !self.sleep_checked(interval).await {
                info!("Monitor stopped");
                break;
            }
        }
        Ok(())
    }

    /// Scans every configured feed once and flushes the queue.
    pub async fn run_pass(&mut self) -> Result<PassReport> {
        let start = Utc::now();
        let mut report = PassReport::default();

        let feeds = self.feeds.load()?;
        if feeds.is_empty() {
            warn!("No channels configured; add one with `reelwatch add <url>`");
        }

        let mut seen = self.scanner.store().load()?;

        for (idx, feed) in feeds.iter().enumerate() {
            if !self.is_running() {
                report.interrupted = true;
                break;
            }

            let scan = match self
                .scanner
                .scan_feed(feed, &mut seen, &mut self.dispatcher)
                .await
            {
                Ok(scan) => scan,
                Err(e) => {
                    error!("Scan of {} failed: {}", feed.url, e);
                    // earlier feeds are already marked seen; deliver what they queued
                    if !self.dispatcher.is_empty() {
                        if let Err(flush_err) = self.dispatcher.flush().await {
                            error!("Flush after failed scan also failed: {}", flush_err);
                        }
                    }
                    return Err(e);
                }
            };
            report.feeds_scanned += 1;
            report.queued += scan.queued;
            if scan.fetch_failed {
                report.fetch_failures += 1;
            }

            if idx + 1 < feeds.len() {
                let delay = self.feed_delay();
                if !self.sleep_checked(delay).await {
                    report.interrupted = true;
                    break;
                }
            }
        }

        match self.dispatcher.flush().await {
            Ok(flushed) => report.sent = flushed.sent,
            Err(DispatchError::Cancelled) => report.interrupted = true,
            Err(e) => return Err(e.into()),
        }

        let elapsed = Utc::now().signed_duration_since(start);
        info!(
            "Scan complete: {} channel(s), {} queued, {} sent, {} fetch error(s) ({:.1}s)",
            report.feeds_scanned,
            report.queued,
            report.sent,
            report.fetch_failures,
            elapsed.num_milliseconds() as f64 / 1000.0
        );

        Ok(report)
    }

    fn feed_delay(&self) -> Duration {
        let range = self.config.feed_delay_ms.clone();
        if range.is_empty() || *range.end() == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(range))
    }

    /// Sleeps in `sleep_step` chunks. Returns `false` if cancelled midway.
    async fn sleep_checked(&self, total: Duration) -> bool {
        let step = self.config.sleep_step.max(Duration::from_millis(1));
        let mut remaining = total;
        while !remaining.is_zero() {
            if !self.is_running() {
                return false;
            }
            let chunk = remaining.min(step);
            tokio::time::sleep(chunk).await;
            remaining -= chunk;
        }
        self.is_running()
    }
}
