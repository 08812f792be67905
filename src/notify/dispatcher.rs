use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::domain::PendingNotification;
use crate::notify::{DispatchError, SendOutcome, Transport};

/// Retry and pacing knobs for delivery.
#[derive(Debug, Clone)]
pub struct DispatchPolicy {
    /// Retries allowed after the first rate-limited attempt.
    pub max_retries: u32,
    /// Added on top of the server's `retry_after`.
    pub retry_buffer: Duration,
    /// Pause after every successful send.
    pub send_pause: Duration,
    /// Longest server-requested wait that is honoured; anything above ends
    /// the flush.
    pub max_retry_after: Duration,
    /// Granularity at which waits notice cancellation.
    pub sleep_step: Duration,
}

impl Default for DispatchPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_buffer: Duration::from_secs(1),
            send_pause: Duration::from_secs(1),
            max_retry_after: Duration::from_secs(24 * 3600),
            sleep_step: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlushReport {
    pub sent: usize,
    pub dry_run: usize,
}

/// Owns the pending queue for one process and drains it in date order.
pub struct Dispatcher {
    transport: Option<Arc<dyn Transport + Send + Sync>>,
    policy: DispatchPolicy,
    queue: Vec<PendingNotification>,
    running: Option<Arc<AtomicBool>>,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn Transport + Send + Sync>, policy: DispatchPolicy) -> Self {
        Self {
            transport: Some(transport),
            policy,
            queue: Vec::new(),
            running: None,
        }
    }

    /// A dispatcher that can only print; used when no credentials are needed.
    pub fn print_only() -> Self {
        Self {
            transport: None,
            policy: DispatchPolicy::default(),
            queue: Vec::new(),
            running: None,
        }
    }

    /// Ties waits to a shared running flag. Once it is cleared, send pauses
    /// are cut short and a rate-limit backoff ends the flush with
    /// [`DispatchError::Cancelled`].
    pub fn with_running_flag(mut self, running: Arc<AtomicBool>) -> Self {
        self.running = Some(running);
        self
    }

    pub fn enqueue(&mut self, notification: PendingNotification) {
        self.queue.push(notification);
    }

    pub fn pending(&self) -> &[PendingNotification] {
        &self.queue
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Delivers everything queued, oldest date first.
    ///
    /// The queue is emptied before the first send, so it is empty afterwards
    /// whether or not the flush succeeded. Any fatal error aborts the rest of
    /// the pass; the undelivered messages are logged.
    pub async fn flush(&mut self) -> Result<FlushReport, DispatchError> {
        let mut pending = std::mem::take(&mut self.queue);
        // stable: same-date messages keep their enqueue order
        pending.sort_by_key(|n| n.sort_key);

        let mut report = FlushReport::default();
        for (idx, notification) in pending.iter().enumerate() {
            if notification.dry_run {
                println!("[Dry-Run] {}", notification.text);
                report.dry_run += 1;
                continue;
            }

            if let Err(e) = self.deliver(&notification.text).await {
                log_undelivered(&e, &pending[idx..]);
                return Err(e);
            }

            report.sent += 1;
            // a cancelled pause only hurries the remaining sends along
            self.pause(self.policy.send_pause).await;
        }

        if report.sent > 0 {
            info!("Delivered {} notification(s)", report.sent);
        }
        Ok(report)
    }

    async fn deliver(&self, text: &str) -> Result<(), DispatchError> {
        let transport = self.transport.as_ref().ok_or(DispatchError::NoTransport)?;

        let mut attempts: u32 = 0;
        loop {
            attempts += 1;
            match transport.send(text).await? {
                SendOutcome::Delivered => return Ok(()),
                SendOutcome::RateLimited {
                    retry_after: Some(secs),
                } => {
                    if attempts > self.policy.max_retries {
                        return Err(DispatchError::RetriesExhausted { attempts });
                    }
                    let wait = Duration::from_secs(secs);
                    if wait > self.policy.max_retry_after {
                        return Err(DispatchError::RetryAfterTooLong { secs });
                    }
                    let delay = wait.saturating_add(self.policy.retry_buffer);
                    warn!(
                        "Rate limited, retrying in {:.1}s (attempt {}/{})",
                        delay.as_secs_f64(),
                        attempts,
                        self.policy.max_retries + 1
                    );
                    if !self.pause(delay).await {
                        return Err(DispatchError::Cancelled);
                    }
                }
                SendOutcome::RateLimited { retry_after: None } => {
                    return Err(DispatchError::MissingRetryAfter);
                }
                SendOutcome::Rejected { status, body } => {
                    return Err(DispatchError::Rejected { status, body });
                }
            }
        }
    }

    fn is_cancelled(&self) -> bool {
        self.running
            .as_ref()
            .is_some_and(|running| !running.load(Ordering::SeqCst))
    }

    /// Sleeps in `sleep_step` chunks. Returns `false` if cancelled midway.
    async fn pause(&self, total: Duration) -> bool {
        let step = self.policy.sleep_step.max(Duration::from_millis(1));
        let mut remaining = total;
        while !remaining.is_zero() {
            if self.is_cancelled() {
                return false;
            }
            let chunk = remaining.min(step);
            tokio::time::sleep(chunk).await;
            remaining -= chunk;
        }
        !self.is_cancelled()
    }
}

fn log_undelivered(err: &DispatchError, remaining: &[PendingNotification]) {
    let undelivered: Vec<&PendingNotification> =
        remaining.iter().filter(|n| !n.dry_run).collect();
    error!(
        "Dispatch aborted: {} ({} notification(s) not delivered)",
        err,
        undelivered.len()
    );
    for n in undelivered {
        error!("  undelivered [{}]: {}", n.sort_key, n.text.replace('\n', " "));
    }
}
