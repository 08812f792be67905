//! Per-feed scan: fetch, dedupe against seen-state, filter, rewrite, enqueue.
//!
//! Only matched items are remembered. A rejected item stays out of the seen
//! set so that loosening a feed's criteria later makes it eligible again.

use std::sync::Arc;

use tracing::{info, warn};

use crate::app::Result;
use crate::domain::{DateCode, Feed, Item, PendingNotification};
use crate::fetcher::Fetcher;
use crate::filter;
use crate::notify::Dispatcher;
use crate::rewrite;
use crate::store::{SeenState, SeenStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Print notifications instead of sending them.
    pub dry_run: bool,
    /// Record matched items as seen. Off only for dry runs that must not
    /// swallow a later real notification.
    pub mark_seen: bool,
    /// Hide per-item "already notified" and "skipped" lines.
    pub suppress_skip_logs: bool,
}

impl ScanOptions {
    pub fn live() -> Self {
        Self {
            dry_run: false,
            mark_seen: true,
            suppress_skip_logs: false,
        }
    }

    pub fn dry_run(mark_seen: bool) -> Self {
        Self {
            dry_run: true,
            mark_seen,
            suppress_skip_logs: false,
        }
    }

    pub fn suppress_skip_logs(mut self, suppress: bool) -> Self {
        self.suppress_skip_logs = suppress;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub fetched: usize,
    pub already_seen: usize,
    pub rejected: usize,
    pub queued: usize,
    pub fetch_failed: bool,
}

pub struct Scanner {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    store: Arc<dyn SeenStore + Send + Sync>,
    options: ScanOptions,
}

impl Scanner {
    pub fn new(
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        store: Arc<dyn SeenStore + Send + Sync>,
        options: ScanOptions,
    ) -> Self {
        Self {
            fetcher,
            store,
            options,
        }
    }

    pub fn store(&self) -> &Arc<dyn SeenStore + Send + Sync> {
        &self.store
    }

    /// Scans one feed, queueing matches on `dispatcher` and persisting the
    /// feed's updated seen set.
    ///
    /// A failed fetch is logged and reported, not returned as an error; only
    /// a failure to persist seen-state is.
    pub async fn scan_feed(
        &self,
        feed: &Feed,
        seen: &mut SeenState,
        dispatcher: &mut Dispatcher,
    ) -> Result<ScanReport> {
        let mut report = ScanReport::default();
        info!("Checking channel: {}", feed.url);

        let fetched = match self.fetcher.fetch(&feed.url, feed.limit).await {
            Ok(fetched) => fetched,
            Err(e) => {
                warn!("{}", e);
                report.fetch_failed = true;
                return Ok(report);
            }
        };

        let channel = fetched.channel.unwrap_or_else(|| feed.url.clone());
        let mut items = fetched.items;
        items.truncate(feed.limit.max(1));
        let items = oldest_first(items);
        report.fetched = items.len();

        let mut seen_ids = seen.ids(&feed.url);
        let mut changed = false;

        for item in items {
            if seen_ids.contains(&item.id) {
                report.already_seen += 1;
                if !self.options.suppress_skip_logs {
                    info!("Already notified for: {}", item.id);
                }
                continue;
            }

            if !filter::matches(&item, &feed.criteria) {
                report.rejected += 1;
                if !self.options.suppress_skip_logs {
                    info!(
                        "Skipped: {} ({})",
                        item.display_title(),
                        filter::explain(&item, &feed.criteria)
                    );
                }
                continue;
            }

            let (url, rewrite_err) = rewrite::apply(&item.url, feed.url_rewrite.as_ref());
            if let Some(e) = rewrite_err {
                warn!("URL rewrite failed for {}, keeping original: {}", item.id, e);
            }

            let date = self.upload_date(&item).await;
            let text = PendingNotification::message_text(&channel, item.display_title(), &url);
            dispatcher.enqueue(PendingNotification::new(date, text, self.options.dry_run));
            report.queued += 1;
            info!("Queued: {} [{}]", item.display_title(), date);

            if self.options.mark_seen {
                changed |= seen_ids.insert(item.id);
            }
        }

        if changed {
            seen.replace(&feed.url, seen_ids);
            self.store.save(seen)?;
        }

        Ok(report)
    }

    async fn upload_date(&self, item: &Item) -> DateCode {
        if let Some(code) = item.upload_date.as_deref().and_then(DateCode::parse) {
            return code;
        }
        match self.fetcher.resolve_upload_date(&item.url).await {
            Ok(code) => DateCode::parse_or_unknown(Some(&code)),
            Err(e) => {
                warn!("Could not resolve upload date for {}: {}", item.id, e);
                DateCode::Unknown
            }
        }
    }
}

/// Puts a newest-first listing into chronological order.
///
/// The listing is reversed; when every item carries an upload date it is
/// then sorted by that date, keeping listing order for ties.
pub fn oldest_first(mut items: Vec<Item>) -> Vec<Item> {
    items.reverse();
    let dates: Option<Vec<DateCode>> = items
        .iter()
        .map(|i| i.upload_date.as_deref().and_then(DateCode::parse))
        .collect();
    if let Some(dates) = dates {
        let mut keyed: Vec<(DateCode, Item)> = dates.into_iter().zip(items).collect();
        keyed.sort_by_key(|(date, _)| *date);
        return keyed.into_iter().map(|(_, item)| item).collect();
    }
    items
}
