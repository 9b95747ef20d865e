//! Restore Controller for the scroll restorer.
//!
//! Saves the current page's scroll state into the history cache on unload,
//! and replays it on the next load of the same url in two independently
//! scheduled phases: a temporary placeholder height, then the scroll itself.

use std::sync::Arc;

use log::{debug, info, warn};
use serde_json::Value;
use tokio::sync::mpsc;

use crate::managers::history_cache::{HistoryCache, HistoryCacheTrait};
use crate::page::{PageEnvironment, PageEvent};
use crate::services::scheduler::TaskScheduler;
use crate::storage::{SessionStorage, SCROLL_HISTORY_KEY};
use crate::types::options::RestoreOptions;

/// What a restore attempt did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// No record for the current url.
    NothingSaved,
    /// A record was consumed but its payload was unusable.
    Malformed,
    /// The replay was scheduled.
    Scheduled {
        /// Offset the page will be scrolled to.
        target: i64,
        /// Whether a placeholder height was pinned.
        placeholder_pinned: bool,
    },
}

/// Trait defining the restorer's runtime API.
pub trait ScrollRestorerTrait {
    fn restore_scroll(&mut self) -> RestoreOutcome;
    fn save_scroll(&mut self);
    fn handle_event(&mut self, event: PageEvent);
    fn set_size(&mut self, size: i64);
    fn set_timeout(&mut self, timeout_ms: i64);
    fn get_size(&self) -> usize;
    fn get_timeout(&self) -> u64;
    fn destroy(&mut self);
    fn is_attached(&self) -> bool;
}

/// Scroll restorer for one page context.
///
/// Owns its options, the history cache and the storage handle. The page and
/// scheduler are shared with the deferred tasks it schedules.
pub struct ScrollRestorer {
    options: RestoreOptions,
    cache: HistoryCache,
    storage: Box<dyn SessionStorage>,
    page: Arc<dyn PageEnvironment>,
    scheduler: Arc<dyn TaskScheduler>,
    attached: bool,
}

impl ScrollRestorer {
    /// Creates a restorer and loads the persisted history once.
    ///
    /// A missing, unreadable or corrupt snapshot yields an empty history.
    /// The restorer starts attached to page events.
    pub fn new(
        options: RestoreOptions,
        storage: Box<dyn SessionStorage>,
        page: Arc<dyn PageEnvironment>,
        scheduler: Arc<dyn TaskScheduler>,
    ) -> Self {
        let cache = match storage.get(SCROLL_HISTORY_KEY) {
            Ok(Some(raw)) => HistoryCache::from_json_str(&raw, options.max_size),
            Ok(None) => HistoryCache::new(options.max_size),
            Err(e) => {
                warn!("[RESTORE] could not read scroll history: {}", e);
                HistoryCache::new(options.max_size)
            }
        };
        debug!("[RESTORE] initialised with {} saved record(s)", cache.len());

        Self {
            options,
            cache,
            storage,
            page,
            scheduler,
            attached: true,
        }
    }

    /// Creates a restorer from an embedder options object (`id`,
    /// `timeoutHeight`, `size`, `timeout`, `offset`).
    pub fn from_json_options(
        options: &Value,
        storage: Box<dyn SessionStorage>,
        page: Arc<dyn PageEnvironment>,
        scheduler: Arc<dyn TaskScheduler>,
    ) -> Self {
        Self::new(RestoreOptions::from_json(options), storage, page, scheduler)
    }

    pub fn options(&self) -> &RestoreOptions {
        &self.options
    }

    pub fn history(&self) -> &HistoryCache {
        &self.cache
    }

    pub fn storage(&self) -> &dyn SessionStorage {
        self.storage.as_ref()
    }

    /// Releases the storage so the next page context can reuse it.
    pub fn into_storage(self) -> Box<dyn SessionStorage> {
        self.storage
    }

    /// Dispatches page events from a channel until every sender is dropped.
    pub async fn listen(&mut self, mut events: mpsc::Receiver<PageEvent>) {
        while let Some(event) = events.recv().await {
            self.handle_event(event);
        }
        debug!("[RESTORE] event channel closed");
    }

    fn persist(&mut self) {
        let raw = self.cache.to_json_string();
        if let Err(e) = self.storage.set(SCROLL_HISTORY_KEY, &raw) {
            warn!("[RESTORE] could not persist scroll history: {}", e);
        }
    }
}

impl ScrollRestorerTrait for ScrollRestorer {
    /// Replays the saved position for the current url, at most once.
    ///
    /// The record is consumed and the history persisted before anything is
    /// scheduled. The page then jumps to the top, the placeholder height is
    /// pinned (cleared after `placeholder_timeout_ms`), and the saved offset
    /// plus `scroll_offset_px` is applied after `scroll_timeout_ms`.
    fn restore_scroll(&mut self) -> RestoreOutcome {
        let url = self.page.current_url();
        let record = match self.cache.lookup(&url) {
            Some(record) => record.clone(),
            None => {
                debug!("[RESTORE] nothing saved for {}", url);
                return RestoreOutcome::NothingSaved;
            }
        };

        self.cache.remove(&record.url);
        self.persist();

        let Some(entry) = record.scroll else {
            warn!("[RESTORE] saved scroll for {} is malformed, skipping", url);
            return RestoreOutcome::Malformed;
        };

        self.page.scroll_to(0);

        let mut placeholder_pinned = false;
        if let Some((id, height)) = entry.placeholder() {
            if self.page.pin_min_height(id, height) {
                placeholder_pinned = true;
                let page = Arc::clone(&self.page);
                let id = id.to_string();
                self.scheduler.schedule(
                    self.options.placeholder_delay(),
                    Box::new(move || page.clear_min_height(&id)),
                );
            } else {
                debug!("[RESTORE] placeholder element {} not found", id);
            }
        }

        let target = entry.position.saturating_add(self.options.scroll_offset_px);
        let page = Arc::clone(&self.page);
        self.scheduler.schedule(
            self.options.scroll_delay(),
            Box::new(move || page.scroll_to(target)),
        );

        info!(
            "[RESTORE] restoring {} to {} in {}ms",
            url, target, self.options.scroll_timeout_ms
        );
        RestoreOutcome::Scheduled {
            target,
            placeholder_pinned,
        }
    }

    /// Captures the current page's scroll state and persists the history.
    ///
    /// A focused link means a forward navigation; its stale record is dropped
    /// first. Back/forward navigations leave nothing focused.
    fn save_scroll(&mut self) {
        if let Some(to_url) = self.page.focused_href().filter(|href| !href.is_empty()) {
            self.cache.remove(&to_url);
        }

        let id = self.options.placeholder_element_id.clone();
        let height = id
            .as_deref()
            .and_then(|id| self.page.element_client_height(id));
        let url = self.page.current_url();
        let position = self.page.scroll_y();

        self.cache.add(&url, position, id.as_deref(), height);
        self.persist();
        info!("[RESTORE] saved {} at {}", url, position);
    }

    fn handle_event(&mut self, event: PageEvent) {
        if !self.attached {
            debug!("[RESTORE] detached, ignoring {:?}", event);
            return;
        }
        match event {
            PageEvent::Ready => {
                self.restore_scroll();
            }
            PageEvent::BeforeUnload => self.save_scroll(),
        }
    }

    /// Sets the cache capacity, trimming the oldest records if it shrinks.
    fn set_size(&mut self, size: i64) {
        self.options.max_size = RestoreOptions::normalize_size(size);
        self.cache.set_max_size(self.options.max_size);
    }

    /// Sets the scroll delay. Non-positive values fall back to the default.
    fn set_timeout(&mut self, timeout_ms: i64) {
        self.options.scroll_timeout_ms = RestoreOptions::normalize_scroll_timeout(timeout_ms);
    }

    fn get_size(&self) -> usize {
        self.options.max_size
    }

    fn get_timeout(&self) -> u64 {
        self.options.scroll_timeout_ms
    }

    /// Detaches from page events. Safe to call more than once.
    fn destroy(&mut self) {
        if self.attached {
            self.attached = false;
            info!("[RESTORE] detached from page events");
        }
    }

    fn is_attached(&self) -> bool {
        self.attached
    }
}
