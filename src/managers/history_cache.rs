//! History Cache for the scroll restorer.
//!
//! Implements `HistoryCacheTrait`: an ordered, url-unique list of scroll
//! records bounded by a maximum size, with a total encode/decode pair for
//! the persisted snapshot.

use log::{debug, warn};

use crate::types::record::{HistorySnapshot, ScrollEntry, ScrollRecord};

/// Suffix a hash router appends to a path; removal also drops this variant.
pub const ROUTE_FRAGMENT_SUFFIX: &str = "#/";

/// Trait defining history cache operations.
pub trait HistoryCacheTrait {
    fn add(
        &mut self,
        url: &str,
        position: i64,
        placeholder_element_id: Option<&str>,
        placeholder_height: Option<i64>,
    );
    fn lookup(&self, url: &str) -> Option<&ScrollRecord>;
    fn remove(&mut self, url: &str);
    fn enforce_capacity(&mut self);
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool;
    fn max_size(&self) -> usize;
    fn set_max_size(&mut self, max_size: usize);
    fn serialize(&self) -> HistorySnapshot;
}

/// Bounded scroll history, oldest record first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryCache {
    records: Vec<ScrollRecord>,
    max_size: usize,
}

impl HistoryCache {
    /// Creates an empty cache holding at most `max_size` records.
    pub fn new(max_size: usize) -> Self {
        Self {
            records: Vec::new(),
            max_size,
        }
    }

    /// Rebuilds a cache from a decoded snapshot.
    ///
    /// Later duplicates of a url are dropped. No trimming happens here; the
    /// capacity is enforced on the next mutation.
    pub fn deserialize(snapshot: HistorySnapshot, max_size: usize) -> Self {
        let mut cache = Self::new(max_size);
        for record in snapshot.into_records() {
            if cache.position_of(&record.url).is_some() {
                warn!("[CACHE] dropping duplicate snapshot entry for {}", record.url);
                continue;
            }
            cache.records.push(record);
        }
        cache
    }

    /// Decodes a persisted string. Unreadable input yields an empty cache.
    pub fn from_json_str(raw: &str, max_size: usize) -> Self {
        Self::deserialize(HistorySnapshot::from_json_str(raw), max_size)
    }

    pub fn to_json_string(&self) -> String {
        self.serialize().to_json_string()
    }

    /// Records in order, oldest first.
    pub fn records(&self) -> &[ScrollRecord] {
        &self.records
    }

    fn position_of(&self, url: &str) -> Option<usize> {
        self.records.iter().position(|r| r.url == url)
    }

    fn remove_exact(&mut self, url: &str) -> bool {
        match self.position_of(url) {
            Some(i) => {
                self.records.remove(i);
                true
            }
            None => false,
        }
    }
}

impl HistoryCacheTrait for HistoryCache {
    /// Updates the record for `url` in place, or appends a new one, then
    /// trims to capacity.
    fn add(
        &mut self,
        url: &str,
        position: i64,
        placeholder_element_id: Option<&str>,
        placeholder_height: Option<i64>,
    ) {
        let entry = ScrollEntry::new(
            position,
            placeholder_element_id.map(str::to_string),
            placeholder_height,
        );
        match self.position_of(url) {
            Some(i) => {
                debug!("[CACHE] update {} -> {}", url, position);
                self.records[i].scroll = Some(entry);
            }
            None => {
                debug!("[CACHE] add {} -> {}", url, position);
                self.records.push(ScrollRecord::new(url, entry));
            }
        }
        self.enforce_capacity();
    }

    fn lookup(&self, url: &str) -> Option<&ScrollRecord> {
        self.records.iter().find(|r| r.url == url)
    }

    /// Removes `url` and its `#/` route variant, then trims to capacity.
    fn remove(&mut self, url: &str) {
        let removed = self.remove_exact(url);
        let removed_route = self.remove_exact(&format!("{}{}", url, ROUTE_FRAGMENT_SUFFIX));
        if removed || removed_route {
            debug!("[CACHE] removed {}", url);
        }
        self.enforce_capacity();
    }

    /// Drops records from the front until the cache fits.
    fn enforce_capacity(&mut self) {
        if self.records.len() > self.max_size {
            let excess = self.records.len() - self.max_size;
            debug!("[CACHE] evicting {} oldest record(s)", excess);
            self.records.drain(..excess);
        }
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn max_size(&self) -> usize {
        self.max_size
    }

    fn set_max_size(&mut self, max_size: usize) {
        self.max_size = max_size;
        self.enforce_capacity();
    }

    fn serialize(&self) -> HistorySnapshot {
        HistorySnapshot::from_records(&self.records)
    }
}
