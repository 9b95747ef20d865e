//! Browser page contract used by the restorer.
//!
//! An embedder implements [`PageEnvironment`] over its real document (for
//! example a webview bridge or `web-sys`). [`MemoryPage`] is a self-contained
//! implementation for tests and the demo binary.

pub mod memory;

pub use memory::MemoryPage;

/// Page signals the restorer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    /// The document content has loaded.
    Ready,
    /// The page is about to unload.
    BeforeUnload,
}

/// Trait defining the page operations the restorer needs.
///
/// All methods take `&self`: deferred tasks hold a shared handle to the page
/// and mutate it after the triggering call has returned.
pub trait PageEnvironment: Send + Sync {
    /// Full url of the current page, including query and fragment.
    fn current_url(&self) -> String;
    /// `href` of the focused element, if it is a link.
    fn focused_href(&self) -> Option<String>;
    /// Current vertical scroll offset in pixels.
    fn scroll_y(&self) -> i64;
    fn scroll_to(&self, y: i64);
    /// Client height of the element with `id`, or `None` if there is no such element.
    fn element_client_height(&self, id: &str) -> Option<i64>;
    /// Sets a minimum height on the element. Returns `false` if the element does not exist.
    fn pin_min_height(&self, id: &str, height: i64) -> bool;
    /// Removes a minimum height previously set with [`PageEnvironment::pin_min_height`].
    fn clear_min_height(&self, id: &str);
}
