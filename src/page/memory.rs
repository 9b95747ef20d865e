use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::PageEnvironment;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Element {
    client_height: i64,
    min_height: Option<i64>,
}

#[derive(Debug, Default)]
struct PageState {
    url: String,
    focused_href: Option<String>,
    scroll_y: i64,
    scroll_calls: Vec<i64>,
    elements: HashMap<String, Element>,
}

/// In-memory page: a url, a scroll offset, a focused link and a set of
/// elements with client heights.
///
/// Every `scroll_to` call is recorded so a restore timeline can be inspected.
#[derive(Debug, Default)]
pub struct MemoryPage {
    state: Mutex<PageState>,
}

impl MemoryPage {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(PageState {
                url: url.into(),
                ..PageState::default()
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Adds (or replaces) an element with the given client height.
    pub fn with_element(self, id: impl Into<String>, client_height: i64) -> Self {
        self.set_element(id, client_height);
        self
    }

    pub fn set_element(&self, id: impl Into<String>, client_height: i64) {
        self.state().elements.insert(
            id.into(),
            Element {
                client_height,
                min_height: None,
            },
        );
    }

    pub fn remove_element(&self, id: &str) {
        self.state().elements.remove(id);
    }

    /// Simulates the user scrolling.
    pub fn set_scroll_y(&self, y: i64) {
        self.state().scroll_y = y;
    }

    /// Focuses a link, as a click on it would before unload.
    pub fn focus_link(&self, href: impl Into<String>) {
        self.state().focused_href = Some(href.into());
    }

    pub fn blur(&self) {
        self.state().focused_href = None;
    }

    /// Replaces the document: new url, scroll at the top, no focus, no
    /// height overrides and an empty scroll log. Elements are kept.
    pub fn navigate(&self, url: impl Into<String>) {
        let mut state = self.state();
        state.url = url.into();
        state.focused_href = None;
        state.scroll_y = 0;
        state.scroll_calls.clear();
        for element in state.elements.values_mut() {
            element.min_height = None;
        }
    }

    /// Current minimum-height override on an element.
    pub fn min_height(&self, id: &str) -> Option<i64> {
        self.state().elements.get(id).and_then(|e| e.min_height)
    }

    /// Every offset passed to `scroll_to` since the last navigation, in order.
    pub fn scroll_calls(&self) -> Vec<i64> {
        self.state().scroll_calls.clone()
    }
}

impl PageEnvironment for MemoryPage {
    fn current_url(&self) -> String {
        self.state().url.clone()
    }

    fn focused_href(&self) -> Option<String> {
        self.state().focused_href.clone()
    }

    fn scroll_y(&self) -> i64 {
        self.state().scroll_y
    }

    fn scroll_to(&self, y: i64) {
        let mut state = self.state();
        state.scroll_y = y.max(0);
        state.scroll_calls.push(y);
    }

    fn element_client_height(&self, id: &str) -> Option<i64> {
        self.state().elements.get(id).map(|e| e.client_height)
    }

    fn pin_min_height(&self, id: &str, height: i64) -> bool {
        match self.state().elements.get_mut(id) {
            Some(element) => {
                element.min_height = Some(height);
                true
            }
            None => false,
        }
    }

    fn clear_min_height(&self, id: &str) {
        if let Some(element) = self.state().elements.get_mut(id) {
            element.min_height = None;
        }
    }
}
