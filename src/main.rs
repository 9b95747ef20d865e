//! scroll-restore — console walkthrough of a back navigation.
//!
//! Drives a `ScrollRestorer` over an in-memory page: scroll a list, follow a
//! link, go back, and watch the saved offset being replayed.

use std::sync::Arc;
use std::time::Duration;

use scroll_restore::storage::SessionStorage;
use scroll_restore::{
    MemoryPage, PageEvent, RestoreOptions, ScrollRestorer, ScrollRestorerTrait, TokioScheduler,
};

fn section(name: &str) {
    println!("───────────────────────────────────────────────────────────────");
    println!("  📦 {}", name);
    println!("───────────────────────────────────────────────────────────────");
}

#[cfg(feature = "sqlite")]
fn open_storage() -> Box<dyn SessionStorage> {
    use scroll_restore::storage::{MemoryStorage, SqliteStorage};
    match SqliteStorage::open_in_memory() {
        Ok(storage) => Box::new(storage),
        Err(e) => {
            println!("  SQLite storage unavailable ({}), using memory", e);
            Box::new(MemoryStorage::new())
        }
    }
}

#[cfg(not(feature = "sqlite"))]
fn open_storage() -> Box<dyn SessionStorage> {
    Box::new(scroll_restore::storage::MemoryStorage::new())
}

#[tokio::main]
async fn main() {
    println!();
    println!("  scroll-restore v{} — Demo Mode", env!("CARGO_PKG_VERSION"));
    println!();

    let options = RestoreOptions {
        placeholder_element_id: Some("main".to_string()),
        scroll_offset_px: -40,
        ..RestoreOptions::default()
    };
    let page = Arc::new(MemoryPage::new("https://shop.test/list").with_element("main", 5400));
    let scheduler = match TokioScheduler::current() {
        Some(scheduler) => Arc::new(scheduler),
        None => return,
    };

    section("Forward navigation");
    let mut restorer = ScrollRestorer::new(
        options.clone(),
        open_storage(),
        page.clone(),
        scheduler.clone(),
    );
    page.set_scroll_y(1800);
    page.focus_link("https://shop.test/item/7");
    restorer.handle_event(PageEvent::BeforeUnload);
    println!("  Saved /list at 1800, history size {}", restorer.history().records().len());
    let storage = restorer.into_storage();

    page.navigate("https://shop.test/item/7");
    let mut restorer = ScrollRestorer::new(options.clone(), storage, page.clone(), scheduler.clone());
    println!("  /item/7 loaded: {:?}", restorer.restore_scroll());
    println!();

    section("Back navigation");
    page.set_scroll_y(350);
    restorer.handle_event(PageEvent::BeforeUnload);
    let storage = restorer.into_storage();

    page.navigate("https://shop.test/list");
    let mut restorer = ScrollRestorer::new(options, storage, page.clone(), scheduler);
    let outcome = restorer.restore_scroll();
    println!("  /list loaded: {:?}", outcome);
    println!("  Placeholder min-height: {:?}", page.min_height("main"));

    tokio::time::sleep(Duration::from_millis(restorer.get_timeout() + 50)).await;
    println!("  After {}ms scroll calls: {:?}", restorer.get_timeout(), page.scroll_calls());

    tokio::time::sleep(restorer.options().placeholder_delay()).await;
    println!("  Placeholder min-height: {:?}", page.min_height("main"));
    println!("  Remaining records: {}", restorer.history().records().len());

    restorer.destroy();
    println!();
    println!("  ✓ Restore timeline complete");
}
