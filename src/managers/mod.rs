// Stateful managers for the scroll restorer.

pub mod history_cache;
