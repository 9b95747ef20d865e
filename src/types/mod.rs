// Shared type definitions for the scroll restorer.

pub mod errors;
pub mod options;
pub mod record;
