use std::fmt;

// === StorageError ===

/// Errors related to the session key/value store.
#[derive(Debug)]
pub enum StorageError {
    /// The backing store rejected the operation.
    Backend(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Backend(msg) => write!(f, "Session storage error: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

// === OptionsError ===

/// Errors related to parsing restore options.
#[derive(Debug)]
pub enum OptionsError {
    /// The options value was not a JSON object.
    NotAnObject(String),
}

impl fmt::Display for OptionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionsError::NotAnObject(kind) => {
                write!(f, "Restore options must be an object, got {}", kind)
            }
        }
    }
}

impl std::error::Error for OptionsError {}
