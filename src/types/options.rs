use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::OptionsError;

pub const DEFAULT_PLACEHOLDER_TIMEOUT_MS: u64 = 1000;
pub const DEFAULT_MAX_SIZE: usize = 25;
pub const DEFAULT_SCROLL_TIMEOUT_MS: u64 = 300;
pub const DEFAULT_SCROLL_OFFSET_PX: i64 = 0;

/// Configuration for a scroll restorer.
///
/// Built once per page context. The embedder-facing option keys are `id`,
/// `timeoutHeight`, `size`, `timeout` and `offset`; see [`RestoreOptions::from_json`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RestoreOptions {
    /// Element whose height is measured on save and pinned on restore.
    pub placeholder_element_id: Option<String>,
    /// Delay before the pinned minimum height is cleared.
    pub placeholder_timeout_ms: u64,
    /// Maximum number of records kept in the history cache.
    pub max_size: usize,
    /// Delay before the saved offset is applied. Always positive.
    pub scroll_timeout_ms: u64,
    /// Constant added to the restored offset, e.g. for a fixed header.
    pub scroll_offset_px: i64,
}

impl Default for RestoreOptions {
    fn default() -> Self {
        Self {
            placeholder_element_id: None,
            placeholder_timeout_ms: DEFAULT_PLACEHOLDER_TIMEOUT_MS,
            max_size: DEFAULT_MAX_SIZE,
            scroll_timeout_ms: DEFAULT_SCROLL_TIMEOUT_MS,
            scroll_offset_px: DEFAULT_SCROLL_OFFSET_PX,
        }
    }
}

impl RestoreOptions {
    /// Builds options from an embedder-supplied JSON object.
    ///
    /// Unknown keys are ignored and a non-object value yields the defaults.
    /// Numeric keys accept numbers or strings with a leading integer.
    pub fn from_json(value: &Value) -> Self {
        Self::from_json_strict(value).unwrap_or_default()
    }

    /// Like [`RestoreOptions::from_json`], but rejects a non-object value.
    pub fn from_json_strict(value: &Value) -> Result<Self, OptionsError> {
        let map = value
            .as_object()
            .ok_or_else(|| OptionsError::NotAnObject(json_kind(value).to_string()))?;

        let mut options = Self::default();

        if let Some(id) = map.get("id") {
            options.placeholder_element_id = match id {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            };
        }
        if let Some(v) = map.get("timeoutHeight") {
            options.placeholder_timeout_ms = match coerce_int(v) {
                Some(ms) if ms >= 0 => ms as u64,
                _ => DEFAULT_PLACEHOLDER_TIMEOUT_MS,
            };
        }
        if let Some(v) = map.get("size") {
            options.max_size = coerce_int(v)
                .map(Self::normalize_size)
                .unwrap_or(DEFAULT_MAX_SIZE);
        }
        if let Some(v) = map.get("timeout") {
            options.scroll_timeout_ms =
                Self::normalize_scroll_timeout(coerce_int(v).unwrap_or(0));
        }
        if let Some(v) = map.get("offset") {
            options.scroll_offset_px = coerce_int(v).unwrap_or(DEFAULT_SCROLL_OFFSET_PX);
        }

        Ok(options)
    }

    /// Negative capacities clamp to zero.
    pub fn normalize_size(n: i64) -> usize {
        usize::try_from(n.max(0)).unwrap_or(usize::MAX)
    }

    /// A scroll delay must be positive; anything else falls back to the default.
    pub fn normalize_scroll_timeout(n: i64) -> u64 {
        if n > 0 {
            n as u64
        } else {
            DEFAULT_SCROLL_TIMEOUT_MS
        }
    }

    pub fn scroll_delay(&self) -> Duration {
        Duration::from_millis(self.scroll_timeout_ms)
    }

    pub fn placeholder_delay(&self) -> Duration {
        Duration::from_millis(self.placeholder_timeout_ms)
    }
}

/// Integer coercion for option values.
///
/// Numbers are truncated toward zero. Strings are read up to the first
/// non-digit after optional whitespace and sign, so `"300ms"` is 300.
pub fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => parse_leading_int(s),
        _ => None,
    }
}

fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits: &str = {
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        &rest[..end]
    };
    if digits.is_empty() {
        return None;
    }
    let magnitude: i64 = digits.parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
