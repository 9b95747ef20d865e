use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Scroll state captured for one page, without its url.
///
/// Serialized as `{"pos": .., "id": .., "height": ..}` inside the `scrolly`
/// array of the persisted snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScrollEntry {
    #[serde(rename = "pos")]
    pub position: i64,
    #[serde(rename = "id")]
    pub placeholder_element_id: Option<String>,
    #[serde(rename = "height")]
    pub placeholder_height: Option<i64>,
}

impl ScrollEntry {
    pub fn new(
        position: i64,
        placeholder_element_id: Option<String>,
        placeholder_height: Option<i64>,
    ) -> Self {
        Self {
            position,
            placeholder_element_id,
            placeholder_height,
        }
    }

    /// Reads a persisted payload leniently.
    ///
    /// Returns `None` unless the value is an object carrying an integer `pos`.
    /// A non-string `id` or non-integer `height` is read as absent.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let position = obj.get("pos").and_then(integer)?;
        let placeholder_element_id = obj
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string);
        let placeholder_height = obj.get("height").and_then(integer);
        Some(Self {
            position,
            placeholder_element_id,
            placeholder_height,
        })
    }

    /// The element id and height to pin, when both are usable.
    pub fn placeholder(&self) -> Option<(&str, i64)> {
        match (&self.placeholder_element_id, self.placeholder_height) {
            (Some(id), Some(height)) if !id.is_empty() && height > 0 => Some((id.as_str(), height)),
            _ => None,
        }
    }
}

fn integer(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite())
            .map(|f| f.trunc() as i64)
    })
}

/// One saved scroll state keyed by the full page url.
///
/// `scroll` is `None` when the persisted payload for this url was not
/// well-formed; such a record is still consumed on restore but never replayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollRecord {
    pub url: String,
    pub scroll: Option<ScrollEntry>,
}

impl ScrollRecord {
    pub fn new(url: impl Into<String>, scroll: ScrollEntry) -> Self {
        Self {
            url: url.into(),
            scroll: Some(scroll),
        }
    }
}

/// Persisted layout of the history cache: two index-aligned arrays.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct HistorySnapshot {
    pub urls: Vec<String>,
    pub scrolly: Vec<Option<ScrollEntry>>,
}

impl HistorySnapshot {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a ScrollRecord>,
    {
        let mut snapshot = Self::default();
        for record in records {
            snapshot.urls.push(record.url.clone());
            snapshot.scrolly.push(record.scroll.clone());
        }
        snapshot
    }

    /// Encodes the snapshot as a JSON string. Never fails for this schema.
    pub fn to_json_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            warn!("[CACHE] failed to encode snapshot: {}", e);
            String::from(r#"{"urls":[],"scrolly":[]}"#)
        })
    }

    /// Decodes a stored string. Anything unreadable yields an empty snapshot.
    pub fn from_json_str(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => Self::from_value(&value),
            Err(e) => {
                warn!("[CACHE] discarding unreadable scroll history: {}", e);
                Self::default()
            }
        }
    }

    /// Decodes a structural value.
    ///
    /// Both `urls` and `scrolly` must be arrays, otherwise the snapshot is
    /// empty. Pairs are zipped by index; a pair whose url is not a string is
    /// dropped, and a missing or malformed payload is kept as `None`.
    pub fn from_value(value: &Value) -> Self {
        let (urls, scrolly) = match (
            value.get("urls").and_then(Value::as_array),
            value.get("scrolly").and_then(Value::as_array),
        ) {
            (Some(urls), Some(scrolly)) => (urls, scrolly),
            _ => return Self::default(),
        };

        let mut snapshot = Self::default();
        for (i, url) in urls.iter().enumerate() {
            let Some(url) = url.as_str() else {
                continue;
            };
            snapshot.urls.push(url.to_string());
            snapshot
                .scrolly
                .push(scrolly.get(i).and_then(ScrollEntry::from_value));
        }
        snapshot
    }

    /// Pairs the arrays back into records, preserving order.
    pub fn into_records(self) -> Vec<ScrollRecord> {
        self.urls
            .into_iter()
            .zip(self.scrolly)
            .map(|(url, scroll)| ScrollRecord { url, scroll })
            .collect()
    }
}
