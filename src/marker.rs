use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::error::Result;
use crate::store::{ContentStore, FILE_MODE};

/// File name of the marker inside the cache root.
pub const MARKER_FILE: &str = "sync.toml";

const LOG_TARGET: &str = "marker";

/// Record of the last successful synchronization.
///
/// `last_synced` is the only freshness signal; `etag` is opaque and only replayed to the
/// content host for conditional requests.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    pub last_synced: NaiveDate,
}

impl Marker {
    pub fn new(etag: Option<String>, last_synced: NaiveDate) -> Self {
        Self { etag, last_synced }
    }

    /// At most one sync per UTC calendar day: fresh only when synced on `today` itself.
    pub fn is_current(&self, today: NaiveDate) -> bool {
        self.last_synced == today
    }

    /// Loads the marker, treating a missing or unreadable file as "never synced".
    pub fn load(store: &ContentStore) -> Option<Marker> {
        if !store.exists(MARKER_FILE) {
            return None;
        }
        let content = match store.read(MARKER_FILE) {
            Ok(content) => content,
            Err(e) => {
                log::warn!(target: LOG_TARGET, "Ignoring unreadable marker: {e}");
                return None;
            }
        };
        let parsed = std::str::from_utf8(&content)
            .map_err(|e| e.to_string())
            .and_then(|text| toml::from_str::<Marker>(text).map_err(|e| e.to_string()));
        match parsed {
            Ok(marker) => Some(marker),
            Err(e) => {
                log::warn!(target: LOG_TARGET, "Ignoring malformed marker: {e}");
                None
            }
        }
    }

    pub fn save(&self, store: &ContentStore) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        store.write(MARKER_FILE, content.as_bytes(), FILE_MODE)?;
        log::debug!(target: LOG_TARGET, "Marked dataset as synced on {}", self.last_synced);
        Ok(())
    }
}

/// Formats a stored entity tag as a weak validator: `W/"<tag>"`.
///
/// Tags that are already weak or already quoted are not wrapped a second time.
pub fn weak_validator(etag: &str) -> String {
    let tag = etag.trim();
    let tag = tag.strip_prefix("W/").unwrap_or(tag);
    let tag = tag.trim_matches('"');
    format!("W/\"{tag}\"")
}
