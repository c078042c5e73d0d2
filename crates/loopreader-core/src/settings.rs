//! Persisted session abstraction: document text and volume.

use alloc::{
    collections::BTreeMap,
    string::{String, ToString},
};
use core::{convert::Infallible, fmt::Write};

use heapless::String as HeaplessString;
use log::{info, warn};

use crate::{
    audio::{DEFAULT_VOLUME, sanitize_volume},
    document::DEFAULT_TEXT,
};

pub const TEXT_KEY: &str = "loopreader.text";
pub const VOLUME_KEY: &str = "loopreader.volume";

const VOLUME_TEXT_BYTES: usize = 16;

/// Abstract string key-value persistence backend.
pub trait KeyValueStore {
    type Error: core::fmt::Debug;

    fn get(&mut self, key: &str) -> Result<Option<String>, Self::Error>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), Self::Error>;
}

/// Values that survive between sessions.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionSettings {
    pub text: String,
    pub volume: f32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            text: DEFAULT_TEXT.to_string(),
            volume: DEFAULT_VOLUME,
        }
    }
}

impl SessionSettings {
    /// Reads the stored session, falling back per field when a value is
    /// missing, unreadable or malformed.
    pub fn load<S: KeyValueStore>(store: &mut S) -> Self {
        let mut settings = Self::default();

        match store.get(TEXT_KEY) {
            Ok(Some(text)) => settings.text = text,
            Ok(None) => info!("settings: no stored text, using default"),
            Err(err) => warn!("settings: text read failed: {:?}", err),
        }

        match store.get(VOLUME_KEY) {
            Ok(Some(raw)) => match raw.trim().parse::<f32>().ok().and_then(sanitize_volume) {
                Some(volume) => settings.volume = volume,
                None => warn!("settings: ignoring malformed volume {:?}", raw),
            },
            Ok(None) => {}
            Err(err) => warn!("settings: volume read failed: {:?}", err),
        }

        settings
    }
}

/// Tracks what was last written so every change is persisted exactly once.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionSync {
    saved_text_revision: u32,
    saved_volume: f32,
}

impl SessionSync {
    /// Starts in sync with a freshly loaded session at `text_revision`.
    pub fn new(text_revision: u32, volume: f32) -> Self {
        Self {
            saved_text_revision: text_revision,
            saved_volume: volume,
        }
    }

    pub fn is_dirty(&self, text_revision: u32, volume: f32) -> bool {
        self.saved_text_revision != text_revision || self.saved_volume != volume
    }

    /// Writes whatever changed since the last successful write. Failed writes
    /// stay pending and are retried on the next call.
    pub fn flush<S: KeyValueStore>(
        &mut self,
        store: &mut S,
        text: &str,
        text_revision: u32,
        volume: f32,
    ) {
        if self.saved_text_revision != text_revision {
            match store.set(TEXT_KEY, text) {
                Ok(()) => self.saved_text_revision = text_revision,
                Err(err) => warn!("settings: text write failed: {:?}", err),
            }
        }

        if self.saved_volume != volume {
            let mut encoded = HeaplessString::<VOLUME_TEXT_BYTES>::new();
            let _ = write!(encoded, "{:.2}", volume);
            match store.set(VOLUME_KEY, &encoded) {
                Ok(()) => self.saved_volume = volume,
                Err(err) => warn!("settings: volume write failed: {:?}", err),
            }
        }
    }
}

/// In-memory store, for tests and hosts without persistent storage.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    type Error = Infallible;

    fn get(&mut self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Store whose writes fail until `online` is set.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        online: bool,
        writes: usize,
    }

    impl KeyValueStore for FlakyStore {
        type Error = &'static str;

        fn get(&mut self, key: &str) -> Result<Option<String>, Self::Error> {
            if !self.online {
                return Err("offline");
            }
            Ok(self.inner.get(key).unwrap_or(None))
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
            if !self.online {
                return Err("offline");
            }
            self.writes += 1;
            self.inner.entries.insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    #[test]
    fn empty_store_falls_back_to_defaults() {
        let settings = SessionSettings::load(&mut MemoryStore::new());
        assert_eq!(settings.text, DEFAULT_TEXT);
        assert_eq!(settings.volume, DEFAULT_VOLUME);
    }

    #[test]
    fn unreadable_store_falls_back_to_defaults() {
        let settings = SessionSettings::load(&mut FlakyStore::default());
        assert_eq!(settings, SessionSettings::default());
    }

    #[test]
    fn stored_values_are_restored() {
        let mut store = MemoryStore::new();
        store.set(TEXT_KEY, "stored words").unwrap();
        store.set(VOLUME_KEY, "0.25").unwrap();

        let settings = SessionSettings::load(&mut store);
        assert_eq!(settings.text, "stored words");
        assert_eq!(settings.volume, 0.25);
    }

    #[test]
    fn malformed_volume_is_ignored_and_out_of_range_clamped() {
        let mut store = MemoryStore::new();
        store.set(VOLUME_KEY, "loud").unwrap();
        assert_eq!(SessionSettings::load(&mut store).volume, DEFAULT_VOLUME);

        store.set(VOLUME_KEY, "3").unwrap();
        assert_eq!(SessionSettings::load(&mut store).volume, 1.0);
    }

    #[test]
    fn sync_writes_only_changes() {
        let mut store = FlakyStore {
            online: true,
            ..FlakyStore::default()
        };
        let mut sync = SessionSync::new(0, 0.7);

        sync.flush(&mut store, "unchanged", 0, 0.7);
        assert_eq!(store.writes, 0);

        sync.flush(&mut store, "new text", 1, 0.7);
        assert_eq!(store.writes, 1);
        assert_eq!(store.inner.entries.get(TEXT_KEY).map(String::as_str), Some("new text"));

        sync.flush(&mut store, "new text", 1, 0.5);
        assert_eq!(store.writes, 2);
        assert_eq!(store.inner.entries.get(VOLUME_KEY).map(String::as_str), Some("0.50"));
        assert!(!sync.is_dirty(1, 0.5));
    }

    #[test]
    fn failed_write_is_retried() {
        let mut store = FlakyStore::default();
        let mut sync = SessionSync::new(0, 0.7);

        sync.flush(&mut store, "pending", 1, 0.7);
        assert!(sync.is_dirty(1, 0.7));

        store.online = true;
        sync.flush(&mut store, "pending", 1, 0.7);
        assert!(!sync.is_dirty(1, 0.7));
        assert_eq!(store.writes, 1);
    }
}
