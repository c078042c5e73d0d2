use loopreader_core::{
    app::ReaderApp,
    audio::MediaPlayer,
    input::InputProvider,
    settings::{KeyValueStore, SessionSync},
};

use super::SETTINGS_SAVE_DEBOUNCE_MS;

/// Debounces session writes so a burst of volume steps lands as one write.
pub(super) struct SettingsSyncState {
    sync: SessionSync,
    last_seen: (u32, f32),
    changed_at_ms: Option<u64>,
}

impl SettingsSyncState {
    pub(super) fn new<IN, P>(app: &ReaderApp<IN, P>) -> Self
    where
        IN: InputProvider,
        P: MediaPlayer,
    {
        Self {
            sync: SessionSync::new(app.text_revision(), app.volume()),
            last_seen: (app.text_revision(), app.volume()),
            changed_at_ms: None,
        }
    }

    pub(super) fn track_current<IN, P>(&mut self, app: &ReaderApp<IN, P>, now_ms: u64)
    where
        IN: InputProvider,
        P: MediaPlayer,
    {
        let current = (app.text_revision(), app.volume());
        if !self.sync.is_dirty(current.0, current.1) {
            self.last_seen = current;
            self.changed_at_ms = None;
            return;
        }

        if current != self.last_seen || self.changed_at_ms.is_none() {
            self.last_seen = current;
            self.changed_at_ms = Some(now_ms);
        }
    }

    pub(super) fn flush_if_due<S, IN, P>(
        &mut self,
        store: Option<&mut S>,
        app: &ReaderApp<IN, P>,
        now_ms: u64,
    ) where
        S: KeyValueStore,
        IN: InputProvider,
        P: MediaPlayer,
    {
        let Some(changed_at_ms) = self.changed_at_ms else {
            return;
        };
        if now_ms.saturating_sub(changed_at_ms) < SETTINGS_SAVE_DEBOUNCE_MS {
            return;
        }
        self.flush_now(store, app, now_ms);
    }

    /// Writes pending changes regardless of the debounce window.
    pub(super) fn flush_now<S, IN, P>(
        &mut self,
        store: Option<&mut S>,
        app: &ReaderApp<IN, P>,
        now_ms: u64,
    ) where
        S: KeyValueStore,
        IN: InputProvider,
        P: MediaPlayer,
    {
        let (text_revision, volume) = (app.text_revision(), app.volume());
        match store {
            Some(store) => {
                self.sync
                    .flush(store, app.raw_text(), text_revision, volume);
                // Keep pending changes and retry later if the store is unavailable.
                self.changed_at_ms = self
                    .sync
                    .is_dirty(text_revision, volume)
                    .then_some(now_ms);
            }
            None => {
                self.sync = SessionSync::new(text_revision, volume);
                self.changed_at_ms = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use loopreader_core::{
        app::ReaderConfig,
        audio::MediaPlayer,
        input::NoInput,
        settings::{MemoryStore, TEXT_KEY, VOLUME_KEY},
    };

    use super::*;

    struct NullPlayer;

    impl MediaPlayer for NullPlayer {
        type Source = str;
        type Error = ();

        fn load(&mut self, _source: &str) -> Result<(), ()> {
            Ok(())
        }
        fn play(&mut self) -> Result<(), ()> {
            Ok(())
        }
        fn pause(&mut self) -> Result<(), ()> {
            Ok(())
        }
        fn set_current_time(&mut self, _seconds: f32) -> Result<(), ()> {
            Ok(())
        }
        fn set_volume(&mut self, _level: f32) -> Result<(), ()> {
            Ok(())
        }
    }

    fn make_app() -> ReaderApp<NoInput, NullPlayer> {
        ReaderApp::new(NoInput, ReaderConfig::default(), "one two".to_string())
    }

    #[test]
    fn writes_wait_for_the_debounce_window() {
        let mut app = make_app();
        let mut sync = SettingsSyncState::new(&app);
        let mut store = MemoryStore::new();

        app.set_volume(0.4);
        sync.track_current(&app, 1_000);
        sync.flush_if_due(Some(&mut store), &app, 1_000 + SETTINGS_SAVE_DEBOUNCE_MS - 1);
        assert_eq!(store.get(VOLUME_KEY).unwrap(), None);

        sync.flush_if_due(Some(&mut store), &app, 1_000 + SETTINGS_SAVE_DEBOUNCE_MS);
        assert_eq!(store.get(VOLUME_KEY).unwrap().as_deref(), Some("0.40"));
    }

    #[test]
    fn further_edits_restart_the_window() {
        let mut app = make_app();
        let mut sync = SettingsSyncState::new(&app);
        let mut store = MemoryStore::new();

        app.set_volume(0.4);
        sync.track_current(&app, 0);
        app.set_volume(0.5);
        sync.track_current(&app, 100);

        sync.flush_if_due(Some(&mut store), &app, SETTINGS_SAVE_DEBOUNCE_MS);
        assert_eq!(store.get(VOLUME_KEY).unwrap(), None);

        sync.flush_if_due(Some(&mut store), &app, 100 + SETTINGS_SAVE_DEBOUNCE_MS);
        assert_eq!(store.get(VOLUME_KEY).unwrap().as_deref(), Some("0.50"));
    }

    #[test]
    fn shutdown_flush_ignores_the_window() {
        let mut app = make_app();
        let mut sync = SettingsSyncState::new(&app);
        let mut store = MemoryStore::new();

        app.load_text("fresh words".to_string());
        sync.track_current(&app, 0);
        sync.flush_now(Some(&mut store), &app, 1);

        assert_eq!(store.get(TEXT_KEY).unwrap().as_deref(), Some("fresh words"));
        assert_eq!(store.get(VOLUME_KEY).unwrap(), None);
    }
}
