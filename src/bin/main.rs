use std::{
    cell::Cell,
    env,
    fs::{self, File},
    path::{Path, PathBuf},
    rc::Rc,
};

use embassy_executor::Spawner;
use embassy_time::{Instant, Timer};
use env_logger::Env;
use log::{error, info, warn};
use loopreader_core::{
    app::{ReaderApp, ReaderConfig, TickResult},
    settings::SessionSettings,
};

use file_store::FileStore;
use settings_sync::SettingsSyncState;
use terminal::{TerminalInput, TerminalRenderer};

#[path = "main/audio.rs"]
mod audio;
#[path = "main/file_store.rs"]
mod file_store;
#[path = "main/settings_sync.rs"]
mod settings_sync;
#[path = "main/terminal.rs"]
mod terminal;

#[cfg(feature = "audio")]
type HostPlayer = audio::RodioPlayer;
#[cfg(not(feature = "audio"))]
type HostPlayer = audio::SilentPlayer;

const STORE_DIR_ENV: &str = "LOOPREADER_HOME";
const DEFAULT_STORE_DIR: &str = ".loopreader";
const LOG_FILE_NAME: &str = "session.log";
const SETTINGS_SAVE_DEBOUNCE_MS: u64 = 1_000;
/// Longest sleep between ticks, bounding input latency while idle.
const INPUT_POLL_MS: u64 = 16;

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let store_dir = env::var_os(STORE_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_DIR));
    init_logging(&store_dir);

    let mut args = env::args_os().skip(1);
    let text_path = args.next().map(PathBuf::from);
    let audio_path = args.next().map(PathBuf::from);
    let mut settings_store = match FileStore::open(&store_dir) {
        Ok(store) => {
            info!("settings: store at {}", store.root().display());
            Some(store)
        }
        Err(err) => {
            warn!(
                "settings: store unavailable at {} ({}), session will not persist",
                store_dir.display(),
                err
            );
            None
        }
    };
    let session = settings_store
        .as_mut()
        .map(SessionSettings::load)
        .unwrap_or_default();

    let mut renderer = match TerminalRenderer::enter() {
        Ok(renderer) => renderer,
        Err(err) => {
            error!("terminal: setup failed: {}", err);
            std::process::exit(1);
        }
    };

    let quit = Rc::new(Cell::new(false));
    let config = ReaderConfig {
        viewport_width_px: renderer.viewport_width_px(),
        volume: session.volume,
        ..ReaderConfig::default()
    };
    let mut app: ReaderApp<TerminalInput, HostPlayer> =
        ReaderApp::new(TerminalInput::new(quit.clone()), config, session.text);
    let mut settings_sync = SettingsSyncState::new(&app);

    if let Some(path) = text_path {
        match fs::read_to_string(&path) {
            Ok(text) => app.load_text(text),
            Err(err) => {
                warn!("text: cannot read {}: {}", path.display(), err);
                app.set_status("TEXT NOT LOADED", "KEEPING LAST SESSION");
            }
        }
    }

    if let Some(path) = audio_path {
        #[cfg(not(feature = "audio"))]
        info!("audio: built without sound output, track state is logged only");
        match HostPlayer::open() {
            Ok(player) => {
                if !app.attach_audio(player, &path) {
                    app.set_status("AUDIO NOT LOADED", "READING WITHOUT SOUND");
                }
            }
            Err(err) => warn!("audio: output unavailable: {:?}", err),
        }
    }

    loop {
        let now_ms = Instant::now().as_millis();

        let resized = renderer.refresh_size();
        if resized {
            app.set_viewport_width(renderer.viewport_width_px());
        }
        let app_requests_render = app.tick(now_ms) == TickResult::RenderRequested;
        if (app_requests_render || resized)
            && let Err(err) = renderer.draw(&app)
        {
            warn!("terminal: draw failed: {}", err);
        }

        settings_sync.track_current(&app, now_ms);
        settings_sync.flush_if_due(settings_store.as_mut(), &app, now_ms);

        if quit.get() {
            break;
        }

        let wait_ms = app
            .next_deadline_ms()
            .map_or(INPUT_POLL_MS, |due_ms| {
                due_ms.saturating_sub(now_ms).min(INPUT_POLL_MS)
            })
            .max(1);
        Timer::after_millis(wait_ms).await;
    }

    app.pause();
    app.release_audio();
    settings_sync.flush_now(settings_store.as_mut(), &app, Instant::now().as_millis());
    if let Err(err) = renderer.leave() {
        warn!("terminal: restore failed: {}", err);
    }
    info!("session closed");
    std::process::exit(0);
}

/// Logs go to a file next to the store; the terminal belongs to the reader.
fn init_logging(store_dir: &Path) {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    let log_file = fs::create_dir_all(store_dir)
        .and_then(|()| File::create(store_dir.join(LOG_FILE_NAME)));
    match log_file {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(_) => {
            builder.target(env_logger::Target::Stderr);
        }
    }
    builder.init();
}
