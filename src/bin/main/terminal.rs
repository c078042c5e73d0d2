use std::{
    cell::Cell,
    io::{self, Stdout, Write},
    rc::Rc,
    time::Duration,
};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{
        self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
        enable_raw_mode,
    },
};
use loopreader_core::{
    app::ReaderApp,
    audio::MediaPlayer,
    input::{InputEvent, InputProvider},
    render::Screen,
};

/// Nominal pixel width of one terminal cell, used to feed auto-scaling.
const CELL_WIDTH_PX: u32 = 8;
const ORP_ANCHOR_PERCENT: u32 = 42;
const KEY_HELP: &str =
    "space play  r restart  \u{2190}/\u{2192} step  \u{2191}/\u{2193} wpm  p ramp  o loop  [/] loops  a scale  +/- vol  q quit";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum KeyAction {
    Event(InputEvent),
    Quit,
    Ignore,
}

fn map_key(key: KeyEvent) -> KeyAction {
    if key.kind != KeyEventKind::Press {
        return KeyAction::Ignore;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return KeyAction::Quit;
    }

    let event = match key.code {
        KeyCode::Char(' ') => InputEvent::TogglePlay,
        KeyCode::Char('r') => InputEvent::Restart,
        KeyCode::Right | KeyCode::Char('l') => InputEvent::StepForward,
        KeyCode::Left | KeyCode::Char('h') => InputEvent::StepBack,
        KeyCode::Up | KeyCode::Char('k') => InputEvent::Faster,
        KeyCode::Down | KeyCode::Char('j') => InputEvent::Slower,
        KeyCode::Char('p') => InputEvent::ToggleRamp,
        KeyCode::Char('o') => InputEvent::ToggleLoop,
        KeyCode::Char(']') => InputEvent::MoreLoops,
        KeyCode::Char('[') => InputEvent::FewerLoops,
        KeyCode::Char('a') => InputEvent::ToggleAutoScale,
        KeyCode::Char('+') | KeyCode::Char('=') => InputEvent::VolumeUp,
        KeyCode::Char('-') => InputEvent::VolumeDown,
        KeyCode::Enter | KeyCode::Esc => InputEvent::DismissStatus,
        KeyCode::Char('q') => return KeyAction::Quit,
        _ => return KeyAction::Ignore,
    };
    KeyAction::Event(event)
}

/// Non-blocking keyboard input. Quit requests are raised on a shared flag
/// since the app has no notion of leaving.
pub(super) struct TerminalInput {
    quit: Rc<Cell<bool>>,
}

impl TerminalInput {
    pub(super) fn new(quit: Rc<Cell<bool>>) -> Self {
        Self { quit }
    }
}

impl InputProvider for TerminalInput {
    type Error = io::Error;

    fn poll_event(&mut self) -> Result<Option<InputEvent>, Self::Error> {
        while event::poll(Duration::ZERO)? {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            match map_key(key) {
                KeyAction::Event(event) => return Ok(Some(event)),
                KeyAction::Quit => {
                    self.quit.set(true);
                    return Ok(None);
                }
                KeyAction::Ignore => {}
            }
        }
        Ok(None)
    }
}

pub(super) struct TerminalRenderer {
    out: Stdout,
    size: (u16, u16),
    active: bool,
}

impl TerminalRenderer {
    /// Switches to raw mode on the alternate screen.
    pub(super) fn enter() -> io::Result<Self> {
        let mut out = io::stdout();
        enable_raw_mode()?;
        execute!(out, EnterAlternateScreen, Hide)?;
        let size = terminal::size()?;
        Ok(Self {
            out,
            size,
            active: true,
        })
    }

    pub(super) fn leave(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        execute!(self.out, Show, LeaveAlternateScreen)?;
        disable_raw_mode()
    }

    /// Re-reads the terminal size. Returns `true` when it changed.
    pub(super) fn refresh_size(&mut self) -> bool {
        match terminal::size() {
            Ok(size) if size != self.size => {
                self.size = size;
                true
            }
            _ => false,
        }
    }

    pub(super) fn viewport_width_px(&self) -> u32 {
        viewport_width_px(self.size.0)
    }

    pub(super) fn draw<IN, P>(&mut self, app: &ReaderApp<IN, P>) -> io::Result<()>
    where
        IN: InputProvider,
        P: MediaPlayer,
    {
        let mut result = Ok(());
        app.with_screen(|screen| result = self.draw_screen(screen));
        result
    }

    fn draw_screen(&mut self, screen: Screen<'_>) -> io::Result<()> {
        let (cols, rows) = self.size;
        let middle = rows / 2;
        queue!(self.out, Clear(ClearType::All))?;

        match screen {
            Screen::Reading {
                word,
                wpm,
                loop_label,
                playing,
                progress_permille,
                font_px,
                volume_pct,
                audio_attached,
            } => {
                let anchor = orp_anchor_col(cols);
                let start = anchor.saturating_sub(word.prefix.chars().count() as u16);
                queue!(
                    self.out,
                    MoveTo(anchor, middle.saturating_sub(1)),
                    Print('\u{2502}'),
                    MoveTo(start, middle),
                    Print(word.prefix),
                    SetForegroundColor(Color::Red),
                    SetAttribute(Attribute::Bold),
                    Print(word.focus),
                    SetAttribute(Attribute::Reset),
                    ResetColor,
                    Print(word.suffix),
                    MoveTo(anchor, middle.saturating_add(1)),
                    Print('\u{2502}'),
                )?;

                let bar = progress_bar(progress_permille, cols.saturating_sub(2));
                queue!(self.out, MoveTo(1, rows.saturating_sub(2)), Print(bar))?;

                let state = if playing { "PLAYING" } else { "PAUSED" };
                let mut footer = format!("{state}  {wpm} wpm  {font_px}px");
                if !loop_label.is_empty() {
                    footer.push_str("  ");
                    footer.push_str(loop_label);
                }
                if audio_attached {
                    footer.push_str(&format!("  vol {volume_pct}%"));
                }
                queue!(self.out, MoveTo(1, rows.saturating_sub(1)), Print(footer))?;
                self.print_help()?;
            }
            Screen::Empty { font_px } => {
                self.print_centered(middle, "NOTHING TO READ")?;
                self.print_centered(middle.saturating_add(1), "pass a text file to begin")?;
                queue!(
                    self.out,
                    MoveTo(1, rows.saturating_sub(1)),
                    Print(format!("{font_px}px"))
                )?;
                self.print_help()?;
            }
            Screen::Status { line1, line2 } => {
                self.print_centered(middle.saturating_sub(1), line1)?;
                self.print_centered(middle, line2)?;
                self.print_centered(middle.saturating_add(2), "press space to continue")?;
            }
        }

        self.out.flush()
    }

    fn print_centered(&mut self, row: u16, text: &str) -> io::Result<()> {
        let width = text.chars().count() as u16;
        let col = self.size.0.saturating_sub(width) / 2;
        queue!(self.out, MoveTo(col, row), Print(text))
    }

    fn print_help(&mut self) -> io::Result<()> {
        queue!(
            self.out,
            MoveTo(1, 0),
            SetForegroundColor(Color::DarkGrey),
            Print(KEY_HELP),
            ResetColor
        )
    }
}

impl Drop for TerminalRenderer {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

fn viewport_width_px(cols: u16) -> u32 {
    u32::from(cols) * CELL_WIDTH_PX
}

fn orp_anchor_col(cols: u16) -> u16 {
    ((u32::from(cols) * ORP_ANCHOR_PERCENT) / 100) as u16
}

fn progress_bar(permille: u16, width: u16) -> String {
    let width = usize::from(width);
    let filled = (width * usize::from(permille.min(1000))) / 1000;
    let mut bar = String::with_capacity(width * 3);
    bar.extend(std::iter::repeat_n('\u{2588}', filled));
    bar.extend(std::iter::repeat_n('\u{2500}', width - filled));
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn keys_map_to_reader_events() {
        assert_eq!(
            map_key(press(KeyCode::Char(' '))),
            KeyAction::Event(InputEvent::TogglePlay)
        );
        assert_eq!(
            map_key(press(KeyCode::Up)),
            KeyAction::Event(InputEvent::Faster)
        );
        assert_eq!(
            map_key(press(KeyCode::Char('['))),
            KeyAction::Event(InputEvent::FewerLoops)
        );
        assert_eq!(
            map_key(press(KeyCode::Esc)),
            KeyAction::Event(InputEvent::DismissStatus)
        );
        assert_eq!(map_key(press(KeyCode::Char('q'))), KeyAction::Quit);
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            KeyAction::Quit
        );
        assert_eq!(map_key(press(KeyCode::F(5))), KeyAction::Ignore);
    }

    #[test]
    fn key_releases_are_ignored() {
        let mut key = press(KeyCode::Char(' '));
        key.kind = KeyEventKind::Release;
        assert_eq!(map_key(key), KeyAction::Ignore);
    }

    #[test]
    fn layout_helpers() {
        assert_eq!(viewport_width_px(80), 640);
        assert_eq!(orp_anchor_col(100), 42);
        assert_eq!(progress_bar(500, 10).chars().filter(|c| *c == '\u{2588}').count(), 5);
        assert_eq!(progress_bar(1000, 4).chars().count(), 4);
        assert_eq!(progress_bar(0, 0), "");
    }
}
