impl<IN, P> ReaderApp<IN, P>
where
    IN: InputProvider,
    P: MediaPlayer,
{
    pub fn new(input: IN, config: ReaderConfig, text: String) -> Self {
        let document = Document::from_text(&text);
        let mut app = Self {
            input,
            audio: AudioSync::new(config.volume),
            raw_text: text,
            text_revision: 0,
            document,
            pace: config.pace.sanitized(),
            looping: config.looping,
            scale: config.scale,
            viewport_width_px: config.viewport_width_px,
            state: PlaybackState::new(),
            pending: None,
            status: None,
            pending_redraw: true,
        };
        app.rescale();
        info!(
            "reader: session start words={} playable={}",
            app.document.len(),
            app.document.is_playable()
        );
        app
    }

    pub fn tick(&mut self, now_ms: u64) -> TickResult {
        self.process_inputs(now_ms);
        self.fire_due_advance(now_ms);

        if self.pending_redraw {
            self.pending_redraw = false;
            TickResult::RenderRequested
        } else {
            TickResult::NoRender
        }
    }

    pub fn with_screen<F>(&self, f: F)
    where
        F: FnOnce(Screen<'_>),
    {
        if let Some(status) = self.status {
            f(Screen::Status {
                line1: status.line1,
                line2: status.line2,
            });
            return;
        }

        if !self.document.is_playable() {
            f(Screen::Empty {
                font_px: self.font_px(),
            });
            return;
        }

        let word = self.document.word(self.state.word_index).unwrap_or("");
        let label = loop_label(&self.looping, self.state.loop_count);
        f(Screen::Reading {
            word: focus_point(word),
            wpm: self.current_pace(),
            loop_label: label.as_str(),
            playing: self.state.playing,
            progress_permille: self.progress_permille(),
            font_px: self.font_px(),
            volume_pct: self.volume_pct(),
            audio_attached: self.audio.is_attached(),
        });
    }

    pub fn playback(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state.playing
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn current_word(&self) -> &str {
        self.document.word(self.state.word_index).unwrap_or("")
    }

    /// Pace the current word is shown at.
    pub fn current_pace(&self) -> u16 {
        current_pace(&self.pace, &self.looping, &self.state, self.document.len())
    }

    /// Position within the current pass, 0..=1000.
    pub fn progress_permille(&self) -> u16 {
        if !self.document.is_playable() {
            return 0;
        }
        (((self.state.word_index + 1) * 1000) / self.document.len()).min(1000) as u16
    }

    pub fn pace_policy(&self) -> PacePolicy {
        self.pace
    }

    pub fn loop_policy(&self) -> LoopPolicy {
        self.looping
    }

    pub fn scale_mode(&self) -> ScaleMode {
        self.scale
    }

    /// Font size to render with. In auto mode this is the latest estimate.
    pub fn font_px(&self) -> u16 {
        self.scale.manual_px
    }

    pub fn volume(&self) -> f32 {
        self.audio.volume()
    }

    fn volume_pct(&self) -> u8 {
        (self.audio.volume() * 100.0 + 0.5) as u8
    }

    pub fn audio(&self) -> &AudioSync<P> {
        &self.audio
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Bumped whenever the raw text is replaced.
    pub fn text_revision(&self) -> u32 {
        self.text_revision
    }

    pub fn pending_advance(&self) -> Option<PendingAdvance> {
        self.pending
    }

    /// When the host should tick next to fire the pending advance.
    pub fn next_deadline_ms(&self) -> Option<u64> {
        self.pending.map(|pending| pending.due_ms)
    }

    pub fn status(&self) -> Option<StatusNotice> {
        self.status
    }
}
