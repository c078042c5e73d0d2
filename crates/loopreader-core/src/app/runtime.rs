impl<IN, P> ReaderApp<IN, P>
where
    IN: InputProvider,
    P: MediaPlayer,
{
    pub fn toggle_play(&mut self, now_ms: u64) {
        if self.state.playing {
            self.pause();
        } else {
            self.play(now_ms);
        }
    }

    /// Starts advancing from the current word. Returns `false` when there is
    /// nothing to read.
    pub fn play(&mut self, now_ms: u64) -> bool {
        if self.state.playing {
            return true;
        }

        if !self.document.is_playable() {
            info!("reader: empty document, playback suppressed");
            self.cancel_pending();
            return false;
        }

        self.state.playing = true;
        self.schedule(now_ms);
        self.audio.sync_playing(true);
        self.pending_redraw = true;
        true
    }

    /// Stops advancing and keeps the current word for resume.
    pub fn pause(&mut self) {
        self.cancel_pending();
        if self.state.playing {
            debug!("reader: paused at word {}", self.state.word_index);
        }
        self.state.playing = false;
        self.audio.sync_playing(false);
        self.pending_redraw = true;
    }

    /// Restarts the session at word 0, pass 1, and starts playing.
    pub fn relaunch(&mut self, now_ms: u64) -> bool {
        self.cancel_pending();
        self.state = PlaybackState::new();
        self.audio.sync_playing(false);
        self.audio.rewind();
        self.pending_redraw = true;
        info!("reader: session relaunch");
        self.play(now_ms)
    }

    /// Replaces the document. Playback stops at word 0, pass 1.
    pub fn load_text(&mut self, text: String) {
        self.cancel_pending();
        self.audio.sync_playing(false);

        self.document = Document::from_text(&text);
        self.raw_text = text;
        self.text_revision = self.text_revision.wrapping_add(1);
        self.state = PlaybackState::new();
        self.status = None;
        self.rescale();
        self.pending_redraw = true;

        info!(
            "reader: document loaded words={} playable={}",
            self.document.len(),
            self.document.is_playable()
        );
    }

    /// Moves one word while paused. Ignored during playback.
    pub fn step_word(&mut self, forward: bool) -> bool {
        if self.state.playing || !self.document.is_playable() {
            return false;
        }

        let next = if forward {
            (self.state.word_index + 1).min(self.document.last_index())
        } else {
            self.state.word_index.saturating_sub(1)
        };

        if next == self.state.word_index {
            return false;
        }
        self.state.word_index = next;
        self.pending_redraw = true;
        true
    }

    fn fire_due_advance(&mut self, now_ms: u64) {
        let Some(pending) = self.pending else {
            return;
        };
        if now_ms < pending.due_ms {
            return;
        }
        self.pending = None;

        if !self.state.playing || pending.word_index != self.state.word_index {
            debug!(
                "scheduler: dropping stale advance for word {} (at {})",
                pending.word_index, self.state.word_index
            );
            return;
        }

        if self.state.word_index < self.document.last_index() {
            self.state.word_index += 1;
            self.schedule(now_ms);
        } else {
            self.finish_pass(now_ms);
        }
        self.pending_redraw = true;
    }

    fn finish_pass(&mut self, now_ms: u64) {
        match decide(&self.looping, self.state.loop_count) {
            LoopDecision::Restart => {
                self.state.loop_count = self.state.loop_count.saturating_add(1);
                self.state.word_index = 0;
                self.audio.rewind();
                info!("reader: loop {} begins", self.state.loop_count);
                self.schedule(now_ms);
            }
            LoopDecision::Stop => {
                info!(
                    "reader: sequence finished after {} pass(es)",
                    self.state.loop_count
                );
                self.pause();
                self.state.word_index = 0;
                self.audio.rewind();
            }
        }
    }

    /// Arms the one pending advance for the current word, replacing any
    /// previous one.
    fn schedule(&mut self, now_ms: u64) {
        self.cancel_pending();

        let pace = self.current_pace();
        let delay = delay_ms(self.current_word(), pace);
        let pending = PendingAdvance {
            word_index: self.state.word_index,
            due_ms: now_ms.saturating_add(delay as u64),
        };
        debug!(
            "scheduler: word {} loop {} at {}wpm for {}ms",
            pending.word_index, self.state.loop_count, pace, delay
        );
        self.pending = Some(pending);
    }

    /// Cancels and re-derives the pending advance after a policy edit.
    fn retime(&mut self, now_ms: u64) {
        if self.state.playing {
            self.schedule(now_ms);
        }
        self.pending_redraw = true;
    }

    fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            debug!("scheduler: cancelled advance for word {}", pending.word_index);
        }
    }
}
