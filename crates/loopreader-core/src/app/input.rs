impl<IN, P> ReaderApp<IN, P>
where
    IN: InputProvider,
    P: MediaPlayer,
{
    fn process_inputs(&mut self, now_ms: u64) {
        loop {
            match self.input.poll_event() {
                Ok(Some(event)) => self.apply_input_event(event, now_ms),
                Ok(None) => break,
                Err(_) => {
                    self.set_status("INPUT ERROR", "CHECK PROVIDER");
                    break;
                }
            }
        }
    }

    fn apply_input_event(&mut self, event: InputEvent, now_ms: u64) {
        if self.status.is_some()
            && matches!(event, InputEvent::TogglePlay | InputEvent::DismissStatus)
        {
            self.dismiss_status();
            return;
        }

        match event {
            InputEvent::TogglePlay => self.toggle_play(now_ms),
            InputEvent::Restart => {
                self.relaunch(now_ms);
            }
            InputEvent::StepForward => {
                self.step_word(true);
            }
            InputEvent::StepBack => {
                self.step_word(false);
            }
            InputEvent::Faster | InputEvent::Slower => {
                let mut pace = self.pace;
                if pace.step_base(matches!(event, InputEvent::Faster)) {
                    self.set_pace_policy(pace, now_ms);
                }
            }
            InputEvent::ToggleRamp => self.set_ramp_enabled(!self.pace.ramp_enabled, now_ms),
            InputEvent::ToggleLoop => self.set_loop_enabled(!self.looping.enabled, now_ms),
            InputEvent::MoreLoops => {
                self.set_max_loops(self.looping.max_loops.saturating_add(1), now_ms)
            }
            InputEvent::FewerLoops => {
                self.set_max_loops(self.looping.max_loops.saturating_sub(1), now_ms)
            }
            InputEvent::ToggleAutoScale => self.set_scale_auto(!self.scale.auto),
            InputEvent::VolumeUp => self.step_volume(VOLUME_STEP_TENTHS),
            InputEvent::VolumeDown => self.step_volume(-VOLUME_STEP_TENTHS),
            InputEvent::DismissStatus => {}
        }
    }

    pub fn set_pace_policy(&mut self, pace: PacePolicy, now_ms: u64) {
        let pace = pace.sanitized();
        if pace == self.pace {
            return;
        }
        debug!("reader: pace policy {:?}", pace);
        self.pace = pace;
        self.retime(now_ms);
    }

    pub fn set_base_wpm(&mut self, wpm: u16, now_ms: u64) {
        self.set_pace_policy(
            PacePolicy {
                base_wpm: wpm,
                ..self.pace
            },
            now_ms,
        );
    }

    pub fn set_ramp_enabled(&mut self, enabled: bool, now_ms: u64) {
        self.set_pace_policy(
            PacePolicy {
                ramp_enabled: enabled,
                ..self.pace
            },
            now_ms,
        );
    }

    pub fn set_ramp_start_wpm(&mut self, wpm: u16, now_ms: u64) {
        self.set_pace_policy(
            PacePolicy {
                start_wpm: wpm,
                ..self.pace
            },
            now_ms,
        );
    }

    pub fn set_ramp_end_wpm(&mut self, wpm: u16, now_ms: u64) {
        self.set_pace_policy(
            PacePolicy {
                end_wpm: wpm,
                ..self.pace
            },
            now_ms,
        );
    }

    pub fn set_loop_policy(&mut self, looping: LoopPolicy, now_ms: u64) {
        if looping == self.looping {
            return;
        }
        debug!("reader: loop policy {:?}", looping);
        self.looping = looping;
        // Ramp progress depends on the loop bound.
        self.retime(now_ms);
    }

    pub fn set_loop_enabled(&mut self, enabled: bool, now_ms: u64) {
        self.set_loop_policy(
            LoopPolicy {
                enabled,
                ..self.looping
            },
            now_ms,
        );
    }

    /// `0` repeats without bound.
    pub fn set_max_loops(&mut self, max_loops: u16, now_ms: u64) {
        self.set_loop_policy(
            LoopPolicy {
                max_loops,
                ..self.looping
            },
            now_ms,
        );
    }

    pub fn set_scale_auto(&mut self, auto: bool) {
        self.scale.auto = auto;
        self.rescale();
        self.pending_redraw = true;
    }

    /// Pins the font size and leaves auto mode.
    pub fn set_manual_scale_px(&mut self, px: u16) {
        self.scale = ScaleMode {
            auto: false,
            manual_px: px.clamp(MIN_FONT_PX, MAX_FONT_PX),
        };
        self.pending_redraw = true;
    }

    pub fn set_viewport_width(&mut self, width_px: u32) {
        if width_px == self.viewport_width_px {
            return;
        }
        self.viewport_width_px = width_px;
        self.rescale();
    }

    pub fn set_volume(&mut self, level: f32) {
        if self.audio.set_volume(level) {
            self.pending_redraw = true;
        }
    }

    fn step_volume(&mut self, delta_tenths: i32) {
        let tenths = (self.audio.volume() * 10.0 + 0.5) as i32;
        let next = (tenths + delta_tenths).clamp(0, 10);
        self.set_volume(next as f32 / 10.0);
    }

    /// Loads `source` into `player` as the active audio track, replacing any
    /// previous one.
    pub fn attach_audio(&mut self, player: P, source: &P::Source) -> bool {
        let attached = self.audio.attach(player, source);
        self.pending_redraw = true;
        attached
    }

    pub fn release_audio(&mut self) -> Option<P> {
        self.pending_redraw = true;
        self.audio.release()
    }

    /// Runs `recognizer` over `image` and loads the result as the new
    /// document. On failure the current document and position are kept and a
    /// notice is shown.
    pub fn import_recognized_text<R, F>(
        &mut self,
        recognizer: &mut R,
        image: &R::Image,
        mut on_progress: F,
    ) -> bool
    where
        R: TextRecognizer,
        F: FnMut(RecognitionProgress),
    {
        let result = recognizer.recognize(image, &mut |progress| {
            debug!(
                "ocr: {:?} {}%",
                progress.phase,
                progress.percent()
            );
            on_progress(progress);
        });

        match result {
            Ok(text) => {
                if !Document::from_text(&text).is_playable() {
                    info!("ocr: recognition produced no words");
                    self.set_status("NO TEXT FOUND", "TRY A CLEARER IMAGE");
                    return false;
                }
                self.load_text(text);
                true
            }
            Err(err) => {
                warn!("ocr: recognition failed: {:?}", err);
                self.set_status("SCAN FAILED", "TEXT UNCHANGED");
                false
            }
        }
    }

    pub fn set_status(&mut self, line1: &'static str, line2: &'static str) {
        self.status = Some(StatusNotice { line1, line2 });
        self.pending_redraw = true;
    }

    pub fn dismiss_status(&mut self) {
        if self.status.take().is_some() {
            self.pending_redraw = true;
        }
    }

    fn rescale(&mut self) {
        if !self.scale.auto {
            return;
        }

        let px = estimate_size(&self.document, self.viewport_width_px);
        if px != self.scale.manual_px {
            debug!(
                "reader: auto scale {}px (viewport={}px)",
                px, self.viewport_width_px
            );
            self.scale.manual_px = px;
            self.pending_redraw = true;
        }
    }
}
