//! Sound cues
//!
//! The session only knows the `AudioCues` capability. On the web it is
//! backed by procedurally generated Web Audio tones; everywhere else the
//! cues are dropped.

/// Sound cue kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// First press of a movement key
    Blip,
    /// Player hit an obstacle
    Boom,
    /// Start or restart
    Start,
}

/// Fire-and-forget audio capability
pub trait AudioCues {
    fn play_cue(&mut self, cue: Cue);
    /// Turn the looping chiptune on or off
    fn set_loop_enabled(&mut self, enabled: bool);
}

/// Drops every cue
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAudio;

impl AudioCues for SilentAudio {
    fn play_cue(&mut self, _cue: Cue) {}

    fn set_loop_enabled(&mut self, _enabled: bool) {}
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::Cell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::Closure;
    use web_sys::{AudioContext, AudioNode, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioCues, Cue};

    /// Chiptune notes (Hz), cycled while music is on
    const LOOP_NOTES: [f32; 6] = [440.0, 523.0, 659.0, 784.0, 659.0, 523.0];
    const LOOP_NOTE_INTERVAL_MS: i32 = 400;
    const MUSIC_LEVEL: f32 = 0.1;
    /// Master gain applied to every cue
    const MASTER_VOLUME: f32 = 0.8;

    struct MusicLoop {
        interval_id: i32,
        _tick: Closure<dyn FnMut()>,
    }

    /// Web Audio backed cues
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        music_gain: Option<GainNode>,
        music: Option<MusicLoop>,
    }

    impl WebAudio {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }

            let music_gain = ctx.as_ref().and_then(|ctx| {
                let gain = ctx.create_gain().ok()?;
                gain.connect_with_audio_node(&ctx.destination()).ok()?;
                gain.gain().set_value(0.0);
                Some(gain)
            });

            Self {
                ctx,
                music_gain,
                music: None,
            }
        }

        /// Resume audio context (required after user gesture)
        fn resume(ctx: &AudioContext) {
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
        }

        /// One enveloped oscillator note routed into `dest`
        fn note(
            ctx: &AudioContext,
            dest: &AudioNode,
            freq: f32,
            osc_type: OscillatorType,
            level: f32,
            duration: f64,
        ) -> Option<()> {
            let osc: OscillatorNode = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;
            osc.set_type(osc_type);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(dest).ok()?;

            let t = ctx.current_time();
            osc.frequency().set_value_at_time(freq, t).ok()?;
            gain.gain().set_value_at_time(level, t).ok()?;
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + duration)
                .ok()?;

            osc.start().ok()?;
            osc.stop_with_when(t + duration).ok()?;
            Some(())
        }

        fn stop_music(&mut self) {
            if let Some(music) = self.music.take() {
                if let Some(window) = web_sys::window() {
                    window.clear_interval_with_handle(music.interval_id);
                }
            }
            if let Some(gain) = &self.music_gain {
                gain.gain().set_value(0.0);
            }
        }

        fn start_music(&mut self) {
            if self.music.is_some() {
                return;
            }
            let (Some(ctx), Some(gain), Some(window)) =
                (self.ctx.clone(), self.music_gain.clone(), web_sys::window())
            else {
                return;
            };
            Self::resume(&ctx);
            gain.gain().set_value(MUSIC_LEVEL * MASTER_VOLUME);

            let index = Rc::new(Cell::new(0usize));
            let play_next = move || {
                let i = index.get();
                Self::note(&ctx, &gain, LOOP_NOTES[i], OscillatorType::Square, 0.05, 0.3);
                index.set((i + 1) % LOOP_NOTES.len());
            };
            play_next();

            let tick = Closure::<dyn FnMut()>::new(play_next);
            match window.set_interval_with_callback_and_timeout_and_arguments_0(
                tick.as_ref().unchecked_ref(),
                LOOP_NOTE_INTERVAL_MS,
            ) {
                Ok(interval_id) => {
                    self.music = Some(MusicLoop {
                        interval_id,
                        _tick: tick,
                    })
                }
                Err(e) => log::warn!("Failed to schedule music loop: {:?}", e),
            }
        }
    }

    impl Default for WebAudio {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioCues for WebAudio {
        fn play_cue(&mut self, cue: Cue) {
            let Some(ctx) = &self.ctx else { return };
            Self::resume(ctx);

            let dest: AudioNode = ctx.destination().into();
            let vol = MASTER_VOLUME;
            match cue {
                Cue::Blip => Self::note(ctx, &dest, 440.0, OscillatorType::Sine, 0.1 * vol, 0.1),
                Cue::Boom => {
                    Self::note(ctx, &dest, 220.0, OscillatorType::Sawtooth, 0.2 * vol, 0.5)
                }
                Cue::Start => Self::note(ctx, &dest, 880.0, OscillatorType::Sine, 0.1 * vol, 0.2),
            };
        }

        fn set_loop_enabled(&mut self, enabled: bool) {
            if enabled {
                self.start_music();
            } else {
                self.stop_music();
            }
        }
    }

    impl Drop for WebAudio {
        fn drop(&mut self) {
            self.stop_music();
        }
    }
}
