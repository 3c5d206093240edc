//! Audio cues
//!
//! Which sounds play is decided from phase transitions and frame reports,
//! independent of any audio backend. The browser backend synthesizes every
//! sound with the Web Audio API - no external files needed!

use crate::game::FrameReport;
use crate::sim::GamePhase;

/// Something the audio backend should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Start the looping background music
    StartMusic,
    StopMusic,
    /// Sad descending jingle
    GameOverJingle,
    /// Cut the jingle short (restart pressed while it rings)
    StopJingle,
    /// Coin collected
    CoinChirp,
    /// Run ended with a new high score
    NewRecord,
}

/// Cues for entering `phase`
pub fn cues_for_phase(phase: GamePhase) -> &'static [Cue] {
    match phase {
        GamePhase::Playing => &[Cue::StopJingle, Cue::StartMusic],
        GamePhase::GameOver => &[Cue::StopMusic, Cue::GameOverJingle],
        GamePhase::Start => &[Cue::StopMusic, Cue::StopJingle],
    }
}

/// One-shot effects triggered by a frame
pub fn cues_for_frame(report: &FrameReport) -> Vec<Cue> {
    let mut cues = Vec::new();
    if report.outcome.coins_collected > 0 {
        cues.push(Cue::CoinChirp);
    }
    if report.new_record {
        cues.push(Cue::NewRecord);
    }
    cues
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use js_sys::Promise;
    use wasm_bindgen::JsValue;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::Cue;
    use crate::settings::Settings;

    /// Log a rejected AudioContext state change; playback failures are never fatal
    fn watch(result: Result<Promise, JsValue>, action: &'static str) {
        match result {
            Ok(promise) => wasm_bindgen_futures::spawn_local(async move {
                if let Err(e) = JsFuture::from(promise).await {
                    log::warn!("Audio {} rejected: {:?}", action, e);
                }
            }),
            Err(e) => log::warn!("Audio {} failed: {:?}", action, e),
        }
    }

    /// Background music voice frequencies (Hz)
    const MUSIC_VOICES: [f32; 3] = [110.0, 164.8, 220.0];

    /// Web Audio backend
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        music_gain: f32,
        sfx_gain: f32,
        music: Option<(Vec<OscillatorNode>, GainNode)>,
        jingle: Vec<OscillatorNode>,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                music_gain: settings.music_gain(),
                sfx_gain: settings.sfx_gain(),
                music: None,
                jingle: Vec::new(),
            }
        }

        /// Pick up changed volumes; running music follows immediately
        pub fn apply_settings(&mut self, settings: &Settings) {
            self.music_gain = settings.music_gain();
            self.sfx_gain = settings.sfx_gain();
            if let Some((_, gain)) = &self.music {
                gain.gain().set_value(self.music_gain * 0.12);
            }
        }

        /// Pause or resume all output (window focus changes)
        pub fn set_suspended(&self, suspended: bool) {
            let Some(ctx) = &self.ctx else { return };
            if suspended {
                watch(ctx.suspend(), "suspend");
            } else {
                watch(ctx.resume(), "resume");
            }
        }

        pub fn play(&mut self, cue: Cue) {
            let Some(ctx) = self.ctx.clone() else { return };

            // Browsers keep the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                watch(ctx.resume(), "resume");
            }

            match cue {
                Cue::StartMusic => self.start_music(&ctx),
                Cue::StopMusic => self.stop_music(),
                Cue::GameOverJingle => self.play_game_over(&ctx),
                Cue::StopJingle => {
                    for osc in self.jingle.drain(..) {
                        osc.stop().ok();
                    }
                }
                Cue::CoinChirp => self.play_coin(&ctx),
                Cue::NewRecord => self.play_new_record(&ctx),
            }
        }

        /// Create an oscillator routed through `gain`
        fn create_osc(
            ctx: &AudioContext,
            gain: &GainNode,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<OscillatorNode> {
            let osc = ctx.create_oscillator().ok()?;
            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(gain).ok()?;
            Some(osc)
        }

        fn create_gain(ctx: &AudioContext) -> Option<GainNode> {
            let gain = ctx.create_gain().ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;
            Some(gain)
        }

        /// Soft triangle chord, looped until stopped
        fn start_music(&mut self, ctx: &AudioContext) {
            if self.music.is_some() {
                return;
            }
            let Some(gain) = Self::create_gain(ctx) else {
                log::warn!("Failed to start music");
                return;
            };
            gain.gain().set_value(self.music_gain * 0.12);

            let voices: Vec<_> = MUSIC_VOICES
                .iter()
                .filter_map(|f| Self::create_osc(ctx, &gain, *f, OscillatorType::Triangle))
                .collect();
            for osc in &voices {
                if let Err(e) = osc.start() {
                    log::warn!("Music playback failed: {:?}", e);
                }
            }
            self.music = Some((voices, gain));
        }

        fn stop_music(&mut self) {
            if let Some((voices, _)) = self.music.take() {
                for osc in voices {
                    osc.stop().ok();
                }
            }
        }

        /// Short rising chirp
        fn play_coin(&self, ctx: &AudioContext) {
            if self.sfx_gain <= 0.0 {
                return;
            }
            let Some(gain) = Self::create_gain(ctx) else { return };
            let Some(osc) = Self::create_osc(ctx, &gain, 880.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(self.sfx_gain * 0.25, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                .ok();
            osc.frequency().set_value_at_time(880.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(1320.0, t + 0.08)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.15).ok();
        }

        /// Game over - sad descending
        fn play_game_over(&mut self, ctx: &AudioContext) {
            if self.sfx_gain <= 0.0 {
                return;
            }
            for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
                let delay = i as f64 * 0.2;
                let Some(gain) = Self::create_gain(ctx) else { continue };
                if let Some(osc) = Self::create_osc(ctx, &gain, *freq, OscillatorType::Sine) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(self.sfx_gain * 0.3, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.4).ok();
                    self.jingle.push(osc);
                }
            }
        }

        /// High score - celebratory
        fn play_new_record(&self, ctx: &AudioContext) {
            if self.sfx_gain <= 0.0 {
                return;
            }
            for (i, freq) in [500.0, 600.0, 700.0, 800.0, 1000.0].iter().enumerate() {
                let delay = 0.9 + i as f64 * 0.08;
                let Some(gain) = Self::create_gain(ctx) else { continue };
                if let Some(osc) = Self::create_osc(ctx, &gain, *freq, OscillatorType::Triangle) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(self.sfx_gain * 0.25, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.3).ok();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::LoopControl;
    use crate::sim::TickOutcome;

    #[test]
    fn test_phase_cues() {
        assert_eq!(
            cues_for_phase(GamePhase::Playing),
            &[Cue::StopJingle, Cue::StartMusic]
        );
        assert_eq!(
            cues_for_phase(GamePhase::GameOver),
            &[Cue::StopMusic, Cue::GameOverJingle]
        );
        assert!(!cues_for_phase(GamePhase::Start).contains(&Cue::StartMusic));
    }

    #[test]
    fn test_frame_cues() {
        let quiet = FrameReport {
            control: LoopControl::Continue,
            outcome: TickOutcome::default(),
            new_record: false,
        };
        assert!(cues_for_frame(&quiet).is_empty());

        let record = FrameReport {
            control: LoopControl::Stop,
            outcome: TickOutcome {
                coins_collected: 2,
                ..TickOutcome::default()
            },
            new_record: true,
        };
        assert_eq!(cues_for_frame(&record), vec![Cue::CoinChirp, Cue::NewRecord]);
    }
}
