//! Synthesized sound effects
//!
//! Four short chiptune blips, one per cue channel, rendered to 16-bit mono
//! WAV in memory at startup and handed to macroquad's mixer. No asset files.

use macroquad::audio::{load_sound_from_bytes, play_sound, set_sound_volume, PlaySoundParams, Sound};
use platformer2d::game::audio::{AudioTrigger, SoundBank};
use tracing::warn;

pub const SAMPLE_RATE: u32 = 22050;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wave {
    Square,
    Triangle,
    Noise,
}

/// A pitch sweep with a linear decay envelope.
#[derive(Debug, Clone, Copy)]
pub struct Tone {
    pub wave: Wave,
    pub start_hz: f32,
    pub end_hz: f32,
    pub seconds: f32,
    pub gain: f32,
}

impl Tone {
    pub fn render(&self) -> Vec<i16> {
        let count = (self.seconds * SAMPLE_RATE as f32) as usize;
        let mut samples = Vec::with_capacity(count);
        let mut phase = 0.0f32;
        let mut noise = 0x2545_f491u32;

        for i in 0..count {
            let t = i as f32 / count.max(1) as f32;
            let hz = self.start_hz + (self.end_hz - self.start_hz) * t;
            phase = (phase + hz / SAMPLE_RATE as f32).fract();

            let value = match self.wave {
                Wave::Square => if phase < 0.5 { 1.0 } else { -1.0 },
                Wave::Triangle => 4.0 * (phase - 0.5).abs() - 1.0,
                Wave::Noise => {
                    // xorshift32
                    noise ^= noise << 13;
                    noise ^= noise >> 17;
                    noise ^= noise << 5;
                    (noise as f32 / u32::MAX as f32) * 2.0 - 1.0
                }
            };
            let envelope = 1.0 - t;
            samples.push((value * envelope * self.gain * i16::MAX as f32) as i16);
        }
        samples
    }
}

/// Wrap PCM samples in a minimal RIFF/WAVE container.
pub fn wav_bytes(samples: &[i16], sample_rate: u32) -> Vec<u8> {
    let data_len = (samples.len() * 2) as u32;
    let mut out = Vec::with_capacity(44 + data_len as usize);

    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");

    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&1u16.to_le_bytes()); // mono
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&(sample_rate * 2).to_le_bytes()); // byte rate
    out.extend_from_slice(&2u16.to_le_bytes()); // block align
    out.extend_from_slice(&16u16.to_le_bytes()); // bits per sample

    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    for s in samples {
        out.extend_from_slice(&s.to_le_bytes());
    }
    out
}

/// One mixer channel. Silently does nothing if the sound failed to load.
pub struct Blip {
    sound: Option<Sound>,
    volume: f32,
}

impl Blip {
    pub async fn load(name: &str, tone: Tone) -> Self {
        let bytes = wav_bytes(&tone.render(), SAMPLE_RATE);
        let sound = match load_sound_from_bytes(&bytes).await {
            Ok(sound) => Some(sound),
            Err(e) => {
                warn!(channel = name, error = ?e, "failed to load sound");
                None
            }
        };
        Self { sound, volume: 1.0 }
    }
}

impl AudioTrigger for Blip {
    fn play(&mut self) {
        if let Some(sound) = &self.sound {
            play_sound(sound, PlaySoundParams { looped: false, volume: self.volume });
        }
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(sound) = &self.sound {
            set_sound_volume(sound, volume);
        }
    }
}

pub async fn load_bank() -> SoundBank<Blip> {
    SoundBank::new(
        Blip::load("jump", Tone { wave: Wave::Square, start_hz: 330.0, end_hz: 880.0, seconds: 0.35, gain: 0.25 }).await,
        Blip::load("land", Tone { wave: Wave::Noise, start_hz: 0.0, end_hz: 0.0, seconds: 0.08, gain: 0.3 }).await,
        Blip::load("wall_bump", Tone { wave: Wave::Triangle, start_hz: 140.0, end_hz: 90.0, seconds: 0.1, gain: 0.5 }).await,
        Blip::load("ceiling_bump", Tone { wave: Wave::Square, start_hz: 220.0, end_hz: 110.0, seconds: 0.12, gain: 0.3 }).await,
    )
}
