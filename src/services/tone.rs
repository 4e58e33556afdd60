//! Alarm tone synthesis

use std::{f32::consts::PI, time::Duration};

/// Gain floor of the exponential ramps; an exponential ramp cannot reach zero
const SILENCE_GAIN: f32 = 0.0001;

/// Default sample rate for rendered tones
pub const SAMPLE_RATE: u32 = 22_050;

/// A short amplitude-enveloped sine beep
#[derive(Debug, Clone, PartialEq)]
pub struct Tone {
    pub frequency_hz: f32,
    pub peak_gain: f32,
    /// Ramp up from silence to `peak_gain`
    pub attack: Duration,
    /// Point at which the ramp down reaches silence again
    pub decay_end: Duration,
    /// Total length of the rendered tone
    pub length: Duration,
}

impl Default for Tone {
    fn default() -> Self {
        Self {
            frequency_hz: 880.0,
            peak_gain: 0.2,
            attack: Duration::from_millis(20),
            decay_end: Duration::from_millis(600),
            length: Duration::from_millis(650),
        }
    }
}

impl Tone {
    /// Envelope gain at `t` seconds into the tone
    pub fn gain_at(&self, t: f32) -> f32 {
        let attack = self.attack.as_secs_f32();
        let decay_end = self.decay_end.as_secs_f32();

        if t <= 0.0 {
            SILENCE_GAIN
        } else if t < attack {
            exp_ramp(SILENCE_GAIN, self.peak_gain, t / attack)
        } else if t < decay_end {
            exp_ramp(self.peak_gain, SILENCE_GAIN, (t - attack) / (decay_end - attack))
        } else {
            SILENCE_GAIN
        }
    }

    /// Render mono samples in `[-1, 1]`
    pub fn samples(&self, sample_rate: u32) -> Vec<f32> {
        let count = (self.length.as_secs_f32() * sample_rate as f32).round() as usize;
        (0..count)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                (2.0 * PI * self.frequency_hz * t).sin() * self.gain_at(t)
            })
            .collect()
    }

    /// Render as a 16-bit PCM mono WAV file
    pub fn to_wav(&self, sample_rate: u32) -> Vec<u8> {
        let samples = self.samples(sample_rate);
        let data_len = (samples.len() * 2) as u32;
        let byte_rate = sample_rate * 2;

        let mut wav = Vec::with_capacity(44 + data_len as usize);
        wav.extend_from_slice(b"RIFF");
        wav.extend_from_slice(&(36 + data_len).to_le_bytes());
        wav.extend_from_slice(b"WAVE");
        wav.extend_from_slice(b"fmt ");
        wav.extend_from_slice(&16u32.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
        wav.extend_from_slice(&1u16.to_le_bytes()); // mono
        wav.extend_from_slice(&sample_rate.to_le_bytes());
        wav.extend_from_slice(&byte_rate.to_le_bytes());
        wav.extend_from_slice(&2u16.to_le_bytes()); // block align
        wav.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
        wav.extend_from_slice(b"data");
        wav.extend_from_slice(&data_len.to_le_bytes());
        for sample in samples {
            let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            wav.extend_from_slice(&value.to_le_bytes());
        }
        wav
    }
}

fn exp_ramp(from: f32, to: f32, progress: f32) -> f32 {
    from * (to / from).powf(progress.clamp(0.0, 1.0))
}
