//! Alarm tone playback on the host's default audio device

use std::{
    sync::{mpsc, Mutex},
    thread,
};
use rodio::{buffer::SamplesBuffer, OutputStream, Sink};
use tracing::{debug, info, warn};

use super::{
    alarm::ToneOutput,
    tone::{Tone, SAMPLE_RATE},
};

/// Plays tones through rodio.
///
/// The output stream is not `Send`, so it lives on its own thread and tones
/// are handed over as rendered samples.
pub struct RodioOutput {
    tones: Mutex<mpsc::Sender<Vec<f32>>>,
}

impl RodioOutput {
    /// Open the default output device; `None` when there is none
    pub fn open() -> Option<Self> {
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(), String>>();
        let (tone_tx, tone_rx) = mpsc::channel::<Vec<f32>>();

        let spawned = thread::Builder::new()
            .name("alarm-audio".to_string())
            .spawn(move || {
                let (_stream, handle) = match OutputStream::try_default() {
                    Ok(pair) => {
                        let _ = ready_tx.send(Ok(()));
                        pair
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e.to_string()));
                        return;
                    }
                };

                // Ends once the output is dropped
                while let Ok(samples) = tone_rx.recv() {
                    match Sink::try_new(&handle) {
                        Ok(sink) => {
                            sink.append(SamplesBuffer::new(1, SAMPLE_RATE, samples));
                            sink.detach();
                        }
                        Err(e) => warn!("Failed to play alarm tone: {}", e),
                    }
                }
                debug!("Alarm audio thread finished");
            });

        if let Err(e) = spawned {
            warn!("Failed to start alarm audio thread: {}", e);
            return None;
        }

        match ready_rx.recv() {
            Ok(Ok(())) => Some(Self {
                tones: Mutex::new(tone_tx),
            }),
            Ok(Err(e)) => {
                info!("No audio output device: {}", e);
                None
            }
            Err(_) => None,
        }
    }
}

impl ToneOutput for RodioOutput {
    fn play(&self, tone: &Tone) {
        let samples = tone.samples(SAMPLE_RATE);
        let sent = self
            .tones
            .lock()
            .map_err(|e| e.to_string())
            .and_then(|tones| tones.send(samples).map_err(|e| e.to_string()));
        if let Err(e) = sent {
            debug!("Alarm tone dropped: {}", e);
        }
    }

    fn name(&self) -> &'static str {
        "rodio"
    }
}
