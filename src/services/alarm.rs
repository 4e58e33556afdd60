//! Alarm signal generator
//!
//! The generator owns the output a tone is played on. The output is created
//! at most once, on the first user-originated action, and then shared by
//! every alarming timer.

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, OnceLock,
    },
};
use tracing::{debug, info};

use super::tone::Tone;
use crate::state::TimerId;

/// Somewhere a tone can be played
pub trait ToneOutput: Send + Sync {
    fn play(&self, tone: &Tone);

    fn name(&self) -> &'static str;
}

/// Rings the terminal bell; the host output when built without `host-audio`
#[cfg(not(feature = "host-audio"))]
#[derive(Debug, Default)]
pub struct TerminalBell;

#[cfg(not(feature = "host-audio"))]
impl ToneOutput for TerminalBell {
    fn play(&self, _tone: &Tone) {
        use std::io::Write;

        let mut stderr = std::io::stderr();
        if let Err(e) = stderr.write_all(b"\x07").and_then(|_| stderr.flush()) {
            debug!("Terminal bell unavailable: {}", e);
        }
    }

    fn name(&self) -> &'static str {
        "terminal-bell"
    }
}

/// Plays nothing; alarms stay visual only
#[derive(Debug, Default)]
pub struct SilentOutput;

impl ToneOutput for SilentOutput {
    fn play(&self, _tone: &Tone) {}

    fn name(&self) -> &'static str {
        "silent"
    }
}

type OutputFactory = Box<dyn Fn() -> Option<Arc<dyn ToneOutput>> + Send + Sync>;

/// Emits alarm pulses on a lazily created output
pub struct AlarmGenerator {
    tone: Tone,
    factory: OutputFactory,
    output: OnceLock<Option<Arc<dyn ToneOutput>>>,
    pulses: AtomicU64,
}

impl AlarmGenerator {
    /// Generator that plays on the host's audio device, or stays silent
    /// when `mute`
    pub fn new(mute: bool) -> Self {
        Self::with_factory(move || {
            if mute {
                Some(Arc::new(SilentOutput) as Arc<dyn ToneOutput>)
            } else {
                host_output()
            }
        })
    }

    /// Generator that plays on `output` once primed
    pub fn with_output(output: Arc<dyn ToneOutput>) -> Self {
        Self::with_factory(move || Some(Arc::clone(&output)))
    }

    /// Generator whose output is built by `factory` on first use; `None`
    /// means no audio is available
    pub fn with_factory<F>(factory: F) -> Self
    where
        F: Fn() -> Option<Arc<dyn ToneOutput>> + Send + Sync + 'static,
    {
        Self {
            tone: Tone::default(),
            factory: Box::new(factory),
            output: OnceLock::new(),
            pulses: AtomicU64::new(0),
        }
    }

    pub fn tone(&self) -> &Tone {
        &self.tone
    }

    /// Create the output if it does not exist yet.
    ///
    /// Call only from user-originated actions.
    pub fn prime(&self) {
        self.output.get_or_init(|| {
            let output = (self.factory)();
            match &output {
                Some(o) => info!("Alarm output ready: {}", o.name()),
                None => info!("No alarm output available, alarms will be visual only"),
            }
            output
        });
    }

    pub fn is_primed(&self) -> bool {
        self.output.get().is_some()
    }

    /// Play one tone for `id`, if an output exists
    pub fn pulse(&self, id: TimerId) {
        self.pulses.fetch_add(1, Ordering::Relaxed);
        match self.output.get() {
            Some(Some(output)) => {
                debug!("Alarm pulse for timer {} on {}", id, output.name());
                output.play(&self.tone);
            }
            _ => debug!("Alarm pulse for timer {} without output", id),
        }
    }

    /// Pulses requested since creation, across all timers
    pub fn pulses_emitted(&self) -> u64 {
        self.pulses.load(Ordering::Relaxed)
    }
}

#[cfg(feature = "host-audio")]
fn host_output() -> Option<Arc<dyn ToneOutput>> {
    super::host_audio::RodioOutput::open().map(|output| Arc::new(output) as Arc<dyn ToneOutput>)
}

#[cfg(not(feature = "host-audio"))]
fn host_output() -> Option<Arc<dyn ToneOutput>> {
    Some(Arc::new(TerminalBell))
}

impl std::fmt::Debug for AlarmGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlarmGenerator")
            .field("tone", &self.tone)
            .field("primed", &self.is_primed())
            .field("pulses", &self.pulses_emitted())
            .finish()
    }
}
