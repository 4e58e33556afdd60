//! Configuration and CLI argument handling

use std::time::Duration;

use clap::Parser;

use crate::state::BoardSettings;

/// Longest tick interval that still keeps the display fluid
const MAX_TICK_MS: u64 = 250;
const MIN_TICK_MS: u64 = 10;

/// CLI argument parsing structure
#[derive(Parser, Debug, Clone)]
#[command(name = "multi-timer")]
#[command(about = "A browser-served multi-timer with repeating alarms")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// How often running timers update, in milliseconds (10-250)
    #[arg(long, default_value = "200")]
    pub tick_ms: u64,

    /// Pause between alarm tones, in milliseconds
    #[arg(long, default_value = "1200")]
    pub alarm_interval_ms: u64,

    /// Default duration of timers added from the page, in minutes
    #[arg(long, default_value = "2")]
    pub new_timer_minutes: u64,

    /// Durations of the timers present at startup, in minutes
    #[arg(long = "startup-minutes", default_values_t = [1, 2])]
    pub startup_minutes: Vec<u64>,

    /// Keep the host silent when a timer expires; the page still plays the tone
    #[arg(long)]
    pub mute: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Board scheduling parameters, with the tick interval kept in range
    pub fn board_settings(&self) -> BoardSettings {
        BoardSettings {
            tick_interval: Duration::from_millis(self.tick_ms.clamp(MIN_TICK_MS, MAX_TICK_MS)),
            alarm_interval: Duration::from_millis(self.alarm_interval_ms.max(1)),
            new_timer_duration_ms: minutes_to_ms(self.new_timer_minutes),
        }
    }

    /// Default durations of the startup timers, in milliseconds
    pub fn startup_durations_ms(&self) -> Vec<u64> {
        self.startup_minutes.iter().copied().map(minutes_to_ms).collect()
    }
}

fn minutes_to_ms(minutes: u64) -> u64 {
    minutes.saturating_mul(60_000)
}
