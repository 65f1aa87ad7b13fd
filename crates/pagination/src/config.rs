//! Pagination and reaper settings.

use crate::router::Command;
use serde::Deserialize;
use session_store::InitiatorMatch;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct PaginationConfig {
    /// Minimum time between two page turns on one session
    #[serde(default = "default_page_turn_interval", with = "humantime_serde")]
    pub page_turn_interval: Duration,

    /// Upper bound for a single candidate validation
    #[serde(default = "default_validate_timeout", with = "humantime_serde")]
    pub validate_timeout: Duration,

    /// Who besides the initiator may page or close
    #[serde(default)]
    pub initiator_match: InitiatorMatch,

    /// Reaction glyphs attached to each page
    #[serde(default)]
    pub glyphs: Glyphs,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Glyphs {
    #[serde(default = "default_back")]
    pub back: String,
    #[serde(default = "default_forward")]
    pub forward: String,
    #[serde(default = "default_stop")]
    pub stop: String,
}

impl Glyphs {
    /// Glyphs in the order they are attached to a page.
    pub fn all(&self) -> [&str; 3] {
        [self.back.as_str(), self.forward.as_str(), self.stop.as_str()]
    }

    pub fn command_for(&self, emoji: &str) -> Option<Command> {
        if emoji == self.back {
            Some(Command::Back)
        } else if emoji == self.forward {
            Some(Command::Forward)
        } else if emoji == self.stop {
            Some(Command::Stop)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReaperConfig {
    /// How often idle sessions are swept
    #[serde(default = "default_sweep_interval", with = "humantime_serde")]
    pub interval: Duration,

    /// Inactivity after which a session is evicted
    #[serde(default = "default_idle_timeout", with = "humantime_serde")]
    pub idle_timeout: Duration,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_turn_interval: default_page_turn_interval(),
            validate_timeout: default_validate_timeout(),
            initiator_match: InitiatorMatch::default(),
            glyphs: Glyphs::default(),
        }
    }
}

impl Default for Glyphs {
    fn default() -> Self {
        Self {
            back: default_back(),
            forward: default_forward(),
            stop: default_stop(),
        }
    }
}

impl Default for ReaperConfig {
    fn default() -> Self {
        Self {
            interval: default_sweep_interval(),
            idle_timeout: default_idle_timeout(),
        }
    }
}

fn default_page_turn_interval() -> Duration {
    Duration::from_millis(1500)
}

fn default_validate_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_back() -> String {
    "⬅️".into()
}

fn default_forward() -> String {
    "➡️".into()
}

fn default_stop() -> String {
    "⏹️".into()
}

fn default_sweep_interval() -> Duration {
    Duration::from_secs(20)
}

fn default_idle_timeout() -> Duration {
    Duration::from_secs(120)
}
