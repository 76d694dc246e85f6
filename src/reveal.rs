// 👁️ Reveal Controller
// Counts copy actions; the Nth one shows the detailed breakdown for a while

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Longest window a config may ask for
pub const MAX_DISPLAY_SECS: u64 = 3600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealSettings {
    /// Copy actions needed to reveal (5 = shown on the fifth)
    #[serde(default = "default_threshold")]
    pub threshold: u32,

    /// How long the breakdown stays visible
    #[serde(default = "default_display_secs")]
    pub display_secs: u64,
}

fn default_threshold() -> u32 {
    5
}

fn default_display_secs() -> u64 {
    8
}

impl Default for RevealSettings {
    fn default() -> Self {
        RevealSettings {
            threshold: default_threshold(),
            display_secs: default_display_secs(),
        }
    }
}

impl RevealSettings {
    pub fn display_duration(&self) -> Duration {
        Duration::from_secs(self.display_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.display_secs > MAX_DISPLAY_SECS {
            bail!(
                "display_secs must be at most {}, got {}",
                MAX_DISPLAY_SECS,
                self.display_secs
            );
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visibility {
    Hidden,
    Until(Instant),
    /// Window end is past what `Instant` can represent
    Indefinite,
}

/// RevealController - time is always passed in
#[derive(Debug, Clone)]
pub struct RevealController {
    settings: RevealSettings,
    count: u32,
    visibility: Visibility,
}

impl RevealController {
    pub fn new(settings: RevealSettings) -> Self {
        RevealController {
            settings,
            count: 0,
            visibility: Visibility::Hidden,
        }
    }

    /// Record one copy action; returns true when this one triggers a reveal
    pub fn register_copy(&mut self, now: Instant) -> bool {
        self.count += 1;

        if self.count >= self.settings.threshold.max(1) {
            self.count = 0;
            self.visibility = match now.checked_add(self.settings.display_duration()) {
                Some(until) => Visibility::Until(until),
                None => Visibility::Indefinite,
            };
            return true;
        }

        false
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        match self.visibility {
            Visibility::Hidden => false,
            Visibility::Until(until) => now < until,
            Visibility::Indefinite => true,
        }
    }

    /// Time left on screen, zero when hidden
    pub fn remaining(&self, now: Instant) -> Duration {
        match self.visibility {
            Visibility::Until(until) if now < until => until - now,
            Visibility::Indefinite => self.settings.display_duration(),
            _ => Duration::ZERO,
        }
    }

    /// Clear counter and hide; called when the input or selection changes
    pub fn reset(&mut self) {
        self.count = 0;
        self.visibility = Visibility::Hidden;
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn settings(&self) -> &RevealSettings {
        &self.settings
    }
}

impl Default for RevealController {
    fn default() -> Self {
        Self::new(RevealSettings::default())
    }
}
