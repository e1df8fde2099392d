//! End-of-wave summaries
//!
//! One entry per cleared wave; the log answers "best wave so far".

use serde::{Deserialize, Serialize};

use crate::sim::manager::Economy;

/// Stats for one cleared wave
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveSummary {
    pub wave: u32,
    pub kills: u32,
    pub escapes: u32,
    pub speed_kills: u32,
    pub perfect_kills: u32,
    pub close_calls: u32,
    pub score: u32,
    /// Hit percentage (0-100)
    pub accuracy: f32,
    /// Mean seconds from first hit to kill
    pub average_kill_time: f32,
    pub currency_earned: u32,
}

impl WaveSummary {
    pub fn from_economy(wave: u32, economy: &Economy) -> Self {
        Self {
            wave,
            kills: economy.kills,
            escapes: economy.escapes,
            speed_kills: economy.speed_kills,
            perfect_kills: economy.perfect_kills,
            close_calls: economy.close_calls,
            score: economy.score,
            accuracy: economy.accuracy(),
            average_kill_time: economy.average_kill_time(),
            currency_earned: economy.currency_earned,
        }
    }

    /// Nobody got through
    pub fn is_perfect(&self) -> bool {
        self.escapes == 0
    }
}

/// Summaries for the current run, oldest first
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WaveLog {
    pub entries: Vec<WaveSummary>,
}

impl WaveLog {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, summary: WaveSummary) {
        log::info!(
            "wave {} cleared: {} kills, {} escapes, {} points, {:.0}% accuracy",
            summary.wave,
            summary.kills,
            summary.escapes,
            summary.score,
            summary.accuracy
        );
        self.entries.push(summary);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&WaveSummary> {
        self.entries.last()
    }

    /// Highest-scoring wave; earlier wave wins a tie
    pub fn best(&self) -> Option<&WaveSummary> {
        self.entries
            .iter()
            .reduce(|best, s| if s.score > best.score { s } else { best })
    }

    pub fn total_score(&self) -> u64 {
        self.entries.iter().map(|s| s.score as u64).sum()
    }

    pub fn perfect_waves(&self) -> usize {
        self.entries.iter().filter(|s| s.is_perfect()).count()
    }
}
