//! Stage progression: sizing formulas, phases and the stage-clear tally
//!
//! The clear sequence is a script keyed to elapsed time since the last
//! sphere and projectile vanished. [`StageClear::step`] is called once per
//! tick and reports what the script did on that tick.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Diameter of the spheres a stage starts with
pub fn stage_diameter(stage: u32) -> f32 {
    (stage as f32 * 16.0 + 48.0).min(SPHERE_MAX_DIAMETER)
}

/// Number of spheres a stage starts with
pub fn stage_sphere_count(stage: u32) -> usize {
    stage.saturating_sub(6).max(1) as usize
}

/// Hit percentage rounded to one decimal, ties to even. Zero shots counts as 0%.
pub fn accuracy(hits: u32, shots_fired: u32) -> f64 {
    if shots_fired == 0 {
        return 0.0;
    }
    let ratio = hits as f64 / shots_fired as f64 * 100.0;
    (ratio * 10.0).round_ties_even() / 10.0
}

/// End-of-stage bonus for an accuracy ratio
pub fn bonus_for(ratio: f64) -> u64 {
    if ratio == 100.0 {
        PERFECT_BONUS
    } else {
        (ratio * 10.0).round_ties_even().max(0.0) as u64
    }
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Normal play
    Playing,
    /// Paddle destroyed; settles once `next_check` passes with no live projectiles
    Miss { next_check: f64 },
    /// Waiting for the player to dismiss
    GameOver,
    /// Scripted bonus tally between stages
    StageClear(StageClear),
}

impl GamePhase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            GamePhase::Playing => PhaseKind::Playing,
            GamePhase::Miss { .. } => PhaseKind::Miss,
            GamePhase::GameOver => PhaseKind::GameOver,
            GamePhase::StageClear(_) => PhaseKind::StageClear,
        }
    }
}

/// Phase tag reported to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseKind {
    Playing,
    Miss,
    GameOver,
    StageClear,
}

/// One line of the stage summary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SummaryLine {
    Title { stage: u32 },
    ResultHeader,
    Shots(u32),
    Hits(u32),
    Ratio(f64),
    Bonus(u64),
}

impl fmt::Display for SummaryLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Title { stage } => write!(f, "STAGE {stage} CLEAR"),
            Self::ResultHeader => write!(f, "<RESULT>"),
            Self::Shots(n) => write!(f, "{n} SHOTS"),
            Self::Hits(n) => write!(f, "{n} HITS"),
            Self::Ratio(r) => write!(f, "RATIO {r:.1}%"),
            Self::Bonus(b) => write!(f, "BONUS {b}"),
        }
    }
}

/// State of a running stage-clear script
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageClear {
    pub started_at: f64,
    pub stage: u32,
    pub shots_fired: u32,
    pub hits: u32,
    pub ratio: f64,
    /// Bonus not yet moved into the score
    pub bonus: u64,
    /// Summary lines revealed so far
    pub revealed: usize,
}

/// What one step of the clear script did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClearProgress {
    /// Lines revealed on this step, with their index
    pub revealed: Vec<(usize, SummaryLine)>,
    /// Points moved from the bonus into the score
    pub awarded: u64,
    /// The script has run its course; the next stage should start
    pub finished: bool,
}

impl StageClear {
    pub fn new(started_at: f64, stage: u32, shots_fired: u32, hits: u32) -> Self {
        let ratio = accuracy(hits, shots_fired);
        Self {
            started_at,
            stage,
            shots_fired,
            hits,
            ratio,
            bonus: bonus_for(ratio),
            revealed: 0,
        }
    }

    /// Summary line at `index`; the bonus line shows the undrained remainder
    pub fn line(&self, index: usize) -> SummaryLine {
        match index {
            0 => SummaryLine::Title { stage: self.stage },
            1 => SummaryLine::ResultHeader,
            2 => SummaryLine::Shots(self.shots_fired),
            3 => SummaryLine::Hits(self.hits),
            4 => SummaryLine::Ratio(self.ratio),
            _ => SummaryLine::Bonus(self.bonus),
        }
    }

    /// Advance the script to time `now`
    pub fn step(&mut self, now: f64) -> ClearProgress {
        let elapsed = now - self.started_at;
        let mut progress = ClearProgress::default();

        while self.revealed < SUMMARY_LINES && elapsed > (self.revealed + 1) as f64 {
            progress.revealed.push((self.revealed, self.line(self.revealed)));
            self.revealed += 1;
        }

        if elapsed > BONUS_DRAIN_START && elapsed < BONUS_FLUSH_AT && self.bonus > 0 {
            self.bonus -= 1;
            progress.awarded += 1;
        }

        if elapsed > BONUS_FLUSH_AT && self.bonus > 0 {
            progress.awarded += self.bonus;
            self.bonus = 0;
        }

        progress.finished = elapsed > STAGE_CLEAR_DURATION;
        progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_stage_sizing() {
        assert_eq!(stage_diameter(1), 64.0);
        assert_eq!(stage_diameter(2), 80.0);
        assert_eq!(stage_diameter(3), 96.0);
        assert_eq!(stage_diameter(20), 96.0);
        assert_eq!(stage_sphere_count(1), 1);
        assert_eq!(stage_sphere_count(7), 1);
        assert_eq!(stage_sphere_count(8), 2);
        assert_eq!(stage_sphere_count(12), 6);
    }

    #[test]
    fn test_bonus_from_partial_accuracy() {
        let ratio = accuracy(8, 10);
        assert_eq!(ratio, 80.0);
        assert_eq!(bonus_for(ratio), 800);
    }

    #[test]
    fn test_perfect_accuracy_bonus() {
        let ratio = accuracy(5, 5);
        assert_eq!(ratio, 100.0);
        assert_eq!(bonus_for(ratio), 2000);
    }

    #[test]
    fn test_accuracy_rounds_to_one_decimal() {
        assert_eq!(accuracy(2, 3), 66.7);
        assert_eq!(bonus_for(66.7), 667);
    }

    #[test]
    fn test_accuracy_rounds_half_to_even() {
        // 1/16 and 5/16 land exactly on a half at the second decimal
        assert_eq!(accuracy(1, 16), 6.2);
        assert_eq!(bonus_for(6.2), 62);
        assert_eq!(accuracy(5, 16), 31.2);
        assert_eq!(bonus_for(31.2), 312);
        assert_eq!(accuracy(3, 16), 18.8);
    }

    #[test]
    fn test_zero_shots_yields_no_bonus() {
        assert_eq!(accuracy(0, 0), 0.0);
        let clear = StageClear::new(0.0, 1, 0, 0);
        assert_eq!(clear.bonus, 0);
    }

    #[test]
    fn test_summary_line_text() {
        assert_eq!(SummaryLine::Title { stage: 3 }.to_string(), "STAGE 3 CLEAR");
        assert_eq!(SummaryLine::Shots(10).to_string(), "10 SHOTS");
        assert_eq!(SummaryLine::Ratio(80.0).to_string(), "RATIO 80.0%");
        assert_eq!(SummaryLine::Bonus(800).to_string(), "BONUS 800");
    }

    #[test]
    fn test_clear_script_reveals_lines_one_per_unit() {
        let mut clear = StageClear::new(10.0, 2, 10, 8);
        assert!(clear.step(10.5).revealed.is_empty());

        let p = clear.step(11.01);
        assert_eq!(p.revealed, vec![(0, SummaryLine::Title { stage: 2 })]);

        let p = clear.step(16.01);
        let indices: Vec<usize> = p.revealed.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![1, 2, 3, 4, 5]);
        assert_eq!(p.revealed[4].1, SummaryLine::Bonus(800));
        assert_eq!(p.awarded, 0);
        assert!(!p.finished);
    }

    #[test]
    fn test_clear_script_drains_then_flushes() {
        let mut clear = StageClear::new(0.0, 1, 10, 8);
        clear.step(6.5);

        let mut awarded = 0;
        let mut t = 7.0;
        while t + SIM_DT < BONUS_FLUSH_AT {
            t += SIM_DT;
            awarded += clear.step(t).awarded;
        }
        assert!(awarded > 0 && awarded < 800);
        assert_eq!(clear.bonus, 800 - awarded);

        awarded += clear.step(10.5).awarded;
        assert_eq!(awarded, 800);
        assert_eq!(clear.bonus, 0);

        assert!(!clear.step(10.9).finished);
        assert!(clear.step(11.1).finished);
    }

    proptest! {
        #[test]
        fn prop_stage_start_sizing(stage in 1u32..200) {
            let d = stage_diameter(stage);
            prop_assert!(d <= SPHERE_MAX_DIAMETER);
            prop_assert_eq!(d, (stage * 16 + 48).min(96) as f32);
            prop_assert_eq!(stage_sphere_count(stage), (stage as i64 - 6).max(1) as usize);
        }

        #[test]
        fn prop_clear_awards_whole_bonus(shots in 1u32..200, hits_frac in 0.0f64..=1.0) {
            let hits = (shots as f64 * hits_frac).floor() as u32;
            let mut clear = StageClear::new(0.0, 1, shots, hits);
            let expected = clear.bonus;
            let mut total = 0;
            let mut t = 0.0;
            while t < 12.0 {
                t += SIM_DT;
                total += clear.step(t).awarded;
            }
            prop_assert_eq!(total, expected);
        }
    }
}
