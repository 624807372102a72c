use std::time::Duration;

use crate::piece::Color;

/// The time control a game is played under.
///
/// The board supports untimed play and a simple per-side countdown. The host owns the cadence:
/// it calls [`ChessClock::tick`] once a second for the side to move and forwards any flag fall to
/// the session; the engine itself never reads the clock.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TimeControl {
    /// No clock; displays render as "--:--".
    Untimed,
    /// Each side must finish the game within `base`.
    SuddenDeath { base: Duration },
}

impl TimeControl {
    /// Builds a time control from a base-seconds selection, where 0 means no clock.
    pub fn from_base_seconds(seconds: u64) -> Self {
        if seconds == 0 {
            TimeControl::Untimed
        } else {
            TimeControl::SuddenDeath { base: Duration::from_secs(seconds) }
        }
    }
}

/// A per-side countdown clock.
///
/// The clock holds whole-second remaining times for both sides and a running flag. It has no
/// timer of its own: the host loop ticks it. When a side's time reaches zero the clock stops and
/// reports the flagged side once; the host maps that to the matching on-time game status.
#[derive(Clone, Debug)]
pub struct ChessClock {
    remaining: [Duration; Color::COUNT],
    control: TimeControl,
    running: bool,
}

impl ChessClock {
    /// Creates a clock for the given time control. An untimed clock never runs.
    pub fn new(control: TimeControl) -> Self {
        let base = match control {
            TimeControl::Untimed => Duration::ZERO,
            TimeControl::SuddenDeath { base } => base,
        };
        Self {
            remaining: [base; Color::COUNT],
            control,
            running: control != TimeControl::Untimed,
        }
    }

    /// Rewinds both sides to the base time of a new control.
    pub fn reset(&mut self, control: TimeControl) {
        *self = ChessClock::new(control);
    }

    /// True while the countdown is live.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Pauses the countdown; ticks are ignored until resumed.
    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Resumes the countdown. An untimed or flagged clock stays stopped.
    pub fn resume(&mut self) {
        if self.control != TimeControl::Untimed && !self.flagged() {
            self.running = true;
        }
    }

    /// Removes one second from `side`'s remaining time.
    ///
    /// The host calls this once per second of wall time for the side to move. Returns the side
    /// whose flag fell on this tick, if any; the clock stops at that point.
    pub fn tick(&mut self, side: Color) -> Option<Color> {
        if !self.running {
            return None;
        }

        let remaining = &mut self.remaining[usize::from(side)];
        *remaining = remaining.saturating_sub(Duration::from_secs(1));
        if remaining.is_zero() {
            self.running = false;
            log::info!("{} flag fell", side);
            return Some(side);
        }
        None
    }

    /// The remaining time of one side.
    pub fn remaining(&self, side: Color) -> Duration {
        self.remaining[usize::from(side)]
    }

    /// True once either side has run out of time.
    pub fn flagged(&self) -> bool {
        self.control != TimeControl::Untimed
            && self.remaining.iter().any(|remaining| remaining.is_zero())
    }

    /// Formats one side's remaining time as "mm:ss", or "--:--" for an untimed game.
    pub fn display(&self, side: Color) -> String {
        if self.control == TimeControl::Untimed {
            return String::from("--:--");
        }
        let seconds = self.remaining(side).as_secs();
        format!("{:02}:{:02}", seconds / 60, seconds % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untimed_clock_never_runs() {
        let mut clock = ChessClock::new(TimeControl::from_base_seconds(0));
        assert!(!clock.is_running());
        assert_eq!(clock.tick(Color::White), None);
        assert_eq!(clock.display(Color::White), "--:--");

        clock.resume();
        assert!(!clock.is_running());
    }

    #[test]
    fn test_ticks_count_down_the_given_side() {
        let mut clock = ChessClock::new(TimeControl::from_base_seconds(300));
        assert!(clock.is_running());

        assert_eq!(clock.tick(Color::White), None);
        assert_eq!(clock.remaining(Color::White), Duration::from_secs(299));
        assert_eq!(clock.remaining(Color::Black), Duration::from_secs(300));
    }

    #[test]
    fn test_flag_fall_stops_the_clock() {
        let mut clock = ChessClock::new(TimeControl::from_base_seconds(2));
        assert_eq!(clock.tick(Color::Black), None);
        assert_eq!(clock.tick(Color::Black), Some(Color::Black));

        assert!(!clock.is_running());
        assert!(clock.flagged());
        assert_eq!(clock.remaining(Color::Black), Duration::ZERO);

        // A flagged clock cannot be resumed or ticked further.
        clock.resume();
        assert!(!clock.is_running());
        assert_eq!(clock.tick(Color::White), None);
        assert_eq!(clock.remaining(Color::White), Duration::from_secs(2));
    }

    #[test]
    fn test_pause_and_resume() {
        let mut clock = ChessClock::new(TimeControl::from_base_seconds(60));
        clock.pause();
        assert_eq!(clock.tick(Color::White), None);
        assert_eq!(clock.remaining(Color::White), Duration::from_secs(60));

        clock.resume();
        assert_eq!(clock.tick(Color::White), None);
        assert_eq!(clock.remaining(Color::White), Duration::from_secs(59));
    }

    #[test]
    fn test_display_formatting() {
        let mut clock = ChessClock::new(TimeControl::from_base_seconds(300));
        assert_eq!(clock.display(Color::White), "05:00");
        clock.tick(Color::White);
        assert_eq!(clock.display(Color::White), "04:59");

        let clock = ChessClock::new(TimeControl::from_base_seconds(3600));
        assert_eq!(clock.display(Color::Black), "60:00");
    }

    #[test]
    fn test_reset_restores_the_base_time() {
        let mut clock = ChessClock::new(TimeControl::from_base_seconds(60));
        clock.tick(Color::White);
        clock.reset(TimeControl::from_base_seconds(120));

        assert_eq!(clock.remaining(Color::White), Duration::from_secs(120));
        assert!(clock.is_running());
    }
}
