//! Fixed-length trim region
//!
//! The preview window is a `[start, start + window)` slice that the creator
//! drags along the track. The model is a pure reducer: every transition takes
//! the current region and returns a new, clamped one. `window_length` and
//! `total_duration` never change within a session.
//!
//! ```text
//! 0                 start          end                      total
//! |-------------------[=== window ===]-------------------------|
//!                     <- drag moves the whole window ->
//! ```

use serde::{Deserialize, Serialize};

/// Committed preview window, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrimBounds {
    pub start: f64,
    pub end: f64,
}

impl TrimBounds {
    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    /// Whether a track position falls inside `[start, end)`
    pub fn contains(&self, position: f64) -> bool {
        position >= self.start && position < self.end
    }
}

/// Events accepted by [`TrimRegion::apply`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrimEvent {
    /// Move the window so it starts at this time (seconds)
    SetStart(f64),
    /// Move the window by a relative amount (seconds)
    Nudge(f64),
}

/// Current trim selection over a track of known duration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrimRegion {
    start: f64,
    window_length: f64,
    total_duration: f64,
}

impl TrimRegion {
    /// Create a region from a caller-supplied initial guess
    ///
    /// `desired_start` is clamped into `[0, max(0, total - window)]`.
    /// Non-finite or negative durations are treated as an empty track.
    pub fn init(total_duration: f64, desired_start: f64, window_length: f64) -> Self {
        let region = Self {
            start: 0.0,
            window_length: sanitize_length(window_length),
            total_duration: sanitize_length(total_duration),
        };
        region.set_start(desired_start)
    }

    /// Region for a track whose duration is not known yet
    ///
    /// Commits from this state yield `(0, 0)`.
    pub fn unresolved(window_length: f64) -> Self {
        Self::init(0.0, 0.0, window_length)
    }

    /// Move the window, re-clamping with the session bound
    pub fn set_start(self, candidate: f64) -> Self {
        let candidate = if candidate.is_nan() { 0.0 } else { candidate };
        Self {
            start: candidate.clamp(0.0, self.max_start()),
            ..self
        }
    }

    /// Reducer form of the region transitions
    pub fn apply(self, event: TrimEvent) -> Self {
        match event {
            TrimEvent::SetStart(start) => self.set_start(start),
            TrimEvent::Nudge(delta) => self.set_start(self.start + delta),
        }
    }

    /// Largest legal start for this session
    pub fn max_start(&self) -> f64 {
        (self.total_duration - self.window_length).max(0.0)
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    /// `min(start + window, total)`
    pub fn end(&self) -> f64 {
        (self.start + self.window_length).min(self.total_duration)
    }

    pub fn window_length(&self) -> f64 {
        self.window_length
    }

    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    /// Externally visible commit payload
    pub fn to_bounds(&self) -> TrimBounds {
        TrimBounds {
            start: self.start,
            end: self.end(),
        }
    }

    pub fn contains(&self, position: f64) -> bool {
        self.to_bounds().contains(position)
    }
}

fn sanitize_length(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: f64 = 20.0;

    #[test]
    fn test_init_clamps_late_start() {
        let region = TrimRegion::init(180.0, 170.0, WINDOW);
        assert_eq!(region.start(), 160.0);
        assert_eq!(region.end(), 180.0);
    }

    #[test]
    fn test_negative_drag_clamps_to_zero() {
        let region = TrimRegion::init(180.0, 170.0, WINDOW).set_start(-5.0);
        assert_eq!(region.start(), 0.0);
        assert_eq!(region.to_bounds(), TrimBounds { start: 0.0, end: 20.0 });
    }

    #[test]
    fn test_short_track_degenerates() {
        let region = TrimRegion::init(12.5, 4.0, WINDOW);
        assert_eq!(region.start(), 0.0);
        assert_eq!(region.end(), 12.5);
        assert!(region.to_bounds().length() < WINDOW);
    }

    #[test]
    fn test_adversarial_starts_stay_in_bounds() {
        let inputs = [
            f64::NAN,
            f64::INFINITY,
            f64::NEG_INFINITY,
            -1e12,
            1e12,
            0.0,
            59.9,
            160.0,
            160.0001,
        ];
        for total in [0.0, 5.0, 20.0, 180.0] {
            let mut region = TrimRegion::init(total, 0.0, WINDOW);
            for &input in &inputs {
                region = region.set_start(input);
                assert!(region.start() >= 0.0);
                assert!(region.start() <= (total - WINDOW).max(0.0));
                let bounds = region.to_bounds();
                assert!(bounds.length() <= WINDOW);
                if total >= WINDOW {
                    assert_eq!(bounds.length(), WINDOW);
                }
            }
        }
    }

    #[test]
    fn test_reducer_nudge() {
        let region = TrimRegion::init(100.0, 10.0, WINDOW)
            .apply(TrimEvent::Nudge(5.0))
            .apply(TrimEvent::Nudge(-100.0))
            .apply(TrimEvent::SetStart(42.0));
        assert_eq!(region.start(), 42.0);
        assert_eq!(region.window_length(), WINDOW);
        assert_eq!(region.total_duration(), 100.0);
    }

    #[test]
    fn test_unresolved_commits_empty_bounds() {
        let region = TrimRegion::unresolved(WINDOW).set_start(30.0);
        assert_eq!(region.to_bounds(), TrimBounds { start: 0.0, end: 0.0 });
    }

    #[test]
    fn test_bounds_contains_is_half_open() {
        let bounds = TrimRegion::init(60.0, 10.0, WINDOW).to_bounds();
        assert!(bounds.contains(10.0));
        assert!(bounds.contains(29.99));
        assert!(!bounds.contains(30.0));
        assert!(!bounds.contains(9.99));
    }
}
