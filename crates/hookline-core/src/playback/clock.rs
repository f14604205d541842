//! Media clock seam and the simulated fallback clock

use tokio::time::Instant;

use crate::audio::AudioResult;

/// A clock that can actually produce sound
///
/// `start` may be refused by the host (no device, device busy, policy);
/// callers must be ready to continue without it.
pub trait MediaClock {
    fn start(&mut self) -> AudioResult<()>;
    fn pause(&mut self);
    fn seek(&mut self, seconds: f64);
    /// Current playhead in track seconds
    fn position(&self) -> f64;
    fn set_muted(&mut self, muted: bool);
}

impl<C: MediaClock + ?Sized> MediaClock for Box<C> {
    fn start(&mut self) -> AudioResult<()> {
        (**self).start()
    }

    fn pause(&mut self) {
        (**self).pause()
    }

    fn seek(&mut self, seconds: f64) {
        (**self).seek(seconds)
    }

    fn position(&self) -> f64 {
        (**self).position()
    }

    fn set_muted(&mut self, muted: bool) {
        (**self).set_muted(muted)
    }
}

/// Virtual playhead that follows wall time
///
/// Used when the real clock refuses to start. The position is derived from
/// the instant playback (re)started, so it advances at real speed no matter
/// how often it is read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatedClock {
    /// Position at `started_at`, or the frozen position while paused
    anchor: f64,
    started_at: Option<Instant>,
}

impl SimulatedClock {
    /// Clock already running from `position`
    pub fn running_from(position: f64) -> Self {
        Self {
            anchor: position,
            started_at: Some(Instant::now()),
        }
    }
}

impl MediaClock for SimulatedClock {
    fn start(&mut self) -> AudioResult<()> {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
        Ok(())
    }

    fn pause(&mut self) {
        self.anchor = self.position();
        self.started_at = None;
    }

    fn seek(&mut self, seconds: f64) {
        self.anchor = seconds;
        if self.started_at.is_some() {
            self.started_at = Some(Instant::now());
        }
    }

    fn position(&self) -> f64 {
        match self.started_at {
            Some(started_at) => self.anchor + started_at.elapsed().as_secs_f64(),
            None => self.anchor,
        }
    }

    /// Nothing to silence
    fn set_muted(&mut self, _muted: bool) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_simulated_clock_follows_wall_time() {
        let mut clock = SimulatedClock::running_from(12.0);
        clock.pause();
        tokio::time::advance(Duration::from_secs(3)).await;
        assert_eq!(clock.position(), 12.0);

        clock.start().unwrap();
        tokio::time::advance(Duration::from_millis(1500)).await;
        assert!((clock.position() - 13.5).abs() < 1e-9);

        clock.pause();
        tokio::time::advance(Duration::from_secs(10)).await;
        assert!((clock.position() - 13.5).abs() < 1e-9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_seek_while_running_restarts_from_target() {
        let mut clock = SimulatedClock::running_from(0.0);
        tokio::time::advance(Duration::from_secs(4)).await;
        clock.seek(40.0);
        tokio::time::advance(Duration::from_millis(250)).await;
        assert!((clock.position() - 40.25).abs() < 1e-9);
    }
}
