//! Elapsed-time labels for crossing timestamps.

use tracing::warn;

/// Formats seconds as `HH:MM:SS.ss`. Negative and non-finite input is shown as
/// zero.
pub fn format_elapsed(seconds: f64) -> String {
    let seconds = if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    };

    // Round to centiseconds first so 59.999 does not print as "60.00".
    let centis = (seconds * 100.0).round() as u64;
    let hours = centis / 360_000;
    let minutes = (centis / 6_000) % 60;
    let secs = (centis % 6_000) as f64 / 100.0;

    format!("{:02}:{:02}:{:05.2}", hours, minutes, secs)
}

/// Maps playback progress (frames completed out of the total) to an elapsed
/// time label.
#[derive(Debug, Clone)]
pub struct PlaybackClock {
    total_frames: u64,
    completed: u64,
    duration: f64,
}

impl PlaybackClock {
    pub fn new(total_frames: u64, fps: f64) -> Self {
        let duration = if fps.is_finite() && fps > 0.0 {
            total_frames as f64 / fps
        } else {
            warn!(fps, "invalid frame rate, elapsed time stays at zero");
            0.0
        };

        Self {
            total_frames,
            completed: 0,
            duration,
        }
    }

    #[inline]
    pub fn duration(&self) -> f64 {
        self.duration
    }

    #[inline]
    pub fn completed(&self) -> u64 {
        self.completed
    }

    #[inline]
    pub fn advance(&mut self) {
        self.completed = (self.completed + 1).min(self.total_frames);
    }

    fn ratio(&self) -> f64 {
        if self.total_frames == 0 {
            0.0
        } else {
            self.completed as f64 / self.total_frames as f64
        }
    }

    pub fn elapsed(&self) -> f64 {
        self.duration * self.ratio()
    }

    pub fn timestamp(&self) -> String {
        format_elapsed(self.elapsed())
    }

    pub fn progress_percent(&self) -> u8 {
        (self.ratio() * 100.0).ceil().min(100.0) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0.0), "00:00:00.00");
        assert_eq!(format_elapsed(5.25), "00:00:05.25");
        assert_eq!(format_elapsed(3725.5), "01:02:05.50");
        assert_eq!(format_elapsed(59.999), "00:01:00.00");
    }

    #[test]
    fn test_format_elapsed_clamps_bad_input() {
        assert_eq!(format_elapsed(-3.0), "00:00:00.00");
        assert_eq!(format_elapsed(f64::NAN), "00:00:00.00");
    }

    #[test]
    fn test_playback_clock() {
        let mut clock = PlaybackClock::new(300, 30.0);
        assert_eq!(clock.duration(), 10.0);
        assert_eq!(clock.timestamp(), "00:00:00.00");
        assert_eq!(clock.progress_percent(), 0);

        for _ in 0..150 {
            clock.advance();
        }
        assert_eq!(clock.timestamp(), "00:00:05.00");
        assert_eq!(clock.progress_percent(), 50);

        for _ in 0..500 {
            clock.advance();
        }
        assert_eq!(clock.completed(), 300);
        assert_eq!(clock.progress_percent(), 100);
    }

    #[test]
    fn test_zero_fps_keeps_time_at_zero() {
        let mut clock = PlaybackClock::new(10, 0.0);
        clock.advance();

        assert_eq!(clock.timestamp(), "00:00:00.00");
        assert_eq!(clock.progress_percent(), 10);
    }
}
