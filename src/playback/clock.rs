use crate::foundation::core::Fps;

/// Fixed-step playback clock.
///
/// Converts host timestamps (milliseconds, monotonic) into whole ticks of
/// `1000 / fps` ms. Elapsed time accumulates and only whole ticks are paid
/// out; the remainder carries over, so delayed or skipped callbacks never
/// make playback drift from wall-clock time.
///
/// The accumulator is kept in `ms * fps.num` units, which makes integer
/// timestamps exact: `100ms @ 30fps` is three ticks, not `2.9999..`.
#[derive(Clone, Debug)]
pub struct PlaybackClock {
    fps: Fps,
    last_tick_ms: Option<f64>,
    accumulated: f64,
}

impl PlaybackClock {
    /// An invalid rate (zero numerator or denominator) falls back to
    /// [`Fps::default`].
    pub fn new(fps: Fps) -> Self {
        let fps = Fps::new(fps.num, fps.den).unwrap_or_else(|e| {
            tracing::warn!(num = fps.num, den = fps.den, error = %e, "invalid fps; using default");
            Fps::default()
        });
        Self {
            fps,
            last_tick_ms: None,
            accumulated: 0.0,
        }
    }

    pub fn fps(&self) -> Fps {
        self.fps
    }

    pub fn interval_ms(&self) -> f64 {
        self.fps.tick_interval_ms()
    }

    /// Start counting from `now_ms` with an empty accumulator.
    pub fn reset(&mut self, now_ms: f64) {
        self.last_tick_ms = Some(now_ms);
        self.accumulated = 0.0;
    }

    pub fn last_tick_ms(&self) -> Option<f64> {
        self.last_tick_ms
    }

    /// Carried-over time that has not yet formed a whole tick.
    /// Always in `[0, interval_ms)`.
    pub fn accumulated_ms(&self) -> f64 {
        self.accumulated / f64::from(self.fps.num)
    }

    /// Whole ticks elapsed since the previous call.
    ///
    /// The first call (without a prior [`Self::reset`]) only establishes the
    /// baseline. A timestamp earlier than the previous one counts as zero
    /// elapsed time and becomes the new baseline.
    pub fn advance_ticks(&mut self, now_ms: f64) -> u64 {
        if !now_ms.is_finite() {
            return 0;
        }
        let Some(last) = self.last_tick_ms.replace(now_ms) else {
            return 0;
        };

        let elapsed = (now_ms - last).max(0.0);
        let unit = 1000.0 * f64::from(self.fps.den);
        self.accumulated += elapsed * f64::from(self.fps.num);

        let ticks = (self.accumulated / unit).floor();
        let rem = self.accumulated - ticks * unit;
        self.accumulated = if (0.0..unit).contains(&rem) { rem } else { 0.0 };
        ticks as u64
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/clock.rs"]
mod tests;
