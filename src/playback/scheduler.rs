use std::{cell::Cell, rc::Rc, time::Duration};

use crate::playback::player::FramePlayer;

/// Host repaint scheduling.
///
/// The player asks for one callback per tick and re-arms after each one.
/// When the callback fires the host calls [`FramePlayer::tick`] with the
/// repaint timestamp.
pub trait FrameScheduler {
    /// Request a single callback before the next repaint. Requests made
    /// before the callback fires coalesce into one.
    fn schedule_next_tick(&mut self);

    /// Drop a pending request, if any.
    fn cancel(&mut self);
}

/// Deterministic scheduler: records requests, delivers nothing by itself.
///
/// Clones share state, so a test or driver can keep one handle while the
/// player owns another.
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    pending: Rc<Cell<bool>>,
    requests: Rc<Cell<u64>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }

    /// Consume the pending request. Returns whether there was one.
    pub fn take_pending(&self) -> bool {
        self.pending.replace(false)
    }

    /// Total `schedule_next_tick` calls, coalesced or not.
    pub fn request_count(&self) -> u64 {
        self.requests.get()
    }
}

impl FrameScheduler for ManualScheduler {
    fn schedule_next_tick(&mut self) {
        self.requests.set(self.requests.get() + 1);
        self.pending.set(true);
    }

    fn cancel(&mut self) {
        self.pending.set(false);
    }
}

/// Virtual repaint timer driving a player through a [`ManualScheduler`].
#[derive(Clone, Debug)]
pub struct RepaintLoop {
    step_ms: f64,
    now_ms: f64,
    max_ticks: Option<u64>,
    paced: bool,
}

impl RepaintLoop {
    /// Repaints at `refresh_hz` starting at time 0. Non-positive rates fall
    /// back to 60 Hz.
    pub fn new(refresh_hz: f64) -> Self {
        let hz = if refresh_hz.is_finite() && refresh_hz > 0.0 {
            refresh_hz
        } else {
            60.0
        };
        Self {
            step_ms: 1000.0 / hz,
            now_ms: 0.0,
            max_ticks: None,
            paced: false,
        }
    }

    pub fn starting_at(mut self, now_ms: f64) -> Self {
        self.now_ms = now_ms;
        self
    }

    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = Some(max_ticks);
        self
    }

    /// Sleep one step of wall-clock time between callbacks, so background
    /// loads progress at a realistic rate relative to playback.
    pub fn paced(mut self, paced: bool) -> Self {
        self.paced = paced;
        self
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn step_ms(&self) -> f64 {
        self.step_ms
    }

    /// Deliver callbacks while one is pending and the tick budget lasts.
    /// Returns the number of callbacks delivered.
    pub fn run(&mut self, player: &mut FramePlayer, scheduler: &ManualScheduler) -> u64 {
        self.run_with(player, scheduler, |_| {})
    }

    /// Like [`Self::run`], calling `after_tick` once per delivered callback.
    pub fn run_with(
        &mut self,
        player: &mut FramePlayer,
        scheduler: &ManualScheduler,
        mut after_tick: impl FnMut(&FramePlayer),
    ) -> u64 {
        let mut delivered = 0u64;
        while scheduler.is_pending() {
            if self.max_ticks.is_some_and(|max| delivered >= max) {
                tracing::debug!(delivered, "repaint loop hit its tick budget");
                break;
            }
            scheduler.take_pending();
            if self.paced {
                std::thread::sleep(Duration::from_secs_f64(self.step_ms / 1000.0));
            }
            self.now_ms += self.step_ms;
            player.tick(self.now_ms);
            after_tick(player);
            delivered += 1;
        }
        delivered
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/scheduler.rs"]
mod tests;
