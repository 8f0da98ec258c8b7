use crate::{
    assets::buffer::{FrameBuffer, FrameSlot},
    assets::source::AssetSource,
    playback::clock::PlaybackClock,
    playback::scheduler::FrameScheduler,
    reel::config::PlayerConfig,
    reel::sequence::Sequence,
    render::cover::CoverRenderer,
    render::target::RenderTarget,
    render::viewport::Viewport,
};

/// Lifecycle of a [`FramePlayer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerState {
    /// Constructed, `start` not called yet.
    Idle,
    /// Loading; waiting for the start prefix to settle.
    Priming,
    /// Advancing one frame per clock tick.
    Playing,
    /// Final frame reached; the loop has stopped.
    Holding,
    /// No render target at construction. Every call is a no-op.
    Inert,
    /// `teardown` was called.
    TornDown,
}

/// Host collaborators a player is built on.
pub struct PlayerHost {
    /// `None` when the host could not find its canvas; the player is inert.
    pub target: Option<Box<dyn RenderTarget>>,
    pub source: Box<dyn AssetSource>,
    pub scheduler: Box<dyn FrameScheduler>,
}

/// Plays an image sequence into a render target.
///
/// Construction does no I/O. [`FramePlayer::start`] requests every frame and
/// arms the repaint loop; from then on the host delivers
/// [`FramePlayer::tick`] for each scheduled repaint and
/// [`FramePlayer::resize`] for each resize notification. Playback is linear
/// and stops on the last frame.
///
/// Nothing here returns an error to the host: failed loads and draws are
/// logged and the last painted frame stays on screen.
pub struct FramePlayer {
    target: Option<Box<dyn RenderTarget>>,
    source: Box<dyn AssetSource>,
    scheduler: Box<dyn FrameScheduler>,
    buffer: FrameBuffer,
    clock: PlaybackClock,
    renderer: CoverRenderer,
    state: PlayerState,
    current: usize,
    painted: Option<usize>,
    viewport: Option<Viewport>,
}

impl std::fmt::Debug for FramePlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FramePlayer")
            .field("state", &self.state)
            .field("current", &self.current)
            .field("painted", &self.painted)
            .field("viewport", &self.viewport)
            .field("frames", &self.buffer.len())
            .field("ready", &self.buffer.ready_count())
            .finish()
    }
}

impl FramePlayer {
    pub fn new(
        host: PlayerHost,
        base_path: impl Into<String>,
        sequence: Sequence,
        config: PlayerConfig,
    ) -> Self {
        let state = if host.target.is_some() {
            PlayerState::Idle
        } else {
            tracing::warn!("no render target; player is inert");
            PlayerState::Inert
        };

        Self {
            target: host.target,
            source: host.source,
            scheduler: host.scheduler,
            buffer: FrameBuffer::new(base_path, sequence, config.start),
            clock: PlaybackClock::new(config.fps),
            renderer: CoverRenderer::new(),
            state,
            current: 0,
            painted: None,
            viewport: None,
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Index of the frame currently on screen, if any was painted.
    pub fn painted_index(&self) -> Option<usize> {
        self.painted
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    pub fn buffer(&self) -> &FrameBuffer {
        &self.buffer
    }

    pub fn clock(&self) -> &PlaybackClock {
        &self.clock
    }

    /// Begin loading and arm the repaint loop. Only acts once, from `Idle`.
    #[tracing::instrument(skip(self))]
    pub fn start(&mut self, now_ms: f64) {
        match self.state {
            PlayerState::Idle => {}
            PlayerState::Inert => {
                tracing::debug!("start ignored: player is inert");
                return;
            }
            state => {
                tracing::debug!(?state, "start ignored: already started");
                return;
            }
        }

        if let Some(target) = self.target.as_deref_mut() {
            target.attach_resize_listener();
        }
        self.apply_geometry();

        self.state = PlayerState::Priming;
        tracing::debug!(
            frames = self.buffer.len(),
            threshold = self.buffer.start_threshold(),
            "priming"
        );
        self.buffer.request_all(self.source.as_ref());

        self.buffer.drain();
        self.prime(now_ms);
        self.rearm();
    }

    /// Repaint callback body.
    pub fn tick(&mut self, now_ms: f64) {
        if !matches!(self.state, PlayerState::Priming | PlayerState::Playing) {
            return;
        }

        self.buffer.drain();
        match self.state {
            PlayerState::Priming => self.prime(now_ms),
            PlayerState::Playing => self.advance(now_ms),
            _ => {}
        }
        self.rearm();
    }

    /// Resize callback body: re-measure, reconfigure, and repaint the frame
    /// on screen. Position and clock are untouched.
    #[tracing::instrument(skip(self))]
    pub fn resize(&mut self) {
        if matches!(
            self.state,
            PlayerState::Idle | PlayerState::Inert | PlayerState::TornDown
        ) {
            return;
        }

        if !self.apply_geometry() {
            return;
        }
        self.buffer.drain();
        let index = self
            .painted
            .or_else(|| self.last_ready_at_or_before(self.current));
        if let Some(index) = index {
            self.paint(index);
        }
    }

    /// Stop the loop, detach from the host, and drop pending loads.
    pub fn teardown(&mut self) {
        if self.state == PlayerState::TornDown {
            return;
        }
        self.scheduler.cancel();
        if let Some(target) = self.target.as_deref_mut() {
            target.detach_resize_listener();
        }
        self.buffer.abandon();
        self.state = PlayerState::TornDown;
        tracing::debug!(current = self.current, "player torn down");
    }

    fn rearm(&mut self) {
        if matches!(self.state, PlayerState::Priming | PlayerState::Playing) {
            self.scheduler.schedule_next_tick();
        }
    }

    fn prime(&mut self, now_ms: f64) {
        if self.painted.is_none() && self.buffer.is_ready(0) {
            self.paint(0);
        }
        if !self.buffer.threshold_met() {
            return;
        }

        self.clock.reset(now_ms);
        self.state = PlayerState::Playing;
        tracing::debug!(ready = self.buffer.ready_count(), "start prefix settled; playing");
        self.hold_if_last();
    }

    fn advance(&mut self, now_ms: f64) {
        if self.clock.advance_ticks(now_ms) == 0 {
            return;
        }

        // At most one frame per callback; extra elapsed ticks are dropped.
        let next = self.current + 1;
        match self.buffer.slot(next) {
            Some(FrameSlot::Ready(_)) => {
                self.current = next;
                self.paint(next);
            }
            Some(FrameSlot::Failed) => {
                self.current = next;
                tracing::debug!(index = next, "frame missing; holding previous frame");
            }
            Some(FrameSlot::Loading | FrameSlot::Unrequested) => {
                tracing::trace!(index = next, "next frame not loaded yet");
                return;
            }
            None => {}
        }
        self.hold_if_last();
    }

    /// Nothing painted yet (the target was unmeasurable or refused its
    /// geometry until now): show the newest loaded frame not past `current`.
    fn last_ready_at_or_before(&self, index: usize) -> Option<usize> {
        (0..=index).rev().find(|&i| self.buffer.is_ready(i))
    }

    fn hold_if_last(&mut self) {
        if self.current >= self.buffer.len() - 1 {
            self.state = PlayerState::Holding;
            tracing::debug!(index = self.current, "final frame reached; holding");
        }
    }

    /// Measure the host and configure the target. False when the target is
    /// detached or refused the geometry.
    fn apply_geometry(&mut self) -> bool {
        let Some(target) = self.target.as_deref_mut() else {
            return false;
        };
        let Some(viewport) = target.measure() else {
            tracing::debug!("render target detached; skipping resize");
            return false;
        };
        if let Err(e) = target.configure(&viewport) {
            tracing::warn!(error = %e, "render target rejected viewport");
            self.viewport = None;
            return false;
        }
        self.viewport = Some(viewport);
        true
    }

    fn paint(&mut self, index: usize) {
        let (Some(target), Some(viewport)) = (self.target.as_deref_mut(), self.viewport) else {
            return;
        };
        let Some(raster) = self.buffer.raster(index) else {
            return;
        };

        match self.renderer.draw(raster, &viewport, target) {
            Ok(_) => self.painted = Some(index),
            Err(e) => tracing::warn!(index, error = %e, "draw failed; holding previous frame"),
        }
    }
}

impl Drop for FramePlayer {
    fn drop(&mut self) {
        self.teardown();
    }
}
