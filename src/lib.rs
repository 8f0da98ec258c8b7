//! framereel plays a long ordered sequence of still images as a
//! pseudo-video inside a resizable canvas, starting before the whole
//! sequence has downloaded.
//!
//! # Pieces
//!
//! - [`AssetSource`]: fetches and decodes one frame; settles through a
//!   one-shot [`CompletionSink`].
//! - [`FrameBuffer`]: per-frame [`FrameSlot`] state and the start-prefix
//!   readiness check.
//! - [`PlaybackClock`]: fixed-step accumulation from host timestamps to
//!   whole ticks, independent of repaint rate.
//! - [`CoverRenderer`]: aspect-preserving cover fit into a [`Viewport`].
//! - [`FramePlayer`]: owns position and state, drives the repaint loop
//!   through a [`FrameScheduler`], and reacts to resizes.
//!
//! Everything is single-threaded. Sources may decode elsewhere, but slot
//! writes happen only when the player drains the buffer on its own thread.
//!
//! # Lifecycle
//!
//! ```no_run
//! use framereel::{
//!     FramePlayer, FsAssetSource, ManualScheduler, PixmapTarget, PlayerConfig, PlayerHost,
//!     RepaintLoop, Sequence,
//! };
//!
//! let scheduler = ManualScheduler::new();
//! let host = PlayerHost {
//!     target: Some(Box::new(PixmapTarget::new(1280.0, 720.0, 2.0))),
//!     source: Box::new(FsAssetSource::new("site")),
//!     scheduler: Box::new(scheduler.clone()),
//! };
//! let frames = Sequence::numbered("ezgif-frame-", 3, 1, 240, "png").unwrap();
//! let mut player = FramePlayer::new(host, "/hero-frames", frames, PlayerConfig::default());
//!
//! player.start(0.0);
//! RepaintLoop::new(60.0).run(&mut player, &scheduler);
//! ```
#![forbid(unsafe_code)]

mod assets;
mod foundation;
mod playback;
mod reel;
mod render;

pub use assets::buffer::{FrameBuffer, FrameSlot};
pub use assets::raster::{Raster, decode_raster};
pub use assets::source::{
    AssetRequest, AssetSource, CompletionSink, FsAssetSource, LoadCompletion, LoadThreading,
    MemoryAssetSource, normalize_rel_path,
};
pub use foundation::core::{Affine, Fps, Point, Rect, Size, Vec2};
pub use foundation::error::{ReelError, ReelResult};
pub use playback::clock::PlaybackClock;
pub use playback::player::{FramePlayer, PlayerHost, PlayerState};
pub use playback::scheduler::{FrameScheduler, ManualScheduler, RepaintLoop};
pub use reel::config::{
    ENV_FPS, ENV_START_THRESHOLD, FrameList, NumberedFrames, PlayerConfig, ReelManifest,
    StartPolicy,
};
pub use reel::sequence::{MAX_NUMBERED_FRAMES, Sequence};
pub use render::cover::{CoverFit, CoverRenderer, cover_fit};
pub use render::cpu::PixmapTarget;
pub use render::target::RenderTarget;
pub use render::viewport::Viewport;
