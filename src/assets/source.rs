//! Frame fetching.
//!
//! An [`AssetSource`] receives one [`AssetRequest`] per frame and settles it
//! exactly once through the accompanying [`CompletionSink`]. Sinks only enqueue;
//! the owning [`FrameBuffer`](crate::FrameBuffer) applies completions when the
//! render thread drains its queue, so sources may finish on any thread.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::mpsc,
};

use anyhow::Context;

use crate::{
    assets::raster::{Raster, decode_raster},
    foundation::error::{ReelError, ReelResult},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetRequest {
    /// Position in the sequence.
    pub index: usize,
    pub base_path: String,
    pub identifier: String,
}

impl AssetRequest {
    /// `base_path/identifier`, joined with a single `/`.
    pub fn location(&self) -> String {
        let base = self.base_path.trim_end_matches('/');
        if base.is_empty() {
            self.identifier.clone()
        } else {
            format!("{base}/{}", self.identifier)
        }
    }
}

/// Settled fetch, queued for the frame buffer.
#[derive(Debug)]
pub struct LoadCompletion {
    pub index: usize,
    pub result: ReelResult<Raster>,
}

/// One-shot handle used by an [`AssetSource`] to settle a single request.
///
/// Consuming `complete` guarantees at most one result per request. If the
/// buffer that issued the request is gone the result is dropped silently.
#[derive(Debug)]
pub struct CompletionSink {
    index: usize,
    tx: mpsc::Sender<LoadCompletion>,
}

impl CompletionSink {
    pub(crate) fn new(index: usize, tx: mpsc::Sender<LoadCompletion>) -> Self {
        Self { index, tx }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn complete(self, result: ReelResult<Raster>) {
        let completion = LoadCompletion {
            index: self.index,
            result,
        };
        if self.tx.send(completion).is_err() {
            tracing::trace!(index = self.index, "dropping completion for abandoned buffer");
        }
    }
}

/// Fetches and decodes frames. No retries: one call per frame, ever.
pub trait AssetSource {
    fn fetch(&self, request: AssetRequest, sink: CompletionSink);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadThreading {
    /// Read and decode on the calling thread before `fetch` returns.
    #[default]
    Inline,
    /// Read and decode on the global `rayon` pool.
    Pool,
}

/// Loads frames from the local filesystem.
///
/// `base_path` is resolved under `root`; a leading `/` means "relative to
/// the root", mirroring web-root paths such as `/hero-frames`.
#[derive(Clone, Debug)]
pub struct FsAssetSource {
    root: PathBuf,
    threading: LoadThreading,
}

impl FsAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            threading: LoadThreading::default(),
        }
    }

    pub fn with_threading(mut self, threading: LoadThreading) -> Self {
        self.threading = threading;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, request: &AssetRequest) -> ReelResult<PathBuf> {
        let base = request.base_path.trim_start_matches(['/', '\\']);
        let mut path = self.root.clone();
        if !base.is_empty() {
            path.push(normalize_rel_path(base)?);
        }
        path.push(normalize_rel_path(&request.identifier)?);
        Ok(path)
    }
}

fn load_raster(path: &Path) -> ReelResult<Raster> {
    let bytes = std::fs::read(path).with_context(|| format!("read frame '{}'", path.display()))?;
    decode_raster(&bytes)
}

impl AssetSource for FsAssetSource {
    fn fetch(&self, request: AssetRequest, sink: CompletionSink) {
        let path = match self.resolve(&request) {
            Ok(path) => path,
            Err(e) => {
                sink.complete(Err(e));
                return;
            }
        };

        match self.threading {
            LoadThreading::Inline => sink.complete(load_raster(&path)),
            LoadThreading::Pool => rayon::spawn(move || sink.complete(load_raster(&path))),
        }
    }
}

/// Serves pre-decoded rasters keyed by frame identifier; unknown
/// identifiers fail to load.
#[derive(Clone, Debug, Default)]
pub struct MemoryAssetSource {
    frames: HashMap<String, Raster>,
}

impl MemoryAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, identifier: impl Into<String>, raster: Raster) {
        self.frames.insert(identifier.into(), raster);
    }

    pub fn with_frame(mut self, identifier: impl Into<String>, raster: Raster) -> Self {
        self.insert(identifier, raster);
        self
    }
}

impl AssetSource for MemoryAssetSource {
    fn fetch(&self, request: AssetRequest, sink: CompletionSink) {
        let result = self.frames.get(&request.identifier).cloned().ok_or_else(|| {
            ReelError::load(format!("no in-memory frame '{}'", request.location()))
        });
        sink.complete(result);
    }
}

/// Normalize a relative path to forward slashes, rejecting `..` and empty paths.
pub fn normalize_rel_path(source: &str) -> ReelResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(ReelError::validation("frame paths must be relative"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(ReelError::validation("frame paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(ReelError::validation("frame path must contain a file name"));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
