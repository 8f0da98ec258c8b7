use std::sync::mpsc;

use crate::{
    assets::raster::Raster,
    assets::source::{AssetRequest, AssetSource, CompletionSink, LoadCompletion},
    reel::config::StartPolicy,
    reel::sequence::Sequence,
};

/// Load state of one frame. Slots only move forward:
/// `Unrequested -> Loading -> Ready | Failed`.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum FrameSlot {
    #[default]
    Unrequested,
    Loading,
    Ready(Raster),
    Failed,
}

impl FrameSlot {
    /// Ready or Failed; nothing further will happen to this slot.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Ready(_) | Self::Failed)
    }
}

/// Per-frame load state for one sequence.
///
/// Completions from the [`AssetSource`] land in a queue owned by this buffer
/// and are applied only by [`FrameBuffer::drain`], which the player calls on
/// the render thread. That keeps every slot write on a single thread even
/// when a source decodes elsewhere.
#[derive(Debug)]
pub struct FrameBuffer {
    base_path: String,
    sequence: Sequence,
    slots: Vec<FrameSlot>,
    start_threshold: usize,
    tx: Option<mpsc::Sender<LoadCompletion>>,
    rx: Option<mpsc::Receiver<LoadCompletion>>,
}

impl FrameBuffer {
    pub fn new(base_path: impl Into<String>, sequence: Sequence, start: StartPolicy) -> Self {
        let (tx, rx) = mpsc::channel();
        let len = sequence.len();
        Self {
            base_path: base_path.into(),
            slots: vec![FrameSlot::Unrequested; len],
            start_threshold: start.threshold(len),
            sequence,
            tx: Some(tx),
            rx: Some(rx),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn slot(&self, index: usize) -> Option<&FrameSlot> {
        self.slots.get(index)
    }

    /// Issue a fetch for `index` if it was never requested. A no-op for
    /// out-of-range indices, already requested slots, or an abandoned buffer.
    pub fn request(&mut self, index: usize, source: &dyn AssetSource) {
        let Some(tx) = self.tx.as_ref() else {
            return;
        };
        let Some(slot) = self.slots.get_mut(index) else {
            return;
        };
        if !matches!(slot, FrameSlot::Unrequested) {
            return;
        }
        let Some(identifier) = self.sequence.get(index) else {
            return;
        };

        *slot = FrameSlot::Loading;
        let request = AssetRequest {
            index,
            base_path: self.base_path.clone(),
            identifier: identifier.to_string(),
        };
        tracing::debug!(index, location = %request.location(), "requesting frame");
        source.fetch(request, CompletionSink::new(index, tx.clone()));
    }

    /// Request every frame in playback order, so the start prefix is
    /// issued first and the remainder loads behind it.
    pub fn request_all(&mut self, source: &dyn AssetSource) {
        for index in 0..self.slots.len() {
            self.request(index, source);
        }
    }

    /// Apply queued completions. Returns how many slots changed.
    pub fn drain(&mut self) -> usize {
        let Some(rx) = self.rx.as_ref() else {
            return 0;
        };

        let mut applied = 0;
        while let Ok(done) = rx.try_recv() {
            let Some(slot) = self.slots.get_mut(done.index) else {
                continue;
            };
            if !matches!(slot, FrameSlot::Loading) {
                continue;
            }
            match done.result {
                Ok(raster) => {
                    tracing::debug!(index = done.index, "frame ready");
                    *slot = FrameSlot::Ready(raster);
                }
                Err(e) => {
                    tracing::warn!(index = done.index, error = %e, "frame failed to load");
                    *slot = FrameSlot::Failed;
                }
            }
            applied += 1;
        }
        applied
    }

    pub fn is_ready(&self, index: usize) -> bool {
        matches!(self.slots.get(index), Some(FrameSlot::Ready(_)))
    }

    /// The decoded frame, or `None` unless the slot is Ready.
    pub fn raster(&self, index: usize) -> Option<&Raster> {
        match self.slots.get(index) {
            Some(FrameSlot::Ready(raster)) => Some(raster),
            _ => None,
        }
    }

    pub fn start_threshold(&self) -> usize {
        self.start_threshold
    }

    /// Number of leading frames that must settle before playback may
    /// advance past frame 0; clamped to `1..=len`.
    pub fn set_start_threshold(&mut self, n: usize) {
        self.start_threshold = StartPolicy::Prefix(n).threshold(self.slots.len());
    }

    /// True once every slot in the start prefix is Ready or Failed.
    ///
    /// A Failed slot can never become Ready, so it does not hold the
    /// prefix back.
    pub fn threshold_met(&self) -> bool {
        self.slots[..self.start_threshold]
            .iter()
            .all(FrameSlot::is_settled)
    }

    pub fn ready_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s, FrameSlot::Ready(_)))
            .count()
    }

    /// Stop accepting completions. Pending and late results are dropped;
    /// slots keep whatever state they had.
    pub fn abandon(&mut self) {
        self.tx = None;
        self.rx = None;
    }

    pub fn is_abandoned(&self) -> bool {
        self.rx.is_none()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/buffer.rs"]
mod tests;
