use std::{collections::HashSet, sync::Arc};

use crate::foundation::error::{ReelError, ReelResult};

/// Upper bound for generated sequences.
pub const MAX_NUMBERED_FRAMES: u32 = 100_000;

/// Ordered, fixed-length list of frame identifiers.
///
/// Order is playback order. A sequence always holds at least one frame and
/// never repeats an identifier; it cannot be changed after construction.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Sequence {
    frames: Arc<[String]>,
}

impl Sequence {
    pub fn new<I, S>(frames: I) -> ReelResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let frames: Vec<String> = frames.into_iter().map(Into::into).collect();
        if frames.is_empty() {
            return Err(ReelError::validation("sequence must contain at least one frame"));
        }

        let mut seen = HashSet::with_capacity(frames.len());
        for id in &frames {
            if id.is_empty() {
                return Err(ReelError::validation("frame identifier must be non-empty"));
            }
            if !seen.insert(id.as_str()) {
                return Err(ReelError::validation(format!(
                    "duplicate frame identifier '{id}'"
                )));
            }
        }

        Ok(Self {
            frames: frames.into(),
        })
    }

    /// Zero-padded numeric naming, e.g. `numbered("frame-", 3, 1, 240, "png")`
    /// yields `frame-001.png` .. `frame-240.png`.
    pub fn numbered(
        prefix: &str,
        digits: usize,
        first: u32,
        count: u32,
        extension: &str,
    ) -> ReelResult<Self> {
        if count == 0 {
            return Err(ReelError::validation("numbered sequence count must be > 0"));
        }
        if count > MAX_NUMBERED_FRAMES {
            return Err(ReelError::validation(format!(
                "numbered sequence count {count} exceeds {MAX_NUMBERED_FRAMES}"
            )));
        }
        let last = first
            .checked_add(count - 1)
            .ok_or_else(|| ReelError::validation("numbered sequence overflows u32"))?;

        let ext = extension.trim_start_matches('.');
        Self::new((first..=last).map(|n| {
            if ext.is_empty() {
                format!("{prefix}{n:0digits$}")
            } else {
                format!("{prefix}{n:0digits$}.{ext}")
            }
        }))
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.frames.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.frames.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.frames.iter().map(String::as_str)
    }
}

impl TryFrom<Vec<String>> for Sequence {
    type Error = ReelError;

    fn try_from(frames: Vec<String>) -> ReelResult<Self> {
        Self::new(frames)
    }
}

impl From<Sequence> for Vec<String> {
    fn from(seq: Sequence) -> Self {
        seq.frames.to_vec()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reel/sequence.rs"]
mod tests;
