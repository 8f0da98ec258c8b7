use std::path::Path;

use anyhow::Context;

use crate::{
    foundation::core::Fps,
    foundation::error::{ReelError, ReelResult},
    reel::sequence::Sequence,
};

/// Environment variable overriding the playback rate (integer fps).
pub const ENV_FPS: &str = "FRAMEREEL_FPS";
/// Environment variable overriding the start prefix length.
pub const ENV_START_THRESHOLD: &str = "FRAMEREEL_START_THRESHOLD";

const DEFAULT_PREFIX_FRAMES: usize = 30;

/// When a primed player may start advancing past frame 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartPolicy {
    /// The first `n` frames (frame 0 included) must have settled.
    Prefix(usize),
    /// Every frame must have settled before playback starts.
    AllFrames,
}

impl Default for StartPolicy {
    fn default() -> Self {
        Self::Prefix(DEFAULT_PREFIX_FRAMES)
    }
}

impl StartPolicy {
    /// Prefix length for a sequence of `len` frames, always in `1..=len`.
    pub fn threshold(self, len: usize) -> usize {
        match self {
            Self::Prefix(n) => n.clamp(1, len.max(1)),
            Self::AllFrames => len.max(1),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlayerConfig {
    pub fps: Fps,
    pub start: StartPolicy,
}

impl PlayerConfig {
    pub fn validate(&self) -> ReelResult<()> {
        Fps::new(self.fps.num, self.fps.den)?;
        Ok(())
    }

    /// Apply [`ENV_FPS`] / [`ENV_START_THRESHOLD`] from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::with_env_overrides`] with an explicit lookup.
    /// Unparsable or zero values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(fps) = lookup(ENV_FPS)
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|&n| n > 0)
        {
            self.fps = Fps { num: fps, den: 1 };
        }
        if let Some(n) = lookup(ENV_START_THRESHOLD)
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&n| n > 0)
        {
            self.start = StartPolicy::Prefix(n);
        }
        self
    }
}

/// Explicit identifiers or a zero-padded numeric pattern.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum FrameList {
    Explicit(Vec<String>),
    Numbered(NumberedFrames),
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NumberedFrames {
    pub prefix: String,
    #[serde(default = "default_digits")]
    pub digits: usize,
    #[serde(default = "default_first")]
    pub first: u32,
    pub count: u32,
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_digits() -> usize {
    3
}

fn default_first() -> u32 {
    1
}

fn default_extension() -> String {
    "png".to_string()
}

impl FrameList {
    pub fn to_sequence(&self) -> ReelResult<Sequence> {
        match self {
            Self::Explicit(ids) => Sequence::new(ids.iter().cloned()),
            Self::Numbered(n) => {
                Sequence::numbered(&n.prefix, n.digits, n.first, n.count, &n.extension)
            }
        }
    }
}

/// On-disk description of one animation: where its frames live, what they
/// are called, and how to play them.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReelManifest {
    pub base_path: String,
    pub frames: FrameList,
    #[serde(default)]
    pub player: PlayerConfig,
}

impl ReelManifest {
    pub fn from_json_str(json: &str) -> ReelResult<Self> {
        let manifest: Self = serde_json::from_str(json)
            .map_err(|e| ReelError::serde(format!("parse reel manifest: {e}")))?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn from_path(path: impl AsRef<Path>) -> ReelResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read reel manifest '{}'", path.display()))?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> ReelResult<()> {
        self.player.validate()?;
        self.frames.to_sequence()?;
        Ok(())
    }

    pub fn sequence(&self) -> ReelResult<Sequence> {
        self.frames.to_sequence()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reel/config.rs"]
mod tests;
