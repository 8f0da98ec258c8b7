/// Convenience result type used across framereel.
pub type ReelResult<T> = Result<T, ReelError>;

/// Error taxonomy for construction, loading and drawing.
///
/// Playback itself never returns these to the host: load and draw failures
/// are logged and the player holds the last painted frame instead.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Invalid sequence, configuration or geometry.
    #[error("validation error: {0}")]
    Validation(String),

    /// A frame could not be fetched or decoded.
    #[error("load error: {0}")]
    Load(String),

    /// The render target rejected a configure or draw call.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing manifests.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn load(msg: impl Into<String>) -> Self {
        Self::Load(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
