/// Result alias used throughout the crate.
pub type PosterResult<T> = Result<T, PosterError>;

/// Error type for scene construction, field setup, rendering and output.
#[derive(thiserror::Error, Debug)]
pub enum PosterError {
    /// Invalid input: bad parameters, malformed geometry, unknown names.
    #[error("validation error: {0}")]
    Validation(String),

    /// A backend failed while turning a scene into pixels or markup.
    #[error("render error: {0}")]
    Render(String),

    /// Font resolution or text layout failed.
    #[error("font error: {0}")]
    Font(String),

    /// Config (de)serialization failed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Filesystem access failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything else, with context attached by the caller.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PosterError {
    /// Build a [`PosterError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PosterError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`PosterError::Font`].
    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    /// Build a [`PosterError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
