/// Convenience result type used across subpass.
pub type PassResult<T> = Result<T, PassError>;

/// Recoverable error taxonomy.
///
/// Protocol violations (for example asking an always-collapsing delegate for offscreen content)
/// are programming errors and panic instead of surfacing here.
#[derive(thiserror::Error, Debug)]
pub enum PassError {
    /// Invalid user-provided scene data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while rasterizing, filtering or compositing pixels.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing scene descriptions.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PassError {
    /// Build a [`PassError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PassError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

impl From<serde_json::Error> for PassError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
