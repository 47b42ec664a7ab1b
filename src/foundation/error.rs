/// Convenience result type used across abstrak.
pub type AbstrakResult<T> = Result<T, AbstrakError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum AbstrakError {
    /// A pixel buffer whose byte length does not match `width * height * 4`, a zero-sized
    /// buffer, or a shape a kernel cannot process.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Invalid user-provided configuration (fps, duration, intensity, ...).
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// The primary encoding capability is missing. Recoverable by selecting the fallback path.
    #[error("encoder unavailable: {0}")]
    EncoderUnavailable(String),

    /// The encoder reported an error. Aborts the whole export; no partial output is returned.
    #[error("encoding failed: {0}")]
    EncodingFailed(String),

    /// Internal coordinate contract violation.
    #[error("out of bounds: {0}")]
    OutOfBounds(String),

    /// A cooperative cancellation request was observed at a frame boundary.
    #[error("cancelled")]
    Cancelled,

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AbstrakError {
    /// Build an [`AbstrakError::InvalidDimensions`] value.
    pub fn invalid_dimensions(msg: impl Into<String>) -> Self {
        Self::InvalidDimensions(msg.into())
    }

    /// Build an [`AbstrakError::InvalidConfig`] value.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Build an [`AbstrakError::EncoderUnavailable`] value.
    pub fn encoder_unavailable(msg: impl Into<String>) -> Self {
        Self::EncoderUnavailable(msg.into())
    }

    /// Build an [`AbstrakError::EncodingFailed`] value.
    pub fn encoding_failed(msg: impl Into<String>) -> Self {
        Self::EncodingFailed(msg.into())
    }

    /// Build an [`AbstrakError::OutOfBounds`] value.
    pub fn out_of_bounds(msg: impl Into<String>) -> Self {
        Self::OutOfBounds(msg.into())
    }

    /// Only a missing primary encoder is recoverable (by switching to the fallback path).
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::EncoderUnavailable(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
