pub type CardResult<T> = Result<T, CardError>;

#[derive(thiserror::Error, Debug)]
pub enum CardError {
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    #[error("invalid hex color: {0} (expected RRGGBB, e.g. 1a1b26)")]
    InvalidColor(String),

    #[error("invalid scale: {0} (must be a positive number)")]
    InvalidScale(f32),

    #[error("logging setup failed: {0}")]
    Logging(String),

    #[error("audio unavailable: {0}")]
    Audio(String),
}

impl CardError {
    pub fn logging(msg: impl Into<String>) -> Self {
        Self::Logging(msg.into())
    }

    pub fn audio(msg: impl Into<String>) -> Self {
        Self::Audio(msg.into())
    }
}
