use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpritePackerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Invalid atlas dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    /// A raster surface of the requested size could not be allocated.
    #[error("Render target unavailable ({width}x{height})")]
    RenderTargetUnavailable { width: u32, height: u32 },
}

pub type Result<T> = std::result::Result<T, SpritePackerError>;
