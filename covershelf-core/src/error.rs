use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoverError {
    /// Proxy digest unknown or expired.
    #[error("Proxy reference not found in cache: {0}")]
    NotFoundInCache(String),

    /// Remote answered with a non-2xx status.
    #[error("HTTP status {status} for {url}")]
    HttpStatus {
        status: reqwest::StatusCode,
        url: String,
    },

    /// Transport failure talking to a remote host.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Decode, scale or encode failure inside the `image` crate.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Image is unusable for a reason the codec did not report.
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    /// Local filesystem failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoverError {
    /// Expired or unknown proxy reference.
    pub fn is_not_found_in_cache(&self) -> bool {
        matches!(self, CoverError::NotFoundInCache(_))
    }

    /// Network or non-2xx failure talking to a remote image host.
    pub fn is_remote_fetch(&self) -> bool {
        matches!(self, CoverError::HttpStatus { .. } | CoverError::Http(_))
    }

    /// The image bytes could not be decoded, scaled or re-encoded.
    pub fn is_decode_or_resize(&self) -> bool {
        matches!(self, CoverError::Image(_) | CoverError::InvalidImage(_))
    }
}

pub type Result<T> = std::result::Result<T, CoverError>;
