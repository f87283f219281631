use thiserror::Error;

/// Configuration rejected by a `try_*` setter or a builder.
///
/// Plain setters never return this: they clamp, or ignore non-finite input
/// with a warning.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("range bounds must be finite (got {min}..={max})")]
    NonFiniteRange { min: f64, max: f64 },
    #[error("viewport fraction must be finite (got {0})")]
    NonFiniteViewport(f32),
    #[error("scroll position must be finite (got {0})")]
    NonFinitePosition(f32),
    #[error("{what} must be positive and finite (got {value})")]
    InvalidExtent { what: &'static str, value: f32 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
