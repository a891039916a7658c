use thiserror::Error;

/// Error type for invalid operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ItrpError {
    /// A date argument could not be interpreted as a calendar date.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid projection parameters: {0}")]
    InvalidProjection(String),
    #[error("Invalid coefficient set: {0}")]
    InvalidCoefficients(String),
    #[error("Array shapes do not match. Expected {expected:?}, got {found:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        found: Vec<usize>,
    },
}

/// Convenience type for `Result<T, ItrpError>`.
pub type ItrpResult<T> = Result<T, ItrpError>;

/// Check that two arrays share a shape before zipping them together.
pub fn ensure_same_shape(expected: &[usize], found: &[usize]) -> ItrpResult<()> {
    if expected == found {
        Ok(())
    } else {
        Err(ItrpError::ShapeMismatch {
            expected: expected.to_vec(),
            found: found.to_vec(),
        })
    }
}
