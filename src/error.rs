//! Error types.
//!
//! - `FitError` is returned by the fitting engine (`models`, `fit`).
//! - `AppError` is what the binary reports: a message plus a process exit code.

/// Result alias for the fitting engine.
pub type Result<T> = std::result::Result<T, FitError>;

/// Failures of the fitting engine.
///
/// Everything except `NonFinite` is a precondition violation and is raised
/// before any search iteration starts.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FitError {
    #[error("Observed point set is empty.")]
    EmptyPointSet,

    #[error("Observed point {index} has a non-finite coordinate.")]
    NonFiniteInput { index: usize },

    #[error("Invalid bounds for {axis}: [{lower}, {upper}] (must be finite with lower < upper).")]
    InvalidBounds {
        axis: &'static str,
        lower: f64,
        upper: f64,
    },

    #[error("Invalid curve configuration: {0}")]
    InvalidCurveConfig(String),

    #[error("Invalid search configuration: {0}")]
    InvalidSearchConfig(String),

    #[error("Point sets differ in size: observed={observed}, sampled={sampled}.")]
    LengthMismatch { observed: usize, sampled: usize },

    /// The growth term overflowed (or produced NaN) at curve parameter `t`.
    #[error("Curve evaluation is not finite at t={t}.")]
    NonFinite { t: f64 },
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<FitError> for AppError {
    fn from(err: FitError) -> Self {
        let exit_code = match err {
            FitError::EmptyPointSet => 3,
            FitError::NonFiniteInput { .. }
            | FitError::InvalidBounds { .. }
            | FitError::InvalidCurveConfig(_)
            | FitError::InvalidSearchConfig(_) => 2,
            FitError::LengthMismatch { .. } | FitError::NonFinite { .. } => 4,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_errors_map_to_exit_codes() {
        assert_eq!(AppError::from(FitError::EmptyPointSet).exit_code(), 3);
        assert_eq!(AppError::from(FitError::NonFiniteInput { index: 2 }).exit_code(), 2);
        assert_eq!(AppError::from(FitError::NonFinite { t: 60.0 }).exit_code(), 4);
    }
}
