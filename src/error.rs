//! Error types for matbench operations.
//!
//! Every failure is either fatal for the whole run (allocation, layout,
//! bad command line) or causes a single report row to be skipped
//! (measurement). Nothing is retried.

use std::fmt;

/// Errors that can occur while setting up or measuring a benchmark run.
#[derive(Debug, Clone, PartialEq)]
pub enum BenchError {
    /// Memory allocation failed.
    AllocationError {
        /// The size that was requested to be allocated.
        requested_size: usize,
        /// The alignment that was requested.
        requested_alignment: usize,
        /// Human-readable error message.
        message: String,
    },
    /// Invalid layout parameters were provided.
    LayoutError {
        /// The size parameter that caused the error.
        size: usize,
        /// The alignment parameter that caused the error.
        alignment: usize,
        /// Human-readable error message.
        message: String,
    },
    /// Elapsed time too small to derive a throughput from.
    MeasurementError {
        /// The elapsed time that was read, in seconds.
        elapsed_secs: f64,
        /// Human-readable error message.
        message: String,
    },
    /// A command-line value could not be used.
    InvalidArgument {
        /// Human-readable error message.
        message: String,
    },
    /// The report could not be written.
    OutputError {
        /// Human-readable error message.
        message: String,
    },
}

impl BenchError {
    /// Whether the error must abort the entire run.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, BenchError::MeasurementError { .. })
    }
}

impl fmt::Display for BenchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BenchError::AllocationError {
                requested_size,
                requested_alignment,
                message,
            } => write!(
                f,
                "Memory allocation failed: {} (requested {} bytes with {} byte alignment)",
                message, requested_size, requested_alignment
            ),
            BenchError::LayoutError {
                size,
                alignment,
                message,
            } => write!(
                f,
                "Invalid memory layout: {} (size: {}, alignment: {})",
                message, size, alignment
            ),
            BenchError::MeasurementError {
                elapsed_secs,
                message,
            } => write!(
                f,
                "Measurement error: {} (elapsed: {:e} s)",
                message, elapsed_secs
            ),
            BenchError::InvalidArgument { message } => {
                write!(f, "Invalid argument: {}", message)
            }
            BenchError::OutputError { message } => {
                write!(f, "Output error: {}", message)
            }
        }
    }
}

impl std::error::Error for BenchError {}

impl From<std::io::Error> for BenchError {
    fn from(error: std::io::Error) -> Self {
        BenchError::OutputError {
            message: error.to_string(),
        }
    }
}

/// Result type alias for matbench operations.
pub type Result<T> = std::result::Result<T, BenchError>;

/// Creates an allocation error.
pub fn allocation_error(size: usize, alignment: usize, message: impl Into<String>) -> BenchError {
    BenchError::AllocationError {
        requested_size: size,
        requested_alignment: alignment,
        message: message.into(),
    }
}

/// Creates a layout error.
pub fn layout_error(size: usize, alignment: usize, message: impl Into<String>) -> BenchError {
    BenchError::LayoutError {
        size,
        alignment,
        message: message.into(),
    }
}

/// Creates a measurement error.
pub fn measurement_error(elapsed_secs: f64, message: impl Into<String>) -> BenchError {
    BenchError::MeasurementError {
        elapsed_secs,
        message: message.into(),
    }
}

/// Creates an invalid-argument error.
pub fn invalid_argument(message: impl Into<String>) -> BenchError {
    BenchError::InvalidArgument {
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocation_error_display() {
        let error = allocation_error(8_388_608, 64, "out of memory");
        let display = format!("{}", error);
        assert!(display.contains("Memory allocation failed"));
        assert!(display.contains("8388608 bytes"));
        assert!(display.contains("64 byte alignment"));
        assert!(display.contains("out of memory"));
    }

    #[test]
    fn test_layout_error_display() {
        let error = layout_error(usize::MAX, 64, "matrix size overflows usize");
        let display = format!("{}", error);
        assert!(display.contains("Invalid memory layout"));
        assert!(display.contains("alignment: 64"));
        assert!(display.contains("matrix size overflows usize"));
    }

    #[test]
    fn test_measurement_error_display() {
        let error = measurement_error(0.0, "elapsed time below clock resolution");
        let display = format!("{}", error);
        assert!(display.contains("Measurement error"));
        assert!(display.contains("elapsed time below clock resolution"));
    }

    #[test]
    fn test_invalid_argument_display() {
        let error = invalid_argument("n must be a positive integer, got '0'");
        let display = format!("{}", error);
        assert!(display.contains("Invalid argument"));
        assert!(display.contains("got '0'"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let error: BenchError = io.into();
        assert!(matches!(error, BenchError::OutputError { .. }));
        assert!(format!("{}", error).contains("pipe closed"));
    }

    #[test]
    fn test_fatality() {
        assert!(allocation_error(1, 64, "x").is_fatal());
        assert!(layout_error(1, 64, "x").is_fatal());
        assert!(invalid_argument("x").is_fatal());
        assert!(!measurement_error(0.0, "x").is_fatal());
    }

    #[test]
    fn test_error_equality() {
        let error1 = allocation_error(1024, 64, "test");
        let error2 = allocation_error(1024, 64, "test");
        let error3 = allocation_error(2048, 64, "test");

        assert_eq!(error1, error2);
        assert_ne!(error1, error3);
    }

    #[test]
    fn test_error_trait_implementation() {
        let error = allocation_error(1024, 64, "test error");

        let _: &dyn std::error::Error = &error;

        assert!(std::error::Error::source(&error).is_none());
    }
}
